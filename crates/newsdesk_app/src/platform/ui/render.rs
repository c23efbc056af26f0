use std::fmt::Write as _;

use newsdesk_core::{
    AppViewModel, ArticleView, Category, Layout, NotificationKind, SavedRowView, View,
};

const RULE: &str = "------------------------------------------------------------";
const GRID_COLUMNS: usize = 2;
const GRID_CELL_WIDTH: usize = 38;

/// Renders the whole screen as text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    push_header(&mut out, view);
    match view.view {
        View::Articles => push_articles(&mut out, view),
        View::Saved => push_saved(&mut out, view),
    }
    push_notifications(&mut out, view);
    out.push_str("> ");
    out
}

fn push_header(out: &mut String, view: &AppViewModel) {
    let categories: Vec<String> = Category::ALL
        .iter()
        .map(|category| {
            if *category == view.category && view.query.is_empty() {
                format!("[{category}]")
            } else {
                category.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "NEWSDESK  {}", categories.join(" "));
    let tabs = match view.view {
        View::Articles => "[articles] saved",
        View::Saved => "articles [saved]",
    };
    let _ = writeln!(out, "{tabs}  ({} saved)", view.saved_total);
    out.push_str(RULE);
    out.push('\n');
}

fn push_articles(out: &mut String, view: &AppViewModel) {
    if !view.query.is_empty() {
        let _ = writeln!(out, "Search: {}", view.query);
    }
    if view.loading {
        out.push_str("Loading...\n");
        return;
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "{error}");
        if let Some(detail) = &view.error_detail {
            let _ = writeln!(out, "({detail})");
        }
        return;
    }
    match (&view.current, view.position) {
        (Some(article), Some((position, total))) => {
            push_article(out, article);
            let previous = if view.can_go_previous { "< prev" } else { "      " };
            let next = if view.can_go_next { "next >" } else { "" };
            let _ = writeln!(out, "{previous}   {position} / {total}   {next}");
        }
        _ => out.push_str("No articles found.\n"),
    }
}

fn push_article(out: &mut String, article: &ArticleView) {
    let _ = writeln!(out, "{}", article.title);
    let published = article
        .published_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let _ = writeln!(out, "{}  {}", article.source, published);
    if let Some(description) = &article.description {
        let _ = writeln!(out, "\n{description}\n");
    }
    let _ = writeln!(out, "{}", article.url);
}

fn push_saved(out: &mut String, view: &AppViewModel) {
    let mut filter_line = format!("Sort: {}", view.sort);
    if !view.search_term.is_empty() || view.search_pending {
        let marker = if view.search_pending { "..." } else { "" };
        let _ = write!(filter_line, "  Find: {}{marker}", view.search_term);
    }
    if !view.available_tags.is_empty() {
        let tags: Vec<String> = view
            .available_tags
            .iter()
            .map(|tag| {
                if view.selected_tags.contains(tag) {
                    format!("[#{tag}]")
                } else {
                    format!("#{tag}")
                }
            })
            .collect();
        let _ = write!(filter_line, "  Tags: {}", tags.join(" "));
    }
    let _ = writeln!(out, "{filter_line}");

    if view.saved_rows.is_empty() {
        let message = if view.saved_total == 0 {
            "No saved articles yet."
        } else {
            "No saved articles match the current filter."
        };
        let _ = writeln!(out, "{message}");
        return;
    }

    match view.layout {
        Layout::List => {
            for row in &view.saved_rows {
                push_saved_row(out, row);
            }
        }
        Layout::Grid => {
            for chunk in view.saved_rows.chunks(GRID_COLUMNS) {
                let line: Vec<String> = chunk.iter().map(grid_cell).collect();
                let _ = writeln!(out, "{}", line.join(" | ").trim_end());
            }
        }
    }
}

fn push_saved_row(out: &mut String, row: &SavedRowView) {
    let _ = writeln!(out, "#{} {}", row.id, row.title);
    let _ = writeln!(
        out,
        "   {}  saved {}",
        row.source,
        row.saved_at.format("%Y-%m-%d")
    );
    if let Some(description) = &row.description {
        let _ = writeln!(out, "   {description}");
    }
    if !row.tags.is_empty() {
        let _ = writeln!(out, "   tags: {}", row.tags.join(", "));
    }
}

fn grid_cell(row: &SavedRowView) -> String {
    let label = format!("#{} {}", row.id, row.title);
    let truncated: String = if label.chars().count() > GRID_CELL_WIDTH {
        let mut cut: String = label.chars().take(GRID_CELL_WIDTH - 3).collect();
        cut.push_str("...");
        cut
    } else {
        label
    };
    format!("{truncated:<width$}", width = GRID_CELL_WIDTH)
}

fn push_notifications(out: &mut String, view: &AppViewModel) {
    if view.notifications.is_empty() {
        return;
    }
    out.push_str(RULE);
    out.push('\n');
    for notification in &view.notifications {
        let label = match notification.kind {
            NotificationKind::Info => "info",
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        let _ = writeln!(
            out,
            "({}) [{label}] {}",
            notification.id, notification.message
        );
    }
}
