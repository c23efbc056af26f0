use std::time::Instant;

use crate::{
    parse_command, AppState, Command, Effect, Msg, NotificationKind, ShareRequest, ShareResult,
    StoreReport, View, HELP_TEXT,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// `now` timestamps notifications and drives the search debounce.
pub fn update(mut state: AppState, msg: Msg, now: Instant) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started { category, query } => {
            state.set_category(category);
            if let Some(query) = query {
                state.set_query(&query);
            }
            vec![fetch_effect(&mut state)]
        }
        Msg::CommandEntered(line) => {
            let line = line.trim();
            if line.is_empty() {
                return (state, Vec::new());
            }
            state.record_command(line);
            match parse_command(line) {
                Ok(Some(command)) => apply_command(&mut state, command, now),
                Ok(None) => Vec::new(),
                Err(err) => {
                    state.notify(err.to_string(), NotificationKind::Error, now);
                    Vec::new()
                }
            }
        }
        Msg::Command(command) => apply_command(&mut state, command, now),
        Msg::FetchCompleted { generation, result } => {
            // A newer fetch superseded this one.
            if generation != state.fetch_generation() {
                return (state, Vec::new());
            }
            match result {
                Ok(articles) => {
                    let count = articles.len();
                    state.apply_articles(articles);
                    state.notify(
                        format!("Loaded {count} articles"),
                        NotificationKind::Success,
                        now,
                    );
                }
                Err(failure) => {
                    state.fail_fetch(&failure);
                    state.notify("Failed to fetch news", NotificationKind::Error, now);
                }
            }
            Vec::new()
        }
        Msg::SavedArticlesChanged(saved) => {
            state.replace_saved(saved);
            Vec::new()
        }
        Msg::Store(report) => {
            if let Some((message, kind)) = store_notification(&report) {
                state.notify(message, kind, now);
            }
            Vec::new()
        }
        Msg::ExportFinished(result) => {
            match result {
                Ok(_) => state.notify(
                    "Articles exported successfully",
                    NotificationKind::Success,
                    now,
                ),
                Err(_) => state.notify("Error exporting articles", NotificationKind::Error, now),
            }
            Vec::new()
        }
        Msg::ShareFinished(result) => {
            let (message, kind) = match result {
                ShareResult::Shared => ("Article shared successfully", NotificationKind::Success),
                ShareResult::CopiedToClipboard => {
                    ("Link copied to clipboard", NotificationKind::Success)
                }
                ShareResult::Failed(_) => ("Error sharing article", NotificationKind::Error),
            };
            state.notify(message, kind, now);
            Vec::new()
        }
        Msg::Tick => {
            state.poll_search(now);
            state.expire_notifications(now);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_command(state: &mut AppState, command: Command, now: Instant) -> Vec<Effect> {
    match command {
        Command::Help => {
            state.notify(HELP_TEXT, NotificationKind::Info, now);
            Vec::new()
        }
        Command::Next => {
            state.next_article();
            Vec::new()
        }
        Command::Previous => {
            state.previous_article();
            Vec::new()
        }
        Command::Save => state
            .current_article()
            .cloned()
            .map(Effect::SaveArticle)
            .into_iter()
            .collect(),
        Command::Clear => {
            state.clear_history();
            state.notify("Command history cleared", NotificationKind::Success, now);
            Vec::new()
        }
        Command::Search(query) => {
            state.set_query(&query);
            state.set_view(View::Articles);
            vec![fetch_effect(state)]
        }
        Command::Category(category) => {
            state.set_category(category);
            state.set_view(View::Articles);
            vec![fetch_effect(state)]
        }
        Command::Refresh => vec![fetch_effect(state)],
        Command::ShowArticles => {
            state.set_view(View::Articles);
            Vec::new()
        }
        Command::ShowSaved => {
            state.set_view(View::Saved);
            Vec::new()
        }
        Command::Find(term) => {
            state.search_input(&term, now);
            Vec::new()
        }
        Command::ToggleTag(tag) => {
            state.toggle_tag(tag.trim());
            Vec::new()
        }
        Command::EditTags { id, tags } => vec![Effect::UpdateTags { id, tags }],
        Command::Sort(sort) => {
            state.set_sort(sort);
            Vec::new()
        }
        Command::Remove(id) => vec![Effect::RemoveSaved(id)],
        Command::Share(target) => {
            let request = match target {
                Some(id) => state
                    .saved_by_id(id)
                    .map(|saved| ShareRequest::from(&saved.article)),
                None => state.current_article().map(ShareRequest::from),
            };
            request.map(Effect::Share).into_iter().collect()
        }
        Command::Export => vec![Effect::ExportSaved],
        Command::ToggleLayout => {
            state.toggle_layout();
            Vec::new()
        }
        Command::Dismiss(id) => {
            state.dismiss_notification(id);
            Vec::new()
        }
        Command::Quit => {
            state.request_quit();
            vec![Effect::Quit]
        }
    }
}

fn fetch_effect(state: &mut AppState) -> Effect {
    let (generation, request) = state.begin_fetch();
    Effect::FetchNews {
        generation,
        request,
    }
}

fn store_notification(report: &StoreReport) -> Option<(&'static str, NotificationKind)> {
    match report {
        StoreReport::Saved { .. } => Some(("Article saved successfully", NotificationKind::Success)),
        StoreReport::AlreadySaved => Some(("Article already saved", NotificationKind::Info)),
        StoreReport::SaveFailed(_) => Some(("Error saving article", NotificationKind::Error)),
        StoreReport::Removed => Some((
            "Article removed from saved items",
            NotificationKind::Success,
        )),
        StoreReport::RemoveFailed(_) => Some(("Error removing article", NotificationKind::Error)),
        StoreReport::TagsUpdated => Some(("Tags updated", NotificationKind::Success)),
        StoreReport::TagsFailed(_) => Some(("Error updating tags", NotificationKind::Error)),
        StoreReport::LoadRecovered(_) => {
            Some(("Error loading saved articles", NotificationKind::Error))
        }
        StoreReport::Reloaded { .. } => Some(("Saved articles reloaded", NotificationKind::Info)),
        StoreReport::RemoveNotFound | StoreReport::TagsNotFound => None,
    }
}
