use std::time::Instant;

use crate::view_model::{AppViewModel, ArticleView, NotificationView, SavedRowView};
use crate::{
    display_indices, list_tags, Article, Category, FetchFailure, FilterState, NewsRequest,
    NotificationKind, NotificationQueue, SavedArticle, SavedId, SearchDebounce, SortKey,
};

/// Banner shown while the last fetch failed.
pub const FETCH_ERROR_TEXT: &str = "Failed to fetch news. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Articles,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Grid,
    List,
}

/// Everything the controller owns. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    view: View,
    layout: Layout,
    category: Category,
    query: String,
    articles: Vec<Article>,
    current_index: usize,
    loading: bool,
    fetch_error: Option<String>,
    /// Class and message of the last failure, shown under the banner.
    fetch_error_detail: Option<String>,
    fetch_generation: u64,
    saved: Vec<SavedArticle>,
    filter: FilterState,
    search_debounce: SearchDebounce,
    /// Indices into `saved`, recomputed when `saved` or `filter` change.
    display: Vec<usize>,
    notifications: NotificationQueue,
    command_history: Vec<String>,
    quit_requested: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let current = self.current_article().map(|article| ArticleView {
            title: article.title.clone(),
            source: article.source.name.clone(),
            description: article.description.clone(),
            published_at: article.published_at,
            url: article.url.clone(),
        });
        let position = current
            .as_ref()
            .map(|_| (self.current_index + 1, self.articles.len()));

        AppViewModel {
            view: self.view,
            layout: self.layout,
            category: self.category,
            query: self.query.clone(),
            loading: self.loading,
            error: self.fetch_error.clone(),
            error_detail: self.fetch_error_detail.clone(),
            current,
            position,
            can_go_previous: self.current_index > 0,
            can_go_next: self.current_index + 1 < self.articles.len(),
            saved_rows: self
                .display_articles()
                .map(|saved| SavedRowView {
                    id: saved.id,
                    title: saved.article.title.clone(),
                    description: saved.article.description.clone(),
                    source: saved.article.source.name.clone(),
                    saved_at: saved.saved_at,
                    tags: saved.tags.iter().cloned().collect(),
                    url: saved.article.url.clone(),
                    image_url: saved.article.image_url.clone(),
                })
                .collect(),
            saved_total: self.saved.len(),
            available_tags: list_tags(&self.saved).into_iter().collect(),
            search_term: self.filter.search_term.clone(),
            search_pending: self.search_debounce.is_pending(),
            selected_tags: self.filter.selected_tags.iter().cloned().collect(),
            sort: self.filter.sort,
            notifications: self
                .notifications
                .iter()
                .map(|entry| NotificationView {
                    id: entry.id,
                    message: entry.message.clone(),
                    kind: entry.kind,
                })
                .collect(),
            command_history: self.command_history.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn fetch_generation(&self) -> u64 {
        self.fetch_generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current_article(&self) -> Option<&Article> {
        self.articles.get(self.current_index)
    }

    pub fn saved(&self) -> &[SavedArticle] {
        &self.saved
    }

    pub fn saved_by_id(&self, id: SavedId) -> Option<&SavedArticle> {
        self.saved.iter().find(|saved| saved.id == id)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The memoized display list, in display order.
    pub fn display_articles(&self) -> impl Iterator<Item = &SavedArticle> {
        self.display.iter().filter_map(|&index| self.saved.get(index))
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn notify(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: Instant,
    ) {
        self.notifications.push(message, kind, now);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_notification(&mut self, id: u64) {
        if self.notifications.dismiss(id) {
            self.mark_dirty();
        }
    }

    pub(crate) fn expire_notifications(&mut self, now: Instant) {
        if self.notifications.expire(now) > 0 {
            self.mark_dirty();
        }
    }

    pub(crate) fn record_command(&mut self, line: &str) {
        self.command_history.push(line.to_string());
        self.mark_dirty();
    }

    pub(crate) fn clear_history(&mut self) {
        self.command_history.clear();
        self.mark_dirty();
    }

    pub(crate) fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_layout(&mut self) {
        self.layout = match self.layout {
            Layout::Grid => Layout::List,
            Layout::List => Layout::Grid,
        };
        self.mark_dirty();
    }

    pub(crate) fn set_category(&mut self, category: Category) {
        self.category = category;
        self.query.clear();
    }

    pub(crate) fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    /// Starts a new fetch generation; older completions become stale.
    pub(crate) fn begin_fetch(&mut self) -> (u64, NewsRequest) {
        self.fetch_generation += 1;
        self.loading = true;
        self.fetch_error = None;
        self.fetch_error_detail = None;
        self.mark_dirty();
        (
            self.fetch_generation,
            NewsRequest::new(&self.query, self.category),
        )
    }

    pub(crate) fn apply_articles(&mut self, articles: Vec<Article>) {
        self.loading = false;
        self.articles = articles;
        self.current_index = 0;
        self.mark_dirty();
    }

    pub(crate) fn fail_fetch(&mut self, failure: &FetchFailure) {
        self.loading = false;
        self.fetch_error = Some(FETCH_ERROR_TEXT.to_string());
        self.fetch_error_detail = Some(format!("{}: {}", failure.class, failure.message));
        self.mark_dirty();
    }

    pub(crate) fn next_article(&mut self) {
        if self.current_index + 1 < self.articles.len() {
            self.current_index += 1;
            self.mark_dirty();
        }
    }

    pub(crate) fn previous_article(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
            self.mark_dirty();
        }
    }

    pub(crate) fn replace_saved(&mut self, saved: Vec<SavedArticle>) {
        self.saved = saved;
        self.refresh_display();
    }

    pub(crate) fn search_input(&mut self, term: &str, now: Instant) {
        self.search_debounce.input(term, now);
        self.mark_dirty();
    }

    pub(crate) fn poll_search(&mut self, now: Instant) {
        if let Some(term) = self.search_debounce.poll(now) {
            self.filter.search_term = term;
            self.refresh_display();
        }
    }

    pub(crate) fn toggle_tag(&mut self, tag: &str) {
        self.filter.toggle_tag(tag);
        self.refresh_display();
    }

    pub(crate) fn set_sort(&mut self, sort: SortKey) {
        self.filter.sort = sort;
        self.refresh_display();
    }

    pub(crate) fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    fn refresh_display(&mut self) {
        self.display = display_indices(&self.saved, &self.filter);
        self.mark_dirty();
    }
}
