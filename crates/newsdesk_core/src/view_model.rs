use chrono::{DateTime, Utc};

use crate::{Category, Layout, NotificationId, NotificationKind, SavedId, SortKey, View};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub view: View,
    pub layout: Layout,
    pub category: Category,
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub error_detail: Option<String>,
    pub current: Option<ArticleView>,
    /// 1-based position of the current article and the batch size.
    pub position: Option<(usize, usize)>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub saved_rows: Vec<SavedRowView>,
    pub saved_total: usize,
    pub available_tags: Vec<String>,
    pub search_term: String,
    pub search_pending: bool,
    pub selected_tags: Vec<String>,
    pub sort: SortKey,
    pub notifications: Vec<NotificationView>,
    pub command_history: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub title: String,
    pub source: String,
    pub description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRowView {
    pub id: SavedId,
    pub title: String,
    pub description: Option<String>,
    pub source: String,
    pub saved_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub url: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
}
