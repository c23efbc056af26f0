//! Newsdesk core: domain types, the saved-article pipeline and the pure controller.
mod article;
mod command;
mod debounce;
mod effect;
mod filter;
mod msg;
mod notify;
mod state;
mod update;
mod view_model;

pub use article::{
    list_tags, normalize_tags, Article, ArticleSource, Category, SavedArticle, SavedId,
    UnknownCategory,
};
pub use command::{parse_command, Command, CommandError, HELP_TEXT};
pub use debounce::{SearchDebounce, SEARCH_DEBOUNCE};
pub use effect::{Effect, NewsRequest, ShareRequest};
pub use filter::{
    display_indices, display_list, matches_filter, FilterState, SortKey, UnknownSortKey,
};
pub use msg::{FailureClass, FetchFailure, Msg, ShareResult, StoreReport};
pub use notify::{
    Notification, NotificationId, NotificationKind, NotificationQueue, NOTIFICATION_TTL,
};
pub use state::{AppState, Layout, View, FETCH_ERROR_TEXT};
pub use update::update;
pub use view_model::{AppViewModel, ArticleView, NotificationView, SavedRowView};
