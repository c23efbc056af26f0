use std::fmt;
use std::path::PathBuf;

use crate::{Article, Category, Command, SavedArticle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Initial fetch once the front end is up.
    Started {
        category: Category,
        query: Option<String>,
    },
    /// A line submitted in the command input.
    CommandEntered(String),
    /// A command issued directly by a control, bypassing the history.
    Command(Command),
    /// Completion of the fetch tagged `generation`.
    FetchCompleted {
        generation: u64,
        result: Result<Vec<Article>, FetchFailure>,
    },
    /// The store's canonical list after any load, mutation or reload.
    SavedArticlesChanged(Vec<SavedArticle>),
    /// Outcome of a store operation, surfaced as a notification.
    Store(StoreReport),
    ExportFinished(Result<PathBuf, String>),
    ShareFinished(ShareResult),
    /// Timer tick: drives the search debounce and notification expiry.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Transport-level failure.
    Network,
    /// The remote rejected the request or answered with garbage.
    Api,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureClass::Network => f.write_str("network error"),
            FailureClass::Api => f.write_str("api error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub class: FailureClass,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreReport {
    Saved { id: u64 },
    AlreadySaved,
    SaveFailed(String),
    Removed,
    RemoveNotFound,
    RemoveFailed(String),
    TagsUpdated,
    TagsNotFound,
    TagsFailed(String),
    /// Persisted data could not be parsed; the store started empty.
    LoadRecovered(String),
    /// Another writer changed the persisted list and it was reloaded.
    Reloaded { count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareResult {
    Shared,
    CopiedToClipboard,
    Failed(String),
}
