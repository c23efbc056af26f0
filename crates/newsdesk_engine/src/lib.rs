//! Newsdesk engine: news fetching, persistence and the saved-article store.
mod engine;
mod export;
mod fetch;
mod persist;
mod storage;
mod store;
mod types;

pub use engine::EngineHandle;
pub use export::{
    decode_saved_articles, encode_export, export_saved_articles, ExportError, EXPORT_FILENAME,
};
pub use fetch::{FetchSettings, GNewsFetcher, NewsFetcher};
pub use persist::{
    ensure_output_dir, file_version, read_versioned, AtomicFileWriter, FileVersion, PersistError,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{
    RemoveOutcome, SaveOutcome, SavedArticleStore, StoreError, TagOutcome, SAVED_ARTICLES_KEY,
};
pub use types::{EngineError, EngineEvent, FailureKind, FetchError};
