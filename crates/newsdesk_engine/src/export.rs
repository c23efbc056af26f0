use std::path::{Path, PathBuf};

use newsdesk_core::SavedArticle;

use crate::persist::{AtomicFileWriter, PersistError};

/// File name of the on-demand export.
pub const EXPORT_FILENAME: &str = "saved-articles.json";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not encode saved articles: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Compact form kept in storage.
pub(crate) fn encode_saved_articles(articles: &[SavedArticle]) -> serde_json::Result<String> {
    serde_json::to_string(articles)
}

/// Pretty-printed form handed to the user.
pub fn encode_export(articles: &[SavedArticle]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(articles)?)
}

/// Parses either the stored or the exported form.
pub fn decode_saved_articles(text: &str) -> serde_json::Result<Vec<SavedArticle>> {
    serde_json::from_str(text)
}

/// Writes `{dir}/saved-articles.json` and returns its path.
pub fn export_saved_articles(dir: &Path, articles: &[SavedArticle]) -> Result<PathBuf, ExportError> {
    let content = encode_export(articles)?;
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let (path, _) = writer.write(EXPORT_FILENAME, &content)?;
    Ok(path)
}
