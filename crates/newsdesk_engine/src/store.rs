use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use newsdesk_core::{list_tags, normalize_tags, Article, SavedArticle, SavedId};
use newsdesk_logging::{desk_info, desk_warn};

use crate::export::{decode_saved_articles, encode_saved_articles};
use crate::storage::{Storage, StorageError};

/// Storage key holding the JSON array of saved articles.
pub const SAVED_ARTICLES_KEY: &str = "savedArticles";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("saved articles could not be parsed: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("saved articles could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SavedArticle),
    /// An article with the same title is already stored.
    AlreadySaved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(SavedArticle),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Updated,
    NotFound,
}

/// In-memory mirror of the persisted saved-article list.
///
/// Every mutation is written to storage before it becomes visible in memory;
/// a failed write leaves the mirror untouched.
#[derive(Debug)]
pub struct SavedArticleStore<S: Storage> {
    storage: S,
    articles: Vec<SavedArticle>,
}

impl<S: Storage> SavedArticleStore<S> {
    /// Opens the store and loads it. A load failure still yields a usable,
    /// empty store along with the error to report.
    pub fn open(storage: S) -> (Self, Option<StoreError>) {
        let mut store = Self {
            storage,
            articles: Vec::new(),
        };
        let error = store.load().err();
        (store, error)
    }

    /// Replaces the in-memory list with what storage holds.
    ///
    /// Corrupted data leaves the store empty; the stored text is not touched.
    pub fn load(&mut self) -> Result<&[SavedArticle], StoreError> {
        match self.read_persisted() {
            Ok(articles) => {
                desk_info!("Loaded {} saved articles", articles.len());
                self.articles = articles;
                Ok(&self.articles)
            }
            Err(err) => {
                desk_warn!("Falling back to an empty saved list: {}", err);
                self.articles.clear();
                Err(err)
            }
        }
    }

    pub fn articles(&self) -> &[SavedArticle] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Appends `article` unless one with the same title is already stored.
    pub fn save(&mut self, article: Article, now: DateTime<Utc>) -> Result<SaveOutcome, StoreError> {
        if self
            .articles
            .iter()
            .any(|saved| saved.article.title == article.title)
        {
            return Ok(SaveOutcome::AlreadySaved);
        }

        let saved = SavedArticle::new(article, self.next_id(now), now);
        let mut next = self.articles.clone();
        next.push(saved.clone());
        self.commit(next)?;
        desk_info!("Saved article id={} title={:?}", saved.id, saved.title());
        Ok(SaveOutcome::Saved(saved))
    }

    pub fn remove(&mut self, id: SavedId) -> Result<RemoveOutcome, StoreError> {
        let Some(position) = self.articles.iter().position(|saved| saved.id == id) else {
            return Ok(RemoveOutcome::NotFound);
        };
        let mut next = self.articles.clone();
        let removed = next.remove(position);
        self.commit(next)?;
        desk_info!("Removed saved article id={}", id);
        Ok(RemoveOutcome::Removed(removed))
    }

    pub fn set_tags<I, T>(&mut self, id: SavedId, tags: I) -> Result<TagOutcome, StoreError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let Some(position) = self.articles.iter().position(|saved| saved.id == id) else {
            return Ok(TagOutcome::NotFound);
        };
        let mut next = self.articles.clone();
        next[position].tags = normalize_tags(tags);
        self.commit(next)?;
        Ok(TagOutcome::Updated)
    }

    pub fn list_tags(&self) -> BTreeSet<String> {
        list_tags(&self.articles)
    }

    /// Reloads wholesale if another writer changed the stored list.
    /// Returns whether a reload happened.
    pub fn sync_external(&mut self) -> Result<bool, StoreError> {
        if !self.storage.take_external_change(SAVED_ARTICLES_KEY)? {
            return Ok(false);
        }
        desk_info!("Saved articles changed externally; reloading");
        self.load()?;
        Ok(true)
    }

    fn read_persisted(&mut self) -> Result<Vec<SavedArticle>, StoreError> {
        match self.storage.get(SAVED_ARTICLES_KEY)? {
            Some(text) if !text.trim().is_empty() => {
                decode_saved_articles(&text).map_err(StoreError::Parse)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn commit(&mut self, next: Vec<SavedArticle>) -> Result<(), StoreError> {
        let encoded = encode_saved_articles(&next).map_err(StoreError::Encode)?;
        self.storage.set(SAVED_ARTICLES_KEY, &encoded)?;
        self.articles = next;
        Ok(())
    }

    // Millisecond timestamp, bumped past the largest id in use. Stored ids
    // are untrusted; once the top of the range is taken, reuse the lowest gap.
    fn next_id(&self, now: DateTime<Utc>) -> SavedId {
        let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        match self.articles.iter().map(|saved| saved.id).max() {
            Some(max) if max >= stamp => max
                .checked_add(1)
                .unwrap_or_else(|| self.lowest_free_id()),
            _ => stamp,
        }
    }

    fn lowest_free_id(&self) -> SavedId {
        let taken: BTreeSet<SavedId> = self.articles.iter().map(|saved| saved.id).collect();
        (0..=SavedId::MAX)
            .find(|id| !taken.contains(id))
            .unwrap_or(SavedId::MAX)
    }
}
