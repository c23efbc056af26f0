use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a saved article, unique within the store.
pub type SavedId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub name: String,
}

/// A fetched article. Immutable once built; replaced by the next fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default, rename = "urlToImage")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// An article the user kept. Serialized in the same camelCase shape as the
/// browser client stored it, so existing exports load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub id: SavedId,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl SavedArticle {
    pub fn new(article: Article, id: SavedId, saved_at: DateTime<Utc>) -> Self {
        Self {
            article,
            id,
            saved_at,
            tags: BTreeSet::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.article.title
    }

    pub fn source_name(&self) -> &str {
        &self.article.source.name
    }
}

/// Union of the tags of every article, deduplicated and sorted.
pub fn list_tags(articles: &[SavedArticle]) -> BTreeSet<String> {
    articles
        .iter()
        .flat_map(|article| article.tags.iter().cloned())
        .collect()
}

/// Trims labels and drops the empty ones.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    General,
    Business,
    Technology,
    Entertainment,
    Health,
    Science,
    Sports,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Technology,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_string()))
    }
}
