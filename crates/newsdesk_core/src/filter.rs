use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::SavedArticle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently saved first.
    #[default]
    Date,
    Title,
    Source,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Title => "title",
            SortKey::Source => "source",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "title" => Ok(SortKey::Title),
            "source" => Ok(SortKey::Source),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

/// What the saved list is narrowed and ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_term: String,
    pub selected_tags: BTreeSet<String>,
    pub sort: SortKey,
}

impl FilterState {
    /// Adds the tag to the selection, or removes it if already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
    }
}

/// Search term (title or description, case-insensitive) AND any selected tag.
pub fn matches_filter(article: &SavedArticle, filter: &FilterState) -> bool {
    matches_search(article, &filter.search_term) && matches_tags(article, &filter.selected_tags)
}

fn matches_search(article: &SavedArticle, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    article.title().to_lowercase().contains(&needle)
        || article
            .article
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(&needle))
}

fn matches_tags(article: &SavedArticle, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || article.tags.iter().any(|tag| selected.contains(tag))
}

/// Derives the displayed subsequence of `saved`.
///
/// Sorting is stable, so equal keys keep store insertion order.
pub fn display_list<'a>(saved: &'a [SavedArticle], filter: &FilterState) -> Vec<&'a SavedArticle> {
    display_indices(saved, filter)
        .into_iter()
        .map(|index| &saved[index])
        .collect()
}

/// Same as [`display_list`], as positions into `saved`.
pub fn display_indices(saved: &[SavedArticle], filter: &FilterState) -> Vec<usize> {
    let mut shown: Vec<usize> = saved
        .iter()
        .enumerate()
        .filter(|(_, article)| matches_filter(article, filter))
        .map(|(index, _)| index)
        .collect();

    match filter.sort {
        SortKey::Date => shown.sort_by(|&a, &b| saved[b].saved_at.cmp(&saved[a].saved_at)),
        SortKey::Title => shown.sort_by(|&a, &b| compare_text(saved[a].title(), saved[b].title())),
        SortKey::Source => shown.sort_by(|&a, &b| {
            compare_text(saved[a].source_name(), saved[b].source_name())
        }),
    }
    shown
}

// Case-folded first so "apple" sorts next to "Apple", then by exact text.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
