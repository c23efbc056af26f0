use crate::{Article, Category, SavedId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch a batch; the completion must echo `generation`.
    FetchNews { generation: u64, request: NewsRequest },
    SaveArticle(Article),
    RemoveSaved(SavedId),
    UpdateTags { id: SavedId, tags: Vec<String> },
    ExportSaved,
    Share(ShareRequest),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewsRequest {
    /// Non-empty means a search; otherwise headlines for `category`.
    pub query: Option<String>,
    pub category: Category,
}

impl NewsRequest {
    /// Blank queries collapse to a headline request for `category`.
    pub fn new(query: &str, category: Category) -> Self {
        let query = query.trim();
        Self {
            query: (!query.is_empty()).then(|| query.to_string()),
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
}

impl From<&Article> for ShareRequest {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            url: article.url.clone(),
        }
    }
}
