use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use newsdesk_core::{Article, ArticleSource, Category, NewsRequest};
use newsdesk_logging::{desk_debug, desk_info};
use serde::Deserialize;
use url::Url;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub api_base_url: String,
    pub api_key: String,
    pub lang: String,
    pub country: String,
    pub max_articles: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://gnews.io/api/v4".to_string(),
            api_key: String::new(),
            lang: "en".to_string(),
            country: "us".to_string(),
            max_articles: 50,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait NewsFetcher: Send + Sync {
    async fn fetch(&self, request: &NewsRequest) -> Result<Vec<Article>, FetchError>;
}

/// Client for GNews-style `search` / `top-headlines` endpoints.
#[derive(Debug, Clone)]
pub struct GNewsFetcher {
    settings: FetchSettings,
}

impl GNewsFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    /// Builds the request URL: a search when the request has a query,
    /// otherwise headlines, where "general" means no category filter.
    pub fn request_url(&self, request: &NewsRequest) -> Result<Url, FetchError> {
        let endpoint = if request.query.is_some() {
            "search"
        } else {
            "top-headlines"
        };
        let base = self.settings.api_base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{endpoint}"))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("apikey", &self.settings.api_key)
                .append_pair("lang", &self.settings.lang)
                .append_pair("country", &self.settings.country)
                .append_pair("max", &self.settings.max_articles.to_string());
            match (&request.query, request.category) {
                (Some(query), _) => {
                    pairs.append_pair("q", query);
                }
                (None, Category::General) => {}
                (None, category) => {
                    pairs.append_pair("category", category.as_str());
                }
            }
        }
        Ok(url)
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl NewsFetcher for GNewsFetcher {
    async fn fetch(&self, request: &NewsRequest) -> Result<Vec<Article>, FetchError> {
        let url = self.request_url(request)?;
        let client = self.build_client()?;
        desk_debug!("GET {} {}", url.path(), request.category);

        let response = client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = self.read_body(response).await?;

        if !status.is_success() {
            let message = remote_error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let articles = parse_articles(&body)?;
        desk_info!("Fetched {} articles", articles.len());
        Ok(articles)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    articles: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    source: Option<RawSource>,
    author: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    name: Option<String>,
}

/// Maps an API body into articles. Entries without a title or url, or with
/// fields of the wrong type, are skipped rather than failing the batch.
fn parse_articles(body: &[u8]) -> Result<Vec<Article>, FetchError> {
    let response: ApiResponse = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::MalformedPayload, err.to_string()))?;

    let Some(raw_articles) = response.articles else {
        return Err(match response.errors {
            Some(errors) => FetchError::new(FailureKind::Api, describe_errors(&errors)),
            None => FetchError::new(FailureKind::MalformedPayload, "missing articles array"),
        });
    };

    let total = raw_articles.len();
    let articles: Vec<Article> = raw_articles
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawArticle>(value).ok())
        .filter_map(normalize)
        .collect();
    if articles.len() < total {
        desk_debug!("Skipped {} unusable articles", total - articles.len());
    }
    Ok(articles)
}

fn normalize(raw: RawArticle) -> Option<Article> {
    let title = raw.title.filter(|title| !title.trim().is_empty())?;
    let url = raw.url.filter(|url| !url.trim().is_empty())?;
    let source_name = raw.source.and_then(|source| source.name).unwrap_or_default();

    Some(Article {
        title,
        description: raw.description,
        url,
        image_url: raw.image.or(raw.url_to_image),
        published_at: raw.published_at.as_deref().and_then(parse_timestamp),
        author: raw.author.unwrap_or_else(|| source_name.clone()),
        source: ArticleSource { name: source_name },
        content: raw.content,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

fn remote_error_message(body: &[u8]) -> Option<String> {
    let response: ApiResponse = serde_json::from_slice(body).ok()?;
    response.errors.as_ref().map(describe_errors)
}

fn describe_errors(errors: &serde_json::Value) -> String {
    match errors {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        serde_json::Value::Object(map) => map
            .values()
            .map(|value| match value {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
