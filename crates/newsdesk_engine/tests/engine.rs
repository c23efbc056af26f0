use std::sync::Arc;
use std::time::Duration;

use newsdesk_core::{Article, ArticleSource, Category, NewsRequest};
use newsdesk_engine::{EngineEvent, EngineHandle, FetchError, NewsFetcher};

/// Answers with one article titled after the query, after a delay taken
/// from the query ("slow" waits long, anything else answers at once).
struct ScriptedFetcher;

#[async_trait::async_trait]
impl NewsFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &NewsRequest) -> Result<Vec<Article>, FetchError> {
        let query = request.query.clone().unwrap_or_default();
        if query == "slow" {
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        Ok(vec![Article {
            title: query.clone(),
            description: None,
            url: format!("https://news.example.com/{query}"),
            image_url: None,
            published_at: None,
            source: ArticleSource::default(),
            author: String::new(),
            content: None,
        }])
    }
}

#[test]
fn completion_echoes_generation() {
    let engine = EngineHandle::new(Arc::new(ScriptedFetcher)).unwrap();
    engine.fetch(7, NewsRequest::new("fast", Category::General));

    match engine.recv_timeout(Duration::from_secs(2)) {
        Some(EngineEvent::FetchCompleted { generation, result }) => {
            assert_eq!(generation, 7);
            assert_eq!(result.unwrap()[0].title, "fast");
        }
        None => panic!("no completion"),
    }
}

#[test]
fn superseded_fetch_is_cancelled() {
    let engine = EngineHandle::new(Arc::new(ScriptedFetcher)).unwrap();
    engine.fetch(1, NewsRequest::new("slow", Category::General));
    std::thread::sleep(Duration::from_millis(50));
    engine.fetch(2, NewsRequest::new("fast", Category::General));

    let Some(EngineEvent::FetchCompleted { generation, .. }) =
        engine.recv_timeout(Duration::from_secs(2))
    else {
        panic!("no completion");
    };
    assert_eq!(generation, 2);
    assert!(engine.recv_timeout(Duration::from_millis(700)).is_none());
}
