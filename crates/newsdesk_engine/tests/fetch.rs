use std::time::Duration;

use newsdesk_core::{Category, FailureClass, NewsRequest};
use newsdesk_engine::{FailureKind, FetchSettings, GNewsFetcher, NewsFetcher};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BODY: &str = r#"{
    "totalArticles": 2,
    "articles": [
        {
            "title": "Chips get faster",
            "description": "New process node",
            "url": "https://news.example.com/chips",
            "image": "https://img.example.com/chips.png",
            "publishedAt": "2024-05-01T12:00:00Z",
            "source": { "name": "Tech Wire", "url": "https://techwire.example.com" },
            "content": "Full text"
        },
        {
            "title": "Quiet day",
            "url": "https://news.example.com/quiet"
        }
    ]
}"#;

fn settings(server: &MockServer) -> FetchSettings {
    FetchSettings {
        api_base_url: format!("{}/api/v4", server.uri()),
        api_key: "test-key".to_string(),
        ..FetchSettings::default()
    }
}

#[tokio::test]
async fn search_uses_search_endpoint_with_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/search"))
        .and(query_param("q", "rust lang"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("lang", "en"))
        .and(query_param("country", "us"))
        .and(query_param("max", "50"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
        .mount(&server)
        .await;

    let fetcher = GNewsFetcher::new(settings(&server));
    let articles = fetcher
        .fetch(&NewsRequest::new("rust lang", Category::Science))
        .await
        .expect("fetch ok");

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "Chips get faster");
    assert_eq!(articles[0].source.name, "Tech Wire");
    assert_eq!(articles[0].author, "Tech Wire");
    assert_eq!(articles[1].description, None);
    assert_eq!(articles[1].source.name, "");
}

#[tokio::test]
async fn general_headlines_omit_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/top-headlines"))
        .and(query_param_is_missing("category"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
        .mount(&server)
        .await;

    let fetcher = GNewsFetcher::new(settings(&server));
    let articles = fetcher
        .fetch(&NewsRequest::new("  ", Category::General))
        .await
        .expect("fetch ok");
    assert_eq!(articles.len(), 2);
}

#[tokio::test]
async fn category_headlines_send_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/top-headlines"))
        .and(query_param("category", "technology"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
        .mount(&server)
        .await;

    let fetcher = GNewsFetcher::new(settings(&server));
    let articles = fetcher
        .fetch(&NewsRequest::new("", Category::Technology))
        .await
        .expect("fetch ok");
    assert_eq!(articles.len(), 2);
}

#[tokio::test]
async fn rejected_request_is_api_error_with_remote_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/top-headlines"))
        .respond_with(ResponseTemplate::new(401).set_body_raw(
            r#"{"errors":["You did not provide an API key."]}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let fetcher = GNewsFetcher::new(settings(&server));
    let err = fetcher
        .fetch(&NewsRequest::new("", Category::General))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
    assert_eq!(err.kind.class(), FailureClass::Api);
    assert_eq!(err.message, "You did not provide an API key.");
}

#[tokio::test]
async fn malformed_payload_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"))
        .mount(&server)
        .await;

    let fetcher = GNewsFetcher::new(settings(&server));
    let err = fetcher
        .fetch(&NewsRequest::new("", Category::General))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedPayload);
    assert_eq!(err.kind.class(), FailureClass::Api);
}

#[tokio::test]
async fn slow_response_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/top-headlines"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(BODY, "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = GNewsFetcher::new(FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..settings(&server)
    });
    let err = fetcher
        .fetch(&NewsRequest::new("", Category::General))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert_eq!(err.kind.class(), FailureClass::Network);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
        .mount(&server)
        .await;

    let fetcher = GNewsFetcher::new(FetchSettings {
        max_bytes: 16,
        ..settings(&server)
    });
    let err = fetcher
        .fetch(&NewsRequest::new("", Category::General))
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 16, .. }
    ));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let fetcher = GNewsFetcher::new(FetchSettings {
        api_base_url: "http://127.0.0.1:9/api/v4".to_string(),
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
        ..FetchSettings::default()
    });
    let err = fetcher
        .fetch(&NewsRequest::new("", Category::General))
        .await
        .unwrap_err();
    assert_eq!(err.kind.class(), FailureClass::Network);
}

#[test]
fn request_url_carries_all_parameters() {
    let fetcher = GNewsFetcher::new(FetchSettings {
        api_key: "k".to_string(),
        ..FetchSettings::default()
    });
    let url = fetcher
        .request_url(&NewsRequest::new("", Category::Health))
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://gnews.io/api/v4/top-headlines?apikey=k&lang=en&country=us&max=50&category=health"
    );
}
