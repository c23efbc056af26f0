use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use newsdesk_core::{Article, ArticleSource, SavedArticle};
use newsdesk_engine::{
    decode_saved_articles, encode_export, export_saved_articles, EXPORT_FILENAME,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sample() -> Vec<SavedArticle> {
    let mut first = SavedArticle::new(
        Article {
            title: "Markets \"rally\"".to_string(),
            description: Some("Stocks up".to_string()),
            url: "https://news.example.com/markets".to_string(),
            image_url: Some("https://img.example.com/m.png".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 6, 30, 0).unwrap()),
            source: ArticleSource {
                name: "Wire".to_string(),
            },
            author: "Wire".to_string(),
            content: Some("Ünïcödé body".to_string()),
        },
        1_706_770_000_000,
        Utc.with_ymd_and_hms(2024, 2, 1, 7, 0, 0).unwrap(),
    );
    first.tags = BTreeSet::from(["finance".to_string(), "daily".to_string()]);
    let second = SavedArticle::new(
        Article {
            title: "Bare".to_string(),
            description: None,
            url: "https://news.example.com/bare".to_string(),
            image_url: None,
            published_at: None,
            source: ArticleSource::default(),
            author: String::new(),
            content: None,
        },
        1_706_770_000_001,
        Utc.with_ymd_and_hms(2024, 2, 1, 7, 0, 0).unwrap(),
    );
    vec![first, second]
}

#[test]
fn export_writes_pretty_json_that_parses_back() {
    let temp = TempDir::new().unwrap();
    let articles = sample();

    let path = export_saved_articles(temp.path(), &articles).unwrap();
    assert_eq!(path.file_name().unwrap(), EXPORT_FILENAME);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n  {"));
    assert_eq!(text, encode_export(&articles).unwrap());
    assert_eq!(decode_saved_articles(&text).unwrap(), articles);
}

#[test]
fn empty_list_exports_as_empty_array() {
    let temp = TempDir::new().unwrap();
    let path = export_saved_articles(&temp.path().join("nested"), &[]).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
}
