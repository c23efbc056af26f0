use std::fs;

use chrono::Utc;
use newsdesk_core::{Article, ArticleSource};
use newsdesk_engine::{
    FileStorage, SaveOutcome, SavedArticleStore, Storage, StorageError, SAVED_ARTICLES_KEY,
};
use tempfile::TempDir;

fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        description: None,
        url: "https://news.example.com/a".to_string(),
        image_url: None,
        published_at: None,
        source: ArticleSource::default(),
        author: String::new(),
        content: None,
    }
}

#[test]
fn missing_key_reads_as_none_and_dir_is_created_on_write() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("data");
    let mut storage = FileStorage::new(&dir);

    assert_eq!(storage.get("savedArticles").unwrap(), None);
    storage.set("savedArticles", "[]").unwrap();
    assert_eq!(
        fs::read_to_string(dir.join("savedArticles.json")).unwrap(),
        "[]"
    );
    assert_eq!(storage.get("savedArticles").unwrap().as_deref(), Some("[]"));
}

#[test]
fn keys_cannot_escape_the_directory() {
    let temp = TempDir::new().unwrap();
    let mut storage = FileStorage::new(temp.path());
    assert!(matches!(
        storage.set("../evil", "x"),
        Err(StorageError::InvalidKey(_))
    ));
}

#[test]
fn writes_by_another_handle_are_detected() {
    let temp = TempDir::new().unwrap();
    let mut mine = FileStorage::new(temp.path());
    let mut theirs = FileStorage::new(temp.path());

    mine.set("k", "one").unwrap();
    assert!(!mine.take_external_change("k").unwrap());

    theirs.set("k", "something longer").unwrap();
    assert!(mine.take_external_change("k").unwrap());
    assert!(!mine.take_external_change("k").unwrap());

    fs::remove_file(temp.path().join("k.json")).unwrap();
    assert!(mine.take_external_change("k").unwrap());
}

#[test]
fn write_after_a_read_is_reported_once() {
    let temp = TempDir::new().unwrap();
    let mut mine = FileStorage::new(temp.path());
    let mut theirs = FileStorage::new(temp.path());

    theirs.set("k", "[]").unwrap();
    assert_eq!(mine.get("k").unwrap().as_deref(), Some("[]"));
    assert!(!mine.take_external_change("k").unwrap());

    theirs.set("k", "[1, 2]").unwrap();
    assert!(mine.take_external_change("k").unwrap());
    assert_eq!(mine.get("k").unwrap().as_deref(), Some("[1, 2]"));
    assert!(!mine.take_external_change("k").unwrap());
}

#[test]
fn store_persists_across_reopen() {
    let temp = TempDir::new().unwrap();
    let (mut store, error) = SavedArticleStore::open(FileStorage::new(temp.path()));
    assert!(error.is_none());
    let SaveOutcome::Saved(saved) = store.save(article("Kept"), Utc::now()).unwrap() else {
        panic!("expected save");
    };

    let (reopened, error) = SavedArticleStore::open(FileStorage::new(temp.path()));
    assert!(error.is_none());
    assert_eq!(reopened.articles(), &[saved]);

    let raw = fs::read_to_string(temp.path().join(format!("{SAVED_ARTICLES_KEY}.json"))).unwrap();
    assert!(raw.contains("\"savedAt\""));
}

#[test]
fn non_json_file_is_recovered_without_rewrite() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("savedArticles.json");
    fs::write(&path, "definitely not json").unwrap();

    let (store, error) = SavedArticleStore::open(FileStorage::new(temp.path()));
    assert!(error.is_some());
    assert!(store.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "definitely not json");
}
