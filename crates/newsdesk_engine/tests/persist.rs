use std::fs;

use newsdesk_engine::{
    ensure_output_dir, file_version, read_versioned, AtomicFileWriter, PersistError,
};
use tempfile::TempDir;

#[test]
fn missing_data_dir_is_created() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("newsdesk-data").join("nested");
    ensure_output_dir(&data_dir).unwrap();
    assert!(data_dir.is_dir());
}

#[test]
fn a_file_in_place_of_the_data_dir_is_reported() {
    let temp = TempDir::new().unwrap();
    let occupied = temp.path().join("newsdesk-data");
    fs::write(&occupied, "x").unwrap();

    assert!(matches!(
        ensure_output_dir(&occupied),
        Err(PersistError::NotADirectory(path)) if path == occupied
    ));

    let writer = AtomicFileWriter::new(occupied.clone());
    assert!(writer.write("savedArticles.json", "[]").is_err());
    assert_eq!(fs::read_to_string(&occupied).unwrap(), "x");
}

#[test]
fn write_reports_the_version_a_reader_will_see() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let (path, written) = writer.write("savedArticles.json", "[]").unwrap();
    assert_eq!(path, temp.path().join("savedArticles.json"));
    assert_eq!(file_version(&path).unwrap(), Some(written));

    let (text, read) = read_versioned(&path).unwrap().unwrap();
    assert_eq!(text, "[]");
    assert_eq!(read, written);

    let (_, rewritten) = writer.write("savedArticles.json", "[{}]").unwrap();
    assert_ne!(rewritten, read);
    assert_eq!(read_versioned(&path).unwrap().unwrap().0, "[{}]");
}

#[test]
fn absent_file_has_no_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("savedArticles.json");
    assert_eq!(file_version(&path).unwrap(), None);
    assert!(read_versioned(&path).unwrap().is_none());
}

#[cfg(unix)]
#[test]
fn rewrite_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let (path, _) = writer.write("savedArticles.json", "[]").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    writer.write("savedArticles.json", "[1]").unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}
