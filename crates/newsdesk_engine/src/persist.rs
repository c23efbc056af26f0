use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use newsdesk_logging::desk_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{0:?} exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error("data directory {dir:?} is not usable: {source}")]
    Unwritable { dir: PathBuf, source: io::Error },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Length and modification time of a file, as seen by one reader.
///
/// Two reads with equal versions are assumed to have seen the same content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileVersion {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileVersion {
    fn of(meta: &fs::Metadata) -> Self {
        Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        }
    }
}

/// Creates `dir` if needed and checks that files can be created in it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => return Err(PersistError::NotADirectory(dir.to_path_buf())),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| unwritable(dir, source))?;
            desk_debug!("Created data directory {:?}", dir);
        }
        Err(source) => return Err(unwritable(dir, source)),
    }
    NamedTempFile::new_in(dir).map_err(|source| unwritable(dir, source))?;
    Ok(())
}

/// Current version of `path`, or `None` when it does not exist.
pub fn file_version(path: &Path) -> Result<Option<FileVersion>, PersistError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(FileVersion::of(&meta))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Reads `path` together with the version of exactly what was read.
///
/// Content and version come from one open handle. Writers replace the file by
/// rename, so a concurrent write shows up as a newer version on the next
/// [`file_version`] call instead of being hidden.
pub fn read_versioned(path: &Path) -> Result<Option<(String, FileVersion)>, PersistError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let version = FileVersion::of(&file.metadata()?);
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(Some((text, version)))
}

/// Replaces `{dir}/{filename}` through a temp file and a rename, so readers
/// see either the old or the new content. A replaced file keeps its
/// permissions.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the file and returns its path and the version just written.
    pub fn write(
        &self,
        filename: &str,
        content: &str,
    ) -> Result<(PathBuf, FileVersion), PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        if let Ok(existing) = fs::metadata(&target) {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
        tmp.as_file_mut().sync_all()?;
        let version = FileVersion::of(&tmp.as_file().metadata()?);

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok((target, version))
    }
}

fn unwritable(dir: &Path, source: io::Error) -> PersistError {
    PersistError::Unwritable {
        dir: dir.to_path_buf(),
        source,
    }
}
