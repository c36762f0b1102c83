use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::backend::{Result, StorageError, StoreBackend};

/// Backend keeping one JSON file per key under a directory.
///
/// Directory layout:
/// ```text
/// {base}/
/// ├── notes-list.json
/// ├── current-note-id.json
/// └── flashcards-{note-id}.json
/// ```
pub struct FileBackend {
    base_path: PathBuf,
}

impl FileBackend {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("marginalia"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Create the store directory if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl StoreBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.init()?;

        // Write to a sibling file first so a crash never leaves half a value
        let path = self.key_path(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
