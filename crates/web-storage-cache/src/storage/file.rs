//! Durable storage with one file per top-level key

use super::StorageBackend;
use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Storage that persists across sessions in a directory on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory where stored values live
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `dir`
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Ensure the storage directory exists
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        info!(dir = ?self.dir, "File storage initialized");
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for a key, safe for any key text
    pub fn file_name(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(Self::file_name(key))
    }
}

impl StorageBackend for FileStorage {
    fn read_text(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_text(&self, key: &str, text: &str) -> Result<()> {
        let path = self.path(key);
        // Each write gets its own temp file so concurrent writers never share one
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(key = %key, bytes = text.len(), "Wrote file storage");
        Ok(())
    }
}
