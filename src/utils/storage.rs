//! File storage seam for attachment uploads.
//!
//! The API never proxies file bytes; it hands callers a URL to upload to or
//! download from. Backends implement [`FileStorage`] so an object store can
//! replace the local-disk stub without touching the attachment module.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

/// Error type for file storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Storage key contains path separators or other disallowed characters.
    InvalidKey(String),

    /// I/O error from the backing store.
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "Invalid storage key: {}", key),
            Self::Io(e) => write!(f, "Storage I/O error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

#[async_trait]
pub trait FileStorage: Send + Sync + fmt::Debug {
    /// URL a client may PUT the file bytes to.
    fn upload_url(&self, key: &str) -> Result<String, StorageError>;

    /// URL a client may GET the file bytes from.
    fn download_url(&self, key: &str) -> Result<String, StorageError>;

    /// Remove the stored object. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Local-disk stand-in for an object store. URLs point at a static file
/// route served from `root`.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalFileStorage {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn validate_key(key: &str) -> Result<(), StorageError> {
        let ok = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if ok && !key.starts_with('.') {
            Ok(())
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    fn upload_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    fn download_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        Self::validate_key(key)?;
        match fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
