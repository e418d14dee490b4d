use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory backing the local-disk storage stub.
    pub root: PathBuf,
    /// Base URL clients use to upload and download attachment bytes.
    pub public_base_url: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            public_base_url: env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
        }
    }
}
