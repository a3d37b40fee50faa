//! Where the editor keeps its data.

use std::path::PathBuf;

use crate::kv::{FileStore, STORAGE_KEY};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "ORGTREE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the persisted forest
    pub data_dir: PathBuf,
    /// Storage key of the persisted forest
    pub storage_key: String,
}

impl Config {
    /// Resolve from an explicit directory, then `ORGTREE_DATA_DIR`, then the platform default
    pub fn resolve(data_dir: Option<PathBuf>) -> Self {
        Self::resolve_with(data_dir, std::env::var(DATA_DIR_ENV).ok())
    }

    fn resolve_with(data_dir: Option<PathBuf>, env_dir: Option<String>) -> Self {
        let env_dir = env_dir
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        Self {
            data_dir: data_dir.or(env_dir).unwrap_or_else(default_data_dir),
            storage_key: STORAGE_KEY.to_string(),
        }
    }

    pub fn open_store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }
}

/// `$XDG_DATA_HOME/orgtree` (or the platform equivalent), else `./.orgtree`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("orgtree"))
        .unwrap_or_else(|| PathBuf::from(".orgtree"))
}
