// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of SolCharge.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Key-value storage backends for persisted settings.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default directory for [`FileStore`].
/// Relative so it works both in development and when packaged.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Durable string storage keyed by name
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been written
    async fn get(&self, key: &str) -> io::Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Removing a missing key is not an error
    async fn remove(&self, key: &str) -> io::Result<()>;
}

/// One JSON file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored value at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Atomic write (temp file + rename) so a crash never leaves a torn record
    async fn set(&self, key: &str, value: &str) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, value).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        info!("Saved {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-process map; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_store_missing_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get("app_settings").await.unwrap().is_none());
        // Removing a missing key succeeds
        store.remove("app_settings").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set("app_settings", r#"{"theme":"dark"}"#).await.unwrap();

        let path = store.path_for("app_settings");
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(
            store.get("app_settings").await.unwrap().as_deref(),
            Some(r#"{"theme":"dark"}"#)
        );

        store.remove("app_settings").await.unwrap();
        assert!(!path.exists());
        assert!(store.get("app_settings").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_overwrites() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }
}
