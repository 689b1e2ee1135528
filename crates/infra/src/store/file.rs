//! JSON-file store: one `<key>.json` file per record in a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{ensure_valid_key, KeyValueStore, StorageError};

const APP_DIR: &str = "stockbook";

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        ensure_valid_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn staging_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        ensure_valid_key(key)?;
        Ok(self.dir.join(format!("{key}.json.tmp")))
    }

    /// Write to a temporary sibling; the caller renames it into place.
    fn stage(&self, key: &str, value: &str) -> Result<(PathBuf, PathBuf), StorageError> {
        let staging = self.staging_path(key)?;
        let target = self.record_path(key)?;
        fs::write(&staging, value)?;
        Ok((staging, target))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (staging, target) = self.stage(key, value)?;
        fs::rename(staging, target)?;
        Ok(())
    }

    /// Stage every record before renaming any, so a failed write leaves the
    /// previous snapshot in place.
    fn put_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match self.stage(key, value) {
                Ok(paths) => staged.push(paths),
                Err(err) => {
                    for (staging, _) in &staged {
                        let _ = fs::remove_file(staging);
                    }
                    return Err(err);
                }
            }
        }

        for (staging, target) in staged {
            fs::rename(staging, target)?;
        }
        Ok(())
    }
}

/// Resolve the default data directory: `{app_data_dir}/stockbook`.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    Ok(base.join(APP_DIR))
}
