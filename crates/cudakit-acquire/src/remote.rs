//! Shared remote cache tier
//!
//! Cross-run cache external to the host, keyed by the deterministic
//! [`CacheKey`] string. The trait keeps the tier swappable; the shipped
//! implementation is a shared directory (typically a CI-mounted volume).
//! Two independent runs may race on the same key, so an already-existing
//! entry on save is success, not an error.
//!
//! [`CacheKey`]: cudakit_core::types::CacheKey

use anyhow::{Context, Result};
use async_trait::async_trait;
use cudakit_core::types::CacheKey;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of writing an entry to the remote cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Entry written by this run
    Saved,
    /// Another run already wrote this key; treated as success
    AlreadyExists,
}

/// A shared cache tier keyed by cache-key strings
#[async_trait]
pub trait RemoteCache: Send + Sync {
    /// Materialize the entry for `key` into `dest`
    ///
    /// Returns `true` on a hit (with `dest` populated), `false` on a miss.
    async fn restore(&self, key: &CacheKey, dest: &Path) -> Result<bool>;

    /// Write the contents of `source` under `key`
    async fn save(&self, key: &CacheKey, source: &Path) -> Result<SaveOutcome>;
}

/// Remote cache backed by a shared directory
#[derive(Debug, Clone)]
pub struct DirRemoteCache {
    root: PathBuf,
}

impl DirRemoteCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

#[async_trait]
impl RemoteCache for DirRemoteCache {
    async fn restore(&self, key: &CacheKey, dest: &Path) -> Result<bool> {
        let entry = self.entry_dir(key);
        if !entry.is_dir() {
            return Ok(false);
        }
        copy_dir_files(&entry, dest).with_context(|| {
            format!("Failed to restore remote cache entry {key} into {}", dest.display())
        })?;
        debug!("Restored remote cache entry {} into {}", key, dest.display());
        Ok(true)
    }

    async fn save(&self, key: &CacheKey, source: &Path) -> Result<SaveOutcome> {
        let entry = self.entry_dir(key);
        if entry.exists() {
            debug!("Remote cache entry {} already exists", key);
            return Ok(SaveOutcome::AlreadyExists);
        }
        copy_dir_files(source, &entry)
            .with_context(|| format!("Failed to save remote cache entry {key}"))?;
        debug!("Saved remote cache entry {}", key);
        Ok(SaveOutcome::Saved)
    }
}

/// Copy the plain files directly under `from` into `to`
///
/// Cache entries hold exactly one artifact file, so no recursion is needed.
fn copy_dir_files(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::copy(entry.path(), to.join(entry.file_name()))?;
        }
    }
    Ok(())
}
