//! Machine-local tool cache
//!
//! Host-persistent cache of acquired artifacts, one directory per
//! (tool id, version) pair under the cudakit cache root. Entries are
//! trusted as-is: a hit is returned without consulting any other tier.

use anyhow::{anyhow, Context, Result};
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Machine-local tool cache rooted at a fixed directory
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    /// Create a cache over an explicit root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default cache root (`~/.cudakit/tool-cache`)
    ///
    /// Prefers the HOME environment variable over `dirs::home_dir()` so
    /// container setups that remap HOME keep their cache inside the mount.
    pub fn default_root() -> Result<PathBuf> {
        let home = match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home),
            Err(_) => dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?,
        };
        Ok(home.join(".cudakit").join("tool-cache"))
    }

    /// Directory that holds the entry for (tool id, version)
    pub fn entry_dir(&self, tool_id: &str, version: &Version) -> PathBuf {
        self.root.join(tool_id).join(version.to_string())
    }

    /// Look up a cached entry; a non-empty entry directory is a hit
    pub fn find(&self, tool_id: &str, version: &Version) -> Option<PathBuf> {
        let dir = self.entry_dir(tool_id, version);
        let mut entries = fs::read_dir(&dir).ok()?;
        if entries.next().is_some() {
            Some(dir)
        } else {
            None
        }
    }

    /// Register a downloaded file under (tool id, version)
    ///
    /// Copies the file into the entry directory under `file_name` and
    /// returns the entry directory. Uses the same key shape as [`find`]
    /// so a later run short-circuits on the machine tier.
    ///
    /// [`find`]: ToolCache::find
    pub fn store(
        &self,
        source: &Path,
        file_name: &str,
        tool_id: &str,
        version: &Version,
    ) -> Result<PathBuf> {
        let dir = self.entry_dir(tool_id, version);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create tool cache entry {}", dir.display()))?;
        let dest = dir.join(file_name);
        fs::copy(source, &dest).with_context(|| {
            format!(
                "Failed to copy {} into tool cache at {}",
                source.display(),
                dest.display()
            )
        })?;
        debug!("Stored {} in tool cache entry {}", file_name, dir.display());
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn version() -> Version {
        Version::parse("11.2.2").unwrap()
    }

    #[test]
    fn find_misses_on_absent_entry() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path());
        assert!(cache.find("cuda_installer-linux-6.8.0", &version()).is_none());
    }

    #[test]
    fn find_misses_on_empty_entry_directory() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path());
        fs::create_dir_all(cache.entry_dir("cuda_installer-linux-6.8.0", &version())).unwrap();
        assert!(cache.find("cuda_installer-linux-6.8.0", &version()).is_none());
    }

    #[test]
    fn store_then_find_round_trips_on_the_same_key() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().join("cache"));

        let artifact = temp.path().join("cuda_installer.run");
        fs::write(&artifact, b"installer bytes").unwrap();

        let stored = cache
            .store(&artifact, "cuda_installer.run", "cuda_installer-linux-6.8.0", &version())
            .unwrap();
        let found = cache.find("cuda_installer-linux-6.8.0", &version()).unwrap();
        assert_eq!(stored, found);
        assert!(found.join("cuda_installer.run").is_file());
    }

    #[test]
    fn entries_are_namespaced_by_tool_id() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().join("cache"));

        let artifact = temp.path().join("cudnn.tar.xz");
        fs::write(&artifact, b"archive bytes").unwrap();
        cache
            .store(&artifact, "cudnn.tar.xz", "cudnn_archive-linux-6.8.0", &version())
            .unwrap();

        assert!(cache.find("cuda_installer-linux-6.8.0", &version()).is_none());
        assert!(cache.find("cudnn_archive-linux-6.8.0", &version()).is_some());
    }
}
