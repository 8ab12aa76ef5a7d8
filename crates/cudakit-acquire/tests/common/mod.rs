//! Shared helpers for acquisition tests

use async_trait::async_trait;
use cudakit_acquire::{DirRemoteCache, RemoteCache, SaveOutcome};
use cudakit_core::types::{CacheKey, ResolvedToolkit};
use semver::Version;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// Host release identifier pinned for deterministic cache keys
pub const TEST_RELEASE: &str = "test-host";

/// A resolved toolkit with a companion archive pointing at `cudnn_url`
pub fn toolkit_with_cudnn(cudnn_url: &str) -> ResolvedToolkit {
    ResolvedToolkit {
        cuda_version: Version::parse("11.2.2").unwrap(),
        cuda_url: None,
        cudnn_version: Some(Version::parse("8.7.0").unwrap()),
        cudnn_url: Some(Url::parse(cudnn_url).unwrap()),
    }
}

/// A URL that refuses connections; reaching it fails the test loudly
pub fn unreachable_url() -> String {
    "http://127.0.0.1:9/cudnn.tar.xz".to_string()
}

/// Remote cache wrapper counting tier accesses
pub struct CountingRemoteCache {
    inner: DirRemoteCache,
    restores: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
}

impl CountingRemoteCache {
    pub fn new(root: &Path) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let restores = Arc::new(AtomicUsize::new(0));
        let saves = Arc::new(AtomicUsize::new(0));
        let cache = Self {
            inner: DirRemoteCache::new(root),
            restores: restores.clone(),
            saves: saves.clone(),
        };
        (cache, restores, saves)
    }
}

#[async_trait]
impl RemoteCache for CountingRemoteCache {
    async fn restore(&self, key: &CacheKey, dest: &Path) -> anyhow::Result<bool> {
        self.restores.fetch_add(1, Ordering::SeqCst);
        self.inner.restore(key, dest).await
    }

    async fn save(&self, key: &CacheKey, source: &Path) -> anyhow::Result<SaveOutcome> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(key, source).await
    }
}
