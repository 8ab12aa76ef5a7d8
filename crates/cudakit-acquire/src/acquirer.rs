//! Tiered acquisition pipeline
//!
//! Resolves a logical artifact to a local file path through three tiers in
//! strict order: machine tool cache, shared remote cache, origin download.
//! Each tier is consulted only when the previous one found nothing, and an
//! origin download is promoted into both caches for later runs.

use crate::download::Downloader;
use crate::remote::{RemoteCache, SaveOutcome};
use crate::tool_cache::ToolCache;
use crate::verify::verify_artifact_dir;
use anyhow::{anyhow, Context, Result};
use cudakit_core::strategy::strategy_for;
use cudakit_core::types::{
    AcquisitionResult, ArtifactKind, CacheKey, Method, ResolvedToolkit, Tier,
};
use cudakit_core::{platform, Error, PlatformProfile};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Permission mode applied to the primary installer after acquisition
const INSTALLER_MODE: u32 = 0o755;

/// Tiered artifact acquisition for one provisioning run
pub struct Acquirer {
    platform: PlatformProfile,
    os_release: String,
    method: Method,
    tool_cache: ToolCache,
    remote: Option<Box<dyn RemoteCache>>,
    downloader: Downloader,
    work_dir: PathBuf,
}

impl Acquirer {
    /// Create an acquirer
    ///
    /// `remote` is `None` when the shared remote cache is disabled;
    /// `work_dir` receives download files and materialized remote entries.
    pub fn new(
        platform: PlatformProfile,
        method: Method,
        tool_cache: ToolCache,
        remote: Option<Box<dyn RemoteCache>>,
        work_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            platform,
            os_release: platform::os_release(),
            method,
            tool_cache,
            remote,
            downloader: Downloader::new()?,
            work_dir: work_dir.into(),
        })
    }

    /// Override the host release identifier used in cache keys
    pub fn with_os_release(mut self, os_release: impl Into<String>) -> Self {
        self.os_release = os_release.into();
        self
    }

    /// Disable download progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.downloader = self.downloader.with_progress(show);
        self
    }

    /// Acquire and verify everything the resolved toolkit needs
    ///
    /// Returns the installer file path and, when a companion was
    /// requested, the archive file path. The installer is marked
    /// executable on Linux; the archive never is.
    pub async fn acquire_all(
        &self,
        toolkit: &mut ResolvedToolkit,
    ) -> Result<(PathBuf, Option<PathBuf>)> {
        let cuda = self.acquire(toolkit, ArtifactKind::Cuda).await?;
        let cudnn = if toolkit.has_cudnn() {
            Some(self.acquire(toolkit, ArtifactKind::Cudnn).await?)
        } else {
            None
        };

        let installer = verify_artifact_dir(&cuda.path, self.platform, Some(INSTALLER_MODE))?;
        let archive = match cudnn {
            Some(acquisition) => {
                Some(verify_artifact_dir(&acquisition.path, self.platform, None)?)
            }
            None => None,
        };
        Ok((installer, archive))
    }

    /// Acquire one artifact through the cache tiers
    pub async fn acquire(
        &self,
        toolkit: &mut ResolvedToolkit,
        kind: ArtifactKind,
    ) -> Result<AcquisitionResult> {
        let version = kind
            .version(toolkit)
            .cloned()
            .ok_or_else(|| anyhow!("{kind} artifact requested without a resolved version"))?;
        let tool_id = kind.tool_id(self.platform, &self.os_release);

        // Tier 1: machine tool cache, trusted as-is
        if let Some(dir) = self.tool_cache.find(&tool_id, &version) {
            debug!("Found {} in machine tool cache: {}", kind, dir.display());
            return Ok(AcquisitionResult {
                path: dir,
                tier: Tier::MachineCache,
            });
        }

        let key = CacheKey::new(kind, self.platform, &self.os_release, &version);

        // Tier 2: shared remote cache, when enabled
        if let Some(remote) = &self.remote {
            debug!("Trying to restore {} [key={}] from the remote cache", kind, key);
            let dest = self.work_dir.join(key.as_str());
            if remote.restore(&key, &dest).await? {
                debug!("Found {} in remote cache: {}", kind, dest.display());
                return Ok(AcquisitionResult {
                    path: dest,
                    tier: Tier::RemoteCache,
                });
            }
        }

        // Tier 3: origin download with write-through promotion
        debug!("{} not found in machine/remote cache, downloading...", kind);
        let url = self.source_url(toolkit, kind)?;

        let extension = strategy_for(self.platform).file_extension(kind);
        let file_name = format!("{tool_id}_{version}.{extension}");
        let download_path = self.work_dir.join(&file_name);
        self.downloader.fetch(&url, &download_path).await?;

        // Stage the download under the cache key for the remote tier
        let key_dir = self.work_dir.join(key.as_str());
        fs::create_dir_all(&key_dir)
            .with_context(|| format!("Failed to create cache staging dir {}", key_dir.display()))?;
        fs::copy(&download_path, key_dir.join(&file_name))
            .with_context(|| format!("Failed to copy {file_name} into {}", key_dir.display()))?;

        let cached = self
            .tool_cache
            .store(&download_path, &file_name, &tool_id, &version)?;
        debug!("Cached {} download at {}", kind, cached.display());

        if let Some(remote) = &self.remote {
            match remote.save(&key, &key_dir).await? {
                SaveOutcome::Saved => debug!("Saved {} to remote cache [key={}]", kind, key),
                SaveOutcome::AlreadyExists => {
                    debug!("Remote cache entry {} already exists, continuing", key)
                }
            }
        }

        Ok(AcquisitionResult {
            path: cached,
            tier: Tier::Origin,
        })
    }

    /// Resolve the artifact's source URL, filling the toolkit lazily
    ///
    /// The primary URL is derived from the link catalog only here, once a
    /// download is actually required. The companion URL must already be on
    /// the toolkit; its absence at this point is `EmptyDownloadUrl`.
    fn source_url(&self, toolkit: &mut ResolvedToolkit, kind: ArtifactKind) -> Result<url::Url> {
        match kind {
            ArtifactKind::Cuda => {
                if toolkit.cuda_url.is_none() {
                    toolkit.cuda_url = Some(cudakit_links::download_url(
                        &toolkit.cuda_version,
                        self.method,
                        self.platform,
                    )?);
                }
                toolkit
                    .cuda_url
                    .clone()
                    .ok_or_else(|| Error::empty_download_url("cuda").into())
            }
            ArtifactKind::Cudnn => toolkit
                .cudnn_url
                .clone()
                .ok_or_else(|| Error::empty_download_url("cudnn").into()),
        }
    }
}
