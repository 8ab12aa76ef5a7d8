//! Data model for the provisioning pipeline

use crate::error::Error;
use crate::platform::PlatformProfile;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Acquisition method selecting between artifact sources
///
/// `local` acquires the offline/redistributable installer; `network` the
/// online installer where the platform supports one (Windows), and the apt
/// repository path on Linux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Local,
    Network,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Method::Local),
            "network" => Ok(Method::Network),
            other => Err(Error::invalid_method(other)),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Local => write!(f, "local"),
            Method::Network => write!(f, "network"),
        }
    }
}

/// Immutable input describing one provisioning run
///
/// Built once from the input layer and never mutated afterwards. The cudnn
/// strings may be empty; emptiness is what decides whether the companion
/// library is provisioned at all.
#[derive(Debug, Clone)]
pub struct ToolkitRequest {
    /// Requested CUDA toolkit version string
    pub cuda: String,
    /// Requested cuDNN version string (may be empty)
    pub cudnn: String,
    /// cuDNN archive source URL string (may be empty)
    pub cudnn_url: String,
    /// Acquisition method
    pub method: Method,
}

/// A validated toolkit selection
///
/// Produced by the version resolver. `cuda_url` stays `None` until the
/// acquisition stage actually needs an origin download; resolving it earlier
/// would load the link catalog for runs that never leave the caches.
/// Invariant: `cudnn_version` and `cudnn_url` are both present or both
/// absent.
#[derive(Debug, Clone)]
pub struct ResolvedToolkit {
    /// Validated CUDA toolkit version
    pub cuda_version: Version,
    /// CUDA installer source URL, filled lazily before an origin download
    pub cuda_url: Option<Url>,
    /// Validated cuDNN version, when a companion install was requested
    pub cudnn_version: Option<Version>,
    /// cuDNN archive source URL, when a companion install was requested
    pub cudnn_url: Option<Url>,
}

impl ResolvedToolkit {
    /// Whether this run also provisions the cuDNN companion library
    pub fn has_cudnn(&self) -> bool {
        self.cudnn_version.is_some()
    }
}

/// The two artifact kinds the pipeline acquires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Primary CUDA toolkit installer
    Cuda,
    /// Companion cuDNN library archive
    Cudnn,
}

impl ArtifactKind {
    /// Base tool name used for cache entries and download file names
    pub fn tool_name(&self) -> &'static str {
        match self {
            ArtifactKind::Cuda => "cuda_installer",
            ArtifactKind::Cudnn => "cudnn_archive",
        }
    }

    /// Host-scoped tool id: `<tool>-<platform>-<os release>`
    pub fn tool_id(&self, platform: PlatformProfile, os_release: &str) -> String {
        format!("{}-{}-{}", self.tool_name(), platform, os_release)
    }

    /// Version carried by the resolved toolkit for this artifact kind
    pub fn version<'a>(&self, toolkit: &'a ResolvedToolkit) -> Option<&'a Version> {
        match self {
            ArtifactKind::Cuda => Some(&toolkit.cuda_version),
            ArtifactKind::Cudnn => toolkit.cudnn_version.as_ref(),
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Cuda => write!(f, "cuda"),
            ArtifactKind::Cudnn => write!(f, "cudnn"),
        }
    }
}

/// Deterministic key identifying one logical artifact across cache tiers
///
/// The same string keys the machine tool-cache entry and the shared remote
/// cache entry: `<tool>-<platform>-<os release>-<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for an artifact on this host
    pub fn new(
        kind: ArtifactKind,
        platform: PlatformProfile,
        os_release: &str,
        version: &Version,
    ) -> Self {
        Self(format!("{}-{}", kind.tool_id(platform, os_release), version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which tier satisfied an acquisition
///
/// Diagnostics only; nothing downstream branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    MachineCache,
    RemoteCache,
    Origin,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::MachineCache => write!(f, "machine cache"),
            Tier::RemoteCache => write!(f, "remote cache"),
            Tier::Origin => write!(f, "origin download"),
        }
    }
}

/// Result of acquiring one artifact
#[derive(Debug, Clone)]
pub struct AcquisitionResult {
    /// Absolute path to the acquired artifact file
    pub path: PathBuf,
    /// Tier that satisfied the acquisition
    pub tier: Tier,
}

/// A fully-built subprocess invocation for one install step
///
/// Constructed fresh per step by the host strategy and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    /// Program to execute
    pub program: String,
    /// Ordered argument list
    pub args: Vec<String>,
    /// Short label for diagnostics ("install", "unpack", ...)
    pub label: &'static str,
}

impl CommandPlan {
    pub fn new(program: impl Into<String>, args: Vec<String>, label: &'static str) -> Self {
        Self {
            program: program.into(),
            args,
            label,
        }
    }

    /// One-line rendering for log output
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}
