//! Host platform detection
//!
//! The platform profile is resolved once at run start and threaded through
//! every component explicitly, so no stage re-queries the host mid-run.

use crate::error::Result;

/// The two host platform profiles cudakit provisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformProfile {
    /// Linux (runfile installer, tar.xz companion archive)
    Linux,
    /// Windows (exe installer, zip companion archive)
    Windows,
}

impl PlatformProfile {
    /// Detect the current host platform
    ///
    /// Anything other than Linux or Windows is unsupported.
    pub fn detect() -> Result<Self> {
        #[cfg(target_os = "linux")]
        {
            Ok(PlatformProfile::Linux)
        }

        #[cfg(target_os = "windows")]
        {
            Ok(PlatformProfile::Windows)
        }

        #[cfg(not(any(target_os = "linux", target_os = "windows")))]
        {
            Err(crate::error::Error::unsupported_platform(
                std::env::consts::OS,
            ))
        }
    }
}

impl std::fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformProfile::Linux => write!(f, "linux"),
            PlatformProfile::Windows => write!(f, "windows"),
        }
    }
}

/// Host release identifier used as a cache-key component
///
/// Only keys cache entries; a coarse value is acceptable as long as it is
/// stable across runs on the same host.
pub fn os_release() -> String {
    #[cfg(target_os = "linux")]
    {
        match std::fs::read_to_string("/proc/sys/kernel/osrelease") {
            Ok(release) => release.trim().to_string(),
            Err(e) => {
                tracing::warn!("Could not read kernel release, using generic id: {}", e);
                "unknown".to_string()
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("OS").unwrap_or_else(|_| "Windows_NT".to_string())
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        "unknown".to_string()
    }
}
