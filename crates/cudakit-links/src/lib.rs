//! # cudakit-links
//!
//! Catalogs of known-available CUDA toolkit versions and their download
//! URLs, per host platform and acquisition method, plus the version
//! resolver that validates requests against them.
//!
//! The catalogs are fixed tables shipped with the binary; they are built
//! lazily on first use and cached for the lifetime of the process.

mod linux;
mod resolver;
mod windows;

pub use linux::LinuxLinks;
pub use resolver::{available_versions, download_url, resolve};
pub use windows::WindowsLinks;

use cudakit_core::PlatformProfile;
use semver::Version;
use url::Url;

/// A platform's version/URL catalog
pub trait Links: Send + Sync {
    /// Versions available as offline/redistributable installers
    fn local_versions(&self) -> Vec<Version>;

    /// Redistributable installer URL for a catalog version
    fn local_url(&self, version: &Version) -> Option<Url>;

    /// Versions available through the online installer, where the platform
    /// supports one
    fn network_versions(&self) -> Option<Vec<Version>> {
        None
    }

    /// Online installer URL for a catalog version, where the platform
    /// supports one
    fn network_url(&self, version: &Version) -> Option<Url> {
        let _ = version;
        None
    }
}

/// Catalog for a platform profile
pub fn links_for(platform: PlatformProfile) -> &'static dyn Links {
    match platform {
        PlatformProfile::Linux => LinuxLinks::get(),
        PlatformProfile::Windows => WindowsLinks::get(),
    }
}

/// Build a parsed (version, URL) table from a static entry list
///
/// The tables are compiled-in literals; a malformed entry is a programming
/// error caught on first catalog use.
pub(crate) fn parse_entries(entries: &[(&str, &str)]) -> Vec<(Version, Url)> {
    entries
        .iter()
        .map(|(version, link)| {
            (
                Version::parse(version).expect("catalog version is valid semver"),
                Url::parse(link).expect("catalog link is a valid URL"),
            )
        })
        .collect()
}
