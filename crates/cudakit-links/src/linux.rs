//! Linux catalog: redistributable runfile installers
//!
//! Linux has no online-installer catalog; `network` requests are served by
//! the apt repository path, which shares this version set.

use crate::{parse_entries, Links};
use semver::Version;
use std::sync::OnceLock;
use url::Url;

/// Runfile installer downloads, newest last
const LOCAL_ENTRIES: &[(&str, &str)] = &[
    (
        "10.2.89",
        "https://developer.download.nvidia.com/compute/cuda/10.2/Prod/local_installers/cuda_10.2.89_440.33.01_linux.run",
    ),
    (
        "11.0.3",
        "https://developer.download.nvidia.com/compute/cuda/11.0.3/local_installers/cuda_11.0.3_450.51.06_linux.run",
    ),
    (
        "11.1.1",
        "https://developer.download.nvidia.com/compute/cuda/11.1.1/local_installers/cuda_11.1.1_455.32.00_linux.run",
    ),
    (
        "11.2.2",
        "https://developer.download.nvidia.com/compute/cuda/11.2.2/local_installers/cuda_11.2.2_460.32.03_linux.run",
    ),
    (
        "11.3.1",
        "https://developer.download.nvidia.com/compute/cuda/11.3.1/local_installers/cuda_11.3.1_465.19.01_linux.run",
    ),
    (
        "11.4.3",
        "https://developer.download.nvidia.com/compute/cuda/11.4.3/local_installers/cuda_11.4.3_470.82.01_linux.run",
    ),
    (
        "11.5.2",
        "https://developer.download.nvidia.com/compute/cuda/11.5.2/local_installers/cuda_11.5.2_495.29.05_linux.run",
    ),
    (
        "11.6.2",
        "https://developer.download.nvidia.com/compute/cuda/11.6.2/local_installers/cuda_11.6.2_510.47.03_linux.run",
    ),
    (
        "11.7.1",
        "https://developer.download.nvidia.com/compute/cuda/11.7.1/local_installers/cuda_11.7.1_515.65.01_linux.run",
    ),
    (
        "11.8.0",
        "https://developer.download.nvidia.com/compute/cuda/11.8.0/local_installers/cuda_11.8.0_520.61.05_linux.run",
    ),
    (
        "12.0.1",
        "https://developer.download.nvidia.com/compute/cuda/12.0.1/local_installers/cuda_12.0.1_525.85.12_linux.run",
    ),
    (
        "12.1.1",
        "https://developer.download.nvidia.com/compute/cuda/12.1.1/local_installers/cuda_12.1.1_530.30.02_linux.run",
    ),
    (
        "12.2.2",
        "https://developer.download.nvidia.com/compute/cuda/12.2.2/local_installers/cuda_12.2.2_535.104.05_linux.run",
    ),
    (
        "12.3.2",
        "https://developer.download.nvidia.com/compute/cuda/12.3.2/local_installers/cuda_12.3.2_545.23.08_linux.run",
    ),
    (
        "12.4.1",
        "https://developer.download.nvidia.com/compute/cuda/12.4.1/local_installers/cuda_12.4.1_550.54.15_linux.run",
    ),
    (
        "12.5.1",
        "https://developer.download.nvidia.com/compute/cuda/12.5.1/local_installers/cuda_12.5.1_555.42.06_linux.run",
    ),
    (
        "12.6.2",
        "https://developer.download.nvidia.com/compute/cuda/12.6.2/local_installers/cuda_12.6.2_560.35.03_linux.run",
    ),
    (
        "12.8.0",
        "https://developer.download.nvidia.com/compute/cuda/12.8.0/local_installers/cuda_12.8.0_570.86.10_linux.run",
    ),
];

/// Linux link catalog
pub struct LinuxLinks {
    local: Vec<(Version, Url)>,
}

static LINKS: OnceLock<LinuxLinks> = OnceLock::new();

impl LinuxLinks {
    /// Process-wide catalog instance
    pub fn get() -> &'static Self {
        LINKS.get_or_init(|| Self {
            local: parse_entries(LOCAL_ENTRIES),
        })
    }
}

impl Links for LinuxLinks {
    fn local_versions(&self) -> Vec<Version> {
        self.local.iter().map(|(version, _)| version.clone()).collect()
    }

    fn local_url(&self, version: &Version) -> Option<Url> {
        self.local
            .iter()
            .find(|(known, _)| known == version)
            .map(|(_, link)| link.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_urls_are_runfiles() {
        let links = LinuxLinks::get();
        for version in links.local_versions() {
            let url = links.local_url(&version).unwrap();
            assert!(url.path().ends_with(".run"), "not a runfile: {url}");
        }
    }

    #[test]
    fn catalog_is_sorted_ascending() {
        let versions = LinuxLinks::get().local_versions();
        let mut sorted = versions.clone();
        sorted.sort();
        assert_eq!(versions, sorted);
    }
}
