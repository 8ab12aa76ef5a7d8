//! Windows catalog: redistributable and online installers

use crate::{parse_entries, Links};
use semver::Version;
use std::sync::OnceLock;
use url::Url;

/// Full local installer downloads, newest last
const LOCAL_ENTRIES: &[(&str, &str)] = &[
    (
        "10.2.89",
        "https://developer.download.nvidia.com/compute/cuda/10.2/Prod/local_installers/cuda_10.2.89_441.22_win10.exe",
    ),
    (
        "11.0.3",
        "https://developer.download.nvidia.com/compute/cuda/11.0.3/local_installers/cuda_11.0.3_451.82_win10.exe",
    ),
    (
        "11.1.1",
        "https://developer.download.nvidia.com/compute/cuda/11.1.1/local_installers/cuda_11.1.1_456.81_win10.exe",
    ),
    (
        "11.2.2",
        "https://developer.download.nvidia.com/compute/cuda/11.2.2/local_installers/cuda_11.2.2_461.33_win10.exe",
    ),
    (
        "11.3.1",
        "https://developer.download.nvidia.com/compute/cuda/11.3.1/local_installers/cuda_11.3.1_465.89_win10.exe",
    ),
    (
        "11.4.3",
        "https://developer.download.nvidia.com/compute/cuda/11.4.3/local_installers/cuda_11.4.3_472.50_windows.exe",
    ),
    (
        "11.5.2",
        "https://developer.download.nvidia.com/compute/cuda/11.5.2/local_installers/cuda_11.5.2_496.13_windows.exe",
    ),
    (
        "11.6.2",
        "https://developer.download.nvidia.com/compute/cuda/11.6.2/local_installers/cuda_11.6.2_511.65_windows.exe",
    ),
    (
        "11.7.1",
        "https://developer.download.nvidia.com/compute/cuda/11.7.1/local_installers/cuda_11.7.1_516.94_windows.exe",
    ),
    (
        "11.8.0",
        "https://developer.download.nvidia.com/compute/cuda/11.8.0/local_installers/cuda_11.8.0_522.06_windows.exe",
    ),
    (
        "12.0.1",
        "https://developer.download.nvidia.com/compute/cuda/12.0.1/local_installers/cuda_12.0.1_528.33_windows.exe",
    ),
    (
        "12.1.1",
        "https://developer.download.nvidia.com/compute/cuda/12.1.1/local_installers/cuda_12.1.1_531.14_windows.exe",
    ),
    (
        "12.2.2",
        "https://developer.download.nvidia.com/compute/cuda/12.2.2/local_installers/cuda_12.2.2_537.13_windows.exe",
    ),
    (
        "12.3.2",
        "https://developer.download.nvidia.com/compute/cuda/12.3.2/local_installers/cuda_12.3.2_546.12_windows.exe",
    ),
    (
        "12.4.1",
        "https://developer.download.nvidia.com/compute/cuda/12.4.1/local_installers/cuda_12.4.1_551.78_windows.exe",
    ),
    (
        "12.5.1",
        "https://developer.download.nvidia.com/compute/cuda/12.5.1/local_installers/cuda_12.5.1_555.85_windows.exe",
    ),
    (
        "12.6.2",
        "https://developer.download.nvidia.com/compute/cuda/12.6.2/local_installers/cuda_12.6.2_560.94_windows.exe",
    ),
    (
        "12.8.0",
        "https://developer.download.nvidia.com/compute/cuda/12.8.0/local_installers/cuda_12.8.0_571.96_windows.exe",
    ),
];

/// Thin online installers that fetch packages during install, newest last
const NETWORK_ENTRIES: &[(&str, &str)] = &[
    (
        "10.2.89",
        "https://developer.download.nvidia.com/compute/cuda/10.2/Prod/network_installers/cuda_10.2.89_win10_network.exe",
    ),
    (
        "11.0.3",
        "https://developer.download.nvidia.com/compute/cuda/11.0.3/network_installers/cuda_11.0.3_win10_network.exe",
    ),
    (
        "11.1.1",
        "https://developer.download.nvidia.com/compute/cuda/11.1.1/network_installers/cuda_11.1.1_win10_network.exe",
    ),
    (
        "11.2.2",
        "https://developer.download.nvidia.com/compute/cuda/11.2.2/network_installers/cuda_11.2.2_win10_network.exe",
    ),
    (
        "11.3.1",
        "https://developer.download.nvidia.com/compute/cuda/11.3.1/network_installers/cuda_11.3.1_win10_network.exe",
    ),
    (
        "11.4.3",
        "https://developer.download.nvidia.com/compute/cuda/11.4.3/network_installers/cuda_11.4.3_windows_network.exe",
    ),
    (
        "11.5.2",
        "https://developer.download.nvidia.com/compute/cuda/11.5.2/network_installers/cuda_11.5.2_windows_network.exe",
    ),
    (
        "11.6.2",
        "https://developer.download.nvidia.com/compute/cuda/11.6.2/network_installers/cuda_11.6.2_windows_network.exe",
    ),
    (
        "11.7.1",
        "https://developer.download.nvidia.com/compute/cuda/11.7.1/network_installers/cuda_11.7.1_windows_network.exe",
    ),
    (
        "11.8.0",
        "https://developer.download.nvidia.com/compute/cuda/11.8.0/network_installers/cuda_11.8.0_windows_network.exe",
    ),
    (
        "12.0.1",
        "https://developer.download.nvidia.com/compute/cuda/12.0.1/network_installers/cuda_12.0.1_windows_network.exe",
    ),
    (
        "12.1.1",
        "https://developer.download.nvidia.com/compute/cuda/12.1.1/network_installers/cuda_12.1.1_windows_network.exe",
    ),
    (
        "12.2.2",
        "https://developer.download.nvidia.com/compute/cuda/12.2.2/network_installers/cuda_12.2.2_windows_network.exe",
    ),
    (
        "12.3.2",
        "https://developer.download.nvidia.com/compute/cuda/12.3.2/network_installers/cuda_12.3.2_windows_network.exe",
    ),
    (
        "12.4.1",
        "https://developer.download.nvidia.com/compute/cuda/12.4.1/network_installers/cuda_12.4.1_windows_network.exe",
    ),
    (
        "12.5.1",
        "https://developer.download.nvidia.com/compute/cuda/12.5.1/network_installers/cuda_12.5.1_windows_network.exe",
    ),
    (
        "12.6.2",
        "https://developer.download.nvidia.com/compute/cuda/12.6.2/network_installers/cuda_12.6.2_windows_network.exe",
    ),
    (
        "12.8.0",
        "https://developer.download.nvidia.com/compute/cuda/12.8.0/network_installers/cuda_12.8.0_windows_network.exe",
    ),
];

/// Windows link catalog
pub struct WindowsLinks {
    local: Vec<(Version, Url)>,
    network: Vec<(Version, Url)>,
}

static LINKS: OnceLock<WindowsLinks> = OnceLock::new();

impl WindowsLinks {
    /// Process-wide catalog instance
    pub fn get() -> &'static Self {
        LINKS.get_or_init(|| Self {
            local: parse_entries(LOCAL_ENTRIES),
            network: parse_entries(NETWORK_ENTRIES),
        })
    }
}

impl Links for WindowsLinks {
    fn local_versions(&self) -> Vec<Version> {
        self.local.iter().map(|(version, _)| version.clone()).collect()
    }

    fn local_url(&self, version: &Version) -> Option<Url> {
        self.local
            .iter()
            .find(|(known, _)| known == version)
            .map(|(_, link)| link.clone())
    }

    fn network_versions(&self) -> Option<Vec<Version>> {
        Some(self.network.iter().map(|(version, _)| version.clone()).collect())
    }

    fn network_url(&self, version: &Version) -> Option<Url> {
        self.network
            .iter()
            .find(|(known, _)| known == version)
            .map(|(_, link)| link.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_urls_are_full_installers() {
        let links = WindowsLinks::get();
        for version in links.local_versions() {
            let url = links.local_url(&version).unwrap();
            assert!(url.path().contains("local_installers"), "not local: {url}");
        }
    }

    #[test]
    fn network_urls_are_network_installers() {
        let links = WindowsLinks::get();
        for version in links.network_versions().unwrap() {
            let url = links.network_url(&version).unwrap();
            assert!(url.path().contains("network_installers"), "not network: {url}");
        }
    }
}
