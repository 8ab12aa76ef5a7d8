//! Version catalog resolution
//!
//! Validates a toolkit request against the platform/method catalog and
//! produces the resolved toolkit descriptor the rest of the pipeline runs
//! on. Source URLs are deliberately not resolved here; acquisition fills
//! them in lazily right before an origin download.

use crate::links_for;
use anyhow::bail;
use cudakit_core::types::{Method, ResolvedToolkit, ToolkitRequest};
use cudakit_core::{Error, PlatformProfile};
use semver::Version;
use tracing::debug;
use url::Url;

/// Resolve a toolkit request against the active catalog
///
/// Fails with `InvalidVersionFormat` on a malformed version string,
/// `VersionUnavailable` when the version is not in the catalog, and
/// `InvalidUrl` on a malformed companion URL. The companion fields are
/// populated only when both companion inputs are non-empty; the companion
/// version is parsed but intentionally not checked against any catalog.
pub fn resolve(
    request: &ToolkitRequest,
    platform: PlatformProfile,
) -> cudakit_core::Result<ResolvedToolkit> {
    let cuda_version = Version::parse(&request.cuda)
        .map_err(|_| Error::invalid_version_format(&request.cuda))?;

    let versions = available_versions(request.method, platform);
    debug!(
        "Available CUDA versions for {} ({}): {}",
        platform,
        request.method,
        versions.len()
    );

    if !versions.iter().any(|known| *known == cuda_version) {
        return Err(Error::version_unavailable(cuda_version.to_string()));
    }
    debug!("CUDA version available: {}", cuda_version);

    let (cudnn_version, cudnn_url) = if !request.cudnn.is_empty() && !request.cudnn_url.is_empty() {
        let cudnn_version = Version::parse(&request.cudnn)
            .map_err(|_| Error::invalid_version_format(&request.cudnn))?;
        let cudnn_url = Url::parse(&request.cudnn_url)
            .map_err(|_| Error::invalid_url(&request.cudnn_url))?;
        (Some(cudnn_version), Some(cudnn_url))
    } else {
        (None, None)
    };

    Ok(ResolvedToolkit {
        cuda_version,
        cuda_url: None,
        cudnn_version,
        cudnn_url,
    })
}

/// Versions in the catalog for a method on a platform
///
/// Catalog selection policy: `local` always uses the redistributable
/// list. `network` has its own list on Windows only; Linux network
/// requests fall back to the redistributable list, which the apt path
/// shares. The fallback is deliberate, not an omission.
pub fn available_versions(method: Method, platform: PlatformProfile) -> Vec<Version> {
    let links = links_for(platform);
    match (method, platform) {
        (Method::Local, _) | (Method::Network, PlatformProfile::Linux) => links.local_versions(),
        (Method::Network, PlatformProfile::Windows) => links
            .network_versions()
            .unwrap_or_else(|| links.local_versions()),
    }
}

/// Resolve the primary installer's source URL for an origin download
///
/// Only called once both cache tiers have missed. The network-installer URL
/// form exists solely on Windows; asking for it elsewhere is a programming
/// error in the caller, not bad input.
pub fn download_url(
    version: &Version,
    method: Method,
    platform: PlatformProfile,
) -> anyhow::Result<Url> {
    let links = links_for(platform);
    match method {
        Method::Local => links
            .local_url(version)
            .ok_or_else(|| Error::empty_download_url(format!("cuda {version}")).into()),
        Method::Network => {
            if platform != PlatformProfile::Windows {
                bail!("network download URLs are not supported on {platform}, this path should be unreachable");
            }
            links
                .network_url(version)
                .ok_or_else(|| Error::empty_download_url(format!("cuda {version}")).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cuda: &str, cudnn: &str, cudnn_url: &str, method: Method) -> ToolkitRequest {
        ToolkitRequest {
            cuda: cuda.to_string(),
            cudnn: cudnn.to_string(),
            cudnn_url: cudnn_url.to_string(),
            method,
        }
    }

    const PLATFORMS: [PlatformProfile; 2] = [PlatformProfile::Linux, PlatformProfile::Windows];
    const METHODS: [Method; 2] = [Method::Local, Method::Network];

    #[test]
    fn resolves_known_version_with_companion() {
        for platform in PLATFORMS {
            for method in METHODS {
                let toolkit = resolve(
                    &request("11.2.2", "8.7.0", "https://example.com", method),
                    platform,
                )
                .unwrap();
                assert_eq!(toolkit.cuda_version, Version::parse("11.2.2").unwrap());
                assert_eq!(toolkit.cudnn_version, Some(Version::parse("8.7.0").unwrap()));
                assert_eq!(
                    toolkit.cudnn_url,
                    Some(Url::parse("https://example.com").unwrap())
                );
                assert!(toolkit.cuda_url.is_none(), "URL must stay lazy");
            }
        }
    }

    #[test]
    fn rejects_malformed_version_echoing_input() {
        let input = "invalid version string that does not conform to semver";
        for platform in PLATFORMS {
            for method in METHODS {
                let err = resolve(&request(input, "", "", method), platform).unwrap_err();
                match err {
                    Error::InvalidVersionFormat { ref version } => assert_eq!(version, input),
                    other => panic!("expected InvalidVersionFormat, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn rejects_version_absent_from_every_catalog() {
        for platform in PLATFORMS {
            for method in METHODS {
                let err =
                    resolve(&request("0.0.1", "8.7.0", "bad url", method), platform).unwrap_err();
                match err {
                    Error::VersionUnavailable { ref version } => assert_eq!(version, "0.0.1"),
                    other => panic!("expected VersionUnavailable, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn companion_fields_require_both_inputs() {
        // (cudnn, cudnn_url) -> expected presence
        let cases = [
            ("", "", false),
            ("8.7.0", "", false),
            ("", "https://example.com", false),
            ("8.7.0", "https://example.com", true),
        ];
        for (cudnn, cudnn_url, expected) in cases {
            let toolkit = resolve(
                &request("11.2.2", cudnn, cudnn_url, Method::Local),
                PlatformProfile::Linux,
            )
            .unwrap();
            assert_eq!(toolkit.has_cudnn(), expected, "case ({cudnn:?}, {cudnn_url:?})");
            assert_eq!(toolkit.cudnn_version.is_some(), expected);
            assert_eq!(toolkit.cudnn_url.is_some(), expected);
        }
    }

    #[test]
    fn malformed_companion_url_is_rejected() {
        let err = resolve(
            &request("11.2.2", "8.7.0", "http://[not a url", Method::Local),
            PlatformProfile::Linux,
        )
        .unwrap_err();
        match err {
            Error::InvalidUrl { ref url } => assert_eq!(url, "http://[not a url"),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn malformed_companion_version_is_rejected() {
        let err = resolve(
            &request("11.2.2", "not-a-version", "https://example.com", Method::Local),
            PlatformProfile::Linux,
        )
        .unwrap_err();
        match err {
            Error::InvalidVersionFormat { ref version } => assert_eq!(version, "not-a-version"),
            other => panic!("expected InvalidVersionFormat, got {other:?}"),
        }
    }

    #[test]
    fn linux_network_falls_back_to_the_redistributable_catalog() {
        assert_eq!(
            available_versions(Method::Network, PlatformProfile::Linux),
            available_versions(Method::Local, PlatformProfile::Linux)
        );
    }

    #[test]
    fn download_url_selects_catalog_by_method() {
        let version = Version::parse("11.2.2").unwrap();

        let local = download_url(&version, Method::Local, PlatformProfile::Linux).unwrap();
        assert!(local.path().ends_with(".run"));

        let network = download_url(&version, Method::Network, PlatformProfile::Windows).unwrap();
        assert!(network.path().contains("network_installers"));
    }

    #[test]
    fn network_download_url_on_linux_is_a_loud_logic_error() {
        let version = Version::parse("11.2.2").unwrap();
        let err = download_url(&version, Method::Network, PlatformProfile::Linux).unwrap_err();
        assert!(err.to_string().contains("not supported on linux"));
    }
}
