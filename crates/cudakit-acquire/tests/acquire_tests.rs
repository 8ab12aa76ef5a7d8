//! Acquisition tier-order and promotion tests
//!
//! The tiers must be consulted strictly in order (machine cache, remote
//! cache, origin) and an origin download must be promoted into both
//! caches so a re-run performs zero network calls.

mod common;

use common::*;
use cudakit_acquire::{Acquirer, DirRemoteCache, ToolCache};
use cudakit_core::types::{ArtifactKind, Method, Tier};
use cudakit_core::{Error, PlatformProfile};
use semver::Version;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLATFORM: PlatformProfile = PlatformProfile::Linux;

fn cudnn_version() -> Version {
    Version::parse("8.7.0").unwrap()
}

fn cudnn_tool_id() -> String {
    ArtifactKind::Cudnn.tool_id(PLATFORM, TEST_RELEASE)
}

fn acquirer(temp: &TempDir, remote: Option<Box<dyn cudakit_acquire::RemoteCache>>) -> Acquirer {
    let tool_cache = ToolCache::new(temp.path().join("tool-cache"));
    let work_dir = temp.path().join("work");
    fs::create_dir_all(&work_dir).unwrap();
    Acquirer::new(PLATFORM, Method::Local, tool_cache, remote, work_dir)
        .unwrap()
        .with_os_release(TEST_RELEASE)
        .with_progress(false)
}

/// Seed the machine tool cache with a cudnn archive entry
fn seed_tool_cache(temp: &TempDir) {
    let tool_cache = ToolCache::new(temp.path().join("tool-cache"));
    let staged = temp.path().join("staged.tar.xz");
    fs::write(&staged, b"archive bytes").unwrap();
    tool_cache
        .store(&staged, "cudnn_archive.tar.xz", &cudnn_tool_id(), &cudnn_version())
        .unwrap();
}

#[tokio::test]
async fn machine_cache_hit_short_circuits_remote_and_origin() {
    let temp = TempDir::new().unwrap();
    seed_tool_cache(&temp);

    let (remote, restores, saves) = CountingRemoteCache::new(&temp.path().join("shared"));
    let acquirer = acquirer(&temp, Some(Box::new(remote)));

    // The companion URL refuses connections; a hit must never touch it
    let mut toolkit = toolkit_with_cudnn(&unreachable_url());
    let result = acquirer
        .acquire(&mut toolkit, ArtifactKind::Cudnn)
        .await
        .unwrap();

    assert_eq!(result.tier, Tier::MachineCache);
    assert_eq!(restores.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(saves.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn remote_cache_hit_short_circuits_origin() {
    let temp = TempDir::new().unwrap();
    let shared_root = temp.path().join("shared");

    // Seed the shared cache under the key the acquirer will compute
    let key = cudakit_core::types::CacheKey::new(
        ArtifactKind::Cudnn,
        PLATFORM,
        TEST_RELEASE,
        &cudnn_version(),
    );
    let entry = shared_root.join(key.as_str());
    fs::create_dir_all(&entry).unwrap();
    fs::write(entry.join("cudnn_archive.tar.xz"), b"archive bytes").unwrap();

    let acquirer = acquirer(&temp, Some(Box::new(DirRemoteCache::new(&shared_root))));

    let mut toolkit = toolkit_with_cudnn(&unreachable_url());
    let result = acquirer
        .acquire(&mut toolkit, ArtifactKind::Cudnn)
        .await
        .unwrap();

    assert_eq!(result.tier, Tier::RemoteCache);
    assert!(result.path.join("cudnn_archive.tar.xz").is_file());
}

#[tokio::test]
async fn origin_download_promotes_to_both_caches() {
    let temp = TempDir::new().unwrap();
    let shared_root = temp.path().join("shared");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cudnn.tar.xz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(&b"archive bytes"[..]))
        .mount(&server)
        .await;

    let acquirer = acquirer(&temp, Some(Box::new(DirRemoteCache::new(&shared_root))));

    let mut toolkit = toolkit_with_cudnn(&format!("{}/cudnn.tar.xz", server.uri()));
    let result = acquirer
        .acquire(&mut toolkit, ArtifactKind::Cudnn)
        .await
        .unwrap();
    assert_eq!(result.tier, Tier::Origin);

    // Promoted into the machine tool cache
    let tool_cache = ToolCache::new(temp.path().join("tool-cache"));
    assert!(tool_cache.find(&cudnn_tool_id(), &cudnn_version()).is_some());

    // Promoted into the shared remote cache under the same key
    let key = cudakit_core::types::CacheKey::new(
        ArtifactKind::Cudnn,
        PLATFORM,
        TEST_RELEASE,
        &cudnn_version(),
    );
    assert!(shared_root.join(key.as_str()).is_dir());
}

#[tokio::test]
async fn rerun_is_idempotent_with_zero_network_calls() {
    let temp = TempDir::new().unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cudnn.tar.xz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(&b"archive bytes"[..]))
        .mount(&server)
        .await;

    let acquirer = acquirer(&temp, None);

    let mut toolkit = toolkit_with_cudnn(&format!("{}/cudnn.tar.xz", server.uri()));
    let first = acquirer
        .acquire(&mut toolkit, ArtifactKind::Cudnn)
        .await
        .unwrap();
    let second = acquirer
        .acquire(&mut toolkit, ArtifactKind::Cudnn)
        .await
        .unwrap();

    assert_eq!(first.tier, Tier::Origin);
    assert_eq!(second.tier, Tier::MachineCache);
    assert_eq!(first.path, second.path);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn acquire_all_returns_verified_files_without_resolving_the_primary_url() {
    let temp = TempDir::new().unwrap();

    // Seed both artifacts so acquisition never leaves the machine tier
    let tool_cache = ToolCache::new(temp.path().join("tool-cache"));
    let cuda_version = Version::parse("11.2.2").unwrap();
    let staged = temp.path().join("cuda_installer.run");
    fs::write(&staged, b"installer bytes").unwrap();
    tool_cache
        .store(
            &staged,
            "cuda_installer.run",
            &ArtifactKind::Cuda.tool_id(PLATFORM, TEST_RELEASE),
            &cuda_version,
        )
        .unwrap();
    seed_tool_cache(&temp);

    let acquirer = acquirer(&temp, None);
    let mut toolkit = toolkit_with_cudnn(&unreachable_url());
    let (installer, archive) = acquirer.acquire_all(&mut toolkit).await.unwrap();

    assert!(installer.ends_with("cuda_installer.run"));
    assert!(archive.unwrap().ends_with("cudnn_archive.tar.xz"));
    // Source URL resolution stays lazy: no download happened, so none is set
    assert!(toolkit.cuda_url.is_none());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&installer).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[tokio::test]
async fn companion_without_source_url_is_an_empty_download_url_error() {
    let temp = TempDir::new().unwrap();
    let acquirer = acquirer(&temp, None);

    // Invariant-violating toolkit: version without URL, forced cold
    let mut toolkit = toolkit_with_cudnn(&unreachable_url());
    toolkit.cudnn_url = None;

    let err = acquirer
        .acquire(&mut toolkit, ArtifactKind::Cudnn)
        .await
        .unwrap_err();
    let core_err = err.downcast_ref::<Error>().expect("typed core error");
    assert!(matches!(core_err, Error::EmptyDownloadUrl { .. }));
}
