//! Package-manager install path
//!
//! Used for `network` installs on Linux, where the toolkit comes from
//! NVIDIA's apt repository instead of the download pipeline. The contract
//! is exactly two calls: configure the repository for a version, then
//! install the package set for it. Once this path is taken the core
//! pipeline has no further involvement.

use crate::exec::run_plan;
use anyhow::{anyhow, Context, Result};
use cudakit_core::types::CommandPlan;
use semver::Version;
use std::fs;
use tracing::info;

/// Configure the NVIDIA apt repository on this host
///
/// Installs the repository pin, fetches the signing key, adds the
/// repository line and refreshes the package index.
pub async fn setup_repository(version: &Version) -> Result<()> {
    let release = ubuntu_release()?;
    let repo_root = format!(
        "https://developer.download.nvidia.com/compute/cuda/repos/ubuntu{release}/x86_64"
    );
    info!(
        "Configuring the CUDA {}.{} apt repository for ubuntu{}",
        version.major, version.minor, release
    );

    let pin = format!("cuda-ubuntu{release}.pin");
    run_plan(&CommandPlan::new(
        "wget",
        vec![format!("{repo_root}/{pin}"), "-O".to_string(), pin.clone()],
        "repository setup",
    ))
    .await?;
    run_plan(&CommandPlan::new(
        "sudo",
        vec![
            "mv".to_string(),
            pin,
            "/etc/apt/preferences.d/cuda-repository-pin-600".to_string(),
        ],
        "repository setup",
    ))
    .await?;
    run_plan(&CommandPlan::new(
        "sudo",
        vec![
            "apt-key".to_string(),
            "adv".to_string(),
            "--fetch-keys".to_string(),
            format!("{repo_root}/3bf863cc.pub"),
        ],
        "repository setup",
    ))
    .await?;
    run_plan(&CommandPlan::new(
        "sudo",
        vec![
            "add-apt-repository".to_string(),
            format!("deb {repo_root}/ /"),
        ],
        "repository setup",
    ))
    .await?;
    run_plan(&CommandPlan::new(
        "sudo",
        vec!["apt-get".to_string(), "update".to_string()],
        "repository setup",
    ))
    .await?;
    Ok(())
}

/// Install the toolkit package set for a version
///
/// With no sub-packages the meta package `cuda-<major>-<minor>` is
/// installed; otherwise one `cuda-<name>-<major>-<minor>` per requested
/// sub-package.
pub async fn install_packages(version: &Version, sub_packages: &[String]) -> Result<()> {
    let packages = package_set(version, sub_packages);
    info!("Installing apt packages: {}", packages.join(" "));

    let mut args = vec![
        "apt-get".to_string(),
        "-y".to_string(),
        "install".to_string(),
    ];
    args.extend(packages);
    run_plan(&CommandPlan::new("sudo", args, "package install")).await
}

/// Package names for a version and sub-package selection
fn package_set(version: &Version, sub_packages: &[String]) -> Vec<String> {
    let suffix = format!("{}-{}", version.major, version.minor);
    if sub_packages.is_empty() {
        vec![format!("cuda-{suffix}")]
    } else {
        sub_packages
            .iter()
            .map(|name| format!("cuda-{name}-{suffix}"))
            .collect()
    }
}

/// Ubuntu release id in repository form ("22.04" -> "2204")
fn ubuntu_release() -> Result<String> {
    let content =
        fs::read_to_string("/etc/os-release").context("Failed to read /etc/os-release")?;
    parse_version_id(&content)
        .ok_or_else(|| anyhow!("No VERSION_ID found in /etc/os-release"))
}

fn parse_version_id(os_release: &str) -> Option<String> {
    os_release
        .lines()
        .find_map(|line| line.strip_prefix("VERSION_ID="))
        .map(|value| value.trim().trim_matches('"').replace('.', ""))
}
