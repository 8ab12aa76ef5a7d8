//! Install orchestration
//!
//! Three phases per install: PREPARE builds the platform command plan,
//! EXECUTE runs the installer, CLEANUP stages the installer log and
//! removes the installer file. CLEANUP runs on every exit path, and its
//! own failures never replace an EXECUTE error.

use crate::exec::run_plan;
use anyhow::Result;
use cudakit_core::strategy::strategy_for;
use cudakit_core::types::{CommandPlan, ResolvedToolkit};
use cudakit_core::PlatformProfile;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Fixed log file the Linux runfile installer writes
const LINUX_INSTALL_LOG: &str = "/var/log/cuda-installer.log";

/// Run the primary toolkit installer
///
/// `sub_packages` feeds the Windows command line; `linux_local_args` is
/// the opaque Linux pass-through. `artifact_dir`, when present, receives
/// a best-effort copy of the Linux installer log.
pub async fn install(
    installer: &Path,
    toolkit: &ResolvedToolkit,
    sub_packages: &[String],
    linux_local_args: &[String],
    platform: PlatformProfile,
    artifact_dir: Option<&Path>,
) -> Result<()> {
    // PREPARE
    let plan = strategy_for(platform).install_command(
        installer,
        &toolkit.cuda_version,
        sub_packages,
        linux_local_args,
    );
    debug!("Running install executable: {}", installer.display());

    execute_and_cleanup(&plan, installer, platform, artifact_dir).await
}

/// EXECUTE the plan, then CLEANUP unconditionally
///
/// The install result and the cleanup side effects are independent; the
/// install error always wins.
async fn execute_and_cleanup(
    plan: &CommandPlan,
    installer: &Path,
    platform: PlatformProfile,
    artifact_dir: Option<&Path>,
) -> Result<()> {
    let result = run_plan(plan).await;

    if platform == PlatformProfile::Linux {
        stage_install_log(artifact_dir);
    }
    if let Err(e) = fs::remove_file(installer) {
        warn!("Could not remove installer {}: {}", installer.display(), e);
    }

    result
}

/// Best-effort copy of the installer log into the artifact directory
///
/// Allowed to fail independently; degrades to a warning.
fn stage_install_log(artifact_dir: Option<&Path>) {
    let Some(dir) = artifact_dir else {
        debug!("No artifact directory configured, skipping install log");
        return;
    };
    let staged = (|| -> std::io::Result<u64> {
        let dest = dir.join("install-log");
        fs::create_dir_all(&dest)?;
        fs::copy(LINUX_INSTALL_LOG, dest.join("cuda-installer.log"))
    })();
    match staged {
        Ok(bytes) => debug!("Staged installer log ({bytes} bytes) into {}", dir.display()),
        Err(e) => warn!("Could not stage installer log: {}", e),
    }
}
