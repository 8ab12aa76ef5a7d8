//! Subprocess execution for install steps
//!
//! Runs a [`CommandPlan`] with stdout/stderr captured into the diagnostic
//! log stream. Failures are terminal; nothing here retries.
//!
//! [`CommandPlan`]: cudakit_core::types::CommandPlan

use anyhow::{Context, Result};
use cudakit_core::types::CommandPlan;
use cudakit_core::Error;
use std::process::Stdio;
use tokio::io::AsyncBufReadExt;
use tokio::process::Command;
use tracing::debug;

/// Execute a command plan to completion
///
/// Fails with `InstallFailed` when the process cannot be spawned or exits
/// unsuccessfully.
pub async fn run_plan(plan: &CommandPlan) -> Result<()> {
    debug!("Running {} step: {}", plan.label, plan.display_line());

    let mut cmd = Command::new(&plan.program);
    cmd.args(&plan.args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        Error::install_failed(format!("could not spawn {} step: {e}", plan.label))
    })?;

    // Stream output as it arrives
    if let Some(stdout) = child.stdout.take() {
        let mut lines = tokio::io::BufReader::new(stdout).lines();
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("{}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        let mut lines = tokio::io::BufReader::new(stderr).lines();
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("Error: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("Failed to wait for {} step", plan.label))?;
    debug!("{} step exit status: {}", plan.label, status);

    if status.success() {
        Ok(())
    } else {
        Err(Error::install_failed(format!("{} step exited with {status}", plan.label)).into())
    }
}
