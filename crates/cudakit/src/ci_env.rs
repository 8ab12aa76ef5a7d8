//! CI output values and environment exports
//!
//! After a successful install the requested version and the installation
//! root are published for downstream build steps. Under a CI runner the
//! standard output/env/path files are appended; outside one the values
//! are only logged.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Export CUDA_PATH and prepend the toolkit bin directory to PATH
pub fn export_environment(toolkit_root: &Path) -> Result<()> {
    let root = toolkit_root.display().to_string();
    if append_line("GITHUB_ENV", &format!("CUDA_PATH={root}"))? {
        debug!("Exported CUDA_PATH={}", root);
    } else {
        info!("CUDA_PATH={}", root);
    }

    let bin = toolkit_root.join("bin").display().to_string();
    if append_line("GITHUB_PATH", &bin)? {
        debug!("Added {} to PATH", bin);
    } else {
        info!("PATH addition: {}", bin);
    }
    Ok(())
}

/// Set the run's output values for downstream steps
///
/// Echoes the requested version under `cuda` and the installation root
/// under `CUDA_PATH`.
pub fn set_outputs(cuda: &str, toolkit_root: &Path) -> Result<()> {
    let root = toolkit_root.display().to_string();
    for (key, value) in [("cuda", cuda), ("CUDA_PATH", root.as_str())] {
        if append_line("GITHUB_OUTPUT", &format!("{key}={value}"))? {
            debug!("Set output {}={}", key, value);
        } else {
            info!("Output {}={}", key, value);
        }
    }
    Ok(())
}

/// Directory receiving build artifacts (the staged installer log)
pub fn artifact_dir() -> Option<PathBuf> {
    std::env::var_os("RUNNER_TEMP").map(|temp| PathBuf::from(temp).join("cudakit-artifacts"))
}

/// Append one line to the file named by `env_name`, if it is set
fn append_line(env_name: &str, line: &str) -> Result<bool> {
    let Some(path) = std::env::var_os(env_name) else {
        return Ok(false);
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open the {env_name} file"))?;
    writeln!(file, "{line}").with_context(|| format!("Failed to write to the {env_name} file"))?;
    Ok(true)
}
