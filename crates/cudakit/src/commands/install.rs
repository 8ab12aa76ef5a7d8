//! Install command
//!
//! The top-level provisioning pipeline: resolve the requested version
//! against the catalog, acquire the artifacts through the cache tiers,
//! drive the silent installer, publish outputs and exports, and merge
//! cuDNN into the installed tree.

use crate::cli::InstallArgs;
use crate::{ci_env, output};
use anyhow::{anyhow, bail, Context, Result};
use cudakit_acquire::{Acquirer, DirRemoteCache, RemoteCache, ToolCache};
use cudakit_core::strategy::strategy_for;
use cudakit_core::types::{Method, ToolkitRequest};
use cudakit_core::PlatformProfile;
use cudakit_install::cudnn;
use std::path::PathBuf;
use tracing::{debug, info};

pub async fn run(args: InstallArgs) -> Result<()> {
    // The platform profile is resolved exactly once per run; every stage
    // below receives it instead of re-querying the host
    let platform = PlatformProfile::detect()?;

    debug!("Desired cuda version: {}", args.cuda);
    debug!("Desired cudnn version: {}", args.cudnn);
    debug!("Desired cudnn URL: {}", args.cudnn_url);
    debug!("Desired method: {}", args.method);

    let sub_packages = parse_string_array("sub-packages", &args.sub_packages)?;
    let linux_local_args = parse_string_array("linux-local-args", &args.linux_local_args)?;
    let method: Method = args.method.parse()?;

    let request = ToolkitRequest {
        cuda: args.cuda.clone(),
        cudnn: args.cudnn.clone(),
        cudnn_url: args.cudnn_url.clone(),
        method,
    };
    let mut toolkit = cudakit_links::resolve(&request, platform)?;

    // The Linux runfile installer has no sub-package selection
    if method == Method::Local && !sub_packages.is_empty() && platform == PlatformProfile::Linux {
        bail!("Sub-packages on 'local' method are not supported on Linux, use 'network' instead");
    }

    let toolkit_root = strategy_for(platform).install_root(&toolkit.cuda_version);
    let mut archive = None;

    if use_apt(method, platform) {
        // Repository-based install; the acquisition pipeline is bypassed
        cudakit_install::apt::setup_repository(&toolkit.cuda_version).await?;
        cudakit_install::apt::install_packages(&toolkit.cuda_version, &sub_packages).await?;
    } else {
        let acquirer = build_acquirer(&args, platform, method)?;
        let (installer, cudnn_archive) = acquirer.acquire_all(&mut toolkit).await?;
        info!(
            "Installing CUDA {} from {}",
            toolkit.cuda_version,
            installer.display()
        );
        cudakit_install::install(
            &installer,
            &toolkit,
            &sub_packages,
            &linux_local_args,
            platform,
            ci_env::artifact_dir().as_deref(),
        )
        .await?;
        archive = cudnn_archive;
    }

    // Publish exports and output values for later build steps
    ci_env::export_environment(&toolkit_root)?;
    ci_env::set_outputs(&args.cuda, &toolkit_root)?;

    // Companion merge runs only after a successful primary install
    if let (Some(archive), Some(cudnn_url)) = (archive, toolkit.cudnn_url.as_ref()) {
        let directory_name = cudnn::directory_name_source(&args.cudnn_archive_dir, cudnn_url);
        cudakit_install::install_cudnn(&archive, &directory_name, &toolkit_root, platform).await?;
    }

    output::success(&format!(
        "CUDA {} installed at {}",
        toolkit.cuda_version,
        toolkit_root.display()
    ));
    Ok(())
}

/// Whether this platform/method combination installs from the apt repository
fn use_apt(method: Method, platform: PlatformProfile) -> bool {
    method == Method::Network && platform == PlatformProfile::Linux
}

/// Parse a JSON string-array input, naming the input on failure
fn parse_string_array(input_name: &str, raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| {
        format!("Error parsing input '{input_name}' to a JSON string array: {raw}")
    })
}

/// Wire up the tiered acquirer from the install arguments
fn build_acquirer(
    args: &InstallArgs,
    platform: PlatformProfile,
    method: Method,
) -> Result<Acquirer> {
    let tool_cache = ToolCache::new(ToolCache::default_root()?);

    let work_dir: PathBuf = match &args.work_dir {
        Some(dir) => dir.clone().into_std_path_buf(),
        None => std::env::temp_dir(),
    };
    std::fs::create_dir_all(&work_dir)
        .with_context(|| format!("Failed to create work directory {}", work_dir.display()))?;

    let remote: Option<Box<dyn RemoteCache>> = if args.use_remote_cache {
        let dir = args.remote_cache_dir.as_ref().ok_or_else(|| {
            anyhow!("Remote cache enabled but no directory configured (set CUDAKIT_REMOTE_CACHE_DIR)")
        })?;
        Some(Box::new(DirRemoteCache::new(dir.as_std_path())))
    } else {
        None
    };

    Acquirer::new(platform, method, tool_cache, remote, work_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apt_path_is_linux_network_only() {
        assert!(use_apt(Method::Network, PlatformProfile::Linux));
        assert!(!use_apt(Method::Local, PlatformProfile::Linux));
        assert!(!use_apt(Method::Network, PlatformProfile::Windows));
        assert!(!use_apt(Method::Local, PlatformProfile::Windows));
    }

    #[test]
    fn string_arrays_parse_from_json() {
        assert_eq!(
            parse_string_array("sub-packages", "[\"nvcc\", \"cudart\"]").unwrap(),
            vec!["nvcc", "cudart"]
        );
        assert!(parse_string_array("sub-packages", "[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_string_array_errors_name_the_input() {
        let err = parse_string_array("linux-local-args", "not json").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("linux-local-args"));
        assert!(message.contains("not json"));
    }
}
