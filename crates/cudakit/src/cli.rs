//! CLI argument parsing with clap
//!
//! String inputs mirror the CI action surface: each install flag also
//! accepts an `INPUT_*` environment fallback so a wrapping workflow step
//! can pass values without building a command line.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// cudakit - CUDA toolkit and cuDNN provisioning for CI hosts
#[derive(Parser, Debug)]
#[command(name = "cudakit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the CUDA toolkit (and optionally cuDNN) onto this host
    Install(InstallArgs),

    /// List catalog versions for this host and method
    Versions(VersionsArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// CUDA toolkit version to install
    #[arg(long, env = "INPUT_CUDA")]
    pub cuda: String,

    /// cuDNN version to install alongside (requires --cudnn-url)
    #[arg(long, env = "INPUT_CUDNN", default_value = "")]
    pub cudnn: String,

    /// Download URL for the cuDNN archive
    #[arg(long, env = "INPUT_CUDNN_URL", default_value = "")]
    pub cudnn_url: String,

    /// Override for the directory name the cuDNN archive unpacks into
    #[arg(long, env = "INPUT_CUDNN_ARCHIVE_DIR", default_value = "")]
    pub cudnn_archive_dir: String,

    /// JSON array of sub-package names to install
    #[arg(long, env = "INPUT_SUB_PACKAGES", default_value = "[]")]
    pub sub_packages: String,

    /// JSON array of extra arguments for the Linux runfile installer
    #[arg(long, env = "INPUT_LINUX_LOCAL_ARGS", default_value = "[]")]
    pub linux_local_args: String,

    /// Acquisition method (local or network)
    #[arg(long, env = "INPUT_METHOD", default_value = "local")]
    pub method: String,

    /// Consult the shared remote cache
    #[arg(long, env = "INPUT_USE_REMOTE_CACHE")]
    pub use_remote_cache: bool,

    /// Shared remote cache directory
    #[arg(long, env = "CUDAKIT_REMOTE_CACHE_DIR")]
    pub remote_cache_dir: Option<Utf8PathBuf>,

    /// Working directory for downloads (defaults to the system temp dir)
    #[arg(long, env = "CUDAKIT_WORK_DIR")]
    pub work_dir: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Acquisition method (local or network)
    #[arg(long, default_value = "local")]
    pub method: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
