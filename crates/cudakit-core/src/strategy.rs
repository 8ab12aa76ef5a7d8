//! Per-platform host strategies
//!
//! Every OS-dependent decision in the pipeline lives behind one trait:
//! artifact file extensions, the silent-install invocation, companion
//! archive extraction, and the merge-move passes. The strategy is selected
//! once from the resolved [`PlatformProfile`] and passed down, so no stage
//! branches on the platform ad hoc.
//!
//! The exact argument shapes built here are part of the external contract
//! for platform compatibility; change them only against the vendor installer
//! documentation.

use crate::platform::PlatformProfile;
use crate::types::{ArtifactKind, CommandPlan};
use semver::Version;
use std::path::{Path, PathBuf};

/// Windows sub-package whose name never carries a version suffix
const VERSIONLESS_SUB_PACKAGE: &str = "Display.Driver";

/// Platform capability set for command construction and artifact naming
pub trait HostStrategy: Send + Sync {
    /// File extension for a downloaded artifact of the given kind
    fn file_extension(&self, kind: ArtifactKind) -> &'static str;

    /// Silent-install invocation for the primary toolkit installer
    ///
    /// `sub_packages` is only consulted on Windows; `extra_args` is the
    /// opaque caller-supplied pass-through only consulted on Linux.
    fn install_command(
        &self,
        installer: &Path,
        version: &Version,
        sub_packages: &[String],
        extra_args: &[String],
    ) -> CommandPlan;

    /// Command that unpacks the companion archive into the toolkit root
    fn extract_command(&self, archive: &Path, toolkit_root: &Path) -> CommandPlan;

    /// Move passes that merge the unpacked companion subtree into the root
    ///
    /// Executed in order; each pass overwrites existing destination entries.
    fn merge_moves(&self, toolkit_root: &Path, inner_dir: &str) -> Vec<CommandPlan>;

    /// Installation root the vendor installer uses for a toolkit version
    fn install_root(&self, version: &Version) -> PathBuf;
}

/// Select the strategy for a platform profile
pub fn strategy_for(platform: PlatformProfile) -> &'static dyn HostStrategy {
    match platform {
        PlatformProfile::Linux => &LinuxHost,
        PlatformProfile::Windows => &WindowsHost,
    }
}

/// Linux: runfile installer driven through sudo, tar-based companion merge
pub struct LinuxHost;

impl HostStrategy for LinuxHost {
    fn file_extension(&self, kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::Cuda => "run",
            ArtifactKind::Cudnn => "tar.xz",
        }
    }

    fn install_command(
        &self,
        installer: &Path,
        _version: &Version,
        _sub_packages: &[String],
        extra_args: &[String],
    ) -> CommandPlan {
        // Root permission needed for the runfile installer
        let mut args = vec![installer.display().to_string(), "--silent".to_string()];
        args.extend(extra_args.iter().cloned());
        CommandPlan::new("sudo", args, "install")
    }

    fn extract_command(&self, archive: &Path, toolkit_root: &Path) -> CommandPlan {
        CommandPlan::new(
            "sudo",
            vec![
                "tar".to_string(),
                "-xf".to_string(),
                archive.display().to_string(),
                "-C".to_string(),
                toolkit_root.display().to_string(),
            ],
            "unpack",
        )
    }

    fn merge_moves(&self, toolkit_root: &Path, inner_dir: &str) -> Vec<CommandPlan> {
        let root = toolkit_root.display();
        vec![CommandPlan::new(
            "sudo",
            vec![
                "bash".to_string(),
                "-c".to_string(),
                format!(
                    "mv \"{root}/{inner_dir}/lib/*\" \"{root}/lib/\" && mv \"{root}/{inner_dir}/include/*\" \"{root}/include/\""
                ),
            ],
            "merge",
        )]
    }

    fn install_root(&self, version: &Version) -> PathBuf {
        PathBuf::from(format!(
            "/usr/local/cuda-{}.{}",
            version.major, version.minor
        ))
    }
}

/// Windows: exe installer, PowerShell-based companion unpack and merge
pub struct WindowsHost;

impl HostStrategy for WindowsHost {
    fn file_extension(&self, kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::Cuda => "exe",
            ArtifactKind::Cudnn => "zip",
        }
    }

    fn install_command(
        &self,
        installer: &Path,
        version: &Version,
        sub_packages: &[String],
        _extra_args: &[String],
    ) -> CommandPlan {
        // The installer elevates itself; no sudo equivalent is needed
        let mut args = vec!["-s".to_string()];
        args.extend(sub_packages.iter().map(|sub_package| {
            if sub_package == VERSIONLESS_SUB_PACKAGE {
                sub_package.clone()
            } else {
                format!("{}_{}.{}", sub_package, version.major, version.minor)
            }
        }));
        CommandPlan::new(installer.display().to_string(), args, "install")
    }

    fn extract_command(&self, archive: &Path, toolkit_root: &Path) -> CommandPlan {
        CommandPlan::new(
            "powershell",
            vec![
                "-command".to_string(),
                "Expand-Archive".to_string(),
                "-LiteralPath".to_string(),
                format!("\"{}\"", archive.display()),
                "-DestinationPath".to_string(),
                format!("\"{}\"", toolkit_root.display()),
                "-force".to_string(),
            ],
            "unpack",
        )
    }

    fn merge_moves(&self, toolkit_root: &Path, inner_dir: &str) -> Vec<CommandPlan> {
        let root = toolkit_root.display();
        let pass = |source: String, dest: String, label: &'static str| {
            CommandPlan::new(
                "powershell",
                vec![
                    "-command".to_string(),
                    "Get-ChildItem".to_string(),
                    "-Path".to_string(),
                    source,
                    "-Recurse".to_string(),
                    "|".to_string(),
                    "Move-Item".to_string(),
                    "-Destination".to_string(),
                    dest,
                    "-force".to_string(),
                ],
                label,
            )
        };
        vec![
            pass(
                format!("\"{root}\\{inner_dir}\\bin\\\\*.dll\""),
                format!("\"{root}\\bin\""),
                "merge libraries",
            ),
            pass(
                format!("\"{root}\\{inner_dir}\\include\\\\*.h\""),
                format!("\"{root}\\include\""),
                "merge headers",
            ),
            pass(
                format!("\"{root}\\{inner_dir}\\lib\\x64\\\\*.lib\""),
                format!("\"{root}\\lib\\x64\""),
                "merge import libraries",
            ),
        ]
    }

    fn install_root(&self, version: &Version) -> PathBuf {
        PathBuf::from(format!(
            "C:\\Program Files\\NVIDIA GPU Computing Toolkit\\CUDA\\v{}.{}",
            version.major, version.minor
        ))
    }
}
