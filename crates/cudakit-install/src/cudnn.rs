//! Companion library merge
//!
//! Unpacks the cuDNN archive into the installed toolkit root, then moves
//! the library subtree from the archive's top-level directory into the
//! corresponding root subdirectories. Each step is an independent command
//! execution with the same fail-fast policy as the installer; a partial
//! merge is not rolled back.

use crate::exec::run_plan;
use anyhow::{Context, Result};
use cudakit_core::strategy::strategy_for;
use cudakit_core::types::ArtifactKind;
use cudakit_core::PlatformProfile;
use std::fs;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Merge an acquired cuDNN archive into the toolkit root
///
/// `directory_name` is the caller override or the companion URL's path
/// basename; the top-level directory inside the archive is derived from
/// it by stripping the archive extension.
pub async fn install_cudnn(
    archive: &Path,
    directory_name: &str,
    toolkit_root: &Path,
    platform: PlatformProfile,
) -> Result<()> {
    let strategy = strategy_for(platform);

    debug!("Unarchiving cudnn files: {}", archive.display());
    run_plan(&strategy.extract_command(archive, toolkit_root)).await?;

    // The archive is spent once unpacked; drop it before the merge moves
    fs::remove_file(archive)
        .with_context(|| format!("Failed to remove cudnn archive {}", archive.display()))?;

    let inner_dir = archive_stem(
        directory_name,
        strategy.file_extension(ArtifactKind::Cudnn),
    );
    debug!("Moving cudnn files out of {}", inner_dir);
    for plan in strategy.merge_moves(toolkit_root, &inner_dir) {
        run_plan(&plan).await?;
    }
    Ok(())
}

/// Directory name the archive unpacked into, derived from its file name
///
/// Strips the archive extension and the separator character before it;
/// a name without the extension is returned unchanged.
pub fn archive_stem(name: &str, extension: &str) -> String {
    match name.rfind(extension) {
        Some(index) if index > 0 => name[..index - 1].to_string(),
        _ => name.to_string(),
    }
}

/// Source string for the inner-directory derivation
///
/// The caller-supplied override wins; otherwise the basename of the
/// companion URL's path component is used.
pub fn directory_name_source(override_name: &str, url: &Url) -> String {
    if !override_name.is_empty() {
        return override_name.to_string();
    }
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}
