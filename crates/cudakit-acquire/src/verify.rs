//! Path verification and normalization
//!
//! An acquisition returns a directory believed to hold exactly one
//! artifact file. This check runs once per artifact, after acquisition
//! and before anything executes or extracts it, so a partially-populated
//! or colliding cache entry fails here instead of mid-install.

use cudakit_core::{Error, PlatformProfile, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a verified artifact directory to its single file
///
/// Fails with `MultipleFilesInCache` or `EmptyCache` when the directory
/// holds more or fewer than one file. On Linux, a supplied permission
/// mode is applied to the resolved file (used to mark the installer
/// executable; never passed for the companion archive).
pub fn verify_artifact_dir(
    dir: &Path,
    platform: PlatformProfile,
    mode: Option<u32>,
) -> Result<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    debug!("Files in {}: {:?}", dir.display(), files);

    let file = match files.len() {
        0 => return Err(Error::empty_cache(dir.display().to_string())),
        1 => files.remove(0),
        count => {
            return Err(Error::multiple_files_in_cache(
                dir.display().to_string(),
                count,
            ))
        }
    };

    if platform == PlatformProfile::Linux {
        if let Some(mode) = mode {
            set_unix_mode(&file, mode)?;
        }
    }

    Ok(file)
}

#[cfg(unix)]
fn set_unix_mode(file: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(file, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_unix_mode(_file: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn exactly_one_file_resolves_to_its_path() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("cuda_installer.run");
        fs::write(&file, b"bytes").unwrap();

        let resolved = verify_artifact_dir(temp.path(), PlatformProfile::Linux, None).unwrap();
        assert_eq!(resolved, file);
    }

    #[test]
    fn empty_directory_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = verify_artifact_dir(temp.path(), PlatformProfile::Linux, None).unwrap_err();
        assert!(matches!(err, Error::EmptyCache { .. }));
    }

    #[test]
    fn multiple_files_are_rejected_with_a_count() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one.run"), b"a").unwrap();
        fs::write(temp.path().join("two.run"), b"b").unwrap();

        let err = verify_artifact_dir(temp.path(), PlatformProfile::Linux, None).unwrap_err();
        match err {
            Error::MultipleFilesInCache { count, .. } => assert_eq!(count, 2),
            other => panic!("expected MultipleFilesInCache, got {other:?}"),
        }
    }

    #[test]
    fn subdirectories_do_not_count_as_artifacts() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("cuda_installer.run"), b"bytes").unwrap();

        let resolved = verify_artifact_dir(temp.path(), PlatformProfile::Linux, None).unwrap();
        assert_eq!(resolved, temp.path().join("cuda_installer.run"));
    }

    #[cfg(unix)]
    #[test]
    fn linux_mode_is_applied_to_the_resolved_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("cuda_installer.run");
        fs::write(&file, b"bytes").unwrap();

        verify_artifact_dir(temp.path(), PlatformProfile::Linux, Some(0o755)).unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
