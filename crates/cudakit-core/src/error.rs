//! Error types for cudakit-core

use thiserror::Error;

/// Result type alias using cudakit-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for cudakit
///
/// Every variant is terminal for the current run; nothing here is retried
/// internally. Variants carry the caller-supplied strings verbatim so the
/// top-level failure message stays usable for diagnostics.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested version string does not parse as a semantic version
    #[error("Invalid version format: {version}")]
    InvalidVersionFormat { version: String },

    /// Parsed version is absent from the active catalog
    #[error("Version not available: {version}")]
    VersionUnavailable { version: String },

    /// Companion URL string does not parse as a URL
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Unknown acquisition method
    #[error("Unknown method: {method}. Valid methods: local, network")]
    InvalidMethod { method: String },

    /// Origin download required but no source URL could be resolved
    #[error("Empty download URL for {artifact}")]
    EmptyDownloadUrl { artifact: String },

    /// Cache directory holds more than one file; the artifact is ambiguous
    #[error("Got multiple files in cache directory {path}: {count}")]
    MultipleFilesInCache { path: String, count: usize },

    /// Cache directory holds no files at all
    #[error("Got no files in cache directory {path}")]
    EmptyCache { path: String },

    /// Installer process exited unsuccessfully
    #[error("Install failed: {message}")]
    InstallFailed { message: String },

    /// Host is neither of the two supported platform profiles
    #[error("Unsupported OS: {os}")]
    UnsupportedPlatform { os: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid version format error
    pub fn invalid_version_format(version: impl Into<String>) -> Self {
        Self::InvalidVersionFormat {
            version: version.into(),
        }
    }

    /// Create a version unavailable error
    pub fn version_unavailable(version: impl Into<String>) -> Self {
        Self::VersionUnavailable {
            version: version.into(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Create an invalid method error
    pub fn invalid_method(method: impl Into<String>) -> Self {
        Self::InvalidMethod {
            method: method.into(),
        }
    }

    /// Create an empty download URL error
    pub fn empty_download_url(artifact: impl Into<String>) -> Self {
        Self::EmptyDownloadUrl {
            artifact: artifact.into(),
        }
    }

    /// Create a multiple-files-in-cache error
    pub fn multiple_files_in_cache(path: impl Into<String>, count: usize) -> Self {
        Self::MultipleFilesInCache {
            path: path.into(),
            count,
        }
    }

    /// Create an empty cache error
    pub fn empty_cache(path: impl Into<String>) -> Self {
        Self::EmptyCache { path: path.into() }
    }

    /// Create an install failed error
    pub fn install_failed(message: impl Into<String>) -> Self {
        Self::InstallFailed {
            message: message.into(),
        }
    }

    /// Create an unsupported platform error
    pub fn unsupported_platform(os: impl Into<String>) -> Self {
        Self::UnsupportedPlatform { os: os.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_version_format_echoes_input_verbatim() {
        let input = "invalid version string that does not conform to semver";
        let err = Error::invalid_version_format(input);
        assert_eq!(err.to_string(), format!("Invalid version format: {input}"));
    }

    #[test]
    fn version_unavailable_names_the_version() {
        let err = Error::version_unavailable("0.0.1");
        assert!(err.to_string().contains("0.0.1"));
    }

    #[test]
    fn cache_errors_name_the_directory() {
        let err = Error::multiple_files_in_cache("/tmp/cache", 3);
        assert!(err.to_string().contains("/tmp/cache"));
        assert!(err.to_string().contains('3'));

        let err = Error::empty_cache("/tmp/cache");
        assert!(err.to_string().contains("/tmp/cache"));
    }
}
