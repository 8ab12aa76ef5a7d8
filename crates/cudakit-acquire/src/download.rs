//! Origin downloads
//!
//! Streams an artifact from its source URL to a local file. Failures are
//! not retried here; retry policy belongs to the CI job runner driving
//! this process, and no client-side timeout is imposed for the same
//! reason.

use anyhow::{anyhow, Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_LENGTH;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// HTTP downloader for installer and archive artifacts
pub struct Downloader {
    client: reqwest::Client,
    show_progress: bool,
}

impl Downloader {
    /// Create a downloader with the cudakit user agent
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cudakit/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            show_progress: true,
        })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Download `url` to `dest`, streaming to disk
    ///
    /// Logs the SHA-256 digest of the downloaded file at debug level for
    /// post-run diagnostics.
    pub async fn fetch(&self, url: &Url, dest: &Path) -> Result<()> {
        info!("Downloading {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send download request to {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Download of {} failed with status: {}",
                url,
                response.status()
            ));
        }

        let total_size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|len| len.to_str().ok())
            .and_then(|len| len.parse::<u64>().ok())
            .unwrap_or(0);

        let progress = if self.show_progress && total_size > 0 {
            let pb = ProgressBar::new(total_size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                    .expect("Invalid progress bar template")
                    .progress_chars("#>-"),
            );
            pb.set_message(format!("Downloading {}", file_label(dest)));
            Some(pb)
        } else {
            None
        };

        let mut file = fs::File::create(dest)
            .with_context(|| format!("Failed to create download file {}", dest.display()))?;
        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk: bytes::Bytes = chunk_result.context("Failed to read download chunk")?;
            file.write_all(&chunk)
                .context("Failed to write to download file")?;
            hasher.update(&chunk);

            downloaded += chunk.len() as u64;
            if let Some(pb) = &progress {
                pb.set_position(downloaded);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Downloaded {}", file_label(dest)));
        }

        debug!(
            "Downloaded {} bytes from {}, sha256 {:x}",
            downloaded,
            url,
            hasher.finalize()
        );
        Ok(())
    }
}

fn file_label(dest: &Path) -> String {
    dest.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dest.display().to_string())
}
