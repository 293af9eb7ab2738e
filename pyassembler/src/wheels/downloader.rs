//! Archive download.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::WheelError;

/// Downloads a remote archive to a local file.
pub trait WheelDownloader: Send + Sync + 'static {
    /// Download `url` into `dest`, replacing it if present.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> impl Future<Output = Result<u64, WheelError>> + Send;
}

const USER_AGENT: &str = concat!("pyassembler/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of [`WheelDownloader`] backed by `reqwest`.
#[derive(Clone)]
pub struct HttpWheelDownloader {
    client: reqwest::Client,
    timeout: Duration,
}

impl std::fmt::Debug for HttpWheelDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpWheelDownloader")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpWheelDownloader {
    /// Create a downloader whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, WheelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WheelError::Http {
                url: String::new(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, timeout })
    }

    #[cfg(test)]
    fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_request_error(&self, url: &str, e: reqwest::Error) -> WheelError {
        if e.is_timeout() {
            WheelError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            WheelError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

impl WheelDownloader for HttpWheelDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, WheelError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_request_error(url, e))?;

        if !response.status().is_success() {
            return Err(WheelError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let mut file = File::create(dest)
            .await
            .map_err(|e| WheelError::io(dest, e))?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_request_error(url, e))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| WheelError::io(dest, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| WheelError::io(dest, e))?;

        Ok(written)
    }
}
