//! Thin HTTP client for page fetches and file downloads.

use crate::error::FetchError;
use std::path::Path;
use std::time::Duration;

/// HTTP client with a fixed request timeout. No retries; failures
/// propagate to the caller.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("orgtree/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client");
        Self { inner }
    }

    /// Fetch a URL and return the response body bytes.
    /// Non-success statuses are errors.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;
        Ok(body.to_vec())
    }

    /// Fetch a URL and write the body to a local file.
    pub async fn download(&self, url: &str, path: &Path) -> Result<(), FetchError> {
        let body = self.get_bytes(url).await?;
        tokio::fs::write(path, &body)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}
