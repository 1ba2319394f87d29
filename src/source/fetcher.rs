// Fetching remote dataset files
use crate::config::HttpConfig;
use crate::error::{Result, ToxicError};
use async_trait::async_trait;
use std::time::Duration;

/// Source of remote file contents
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a resource as raw bytes
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetch a resource as UTF-8 text (invalid sequences are replaced)
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// HTTP(S) fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ToxicError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);

        let network = |source| ToxicError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ToxicError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network)?;
        tracing::debug!(bytes = body.len(), "Fetched {}", url);
        Ok(body.to_vec())
    }
}
