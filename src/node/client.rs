use super::protocol::{BlockIntro, FetchError, FetchResult};
use super::HeaderSource;
use serde_json::Value;
use std::time::Duration;

/// Default full-node HTTP endpoint
pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:8081";

/// Node client configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Base URL (e.g., "http://127.0.0.1:8081")
    pub url: String,

    /// User agent string
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl NodeConfig {
    pub fn new(url: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            user_agent: format!("x16rs-stats/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_URL.to_string())
    }
}

/// HTTP client for a Hacash full node
#[derive(Debug, Clone)]
pub struct NodeClient {
    config: NodeConfig,
    http: reqwest::Client,
}

impl NodeClient {
    pub fn new(config: NodeConfig) -> FetchResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    /// Query the block intro at `height`
    pub async fn block_intro(&self, height: u32) -> FetchResult<BlockIntro> {
        let url = format!("{}/query/block/intro", self.config.url);
        tracing::trace!("GET {}?height={}", url, height);

        let response = self
            .http
            .get(&url)
            .query(&[("height", height)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status, height });
        }

        let body: Value = response.json().await?;
        tracing::trace!("block {} intro: {}", height, body);
        BlockIntro::from_response(height, body)
    }
}

impl HeaderSource for NodeClient {
    async fn fetch(&self, height: u32) -> FetchResult<BlockIntro> {
        self.block_intro(height).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = NodeConfig::new("http://node:8081/".to_string());
        assert_eq!(config.url, "http://node:8081");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("x16rs-stats/"));
    }

    #[test]
    fn test_with_timeout() {
        let config = NodeConfig::default().with_timeout(5);
        assert_eq!(config.url, DEFAULT_NODE_URL);
        assert_eq!(config.timeout_secs, 5);
    }
}
