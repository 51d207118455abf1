use crate::{
    error::FetchError,
    http::{PageFetcher, PageRequest, into_records},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("txsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// reqwest-backed [`PageFetcher`].
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>, FetchError> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!(url = %request.log_url, query = ?request.query, "GET page");

        // Errors are stripped of their URL since some partners embed the key in the path.
        let resp = builder
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: request.log_url.clone(),
                source: e.without_url(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: request.log_url.clone(),
                status: status.as_u16(),
            });
        }

        let body: Value = resp.json().await.map_err(|e| FetchError::Decode {
            url: request.log_url.clone(),
            reason: e.without_url().to_string(),
        })?;

        into_records(body, &request.log_url)
    }
}
