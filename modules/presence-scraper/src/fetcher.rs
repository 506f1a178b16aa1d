// Page fetching collaborator. Everything that needs raw HTTP bodies (page
// scans, the BlueSky public API) goes through `PageFetcher`, so tests can
// swap in canned responses.

use std::time::Duration;

use async_trait::async_trait;
use browserless_client::{BrowserlessClient, BrowserlessError};
use presence_common::ScrapeError;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; presence-scraper/0.1)";

/// A fetched response. Non-2xx statuses are data, not errors.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
    pub final_url: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Fetcher setup failed: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<BrowserlessError> for FetchError {
    fn from(err: BrowserlessError) -> Self {
        match err {
            BrowserlessError::Timeout(msg) => FetchError::Timeout(msg),
            other => FetchError::Network(other.to_string()),
        }
    }
}

/// Every transport failure is transient from the scraper's point of view.
impl From<FetchError> for ScrapeError {
    fn from(err: FetchError) -> Self {
        ScrapeError::unavailable(err.to_string())
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a URL. Applies the fetcher's own timeout policy.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Plain HTTP fetcher backed by reqwest.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let body = resp.text().await?;
        debug!(url, status, bytes = body.len(), "Fetched");
        Ok(FetchedPage {
            status,
            body,
            final_url,
        })
    }
}

#[async_trait]
impl PageFetcher for BrowserlessClient {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let page = self.content(url).await?;
        Ok(FetchedPage {
            status: page.status,
            body: page.html,
            final_url: url.to_string(),
        })
    }
}
