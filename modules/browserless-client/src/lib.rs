pub mod error;

pub use error::{BrowserlessError, Result};

use std::time::Duration;

use serde::Serialize;

/// Header Browserless uses to report the target page's own status code.
const RESPONSE_CODE_HEADER: &str = "x-response-code";

/// A page rendered by a headless browser.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Status of the target page, falling back to Browserless' own status.
    pub status: u16,
    pub html: String,
}

#[derive(Serialize)]
struct ContentRequest<'a> {
    url: &'a str,
    #[serde(rename = "gotoOptions")]
    goto_options: GotoOptions,
}

#[derive(Serialize)]
struct GotoOptions {
    #[serde(rename = "waitUntil")]
    wait_until: &'static str,
    timeout: u64,
}

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            // Leave Browserless room to report its own navigation timeout.
            .timeout(timeout + Duration::from_secs(5))
            .build()
            .map_err(|e| BrowserlessError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            timeout,
        })
    }

    /// Fetch fully-rendered HTML for a URL via the Browserless /content endpoint.
    pub async fn content(&self, url: &str) -> Result<RenderedPage> {
        let endpoint = format!("{}/content", self.base_url);
        let mut request = self.client.post(&endpoint).json(&ContentRequest {
            url,
            goto_options: GotoOptions {
                wait_until: "networkidle2",
                timeout: self.timeout.as_millis() as u64,
            },
        });
        if let Some(ref token) = self.token {
            request = request.query(&[("token", token.as_str())]);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let target_status = target_status(resp.headers()).unwrap_or(status.as_u16());
        tracing::debug!(url, status = target_status, "Rendered page");

        Ok(RenderedPage {
            status: target_status,
            html: resp.text().await?,
        })
    }
}

fn target_status(headers: &reqwest::header::HeaderMap) -> Option<u16> {
    headers
        .get(RESPONSE_CODE_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
