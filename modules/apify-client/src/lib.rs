pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::*;

use std::time::Duration;

use serde::Serialize;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Built-in actors, addressed as `owner~name`. Each can be overridden per client.
pub mod actors {
    pub const INSTAGRAM_POSTS: &str = "apify~instagram-post-scraper";
    pub const INSTAGRAM_PROFILE: &str = "apify~instagram-profile-scraper";
    pub const FACEBOOK_POSTS: &str = "apify~facebook-posts-scraper";
    pub const FACEBOOK_PAGES: &str = "apify~facebook-pages-scraper";
    pub const TWEETS: &str = "apidojo~tweet-scraper";
    pub const TIKTOK: &str = "clockworks~tiktok-scraper";
    pub const THREADS: &str = "apify~threads-profile-api-scraper";
    pub const YOUTUBE: &str = "streamers~youtube-scraper";
}

/// Terminal run statuses. Anything else means the run is still going.
const TERMINAL_STATUSES: &[&str] = &["SUCCEEDED", "FAILED", "ABORTED", "TIMED-OUT"];

/// Items from one actor run. `complete` is false when the run ended early
/// (timeout, abort, failure) but left items in its dataset.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub run: RunData,
    pub items: Vec<serde_json::Value>,
    pub complete: bool,
}

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    run_timeout: Duration,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self::with_timeouts(token, Duration::from_secs(90), Duration::from_secs(300))
    }

    /// `request_timeout` bounds every HTTP request (long-polls included);
    /// `run_timeout` is passed to Apify as the actor run's own limit.
    pub fn with_timeouts(token: String, request_timeout: Duration, run_timeout: Duration) -> Self {
        // Long-polls hold the connection for up to 60s.
        let request_timeout = request_timeout.max(Duration::from_secs(75));
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            token,
            run_timeout,
        }
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_run<I: Serialize + ?Sized>(&self, actor: &str, input: &I) -> Result<RunData> {
        let url = format!(
            "{}/acts/{}/runs?timeout={}",
            BASE_URL,
            actor,
            self.run_timeout.as_secs()
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::from_response(status.as_u16(), body));
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run reaches a terminal status. Uses `waitForFinish=60` for
    /// efficient long-polling. Failed runs are returned, not raised, so the
    /// caller can still read whatever the run produced.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", BASE_URL, run_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ApifyError::from_response(status.as_u16(), body));
            }

            let api_resp: ApiResponse<RunData> = resp.json().await?;
            if api_resp.data.is_terminal() {
                return Ok(api_resp.data);
            }
            tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
        }
    }

    /// Fetch at most `limit` raw dataset items, in dataset order.
    pub async fn get_dataset_items(
        &self,
        dataset_id: &str,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>> {
        let url = format!(
            "{}/datasets/{}/items?format=json&clean=true&limit={}",
            BASE_URL, dataset_id, limit
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::from_response(status.as_u16(), body));
        }

        let items: Vec<serde_json::Value> = resp.json().await?;
        Ok(items)
    }

    /// Run an actor end-to-end: start, poll, fetch up to `limit` items.
    pub async fn run_actor<I: Serialize + ?Sized>(
        &self,
        actor: &str,
        input: &I,
        limit: u32,
    ) -> Result<RunOutput> {
        tracing::info!(actor, limit, "Starting Apify actor run");

        let run = self.start_run(actor, input).await?;
        tracing::info!(run_id = %run.id, "Apify run started, polling for completion");

        let finished = self.wait_for_run(&run.id).await?;
        let items = self
            .get_dataset_items(&finished.default_dataset_id, limit)
            .await?;
        tracing::info!(
            run_id = %finished.id,
            status = %finished.status,
            count = items.len(),
            "Fetched dataset items"
        );

        match finished.status.as_str() {
            "SUCCEEDED" => Ok(RunOutput {
                run: finished,
                items,
                complete: true,
            }),
            _ if !items.is_empty() => {
                tracing::warn!(
                    run_id = %finished.id,
                    status = %finished.status,
                    count = items.len(),
                    "Run ended early, keeping partial dataset"
                );
                Ok(RunOutput {
                    run: finished,
                    items,
                    complete: false,
                })
            }
            _ => Err(ApifyError::RunFailed {
                run_id: finished.id,
                status: finished.status,
            }),
        }
    }
}

impl RunData {
    pub fn is_terminal(&self) -> bool {
        TERMINAL_STATUSES.contains(&self.status.as_str())
    }
}
