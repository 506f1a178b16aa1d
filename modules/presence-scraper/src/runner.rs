// Apify actor execution behind a trait, so Apify-backed adapters can be
// driven by canned datasets in tests.

use async_trait::async_trait;
use apify_client::{ApifyClient, ApifyError, RunOutput};
use presence_common::error::mentions_missing_account;
use presence_common::ScrapeError;

#[async_trait]
pub trait ActorRunner: Send + Sync {
    /// Run `actor` with `input` to completion and return at most `limit` items.
    async fn run_actor(
        &self,
        actor: &str,
        input: serde_json::Value,
        limit: u32,
    ) -> Result<RunOutput, ApifyError>;
}

#[async_trait]
impl ActorRunner for ApifyClient {
    async fn run_actor(
        &self,
        actor: &str,
        input: serde_json::Value,
        limit: u32,
    ) -> Result<RunOutput, ApifyError> {
        ApifyClient::run_actor(self, actor, &input, limit).await
    }
}

/// Classify an Apify failure into the scrape error taxonomy.
pub fn apify_error(err: ApifyError) -> ScrapeError {
    match err {
        ApifyError::RateLimited(msg) => ScrapeError::rate_limited(format!("Apify rate limit: {msg}")),
        ApifyError::Api { status: 429, message } => {
            ScrapeError::rate_limited(format!("Apify rate limit: {message}"))
        }
        // Apify's own 4xx/5xx concern actors, runs and datasets, never the
        // scraped account. Missing accounts surface through dataset items.
        other => ScrapeError::unavailable(other.to_string()),
    }
}

/// Classify an error message an actor left in its dataset.
pub fn item_error(description: &str) -> ScrapeError {
    if mentions_missing_account(description) {
        ScrapeError::not_found(description.to_string())
    } else if description.to_lowercase().contains("rate limit") {
        ScrapeError::rate_limited(description.to_string())
    } else {
        ScrapeError::unavailable(description.to_string())
    }
}
