// Platform adapters: one implementation of `PlatformAdapter` per platform,
// selected by platform tag at orchestration time.

mod bluesky;
mod facebook;
mod instagram;
mod threads;
mod tiktok;
mod twitter;
mod youtube;

pub use bluesky::BlueskyAdapter;
pub use facebook::FacebookAdapter;
pub use instagram::InstagramAdapter;
pub use threads::ThreadsAdapter;
pub use tiktok::TikTokAdapter;
pub use twitter::TwitterAdapter;
pub use youtube::YouTubeAdapter;

use std::collections::HashMap;
use std::sync::Arc;

use apify_client::{ApifyClient, ItemError, RunOutput};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use presence_common::config::ActorOverrides;
use presence_common::{CanonicalIdentifier, Config, Platform, Post, ProfileStats, ScrapeError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::aggregate::DenominatorBasis;
use crate::fetcher::PageFetcher;
use crate::identifier;
use crate::runner::{self, ActorRunner};

/// What one adapter fetch produced.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub posts: Vec<Post>,
    pub profile: ProfileStats,
    /// Set when only part of the requested data could be retrieved.
    pub partial: Option<ScrapeError>,
}

impl FetchOutcome {
    pub fn new(posts: Vec<Post>, profile: ProfileStats) -> Self {
        Self {
            posts,
            profile,
            partial: None,
        }
    }

    pub fn with_partial(mut self, partial: Option<ScrapeError>) -> Self {
        self.partial = partial;
        self
    }

    /// Enforce the post bound.
    pub fn truncated(mut self, max_posts: u32) -> Self {
        self.posts.truncate(max_posts as usize);
        self
    }
}

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// What engagement rates on this platform are measured against.
    fn denominator(&self) -> DenominatorBasis {
        DenominatorBasis::Followers
    }

    fn normalize(&self, raw: &str) -> Result<CanonicalIdentifier, ScrapeError> {
        identifier::normalize(self.platform(), raw)
    }

    /// Fetch at most `max_posts` recent posts plus profile counters.
    ///
    /// Requests still outstanding at `deadline` are abandoned. Whatever was
    /// fetched before then is returned with a `PartialData` marker.
    async fn fetch_posts(
        &self,
        id: &CanonicalIdentifier,
        max_posts: u32,
        deadline: Instant,
    ) -> Result<FetchOutcome, ScrapeError>;
}

/// The adapters available to an orchestrator, keyed by platform.
#[derive(Clone, Default)]
pub struct AdapterSet {
    adapters: HashMap<Platform, Arc<dyn PlatformAdapter>>,
}

impl AdapterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the production adapter set. BlueSky needs only the page
    /// fetcher; everything else needs an Apify token.
    pub fn from_config(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let set = Self::new().with(Arc::new(BlueskyAdapter::new(fetcher)));
        match &config.apify_api_token {
            Some(token) => {
                let client =
                    ApifyClient::with_timeouts(token.clone(), config.fetch_timeout, config.platform_timeout);
                set.with_apify(Arc::new(client), &config.actors)
            }
            None => {
                warn!("APIFY_API_TOKEN not set, only BlueSky adapter is available");
                set
            }
        }
    }

    /// Register the six Apify-backed adapters on one runner.
    pub fn with_apify(self, runner: Arc<dyn ActorRunner>, actors: &ActorOverrides) -> Self {
        self.with(Arc::new(TwitterAdapter::new(runner.clone()).configured(actors)))
            .with(Arc::new(InstagramAdapter::new(runner.clone()).configured(actors)))
            .with(Arc::new(FacebookAdapter::new(runner.clone()).configured(actors)))
            .with(Arc::new(ThreadsAdapter::new(runner.clone()).configured(actors)))
            .with(Arc::new(TikTokAdapter::new(runner.clone()).configured(actors)))
            .with(Arc::new(YouTubeAdapter::new(runner).configured(actors)))
    }

    /// Add or replace the adapter for its platform.
    pub fn with(mut self, adapter: Arc<dyn PlatformAdapter>) -> Self {
        self.adapters.insert(adapter.platform(), adapter);
        self
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters.get(&platform).cloned()
    }

    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.adapters.keys().copied().collect();
        platforms.sort();
        platforms
    }
}

// --- Shared helpers for Apify-backed adapters ---

/// Run an actor and classify any failure. A run still going at `deadline`
/// is reported as unavailable.
pub(crate) async fn run_actor<I: Serialize>(
    runner: &dyn ActorRunner,
    platform: Platform,
    actor: &str,
    input: &I,
    limit: u32,
    deadline: Instant,
) -> Result<RunOutput, ScrapeError> {
    let input = serde_json::to_value(input)
        .map_err(|e| ScrapeError::unavailable(format!("Failed to encode actor input: {e}")).on(platform))?;
    match tokio::time::timeout_at(deadline, runner.run_actor(actor, input, limit)).await {
        Ok(result) => result.map_err(|e| runner::apify_error(e).on(platform)),
        Err(_) => Err(deadline_error(platform)),
    }
}

pub(crate) fn deadline_error(platform: Platform) -> ScrapeError {
    ScrapeError::unavailable("Fetch deadline reached").on(platform)
}

/// Typed dataset records plus notes on what could not be used.
pub(crate) struct Decoded<T> {
    pub records: Vec<T>,
    notes: Vec<String>,
    platform: Platform,
}

impl<T> Decoded<T> {
    /// A `PartialData` marker if anything was dropped or the run ended early.
    pub fn partial(&self) -> Option<ScrapeError> {
        if self.notes.is_empty() {
            None
        } else {
            Some(ScrapeError::partial(self.notes.join("; ")).on(self.platform))
        }
    }
}

/// Decode a run's dataset into typed records.
///
/// Undecodable items are skipped and noted. Error items are noted too, unless
/// they are all the dataset holds, in which case the first one is the result.
pub(crate) fn decode_run<T: DeserializeOwned>(
    platform: Platform,
    output: RunOutput,
) -> Result<Decoded<T>, ScrapeError> {
    let mut records = Vec::with_capacity(output.items.len());
    let mut item_errors = Vec::new();
    let mut skipped = 0usize;

    for item in output.items {
        if let Some(err) = ItemError::from_item(&item) {
            item_errors.push(err.describe());
            continue;
        }
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!(%platform, error = %e, "Skipping undecodable dataset item");
                skipped += 1;
            }
        }
    }

    if records.is_empty() {
        if let Some(first) = item_errors.first() {
            return Err(runner::item_error(first).on(platform));
        }
    }

    let mut notes = Vec::new();
    if !output.complete {
        notes.push(format!("Apify run ended with status {}", output.run.status));
    }
    if skipped > 0 {
        notes.push(format!("{skipped} dataset items could not be decoded"));
    }
    if !item_errors.is_empty() {
        notes.push(format!("{} dataset items reported errors: {}", item_errors.len(), item_errors[0]));
    }

    Ok(Decoded {
        records,
        notes,
        platform,
    })
}

/// Merge two optional partial markers into one.
pub(crate) fn merge_partial(a: Option<ScrapeError>, b: Option<ScrapeError>) -> Option<ScrapeError> {
    match (a, b) {
        (Some(a), Some(b)) => Some(ScrapeError {
            message: format!("{}; {}", a.message, b.message),
            ..a
        }),
        (a, b) => a.or(b),
    }
}

/// Upstream counts arrive as signed integers; negative values are garbage.
pub(crate) fn count(value: Option<i64>) -> Option<u64> {
    value.and_then(|n| u64::try_from(n).ok())
}

/// Sum of whichever counts are present; `None` if neither is.
pub(crate) fn sum_counts(a: Option<i64>, b: Option<i64>) -> Option<u64> {
    match (count(a), count(b)) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0) + b.unwrap_or(0)),
    }
}

/// Parse the timestamp shapes the upstream datasets use: RFC 3339, the
/// classic Twitter `createdAt` format, and bare dates.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// The handle without its leading `@`, as the actors expect it.
pub(crate) fn bare_handle(id: &CanonicalIdentifier) -> &str {
    id.as_str().trim_start_matches('@')
}
