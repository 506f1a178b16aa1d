//! Test doubles for the collaborator traits.
//!
//! - MockPageFetcher (PageFetcher): URL-substring → canned response
//! - MockActorRunner (ActorRunner): actor → canned dataset, records calls
//! - StaticAdapter (PlatformAdapter): fixed outcome, optional delay
//! - MemoryStore / FailingStore (ResultStore)

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use apify_client::{ApifyError, RunData, RunOutput};
use async_trait::async_trait;
use presence_common::{
    CanonicalIdentifier, Config, Platform, Post, ProfileStats, ScrapeError, ScrapeErrorKind, ScrapeResult,
};
use presence_scraper::{
    ActorRunner, DenominatorBasis, FetchError, FetchOutcome, FetchedPage, PageFetcher, PlatformAdapter,
    ResultStore,
};
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// MockPageFetcher
// ---------------------------------------------------------------------------

enum PageResponse {
    Page { status: u16, body: String },
    Timeout,
    Hang,
}

/// First registered pattern contained in the requested URL wins, so
/// register specific patterns before general ones. Unmatched URLs 404.
#[derive(Default)]
pub struct MockPageFetcher {
    routes: Vec<(String, PageResponse)>,
    requests: Mutex<Vec<String>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, pattern: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.push((
            pattern.to_string(),
            PageResponse::Page {
                status,
                body: body.into(),
            },
        ));
        self
    }

    pub fn on_json(self, pattern: &str, body: serde_json::Value) -> Self {
        self.on(pattern, 200, body.to_string())
    }

    pub fn on_timeout(mut self, pattern: &str) -> Self {
        self.routes.push((pattern.to_string(), PageResponse::Timeout));
        self
    }

    /// Never answers, like an upstream that accepted the connection and stalled.
    pub fn on_hang(mut self, pattern: &str) -> Self {
        self.routes.push((pattern.to_string(), PageResponse::Hang));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let route = self.routes.iter().find(|(pattern, _)| url.contains(pattern.as_str()));
        match route {
            Some((_, PageResponse::Page { status, body })) => Ok(FetchedPage {
                status: *status,
                body: body.clone(),
                final_url: url.to_string(),
            }),
            Some((_, PageResponse::Timeout)) => Err(FetchError::Timeout(format!("{url} timed out"))),
            Some((_, PageResponse::Hang)) => std::future::pending().await,
            None => Ok(FetchedPage {
                status: 404,
                body: "not found".to_string(),
                final_url: url.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// MockActorRunner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ActorCall {
    pub actor: String,
    pub input: serde_json::Value,
    pub limit: u32,
}

/// Actor name → canned dataset. Unregistered actors fail like a missing actor.
#[derive(Default)]
pub struct MockActorRunner {
    responses: HashMap<String, Result<(String, Vec<serde_json::Value>), ApifyError>>,
    calls: Mutex<Vec<ActorCall>>,
}

impl MockActorRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_items(self, actor: &str, items: Vec<serde_json::Value>) -> Self {
        self.on_run(actor, "SUCCEEDED", items)
    }

    /// A run that ended with `status` (e.g. "TIMED-OUT") but left items behind.
    pub fn on_run(mut self, actor: &str, status: &str, items: Vec<serde_json::Value>) -> Self {
        self.responses
            .insert(actor.to_string(), Ok((status.to_string(), items)));
        self
    }

    pub fn on_error(mut self, actor: &str, err: ApifyError) -> Self {
        self.responses.insert(actor.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> Vec<ActorCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActorRunner for MockActorRunner {
    async fn run_actor(
        &self,
        actor: &str,
        input: serde_json::Value,
        limit: u32,
    ) -> Result<RunOutput, ApifyError> {
        self.calls.lock().unwrap().push(ActorCall {
            actor: actor.to_string(),
            input,
            limit,
        });

        let (status, items) = match self.responses.get(actor) {
            Some(Ok(response)) => response.clone(),
            Some(Err(e)) => return Err(e.clone()),
            None => {
                return Err(ApifyError::Api {
                    status: 404,
                    message: format!("Actor {actor} was not found"),
                })
            }
        };

        let items: Vec<_> = items.into_iter().take(limit as usize).collect();
        let complete = status == "SUCCEEDED";
        if !complete && items.is_empty() {
            return Err(ApifyError::RunFailed {
                run_id: "run-1".into(),
                status,
            });
        }
        Ok(RunOutput {
            run: RunData {
                id: "run-1".into(),
                status,
                default_dataset_id: "dataset-1".into(),
                started_at: None,
                finished_at: None,
            },
            items,
            complete,
        })
    }
}

// ---------------------------------------------------------------------------
// StaticAdapter
// ---------------------------------------------------------------------------

/// Returns a fixed outcome for any identifier, after an optional delay.
pub struct StaticAdapter {
    platform: Platform,
    outcome: Result<FetchOutcome, ScrapeError>,
    basis: DenominatorBasis,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticAdapter {
    pub fn ok(platform: Platform, posts: Vec<Post>, profile: ProfileStats) -> Self {
        Self {
            platform,
            outcome: Ok(FetchOutcome::new(posts, profile)),
            basis: DenominatorBasis::Followers,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(platform: Platform, err: ScrapeError) -> Self {
        Self {
            platform,
            outcome: Err(err),
            basis: DenominatorBasis::Followers,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_partial(mut self, partial: ScrapeError) -> Self {
        self.outcome = self.outcome.map(|o| o.with_partial(Some(partial)));
        self
    }

    pub fn with_basis(mut self, basis: DenominatorBasis) -> Self {
        self.basis = basis;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformAdapter for StaticAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn denominator(&self) -> DenominatorBasis {
        self.basis
    }

    async fn fetch_posts(
        &self,
        _id: &CanonicalIdentifier,
        _max_posts: u32,
        _deadline: Instant,
    ) -> Result<FetchOutcome, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        // Ignores max_posts and the deadline; the orchestrator enforces both.
        self.outcome.clone()
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Vec<(String, ScrapeResult)>>,
}

impl MemoryStore {
    pub fn saved(&self) -> Vec<(String, ScrapeResult)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn save(&self, grantee: &str, result: &ScrapeResult) -> Result<String, ScrapeError> {
        let mut saved = self.saved.lock().unwrap();
        saved.push((grantee.to_string(), result.clone()));
        Ok(format!("memory://{}", saved.len()))
    }
}

pub struct FailingStore;

#[async_trait]
impl ResultStore for FailingStore {
    async fn save(&self, _grantee: &str, _result: &ScrapeResult) -> Result<String, ScrapeError> {
        Err(ScrapeError::new(ScrapeErrorKind::Storage, "disk full"))
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn post(platform: Platform, id: &str, likes: u64, reposts: u64, replies: u64) -> Post {
    let mut post = Post::new(platform, id);
    post.likes = Some(likes);
    post.reposts = Some(reposts);
    post.replies = Some(replies);
    post
}

pub fn posts(platform: Platform, n: usize) -> Vec<Post> {
    (0..n)
        .map(|i| post(platform, &format!("{platform}-{i}"), 10, 1, 1))
        .collect()
}

pub fn followers(n: u64) -> ProfileStats {
    ProfileStats::confirmed_with_followers(Some(n))
}

pub fn test_config() -> Config {
    Config {
        platform_timeout: Duration::from_secs(5),
        concurrency: 2,
        ..Config::default()
    }
}

/// A deadline no test fetch gets near.
pub fn deadline() -> Instant {
    Instant::now() + Duration::from_secs(30)
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
