// Scrape orchestration: resolve an identifier, fetch through the platform's
// adapter, aggregate, persist. Every failure below this point ends up in an
// envelope's error list; nothing here returns Err.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use presence_common::{
    Config, EngagementMetrics, Platform, ScrapeError, ScrapeErrorKind, ScrapeResult,
};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::adapters::AdapterSet;
use crate::aggregate::aggregate;
use crate::fetcher::PageFetcher;
use crate::identifier::detect_platform;
use crate::links::{discover_platform_links, DiscoveredLinks};
use crate::registry::GranteeTarget;
use crate::store::ResultStore;

/// How long past its deadline an adapter may run before it is abandoned.
const DEADLINE_GRACE: Duration = Duration::from_secs(1);

/// Per-invocation lifecycle of a single platform scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStage {
    Resolving,
    Fetching,
    Aggregating,
    Done,
}

impl fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Resolving => "resolving",
            Self::Fetching => "fetching",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

pub struct ScrapeOrchestrator {
    adapters: AdapterSet,
    fetcher: Arc<dyn PageFetcher>,
    store: Option<Arc<dyn ResultStore>>,
    default_max_posts: u32,
    platform_timeout: Duration,
    concurrency: usize,
}

impl ScrapeOrchestrator {
    pub fn new(adapters: AdapterSet, fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        Self {
            adapters,
            fetcher,
            store: None,
            default_max_posts: config.default_max_posts.max(1),
            platform_timeout: config.platform_timeout,
            concurrency: config.concurrency.max(1),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fetch a page and find its platform links.
    pub async fn discover_links(&self, url: &str) -> Result<DiscoveredLinks, ScrapeError> {
        let page = self.fetcher.fetch(url).await?;
        if !page.is_success() {
            return Err(ScrapeError::unavailable(format!("{url} returned HTTP {}", page.status)));
        }
        let links = discover_platform_links(&page.body, &page.final_url);
        info!(url, found = links.len(), "Discovered platform links");
        Ok(links)
    }

    /// Scrape one profile. The platform is detected from the input when not given.
    pub async fn scrape_profile(
        &self,
        grantee: &str,
        raw: &str,
        platform: Option<Platform>,
        max_posts: Option<u32>,
    ) -> ScrapeResult {
        // Resolving
        let Some(platform) = platform.or_else(|| detect_platform(raw)) else {
            let err = ScrapeError::new(
                ScrapeErrorKind::UnrecognizedFormat,
                format!("Could not determine the platform of '{raw}'"),
            );
            return ScrapeResult::failed(None, vec![err]);
        };
        debug!(grantee, %platform, stage = %ScrapeStage::Resolving, "Scrape stage");

        let Some(adapter) = self.adapters.get(platform) else {
            let err = ScrapeError::unavailable("Adapter not configured").on(platform);
            return ScrapeResult::failed(Some(platform), vec![err]);
        };
        let id = match adapter.normalize(raw) {
            Ok(id) => id,
            Err(e) => return ScrapeResult::failed(Some(platform), vec![e.on(platform)]),
        };

        // Fetching
        let max_posts = self.resolve_max_posts(max_posts);
        debug!(grantee, %platform, identifier = %id.value, stage = %ScrapeStage::Fetching, "Scrape stage");
        // Adapters stop at the deadline and keep what they have. The outer
        // bound only catches an adapter that ignores it.
        let deadline = Instant::now() + self.platform_timeout;
        let fetch = adapter.fetch_posts(&id, max_posts, deadline);
        let fetched = match tokio::time::timeout_at(deadline + DEADLINE_GRACE, fetch).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::unavailable(format!(
                "Timed out after {:?}",
                self.platform_timeout
            ))),
        };
        let outcome = match fetched {
            Ok(outcome) => outcome,
            Err(e) => {
                let e = e.on(platform);
                warn!(grantee, %platform, identifier = %id.value, error = %e, "Scrape failed");
                let mut result = ScrapeResult::failed(Some(platform), vec![e]);
                result.identifier = Some(id.value);
                return result;
            }
        };

        // Aggregating
        debug!(grantee, %platform, stage = %ScrapeStage::Aggregating, "Scrape stage");
        let mut posts = outcome.posts;
        posts.truncate(max_posts as usize);
        let metrics = aggregate(&posts, &outcome.profile, adapter.denominator());

        let mut errors: Vec<ScrapeError> = outcome.partial.into_iter().map(|e| e.on(platform)).collect();
        let success = !posts.is_empty() || outcome.profile.confirmed;
        if !success {
            errors.push(
                ScrapeError::new(ScrapeErrorKind::NoData, "No posts returned and account not confirmed")
                    .on(platform),
            );
        }

        let mut result = ScrapeResult {
            success,
            platform: Some(platform),
            identifier: Some(id.value.clone()),
            posts_downloaded: posts.len(),
            output_path: None,
            engagement_metrics: metrics,
            errors,
            posts,
        };

        // Done
        if success {
            if let Some(store) = &self.store {
                match store.save(grantee, &result).await {
                    Ok(path) => result.output_path = Some(path),
                    Err(e) => {
                        warn!(grantee, %platform, error = %e, "Failed to store result");
                        result.errors.push(e.on(platform));
                    }
                }
            }
        }

        info!(
            grantee,
            %platform,
            identifier = %id.value,
            posts = result.posts_downloaded,
            rate = result.engagement_metrics.avg_engagement_rate,
            stage = %ScrapeStage::Done,
            "Scrape complete"
        );
        result
    }

    /// Scrape every platform a grantee has: direct profile inputs first, then
    /// whatever the website links to. Platforms run concurrently.
    pub async fn scrape_grantee(&self, target: &GranteeTarget, max_posts: Option<u32>) -> GranteeReport {
        let grantee = target.name.as_str();
        let mut report = GranteeReport::new(grantee, target.website.clone());

        let mut inputs: BTreeMap<Platform, String> = BTreeMap::new();
        if let Some(website) = &target.website {
            match self.discover_links(website).await {
                Ok(links) => {
                    inputs.extend(links.iter().map(|l| (l.platform, l.url.clone())));
                    report.links = Some(links);
                }
                Err(e) => {
                    warn!(grantee, website, error = %e, "Link discovery failed");
                    report.errors.push(e);
                }
            }
        }
        inputs.extend(target.profiles.iter().map(|(p, raw)| (*p, raw.clone())));

        if inputs.is_empty() {
            report.errors.push(ScrapeError::new(
                ScrapeErrorKind::NoData,
                format!("No platform profiles resolved for {grantee}"),
            ));
            return report;
        }

        info!(grantee, platforms = inputs.len(), "Scraping grantee");
        let scrapes = inputs.iter().map(|(platform, raw)| async move {
            (*platform, self.scrape_profile(grantee, raw, Some(*platform), max_posts).await)
        });
        report.results = join_all(scrapes).await.into_iter().collect();
        report
    }

    /// Scrape many grantees, `concurrency` at a time. Once `cancelled` is set
    /// no new grantee starts; the ones in flight run to completion.
    pub async fn scrape_batch(
        &self,
        targets: Vec<GranteeTarget>,
        max_posts: Option<u32>,
        cancelled: Arc<AtomicBool>,
    ) -> BatchReport {
        info!(grantees = targets.len(), concurrency = self.concurrency, "Starting batch");

        let mut outcomes: Vec<(usize, Result<GranteeReport, String>)> =
            stream::iter(targets.into_iter().enumerate().map(|(index, target)| {
                let cancelled = cancelled.clone();
                async move {
                    if cancelled.load(Ordering::Relaxed) {
                        return (index, Err(target.name));
                    }
                    (index, Ok(self.scrape_grantee(&target, max_posts).await))
                }
            }))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let mut batch = BatchReport::default();
        for (_, outcome) in outcomes {
            match outcome {
                Ok(report) => batch.reports.push(report),
                Err(name) => batch.skipped.push(name),
            }
        }
        if !batch.skipped.is_empty() {
            warn!(skipped = batch.skipped.len(), "Batch cancelled, some grantees were not scraped");
        }
        info!(grantees = batch.reports.len(), "Batch complete");
        batch
    }

    fn resolve_max_posts(&self, requested: Option<u32>) -> u32 {
        match requested {
            Some(n) if n > 0 => n,
            _ => self.default_max_posts,
        }
    }
}

/// All platform results for one grantee.
#[derive(Debug, Clone, Serialize)]
pub struct GranteeReport {
    pub grantee: String,
    pub website: Option<String>,
    pub links: Option<DiscoveredLinks>,
    pub results: BTreeMap<Platform, ScrapeResult>,
    /// Failures not tied to one platform (link discovery, nothing resolved).
    pub errors: Vec<ScrapeError>,
}

impl GranteeReport {
    pub fn new(grantee: impl Into<String>, website: Option<String>) -> Self {
        Self {
            grantee: grantee.into(),
            website,
            links: None,
            results: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.results.values().any(|r| r.success)
    }

    /// One envelope over all platforms. The average rate is weighted by the
    /// posts each platform contributed.
    pub fn overall(&self) -> ScrapeResult {
        let mut errors = self.errors.clone();
        let mut metrics = EngagementMetrics::default();
        let mut weighted_rate = 0.0;

        for result in self.results.values() {
            errors.extend(result.errors.iter().cloned());
            let m = &result.engagement_metrics;
            metrics.followers_count = metrics.followers_count.saturating_add(m.followers_count);
            metrics.total_likes = metrics.total_likes.saturating_add(m.total_likes);
            metrics.total_reposts = metrics.total_reposts.saturating_add(m.total_reposts);
            metrics.total_replies = metrics.total_replies.saturating_add(m.total_replies);
            metrics.posts_considered += m.posts_considered;
            weighted_rate += m.avg_engagement_rate * m.posts_considered as f64;
        }
        if metrics.posts_considered > 0 {
            let avg = weighted_rate / metrics.posts_considered as f64;
            metrics.avg_engagement_rate = (avg * 10_000.0).round() / 10_000.0;
        }

        ScrapeResult {
            success: self.success(),
            platform: None,
            identifier: None,
            posts_downloaded: self.results.values().map(|r| r.posts_downloaded).sum(),
            output_path: None,
            engagement_metrics: metrics,
            errors,
            posts: Vec::new(),
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub reports: Vec<GranteeReport>,
    /// Grantees not started because the batch was cancelled.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub rate_limited: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub grantees: usize,
    pub grantees_succeeded: usize,
    pub skipped: usize,
    pub platforms: BTreeMap<Platform, PlatformSummary>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            grantees: self.reports.len(),
            grantees_succeeded: self.reports.iter().filter(|r| r.success()).count(),
            skipped: self.skipped.len(),
            platforms: BTreeMap::new(),
        };
        for (platform, result) in self.reports.iter().flat_map(|r| r.results.iter()) {
            let entry = summary.platforms.entry(*platform).or_default();
            entry.attempted += 1;
            if result.success {
                entry.succeeded += 1;
            } else {
                entry.failed += 1;
            }
            if result.errors.iter().any(|e| e.kind == ScrapeErrorKind::RateLimited) {
                entry.rate_limited += 1;
            }
        }
        summary
    }
}
