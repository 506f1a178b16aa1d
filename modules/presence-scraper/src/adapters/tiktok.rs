// TikTok adapter: profile videos via the Apify TikTok scraper. Rates are
// measured against each video's play count.

use std::sync::Arc;

use apify_client::{actors, TikTokPost, TikTokScraperInput};
use async_trait::async_trait;
use presence_common::config::ActorOverrides;
use presence_common::{CanonicalIdentifier, Platform, Post, ProfileStats, ScrapeError};
use tokio::time::Instant;
use tracing::info;

use super::{bare_handle, count, decode_run, parse_timestamp, run_actor, FetchOutcome, PlatformAdapter};
use crate::aggregate::DenominatorBasis;
use crate::runner::ActorRunner;

pub struct TikTokAdapter {
    runner: Arc<dyn ActorRunner>,
    actor: String,
}

impl TikTokAdapter {
    pub fn new(runner: Arc<dyn ActorRunner>) -> Self {
        Self {
            runner,
            actor: actors::TIKTOK.to_string(),
        }
    }

    pub fn configured(mut self, actors: &ActorOverrides) -> Self {
        if let Some(actor) = &actors.tiktok {
            self.actor = actor.clone();
        }
        self
    }
}

#[async_trait]
impl PlatformAdapter for TikTokAdapter {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    fn denominator(&self) -> DenominatorBasis {
        DenominatorBasis::Views
    }

    async fn fetch_posts(
        &self,
        id: &CanonicalIdentifier,
        max_posts: u32,
        deadline: Instant,
    ) -> Result<FetchOutcome, ScrapeError> {
        let identifier = bare_handle(id);
        info!(identifier, max_posts, "tiktok: fetching posts");

        let input = TikTokScraperInput {
            profiles: vec![identifier.to_string()],
            results_per_page: max_posts,
        };
        let output = run_actor(
            self.runner.as_ref(),
            Platform::TikTok,
            &self.actor,
            &input,
            max_posts,
            deadline,
        )
        .await?;
        let decoded = decode_run::<TikTokPost>(Platform::TikTok, output)?;
        let partial = decoded.partial();

        let followers = decoded
            .records
            .iter()
            .find_map(|p| p.author_meta.as_ref().and_then(|a| count(a.fans)));
        let confirmed = !decoded.records.is_empty();

        let posts: Vec<Post> = decoded
            .records
            .into_iter()
            .filter_map(|p| to_post(p, identifier))
            .collect();

        info!(identifier, count = posts.len(), "tiktok: fetched posts");

        let profile = ProfileStats {
            followers,
            total_posts: None,
            confirmed,
        };
        Ok(FetchOutcome::new(posts, profile).with_partial(partial).truncated(max_posts))
    }
}

fn to_post(video: TikTokPost, handle: &str) -> Option<Post> {
    let id = video.id?;
    let mut post = Post::new(Platform::TikTok, id.as_str());
    post.url = video
        .web_video_url
        .or_else(|| Some(format!("https://www.tiktok.com/@{handle}/video/{id}")));
    post.text = video.text;
    post.published_at = video.create_time_iso.as_deref().and_then(parse_timestamp);
    post.likes = count(video.digg_count);
    post.reposts = count(video.share_count);
    post.replies = count(video.comment_count);
    post.views = count(video.play_count);
    Some(post)
}
