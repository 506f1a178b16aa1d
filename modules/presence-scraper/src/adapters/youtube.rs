// YouTube adapter: channel uploads via the Apify YouTube scraper. Rates are
// measured against each video's view count.

use std::sync::Arc;

use apify_client::{actors, StartUrl, YouTubeScraperInput, YouTubeVideo};
use async_trait::async_trait;
use presence_common::config::ActorOverrides;
use presence_common::{CanonicalIdentifier, Platform, Post, ProfileStats, ScrapeError};
use tokio::time::Instant;
use tracing::info;

use super::{count, decode_run, parse_timestamp, run_actor, FetchOutcome, PlatformAdapter};
use crate::aggregate::DenominatorBasis;
use crate::identifier::profile_url;
use crate::runner::ActorRunner;

pub struct YouTubeAdapter {
    runner: Arc<dyn ActorRunner>,
    actor: String,
}

impl YouTubeAdapter {
    pub fn new(runner: Arc<dyn ActorRunner>) -> Self {
        Self {
            runner,
            actor: actors::YOUTUBE.to_string(),
        }
    }

    pub fn configured(mut self, actors: &ActorOverrides) -> Self {
        if let Some(actor) = &actors.youtube {
            self.actor = actor.clone();
        }
        self
    }
}

#[async_trait]
impl PlatformAdapter for YouTubeAdapter {
    fn platform(&self) -> Platform {
        Platform::YouTube
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
        let identifier = id.as_str();
        info!(identifier, max_posts, "youtube: fetching videos");

        // Regular uploads only; shorts and streams would skew per-view rates.
        let input = YouTubeScraperInput {
            start_urls: vec![StartUrl { url: profile_url(id) }],
            max_results: max_posts,
            max_results_shorts: 0,
            max_result_streams: 0,
        };
        let output = run_actor(
            self.runner.as_ref(),
            Platform::YouTube,
            &self.actor,
            &input,
            max_posts,
            deadline,
        )
        .await?;
        let decoded = decode_run::<YouTubeVideo>(Platform::YouTube, output)?;
        let partial = decoded.partial();

        let followers = decoded
            .records
            .iter()
            .find_map(|v| count(v.number_of_subscribers));
        let confirmed = !decoded.records.is_empty();

        let posts: Vec<Post> = decoded.records.into_iter().filter_map(to_post).collect();

        info!(identifier, count = posts.len(), "youtube: fetched videos");

        let profile = ProfileStats {
            followers,
            total_posts: None,
            confirmed,
        };
        Ok(FetchOutcome::new(posts, profile).with_partial(partial).truncated(max_posts))
    }
}

fn to_post(video: YouTubeVideo) -> Option<Post> {
    let id = video.id?;
    let mut post = Post::new(Platform::YouTube, id.as_str());
    post.url = video
        .url
        .or_else(|| Some(format!("https://www.youtube.com/watch?v={id}")));
    post.text = video.title;
    post.published_at = video.date.as_deref().and_then(parse_timestamp);
    post.likes = count(video.likes);
    post.replies = count(video.comments_count);
    post.views = count(video.view_count);
    Some(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn video_maps_to_post_without_reposts() {
        let video: YouTubeVideo = serde_json::from_value(json!({
            "id": "dQw4w9WgXcQ",
            "title": "Annual report",
            "date": "2024-02-10T00:00:00.000Z",
            "viewCount": 5000,
            "likes": 200,
            "commentsCount": 50,
            "numberOfSubscribers": 12000
        }))
        .unwrap();
        let post = to_post(video).unwrap();
        assert_eq!(post.reposts, None);
        assert_eq!(post.engagement(), Some(250));
        assert_eq!(post.views, Some(5000));
        assert_eq!(post.url.as_deref(), Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }
}
