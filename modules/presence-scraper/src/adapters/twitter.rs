// X/Twitter adapter: recent tweets via the Apify tweet scraper.

use std::sync::Arc;

use apify_client::{actors, Tweet, TweetScraperInput};
use async_trait::async_trait;
use presence_common::config::ActorOverrides;
use presence_common::{CanonicalIdentifier, Platform, Post, ProfileStats, ScrapeError};
use tokio::time::Instant;
use tracing::info;

use super::{count, decode_run, parse_timestamp, run_actor, sum_counts, FetchOutcome, PlatformAdapter};
use crate::runner::ActorRunner;

pub struct TwitterAdapter {
    runner: Arc<dyn ActorRunner>,
    actor: String,
}

impl TwitterAdapter {
    pub fn new(runner: Arc<dyn ActorRunner>) -> Self {
        Self {
            runner,
            actor: actors::TWEETS.to_string(),
        }
    }

    pub fn configured(mut self, actors: &ActorOverrides) -> Self {
        if let Some(actor) = &actors.tweets {
            self.actor = actor.clone();
        }
        self
    }
}

#[async_trait]
impl PlatformAdapter for TwitterAdapter {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn fetch_posts(
        &self,
        id: &CanonicalIdentifier,
        max_posts: u32,
        deadline: Instant,
    ) -> Result<FetchOutcome, ScrapeError> {
        let identifier = id.as_str();
        info!(identifier, max_posts, "twitter: fetching posts");

        let input = TweetScraperInput {
            twitter_handles: vec![identifier.to_string()],
            max_items: max_posts,
            sort: "Latest".to_string(),
        };
        let output = run_actor(
            self.runner.as_ref(),
            Platform::Twitter,
            &self.actor,
            &input,
            max_posts,
            deadline,
        )
        .await?;
        let decoded = decode_run::<Tweet>(Platform::Twitter, output)?;
        let partial = decoded.partial();

        let followers = decoded
            .records
            .iter()
            .find_map(|t| t.author.as_ref().and_then(|a| count(a.followers)));
        let confirmed = decoded.records.iter().any(|t| t.id.is_some() || t.author.is_some());

        let posts: Vec<Post> = decoded
            .records
            .into_iter()
            .filter(|t| !t.is_retweet.unwrap_or(false))
            .filter_map(|t| to_post(t, identifier))
            .collect();

        info!(identifier, count = posts.len(), "twitter: fetched posts");

        let profile = ProfileStats {
            followers,
            total_posts: None,
            confirmed,
        };
        Ok(FetchOutcome::new(posts, profile).with_partial(partial).truncated(max_posts))
    }
}

fn to_post(tweet: Tweet, handle: &str) -> Option<Post> {
    let id = tweet.id.clone()?;
    let mut post = Post::new(Platform::Twitter, id.as_str());
    post.text = tweet.content().map(str::to_string);
    post.url = tweet
        .url
        .clone()
        .or_else(|| Some(format!("https://x.com/{handle}/status/{id}")));
    post.published_at = tweet.created_at.as_deref().and_then(parse_timestamp);
    post.likes = count(tweet.like_count);
    post.reposts = sum_counts(tweet.retweet_count, tweet.quote_count);
    post.replies = count(tweet.reply_count);
    post.views = count(tweet.view_count);
    Some(post)
}
