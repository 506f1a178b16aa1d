// Threads adapter: profile posts via the Apify Threads scraper.

use std::sync::Arc;

use apify_client::{actors, ThreadsPost, ThreadsScraperInput};
use async_trait::async_trait;
use chrono::DateTime;
use presence_common::config::ActorOverrides;
use presence_common::{CanonicalIdentifier, Platform, Post, ProfileStats, ScrapeError};
use tokio::time::Instant;
use tracing::info;

use super::{bare_handle, count, decode_run, run_actor, sum_counts, FetchOutcome, PlatformAdapter};
use crate::runner::ActorRunner;

pub struct ThreadsAdapter {
    runner: Arc<dyn ActorRunner>,
    actor: String,
}

impl ThreadsAdapter {
    pub fn new(runner: Arc<dyn ActorRunner>) -> Self {
        Self {
            runner,
            actor: actors::THREADS.to_string(),
        }
    }

    pub fn configured(mut self, actors: &ActorOverrides) -> Self {
        if let Some(actor) = &actors.threads {
            self.actor = actor.clone();
        }
        self
    }
}

#[async_trait]
impl PlatformAdapter for ThreadsAdapter {
    fn platform(&self) -> Platform {
        Platform::Threads
    }

    async fn fetch_posts(
        &self,
        id: &CanonicalIdentifier,
        max_posts: u32,
        deadline: Instant,
    ) -> Result<FetchOutcome, ScrapeError> {
        let identifier = bare_handle(id);
        info!(identifier, max_posts, "threads: fetching posts");

        let input = ThreadsScraperInput {
            usernames: vec![identifier.to_string()],
            max_posts,
        };
        let output = run_actor(
            self.runner.as_ref(),
            Platform::Threads,
            &self.actor,
            &input,
            max_posts,
            deadline,
        )
        .await?;
        let decoded = decode_run::<ThreadsPost>(Platform::Threads, output)?;
        let partial = decoded.partial();

        let followers = decoded
            .records
            .iter()
            .find_map(|p| p.author.as_ref().and_then(|a| count(a.follower_count)));
        let confirmed = !decoded.records.is_empty();

        let posts: Vec<Post> = decoded
            .records
            .into_iter()
            .filter_map(|p| to_post(p, identifier))
            .collect();

        info!(identifier, count = posts.len(), "threads: fetched posts");

        let profile = ProfileStats {
            followers,
            total_posts: None,
            confirmed,
        };
        Ok(FetchOutcome::new(posts, profile).with_partial(partial).truncated(max_posts))
    }
}

fn to_post(thread: ThreadsPost, handle: &str) -> Option<Post> {
    let id = thread.id.or_else(|| thread.code.clone())?;
    let mut post = Post::new(Platform::Threads, id);
    post.url = thread.url.or_else(|| {
        thread
            .code
            .as_ref()
            .map(|code| format!("https://www.threads.net/@{handle}/post/{code}"))
    });
    post.text = thread.text;
    post.published_at = thread.taken_at.and_then(|secs| DateTime::from_timestamp(secs, 0));
    post.likes = count(thread.like_count);
    post.reposts = sum_counts(thread.repost_count, thread.quote_count);
    post.replies = count(thread.reply_count);
    Some(post)
}
