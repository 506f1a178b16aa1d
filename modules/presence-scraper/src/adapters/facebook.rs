// Facebook adapter: page follower counts from the pages scraper, then recent
// posts from the posts scraper.

use std::sync::Arc;

use apify_client::{actors, FacebookPage, FacebookPagesInput, FacebookPost, FacebookScraperInput, StartUrl};
use async_trait::async_trait;
use presence_common::config::ActorOverrides;
use presence_common::{CanonicalIdentifier, Platform, Post, ProfileStats, ScrapeError, ScrapeErrorKind};
use tokio::time::Instant;
use tracing::{info, warn};

use super::{count, decode_run, merge_partial, parse_timestamp, run_actor, FetchOutcome, PlatformAdapter};
use crate::identifier::profile_url;
use crate::runner::ActorRunner;

pub struct FacebookAdapter {
    runner: Arc<dyn ActorRunner>,
    posts_actor: String,
    pages_actor: String,
}

impl FacebookAdapter {
    pub fn new(runner: Arc<dyn ActorRunner>) -> Self {
        Self {
            runner,
            posts_actor: actors::FACEBOOK_POSTS.to_string(),
            pages_actor: actors::FACEBOOK_PAGES.to_string(),
        }
    }

    pub fn configured(mut self, actors: &ActorOverrides) -> Self {
        if let Some(actor) = &actors.facebook_posts {
            self.posts_actor = actor.clone();
        }
        if let Some(actor) = &actors.facebook_pages {
            self.pages_actor = actor.clone();
        }
        self
    }

    async fn fetch_page(
        &self,
        url: &str,
        deadline: Instant,
    ) -> Result<(ProfileStats, Option<ScrapeError>), ScrapeError> {
        let input = FacebookPagesInput {
            start_urls: vec![StartUrl { url: url.to_string() }],
        };
        let decoded = run_actor(
            self.runner.as_ref(),
            Platform::Facebook,
            &self.pages_actor,
            &input,
            1,
            deadline,
        )
        .await
        .and_then(|output| decode_run::<FacebookPage>(Platform::Facebook, output));

        match decoded {
            Ok(decoded) => {
                let Some(page) = decoded.records.first() else {
                    let note = ScrapeError::partial("Page lookup returned no data").on(Platform::Facebook);
                    return Ok((ProfileStats::default(), Some(note)));
                };
                // Pages without a follower count report likes instead.
                let stats = ProfileStats::confirmed_with_followers(count(page.followers).or(count(page.likes)));
                Ok((stats, decoded.partial()))
            }
            Err(e) if e.kind == ScrapeErrorKind::IdentifierNotFound => Err(e),
            Err(e) => {
                warn!(url, error = %e, "facebook: page lookup failed, continuing without followers");
                let note = ScrapeError::partial(format!("Page lookup failed: {}", e.message)).on(Platform::Facebook);
                Ok((ProfileStats::default(), Some(note)))
            }
        }
    }
}

#[async_trait]
impl PlatformAdapter for FacebookAdapter {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn fetch_posts(
        &self,
        id: &CanonicalIdentifier,
        max_posts: u32,
        deadline: Instant,
    ) -> Result<FetchOutcome, ScrapeError> {
        let identifier = id.as_str();
        let url = profile_url(id);
        info!(identifier, max_posts, "facebook: fetching posts");

        let (mut profile, page_note) = self.fetch_page(&url, deadline).await?;

        let input = FacebookScraperInput {
            start_urls: vec![StartUrl { url }],
            results_limit: max_posts,
        };
        let output = run_actor(
            self.runner.as_ref(),
            Platform::Facebook,
            &self.posts_actor,
            &input,
            max_posts,
            deadline,
        )
        .await?;
        let decoded = decode_run::<FacebookPost>(Platform::Facebook, output)?;
        let partial = merge_partial(page_note, decoded.partial());

        let posts: Vec<Post> = decoded.records.into_iter().filter_map(to_post).collect();
        profile.confirmed |= !posts.is_empty();

        info!(identifier, count = posts.len(), "facebook: fetched posts");

        Ok(FetchOutcome::new(posts, profile).with_partial(partial).truncated(max_posts))
    }
}

fn to_post(item: FacebookPost) -> Option<Post> {
    let id = item.post_id.or_else(|| item.url.clone())?;
    let mut post = Post::new(Platform::Facebook, id);
    post.url = item.url;
    post.text = item.text;
    post.published_at = item.time.as_deref().and_then(parse_timestamp);
    post.likes = count(item.likes);
    post.reposts = count(item.shares);
    post.replies = count(item.comments);
    post.views = count(item.views_count);
    Some(post)
}
