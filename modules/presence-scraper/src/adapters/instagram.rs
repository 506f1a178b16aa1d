// Instagram adapter: follower counts from the profile scraper, then recent
// posts from the post scraper.

use std::sync::Arc;

use apify_client::{actors, InstagramPost, InstagramProfile, InstagramProfileInput, InstagramScraperInput};
use async_trait::async_trait;
use presence_common::config::ActorOverrides;
use presence_common::{CanonicalIdentifier, Platform, Post, ProfileStats, ScrapeError, ScrapeErrorKind};
use tokio::time::Instant;
use tracing::{info, warn};

use super::{count, decode_run, merge_partial, run_actor, FetchOutcome, PlatformAdapter};
use crate::runner::ActorRunner;

pub struct InstagramAdapter {
    runner: Arc<dyn ActorRunner>,
    posts_actor: String,
    profile_actor: String,
}

impl InstagramAdapter {
    pub fn new(runner: Arc<dyn ActorRunner>) -> Self {
        Self {
            runner,
            posts_actor: actors::INSTAGRAM_POSTS.to_string(),
            profile_actor: actors::INSTAGRAM_PROFILE.to_string(),
        }
    }

    pub fn configured(mut self, actors: &ActorOverrides) -> Self {
        if let Some(actor) = &actors.instagram_posts {
            self.posts_actor = actor.clone();
        }
        if let Some(actor) = &actors.instagram_profile {
            self.profile_actor = actor.clone();
        }
        self
    }

    /// Profile counters. A missing or private account ends the scrape; any
    /// other failure only costs us the follower count.
    async fn fetch_profile(
        &self,
        username: &str,
        deadline: Instant,
    ) -> Result<(ProfileStats, Option<ScrapeError>), ScrapeError> {
        let input = InstagramProfileInput {
            usernames: vec![username.to_string()],
        };
        let decoded = run_actor(
            self.runner.as_ref(),
            Platform::Instagram,
            &self.profile_actor,
            &input,
            1,
            deadline,
        )
        .await
        .and_then(|output| decode_run::<InstagramProfile>(Platform::Instagram, output));

        match decoded {
            Ok(decoded) => {
                let Some(profile) = decoded.records.first() else {
                    let note = ScrapeError::partial("Profile lookup returned no data").on(Platform::Instagram);
                    return Ok((ProfileStats::default(), Some(note)));
                };
                if profile.private == Some(true) {
                    return Err(ScrapeError::not_found(format!("@{username} is private")).on(Platform::Instagram));
                }
                let stats = ProfileStats {
                    followers: count(profile.followers_count),
                    total_posts: count(profile.posts_count),
                    confirmed: true,
                };
                Ok((stats, decoded.partial()))
            }
            Err(e) if e.kind == ScrapeErrorKind::IdentifierNotFound => Err(e),
            Err(e) => {
                warn!(username, error = %e, "instagram: profile lookup failed, continuing without followers");
                let note = ScrapeError::partial(format!("Profile lookup failed: {}", e.message)).on(Platform::Instagram);
                Ok((ProfileStats::default(), Some(note)))
            }
        }
    }
}

#[async_trait]
impl PlatformAdapter for InstagramAdapter {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn fetch_posts(
        &self,
        id: &CanonicalIdentifier,
        max_posts: u32,
        deadline: Instant,
    ) -> Result<FetchOutcome, ScrapeError> {
        let identifier = id.as_str();
        info!(identifier, max_posts, "instagram: fetching posts");

        let (mut profile, profile_note) = self.fetch_profile(identifier, deadline).await?;

        let input = InstagramScraperInput {
            username: vec![identifier.to_string()],
            results_limit: max_posts,
        };
        let output = run_actor(
            self.runner.as_ref(),
            Platform::Instagram,
            &self.posts_actor,
            &input,
            max_posts,
            deadline,
        )
        .await?;
        let decoded = decode_run::<InstagramPost>(Platform::Instagram, output)?;
        let partial = merge_partial(profile_note, decoded.partial());

        let posts: Vec<Post> = decoded.records.into_iter().filter_map(to_post).collect();
        profile.confirmed |= !posts.is_empty();

        info!(identifier, count = posts.len(), "instagram: fetched posts");

        Ok(FetchOutcome::new(posts, profile).with_partial(partial).truncated(max_posts))
    }
}

fn to_post(item: InstagramPost) -> Option<Post> {
    let id = item.id.or_else(|| item.short_code.clone())?;
    let mut post = Post::new(Platform::Instagram, id);
    post.url = item.url.or_else(|| {
        item.short_code
            .as_ref()
            .map(|code| format!("https://www.instagram.com/p/{code}/"))
    });
    post.text = item.caption;
    post.published_at = item.timestamp;
    post.likes = count(item.likes_count);
    post.replies = count(item.comments_count);
    post.views = count(item.video_view_count);
    Some(post)
}
