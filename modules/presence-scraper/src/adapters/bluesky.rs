// BlueSky adapter: profile and author feed via the AT Protocol public API.
// No credentials needed. Feed pages are walked one cursor at a time.

use std::sync::Arc;

use async_trait::async_trait;
use presence_common::{CanonicalIdentifier, Platform, Post, ProfileStats, ScrapeError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{info, warn};
use url::Url;

use super::{deadline_error, parse_timestamp, sum_counts, FetchOutcome, PlatformAdapter};
use crate::fetcher::PageFetcher;

const PUBLIC_API: &str = "https://public.api.bsky.app/xrpc";
const MAX_PAGE_SIZE: u32 = 100;
const MAX_PAGES: usize = 20;

pub struct BlueskyAdapter {
    fetcher: Arc<dyn PageFetcher>,
}

impl BlueskyAdapter {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
        deadline: Instant,
    ) -> Result<T, ScrapeError> {
        let url = Url::parse_with_params(&format!("{PUBLIC_API}/{method}"), params)
            .map_err(|e| ScrapeError::unavailable(format!("Bad request URL: {e}")).on(Platform::Bluesky))?;

        let page = tokio::time::timeout_at(deadline, self.fetcher.fetch(url.as_str()))
            .await
            .map_err(|_| deadline_error(Platform::Bluesky))?
            .map_err(|e| ScrapeError::from(e).on(Platform::Bluesky))?;

        if !page.is_success() {
            return Err(ScrapeError::from_status(page.status, &page.body).on(Platform::Bluesky));
        }

        serde_json::from_str(&page.body).map_err(|e| {
            ScrapeError::unavailable(format!("Failed to parse {method} response: {e}")).on(Platform::Bluesky)
        })
    }
}

#[async_trait]
impl PlatformAdapter for BlueskyAdapter {
    fn platform(&self) -> Platform {
        Platform::Bluesky
    }

    async fn fetch_posts(
        &self,
        id: &CanonicalIdentifier,
        max_posts: u32,
        deadline: Instant,
    ) -> Result<FetchOutcome, ScrapeError> {
        let identifier = id.as_str();
        info!(identifier, max_posts, "bluesky: fetching posts");

        let profile: ProfileView = self
            .get("app.bsky.actor.getProfile", &[("actor", identifier)], deadline)
            .await?;
        let stats = ProfileStats {
            followers: profile.followers_count,
            total_posts: profile.posts_count,
            confirmed: true,
        };

        let mut posts = Vec::new();
        let mut cursor: Option<String> = None;
        let mut partial = None;

        for page_no in 0..MAX_PAGES {
            let remaining = max_posts.saturating_sub(posts.len() as u32);
            if remaining == 0 {
                break;
            }
            let limit = remaining.min(MAX_PAGE_SIZE).to_string();
            let mut params = vec![("actor", identifier), ("limit", limit.as_str())];
            if let Some(c) = cursor.as_deref() {
                params.push(("cursor", c));
            }

            let feed: AuthorFeed = match self.get("app.bsky.feed.getAuthorFeed", &params, deadline).await {
                Ok(feed) => feed,
                Err(e) if page_no == 0 => return Err(e),
                Err(e) => {
                    warn!(identifier, page = page_no, error = %e, "bluesky: feed page failed, keeping earlier pages");
                    partial = Some(
                        ScrapeError::partial(format!(
                            "Stopped after {} posts: {}",
                            posts.len(),
                            e.message
                        ))
                        .on(Platform::Bluesky),
                    );
                    break;
                }
            };

            if feed.feed.is_empty() {
                break;
            }
            // Reposts carry a `reason`; they are someone else's content.
            posts.extend(
                feed.feed
                    .into_iter()
                    .filter(|item| item.reason.is_none())
                    .map(|item| to_post(item.post, &profile.handle)),
            );

            match feed.cursor {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => break,
            }
        }

        info!(identifier, count = posts.len(), "bluesky: fetched posts");

        Ok(FetchOutcome::new(posts, stats).with_partial(partial).truncated(max_posts))
    }
}

fn to_post(view: PostView, handle: &str) -> Post {
    let rkey = view.uri.rsplit('/').next().unwrap_or_default().to_string();
    let mut post = Post::new(Platform::Bluesky, view.uri.as_str());
    post.url = Some(format!("https://bsky.app/profile/{handle}/post/{rkey}"));
    post.published_at = view
        .record
        .created_at
        .as_deref()
        .or(view.indexed_at.as_deref())
        .and_then(parse_timestamp);
    post.text = view.record.text;
    post.likes = view.like_count;
    post.reposts = sum_counts(view.repost_count, view.quote_count);
    post.replies = view.reply_count;
    post
}

// --- AT Protocol response types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileView {
    handle: String,
    followers_count: Option<u64>,
    posts_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AuthorFeed {
    feed: Vec<FeedItem>,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    post: PostView,
    reason: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostView {
    uri: String,
    record: PostRecord,
    indexed_at: Option<String>,
    like_count: Option<u64>,
    repost_count: Option<i64>,
    quote_count: Option<i64>,
    reply_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    text: Option<String>,
    created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_view_maps_to_post() {
        let view: PostView = serde_json::from_value(json!({
            "uri": "at://did:plc:abc/app.bsky.feed.post/3kxyz",
            "record": { "text": "hello", "createdAt": "2024-06-01T12:00:00.000Z" },
            "likeCount": 7,
            "repostCount": 2,
            "replyCount": 1
        }))
        .unwrap();
        let post = to_post(view, "someorg.bsky.social");
        assert_eq!(post.url.as_deref(), Some("https://bsky.app/profile/someorg.bsky.social/post/3kxyz"));
        assert_eq!(post.engagement(), Some(10));
        assert!(post.published_at.is_some());
    }

    #[test]
    fn feed_item_with_reason_is_a_repost() {
        let item: FeedItem = serde_json::from_value(json!({
            "post": { "uri": "at://x/app.bsky.feed.post/1", "record": {} },
            "reason": { "$type": "app.bsky.feed.defs#reasonRepost" }
        }))
        .unwrap();
        assert!(item.reason.is_some());
    }
}
