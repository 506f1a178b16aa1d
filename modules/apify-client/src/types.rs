use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// A start URL entry for actors that take `startUrls`.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// Some actors emit an item like `{"error": "...", "errorDescription": "..."}`
/// instead of failing the run.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemError {
    pub error: String,
    #[serde(rename = "errorDescription")]
    pub error_description: Option<String>,
}

impl ItemError {
    /// Parse an error item. Regular items yield `None`.
    pub fn from_item(item: &serde_json::Value) -> Option<Self> {
        item.get("error")?;
        serde_json::from_value(item.clone()).ok()
    }

    pub fn describe(&self) -> String {
        match &self.error_description {
            Some(desc) => format!("{}: {}", self.error, desc),
            None => self.error.clone(),
        }
    }
}

// --- Instagram ---

/// Input for the apify/instagram-post-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramScraperInput {
    pub username: Vec<String>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// Input for the apify/instagram-profile-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramProfileInput {
    pub usernames: Vec<String>,
}

/// A single Instagram post from the Apify dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramPost {
    pub id: Option<String>,
    #[serde(rename = "shortCode")]
    pub short_code: Option<String>,
    pub caption: Option<String>,
    #[serde(rename = "ownerUsername")]
    pub owner_username: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "likesCount")]
    pub likes_count: Option<i64>,
    #[serde(rename = "commentsCount")]
    pub comments_count: Option<i64>,
    #[serde(rename = "videoViewCount")]
    pub video_view_count: Option<i64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Profile counters from the instagram-profile-scraper actor.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramProfile {
    pub username: Option<String>,
    #[serde(rename = "followersCount")]
    pub followers_count: Option<i64>,
    #[serde(rename = "postsCount")]
    pub posts_count: Option<i64>,
    pub private: Option<bool>,
}

// --- Facebook ---

/// Input for the apify/facebook-posts-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookScraperInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// Input for the apify/facebook-pages-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookPagesInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
}

/// A single Facebook post from the Apify dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookPost {
    #[serde(rename = "postId")]
    pub post_id: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub time: Option<String>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub shares: Option<i64>,
    #[serde(rename = "viewsCount")]
    pub views_count: Option<i64>,
}

/// Page counters from the facebook-pages-scraper actor.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookPage {
    pub title: Option<String>,
    #[serde(rename = "pageUrl")]
    pub page_url: Option<String>,
    pub followers: Option<i64>,
    pub likes: Option<i64>,
}

// --- X/Twitter ---

/// Input for the apidojo/tweet-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct TweetScraperInput {
    #[serde(rename = "twitterHandles")]
    pub twitter_handles: Vec<String>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
    pub sort: String,
}

/// Author info nested inside a Tweet.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetAuthor {
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    pub followers: Option<i64>,
}

/// A single tweet from the Apify dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "fullText")]
    pub full_text: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    pub author: Option<TweetAuthor>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<i64>,
    #[serde(rename = "retweetCount")]
    pub retweet_count: Option<i64>,
    #[serde(rename = "quoteCount")]
    pub quote_count: Option<i64>,
    #[serde(rename = "replyCount")]
    pub reply_count: Option<i64>,
    #[serde(rename = "viewCount")]
    pub view_count: Option<i64>,
    #[serde(rename = "isRetweet")]
    pub is_retweet: Option<bool>,
}

impl Tweet {
    /// Returns whichever text field is populated, preferring `fullText`.
    pub fn content(&self) -> Option<&str> {
        self.full_text.as_deref().or(self.text.as_deref())
    }
}

// --- TikTok ---

/// Input for the clockworks/tiktok-scraper actor (profile-based).
#[derive(Debug, Clone, Serialize)]
pub struct TikTokScraperInput {
    pub profiles: Vec<String>,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
}

/// Author metadata from a TikTok post.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokAuthor {
    pub name: Option<String>,
    pub fans: Option<i64>,
}

/// A single TikTok video from the Apify dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokPost {
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "webVideoUrl")]
    pub web_video_url: Option<String>,
    #[serde(rename = "createTimeISO")]
    pub create_time_iso: Option<String>,
    #[serde(rename = "authorMeta")]
    pub author_meta: Option<TikTokAuthor>,
    #[serde(rename = "diggCount")]
    pub digg_count: Option<i64>,
    #[serde(rename = "shareCount")]
    pub share_count: Option<i64>,
    #[serde(rename = "playCount")]
    pub play_count: Option<i64>,
    #[serde(rename = "commentCount")]
    pub comment_count: Option<i64>,
}

// --- Threads ---

/// Input for the Threads profile scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadsScraperInput {
    pub usernames: Vec<String>,
    #[serde(rename = "maxPosts")]
    pub max_posts: u32,
}

/// Author info nested inside a Threads post.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadsAuthor {
    pub username: Option<String>,
    #[serde(rename = "followerCount")]
    pub follower_count: Option<i64>,
}

/// A single Threads post from the Apify dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadsPost {
    pub id: Option<String>,
    pub code: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    /// Unix seconds.
    #[serde(rename = "takenAt")]
    pub taken_at: Option<i64>,
    pub author: Option<ThreadsAuthor>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<i64>,
    #[serde(rename = "replyCount")]
    pub reply_count: Option<i64>,
    #[serde(rename = "repostCount")]
    pub repost_count: Option<i64>,
    #[serde(rename = "quoteCount")]
    pub quote_count: Option<i64>,
}

// --- YouTube ---

/// Input for the streamers/youtube-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct YouTubeScraperInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
    #[serde(rename = "maxResultsShorts")]
    pub max_results_shorts: u32,
    #[serde(rename = "maxResultStreams")]
    pub max_result_streams: u32,
}

/// A single YouTube video from the Apify dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeVideo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "viewCount")]
    pub view_count: Option<i64>,
    pub likes: Option<i64>,
    #[serde(rename = "commentsCount")]
    pub comments_count: Option<i64>,
    #[serde(rename = "numberOfSubscribers")]
    pub number_of_subscribers: Option<i64>,
    #[serde(rename = "channelUrl")]
    pub channel_url: Option<String>,
}
