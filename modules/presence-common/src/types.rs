use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

// --- Platforms ---

/// The social platforms we know how to resolve and scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Bluesky,
    TikTok,
    YouTube,
    Twitter,
    Instagram,
    Facebook,
    Threads,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Bluesky,
        Platform::TikTok,
        Platform::YouTube,
        Platform::Twitter,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Threads,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bluesky => "bluesky",
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Threads => "threads",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bluesky => "BlueSky",
            Self::TikTok => "TikTok",
            Self::YouTube => "YouTube",
            Self::Twitter => "X/Twitter",
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
            Self::Threads => "Threads",
        }
    }

    /// Hostnames (without `www.`/`m.` prefixes) that belong to this platform.
    pub fn hosts(&self) -> &'static [&'static str] {
        match self {
            Self::Bluesky => &["bsky.app"],
            Self::TikTok => &["tiktok.com"],
            Self::YouTube => &["youtube.com"],
            Self::Twitter => &["twitter.com", "x.com"],
            Self::Instagram => &["instagram.com", "instagr.am"],
            Self::Facebook => &["facebook.com", "fb.com"],
            Self::Threads => &["threads.net", "threads.com"],
        }
    }

    /// Which platform a hostname belongs to, if any.
    /// Accepts `www.`, `m.`, `mobile.` and other subdomains.
    pub fn from_host(host: &str) -> Option<Platform> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| {
            p.hosts()
                .iter()
                .any(|h| host == *h || host.ends_with(&format!(".{h}")))
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bluesky" | "bsky" => Ok(Self::Bluesky),
            "tiktok" => Ok(Self::TikTok),
            "youtube" | "yt" => Ok(Self::YouTube),
            "twitter" | "x" => Ok(Self::Twitter),
            "instagram" | "ig" => Ok(Self::Instagram),
            "facebook" | "fb" => Ok(Self::Facebook),
            "threads" => Ok(Self::Threads),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

// --- Identifiers ---

/// A normalized account reference. Two identifiers are equal when platform
/// and normalized value match; the raw input is kept for diagnostics only.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalIdentifier {
    pub platform: Platform,
    pub value: String,
    pub raw: String,
}

impl CanonicalIdentifier {
    pub fn new(platform: Platform, value: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            platform,
            value: value.into(),
            raw: raw.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl PartialEq for CanonicalIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.platform == other.platform && self.value == other.value
    }
}

impl Eq for CanonicalIdentifier {}

impl Hash for CanonicalIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.platform.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Display for CanonicalIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform, self.value)
    }
}

// --- Link discovery ---

/// Where on a page a platform link was found. Lower rank wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    /// `<meta>`/`<link>` tags and JSON-LD `sameAs`.
    Metadata,
    /// Anchors inside `<nav>` or `<header>`.
    Navigation,
    /// Anchors inside `<footer>` or a "social" container.
    Footer,
    /// Any other anchor.
    Body,
}

/// A platform link discovered on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformLink {
    pub platform: Platform,
    pub url: String,
    pub source: LinkSource,
}

// --- Posts & profiles ---

/// One post with its raw engagement counts. Counts the platform does not
/// offer stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub platform: Platform,
    pub id: String,
    pub published_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub likes: Option<u64>,
    pub reposts: Option<u64>,
    pub replies: Option<u64>,
    pub views: Option<u64>,
}

impl Post {
    pub fn new(platform: Platform, id: impl Into<String>) -> Self {
        Self {
            platform,
            id: id.into(),
            published_at: None,
            url: None,
            text: None,
            likes: None,
            reposts: None,
            replies: None,
            views: None,
        }
    }

    /// likes + reposts + replies over whichever counts are reported.
    /// `None` if the post reports none of them.
    pub fn engagement(&self) -> Option<u64> {
        let counts = [self.likes, self.reposts, self.replies];
        if counts.iter().all(Option::is_none) {
            return None;
        }
        Some(counts.iter().flatten().copied().fold(0u64, u64::saturating_add))
    }
}

/// Profile-level counters returned alongside posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub followers: Option<u64>,
    pub total_posts: Option<u64>,
    /// Upstream confirmed the account exists, independent of post count.
    pub confirmed: bool,
}

impl ProfileStats {
    pub fn confirmed_with_followers(followers: Option<u64>) -> Self {
        Self {
            followers,
            total_posts: None,
            confirmed: true,
        }
    }
}

// --- Envelope ---

/// Uniform engagement aggregate for one platform scrape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub followers_count: u64,
    pub total_likes: u64,
    pub total_reposts: u64,
    pub total_replies: u64,
    pub posts_considered: usize,
    pub avg_engagement_rate: f64,
}

/// The result envelope of one scrape invocation. Always well-formed,
/// regardless of how the scrape went.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult {
    pub success: bool,
    pub platform: Option<Platform>,
    pub identifier: Option<String>,
    pub posts_downloaded: usize,
    pub output_path: Option<String>,
    pub engagement_metrics: EngagementMetrics,
    pub errors: Vec<ScrapeError>,
    #[serde(skip)]
    pub posts: Vec<Post>,
}

impl ScrapeResult {
    /// A failed envelope with zeroed metrics.
    pub fn failed(platform: Option<Platform>, errors: Vec<ScrapeError>) -> Self {
        Self {
            success: false,
            platform,
            identifier: None,
            posts_downloaded: 0,
            output_path: None,
            engagement_metrics: EngagementMetrics::default(),
            errors,
            posts: Vec::new(),
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}
