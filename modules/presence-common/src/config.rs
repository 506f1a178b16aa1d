use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

pub const DEFAULT_MAX_POSTS: u32 = 20;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PLATFORM_TIMEOUT_SECS: u64 = 300;
const DEFAULT_CONCURRENCY: usize = 4;

/// Per-actor overrides for the Apify-backed platforms. `None` keeps the
/// client's built-in actor.
#[derive(Debug, Clone, Default)]
pub struct ActorOverrides {
    pub instagram_posts: Option<String>,
    pub instagram_profile: Option<String>,
    pub facebook_posts: Option<String>,
    pub facebook_pages: Option<String>,
    pub tweets: Option<String>,
    pub tiktok: Option<String>,
    pub threads: Option<String>,
    pub youtube: Option<String>,
}

/// Application configuration loaded from environment variables.
/// Read-only once built; shared by every scrape in a batch.
#[derive(Debug, Clone)]
pub struct Config {
    pub apify_api_token: Option<String>,
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,

    pub default_max_posts: u32,
    pub fetch_timeout: Duration,
    pub platform_timeout: Duration,
    pub concurrency: usize,
    pub output_dir: PathBuf,

    pub actors: ActorOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apify_api_token: None,
            browserless_url: None,
            browserless_token: None,
            default_max_posts: DEFAULT_MAX_POSTS,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            platform_timeout: Duration::from_secs(DEFAULT_PLATFORM_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            output_dir: PathBuf::from("output"),
            actors: ActorOverrides::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Every variable is
    /// optional; malformed numbers fall back to defaults with a warning.
    pub fn from_env() -> Self {
        Self {
            apify_api_token: optional_env("APIFY_API_TOKEN"),
            browserless_url: optional_env("BROWSERLESS_URL"),
            browserless_token: optional_env("BROWSERLESS_TOKEN"),
            default_max_posts: parsed_env("PRESENCE_MAX_POSTS", DEFAULT_MAX_POSTS).max(1),
            fetch_timeout: Duration::from_secs(parsed_env(
                "PRESENCE_FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )),
            platform_timeout: Duration::from_secs(parsed_env(
                "PRESENCE_PLATFORM_TIMEOUT_SECS",
                DEFAULT_PLATFORM_TIMEOUT_SECS,
            )),
            concurrency: parsed_env("PRESENCE_CONCURRENCY", DEFAULT_CONCURRENCY).max(1),
            output_dir: optional_env("PRESENCE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output")),
            actors: ActorOverrides {
                instagram_posts: optional_env("APIFY_INSTAGRAM_POSTS_ACTOR"),
                instagram_profile: optional_env("APIFY_INSTAGRAM_PROFILE_ACTOR"),
                facebook_posts: optional_env("APIFY_FACEBOOK_POSTS_ACTOR"),
                facebook_pages: optional_env("APIFY_FACEBOOK_PAGES_ACTOR"),
                tweets: optional_env("APIFY_TWEETS_ACTOR"),
                tiktok: optional_env("APIFY_TIKTOK_ACTOR"),
                threads: optional_env("APIFY_THREADS_ACTOR"),
                youtube: optional_env("APIFY_YOUTUBE_ACTOR"),
            },
        }
    }

    /// Log the effective configuration without credentials.
    pub fn log_redacted(&self) {
        info!(
            apify_api_token = redact(&self.apify_api_token),
            browserless_url = self.browserless_url.as_deref().unwrap_or("[unset]"),
            browserless_token = redact(&self.browserless_token),
            default_max_posts = self.default_max_posts,
            fetch_timeout_secs = self.fetch_timeout.as_secs(),
            platform_timeout_secs = self.platform_timeout.as_secs(),
            concurrency = self.concurrency,
            output_dir = %self.output_dir.display(),
            "Configuration loaded"
        );
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    if secret.is_some() {
        "[set]"
    } else {
        "[unset]"
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_env<T: FromStr + Copy>(key: &str, default: T) -> T {
    match optional_env(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid value, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.default_max_posts, 20);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert!(config.concurrency >= 1);
        assert!(config.apify_api_token.is_none());
    }

    #[test]
    fn redact_hides_values() {
        assert_eq!(redact(&Some("secret".into())), "[set]");
        assert_eq!(redact(&None), "[unset]");
    }
}
