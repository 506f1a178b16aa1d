// Persistence collaborator: hands each finished envelope to storage and
// gets back an opaque location string.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use presence_common::{Post, ScrapeError, ScrapeErrorKind, ScrapeResult};
use serde::Serialize;
use tracing::debug;

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist one envelope. Returns where it was stored.
    async fn save(&self, grantee: &str, result: &ScrapeResult) -> Result<String, ScrapeError>;
}

/// Writes `<root>/<grantee-slug>/<platform>_<UTC timestamp>.json`.
pub struct JsonFileStore {
    root: PathBuf,
}

#[derive(Serialize)]
struct StoredResult<'a> {
    grantee: &'a str,
    saved_at: String,
    #[serde(flatten)]
    result: &'a ScrapeResult,
    posts: &'a [Post],
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResultStore for JsonFileStore {
    async fn save(&self, grantee: &str, result: &ScrapeResult) -> Result<String, ScrapeError> {
        let now = Utc::now();
        let platform = result.platform.map(|p| p.as_str()).unwrap_or("unknown");
        let dir = self.root.join(slugify(grantee));
        let path = dir.join(format!("{platform}_{}.json", now.format("%Y%m%dT%H%M%S%.3fZ")));

        let stored = StoredResult {
            grantee,
            saved_at: now.to_rfc3339(),
            result,
            posts: &result.posts,
        };
        let json = serde_json::to_vec_pretty(&stored).map_err(storage_error)?;

        tokio::fs::create_dir_all(&dir).await.map_err(storage_error)?;
        tokio::fs::write(&path, json).await.map_err(storage_error)?;

        debug!(path = %path.display(), "Stored scrape result");
        Ok(path.display().to_string())
    }
}

fn storage_error(e: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::new(ScrapeErrorKind::Storage, format!("Failed to store result: {e}"))
}

/// Filesystem-safe lowercase slug. Empty names become "unnamed".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug.to_string()
    }
}
