use std::fmt;

use serde::{Serialize, Serializer};

use crate::types::Platform;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Machine-checkable failure category. Every failure that crosses an adapter
/// or extractor boundary is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeErrorKind {
    /// Input does not match any known URL/handle shape for the platform. Not retried.
    UnrecognizedFormat,
    /// Valid shape, but the account does not exist (or is not public).
    IdentifierNotFound,
    /// Upstream throttled us. Retrying is the caller's decision.
    RateLimited,
    /// Transient transport or service fault, including timeouts.
    UpstreamUnavailable,
    /// Some posts were fetched, the rest could not be. Not fatal.
    PartialData,
    /// Upstream answered but returned no posts and no profile.
    NoData,
    /// The persistence collaborator failed to store the envelope.
    Storage,
}

impl ScrapeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnrecognizedFormat => "unrecognized_format",
            Self::IdentifierNotFound => "identifier_not_found",
            Self::RateLimited => "rate_limited",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::PartialData => "partial_data",
            Self::NoData => "no_data",
            Self::Storage => "storage",
        }
    }

    /// Whether the caller may usefully retry the whole invocation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::UpstreamUnavailable)
    }
}

impl fmt::Display for ScrapeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure with its kind, the platform it happened on (if any) and the
/// original message for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeError {
    pub kind: ScrapeErrorKind,
    pub platform: Option<Platform>,
    pub message: String,
}

impl ScrapeError {
    pub fn new(kind: ScrapeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            platform: None,
            message: message.into(),
        }
    }

    pub fn unrecognized(platform: Platform, input: &str) -> Self {
        Self::new(
            ScrapeErrorKind::UnrecognizedFormat,
            format!("'{input}' is not a recognized {} profile URL or handle", platform.display_name()),
        )
        .on(platform)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ScrapeErrorKind::IdentifierNotFound, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ScrapeErrorKind::RateLimited, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ScrapeErrorKind::UpstreamUnavailable, message)
    }

    pub fn partial(message: impl Into<String>) -> Self {
        Self::new(ScrapeErrorKind::PartialData, message)
    }

    /// Attach the platform tag. Keeps an existing tag.
    pub fn on(mut self, platform: Platform) -> Self {
        self.platform.get_or_insert(platform);
        self
    }

    /// Classify an HTTP status from an upstream API.
    pub fn from_status(status: u16, body: &str) -> Self {
        let snippet: String = body.chars().take(200).collect();
        match status {
            429 => Self::rate_limited(format!("HTTP 429: {snippet}")),
            404 | 410 => Self::not_found(format!("HTTP {status}: {snippet}")),
            400 if mentions_missing_account(body) => {
                Self::not_found(format!("HTTP 400: {snippet}"))
            }
            _ => Self::unavailable(format!("HTTP {status}: {snippet}")),
        }
    }
}

/// Heuristic for upstream messages that mean "this account doesn't exist".
pub fn mentions_missing_account(text: &str) -> bool {
    let lower = text.to_lowercase();
    [
        "not found",
        "not_found",
        "notfound",
        "does not exist",
        "doesn't exist",
        "no such user",
        "user not found",
        "profile not found",
        "page not found",
        "private",
        "suspended",
    ]
    .iter()
    .any(|needle| lower.contains(needle))
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.platform {
            Some(p) => write!(f, "[{}] {}: {}", self.kind, p, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ScrapeError {}

/// Envelopes carry errors as human-readable strings.
impl Serialize for ScrapeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_is_rate_limited() {
        let err = ScrapeError::from_status(429, "slow down");
        assert_eq!(err.kind, ScrapeErrorKind::RateLimited);
        assert!(err.kind.is_retryable());
    }

    #[test]
    fn status_404_is_not_found() {
        assert_eq!(
            ScrapeError::from_status(404, "").kind,
            ScrapeErrorKind::IdentifierNotFound
        );
    }

    #[test]
    fn bad_request_with_missing_profile_is_not_found() {
        let body = r#"{"error":"InvalidRequest","message":"Profile not found"}"#;
        assert_eq!(
            ScrapeError::from_status(400, body).kind,
            ScrapeErrorKind::IdentifierNotFound
        );
    }

    #[test]
    fn server_errors_are_unavailable() {
        assert_eq!(
            ScrapeError::from_status(503, "maintenance").kind,
            ScrapeErrorKind::UpstreamUnavailable
        );
    }

    #[test]
    fn display_includes_kind_and_platform() {
        let err = ScrapeError::rate_limited("HTTP 429").on(Platform::Instagram);
        assert_eq!(err.to_string(), "[rate_limited] instagram: HTTP 429");
    }

    #[test]
    fn on_keeps_existing_platform() {
        let err = ScrapeError::partial("x")
            .on(Platform::TikTok)
            .on(Platform::YouTube);
        assert_eq!(err.platform, Some(Platform::TikTok));
    }

    #[test]
    fn serializes_as_message_string() {
        let err = ScrapeError::not_found("gone").on(Platform::Bluesky);
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#""[identifier_not_found] bluesky: gone""#);
    }
}
