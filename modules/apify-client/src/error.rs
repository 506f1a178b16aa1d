use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

#[derive(Debug, Clone, Error)]
pub enum ApifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited by Apify: {0}")]
    RateLimited(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Run {run_id} ended with status {status} and produced no items")]
    RunFailed { run_id: String, status: String },
}

impl ApifyError {
    /// Build the error for a non-success HTTP response.
    pub fn from_response(status: u16, message: String) -> Self {
        if status == 429 {
            ApifyError::RateLimited(message)
        } else {
            ApifyError::Api { status, message }
        }
    }
}

impl From<reqwest::Error> for ApifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApifyError::Timeout(err.to_string())
        } else {
            ApifyError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApifyError {
    fn from(err: serde_json::Error) -> Self {
        ApifyError::Parse(err.to_string())
    }
}
