//! Error types shared by the ingestion, analysis and acquisition layers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaterError {
    #[error("Malformed input{}: {reason}", at_row(.row))]
    MalformedInput { row: Option<usize>, reason: String },

    #[error("Tokenizer unavailable: {0}")]
    TokenizerUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RaterError {
    pub fn malformed(row: Option<usize>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            row,
            reason: reason.into(),
        }
    }
}

/// Failures raised while pulling posts from the remote timeline API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Timeouts, dropped connections, rate limiting and 5xx responses.
    /// The caller may retry the same request.
    #[error("Transient network failure: {0}")]
    Transient(String),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected API payload: {0}")]
    Decode(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            FetchError::Transient(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Api {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            FetchError::Transient(err.to_string())
        }
    }
}

fn at_row(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {r}")).unwrap_or_default()
}

pub type Result<T, E = RaterError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_includes_row() {
        let err = RaterError::malformed(Some(3), "like_count is negative");
        assert_eq!(
            err.to_string(),
            "Malformed input at row 3: like_count is negative"
        );
    }

    #[test]
    fn test_malformed_message_without_row() {
        let err = RaterError::malformed(None, "missing column `body`");
        assert_eq!(err.to_string(), "Malformed input: missing column `body`");
    }

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(FetchError::Transient("timeout".into()).is_transient());
        assert!(
            !FetchError::Api {
                status: 401,
                body: "unauthorized".into()
            }
            .is_transient()
        );
        assert!(!FetchError::NotFound("nobody".into()).is_transient());
    }
}
