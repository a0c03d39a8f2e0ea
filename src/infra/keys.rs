use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// API credentials as saved locally by the user:
/// ```json
/// {
///   "consumer_key": "ABC123",
///   "consumer_secret": "DEF456",
///   "access_token": "GHI789",
///   "access_token_secret": "JKL101112",
///   "bearer_token": "MNO131415"
/// }
/// ```
/// Only `bearer_token` is needed for the read-only timeline endpoints; the
/// other keys are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct ApiCredentials {
    pub bearer_token: String,
}

impl ApiCredentials {
    /// Loads credentials from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read credentials file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid credentials file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Uses the credentials file when given, otherwise `TWITTER_BEARER_TOKEN`.
    pub fn resolve_bearer(path: Option<&str>) -> Result<String> {
        if let Some(path) = path {
            return Ok(Self::load(path)?.bearer_token);
        }
        match std::env::var("TWITTER_BEARER_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => bail!("no credentials file given and TWITTER_BEARER_TOKEN is not set"),
        }
    }
}
