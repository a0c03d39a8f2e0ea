mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::FetchError;

/// Maps a non-success status to a [`FetchError`]. Rate limiting and server
/// errors are transient; anything else is returned as an API error.
pub fn classify_status(status: StatusCode, body: String) -> FetchError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        FetchError::Transient(format!("status {}: {}", status.as_u16(), body))
    } else {
        FetchError::Api {
            status: status.as_u16(),
            body,
        }
    }
}

/// Issues a GET for `url` and decodes the JSON body.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: reqwest::Url,
) -> Result<T, FetchError> {
    debug!(%url, "GET");
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(classify_status(status, body));
    }

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
}
