use crate::errors::FetchError;
use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends a bearer token on every request.
pub struct ApiKey<C> {
    inner: C,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Wraps `inner` so requests carry `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Config`] if the token is empty or contains
    /// characters not allowed in a header.
    pub fn bearer(inner: C, token: &str) -> Result<Self, FetchError> {
        if token.trim().is_empty() {
            return Err(FetchError::Config("bearer token is empty".to_string()));
        }
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| FetchError::Config(format!("invalid bearer token: {e}")))?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}
