use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes prepared HTTP requests. Decorators such as
/// [`ApiKey`](super::auth::ApiKey) wrap another client to add credentials.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
