//! Trait and pagination loop for pulling a user's posts from a timeline API.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::FetchError;
use crate::post::PostRecord;

/// Smallest accepted value for a user-requested post count.
pub const MIN_RESULTS: usize = 10;
/// Largest accepted value for a user-requested post count.
pub const MAX_RESULTS: usize = 1000;
/// Page size bounds imposed by the timeline endpoint.
pub const MIN_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 100;

/// One page of posts and the cursor for the next, if any.
#[derive(Debug, Clone, Default)]
pub struct TimelinePage {
    pub posts: Vec<PostRecord>,
    pub next_cursor: Option<String>,
}

/// Abstraction over a timeline provider (e.g., the Twitter v2 API).
#[async_trait]
pub trait TimelineApi: Send + Sync {
    /// Resolves a screen name to the provider's user id.
    async fn lookup_user_id(&self, username: &str) -> Result<String, FetchError>;

    /// Fetches up to `page_size` of the user's own posts (no reposts or
    /// replies), starting at `cursor`.
    async fn fetch_page(
        &self,
        user_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<TimelinePage, FetchError>;
}

/// Checks a requested post count against [`MIN_RESULTS`]..=[`MAX_RESULTS`].
pub fn validate_max_results(max_results: usize) -> Result<usize, FetchError> {
    if (MIN_RESULTS..=MAX_RESULTS).contains(&max_results) {
        Ok(max_results)
    } else {
        Err(FetchError::Config(format!(
            "max results must be between {MIN_RESULTS} and {MAX_RESULTS}, got {max_results}"
        )))
    }
}

fn page_size_for(remaining: usize) -> usize {
    remaining.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Walks the user's timeline page by page until `max_results` posts are
/// collected or the provider has no further pages.
///
/// Errors from any page abort the walk and are returned unchanged, so a
/// [`FetchError::Transient`] can be retried by the caller.
#[tracing::instrument(skip(api))]
pub async fn fetch_timeline<A: TimelineApi + ?Sized>(
    api: &A,
    username: &str,
    max_results: usize,
) -> Result<Vec<PostRecord>, FetchError> {
    let max_results = validate_max_results(max_results)?;
    let user_id = api.lookup_user_id(username).await?;
    debug!(%user_id, "User resolved");

    let mut posts = Vec::with_capacity(max_results);
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    while posts.len() < max_results {
        let page_size = page_size_for(max_results - posts.len());
        let page = api
            .fetch_page(&user_id, cursor.as_deref(), page_size)
            .await?;
        pages += 1;

        debug!(page = pages, received = page.posts.len(), "Timeline page fetched");
        posts.extend(page.posts);

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    posts.truncate(max_results);
    info!(pages, collected = posts.len(), "Timeline fetched");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    /// Serves `total` numbered posts from memory, honoring page size and cursor.
    struct MemoryTimeline {
        total: usize,
        requests: Mutex<Vec<(Option<String>, usize)>>,
        fail_on_page: Option<usize>,
    }

    impl MemoryTimeline {
        fn new(total: usize) -> Self {
            Self {
                total,
                requests: Mutex::new(Vec::new()),
                fail_on_page: None,
            }
        }
    }

    #[async_trait]
    impl TimelineApi for MemoryTimeline {
        async fn lookup_user_id(&self, username: &str) -> Result<String, FetchError> {
            if username == "ghost" {
                return Err(FetchError::NotFound(username.to_string()));
            }
            Ok("42".to_string())
        }

        async fn fetch_page(
            &self,
            user_id: &str,
            cursor: Option<&str>,
            page_size: usize,
        ) -> Result<TimelinePage, FetchError> {
            assert_eq!(user_id, "42");
            let mut requests = self.requests.lock().unwrap();
            requests.push((cursor.map(str::to_string), page_size));
            if self.fail_on_page == Some(requests.len()) {
                return Err(FetchError::Transient("connection reset".to_string()));
            }

            let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
            let end = (start + page_size).min(self.total);
            let posts = (start..end)
                .map(|i| PostRecord {
                    timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap().fixed_offset(),
                    body: format!("post {i}"),
                    like_count: i as u64,
                    repost_count: 0,
                    id: i.to_string(),
                })
                .collect();
            let next_cursor = (end < self.total).then(|| end.to_string());
            Ok(TimelinePage { posts, next_cursor })
        }
    }

    #[tokio::test]
    async fn test_stops_at_max_results() {
        let api = MemoryTimeline::new(1000);
        let posts = fetch_timeline(&api, "someone", 250).await.unwrap();

        assert_eq!(posts.len(), 250);
        let requests = api.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![
                (None, 100),
                (Some("100".to_string()), 100),
                (Some("200".to_string()), 50),
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_when_timeline_exhausted() {
        let api = MemoryTimeline::new(30);
        let posts = fetch_timeline(&api, "someone", 100).await.unwrap();

        assert_eq!(posts.len(), 30);
        assert_eq!(api.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_max_results() {
        let api = MemoryTimeline::new(10);
        assert!(matches!(
            fetch_timeline(&api, "someone", 5).await,
            Err(FetchError::Config(_))
        ));
        assert!(matches!(
            fetch_timeline(&api, "someone", 1001).await,
            Err(FetchError::Config(_))
        ));
        assert!(api.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let api = MemoryTimeline::new(10);
        assert!(matches!(
            fetch_timeline(&api, "ghost", 10).await,
            Err(FetchError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_transient_failure_is_returned_for_retry() {
        let api = MemoryTimeline {
            fail_on_page: Some(2),
            ..MemoryTimeline::new(500)
        };
        let err = fetch_timeline(&api, "someone", 300).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(page_size_for(3), MIN_PAGE_SIZE);
        assert_eq!(page_size_for(42), 42);
        assert_eq!(page_size_for(900), MAX_PAGE_SIZE);
    }
}
