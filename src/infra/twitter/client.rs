use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Deserialize;

use engagement_rater::errors::FetchError;
use engagement_rater::fetch::auth::ApiKey;
use engagement_rater::fetch::{BasicClient, HttpClient, fetch_json};
use engagement_rater::post::PostRecord;
use engagement_rater::services::timeline_api::{TimelineApi, TimelinePage};

const BASE_URL: &str = "https://api.twitter.com/2/";

#[derive(Deserialize)]
struct UserResponse {
    data: Option<UserData>,
}

#[derive(Deserialize)]
struct UserData {
    id: String,
}

#[derive(Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    meta: Option<TimelineMeta>,
}

#[derive(Deserialize)]
struct Tweet {
    id: String,
    text: String,
    created_at: DateTime<Utc>,
    public_metrics: PublicMetrics,
}

#[derive(Deserialize)]
struct PublicMetrics {
    like_count: u64,
    retweet_count: u64,
}

#[derive(Deserialize)]
struct TimelineMeta {
    next_token: Option<String>,
}

impl From<TimelineResponse> for TimelinePage {
    fn from(resp: TimelineResponse) -> Self {
        let posts = resp
            .data
            .into_iter()
            .map(|t| PostRecord {
                timestamp: t.created_at.fixed_offset(),
                body: t.text,
                like_count: t.public_metrics.like_count,
                repost_count: t.public_metrics.retweet_count,
                id: t.id,
            })
            .collect();

        TimelinePage {
            posts,
            next_cursor: resp.meta.and_then(|m| m.next_token),
        }
    }
}

/// Twitter API v2 timeline client authenticated with an app bearer token.
pub struct TwitterClient<C> {
    http: C,
    base_url: Url,
}

impl TwitterClient<ApiKey<BasicClient>> {
    pub fn new(bearer_token: &str) -> Result<Self, FetchError> {
        let http = ApiKey::bearer(BasicClient::new()?, bearer_token)?;
        Self::with_client(http, BASE_URL)
    }
}

impl<C: HttpClient> TwitterClient<C> {
    pub fn with_client(http: C, base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::Config(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Config(format!("base URL '{}' cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn timeline_url(
        &self,
        user_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<Url, FetchError> {
        let mut url = self.endpoint(&["users", user_id, "tweets"])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("max_results", &page_size.to_string())
                .append_pair("exclude", "retweets,replies")
                .append_pair("tweet.fields", "created_at,public_metrics");
            if let Some(cursor) = cursor {
                query.append_pair("pagination_token", cursor);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> TimelineApi for TwitterClient<C> {
    async fn lookup_user_id(&self, username: &str) -> Result<String, FetchError> {
        let url = self.endpoint(&["users", "by", "username", username])?;
        let resp: UserResponse = fetch_json(&self.http, url).await?;
        resp.data
            .map(|u| u.id)
            .ok_or_else(|| FetchError::NotFound(username.to_string()))
    }

    async fn fetch_page(
        &self,
        user_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<TimelinePage, FetchError> {
        let url = self.timeline_url(user_id, cursor, page_size)?;
        let resp: TimelineResponse = fetch_json(&self.http, url).await?;
        Ok(resp.into())
    }
}
