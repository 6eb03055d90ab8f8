//! X (Twitter) API v2 post source.
//!
//! Two streams: the provider account's own timeline (replies expanded so the
//! original user post rides along) and mentions of the account. Fetches are
//! bounded below by the last-seen id (`since_id`), so a page is only ever new
//! posts, newest first. Rate limiting is absorbed here: on 429 the client
//! sleeps until the advertised reset and retries.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use gridwatch_common::{PostMetrics, RawPost, StreamKind};

use crate::traits::PostSource;

const API_BASE: &str = "https://api.twitter.com/2";

/// Fallback wait when a 429 carries no usable reset header.
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

pub struct XApiSource {
    http: reqwest::Client,
    bearer_token: String,
    handle: String,
    user_id: OnceCell<String>,
}

// --- Wire types ---

#[derive(Deserialize)]
struct UserResponse {
    data: Option<UserData>,
}

#[derive(Deserialize)]
struct UserData {
    id: String,
}

#[derive(Deserialize)]
pub(crate) struct TimelineResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    includes: Option<Includes>,
}

#[derive(Deserialize)]
struct Includes {
    #[serde(default)]
    tweets: Vec<Tweet>,
}

#[derive(Deserialize)]
struct Tweet {
    id: String,
    text: String,
    created_at: Option<DateTime<Utc>>,
    author_id: Option<String>,
    #[serde(default)]
    referenced_tweets: Vec<TweetRef>,
    public_metrics: Option<PublicMetrics2>,
}

#[derive(Deserialize)]
struct TweetRef {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

#[derive(Deserialize)]
struct PublicMetrics2 {
    #[serde(default)]
    retweet_count: u32,
    #[serde(default)]
    like_count: u32,
    #[serde(default)]
    reply_count: u32,
    #[serde(default)]
    quote_count: u32,
}

impl XApiSource {
    pub fn new(bearer_token: &str, handle: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            bearer_token: bearer_token.to_string(),
            handle: handle.to_string(),
            user_id: OnceCell::new(),
        }
    }

    /// Resolve the provider handle to a user id, once per process.
    async fn user_id(&self) -> Result<&str> {
        self.user_id
            .get_or_try_init(|| async {
                let url = format!("{API_BASE}/users/by/username/{}", self.handle);
                let response: UserResponse = self
                    .get_with_rate_limit(&url, &[])
                    .await
                    .context("resolving provider account")?
                    .json()
                    .await
                    .context("malformed user lookup response")?;
                let user = response
                    .data
                    .with_context(|| format!("account @{} not found", self.handle))?;
                info!(handle = %self.handle, user_id = %user.id, "resolved provider account");
                Ok(user.id)
            })
            .await
            .map(String::as_str)
    }

    /// GET with the wait-on-rate-limit policy: a 429 sleeps until the reset
    /// advertised by the API and retries, rather than surfacing a failure.
    async fn get_with_rate_limit(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        loop {
            let response = self
                .http
                .get(url)
                .bearer_auth(&self.bearer_token)
                .query(query)
                .send()
                .await
                .context("post source unavailable")?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let wait = rate_limit_wait(response.headers(), Utc::now());
                warn!(wait_secs = wait.as_secs(), "rate limited, waiting");
                tokio::time::sleep(wait).await;
                continue;
            }

            return response
                .error_for_status()
                .context("post source returned an error");
        }
    }
}

/// How long to wait after a 429, from the `x-rate-limit-reset` epoch header.
fn rate_limit_wait(headers: &HeaderMap, now: DateTime<Utc>) -> Duration {
    headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .map(|reset| Duration::from_secs((reset - now.timestamp()).max(1) as u64))
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT)
}

/// Flatten a timeline page into RawPosts, joining reply context from the
/// expanded referenced tweets.
pub(crate) fn map_timeline(response: TimelineResponse) -> Vec<RawPost> {
    let referenced: Vec<(String, String)> = response
        .includes
        .map(|inc| inc.tweets.into_iter().map(|t| (t.id, t.text)).collect())
        .unwrap_or_default();

    response
        .data
        .into_iter()
        .map(|tweet| {
            let replied_to = tweet
                .referenced_tweets
                .iter()
                .find(|r| r.kind == "replied_to")
                .map(|r| r.id.clone());
            let original_text = replied_to.as_ref().and_then(|id| {
                referenced
                    .iter()
                    .find(|(rid, _)| rid == id)
                    .map(|(_, text)| text.clone())
            });
            let metrics = tweet
                .public_metrics
                .map(|m| PostMetrics {
                    retweets: m.retweet_count,
                    likes: m.like_count,
                    replies: m.reply_count,
                    quotes: m.quote_count,
                })
                .unwrap_or_default();

            RawPost {
                id: tweet.id,
                text: tweet.text,
                created_at: tweet.created_at,
                author_id: tweet.author_id,
                is_reply: replied_to.is_some(),
                original_text,
                metrics,
            }
        })
        .collect()
}

#[async_trait]
impl PostSource for XApiSource {
    async fn fetch(
        &self,
        stream: StreamKind,
        since_id: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<RawPost>> {
        let user_id = self.user_id().await?;

        // The v2 timeline endpoints accept 5..=100 results per page.
        let max_results = max_results.clamp(5, 100);
        let mut query: Vec<(&str, String)> = vec![("max_results", max_results.to_string())];
        if let Some(since) = since_id {
            query.push(("since_id", since.to_string()));
        }

        let url = match stream {
            StreamKind::Provider => {
                query.push((
                    "tweet.fields",
                    "created_at,public_metrics,text,author_id,referenced_tweets".to_string(),
                ));
                query.push(("expansions", "referenced_tweets.id".to_string()));
                format!("{API_BASE}/users/{user_id}/tweets")
            }
            StreamKind::Mentions => {
                query.push((
                    "tweet.fields",
                    "created_at,public_metrics,text,author_id".to_string(),
                ));
                format!("{API_BASE}/users/{user_id}/mentions")
            }
        };

        let response: TimelineResponse = self
            .get_with_rate_limit(&url, &query)
            .await
            .with_context(|| format!("fetching {stream} stream"))?
            .json()
            .await
            .context("malformed timeline response")?;

        Ok(map_timeline(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_page_maps_to_raw_posts() {
        let page: TimelineResponse = serde_json::from_str(
            r#"{
                "data": [
                    {
                        "id": "20",
                        "text": "Crews are on site.",
                        "created_at": "2026-08-01T08:30:00Z",
                        "author_id": "99",
                        "referenced_tweets": [{"type": "replied_to", "id": "19"}],
                        "public_metrics": {"retweet_count": 2, "like_count": 5, "reply_count": 1, "quote_count": 0}
                    },
                    {
                        "id": "18",
                        "text": "Scheduled maintenance in Gasabo tonight."
                    }
                ],
                "includes": {
                    "tweets": [{"id": "19", "text": "No power in Remera since 6am"}]
                }
            }"#,
        )
        .unwrap();

        let posts = map_timeline(page);
        assert_eq!(posts.len(), 2);

        assert_eq!(posts[0].id, "20");
        assert!(posts[0].is_reply);
        assert_eq!(
            posts[0].original_text.as_deref(),
            Some("No power in Remera since 6am")
        );
        assert_eq!(posts[0].metrics.likes, 5);

        assert_eq!(posts[1].id, "18");
        assert!(!posts[1].is_reply);
        assert_eq!(posts[1].original_text, None);
    }

    #[test]
    fn reply_without_expansion_keeps_no_context() {
        let page: TimelineResponse = serde_json::from_str(
            r#"{
                "data": [
                    {
                        "id": "30",
                        "text": "We are aware of the issue.",
                        "referenced_tweets": [{"type": "replied_to", "id": "29"}]
                    }
                ]
            }"#,
        )
        .unwrap();

        let posts = map_timeline(page);
        assert!(posts[0].is_reply);
        assert_eq!(posts[0].original_text, None);
    }

    #[test]
    fn empty_page_maps_to_no_posts() {
        let page: TimelineResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(map_timeline(page).is_empty());
    }

    #[test]
    fn rate_limit_wait_uses_reset_header() {
        let now = Utc::now();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-rate-limit-reset",
            (now.timestamp() + 30).to_string().parse().unwrap(),
        );
        let wait = rate_limit_wait(&headers, now);
        assert_eq!(wait, Duration::from_secs(30));
    }

    #[test]
    fn rate_limit_wait_falls_back_without_header() {
        let wait = rate_limit_wait(&HeaderMap::new(), Utc::now());
        assert_eq!(wait, DEFAULT_RATE_LIMIT_WAIT);
    }
}
