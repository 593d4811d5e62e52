//! YouTube Data API v3 client.

use crate::error::{Result, TubeaskError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Video metadata returned to callers as the `youtube_data` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
}

impl VideoSummary {
    /// Render this video as a prompt context entry.
    pub fn to_prompt_entry(&self, index: usize) -> String {
        let mut entry = format!(
            "---\n[{}] {}\nChannel: {}\nLink: {}",
            index, self.title, self.channel_title, self.url
        );
        if let Some(published) = self.published_at {
            entry.push_str(&format!("\nPublished: {}", published.format("%Y-%m-%d")));
        }
        if let Some(views) = self.view_count {
            entry.push_str(&format!("\nViews: {}", views));
        }
        if let Some(likes) = self.like_count {
            entry.push_str(&format!("\nLikes: {}", likes));
        }
        if !self.description.is_empty() {
            entry.push_str(&format!("\n{}", self.description));
        }
        entry.push_str("\n---");
        entry
    }
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct Item {
    id: ItemId,
    snippet: Option<Snippet>,
    statistics: Option<Statistics>,
}

/// `search` returns an object id, `videos` returns a plain string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemId {
    Plain(String),
    Resource {
        #[serde(rename = "videoId")]
        video_id: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    description: String,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    thumbnails: Value,
}

/// Counts are sent as strings.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
}

impl Item {
    fn into_summary(self) -> Option<VideoSummary> {
        let video_id = match self.id {
            ItemId::Plain(id) => id,
            ItemId::Resource { video_id } => video_id?,
        };
        let snippet = self.snippet?;

        let thumbnail_url = ["high", "medium", "default"].iter().find_map(|size| {
            snippet
                .thumbnails
                .get(*size)
                .and_then(|t| t.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        let (view_count, like_count) = match self.statistics {
            Some(stats) => (
                stats.view_count.and_then(|v| v.parse().ok()),
                stats.like_count.and_then(|v| v.parse().ok()),
            ),
            None => (None, None),
        };

        Some(VideoSummary {
            url: format!("https://www.youtube.com/watch?v={}", video_id),
            video_id,
            title: snippet.title,
            channel_title: snippet.channel_title,
            description: snippet.description,
            published_at: snippet.published_at,
            thumbnail_url,
            view_count,
            like_count,
        })
    }
}

/// Client for the YouTube Data API.
pub struct YoutubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YoutubeClient {
    pub fn new(http: reqwest::Client, api_key: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Search for videos matching a query.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        region_code: Option<&str>,
    ) -> Result<Vec<VideoSummary>> {
        let max_results = max_results.clamp(1, 50).to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(region) = region_code {
            params.push(("regionCode", region));
        }

        let videos = self.list("search", &params).await?;
        debug!("YouTube search returned {} videos", videos.len());
        Ok(videos)
    }

    /// Look up specific videos, including their statistics.
    #[instrument(skip(self))]
    pub async fn videos(&self, ids: &[String]) -> Result<Vec<VideoSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.join(",");
        let params = [("part", "snippet,statistics"), ("id", joined.as_str())];
        self.list("videos", &params).await
    }

    async fn list(&self, resource: &str, params: &[(&str, &str)]) -> Result<Vec<VideoSummary>> {
        let url = format!("{}/{}", self.base_url, resource);
        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TubeaskError::Youtube(error_message(&body, status.as_u16())));
        }

        parse_list(&body)
    }
}

fn parse_list(body: &str) -> Result<Vec<VideoSummary>> {
    let response: ListResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .filter_map(Item::into_summary)
        .collect())
}

/// Pull `error.message` out of an API error body.
fn error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("request failed with status {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Requests = Arc<Mutex<Vec<(&'static str, HashMap<String, String>)>>>;

    /// Local stand-in for the Data API. A `videos` lookup of `blocked` fails with 403.
    async fn fake_youtube() -> (YoutubeClient, Requests) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/youtube/v3/", listener.local_addr().unwrap());
        let requests: Requests = Arc::default();

        let search_requests = requests.clone();
        let videos_requests = requests.clone();
        let app = Router::new()
            .route(
                "/youtube/v3/search",
                get(move |Query(params): Query<HashMap<String, String>>| {
                    let requests = search_requests.clone();
                    async move {
                        requests.lock().unwrap().push(("search", params));
                        Json(json!({
                            "items": [{
                                "id": {"kind": "youtube#video", "videoId": "abcdefghijk"},
                                "snippet": {"title": "Rust in 100 Seconds", "channelTitle": "Fireship"}
                            }]
                        }))
                    }
                }),
            )
            .route(
                "/youtube/v3/videos",
                get(move |Query(params): Query<HashMap<String, String>>| {
                    let requests = videos_requests.clone();
                    async move {
                        let blocked = params.get("id").map(String::as_str) == Some("blocked");
                        requests.lock().unwrap().push(("videos", params));
                        if blocked {
                            return (
                                StatusCode::FORBIDDEN,
                                Json(json!({"error": {"code": 403, "message": "quota exceeded"}})),
                            );
                        }
                        (
                            StatusCode::OK,
                            Json(json!({
                                "items": [{
                                    "id": "dQw4w9WgXcQ",
                                    "snippet": {"title": "Never Gonna Give You Up", "channelTitle": "Rick Astley"},
                                    "statistics": {"viewCount": "10"}
                                }]
                            })),
                        )
                    }
                }),
            );

        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client = YoutubeClient::new(reqwest::Client::new(), "yt-key").with_base_url(&base);
        (client, requests)
    }

    #[tokio::test]
    async fn test_search_sends_key_and_parameters() {
        let (client, requests) = fake_youtube().await;

        let videos = client.search("rust tutorial", 100, Some("NO")).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "abcdefghijk");

        let requests = requests.lock().unwrap();
        let (resource, params) = &requests[0];
        assert_eq!(*resource, "search");
        assert_eq!(params["key"], "yt-key");
        assert_eq!(params["q"], "rust tutorial");
        assert_eq!(params["part"], "snippet");
        assert_eq!(params["type"], "video");
        assert_eq!(params["maxResults"], "50");
        assert_eq!(params["regionCode"], "NO");
    }

    #[tokio::test]
    async fn test_videos_lookup() {
        let (client, requests) = fake_youtube().await;

        let ids = vec!["dQw4w9WgXcQ".to_string(), "abcdefghijk".to_string()];
        let videos = client.videos(&ids).await.unwrap();
        assert_eq!(videos[0].view_count, Some(10));

        assert!(client.videos(&[]).await.unwrap().is_empty());

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (resource, params) = &requests[0];
        assert_eq!(*resource, "videos");
        assert_eq!(params["id"], "dQw4w9WgXcQ,abcdefghijk");
        assert_eq!(params["part"], "snippet,statistics");
        assert_eq!(params["key"], "yt-key");
    }

    #[tokio::test]
    async fn test_api_error_becomes_youtube_error() {
        let (client, _requests) = fake_youtube().await;

        match client.videos(&["blocked".to_string()]).await {
            Err(TubeaskError::Youtube(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "kind": "youtube#searchListResponse",
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"},
                    "snippet": {
                        "publishedAt": "2009-10-25T06:57:33Z",
                        "title": "Never Gonna Give You Up",
                        "description": "The official video",
                        "channelTitle": "Rick Astley",
                        "thumbnails": {"default": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg"}}
                    }
                },
                {"id": {"kind": "youtube#channel", "channelId": "UC123"}, "snippet": {"title": "A channel"}}
            ]
        }"#;

        let videos = parse_list(body).unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].channel_title, "Rick Astley");
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(
            videos[0].thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg")
        );
        assert!(videos[0].view_count.is_none());
    }

    #[test]
    fn test_parse_videos_response_with_statistics() {
        let body = r#"{
            "items": [{
                "id": "dQw4w9WgXcQ",
                "snippet": {"title": "Never Gonna Give You Up", "channelTitle": "Rick Astley"},
                "statistics": {"viewCount": "1500000000", "likeCount": "17000000"}
            }]
        }"#;

        let videos = parse_list(body).unwrap();
        assert_eq!(videos[0].view_count, Some(1_500_000_000));
        assert_eq!(videos[0].like_count, Some(17_000_000));
        assert!(videos[0].published_at.is_none());
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error": {"code": 403, "message": "quota exceeded", "errors": [{"reason": "quotaExceeded"}]}}"#;
        assert_eq!(error_message(body, 403), "quota exceeded");
        assert_eq!(error_message("<html>", 502), "request failed with status 502");
    }

    #[test]
    fn test_prompt_entry() {
        let video = VideoSummary {
            video_id: "abc".to_string(),
            title: "Rust in 100 Seconds".to_string(),
            channel_title: "Fireship".to_string(),
            description: String::new(),
            published_at: None,
            thumbnail_url: None,
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            view_count: Some(42),
            like_count: None,
        };
        let entry = video.to_prompt_entry(1);
        assert!(entry.starts_with("---\n[1] Rust in 100 Seconds\nChannel: Fireship"));
        assert!(entry.contains("Views: 42"));
        assert!(!entry.contains("Likes"));
    }
}
