//! YouTube Data API access.
//!
//! Searches for videos and looks up specific videos referenced by URL.

mod client;
mod video_id;

pub use client::{VideoSummary, YoutubeClient};
pub use video_id::extract_video_ids;

use crate::error::Result;
use async_trait::async_trait;

/// Source of YouTube video metadata.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search for videos matching a free-text query.
    async fn search(&self, query: &str, max_results: u32, region_code: Option<&str>)
        -> Result<Vec<VideoSummary>>;

    /// Look up specific videos by ID.
    async fn videos(&self, ids: &[String]) -> Result<Vec<VideoSummary>>;
}

#[async_trait]
impl VideoSearch for YoutubeClient {
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        region_code: Option<&str>,
    ) -> Result<Vec<VideoSummary>> {
        YoutubeClient::search(self, query, max_results, region_code).await
    }

    async fn videos(&self, ids: &[String]) -> Result<Vec<VideoSummary>> {
        YoutubeClient::videos(self, ids).await
    }
}
