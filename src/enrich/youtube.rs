//! YouTube Data API v3 metadata source.
//!
//! One `videos.list` call per batch, keyed by an API key. The pipeline is
//! batch-oriented and single-threaded, so the client blocks with a bounded
//! timeout; an expired or failed call surfaces as a batch failure and the
//! batch's members fall back.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use super::duration::DurationParser;
use super::source::MetadataSource;
use crate::models::MetadataRecord;

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct YouTubeSource {
    client: reqwest::blocking::Client,
    api_key: String,
    durations: DurationParser,
}

impl YouTubeSource {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build metadata HTTP client")?;

        Ok(Self {
            client,
            api_key,
            durations: DurationParser::new()?,
        })
    }
}

impl MetadataSource for YouTubeSource {
    fn fetch_batch(&self, video_ids: &[String]) -> Result<Vec<MetadataRecord>> {
        let response: VideosResponse = self
            .client
            .get(VIDEOS_ENDPOINT)
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", video_ids.join(",").as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .context("metadata lookup request failed")?
            .error_for_status()
            .context("metadata lookup rejected")?
            .json()
            .context("malformed metadata response")?;

        let mut records = Vec::with_capacity(response.items.len());
        for item in response.items {
            let duration_minutes = self
                .durations
                .to_minutes(&item.content_details.duration)
                .ok_or_else(|| {
                    anyhow!(
                        "unrecognized duration '{}' for video {}",
                        item.content_details.duration,
                        item.id
                    )
                })?;

            records.push(MetadataRecord {
                video_id: item.id,
                channel_title: item.snippet.channel_title,
                category_id: item.snippet.category_id,
                duration_minutes,
                published_at: item.snippet.published_at,
            });
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: Snippet,
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    channel_title: String,
    category_id: String,
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_videos_response() {
        let body = r#"{
            "items": [{
                "id": "abcdefghijk",
                "snippet": {
                    "channelTitle": "Some Channel",
                    "categoryId": "10",
                    "publishedAt": "2023-01-02T03:04:05Z"
                },
                "contentDetails": { "duration": "PT1H5M30S" }
            }]
        }"#;
        let decoded: VideosResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.items[0].snippet.channel_title, "Some Channel");
        assert_eq!(decoded.items[0].content_details.duration, "PT1H5M30S");
    }

    #[test]
    fn empty_response_decodes_to_no_items() {
        let decoded: VideosResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.items.is_empty());
    }
}
