use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ApiError;
use super::types::{CommentPage, ErrorBody, PageToken, VideoDetails};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const VIDEO_FALLBACK_ERROR: &str = "Failed to fetch video details";
const COMMENTS_FALLBACK_ERROR: &str = "Failed to fetch comments";

/// Client for the video/comments backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base =
            Url::parse(base_url).with_context(|| format!("Invalid API URL '{base_url}'"))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            bail!("API URL must be an http(s) URL, got '{base_url}'");
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{resource}/{video_id}`, with the id percent-encoded as one segment.
    fn endpoint(&self, resource: &str, video_id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource).push(video_id);
        }
        url
    }

    pub async fn fetch_video(&self, video_id: &str) -> Result<VideoDetails, ApiError> {
        let url = self.endpoint("video", video_id);
        debug!(%url, "fetching video details");
        get_json(self.http.get(url), VIDEO_FALLBACK_ERROR).await
    }

    pub async fn fetch_comments(
        &self,
        video_id: &str,
        page_token: Option<&PageToken>,
    ) -> Result<CommentPage, ApiError> {
        let url = self.endpoint("comments", video_id);
        debug!(%url, page_token = ?page_token.map(PageToken::as_str), "fetching comments");
        let mut request = self.http.get(url);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token.as_str())]);
        }
        get_json(request, COMMENTS_FALLBACK_ERROR).await
    }
}

/// Send the request and decode a success body, or turn the error body into
/// an `ApiError::HttpStatus` with the server's message (or `fallback`).
async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    fallback: &str,
) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| fallback.to_string());
    warn!(status = status.as_u16(), %message, "request failed");
    Err(ApiError::HttpStatus(status.as_u16(), message))
}
