use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Metadata for a single video, as returned by `GET /video/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub title: String,
    #[serde(default, deserialize_with = "count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "count")]
    pub like_count: u64,
    #[serde(default)]
    pub description: String,
}

impl VideoDetails {
    /// URL of the video's watch page.
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={video_id}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: String,
    /// `None` when the server sent a date that could not be read.
    #[serde(default, deserialize_with = "timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    /// Body as served; may contain HTML markup and entities.
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "count")]
    pub like_count: u64,
}

/// Opaque continuation token for the comments endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of `GET /comments/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "non_empty_token")]
    pub next_page_token: Option<PageToken>,
}

/// Body of a non-success response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Counts arrive either as JSON numbers or as numeric strings.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Count::Number(n)) => Ok(n),
        Some(Count::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Timestamps are RFC 3339 when well formed. Bare dates, zone-less date-times
/// (read as UTC) and epoch milliseconds are also accepted; anything else
/// yields `None` rather than rejecting the page.
fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => parse_timestamp(s.trim()),
        Some(Raw::Millis(ms)) => DateTime::from_timestamp_millis(ms),
        Some(Raw::Other(_)) | None => None,
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

/// An empty token means the same as a missing one: no further pages.
fn non_empty_token<'de, D>(deserializer: D) -> Result<Option<PageToken>, D::Error>
where
    D: Deserializer<'de>,
{
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token.filter(|t| !t.is_empty()).map(PageToken))
}
