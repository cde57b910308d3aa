//! Paginated, append-only comment feed for one video lookup.
//!
//! `FeedController` is a plain state machine: its operations return the
//! `FetchRequest` to run (or `None` when the operation is a no-op) and the
//! caller feeds the resulting `FetchOutcome` back through `apply`. Every
//! issued request bumps the epoch, so a response that arrives after a newer
//! request was issued is discarded instead of corrupting the newer feed.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, Comment, CommentPage, PageToken, VideoDetails};

/// Slack, in scroll units, when deciding whether the bottom was reached.
pub const BOTTOM_TOLERANCE: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Error(String),
}

impl FetchState {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

/// Scroll geometry reported by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    pub scroll_top: usize,
    pub viewport_height: usize,
    pub content_height: usize,
}

impl ScrollPosition {
    /// True when the remaining content fits in the viewport, within
    /// `BOTTOM_TOLERANCE`.
    pub const fn at_bottom(&self) -> bool {
        self.content_height.saturating_sub(self.scroll_top)
            <= self.viewport_height.saturating_add(BOTTOM_TOLERANCE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    /// Video details followed by the first comment page.
    Start,
    NextPage(PageToken),
}

/// A fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub epoch: u64,
    pub video_id: String,
    pub kind: FetchKind,
}

impl FetchRequest {
    /// Whether this request replaces the whole feed (and any fetch in flight).
    pub const fn supersedes(&self) -> bool {
        matches!(self.kind, FetchKind::Start)
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            FetchKind::Start => format!("Load video {}", self.video_id),
            FetchKind::NextPage(_) => format!("Load more comments for {}", self.video_id),
        }
    }

    /// Run the request against the API. The suspension points are exactly
    /// the HTTP round trips.
    pub async fn execute(self, client: &ApiClient) -> FetchOutcome {
        let result = match &self.kind {
            FetchKind::Start => fetch_start(client, &self.video_id).await,
            FetchKind::NextPage(token) => client
                .fetch_comments(&self.video_id, Some(token))
                .await
                .map(FetchPayload::Page),
        };
        FetchOutcome {
            epoch: self.epoch,
            result,
        }
    }
}

/// No partial video: a failed first page fails the whole lookup.
async fn fetch_start(client: &ApiClient, video_id: &str) -> Result<FetchPayload, ApiError> {
    let video = client.fetch_video(video_id).await?;
    let page = client.fetch_comments(video_id, None).await?;
    Ok(FetchPayload::Started { video, page })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPayload {
    Started { video: VideoDetails, page: CommentPage },
    Page(CommentPage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub epoch: u64,
    pub result: Result<FetchPayload, ApiError>,
}

/// What `apply` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Belonged to a superseded request; nothing changed.
    Stale,
    Loaded,
    Failed,
}

/// Read-only view of the feed handed to the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct FeedSnapshot<'a> {
    pub video_id: Option<&'a str>,
    pub video: Option<&'a VideoDetails>,
    pub comments: &'a [Comment],
    pub state: &'a FetchState,
    pub has_more: bool,
    pub pages_loaded: usize,
}

#[derive(Debug, Default)]
pub struct FeedController {
    video_id: Option<String>,
    /// Id and details of the last successful lookup.
    video: Option<(String, VideoDetails)>,
    comments: Vec<Comment>,
    seen_ids: HashSet<String>,
    cursor: Option<PageToken>,
    state: FetchState,
    epoch: u64,
    pages_loaded: usize,
    /// Kind of the request in flight, or of the one that failed.
    last_kind: Option<FetchKind>,
}

impl FeedController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn video(&self) -> Option<&VideoDetails> {
        self.video.as_ref().map(|(_, video)| video)
    }

    /// Id of the video whose details are loaded. Differs from `video_id`
    /// while a newer lookup is pending or after it failed.
    pub fn loaded_video_id(&self) -> Option<&str> {
        self.video.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub const fn cursor(&self) -> Option<&PageToken> {
        self.cursor.as_ref()
    }

    pub const fn state(&self) -> &FetchState {
        &self.state
    }

    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    pub const fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn snapshot(&self) -> FeedSnapshot<'_> {
        FeedSnapshot {
            video_id: self.video_id(),
            video: self.video(),
            comments: self.comments(),
            state: self.state(),
            has_more: self.has_more(),
            pages_loaded: self.pages_loaded,
        }
    }

    /// Reset the comments and cursor and look up `video_id`. The previous
    /// video stays until the lookup succeeds. Blank ids are ignored.
    pub fn start_feed(&mut self, video_id: &str) -> Option<FetchRequest> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return None;
        }

        info!(video_id, "starting feed");
        self.video_id = Some(video_id.to_string());
        self.comments.clear();
        self.seen_ids.clear();
        self.cursor = None;
        self.pages_loaded = 0;
        Some(self.issue(FetchKind::Start))
    }

    /// Request the page after the last one applied. No-op while a fetch is
    /// in flight, after an error, or once the cursor is exhausted.
    pub fn load_next_page(&mut self) -> Option<FetchRequest> {
        if self.state != FetchState::Idle {
            return None;
        }
        let token = self.cursor.clone()?;
        Some(self.issue(FetchKind::NextPage(token)))
    }

    pub fn on_scroll_position_changed(&mut self, position: ScrollPosition) -> Option<FetchRequest> {
        if !position.at_bottom() {
            return None;
        }
        self.load_next_page()
    }

    /// Reissue whatever failed: the lookup, or the page at the unchanged
    /// cursor.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.state.error().is_none() {
            return None;
        }
        match self.last_kind.clone()? {
            FetchKind::Start => {
                let video_id = self.video_id.clone()?;
                self.start_feed(&video_id)
            }
            kind @ FetchKind::NextPage(_) => Some(self.issue(kind)),
        }
    }

    fn issue(&mut self, kind: FetchKind) -> FetchRequest {
        self.epoch += 1;
        self.state = FetchState::Loading;
        self.last_kind = Some(kind.clone());
        let request = FetchRequest {
            epoch: self.epoch,
            video_id: self.video_id.clone().unwrap_or_default(),
            kind,
        };
        debug!(epoch = request.epoch, kind = ?request.kind, "issuing fetch");
        request
    }

    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        if outcome.epoch != self.epoch || !self.state.is_loading() {
            debug!(
                epoch = outcome.epoch,
                current = self.epoch,
                "discarding stale response"
            );
            return Applied::Stale;
        }

        match outcome.result {
            Ok(FetchPayload::Started { video, page }) => {
                let video_id = self.video_id.clone().unwrap_or_default();
                self.video = Some((video_id, video));
                self.comments.clear();
                self.seen_ids.clear();
                self.append(page);
                self.state = FetchState::Idle;
                Applied::Loaded
            }
            Ok(FetchPayload::Page(page)) => {
                self.append(page);
                self.state = FetchState::Idle;
                Applied::Loaded
            }
            Err(err) => {
                warn!(error = %err, status = ?err.status(), "fetch failed");
                self.state = FetchState::Error(err.user_message());
                Applied::Failed
            }
        }
    }

    fn append(&mut self, page: CommentPage) {
        let before = self.comments.len();
        let received = page.comments.len();
        for comment in page.comments {
            if self.seen_ids.insert(comment.id.clone()) {
                self.comments.push(comment);
            }
        }
        let added = self.comments.len() - before;
        if added < received {
            debug!(skipped = received - added, "skipped duplicate comments");
        }
        self.cursor = page.next_page_token;
        self.pages_loaded += 1;
        debug!(
            added,
            total = self.comments.len(),
            has_more = self.cursor.is_some(),
            "applied comment page"
        );
    }
}
