//! Test data builders for app and view testing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use ratatui::layout::Rect;

use crate::api::{ApiClient, ApiError, Comment, CommentPage, PageToken, VideoDetails};
use crate::app::{App, InputState, Mode};
use crate::feed::{FetchOutcome, FetchPayload};
use crate::theme::{ResolvedTheme, ThemeVariant, default_for_variant};
use crate::time::{Clock, fixed_clock};

/// Fixed timestamp for deterministic tests: 2023-11-15 00:00:00 UTC
/// This is 1 day after the base timestamp (1700000000) used in sample data,
/// so comments will show as "1d ago".
pub const TEST_NOW: i64 = 1700092800;

/// Video id used by `TestAppBuilder` for loaded feeds.
pub const TEST_VIDEO_ID: &str = "abc123";

pub struct CommentBuilder {
    id: String,
    author: String,
    published_at: i64,
    text: String,
    like_count: u64,
}

impl Default for CommentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentBuilder {
    pub fn new() -> Self {
        Self {
            id: "1".to_string(),
            author: "commenter".to_string(),
            published_at: 1700000000,
            text: "Test comment".to_string(),
            like_count: 0,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn likes(mut self, likes: u64) -> Self {
        self.like_count = likes;
        self
    }

    pub fn build(self) -> Comment {
        Comment {
            id: self.id,
            author: self.author,
            published_at: Utc.timestamp_opt(self.published_at, 0).single(),
            text: self.text,
            like_count: self.like_count,
        }
    }
}

pub fn sample_video() -> VideoDetails {
    VideoDetails {
        title: "T".to_string(),
        view_count: 10,
        like_count: 2,
        description: "d".to_string(),
    }
}

/// A page holding one default comment per id.
pub fn page(ids: &[&str], next: Option<&str>) -> CommentPage {
    CommentPage {
        comments: ids
            .iter()
            .map(|id| CommentBuilder::new().id(id).build())
            .collect(),
        next_page_token: next.map(PageToken::new),
    }
}

pub fn numbered_comments(count: usize) -> Vec<Comment> {
    (0..count)
        .map(|i| {
            CommentBuilder::new()
                .id(&format!("c{i}"))
                .author(&format!("user{i}"))
                .text(&format!("Comment number {i}"))
                .build()
        })
        .collect()
}

/// Builds an `App` whose feed has been driven into the requested state
/// through the controller's own operations.
pub struct TestAppBuilder {
    api_url: String,
    mode: Mode,
    comments: Option<Vec<Comment>>,
    next_page: Option<String>,
    loading: bool,
    error: Option<String>,
    show_help: bool,
    scroll_top: usize,
    viewport: Option<Rect>,
    theme: ResolvedTheme,
    clock: Arc<dyn Clock>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            // Nothing listens here: spawned fetches fail fast.
            api_url: "http://127.0.0.1:1/api".to_string(),
            mode: Mode::Input,
            comments: None,
            next_page: None,
            loading: false,
            error: None,
            show_help: false,
            scroll_top: 0,
            viewport: None,
            theme: default_for_variant(ThemeVariant::Dark),
            clock: fixed_clock(TEST_NOW),
        }
    }

    pub fn api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Load `sample_video()` with these comments as the first page.
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = Some(comments);
        self
    }

    pub fn with_comment_count(self, count: usize) -> Self {
        self.with_comments(numbered_comments(count))
    }

    /// Cursor left after the first page.
    pub fn next_page(mut self, token: &str) -> Self {
        self.next_page = Some(token.to_string());
        self
    }

    /// Leave a fetch in flight: the next page if there is a cursor,
    /// otherwise the lookup.
    pub fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    /// Fail the next page if there is a cursor, otherwise the lookup.
    pub fn error(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn show_help(mut self) -> Self {
        self.show_help = true;
        self
    }

    pub fn scroll_top(mut self, top: usize) -> Self {
        self.scroll_top = top;
        self
    }

    /// Terminal size, set without triggering a scroll check.
    pub fn viewport(mut self, width: u16, height: u16) -> Self {
        self.viewport = Some(Rect::new(0, 0, width, height));
        self
    }

    pub fn build(self) -> App {
        let client = ApiClient::new(&self.api_url, Duration::from_secs(2)).unwrap();
        let mut app = App::new(client, self.theme, self.clock);
        app.mode = self.mode;
        app.show_help = self.show_help;

        if let Some(comments) = self.comments {
            app.input = InputState::new(TEST_VIDEO_ID);
            let request = app.feed.start_feed(TEST_VIDEO_ID).unwrap();
            app.feed.apply(FetchOutcome {
                epoch: request.epoch,
                result: Ok(FetchPayload::Started {
                    video: sample_video(),
                    page: CommentPage {
                        comments,
                        next_page_token: self.next_page.map(PageToken::new),
                    },
                }),
            });
        }

        if self.loading || self.error.is_some() {
            let request = app
                .feed
                .load_next_page()
                .or_else(|| app.feed.start_feed(TEST_VIDEO_ID))
                .unwrap();
            app.loading_since = Some(Instant::now());
            if let Some(msg) = self.error {
                app.feed.apply(FetchOutcome {
                    epoch: request.epoch,
                    result: Err(ApiError::HttpStatus(500, msg)),
                });
            }
        }

        app.scroll_top = self.scroll_top;
        app.viewport = self.viewport;
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FetchState;

    #[test]
    fn test_builder_default_is_idle() {
        let app = TestAppBuilder::new().build();
        assert_eq!(app.feed.state(), &FetchState::Idle);
        assert!(app.feed.video_id().is_none());
    }

    #[test]
    fn test_builder_error_without_feed_fails_lookup() {
        let app = TestAppBuilder::new().error("not found").build();
        assert_eq!(app.feed.state().error(), Some("not found"));
        assert!(app.feed.video().is_none());
    }

    #[test]
    fn test_builder_loading_with_cursor_keeps_comments() {
        let app = TestAppBuilder::new()
            .with_comment_count(4)
            .next_page("p2")
            .loading()
            .build();
        assert!(app.feed.state().is_loading());
        assert_eq!(app.feed.comments().len(), 4);
    }
}
