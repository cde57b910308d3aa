use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::api::{ApiClient, VideoDetails};
use crate::feed::{Applied, FeedController, FetchOutcome, FetchRequest, ScrollPosition};
use crate::theme::ResolvedTheme;
use crate::time::Clock;
use crate::views;

/// Outcome of a spawned fetch, sent back to the UI loop.
pub struct TaskResult {
    pub task_id: u64,
    pub outcome: FetchOutcome,
}

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        let message = msg.into();
        debug!(target: "tubeview::tasks", "{message}");
        self.log.push_back(LogEntry { message });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let desc = description.into();
        self.log(format!("Started: {}", desc));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

/// Single-line text field; `cursor` counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
}

impl InputState {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index();
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.text.remove(idx);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Typing a video id.
    #[default]
    Input,
    /// Scrolling through comments.
    Browse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ScrollDown(usize),
    ScrollUp(usize),
    PageDown,
    PageUp,
    ScrollTop,
    ScrollBottom,
    FocusInput,
    InputChar(char),
    InputBackspace,
    InputLeft,
    InputRight,
    InputClear,
    SubmitInput,
    CancelInput,
    Retry,
    OpenVideo,
    ToggleHelp,
    ToggleDebug,
    Quit,
    UpdateViewport(Rect),
}

struct InFlight {
    task_id: u64,
    handle: AbortHandle,
}

pub struct App {
    pub feed: FeedController,
    pub mode: Mode,
    pub input: InputState,
    /// First visible line of the comment list.
    pub scroll_top: usize,
    /// Full terminal area, as of the last draw.
    pub viewport: Option<Rect>,
    pub should_quit: bool,
    pub show_help: bool,
    pub client: ApiClient,
    pub theme: ResolvedTheme,
    pub clock: Arc<dyn Clock>,
    pub loading_since: Option<Instant>,
    // Async task management
    pub result_tx: mpsc::Sender<TaskResult>,
    pub result_rx: mpsc::Receiver<TaskResult>,
    in_flight: Option<InFlight>,
    // Debug pane
    pub debug: DebugState,
}

impl App {
    pub fn new(client: ApiClient, theme: ResolvedTheme, clock: Arc<dyn Clock>) -> Self {
        let (result_tx, result_rx) = mpsc::channel(10);
        Self {
            feed: FeedController::new(),
            mode: Mode::default(),
            input: InputState::default(),
            scroll_top: 0,
            viewport: None,
            should_quit: false,
            show_help: false,
            client,
            theme,
            clock,
            loading_since: None,
            result_tx,
            result_rx,
            in_flight: None,
            debug: DebugState::new(),
        }
    }

    /// Fill the input with `video_id` and look it up.
    pub fn start(&mut self, video_id: &str) {
        self.input = InputState::new(video_id);
        self.submit_input();
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::ScrollDown(lines) => self.scroll_to(self.scroll_top.saturating_add(lines)),
            Message::ScrollUp(lines) => self.scroll_to(self.scroll_top.saturating_sub(lines)),
            Message::PageDown => {
                let page = self.page_size();
                self.scroll_to(self.scroll_top.saturating_add(page));
            }
            Message::PageUp => {
                let page = self.page_size();
                self.scroll_to(self.scroll_top.saturating_sub(page));
            }
            Message::ScrollTop => self.scroll_to(0),
            Message::ScrollBottom => self.scroll_to(usize::MAX),
            Message::FocusInput => self.mode = Mode::Input,
            Message::InputChar(c) => self.input.insert(c),
            Message::InputBackspace => self.input.backspace(),
            Message::InputLeft => self.input.move_left(),
            Message::InputRight => self.input.move_right(),
            Message::InputClear => self.input.clear(),
            Message::SubmitInput => self.submit_input(),
            Message::CancelInput => self.mode = Mode::Browse,
            Message::Retry => self.retry(),
            Message::OpenVideo => self.open_video(),
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::ToggleDebug => {
                self.debug.toggle();
                self.scroll_to(self.scroll_top);
            }
            Message::Quit => self.should_quit = true,
            Message::UpdateViewport(area) => {
                self.viewport = Some(area);
                self.scroll_to(self.scroll_top);
            }
        }
    }

    pub fn handle_async_result(&mut self, result: TaskResult) {
        let TaskResult { task_id, outcome } = result;
        if self
            .in_flight
            .as_ref()
            .is_some_and(|task| task.task_id == task_id)
        {
            self.in_flight = None;
        }

        match self.feed.apply(outcome) {
            Applied::Stale => self.debug.end_task(task_id, "discarded (stale)"),
            Applied::Failed => self.debug.end_task(task_id, "failed"),
            Applied::Loaded => {
                self.debug.end_task(task_id, "completed");
                // A short page may leave the list at its bottom already.
                self.scroll_to(self.scroll_top);
            }
        }
    }

    fn submit_input(&mut self) {
        let Some(request) = self.feed.start_feed(&self.input.text) else {
            return;
        };
        self.scroll_top = 0;
        self.mode = Mode::Browse;
        self.dispatch(request);
    }

    fn retry(&mut self) {
        if let Some(request) = self.feed.retry() {
            if request.supersedes() {
                self.scroll_top = 0;
            }
            self.dispatch(request);
        }
    }

    /// Watch page of the video whose details are on screen.
    pub fn video_url(&self) -> Option<String> {
        self.feed.loaded_video_id().map(VideoDetails::watch_url)
    }

    fn open_video(&mut self) {
        if let Some(url) = self.video_url() {
            if let Err(e) = open::that(&url) {
                warn!(error = %e, %url, "failed to open browser");
                self.debug.log(format!("Failed to open {url}: {e}"));
            }
        }
    }

    /// Current geometry of the comment list, once the terminal size is known.
    pub fn scroll_position(&self) -> Option<ScrollPosition> {
        let area = views::main_area(self.viewport?, self.debug.visible);
        let list = views::feed::comment_viewport(area, self.feed.video());
        let width = list.width as usize;
        let content_height = self
            .feed
            .comments()
            .iter()
            .map(|c| views::feed::comment_height(c, width))
            .sum();
        Some(ScrollPosition {
            scroll_top: self.scroll_top,
            viewport_height: list.height as usize,
            content_height,
        })
    }

    fn page_size(&self) -> usize {
        self.scroll_position()
            .map_or(1, |p| (p.viewport_height / 2).max(1))
    }

    /// Clamp to the scrollable range, then ask the feed whether the new
    /// position warrants another page.
    fn scroll_to(&mut self, top: usize) {
        let Some(position) = self.scroll_position() else {
            self.scroll_top = top.min(self.scroll_top);
            return;
        };
        let max_top = position
            .content_height
            .saturating_sub(position.viewport_height);
        self.scroll_top = top.min(max_top);

        let position = ScrollPosition {
            scroll_top: self.scroll_top,
            ..position
        };
        if let Some(request) = self.feed.on_scroll_position_changed(position) {
            self.dispatch(request);
        }
    }

    /// Spawn `request` on the runtime; its outcome comes back on `result_rx`.
    fn dispatch(&mut self, request: FetchRequest) {
        if request.supersedes()
            && let Some(previous) = self.in_flight.take()
        {
            previous.handle.abort();
            self.debug.end_task(previous.task_id, "cancelled");
        }

        let task_id = self.debug.start_task(request.describe());
        self.loading_since = Some(Instant::now());
        let client = self.client.clone();
        let tx = self.result_tx.clone();

        let handle = tokio::spawn(async move {
            let outcome = request.execute(&client).await;
            let _ = tx.send(TaskResult { task_id, outcome }).await;
        });
        self.in_flight = Some(InFlight {
            task_id,
            handle: handle.abort_handle(),
        });
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn in_flight_task(&self) -> Option<u64> {
        self.in_flight.as_ref().map(|task| task.task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::feed::{FetchPayload, FetchState};
    use crate::test_utils::{TestAppBuilder, page, sample_video};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn outcome_for(app: &App, ids: &[&str], next: Option<&str>) -> FetchOutcome {
        FetchOutcome {
            epoch: app.feed.epoch(),
            result: Ok(FetchPayload::Page(page(ids, next))),
        }
    }

    #[test]
    fn test_input_editing() {
        let mut input = InputState::default();
        for c in "abé1".chars() {
            input.insert(c);
        }
        assert_eq!(input.text, "abé1");
        input.move_left();
        input.backspace();
        assert_eq!(input.text, "ab1");
        assert_eq!(input.cursor, 2);
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor, 3);
        input.insert('x');
        assert_eq!(input.text, "ab1x");
        input.clear();
        assert_eq!(input, InputState::default());
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = InputState::new("abc");
        input.cursor = 0;
        input.backspace();
        assert_eq!(input.text, "abc");
    }

    #[test]
    fn test_submit_empty_input_issues_nothing() {
        let mut app = TestAppBuilder::new().build();
        app.update(Message::SubmitInput);
        assert_eq!(app.feed.state(), &FetchState::Idle);
        assert!(app.debug.running_tasks.is_empty());
        assert_eq!(app.mode, Mode::Input);
    }

    #[tokio::test]
    async fn test_submit_starts_feed() {
        let mut app = TestAppBuilder::new().build();
        for c in "abc123".chars() {
            app.update(Message::InputChar(c));
        }
        app.update(Message::SubmitInput);

        assert_eq!(app.feed.state(), &FetchState::Loading);
        assert_eq!(app.feed.video_id(), Some("abc123"));
        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.debug.running_tasks.len(), 1);
        assert!(app.in_flight_task().is_some());
    }

    #[tokio::test]
    async fn test_new_lookup_cancels_in_flight_fetch() {
        let mut app = TestAppBuilder::new().build();
        app.start("first");
        let first_task = app.in_flight_task().unwrap();
        app.start("second");
        let second_task = app.in_flight_task().unwrap();

        assert_ne!(first_task, second_task);
        assert_eq!(app.debug.running_tasks.len(), 1);
        assert!(
            app.debug
                .log
                .iter()
                .any(|entry| entry.message.contains("first cancelled"))
        );
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let mut app = TestAppBuilder::new().build();
        app.start("first");
        let stale_epoch = app.feed.epoch();
        let stale_task = app.in_flight_task().unwrap();
        app.start("second");

        app.handle_async_result(TaskResult {
            task_id: stale_task,
            outcome: FetchOutcome {
                epoch: stale_epoch,
                result: Ok(FetchPayload::Started {
                    video: sample_video(),
                    page: page(&["old"], None),
                }),
            },
        });

        assert!(app.feed.video().is_none());
        assert_eq!(app.feed.state(), &FetchState::Loading);
    }

    #[tokio::test]
    async fn test_scroll_to_bottom_loads_next_page() {
        let mut app = TestAppBuilder::new()
            .with_comment_count(30)
            .next_page("p2")
            .viewport(80, 30)
            .build();

        app.update(Message::ScrollDown(1));
        assert_eq!(app.feed.state(), &FetchState::Idle);

        app.update(Message::ScrollBottom);
        assert_eq!(app.feed.state(), &FetchState::Loading);
        assert_eq!(app.debug.running_tasks.len(), 1);

        // Further scrolling while loading doesn't start another fetch.
        app.update(Message::ScrollUp(1));
        app.update(Message::ScrollBottom);
        assert_eq!(app.debug.running_tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_page_result_appends_and_frees_paging() {
        let mut app = TestAppBuilder::new()
            .with_comment_count(30)
            .next_page("p2")
            .viewport(80, 30)
            .build();
        app.update(Message::ScrollBottom);
        let task_id = app.in_flight_task().unwrap();

        let outcome = outcome_for(&app, &["n1", "n2"], None);
        app.handle_async_result(TaskResult { task_id, outcome });

        assert_eq!(app.feed.comments().len(), 32);
        assert_eq!(app.feed.state(), &FetchState::Idle);
        assert!(app.in_flight_task().is_none());
        assert!(app.debug.running_tasks.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_round_trip_through_channel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/video/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Remote",
                "viewCount": 5,
                "likeCount": 1,
                "description": "",
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/comments/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "comments": [{
                    "id": "x",
                    "author": "alice",
                    "publishedAt": "2023-11-14T22:13:20Z",
                    "text": "hi",
                    "likeCount": 0,
                }],
                "nextPageToken": null,
            })))
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new()
            .api_url(&format!("{}/api", server.uri()))
            .viewport(80, 24)
            .build();
        app.start("abc123");
        let result = app.result_rx.recv().await.unwrap();
        app.handle_async_result(result);

        assert_eq!(app.feed.video().unwrap().title, "Remote");
        assert_eq!(app.feed.comments().len(), 1);
        assert_eq!(app.feed.state(), &FetchState::Idle);
        assert!(app.in_flight_task().is_none());
        assert!(app.debug.running_tasks.is_empty());
    }

    #[test]
    fn test_scroll_without_cursor_never_loads() {
        let mut app = TestAppBuilder::new()
            .with_comment_count(30)
            .viewport(80, 30)
            .build();
        app.update(Message::ScrollBottom);
        assert_eq!(app.feed.state(), &FetchState::Idle);
        assert!(app.debug.running_tasks.is_empty());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = TestAppBuilder::new()
            .with_comment_count(30)
            .viewport(80, 30)
            .build();
        app.update(Message::ScrollUp(5));
        assert_eq!(app.scroll_top, 0);

        app.update(Message::ScrollBottom);
        let position = app.scroll_position().unwrap();
        assert_eq!(
            app.scroll_top,
            position.content_height - position.viewport_height
        );
        let bottom = app.scroll_top;
        app.update(Message::ScrollDown(10));
        assert_eq!(app.scroll_top, bottom);
    }

    #[tokio::test]
    async fn test_short_feed_fills_viewport_on_resize() {
        let mut app = TestAppBuilder::new()
            .with_comment_count(1)
            .next_page("p2")
            .build();
        assert_eq!(app.feed.state(), &FetchState::Idle);

        app.update(Message::UpdateViewport(Rect::new(0, 0, 80, 40)));
        assert_eq!(app.feed.state(), &FetchState::Loading);
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let mut app = TestAppBuilder::new()
            .with_comment_count(1)
            .next_page("p2")
            .viewport(80, 40)
            .build();
        // Viewport already fits everything: the first scroll asks for page 2.
        app.update(Message::ScrollDown(1));
        let task_id = app.in_flight_task().unwrap();
        app.handle_async_result(TaskResult {
            task_id,
            outcome: FetchOutcome {
                epoch: app.feed.epoch(),
                result: Err(ApiError::HttpStatus(500, "boom".into())),
            },
        });
        assert_eq!(app.feed.state().error(), Some("boom"));
        assert_eq!(app.feed.comments().len(), 1);

        app.update(Message::Retry);
        assert_eq!(app.feed.state(), &FetchState::Loading);
        assert!(app.in_flight_task().is_some());
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_video_on_screen() {
        let mut app = TestAppBuilder::new().with_comment_count(2).build();
        app.start("second");
        let task_id = app.in_flight_task().unwrap();
        app.handle_async_result(TaskResult {
            task_id,
            outcome: FetchOutcome {
                epoch: app.feed.epoch(),
                result: Err(ApiError::HttpStatus(404, "not found".into())),
            },
        });

        assert_eq!(app.feed.state().error(), Some("not found"));
        assert_eq!(app.feed.video(), Some(&sample_video()));
        assert_eq!(
            app.video_url().as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
    }

    #[test]
    fn test_retry_without_error_is_noop() {
        let mut app = TestAppBuilder::new().with_comment_count(3).build();
        app.update(Message::Retry);
        assert_eq!(app.feed.state(), &FetchState::Idle);
    }

    #[test]
    fn test_focus_and_cancel_input() {
        let mut app = TestAppBuilder::new().mode(Mode::Browse).build();
        app.update(Message::FocusInput);
        assert_eq!(app.mode, Mode::Input);
        app.update(Message::CancelInput);
        assert_eq!(app.mode, Mode::Browse);
    }

    #[test]
    fn test_toggle_help_and_debug() {
        let mut app = TestAppBuilder::new().build();
        app.update(Message::ToggleHelp);
        app.update(Message::ToggleDebug);
        assert!(app.show_help);
        assert!(app.debug.visible);
    }

    #[test]
    fn test_quit() {
        let mut app = TestAppBuilder::new().build();
        app.update(Message::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_debug_state_tracks_tasks() {
        let mut debug = DebugState::new();
        let id = debug.start_task("Load video abc");
        assert_eq!(debug.running_tasks.len(), 1);
        debug.end_task(id, "completed");
        assert!(debug.running_tasks.is_empty());
        assert!(debug.log.back().unwrap().message.contains("completed"));
    }

    #[test]
    fn test_debug_log_is_bounded() {
        let mut debug = DebugState::new();
        for i in 0..100 {
            debug.log(format!("line {i}"));
        }
        assert_eq!(debug.log.len(), DebugState::MAX_LOG_ENTRIES);
        assert_eq!(debug.log.front().unwrap().message, "line 50");
    }
}
