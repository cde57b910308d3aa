//! Main screen: video id input, video details and the comment list.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::api::{Comment, VideoDetails};
use crate::app::{App, Mode};
use crate::feed::FetchState;
use crate::help::{browse_help, input_help, keymap_for};
use crate::theme::ResolvedTheme;
use crate::time::format_published;
use crate::widgets::{CommentList, CommentListItem, CommentListState};

use super::common::{format_count, pluralize, render_error};
use super::html;
use super::spinner::spinner_frame;
use super::status_bar::{FeedProgress, StatusBar};

/// Wrapped description lines shown before truncating.
const MAX_DESCRIPTION_LINES: usize = 3;
/// Indent of a comment's body under its author line.
const BODY_INDENT: &str = "  ";

pub struct FeedLayout {
    pub input: Rect,
    pub message: Rect,
    pub video: Rect,
    pub comments: Rect,
    pub status: Rect,
}

pub fn layout(area: Rect, video: Option<&VideoDetails>) -> FeedLayout {
    let video_height = video.map_or(0, |v| video_panel_height(v, area.width));
    let chunks = Layout::vertical([
        Constraint::Length(3),            // Input box
        Constraint::Length(1),            // Error / hint
        Constraint::Length(video_height), // Video details
        Constraint::Min(0),               // Comments
        Constraint::Length(1),            // Status bar
    ])
    .split(area);
    FeedLayout {
        input: chunks[0],
        message: chunks[1],
        video: chunks[2],
        comments: chunks[3],
        status: chunks[4],
    }
}

/// Area inside the comment list border: the scrollable viewport.
pub fn comment_viewport(area: Rect, video: Option<&VideoDetails>) -> Rect {
    layout(area, video).comments.inner(Margin::new(1, 1))
}

fn description_lines(description: &str, width: usize) -> Vec<String> {
    let text = html::to_lines(description).join("\n");
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = textwrap::wrap(&text, width.max(1))
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect();
    if lines.len() > MAX_DESCRIPTION_LINES {
        lines.truncate(MAX_DESCRIPTION_LINES);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}

fn video_panel_height(video: &VideoDetails, width: u16) -> u16 {
    let inner_width = width.saturating_sub(2) as usize;
    // Borders, title and stats.
    4 + description_lines(&video.description, inner_width).len() as u16
}

fn body_lines(text: &str, width: usize) -> Vec<String> {
    let wrap_width = width.saturating_sub(BODY_INDENT.len()).max(1);
    html::to_lines(text)
        .iter()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, wrap_width)
                    .into_iter()
                    .map(|cow| cow.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Rendered height of `comment` at `width`: author line, body, likes, gap.
pub fn comment_height(comment: &Comment, width: usize) -> usize {
    body_lines(&comment.text, width).len() + 3
}

pub fn comment_lines(
    comment: &Comment,
    width: usize,
    theme: &ResolvedTheme,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(comment.author.clone(), theme.author_style()),
        Span::styled(" · ", theme.dim_style()),
        Span::styled(
            format_published(comment.published_at, now),
            Style::default().fg(theme.comment_time),
        ),
    ])];
    for line in body_lines(&comment.text, width) {
        lines.push(Line::from(vec![
            Span::raw(BODY_INDENT),
            Span::styled(line, theme.comment_text_style()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::raw(BODY_INDENT),
        Span::styled(
            pluralize(comment.like_count, "like", "likes"),
            Style::default().fg(theme.comment_likes),
        ),
    ]));
    lines.push(Line::from(""));
    lines
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let feed = app.feed.snapshot();
    let chunks = layout(area, feed.video);

    render_input(frame, app, chunks.input);
    render_message(frame, app, chunks.message);
    if let Some(video) = feed.video {
        render_video(frame, video, &app.theme, chunks.video);
    }
    render_comments(frame, app, chunks.comments);
    render_status_bar(frame, app, chunks.status);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let editing = app.mode == Mode::Input;
    let border_style = if editing {
        Style::default().fg(theme.input_active)
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Video ID ")
        .title_top(Line::from(Span::styled(" tubeview ", theme.title_style())).right_aligned());
    let inner = block.inner(area);

    let before_cursor: String = app.input.text.chars().take(app.input.cursor).collect();
    let cursor_col = before_cursor.width();
    let scroll = cursor_col.saturating_sub(inner.width.saturating_sub(1) as usize);

    let input = Paragraph::new(app.input.text.as_str())
        .style(Style::default().fg(theme.foreground))
        .scroll((0, scroll as u16))
        .block(block);
    frame.render_widget(input, area);

    if editing && inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position(Position::new(
            inner.x + (cursor_col - scroll) as u16,
            inner.y,
        ));
    }
}

fn render_message(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = match app.feed.state() {
        FetchState::Error(msg) => Line::from(vec![
            Span::styled(format!(" {msg}"), theme.error_style()),
            Span::styled("  (r to retry)", theme.dim_style()),
        ]),
        _ if app.feed.video_id().is_none() => Line::from(Span::styled(
            " Enter a video ID and press Enter",
            theme.dim_style(),
        )),
        _ => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_video(frame: &mut Frame, video: &VideoDetails, theme: &ResolvedTheme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let width = block.inner(area).width as usize;

    let mut lines = vec![
        Line::from(Span::styled(video.title.clone(), theme.title_style())),
        Line::from(Span::styled(
            format!(
                "{} • {}",
                pluralize(video.view_count, "view", "views"),
                pluralize(video.like_count, "like", "likes")
            ),
            Style::default().fg(theme.video_stats),
        )),
    ];
    lines.extend(
        description_lines(&video.description, width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, theme.dim_style()))),
    );

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_comments(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let feed = app.feed.snapshot();

    if feed.video.is_none() {
        if let FetchState::Error(msg) = feed.state {
            render_error(frame, msg, theme, area);
            return;
        }
        let text = if feed.state.is_loading() {
            format!("{} Loading...", spinner_frame(app.loading_since))
        } else {
            String::new()
        };
        let placeholder = Paragraph::new(text).style(theme.spinner_style()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Comments "),
        );
        frame.render_widget(placeholder, area);
        return;
    }

    let title = format!(" Comments ({}) ", format_count(feed.comments.len() as u64));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title);

    if feed.comments.is_empty() {
        if let FetchState::Error(msg) = feed.state {
            render_error(frame, msg, theme, area);
            return;
        }
    }
    if feed.comments.is_empty() && !feed.state.is_loading() {
        let empty = Paragraph::new("No comments yet")
            .style(theme.dim_style())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = block.inner(area).width as usize;
    let now = app.clock.now();
    let mut items: Vec<CommentListItem> = feed
        .comments
        .iter()
        .map(|c| CommentListItem::new(comment_lines(c, width, theme, now)))
        .collect();
    if feed.state.is_loading() {
        items.push(CommentListItem::new(vec![Line::from(Span::styled(
            format!("{} Loading more comments...", spinner_frame(app.loading_since)),
            theme.spinner_style(),
        ))]));
    }

    let list = CommentList::new(items).block(block);
    let mut state = CommentListState::with_offset(app.scroll_top);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let feed = app.feed.snapshot();
    let mode = match app.mode {
        Mode::Input => "Input",
        Mode::Browse => "Comments",
    };
    let help = match app.mode {
        Mode::Input => input_help(),
        Mode::Browse => browse_help(),
    };
    let hints = help.format(&keymap_for(app.mode), app.show_help);
    let spinner = spinner_frame(app.loading_since);

    let mut status = StatusBar::new(&app.theme, mode)
        .progress(FeedProgress::of(&feed))
        .hints(&hints);
    if feed.state.is_loading() {
        status = status.loading(spinner);
    }
    status.render(frame, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CommentBuilder, TEST_NOW, TestAppBuilder, sample_video};
    use crate::theme::{ThemeVariant, default_for_variant};
    use crate::views::tests::render_to_string;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(TEST_NOW, 0).unwrap()
    }

    #[test]
    fn test_comment_height_matches_lines() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let comment = CommentBuilder::new()
            .text("A fairly long comment that will need to wrap across lines<br>and a second line")
            .build();
        for width in [10, 20, 40, 200] {
            let lines = comment_lines(&comment, width, &theme, now());
            assert_eq!(lines.len(), comment_height(&comment, width), "width {width}");
        }
    }

    #[test]
    fn test_comment_lines_content() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let comment = CommentBuilder::new()
            .author("alice")
            .text("hello &amp; welcome")
            .likes(1)
            .build();
        let text: Vec<String> = comment_lines(&comment, 40, &theme, now())
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(text[0], "alice · 1d ago");
        assert_eq!(text[1], "  hello & welcome");
        assert_eq!(text[2], "  1 like");
        assert_eq!(text[3], "");
    }

    #[test]
    fn test_empty_body_still_has_header_and_likes() {
        let comment = CommentBuilder::new().text("").build();
        assert_eq!(comment_height(&comment, 40), 3);
    }

    #[test]
    fn test_layout_without_video_has_no_panel() {
        let chunks = layout(Rect::new(0, 0, 80, 24), None);
        assert_eq!(chunks.video.height, 0);
        assert_eq!(chunks.input.height, 3);
        assert_eq!(chunks.comments.height, 24 - 3 - 1 - 1);
    }

    #[test]
    fn test_layout_with_video_reserves_panel() {
        let video = sample_video();
        let chunks = layout(Rect::new(0, 0, 80, 24), Some(&video));
        // Borders, title, stats and one description line.
        assert_eq!(chunks.video.height, 5);
        let viewport = comment_viewport(Rect::new(0, 0, 80, 24), Some(&video));
        assert_eq!(viewport.height, 24 - 3 - 1 - 5 - 1 - 2);
        assert_eq!(viewport.width, 78);
    }

    #[test]
    fn test_long_description_is_truncated() {
        let text = "word ".repeat(200);
        let lines = description_lines(&text, 20);
        assert_eq!(lines.len(), MAX_DESCRIPTION_LINES);
        assert!(lines.last().unwrap().ends_with('…'));
    }

    #[test]
    fn test_render_loaded_feed() {
        let app = TestAppBuilder::new()
            .mode(Mode::Browse)
            .with_comments(vec![
                CommentBuilder::new()
                    .id("1")
                    .author("alice")
                    .text("First!")
                    .likes(1234)
                    .build(),
            ])
            .build();
        let output = render_to_string(80, 24, |frame| render(frame, &app, frame.area()));

        assert!(output.contains("Video ID"));
        assert!(output.contains("tubeview"));
        assert!(output.contains("abc123"));
        assert!(output.contains("T"));
        assert!(output.contains("10 views • 2 likes"));
        assert!(output.contains("Comments (1)"));
        assert!(output.contains("alice · 1d ago"));
        assert!(output.contains("First!"));
        assert!(output.contains("1,234 likes"));
        assert!(output.contains("1 comment · 1 page · end"));
    }

    #[test]
    fn test_render_idle_shows_hint() {
        let app = TestAppBuilder::new().build();
        let output = render_to_string(80, 24, |frame| render(frame, &app, frame.area()));
        assert!(output.contains("Enter a video ID"));
        assert!(output.contains("Enter:load"));
    }

    #[test]
    fn test_render_lookup_error() {
        let app = TestAppBuilder::new().error("Video not found").build();
        let output = render_to_string(80, 24, |frame| render(frame, &app, frame.area()));
        assert!(output.contains("Video not found"));
        assert!(output.contains("r to retry"));
        assert!(!output.contains("views"));
    }

    #[test]
    fn test_render_failed_relookup_keeps_video_panel() {
        // No cursor, so the builder's failure lands on a second lookup.
        let app = TestAppBuilder::new()
            .with_comment_count(1)
            .error("Video not found")
            .build();
        let output = render_to_string(80, 24, |frame| render(frame, &app, frame.area()));
        assert!(output.contains("10 views"));
        assert!(output.contains("Video not found"));
        assert!(!output.contains("Comment number 0"));
    }

    #[test]
    fn test_render_page_error_keeps_comments() {
        let app = TestAppBuilder::new()
            .with_comment_count(2)
            .next_page("p2")
            .error("Error connecting to server")
            .build();
        let output = render_to_string(80, 24, |frame| render(frame, &app, frame.area()));
        assert!(output.contains("Error connecting to server"));
        assert!(output.contains("Comment number 0"));
    }

    #[test]
    fn test_render_loading_more() {
        let app = TestAppBuilder::new()
            .with_comment_count(1)
            .next_page("p2")
            .loading()
            .build();
        let output = render_to_string(80, 24, |frame| render(frame, &app, frame.area()));
        assert!(output.contains("Loading more comments..."));
        assert!(output.contains("Loading..."));
    }

    #[test]
    fn test_render_no_comments() {
        let app = TestAppBuilder::new().with_comments(vec![]).build();
        let output = render_to_string(80, 24, |frame| render(frame, &app, frame.area()));
        assert!(output.contains("No comments yet"));
    }

    #[test]
    fn test_render_scrolled() {
        let app = TestAppBuilder::new()
            .with_comment_count(20)
            .scroll_top(8)
            .build();
        let output = render_to_string(80, 24, |frame| render(frame, &app, frame.area()));
        // Four lines per comment: the list starts at the third comment.
        assert!(!output.contains("Comment number 0"));
        assert!(output.contains("Comment number 2"));
    }
}
