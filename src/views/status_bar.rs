use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::feed::FeedSnapshot;
use crate::theme::ResolvedTheme;

use super::common::pluralize;

/// How far the comment feed has been paged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedProgress {
    pub comments: usize,
    pub pages: usize,
    /// The cursor ran out: nothing more to load.
    pub exhausted: bool,
}

impl FeedProgress {
    /// Progress of a feed whose video has loaded.
    pub fn of(feed: &FeedSnapshot<'_>) -> Option<Self> {
        feed.video.map(|_| Self {
            comments: feed.comments.len(),
            pages: feed.pages_loaded,
            exhausted: !feed.has_more,
        })
    }

    fn spans(self, theme: &ResolvedTheme) -> Vec<Span<'static>> {
        let mut spans = vec![Span::styled(
            format!(
                "{} · {}",
                pluralize(self.comments as u64, "comment", "comments"),
                pluralize(self.pages as u64, "page", "pages")
            ),
            theme.dim_style(),
        )];
        if self.exhausted {
            spans.push(Span::styled(" · end", theme.spinner_style()));
        }
        spans
    }
}

/// The one-line bar under the comment list.
///
/// Layout: `[Mode] [spinner] 12 comments · 2 pages · end | hints`
pub struct StatusBar<'a> {
    theme: &'a ResolvedTheme,
    mode: &'a str,
    spinner: Option<&'a str>,
    progress: Option<FeedProgress>,
    hints: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a ResolvedTheme, mode: &'a str) -> Self {
        Self {
            theme,
            mode,
            spinner: None,
            progress: None,
            hints: "",
        }
    }

    /// Spinner frame shown while a fetch is in flight.
    pub fn loading(mut self, spinner: &'a str) -> Self {
        self.spinner = Some(spinner);
        self
    }

    pub fn progress(mut self, progress: Option<FeedProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn hints(mut self, hints: &'a str) -> Self {
        self.hints = hints;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let mut spans = vec![
            Span::styled(format!(" {} ", self.mode), theme.status_bar_style()),
            Span::raw(" "),
        ];

        if let Some(spinner) = self.spinner {
            spans.push(Span::styled(format!("{spinner} Loading..."), theme.spinner_style()));
            spans.push(Span::raw(" | "));
        }

        if let Some(progress) = self.progress {
            spans.extend(progress.spans(theme));
            spans.push(Span::raw(" | "));
        }

        spans.push(Span::styled(self.hints, theme.dim_style()));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
