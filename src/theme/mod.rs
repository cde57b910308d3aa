mod builtin;
mod detect;

pub use builtin::default_for_variant;
pub use detect::detect_terminal_theme;

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl FromStr for ThemeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(format!("Invalid theme: {s}. Use 'dark' or 'light'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub name: String,
    pub variant: ThemeVariant,
    pub foreground: Color,
    pub foreground_dim: Color,
    pub border: Color,
    pub primary: Color,
    pub error: Color,
    pub input_active: Color,
    pub video_title: Color,
    pub video_stats: Color,
    pub comment_author: Color,
    pub comment_time: Color,
    pub comment_likes: Color,
    pub comment_text: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub spinner: Color,
}

impl ResolvedTheme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.foreground_dim)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn spinner_style(&self) -> Style {
        Style::default().fg(self.spinner)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .bg(self.status_bar_bg)
            .fg(self.status_bar_fg)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.video_title)
            .add_modifier(Modifier::BOLD)
    }

    pub fn author_style(&self) -> Style {
        Style::default()
            .fg(self.comment_author)
            .add_modifier(Modifier::BOLD)
    }

    pub fn comment_text_style(&self) -> Style {
        Style::default().fg(self.comment_text)
    }
}
