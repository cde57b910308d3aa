use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::theme::ResolvedTheme;

/// Render an error message in a bordered block.
pub fn render_error(frame: &mut Frame, error: &str, theme: &ResolvedTheme, area: Rect) {
    let widget = Paragraph::new(error)
        .style(theme.error_style())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title("Error"),
        );
    frame.render_widget(widget, area);
}

/// Group digits in threes: `1234567` → `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// "1 like", "1,204 likes".
pub fn pluralize(n: u64, singular: &str, plural: &str) -> String {
    let noun = if n == 1 { singular } else { plural };
    format!("{} {noun}", format_count(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(100_000), "100,000");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "like", "likes"), "1 like");
        assert_eq!(pluralize(0, "like", "likes"), "0 likes");
        assert_eq!(pluralize(2500, "view", "views"), "2,500 views");
    }
}
