//! Help overlay view showing keybindings.

use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
};

use crate::app::{App, Mode};
use crate::help::{keymap_for, overlay_items};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.show_help {
        return;
    }

    // Dim the underlying content
    let buf = frame.buffer_mut();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = &mut buf[(x, y)];
            cell.set_style(cell.style().add_modifier(Modifier::DIM));
        }
    }

    let theme = &app.theme;
    let keymap = keymap_for(Mode::Browse);
    let formatted: Vec<(String, &str)> = overlay_items()
        .iter()
        .filter_map(|item| item.format_for_overlay(&keymap))
        .collect();

    // Calculate dimensions
    let key_width = formatted
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0);
    let label_width = formatted.iter().map(|(_, l)| l.len()).max().unwrap_or(0);
    let content_width = key_width + 2 + label_width; // 2 for column spacing
    let padding = 2; // 1 char padding on each side
    let popup_width = (content_width + 2 + padding * 2) as u16; // 2 for borders
    let popup_height = (formatted.len() + 2 + 2) as u16; // 2 for borders, 2 for vertical padding

    // Ensure popup fits in area
    let popup_width = popup_width.min(area.width.saturating_sub(4));
    let popup_height = popup_height.min(area.height.saturating_sub(4));
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = formatted
        .iter()
        .map(|(keys, label)| {
            Line::from(vec![
                Span::styled(format!("{:>width$}", keys, width = key_width), theme.dim_style()),
                Span::raw("  "),
                Span::styled(
                    format!("{:<width$}", label, width = label_width),
                    theme.comment_text_style(),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title("Help")
            .title_style(theme.title_style())
            .padding(Padding::uniform(1)),
    );

    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
