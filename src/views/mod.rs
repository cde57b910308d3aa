pub mod common;
pub mod debug;
pub mod feed;
pub mod help_overlay;
pub mod html;
pub mod spinner;
pub mod status_bar;


use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use crate::app::App;

const DEBUG_PANE_HEIGHT: u16 = 10;

/// Area left for the main screen once the debug pane, if shown, is split off.
pub fn main_area(area: Rect, debug_visible: bool) -> Rect {
    split(area, debug_visible).0
}

fn split(area: Rect, debug_visible: bool) -> (Rect, Option<Rect>) {
    if !debug_visible {
        return (area, None);
    }
    let chunks = Layout::vertical([
        Constraint::Min(0),                    // Main content
        Constraint::Length(DEBUG_PANE_HEIGHT), // Debug pane
    ])
    .split(area);
    (chunks[0], Some(chunks[1]))
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (main, debug_area) = split(area, app.debug.visible);

    feed::render(frame, app, main);

    if let Some(debug_area) = debug_area {
        debug::render(frame, app, debug_area);
    }

    help_overlay::render(frame, app, area);
}
