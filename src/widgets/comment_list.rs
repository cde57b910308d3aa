//! Custom list widget for comments with partial item rendering.
//!
//! Unlike Ratatui's standard List widget which skips items that don't fit
//! entirely, this widget scrolls by line and renders partial items at
//! viewport boundaries, filling the available space without gaps.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, StatefulWidget, Widget},
};

/// State for the `CommentList` widget.
#[derive(Default)]
pub struct CommentListState {
    offset: usize,
}

impl CommentListState {
    /// State scrolled so that line `offset` is at the top.
    pub const fn with_offset(offset: usize) -> Self {
        Self { offset }
    }
}

/// A single item in the comment list, containing multiple lines.
pub struct CommentListItem<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> CommentListItem<'a> {
    pub const fn new(lines: Vec<Line<'a>>) -> Self {
        Self { lines }
    }

    pub const fn height(&self) -> usize {
        self.lines.len()
    }
}

/// A list widget that renders partial items at viewport boundaries.
pub struct CommentList<'a> {
    items: Vec<CommentListItem<'a>>,
    block: Option<Block<'a>>,
}

impl<'a> CommentList<'a> {
    pub fn new(items: Vec<CommentListItem<'a>>) -> Self {
        Self { items, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl StatefulWidget for CommentList<'_> {
    type State = CommentListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width == 0 || inner.height == 0 || self.items.is_empty() {
            return;
        }

        let total: usize = self.items.iter().map(CommentListItem::height).sum();
        let line_offset = state.offset.min(total.saturating_sub(1));

        let lines = self.items.iter().flat_map(|item| item.lines.iter());
        for (y, line) in (inner.top()..inner.bottom()).zip(lines.skip(line_offset)) {
            buf.set_line(inner.left(), y, line, inner.width);
        }
    }
}
