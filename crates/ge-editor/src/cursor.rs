//! Cursor: the single write point for edits.
//!
//! The cursor is a value type holding a [`Position`] and an optional
//! selection anchor. It never references the buffer; movement methods take
//! the buffer as a parameter and clamp against it.
//!
//! Vertical movement clamps the column to the destination line and keeps
//! the clamped value. There is no remembered "sticky" column: moving down
//! through a short line and on to a long one leaves the cursor at the short
//! line's length.

use crate::buffer::Buffer;
use crate::error::{EditorError, Result};
use crate::position::{Position, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
    /// The fixed end of a selection while the cursor moves.
    anchor: Option<Position>,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            anchor: None,
        }
    }

    /// A cursor at `pos` with no selection. Not clamped.
    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self { pos, anchor: None }
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    // -- Selection ----------------------------------------------------------

    /// Drop the anchor at the current position.
    pub const fn start_selection(&mut self) {
        self.anchor = Some(self.pos);
    }

    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// The text between anchor and cursor, in document order. `None` when
    /// no anchor is set or the span is empty.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        let anchor = self.anchor?;
        let sel = Selection::ordered(anchor, self.pos);
        (!sel.is_empty()).then_some(sel)
    }

    // -- Placement ----------------------------------------------------------

    /// Move to `pos`, clamped into the buffer.
    pub fn set(&mut self, pos: Position, buf: &Buffer) {
        self.pos = buf.clamp(pos);
    }

    /// Re-validate after a mutation.
    pub fn clamp(&mut self, buf: &Buffer) {
        self.pos = buf.clamp(self.pos);
        if let Some(anchor) = self.anchor {
            self.anchor = Some(buf.clamp(anchor));
        }
    }

    /// Jump to column 0 of a 0-indexed `line`.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidLine`] (reported 1-indexed) when `line` is past
    /// the end; the cursor does not move.
    pub fn goto_line(&mut self, line: usize, buf: &Buffer) -> Result<()> {
        if line >= buf.line_count() {
            return Err(EditorError::InvalidLine {
                line: i64::try_from(line).map_or(i64::MAX, |l| l.saturating_add(1)),
            });
        }
        self.pos = Position::new(line, 0);
        Ok(())
    }

    // -- Horizontal ---------------------------------------------------------

    /// One char left, wrapping to the end of the previous line at column 0.
    pub fn move_left(&mut self, buf: &Buffer) {
        if self.pos.col > 0 {
            self.pos.col -= 1;
        } else if self.pos.line > 0 {
            self.pos.line -= 1;
            self.pos.col = buf.line_len(self.pos.line);
        }
    }

    /// One char right, wrapping to column 0 of the next line at end-of-line.
    pub fn move_right(&mut self, buf: &Buffer) {
        if self.pos.col < buf.line_len(self.pos.line) {
            self.pos.col += 1;
        } else if self.pos.line < buf.last_line() {
            self.pos.line += 1;
            self.pos.col = 0;
        }
    }

    pub const fn move_line_start(&mut self) {
        self.pos.col = 0;
    }

    pub fn move_line_end(&mut self, buf: &Buffer) {
        self.pos.col = buf.line_len(self.pos.line);
    }

    // -- Vertical -----------------------------------------------------------

    pub fn move_up(&mut self, count: usize, buf: &Buffer) {
        self.move_vertical(self.pos.line.saturating_sub(count), buf);
    }

    pub fn move_down(&mut self, count: usize, buf: &Buffer) {
        self.move_vertical(self.pos.line.saturating_add(count), buf);
    }

    /// Up by one screen. A viewport of `height` rows pages by `height - 1`
    /// so one line of context stays visible.
    pub fn page_up(&mut self, height: usize, buf: &Buffer) {
        self.move_up(height.saturating_sub(1).max(1), buf);
    }

    pub fn page_down(&mut self, height: usize, buf: &Buffer) {
        self.move_down(height.saturating_sub(1).max(1), buf);
    }

    fn move_vertical(&mut self, line: usize, buf: &Buffer) {
        let line = line.min(buf.last_line());
        self.pos = Position::new(line, self.pos.col.min(buf.line_len(line)));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
