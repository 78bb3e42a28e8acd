// SPDX-License-Identifier: MIT
//
// FrameBuffer: a grid of styled cells, painted by the editor and diffed by
// the renderer.
//
// Wide characters (CJK, most emoji) take two columns. The first cell holds
// the char and the second is a continuation cell that the renderer skips.
// Overwriting either half of a wide char blanks the other half, so the grid
// never holds a dangling half.

use unicode_width::UnicodeWidthChar;

use crate::style::Style;

// ─── Cell ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// `None` marks the right half of a wide char.
    pub ch: Option<char>,
    pub style: Style,
}

impl Cell {
    pub const BLANK: Self = Self {
        ch: Some(' '),
        style: Style::PLAIN,
    };

    #[must_use]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch: Some(ch), style }
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch.is_none()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

// ─── FrameBuffer ────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Resize and blank. Contents are not preserved; the next paint
    /// redraws everything anyway.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::BLANK);
    }

    /// Write one cell, blanking any wide char it cuts in half.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if !self.in_bounds(x, y) {
            return;
        }
        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            self.cells[idx - 1].ch = Some(' ');
        }
        if x + 1 < self.width && self.cells[idx + 1].is_continuation() {
            self.cells[idx + 1] = Cell {
                ch: Some(' '),
                style: self.cells[idx + 1].style,
            };
        }
    }

    /// Paint `text` from `(x, y)` using at most `max_width` columns and
    /// return how many columns were used. Zero-width chars are dropped,
    /// tabs are drawn as a single space, and a wide char that would not fit
    /// becomes a space.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style, max_width: u16) -> u16 {
        if y >= self.height {
            return 0;
        }
        let limit = x.saturating_add(max_width).min(self.width);
        let mut col = x;

        for ch in text.chars() {
            if col >= limit {
                break;
            }
            let ch = if ch == '\t' { ' ' } else { ch };
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if w == 2 && col + 1 >= limit {
                self.set(col, y, Cell::new(' ', style));
                col += 1;
                break;
            }
            self.set(col, y, Cell::new(ch, style));
            if w == 2 {
                self.set(col + 1, y, Cell { ch: None, style });
                col += 2;
            } else {
                col += 1;
            }
        }
        col - x
    }

    /// Restyle every cell of row `y` from column `x` on, keeping the chars.
    pub fn fill_row(&mut self, x: u16, y: u16, style: Style) {
        if y >= self.height {
            return;
        }
        for col in x..self.width {
            let idx = self.index(col, y);
            self.cells[idx].style = style;
        }
    }

    /// Row `y` as text, continuation cells skipped and trailing blanks
    /// trimmed.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.ch)
            .collect::<String>()
            .trim_end()
            .to_owned()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Width ──────────────────────────────────────────────────────────────────

/// Terminal columns taken by `ch`: 0 for control chars, 2 for wide ones.
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    if ch == '\t' {
        return 1;
    }
    ch.width().unwrap_or(0)
}

#[must_use]
pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_buffer_is_blank() {
        let fb = FrameBuffer::new(4, 2);
        assert_eq!(fb.get(3, 1), Some(&Cell::BLANK));
        assert_eq!(fb.get(4, 0), None);
        assert_eq!(fb.row_text(0), "");
    }

    #[test]
    fn put_str_clips_to_max_width() {
        let mut fb = FrameBuffer::new(10, 1);
        assert_eq!(fb.put_str(2, 0, "hello", Style::PLAIN, 3), 3);
        assert_eq!(fb.row_text(0), "  hel");
    }

    #[test]
    fn put_str_clips_to_buffer_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        assert_eq!(fb.put_str(2, 0, "hello", Style::PLAIN, 100), 2);
        assert_eq!(fb.row_text(0), "  he");
    }

    #[test]
    fn wide_chars_take_two_columns() {
        let mut fb = FrameBuffer::new(6, 1);
        assert_eq!(fb.put_str(0, 0, "中a", Style::PLAIN, 6), 3);
        assert!(fb.get(1, 0).unwrap().is_continuation());
        assert_eq!(fb.row_text(0), "中a");
    }

    #[test]
    fn wide_char_that_does_not_fit_becomes_space() {
        let mut fb = FrameBuffer::new(3, 1);
        assert_eq!(fb.put_str(0, 0, "ab中", Style::PLAIN, 3), 3);
        assert_eq!(fb.get(2, 0).unwrap().ch, Some(' '));
    }

    #[test]
    fn overwriting_half_a_wide_char_blanks_the_other() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(0, 0, "中", Style::PLAIN, 4);
        fb.set(1, 0, Cell::new('x', Style::PLAIN));
        assert_eq!(fb.row_text(0), " x");
    }

    #[test]
    fn fill_row_restyles_rest_of_row() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(0, 0, "ab", Style::PLAIN, 4);
        let bar = Style::fg(Color::BLACK).with_bg(Color::CYAN);
        fb.fill_row(1, 0, bar);
        assert_eq!(fb.get(0, 0).unwrap().style, Style::PLAIN);
        assert_eq!(fb.get(1, 0).unwrap().style, bar);
        assert_eq!(fb.get(3, 0).unwrap().style, bar);
        assert_eq!(fb.row_text(0), "ab");
    }

    #[test]
    fn resize_blanks() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_str(0, 0, "xy", Style::PLAIN, 2);
        fb.resize(3, 1);
        assert_eq!((fb.width(), fb.height()), (3, 1));
        assert_eq!(fb.row_text(0), "");
    }

    #[test]
    fn widths() {
        assert_eq!(str_width("héllo"), 5);
        assert_eq!(str_width("中文"), 4);
        assert_eq!(char_width('\u{301}'), 0);
    }
}
