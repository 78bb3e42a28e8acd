//! View: paints a [`Session`] onto a [`FrameBuffer`].
//!
//! The screen is the text area plus one status row at the bottom:
//!
//! ```text
//! ┌──────┬────────────────────────────────────────┐
//! │  1: │ def main():                              │ ← text rows
//! │  2: │     return 0                             │
//! ├──────┴────────────────────────────────────────┤
//! │ GETEED - main.py - 2:5 - Saved - ... - PYTHON │ ← status row
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The status row shows, in order of precedence, an open prompt, a pending
//! message, or the file status line.
//!
//! The view holds only scroll state. It keeps the cursor on screen: the top
//! line follows the cursor vertically, and horizontally the text scrolls
//! once the cursor gets within [`H_MARGIN`] columns of the right edge. With
//! line wrap on, long lines continue on the following rows and there is no
//! horizontal scroll.
//!
//! Columns on screen are display cells. A wide char takes two; a tab is
//! drawn as one blank.

use std::ops::Range;

use ge_term::frame::{Cell, FrameBuffer, char_width, str_width};
use ge_term::style::{Attr, Style};
use ge_theme::Theme;

use crate::position::{Position, Selection};
use crate::prompt::Prompt;
use crate::search::{self, Match};
use crate::session::{Level, Message, Session};
use crate::syntax::RuleSet;
use crate::tokenizer::{SpanKind, tokenize};

/// Horizontal scroll starts this many columns before the right edge.
pub const H_MARGIN: usize = 20;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Columns taken by the line-number gutter: the digits of the largest line
/// number, a `:`, and a separating space. 0 when numbers are off.
#[must_use]
pub fn gutter_width(line_count: usize, show_numbers: bool) -> u16 {
    if !show_numbers {
        return 0;
    }
    let digits = line_count.max(1).ilog10() + 1;
    #[allow(clippy::cast_possible_truncation)] // at most 20 digits
    let width = digits as u16 + 2;
    width
}

/// Display columns taken by the first `col` chars of `line`.
#[must_use]
pub fn display_col(line: &str, col: usize) -> usize {
    line.chars().take(col).map(char_width).sum()
}

/// Char index where each screen row of a wrapped line starts. Always starts
/// with 0, so an empty line is one row.
fn row_starts(line: &str, width: usize) -> Vec<usize> {
    let mut starts = vec![0];
    let mut used = 0;
    for (i, ch) in line.chars().enumerate() {
        let w = char_width(ch);
        if used > 0 && used + w > width {
            starts.push(i);
            used = 0;
        }
        used += w;
    }
    starts
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

const fn kind_style(theme: &Theme, kind: SpanKind) -> Style {
    match kind {
        SpanKind::Keyword => theme.keyword,
        SpanKind::String => theme.string,
        SpanKind::Comment => theme.comment,
        SpanKind::Number => theme.number,
        SpanKind::Plain => theme.text,
    }
}

/// The status line text: file, position, state, language, recording.
#[must_use]
pub fn status_text(session: &Session) -> String {
    let pos = session.position();
    let mut status = format!(
        "GETEED - {} - {}:{} - {} - {} - {}",
        session.file_name(),
        pos.line + 1,
        pos.col + 1,
        if session.is_modified() { "Modified" } else { "Saved" },
        if session.options().read_only {
            "READ ONLY"
        } else {
            "READ/WRITE"
        },
        session.language().to_uppercase(),
    );
    if session.is_recording() {
        status.push_str(" - RECORDING");
    }
    status
}

// ---------------------------------------------------------------------------
// Bottom row
// ---------------------------------------------------------------------------

/// What the status row shows this frame.
#[derive(Debug, Clone, Copy)]
pub enum Bottom<'a> {
    Status,
    Message(&'a Message),
    Prompt(&'a Prompt),
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Where the text area sits this frame.
#[derive(Debug, Clone, Copy)]
struct Layout {
    gutter: u16,
    text_x: u16,
    text_width: usize,
    text_height: usize,
}

impl Layout {
    fn new(session: &Session, frame: &FrameBuffer) -> Self {
        let gutter = gutter_width(
            session.buffer().line_count(),
            session.options().line_numbers,
        )
        .min(frame.width());
        Self {
            gutter,
            text_x: gutter,
            text_width: usize::from(frame.width() - gutter),
            text_height: usize::from(frame.height().saturating_sub(1)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct View {
    /// First visible buffer line.
    top_line: usize,
    /// Horizontal scroll in display columns. Always 0 with wrap on.
    left_col: usize,
}

impl View {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            top_line: 0,
            left_col: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn top_line(&self) -> usize {
        self.top_line
    }

    #[inline]
    #[must_use]
    pub const fn left_col(&self) -> usize {
        self.left_col
    }

    /// Scroll so `line` sits in the middle of a `text_height` row area.
    pub const fn center_on(&mut self, line: usize, text_height: usize) {
        self.top_line = line.saturating_sub(text_height / 2);
    }

    // -- Scrolling ----------------------------------------------------------

    fn ensure_cursor_visible(&mut self, session: &Session, layout: Layout) {
        if layout.text_height == 0 || layout.text_width == 0 {
            return;
        }
        let buf = session.buffer();
        let pos = session.position();

        if pos.line < self.top_line {
            self.top_line = pos.line;
        }

        if session.options().line_wrap {
            self.left_col = 0;
            let width = layout.text_width;
            let line = buf.line(pos.line);
            let starts = row_starts(&line, width);
            let cursor_row = starts.iter().rposition(|&s| s <= pos.col).unwrap_or(0);
            // Rows from the top of the screen down to the cursor's row.
            let mut rows: usize = (self.top_line..pos.line)
                .map(|l| row_starts(&buf.line(l), width).len())
                .sum::<usize>()
                + cursor_row
                + 1;
            while rows > layout.text_height && self.top_line < pos.line {
                rows -= row_starts(&buf.line(self.top_line), width).len();
                self.top_line += 1;
            }
        } else {
            if pos.line >= self.top_line + layout.text_height {
                self.top_line = pos.line + 1 - layout.text_height;
            }
            let x = display_col(&buf.line(pos.line), pos.col);
            let margin = H_MARGIN.min(layout.text_width / 2).max(1);
            if x < self.left_col {
                self.left_col = x;
            } else if x + margin >= self.left_col + layout.text_width {
                self.left_col = x + margin - layout.text_width;
            }
        }
    }

    // -- Rendering ----------------------------------------------------------

    /// Paint the whole screen and return where the terminal cursor goes.
    pub fn render(
        &mut self,
        session: &Session,
        rules: Option<&RuleSet>,
        theme: &Theme,
        bottom: Bottom<'_>,
        frame: &mut FrameBuffer,
    ) -> Option<(u16, u16)> {
        if frame.width() == 0 || frame.height() == 0 {
            return None;
        }
        let layout = Layout::new(session, frame);
        self.ensure_cursor_visible(session, layout);

        let text_cursor = self.render_text(session, rules, theme, layout, frame);

        let status_y = frame.height() - 1;
        match bottom {
            Bottom::Status => {
                frame.put_str(0, status_y, &status_text(session), theme.status_bar, frame.width());
                frame.fill_row(0, status_y, theme.status_bar);
                text_cursor
            }
            Bottom::Message(msg) => {
                let style = match msg.level {
                    Level::Info => theme.info,
                    Level::Warning => theme.warning,
                    Level::Error => theme.error,
                };
                frame.put_str(0, status_y, &msg.text, style, frame.width());
                text_cursor
            }
            Bottom::Prompt(prompt) => Some(render_prompt(frame, prompt, theme, status_y)),
        }
    }

    fn render_text(
        &self,
        session: &Session,
        rules: Option<&RuleSet>,
        theme: &Theme,
        layout: Layout,
        frame: &mut FrameBuffer,
    ) -> Option<(u16, u16)> {
        let buf = session.buffer();
        let pos = session.position();
        let wrap = session.options().line_wrap;
        let selection = session.cursor().selection();
        let mut cursor = None;
        let mut y = 0;
        let mut row = self.top_line;

        while y < layout.text_height && row < buf.line_count() {
            let line = buf.line(row);
            let current = row == pos.line;
            let selected = selection.map_or(0..0, |sel| selected_cols(sel, row, buf.line_len(row)));
            let cells = styled_chars(
                &line,
                rules,
                &search::matches_in_line(buf, session.search_term(), row),
                &selected,
                theme,
                current,
            );

            if layout.gutter > 0 {
                let label = format!("{}:", row + 1);
                let pad = usize::from(layout.gutter - 1).saturating_sub(label.len());
                frame.put_str(to_u16(pad), to_u16(y), &label, theme.line_number, layout.gutter);
            }

            let used = if wrap {
                self.paint_wrapped(frame, &line, &cells, layout, y, current.then_some(pos), &mut cursor)
            } else {
                self.paint_scrolled(frame, &line, &cells, layout, y, current.then_some(pos), &mut cursor);
                1
            };
            if current {
                for r in y..(y + used).min(layout.text_height) {
                    let r = to_u16(r);
                    let end = row_end(frame, r);
                    frame.fill_row(end.max(layout.text_x), r, theme.current_line);
                }
            }
            y += used;
            row += 1;
        }
        cursor
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_scrolled(
        &self,
        frame: &mut FrameBuffer,
        line: &str,
        cells: &[(char, Style)],
        layout: Layout,
        y: usize,
        cursor_at: Option<Position>,
        cursor: &mut Option<(u16, u16)>,
    ) {
        let y16 = to_u16(y);
        let mut dc = 0;
        for &(ch, style) in cells {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if dc < self.left_col {
                // A wide char cut by the left edge shows as a blank.
                if dc + w > self.left_col {
                    frame.set(layout.text_x, y16, Cell::new(' ', style));
                }
                dc += w;
                continue;
            }
            let sx = dc - self.left_col;
            if sx + w > layout.text_width {
                break;
            }
            put_char(frame, layout.text_x + to_u16(sx), y16, ch, style);
            dc += w;
        }

        if let Some(pos) = cursor_at {
            let x = display_col(line, pos.col);
            if x >= self.left_col && x - self.left_col < layout.text_width {
                *cursor = Some((layout.text_x + to_u16(x - self.left_col), y16));
            }
        }
    }

    /// Returns the number of rows used.
    #[allow(clippy::too_many_arguments, clippy::unused_self)]
    fn paint_wrapped(
        &self,
        frame: &mut FrameBuffer,
        line: &str,
        cells: &[(char, Style)],
        layout: Layout,
        y: usize,
        cursor_at: Option<Position>,
        cursor: &mut Option<(u16, u16)>,
    ) -> usize {
        let starts = row_starts(line, layout.text_width);
        for (i, &start) in starts.iter().enumerate() {
            let sy = y + i;
            if sy >= layout.text_height {
                break;
            }
            let end = starts.get(i + 1).copied().unwrap_or(cells.len());
            let mut sx = 0;
            for &(ch, style) in &cells[start..end] {
                let w = char_width(ch);
                if w == 0 || sx + w > layout.text_width {
                    continue;
                }
                put_char(frame, layout.text_x + to_u16(sx), to_u16(sy), ch, style);
                sx += w;
            }
        }

        if let Some(pos) = cursor_at {
            let row = starts.iter().rposition(|&s| s <= pos.col).unwrap_or(0);
            let sy = y + row;
            if sy < layout.text_height {
                let start = starts[row];
                let x: usize = cells[start..pos.col.min(cells.len())]
                    .iter()
                    .map(|&(ch, _)| char_width(ch))
                    .sum();
                let x = x.min(layout.text_width.saturating_sub(1));
                *cursor = Some((layout.text_x + to_u16(x), to_u16(sy)));
            }
        }
        starts.len()
    }
}

// ---------------------------------------------------------------------------
// Painting helpers
// ---------------------------------------------------------------------------

/// The columns of `row` covered by `sel`.
fn selected_cols(sel: Selection, row: usize, line_len: usize) -> Range<usize> {
    if row < sel.start.line || row > sel.end.line {
        return 0..0;
    }
    let from = if row == sel.start.line { sel.start.col } else { 0 };
    let to = if row == sel.end.line { sel.end.col } else { line_len };
    from..to
}

/// Every char of `line` with the style it is drawn in: its token kind,
/// search hits on top, and the current-line band underneath. Selected
/// chars are drawn reversed.
fn styled_chars(
    line: &str,
    rules: Option<&RuleSet>,
    hits: &[Match],
    selected: &Range<usize>,
    theme: &Theme,
    current: bool,
) -> Vec<(char, Style)> {
    let chars: Vec<char> = line.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    for span in tokenize(line, rules) {
        let base = kind_style(theme, span.kind);
        for (i, &ch) in chars.iter().enumerate().take(span.end).skip(span.start) {
            let hit = hits.iter().any(|m| (m.start.col..m.end().col).contains(&i));
            let mut style = if hit { theme.selection } else { base };
            if current {
                style = style.over(theme.current_line);
            }
            if selected.contains(&i) {
                style = style.with_attrs(style.attrs | Attr::REVERSE);
            }
            out.push((ch, style));
        }
    }
    out
}

fn put_char(frame: &mut FrameBuffer, x: u16, y: u16, ch: char, style: Style) {
    let mut utf8 = [0u8; 4];
    frame.put_str(x, y, ch.encode_utf8(&mut utf8), style, 2);
}

/// Column just past the last non-blank cell of row `y`.
fn row_end(frame: &FrameBuffer, y: u16) -> u16 {
    frame
        .row(y)
        .unwrap_or_default()
        .iter()
        .rposition(|c| *c != Cell::BLANK)
        .map_or(0, |i| to_u16(i + 1))
}

fn render_prompt(frame: &mut FrameBuffer, prompt: &Prompt, theme: &Theme, y: u16) -> (u16, u16) {
    let label = prompt.kind().label();
    let width = frame.width();
    let used = frame.put_str(0, y, &label, theme.status_bar, width);
    frame.put_str(used, y, prompt.input(), theme.text, width - used);
    let before: String = prompt.input().chars().take(prompt.cursor()).collect();
    let x = usize::from(used) + str_width(&before);
    (to_u16(x).min(width.saturating_sub(1)), y)
}

/// Paint a full-screen list (help text, bookmark selector) over everything.
/// The first line is drawn in the info style.
pub fn render_overlay(frame: &mut FrameBuffer, lines: &[String], theme: &Theme) {
    frame.clear();
    let width = frame.width();
    for (y, line) in (0..frame.height()).zip(lines) {
        let style = if y == 0 { theme.info } else { theme.text };
        frame.put_str(0, y, line, style, width);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::command::EditCommand;
    use crate::options::Options;
    use crate::prompt::PromptKind;
    use crate::syntax::RuleRegistry;
    use pretty_assertions::assert_eq;

    fn session(text: &str) -> Session {
        Session::new(Buffer::from_text(text), "t.txt", Options::default())
    }

    fn paint(view: &mut View, s: &Session, w: u16, h: u16) -> (FrameBuffer, Option<(u16, u16)>) {
        let mut frame = FrameBuffer::new(w, h);
        let cursor = view.render(s, None, &Theme::dark(), Bottom::Status, &mut frame);
        (frame, cursor)
    }

    // -- Helpers ------------------------------------------------------------

    #[test]
    fn gutter_grows_with_digits() {
        assert_eq!(gutter_width(9, true), 3);
        assert_eq!(gutter_width(10, true), 4);
        assert_eq!(gutter_width(1000, true), 6);
        assert_eq!(gutter_width(1000, false), 0);
        assert_eq!(gutter_width(0, true), 3);
    }

    #[test]
    fn display_col_counts_wide_chars() {
        assert_eq!(display_col("a中b", 2), 3);
        assert_eq!(display_col("abc", 10), 3);
    }

    #[test]
    fn row_starts_break_on_width() {
        assert_eq!(row_starts("", 4), vec![0]);
        assert_eq!(row_starts("abcdefghij", 4), vec![0, 4, 8]);
        // A wide char that doesn't fit moves to the next row.
        assert_eq!(row_starts("abc中", 4), vec![0, 3]);
    }

    // -- Text and gutter ----------------------------------------------------

    #[test]
    fn paints_gutter_and_text() {
        let s = session("hello\nworld");
        let (frame, cursor) = paint(&mut View::new(), &s, 20, 4);
        assert_eq!(frame.row_text(0), "1: hello");
        assert_eq!(frame.row_text(1), "2: world");
        assert_eq!(frame.row_text(2), "");
        assert_eq!(cursor, Some((3, 0)));
    }

    #[test]
    fn no_gutter_with_numbers_off() {
        let mut s = session("hello");
        s.apply(&EditCommand::ToggleLineNumbers);
        let (frame, cursor) = paint(&mut View::new(), &s, 20, 3);
        assert_eq!(frame.row_text(0), "hello");
        assert_eq!(cursor, Some((0, 0)));
    }

    #[test]
    fn status_line_contents() {
        let mut s = session("abc");
        s.apply(&EditCommand::LineEnd);
        assert_eq!(
            status_text(&s),
            "GETEED - t.txt - 1:4 - Saved - READ/WRITE - TEXT"
        );
        s.apply(&EditCommand::ToggleMacroRecording);
        s.apply(&EditCommand::InsertChar('x'));
        assert_eq!(
            status_text(&s),
            "GETEED - t.txt - 1:5 - Modified - READ/WRITE - TEXT - RECORDING"
        );
        let (frame, _) = paint(&mut View::new(), &s, 80, 3);
        assert!(frame.row_text(2).starts_with("GETEED - t.txt"));
        assert_eq!(frame.get(79, 2).unwrap().style, Theme::dark().status_bar);
    }

    #[test]
    fn syntax_colors() {
        let registry = RuleRegistry::builtin();
        let s = session("def f(): # hi");
        let theme = Theme::dark();
        let mut frame = FrameBuffer::new(30, 3);
        let mut view = View::new();
        view.render(&s, registry.get("python"), &theme, Bottom::Status, &mut frame);
        // Gutter is 3 wide: "1: "
        let kw = frame.get(3, 0).unwrap();
        assert_eq!(kw.ch, Some('d'));
        assert_eq!(kw.style.fg, theme.keyword.fg);
        let comment = frame.get(12, 0).unwrap();
        assert_eq!(comment.ch, Some('#'));
        assert_eq!(comment.style.fg, theme.comment.fg);
    }

    #[test]
    fn current_line_band_spans_the_row() {
        let s = session("ab\ncd");
        let theme = Theme::dark();
        let (frame, _) = paint(&mut View::new(), &s, 10, 4);
        assert_eq!(frame.get(3, 0).unwrap().style.bg, theme.current_line.bg);
        assert_eq!(frame.get(9, 0).unwrap().style.bg, theme.current_line.bg);
        assert_ne!(frame.get(9, 1).unwrap().style.bg, theme.current_line.bg);
    }

    #[test]
    fn search_hits_use_selection_style() {
        let mut s = session("xx foo xx\nfoo");
        s.apply(&EditCommand::Find("foo".into()));
        let theme = Theme::dark();
        assert_eq!(s.position(), Position::new(0, 3));
        let (frame, _) = paint(&mut View::new(), &s, 20, 4);
        // Off the cursor line the hit is drawn in the plain selection style.
        let cell = frame.get(3, 1).unwrap();
        assert_eq!(cell.ch, Some('f'));
        assert_eq!(cell.style, theme.selection);
        // On the cursor line it keeps the current-line background.
        let hit = frame.get(3 + 3, 0).unwrap();
        assert_eq!(hit.style.fg, theme.selection.fg);
        assert_eq!(hit.style.bg, theme.current_line.bg);
        assert_ne!(frame.get(3 + 2, 0).unwrap().style.fg, theme.selection.fg);
    }

    #[test]
    fn selection_is_drawn_reversed() {
        let mut s = session("ab\ncd\nef");
        s.apply(&EditCommand::MoveRight);
        s.apply(&EditCommand::SelectDown);
        let (frame, _) = paint(&mut View::new(), &s, 10, 4);
        let reversed = |x, y| frame.get(x, y).unwrap().style.attrs.contains(Attr::REVERSE);
        assert!(!reversed(3, 0));
        assert!(reversed(4, 0));
        assert!(reversed(3, 1));
        assert!(!reversed(4, 1));
        assert!(!reversed(3, 2));
    }

    #[test]
    fn selected_cols_per_row() {
        let sel = Selection::new(Position::new(1, 2), Position::new(3, 1));
        assert_eq!(selected_cols(sel, 0, 5), 0..0);
        assert_eq!(selected_cols(sel, 1, 5), 2..5);
        assert_eq!(selected_cols(sel, 2, 7), 0..7);
        assert_eq!(selected_cols(sel, 3, 5), 0..1);
        assert_eq!(selected_cols(sel, 4, 5), 0..0);
    }

    // -- Scrolling ----------------------------------------------------------

    #[test]
    fn vertical_scroll_follows_cursor() {
        let text = (1..=20).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let mut s = session(&text);
        let mut view = View::new();
        s.apply(&EditCommand::GotoLine("15".into()));
        // 5 rows: 4 text + status.
        let (frame, cursor) = paint(&mut view, &s, 20, 5);
        assert_eq!(view.top_line(), 11);
        assert_eq!(frame.row_text(3), "15: l15");
        assert_eq!(cursor, Some((4, 3)));
        s.apply(&EditCommand::GotoLine("2".into()));
        paint(&mut view, &s, 20, 5);
        assert_eq!(view.top_line(), 1);
    }

    #[test]
    fn horizontal_scroll_keeps_margin() {
        let mut s = session(&"x".repeat(100));
        s.apply(&EditCommand::ToggleLineNumbers);
        s.apply(&EditCommand::LineEnd);
        let mut view = View::new();
        let (_, cursor) = paint(&mut view, &s, 60, 3);
        // Cursor at column 100 with a 20 column margin in a 60 wide area.
        assert_eq!(view.left_col(), 60);
        assert_eq!(cursor, Some((40, 0)));
        s.apply(&EditCommand::LineStart);
        let (_, cursor) = paint(&mut view, &s, 60, 3);
        assert_eq!(view.left_col(), 0);
        assert_eq!(cursor, Some((0, 0)));
    }

    #[test]
    fn center_on() {
        let mut view = View::new();
        view.center_on(50, 20);
        assert_eq!(view.top_line(), 40);
        view.center_on(3, 20);
        assert_eq!(view.top_line(), 0);
    }

    // -- Wrap ---------------------------------------------------------------

    #[test]
    fn wrapped_lines_continue_below() {
        let mut s = session("abcdefghij\nz");
        s.apply(&EditCommand::ToggleLineNumbers);
        s.apply(&EditCommand::ToggleLineWrap);
        s.apply(&EditCommand::LineEnd);
        let (frame, cursor) = paint(&mut View::new(), &s, 4, 6);
        assert_eq!(frame.row_text(0), "abcd");
        assert_eq!(frame.row_text(1), "efgh");
        assert_eq!(frame.row_text(2), "ij");
        assert_eq!(frame.row_text(3), "z");
        assert_eq!(cursor, Some((2, 2)));
    }

    #[test]
    fn wrap_scrolls_by_whole_lines() {
        let mut s = session("aaaaaaaa\nbbbbbbbb\ncc");
        s.apply(&EditCommand::ToggleLineNumbers);
        s.apply(&EditCommand::ToggleLineWrap);
        s.apply(&EditCommand::GotoLine("3".into()));
        let mut view = View::new();
        // 3 text rows; lines 1 and 2 take two rows each.
        let (frame, cursor) = paint(&mut view, &s, 4, 4);
        assert_eq!(view.top_line(), 1);
        assert_eq!(frame.row_text(0), "bbbb");
        assert_eq!(frame.row_text(2), "cc");
        assert_eq!(cursor, Some((0, 2)));
    }

    // -- Bottom row ---------------------------------------------------------

    #[test]
    fn message_replaces_status() {
        let s = session("");
        let msg = Message::warning("Not found: x");
        let theme = Theme::dark();
        let mut frame = FrameBuffer::new(30, 3);
        View::new().render(&s, None, &theme, Bottom::Message(&msg), &mut frame);
        assert_eq!(frame.row_text(2), "Not found: x");
        assert_eq!(frame.get(0, 2).unwrap().style, theme.warning);
    }

    #[test]
    fn prompt_owns_the_cursor() {
        let s = session("");
        let mut prompt = Prompt::new(PromptKind::GotoLine);
        prompt.insert_str("42");
        let mut frame = FrameBuffer::new(30, 3);
        let cursor =
            View::new().render(&s, None, &Theme::dark(), Bottom::Prompt(&prompt), &mut frame);
        assert_eq!(frame.row_text(2), "Go to line: 42");
        assert_eq!(cursor, Some((14, 2)));
    }

    #[test]
    fn overlay_lists_lines() {
        let mut frame = FrameBuffer::new(20, 3);
        let lines = vec!["Bookmarks:".to_owned(), "3: ccc".to_owned(), "x".to_owned(), "y".to_owned()];
        render_overlay(&mut frame, &lines, &Theme::dark());
        assert_eq!(frame.row_text(0), "Bookmarks:");
        assert_eq!(frame.row_text(1), "3: ccc");
        assert_eq!(frame.row_text(2), "x");
    }

    #[test]
    fn tiny_frame_does_not_panic() {
        let s = session("hello");
        let (_, cursor) = paint(&mut View::new(), &s, 2, 1);
        assert_eq!(cursor, None);
        let mut frame = FrameBuffer::new(0, 0);
        assert_eq!(
            View::new().render(&s, None, &Theme::dark(), Bottom::Status, &mut frame),
            None
        );
    }
}
