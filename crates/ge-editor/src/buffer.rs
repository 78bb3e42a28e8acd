//! Line buffer: the document text and its editing primitives.
//!
//! A `Buffer` wraps a [`ropey::Rope`] built with only `\n` recognized as a
//! line break, so the rope's line structure is exactly the editor's line
//! structure. A `\r` is ordinary text. Columns are char offsets.
//!
//! The buffer always has at least one line: the empty document is one empty
//! line, and text ending in `\n` has a trailing empty line. That makes
//! load-then-save reproduce the file byte for byte.
//!
//! Every mutating method marks the buffer modified. None of them panic on an
//! out-of-range position; positions are clamped first.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};

use crate::error::{EditorError, Result};
use crate::position::{Position, Selection};

pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An unnamed buffer holding `text`, unmodified.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
            modified: false,
        }
    }

    /// Load `path` as UTF-8.
    ///
    /// # Errors
    ///
    /// [`EditorError::Load`] when the file can't be read or isn't UTF-8.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| EditorError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded {} ({} bytes)", path.display(), text.len());
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
            modified: false,
        })
    }

    /// An empty buffer for a file that doesn't exist yet. It starts out
    /// modified, since saving it creates the file.
    #[must_use]
    pub fn new_file(path: &Path) -> Self {
        Self {
            rope: Rope::new(),
            path: Some(path.to_path_buf()),
            modified: true,
        }
    }

    // -- Text access --------------------------------------------------------

    /// Number of lines. Never zero.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// The last valid line index.
    #[inline]
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    /// Line `row` without its newline, or an empty slice past the end.
    #[must_use]
    pub fn line_slice(&self, row: usize) -> RopeSlice<'_> {
        if row >= self.line_count() {
            return self.rope.slice(0..0);
        }
        let line = self.rope.line(row);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            line.slice(..len - 1)
        } else {
            line
        }
    }

    /// Line `row` as an owned string, without its newline.
    #[must_use]
    pub fn line(&self, row: usize) -> String {
        self.line_slice(row).to_string()
    }

    /// Length of line `row` in chars, excluding the newline.
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.line_slice(row).len_chars()
    }

    /// The whole document.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// All lines as owned strings.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).map(|row| self.line(row)).collect()
    }

    // -- Coordinates --------------------------------------------------------

    /// Pull `pos` back inside the document: row into `[0, line_count)`,
    /// column into `[0, line_len(row)]`.
    #[must_use]
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    fn char_idx(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        self.rope.line_to_char(pos.line) + pos.col
    }

    fn clamp_selection(&self, sel: Selection) -> (usize, usize) {
        let start = self.char_idx(sel.start);
        let end = self.char_idx(sel.end);
        (start.min(end), start.max(end))
    }

    // -- Core edits ---------------------------------------------------------

    /// Splice `text` in at `pos` and return where the cursor lands: just past
    /// the inserted text. Newlines in `text` split the line.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        if text.is_empty() {
            return pos;
        }
        self.rope.insert(self.char_idx(pos), text);
        self.modified = true;

        match text.rfind('\n') {
            None => Position::new(pos.line, pos.col + text.chars().count()),
            Some(last_nl) => {
                let breaks = text.matches('\n').count();
                let tail = text[last_nl + 1..].chars().count();
                Position::new(pos.line + breaks, tail)
            }
        }
    }

    /// Remove the selected text and return it, with line breaks as `\n`.
    /// An empty selection is a no-op.
    pub fn delete_range(&mut self, sel: Selection) -> String {
        let (start, end) = self.clamp_selection(sel);
        if start == end {
            return String::new();
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.modified = true;
        removed
    }

    /// The selected text, without touching the buffer.
    #[must_use]
    pub fn get_range(&self, sel: Selection) -> String {
        let (start, end) = self.clamp_selection(sel);
        self.rope.slice(start..end).to_string()
    }

    /// Replace the selected text with `text`; returns the end of the
    /// inserted text.
    pub fn replace_range(&mut self, sel: Selection, text: &str) -> Position {
        let start = self.clamp(sel.start);
        self.delete_range(sel);
        self.modified = true;
        self.insert_text(start, text)
    }

    /// Shift line `row` by `amount` indent levels of `tab_size` spaces.
    ///
    /// A negative amount removes leading spaces, but never more than the
    /// line actually starts with.
    pub fn indent_line(&mut self, row: usize, amount: isize, tab_size: usize) {
        if row >= self.line_count() {
            return;
        }
        let width = amount.unsigned_abs() * tab_size;
        if amount > 0 {
            let start = self.rope.line_to_char(row);
            self.rope.insert(start, &" ".repeat(width));
        } else if amount < 0 {
            let leading = self.line_slice(row).chars().take_while(|&c| c == ' ').count();
            let start = self.rope.line_to_char(row);
            self.rope.remove(start..start + width.min(leading));
        }
        self.modified = true;
    }

    // -- Line-level edits ---------------------------------------------------

    /// Break the line at `pos` (the Enter key) and return the new cursor.
    ///
    /// With `auto_indent`, the new line copies the leading spaces of the
    /// line being split, plus one level when that part has more opening
    /// brackets than closing ones. Leading whitespace of the moved text is
    /// replaced by that indent.
    pub fn split_line(&mut self, pos: Position, auto_indent: bool, tab_size: usize) -> Position {
        let pos = self.clamp(pos);
        let line = self.line(pos.line);
        let byte = char_to_byte(&line, pos.col);
        let (head, rest) = line.split_at(byte);

        let (indent, moved) = if auto_indent {
            let mut indent = head.chars().take_while(|&c| c == ' ').count();
            if bracket_balance(head) > 0 {
                indent += tab_size;
            }
            (indent, rest.trim_start())
        } else {
            (0, rest)
        };

        let mut tail = String::with_capacity(indent + moved.len() + 1);
        tail.push('\n');
        tail.push_str(&" ".repeat(indent));
        tail.push_str(moved);

        let end = Position::new(pos.line, self.line_len(pos.line));
        self.replace_range(Selection::new(pos, end), &tail);
        Position::new(pos.line + 1, indent)
    }

    /// Backspace at `pos`; returns the new cursor.
    ///
    /// Removes a whole indent level when the `tab_size` chars before the
    /// cursor are all spaces. At column 0 the line joins onto the previous
    /// one. At the document start nothing happens.
    pub fn backspace(&mut self, pos: Position, tab_size: usize) -> Position {
        let pos = self.clamp(pos);
        if pos.col > 0 {
            let line = self.line_slice(pos.line);
            let smart = tab_size > 0
                && pos.col >= tab_size
                && line.slice(pos.col - tab_size..pos.col).chars().all(|c| c == ' ');
            let width = if smart { tab_size } else { 1 };
            let start = Position::new(pos.line, pos.col - width);
            self.delete_range(Selection::new(start, pos));
            start
        } else if pos.line > 0 {
            let join = Position::new(pos.line - 1, self.line_len(pos.line - 1));
            self.delete_range(Selection::new(join, pos));
            join
        } else {
            pos
        }
    }

    /// Delete the char under `pos`, or join the next line at end-of-line.
    pub fn delete_forward(&mut self, pos: Position) {
        let pos = self.clamp(pos);
        let end = if pos.col < self.line_len(pos.line) {
            Position::new(pos.line, pos.col + 1)
        } else if pos.line < self.last_line() {
            Position::new(pos.line + 1, 0)
        } else {
            return;
        };
        self.delete_range(Selection::new(pos, end));
    }

    /// Remove line `row` entirely and return its text. Removing the only
    /// line leaves one empty line behind.
    pub fn remove_line(&mut self, row: usize) -> String {
        let row = row.min(self.last_line());
        let text = self.line(row);
        let sel = if row < self.last_line() {
            Selection::new(Position::new(row, 0), Position::new(row + 1, 0))
        } else if row > 0 {
            Selection::new(
                Position::new(row - 1, self.line_len(row - 1)),
                Position::new(row, self.line_len(row)),
            )
        } else {
            Selection::new(Position::ZERO, Position::new(0, self.line_len(0)))
        };
        self.delete_range(sel);
        // Cutting an already empty single line still counts as an edit.
        self.modified = true;
        text
    }

    /// Insert a copy of line `row` directly below it.
    pub fn duplicate_line(&mut self, row: usize) {
        let row = row.min(self.last_line());
        let copy = format!("\n{}", self.line(row));
        self.insert_text(Position::new(row, self.line_len(row)), &copy);
    }

    /// Cut from `pos` to end of its line and return the removed text.
    pub fn truncate_line(&mut self, pos: Position) -> String {
        let pos = self.clamp(pos);
        let end = Position::new(pos.line, self.line_len(pos.line));
        let removed = self.delete_range(Selection::new(pos, end));
        self.modified = true;
        removed
    }

    /// Overwrite line `row` with `text` (which must not contain `\n`).
    pub fn set_line(&mut self, row: usize, text: &str) {
        debug_assert!(!text.contains('\n'), "set_line text must be a single line");
        let row = row.min(self.last_line());
        let sel = Selection::new(Position::new(row, 0), Position::new(row, self.line_len(row)));
        self.replace_range(sel, text);
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub const fn mark_modified(&mut self) {
        self.modified = true;
    }

    #[inline]
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }

    // -- File I/O -----------------------------------------------------------

    /// Write the lines joined by `\n` to the buffer's path. The modified
    /// flag is cleared only when the write succeeds.
    ///
    /// # Errors
    ///
    /// [`EditorError::Save`] if there is no path or the write fails.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Err(EditorError::Save {
                path: PathBuf::new(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no file name"),
            });
        };
        fs::write(&path, self.contents()).map_err(|source| EditorError::Save {
            path: path.clone(),
            source,
        })?;
        log::info!("saved {} ({} lines)", path.display(), self.line_count());
        self.modified = false;
        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("modified", &self.modified)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Byte offset of char column `col` in `s`, or `s.len()` past the end.
#[must_use]
pub fn char_to_byte(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(i, _)| i)
}

/// Opening minus closing brackets of all three kinds.
fn bracket_balance(s: &str) -> isize {
    s.chars().fold(0, |acc, c| match c {
        '(' | '[' | '{' => acc + 1,
        ')' | ']' | '}' => acc - 1,
        _ => acc,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn sel(a: (usize, usize), b: (usize, usize)) -> Selection {
        Selection::new(pos(a.0, a.1), pos(b.0, b.1))
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn empty_text_is_one_empty_line() {
        let buf = Buffer::from_text("");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), "");
        assert!(!buf.is_modified());
    }

    #[test]
    fn trailing_newline_gives_trailing_empty_line() {
        let buf = Buffer::from_text("a\nb\n");
        assert_eq!(buf.lines(), vec!["a", "b", ""]);
    }

    #[test]
    fn carriage_return_is_plain_text() {
        let buf = Buffer::from_text("a\r\nb");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(0), "a\r");
        assert_eq!(buf.line_len(0), 2);
    }

    #[test]
    fn line_past_end_is_empty() {
        let buf = Buffer::from_text("x");
        assert_eq!(buf.line(5), "");
        assert_eq!(buf.line_len(5), 0);
    }

    // -- Clamp --------------------------------------------------------------

    #[test]
    fn clamp_pulls_row_and_col_inside() {
        let buf = Buffer::from_text("hello\nab");
        assert_eq!(buf.clamp(pos(9, 9)), pos(1, 2));
        assert_eq!(buf.clamp(pos(0, 99)), pos(0, 5));
        assert_eq!(buf.clamp(pos(0, 5)), pos(0, 5));
    }

    // -- insert_text --------------------------------------------------------

    #[test]
    fn insert_single_segment() {
        let mut buf = Buffer::from_text("helld");
        let end = buf.insert_text(pos(0, 3), "lo wor");
        assert_eq!(buf.line(0), "hello world");
        assert_eq!(end, pos(0, 9));
        assert!(buf.is_modified());
    }

    #[test]
    fn insert_at_end_of_line() {
        let mut buf = Buffer::from_text("ab\ncd");
        let end = buf.insert_text(pos(0, 2), "!");
        assert_eq!(buf.lines(), vec!["ab!", "cd"]);
        assert_eq!(end, pos(0, 3));
    }

    #[test]
    fn insert_multi_segment_splits_line() {
        let mut buf = Buffer::from_text("startEND");
        let end = buf.insert_text(pos(0, 5), "-one\nmiddle\ntwo-");
        assert_eq!(buf.lines(), vec!["start-one", "middle", "two-END"]);
        assert_eq!(end, pos(2, 4));
    }

    #[test]
    fn insert_counts_chars_not_bytes() {
        let mut buf = Buffer::from_text("café");
        let end = buf.insert_text(pos(0, 4), "ñé");
        assert_eq!(buf.line(0), "caféñé");
        assert_eq!(end, pos(0, 6));
    }

    #[test]
    fn insert_empty_is_noop() {
        let mut buf = Buffer::from_text("x");
        assert_eq!(buf.insert_text(pos(0, 1), ""), pos(0, 1));
        assert!(!buf.is_modified());
    }

    // -- delete_range / get_range -------------------------------------------

    #[test]
    fn delete_empty_selection_is_noop() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(buf.delete_range(sel((0, 1), (0, 1))), "");
        assert!(!buf.is_modified());
    }

    #[test]
    fn delete_same_line() {
        let mut buf = Buffer::from_text("abcdef");
        assert_eq!(buf.delete_range(sel((0, 1), (0, 4))), "bcd");
        assert_eq!(buf.line(0), "aef");
    }

    #[test]
    fn delete_across_lines_joins_ends() {
        let mut buf = Buffer::from_text("first\nsecond\nthird\nfourth");
        let removed = buf.delete_range(sel((0, 2), (2, 3)));
        assert_eq!(removed, "rst\nsecond\nthi");
        assert_eq!(buf.lines(), vec!["fird", "fourth"]);
    }

    #[test]
    fn get_range_does_not_mutate() {
        let buf = Buffer::from_text("one\ntwo\nthree");
        assert_eq!(buf.get_range(sel((0, 1), (2, 2))), "ne\ntwo\nth");
        assert_eq!(buf.line_count(), 3);
        assert!(!buf.is_modified());
    }

    #[test]
    fn replace_range_returns_end() {
        let mut buf = Buffer::from_text("foo bar");
        let end = buf.replace_range(sel((0, 4), (0, 7)), "bazooka");
        assert_eq!(buf.line(0), "foo bazooka");
        assert_eq!(end, pos(0, 11));
    }

    // -- indent_line --------------------------------------------------------

    #[test]
    fn indent_adds_spaces() {
        let mut buf = Buffer::from_text("x");
        buf.indent_line(0, 2, 4);
        assert_eq!(buf.line(0), "        x");
    }

    #[test]
    fn dedent_removes_only_existing_spaces() {
        let mut buf = Buffer::from_text("  x");
        buf.indent_line(0, -1, 4);
        assert_eq!(buf.line(0), "x");
        buf.indent_line(0, -3, 4);
        assert_eq!(buf.line(0), "x");
    }

    #[test]
    fn dedent_stops_at_non_space() {
        let mut buf = Buffer::from_text("\t    x");
        buf.indent_line(0, -1, 4);
        assert_eq!(buf.line(0), "\t    x");
    }

    // -- split_line ---------------------------------------------------------

    #[test]
    fn split_without_auto_indent() {
        let mut buf = Buffer::from_text("    hello world");
        let cur = buf.split_line(pos(0, 10), false, 4);
        assert_eq!(buf.lines(), vec!["    hello ", "world"]);
        assert_eq!(cur, pos(1, 0));
    }

    #[test]
    fn split_copies_indent() {
        let mut buf = Buffer::from_text("    a = 1   b");
        let cur = buf.split_line(pos(0, 9), true, 4);
        assert_eq!(buf.lines(), vec!["    a = 1", "    b"]);
        assert_eq!(cur, pos(1, 4));
    }

    #[test]
    fn split_after_open_bracket_indents_deeper() {
        let mut buf = Buffer::from_text("  call(x,");
        let cur = buf.split_line(pos(0, 9), true, 4);
        assert_eq!(buf.lines(), vec!["  call(x,", "      "]);
        assert_eq!(cur, pos(1, 6));
    }

    // -- backspace / delete_forward -----------------------------------------

    #[test]
    fn backspace_single_char() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(buf.backspace(pos(0, 2), 4), pos(0, 1));
        assert_eq!(buf.line(0), "ac");
    }

    #[test]
    fn backspace_removes_indent_level() {
        let mut buf = Buffer::from_text("        x");
        assert_eq!(buf.backspace(pos(0, 8), 4), pos(0, 4));
        assert_eq!(buf.line(0), "    x");
    }

    #[test]
    fn backspace_at_col_zero_joins() {
        let mut buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.backspace(pos(1, 0), 4), pos(0, 2));
        assert_eq!(buf.lines(), vec!["abcd"]);
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut buf = Buffer::from_text("ab");
        assert_eq!(buf.backspace(pos(0, 0), 4), pos(0, 0));
        assert!(!buf.is_modified());
    }

    #[test]
    fn delete_forward_char_and_join() {
        let mut buf = Buffer::from_text("ab\ncd");
        buf.delete_forward(pos(0, 0));
        assert_eq!(buf.lines(), vec!["b", "cd"]);
        buf.delete_forward(pos(0, 1));
        assert_eq!(buf.lines(), vec!["bcd"]);
        buf.delete_forward(pos(0, 3));
        assert_eq!(buf.lines(), vec!["bcd"]);
    }

    // -- Line-level edits ---------------------------------------------------

    #[test]
    fn remove_middle_line() {
        let mut buf = Buffer::from_text("a\nb\nc");
        assert_eq!(buf.remove_line(1), "b");
        assert_eq!(buf.lines(), vec!["a", "c"]);
    }

    #[test]
    fn remove_last_line() {
        let mut buf = Buffer::from_text("a\nb");
        assert_eq!(buf.remove_line(1), "b");
        assert_eq!(buf.lines(), vec!["a"]);
    }

    #[test]
    fn remove_only_line_leaves_empty_line() {
        let mut buf = Buffer::from_text("solo");
        assert_eq!(buf.remove_line(0), "solo");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), "");
    }

    #[test]
    fn duplicate_line_below() {
        let mut buf = Buffer::from_text("x\ny");
        buf.duplicate_line(0);
        assert_eq!(buf.lines(), vec!["x", "x", "y"]);
    }

    #[test]
    fn truncate_returns_tail() {
        let mut buf = Buffer::from_text("keep|drop\nnext");
        assert_eq!(buf.truncate_line(pos(0, 4)), "|drop");
        assert_eq!(buf.lines(), vec!["keep", "next"]);
    }

    #[test]
    fn set_line_overwrites() {
        let mut buf = Buffer::from_text("a\nold\nc");
        buf.set_line(1, "new!");
        assert_eq!(buf.lines(), vec!["a", "new!", "c"]);
    }

    // -- File I/O -----------------------------------------------------------

    #[test]
    fn load_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.txt");
        fs::write(&path, "one\ntwo\n").unwrap();

        let mut buf = Buffer::from_file(&path).unwrap();
        assert_eq!(buf.lines(), vec!["one", "two", ""]);
        buf.insert_text(pos(1, 3), "!");
        buf.save().unwrap();
        assert!(!buf.is_modified());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo!\n");
    }

    #[test]
    fn empty_file_loads_as_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();
        let buf = Buffer::from_file(&path).unwrap();
        assert_eq!(buf.lines(), vec![""]);
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Buffer::from_file(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, EditorError::Load { .. }));
    }

    #[test]
    fn failed_save_keeps_modified_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = Buffer::new_file(&dir.path().join("missing-dir").join("x.txt"));
        assert!(buf.is_modified());
        assert!(buf.save().is_err());
        assert!(buf.is_modified());
    }

    #[test]
    fn new_file_saves_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.txt");
        let mut buf = Buffer::new_file(&path);
        buf.insert_text(Position::ZERO, "a\nb");
        buf.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
    }
}
