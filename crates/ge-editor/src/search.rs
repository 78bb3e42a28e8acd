//! Search and replace over a [`Buffer`].
//!
//! Searches are literal substring matches within a single line; a match
//! never spans a newline. Both directions wrap around the document. All
//! columns in and out are char offsets.
//!
//! The finders are pure: they read the buffer and a starting position and
//! return where the match starts. Moving the cursor is the caller's job.
//! The replacers mutate through the buffer's ordinary edit primitives.

use crate::buffer::{Buffer, char_to_byte};
use crate::position::{Position, Selection};

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A search hit: where it starts and how many chars it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: Position,
    pub len: usize,
}

impl Match {
    #[must_use]
    pub const fn end(self) -> Position {
        Position::new(self.start.line, self.start.col + self.len)
    }

    #[must_use]
    pub fn selection(self) -> Selection {
        Selection::new(self.start, self.end())
    }
}

// ---------------------------------------------------------------------------
// Line-level helpers
// ---------------------------------------------------------------------------

fn byte_to_char(s: &str, byte: usize) -> usize {
    s[..byte].chars().count()
}

/// First occurrence of `term` in `line` starting at char `from` or later.
fn first_from(line: &str, term: &str, from: usize) -> Option<usize> {
    let byte = char_to_byte(line, from);
    line[byte..]
        .find(term)
        .map(|offset| byte_to_char(line, byte + offset))
}

/// Last occurrence of `term` that starts strictly before char `before`.
fn last_before(line: &str, term: &str, before: usize) -> Option<usize> {
    if before == 0 {
        return None;
    }
    let end = char_to_byte(line, before - 1 + term.chars().count());
    line[..end].rfind(term).map(|b| byte_to_char(line, b))
}

// ---------------------------------------------------------------------------
// Finders
// ---------------------------------------------------------------------------

/// Next occurrence of `term` after `from`, wrapping to the top.
///
/// Scans the rest of `from`'s line starting one char past the cursor, then
/// every following line, then wraps and scans lines `0..=from.line` from
/// column 0. An empty term never matches.
#[must_use]
pub fn find_next(buf: &Buffer, term: &str, from: Position) -> Option<Match> {
    if term.is_empty() {
        return None;
    }
    let len = term.chars().count();
    let from = buf.clamp(from);
    let hit = |line: usize, col: usize| Match {
        start: Position::new(line, col),
        len,
    };

    for row in from.line..buf.line_count() {
        let start = if row == from.line { from.col + 1 } else { 0 };
        if let Some(col) = first_from(&buf.line(row), term, start) {
            return Some(hit(row, col));
        }
    }
    (0..=from.line).find_map(|row| first_from(&buf.line(row), term, 0).map(|col| hit(row, col)))
}

/// Previous occurrence of `term` before `from`, wrapping to the bottom.
///
/// On `from`'s line only matches starting left of the cursor count, and the
/// rightmost of those wins. Then each line above is searched for its last
/// match, then the scan wraps from the last line back up to `from.line`.
#[must_use]
pub fn find_prev(buf: &Buffer, term: &str, from: Position) -> Option<Match> {
    if term.is_empty() {
        return None;
    }
    let len = term.chars().count();
    let from = buf.clamp(from);
    let hit = |line: usize, col: usize| Match {
        start: Position::new(line, col),
        len,
    };

    if let Some(col) = last_before(&buf.line(from.line), term, from.col) {
        return Some(hit(from.line, col));
    }
    for row in (0..from.line).rev() {
        let line = buf.line(row);
        if let Some(b) = line.rfind(term) {
            return Some(hit(row, byte_to_char(&line, b)));
        }
    }
    (from.line..buf.line_count()).rev().find_map(|row| {
        let line = buf.line(row);
        line.rfind(term).map(|b| hit(row, byte_to_char(&line, b)))
    })
}

/// Every match of `term` on line `row`, left to right, non-overlapping.
/// Used by the view to paint search hits.
#[must_use]
pub fn matches_in_line(buf: &Buffer, term: &str, row: usize) -> Vec<Match> {
    if term.is_empty() {
        return Vec::new();
    }
    let line = buf.line(row);
    let len = term.chars().count();
    line.match_indices(term)
        .map(|(b, _)| Match {
            start: Position::new(row, byte_to_char(&line, b)),
            len,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Replacers
// ---------------------------------------------------------------------------

/// Replace the next occurrence of `search` after `from` with `replacement`.
///
/// Returns the position just past the inserted text (where the cursor
/// should go), or `None` without touching the buffer when nothing matches.
pub fn replace_next(
    buf: &mut Buffer,
    search: &str,
    replacement: &str,
    from: Position,
) -> Option<Position> {
    let found = find_next(buf, search, from)?;
    Some(buf.replace_range(found.selection(), replacement))
}

/// Replace every occurrence of `search`, one line at a time, and return how
/// many were replaced.
///
/// Occurrences are counted per line before substitution, non-overlapping
/// and left to right, so a match can never straddle two lines. Replacing a
/// term with itself changes nothing and reports 0.
pub fn replace_all(buf: &mut Buffer, search: &str, replacement: &str) -> usize {
    if search.is_empty() || search == replacement {
        return 0;
    }
    let mut count = 0;
    // Bottom-up, so a replacement containing a newline can't shift rows
    // that are still to be visited.
    for row in (0..buf.line_count()).rev() {
        let line = buf.line(row);
        let hits = line.matches(search).count();
        if hits == 0 {
            continue;
        }
        count += hits;
        let whole = Selection::new(Position::new(row, 0), Position::new(row, buf.line_len(row)));
        buf.replace_range(whole, &line.replace(search, replacement));
    }
    if count > 0 {
        log::debug!("replaced {count} occurrence(s) of {search:?}");
    }
    count
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

    fn start(m: Option<Match>) -> Option<Position> {
        m.map(|m| m.start)
    }

    // -- find_next ----------------------------------------------------------

    #[test]
    fn empty_term_never_matches() {
        let buf = Buffer::from_text("abc");
        assert_eq!(find_next(&buf, "", Position::ZERO), None);
        assert_eq!(find_prev(&buf, "", Position::ZERO), None);
    }

    #[test]
    fn next_skips_match_under_cursor() {
        let buf = Buffer::from_text("foo foo");
        assert_eq!(start(find_next(&buf, "foo", pos(0, 0))), Some(pos(0, 4)));
    }

    #[test]
    fn next_continues_on_following_lines() {
        let buf = Buffer::from_text("abc\nxyz\nfoo");
        assert_eq!(start(find_next(&buf, "foo", pos(0, 1))), Some(pos(2, 0)));
    }

    #[test]
    fn next_wraps_to_top() {
        let buf = Buffer::from_text("foo\nbar\nbaz");
        assert_eq!(start(find_next(&buf, "foo", pos(1, 0))), Some(pos(0, 0)));
    }

    #[test]
    fn next_wrap_finds_only_match_at_cursor() {
        let buf = Buffer::from_text("xx foo xx");
        assert_eq!(start(find_next(&buf, "foo", pos(0, 3))), Some(pos(0, 3)));
    }

    #[test]
    fn next_miss() {
        let buf = Buffer::from_text("abc\ndef");
        assert_eq!(find_next(&buf, "zzz", pos(1, 1)), None);
    }

    #[test]
    fn next_uses_char_columns() {
        let buf = Buffer::from_text("héllo wörld wörld");
        let m = find_next(&buf, "wörld", pos(0, 6)).unwrap();
        assert_eq!(m.start, pos(0, 12));
        assert_eq!(m.len, 5);
    }

    // -- find_prev ----------------------------------------------------------

    #[test]
    fn prev_takes_rightmost_before_cursor() {
        let buf = Buffer::from_text("ab ab ab");
        assert_eq!(start(find_prev(&buf, "ab", pos(0, 6))), Some(pos(0, 3)));
    }

    #[test]
    fn prev_ignores_match_at_cursor() {
        let buf = Buffer::from_text("x ab\nab");
        assert_eq!(start(find_prev(&buf, "ab", pos(1, 0))), Some(pos(0, 2)));
    }

    #[test]
    fn prev_wraps_to_bottom() {
        let buf = Buffer::from_text("aaa\nbbb\nccc bbb");
        assert_eq!(start(find_prev(&buf, "bbb", pos(0, 2))), Some(pos(2, 4)));
    }

    #[test]
    fn prev_wrap_reaches_cursor_line() {
        let buf = Buffer::from_text("one\nfoo two");
        assert_eq!(start(find_prev(&buf, "two", pos(1, 2))), Some(pos(1, 4)));
    }

    // -- matches_in_line ----------------------------------------------------

    #[test]
    fn line_matches_are_non_overlapping() {
        let buf = Buffer::from_text("aaaa");
        let cols: Vec<_> = matches_in_line(&buf, "aa", 0).iter().map(|m| m.start.col).collect();
        assert_eq!(cols, vec![0, 2]);
    }

    // -- replace_next -------------------------------------------------------

    #[test]
    fn replace_next_splices_and_returns_end() {
        let mut buf = Buffer::from_text("let x = old;\nold");
        let end = replace_next(&mut buf, "old", "fresh", pos(0, 0));
        assert_eq!(end, Some(pos(0, 13)));
        assert_eq!(buf.lines(), vec!["let x = fresh;", "old"]);
        assert!(buf.is_modified());
    }

    #[test]
    fn replace_next_miss_leaves_buffer() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(replace_next(&mut buf, "q", "z", Position::ZERO), None);
        assert!(!buf.is_modified());
    }

    // -- replace_all --------------------------------------------------------

    #[test]
    fn replace_all_counts_per_line() {
        let mut buf = Buffer::from_text("a-a-a\nb\na");
        assert_eq!(replace_all(&mut buf, "a", "xy"), 4);
        assert_eq!(buf.lines(), vec!["xy-xy-xy", "b", "xy"]);
        assert!(buf.is_modified());
    }

    #[test]
    fn replace_all_is_exhausted_after_one_pass() {
        let mut buf = Buffer::from_text("cat cat\ncat");
        assert_eq!(replace_all(&mut buf, "cat", "dog"), 3);
        let after = buf.contents();
        assert_eq!(replace_all(&mut buf, "cat", "dog"), 0);
        assert_eq!(buf.contents(), after);
    }

    #[test]
    fn replace_all_miss_does_not_mark_modified() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(replace_all(&mut buf, "zz", "y"), 0);
        assert_eq!(replace_all(&mut buf, "", "y"), 0);
        assert!(!buf.is_modified());
    }

    #[test]
    fn replace_all_with_newline_keeps_rows_straight() {
        let mut buf = Buffer::from_text("a;b\nc;d");
        assert_eq!(replace_all(&mut buf, ";", "\n"), 2);
        assert_eq!(buf.lines(), vec!["a", "b", "c", "d"]);
    }
}
