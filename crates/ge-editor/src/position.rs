//! Document coordinates: `Position` and `Selection`.
//!
//! Everything here is 0-indexed. Columns count Unicode scalar values (chars),
//! never bytes, so `"naïve"` has length 5 and column 3 is `'v'`. This is the
//! same unit `ropey` indexes by, which keeps the buffer and the cursor in
//! agreement under multi-byte text.
//!
//! Positions are plain values. Nothing in the editor holds a pointer into the
//! buffer; a stale position is repaired by [`Buffer::clamp`](crate::buffer::Buffer::clamp)
//! after each mutation instead.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A `(line, col)` coordinate in a buffer.
///
/// `col` may equal the line's length, which denotes end-of-line (the slot
/// where typed text is appended).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// Line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

// Line first, then column.
impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line.cmp(&other.line).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed, as shown in the status bar.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// An ordered pair of positions delimiting the text `[start, end)`.
///
/// `start <= end` always holds. Build one with [`Selection::ordered`] when the
/// two ends come from user gestures that may run backwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    /// Panics in debug builds if `start > end`.
    #[inline]
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "Selection::new requires start <= end");
        Self { start, end }
    }

    /// Build a selection from two positions in either order.
    #[inline]
    #[must_use]
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// An empty selection sitting at `pos`.
    #[inline]
    #[must_use]
    pub const fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    #[inline]
    #[must_use]
    pub const fn is_single_line(self) -> bool {
        self.start.line == self.end.line
    }

    /// True when `pos` falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sel({:?} .. {:?})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
