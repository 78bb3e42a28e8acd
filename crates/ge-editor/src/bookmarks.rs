//! Line bookmarks.
//!
//! At most one bookmark per line. Each remembers the column the cursor was
//! on when it was set. The selector shows them sorted by line and numbers
//! them from 1, so only the first nine are reachable by digit.

use std::collections::BTreeMap;

use crate::position::Position;

/// How many bookmarks the digit selector can address.
pub const SELECTABLE: usize = 9;

#[derive(Debug, Clone, Default)]
pub struct Bookmarks {
    /// line -> column
    marks: BTreeMap<usize, usize>,
}

impl Bookmarks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bookmark at `pos`, or remove the one already on its line.
    /// Returns `true` if a bookmark was added.
    pub fn toggle(&mut self, pos: Position) -> bool {
        if self.marks.remove(&pos.line).is_some() {
            false
        } else {
            self.marks.insert(pos.line, pos.col);
            true
        }
    }

    #[must_use]
    pub fn contains_line(&self, line: usize) -> bool {
        self.marks.contains_key(&line)
    }

    /// All bookmarks in line order.
    #[must_use]
    pub fn list(&self) -> Vec<Position> {
        self.marks
            .iter()
            .map(|(&line, &col)| Position::new(line, col))
            .collect()
    }

    /// The `index`-th bookmark in line order (0-based). Not clamped; the
    /// line may have moved or vanished since it was set.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Position> {
        self.marks
            .iter()
            .nth(index)
            .map(|(&line, &col)| Position::new(line, col))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut marks = Bookmarks::new();
        assert!(marks.toggle(Position::new(3, 2)));
        assert!(marks.contains_line(3));
        assert!(!marks.toggle(Position::new(3, 7)));
        assert!(marks.is_empty());
    }

    #[test]
    fn one_per_line_keyed_by_row() {
        let mut marks = Bookmarks::new();
        marks.toggle(Position::new(1, 4));
        // A different column on the same line removes it.
        marks.toggle(Position::new(1, 0));
        assert_eq!(marks.len(), 0);
    }

    #[test]
    fn list_is_sorted_by_line() {
        let mut marks = Bookmarks::new();
        marks.toggle(Position::new(9, 1));
        marks.toggle(Position::new(2, 5));
        marks.toggle(Position::new(5, 0));
        assert_eq!(
            marks.list(),
            vec![Position::new(2, 5), Position::new(5, 0), Position::new(9, 1)]
        );
        assert_eq!(marks.get(1), Some(Position::new(5, 0)));
        assert_eq!(marks.get(3), None);
    }
}
