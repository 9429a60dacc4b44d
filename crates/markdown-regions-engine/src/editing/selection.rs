use std::ops::Range;

use super::edit_script::{Assoc, EditScript};

/// One selection range: `anchor` stays put, `head` is where the caret is.
///
/// Both are byte offsets into the document. `anchor == head` is a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(at: usize) -> Self {
        Self::new(at, at)
    }

    /// Lower bound of the range.
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Upper bound of the range.
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn as_range(&self) -> Range<usize> {
        self.from()..self.to()
    }

    /// Build a range over `from..to` keeping this range's direction.
    pub(crate) fn with_bounds(&self, from: usize, to: usize) -> Self {
        if self.anchor <= self.head {
            Self::new(from, to)
        } else {
            Self::new(to, from)
        }
    }

    /// Map this range through an edit script.
    ///
    /// Cursors stay in front of text inserted at their position; non-empty
    /// ranges do not grow to cover text inserted at their edges.
    pub fn map(&self, script: &EditScript) -> Self {
        if self.is_empty() {
            return Self::cursor(script.map_offset(self.head, Assoc::Before));
        }
        let from = script.map_offset(self.from(), Assoc::After);
        let to = script.map_offset(self.to(), Assoc::Before).max(from);
        self.with_bounds(from, to)
    }
}

impl From<Range<usize>> for SelectionRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// The ordered set of selection ranges for one editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<SelectionRange>,
    main: usize,
}

impl Selection {
    /// Create a selection from ranges, sorting them into document order.
    ///
    /// `main` indexes into `ranges` as given; an empty list becomes a cursor
    /// at offset 0.
    pub fn new(ranges: Vec<SelectionRange>, main: usize) -> Self {
        if ranges.is_empty() {
            return Self::single(SelectionRange::cursor(0));
        }

        let main_range = ranges[main.min(ranges.len() - 1)];
        let mut ranges = ranges;
        ranges.sort_by_key(|r| (r.from(), r.to()));
        let main = ranges.iter().position(|r| *r == main_range).unwrap_or(0);

        Self { ranges, main }
    }

    pub fn single(range: SelectionRange) -> Self {
        Self {
            ranges: vec![range],
            main: 0,
        }
    }

    pub fn cursor(at: usize) -> Self {
        Self::single(SelectionRange::cursor(at))
    }

    /// Convenience for a multi-cursor selection.
    pub fn cursors(offsets: impl IntoIterator<Item = usize>) -> Self {
        Self::new(offsets.into_iter().map(SelectionRange::cursor).collect(), 0)
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    pub fn main(&self) -> SelectionRange {
        self.ranges[self.main]
    }

    pub fn main_index(&self) -> usize {
        self.main
    }

    pub fn map(&self, script: &EditScript) -> Self {
        Self {
            ranges: self.ranges.iter().map(|r| r.map(script)).collect(),
            main: self.main,
        }
    }
}

impl From<SelectionRange> for Selection {
    fn from(range: SelectionRange) -> Self {
        Self::single(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::edit_script::Edit;

    #[test]
    fn bounds_ignore_direction() {
        let r = SelectionRange::new(8, 3);
        assert_eq!(r.from(), 3);
        assert_eq!(r.to(), 8);
        assert!(!r.is_empty());
    }

    #[test]
    fn with_bounds_keeps_backward_direction() {
        let r = SelectionRange::new(8, 3).with_bounds(10, 20);
        assert_eq!(r, SelectionRange::new(20, 10));
    }

    #[test]
    fn new_sorts_ranges_and_tracks_main() {
        let sel = Selection::new(
            vec![SelectionRange::cursor(9), SelectionRange::cursor(2)],
            0,
        );
        assert_eq!(sel.ranges()[0], SelectionRange::cursor(2));
        assert_eq!(sel.main(), SelectionRange::cursor(9));
    }

    #[test]
    fn empty_selection_falls_back_to_origin_cursor() {
        let sel = Selection::new(vec![], 3);
        assert_eq!(sel.main(), SelectionRange::cursor(0));
    }

    #[test]
    fn map_keeps_cursor_before_insertion() {
        let script = EditScript::new(vec![Edit::insert(4, "xx")]).unwrap();
        assert_eq!(
            SelectionRange::cursor(4).map(&script),
            SelectionRange::cursor(4)
        );
    }

    #[test]
    fn map_does_not_grow_range_over_edge_insertions() {
        let script = EditScript::new(vec![Edit::insert(2, "**"), Edit::insert(5, "**")]).unwrap();
        assert_eq!(
            SelectionRange::new(2, 5).map(&script),
            SelectionRange::new(4, 7)
        );
    }
}
