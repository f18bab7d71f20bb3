//! Selection models: row selection, cell rectangles and drag ranges.
//!
//! A model owns its ranges and never holds a reference back to the grid.
//! The grid calls its hooks with a read-only [`SelectionHost`] view and
//! applies the returned [`Reaction`] afterwards.

mod cell;
mod range_selector;
mod row;

pub use cell::CellSelectionModel;
pub use range_selector::CellRangeSelector;
pub use row::RowSelectionModel;

use crate::events::{KeyEvent, Modifiers};

/// A grid cell address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub cell: usize,
}

impl CellPos {
    pub fn new(row: usize, cell: usize) -> Self {
        Self { row, cell }
    }
}

/// Rectangle of cells, always normalized so `from <= to` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub from_row: usize,
    pub from_cell: usize,
    pub to_row: usize,
    pub to_cell: usize,
    /// Part of a row-split selection whose anchor was the bottom/right corner.
    pub inverted: bool,
}

impl Range {
    /// Normalize any two corners.
    pub fn new(row1: usize, cell1: usize, row2: usize, cell2: usize) -> Self {
        Self {
            from_row: row1.min(row2),
            from_cell: cell1.min(cell2),
            to_row: row1.max(row2),
            to_cell: cell1.max(cell2),
            inverted: false,
        }
    }

    pub fn single(row: usize, cell: usize) -> Self {
        Self::new(row, cell, row, cell)
    }

    pub fn between(a: CellPos, b: CellPos) -> Self {
        Self::new(a.row, a.cell, b.row, b.cell)
    }

    /// Full-width range for one row of a grid with `columns` columns.
    pub fn whole_row(row: usize, columns: usize) -> Self {
        Self::new(row, 0, row, columns.saturating_sub(1))
    }

    pub fn is_single_row(&self) -> bool {
        self.from_row == self.to_row
    }

    pub fn is_single_cell(&self) -> bool {
        self.is_single_row() && self.from_cell == self.to_cell
    }

    pub fn contains(&self, row: usize, cell: usize) -> bool {
        row >= self.from_row && row <= self.to_row && cell >= self.from_cell && cell <= self.to_cell
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.from_row..=self.to_row
    }

    pub fn cells(&self) -> std::ops::RangeInclusive<usize> {
        self.from_cell..=self.to_cell
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn union(&self, other: &Range) -> Range {
        Range {
            from_row: self.from_row.min(other.from_row),
            from_cell: self.from_cell.min(other.from_cell),
            to_row: self.to_row.max(other.to_row),
            to_cell: self.to_cell.max(other.to_cell),
            inverted: self.inverted && other.inverted,
        }
    }
}

/// Read-only grid facts a selection model may consult.
pub trait SelectionHost {
    fn data_len(&self) -> usize;

    fn column_count(&self) -> usize;

    fn active_cell(&self) -> Option<CellPos>;

    fn can_cell_be_active(&self, row: usize, cell: usize) -> bool;

    fn can_cell_be_selected(&self, row: usize, cell: usize) -> bool;

    fn multi_select(&self) -> bool;

    /// Whether an editor currently holds the grid's lock.
    fn editor_lock_active(&self) -> bool;
}

/// What the grid should do after a selection hook ran, applied in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// The model consumed the input; the grid must not act on it.
    pub handled: bool,
    pub scroll_to_row: Option<usize>,
    pub scroll_to_cell: Option<CellPos>,
    pub activate: Option<CellPos>,
    pub select: Option<Vec<Range>>,
}

impl Reaction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    pub fn select(ranges: Vec<Range>) -> Self {
        Self {
            select: Some(ranges),
            ..Self::default()
        }
    }
}

/// A pluggable selection strategy.
pub trait SelectionModel {
    fn ranges(&self) -> &[Range];

    /// Replace the selection. Returns true when listeners must be notified;
    /// going from empty to empty is silent.
    fn set_selected_ranges(&mut self, ranges: Vec<Range>) -> bool;

    fn on_active_cell_changed(&mut self, _host: &dyn SelectionHost, _cell: CellPos) -> Reaction {
        Reaction::none()
    }

    fn on_key_down(&mut self, _host: &dyn SelectionHost, _key: &KeyEvent) -> Reaction {
        Reaction::none()
    }

    fn on_click(
        &mut self,
        _host: &dyn SelectionHost,
        _cell: CellPos,
        _modifiers: Modifiers,
    ) -> Reaction {
        Reaction::none()
    }

    fn on_drag_start(
        &mut self,
        _host: &dyn SelectionHost,
        _cell: CellPos,
        _modifiers: Modifiers,
    ) -> Reaction {
        Reaction::none()
    }

    fn on_drag(&mut self, _host: &dyn SelectionHost, _cell: CellPos) -> Reaction {
        Reaction::none()
    }

    fn on_drag_end(&mut self, _host: &dyn SelectionHost) -> Reaction {
        Reaction::none()
    }

    /// Range being dragged out, for the host to draw.
    fn decorated_range(&self) -> Option<Range> {
        None
    }
}

/// Replace the ranges in `slot`, reporting whether anything observable changed.
pub(crate) fn replace_ranges(slot: &mut Vec<Range>, ranges: Vec<Range>) -> bool {
    let notify = !(slot.is_empty() && ranges.is_empty());
    *slot = ranges;
    notify
}

/// Unique rows touched by `ranges`, in first-seen order.
pub fn ranges_to_rows(ranges: &[Range]) -> Vec<usize> {
    let mut rows = Vec::new();
    for r in ranges {
        for row in r.rows() {
            if !rows.contains(&row) {
                rows.push(row);
            }
        }
    }
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;

    /// Plain grid of `rows` x `columns`, every cell active/selectable.
    pub(crate) struct FakeHost {
        pub rows: usize,
        pub columns: usize,
        pub active: Option<CellPos>,
        pub multi_select: bool,
        pub locked: bool,
    }

    impl FakeHost {
        pub(crate) fn new(rows: usize, columns: usize) -> Self {
            Self {
                rows,
                columns,
                active: None,
                multi_select: true,
                locked: false,
            }
        }
    }

    impl SelectionHost for FakeHost {
        fn data_len(&self) -> usize {
            self.rows
        }

        fn column_count(&self) -> usize {
            self.columns
        }

        fn active_cell(&self) -> Option<CellPos> {
            self.active
        }

        fn can_cell_be_active(&self, row: usize, cell: usize) -> bool {
            row < self.rows && cell < self.columns
        }

        fn can_cell_be_selected(&self, row: usize, cell: usize) -> bool {
            row < self.rows && cell < self.columns
        }

        fn multi_select(&self) -> bool {
            self.multi_select
        }

        fn editor_lock_active(&self) -> bool {
            self.locked
        }
    }

    #[test]
    fn test_range_normalizes_corners() {
        let r = Range::new(5, 3, 2, 1);
        assert_eq!((r.from_row, r.from_cell, r.to_row, r.to_cell), (2, 1, 5, 3));
        assert!(r.contains(3, 2));
        assert!(!r.contains(6, 2));
        assert!(Range::single(1, 1).is_single_cell());
    }

    #[test]
    fn test_ranges_to_rows_dedups() {
        let rows = ranges_to_rows(&[Range::new(3, 0, 4, 0), Range::new(1, 0, 3, 2)]);
        assert_eq!(rows, vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_replace_ranges_empty_to_empty_is_silent() {
        let mut slot = Vec::new();
        assert!(!replace_ranges(&mut slot, Vec::new()));
        assert!(replace_ranges(&mut slot, vec![Range::single(0, 0)]));
        assert!(replace_ranges(&mut slot, Vec::new()));
    }
}
