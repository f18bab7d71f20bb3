//! Drag-to-select rectangle tracking.

use super::{CellPos, Range, SelectionHost};
use crate::events::{Event, EventData, Modifiers};

/// Tracks the start and current cell of a pointer drag.
///
/// `on_before_cell_range_selected` fires when a drag starts and may veto it
/// with `prevent_default`; a drag never starts while an editor holds the lock.
/// `on_cell_range_selected` fires on release with the final rectangle.
/// Both fire from inside the grid's pointer handling, so their handlers must
/// not call back into the grid.
#[derive(Debug, Default)]
pub struct CellRangeSelector {
    dragging: bool,
    start: Option<CellPos>,
    /// Ctrl/Shift held at drag start: add to the selection instead of replacing.
    append: bool,
    decorated: Option<Range>,
    pub on_before_cell_range_selected: Event<CellPos>,
    pub on_cell_range_selected: Event<Range>,
}

impl CellRangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn decorated_range(&self) -> Option<Range> {
        self.decorated
    }

    /// Returns true when the drag was accepted.
    pub fn drag_start(
        &mut self,
        host: &dyn SelectionHost,
        cell: CellPos,
        modifiers: Modifiers,
    ) -> bool {
        if !host.can_cell_be_selected(cell.row, cell.cell) {
            return false;
        }
        let mut data = EventData::new();
        if host.editor_lock_active() {
            tracing::debug!(row = cell.row, cell = cell.cell, "range drag refused: editor active");
            data.prevent_default();
        } else {
            self.on_before_cell_range_selected.notify_with(&cell, &mut data);
        }
        if data.is_default_prevented() {
            return false;
        }

        self.dragging = true;
        self.start = Some(cell);
        self.append = modifiers.command() || modifiers.shift;
        self.decorated = Some(Range::single(cell.row, cell.cell));
        true
    }

    /// Move the free corner. Unselectable cells keep the previous rectangle.
    pub fn drag(&mut self, host: &dyn SelectionHost, cell: CellPos) -> Option<Range> {
        if !self.dragging {
            return None;
        }
        if let Some(start) = self.start {
            if host.can_cell_be_selected(cell.row, cell.cell) {
                self.decorated = Some(Range::between(start, cell));
            }
        }
        self.decorated
    }

    /// Finish the drag. Returns the rectangle and whether it appends.
    pub fn drag_end(&mut self) -> Option<(Range, bool)> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.start = None;
        let range = self.decorated.take()?;
        self.on_cell_range_selected.notify(&range);
        Some((range, self.append))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::super::tests::FakeHost;
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_drag_produces_normalized_range() {
        let host = FakeHost::new(10, 5);
        let mut sel = CellRangeSelector::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        sel.on_cell_range_selected
            .subscribe(move |_, r: &Range| sink.borrow_mut().push(*r));

        assert!(sel.drag_start(&host, CellPos::new(4, 3), Modifiers::NONE));
        sel.drag(&host, CellPos::new(2, 1));
        // Outside the grid: rectangle unchanged.
        assert_eq!(sel.drag(&host, CellPos::new(20, 1)), Some(Range::new(2, 1, 4, 3)));
        let (range, append) = sel.drag_end().unwrap();
        assert_eq!(range, Range::new(2, 1, 4, 3));
        assert!(!append);
        assert_eq!(seen.borrow().as_slice(), &[range]);
        assert!(sel.drag_end().is_none());
    }

    #[test]
    fn test_drag_vetoed_while_editing() {
        let mut host = FakeHost::new(10, 5);
        host.locked = true;
        let mut sel = CellRangeSelector::new();
        assert!(!sel.drag_start(&host, CellPos::new(0, 0), Modifiers::NONE));
        assert!(!sel.is_dragging());
    }

    #[test]
    fn test_before_handler_can_veto() {
        let host = FakeHost::new(10, 5);
        let mut sel = CellRangeSelector::new();
        sel.on_before_cell_range_selected
            .subscribe(|data, cell: &CellPos| {
                if cell.cell == 0 {
                    data.prevent_default();
                }
            });
        assert!(!sel.drag_start(&host, CellPos::new(1, 0), Modifiers::NONE));
        assert!(sel.drag_start(&host, CellPos::new(1, 1), Modifiers::CTRL));
        assert!(sel.drag_end().unwrap().1);
    }
}
