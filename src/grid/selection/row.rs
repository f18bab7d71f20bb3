//! Whole-row selection.

use super::{
    ranges_to_rows, replace_ranges, CellPos, Range, Reaction, SelectionHost, SelectionModel,
};
use crate::events::{keys, KeyEvent, Modifiers};

/// One full-width range per selected row.
#[derive(Debug, Clone)]
pub struct RowSelectionModel {
    ranges: Vec<Range>,
    /// Select the row of the active cell whenever it changes.
    select_active_row: bool,
}

impl Default for RowSelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSelectionModel {
    pub fn new() -> Self {
        Self {
            ranges: Vec::new(),
            select_active_row: true,
        }
    }

    #[must_use]
    pub fn with_select_active_row(mut self, on: bool) -> Self {
        self.select_active_row = on;
        self
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        ranges_to_rows(&self.ranges)
    }

    fn rows_to_ranges(rows: &[usize], columns: usize) -> Vec<Range> {
        rows.iter().map(|&r| Range::whole_row(r, columns)).collect()
    }

    /// Shift+Up/Down: grow or shrink the contiguous block on the side of the
    /// active row.
    fn extend_block(&self, host: &dyn SelectionHost, active: CellPos, down: bool) -> Reaction {
        let mut rows = self.selected_rows();
        rows.sort_unstable();
        let (first, last) = match (rows.first(), rows.last()) {
            (Some(&t), Some(&b)) => (t, b),
            _ => (active.row, active.row),
        };
        let mut top = i64::try_from(first).unwrap_or(i64::MAX);
        let mut bottom = i64::try_from(last).unwrap_or(i64::MAX);
        let active_row = i64::try_from(active.row).unwrap_or(i64::MAX);

        let moved = if down {
            if active_row < bottom || top == bottom {
                bottom += 1;
                bottom
            } else {
                top += 1;
                top
            }
        } else if active_row < bottom {
            bottom -= 1;
            bottom
        } else {
            top -= 1;
            top
        };

        let mut reaction = Reaction::handled();
        let in_bounds = usize::try_from(moved).is_ok_and(|r| r < host.data_len());
        if let (true, Ok(row), Ok(lo), Ok(hi)) = (
            in_bounds,
            usize::try_from(moved),
            usize::try_from(top.min(bottom)),
            usize::try_from(top.max(bottom)),
        ) {
            let block: Vec<usize> = (lo..=hi).collect();
            reaction.scroll_to_row = Some(row);
            reaction.select = Some(Self::rows_to_ranges(&block, host.column_count()));
        }
        reaction
    }

    fn jump_to(host: &dyn SelectionHost, active: Option<CellPos>, row: usize) -> Reaction {
        let cell = active.map_or(0, |a| a.cell);
        let mut reaction = Reaction::handled();
        reaction.scroll_to_row = Some(row);
        if host.can_cell_be_active(row, cell) {
            reaction.activate = Some(CellPos::new(row, cell));
        }
        reaction.select = Some(vec![Range::whole_row(row, host.column_count())]);
        reaction
    }
}

impl SelectionModel for RowSelectionModel {
    fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    fn set_selected_ranges(&mut self, ranges: Vec<Range>) -> bool {
        replace_ranges(&mut self.ranges, ranges)
    }

    fn on_active_cell_changed(&mut self, host: &dyn SelectionHost, cell: CellPos) -> Reaction {
        if self.select_active_row {
            Reaction::select(vec![Range::whole_row(cell.row, host.column_count())])
        } else {
            Reaction::none()
        }
    }

    fn on_key_down(&mut self, host: &dyn SelectionHost, key: &KeyEvent) -> Reaction {
        let m = key.modifiers;
        let active = host.active_cell();
        let len = host.data_len();

        match key.key_code {
            keys::UP | keys::DOWN if m.shift && !m.command() && !m.alt => match active {
                Some(a) => self.extend_block(host, a, key.key_code == keys::DOWN),
                None => Reaction::none(),
            },
            keys::HOME if m.is_none() && len > 0 => Self::jump_to(host, active, 0),
            keys::END if m.is_none() && len > 0 => Self::jump_to(host, active, len - 1),
            keys::A if m.command() && !m.shift && host.multi_select() && len > 0 => {
                let all: Vec<usize> = (0..len).collect();
                let mut reaction = Reaction::handled();
                reaction.select = Some(Self::rows_to_ranges(&all, host.column_count()));
                reaction
            }
            _ => Reaction::none(),
        }
    }

    fn on_click(&mut self, host: &dyn SelectionHost, cell: CellPos, m: Modifiers) -> Reaction {
        if !host.can_cell_be_active(cell.row, cell.cell) {
            return Reaction::none();
        }
        if !host.multi_select() || (!m.command() && !m.shift) {
            // Plain click: the grid activates the cell, which selects its row.
            return Reaction::none();
        }

        let mut selection = self.selected_rows();
        let position = selection.iter().position(|&r| r == cell.row);
        if m.command() {
            match position {
                Some(i) => {
                    selection.remove(i);
                }
                None => selection.push(cell.row),
            }
        } else if let Some(&anchor) = selection.first() {
            // Shift extends a contiguous block from the first selected row;
            // the anchor stays first.
            let (from, to) = (cell.row.min(anchor), cell.row.max(anchor));
            selection = std::iter::once(anchor)
                .chain((from..=to).filter(|&r| r != anchor))
                .collect();
        } else {
            selection.push(cell.row);
        }

        Reaction {
            handled: true,
            activate: Some(cell),
            select: Some(Self::rows_to_ranges(&selection, host.column_count())),
            ..Reaction::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::super::tests::FakeHost;
    use super::*;

    /// Apply a reaction the way the grid does.
    fn apply(model: &mut RowSelectionModel, host: &mut FakeHost, reaction: Reaction) {
        if let Some(cell) = reaction.activate {
            host.active = Some(cell);
            let follow = model.on_active_cell_changed(host, cell);
            if let Some(ranges) = follow.select {
                model.set_selected_ranges(ranges);
            }
        }
        if let Some(ranges) = reaction.select {
            model.set_selected_ranges(ranges);
        }
    }

    fn click(model: &mut RowSelectionModel, host: &mut FakeHost, row: usize, m: Modifiers) {
        let reaction = model.on_click(host, CellPos::new(row, 0), m);
        if reaction.handled {
            apply(model, host, reaction);
        } else {
            apply(
                model,
                host,
                Reaction {
                    activate: Some(CellPos::new(row, 0)),
                    ..Reaction::default()
                },
            );
        }
    }

    #[test]
    fn test_plain_click_replaces() {
        let mut host = FakeHost::new(10, 3);
        let mut model = RowSelectionModel::new();
        click(&mut model, &mut host, 3, Modifiers::NONE);
        click(&mut model, &mut host, 7, Modifiers::NONE);
        assert_eq!(model.selected_rows(), vec![7]);
        assert_eq!(model.ranges()[0], Range::new(7, 0, 7, 2));
    }

    #[test]
    fn test_shift_click_extends_from_first_selected() {
        let mut host = FakeHost::new(10, 3);
        let mut model = RowSelectionModel::new();
        click(&mut model, &mut host, 2, Modifiers::NONE);
        click(&mut model, &mut host, 5, Modifiers::SHIFT);
        let mut rows = model.selected_rows();
        assert_eq!(rows[0], 2);
        rows.sort_unstable();
        assert_eq!(rows, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_ctrl_click_toggles() {
        let mut host = FakeHost::new(10, 3);
        let mut model = RowSelectionModel::new();
        click(&mut model, &mut host, 1, Modifiers::NONE);
        click(&mut model, &mut host, 4, Modifiers::CTRL);
        assert_eq!(model.selected_rows(), vec![1, 4]);
        click(&mut model, &mut host, 1, Modifiers::CTRL);
        assert_eq!(model.selected_rows(), vec![4]);
    }

    #[test]
    fn test_modifier_click_ignored_without_multi_select() {
        let mut host = FakeHost::new(10, 3);
        host.multi_select = false;
        let mut model = RowSelectionModel::new();
        assert!(!model.on_click(&host, CellPos::new(1, 0), Modifiers::SHIFT).handled);
    }

    #[test]
    fn test_shift_down_grows_then_shift_up_shrinks() {
        let mut host = FakeHost::new(10, 3);
        let mut model = RowSelectionModel::new();
        click(&mut model, &mut host, 4, Modifiers::NONE);
        let shift_down = KeyEvent::with_modifiers(keys::DOWN, Modifiers::SHIFT);
        let shift_up = KeyEvent::with_modifiers(keys::UP, Modifiers::SHIFT);

        let r = model.on_key_down(&host, &shift_down);
        assert_eq!(r.scroll_to_row, Some(5));
        apply(&mut model, &mut host, r);
        let r = model.on_key_down(&host, &shift_down);
        apply(&mut model, &mut host, r);
        assert_eq!(model.selected_rows(), vec![4, 5, 6]);

        let r = model.on_key_down(&host, &shift_up);
        apply(&mut model, &mut host, r);
        assert_eq!(model.selected_rows(), vec![4, 5]);
    }

    #[test]
    fn test_shift_up_at_top_is_noop() {
        let mut host = FakeHost::new(10, 3);
        let mut model = RowSelectionModel::new();
        click(&mut model, &mut host, 0, Modifiers::NONE);
        let r = model.on_key_down(&host, &KeyEvent::with_modifiers(keys::UP, Modifiers::SHIFT));
        assert!(r.handled);
        assert!(r.select.is_none());
    }

    #[test]
    fn test_home_end_and_select_all() {
        let mut host = FakeHost::new(6, 2);
        let mut model = RowSelectionModel::new();
        click(&mut model, &mut host, 3, Modifiers::NONE);
        let r = model.on_key_down(&host, &KeyEvent::new(keys::END));
        assert_eq!(r.activate, Some(CellPos::new(5, 0)));
        apply(&mut model, &mut host, r);
        assert_eq!(model.selected_rows(), vec![5]);

        let r = model.on_key_down(&host, &KeyEvent::with_modifiers(keys::A, Modifiers::CTRL));
        apply(&mut model, &mut host, r);
        assert_eq!(model.selected_rows(), vec![0, 1, 2, 3, 4, 5]);
    }
}
