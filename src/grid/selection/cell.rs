//! Rectangular cell selection with keyboard extension and drag ranges.

use super::range_selector::CellRangeSelector;
use super::{replace_ranges, CellPos, Range, Reaction, SelectionHost, SelectionModel};
use crate::events::{keys, KeyEvent, Modifiers};

#[derive(Debug)]
pub struct CellSelectionModel {
    ranges: Vec<Range>,
    /// Anchor of the last reversed shift-click; the row split loses its column.
    split_anchor: Option<CellPos>,
    /// Select the active cell whenever it changes.
    select_active_cell: bool,
    selector: CellRangeSelector,
}

impl Default for CellSelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

fn precedes(a: CellPos, b: CellPos) -> bool {
    (a.row, a.cell) < (b.row, b.cell)
}

/// Merge a row-split inverted selection back into one rectangle.
fn coalesce(ranges: &[Range]) -> Vec<Range> {
    let mut inverted = ranges.iter().filter(|r| r.inverted);
    let Some(first) = inverted.next() else {
        return ranges.to_vec();
    };
    let mut merged = inverted.fold(*first, |acc, r| acc.union(r));
    merged.inverted = false;
    let mut out: Vec<Range> = ranges.iter().filter(|r| !r.inverted).copied().collect();
    out.push(merged);
    out
}

impl CellSelectionModel {
    pub fn new() -> Self {
        Self {
            ranges: Vec::new(),
            split_anchor: None,
            select_active_cell: true,
            selector: CellRangeSelector::new(),
        }
    }

    #[must_use]
    pub fn with_select_active_cell(mut self, on: bool) -> Self {
        self.select_active_cell = on;
        self
    }

    /// The drag tracker, for subscribing to its events.
    pub fn selector(&self) -> &CellRangeSelector {
        &self.selector
    }

    fn is_valid(host: &dyn SelectionHost, range: &Range) -> bool {
        host.can_cell_be_selected(range.from_row, range.from_cell)
            && host.can_cell_be_selected(range.to_row, range.to_cell)
    }

    /// Corner a shift-click extends from.
    fn anchor(&self) -> Option<CellPos> {
        let first = self.ranges.first()?;
        if !first.inverted {
            return Some(CellPos::new(first.from_row, first.from_cell));
        }
        let anchor = self
            .split_anchor
            .filter(|a| first.contains(a.row, a.cell))
            .unwrap_or(CellPos::new(first.to_row, first.to_cell));
        Some(anchor)
    }

    /// Anchor-to-target selection. When the target precedes the anchor in
    /// row-major order, one range per row is produced, starting at the anchor
    /// row and tagged `inverted`.
    fn extend_to(anchor: CellPos, target: CellPos) -> Vec<Range> {
        if !precedes(target, anchor) {
            return vec![Range::between(anchor, target)];
        }
        (target.row..=anchor.row)
            .rev()
            .map(|row| Range {
                inverted: true,
                ..Range::new(row, target.cell, row, anchor.cell)
            })
            .collect()
    }

    fn extend_with_keyboard(&self, host: &dyn SelectionHost, active: CellPos, key: u32) -> Reaction {
        let mut ranges = coalesce(&self.ranges);
        // Only the last range follows the keyboard, and only if it holds the active cell.
        let last = ranges
            .pop()
            .filter(|r| r.contains(active.row, active.cell))
            .unwrap_or_else(|| Range::single(active.row, active.cell));

        let mut d_row = to_i64(last.to_row) - to_i64(last.from_row);
        let mut d_cell = to_i64(last.to_cell) - to_i64(last.from_cell);
        let dir_row: i64 = if active.row == last.from_row { 1 } else { -1 };
        let dir_cell: i64 = if active.cell == last.from_cell { 1 } else { -1 };
        match key {
            keys::LEFT => d_cell -= dir_cell,
            keys::RIGHT => d_cell += dir_cell,
            keys::UP => d_row -= dir_row,
            _ => d_row += dir_row,
        }

        let end_row = usize::try_from(to_i64(active.row) + dir_row * d_row);
        let end_cell = usize::try_from(to_i64(active.cell) + dir_cell * d_cell);
        let mut reaction = Reaction::handled();
        match (end_row, end_cell) {
            (Ok(end_row), Ok(end_cell))
                if Self::is_valid(host, &Range::new(active.row, active.cell, end_row, end_cell)) =>
            {
                let next = Range::new(active.row, active.cell, end_row, end_cell);
                let view_row = if dir_row > 0 { next.to_row } else { next.from_row };
                let view_cell = if dir_cell > 0 { next.to_cell } else { next.from_cell };
                reaction.scroll_to_row = Some(view_row);
                reaction.scroll_to_cell = Some(CellPos::new(view_row, view_cell));
                ranges.push(next);
            }
            _ => ranges.push(last),
        }
        reaction.select = Some(ranges);
        reaction
    }
}

impl SelectionModel for CellSelectionModel {
    fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    fn set_selected_ranges(&mut self, ranges: Vec<Range>) -> bool {
        replace_ranges(&mut self.ranges, ranges)
    }

    fn on_active_cell_changed(&mut self, _host: &dyn SelectionHost, cell: CellPos) -> Reaction {
        if self.select_active_cell {
            Reaction::select(vec![Range::single(cell.row, cell.cell)])
        } else {
            Reaction::none()
        }
    }

    fn on_key_down(&mut self, host: &dyn SelectionHost, key: &KeyEvent) -> Reaction {
        let m = key.modifiers;
        let arrow = matches!(key.key_code, keys::LEFT | keys::RIGHT | keys::UP | keys::DOWN);
        match host.active_cell() {
            Some(active) if arrow && m.shift && !m.command() && !m.alt => {
                self.extend_with_keyboard(host, active, key.key_code)
            }
            _ => Reaction::none(),
        }
    }

    fn on_click(&mut self, host: &dyn SelectionHost, cell: CellPos, m: Modifiers) -> Reaction {
        if !host.multi_select() || !host.can_cell_be_selected(cell.row, cell.cell) {
            return Reaction::none();
        }
        if m.command() {
            let single = Range::single(cell.row, cell.cell);
            let mut ranges = self.ranges.clone();
            match ranges.iter().position(|r| *r == single) {
                Some(i) => {
                    ranges.remove(i);
                }
                None => ranges.push(single),
            }
            let mut reaction = Reaction::handled();
            if host.can_cell_be_active(cell.row, cell.cell) {
                reaction.activate = Some(cell);
            }
            reaction.select = Some(ranges);
            return reaction;
        }
        if m.shift {
            if let Some(anchor) = self.anchor() {
                self.split_anchor = precedes(cell, anchor).then_some(anchor);
                let mut reaction = Reaction::handled();
                reaction.select = Some(Self::extend_to(anchor, cell));
                return reaction;
            }
        }
        Reaction::none()
    }

    fn on_drag_start(&mut self, host: &dyn SelectionHost, cell: CellPos, m: Modifiers) -> Reaction {
        if self.selector.drag_start(host, cell, m) {
            Reaction::handled()
        } else {
            Reaction::none()
        }
    }

    fn on_drag(&mut self, host: &dyn SelectionHost, cell: CellPos) -> Reaction {
        if self.selector.drag(host, cell).is_some() {
            Reaction::handled()
        } else {
            Reaction::none()
        }
    }

    fn on_drag_end(&mut self, host: &dyn SelectionHost) -> Reaction {
        let Some((range, append)) = self.selector.drag_end() else {
            return Reaction::none();
        };
        if !Self::is_valid(host, &range) {
            return Reaction::handled();
        }
        let ranges = if append {
            let mut ranges = self.ranges.clone();
            ranges.push(range);
            ranges
        } else {
            vec![range]
        };
        let mut reaction = Reaction::handled();
        reaction.select = Some(ranges);
        reaction
    }

    fn decorated_range(&self) -> Option<Range> {
        self.selector.decorated_range()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::super::tests::FakeHost;
    use super::*;
    use test_case::test_case;

    fn shift(key: u32) -> KeyEvent {
        KeyEvent::with_modifiers(key, Modifiers::SHIFT)
    }

    fn run(model: &mut CellSelectionModel, host: &FakeHost, key: KeyEvent) -> Reaction {
        let reaction = model.on_key_down(host, &key);
        if let Some(ranges) = reaction.select.clone() {
            model.set_selected_ranges(ranges);
        }
        reaction
    }

    #[test]
    fn test_shift_arrows_grow_and_shrink() {
        let mut host = FakeHost::new(10, 10);
        host.active = Some(CellPos::new(2, 2));
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::single(2, 2)]);

        run(&mut model, &host, shift(keys::RIGHT));
        run(&mut model, &host, shift(keys::DOWN));
        assert_eq!(model.ranges(), &[Range::new(2, 2, 3, 3)]);

        let reaction = run(&mut model, &host, shift(keys::LEFT));
        assert_eq!(model.ranges(), &[Range::new(2, 2, 3, 2)]);
        assert_eq!(reaction.scroll_to_row, Some(3));
    }

    #[test]
    fn test_shift_arrow_flips_past_active_cell() {
        let mut host = FakeHost::new(10, 10);
        host.active = Some(CellPos::new(2, 2));
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::single(2, 2)]);
        run(&mut model, &host, shift(keys::UP));
        assert_eq!(model.ranges(), &[Range::new(1, 2, 2, 2)]);
        run(&mut model, &host, shift(keys::UP));
        assert_eq!(model.ranges(), &[Range::new(0, 2, 2, 2)]);
        // Off the top edge: unchanged.
        run(&mut model, &host, shift(keys::UP));
        assert_eq!(model.ranges(), &[Range::new(0, 2, 2, 2)]);
    }

    #[test]
    fn test_active_cell_outside_last_range_restarts() {
        let mut host = FakeHost::new(10, 10);
        host.active = Some(CellPos::new(5, 5));
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::new(0, 0, 1, 1)]);
        run(&mut model, &host, shift(keys::RIGHT));
        assert_eq!(model.ranges(), &[Range::new(5, 5, 5, 6)]);
    }

    #[test]
    fn test_shift_click_forward_is_one_rectangle() {
        let host = FakeHost::new(10, 10);
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::single(1, 1)]);
        let r = model.on_click(&host, CellPos::new(3, 4), Modifiers::SHIFT);
        assert!(r.handled);
        assert_eq!(r.select.unwrap(), vec![Range::new(1, 1, 3, 4)]);
    }

    #[test]
    fn test_shift_click_reversed_splits_rows_and_keyboard_coalesces() {
        let mut host = FakeHost::new(10, 10);
        host.active = Some(CellPos::new(4, 4));
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::single(4, 4)]);

        let r = model.on_click(&host, CellPos::new(2, 1), Modifiers::SHIFT);
        let ranges = r.select.unwrap();
        assert_eq!(ranges.len(), 3);
        assert!(ranges.iter().all(|r| r.inverted));
        assert_eq!((ranges[0].from_row, ranges[0].to_cell), (4, 4));
        model.set_selected_ranges(ranges);

        // The next shift-click still extends from the original anchor.
        let r = model.on_click(&host, CellPos::new(6, 6), Modifiers::SHIFT);
        assert_eq!(r.select.unwrap(), vec![Range::new(4, 4, 6, 6)]);

        run(&mut model, &host, shift(keys::LEFT));
        assert_eq!(model.ranges(), &[Range::new(2, 0, 4, 4)]);
    }

    #[test_case(CellPos::new(2, 1), 1, 4 ; "up and left")]
    #[test_case(CellPos::new(2, 6), 4, 6 ; "up and right")]
    #[test_case(CellPos::new(2, 4), 4, 4 ; "straight up")]
    fn test_shift_click_to_earlier_row_splits(target: CellPos, from_cell: usize, to_cell: usize) {
        let host = FakeHost::new(10, 10);
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::single(4, 4)]);

        let ranges = model.on_click(&host, target, Modifiers::SHIFT).select.unwrap();
        let rows: Vec<usize> = ranges.iter().map(|r| r.from_row).collect();
        assert_eq!(rows, vec![4, 3, 2]);
        for r in &ranges {
            assert!(r.inverted);
            assert!(r.is_single_row());
            assert_eq!((r.from_cell, r.to_cell), (from_cell, to_cell));
        }
        model.set_selected_ranges(ranges);

        // A second shift-click keeps extending from the original anchor.
        let r = model.on_click(&host, CellPos::new(5, 5), Modifiers::SHIFT);
        assert_eq!(r.select.unwrap(), vec![Range::new(4, 4, 5, 5)]);
    }

    #[test]
    fn test_shift_click_left_on_the_anchor_row_keeps_the_anchor() {
        let host = FakeHost::new(10, 10);
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::single(4, 4)]);
        let ranges = model.on_click(&host, CellPos::new(4, 1), Modifiers::SHIFT).select.unwrap();
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].inverted);
        model.set_selected_ranges(ranges);
        let r = model.on_click(&host, CellPos::new(6, 6), Modifiers::SHIFT);
        assert_eq!(r.select.unwrap(), vec![Range::new(4, 4, 6, 6)]);
    }

    #[test]
    fn test_ctrl_click_toggles_cells() {
        let host = FakeHost::new(10, 10);
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::single(0, 0)]);
        let r = model.on_click(&host, CellPos::new(1, 1), Modifiers::CTRL);
        assert_eq!(r.activate, Some(CellPos::new(1, 1)));
        model.set_selected_ranges(r.select.unwrap());
        assert_eq!(model.ranges().len(), 2);
        let r = model.on_click(&host, CellPos::new(0, 0), Modifiers::CTRL);
        assert_eq!(r.select.unwrap(), vec![Range::single(1, 1)]);
    }

    #[test]
    fn test_drag_replaces_or_appends() {
        let host = FakeHost::new(10, 10);
        let mut model = CellSelectionModel::new();
        model.set_selected_ranges(vec![Range::single(0, 0)]);

        assert!(model.on_drag_start(&host, CellPos::new(1, 1), Modifiers::NONE).handled);
        model.on_drag(&host, CellPos::new(2, 3));
        assert_eq!(model.decorated_range(), Some(Range::new(1, 1, 2, 3)));
        let r = model.on_drag_end(&host);
        assert_eq!(r.select.clone().unwrap(), vec![Range::new(1, 1, 2, 3)]);
        model.set_selected_ranges(r.select.unwrap());

        model.on_drag_start(&host, CellPos::new(5, 5), Modifiers::SHIFT);
        model.on_drag(&host, CellPos::new(6, 6));
        let r = model.on_drag_end(&host);
        assert_eq!(r.select.unwrap().len(), 2);
        assert_eq!(model.decorated_range(), None);
    }
}
