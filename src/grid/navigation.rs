//! Active cell and keyboard navigation.

use serde::{Deserialize, Serialize};

use super::events::Notification;
use super::state::{to_i64, GridState, Pending};
use super::selection::CellPos;

/// Direction of a single navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
    /// Previous focusable cell, wrapping to the end of the previous row.
    Prev,
    /// Next focusable cell, wrapping to the start of the next row.
    Next,
}

impl NavDirection {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "prev" => Some(Self::Prev),
            "next" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Target of a navigation step. `pos_x` is the column the user is "aiming"
/// at, kept across rows whose colspans hide that column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NavPos {
    pub row: usize,
    pub cell: usize,
    pub pos_x: usize,
}

impl NavPos {
    fn at(row: usize, cell: usize) -> Self {
        Self {
            row,
            cell,
            pos_x: cell,
        }
    }
}

impl GridState {
    pub(crate) fn find_first_focusable_cell(&self, row: usize) -> Option<usize> {
        let mut cell = 0;
        while cell < self.columns.len() {
            if self.can_cell_be_active(row, cell) {
                return Some(cell);
            }
            cell += self.colspan(row, cell);
        }
        None
    }

    pub(crate) fn find_last_focusable_cell(&self, row: usize) -> Option<usize> {
        let mut cell = 0;
        let mut last = None;
        while cell < self.columns.len() {
            if self.can_cell_be_active(row, cell) {
                last = Some(cell);
            }
            cell += self.colspan(row, cell);
        }
        last
    }

    /// The cell of `row` that covers column `pos_x`.
    fn cell_covering(&self, row: usize, pos_x: usize) -> usize {
        let mut cell = 0;
        let mut prev = 0;
        while cell <= pos_x && cell < self.columns.len() {
            prev = cell;
            cell += self.colspan(row, cell);
        }
        prev
    }

    pub(crate) fn goto_right(&self, row: usize, mut cell: usize) -> Option<NavPos> {
        let n = self.columns.len();
        if cell >= n {
            return None;
        }
        loop {
            cell += self.colspan(row, cell);
            if cell >= n || self.can_cell_be_active(row, cell) {
                break;
            }
        }
        (cell < n).then(|| NavPos::at(row, cell))
    }

    pub(crate) fn goto_left(&self, row: usize, cell: usize) -> Option<NavPos> {
        if cell == 0 {
            return None;
        }
        let first = self.find_first_focusable_cell(row)?;
        if first >= cell {
            return None;
        }
        let mut prev = NavPos::at(row, first);
        loop {
            let pos = self.goto_right(prev.row, prev.cell)?;
            if pos.cell >= cell {
                return Some(prev);
            }
            prev = pos;
        }
    }

    pub(crate) fn goto_down(&self, mut row: usize, pos_x: usize) -> Option<NavPos> {
        let len = self.data_len_including_add_new();
        loop {
            row += 1;
            if row >= len {
                return None;
            }
            let cell = self.cell_covering(row, pos_x);
            if self.can_cell_be_active(row, cell) {
                return Some(NavPos { row, cell, pos_x });
            }
        }
    }

    pub(crate) fn goto_up(&self, mut row: usize, pos_x: usize) -> Option<NavPos> {
        loop {
            row = row.checked_sub(1)?;
            let cell = self.cell_covering(row, pos_x);
            if self.can_cell_be_active(row, cell) {
                return Some(NavPos { row, cell, pos_x });
            }
        }
    }

    pub(crate) fn goto_next(&self, from: Option<CellPos>) -> Option<NavPos> {
        let Some(from) = from else {
            if self.can_cell_be_active(0, 0) {
                return Some(NavPos::at(0, 0));
            }
            return self.goto_next(Some(CellPos::new(0, 0)));
        };
        if let Some(pos) = self.goto_right(from.row, from.cell) {
            return Some(pos);
        }
        let len = to_i64(self.data_len_including_add_new());
        let mut row = to_i64(from.row);
        // On the last row, cycle back to its first cell instead of stopping.
        if row == len - 1 {
            row -= 1;
        }
        loop {
            row += 1;
            if row >= len {
                return None;
            }
            let r = usize::try_from(row).ok()?;
            if let Some(first) = self.find_first_focusable_cell(r) {
                return Some(NavPos::at(r, first));
            }
        }
    }

    pub(crate) fn goto_prev(&self, from: Option<CellPos>) -> Option<NavPos> {
        let from = match from {
            Some(from) => from,
            None => {
                let row = self.data_len_including_add_new().checked_sub(1)?;
                let cell = self.columns.len().checked_sub(1)?;
                if self.can_cell_be_active(row, cell) {
                    return Some(NavPos::at(row, cell));
                }
                CellPos::new(row, cell)
            }
        };
        let mut row = from.row;
        let mut cell = from.cell;
        loop {
            if let Some(pos) = self.goto_left(row, cell) {
                return Some(pos);
            }
            row = row.checked_sub(1)?;
            cell = 0;
            if let Some(last) = self.find_last_focusable_cell(row) {
                return Some(NavPos::at(row, last));
            }
        }
    }

    /// Move one step in `dir`. The caller has already committed any edit.
    pub(crate) fn navigate_step(&mut self, dir: NavDirection) -> bool {
        let from = self.active;
        let pos = match (dir, from) {
            (NavDirection::Next, _) => self.goto_next(from),
            (NavDirection::Prev, _) => self.goto_prev(from),
            (_, None) => return false,
            (NavDirection::Up, Some(a)) => self.goto_up(a.row, self.active_pos_x),
            (NavDirection::Down, Some(a)) => self.goto_down(a.row, self.active_pos_x),
            (NavDirection::Left, Some(a)) => self.goto_left(a.row, a.cell),
            (NavDirection::Right, Some(a)) => self.goto_right(a.row, a.cell),
        };
        match pos {
            Some(pos) => {
                let is_add_new_row = pos.row == self.data_len();
                self.scroll_cell_into_view(pos.row, pos.cell, !is_add_new_row);
                self.set_active_cell_internal(Some(CellPos::new(pos.row, pos.cell)), None);
                self.active_pos_x = pos.pos_x;
                true
            }
            None => {
                let pos_x = self.active_pos_x;
                self.set_active_cell_internal(from, None);
                self.active_pos_x = pos_x;
                false
            }
        }
    }

    fn set_active_classes(&self, pos: CellPos, on: bool) {
        let Some(entry) = self.rows_cache.get(&pos.row) else {
            return;
        };
        let mut surface = self.surface.borrow_mut();
        surface.set_class(entry.row_node, "active", on);
        if let Some(&node) = entry.cell_nodes.get(&pos.cell) {
            surface.set_class(node, "active", on);
        }
    }

    /// Move the active cell. `edit_mode` defaults to opening an editor on
    /// the add-row or when `auto_edit` is on.
    pub(crate) fn set_active_cell_internal(
        &mut self,
        new: Option<CellPos>,
        edit_mode: Option<bool>,
    ) {
        if let Some(old) = self.active {
            self.make_active_cell_normal();
            self.set_active_classes(old, false);
        }
        let changed = self.active != new;
        self.active = new;

        if let Some(pos) = new {
            self.active_pos_x = pos.cell;
            self.set_active_classes(pos, true);
            let edit_mode =
                edit_mode.unwrap_or(pos.row == self.data_len() || self.options.auto_edit);
            if self.options.editable
                && edit_mode
                && self.is_cell_potentially_editable(pos.row, pos.cell)
            {
                self.editor_load_timer.cancel();
                if self.options.async_editor_loading {
                    self.editor_load_timer
                        .arm(self.now, self.options.async_editor_load_delay);
                } else {
                    self.pending.push_back(Pending::OpenEditor(pos));
                }
            }
        }

        if changed {
            self.emit(Notification::ActiveCellChanged(new));
            if let Some(pos) = new {
                if let Some(reaction) =
                    self.selection_hook(|model, host| model.on_active_cell_changed(host, pos))
                {
                    self.apply_reaction(reaction);
                }
            }
        }
    }

    pub(crate) fn reset_active_cell(&mut self) {
        self.set_active_cell_internal(None, Some(false));
    }

    /// Scroll one viewport up (`-1`) or down (`1`) and carry the active cell
    /// along, keeping its aimed column.
    pub(crate) fn scroll_page(&mut self, dir: i64) {
        let delta = dir * to_i64(self.viewport.num_visible_rows());
        let top_row = self.viewport.row_from_position(self.viewport.scroll_top());
        #[allow(clippy::cast_precision_loss)]
        let target = (top_row + delta) as f64 * self.viewport.row_height();
        self.scroll_to(target);
        self.render();

        let Some(active) = self.active else {
            return;
        };
        if !self.options.enable_cell_navigation {
            return;
        }
        let last = to_i64(self.data_len_including_add_new()) - 1;
        let row = (to_i64(active.row) + delta).min(last).max(0);
        let Ok(row) = usize::try_from(row) else {
            return;
        };
        let pos_x = self.active_pos_x;
        let mut cell = 0;
        let mut target_cell = None;
        while cell <= pos_x && cell < self.columns.len() {
            if self.can_cell_be_active(row, cell) {
                target_cell = Some(cell);
            }
            cell += self.colspan(row, cell);
        }
        match target_cell {
            Some(cell) => {
                self.set_active_cell_internal(Some(CellPos::new(row, cell)), None);
                self.active_pos_x = pos_x;
            }
            None => self.reset_active_cell(),
        }
    }

    /// Cell under canvas point `(x, y)`; a point inside a spanned cell
    /// resolves to the spanning cell.
    pub(crate) fn cell_from_point(&self, x: f64, y: f64) -> Option<CellPos> {
        let row = usize::try_from(self.viewport.row_from_position(y)).ok()?;
        if row >= self.data_len_including_add_new() || x < 0.0 {
            return None;
        }
        let column = (0..self.columns.len()).find(|&i| x < self.column_positions.right(i))?;
        let mut cell = 0;
        while cell < self.columns.len() {
            let span = self.colspan(row, cell);
            if column < cell + span {
                return Some(CellPos::new(row, cell));
            }
            cell += span;
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_names() {
        assert_eq!(NavDirection::from_name("prev"), Some(NavDirection::Prev));
        assert_eq!(NavDirection::from_name("sideways"), None);
        let json = serde_json::to_string(&NavDirection::Down).unwrap();
        assert_eq!(json, "\"down\"");
    }
}
