//! Virtualized data grid.
//!
//! [`Grid`] is a cheap handle over shared state. Operations that may close an
//! editor first go through the [`EditorLock`], which calls back into the
//! grid, so the handle never keeps its state borrowed across that call.
//! Notifications raised inside the state are queued and delivered by the
//! handle once the borrow ends, which lets handlers use the grid freely.
//!
//! ```ignore
//! let surface = Rc::new(RefCell::new(MemorySurface::new()));
//! let grid = Grid::new(surface, Box::new(rows), columns, GridOptions::default(), GridHooks::default());
//! grid.resize_canvas(400.0, 300.0);
//! grid.navigate(NavDirection::Down);
//! ```

pub mod column;
pub mod data;
pub mod editor;
pub mod events;
pub mod navigation;
pub mod options;
pub mod render;
pub mod selection;
mod state;
pub mod viewport;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

pub use column::Column;
pub use data::{DataSource, ItemMetadata};
pub use editor::{EditCommand, EditController, Editor, EditorFactory, EditorLock, TextEditor};
pub use events::GridEvents;
pub use navigation::NavDirection;
pub use options::{GridHooks, GridOptions};
pub use render::{CellCssHash, MemorySurface, Surface};
pub use selection::{CellPos, Range, SelectionModel};
pub use viewport::ViewRange;

use self::editor::SharedEditor;
use self::events::{CellEventArgs, HeaderClickArgs, KeyDownArgs, SortArgs, SortColumn};
use self::state::{CommitOutcome, GridState, Pending};
use crate::error::{GridcalError, Result};
use crate::events::{keys, KeyEvent, Modifiers, PointerEvent};

/// Grid side of the editor lock: commit or cancel whatever editor is open.
struct GridEditController {
    state: Weak<RefCell<GridState>>,
}

impl EditController for GridEditController {
    fn commit_current_edit(&self) -> bool {
        match self.state.upgrade() {
            Some(state) => commit_edit(&state),
            None => true,
        }
    }

    fn cancel_current_edit(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return true;
        };
        match state.try_borrow_mut() {
            Ok(mut s) => s.make_active_cell_normal(),
            Err(_) => {
                tracing::warn!("cancel requested while the grid is busy");
                return false;
            }
        }
        Grid { state }.flush();
        true
    }
}

/// Commit the open editor. A valid change to an existing row is executed
/// with the state released, since the command calls back into the grid.
fn commit_edit(state: &Rc<RefCell<GridState>>) -> bool {
    let outcome = match state.try_borrow_mut() {
        Ok(mut s) => s.commit_current_edit(),
        Err(_) => {
            tracing::warn!("commit requested while the grid is busy");
            return false;
        }
    };
    let grid = Grid {
        state: Rc::clone(state),
    };
    grid.flush();
    match outcome {
        CommitOutcome::Finished(ok) => ok,
        CommitOutcome::Execute {
            command,
            item,
            column,
            close_after,
        } => {
            let handler = state.borrow().hooks.edit_command_handler.clone();
            match handler {
                Some(handler) => handler(&grid, item.as_ref(), &column, command),
                None => command.execute(&grid),
            }
            grid.update(|s| {
                if close_after {
                    s.make_active_cell_normal();
                }
                !s.editor_lock.is_active()
            })
        }
    }
}

/// Apply SlickGrid-style header sort toggling and build the `on_sort` payload.
fn toggle_sort(
    sort_columns: &mut Vec<SortColumn>,
    column: &Column,
    modifiers: Modifiers,
    multi_column_sort: bool,
) -> SortArgs {
    let existing = sort_columns.iter().position(|s| s.column_id == column.id);
    let mut toggled = existing.and_then(|i| sort_columns.get_mut(i)).map(|s| {
        s.sort_asc = !s.sort_asc;
        s.clone()
    });

    if modifiers.command() && multi_column_sort {
        if let Some(i) = existing {
            sort_columns.remove(i);
        }
    } else {
        if (!modifiers.shift && !modifiers.command()) || !multi_column_sort {
            sort_columns.clear();
        }
        match &toggled {
            None => {
                let opts = SortColumn {
                    column_id: column.id.clone(),
                    sort_asc: column.default_sort_asc,
                };
                sort_columns.push(opts.clone());
                toggled = Some(opts);
            }
            Some(opts) if sort_columns.is_empty() => sort_columns.push(opts.clone()),
            Some(_) => {}
        }
    }

    let sort_columns = if multi_column_sort {
        sort_columns.clone()
    } else {
        toggled.into_iter().collect()
    };
    SortArgs {
        multi_column_sort,
        sort_columns,
    }
}

/// Handle to a grid. Clones share the same grid.
#[derive(Clone)]
pub struct Grid {
    state: Rc<RefCell<GridState>>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(s) => f
                .debug_struct("Grid")
                .field("rows", &s.data_len())
                .field("columns", &s.columns.len())
                .field("active", &s.active)
                .finish_non_exhaustive(),
            Err(_) => f.write_str("Grid { <busy> }"),
        }
    }
}

impl Grid {
    pub fn new(
        surface: Rc<RefCell<dyn Surface>>,
        data: Box<dyn DataSource>,
        columns: Vec<Column>,
        options: GridOptions,
        hooks: GridHooks,
    ) -> Self {
        let state = Rc::new_cyclic(|weak: &Weak<RefCell<GridState>>| {
            let controller: Rc<dyn EditController> = Rc::new(GridEditController {
                state: weak.clone(),
            });
            RefCell::new(GridState::new(
                surface, data, columns, options, hooks, controller,
            ))
        });
        Self { state }
    }

    pub fn events(&self) -> Rc<GridEvents> {
        Rc::clone(&self.state.borrow().events)
    }

    pub fn editor_lock(&self) -> Rc<EditorLock> {
        Rc::clone(&self.state.borrow().editor_lock)
    }

    pub fn options(&self) -> GridOptions {
        self.state.borrow().options.clone()
    }

    fn commit_via_lock(&self) -> bool {
        let lock = self.editor_lock();
        lock.commit_current_edit()
    }

    /// Run `f` on the borrowed state, then deliver what it queued.
    fn update<R>(&self, f: impl FnOnce(&mut GridState) -> R) -> R {
        let out = f(&mut self.state.borrow_mut());
        self.flush();
        out
    }

    /// Drain the pending queue with the state released. Handlers that call
    /// back into the grid drain whatever they add themselves.
    fn flush(&self) {
        let events = self.events();
        loop {
            let next = self.state.borrow_mut().pending.pop_front();
            match next {
                None => break,
                Some(Pending::Notify(notification)) => events.dispatch(notification),
                Some(Pending::OpenEditor(pos)) => {
                    if self.active_cell() != Some(pos) {
                        continue;
                    }
                    if let Err(e) = self.open_editor(None) {
                        tracing::warn!(error = %e, "editor failed to open");
                    }
                }
            }
        }
    }

    /// Resolve an editor, let `on_before_edit_cell` veto it, then open it.
    fn open_editor(&self, editor: Option<EditorFactory>) -> Result<()> {
        let Some(request) = self.state.borrow_mut().prepare_edit(editor)? else {
            return Ok(());
        };
        let data = self.events().on_before_edit_cell.notify(&request.args);
        if data.is_default_prevented() {
            tracing::debug!(row = request.args.row, cell = request.args.cell, "edit vetoed");
            return Ok(());
        }
        self.state.borrow_mut().open_editor(request)
    }

    // Data

    pub fn set_data(&self, data: Box<dyn DataSource>, scroll_to_top: bool) {
        self.update(|s| {
            s.data = data;
            s.invalidate_all_rows();
            s.update_row_count();
            if scroll_to_top {
                s.scroll_to(0.0);
            }
        });
    }

    pub fn data_len(&self) -> usize {
        self.state.borrow().data_len()
    }

    pub fn item(&self, row: usize) -> Option<Value> {
        self.state.borrow().data.item(row).cloned()
    }

    // Columns

    pub fn columns(&self) -> Vec<Column> {
        self.state.borrow().columns.clone()
    }

    pub fn set_columns(&self, columns: Vec<Column>) {
        self.update(|s| s.set_columns(columns));
    }

    /// Reorder columns by id. Returns false when the order did not change.
    pub fn set_column_order(&self, ids: &[&str]) -> Result<bool> {
        let reordered = {
            let s = self.state.borrow();
            if !s.options.enable_column_reorder {
                return Err(GridcalError::MissingDependency("column reorder"));
            }
            if ids.len() != s.columns.len() {
                return Err(GridcalError::InvalidArguments(format!(
                    "expected {} column ids, got {}",
                    s.columns.len(),
                    ids.len()
                )));
            }
            let mut reordered = Vec::with_capacity(ids.len());
            for id in ids {
                let column = s
                    .columns_by_id
                    .get(*id)
                    .and_then(|&i| s.columns.get(i))
                    .ok_or_else(|| GridcalError::InvalidArguments(format!("unknown column {id}")))?;
                if reordered.iter().any(|c: &Column| c.id == column.id) {
                    return Err(GridcalError::InvalidArguments(format!("duplicate column {id}")));
                }
                reordered.push(column.clone());
            }
            if reordered.iter().map(|c| &c.id).eq(s.columns.iter().map(|c| &c.id)) {
                return Ok(false);
            }
            reordered
        };
        self.update(|s| s.set_columns(reordered));
        self.events().on_columns_reordered.notify(&());
        Ok(true)
    }

    pub fn resize_column(&self, index: usize, delta: f64) {
        self.update(|s| s.resize_column(index, delta));
    }

    pub fn autosize_columns(&self) {
        self.update(GridState::autosize_columns);
    }

    // Viewport and rendering

    pub fn resize_canvas(&self, width: f64, height: f64) {
        self.update(|s| s.resize_canvas(width, height));
    }

    pub fn scroll_to(&self, y: f64) {
        self.update(|s| {
            s.scroll_to(y);
            s.render();
        });
    }

    /// Feed a scroll reported by the host (page-relative offsets).
    pub fn handle_scroll(&self, scroll_top: f64, scroll_left: f64) {
        self.update(|s| s.handle_scroll(scroll_top, scroll_left));
    }

    pub fn render(&self) {
        self.update(GridState::render);
    }

    /// Recount rows, drop every rendered row and render again.
    pub fn invalidate(&self) {
        self.update(|s| {
            s.update_row_count();
            s.invalidate_all_rows();
            s.render();
        });
    }

    pub fn invalidate_row(&self, row: usize) {
        self.update(|s| s.invalidate_rows(&[row]));
    }

    pub fn invalidate_rows(&self, rows: &[usize]) {
        self.update(|s| s.invalidate_rows(rows));
    }

    pub fn invalidate_all_rows(&self) {
        self.update(GridState::invalidate_all_rows);
    }

    pub fn update_row(&self, row: usize) {
        self.update(|s| s.update_row(row));
    }

    pub fn update_cell(&self, row: usize, cell: usize) {
        self.update(|s| s.update_cell(row, cell));
    }

    pub fn update_row_count(&self) {
        self.update(GridState::update_row_count);
    }

    pub fn visible_range(&self) -> ViewRange {
        self.state.borrow().viewport.visible_range()
    }

    pub fn rendered_range(&self) -> ViewRange {
        let s = self.state.borrow();
        s.viewport
            .rendered_range(s.data_len_including_add_new(), s.canvas_width)
    }

    /// Run deferred work due at `now_ms`.
    pub fn tick(&self, now_ms: f64) {
        self.update(|s| s.tick(now_ms));
    }

    // Active cell

    pub fn active_cell(&self) -> Option<CellPos> {
        self.state.borrow().active
    }

    /// Activate a cell without entering edit mode. Out-of-range cells are ignored.
    pub fn set_active_cell(&self, row: usize, cell: usize) {
        self.update(|s| {
            if row > s.data_len() || cell >= s.columns.len() || !s.options.enable_cell_navigation {
                return;
            }
            s.scroll_cell_into_view(row, cell, false);
            s.set_active_cell_internal(Some(CellPos::new(row, cell)), Some(false));
        });
    }

    pub fn reset_active_cell(&self) {
        self.update(GridState::reset_active_cell);
    }

    /// Commit any edit, then activate `(row, cell)`, opening an editor when
    /// `force_edit`, on the add-row, or with `auto_edit`.
    pub fn goto_cell(&self, row: usize, cell: usize, force_edit: bool) {
        if !self.can_cell_be_active(row, cell) || !self.commit_via_lock() {
            return;
        }
        self.update(|s| {
            s.scroll_cell_into_view(row, cell, false);
            let edit = force_edit || row == s.data_len() || s.options.auto_edit;
            s.set_active_cell_internal(Some(CellPos::new(row, cell)), Some(edit));
        });
    }

    pub fn can_cell_be_active(&self, row: usize, cell: usize) -> bool {
        self.state.borrow().can_cell_be_active(row, cell)
    }

    pub fn can_cell_be_selected(&self, row: usize, cell: usize) -> bool {
        self.state.borrow().can_cell_be_selected(row, cell)
    }

    /// Cell under a canvas point.
    pub fn cell_from_point(&self, x: f64, y: f64) -> Option<CellPos> {
        self.state.borrow().cell_from_point(x, y)
    }

    // Navigation

    /// Move the active cell one step. Returns false when no cell qualifies.
    /// An editor that refuses to commit keeps the cell and still counts as
    /// handled.
    pub fn navigate(&self, dir: NavDirection) -> bool {
        {
            let s = self.state.borrow();
            if !s.options.enable_cell_navigation {
                return false;
            }
            if s.active.is_none() && !matches!(dir, NavDirection::Prev | NavDirection::Next) {
                return false;
            }
        }
        if !self.commit_via_lock() {
            tracing::debug!(?dir, "navigation blocked by open editor");
            return true;
        }
        self.update(|s| s.navigate_step(dir))
    }

    pub fn navigate_page_down(&self) {
        self.update(|s| s.scroll_page(1));
    }

    pub fn navigate_page_up(&self) {
        self.update(|s| s.scroll_page(-1));
    }

    pub fn scroll_row_into_view(&self, row: usize, do_paging: bool) {
        self.update(|s| s.scroll_row_into_view(row, do_paging));
    }

    pub fn scroll_cell_into_view(&self, row: usize, cell: usize, do_paging: bool) {
        self.update(|s| s.scroll_cell_into_view(row, cell, do_paging));
    }

    // Input

    fn is_editing(&self, pos: CellPos) -> bool {
        let s = self.state.borrow();
        s.current_editor.is_some() && s.active == Some(pos)
    }

    /// Pointer click on the canvas.
    pub fn handle_click(&self, event: PointerEvent) {
        let Some(pos) = self.cell_from_point(event.x, event.y) else {
            return;
        };
        if self.is_editing(pos) {
            return;
        }

        let reaction = self
            .state
            .borrow_mut()
            .selection_hook(|model, host| model.on_click(host, pos, event.modifiers));
        if let Some(reaction) = reaction.filter(|r| r.handled) {
            self.update(|s| s.apply_reaction(reaction));
            return;
        }

        let data = self.events().on_click.notify(&CellEventArgs {
            row: pos.row,
            cell: pos.cell,
            modifiers: event.modifiers,
        });
        if data.is_immediate_propagation_stopped() {
            return;
        }

        if self.active_cell() != Some(pos) && self.can_cell_be_active(pos.row, pos.cell) {
            let lock = self.editor_lock();
            if !lock.is_active() || lock.commit_current_edit() {
                self.update(|s| {
                    s.scroll_row_into_view(pos.row, false);
                    s.set_active_cell_internal(Some(pos), None);
                });
            }
        }
    }

    pub fn handle_dbl_click(&self, event: PointerEvent) {
        let Some(pos) = self.cell_from_point(event.x, event.y) else {
            return;
        };
        if self.is_editing(pos) {
            return;
        }
        let data = self.events().on_dbl_click.notify(&CellEventArgs {
            row: pos.row,
            cell: pos.cell,
            modifiers: event.modifiers,
        });
        if data.is_immediate_propagation_stopped() {
            return;
        }
        if self.state.borrow().options.editable {
            self.goto_cell(pos.row, pos.cell, true);
        }
    }

    /// Keyboard input. Returns true when the key was consumed and the host
    /// should suppress its default action.
    pub fn handle_key_down(&self, key: KeyEvent) -> bool {
        let reaction = self
            .state
            .borrow_mut()
            .selection_hook(|model, host| model.on_key_down(host, &key));
        if let Some(reaction) = reaction.filter(|r| r.handled) {
            self.update(|s| s.apply_reaction(reaction));
            return true;
        }

        let data = self.events().on_key_down.notify(&KeyDownArgs {
            active: self.active_cell(),
            key,
        });
        if data.is_immediate_propagation_stopped() {
            return true;
        }

        let m = key.modifiers;
        if !m.shift && !m.alt && !m.ctrl {
            match key.key_code {
                keys::ESCAPE => {
                    let lock = self.editor_lock();
                    if !lock.is_active() {
                        return false;
                    }
                    lock.cancel_current_edit();
                    true
                }
                keys::PAGE_DOWN => {
                    self.navigate_page_down();
                    true
                }
                keys::PAGE_UP => {
                    self.navigate_page_up();
                    true
                }
                keys::LEFT => self.navigate(NavDirection::Left),
                keys::RIGHT => self.navigate(NavDirection::Right),
                keys::UP => self.navigate(NavDirection::Up),
                keys::DOWN => self.navigate(NavDirection::Down),
                keys::TAB => self.navigate(NavDirection::Next),
                keys::ENTER => {
                    self.handle_enter();
                    true
                }
                _ => false,
            }
        } else if key.key_code == keys::TAB && m.shift && !m.ctrl && !m.alt {
            self.navigate(NavDirection::Prev)
        } else {
            false
        }
    }

    fn handle_enter(&self) {
        let (editable, editing, on_add_row, auto_edit) = {
            let s = self.state.borrow();
            (
                s.options.editable,
                s.current_editor.is_some(),
                s.active.is_some_and(|a| a.row == s.data_len()),
                s.options.auto_edit,
            )
        };
        if !editable {
            return;
        }
        if editing {
            if on_add_row {
                self.navigate(NavDirection::Down);
            } else if self.commit_via_lock() && auto_edit {
                self.navigate(NavDirection::Down);
            }
        } else if self.commit_via_lock() {
            if let Err(e) = self.open_editor(None) {
                tracing::debug!(error = %e, "enter did not open an editor");
            }
            self.flush();
        }
    }

    pub fn handle_drag_start(&self, event: PointerEvent) -> bool {
        let Some(pos) = self.cell_from_point(event.x, event.y) else {
            return false;
        };
        let reaction = self
            .state
            .borrow_mut()
            .selection_hook(|model, host| model.on_drag_start(host, pos, event.modifiers));
        self.apply_drag_reaction(reaction)
    }

    pub fn handle_drag(&self, event: PointerEvent) -> bool {
        let Some(pos) = self.cell_from_point(event.x, event.y) else {
            return false;
        };
        let reaction = self
            .state
            .borrow_mut()
            .selection_hook(|model, host| model.on_drag(host, pos));
        self.apply_drag_reaction(reaction)
    }

    pub fn handle_drag_end(&self) -> bool {
        let reaction = self
            .state
            .borrow_mut()
            .selection_hook(|model, host| model.on_drag_end(host));
        self.apply_drag_reaction(reaction)
    }

    fn apply_drag_reaction(&self, reaction: Option<selection::Reaction>) -> bool {
        match reaction {
            Some(reaction) => {
                let handled = reaction.handled;
                self.update(|s| s.apply_reaction(reaction));
                handled
            }
            None => false,
        }
    }

    /// Range the selection model is dragging out, if any.
    pub fn decorated_range(&self) -> Option<Range> {
        self.state
            .borrow()
            .selection_model
            .as_ref()
            .and_then(|m| m.decorated_range())
    }

    /// Header click: notify, then toggle sorting on sortable columns.
    pub fn handle_header_click(&self, index: usize, modifiers: Modifiers) {
        let Some(column) = self.state.borrow().columns.get(index).cloned() else {
            return;
        };
        let events = self.events();
        events.on_header_click.notify(&HeaderClickArgs {
            column_id: column.id.clone(),
            modifiers,
        });
        if !column.sortable || !self.commit_via_lock() {
            return;
        }
        let args = {
            let mut s = self.state.borrow_mut();
            let multi = s.options.multi_column_sort;
            toggle_sort(&mut s.sort_columns, &column, modifiers, multi)
        };
        tracing::debug!(column = %column.id, "sort requested");
        events.on_sort.notify(&args);
    }

    pub fn sort_columns(&self) -> Vec<SortColumn> {
        self.state.borrow().sort_columns.clone()
    }

    pub fn set_sort_columns(&self, sort_columns: Vec<SortColumn>) {
        self.state.borrow_mut().sort_columns = sort_columns;
    }

    // Editing

    pub fn current_editor(&self) -> Option<SharedEditor> {
        self.state.borrow().current_editor.clone()
    }

    /// Open an editor on the active cell, optionally overriding its factory.
    pub fn edit_active_cell(&self, editor: Option<EditorFactory>) -> Result<()> {
        let result = self.open_editor(editor);
        self.flush();
        result
    }

    pub fn commit_current_edit(&self) -> bool {
        self.commit_via_lock()
    }

    pub fn cancel_current_edit(&self) -> bool {
        self.editor_lock().cancel_current_edit()
    }

    pub(crate) fn apply_edit(&self, command: &EditCommand, value: &Value) {
        self.update(|s| s.apply_edit(command, value));
    }

    // Selection and cell CSS

    pub fn has_selection_model(&self) -> bool {
        self.state.borrow().selection_model.is_some()
    }

    /// Install or remove the selection model. Removing clears the selection
    /// styling.
    pub fn set_selection_model(&self, model: Option<Box<dyn SelectionModel>>) {
        self.update(|s| {
            if model.is_none() && s.selection_model.is_some() {
                let class = s.options.selected_cell_css_class.clone();
                s.remove_cell_css_styles(&class);
                s.selected_rows.clear();
            }
            s.selection_model = model;
        });
    }

    /// Rows touched by the current selection, in selection order.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.state.borrow().selected_rows.clone()
    }

    pub fn selected_ranges(&self) -> Vec<Range> {
        self.state
            .borrow()
            .selection_model
            .as_ref()
            .map(|m| m.ranges().to_vec())
            .unwrap_or_default()
    }

    pub fn set_selected_rows(&self, rows: &[usize]) -> Result<()> {
        self.update(|s| {
            if s.selection_model.is_none() {
                return Err(GridcalError::MissingDependency("selection model"));
            }
            let columns = s.columns.len();
            let ranges = rows.iter().map(|&r| Range::whole_row(r, columns)).collect();
            s.set_selected_ranges(ranges);
            Ok(())
        })
    }

    pub fn set_selected_ranges(&self, ranges: Vec<Range>) -> Result<()> {
        self.update(|s| {
            if s.selection_model.is_none() {
                return Err(GridcalError::MissingDependency("selection model"));
            }
            s.set_selected_ranges(ranges);
            Ok(())
        })
    }

    pub fn add_cell_css_styles(&self, key: &str, hash: CellCssHash) -> Result<()> {
        self.update(|s| s.add_cell_css_styles(key, hash))
    }

    pub fn set_cell_css_styles(&self, key: &str, hash: CellCssHash) {
        self.update(|s| s.set_cell_css_styles(key, hash));
    }

    pub fn remove_cell_css_styles(&self, key: &str) {
        self.update(|s| s.remove_cell_css_styles(key));
    }

    pub fn cell_css_styles(&self, key: &str) -> Option<CellCssHash> {
        self.state.borrow().cell_css_styles.get(key).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn col(id: &str) -> Column {
        Column::new(id, id.to_uppercase(), id)
    }

    #[test]
    fn test_single_column_sort_toggles() {
        let mut sorts = Vec::new();
        let a = col("a");
        let args = toggle_sort(&mut sorts, &a, Modifiers::NONE, false);
        assert_eq!(args.sort_columns.len(), 1);
        assert!(args.sort_columns[0].sort_asc);
        let args = toggle_sort(&mut sorts, &a, Modifiers::NONE, false);
        assert!(!args.sort_columns[0].sort_asc);
        assert_eq!(sorts.len(), 1);
    }

    #[test]
    fn test_multi_column_sort_shift_adds_ctrl_removes() {
        let mut sorts = Vec::new();
        toggle_sort(&mut sorts, &col("a"), Modifiers::NONE, true);
        let args = toggle_sort(&mut sorts, &col("b"), Modifiers::SHIFT, true);
        assert_eq!(args.sort_columns.len(), 2);
        let args = toggle_sort(&mut sorts, &col("a"), Modifiers::CTRL, true);
        assert_eq!(args.sort_columns.len(), 1);
        assert_eq!(args.sort_columns[0].column_id, "b");
        // A plain click resets to a single column.
        let args = toggle_sort(&mut sorts, &col("a"), Modifiers::NONE, true);
        assert_eq!(args.sort_columns.len(), 1);
        assert_eq!(args.sort_columns[0].column_id, "a");
    }
}
