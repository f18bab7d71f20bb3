//! Grid state behind the [`Grid`](super::Grid) handle: row cache, render
//! passes, cell CSS, editing and selection plumbing.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use serde_json::{Map, Value};

use super::column::{self, Column, ColumnPositions};
use super::data::{default_formatter, ColumnMetadata, Colspan, DataSource, FormatterArgs, ItemMetadata};
use super::editor::{
    EditCommand, EditController, EditorArgs, EditorFactory, EditorLock, SharedEditor,
};
use super::events::{
    AddNewRowArgs, BeforeEditCellArgs, CellChangeArgs, CellCssStylesChangedArgs, GridEvents,
    Notification, ScrollArgs, SelectedRowsChangedArgs, SortColumn, ValidationErrorArgs,
};
use super::options::{GridHooks, GridOptions};
use super::render::{CellCssHash, CellCssStyles, CellMarkup, NodeId, RowCacheEntry, RowMarkup, Surface};
use super::selection::{CellPos, Range, Reaction, SelectionHost, SelectionModel};
use super::viewport::{ViewRange, ViewportVirtualizer};
use crate::error::{GridcalError, Result};
use crate::timers::Deferred;

/// Delay before a far scroll is rendered.
const SCROLL_RENDER_DELAY_MS: f64 = 50.0;

pub(crate) fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Per-column override, looked up by column id first and by index second.
fn column_override<T>(
    meta: Option<&ItemMetadata>,
    column: &Column,
    index: usize,
    pick: impl Fn(&ColumnMetadata) -> Option<T>,
) -> Option<T> {
    let meta = meta?;
    meta.columns
        .get(&column.id)
        .and_then(&pick)
        .or_else(|| meta.columns.get(&index.to_string()).and_then(&pick))
}

/// Result of asking the grid to commit its open editor.
pub(crate) enum CommitOutcome {
    Finished(bool),
    /// A valid change to an existing row, to be executed once the state is
    /// no longer borrowed. `close_after` is false when the editor was already
    /// closed for an `edit_command_handler`.
    Execute {
        command: EditCommand,
        item: Option<Value>,
        column: Column,
        close_after: bool,
    },
}

/// Work raised while the state is borrowed, run by the handle afterwards.
#[derive(Debug)]
pub(crate) enum Pending {
    Notify(Notification),
    /// Open an editor on this cell if it is still the active one.
    OpenEditor(CellPos),
}

/// An editor ready to open once `on_before_edit_cell` has had its say.
pub(crate) struct EditRequest {
    pub args: BeforeEditCellArgs,
    factory: EditorFactory,
    overridden: bool,
}

pub(crate) struct GridState {
    pub options: GridOptions,
    pub hooks: GridHooks,
    pub events: Rc<GridEvents>,
    pub editor_lock: Rc<EditorLock>,
    pub controller: Rc<dyn EditController>,
    pub data: Box<dyn DataSource>,
    pub columns: Vec<Column>,
    pub column_positions: ColumnPositions,
    pub columns_by_id: HashMap<String, usize>,
    pub viewport: ViewportVirtualizer,
    pub canvas_width: f64,
    pub surface: Rc<RefCell<dyn Surface>>,
    pub rows_cache: HashMap<usize, RowCacheEntry>,
    pub post_processed_rows: HashMap<usize, HashSet<usize>>,
    pub post_process_from: i64,
    pub post_process_to: i64,
    pub post_process_timer: Deferred,
    pub render_timer: Deferred,
    pub editor_load_timer: Deferred,
    /// Host clock, advanced by `tick`.
    pub now: f64,
    pub active: Option<CellPos>,
    pub active_pos_x: usize,
    pub current_editor: Option<SharedEditor>,
    pub serialized_editor_value: Option<Value>,
    pub cell_css_styles: CellCssStyles,
    pub selection_model: Option<Box<dyn SelectionModel>>,
    pub selected_rows: Vec<usize>,
    pub sort_columns: Vec<SortColumn>,
    pub pending: VecDeque<Pending>,
}

impl GridState {
    pub fn new(
        surface: Rc<RefCell<dyn Surface>>,
        data: Box<dyn DataSource>,
        columns: Vec<Column>,
        options: GridOptions,
        hooks: GridHooks,
        controller: Rc<dyn EditController>,
    ) -> Self {
        let editor_lock = hooks
            .editor_lock
            .clone()
            .unwrap_or_else(|| Rc::new(EditorLock::new()));
        let viewport =
            ViewportVirtualizer::new(options.row_height, options.max_supported_css_height);
        let mut state = Self {
            options,
            hooks,
            events: Rc::new(GridEvents::new()),
            editor_lock,
            controller,
            data,
            columns: Vec::new(),
            column_positions: ColumnPositions::default(),
            columns_by_id: HashMap::new(),
            viewport,
            canvas_width: 0.0,
            surface,
            rows_cache: HashMap::new(),
            post_processed_rows: HashMap::new(),
            post_process_from: 0,
            post_process_to: -1,
            post_process_timer: Deferred::new(),
            render_timer: Deferred::new(),
            editor_load_timer: Deferred::new(),
            now: 0.0,
            active: None,
            active_pos_x: 0,
            current_editor: None,
            serialized_editor_value: None,
            cell_css_styles: CellCssStyles::default(),
            selection_model: None,
            selected_rows: Vec::new(),
            sort_columns: Vec::new(),
            pending: VecDeque::new(),
        };
        state.columns = columns;
        for c in &mut state.columns {
            c.clamp_width();
        }
        state.update_column_caches();
        state.update_row_count();
        state
    }

    pub fn emit(&mut self, notification: Notification) {
        self.pending.push_back(Pending::Notify(notification));
    }

    // Data access

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn data_len_including_add_new(&self) -> usize {
        self.data.len() + usize::from(self.options.enable_add_row)
    }

    pub fn value_for_column(&self, item: &Value, column: &Column) -> Value {
        match &self.hooks.data_item_column_value_extractor {
            Some(extract) => extract(item, column),
            None => item.get(&column.field).cloned().unwrap_or(Value::Null),
        }
    }

    /// Span of `cell`, never reaching past the last column.
    fn colspan_with(&self, meta: Option<&ItemMetadata>, cell: usize) -> usize {
        let Some(column) = self.columns.get(cell) else {
            return 1;
        };
        let rest = self.columns.len() - cell;
        match meta.and_then(|m| m.column(column, cell)).and_then(|c| c.colspan) {
            Some(Colspan::Cells(n)) => n.clamp(1, rest),
            Some(Colspan::Rest) => rest,
            None => 1,
        }
    }

    pub fn colspan(&self, row: usize, cell: usize) -> usize {
        self.colspan_with(self.data.item_metadata(row).as_ref(), cell)
    }

    /// Formatter precedence: column override, row override, column, factory,
    /// then the escaping default.
    fn format_cell(
        &self,
        row: usize,
        cell: usize,
        column: &Column,
        item: &Value,
        meta: Option<&ItemMetadata>,
    ) -> String {
        let value = self.value_for_column(item, column);
        let formatter = column_override(meta, column, cell, |c| c.formatter.clone())
            .or_else(|| meta.and_then(|m| m.formatter.clone()))
            .or_else(|| column.formatter.clone())
            .or_else(|| self.hooks.formatter_factory.as_ref().and_then(|f| f(column)));
        let args = FormatterArgs {
            row,
            cell,
            value: &value,
            column,
            item,
        };
        match formatter {
            Some(f) => f(&args),
            None => default_formatter(&args),
        }
    }

    pub fn editor_for(&self, row: usize, cell: usize) -> Option<EditorFactory> {
        let column = self.columns.get(cell)?;
        let meta = self.data.item_metadata(row);
        if let Some(choice) = column_override(meta.as_ref(), column, cell, |c| c.editor.clone()) {
            return choice;
        }
        if let Some(choice) = meta.as_ref().and_then(|m| m.editor.clone()) {
            return choice;
        }
        column
            .editor
            .clone()
            .or_else(|| self.hooks.editor_factory.as_ref().and_then(|f| f(column)))
    }

    pub fn can_cell_be_active(&self, row: usize, cell: usize) -> bool {
        if !self.options.enable_cell_navigation || row >= self.data_len_including_add_new() {
            return false;
        }
        let Some(column) = self.columns.get(cell) else {
            return false;
        };
        let meta = self.data.item_metadata(row);
        if let Some(focusable) = meta.as_ref().and_then(|m| m.focusable) {
            return focusable;
        }
        column_override(meta.as_ref(), column, cell, |c| c.focusable).unwrap_or(column.focusable)
    }

    pub fn can_cell_be_selected(&self, row: usize, cell: usize) -> bool {
        if row >= self.data_len() {
            return false;
        }
        let Some(column) = self.columns.get(cell) else {
            return false;
        };
        let meta = self.data.item_metadata(row);
        if let Some(selectable) = meta.as_ref().and_then(|m| m.selectable) {
            return selectable;
        }
        column_override(meta.as_ref(), column, cell, |c| c.selectable).unwrap_or(column.selectable)
    }

    /// Loaded, not a non-inserting column on the add-row, and has an editor.
    pub fn is_cell_potentially_editable(&self, row: usize, cell: usize) -> bool {
        let len = self.data_len();
        if row < len && self.data.item(row).is_none() {
            return false;
        }
        if row >= len && self.columns.get(cell).is_some_and(|c| c.cannot_trigger_insert) {
            return false;
        }
        self.editor_for(row, cell).is_some()
    }

    pub fn cell_node(&self, row: usize, cell: usize) -> Option<NodeId> {
        self.rows_cache.get(&row)?.cell_nodes.get(&cell).copied()
    }

    // Columns and canvas

    pub fn update_column_caches(&mut self) {
        self.column_positions = ColumnPositions::build(&self.columns);
        self.columns_by_id = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
    }

    pub fn update_canvas_width(&mut self, force_column_widths_update: bool) {
        let old = self.canvas_width;
        self.canvas_width = self.columns.iter().map(|c| c.width).sum();
        let changed = (self.canvas_width - old).abs() > f64::EPSILON;
        if changed {
            self.surface
                .borrow_mut()
                .set_canvas_size(self.canvas_width, self.viewport.canvas_height());
        }
        if changed || force_column_widths_update {
            self.update_column_caches();
        }
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        for c in &mut self.columns {
            c.clamp_width();
        }
        self.update_column_caches();
        self.invalidate_all_rows();
        let (w, h) = (self.viewport.viewport_width(), self.viewport.viewport_height());
        self.resize_canvas(w, h);
    }

    pub fn autosize_columns(&mut self) {
        let rerender = column::autosize(&mut self.columns, self.viewport.viewport_width());
        self.update_canvas_width(true);
        if rerender {
            self.invalidate_all_rows();
            self.render();
        }
    }

    pub fn resize_column(&mut self, index: usize, delta: f64) {
        let rerender = column::resize_with_neighbors(
            &mut self.columns,
            index,
            delta,
            self.options.force_fit_columns,
        );
        self.update_canvas_width(true);
        if rerender {
            self.invalidate_all_rows();
        }
        self.render();
        self.emit(Notification::ColumnsResized);
    }

    pub fn resize_canvas(&mut self, width: f64, height: f64) {
        self.viewport.set_viewport(width, height);
        if self.options.force_fit_columns {
            self.autosize_columns();
        }
        self.update_row_count();
        self.handle_scroll(self.viewport.scroll_top(), self.viewport.scroll_left());
        self.viewport.forget_rendered_left();
        self.render();
    }

    pub fn update_row_count(&mut self) {
        let len = self.data_len_including_add_new();
        let rows = if self.options.leave_space_for_new_rows {
            len + self.viewport.num_visible_rows().saturating_sub(1)
        } else {
            len
        };

        self.make_active_cell_normal();

        // Rows past the new end (and the old last row, which may have been
        // the add-row) are re-rendered from scratch.
        let last = to_i64(len) - 1;
        let stale: Vec<usize> = self
            .rows_cache
            .keys()
            .copied()
            .filter(|&r| to_i64(r) >= last)
            .collect();
        for row in stale {
            self.remove_row_from_cache(row);
        }
        if self.active.is_some_and(|a| to_i64(a.row) > last) {
            self.reset_active_cell();
        }

        let old_offset = self.viewport.offset();
        let height_changed = self.viewport.set_row_count(rows);
        if (self.viewport.offset() - old_offset).abs() > f64::EPSILON {
            let visible = self.viewport.visible_range();
            self.cleanup_rows(&visible);
            self.update_row_positions();
        }
        if height_changed {
            self.surface
                .borrow_mut()
                .set_canvas_size(self.canvas_width, self.viewport.canvas_height());
        }
        self.update_canvas_width(false);
    }

    // Scrolling

    pub fn scroll_to(&mut self, y: f64) {
        let change = self.viewport.scroll_to(y);
        if change.offset_changed {
            let visible = self.viewport.visible_range();
            self.cleanup_rows(&visible);
            self.update_row_positions();
        }
        if change.moved {
            self.emit(Notification::ViewportChanged);
        }
    }

    pub fn handle_scroll(&mut self, scroll_top: f64, scroll_left: f64) {
        let outcome = self.viewport.handle_scroll(scroll_top, scroll_left);
        if outcome.offset_changed {
            let visible = self.viewport.visible_range();
            self.cleanup_rows(&visible);
            self.update_row_positions();
        }
        if outcome.invalidate_all {
            self.invalidate_all_rows();
        }
        if outcome.v_distance > 0.0 || outcome.h_distance > 0.0 {
            self.render_timer.cancel();
            if self.viewport.needs_render() {
                if self.viewport.render_is_cheap() {
                    self.render();
                } else {
                    self.render_timer.arm(self.now, SCROLL_RENDER_DELAY_MS);
                }
                self.emit(Notification::ViewportChanged);
            }
        }
        self.emit(Notification::Scroll(ScrollArgs {
            scroll_top: self.viewport.scroll_top(),
            scroll_left: self.viewport.scroll_left(),
        }));
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn scroll_row_into_view(&mut self, row: usize, do_paging: bool) {
        let rh = self.viewport.row_height();
        let vh = self.viewport.viewport_height();
        let visible_top = self.viewport.scroll_top() + self.viewport.offset();
        let row_at_top = row as f64 * rh;
        let row_at_bottom = (row as f64 + 1.0) * rh - vh;

        if (row as f64 + 1.0) * rh > visible_top + vh {
            self.scroll_to(if do_paging { row_at_top } else { row_at_bottom });
            self.render();
        } else if row as f64 * rh < visible_top {
            self.scroll_to(if do_paging { row_at_bottom } else { row_at_top });
            self.render();
        }
    }

    pub fn scroll_cell_into_view(&mut self, row: usize, cell: usize, do_paging: bool) {
        self.scroll_row_into_view(row, do_paging);
        if cell >= self.columns.len() {
            return;
        }
        let colspan = self.colspan(row, cell);
        let left = self.column_positions.left(cell);
        let right = self.column_positions.right(cell + colspan - 1);
        let scroll_left = self.viewport.scroll_left();
        let width = self.viewport.viewport_width();
        let top = self.viewport.scroll_top();

        if left < scroll_left {
            self.handle_scroll(top, left);
            self.render();
        } else if right > scroll_left + width {
            self.handle_scroll(top, left.min(right - width));
            self.render();
        }
    }

    // Rendering

    pub fn render(&mut self) {
        let len = self.data_len_including_add_new();
        let visible = self.viewport.visible_range();
        let rendered = self.viewport.rendered_range(len, self.canvas_width);

        self.cleanup_rows(&rendered);
        if self.viewport.horizontal_changed_since_render() {
            self.clean_up_and_render_cells(&rendered);
        }
        self.render_rows(&rendered);

        self.post_process_from = visible.top;
        self.post_process_to = visible.bottom.min(to_i64(len) - 1);
        self.start_post_processing();

        self.viewport.mark_rendered();
        self.render_timer.cancel();
    }

    fn row_classes(&self, row: usize, item: Option<&Value>, meta: Option<&ItemMetadata>) -> String {
        let mut classes = String::from("ui-widget-content slick-row");
        if row < self.data_len() && item.is_none() {
            classes.push_str(" loading");
        }
        if self.active.is_some_and(|a| a.row == row) {
            classes.push_str(" active");
        }
        classes.push_str(if row % 2 == 1 { " odd" } else { " even" });
        if item.is_none() {
            classes.push(' ');
            classes.push_str(&self.options.add_new_row_css_class);
        }
        if let Some(css) = meta.and_then(|m| m.css_classes.as_deref()) {
            classes.push(' ');
            classes.push_str(css);
        }
        classes
    }

    fn cell_markup(
        &self,
        row: usize,
        cell: usize,
        colspan: usize,
        item: Option<&Value>,
        meta: Option<&ItemMetadata>,
    ) -> Option<CellMarkup> {
        let column = self.columns.get(cell)?;
        let last = (cell + colspan - 1).min(self.columns.len() - 1);
        let mut classes = format!("slick-cell l{cell} r{last}");
        if let Some(css) = &column.css_class {
            classes.push(' ');
            classes.push_str(css);
        }
        if self.active == Some(CellPos::new(row, cell)) {
            classes.push_str(" active");
        }
        for extra in self.cell_css_styles.classes_for(row, &column.id) {
            classes.push(' ');
            classes.push_str(extra);
        }
        let html = item
            .map(|it| self.format_cell(row, cell, column, it, meta))
            .unwrap_or_default();
        Some(CellMarkup {
            cell,
            colspan,
            classes,
            html,
        })
    }

    fn row_markup(&self, row: usize, range: &ViewRange, entry: &mut RowCacheEntry) -> RowMarkup {
        let item = self.data.item(row);
        let meta = self.data.item_metadata(row);
        let n = self.columns.len();
        let mut cells = Vec::new();
        let mut i = 0;
        while i < n {
            let colspan = self.colspan_with(meta.as_ref(), i);
            if self.column_positions.right((i + colspan - 1).min(n - 1)) > range.left_px {
                if self.column_positions.left(i) > range.right_px {
                    break;
                }
                if let Some(markup) = self.cell_markup(row, i, colspan, item, meta.as_ref()) {
                    entry.cell_render_queue.push_back(i);
                    entry.cell_col_spans.insert(i, colspan);
                    cells.push(markup);
                }
            }
            i += colspan;
        }
        RowMarkup {
            row,
            classes: self.row_classes(row, item, meta.as_ref()),
            top: self.viewport.row_top(row),
            cells,
        }
    }

    /// Pair queued cells with the nodes the surface created for them.
    fn ensure_cell_nodes(entry: &mut RowCacheEntry, nodes: Vec<NodeId>) {
        for node in nodes {
            match entry.cell_render_queue.pop_front() {
                Some(cell) => {
                    entry.cell_nodes.insert(cell, node);
                }
                None => break,
            }
        }
    }

    fn render_rows(&mut self, range: &ViewRange) {
        let mut batch = Vec::new();
        let mut entries = Vec::new();
        for row in range.rows() {
            if self.rows_cache.contains_key(&row) {
                continue;
            }
            let mut entry = RowCacheEntry::default();
            batch.push(self.row_markup(row, range, &mut entry));
            entries.push((row, entry));
        }
        if batch.is_empty() {
            return;
        }
        tracing::trace!(rows = batch.len(), "rendering rows");

        let nodes = self.surface.borrow_mut().append_rows(&batch);
        for ((row, mut entry), (row_node, cell_nodes)) in entries.into_iter().zip(nodes) {
            entry.row_node = row_node;
            Self::ensure_cell_nodes(&mut entry, cell_nodes);
            self.rows_cache.insert(row, entry);
        }
    }

    fn remove_row_from_cache(&mut self, row: usize) {
        if let Some(entry) = self.rows_cache.remove(&row) {
            self.surface.borrow_mut().remove(entry.row_node);
        }
        self.post_processed_rows.remove(&row);
    }

    /// Drop cached rows outside `keep`, except the active row.
    fn cleanup_rows(&mut self, keep: &ViewRange) {
        let active_row = self.active.map(|a| a.row);
        let stale: Vec<usize> = self
            .rows_cache
            .keys()
            .copied()
            .filter(|&row| Some(row) != active_row && !keep.contains_row(row))
            .collect();
        if !stale.is_empty() {
            tracing::trace!(rows = stale.len(), "removing rows outside rendered range");
        }
        for row in stale {
            self.remove_row_from_cache(row);
        }
    }

    fn clean_up_cells(&mut self, range: &ViewRange, row: usize) {
        let n = self.columns.len();
        if n == 0 {
            return;
        }
        let active = self.active;
        let positions = &self.column_positions;
        let Some(entry) = self.rows_cache.get_mut(&row) else {
            return;
        };
        let remove: Vec<usize> = entry
            .cell_nodes
            .keys()
            .copied()
            .filter(|&i| {
                let span = entry.cell_col_spans.get(&i).copied().unwrap_or(1).max(1);
                let outside = positions.left(i) > range.right_px
                    || positions.right((i + span - 1).min(n - 1)) < range.left_px;
                outside && active != Some(CellPos::new(row, i))
            })
            .collect();

        let mut surface = self.surface.borrow_mut();
        for i in remove {
            if let Some(node) = entry.cell_nodes.remove(&i) {
                surface.remove(node);
            }
            entry.cell_col_spans.remove(&i);
            if let Some(done) = self.post_processed_rows.get_mut(&row) {
                done.remove(&i);
            }
        }
    }

    /// After a horizontal scroll: drop cells that left the range and append
    /// the ones that entered it, for rows already in the cache.
    fn clean_up_and_render_cells(&mut self, range: &ViewRange) {
        let n = self.columns.len();
        for row in range.rows() {
            if !self.rows_cache.contains_key(&row) {
                continue;
            }
            self.clean_up_cells(range, row);

            let meta = self.data.item_metadata(row);
            let item = self.data.item(row);
            let mut cells = Vec::new();
            if let Some(entry) = self.rows_cache.get(&row) {
                let mut i = 0;
                while i < n {
                    if self.column_positions.left(i) > range.right_px {
                        break;
                    }
                    if let Some(&span) = entry.cell_col_spans.get(&i) {
                        i += span.max(1);
                        continue;
                    }
                    let colspan = self.colspan_with(meta.as_ref(), i);
                    if self.column_positions.right((i + colspan - 1).min(n - 1)) > range.left_px {
                        cells.extend(self.cell_markup(row, i, colspan, item, meta.as_ref()));
                    }
                    i += colspan;
                }
            }
            if cells.is_empty() {
                continue;
            }
            if let Some(entry) = self.rows_cache.get_mut(&row) {
                for c in &cells {
                    entry.cell_render_queue.push_back(c.cell);
                    entry.cell_col_spans.insert(c.cell, c.colspan);
                }
                let nodes = self.surface.borrow_mut().append_cells(entry.row_node, &cells);
                Self::ensure_cell_nodes(entry, nodes);
            }
        }
    }

    fn update_row_positions(&mut self) {
        let mut surface = self.surface.borrow_mut();
        for (&row, entry) in &self.rows_cache {
            surface.set_row_top(entry.row_node, self.viewport.row_top(row));
        }
    }

    pub fn invalidate_all_rows(&mut self) {
        self.make_active_cell_normal();
        let rows: Vec<usize> = self.rows_cache.keys().copied().collect();
        tracing::debug!(rows = rows.len(), "invalidating all rows");
        for row in rows {
            self.remove_row_from_cache(row);
        }
    }

    pub fn invalidate_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        self.viewport.set_scroll_dir(0);
        for &row in rows {
            if self.current_editor.is_some() && self.active.is_some_and(|a| a.row == row) {
                self.make_active_cell_normal();
            }
            self.remove_row_from_cache(row);
        }
    }

    pub fn update_cell(&mut self, row: usize, cell: usize) {
        let Some(node) = self.cell_node(row, cell) else {
            return;
        };
        if self.active == Some(CellPos::new(row, cell)) {
            if let (Some(editor), Some(item)) = (&self.current_editor, self.data.item(row)) {
                editor.borrow_mut().load_value(item);
                return;
            }
        }
        let meta = self.data.item_metadata(row);
        let html = match (self.data.item(row), self.columns.get(cell)) {
            (Some(item), Some(column)) => self.format_cell(row, cell, column, item, meta.as_ref()),
            _ => String::new(),
        };
        self.surface.borrow_mut().set_inner_html(node, &html);
        self.invalidate_post_processing_results(row);
    }

    pub fn update_row(&mut self, row: usize) {
        let Some(entry) = self.rows_cache.get(&row) else {
            return;
        };
        let cells: Vec<(usize, NodeId)> = entry.cell_nodes.iter().map(|(&c, &n)| (c, n)).collect();
        let meta = self.data.item_metadata(row);
        for (cell, node) in cells {
            if self.active == Some(CellPos::new(row, cell)) {
                if let Some(editor) = &self.current_editor {
                    if let Some(item) = self.data.item(row) {
                        editor.borrow_mut().load_value(item);
                    }
                    continue;
                }
            }
            let html = match (self.data.item(row), self.columns.get(cell)) {
                (Some(item), Some(column)) => {
                    self.format_cell(row, cell, column, item, meta.as_ref())
                }
                _ => String::new(),
            };
            self.surface.borrow_mut().set_inner_html(node, &html);
        }
        self.invalidate_post_processing_results(row);
    }

    // Async post-render

    fn start_post_processing(&mut self) {
        if self.options.enable_async_post_render {
            self.post_process_timer
                .arm(self.now, self.options.async_post_render_delay);
        }
    }

    fn invalidate_post_processing_results(&mut self, row: usize) {
        self.post_processed_rows.remove(&row);
        self.post_process_from = self.post_process_from.min(to_i64(row));
        self.post_process_to = self.post_process_to.max(to_i64(row));
        self.start_post_processing();
    }

    /// Post-process one pending row, then re-arm for the next one.
    pub fn async_post_process_rows(&mut self) {
        let data_len = self.data_len();
        while self.post_process_from <= self.post_process_to {
            let next = if self.viewport.scroll_dir() >= 0 {
                self.post_process_from += 1;
                self.post_process_from - 1
            } else {
                self.post_process_to -= 1;
                self.post_process_to + 1
            };
            let Ok(row) = usize::try_from(next) else {
                continue;
            };
            if row >= data_len {
                continue;
            }
            let (Some(entry), Some(item)) = (self.rows_cache.get(&row), self.data.item(row)) else {
                continue;
            };
            let done = self.post_processed_rows.entry(row).or_default();
            {
                let mut surface = self.surface.borrow_mut();
                for (&cell, &node) in &entry.cell_nodes {
                    let Some(column) = self.columns.get(cell) else {
                        continue;
                    };
                    if let Some(hook) = &column.async_post_render {
                        if done.insert(cell) {
                            hook(&mut *surface, node, row, item, column);
                        }
                    }
                }
            }
            self.post_process_timer
                .arm(self.now, self.options.async_post_render_delay);
            return;
        }
    }

    /// Run timers that are due at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        self.now = now_ms;
        if self.render_timer.fire(now_ms) {
            self.render();
        }
        if self.editor_load_timer.fire(now_ms) {
            if let Some(active) = self.active {
                self.pending.push_back(Pending::OpenEditor(active));
            }
        }
        if self.post_process_timer.fire(now_ms) {
            self.async_post_process_rows();
        }
    }

    // Cell CSS

    fn update_cell_css_styles_on_rendered_rows(
        &self,
        added: Option<&CellCssHash>,
        removed: Option<&CellCssHash>,
    ) {
        let mut surface = self.surface.borrow_mut();
        let node_for = |entry: &RowCacheEntry, column_id: &str| {
            self.columns_by_id
                .get(column_id)
                .and_then(|i| entry.cell_nodes.get(i))
                .copied()
        };
        for (row, entry) in &self.rows_cache {
            let removed_row = removed.and_then(|h| h.get(row));
            let added_row = added.and_then(|h| h.get(row));
            if let Some(removed_row) = removed_row {
                for (column_id, class) in removed_row {
                    if added_row.and_then(|a| a.get(column_id)) == Some(class) {
                        continue;
                    }
                    if let Some(node) = node_for(entry, column_id) {
                        for c in class.split_whitespace() {
                            surface.set_class(node, c, false);
                        }
                    }
                }
            }
            if let Some(added_row) = added_row {
                for (column_id, class) in added_row {
                    if removed_row.and_then(|r| r.get(column_id)) == Some(class) {
                        continue;
                    }
                    if let Some(node) = node_for(entry, column_id) {
                        for c in class.split_whitespace() {
                            surface.set_class(node, c, true);
                        }
                    }
                }
            }
        }
    }

    pub fn add_cell_css_styles(&mut self, key: &str, hash: CellCssHash) -> Result<()> {
        if self.cell_css_styles.contains(key) {
            return Err(GridcalError::CssStylesExist(key.to_string()));
        }
        self.cell_css_styles.set(key, hash.clone());
        self.update_cell_css_styles_on_rendered_rows(Some(&hash), None);
        self.emit(Notification::CellCssStylesChanged(CellCssStylesChangedArgs {
            key: key.to_string(),
            hash: Some(hash),
        }));
        Ok(())
    }

    pub fn set_cell_css_styles(&mut self, key: &str, hash: CellCssHash) {
        let previous = self.cell_css_styles.set(key, hash.clone());
        self.update_cell_css_styles_on_rendered_rows(Some(&hash), previous.as_ref());
        self.emit(Notification::CellCssStylesChanged(CellCssStylesChangedArgs {
            key: key.to_string(),
            hash: Some(hash),
        }));
    }

    pub fn remove_cell_css_styles(&mut self, key: &str) {
        let Some(previous) = self.cell_css_styles.remove(key) else {
            return;
        };
        self.update_cell_css_styles_on_rendered_rows(None, Some(&previous));
        self.emit(Notification::CellCssStylesChanged(CellCssStylesChangedArgs {
            key: key.to_string(),
            hash: None,
        }));
    }

    // Selection

    /// Run a selection model hook with the grid as host.
    pub fn selection_hook(
        &mut self,
        hook: impl FnOnce(&mut dyn SelectionModel, &dyn SelectionHost) -> Reaction,
    ) -> Option<Reaction> {
        let mut model = self.selection_model.take()?;
        let reaction = hook(model.as_mut(), &*self);
        self.selection_model = Some(model);
        Some(reaction)
    }

    pub fn apply_reaction(&mut self, reaction: Reaction) {
        if let Some(row) = reaction.scroll_to_row {
            self.scroll_row_into_view(row, false);
        }
        if let Some(pos) = reaction.scroll_to_cell {
            self.scroll_cell_into_view(pos.row, pos.cell, false);
        }
        if let Some(pos) = reaction.activate {
            if self.active != Some(pos) {
                self.scroll_row_into_view(pos.row, false);
                self.set_active_cell_internal(Some(pos), None);
            }
        }
        if let Some(ranges) = reaction.select {
            self.set_selected_ranges(ranges);
        }
    }

    pub fn set_selected_ranges(&mut self, ranges: Vec<Range>) {
        let notify = match self.selection_model.as_mut() {
            Some(model) => model.set_selected_ranges(ranges),
            None => return,
        };
        if notify {
            self.handle_selected_ranges_changed();
        }
    }

    fn handle_selected_ranges_changed(&mut self) {
        let Some(model) = &self.selection_model else {
            return;
        };
        let ranges = model.ranges().to_vec();
        let class = self.options.selected_cell_css_class.clone();
        let mut rows = Vec::new();
        let mut hash = CellCssHash::new();
        for range in &ranges {
            for row in range.rows() {
                if !hash.contains_key(&row) {
                    rows.push(row);
                }
                let row_hash = hash.entry(row).or_default();
                for cell in range.cells() {
                    if !self.can_cell_be_selected(row, cell) {
                        continue;
                    }
                    if let Some(column) = self.columns.get(cell) {
                        row_hash.insert(column.id.clone(), class.clone());
                    }
                }
            }
        }
        self.selected_rows = rows;
        self.set_cell_css_styles(&class, hash);
        self.emit(Notification::SelectedRowsChanged(SelectedRowsChangedArgs {
            rows: self.selected_rows.clone(),
        }));
    }

    // Editing

    pub fn make_active_cell_normal(&mut self) {
        let Some(editor) = self.current_editor.take() else {
            return;
        };
        if let Some(active) = self.active {
            self.emit(Notification::BeforeCellEditorDestroy(active));
        }
        editor.borrow_mut().destroy();
        self.serialized_editor_value = None;

        if let Some(active) = self.active {
            if let Some(node) = self.cell_node(active.row, active.cell) {
                let meta = self.data.item_metadata(active.row);
                let html = match (self.data.item(active.row), self.columns.get(active.cell)) {
                    (Some(item), Some(column)) => Some(self.format_cell(
                        active.row,
                        active.cell,
                        column,
                        item,
                        meta.as_ref(),
                    )),
                    _ => None,
                };
                {
                    let mut surface = self.surface.borrow_mut();
                    surface.set_class(node, "editable", false);
                    surface.set_class(node, "invalid", false);
                    if let Some(html) = &html {
                        surface.set_inner_html(node, html);
                    }
                }
                if html.is_some() {
                    self.invalidate_post_processing_results(active.row);
                }
            }
        }

        if let Err(e) = self.editor_lock.deactivate(&self.controller) {
            tracing::warn!(error = %e, "editor lock release failed");
        }
        tracing::debug!("editor closed");
    }

    /// Checks for opening an editor on the active cell. `editor` overrides
    /// the resolved factory. `None` when there is nothing to open.
    pub fn prepare_edit(&mut self, editor: Option<EditorFactory>) -> Result<Option<EditRequest>> {
        let Some(active) = self.active else {
            return Ok(None);
        };
        if self.cell_node(active.row, active.cell).is_none() {
            return Ok(None);
        }
        if !self.options.editable {
            return Err(GridcalError::NotEditable);
        }
        self.editor_load_timer.cancel();
        if self.current_editor.is_some()
            || !self.is_cell_potentially_editable(active.row, active.cell)
        {
            return Ok(None);
        }
        let Some(column) = self.columns.get(active.cell).cloned() else {
            return Ok(None);
        };
        let overridden = editor.is_some();
        let Some(factory) = editor.or_else(|| self.editor_for(active.row, active.cell)) else {
            return Ok(None);
        };
        Ok(Some(EditRequest {
            args: BeforeEditCellArgs {
                row: active.row,
                cell: active.cell,
                item: self.data.item(active.row).cloned(),
                column,
            },
            factory,
            overridden,
        }))
    }

    /// Open the editor of a request that was not vetoed. A request whose
    /// cell is no longer active, or already edited, is dropped.
    pub fn open_editor(&mut self, request: EditRequest) -> Result<()> {
        let EditRequest {
            args,
            factory,
            overridden,
        } = request;
        let pos = CellPos::new(args.row, args.cell);
        if self.active != Some(pos) || self.current_editor.is_some() {
            return Ok(());
        }
        let Some(node) = self.cell_node(pos.row, pos.cell) else {
            return Ok(());
        };

        self.editor_lock.activate(Rc::clone(&self.controller))?;

        let mut instance = factory(&EditorArgs {
            row: pos.row,
            cell: pos.cell,
            column: &args.column,
            item: args.item.as_ref(),
        });
        {
            let mut surface = self.surface.borrow_mut();
            surface.set_class(node, "editable", true);
            if !overridden && !instance.suppress_clear_on_edit() {
                surface.set_inner_html(node, "");
            }
        }
        if let Some(item) = &args.item {
            instance.load_value(item);
        }
        self.serialized_editor_value = Some(instance.serialize_value());
        instance.focus();
        self.current_editor = Some(Rc::new(RefCell::new(instance)));
        tracing::debug!(row = pos.row, cell = pos.cell, "editor opened");
        Ok(())
    }

    /// First half of a commit; see [`CommitOutcome`].
    pub fn commit_current_edit(&mut self) -> CommitOutcome {
        let Some(editor) = self.current_editor.clone() else {
            return CommitOutcome::Finished(true);
        };
        let (Some(active), Some(column)) = (
            self.active,
            self.active.and_then(|a| self.columns.get(a.cell).cloned()),
        ) else {
            self.make_active_cell_normal();
            return CommitOutcome::Finished(true);
        };

        if !editor.borrow().is_value_changed() {
            self.make_active_cell_normal();
            return CommitOutcome::Finished(true);
        }

        let validation = editor.borrow().validate();
        if !validation.valid {
            if let Some(node) = self.cell_node(active.row, active.cell) {
                let mut surface = self.surface.borrow_mut();
                surface.set_class(node, "invalid", false);
                surface.set_class(node, "invalid", true);
            }
            tracing::debug!(row = active.row, cell = active.cell, msg = ?validation.msg, "edit rejected by validator");
            self.emit(Notification::ValidationError(ValidationErrorArgs {
                row: active.row,
                cell: active.cell,
                column,
                result: validation,
            }));
            editor.borrow_mut().focus();
            return CommitOutcome::Finished(false);
        }

        if active.row < self.data_len() {
            let command = EditCommand {
                row: active.row,
                cell: active.cell,
                serialized_value: editor.borrow().serialize_value(),
                prev_serialized_value: self.serialized_editor_value.clone().unwrap_or(Value::Null),
                editor: Rc::clone(&editor),
            };
            let item = self.data.item(active.row).cloned();
            let has_handler = self.hooks.edit_command_handler.is_some();
            if has_handler {
                self.make_active_cell_normal();
            }
            return CommitOutcome::Execute {
                command,
                item,
                column,
                close_after: !has_handler,
            };
        }

        let mut new_item = Value::Object(Map::new());
        {
            let e = editor.borrow();
            let state = e.serialize_value();
            e.apply_value(&mut new_item, &state);
        }
        self.make_active_cell_normal();
        tracing::debug!("new row submitted");
        self.emit(Notification::AddNewRow(AddNewRowArgs {
            item: new_item,
            column,
        }));
        CommitOutcome::Finished(!self.editor_lock.is_active())
    }

    /// Write `value` through the command's editor, re-render the row and
    /// report the change.
    pub fn apply_edit(&mut self, command: &EditCommand, value: &Value) {
        let Some(item) = self.data.item_mut(command.row) else {
            tracing::warn!(row = command.row, "edit target row no longer exists");
            return;
        };
        command.editor.borrow().apply_value(item, value);
        let item = item.clone();
        self.update_row(command.row);
        self.emit(Notification::CellChange(CellChangeArgs {
            row: command.row,
            cell: command.cell,
            item,
        }));
    }
}

impl SelectionHost for GridState {
    fn data_len(&self) -> usize {
        GridState::data_len(self)
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn active_cell(&self) -> Option<CellPos> {
        self.active
    }

    fn can_cell_be_active(&self, row: usize, cell: usize) -> bool {
        GridState::can_cell_be_active(self, row, cell)
    }

    fn can_cell_be_selected(&self, row: usize, cell: usize) -> bool {
        GridState::can_cell_be_selected(self, row, cell)
    }

    fn multi_select(&self) -> bool {
        self.options.multi_select
    }

    fn editor_lock_active(&self) -> bool {
        self.editor_lock.is_active()
    }
}
