//! Grid notifications and their payloads.
//!
//! Handlers run synchronously, in subscription order. Notifications raised
//! while the grid state is borrowed are queued and delivered once the
//! operation releases it, so a handler may call back into the grid.
//! `on_before_edit_cell` and the input events are raised with the state
//! already released, so their `EventData` flags still steer the grid.

use serde::Serialize;
use serde_json::Value;

use super::column::Column;
use super::editor::ValidationResult;
use super::render::CellCssHash;
use super::selection::CellPos;
use crate::events::{Event, KeyEvent, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollArgs {
    pub scroll_top: f64,
    pub scroll_left: f64,
}

/// A pointer event resolved to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEventArgs {
    pub row: usize,
    pub cell: usize,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDownArgs {
    pub active: Option<CellPos>,
    pub key: KeyEvent,
}

#[derive(Debug, Clone)]
pub struct BeforeEditCellArgs {
    pub row: usize,
    pub cell: usize,
    pub item: Option<Value>,
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellChangeArgs {
    pub row: usize,
    pub cell: usize,
    pub item: Value,
}

#[derive(Debug, Clone)]
pub struct AddNewRowArgs {
    pub item: Value,
    pub column: Column,
}

#[derive(Debug, Clone)]
pub struct ValidationErrorArgs {
    pub row: usize,
    pub cell: usize,
    pub column: Column,
    pub result: ValidationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedRowsChangedArgs {
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellCssStylesChangedArgs {
    pub key: String,
    /// `None` when the hash was removed.
    pub hash: Option<CellCssHash>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortColumn {
    pub column_id: String,
    pub sort_asc: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortArgs {
    pub multi_column_sort: bool,
    pub sort_columns: Vec<SortColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderClickArgs {
    pub column_id: String,
    pub modifiers: Modifiers,
}

/// One typed channel per grid notification.
#[derive(Debug, Default)]
pub struct GridEvents {
    pub on_scroll: Event<ScrollArgs>,
    pub on_viewport_changed: Event<()>,
    pub on_click: Event<CellEventArgs>,
    pub on_dbl_click: Event<CellEventArgs>,
    pub on_key_down: Event<KeyDownArgs>,
    pub on_active_cell_changed: Event<Option<CellPos>>,
    /// `prevent_default` keeps the cell from entering edit mode.
    pub on_before_edit_cell: Event<BeforeEditCellArgs>,
    pub on_before_cell_editor_destroy: Event<CellPos>,
    pub on_cell_change: Event<CellChangeArgs>,
    pub on_add_new_row: Event<AddNewRowArgs>,
    pub on_validation_error: Event<ValidationErrorArgs>,
    pub on_selected_rows_changed: Event<SelectedRowsChangedArgs>,
    pub on_cell_css_styles_changed: Event<CellCssStylesChangedArgs>,
    pub on_columns_resized: Event<()>,
    pub on_columns_reordered: Event<()>,
    pub on_sort: Event<SortArgs>,
    pub on_header_click: Event<HeaderClickArgs>,
}

impl GridEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dispatch(&self, notification: Notification) {
        match notification {
            Notification::Scroll(args) => {
                self.on_scroll.notify(&args);
            }
            Notification::ViewportChanged => {
                self.on_viewport_changed.notify(&());
            }
            Notification::ActiveCellChanged(pos) => {
                self.on_active_cell_changed.notify(&pos);
            }
            Notification::BeforeCellEditorDestroy(pos) => {
                self.on_before_cell_editor_destroy.notify(&pos);
            }
            Notification::CellChange(args) => {
                self.on_cell_change.notify(&args);
            }
            Notification::AddNewRow(args) => {
                self.on_add_new_row.notify(&args);
            }
            Notification::ValidationError(args) => {
                self.on_validation_error.notify(&args);
            }
            Notification::SelectedRowsChanged(args) => {
                self.on_selected_rows_changed.notify(&args);
            }
            Notification::CellCssStylesChanged(args) => {
                self.on_cell_css_styles_changed.notify(&args);
            }
            Notification::ColumnsResized => {
                self.on_columns_resized.notify(&());
            }
        }
    }
}

/// A notification raised inside the grid state, waiting for delivery.
#[derive(Debug, Clone)]
pub(crate) enum Notification {
    Scroll(ScrollArgs),
    ViewportChanged,
    ActiveCellChanged(Option<CellPos>),
    BeforeCellEditorDestroy(CellPos),
    CellChange(CellChangeArgs),
    AddNewRow(AddNewRowArgs),
    ValidationError(ValidationErrorArgs),
    SelectedRowsChanged(SelectedRowsChangedArgs),
    CellCssStylesChanged(CellCssStylesChangedArgs),
    ColumnsResized,
}
