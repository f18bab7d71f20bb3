//! Grid configuration: serializable options plus programmatic hooks.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::column::Column;
use super::data::Formatter;
use super::editor::{EditCommand, EditorFactory, EditorLock};
use super::Grid;
use crate::error::{GridcalError, Result};

/// Every recognized grid option. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GridOptions {
    pub row_height: f64,
    pub default_column_width: f64,
    pub editable: bool,
    pub auto_edit: bool,
    pub enable_cell_navigation: bool,
    pub enable_add_row: bool,
    pub leave_space_for_new_rows: bool,
    pub async_editor_loading: bool,
    pub async_editor_load_delay: f64,
    pub enable_async_post_render: bool,
    pub async_post_render_delay: f64,
    pub force_fit_columns: bool,
    pub multi_select: bool,
    pub selected_cell_css_class: String,
    pub add_new_row_css_class: String,
    pub max_supported_css_height: f64,
    pub enable_column_reorder: bool,
    pub multi_column_sort: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row_height: 25.0,
            default_column_width: 80.0,
            editable: false,
            auto_edit: true,
            enable_cell_navigation: true,
            enable_add_row: false,
            leave_space_for_new_rows: false,
            async_editor_loading: false,
            async_editor_load_delay: 100.0,
            enable_async_post_render: false,
            async_post_render_delay: 50.0,
            force_fit_columns: false,
            multi_select: true,
            selected_cell_css_class: "selected".to_string(),
            add_new_row_css_class: "new-row".to_string(),
            max_supported_css_height: 1_000_000.0,
            enable_column_reorder: false,
            multi_column_sort: false,
        }
    }
}

impl GridOptions {
    /// Build options from JSON layers applied left to right over the defaults
    /// (defaults, then instance options, then inline metadata).
    pub fn from_layers(layers: &[Value]) -> Result<Self> {
        let options: Self = crate::config::from_layers(layers)?;
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<()> {
        if self.row_height <= 0.0 {
            return Err(GridcalError::Config(format!(
                "rowHeight must be positive, got {}",
                self.row_height
            )));
        }
        if self.max_supported_css_height <= self.row_height {
            return Err(GridcalError::Config(
                "maxSupportedCssHeight must exceed rowHeight".to_string(),
            ));
        }
        Ok(())
    }
}

pub type ValueExtractor = Rc<dyn Fn(&Value, &Column) -> Value>;
pub type FormatterFactory = Rc<dyn Fn(&Column) -> Option<Formatter>>;
pub type EditorFactoryLookup = Rc<dyn Fn(&Column) -> Option<EditorFactory>>;
pub type EditCommandHandler = Rc<dyn Fn(&Grid, Option<&Value>, &Column, EditCommand)>;

/// Function-valued options, attached in code on top of [`GridOptions`].
#[derive(Clone, Default)]
pub struct GridHooks {
    /// Shared lock; the grid creates its own when absent.
    pub editor_lock: Option<Rc<EditorLock>>,
    pub data_item_column_value_extractor: Option<ValueExtractor>,
    pub formatter_factory: Option<FormatterFactory>,
    pub editor_factory: Option<EditorFactoryLookup>,
    /// Receives committed edits instead of having them executed directly.
    pub edit_command_handler: Option<EditCommandHandler>,
}

impl fmt::Debug for GridHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridHooks")
            .field("editor_lock", &self.editor_lock.is_some())
            .field(
                "data_item_column_value_extractor",
                &self.data_item_column_value_extractor.is_some(),
            )
            .field("formatter_factory", &self.formatter_factory.is_some())
            .field("editor_factory", &self.editor_factory.is_some())
            .field("edit_command_handler", &self.edit_command_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let o = GridOptions::from_layers(&[]).unwrap();
        assert_eq!(o, GridOptions::default());
        assert_eq!(o.row_height, 25.0);
        assert!(o.auto_edit);
        assert!(!o.editable);
    }

    #[test]
    fn test_layers_apply_in_order() {
        let o = GridOptions::from_layers(&[
            json!({"rowHeight": 30, "editable": true}),
            Value::Null,
            json!({"rowHeight": 40, "autoEdit": false}),
        ])
        .unwrap();
        assert_eq!(o.row_height, 40.0);
        assert!(o.editable);
        assert!(!o.auto_edit);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = GridOptions::from_layers(&[json!({"rowHieght": 30})]).unwrap_err();
        assert!(matches!(err, GridcalError::Json(_)));
    }

    #[test]
    fn test_non_object_layer_rejected() {
        let err = GridOptions::from_layers(&[json!([1, 2])]).unwrap_err();
        assert!(matches!(err, GridcalError::Config(_)));
        let err = GridOptions::from_layers(&[json!({"rowHeight": 0})]).unwrap_err();
        assert!(matches!(err, GridcalError::Config(_)));
    }
}
