//! Data source contract and per-row metadata overrides.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::column::Column;
use super::editor::EditorFactory;

/// Arguments handed to a [`Formatter`].
pub struct FormatterArgs<'a> {
    pub row: usize,
    pub cell: usize,
    pub value: &'a Value,
    pub column: &'a Column,
    pub item: &'a Value,
}

/// Renders a cell value as HTML.
pub type Formatter = Rc<dyn Fn(&FormatterArgs<'_>) -> String>;

/// Escapes `&`, `<` and `>`; `null` renders as an empty cell.
pub fn default_formatter(args: &FormatterArgs<'_>) -> String {
    let text = match args.value {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Rows the grid displays.
///
/// `item` may return `None` for a row inside `len()`; such rows render as
/// loading placeholders and are not editable.
pub trait DataSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn item(&self, row: usize) -> Option<&Value>;

    fn item_mut(&mut self, row: usize) -> Option<&mut Value>;

    fn item_metadata(&self, _row: usize) -> Option<ItemMetadata> {
        None
    }
}

impl DataSource for Vec<Value> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn item(&self, row: usize) -> Option<&Value> {
        self.get(row)
    }

    fn item_mut(&mut self, row: usize) -> Option<&mut Value> {
        self.get_mut(row)
    }
}

/// Column span of a cell: a count, or every remaining column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colspan {
    Cells(usize),
    Rest,
}

/// Overrides for one column of one row.
#[derive(Clone, Default)]
pub struct ColumnMetadata {
    pub colspan: Option<Colspan>,
    pub focusable: Option<bool>,
    pub selectable: Option<bool>,
    pub formatter: Option<Formatter>,
    /// `Some(None)` disables editing for the cell.
    pub editor: Option<Option<EditorFactory>>,
}

/// Overrides for one row.
#[derive(Clone, Default)]
pub struct ItemMetadata {
    pub css_classes: Option<String>,
    pub focusable: Option<bool>,
    pub selectable: Option<bool>,
    pub formatter: Option<Formatter>,
    /// Row-wide editor override; `Some(None)` makes the row read-only.
    pub editor: Option<Option<EditorFactory>>,
    /// Keyed by column id, or by column index written as a string.
    pub columns: HashMap<String, ColumnMetadata>,
}

impl ItemMetadata {
    /// Overrides for `column` at `index`; id takes precedence over index.
    pub fn column(&self, column: &Column, index: usize) -> Option<&ColumnMetadata> {
        self.columns
            .get(&column.id)
            .or_else(|| self.columns.get(&index.to_string()))
    }

    #[must_use]
    pub fn with_column(mut self, key: impl Into<String>, meta: ColumnMetadata) -> Self {
        self.columns.insert(key.into(), meta);
        self
    }
}

impl fmt::Debug for ColumnMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMetadata")
            .field("colspan", &self.colspan)
            .field("focusable", &self.focusable)
            .field("selectable", &self.selectable)
            .field("formatter", &self.formatter.is_some())
            .field("editor", &self.editor.as_ref().map(Option::is_some))
            .finish()
    }
}

impl fmt::Debug for ItemMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemMetadata")
            .field("css_classes", &self.css_classes)
            .field("focusable", &self.focusable)
            .field("selectable", &self.selectable)
            .field("formatter", &self.formatter.is_some())
            .field("editor", &self.editor.as_ref().map(Option::is_some))
            .field("columns", &self.columns)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_formatter_escapes() {
        let column = Column::new("c", "C", "c");
        let item = json!({});
        let value = json!("<b>&</b>");
        let args = FormatterArgs {
            row: 0,
            cell: 0,
            value: &value,
            column: &column,
            item: &item,
        };
        assert_eq!(default_formatter(&args), "&lt;b&gt;&amp;&lt;/b&gt;");
        let value = json!(12.5);
        let args = FormatterArgs { value: &value, ..args };
        assert_eq!(default_formatter(&args), "12.5");
        let args = FormatterArgs {
            value: &Value::Null,
            ..args
        };
        assert_eq!(default_formatter(&args), "");
    }

    #[test]
    fn test_column_metadata_lookup_prefers_id() {
        let column = Column::new("name", "Name", "name");
        let meta = ItemMetadata::default()
            .with_column(
                "1",
                ColumnMetadata {
                    focusable: Some(true),
                    ..ColumnMetadata::default()
                },
            )
            .with_column(
                "name",
                ColumnMetadata {
                    focusable: Some(false),
                    ..ColumnMetadata::default()
                },
            );
        assert_eq!(meta.column(&column, 1).unwrap().focusable, Some(false));
        let other = Column::new("age", "Age", "age");
        assert_eq!(meta.column(&other, 1).unwrap().focusable, Some(true));
        assert!(meta.column(&other, 2).is_none());
    }
}
