//! Column definitions, pixel position cache and width redistribution.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data::Formatter;
use super::editor::EditorFactory;
use super::render::{NodeId, Surface};

/// Runs after a cell has been rendered, with the cell's node.
pub type AsyncPostRender = Rc<dyn Fn(&mut dyn Surface, NodeId, usize, &Value, &Column)>;

/// Width floor applied on top of every column's own `min_width`.
pub const ABSOLUTE_COLUMN_MIN_WIDTH: f64 = 0.0;

/// Cap on any single growth step when a column has no `max_width`.
const UNBOUNDED_GROWTH: f64 = 1_000_000.0;

/// A grid column. Data fields deserialize from JSON; hooks are attached in code.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub field: String,
    pub width: f64,
    pub min_width: f64,
    pub max_width: Option<f64>,
    pub css_class: Option<String>,
    pub resizable: bool,
    pub sortable: bool,
    pub focusable: bool,
    pub selectable: bool,
    /// Editing this column on the add-row does not create a new item.
    pub cannot_trigger_insert: bool,
    pub rerender_on_resize: bool,
    pub default_sort_asc: bool,
    #[serde(skip)]
    pub formatter: Option<Formatter>,
    #[serde(skip)]
    pub editor: Option<EditorFactory>,
    #[serde(skip)]
    pub async_post_render: Option<AsyncPostRender>,
    #[serde(skip)]
    pub(crate) previous_width: f64,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            field: String::new(),
            width: 80.0,
            min_width: 30.0,
            max_width: None,
            css_class: None,
            resizable: true,
            sortable: false,
            focusable: true,
            selectable: true,
            cannot_trigger_insert: false,
            rerender_on_resize: false,
            default_sort_asc: true,
            formatter: None,
            editor: None,
            async_post_render: None,
            previous_width: 0.0,
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("resizable", &self.resizable)
            .field("focusable", &self.focusable)
            .field("selectable", &self.selectable)
            .field("formatter", &self.formatter.is_some())
            .field("editor", &self.editor.is_some())
            .finish_non_exhaustive()
    }
}

impl Column {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field: field.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_editor(mut self, editor: EditorFactory) -> Self {
        self.editor = Some(editor);
        self
    }

    #[must_use]
    pub fn with_async_post_render(mut self, hook: AsyncPostRender) -> Self {
        self.async_post_render = Some(hook);
        self
    }

    fn actual_min_width(&self) -> f64 {
        self.min_width.max(ABSOLUTE_COLUMN_MIN_WIDTH)
    }

    /// Clamp `width` into `[min_width, max_width]`.
    pub(crate) fn clamp_width(&mut self) {
        if self.min_width > 0.0 && self.width < self.min_width {
            self.width = self.min_width;
        }
        if let Some(max) = self.max_width {
            if self.width > max {
                self.width = max;
            }
        }
    }
}

/// Left/right pixel edges of every column, rebuilt when widths or order change.
#[derive(Debug, Clone, Default)]
pub struct ColumnPositions {
    left: Vec<f64>,
    right: Vec<f64>,
}

impl ColumnPositions {
    pub fn build(columns: &[Column]) -> Self {
        let mut left = Vec::with_capacity(columns.len());
        let mut right = Vec::with_capacity(columns.len());
        let mut x = 0.0;
        for c in columns {
            left.push(x);
            right.push(x + c.width);
            x += c.width;
        }
        Self { left, right }
    }

    pub fn left(&self, index: usize) -> f64 {
        self.left.get(index).copied().unwrap_or(f64::INFINITY)
    }

    /// Right edge; indices past the end clamp to the last column.
    pub fn right(&self, index: usize) -> f64 {
        let last = self.right.len().saturating_sub(1);
        self.right.get(index.min(last)).copied().unwrap_or(0.0)
    }

    pub fn total_width(&self) -> f64 {
        self.right.last().copied().unwrap_or(0.0)
    }
}

/// Shrink or grow resizable columns so their total fits `avail_width`.
///
/// Returns true when a column flagged `rerender_on_resize` changed width.
pub fn autosize(columns: &mut [Column], avail_width: f64) -> bool {
    let mut widths: Vec<f64> = columns.iter().map(|c| c.width).collect();
    let mut total: f64 = widths.iter().sum();
    let mut shrink_leeway: f64 = columns
        .iter()
        .filter(|c| c.resizable)
        .map(|c| c.width - c.actual_min_width())
        .sum();

    let mut prev_total = total;
    while total > avail_width && shrink_leeway > 0.0 {
        let proportion = (total - avail_width) / shrink_leeway;
        for (c, width) in columns.iter().zip(widths.iter_mut()) {
            if total <= avail_width {
                break;
            }
            if !c.resizable || *width <= c.min_width || *width <= ABSOLUTE_COLUMN_MIN_WIDTH {
                continue;
            }
            let abs_min = c.actual_min_width();
            let mut shrink = (proportion * (*width - abs_min)).floor();
            if shrink == 0.0 {
                shrink = 1.0;
            }
            let shrink = shrink.min(*width - abs_min);
            total -= shrink;
            shrink_leeway -= shrink;
            *width -= shrink;
        }
        if prev_total <= total {
            break;
        }
        prev_total = total;
    }

    prev_total = total;
    while total < avail_width && total > 0.0 {
        let proportion = avail_width / total;
        for (c, width) in columns.iter().zip(widths.iter_mut()) {
            if total >= avail_width {
                break;
            }
            let current = *width;
            let grow = match c.max_width {
                _ if !c.resizable => 0.0,
                Some(max) if max <= current => 0.0,
                max => {
                    let room = max.map_or(UNBOUNDED_GROWTH, |m| m - current);
                    let step = ((proportion * current).floor() - current).min(room);
                    if step == 0.0 {
                        1.0
                    } else {
                        step
                    }
                }
            };
            total += grow;
            if total <= avail_width {
                *width += grow;
            }
        }
        if prev_total >= total {
            break;
        }
        prev_total = total;
    }

    let mut rerender = false;
    for (c, width) in columns.iter_mut().zip(widths) {
        if c.rerender_on_resize && (c.width - width).abs() > f64::EPSILON {
            rerender = true;
        }
        c.width = width;
    }
    rerender
}

/// Leeway sums used to bound a drag.
fn leeway(columns: &[Column]) -> (f64, Option<f64>) {
    let mut shrink = 0.0;
    let mut stretch = Some(0.0);
    for c in columns.iter().filter(|c| c.resizable) {
        stretch = match (stretch, c.max_width) {
            (Some(total), Some(max)) => Some(total + max - c.previous_width),
            _ => None,
        };
        shrink += c.previous_width - c.actual_min_width();
    }
    (shrink, stretch)
}

/// Apply `delta` px to the column's own side, walking leftwards from `index`.
fn shrink_walk<'a>(columns: impl Iterator<Item = &'a mut Column>, delta: f64) {
    let mut x = delta;
    for c in columns.filter(|c| c.resizable) {
        let min = c.actual_min_width();
        if x != 0.0 && c.previous_width + x < min {
            x += c.previous_width - min;
            c.width = min;
        } else {
            c.width = c.previous_width + x;
            x = 0.0;
        }
    }
}

fn stretch_walk<'a>(columns: impl Iterator<Item = &'a mut Column>, delta: f64) {
    let mut x = delta;
    for c in columns.filter(|c| c.resizable) {
        match c.max_width {
            Some(max) if x != 0.0 && max - x < c.previous_width => {
                x -= max - c.previous_width;
                c.width = max;
            }
            _ => {
                c.width = c.previous_width + x;
                x = 0.0;
            }
        }
    }
}

/// Drag the right edge of column `index` by `delta` px.
///
/// The delta is first bounded by what the columns on each side can absorb.
/// Columns at and left of `index` absorb it; with `force_fit`, columns to the
/// right absorb the opposite delta so the total width is conserved. Returns
/// true when a column flagged `rerender_on_resize` changed width.
pub fn resize_with_neighbors(
    columns: &mut [Column],
    index: usize,
    delta: f64,
    force_fit: bool,
) -> bool {
    if index >= columns.len() {
        return false;
    }
    for c in columns.iter_mut() {
        c.previous_width = c.width;
    }
    let (left_cols, right_cols) = columns.split_at_mut(index + 1);

    let (shrink_left, stretch_left) = leeway(left_cols);
    let (shrink_right, stretch_right) = if force_fit {
        leeway(right_cols)
    } else {
        (0.0, Some(0.0))
    };
    let unbounded = 100_000.0;
    let (shrink_right, stretch_right) = if force_fit {
        (shrink_right, stretch_right.unwrap_or(unbounded))
    } else {
        (unbounded, unbounded)
    };
    let stretch_left = stretch_left.unwrap_or(unbounded);
    let max_delta = shrink_right.min(stretch_left);
    let min_delta = -shrink_left.min(stretch_right);
    let d = delta.clamp(min_delta, max_delta.max(min_delta));

    if d < 0.0 {
        shrink_walk(left_cols.iter_mut().rev(), d);
        if force_fit {
            stretch_walk(right_cols.iter_mut(), -d);
        }
    } else {
        stretch_walk(left_cols.iter_mut().rev(), d);
        if force_fit {
            shrink_walk(right_cols.iter_mut(), -d);
        }
    }

    columns
        .iter()
        .any(|c| c.rerender_on_resize && (c.width - c.previous_width).abs() > f64::EPSILON)
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

    fn cols(widths: &[f64]) -> Vec<Column> {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| Column::new(format!("c{i}"), "", "").with_width(*w))
            .collect()
    }

    fn widths(columns: &[Column]) -> Vec<f64> {
        columns.iter().map(|c| c.width).collect()
    }

    #[test]
    fn test_positions() {
        let pos = ColumnPositions::build(&cols(&[100.0, 50.0, 80.0]));
        assert_eq!(pos.left(1), 100.0);
        assert_eq!(pos.right(1), 150.0);
        assert_eq!(pos.right(9), 230.0);
        assert_eq!(pos.total_width(), 230.0);
    }

    #[test]
    fn test_autosize_shrinks_to_fit() {
        let mut c = cols(&[100.0, 100.0, 100.0]);
        autosize(&mut c, 240.0);
        let total: f64 = widths(&c).iter().sum();
        assert_eq!(total, 240.0);
        assert!(c.iter().all(|c| c.width >= 30.0));
    }

    #[test]
    fn test_autosize_respects_min_width() {
        let mut c = cols(&[100.0, 100.0]);
        c[0].min_width = 90.0;
        autosize(&mut c, 120.0);
        assert_eq!(c[0].width, 90.0);
        assert_eq!(c[1].width, 30.0);
    }

    #[test]
    fn test_autosize_grows_to_fill() {
        let mut c = cols(&[100.0, 100.0]);
        c[1].max_width = Some(120.0);
        autosize(&mut c, 300.0);
        assert_eq!(c[1].width, 120.0);
        assert_eq!(c[0].width, 180.0);
    }

    #[test]
    fn test_resize_stretch_without_force_fit() {
        let mut c = cols(&[100.0, 100.0, 100.0]);
        resize_with_neighbors(&mut c, 0, 40.0, false);
        assert_eq!(widths(&c), vec![140.0, 100.0, 100.0]);
    }

    #[test]
    fn test_resize_shrink_spills_left() {
        let mut c = cols(&[100.0, 50.0, 100.0]);
        resize_with_neighbors(&mut c, 1, -40.0, false);
        // Column 1 stops at its 30px minimum; the remaining 20px comes from column 0.
        assert_eq!(widths(&c), vec![80.0, 30.0, 100.0]);
    }

    #[test]
    fn test_resize_force_fit_conserves_total() {
        let mut c = cols(&[100.0, 100.0, 100.0]);
        resize_with_neighbors(&mut c, 0, 50.0, true);
        assert_eq!(widths(&c), vec![150.0, 50.0, 100.0]);
        let total: f64 = widths(&c).iter().sum();
        assert_eq!(total, 300.0);
    }

    #[test]
    fn test_resize_force_fit_bounded_by_right_leeway() {
        let mut c = cols(&[100.0, 40.0]);
        resize_with_neighbors(&mut c, 0, 50.0, true);
        // Only 10px can be taken from the right column.
        assert_eq!(widths(&c), vec![110.0, 30.0]);
    }

    #[test]
    fn test_column_from_json() {
        let c: Column =
            serde_json::from_str(r#"{"id":"a","name":"A","field":"a","minWidth":50,"width":20}"#)
                .unwrap();
        assert_eq!(c.min_width, 50.0);
        assert!(c.resizable);
        assert!(serde_json::from_str::<Column>(r#"{"bogus":1}"#).is_err());
    }
}
