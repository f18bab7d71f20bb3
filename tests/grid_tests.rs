//! Grid behavior driven through the public handle against a `MemorySurface`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::cell::RefCell;
use std::rc::Rc;

use gridcal::error::GridcalError;
use gridcal::events::{keys, KeyEvent, Modifiers, PointerEvent};
use gridcal::grid::data::{Colspan, ColumnMetadata};
use gridcal::grid::editor::ValidationResult;
use gridcal::grid::selection::RowSelectionModel;
use gridcal::grid::{
    CellCssHash, CellPos, Column, DataSource, EditCommand, Editor, EditorLock, Grid, GridHooks,
    GridOptions, ItemMetadata, MemorySurface, NavDirection, Surface, TextEditor,
};
use serde_json::{json, Value};
use test_case::test_case;

const ROW_HEIGHT: f64 = 25.0;

fn rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"id": i, "name": format!("row {i}"), "qty": i * 10}))
        .collect()
}

fn columns() -> Vec<Column> {
    let mut qty = Column::new("qty", "Qty", "qty");
    qty.sortable = true;
    vec![
        Column::new("id", "ID", "id"),
        Column::new("name", "Name", "name").with_editor(TextEditor::factory()),
        qty,
    ]
}

fn build(
    data: Box<dyn DataSource>,
    columns: Vec<Column>,
    options: GridOptions,
    hooks: GridHooks,
) -> (Grid, Rc<RefCell<MemorySurface>>) {
    let surface = Rc::new(RefCell::new(MemorySurface::new()));
    let dyn_surface: Rc<RefCell<dyn Surface>> = Rc::clone(&surface) as _;
    let grid = Grid::new(dyn_surface, data, columns, options, hooks);
    grid.resize_canvas(240.0, 100.0);
    (grid, surface)
}

fn grid_with(n: usize, options: GridOptions) -> (Grid, Rc<RefCell<MemorySurface>>) {
    build(Box::new(rows(n)), columns(), options, GridHooks::default())
}

fn editable() -> GridOptions {
    GridOptions {
        editable: true,
        auto_edit: false,
        ..GridOptions::default()
    }
}

fn point(row: usize, x: f64) -> (f64, f64) {
    #[allow(clippy::cast_precision_loss)]
    let y = row as f64 * ROW_HEIGHT + 5.0;
    (x, y)
}

fn click(grid: &Grid, row: usize, modifiers: Modifiers) {
    let (x, y) = point(row, 10.0);
    grid.handle_click(PointerEvent::with_modifiers(x, y, modifiers));
}

// Rendering

#[test]
fn test_initial_render_matches_rendered_range() {
    let (grid, surface) = grid_with(100, GridOptions::default());
    let visible = grid.visible_range();
    assert_eq!((visible.top, visible.bottom), (0, 4));

    let expected: Vec<usize> = grid.rendered_range().rows().collect();
    assert_eq!(expected.first(), Some(&0));
    assert!(expected.len() > 5 && expected.len() < 100);
    assert_eq!(surface.borrow().rows(), expected);
}

#[test]
fn test_scrolling_swaps_rendered_rows() {
    let (grid, surface) = grid_with(1000, GridOptions::default());
    grid.scroll_to(1000.0);
    assert_eq!(grid.visible_range().top, 40);
    let rendered = surface.borrow().rows();
    assert!(rendered.contains(&40));
    assert!(rendered.contains(&44));
    assert!(!rendered.contains(&0));
}

#[test]
fn test_short_data_renders_every_row() {
    let (_grid, surface) = grid_with(3, GridOptions::default());
    assert_eq!(surface.borrow().rows(), vec![0, 1, 2]);
}

#[test]
fn test_add_row_is_rendered_after_data() {
    let options = GridOptions {
        enable_add_row: true,
        ..GridOptions::default()
    };
    let (grid, surface) = grid_with(3, options);
    assert_eq!(grid.data_len(), 3);
    assert_eq!(surface.borrow().rows(), vec![0, 1, 2, 3]);
}

// Navigation

#[test_case(0, 0, NavDirection::Right, true, (0, 1) ; "right moves one cell")]
#[test_case(0, 2, NavDirection::Right, false, (0, 2) ; "right stops at the last cell")]
#[test_case(0, 2, NavDirection::Next, true, (1, 0) ; "next wraps to the following row")]
#[test_case(1, 0, NavDirection::Prev, true, (0, 2) ; "prev wraps to the previous row")]
#[test_case(0, 1, NavDirection::Down, true, (1, 1) ; "down keeps the column")]
#[test_case(0, 1, NavDirection::Up, false, (0, 1) ; "up stops at the first row")]
#[test_case(2, 2, NavDirection::Next, true, (2, 0) ; "next on the last row cycles to its first cell")]
#[test_case(0, 0, NavDirection::Prev, false, (0, 0) ; "prev stops at the first cell")]
fn test_navigation_step(
    row: usize,
    cell: usize,
    dir: NavDirection,
    moved: bool,
    expected: (usize, usize),
) {
    let (grid, _) = grid_with(3, GridOptions::default());
    grid.set_active_cell(row, cell);
    assert_eq!(grid.navigate(dir), moved);
    assert_eq!(grid.active_cell(), Some(CellPos::new(expected.0, expected.1)));
}

#[test]
fn test_navigation_without_active_cell() {
    let (grid, _) = grid_with(3, GridOptions::default());
    assert!(!grid.navigate(NavDirection::Down));
    assert!(grid.handle_key_down(KeyEvent::new(keys::TAB)));
    assert_eq!(grid.active_cell(), Some(CellPos::new(0, 0)));
}

#[test]
fn test_arrow_keys_drive_navigation() {
    let (grid, _) = grid_with(3, GridOptions::default());
    grid.set_active_cell(0, 0);
    assert!(grid.handle_key_down(KeyEvent::new(keys::DOWN)));
    assert!(grid.handle_key_down(KeyEvent::new(keys::RIGHT)));
    assert_eq!(grid.active_cell(), Some(CellPos::new(1, 1)));
    assert!(grid.handle_key_down(KeyEvent::with_modifiers(keys::TAB, Modifiers::SHIFT)));
    assert_eq!(grid.active_cell(), Some(CellPos::new(1, 0)));
}

#[test]
fn test_page_down_carries_active_cell() {
    let (grid, _) = grid_with(100, GridOptions::default());
    grid.set_active_cell(0, 1);
    grid.navigate_page_down();
    assert_eq!(grid.active_cell(), Some(CellPos::new(4, 1)));
    assert!(grid.visible_range().top >= 4);
}

#[test]
fn test_active_cell_change_is_reported() {
    let (grid, _) = grid_with(3, GridOptions::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    grid.events()
        .on_active_cell_changed
        .subscribe(move |_, pos| sink.borrow_mut().push(*pos));
    grid.set_active_cell(1, 1);
    grid.set_active_cell(1, 1);
    grid.reset_active_cell();
    assert_eq!(*seen.borrow(), vec![Some(CellPos::new(1, 1)), None]);
}

#[test]
fn test_handlers_can_query_the_grid() {
    let (grid, _) = grid_with(3, GridOptions::default());
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let handle = grid.clone();
    grid.events()
        .on_active_cell_changed
        .subscribe(move |_, _| *sink.borrow_mut() = handle.active_cell());
    grid.set_active_cell(1, 1);
    assert_eq!(*seen.borrow(), Some(CellPos::new(1, 1)));
}

#[test]
fn test_handler_can_redirect_the_active_cell() {
    let (grid, _) = grid_with(3, GridOptions::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let handle = grid.clone();
    grid.events().on_active_cell_changed.subscribe(move |_, pos| {
        sink.borrow_mut().push(*pos);
        if *pos == Some(CellPos::new(0, 0)) {
            handle.set_active_cell(2, 0);
        }
    });
    grid.set_active_cell(0, 0);
    assert_eq!(grid.active_cell(), Some(CellPos::new(2, 0)));
    assert_eq!(
        *seen.borrow(),
        vec![Some(CellPos::new(0, 0)), Some(CellPos::new(2, 0))]
    );
}

struct Spanned {
    rows: Vec<Value>,
    span: Colspan,
}

impl DataSource for Spanned {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn item(&self, row: usize) -> Option<&Value> {
        self.rows.get(row)
    }

    fn item_mut(&mut self, row: usize) -> Option<&mut Value> {
        self.rows.get_mut(row)
    }

    fn item_metadata(&self, row: usize) -> Option<ItemMetadata> {
        (row == 0).then(|| {
            ItemMetadata::default().with_column(
                "0",
                ColumnMetadata {
                    colspan: Some(self.span),
                    ..ColumnMetadata::default()
                },
            )
        })
    }
}

#[test]
fn test_colspan_row_resolves_to_spanning_cell() {
    let (grid, _) = build(
        Box::new(Spanned {
            rows: rows(3),
            span: Colspan::Rest,
        }),
        columns(),
        GridOptions::default(),
        GridHooks::default(),
    );
    let (x, y) = point(0, 200.0);
    assert_eq!(grid.cell_from_point(x, y), Some(CellPos::new(0, 0)));
    let (x, y) = point(1, 200.0);
    assert_eq!(grid.cell_from_point(x, y), Some(CellPos::new(1, 2)));

    grid.set_active_cell(1, 2);
    assert!(grid.navigate(NavDirection::Up));
    assert_eq!(grid.active_cell(), Some(CellPos::new(0, 0)));
    assert!(!grid.navigate(NavDirection::Right));
    // The aimed column survives the spanned row.
    assert!(grid.navigate(NavDirection::Down));
    assert_eq!(grid.active_cell(), Some(CellPos::new(1, 2)));
}

#[test]
fn test_oversized_colspan_stops_at_last_column() {
    let (grid, surface) = build(
        Box::new(Spanned {
            rows: rows(3),
            span: Colspan::Cells(usize::MAX),
        }),
        columns(),
        GridOptions::default(),
        GridHooks::default(),
    );
    assert_eq!(surface.borrow().rows(), vec![0, 1, 2]);
    let (x, y) = point(0, 200.0);
    assert_eq!(grid.cell_from_point(x, y), Some(CellPos::new(0, 0)));

    grid.set_active_cell(0, 0);
    assert_eq!(grid.active_cell(), Some(CellPos::new(0, 0)));
    assert!(!grid.navigate(NavDirection::Right));
    assert!(grid.navigate(NavDirection::Down));
    assert_eq!(grid.active_cell(), Some(CellPos::new(1, 0)));
}

// Editing

fn required_name_columns() -> Vec<Column> {
    let required = TextEditor::factory_with_validator(Rc::new(|v: &str| {
        if v.trim().is_empty() {
            ValidationResult::invalid("required")
        } else {
            ValidationResult::ok()
        }
    }));
    let mut cols = columns();
    cols[1] = Column::new("name", "Name", "name").with_editor(required);
    cols
}

#[test]
fn test_edit_commit_writes_item_and_releases_lock() {
    let (grid, _) = grid_with(3, editable());
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    grid.events()
        .on_cell_change
        .subscribe(move |_, args| sink.borrow_mut().push((args.row, args.cell)));

    grid.set_active_cell(1, 1);
    grid.edit_active_cell(None).unwrap();
    assert!(grid.editor_lock().is_active());
    grid.current_editor().unwrap().borrow_mut().input("renamed");

    assert!(grid.commit_current_edit());
    assert!(!grid.editor_lock().is_active());
    assert!(grid.current_editor().is_none());
    assert_eq!(grid.item(1).unwrap()["name"], "renamed");
    assert_eq!(*changes.borrow(), vec![(1, 1)]);
}

#[test]
fn test_unchanged_edit_commits_silently() {
    let (grid, _) = grid_with(3, editable());
    let fired = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&fired);
    grid.events()
        .on_cell_change
        .subscribe(move |_, _| *sink.borrow_mut() += 1);
    grid.set_active_cell(0, 1);
    grid.edit_active_cell(None).unwrap();
    assert!(grid.commit_current_edit());
    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn test_validation_failure_keeps_editor_open() {
    let (grid, _) = build(
        Box::new(rows(3)),
        required_name_columns(),
        editable(),
        GridHooks::default(),
    );
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    grid.events()
        .on_validation_error
        .subscribe(move |_, args| sink.borrow_mut().push(args.result.msg.clone()));

    grid.set_active_cell(1, 1);
    grid.edit_active_cell(None).unwrap();
    grid.current_editor().unwrap().borrow_mut().input("  ");
    assert!(!grid.commit_current_edit());
    assert_eq!(*errors.borrow(), vec![Some("required".to_string())]);

    // Navigation is blocked but reported as handled.
    assert!(grid.navigate(NavDirection::Down));
    assert_eq!(grid.active_cell(), Some(CellPos::new(1, 1)));

    assert!(grid.cancel_current_edit());
    assert!(!grid.editor_lock().is_active());
    assert_eq!(grid.item(1).unwrap()["name"], "row 1");
}

#[test]
fn test_validation_handler_can_cancel_the_edit() {
    let (grid, _) = build(
        Box::new(rows(3)),
        required_name_columns(),
        editable(),
        GridHooks::default(),
    );
    let handle = grid.clone();
    grid.events()
        .on_validation_error
        .subscribe(move |_, _| {
            handle.cancel_current_edit();
        });

    grid.set_active_cell(1, 1);
    grid.edit_active_cell(None).unwrap();
    grid.current_editor().unwrap().borrow_mut().input("");
    assert!(!grid.commit_current_edit());
    assert!(grid.current_editor().is_none());
    assert!(!grid.editor_lock().is_active());
    assert_eq!(grid.item(1).unwrap()["name"], "row 1");
}

#[test]
fn test_cell_change_handler_sees_the_written_item() {
    let (grid, _) = grid_with(3, editable());
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let handle = grid.clone();
    grid.events().on_cell_change.subscribe(move |_, args| {
        *sink.borrow_mut() = handle.item(args.row).map(|item| item["name"].clone());
    });
    grid.set_active_cell(0, 1);
    grid.edit_active_cell(None).unwrap();
    grid.current_editor().unwrap().borrow_mut().input("seen");
    assert!(grid.commit_current_edit());
    assert_eq!(*seen.borrow(), Some(json!("seen")));
}

#[test]
fn test_edit_requires_editable_grid() {
    let (grid, _) = grid_with(3, GridOptions::default());
    grid.set_active_cell(0, 1);
    assert!(matches!(
        grid.edit_active_cell(None),
        Err(GridcalError::NotEditable)
    ));
}

#[test]
fn test_before_edit_cell_can_veto() {
    let (grid, _) = grid_with(3, editable());
    grid.events()
        .on_before_edit_cell
        .subscribe(|data, args| {
            if args.row == 2 {
                data.prevent_default();
            }
        });
    grid.set_active_cell(2, 1);
    grid.edit_active_cell(None).unwrap();
    assert!(grid.current_editor().is_none());
    grid.set_active_cell(1, 1);
    grid.edit_active_cell(None).unwrap();
    assert!(grid.current_editor().is_some());
}

#[test]
fn test_shared_lock_moves_between_grids() {
    let lock = Rc::new(EditorLock::new());
    let hooks = GridHooks {
        editor_lock: Some(Rc::clone(&lock)),
        ..GridHooks::default()
    };
    let (a, _) = build(Box::new(rows(3)), columns(), editable(), hooks.clone());
    let (b, _) = build(Box::new(rows(3)), columns(), editable(), hooks);

    a.set_active_cell(0, 1);
    a.edit_active_cell(None).unwrap();
    b.set_active_cell(0, 1);
    assert!(matches!(
        b.edit_active_cell(None),
        Err(GridcalError::EditorLockHeld)
    ));

    // goto_cell commits whoever holds the lock first.
    b.goto_cell(1, 1, true);
    assert!(a.current_editor().is_none());
    assert!(b.current_editor().is_some());
    assert!(lock.is_active());
}

#[test]
fn test_edit_command_handler_supports_undo() {
    let stack: Rc<RefCell<Vec<EditCommand>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&stack);
    let hooks = GridHooks {
        edit_command_handler: Some(Rc::new(
            move |grid: &Grid, _item: Option<&Value>, _column: &Column, command: EditCommand| {
                command.execute(grid);
                sink.borrow_mut().push(command);
            },
        )),
        ..GridHooks::default()
    };
    let (grid, _) = build(Box::new(rows(3)), columns(), editable(), hooks);
    let changes = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&changes);
    grid.events()
        .on_cell_change
        .subscribe(move |_, _| *counter.borrow_mut() += 1);

    grid.set_active_cell(2, 1);
    grid.edit_active_cell(None).unwrap();
    grid.current_editor().unwrap().borrow_mut().input("changed");
    assert!(grid.commit_current_edit());
    assert_eq!(grid.item(2).unwrap()["name"], "changed");

    let command = stack.borrow_mut().pop().unwrap();
    assert_eq!(command.prev_serialized_value, json!("row 2"));
    command.undo(&grid);
    assert_eq!(grid.item(2).unwrap()["name"], "row 2");
    assert_eq!(*changes.borrow(), 2);
}

#[test]
fn test_add_row_edit_emits_new_item() {
    let options = GridOptions {
        enable_add_row: true,
        ..editable()
    };
    let (grid, _) = grid_with(3, options);
    let added = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&added);
    grid.events()
        .on_add_new_row
        .subscribe(move |_, args| sink.borrow_mut().push(args.item.clone()));

    grid.goto_cell(3, 1, false);
    let editor = grid.current_editor().expect("add-row opens an editor");
    editor.borrow_mut().input("fresh");
    assert!(grid.commit_current_edit());
    assert_eq!(*added.borrow(), vec![json!({"name": "fresh"})]);
    assert_eq!(grid.data_len(), 3);
}

// Selection

#[test]
fn test_selected_rows_need_a_model() {
    let (grid, _) = grid_with(10, GridOptions::default());
    assert!(matches!(
        grid.set_selected_rows(&[1]),
        Err(GridcalError::MissingDependency(_))
    ));
}

#[test]
fn test_row_selection_by_click() {
    let (grid, _) = grid_with(10, GridOptions::default());
    grid.set_selection_model(Some(Box::new(RowSelectionModel::new())));
    let notified = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notified);
    grid.events()
        .on_selected_rows_changed
        .subscribe(move |_, args| sink.borrow_mut().push(args.rows.clone()));

    click(&grid, 1, Modifiers::NONE);
    assert_eq!(grid.selected_rows(), vec![1]);
    click(&grid, 3, Modifiers::CTRL);
    assert_eq!(grid.selected_rows(), vec![1, 3]);
    click(&grid, 5, Modifiers::SHIFT);
    assert_eq!(grid.selected_rows(), vec![1, 2, 3, 4, 5]);
    assert_eq!(grid.active_cell(), Some(CellPos::new(5, 0)));
    assert_eq!(notified.borrow().last(), Some(&vec![1, 2, 3, 4, 5]));

    let styles = grid.cell_css_styles("selected").unwrap();
    assert_eq!(styles[&2]["qty"], "selected");
}

#[test]
fn test_set_selected_rows_and_removing_model() {
    let (grid, _) = grid_with(10, GridOptions::default());
    grid.set_selection_model(Some(Box::new(RowSelectionModel::new())));
    grid.set_selected_rows(&[7, 2]).unwrap();
    assert_eq!(grid.selected_rows(), vec![7, 2]);
    assert_eq!(grid.selected_ranges().len(), 2);

    grid.set_selection_model(None);
    assert!(!grid.has_selection_model());
    assert!(grid.selected_rows().is_empty());
    assert!(grid.cell_css_styles("selected").is_none());
}

#[test]
fn test_ctrl_a_selects_all_rows() {
    let (grid, _) = grid_with(4, GridOptions::default());
    grid.set_selection_model(Some(Box::new(RowSelectionModel::new())));
    assert!(grid.handle_key_down(KeyEvent::with_modifiers(keys::A, Modifiers::CTRL)));
    assert_eq!(grid.selected_rows(), vec![0, 1, 2, 3]);
}

// Cell CSS, columns and sorting

#[test]
fn test_cell_css_keys_are_unique() {
    let (grid, _) = grid_with(3, GridOptions::default());
    let mut hash = CellCssHash::new();
    hash.entry(1)
        .or_default()
        .insert("name".to_string(), "hl".to_string());
    grid.add_cell_css_styles("hl", hash.clone()).unwrap();
    assert!(matches!(
        grid.add_cell_css_styles("hl", hash.clone()),
        Err(GridcalError::CssStylesExist(_))
    ));
    grid.set_cell_css_styles("hl", CellCssHash::new());
    grid.remove_cell_css_styles("hl");
    assert!(grid.cell_css_styles("hl").is_none());
}

#[test]
fn test_column_reorder_requires_option() {
    let (grid, _) = grid_with(3, GridOptions::default());
    assert!(matches!(
        grid.set_column_order(&["qty", "name", "id"]),
        Err(GridcalError::MissingDependency(_))
    ));

    let options = GridOptions {
        enable_column_reorder: true,
        ..GridOptions::default()
    };
    let (grid, _) = grid_with(3, options);
    let fired = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&fired);
    grid.events()
        .on_columns_reordered
        .subscribe(move |_, _| *sink.borrow_mut() += 1);
    assert!(grid.set_column_order(&["qty", "name", "id"]).unwrap());
    assert!(!grid.set_column_order(&["qty", "name", "id"]).unwrap());
    assert!(grid.set_column_order(&["qty", "qty", "id"]).is_err());
    let ids: Vec<String> = grid.columns().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, ["qty", "name", "id"]);
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn test_header_click_toggles_sort() {
    let (grid, _) = grid_with(3, GridOptions::default());
    let sorts = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&sorts);
    grid.events().on_sort.subscribe(move |_, args| {
        let first = args.sort_columns.first().cloned();
        sink.borrow_mut().push(first.map(|c| (c.column_id, c.sort_asc)));
    });
    grid.handle_header_click(0, Modifiers::NONE);
    grid.handle_header_click(2, Modifiers::NONE);
    grid.handle_header_click(2, Modifiers::NONE);
    assert_eq!(
        *sorts.borrow(),
        vec![
            Some(("qty".to_string(), true)),
            Some(("qty".to_string(), false))
        ]
    );
}

#[test]
fn test_options_from_layers() {
    let options = GridOptions::from_layers(&[
        json!({"rowHeight": 30}),
        json!({"editable": true, "rowHeight": 20}),
    ])
    .unwrap();
    assert!(options.editable);
    assert!((options.row_height - 20.0).abs() < f64::EPSILON);
    assert!(GridOptions::from_layers(&[json!({"rowHieght": 30})]).is_err());
}
