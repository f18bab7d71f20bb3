//! Editor lock, cell editors and undoable edit commands.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::column::Column;
use super::Grid;
use crate::error::{GridcalError, Result};

/// Something that owns an in-progress edit and can finish it.
pub trait EditController {
    /// Commit the edit. False when validation failed and the edit stays open.
    fn commit_current_edit(&self) -> bool;

    /// Abandon the edit.
    fn cancel_current_edit(&self) -> bool;
}

/// Mutual exclusion token: at most one edit controller is active at a time.
///
/// One lock is shared by reference between every component that may edit.
/// A grid creates its own unless one is passed in through
/// [`GridHooks::editor_lock`](super::options::GridHooks).
#[derive(Default)]
pub struct EditorLock {
    active: RefCell<Option<Rc<dyn EditController>>>,
}

impl fmt::Debug for EditorLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorLock")
            .field("active", &self.active.borrow().is_some())
            .finish()
    }
}

fn same_controller(a: &Rc<dyn EditController>, b: &Rc<dyn EditController>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl EditorLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any controller holds the lock.
    pub fn is_active(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Whether `controller` holds the lock.
    pub fn is_active_for(&self, controller: &Rc<dyn EditController>) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|active| same_controller(active, controller))
    }

    /// Take the lock. Re-activating the holder is a no-op.
    pub fn activate(&self, controller: Rc<dyn EditController>) -> Result<()> {
        let mut active = self.active.borrow_mut();
        match active.as_ref() {
            Some(current) if same_controller(current, &controller) => Ok(()),
            Some(_) => Err(GridcalError::EditorLockHeld),
            None => {
                *active = Some(controller);
                Ok(())
            }
        }
    }

    /// Release the lock; only the holder may do so.
    pub fn deactivate(&self, controller: &Rc<dyn EditController>) -> Result<()> {
        let mut active = self.active.borrow_mut();
        match active.as_ref() {
            Some(current) if same_controller(current, controller) => {
                *active = None;
                Ok(())
            }
            _ => Err(GridcalError::EditorLockNotOwner),
        }
    }

    /// Ask the holder to commit. True when nothing is being edited.
    pub fn commit_current_edit(&self) -> bool {
        // Release the borrow first: the controller deactivates the lock.
        let active = self.active.borrow().clone();
        active.map_or(true, |controller| controller.commit_current_edit())
    }

    /// Ask the holder to cancel. True when nothing is being edited.
    pub fn cancel_current_edit(&self) -> bool {
        let active = self.active.borrow().clone();
        active.map_or(true, |controller| controller.cancel_current_edit())
    }
}

/// Outcome of [`Editor::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub msg: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            msg: None,
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self {
            valid: false,
            msg: Some(msg.into()),
        }
    }
}

/// What an editor factory receives.
pub struct EditorArgs<'a> {
    pub row: usize,
    pub cell: usize,
    pub column: &'a Column,
    pub item: Option<&'a Value>,
}

/// A cell editor. The host forwards typed text through [`Editor::input`].
pub trait Editor {
    fn load_value(&mut self, item: &Value);

    fn serialize_value(&self) -> Value;

    fn apply_value(&self, item: &mut Value, state: &Value);

    fn is_value_changed(&self) -> bool;

    fn validate(&self) -> ValidationResult {
        ValidationResult::ok()
    }

    fn input(&mut self, _text: &str) {}

    fn focus(&mut self) {}

    fn destroy(&mut self) {}

    /// Keep the formatted cell content while editing.
    fn suppress_clear_on_edit(&self) -> bool {
        false
    }
}

pub type EditorFactory = Rc<dyn Fn(&EditorArgs<'_>) -> Box<dyn Editor>>;

pub type Validator = Rc<dyn Fn(&str) -> ValidationResult>;

pub type SharedEditor = Rc<RefCell<Box<dyn Editor>>>;

/// Single-line text editor bound to the column's field.
pub struct TextEditor {
    field: String,
    default_value: Option<String>,
    value: String,
    validator: Option<Validator>,
}

impl TextEditor {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            default_value: None,
            value: String::new(),
            validator: None,
        }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn factory() -> EditorFactory {
        Rc::new(|args: &EditorArgs<'_>| -> Box<dyn Editor> {
            Box::new(TextEditor::new(args.column.field.clone()))
        })
    }

    pub fn factory_with_validator(validator: Validator) -> EditorFactory {
        Rc::new(move |args: &EditorArgs<'_>| -> Box<dyn Editor> {
            Box::new(
                TextEditor::new(args.column.field.clone()).with_validator(Rc::clone(&validator)),
            )
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

fn field_text(item: &Value, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl Editor for TextEditor {
    fn load_value(&mut self, item: &Value) {
        self.default_value = field_text(item, &self.field);
        self.value = self.default_value.clone().unwrap_or_default();
    }

    fn serialize_value(&self) -> Value {
        Value::String(self.value.clone())
    }

    fn apply_value(&self, item: &mut Value, state: &Value) {
        if !item.is_object() {
            *item = Value::Object(serde_json::Map::new());
        }
        if let Some(map) = item.as_object_mut() {
            map.insert(self.field.clone(), state.clone());
        }
    }

    fn is_value_changed(&self) -> bool {
        match &self.default_value {
            None => !self.value.is_empty(),
            Some(default) => &self.value != default,
        }
    }

    fn validate(&self) -> ValidationResult {
        self.validator
            .as_ref()
            .map_or_else(ValidationResult::ok, |v| v(&self.value))
    }

    fn input(&mut self, text: &str) {
        self.value = text.to_string();
    }
}

/// A committed edit, replayable through the grid.
///
/// Handed to the `edit_command_handler` hook (when set) instead of being
/// applied directly, so hosts can keep an undo stack.
#[derive(Clone)]
pub struct EditCommand {
    pub row: usize,
    pub cell: usize,
    pub serialized_value: Value,
    pub prev_serialized_value: Value,
    pub(crate) editor: SharedEditor,
}

impl fmt::Debug for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditCommand")
            .field("row", &self.row)
            .field("cell", &self.cell)
            .field("serialized_value", &self.serialized_value)
            .field("prev_serialized_value", &self.prev_serialized_value)
            .finish_non_exhaustive()
    }
}

impl EditCommand {
    /// Apply the new value to the row and re-render it.
    pub fn execute(&self, grid: &Grid) {
        grid.apply_edit(self, &self.serialized_value);
    }

    /// Restore the previous value.
    pub fn undo(&self, grid: &Grid) {
        grid.apply_edit(self, &self.prev_serialized_value);
    }
}
