//! Structured error types for gridcal.
//!
//! Calendar validation and date parsing errors are raised synchronously to the
//! caller. Grid contract violations (lock misuse, missing modules) are raised as
//! hard failures of the current operation. Out-of-range navigation and selection
//! never produce an error; those paths return `None`/`false` instead.

/// All errors that can occur in calendar arithmetic, date parsing and grid control.
#[derive(Debug, thiserror::Error)]
pub enum GridcalError {
    /// The (year, month, day) triple does not exist in the calendar.
    #[error("Invalid {calendar} date {year}/{month}/{day}")]
    InvalidDate {
        calendar: &'static str,
        year: i32,
        month: u32,
        day: u32,
    },

    /// The (year, month) pair does not exist in the calendar.
    #[error("Invalid {calendar} month {year}/{month}")]
    InvalidMonth {
        calendar: &'static str,
        year: i32,
        month: u32,
    },

    /// The year is outside the range supported by the calendar.
    #[error("Invalid {calendar} year {year}")]
    InvalidYear { calendar: &'static str, year: i32 },

    /// Two dates from different calendars were compared.
    #[error("Cannot mix {left} and {right} dates")]
    DifferentCalendars {
        left: &'static str,
        right: &'static str,
    },

    /// A numeric field was expected in the date text.
    #[error("Missing number at position {position}")]
    MissingNumber { position: usize },

    /// A day or month name was expected in the date text.
    #[error("Unknown name at position {position}")]
    UnknownName { position: usize },

    /// The date text does not match a literal in the pattern.
    #[error("Unexpected literal at position {position}")]
    UnexpectedLiteral { position: usize },

    /// Arguments that can never describe a date (unknown calendar name, malformed relative date).
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Another edit controller currently holds the editor lock.
    #[error("An edit controller is still active, can't activate another edit controller")]
    EditorLockHeld,

    /// The controller releasing the lock is not the one holding it.
    #[error("The specified edit controller is not the currently active one")]
    EditorLockNotOwner,

    /// An editor was requested on a grid that is not editable.
    #[error("Grid is not editable")]
    NotEditable,

    /// `add_cell_css_styles` was called with a key that already exists.
    #[error("Cell CSS hash with key '{0}' already exists")]
    CssStylesExist(String),

    /// The operation needs a module or option that is not installed.
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),

    /// Configuration layer could not be merged or is not an object.
    #[error("Configuration: {0}")]
    Config(String),

    /// Configuration layer failed to deserialize.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridcalError>;

impl GridcalError {
    /// True for the three positional parse failures.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MissingNumber { .. } | Self::UnknownName { .. } | Self::UnexpectedLiteral { .. }
        )
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridcalError> for wasm_bindgen::JsValue {
    fn from(e: GridcalError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
