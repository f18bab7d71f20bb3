//! gridcal - headless data grid and multi-calendar date picker for the web
//!
//! Two engines that share an event/timer core and compile both natively and
//! to WebAssembly:
//! - [`grid`]: virtualized rows, keyboard navigation, selection models,
//!   editors behind a grid-wide lock
//! - [`datepicker`]: single, range and multi selection over the Gregorian,
//!   Islamic and Umm al-Qura calendars in [`calendar`]
//!
//! Rendering is delegated to a host [`grid::Surface`]; time is passed in by
//! the host through `tick(now_ms)`.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { DatePicker, convertDate } from 'gridcal';
//! await init();
//! const picker = new DatePicker({ calendar: 'ummalqura', rangeSelect: true });
//! input.addEventListener('keydown', (e) => picker.handleKeyDown(e));
//! ```

pub mod calendar;
mod config;
pub mod datepicker;
pub mod error;
pub mod events;
pub mod grid;
pub mod timers;
pub mod tooltip;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use calendar::{CalendarDate, CalendarKind, Period};
pub use datepicker::{DatePicker, PickerOptions};
pub use error::{GridcalError, Result};
pub use grid::{Grid, GridOptions};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
