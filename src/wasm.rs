//! Browser bindings for the calendar engine and the date picker.

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::calendar::{self, CalendarDate, CalendarKind};
use crate::datepicker::{DatePicker, PickerAction, PickerOptions};
use crate::events::{KeyEvent, Modifiers};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn date_from_js(calendar: &str, year: i32, month: u32, day: u32) -> Result<CalendarDate, JsValue> {
    Ok(CalendarKind::from_name(calendar)?.new_date(year, month, day)?)
}

/// Format a date of `calendar` with `pattern`.
///
/// # Errors
/// Returns an error for an unknown calendar or an invalid date.
#[wasm_bindgen(js_name = "formatDate")]
pub fn format_date(
    calendar: &str,
    pattern: &str,
    year: i32,
    month: u32,
    day: u32,
) -> Result<String, JsValue> {
    let date = date_from_js(calendar, year, month, day)?;
    Ok(date.format(pattern))
}

/// Parse `text` with `pattern`; `null` for empty text.
///
/// # Errors
/// Returns the parse error message.
#[wasm_bindgen(js_name = "parseDate")]
pub fn parse_date(calendar: &str, pattern: &str, text: &str) -> Result<JsValue, JsValue> {
    let kind = CalendarKind::from_name(calendar)?;
    let settings = calendar::FormatSettings::for_calendar(kind);
    let date = calendar::parse_date(kind, pattern, text, &settings)?;
    to_js(&date)
}

/// Convert a date between calendars.
///
/// # Errors
/// Returns an error when either calendar is unknown or the date does not
/// exist in the target calendar's supported range.
#[wasm_bindgen(js_name = "convertDate")]
pub fn convert_date(
    from: &str,
    to: &str,
    year: i32,
    month: u32,
    day: u32,
) -> Result<JsValue, JsValue> {
    let date = date_from_js(from, year, month, day)?;
    to_js(&date.convert(CalendarKind::from_name(to)?)?)
}

#[wasm_bindgen(js_name = "DatePicker")]
pub struct JsDatePicker {
    picker: DatePicker,
}

#[wasm_bindgen(js_class = "DatePicker")]
impl JsDatePicker {
    /// Create a picker from a plain options object.
    ///
    /// # Errors
    /// Returns an error for unknown or inconsistent options.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsDatePicker, JsValue> {
        console_error_panic_hook::set_once();
        let layer: serde_json::Value = if options.is_undefined() || options.is_null() {
            serde_json::Value::Null
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        let options = PickerOptions::from_layers(&[layer])?;
        Ok(Self {
            picker: DatePicker::new(options)?,
        })
    }

    /// Call `callback(dates)` whenever the selection changes.
    #[wasm_bindgen(js_name = "onSelect")]
    pub fn on_select(&self, callback: Function) {
        self.picker.on_select.subscribe(move |_, dates| {
            if let Ok(value) = to_js(dates) {
                let _ = callback.call1(&JsValue::NULL, &value);
            }
        });
    }

    #[wasm_bindgen(js_name = "onClose")]
    pub fn on_close(&self, callback: Function) {
        self.picker.on_close.subscribe(move |_, dates| {
            if let Ok(value) = to_js(dates) {
                let _ = callback.call1(&JsValue::NULL, &value);
            }
        });
    }

    pub fn show(&mut self) {
        self.picker.show();
    }

    pub fn hide(&mut self) {
        self.picker.hide();
    }

    pub fn clear(&mut self) {
        self.picker.clear();
    }

    #[wasm_bindgen(js_name = "isOpen")]
    pub fn is_open(&self) -> bool {
        self.picker.is_open()
    }

    /// Select a day of the picker's calendar, as a click on it would.
    ///
    /// # Errors
    /// Returns an error for an invalid date.
    #[wasm_bindgen(js_name = "selectDate")]
    pub fn select_date(&mut self, year: i32, month: u32, day: u32) -> Result<bool, JsValue> {
        let date = self.picker.calendar().new_date(year, month, day)?;
        Ok(self.picker.select_date(&date)?)
    }

    /// # Errors
    /// Returns an error for an invalid year or month.
    #[wasm_bindgen(js_name = "showMonth")]
    pub fn show_month(&mut self, year: i32, month: u32) -> Result<(), JsValue> {
        Ok(self.picker.show_month(year, month, None)?)
    }

    /// Run a named action (`prev`, `nextJump`, `today`, ...).
    ///
    /// # Errors
    /// Returns an error for an unknown action name.
    #[wasm_bindgen(js_name = "performAction")]
    pub fn perform_action(&mut self, action: &str) -> Result<bool, JsValue> {
        let action: PickerAction = serde_json::from_value(serde_json::Value::from(action))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.picker.perform_action(action)?)
    }

    /// Feed a keydown. Returns true when the picker consumed it; the caller
    /// should then prevent the default action.
    ///
    /// # Errors
    /// Returns an error when date arithmetic leaves the calendar's range.
    #[wasm_bindgen(js_name = "handleKeyDown")]
    pub fn handle_key_down(&mut self, event: &KeyboardEvent) -> Result<bool, JsValue> {
        let key = KeyEvent::with_modifiers(
            event.key_code(),
            Modifiers {
                shift: event.shift_key(),
                ctrl: event.ctrl_key(),
                alt: event.alt_key(),
                meta: event.meta_key(),
            },
        );
        let handled = self.picker.handle_key(&key)?;
        if handled {
            event.prevent_default();
        }
        Ok(handled)
    }

    /// Feed a typed character while the picker is closed.
    ///
    /// # Errors
    /// Returns an error when date arithmetic leaves the calendar's range.
    #[wasm_bindgen(js_name = "applyShortcut")]
    pub fn apply_shortcut(&mut self, key: &str) -> Result<bool, JsValue> {
        match key.chars().next() {
            Some(ch) if key.chars().count() == 1 => Ok(self.picker.apply_shortcut(ch)?),
            _ => Ok(false),
        }
    }

    #[wasm_bindgen(js_name = "inputChanged")]
    pub fn input_changed(&mut self, text: &str, now_ms: f64) {
        self.picker.input_changed(text, now_ms);
    }

    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.picker.tick(now_ms)
    }

    #[wasm_bindgen(js_name = "inputValue")]
    pub fn input_value(&self) -> String {
        self.picker.input_value()
    }

    /// # Errors
    /// Returns an error when serialization fails.
    pub fn selected(&self) -> Result<JsValue, JsValue> {
        to_js(&self.picker.selected())
    }

    /// Render model of the drawn month.
    ///
    /// # Errors
    /// Returns an error when the drawn month cannot be laid out.
    #[wasm_bindgen(js_name = "monthView")]
    pub fn month_view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.picker.month_view()?)
    }
}
