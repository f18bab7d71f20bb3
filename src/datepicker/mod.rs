//! Headless multi-calendar date picker.
//!
//! [`DatePicker`] owns the selection, the drawn month and the text of the
//! attached input. The host forwards clicks (`select_date`), keystrokes
//! (`handle_key`), typed text (`input_changed` + `tick`) and renders from
//! [`DatePicker::month_view`].

mod commands;
mod options;

use serde::Serialize;
use tracing::{debug, trace};

use crate::calendar::{format_date, parse_date, CalendarDate, CalendarKind, FormatSettings, Period};
use crate::error::{GridcalError, Result};
use crate::events::{keys, Event, KeyEvent};
use crate::timers::Debouncer;

pub use commands::{command, command_for_key, Command, KeyStroke, PickerAction, COMMANDS};
pub use options::{DateSpec, PickerOptions, YearBound, YearRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PickerPhase {
    Closed,
    Open,
    /// Range mode, first endpoint chosen.
    PickingRangeEnd,
}

/// One day slot of the drawn month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: CalendarDate,
    pub selectable: bool,
    pub selected: bool,
    pub today: bool,
    /// The keyboard cursor (draw date).
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub day_headers: Vec<String>,
    /// Rows of `days_in_week` slots; `None` pads days outside the month.
    pub weeks: Vec<Vec<Option<DayCell>>>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub years: Option<Vec<i32>>,
}

/// Dates of `year`/`month` laid out in weeks starting on `first_day`.
pub fn month_weeks(
    kind: CalendarKind,
    year: i32,
    month: u32,
    first_day: u32,
) -> Result<Vec<Vec<Option<CalendarDate>>>> {
    let week_len = kind.days_in_week();
    if week_len == 0 || first_day >= week_len {
        return Err(GridcalError::InvalidArguments(format!(
            "first day {first_day} outside a {week_len}-day week"
        )));
    }
    let first = kind.new_date(year, month, 1)?;
    let lead = (first.day_of_week() + week_len - first_day) % week_len;
    let mut slots: Vec<Option<CalendarDate>> = (0..lead).map(|_| None).collect();
    for day in 1..=first.days_in_month() {
        slots.push(Some(kind.new_date(year, month, day)?));
    }
    let week_len = usize::try_from(week_len).unwrap_or(7);
    while slots.len() % week_len != 0 {
        slots.push(None);
    }
    Ok(slots.chunks(week_len).map(<[_]>::to_vec).collect())
}

#[derive(Debug)]
pub struct DatePicker {
    options: PickerOptions,
    settings: FormatSettings,
    today_override: Option<CalendarDate>,
    min: Option<CalendarDate>,
    max: Option<CalendarDate>,
    default_date: CalendarDate,
    phase: PickerPhase,
    selected: Vec<CalendarDate>,
    draw_date: CalendarDate,
    input_text: String,
    input_sync: Debouncer<String>,
    pub on_select: Event<Vec<CalendarDate>>,
    /// (year, month) of the newly drawn month.
    pub on_change_month_year: Event<(i32, u32)>,
    pub on_close: Event<Vec<CalendarDate>>,
}

impl DatePicker {
    pub fn new(options: PickerOptions) -> Result<Self> {
        Self::build(options, None)
    }

    /// A picker whose notion of today is fixed.
    pub fn with_today(options: PickerOptions, today: CalendarDate) -> Result<Self> {
        Self::build(options, Some(today))
    }

    fn build(options: PickerOptions, today_override: Option<CalendarDate>) -> Result<Self> {
        options.validate()?;
        let kind = options.calendar;
        let today_override = today_override.map(|d| d.convert(kind)).transpose()?;
        let today = match today_override {
            Some(d) => d,
            None => kind.today()?,
        };
        let mut settings = options.format_settings();
        if today_override.is_some() {
            settings = settings.with_reference_year(today.year());
        }
        let format = options.date_format();
        let min = options.min_date.resolve(kind, format, &settings, &today)?;
        let max = options.max_date.resolve(kind, format, &settings, &today)?;
        if let (Some(lo), Some(hi)) = (&min, &max) {
            if lo > hi {
                return Err(GridcalError::Config(format!(
                    "minDate {lo} is after maxDate {hi}"
                )));
            }
        }
        let default_date = options
            .default_date
            .resolve(kind, format, &settings, &today)?
            .unwrap_or(today);
        let input_sync = Debouncer::new(options.input_sync_delay);
        let mut picker = Self {
            options,
            settings,
            today_override,
            min,
            max,
            default_date,
            phase: PickerPhase::Closed,
            selected: Vec::new(),
            draw_date: default_date,
            input_text: String::new(),
            input_sync,
            on_select: Event::new(),
            on_change_month_year: Event::new(),
            on_close: Event::new(),
        };
        picker.default_date = picker.clamp(default_date);
        picker.draw_date = picker.default_date;
        Ok(picker)
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn calendar(&self) -> CalendarKind {
        self.options.calendar
    }

    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != PickerPhase::Closed
    }

    pub fn selected(&self) -> &[CalendarDate] {
        &self.selected
    }

    pub fn draw_date(&self) -> CalendarDate {
        self.draw_date
    }

    pub fn min_date(&self) -> Option<CalendarDate> {
        self.min
    }

    pub fn max_date(&self) -> Option<CalendarDate> {
        self.max
    }

    pub fn today(&self) -> Result<CalendarDate> {
        match self.today_override {
            Some(d) => Ok(d),
            None => self.options.calendar.today(),
        }
    }

    /// Text currently held by the attached input.
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// The selection formatted for the input field.
    pub fn input_value(&self) -> String {
        let separator = if self.options.range_select {
            &self.options.range_separator
        } else {
            &self.options.multi_separator
        };
        self.selected
            .iter()
            .map(|d| format_date(self.options.date_format(), d, &self.settings))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Within min/max. Dates of another calendar are converted first.
    pub fn is_selectable(&self, date: &CalendarDate) -> bool {
        let Ok(date) = date.convert(self.options.calendar) else {
            return false;
        };
        self.min.map_or(true, |m| date >= m) && self.max.map_or(true, |m| date <= m)
    }

    fn clamp(&self, date: CalendarDate) -> CalendarDate {
        match (self.min, self.max) {
            (Some(lo), _) if date < lo => lo,
            (_, Some(hi)) if date > hi => hi,
            _ => date,
        }
    }

    /// Whether the month `offset` months from the drawn one holds any
    /// selectable day.
    pub fn month_has_selectable(&self, offset: i32) -> Result<bool> {
        let target = self.draw_date.add(offset, Period::Month)?;
        let first = target.set(1, Period::Day)?;
        let last_day = i32::try_from(target.days_in_month()).unwrap_or(1);
        let last = target.set(last_day, Period::Day)?;
        Ok(self.min.map_or(true, |m| last >= m) && self.max.map_or(true, |m| first <= m))
    }

    fn set_draw(&mut self, date: CalendarDate) {
        let moved = (date.year(), date.month()) != (self.draw_date.year(), self.draw_date.month());
        self.draw_date = date;
        if moved {
            self.on_change_month_year
                .notify(&(date.year(), date.month()));
        }
    }

    fn shaped(&self, mut dates: Vec<CalendarDate>) -> Vec<CalendarDate> {
        if self.options.range_select {
            return match (dates.first().copied(), dates.get(1).copied()) {
                (Some(a), Some(b)) if b < a => vec![b, a],
                (Some(a), Some(b)) => vec![a, b],
                (Some(a), None) => vec![a, a],
                _ => Vec::new(),
            };
        }
        let mut seen = Vec::with_capacity(dates.len());
        dates.retain(|d| {
            if seen.contains(d) {
                false
            } else {
                seen.push(*d);
                true
            }
        });
        dates.truncate(self.options.multi_select.max(1));
        dates
    }

    fn selection_changed(&mut self) {
        self.input_text = self.input_value();
        self.on_select.notify(&self.selected);
    }

    /// Open the popup on the first selected date, or the default date.
    pub fn show(&mut self) {
        if self.is_open() {
            return;
        }
        self.phase = PickerPhase::Open;
        if self.selected.is_empty() && self.options.select_default_date {
            self.selected = self.shaped(vec![self.default_date]);
            self.input_text = self.input_value();
        }
        let draw = self.selected.first().copied().unwrap_or(self.default_date);
        let draw = self.clamp(draw);
        self.set_draw(draw);
        debug!(calendar = self.options.calendar.name(), draw = %draw, "picker opened");
    }

    /// Close the popup. A range left half-picked keeps both endpoints on the
    /// first date.
    pub fn hide(&mut self) {
        if !self.is_open() {
            return;
        }
        self.phase = PickerPhase::Closed;
        self.input_sync.cancel();
        debug!(selected = self.selected.len(), "picker closed");
        self.on_close.notify(&self.selected);
    }

    /// Pick `date` as a click on its day cell would. Returns false when the
    /// date is out of bounds or the multi-select limit is reached.
    pub fn select_date(&mut self, date: &CalendarDate) -> Result<bool> {
        let date = date.convert(self.options.calendar)?;
        if !self.is_selectable(&date) {
            debug!(date = %date, "date outside min/max");
            return Ok(false);
        }
        let close = if self.options.range_select {
            if self.phase == PickerPhase::PickingRangeEnd {
                let first = self.selected.first().copied().unwrap_or(date);
                self.selected = self.shaped(vec![first, date]);
                true
            } else {
                self.selected = vec![date, date];
                self.phase = PickerPhase::PickingRangeEnd;
                false
            }
        } else if self.options.multi_select > 0 {
            let limit = self.options.multi_select;
            if let Some(i) = self.selected.iter().position(|d| *d == date) {
                self.selected.remove(i);
            } else if self.selected.len() < limit {
                self.selected.push(date);
            } else {
                debug!(limit, "multi-select limit reached");
                return Ok(false);
            }
            self.selected.len() == limit
        } else {
            self.selected = vec![date];
            true
        };
        self.set_draw(date);
        self.selection_changed();
        if close {
            self.hide();
        }
        Ok(true)
    }

    /// Replace the selection. Dates are clamped to min/max and shaped for
    /// the selection mode.
    pub fn set_dates(&mut self, dates: &[CalendarDate]) -> Result<()> {
        let mut converted = Vec::with_capacity(dates.len());
        for d in dates {
            converted.push(self.clamp(d.convert(self.options.calendar)?));
        }
        self.selected = self.shaped(converted);
        if self.phase == PickerPhase::PickingRangeEnd {
            self.phase = PickerPhase::Open;
        }
        if let Some(first) = self.selected.first().copied() {
            self.set_draw(first);
        }
        self.input_text = self.input_value();
        Ok(())
    }

    /// Drop the selection and close.
    pub fn clear(&mut self) {
        self.selected.clear();
        if self.phase == PickerPhase::PickingRangeEnd {
            self.phase = PickerPhase::Open;
        }
        self.selection_changed();
        self.hide();
    }

    pub fn change_month(&mut self, offset: i32) -> Result<()> {
        let date = self.draw_date.add(offset, Period::Month)?;
        let date = self.clamp(date);
        self.set_draw(date);
        Ok(())
    }

    pub fn change_day(&mut self, offset: i32) -> Result<()> {
        let date = self.draw_date.add(offset, Period::Day)?;
        let date = self.clamp(date);
        self.set_draw(date);
        Ok(())
    }

    /// Draw `year`/`month`, keeping the current day where the month allows.
    pub fn show_month(&mut self, year: i32, month: u32, day: Option<u32>) -> Result<()> {
        let kind = self.options.calendar;
        let last = kind.days_in_month(year, month)?;
        let day = day.unwrap_or(self.draw_date.day()).clamp(1, last);
        let date = kind.new_date(year, month, day)?;
        let date = self.clamp(date);
        self.set_draw(date);
        Ok(())
    }

    pub fn show_date(&mut self, date: &CalendarDate) -> Result<()> {
        let date = self.clamp(date.convert(self.options.calendar)?);
        self.set_draw(date);
        Ok(())
    }

    /// Run `action` if it is enabled.
    pub fn perform_action(&mut self, action: PickerAction) -> Result<bool> {
        let Some(cmd) = command(action) else {
            return Ok(false);
        };
        if !(cmd.enabled)(self)? {
            return Ok(false);
        }
        (cmd.run)(self)?;
        Ok(true)
    }

    /// Keyboard handling. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<bool> {
        if !self.is_open() {
            let opens = command(PickerAction::Current).is_some_and(|c| c.keystroke.matches(key));
            if opens {
                self.show();
            }
            return Ok(opens);
        }
        match key.key_code {
            keys::TAB => {
                self.hide();
                return Ok(false);
            }
            keys::ENTER if key.modifiers.is_none() => {
                let draw = self.draw_date;
                self.select_date(&draw)?;
                return Ok(true);
            }
            _ => {}
        }
        match command_for_key(self, key)? {
            Some(cmd) => {
                trace!(action = ?cmd.action, "picker command");
                (cmd.run)(self)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Shortcuts typed into the input: `t` today, `+`/`-` one day from the
    /// current selection. Min/max are not enforced here.
    pub fn apply_shortcut(&mut self, ch: char) -> Result<bool> {
        let today = self.today()?;
        let base = self.selected.first().copied().unwrap_or(today);
        let date = match ch {
            't' | 'T' => today,
            '+' => base.add(1, Period::Day)?,
            '-' => base.add(-1, Period::Day)?,
            _ => return Ok(false),
        };
        self.selected = self.shaped(vec![date]);
        self.set_draw(date);
        self.selection_changed();
        Ok(true)
    }

    fn parse_input(&self, text: &str) -> Result<Vec<CalendarDate>> {
        let parts: Vec<&str> = if self.options.range_select {
            text.split(self.options.range_separator.as_str()).collect()
        } else if self.options.multi_select > 0 {
            text.split(self.options.multi_separator.as_str()).collect()
        } else {
            vec![text]
        };
        let mut dates = Vec::new();
        for part in parts {
            let part = part.trim();
            if let Some(date) =
                parse_date(self.options.calendar, self.options.date_format(), part, &self.settings)?
            {
                if self.is_selectable(&date) {
                    dates.push(date);
                }
            }
        }
        Ok(self.shaped(dates))
    }

    /// Parse `text` into the selection without rewriting the input. Returns
    /// false when nothing usable was found.
    pub fn sync_from_input(&mut self, text: &str) -> bool {
        self.input_text = text.to_string();
        match self.parse_input(text) {
            Ok(dates) if !dates.is_empty() => {
                self.selected = dates;
                if let Some(first) = self.selected.first().copied() {
                    self.set_draw(first);
                }
                self.on_select.notify(&self.selected);
                true
            }
            Ok(_) => false,
            Err(e) => {
                debug!(error = %e, text, "input not parsed");
                false
            }
        }
    }

    /// Record typed text; it is parsed once input has been quiet for
    /// `input_sync_delay`.
    pub fn input_changed(&mut self, text: &str, now_ms: f64) {
        self.input_text = text.to_string();
        self.input_sync.push(text.to_string(), now_ms);
    }

    /// Drive the input debounce. Returns true when the selection changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.input_sync.poll(now_ms) {
            Some(text) => self.sync_from_input(&text),
            None => false,
        }
    }

    pub fn is_selected(&self, date: &CalendarDate) -> bool {
        if self.options.range_select {
            if let (Some(a), Some(b)) = (self.selected.first(), self.selected.get(1)) {
                return date >= a && date <= b;
            }
        }
        self.selected.contains(date)
    }

    /// Years for the year selector, `None` when entry is free.
    pub fn year_options(&self) -> Result<Option<Vec<i32>>> {
        let today = self.today()?;
        let range = self.options.year_range.resolve(
            self.draw_date.year(),
            today.year(),
            self.min.as_ref(),
            self.max.as_ref(),
        );
        Ok(range.map(|(start, end)| {
            if start <= end {
                (start..=end).collect()
            } else {
                (end..=start).rev().collect()
            }
        }))
    }

    /// Render model of the drawn month.
    pub fn month_view(&self) -> Result<MonthView> {
        let kind = self.options.calendar;
        let first_day = self.options.first_day();
        let today = self.today()?;
        let (year, month) = (self.draw_date.year(), self.draw_date.month());
        let weeks = month_weeks(kind, year, month, first_day)?
            .into_iter()
            .map(|week| {
                week.into_iter()
                    .map(|slot| {
                        slot.map(|date| DayCell {
                            date,
                            selectable: self.is_selectable(&date),
                            selected: self.is_selected(&date),
                            today: date == today,
                            highlighted: date == self.draw_date,
                        })
                    })
                    .collect()
            })
            .collect();
        let names = &self.settings.day_names_short;
        let shift = usize::try_from(first_day).unwrap_or(0);
        let day_headers = (0..names.len())
            .filter_map(|i| names.get((i + shift) % names.len()).cloned())
            .collect();
        let month_name = usize::try_from(month)
            .ok()
            .and_then(|m| self.settings.month_names.get(m.wrapping_sub(1)))
            .cloned()
            .unwrap_or_default();
        Ok(MonthView {
            year,
            month,
            month_name,
            day_headers,
            weeks,
            prev_enabled: self.month_has_selectable(-self.options.months_to_step)?,
            next_enabled: self.month_has_selectable(self.options.months_to_step)?,
            years: self.year_options()?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::events::Modifiers;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn g(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarKind::Gregorian.new_date(y, m, d).unwrap()
    }

    fn picker(options: PickerOptions) -> DatePicker {
        DatePicker::with_today(options, g(2024, 3, 15)).unwrap()
    }

    fn ctrl(code: u32) -> KeyEvent {
        KeyEvent::with_modifiers(code, Modifiers::CTRL)
    }

    #[test]
    fn test_single_select_closes_and_formats() {
        let mut p = picker(PickerOptions {
            date_format: Some("yyyy-mm-dd".to_string()),
            ..PickerOptions::default()
        });
        p.show();
        assert!(p.select_date(&g(2024, 3, 20)).unwrap());
        assert_eq!(p.phase(), PickerPhase::Closed);
        assert_eq!(p.input_text(), "2024-03-20");
    }

    #[test]
    fn test_range_select_orders_endpoints() {
        let mut p = picker(PickerOptions {
            range_select: true,
            date_format: Some("yyyy-mm-dd".to_string()),
            ..PickerOptions::default()
        });
        p.show();
        p.select_date(&g(2024, 3, 20)).unwrap();
        assert_eq!(p.phase(), PickerPhase::PickingRangeEnd);
        p.select_date(&g(2024, 3, 10)).unwrap();
        assert_eq!(p.selected(), &[g(2024, 3, 10), g(2024, 3, 20)]);
        assert_eq!(p.input_text(), "2024-03-10 - 2024-03-20");
        assert!(!p.is_open());
    }

    #[test]
    fn test_hiding_mid_range_keeps_first_endpoint() {
        let mut p = picker(PickerOptions {
            range_select: true,
            ..PickerOptions::default()
        });
        p.show();
        p.select_date(&g(2024, 3, 20)).unwrap();
        p.hide();
        assert_eq!(p.selected(), &[g(2024, 3, 20), g(2024, 3, 20)]);
    }

    #[test]
    fn test_multi_select_limit() {
        let mut p = picker(PickerOptions {
            multi_select: 2,
            ..PickerOptions::default()
        });
        p.show();
        assert!(p.select_date(&g(2024, 3, 1)).unwrap());
        assert!(p.select_date(&g(2024, 3, 1)).unwrap());
        assert!(p.selected().is_empty());
        p.select_date(&g(2024, 3, 1)).unwrap();
        p.select_date(&g(2024, 3, 2)).unwrap();
        assert!(!p.is_open());
        assert!(!p.select_date(&g(2024, 3, 3)).unwrap());
        assert_eq!(p.selected().len(), 2);
    }

    #[test]
    fn test_min_max_bound_selection_and_navigation() {
        let mut p = picker(PickerOptions {
            min_date: DateSpec::Days(-5),
            max_date: DateSpec::Text("+1m".to_string()),
            ..PickerOptions::default()
        });
        assert_eq!(p.min_date(), Some(g(2024, 3, 10)));
        assert_eq!(p.max_date(), Some(g(2024, 4, 15)));
        p.show();
        assert!(!p.select_date(&g(2024, 3, 9)).unwrap());
        assert!(!p.perform_action(PickerAction::Prev).unwrap());
        assert!(p.perform_action(PickerAction::Next).unwrap());
        assert_eq!(p.draw_date(), g(2024, 4, 15));
        assert!(!p.perform_action(PickerAction::Next).unwrap());
    }

    #[test]
    fn test_ctrl_home_prefers_current_selection() {
        let mut p = picker(PickerOptions::default());
        assert!(p.handle_key(&ctrl(keys::HOME)).unwrap());
        assert!(p.is_open());
        p.select_date(&g(2024, 1, 5)).unwrap();
        p.show();
        p.change_month(3).unwrap();
        assert!(p.handle_key(&ctrl(keys::HOME)).unwrap());
        assert_eq!(p.draw_date(), g(2024, 1, 5));
        p.clear();
        p.show();
        p.change_month(3).unwrap();
        p.handle_key(&ctrl(keys::HOME)).unwrap();
        assert_eq!(p.draw_date(), g(2024, 3, 15));
    }

    #[test]
    fn test_keyboard_day_moves_and_enter() {
        let mut p = picker(PickerOptions::default());
        p.show();
        p.handle_key(&ctrl(keys::RIGHT)).unwrap();
        p.handle_key(&ctrl(keys::DOWN)).unwrap();
        assert_eq!(p.draw_date(), g(2024, 3, 23));
        assert!(p.handle_key(&KeyEvent::new(keys::ENTER)).unwrap());
        assert_eq!(p.selected(), &[g(2024, 3, 23)]);
        assert!(!p.is_open());
    }

    #[test]
    fn test_month_change_notifies() {
        let mut p = picker(PickerOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        p.on_change_month_year
            .subscribe(move |_, ym| sink.borrow_mut().push(*ym));
        p.show();
        p.handle_key(&KeyEvent::new(keys::PAGE_DOWN)).unwrap();
        p.handle_key(&ctrl(keys::PAGE_UP)).unwrap();
        assert_eq!(*seen.borrow(), vec![(2024, 4), (2023, 4)]);
    }

    #[test]
    fn test_shortcuts_ignore_bounds() {
        let mut p = picker(PickerOptions {
            max_date: DateSpec::Days(0),
            ..PickerOptions::default()
        });
        assert!(p.apply_shortcut('t').unwrap());
        assert!(p.apply_shortcut('+').unwrap());
        assert_eq!(p.selected(), &[g(2024, 3, 16)]);
        assert!(!p.apply_shortcut('x').unwrap());
    }

    #[test]
    fn test_typed_input_is_debounced() {
        let mut p = picker(PickerOptions {
            date_format: Some("mm/dd/yyyy".to_string()),
            ..PickerOptions::default()
        });
        p.input_changed("03/0", 0.0);
        p.input_changed("03/05/2024", 100.0);
        assert!(!p.tick(350.0));
        assert!(p.tick(400.0));
        assert_eq!(p.selected(), &[g(2024, 3, 5)]);
        assert_eq!(p.input_text(), "03/05/2024");
        assert!(!p.sync_from_input("garbage"));
        assert_eq!(p.selected(), &[g(2024, 3, 5)]);
    }

    #[test]
    fn test_month_weeks_layout() {
        let weeks = month_weeks(CalendarKind::Gregorian, 2024, 2, 0).unwrap();
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][..4].iter().all(Option::is_none));
        assert_eq!(weeks[0][4], Some(g(2024, 2, 1)));
        let monday = month_weeks(CalendarKind::Gregorian, 2024, 2, 1).unwrap();
        assert_eq!(monday[0][3], Some(g(2024, 2, 1)));
        assert!(month_weeks(CalendarKind::Gregorian, 2024, 2, 7).is_err());
    }

    #[test]
    fn test_month_view_marks_days() {
        let mut p = picker(PickerOptions {
            first_day: Some(0),
            ..PickerOptions::default()
        });
        p.set_dates(&[g(2024, 3, 1)]).unwrap();
        let view = p.month_view().unwrap();
        assert_eq!((view.year, view.month), (2024, 3));
        assert_eq!(view.day_headers.len(), 7);
        let cells: Vec<&DayCell> = view.weeks.iter().flatten().flatten().collect();
        assert_eq!(cells.len(), 31);
        assert!(cells[0].selected && cells[0].highlighted);
        assert!(cells[14].today);
        assert_eq!(view.years.as_ref().map(Vec::len), Some(21));
    }

    #[test]
    fn test_min_after_max_rejected() {
        let err = DatePicker::with_today(
            PickerOptions {
                min_date: DateSpec::Days(5),
                max_date: DateSpec::Days(0),
                ..PickerOptions::default()
            },
            g(2024, 3, 15),
        );
        assert!(err.is_err());
    }
}
