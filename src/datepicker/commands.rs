//! Picker commands and their keystrokes.
//!
//! Each command pairs a keystroke with an enabled predicate, the date it
//! would move to, and the action itself. `handle_key` dispatches to the first
//! enabled command whose keystroke matches, so `current` shadows `today`
//! while something is selected.

use serde::{Deserialize, Serialize};

use super::DatePicker;
use crate::calendar::{CalendarDate, Period};
use crate::error::Result;
use crate::events::{keys, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PickerAction {
    Prev,
    PrevJump,
    Next,
    NextJump,
    Current,
    Today,
    Clear,
    Close,
    PrevWeek,
    PrevDay,
    NextDay,
    NextWeek,
}

/// Key plus the Ctrl/Cmd and Alt state it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key_code: u32,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyStroke {
    const fn plain(key_code: u32) -> Self {
        Self {
            key_code,
            ctrl: false,
            alt: false,
        }
    }

    const fn ctrl(key_code: u32) -> Self {
        Self {
            key_code,
            ctrl: true,
            alt: false,
        }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.key_code == self.key_code
            && key.modifiers.command() == self.ctrl
            && key.modifiers.alt == self.alt
    }
}

pub struct Command {
    pub action: PickerAction,
    pub keystroke: KeyStroke,
    pub enabled: fn(&DatePicker) -> Result<bool>,
    /// Date the command moves to, where that is meaningful.
    pub date: fn(&DatePicker) -> Result<Option<CalendarDate>>,
    pub run: fn(&mut DatePicker) -> Result<()>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("action", &self.action)
            .field("keystroke", &self.keystroke)
            .finish_non_exhaustive()
    }
}

fn step(p: &DatePicker) -> i32 {
    p.options().months_to_step
}

fn jump(p: &DatePicker) -> i32 {
    p.options().months_to_jump
}

fn months_from_draw(p: &DatePicker, offset: i32) -> Result<Option<CalendarDate>> {
    p.draw_date().add(offset, Period::Month).map(Some)
}

fn days_from_draw(p: &DatePicker, offset: i32) -> Result<Option<CalendarDate>> {
    p.draw_date().add(offset, Period::Day).map(Some)
}

fn day_selectable(p: &DatePicker, offset: i32) -> Result<bool> {
    Ok(p.is_selectable(&p.draw_date().add(offset, Period::Day)?))
}

fn always(_: &DatePicker) -> Result<bool> {
    Ok(true)
}

fn no_date(_: &DatePicker) -> Result<Option<CalendarDate>> {
    Ok(None)
}

fn prev_enabled(p: &DatePicker) -> Result<bool> {
    p.month_has_selectable(-step(p))
}

fn prev_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    months_from_draw(p, -step(p))
}

fn prev_run(p: &mut DatePicker) -> Result<()> {
    p.change_month(-step(p))
}

fn prev_jump_enabled(p: &DatePicker) -> Result<bool> {
    p.month_has_selectable(-jump(p))
}

fn prev_jump_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    months_from_draw(p, -jump(p))
}

fn prev_jump_run(p: &mut DatePicker) -> Result<()> {
    p.change_month(-jump(p))
}

fn next_enabled(p: &DatePicker) -> Result<bool> {
    p.month_has_selectable(step(p))
}

fn next_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    months_from_draw(p, step(p))
}

fn next_run(p: &mut DatePicker) -> Result<()> {
    p.change_month(step(p))
}

fn next_jump_enabled(p: &DatePicker) -> Result<bool> {
    p.month_has_selectable(jump(p))
}

fn next_jump_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    months_from_draw(p, jump(p))
}

fn next_jump_run(p: &mut DatePicker) -> Result<()> {
    p.change_month(jump(p))
}

fn current_enabled(p: &DatePicker) -> Result<bool> {
    Ok(p.selected().first().is_some_and(|d| p.is_selectable(d)))
}

fn current_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    Ok(p.selected().first().copied())
}

fn current_run(p: &mut DatePicker) -> Result<()> {
    match p.selected().first().copied() {
        Some(date) => p.show_date(&date),
        None => Ok(()),
    }
}

fn today_enabled(p: &DatePicker) -> Result<bool> {
    Ok(p.is_selectable(&p.today()?))
}

fn today_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    p.today().map(Some)
}

fn today_run(p: &mut DatePicker) -> Result<()> {
    let today = p.today()?;
    p.show_date(&today)
}

fn clear_run(p: &mut DatePicker) -> Result<()> {
    p.clear();
    Ok(())
}

fn close_run(p: &mut DatePicker) -> Result<()> {
    p.hide();
    Ok(())
}

fn prev_week_enabled(p: &DatePicker) -> Result<bool> {
    day_selectable(p, -days_in_week(p))
}

fn prev_week_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    days_from_draw(p, -days_in_week(p))
}

fn prev_week_run(p: &mut DatePicker) -> Result<()> {
    p.change_day(-days_in_week(p))
}

fn prev_day_enabled(p: &DatePicker) -> Result<bool> {
    day_selectable(p, -1)
}

fn prev_day_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    days_from_draw(p, -1)
}

fn prev_day_run(p: &mut DatePicker) -> Result<()> {
    p.change_day(-1)
}

fn next_day_enabled(p: &DatePicker) -> Result<bool> {
    day_selectable(p, 1)
}

fn next_day_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    days_from_draw(p, 1)
}

fn next_day_run(p: &mut DatePicker) -> Result<()> {
    p.change_day(1)
}

fn next_week_enabled(p: &DatePicker) -> Result<bool> {
    day_selectable(p, days_in_week(p))
}

fn next_week_date(p: &DatePicker) -> Result<Option<CalendarDate>> {
    days_from_draw(p, days_in_week(p))
}

fn next_week_run(p: &mut DatePicker) -> Result<()> {
    p.change_day(days_in_week(p))
}

fn days_in_week(p: &DatePicker) -> i32 {
    i32::try_from(p.options().calendar.days_in_week()).unwrap_or(7)
}

/// Command table, in dispatch order.
pub static COMMANDS: [Command; 12] = [
    Command {
        action: PickerAction::Prev,
        keystroke: KeyStroke::plain(keys::PAGE_UP),
        enabled: prev_enabled,
        date: prev_date,
        run: prev_run,
    },
    Command {
        action: PickerAction::PrevJump,
        keystroke: KeyStroke::ctrl(keys::PAGE_UP),
        enabled: prev_jump_enabled,
        date: prev_jump_date,
        run: prev_jump_run,
    },
    Command {
        action: PickerAction::Next,
        keystroke: KeyStroke::plain(keys::PAGE_DOWN),
        enabled: next_enabled,
        date: next_date,
        run: next_run,
    },
    Command {
        action: PickerAction::NextJump,
        keystroke: KeyStroke::ctrl(keys::PAGE_DOWN),
        enabled: next_jump_enabled,
        date: next_jump_date,
        run: next_jump_run,
    },
    Command {
        action: PickerAction::Current,
        keystroke: KeyStroke::ctrl(keys::HOME),
        enabled: current_enabled,
        date: current_date,
        run: current_run,
    },
    Command {
        action: PickerAction::Today,
        keystroke: KeyStroke::ctrl(keys::HOME),
        enabled: today_enabled,
        date: today_date,
        run: today_run,
    },
    Command {
        action: PickerAction::Clear,
        keystroke: KeyStroke::ctrl(keys::END),
        enabled: always,
        date: no_date,
        run: clear_run,
    },
    Command {
        action: PickerAction::Close,
        keystroke: KeyStroke::plain(keys::ESCAPE),
        enabled: always,
        date: no_date,
        run: close_run,
    },
    Command {
        action: PickerAction::PrevWeek,
        keystroke: KeyStroke::ctrl(keys::UP),
        enabled: prev_week_enabled,
        date: prev_week_date,
        run: prev_week_run,
    },
    Command {
        action: PickerAction::PrevDay,
        keystroke: KeyStroke::ctrl(keys::LEFT),
        enabled: prev_day_enabled,
        date: prev_day_date,
        run: prev_day_run,
    },
    Command {
        action: PickerAction::NextDay,
        keystroke: KeyStroke::ctrl(keys::RIGHT),
        enabled: next_day_enabled,
        date: next_day_date,
        run: next_day_run,
    },
    Command {
        action: PickerAction::NextWeek,
        keystroke: KeyStroke::ctrl(keys::DOWN),
        enabled: next_week_enabled,
        date: next_week_date,
        run: next_week_run,
    },
];

pub fn command(action: PickerAction) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.action == action)
}

/// First command bound to `key` that is currently enabled.
pub fn command_for_key(picker: &DatePicker, key: &KeyEvent) -> Result<Option<&'static Command>> {
    for c in &COMMANDS {
        if c.keystroke.matches(key) && (c.enabled)(picker)? {
            return Ok(Some(c));
        }
    }
    Ok(None)
}
