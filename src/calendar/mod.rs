//! Julian-day based calendar arithmetic.
//!
//! Every calendar converts to and from a Julian Day Number (JDN), which is the
//! calendar-agnostic interchange value. Three variants share the
//! [`CalendarRules`] interface:
//! - Gregorian (closed-form Meeus conversion)
//! - Islamic (arithmetic 30-year cycle)
//! - Umm al-Qura (table of lunation starts)
//!
//! None of the calendars has a year zero: arithmetic that crosses from year 1
//! to year -1 (or back) skips it.

mod format;
mod gregorian;
mod islamic;
mod ummalqura;
mod ummalqura_data;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GridcalError, Result};

pub use format::{format_date, parse_date, FormatSettings, ShortYearCutoff};
pub use gregorian::Gregorian;
pub use islamic::Islamic;
pub use ummalqura::UmmAlQura;

/// Julian day of the unix epoch (1970-01-01).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian day of 0001-01-01, the .NET ticks epoch.
pub const TICKS_EPOCH_JD: f64 = 1_721_425.5;

pub const SECS_PER_DAY: i64 = 86_400;

pub const TICKS_PER_DAY: i64 = 864_000_000_000;

/// Localized names and defaults for one calendar.
#[derive(Debug)]
pub struct Regional {
    pub month_names: [&'static str; 12],
    pub month_names_short: [&'static str; 12],
    pub day_names: [&'static str; 7],
    pub day_names_short: [&'static str; 7],
    /// Default pattern for `format_date`/`parse_date`.
    pub date_format: &'static str,
    /// First day of the week (0 = Sunday).
    pub first_day: u32,
    pub is_rtl: bool,
}

/// Pure calendar rules. Inputs are trusted: callers validate first.
pub trait CalendarRules: Sync {
    fn name(&self) -> &'static str;

    fn months_in_year(&self, _year: i32) -> u32 {
        12
    }

    fn is_leap_year(&self, year: i32) -> bool;

    fn days_in_month(&self, year: i32, month: u32) -> u32;

    fn days_in_year(&self, year: i32) -> u32 {
        (1..=self.months_in_year(year))
            .map(|m| self.days_in_month(year, m))
            .sum()
    }

    /// Julian day (x.5) of the given date, or `None` when the calendar cannot place it.
    fn to_jd(&self, year: i32, month: u32, day: u32) -> Option<f64>;

    /// Calendar date containing `jd`, or `None` when outside the calendar's range.
    fn from_jd(&self, jd: f64) -> Option<(i32, u32, u32)>;

    /// Whether `year` is inside the supported range.
    fn supports_year(&self, year: i32) -> bool {
        year != 0
    }

    /// Whether `day_of_week` (0 = Sunday) is a working day.
    fn is_week_day(&self, day_of_week: u32) -> bool;

    fn regional(&self) -> &'static Regional;
}

/// Calendar selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    #[default]
    Gregorian,
    Islamic,
    #[serde(rename = "ummalqura")]
    UmmAlQura,
}

/// Unit for [`CalendarKind::add`] and [`CalendarKind::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "d")]
    Day,
    #[serde(rename = "w")]
    Week,
    #[serde(rename = "m")]
    Month,
    #[serde(rename = "y")]
    Year,
}

impl Period {
    /// Parse the single-letter unit used in offset strings (`d`, `w`, `m`, `y`).
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'd' => Some(Self::Day),
            'w' => Some(Self::Week),
            'm' => Some(Self::Month),
            'y' => Some(Self::Year),
            _ => None,
        }
    }
}

static GREGORIAN: Gregorian = Gregorian;
static ISLAMIC: Islamic = Islamic;
static UMM_AL_QURA: UmmAlQura = UmmAlQura;

impl CalendarKind {
    pub const ALL: [CalendarKind; 3] = [Self::Gregorian, Self::Islamic, Self::UmmAlQura];

    pub fn rules(self) -> &'static dyn CalendarRules {
        match self {
            Self::Gregorian => &GREGORIAN,
            Self::Islamic => &ISLAMIC,
            Self::UmmAlQura => &UMM_AL_QURA,
        }
    }

    pub fn name(self) -> &'static str {
        self.rules().name()
    }

    /// Look up a calendar by name (`gregorian`, `islamic`, `ummalqura`).
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gregorian" | "" => Ok(Self::Gregorian),
            "islamic" | "hijri" => Ok(Self::Islamic),
            "ummalqura" | "umm-al-qura" | "umm_al_qura" => Ok(Self::UmmAlQura),
            other => Err(GridcalError::InvalidArguments(format!(
                "unknown calendar '{other}'"
            ))),
        }
    }

    pub fn regional(self) -> &'static Regional {
        self.rules().regional()
    }

    pub fn first_day(self) -> u32 {
        self.regional().first_day
    }

    pub fn days_in_week(self) -> u32 {
        7
    }

    fn validate_year(self, year: i32) -> Result<()> {
        if self.rules().supports_year(year) {
            Ok(())
        } else {
            Err(GridcalError::InvalidYear {
                calendar: self.name(),
                year,
            })
        }
    }

    fn validate_month(self, year: i32, month: u32) -> Result<()> {
        self.validate_year(year)?;
        if month >= 1 && month <= self.rules().months_in_year(year) {
            Ok(())
        } else {
            Err(GridcalError::InvalidMonth {
                calendar: self.name(),
                year,
                month,
            })
        }
    }

    /// Whether (year, month, day) exists in this calendar.
    pub fn is_valid(self, year: i32, month: u32, day: u32) -> bool {
        self.validate_month(year, month).is_ok()
            && day >= 1
            && day <= self.rules().days_in_month(year, month)
    }

    /// Construct a validated date.
    pub fn new_date(self, year: i32, month: u32, day: u32) -> Result<CalendarDate> {
        if self.is_valid(year, month, day) {
            Ok(CalendarDate {
                kind: self,
                year,
                month,
                day,
            })
        } else {
            Err(GridcalError::InvalidDate {
                calendar: self.name(),
                year,
                month,
                day,
            })
        }
    }

    pub fn is_leap_year(self, year: i32) -> Result<bool> {
        self.validate_year(year)?;
        Ok(self.rules().is_leap_year(year))
    }

    pub fn days_in_month(self, year: i32, month: u32) -> Result<u32> {
        self.validate_month(year, month)?;
        Ok(self.rules().days_in_month(year, month))
    }

    pub fn days_in_year(self, year: i32) -> Result<u32> {
        self.validate_year(year)?;
        Ok(self.rules().days_in_year(year))
    }

    pub fn months_in_year(self, year: i32) -> Result<u32> {
        self.validate_year(year)?;
        Ok(self.rules().months_in_year(year))
    }

    /// Julian day of a validated (year, month, day).
    pub fn to_jd(self, year: i32, month: u32, day: u32) -> Result<f64> {
        let date = self.new_date(year, month, day)?;
        Ok(date.to_jd())
    }

    /// Date in this calendar containing the given Julian day.
    pub fn from_jd(self, jd: f64) -> Result<CalendarDate> {
        if !jd.is_finite() {
            return Err(GridcalError::InvalidArguments(format!(
                "julian day {jd} is not finite"
            )));
        }
        let (year, month, day) =
            self.rules()
                .from_jd(jd)
                .ok_or_else(|| GridcalError::InvalidArguments(format!(
                    "julian day {jd} is outside the {} calendar",
                    self.name()
                )))?;
        self.new_date(year, month, day)
    }

    /// Convert a Gregorian date into this calendar.
    pub fn from_gregorian(self, year: i32, month: u32, day: u32) -> Result<CalendarDate> {
        let jd = CalendarKind::Gregorian.to_jd(year, month, day)?;
        self.from_jd(jd)
    }

    /// Date for the given unix timestamp (seconds, UTC).
    pub fn from_unix_seconds(self, seconds: i64) -> Result<CalendarDate> {
        let days = seconds.div_euclid(SECS_PER_DAY);
        #[allow(clippy::cast_precision_loss)]
        let jd = UNIX_EPOCH_JD + days as f64;
        self.from_jd(jd)
    }

    /// Current date in this calendar.
    pub fn today(self) -> Result<CalendarDate> {
        self.from_unix_seconds(now_unix_seconds())
    }

    fn check_own(self, date: &CalendarDate) -> Result<()> {
        if date.kind != self {
            return Err(GridcalError::DifferentCalendars {
                left: self.name(),
                right: date.kind.name(),
            });
        }
        if !self.is_valid(date.year, date.month, date.day) {
            return Err(GridcalError::InvalidDate {
                calendar: self.name(),
                year: date.year,
                month: date.month,
                day: date.day,
            });
        }
        Ok(())
    }

    /// Add `offset` units to `date`.
    ///
    /// Days and weeks go through the Julian day and are exact. Months and years
    /// adjust the (year, month) pair and clamp the day to the target month.
    pub fn add(self, date: &CalendarDate, offset: i32, period: Period) -> Result<CalendarDate> {
        self.check_own(date)?;
        let ymd = self.add_raw(date, offset, period)?;
        let (year, month, day) = self.correct_add(date, ymd, offset, period)?;
        self.new_date(year, month, day)
    }

    fn add_raw(self, date: &CalendarDate, offset: i32, period: Period) -> Result<(i32, u32, u32)> {
        let rules = self.rules();
        match period {
            Period::Day | Period::Week => {
                let step = if period == Period::Week {
                    i64::from(self.days_in_week())
                } else {
                    1
                };
                #[allow(clippy::cast_precision_loss)]
                let jd = date.to_jd() + (i64::from(offset) * step) as f64;
                let moved = self.from_jd(jd)?;
                Ok((moved.year, moved.month, moved.day))
            }
            Period::Month | Period::Year => {
                let mut year = date.year;
                let mut month = i64::from(date.month);
                if period == Period::Year {
                    year = year.checked_add(offset).ok_or_else(|| {
                        GridcalError::InvalidArguments(format!("year offset {offset} overflows"))
                    })?;
                } else {
                    month += i64::from(offset);
                }
                while month < 1 {
                    year -= 1;
                    month += i64::from(rules.months_in_year(year));
                }
                let mut year_months = i64::from(rules.months_in_year(year));
                while month > year_months {
                    year += 1;
                    month -= year_months;
                    year_months = i64::from(rules.months_in_year(year));
                }
                let month = u32::try_from(month).unwrap_or(1);
                let day = date.day.min(rules.days_in_month(year, month));
                Ok((year, month, day))
            }
        }
    }

    /// Re-run a month/year addition that landed in or crossed year zero.
    fn correct_add(
        self,
        date: &CalendarDate,
        ymd: (i32, u32, u32),
        offset: i32,
        period: Period,
    ) -> Result<(i32, u32, u32)> {
        if !matches!(period, Period::Month | Period::Year) {
            return Ok(ymd);
        }
        let crossed = ymd.0 == 0 || (date.year > 0) != (ymd.0 > 0);
        if !crossed {
            return Ok(ymd);
        }
        let dir = if offset < 0 { -1 } else { 1 };
        let adjust = match period {
            Period::Year => 1,
            _ => i32::try_from(self.rules().months_in_year(-1)).unwrap_or(12),
        };
        self.add_raw(date, offset + dir * adjust, period)
    }

    /// Replace one component of `date`, clamping the day when the month changes.
    pub fn set(self, date: &CalendarDate, value: i32, period: Period) -> Result<CalendarDate> {
        self.check_own(date)?;
        let as_unsigned = || {
            u32::try_from(value)
                .map_err(|_| GridcalError::InvalidArguments(format!("{value} is not a month/day")))
        };
        let year = if period == Period::Year {
            value
        } else {
            date.year
        };
        let month = if period == Period::Month {
            as_unsigned()?
        } else {
            date.month
        };
        let mut day = if period == Period::Day {
            as_unsigned()?
        } else {
            date.day
        };
        if matches!(period, Period::Year | Period::Month) {
            self.validate_month(year, month)?;
            day = day.min(self.rules().days_in_month(year, month));
        }
        self.new_date(year, month, day)
    }

    /// Format with this calendar's regional names.
    pub fn format(self, pattern: &str, date: &CalendarDate) -> Result<String> {
        self.check_own(date)?;
        Ok(format_date(pattern, date, &FormatSettings::for_calendar(self)))
    }

    /// Parse text with this calendar's regional names. Empty text yields `None`.
    pub fn parse(self, pattern: &str, text: &str) -> Result<Option<CalendarDate>> {
        parse_date(self, pattern, text, &FormatSettings::for_calendar(self))
    }
}

impl fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable (year, month, day) bound to one calendar.
///
/// Instances are only produced through validated constructors, so every
/// date maps to exactly one Julian day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarDate {
    kind: CalendarKind,
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    pub fn kind(&self) -> CalendarKind {
        self.kind
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn to_jd(&self) -> f64 {
        // Validated on construction, so the rules can always place it.
        self.kind
            .rules()
            .to_jd(self.year, self.month, self.day)
            .unwrap_or(f64::NAN)
    }

    /// Day of week, 0 = Sunday.
    #[allow(clippy::cast_possible_truncation)]
    pub fn day_of_week(&self) -> u32 {
        let jdn = (self.to_jd() + 1.5).floor() as i64;
        u32::try_from(jdn.rem_euclid(7)).unwrap_or(0)
    }

    /// Ordinal day within the year, starting at 1.
    #[allow(clippy::cast_possible_truncation)]
    pub fn day_of_year(&self) -> u32 {
        let first = self.kind.rules().to_jd(self.year, 1, 1).unwrap_or(f64::NAN);
        let ordinal = (self.to_jd() - first) as i64 + 1;
        u32::try_from(ordinal).unwrap_or(1)
    }

    /// Week number: the week containing this week's Thursday.
    pub fn week_of_year(&self) -> u32 {
        let dow = self.day_of_week();
        let shift = 4 - i32::try_from(if dow == 0 { 7 } else { dow }).unwrap_or(7);
        match self.add(shift, Period::Day) {
            Ok(thursday) => (thursday.day_of_year() - 1) / 7 + 1,
            Err(_) => (self.day_of_year() - 1) / 7 + 1,
        }
    }

    pub fn is_leap_year(&self) -> bool {
        self.kind.rules().is_leap_year(self.year)
    }

    pub fn days_in_month(&self) -> u32 {
        self.kind.rules().days_in_month(self.year, self.month)
    }

    /// Whether this date falls on a working day of its calendar.
    pub fn is_week_day(&self) -> bool {
        self.kind.rules().is_week_day(self.day_of_week())
    }

    /// Year with sign and four-digit padding, e.g. `-0044`.
    pub fn format_year(&self) -> String {
        let sign = if self.year < 0 { "-" } else { "" };
        format!("{sign}{:04}", self.year.unsigned_abs())
    }

    pub fn add(&self, offset: i32, period: Period) -> Result<CalendarDate> {
        self.kind.add(self, offset, period)
    }

    pub fn set(&self, value: i32, period: Period) -> Result<CalendarDate> {
        self.kind.set(self, value, period)
    }

    /// Same day expressed in another calendar.
    pub fn convert(&self, kind: CalendarKind) -> Result<CalendarDate> {
        if kind == self.kind {
            return Ok(*self);
        }
        kind.from_jd(self.to_jd())
    }

    /// Three-way comparison. Dates from different calendars cannot be compared.
    pub fn compare_to(&self, other: &CalendarDate) -> Result<Ordering> {
        if self.kind != other.kind {
            return Err(GridcalError::DifferentCalendars {
                left: self.kind.name(),
                right: other.kind.name(),
            });
        }
        Ok((self.year, self.month, self.day).cmp(&(other.year, other.month, other.day)))
    }

    /// Format using the calendar's regional names.
    pub fn format(&self, pattern: &str) -> String {
        format_date(pattern, self, &FormatSettings::for_calendar(self.kind))
    }
}

impl PartialOrd for CalendarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare_to(other).ok()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.format_year(), self.month, self.day)
    }
}

#[cfg(target_arch = "wasm32")]
fn now_unix_seconds() -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let seconds = (js_sys::Date::now() / 1000.0).floor() as i64;
    seconds
}

#[cfg(not(target_arch = "wasm32"))]
fn now_unix_seconds() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_add_months_clamps_day() {
        let date = CalendarKind::Gregorian.new_date(2024, 1, 31).unwrap();
        let feb = date.add(1, Period::Month).unwrap();
        assert_eq!((feb.year(), feb.month(), feb.day()), (2024, 2, 29));
        let back = date.add(-2, Period::Month).unwrap();
        assert_eq!((back.year(), back.month(), back.day()), (2023, 11, 30));
    }

    #[test]
    fn test_add_years_skips_year_zero() {
        let date = CalendarKind::Gregorian.new_date(1, 6, 15).unwrap();
        let prev = date.add(-1, Period::Year).unwrap();
        assert_eq!(prev.year(), -1);
        let next = prev.add(1, Period::Year).unwrap();
        assert_eq!(next.year(), 1);
    }

    #[test]
    fn test_add_months_skips_year_zero() {
        let date = CalendarKind::Gregorian.new_date(1, 1, 10).unwrap();
        let prev = date.add(-1, Period::Month).unwrap();
        assert_eq!((prev.year(), prev.month()), (-1, 12));
        let next = prev.add(1, Period::Month).unwrap();
        assert_eq!((next.year(), next.month()), (1, 1));
    }

    #[test]
    fn test_add_days_crosses_year_zero() {
        let date = CalendarKind::Gregorian.new_date(1, 1, 1).unwrap();
        let prev = date.add(-1, Period::Day).unwrap();
        assert_eq!((prev.year(), prev.month(), prev.day()), (-1, 12, 31));
    }

    #[test]
    fn test_set_clamps_day() {
        let date = CalendarKind::Gregorian.new_date(2023, 3, 31).unwrap();
        let feb = date.set(2, Period::Month).unwrap();
        assert_eq!(feb.day(), 28);
        assert!(date.set(13, Period::Month).is_err());
        assert!(date.set(0, Period::Year).is_err());
    }

    #[test]
    fn test_compare_across_calendars_fails() {
        let g = CalendarKind::Gregorian.new_date(2024, 1, 1).unwrap();
        let i = g.convert(CalendarKind::Islamic).unwrap();
        assert!(matches!(
            g.compare_to(&i),
            Err(GridcalError::DifferentCalendars { .. })
        ));
        assert_eq!(g.partial_cmp(&i), None);
        assert_eq!(i.convert(CalendarKind::Gregorian).unwrap(), g);
    }

    #[test]
    fn test_day_of_week_and_year() {
        // 2000-01-01 was a Saturday.
        let date = CalendarKind::Gregorian.new_date(2000, 1, 1).unwrap();
        assert_eq!(date.day_of_week(), 6);
        assert_eq!(date.day_of_year(), 1);
        let dec = CalendarKind::Gregorian.new_date(2024, 12, 31).unwrap();
        assert_eq!(dec.day_of_year(), 366);
    }

    #[test]
    fn test_week_of_year() {
        // 2021-01-03 (Sunday) belongs to week 53 of 2020.
        let date = CalendarKind::Gregorian.new_date(2021, 1, 3).unwrap();
        assert_eq!(date.week_of_year(), 53);
        let date = CalendarKind::Gregorian.new_date(2021, 1, 4).unwrap();
        assert_eq!(date.week_of_year(), 1);
    }

    #[test]
    fn test_format_year_sign() {
        let date = CalendarKind::Gregorian.new_date(-44, 3, 15).unwrap();
        assert_eq!(date.format_year(), "-0044");
        assert_eq!(date.to_string(), "-0044-03-15");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            CalendarKind::from_name("UmmAlQura").unwrap(),
            CalendarKind::UmmAlQura
        );
        assert!(CalendarKind::from_name("julian").is_err());
    }
}
