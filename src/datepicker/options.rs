//! Picker configuration: date specifications, year ranges and options.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::calendar::{
    parse_date, CalendarDate, CalendarKind, FormatSettings, Period, ShortYearCutoff,
};
use crate::error::{GridcalError, Result};

/// A date given in configuration.
///
/// JSON accepts `null`/`"Infinity"` (unbounded), a number of days from
/// today, a date in the picker's format, or an offset string such as
/// `"+1m -2w"` (units `d`, `w`, `m`, `y`; a bare number means days).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DateSpec {
    #[default]
    Unbounded,
    Date(CalendarDate),
    Days(i64),
    Text(String),
}

impl DateSpec {
    /// Resolve against `today`. `Unbounded` yields `None`.
    pub fn resolve(
        &self,
        kind: CalendarKind,
        format: &str,
        settings: &FormatSettings,
        today: &CalendarDate,
    ) -> Result<Option<CalendarDate>> {
        match self {
            Self::Unbounded => Ok(None),
            Self::Date(date) => date.convert(kind).map(Some),
            Self::Days(n) => {
                let n = i32::try_from(*n).map_err(|_| {
                    GridcalError::InvalidArguments(format!("day offset {n} out of range"))
                })?;
                today.add(n, Period::Day).map(Some)
            }
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() || text.eq_ignore_ascii_case("infinity") {
                    return Ok(None);
                }
                if let Ok(Some(date)) = parse_date(kind, format, text, settings) {
                    return Ok(Some(date));
                }
                apply_offsets(today, text).map(Some)
            }
        }
    }
}

/// Apply every `[+-]N[dwmy]` term of `text` to `start`.
pub(crate) fn apply_offsets(start: &CalendarDate, text: &str) -> Result<CalendarDate> {
    let bad = || GridcalError::InvalidArguments(format!("bad date offset '{text}'"));
    let chars: Vec<char> = text.chars().collect();
    let mut date = *start;
    let mut i = 0;
    let mut terms = 0;
    while i < chars.len() {
        let Some(&c) = chars.get(i) else { break };
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let negative = c == '-';
        if c == '+' || c == '-' {
            i += 1;
        }
        let digits_start = i;
        while chars.get(i).is_some_and(char::is_ascii_digit) {
            i += 1;
        }
        let digits: String = chars.get(digits_start..i).ok_or_else(bad)?.iter().collect();
        let amount: i32 = digits.parse().map_err(|_| bad())?;
        while chars.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        let period = match chars.get(i).and_then(|&c| Period::from_letter(c)) {
            Some(p) => {
                i += 1;
                p
            }
            None => Period::Day,
        };
        date = date.add(if negative { -amount } else { amount }, period)?;
        terms += 1;
    }
    if terms == 0 {
        return Err(bad());
    }
    Ok(date)
}

impl Serialize for DateSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Unbounded => serializer.serialize_none(),
            Self::Date(date) => serializer.serialize_str(&date.to_string()),
            Self::Days(n) => serializer.serialize_i64(*n),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for DateSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::Unbounded),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Days)
                .ok_or_else(|| serde::de::Error::custom("day offset must be an integer")),
            Value::String(text) if text.eq_ignore_ascii_case("infinity") => Ok(Self::Unbounded),
            Value::String(text) => Ok(Self::Text(text)),
            other => Err(serde::de::Error::custom(format!(
                "expected a date, offset or null, got {other}"
            ))),
        }
    }
}

/// One end of a [`YearRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearBound {
    Absolute(i32),
    /// `+n`/`-n`: relative to today's year.
    FromToday(i32),
    /// `c+n`/`c-n`: relative to the displayed year.
    FromDrawn(i32),
}

impl YearBound {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(rest) = text.strip_prefix(['c', 'C']) {
            let rest = rest.trim();
            let n = if rest.is_empty() {
                0
            } else {
                rest.strip_prefix('+').unwrap_or(rest).parse().ok()?
            };
            return Some(Self::FromDrawn(n));
        }
        match text.chars().next()? {
            '+' => text.get(1..)?.parse().ok().map(Self::FromToday),
            '-' => text.parse().ok().map(Self::FromToday),
            _ => text.parse().ok().map(Self::Absolute),
        }
    }

    fn resolve(self, drawn_year: i32, today_year: i32) -> i32 {
        match self {
            Self::Absolute(y) => y,
            Self::FromToday(n) => today_year.saturating_add(n),
            Self::FromDrawn(n) => drawn_year.saturating_add(n),
        }
    }
}

impl fmt::Display for YearBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(y) => write!(f, "{y}"),
            Self::FromToday(n) => write!(f, "{n:+}"),
            Self::FromDrawn(n) => write!(f, "c{n:+}"),
        }
    }
}

/// Years offered by the year selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearRange {
    /// Free entry.
    Any,
    Span(YearBound, YearBound),
}

impl Default for YearRange {
    fn default() -> Self {
        Self::Span(YearBound::FromDrawn(-10), YearBound::FromDrawn(10))
    }
}

impl YearRange {
    /// Parse `"c-10:c+10"`, `"-5:+5"`, `"1990:2030"` or `"any"`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("any") {
            return Ok(Self::Any);
        }
        let bad = || GridcalError::InvalidArguments(format!("bad year range '{text}'"));
        let (start, end) = text.split_once(':').ok_or_else(bad)?;
        Ok(Self::Span(
            YearBound::parse(start).ok_or_else(bad)?,
            YearBound::parse(end).ok_or_else(bad)?,
        ))
    }

    /// First and last year to offer, clipped to the min/max dates. `None`
    /// for [`YearRange::Any`]. A descending range stays descending. A span
    /// lying wholly outside the min/max window collapses to the window edge
    /// nearest to it.
    pub fn resolve(
        self,
        drawn_year: i32,
        today_year: i32,
        min: Option<&CalendarDate>,
        max: Option<&CalendarDate>,
    ) -> Option<(i32, i32)> {
        let Self::Span(start, end) = self else {
            return None;
        };
        let start = start.resolve(drawn_year, today_year);
        let end = end.resolve(drawn_year, today_year);
        let lo = min.map_or(i32::MIN, CalendarDate::year);
        let hi = max.map_or(i32::MAX, CalendarDate::year);
        let edge = |below: bool| if below { lo } else { hi };
        if start <= end {
            let (first, last) = (start.max(lo), end.min(hi));
            if first > last {
                let y = edge(end < lo);
                return Some((y, y));
            }
            Some((first, last))
        } else {
            let (first, last) = (start.min(hi), end.max(lo));
            if first < last {
                let y = edge(start < lo);
                return Some((y, y));
            }
            Some((first, last))
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Span(start, end) => write!(f, "{start}:{end}"),
        }
    }
}

impl Serialize for YearRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Every recognized picker option. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PickerOptions {
    pub calendar: CalendarKind,
    /// Pattern for the input field; the calendar's regional default when absent.
    pub date_format: Option<String>,
    pub min_date: DateSpec,
    pub max_date: DateSpec,
    /// Date highlighted when nothing is selected; today when unbounded.
    pub default_date: DateSpec,
    /// Select `default_date` when the picker opens with no selection.
    pub select_default_date: bool,
    pub range_select: bool,
    /// Maximum number of dates to pick; 0 disables multi-select.
    pub multi_select: usize,
    pub range_separator: String,
    pub multi_separator: String,
    pub year_range: YearRange,
    pub months_to_step: i32,
    pub months_to_jump: i32,
    /// First day of the week (0 = Sunday); the calendar's when absent.
    pub first_day: Option<u32>,
    pub short_year_cutoff: ShortYearCutoff,
    /// Quiet period before typed text is parsed, in ms.
    pub input_sync_delay: f64,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            calendar: CalendarKind::Gregorian,
            date_format: None,
            min_date: DateSpec::Unbounded,
            max_date: DateSpec::Unbounded,
            default_date: DateSpec::Unbounded,
            select_default_date: false,
            range_select: false,
            multi_select: 0,
            range_separator: " - ".to_string(),
            multi_separator: ",".to_string(),
            year_range: YearRange::default(),
            months_to_step: 1,
            months_to_jump: 12,
            first_day: None,
            short_year_cutoff: ShortYearCutoff::default(),
            input_sync_delay: 300.0,
        }
    }
}

impl PickerOptions {
    /// Build options from JSON layers applied left to right over the defaults.
    pub fn from_layers(layers: &[Value]) -> Result<Self> {
        let options: Self = crate::config::from_layers(layers)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.range_select && self.multi_select > 0 {
            return Err(GridcalError::Config(
                "rangeSelect and multiSelect are mutually exclusive".to_string(),
            ));
        }
        if self.months_to_step < 1 || self.months_to_jump < 1 {
            return Err(GridcalError::Config(
                "monthsToStep and monthsToJump must be at least 1".to_string(),
            ));
        }
        if self.first_day.is_some_and(|d| d > 6) {
            return Err(GridcalError::Config("firstDay must be 0..=6".to_string()));
        }
        Ok(())
    }

    pub fn date_format(&self) -> &str {
        self.date_format
            .as_deref()
            .unwrap_or(self.calendar.regional().date_format)
    }

    pub fn first_day(&self) -> u32 {
        self.first_day.unwrap_or_else(|| self.calendar.first_day())
    }

    pub fn format_settings(&self) -> FormatSettings {
        FormatSettings::for_calendar(self.calendar).with_short_year_cutoff(self.short_year_cutoff)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn g(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarKind::Gregorian.new_date(y, m, d).unwrap()
    }

    #[test]
    fn test_offsets_accumulate() {
        let start = g(2024, 1, 31);
        assert_eq!(apply_offsets(&start, "+1m").unwrap(), g(2024, 2, 29));
        assert_eq!(apply_offsets(&start, "+1m -2w").unwrap(), g(2024, 2, 15));
        assert_eq!(apply_offsets(&start, "3").unwrap(), g(2024, 2, 3));
        assert_eq!(apply_offsets(&start, "-1Y").unwrap(), g(2023, 1, 31));
        assert!(apply_offsets(&start, "soon").is_err());
    }

    #[test]
    fn test_date_spec_from_json() {
        let specs: Vec<DateSpec> =
            serde_json::from_value(json!([null, "Infinity", 5, "+1w", "2024-03-05"])).unwrap();
        assert_eq!(specs[0], DateSpec::Unbounded);
        assert_eq!(specs[1], DateSpec::Unbounded);
        assert_eq!(specs[2], DateSpec::Days(5));
        assert_eq!(specs[3], DateSpec::Text("+1w".into()));
    }

    #[test]
    fn test_date_spec_prefers_formatted_date() {
        let kind = CalendarKind::Gregorian;
        let settings = FormatSettings::for_calendar(kind).with_reference_year(2024);
        let today = g(2024, 6, 1);
        let spec = DateSpec::Text("2024-03-05".into());
        assert_eq!(
            spec.resolve(kind, "yyyy-mm-dd", &settings, &today).unwrap(),
            Some(g(2024, 3, 5))
        );
        let spec = DateSpec::Text("-1d".into());
        assert_eq!(
            spec.resolve(kind, "yyyy-mm-dd", &settings, &today).unwrap(),
            Some(g(2024, 5, 31))
        );
        assert_eq!(
            DateSpec::Days(-1).resolve(kind, "yyyy-mm-dd", &settings, &today).unwrap(),
            Some(g(2024, 5, 31))
        );
    }

    #[test]
    fn test_year_range_parse_and_resolve() {
        let r = YearRange::parse("c-10:c+10").unwrap();
        assert_eq!(r, YearRange::default());
        assert_eq!(r.resolve(2000, 2024, None, None), Some((1990, 2010)));

        let r = YearRange::parse("-5:+5").unwrap();
        assert_eq!(r.resolve(2000, 2024, None, None), Some((2019, 2029)));

        let r = YearRange::parse("1990:2030").unwrap();
        let min = g(1995, 1, 1);
        assert_eq!(r.resolve(2000, 2024, Some(&min), None), Some((1995, 2030)));

        assert_eq!(YearRange::parse("any").unwrap().resolve(1, 1, None, None), None);
        assert!(YearRange::parse("1990").is_err());
        assert_eq!(YearRange::parse("c-2:c+3").unwrap().to_string(), "c-2:c+3");
    }

    #[test]
    fn test_year_range_outside_bounds_collapses_to_nearest_edge() {
        let r = YearRange::parse("1990:2000").unwrap();
        let min = g(2010, 1, 1);
        assert_eq!(r.resolve(2000, 2024, Some(&min), None), Some((2010, 2010)));
        let max = g(1980, 1, 1);
        assert_eq!(r.resolve(2000, 2024, None, Some(&max)), Some((1980, 1980)));

        let r = YearRange::parse("2000:1990").unwrap();
        assert_eq!(r.resolve(2000, 2024, Some(&min), None), Some((2010, 2010)));
        assert_eq!(r.resolve(2000, 2024, None, Some(&max)), Some((1980, 1980)));
        // Overlapping spans are clipped as usual.
        let max = g(1995, 6, 1);
        assert_eq!(r.resolve(2000, 2024, None, Some(&max)), Some((1995, 1990)));
    }

    #[test]
    fn test_picker_options_layers() {
        let o = PickerOptions::from_layers(&[
            json!({"rangeSelect": true, "yearRange": "1990:2030"}),
            json!({"minDate": "-1m"}),
        ])
        .unwrap();
        assert!(o.range_select);
        assert_eq!(o.min_date, DateSpec::Text("-1m".into()));
        assert_eq!(o.date_format(), CalendarKind::Gregorian.regional().date_format);

        let err =
            PickerOptions::from_layers(&[json!({"rangeSelect": true, "multiSelect": 2})]).unwrap_err();
        assert!(matches!(err, GridcalError::Config(_)));
    }
}
