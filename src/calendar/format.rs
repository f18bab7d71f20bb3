//! Date pattern mini-language shared by formatting and parsing.
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `d` / `dd` | day of month, unpadded / two digits |
//! | `o` / `oo` | day of year, unpadded / three digits |
//! | `w` / `ww` | week of year, unpadded / two digits |
//! | `D` / `DD` | short / long day name |
//! | `m` / `mm` | month, unpadded / two digits |
//! | `M` / `MM` | short / long month name |
//! | `yy` / `yyyy` | two-digit / full year |
//! | `YYYY` | signed, padded year |
//! | `J` | Julian day |
//! | `@` | unix seconds |
//! | `!` | .NET ticks |
//! | `*` | (parse only) ignore the rest of the text |
//! | `'...'` | literal text, `''` is a quote |

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{
    CalendarDate, CalendarKind, Period, SECS_PER_DAY, TICKS_EPOCH_JD, TICKS_PER_DAY, UNIX_EPOCH_JD,
};
use crate::error::{GridcalError, Result};

/// How two-digit years are placed in a century.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortYearCutoff {
    /// Offset from the reference year's two-digit year (`"+10"`).
    Relative(i32),
    /// Fixed two-digit cutoff (`50`).
    Absolute(i32),
}

impl Default for ShortYearCutoff {
    fn default() -> Self {
        Self::Relative(10)
    }
}

impl ShortYearCutoff {
    /// Parse `"+10"` style (relative) or `"50"` style (absolute) cutoffs.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let bad = || GridcalError::InvalidArguments(format!("bad short year cutoff '{text}'"));
        match text.strip_prefix('+') {
            Some(rest) => rest.parse().map(Self::Relative).map_err(|_| bad()),
            None => text.parse().map(Self::Absolute).map_err(|_| bad()),
        }
    }

    /// Last two-digit year that belongs to the reference century.
    pub fn resolve(self, reference_year: i32) -> i32 {
        match self {
            Self::Relative(offset) => reference_year.rem_euclid(100) + offset,
            Self::Absolute(cutoff) => cutoff,
        }
    }
}

impl Serialize for ShortYearCutoff {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Relative(offset) => serializer.serialize_str(&format!("+{offset}")),
            Self::Absolute(cutoff) => serializer.serialize_i32(*cutoff),
        }
    }
}

impl<'de> Deserialize<'de> for ShortYearCutoff {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i32),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self::Absolute(n)),
            Raw::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}

/// Names and cutoff used when formatting or parsing.
#[derive(Debug, Clone)]
pub struct FormatSettings {
    pub day_names: Vec<String>,
    pub day_names_short: Vec<String>,
    pub month_names: Vec<String>,
    pub month_names_short: Vec<String>,
    pub short_year_cutoff: ShortYearCutoff,
    /// Year used for two-digit years and missing years; today's year when `None`.
    pub reference_year: Option<i32>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

impl FormatSettings {
    /// Regional names of the given calendar.
    pub fn for_calendar(kind: CalendarKind) -> Self {
        let regional = kind.regional();
        Self {
            day_names: owned(&regional.day_names),
            day_names_short: owned(&regional.day_names_short),
            month_names: owned(&regional.month_names),
            month_names_short: owned(&regional.month_names_short),
            short_year_cutoff: ShortYearCutoff::default(),
            reference_year: None,
        }
    }

    #[must_use]
    pub fn with_short_year_cutoff(mut self, cutoff: ShortYearCutoff) -> Self {
        self.short_year_cutoff = cutoff;
        self
    }

    #[must_use]
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    fn reference_year(&self, kind: CalendarKind) -> i32 {
        self.reference_year
            .or_else(|| kind.today().ok().map(|d| d.year()))
            .unwrap_or(1)
    }
}

/// Cursor over the pattern, shared by both directions.
struct Pattern {
    chars: Vec<char>,
    pos: usize,
}

impl Pattern {
    fn new(pattern: &str) -> Self {
        Self {
            chars: pattern.chars().collect(),
            pos: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consume repeats of the current token; true when it was written at least
    /// twice `step` times (`dd`, `yyyy`).
    fn doubled(&mut self, token: char, step: usize) -> bool {
        let mut matches = 1;
        while self.chars.get(self.pos + matches) == Some(&token) {
            matches += 1;
        }
        self.pos += matches - 1;
        matches / step.max(1) > 1
    }

    /// Consume the next char when it equals `token`.
    fn look_ahead(&mut self, token: char) -> bool {
        let hit = self.chars.get(self.pos + 1) == Some(&token);
        if hit {
            self.pos += 1;
        }
        hit
    }
}

fn pad(value: i64, width: usize, doubled: bool) -> String {
    if doubled {
        let sign = if value < 0 { "-" } else { "" };
        format!("{sign}{:0width$}", value.unsigned_abs())
    } else {
        value.to_string()
    }
}

fn name_at(names: &[String], index: u32) -> &str {
    usize::try_from(index)
        .ok()
        .and_then(|i| names.get(i))
        .map_or("", String::as_str)
}

#[allow(clippy::cast_possible_truncation)]
fn whole(value: f64) -> i64 {
    value.round() as i64
}

/// Render `date` according to `pattern`.
pub fn format_date(pattern: &str, date: &CalendarDate, settings: &FormatSettings) -> String {
    let mut out = String::new();
    let mut p = Pattern::new(pattern);
    let mut literal = false;
    while let Some(c) = p.current() {
        if literal {
            if c == '\'' && !p.look_ahead('\'') {
                literal = false;
            } else {
                out.push(c);
            }
            p.pos += 1;
            continue;
        }
        match c {
            'd' => {
                let d = p.doubled('d', 1);
                out.push_str(&pad(i64::from(date.day()), 2, d));
            }
            'D' => {
                let names = if p.doubled('D', 1) {
                    &settings.day_names
                } else {
                    &settings.day_names_short
                };
                out.push_str(name_at(names, date.day_of_week()));
            }
            'o' => {
                let d = p.doubled('o', 1);
                out.push_str(&pad(i64::from(date.day_of_year()), 3, d));
            }
            'w' => {
                let d = p.doubled('w', 1);
                out.push_str(&pad(i64::from(date.week_of_year()), 2, d));
            }
            'm' => {
                let d = p.doubled('m', 1);
                out.push_str(&pad(i64::from(date.month()), 2, d));
            }
            'M' => {
                let names = if p.doubled('M', 1) {
                    &settings.month_names
                } else {
                    &settings.month_names_short
                };
                out.push_str(name_at(names, date.month().saturating_sub(1)));
            }
            'y' => {
                if p.doubled('y', 2) {
                    out.push_str(&date.year().to_string());
                } else {
                    out.push_str(&pad(i64::from(date.year().rem_euclid(100)), 2, true));
                }
            }
            'Y' => {
                p.doubled('Y', 2);
                out.push_str(&date.format_year());
            }
            'J' => out.push_str(&date.to_jd().to_string()),
            '@' => {
                #[allow(clippy::cast_precision_loss)]
                let secs = (date.to_jd() - UNIX_EPOCH_JD) * SECS_PER_DAY as f64;
                out.push_str(&whole(secs).to_string());
            }
            '!' => {
                #[allow(clippy::cast_precision_loss)]
                let ticks = (date.to_jd() - TICKS_EPOCH_JD) * TICKS_PER_DAY as f64;
                out.push_str(&whole(ticks).to_string());
            }
            '\'' => {
                if p.look_ahead('\'') {
                    out.push('\'');
                } else {
                    literal = true;
                }
            }
            other => out.push(other),
        }
        p.pos += 1;
    }
    out
}

/// Cursor over the parsed text.
struct Input {
    chars: Vec<char>,
    pos: usize,
}

impl Input {
    /// Optional minus sign followed by up to `max_digits` digits.
    fn number(&mut self, max_digits: usize) -> Result<i64> {
        let start = self.pos;
        let mut end = start;
        if self.chars.get(end) == Some(&'-') {
            end += 1;
        }
        let digits_start = end;
        while end - digits_start < max_digits
            && self.chars.get(end).is_some_and(char::is_ascii_digit)
        {
            end += 1;
        }
        if end == digits_start {
            return Err(GridcalError::MissingNumber { position: start });
        }
        let text: String = self.chars.get(start..end).unwrap_or_default().iter().collect();
        let value = text
            .parse()
            .map_err(|_| GridcalError::MissingNumber { position: start })?;
        self.pos = end;
        Ok(value)
    }

    /// Index of the first name that prefixes the remaining text, case-insensitively.
    fn name(&mut self, names: &[String]) -> Result<usize> {
        let rest: String = self.chars.get(self.pos..).unwrap_or_default().iter().collect();
        let rest = rest.to_lowercase();
        for (i, name) in names.iter().enumerate() {
            if !name.is_empty() && rest.starts_with(&name.to_lowercase()) {
                self.pos += name.chars().count();
                return Ok(i);
            }
        }
        Err(GridcalError::UnknownName { position: self.pos })
    }

    fn literal(&mut self, expected: char) -> Result<()> {
        if self.chars.get(self.pos) == Some(&expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(GridcalError::UnexpectedLiteral { position: self.pos })
        }
    }
}

fn small(value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| GridcalError::InvalidArguments(format!("{value} out of range")))
}

fn unsigned(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Parse `text` according to `pattern`. Empty text yields `Ok(None)`.
///
/// Text left over after the pattern is exhausted is ignored.
#[allow(clippy::cast_precision_loss)]
pub fn parse_date(
    kind: CalendarKind,
    pattern: &str,
    text: &str,
    settings: &FormatSettings,
) -> Result<Option<CalendarDate>> {
    if text.is_empty() {
        return Ok(None);
    }
    let mut p = Pattern::new(pattern);
    let mut input = Input {
        chars: text.chars().collect(),
        pos: 0,
    };
    let mut year: Option<i64> = None;
    let mut month: Option<i64> = None;
    let mut day: Option<i64> = None;
    let mut day_of_year: Option<i64> = None;
    let mut jd: Option<f64> = None;
    let mut short_year = false;
    let mut literal = false;

    while let Some(c) = p.current() {
        if literal {
            if c == '\'' && !p.look_ahead('\'') {
                literal = false;
            } else {
                input.literal(c)?;
            }
            p.pos += 1;
            continue;
        }
        match c {
            'd' => {
                p.doubled('d', 1);
                day = Some(input.number(2)?);
            }
            'D' => {
                let names = if p.doubled('D', 1) {
                    &settings.day_names
                } else {
                    &settings.day_names_short
                };
                input.name(names)?;
            }
            'o' => {
                p.doubled('o', 1);
                day_of_year = Some(input.number(3)?);
            }
            'w' => {
                p.doubled('w', 1);
                input.number(2)?;
            }
            'm' => {
                p.doubled('m', 1);
                month = Some(input.number(2)?);
            }
            'M' => {
                let names = if p.doubled('M', 1) {
                    &settings.month_names
                } else {
                    &settings.month_names_short
                };
                month = Some(i64::try_from(input.name(names)?).unwrap_or(0) + 1);
            }
            'y' => {
                let full = p.doubled('y', 2);
                short_year = !full;
                year = Some(input.number(if full { 4 } else { 2 })?);
            }
            'Y' => {
                let full = p.doubled('Y', 2);
                year = Some(input.number(if full { 4 } else { 2 })?);
            }
            'J' => {
                let whole_days = input.number(10)?;
                if input.chars.get(input.pos) == Some(&'.') {
                    input.pos += 1;
                    input.number(10)?;
                }
                jd = Some(whole_days as f64 + 0.5);
            }
            '@' => {
                let secs = input.number(11)?;
                jd = Some(
                    (secs.div_euclid(SECS_PER_DAY)) as f64 + UNIX_EPOCH_JD,
                );
            }
            '!' => {
                let ticks = input.number(20)?;
                jd = Some(ticks.div_euclid(TICKS_PER_DAY) as f64 + TICKS_EPOCH_JD);
            }
            '*' => input.pos = input.chars.len(),
            '\'' => {
                if p.look_ahead('\'') {
                    input.literal('\'')?;
                } else {
                    literal = true;
                }
            }
            other => input.literal(other)?,
        }
        p.pos += 1;
    }

    if input.pos < input.chars.len() {
        tracing::debug!(
            text,
            pattern,
            position = input.pos,
            "ignoring trailing text after date"
        );
    }

    if let Some(jd) = jd {
        return kind.from_jd(jd).map(Some);
    }

    let reference = settings.reference_year(kind);
    let mut year = match year {
        Some(y) => small(y)?,
        None => reference,
    };
    if short_year && (0..100).contains(&year) {
        let cutoff = settings.short_year_cutoff.resolve(reference);
        let century = reference - reference.rem_euclid(100);
        year += century - if year <= cutoff { 0 } else { 100 };
    }

    let (month, day) = match day_of_year {
        Some(ordinal) => {
            let first = kind.new_date(year, 1, 1)?;
            let date = first.add(small(ordinal - 1)?, Period::Day)?;
            if date.year() != year {
                return Err(GridcalError::InvalidDate {
                    calendar: kind.name(),
                    year,
                    month: 1,
                    day: unsigned(ordinal),
                });
            }
            (date.month(), date.day())
        }
        None => (unsigned(month.unwrap_or(-1)), unsigned(day.unwrap_or(-1))),
    };
    kind.new_date(year, month, day).map(Some)
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

    fn greg() -> FormatSettings {
        FormatSettings::for_calendar(CalendarKind::Gregorian).with_reference_year(2026)
    }

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarKind::Gregorian.new_date(y, m, d).unwrap()
    }

    #[test]
    fn test_format_padded_and_unpadded() {
        let d = date(2024, 3, 5);
        assert_eq!(format_date("yyyy-mm-dd", &d, &greg()), "2024-03-05");
        assert_eq!(format_date("d/m/yy", &d, &greg()), "5/3/24");
        assert_eq!(format_date("oo", &d, &greg()), "065");
    }

    #[test]
    fn test_format_names_and_literals() {
        let d = date(2024, 3, 5);
        assert_eq!(
            format_date("DD, d MM yyyy", &d, &greg()),
            "Tuesday, 5 March 2024"
        );
        assert_eq!(format_date("D M", &d, &greg()), "Tue Mar");
        assert_eq!(format_date("'day' d 'o''clock'", &d, &greg()), "day 5 o'clock");
        assert_eq!(format_date("''", &d, &greg()), "'");
    }

    #[test]
    fn test_format_epoch_counts() {
        let d = date(1970, 1, 2);
        assert_eq!(format_date("@", &d, &greg()), "86400");
        assert_eq!(format_date("J", &d, &greg()), "2440588.5");
        let d = date(1, 1, 2);
        assert_eq!(format_date("!", &d, &greg()), "864000000000");
    }

    #[test]
    fn test_parse_roundtrip() {
        let d = date(2024, 3, 5);
        let parsed = parse_date(CalendarKind::Gregorian, "yyyy-mm-dd", "2024-03-05", &greg())
            .unwrap()
            .unwrap();
        assert_eq!(parsed, d);
        let parsed = parse_date(
            CalendarKind::Gregorian,
            "DD, d MM yyyy",
            "tuesday, 5 march 2024",
            &greg(),
        )
        .unwrap();
        assert_eq!(parsed, Some(d));
    }

    #[test]
    fn test_parse_short_year_cutoff() {
        // Reference 2026, cutoff +10 -> 36.
        let parsed = parse_date(CalendarKind::Gregorian, "mm/dd/yy", "01/02/36", &greg()).unwrap();
        assert_eq!(parsed.unwrap().year(), 2036);
        let parsed = parse_date(CalendarKind::Gregorian, "mm/dd/yy", "01/02/37", &greg()).unwrap();
        assert_eq!(parsed.unwrap().year(), 1937);
        let settings = greg().with_short_year_cutoff(ShortYearCutoff::Absolute(50));
        let parsed = parse_date(CalendarKind::Gregorian, "yy", "49", &settings);
        assert!(parsed.is_err(), "month and day are required");
        let parsed =
            parse_date(CalendarKind::Gregorian, "m/d/yy", "1/1/51", &settings).unwrap();
        assert_eq!(parsed.unwrap().year(), 1951);
    }

    #[test]
    fn test_parse_day_of_year() {
        let parsed = parse_date(CalendarKind::Gregorian, "yyyy-oo", "2024-065", &greg()).unwrap();
        assert_eq!(parsed, Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_parse_epoch_counts() {
        let parsed = parse_date(CalendarKind::Gregorian, "@", "86400", &greg()).unwrap();
        assert_eq!(parsed, Some(date(1970, 1, 2)));
        let parsed = parse_date(CalendarKind::Gregorian, "J", "2451544.5", &greg()).unwrap();
        assert_eq!(parsed, Some(date(2000, 1, 1)));
        let parsed = parse_date(CalendarKind::Gregorian, "!", "864000000000", &greg()).unwrap();
        assert_eq!(parsed, Some(date(1, 1, 2)));
    }

    #[test]
    fn test_parse_errors_are_positional() {
        let err = parse_date(CalendarKind::Gregorian, "yyyy-mm-dd", "2024-x3-05", &greg())
            .unwrap_err();
        assert!(matches!(err, GridcalError::MissingNumber { position: 5 }));
        let err = parse_date(CalendarKind::Gregorian, "yyyy-mm-dd", "2024/03/05", &greg())
            .unwrap_err();
        assert!(matches!(err, GridcalError::UnexpectedLiteral { position: 4 }));
        let err = parse_date(CalendarKind::Gregorian, "d MM yyyy", "5 Smarch 2024", &greg())
            .unwrap_err();
        assert!(matches!(err, GridcalError::UnknownName { position: 2 }));
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_parse_tolerates_trailing_text() {
        let parsed =
            parse_date(CalendarKind::Gregorian, "yyyy-mm-dd", "2024-03-05 extra", &greg()).unwrap();
        assert_eq!(parsed, Some(date(2024, 3, 5)));
        let parsed = parse_date(CalendarKind::Gregorian, "yyyy-mm-dd*", "2024-03-05T10", &greg())
            .unwrap();
        assert_eq!(parsed, Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_parse_empty_and_invalid() {
        assert_eq!(
            parse_date(CalendarKind::Gregorian, "yyyy-mm-dd", "", &greg()).unwrap(),
            None
        );
        let err = parse_date(CalendarKind::Gregorian, "yyyy-mm-dd", "2023-02-29", &greg())
            .unwrap_err();
        assert!(matches!(err, GridcalError::InvalidDate { .. }));
    }

    #[test]
    fn test_islamic_names() {
        let settings = FormatSettings::for_calendar(CalendarKind::Islamic);
        let d = CalendarKind::Islamic.new_date(1445, 9, 1).unwrap();
        assert_eq!(format_date("d MM yyyy", &d, &settings), "1 Ramadan 1445");
    }

    #[test]
    fn test_cutoff_serde() {
        let c: ShortYearCutoff = serde_json::from_str("\"+10\"").unwrap();
        assert_eq!(c, ShortYearCutoff::Relative(10));
        let c: ShortYearCutoff = serde_json::from_str("50").unwrap();
        assert_eq!(c, ShortYearCutoff::Absolute(50));
        assert_eq!(serde_json::to_string(&ShortYearCutoff::Relative(5)).unwrap(), "\"+5\"");
    }
}
