//! Umm al-Qura calendar (Saudi Arabia).
//!
//! There is no reliable closed form for this calendar, so month boundaries come
//! from a sorted table of lunation starts expressed as Modified Chronological
//! Julian Day Numbers (MCJDN = JDN - 2,400,000 + 0.5). Lookups binary-search
//! the table for the bracket containing a day.
//!
//! Only 1356-1500 AH is tabulated. Month lengths requested outside the table
//! fall back to 30 days, which is a known approximation and not extended.

use super::islamic::{DAY_NAMES, DAY_NAMES_SHORT, MONTH_NAMES, MONTH_NAMES_SHORT};
use super::ummalqura_data::{FIRST_YEAR, LAST_YEAR, LUNATION_STARTS};
use super::{CalendarRules, Regional};

const MCJDN_OFFSET: f64 = 2_400_000.0 - 0.5;

const DAYS_PER_MONTH_FALLBACK: u32 = 30;

static REGIONAL: Regional = Regional {
    month_names: MONTH_NAMES,
    month_names_short: MONTH_NAMES_SHORT,
    day_names: DAY_NAMES,
    day_names_short: DAY_NAMES_SHORT,
    date_format: "yyyy/mm/dd",
    first_day: 6,
    is_rtl: false,
};

/// Umm al-Qura calendar rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct UmmAlQura;

/// Table index of the lunation starting (year, month).
fn lunation_index(year: i32, month: u32) -> Option<usize> {
    let months = i64::from(year - FIRST_YEAR) * 12 + i64::from(month) - 1;
    usize::try_from(months).ok()
}

/// Index of the lunation containing `mcjdn`, if the table brackets it.
fn lunation_containing(mcjdn: i64) -> Option<usize> {
    let after = LUNATION_STARTS.partition_point(|&start| i64::from(start) <= mcjdn);
    if after == 0 || after >= LUNATION_STARTS.len() {
        return None;
    }
    Some(after - 1)
}

/// Length of the lunation containing `mcjdn`; 30 when the table does not cover it.
fn lunation_length(mcjdn: i64) -> u32 {
    lunation_containing(mcjdn)
        .and_then(|index| {
            let start = LUNATION_STARTS.get(index)?;
            let end = LUNATION_STARTS.get(index + 1)?;
            u32::try_from(end - start).ok()
        })
        .unwrap_or(DAYS_PER_MONTH_FALLBACK)
}

impl CalendarRules for UmmAlQura {
    fn name(&self) -> &'static str {
        "UmmAlQura"
    }

    fn is_leap_year(&self, year: i32) -> bool {
        self.days_in_year(year) == 355
    }

    fn days_in_month(&self, year: i32, month: u32) -> u32 {
        let start = lunation_index(year, month).and_then(|i| LUNATION_STARTS.get(i));
        match start {
            Some(&mcjdn) if (1..=12).contains(&month) => lunation_length(i64::from(mcjdn)),
            _ => DAYS_PER_MONTH_FALLBACK,
        }
    }

    fn to_jd(&self, year: i32, month: u32, day: u32) -> Option<f64> {
        if !self.supports_year(year) || !(1..=12).contains(&month) {
            return None;
        }
        let start = LUNATION_STARTS.get(lunation_index(year, month)?)?;
        let mcjdn = f64::from(*start) + f64::from(day) - 1.0;
        Some(mcjdn + MCJDN_OFFSET)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_jd(&self, jd: f64) -> Option<(i32, u32, u32)> {
        let mcjdn = (jd - MCJDN_OFFSET).floor();
        if !mcjdn.is_finite() {
            return None;
        }
        let mcjdn = mcjdn as i64;
        let index = lunation_containing(mcjdn)?;
        let start = i64::from(*LUNATION_STARTS.get(index)?);
        let year = FIRST_YEAR + i32::try_from(index / 12).ok()?;
        let month = u32::try_from(index % 12).ok()? + 1;
        let day = u32::try_from(mcjdn - start + 1).ok()?;
        Some((year, month, day))
    }

    fn supports_year(&self, year: i32) -> bool {
        (FIRST_YEAR..=LAST_YEAR).contains(&year)
    }

    fn is_week_day(&self, day_of_week: u32) -> bool {
        day_of_week != 5
    }

    fn regional(&self) -> &'static Regional {
        &REGIONAL
    }
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
    fn test_table_is_monotonic() {
        for pair in LUNATION_STARTS.windows(2) {
            let len = pair[1] - pair[0];
            assert!(len == 29 || len == 30, "lunation of {len} days");
        }
        assert_eq!(
            LUNATION_STARTS.len(),
            usize::try_from((LAST_YEAR - FIRST_YEAR + 1) * 12 + 1).unwrap()
        );
    }

    #[test]
    fn test_first_and_last_entries() {
        let cal = UmmAlQura;
        // 1 Muharram 1356 AH = 1937-03-14
        assert_eq!(cal.to_jd(1356, 1, 1), Some(2_428_606.5));
        assert_eq!(cal.from_jd(2_428_606.5), Some((1356, 1, 1)));
        let last_day = cal.days_in_month(1500, 12);
        assert!(last_day == 29 || last_day == 30);
        assert!(cal.to_jd(1500, 12, last_day).is_some());
    }

    #[test]
    fn test_outside_table() {
        let cal = UmmAlQura;
        assert!(!cal.supports_year(1355));
        assert!(!cal.supports_year(1501));
        assert_eq!(cal.to_jd(1501, 1, 1), None);
        assert_eq!(cal.from_jd(2_428_605.5), None);
        assert_eq!(cal.days_in_month(1600, 1), 30);
    }

    #[test]
    fn test_known_month_starts() {
        let cal = UmmAlQura;
        // 1 Ramadan 1445 AH = 2024-03-11
        assert_eq!(cal.to_jd(1445, 9, 1), Some(2_460_380.5));
        // 1 Muharram 1446 AH = 2024-07-07
        assert_eq!(cal.from_jd(2_460_498.5), Some((1446, 1, 1)));
    }

    #[test]
    fn test_year_length() {
        let cal = UmmAlQura;
        for year in FIRST_YEAR..=LAST_YEAR {
            let days = cal.days_in_year(year);
            assert!(days == 354 || days == 355, "year {year} has {days} days");
            assert_eq!(cal.is_leap_year(year), days == 355);
        }
    }
}
