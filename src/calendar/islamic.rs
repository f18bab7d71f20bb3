//! Arithmetic (tabular) Islamic calendar.
//!
//! Months alternate 30/29 days; Dhu al-Hijjah gains a day in the 11 leap
//! years of each 30-year cycle.

use super::{CalendarRules, Regional};

/// Julian day of 1 Muharram 1 AH.
const JD_EPOCH: f64 = 1_948_439.5;

const DAYS_PER_MONTH: [u32; 12] = [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29];

pub(super) static MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-awwal",
    "Rabi' al-thani",
    "Jumada al-awwal",
    "Jumada al-thani",
    "Rajab",
    "Sha'aban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

pub(super) static MONTH_NAMES_SHORT: [&str; 12] = [
    "Muh", "Saf", "Rab1", "Rab2", "Jum1", "Jum2", "Raj", "Sha'", "Ram", "Shaw", "DhuQ", "DhuH",
];

pub(super) static DAY_NAMES: [&str; 7] = [
    "Yawm al-ahad",
    "Yawm al-ithnayn",
    "Yawm ath-thulaathaa'",
    "Yawm al-arbi'aa'",
    "Yawm al-khamis",
    "Yawm al-jum'a",
    "Yawm as-sabt",
];

pub(super) static DAY_NAMES_SHORT: [&str; 7] = ["Aha", "Ith", "Thu", "Arb", "Kha", "Jum", "Sab"];

static REGIONAL: Regional = Regional {
    month_names: MONTH_NAMES,
    month_names_short: MONTH_NAMES_SHORT,
    day_names: DAY_NAMES,
    day_names_short: DAY_NAMES_SHORT,
    date_format: "yyyy/mm/dd",
    first_day: 6,
    is_rtl: false,
};

/// Tabular Islamic calendar rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Islamic;

/// Shift negative years so the 30-year cycle runs without a year zero.
fn cycle_year(year: i32) -> i64 {
    let year = i64::from(year);
    if year <= 0 {
        year + 1
    } else {
        year
    }
}

impl CalendarRules for Islamic {
    fn name(&self) -> &'static str {
        "Islamic"
    }

    fn is_leap_year(&self, year: i32) -> bool {
        let year = if year < 0 { i64::from(year) + 1 } else { i64::from(year) };
        (year * 11 + 14).rem_euclid(30) < 11
    }

    fn days_in_month(&self, year: i32, month: u32) -> u32 {
        let index = usize::try_from(month.saturating_sub(1)).unwrap_or(0);
        let base = DAYS_PER_MONTH.get(index).copied().unwrap_or(0);
        if month == 12 && self.is_leap_year(year) {
            base + 1
        } else {
            base
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_jd(&self, year: i32, month: u32, day: u32) -> Option<f64> {
        let year = cycle_year(year);
        let month_days = (29.5 * f64::from(month.saturating_sub(1))).ceil();
        let leap_days = (3 + 11 * year).div_euclid(30);
        Some(
            f64::from(day) + month_days + ((year - 1) * 354 + leap_days) as f64 + JD_EPOCH - 1.0,
        )
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_jd(&self, jd: f64) -> Option<(i32, u32, u32)> {
        let jd = jd.floor() + 0.5;
        let mut year = ((30.0 * (jd - JD_EPOCH) + 10646.0) / 10631.0).floor();
        if year <= 0.0 {
            year -= 1.0;
        }
        if !(year.is_finite() && year.abs() < f64::from(i32::MAX)) {
            return None;
        }
        let year = year as i32;
        let new_year = self.to_jd(year, 1, 1)?;
        let month = (((jd - 29.0 - new_year) / 29.5).ceil() + 1.0).min(12.0);
        let month = u32::try_from(month as i64).ok()?;
        let day = jd - self.to_jd(year, month, 1)? + 1.0;
        Some((year, month, u32::try_from(day as i64).ok()?))
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
    fn test_leap_years() {
        let cal = Islamic;
        // (11 * 2 + 14) mod 30 = 6 < 11
        assert!(cal.is_leap_year(2));
        assert!(cal.is_leap_year(5));
        assert!(cal.is_leap_year(7));
        assert!(cal.is_leap_year(29));
        assert!(!cal.is_leap_year(1));
        assert!(!cal.is_leap_year(3));
        assert!(!cal.is_leap_year(30));
    }

    #[test]
    fn test_year_lengths() {
        let cal = Islamic;
        assert_eq!(cal.days_in_year(2), 355);
        assert_eq!(cal.days_in_year(3), 354);
        let cycle: u32 = (1..=30).map(|y| cal.days_in_year(y)).sum();
        assert_eq!(cycle, 10631);
    }

    #[test]
    fn test_epoch() {
        let cal = Islamic;
        assert_eq!(cal.to_jd(1, 1, 1), Some(JD_EPOCH));
        assert_eq!(cal.from_jd(JD_EPOCH), Some((1, 1, 1)));
    }

    #[test]
    fn test_known_dates() {
        let cal = Islamic;
        // 2000-01-01 Gregorian
        assert_eq!(cal.from_jd(2_451_544.5), Some((1420, 9, 24)));
        // 2024-03-05 Gregorian
        assert_eq!(cal.from_jd(2_460_374.5), Some((1445, 8, 24)));
    }

    #[test]
    fn test_year_boundary_consistent_with_leap_rule() {
        let cal = Islamic;
        for year in 1..=60 {
            let start = cal.to_jd(year, 1, 1).unwrap();
            let next = cal.to_jd(year + 1, 1, 1).unwrap();
            assert_eq!(next - start, f64::from(cal.days_in_year(year)), "year {year}");
        }
    }
}
