//! Proleptic Gregorian calendar.
//!
//! Conversions use the closed-form algorithm from Jean Meeus, "Astronomical
//! Algorithms" (1991). Negative years are shifted by one internally because
//! there is no year zero.

use super::{CalendarRules, Regional};

const DAYS_PER_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

static REGIONAL: Regional = Regional {
    month_names: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    month_names_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    day_names: [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ],
    day_names_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    date_format: "mm/dd/yyyy",
    first_day: 0,
    is_rtl: false,
};

/// Gregorian calendar rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gregorian;

/// Map a calendar year onto the astronomical year line (1 BC = 0).
fn astronomical(year: i32) -> i32 {
    if year < 0 {
        year + 1
    } else {
        year
    }
}

impl CalendarRules for Gregorian {
    fn name(&self) -> &'static str {
        "Gregorian"
    }

    fn is_leap_year(&self, year: i32) -> bool {
        let year = astronomical(year);
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    fn days_in_month(&self, year: i32, month: u32) -> u32 {
        let index = usize::try_from(month.saturating_sub(1)).unwrap_or(0);
        let base = DAYS_PER_MONTH.get(index).copied().unwrap_or(0);
        if month == 2 && self.is_leap_year(year) {
            base + 1
        } else {
            base
        }
    }

    fn to_jd(&self, year: i32, month: u32, day: u32) -> Option<f64> {
        let mut year = f64::from(astronomical(year));
        let mut month = f64::from(month);
        if month < 3.0 {
            month += 12.0;
            year -= 1.0;
        }
        let a = (year / 100.0).floor();
        let b = 2.0 - a + (a / 4.0).floor();
        Some(
            (365.25 * (year + 4716.0)).floor() + (30.6001 * (month + 1.0)).floor() + f64::from(day)
                + b
                - 1524.5,
        )
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_jd(&self, jd: f64) -> Option<(i32, u32, u32)> {
        let z = (jd + 0.5).floor();
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        let a = z + 1.0 + alpha - (alpha / 4.0).floor();
        let b = a + 1524.0;
        let c = ((b - 122.1) / 365.25).floor();
        let d = (365.25 * c).floor();
        let e = ((b - d) / 30.6001).floor();
        let day = b - d - (e * 30.6001).floor();
        let month = e - if e > 13.5 { 13.0 } else { 1.0 };
        let mut year = c - if month > 2.5 { 4716.0 } else { 4715.0 };
        if year <= 0.0 {
            year -= 1.0;
        }
        if !(year.is_finite() && year.abs() < f64::from(i32::MAX)) {
            return None;
        }
        Some((
            year as i32,
            u32::try_from(month as i64).ok()?,
            u32::try_from(day as i64).ok()?,
        ))
    }

    fn is_week_day(&self, day_of_week: u32) -> bool {
        (1..=5).contains(&day_of_week)
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
        let g = Gregorian;
        assert!(g.is_leap_year(2000));
        assert!(g.is_leap_year(2400));
        assert!(!g.is_leap_year(1900));
        assert!(!g.is_leap_year(2100));
        assert!(g.is_leap_year(2024));
        assert!(!g.is_leap_year(2023));
        // 1 BC is astronomical year 0, a leap year.
        assert!(g.is_leap_year(-1));
        assert!(!g.is_leap_year(-2));
    }

    #[test]
    fn test_known_julian_days() {
        let g = Gregorian;
        assert_eq!(g.to_jd(2000, 1, 1), Some(2_451_544.5));
        assert_eq!(g.to_jd(1970, 1, 1), Some(2_440_587.5));
        assert_eq!(g.to_jd(1, 1, 1), Some(1_721_425.5));
        assert_eq!(g.from_jd(2_451_544.5), Some((2000, 1, 1)));
        assert_eq!(g.from_jd(2_460_374.5), Some((2024, 3, 5)));
    }

    #[test]
    fn test_no_year_zero() {
        let g = Gregorian;
        let jd = g.to_jd(1, 1, 1).unwrap();
        assert_eq!(g.from_jd(jd - 1.0), Some((-1, 12, 31)));
    }

    #[test]
    fn test_days_in_month() {
        let g = Gregorian;
        assert_eq!(g.days_in_month(2024, 2), 29);
        assert_eq!(g.days_in_month(2023, 2), 28);
        assert_eq!(g.days_in_month(2023, 4), 30);
        assert_eq!(g.days_in_year(2024), 366);
    }
}
