//! Cross-calendar behavior through the public calendar API.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

use gridcal::calendar::{parse_date, FormatSettings, ShortYearCutoff};
use gridcal::{CalendarDate, CalendarKind, GridcalError, Period};
use test_case::test_case;

fn greg(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarKind::Gregorian.new_date(y, m, d).unwrap()
}

fn ymd(date: &CalendarDate) -> (i32, u32, u32) {
    (date.year(), date.month(), date.day())
}

#[test_case(CalendarKind::Islamic, (2000, 1, 1), (1420, 9, 24) ; "islamic y2k")]
#[test_case(CalendarKind::Islamic, (2024, 3, 5), (1445, 8, 24) ; "islamic sha'ban")]
#[test_case(CalendarKind::Islamic, (2024, 3, 11), (1445, 9, 1) ; "islamic ramadan start")]
#[test_case(CalendarKind::UmmAlQura, (2024, 3, 11), (1445, 9, 1) ; "umm al-qura ramadan start")]
#[test_case(CalendarKind::UmmAlQura, (2024, 7, 7), (1446, 1, 1) ; "umm al-qura new year")]
#[test_case(CalendarKind::UmmAlQura, (1937, 3, 14), (1356, 1, 1) ; "umm al-qura first table day")]
fn test_convert_from_gregorian(kind: CalendarKind, from: (i32, u32, u32), to: (i32, u32, u32)) {
    let source = greg(from.0, from.1, from.2);
    let converted = source.convert(kind).unwrap();
    assert_eq!(converted.kind(), kind);
    assert_eq!(ymd(&converted), to);
    assert_eq!(converted.to_jd(), source.to_jd());
    assert_eq!(converted.convert(CalendarKind::Gregorian).unwrap(), source);
}

/// Every valid date of `first..=last`, in order.
fn every_day(kind: CalendarKind, first: i32, last: i32) -> Vec<CalendarDate> {
    let mut dates = Vec::new();
    for year in (first..=last).filter(|&y| y != 0) {
        for month in 1..=kind.months_in_year(year).unwrap() {
            for day in 1..=kind.days_in_month(year, month).unwrap() {
                dates.push(kind.new_date(year, month, day).unwrap());
            }
        }
    }
    dates
}

#[test_case(CalendarKind::Gregorian, -5, 5 ; "gregorian across year zero")]
#[test_case(CalendarKind::Gregorian, 1899, 1901 ; "gregorian century turn")]
#[test_case(CalendarKind::Gregorian, 1999, 2101 ; "gregorian modern era")]
#[test_case(CalendarKind::Islamic, -5, 5 ; "islamic across year zero")]
#[test_case(CalendarKind::Islamic, 1350, 1510 ; "islamic modern era")]
#[test_case(CalendarKind::UmmAlQura, 1356, 1500 ; "umm al-qura whole table")]
fn test_julian_day_round_trip_is_exact(kind: CalendarKind, first: i32, last: i32) {
    let dates = every_day(kind, first, last);
    for pair in dates.windows(2) {
        assert_eq!(pair[1].to_jd() - pair[0].to_jd(), 1.0, "gap after {}", pair[0]);
    }
    for date in &dates {
        assert_eq!(&kind.from_jd(date.to_jd()).unwrap(), date);
    }
}

#[test_case(CalendarKind::Gregorian, -5, 5 ; "gregorian across year zero")]
#[test_case(CalendarKind::Gregorian, 1999, 2101 ; "gregorian modern era")]
#[test_case(CalendarKind::Islamic, -5, 5 ; "islamic across year zero")]
#[test_case(CalendarKind::Islamic, 1350, 1510 ; "islamic modern era")]
#[test_case(CalendarKind::UmmAlQura, 1356, 1500 ; "umm al-qura whole table")]
fn test_day_offsets_undo_each_other(kind: CalendarKind, first: i32, last: i32) {
    for date in every_day(kind, first, last) {
        for n in [1, 7, 30, 400, -45] {
            match date.add(n, Period::Day) {
                Ok(moved) => assert_eq!(moved.add(-n, Period::Day).unwrap(), date, "{date} {n:+}"),
                // Only the table-driven calendar has edges inside the range.
                Err(_) => assert_eq!(kind, CalendarKind::UmmAlQura, "{date} {n:+}"),
            }
        }
    }
}

#[test]
fn test_umm_al_qura_table_edges() {
    let kind = CalendarKind::UmmAlQura;
    let first = kind.new_date(1356, 1, 1).unwrap();
    let last_len = kind.days_in_month(1500, 12).unwrap();
    let last = kind.new_date(1500, 12, last_len).unwrap();

    assert_eq!(kind.from_jd(last.to_jd()).unwrap(), last);
    assert!(last.add(1, Period::Day).is_err());
    assert!(first.add(-1, Period::Day).is_err());
    assert!(kind.is_valid(1500, 12, last_len));
    assert!(!kind.is_valid(1501, 1, 1));
    assert!(!kind.is_valid(1355, 12, 1));
    assert!(kind.from_jd(last.to_jd() + 1.0).is_err());
}

#[test]
fn test_from_gregorian_matches_convert() {
    let direct = CalendarKind::UmmAlQura.from_gregorian(2024, 7, 7).unwrap();
    assert_eq!(direct, greg(2024, 7, 7).convert(CalendarKind::UmmAlQura).unwrap());
}

#[test]
fn test_umm_al_qura_outside_table_fails() {
    let early = greg(1937, 3, 13);
    assert!(early.convert(CalendarKind::UmmAlQura).is_err());
    assert!(matches!(
        CalendarKind::UmmAlQura.new_date(1501, 1, 1),
        Err(GridcalError::InvalidDate { .. })
    ));
    assert!(matches!(
        CalendarKind::UmmAlQura.is_leap_year(1355),
        Err(GridcalError::InvalidYear { .. })
    ));
}

#[test_case(CalendarKind::Gregorian, 2000, true ; "gregorian 400 rule")]
#[test_case(CalendarKind::Gregorian, 1900, false ; "gregorian 100 rule")]
#[test_case(CalendarKind::Gregorian, 2024, true ; "gregorian 4 rule")]
#[test_case(CalendarKind::Gregorian, 2023, false ; "gregorian common year")]
#[test_case(CalendarKind::Gregorian, -1, true ; "gregorian 1 bc is astronomical zero")]
#[test_case(CalendarKind::Islamic, 2, true ; "islamic cycle leap")]
#[test_case(CalendarKind::Islamic, 3, false ; "islamic cycle common")]
fn test_leap_years(kind: CalendarKind, year: i32, leap: bool) {
    assert_eq!(kind.is_leap_year(year).unwrap(), leap);
    let expected = match (kind, leap) {
        (CalendarKind::Gregorian, true) => 366,
        (CalendarKind::Gregorian, false) => 365,
        (_, true) => 355,
        (_, false) => 354,
    };
    assert_eq!(kind.days_in_year(year).unwrap(), expected);
}

#[test]
fn test_year_zero_does_not_exist() {
    for kind in [CalendarKind::Gregorian, CalendarKind::Islamic] {
        assert!(!kind.is_valid(0, 1, 1), "{kind}");
        assert!(kind.is_leap_year(0).is_err());
    }
}

#[test_case(1, Period::Month, (2024, 2, 29) ; "month clamps to leap february")]
#[test_case(12, Period::Month, (2025, 1, 31) ; "month rolls the year")]
#[test_case(1, Period::Year, (2025, 1, 31) ; "year keeps the day")]
#[test_case(1, Period::Week, (2024, 2, 7) ; "week is seven days")]
#[test_case(-31, Period::Day, (2023, 12, 31) ; "days go back through the julian day")]
fn test_gregorian_add(offset: i32, period: Period, expected: (i32, u32, u32)) {
    let start = greg(2024, 1, 31);
    assert_eq!(ymd(&start.add(offset, period).unwrap()), expected);
}

#[test]
fn test_umm_al_qura_month_add_crosses_year() {
    let date = CalendarKind::UmmAlQura.new_date(1445, 12, 15).unwrap();
    let next = date.add(1, Period::Month).unwrap();
    assert_eq!(ymd(&next), (1446, 1, 15));
    let back = next.add(-1, Period::Month).unwrap();
    assert_eq!(back, date);
}

#[test]
fn test_week_days_follow_the_calendar() {
    // 2024-03-08 is a Friday.
    let friday = greg(2024, 3, 8);
    assert_eq!(friday.day_of_week(), 5);
    assert!(friday.is_week_day());
    assert!(!friday.convert(CalendarKind::Islamic).unwrap().is_week_day());
    let saturday = greg(2024, 3, 9);
    assert!(!saturday.is_week_day());
    assert!(saturday.convert(CalendarKind::UmmAlQura).unwrap().is_week_day());
}

#[test]
fn test_ordering_within_one_calendar() {
    let a = greg(2024, 3, 5);
    let b = greg(2024, 3, 6);
    assert!(a < b);
    let islamic = b.convert(CalendarKind::Islamic).unwrap();
    assert!(a.partial_cmp(&islamic).is_none());
    assert!(a.compare_to(&islamic).is_err());
}

#[test_case("yyyy/mm/dd", "1445/09/01" ; "numeric")]
#[test_case("d MM yyyy", "1 Ramadan 1445" ; "long month name")]
fn test_format_umm_al_qura(pattern: &str, expected: &str) {
    let date = CalendarKind::UmmAlQura.new_date(1445, 9, 1).unwrap();
    assert_eq!(date.format(pattern), expected);
    assert_eq!(
        CalendarKind::UmmAlQura.parse(pattern, expected).unwrap(),
        Some(date)
    );
}

#[test]
fn test_parse_short_year_in_islamic_century() {
    let settings = FormatSettings::for_calendar(CalendarKind::Islamic)
        .with_reference_year(1445)
        .with_short_year_cutoff(ShortYearCutoff::Relative(10));
    let parsed = parse_date(CalendarKind::Islamic, "dd/mm/yy", "01/09/45", &settings)
        .unwrap()
        .unwrap();
    assert_eq!(ymd(&parsed), (1445, 9, 1));
    let parsed = parse_date(CalendarKind::Islamic, "dd/mm/yy", "01/09/60", &settings)
        .unwrap()
        .unwrap();
    assert_eq!(parsed.year(), 1360);
}

#[test]
fn test_parse_unix_seconds_in_other_calendar() {
    let parsed = CalendarKind::Islamic.parse("@", "946684800").unwrap().unwrap();
    assert_eq!(ymd(&parsed), (1420, 9, 24));
}

#[test]
fn test_wrong_calendar_arguments_are_rejected() {
    let islamic = CalendarKind::Islamic.new_date(1445, 9, 1).unwrap();
    assert!(matches!(
        CalendarKind::Gregorian.format("yyyy", &islamic),
        Err(GridcalError::DifferentCalendars { .. })
    ));
    assert!(CalendarKind::Gregorian.add(&islamic, 1, Period::Day).is_err());
}
