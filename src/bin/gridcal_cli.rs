//! CLI tool for gridcal - calendar conversion and month grids
//!
//! Usage:
//!   gridcal_cli convert <from> <to> <pattern> <text>   # Convert a formatted date
//!   gridcal_cli month <calendar> <year> <month>        # Print a month grid
//!   gridcal_cli info <calendar> <year>                 # Year facts
//!
//! Set `RUST_LOG=debug` for engine logging.

use std::env;
use std::fmt::Write as _;
use std::process::ExitCode;

use gridcal::calendar::{parse_date, CalendarKind, FormatSettings};
use gridcal::datepicker::month_weeks;
use gridcal::Result;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage:
  gridcal_cli convert <from> <to> <pattern> <text>
  gridcal_cli month <calendar> <year> <month>
  gridcal_cli info <calendar> <year>";

fn parse_num<T: std::str::FromStr>(what: &str, text: &str) -> std::result::Result<T, String> {
    text.parse()
        .map_err(|_| format!("{what} must be a number, got '{text}'"))
}

fn convert(from: &str, to: &str, pattern: &str, text: &str) -> Result<String> {
    let from = CalendarKind::from_name(from)?;
    let to = CalendarKind::from_name(to)?;
    let settings = FormatSettings::for_calendar(from);
    match parse_date(from, pattern, text, &settings)? {
        Some(date) => {
            let converted = date.convert(to)?;
            Ok(format!(
                "{} {} -> {} {} (JD {})",
                from.name(),
                date,
                to.name(),
                converted,
                converted.to_jd()
            ))
        }
        None => Ok(String::from("(empty)")),
    }
}

fn month(kind: CalendarKind, year: i32, month: u32) -> Result<String> {
    let settings = FormatSettings::for_calendar(kind);
    let first_day = kind.first_day();
    let mut out = String::new();
    let title = usize::try_from(month)
        .ok()
        .and_then(|m| settings.month_names.get(m.wrapping_sub(1)))
        .cloned()
        .unwrap_or_default();
    let _ = writeln!(out, "{title} {year} ({})", kind.name());
    let names = &settings.day_names_short;
    let shift = usize::try_from(first_day).unwrap_or(0);
    for i in 0..names.len() {
        if let Some(name) = names.get((i + shift) % names.len()) {
            let short: String = name.chars().take(2).collect();
            let _ = write!(out, "{short:>3}");
        }
    }
    out.push('\n');
    for week in month_weeks(kind, year, month, first_day)? {
        for slot in week {
            match slot {
                Some(date) => {
                    let _ = write!(out, "{:>3}", date.day());
                }
                None => out.push_str("   "),
            }
        }
        out.push('\n');
    }
    Ok(out)
}

fn info(kind: CalendarKind, year: i32) -> Result<String> {
    let first = kind.new_date(year, 1, 1)?;
    Ok(format!(
        "{} year {}\n  leap year: {}\n  months: {}\n  days: {}\n  starts: {} (JD {})",
        kind.name(),
        first.format_year(),
        kind.is_leap_year(year)?,
        kind.months_in_year(year)?,
        kind.days_in_year(year)?,
        first,
        first.to_jd()
    ))
}

fn run(args: &[String]) -> std::result::Result<String, String> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let output = match args.as_slice() {
        ["convert", from, to, pattern, text] => convert(from, to, pattern, text),
        ["month", calendar, year, m] => {
            let kind = CalendarKind::from_name(calendar).map_err(|e| e.to_string())?;
            month(kind, parse_num("year", year)?, parse_num("month", m)?)
        }
        ["info", calendar, year] => {
            let kind = CalendarKind::from_name(calendar).map_err(|e| e.to_string())?;
            info(kind, parse_num("year", year)?)
        }
        _ => return Err(USAGE.to_string()),
    };
    output.map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(text) => {
            println!("{}", text.trim_end());
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
