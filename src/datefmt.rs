//! Timestamp formatting.

use core::fmt::Write as _;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Full English weekday names, starting from Monday.
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Full English month names, starting from January.
const MONTHS: [&str; 12] = [
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
];

/// Formats a time according to a C `strftime` style format string, or one of
/// the keywords `iso8601`, `iso8601date` and `iso8601time`.
///
/// Unknown conversion specifiers are emitted as-is, including the `%`.
pub fn format_datetime(d: &OffsetDateTime, format: &str) -> Result<String, core::fmt::Error> {
    match format {
        "iso8601" => with_offset(d, "%Y-%m-%dT%H:%M:%S"),
        "iso8601date" => strftime(d, "%Y-%m-%d"),
        "iso8601time" => with_offset(d, "%H:%M:%S"),
        _ => strftime(d, format),
    }
}

/// Formats a time and appends its UTC offset as `Z` or `+hh:mm`.
fn with_offset(d: &OffsetDateTime, format: &str) -> Result<String, core::fmt::Error> {
    let mut out = strftime(d, format)?;
    let offset = d.offset();
    if offset.is_utc() {
        out.push('Z');
    } else {
        let sign = if offset.is_negative() { '-' } else { '+' };
        write!(
            out,
            "{sign}{:02}:{:02}",
            offset.whole_hours().unsigned_abs(),
            offset.minutes_past_hour().unsigned_abs()
        )?;
    }
    Ok(out)
}

/// Interprets a `strftime` format string.
fn strftime(d: &OffsetDateTime, format: &str) -> Result<String, core::fmt::Error> {
    let mut out = String::with_capacity(format.len() + 8);
    let mut f = format.chars();
    while let Some(c) = f.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let weekday = WEEKDAYS[usize::from(d.weekday().number_days_from_monday())];
        let month = MONTHS[usize::from(u8::from(d.month()) - 1)];
        let hour12 = match d.hour() % 12 {
            0 => 12,
            h => h,
        };

        match f.next() {
            Some('a') => out += &weekday[..3],
            Some('A') => out += weekday,
            Some('b' | 'h') => out += &month[..3],
            Some('B') => out += month,
            Some('c') => write!(
                out,
                "{} {} {:2} {:02}:{:02}:{:02} {}",
                &weekday[..3],
                &month[..3],
                d.day(),
                d.hour(),
                d.minute(),
                d.second(),
                d.year()
            )?,
            Some('C') => write!(out, "{:02}", d.year().div_euclid(100))?,
            Some('d') => write!(out, "{:02}", d.day())?,
            Some('D') => write!(
                out,
                "{:02}/{:02}/{:02}",
                u8::from(d.month()),
                d.day(),
                d.year().rem_euclid(100)
            )?,
            Some('e') => write!(out, "{:2}", d.day())?,
            Some('F') => write!(out, "{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())?,
            Some('H') => write!(out, "{:02}", d.hour())?,
            Some('I') => write!(out, "{hour12:02}")?,
            Some('j') => write!(out, "{:03}", d.ordinal())?,
            Some('m') => write!(out, "{:02}", u8::from(d.month()))?,
            Some('M') => write!(out, "{:02}", d.minute())?,
            Some('n') => out.push('\n'),
            Some('p') => out += if d.hour() < 12 { "AM" } else { "PM" },
            Some('R') => write!(out, "{:02}:{:02}", d.hour(), d.minute())?,
            Some('s') => write!(out, "{}", d.unix_timestamp())?,
            Some('S') => write!(out, "{:02}", d.second())?,
            Some('t') => out.push('\t'),
            Some('T' | 'X') => write!(out, "{:02}:{:02}:{:02}", d.hour(), d.minute(), d.second())?,
            Some('u') => write!(out, "{}", d.weekday().number_from_monday())?,
            Some('w') => write!(out, "{}", d.weekday().number_days_from_sunday())?,
            Some('x') => write!(
                out,
                "{:02}/{:02}/{:02}",
                u8::from(d.month()),
                d.day(),
                d.year().rem_euclid(100)
            )?,
            Some('y') => write!(out, "{:02}", d.year().rem_euclid(100))?,
            Some('Y') => write!(out, "{}", d.year())?,
            Some('z') => {
                let offset = d.offset();
                let sign = if offset.is_negative() { '-' } else { '+' };
                write!(
                    out,
                    "{sign}{:02}{:02}",
                    offset.whole_hours().unsigned_abs(),
                    offset.minutes_past_hour().unsigned_abs()
                )?;
            }
            Some('Z') => {
                if d.offset().is_utc() {
                    out += "UTC";
                } else {
                    write!(out, "{}", d.offset())?;
                }
            }
            Some('%') => out.push('%'),
            Some(c) => {
                out.push('%');
                out.push(c);
            }
            None => out.push('%'),
        }
    }
    Ok(out)
}

/// Formats a time as an ISO 8601 (RFC 3339 profile) string with second
/// precision.
pub fn format_iso8601(d: &OffsetDateTime) -> Result<String, time::error::Format> {
    d.replace_nanosecond(0)
        .unwrap_or(*d)
        .format(&Rfc3339)
}

/// Time units used by [`pretty_timedelta`], largest first.
const UNITS: [(i64, &str, &str); 6] = [
    (3600 * 24 * 365, "year", "years"),
    (3600 * 24 * 30, "month", "months"),
    (3600 * 24 * 7, "week", "weeks"),
    (3600 * 24, "day", "days"),
    (3600, "hour", "hours"),
    (60, "minute", "minutes"),
];

/// Describes the approximate distance between two times in a single
/// humanised unit, e.g. `"3 days"`.
///
/// A unit is only used once the distance is at least 1.9 of it, so 100
/// seconds is `"100 seconds"` and 115 seconds is `"2 minutes"`.
pub fn pretty_timedelta(lhs: OffsetDateTime, rhs: OffsetDateTime) -> String {
    let age = (rhs - lhs).whole_seconds().abs();
    if age * 10 <= 60 * 19 {
        return plural(age, "second", "seconds");
    }

    UNITS
        .into_iter()
        // `age / unit >= 1.9`, without floating point
        .find(|&(unit, ..)| age * 10 >= unit * 19)
        .map_or_else(
            || plural(age, "second", "seconds"),
            |(unit, singular, plural_unit)| {
                // Round half up
                plural((age * 2 + unit) / (unit * 2), singular, plural_unit)
            },
        )
}

/// Formats a count with the singular or plural unit name.
fn plural(count: i64, singular: &str, plural: &str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}
