//! Range time parsing
//!
//! Two forms are accepted:
//! - absolute: `YYYY[-MM[-DD[ hh[:mm[:ss]]]]]`
//! - relative: `now` followed by any sequence of offsets (`-1h`, `+30m`, `-2`
//!   meaning seconds) and roundings (`/d`, `/w`, `/M`)
//!
//! A time used as a range start resolves to the beginning of its precision
//! unit, a range end to the last second of it: `2024-05` is
//! `2024-05-01 00:00:00` as a start and `2024-05-31 23:59:59` as an end.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};
use regex::Regex;
use std::sync::LazyLock;

static ABSOLUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2})(?:\s+(\d{2})(?::(\d{2})(?::(\d{2}))?)?)?)?)?$")
        .expect("static regex")
});

static RELATIVE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([+-])(\d+)([smhdwMy]?)|/([smhdwMy])").expect("static regex")
});

/// Errors raised while parsing a range time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeTimeError {
    #[error("invalid time \"{0}\"")]
    Invalid(String),
    #[error("time \"{0}\" is out of range")]
    OutOfRange(String),
}

/// Calendar unit used by offsets and roundings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    fn from_suffix(c: &str) -> Option<Self> {
        match c {
            "" | "s" => Some(TimeUnit::Second),
            "m" => Some(TimeUnit::Minute),
            "h" => Some(TimeUnit::Hour),
            "d" => Some(TimeUnit::Day),
            "w" => Some(TimeUnit::Week),
            "M" => Some(TimeUnit::Month),
            "y" => Some(TimeUnit::Year),
            _ => None,
        }
    }
}

fn start_of(dt: NaiveDateTime, unit: TimeUnit) -> NaiveDateTime {
    let date = dt.date();
    match unit {
        TimeUnit::Second => dt,
        TimeUnit::Minute => date.and_hms_opt(dt.hour(), dt.minute(), 0).unwrap_or(dt),
        TimeUnit::Hour => date.and_hms_opt(dt.hour(), 0, 0).unwrap_or(dt),
        TimeUnit::Day => date.and_time(NaiveTime::MIN),
        TimeUnit::Week => {
            let back = i64::from(date.weekday().num_days_from_monday());
            (date - Duration::days(back)).and_time(NaiveTime::MIN)
        }
        TimeUnit::Month => date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN),
        TimeUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)
            .unwrap_or(date)
            .and_time(NaiveTime::MIN),
    }
}

fn add_units(dt: NaiveDateTime, unit: TimeUnit, n: i64) -> Option<NaiveDateTime> {
    let fixed = |secs: i64| {
        n.checked_mul(secs)
            .and_then(Duration::try_seconds)
            .and_then(|d| dt.checked_add_signed(d))
    };
    let calendar = |months: i64| {
        let months = n.checked_mul(months)?;
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            dt.checked_add_months(magnitude)
        } else {
            dt.checked_sub_months(magnitude)
        }
    };

    match unit {
        TimeUnit::Second => fixed(1),
        TimeUnit::Minute => fixed(60),
        TimeUnit::Hour => fixed(3600),
        TimeUnit::Day => fixed(86_400),
        TimeUnit::Week => fixed(604_800),
        TimeUnit::Month => calendar(1),
        TimeUnit::Year => calendar(12),
    }
}

/// Start or end of the unit containing `dt`
fn align(dt: NaiveDateTime, unit: TimeUnit, is_from: bool) -> Option<NaiveDateTime> {
    let start = start_of(dt, unit);
    if is_from {
        Some(start)
    } else {
        add_units(start, unit, 1)?.checked_sub_signed(Duration::seconds(1))
    }
}

fn resolve_absolute(input: &str, is_from: bool) -> Option<Result<NaiveDateTime, RangeTimeError>> {
    let caps = ABSOLUTE.captures(input)?;
    let out_of_range = || RangeTimeError::OutOfRange(input.to_string());

    let part = |i: usize| caps.get(i).map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX));
    let year = caps[1].parse::<i32>().unwrap_or(0);

    let (month, day, hour, minute, second) = (part(2), part(3), part(4), part(5), part(6));
    let unit = match (month, day, hour, minute, second) {
        (None, ..) => TimeUnit::Year,
        (_, None, ..) => TimeUnit::Month,
        (_, _, None, ..) => TimeUnit::Day,
        (_, _, _, None, _) => TimeUnit::Hour,
        (_, _, _, _, None) => TimeUnit::Minute,
        _ => TimeUnit::Second,
    };

    let resolved = NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1))
        .and_then(|date| {
            date.and_hms_opt(hour.unwrap_or(0), minute.unwrap_or(0), second.unwrap_or(0))
        })
        .and_then(|dt| align(dt, unit, is_from))
        .ok_or_else(out_of_range);

    Some(resolved)
}

fn resolve_relative(
    input: &str,
    is_from: bool,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, RangeTimeError> {
    let invalid = || RangeTimeError::Invalid(input.to_string());
    let out_of_range = || RangeTimeError::OutOfRange(input.to_string());

    let rest = input.strip_prefix("now").ok_or_else(invalid)?;
    let mut dt = now;
    let mut consumed = 0;

    for caps in RELATIVE_TOKEN.captures_iter(rest) {
        let whole = caps.get(0).ok_or_else(invalid)?;
        if whole.start() != consumed {
            return Err(invalid());
        }
        consumed = whole.end();

        if let Some(rounding) = caps.get(4) {
            let unit = TimeUnit::from_suffix(rounding.as_str()).ok_or_else(invalid)?;
            dt = align(dt, unit, is_from).ok_or_else(out_of_range)?;
        } else {
            let amount: i64 = caps[2].parse().map_err(|_| out_of_range())?;
            let amount = if &caps[1] == "-" { -amount } else { amount };
            let unit = TimeUnit::from_suffix(&caps[3]).ok_or_else(invalid)?;
            dt = add_units(dt, unit, amount).ok_or_else(out_of_range)?;
        }
    }

    if consumed != rest.len() {
        return Err(invalid());
    }

    Ok(dt)
}

/// Resolve a range time against `now`.
///
/// `is_from` selects start-of-unit (range start) or end-of-unit (range end)
/// alignment for partial absolute times and roundings.
pub fn resolve(
    input: &str,
    is_from: bool,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, RangeTimeError> {
    let input = input.trim();

    let naive = match resolve_absolute(input, is_from) {
        Some(result) => result?,
        None => resolve_relative(input, is_from, now.naive_utc())?,
    };

    Ok(naive.and_utc())
}

/// Check that `input` is a well-formed range time
pub fn validate(input: &str) -> Result<(), RangeTimeError> {
    resolve(input, true, Utc::now()).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // Wednesday
        Utc.with_ymd_and_hms(2024, 5, 15, 13, 45, 30).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_now() {
        assert_eq!(resolve("now", true, now()).unwrap(), now());
        assert_eq!(resolve("now", false, now()).unwrap(), now());
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(
            resolve("now-1h", true, now()).unwrap(),
            at(2024, 5, 15, 12, 45, 30)
        );
        assert_eq!(
            resolve("now+30m", true, now()).unwrap(),
            at(2024, 5, 15, 14, 15, 30)
        );
        assert_eq!(
            resolve("now-90", true, now()).unwrap(),
            at(2024, 5, 15, 13, 44, 0)
        );
        assert_eq!(
            resolve("now-1M", true, now()).unwrap(),
            at(2024, 4, 15, 13, 45, 30)
        );
        assert_eq!(
            resolve("now-2y", true, now()).unwrap(),
            at(2022, 5, 15, 13, 45, 30)
        );
    }

    #[test]
    fn test_rounding_start_and_end() {
        assert_eq!(
            resolve("now/d", true, now()).unwrap(),
            at(2024, 5, 15, 0, 0, 0)
        );
        assert_eq!(
            resolve("now/d", false, now()).unwrap(),
            at(2024, 5, 15, 23, 59, 59)
        );
        assert_eq!(
            resolve("now/w", true, now()).unwrap(),
            at(2024, 5, 13, 0, 0, 0)
        );
        assert_eq!(
            resolve("now/M", false, now()).unwrap(),
            at(2024, 5, 31, 23, 59, 59)
        );
    }

    #[test]
    fn test_offset_then_rounding() {
        assert_eq!(
            resolve("now-1d/d", true, now()).unwrap(),
            at(2024, 5, 14, 0, 0, 0)
        );
        assert_eq!(
            resolve("now-1d/d", false, now()).unwrap(),
            at(2024, 5, 14, 23, 59, 59)
        );
    }

    #[test]
    fn test_absolute_full() {
        assert_eq!(
            resolve("2024-02-29 08:15:00", true, now()).unwrap(),
            at(2024, 2, 29, 8, 15, 0)
        );
    }

    #[test]
    fn test_absolute_partial() {
        assert_eq!(resolve("2024", true, now()).unwrap(), at(2024, 1, 1, 0, 0, 0));
        assert_eq!(
            resolve("2024", false, now()).unwrap(),
            at(2024, 12, 31, 23, 59, 59)
        );
        assert_eq!(
            resolve("2024-02", false, now()).unwrap(),
            at(2024, 2, 29, 23, 59, 59)
        );
        assert_eq!(
            resolve("2024-02-10 08", false, now()).unwrap(),
            at(2024, 2, 10, 8, 59, 59)
        );
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["", "yesterday", "now-", "now-1x", "now1h", "now/q", "2024-1-1", "now-1h junk"] {
            assert!(
                matches!(resolve(input, true, now()), Err(RangeTimeError::Invalid(_))),
                "{input:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_out_of_range_inputs() {
        assert!(matches!(
            resolve("2024-02-30", true, now()),
            Err(RangeTimeError::OutOfRange(_))
        ));
        assert!(matches!(
            resolve("2024-01-01 25:00", true, now()),
            Err(RangeTimeError::OutOfRange(_))
        ));
        assert!(matches!(
            resolve("now-99999999999999y", true, now()),
            Err(RangeTimeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(validate("now-1h").is_ok());
        assert!(validate("2024-05-01 00:00:00").is_ok());
        assert!(validate("tomorrow").is_err());
    }
}
