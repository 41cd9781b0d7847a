//! Timestamp and relative-window normalization for timestamp fields.
//!
//! Every timestamp that reaches the wire uses one canonical form,
//! `YYYY-MM-DDTHH:MM:SS.sssZ`: UTC, millisecond precision, with anything
//! finer truncated. Relative windows (`WITHIN_THE_LAST`) are emitted as
//! ISO-8601 durations such as `PT15M` or `P7D`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::{Error, Result};

/// `chrono` format string of the canonical timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub const FIFTEEN_MINUTES: &str = "PT15M";
pub const ONE_HOUR: &str = "PT1H";
pub const SIX_HOURS: &str = "PT6H";
pub const TWELVE_HOURS: &str = "PT12H";
pub const ONE_DAY: &str = "P1D";
pub const THREE_DAYS: &str = "P3D";
pub const SEVEN_DAYS: &str = "P7D";
pub const FOURTEEN_DAYS: &str = "P14D";
pub const THIRTY_DAYS: &str = "P30D";

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Render a UTC instant in the canonical wire form.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Anything that can name an instant for a timestamp filter.
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Result<DateTime<Utc>>;
}

impl IntoTimestamp for DateTime<Utc> {
    fn into_timestamp(self) -> Result<DateTime<Utc>> {
        Ok(self)
    }
}

impl IntoTimestamp for NaiveDateTime {
    fn into_timestamp(self) -> Result<DateTime<Utc>> {
        Ok(self.and_utc())
    }
}

impl IntoTimestamp for NaiveDate {
    fn into_timestamp(self) -> Result<DateTime<Utc>> {
        Ok(self.and_time(NaiveTime::MIN).and_utc())
    }
}

/// Seconds since the Unix epoch.
impl IntoTimestamp for i64 {
    fn into_timestamp(self) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp(self, 0)
            .ok_or_else(|| Error::validation(format!("epoch seconds out of range: {}", self)))
    }
}

/// Fractional seconds since the Unix epoch.
impl IntoTimestamp for f64 {
    fn into_timestamp(self) -> Result<DateTime<Utc>> {
        if !self.is_finite() {
            return Err(Error::validation(format!("epoch seconds must be finite, got {}", self)));
        }
        // Whole microseconds first; 1.001 must not format as 1.000
        let micros = (self * 1_000_000.0).round() as i64;
        DateTime::from_timestamp_micros(micros)
            .ok_or_else(|| Error::validation(format!("epoch seconds out of range: {}", self)))
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Result<DateTime<Utc>> {
        parse_timestamp(self)
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self) -> Result<DateTime<Utc>> {
        parse_timestamp(&self)
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Result<DateTime<Utc>> {
        parse_timestamp(self)
    }
}

/// Parse a timestamp string.
///
/// Supports:
/// - RFC 3339: "2024-01-15T10:30:00.123+02:00", "2024-01-15T08:30:00Z"
/// - Naive date-time (taken as UTC): "2024-01-15 10:30:00", "2024-01-15T10:30:00.5"
/// - Date (midnight UTC): "2024-01-15"
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| {
            Error::validation(format!(
                "invalid timestamp '{}': expected RFC 3339, 'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD'",
                s
            ))
        })
}

/// First and last millisecond of the UTC day containing `ts`.
pub fn day_bounds(ts: &DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = ts.date_naive().and_time(NaiveTime::MIN).and_utc();
    let end = start
        .checked_add_signed(TimeDelta::days(1))
        .and_then(|next| next.checked_sub_signed(TimeDelta::milliseconds(1)))
        .ok_or_else(|| {
            Error::validation(format!(
                "day of {} is outside the supported range",
                format_timestamp(&start)
            ))
        })?;
    Ok((start, end))
}

/// Anything that can name a relative window for `WITHIN_THE_LAST`.
pub trait IntoWindow {
    fn into_window(self) -> Result<TimeDelta>;
}

impl IntoWindow for TimeDelta {
    fn into_window(self) -> Result<TimeDelta> {
        Ok(self)
    }
}

impl IntoWindow for &str {
    fn into_window(self) -> Result<TimeDelta> {
        parse_window(self)
    }
}

impl IntoWindow for String {
    fn into_window(self) -> Result<TimeDelta> {
        parse_window(&self)
    }
}

/// Parse a relative window.
///
/// Supports:
/// - ISO-8601 durations: "P7D", "PT15M", "P1DT12H", "P2W"
/// - Shorthand: "30s", "15m", "6h", "7d", "2w"
pub fn parse_window(s: &str) -> Result<TimeDelta> {
    let s = s.trim();
    let secs = if s.starts_with(['P', 'p']) {
        parse_iso_duration(&s[1..])
    } else {
        parse_shorthand(s)
    };

    secs.and_then(TimeDelta::try_seconds).ok_or_else(|| {
        Error::validation(format!(
            "invalid window '{}': expected an ISO-8601 duration like P7D or shorthand like 15m",
            s
        ))
    })
}

fn parse_shorthand(s: &str) -> Option<i64> {
    let s = s.to_lowercase();
    let unit = s.chars().last()?;
    let num: i64 = s[..s.len() - unit.len_utf8()].parse().ok()?;
    let scale = match unit {
        's' => 1,
        'm' => SECS_PER_MINUTE,
        'h' => SECS_PER_HOUR,
        'd' => SECS_PER_DAY,
        'w' => 7 * SECS_PER_DAY,
        _ => return None,
    };
    num.checked_mul(scale)
}

/// Parse the part of an ISO-8601 duration after the leading `P`.
fn parse_iso_duration(s: &str) -> Option<i64> {
    let s = s.to_uppercase();
    let (date_part, time_part) = match s.split_once('T') {
        Some((d, t)) if !t.is_empty() => (d, Some(t)),
        Some(_) => return None,
        None => (s.as_str(), None),
    };

    let mut total: i64 = 0;
    let mut seen = false;
    for (num, unit) in duration_components(date_part)? {
        let scale = match unit {
            'W' => 7 * SECS_PER_DAY,
            'D' => SECS_PER_DAY,
            _ => return None,
        };
        total = total.checked_add(num.checked_mul(scale)?)?;
        seen = true;
    }
    if let Some(time_part) = time_part {
        for (num, unit) in duration_components(time_part)? {
            let scale = match unit {
                'H' => SECS_PER_HOUR,
                'M' => SECS_PER_MINUTE,
                'S' => 1,
                _ => return None,
            };
            total = total.checked_add(num.checked_mul(scale)?)?;
            seen = true;
        }
    }

    seen.then_some(total)
}

/// Split "1D" / "12H30M" into (number, unit) pairs.
fn duration_components(s: &str) -> Option<Vec<(i64, char)>> {
    let mut parts = Vec::new();
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.is_empty() {
                return None;
            }
            parts.push((digits.parse().ok()?, c));
            digits.clear();
        }
    }
    digits.is_empty().then_some(parts)
}

/// Render a positive, whole-second window as a canonical ISO-8601 duration.
pub fn format_window(window: TimeDelta) -> Result<String> {
    if window.subsec_nanos() != 0 {
        return Err(Error::validation("window must be a whole number of seconds"));
    }
    let total = window.num_seconds();
    if total <= 0 {
        return Err(Error::validation(format!(
            "window must be positive, got {} seconds",
            total
        )));
    }

    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{}D", days));
    }
    if hours > 0 || minutes > 0 || seconds > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if seconds > 0 {
            out.push_str(&format!("{}S", seconds));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_truncates_microseconds() {
        let ts = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap()
            + TimeDelta::microseconds(123_999);
        assert_eq!(format_timestamp(&ts), "2024-03-09T14:05:07.123Z");
    }

    #[test]
    fn test_parse_date_only() {
        let ts = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-15T00:00:00.000Z");
    }

    #[test]
    fn test_parse_naive_datetime_forms() {
        let a = parse_timestamp("2024-01-15 10:30:00").unwrap();
        let b = parse_timestamp("2024-01-15T10:30:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            format_timestamp(&parse_timestamp("2024-01-15 10:30:00.4567").unwrap()),
            "2024-01-15T10:30:00.456Z"
        );
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        let ts = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-15T08:30:00.000Z");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_timestamp("yesterday"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_epoch_seconds() {
        let ts = 1_700_000_000_i64.into_timestamp().unwrap();
        assert_eq!(format_timestamp(&ts), "2023-11-14T22:13:20.000Z");

        let ts = 1_700_000_000.001_f64.into_timestamp().unwrap();
        assert_eq!(format_timestamp(&ts), "2023-11-14T22:13:20.001Z");

        assert!(f64::NAN.into_timestamp().is_err());
    }

    #[test]
    fn test_day_bounds() {
        let ts = parse_timestamp("2024-02-29 13:14:15").unwrap();
        let (start, end) = day_bounds(&ts).unwrap();
        assert_eq!(format_timestamp(&start), "2024-02-29T00:00:00.000Z");
        assert_eq!(format_timestamp(&end), "2024-02-29T23:59:59.999Z");
    }

    #[test]
    fn test_day_bounds_last_representable_day() {
        assert!(matches!(day_bounds(&DateTime::<Utc>::MAX_UTC), Err(Error::Validation(_))));
        assert!(day_bounds(&DateTime::<Utc>::MIN_UTC).is_ok());
    }

    #[test]
    fn test_window_shorthand() {
        assert_eq!(format_window(parse_window("15m").unwrap()).unwrap(), FIFTEEN_MINUTES);
        assert_eq!(format_window(parse_window("6h").unwrap()).unwrap(), SIX_HOURS);
        assert_eq!(format_window(parse_window("2w").unwrap()).unwrap(), FOURTEEN_DAYS);
        assert_eq!(format_window(parse_window("90s").unwrap()).unwrap(), "PT1M30S");
    }

    #[test]
    fn test_window_iso() {
        assert_eq!(format_window(parse_window("P7D").unwrap()).unwrap(), SEVEN_DAYS);
        assert_eq!(format_window(parse_window("pt12h").unwrap()).unwrap(), TWELVE_HOURS);
        assert_eq!(format_window(parse_window("P1DT36H").unwrap()).unwrap(), "P2DT12H");
        assert_eq!(format_window(parse_window("PT24H").unwrap()).unwrap(), ONE_DAY);
    }

    #[test]
    fn test_window_invalid() {
        for bad in ["", "P", "PT", "P1H", "7", "7y", "P1.5D", "soon"] {
            assert!(parse_window(bad).is_err(), "accepted {:?}", bad);
        }
        assert!(format_window(TimeDelta::zero()).is_err());
        assert!(format_window(TimeDelta::milliseconds(1500)).is_err());
    }
}
