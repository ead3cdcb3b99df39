//! Fixed-point picosecond timestamps.
//!
//! Duration and rate statistics over very large packet counts accumulate
//! floating-point rounding drift; `TimePico` keeps whole seconds and a
//! sub-second picosecond count as integers instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

mod error;

pub use error::{TimeFormatError, TimeParseError};

/// Picoseconds in one second.
pub const PICOS_PER_SECOND: u64 = 1_000_000_000_000;

/// Default calendar pattern, equivalent to `%F %T`.
const DEFAULT_CALENDAR_PATTERN: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Fixed-point timestamp with picosecond resolution.
///
/// Invariant: `picoseconds < 10^12`. Ordering is lexicographic on
/// `(seconds, picoseconds)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimePico {
    seconds: u64,
    picoseconds: u64,
}

impl TimePico {
    /// Build a timestamp, normalizing fractional overflow into whole seconds.
    pub fn new(seconds: u64, picoseconds: u64) -> Self {
        Self {
            seconds: seconds + picoseconds / PICOS_PER_SECOND,
            picoseconds: picoseconds % PICOS_PER_SECOND,
        }
    }

    pub const fn zero() -> Self {
        Self {
            seconds: 0,
            picoseconds: 0,
        }
    }

    /// Seconds plus microseconds, as delivered by `timeval`-style sources.
    pub fn from_seconds_micros(seconds: u64, micros: u64) -> Self {
        Self::new(seconds, micros * 1_000_000)
    }

    /// Seconds plus nanoseconds, as delivered by `timespec`-style sources.
    pub fn from_seconds_nanos(seconds: u64, nanos: u64) -> Self {
        Self::new(seconds, nanos * 1_000)
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn picoseconds(&self) -> u64 {
        self.picoseconds
    }

    /// Parse a timestamp from text.
    ///
    /// Formats are tried in order: `"YYYY-MM-DD hh:mm:ss"`,
    /// `"YYYYMMDD hh:mm:ss"`, `"YYMMDD hh:mm:ss"` and raw epoch seconds,
    /// each optionally followed by `.` and up to twelve fractional digits.
    /// Digits beyond the twelfth are truncated; shorter fractions are
    /// zero-padded on the right, so `".5"` means half a second. Calendar
    /// forms are interpreted as UTC. Two-digit years 69-99 map to 19xx,
    /// 00-68 to 20xx.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let input = input.trim();
        let (head, fraction) = match input.split_once('.') {
            Some((head, fraction)) => (head, Some(fraction)),
            None => (input, None),
        };

        let seconds = parse_whole_seconds(head).ok_or_else(|| TimeParseError::InvalidFormat {
            input: input.to_string(),
        })?;
        let seconds = u64::try_from(seconds).map_err(|_| TimeParseError::BeforeEpoch {
            input: input.to_string(),
        })?;

        let picoseconds = match fraction {
            Some(digits) => parse_fraction(digits).ok_or_else(|| TimeParseError::InvalidFraction {
                input: input.to_string(),
            })?,
            None => 0,
        };

        Ok(Self::new(seconds, picoseconds))
    }

    /// Difference `self - earlier` with picosecond borrow.
    ///
    /// When `self` chronologically precedes `earlier` the result saturates
    /// at zero; callers that need signed durations must compare first.
    pub fn saturating_sub(self, earlier: TimePico) -> TimePico {
        if self <= earlier {
            return TimePico::zero();
        }

        let mut seconds = self.seconds - earlier.seconds;
        let picoseconds = if self.picoseconds < earlier.picoseconds {
            seconds -= 1;
            self.picoseconds + PICOS_PER_SECOND - earlier.picoseconds
        } else {
            self.picoseconds - earlier.picoseconds
        };

        TimePico {
            seconds,
            picoseconds,
        }
    }

    /// Render the whole-second part with a runtime calendar pattern.
    ///
    /// The pattern uses the `time` crate's format-description syntax, e.g.
    /// `"[year]-[month]-[day] [hour]:[minute]:[second]"`. The fractional
    /// part is not rendered; append it separately where needed.
    pub fn format_calendar(&self, pattern: &str) -> Result<String, TimeFormatError> {
        let items = time::format_description::parse_borrowed::<2>(pattern)?;
        let datetime = OffsetDateTime::from_unix_timestamp(self.seconds as i64)?;
        Ok(datetime.format(&items)?)
    }

    /// Render the whole-second part as `"YYYY-MM-DD hh:mm:ss"` (UTC).
    pub fn format_calendar_default(&self) -> Result<String, TimeFormatError> {
        let datetime = OffsetDateTime::from_unix_timestamp(self.seconds as i64)?;
        Ok(datetime.format(&DEFAULT_CALENDAR_PATTERN)?)
    }
}

impl fmt::Display for TimePico {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:012}", self.seconds, self.picoseconds)
    }
}

/// Render the span between two timestamps as `"HH:MM:SS.d"` (deciseconds).
pub fn format_duration(first: TimePico, last: TimePico) -> String {
    let diff = last.saturating_sub(first);
    let deciseconds = diff.seconds() * 10 + diff.picoseconds() / (PICOS_PER_SECOND / 10);

    let s = deciseconds % 600;
    let rest = deciseconds / 600;
    let m = rest % 60;
    let h = rest / 60;

    format!("{:02}:{:02}:{:04.1}", h, m, s as f64 / 10.0)
}

fn parse_whole_seconds(head: &str) -> Option<i64> {
    let iso = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(datetime) = PrimitiveDateTime::parse(head, iso) {
        return Some(datetime.assume_utc().unix_timestamp());
    }

    if let Some(datetime) = parse_compact(head) {
        return Some(datetime.assume_utc().unix_timestamp());
    }

    // Raw seconds since 1970-01-01 00:00:00 UTC.
    head.parse::<i64>().ok()
}

/// `"YYYYMMDD hh:mm:ss"` and `"YYMMDD hh:mm:ss"`.
fn parse_compact(head: &str) -> Option<PrimitiveDateTime> {
    let (date_part, time_part) = head.split_once(' ')?;
    if !date_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (year, month, day) = match date_part.len() {
        8 => (
            date_part[0..4].parse::<i32>().ok()?,
            date_part[4..6].parse::<u8>().ok()?,
            date_part[6..8].parse::<u8>().ok()?,
        ),
        6 => {
            let yy = date_part[0..2].parse::<i32>().ok()?;
            let century = if yy >= 69 { 1900 } else { 2000 };
            (
                century + yy,
                date_part[2..4].parse::<u8>().ok()?,
                date_part[4..6].parse::<u8>().ok()?,
            )
        }
        _ => return None,
    };

    let clock = format_description!("[hour]:[minute]:[second]");
    let date = Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()?;
    let time = Time::parse(time_part, clock).ok()?;
    Some(PrimitiveDateTime::new(date, time))
}

/// Up to twelve fractional digits; `"5"` becomes 500000000000 ps.
fn parse_fraction(digits: &str) -> Option<u64> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let truncated = &digits[..digits.len().min(12)];
    if truncated.is_empty() {
        return Some(0);
    }

    let value = truncated.parse::<u64>().ok()?;
    Some(value * 10u64.pow(12 - truncated.len() as u32))
}

#[cfg(test)]
mod tests {
    use super::{PICOS_PER_SECOND, TimePico, format_duration};

    #[test]
    fn parse_iso_with_fraction() {
        let ts = TimePico::parse("2013-05-01 12:00:00.5").unwrap();
        assert_eq!(ts.seconds(), 1367409600);
        assert_eq!(ts.picoseconds(), 500_000_000_000);
    }

    #[test]
    fn parse_compact_date() {
        let ts = TimePico::parse("20130501 12:00:00").unwrap();
        assert_eq!(ts.seconds(), 1367409600);
        assert_eq!(ts.picoseconds(), 0);
    }

    #[test]
    fn parse_two_digit_year_both_centuries() {
        let old = TimePico::parse("990101 00:00:00").unwrap();
        let new = TimePico::parse("130501 12:00:00").unwrap();
        assert_eq!(old.seconds(), 915148800); // 1999-01-01
        assert_eq!(new.seconds(), 1367409600); // 2013-05-01
    }

    #[test]
    fn parse_epoch_seconds() {
        let ts = TimePico::parse("1367409600.25").unwrap();
        assert_eq!(ts.seconds(), 1367409600);
        assert_eq!(ts.picoseconds(), 250_000_000_000);
    }

    #[test]
    fn parse_fraction_truncates_beyond_twelve_digits() {
        let ts = TimePico::parse("0.1234567890129999").unwrap();
        assert_eq!(ts.picoseconds(), 123_456_789_012);
    }

    #[test]
    fn parse_fraction_zero_pads_short_input() {
        let ts = TimePico::parse("0.001").unwrap();
        assert_eq!(ts.picoseconds(), 1_000_000_000);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TimePico::parse("yesterday").is_err());
        assert!(TimePico::parse("2013-05-01").is_err());
        assert!(TimePico::parse("1.2.3").is_err());
    }

    #[test]
    fn conversions_scale_into_picoseconds() {
        assert_eq!(
            TimePico::from_seconds_micros(1, 250_000).picoseconds(),
            250_000_000_000
        );
        assert_eq!(
            TimePico::from_seconds_nanos(1, 250_000_000).picoseconds(),
            250_000_000_000
        );
    }

    #[test]
    fn new_normalizes_overflowing_fraction() {
        let ts = TimePico::new(1, PICOS_PER_SECOND + 5);
        assert_eq!(ts.seconds(), 2);
        assert_eq!(ts.picoseconds(), 5);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = TimePico::new(1, 5);
        let b = TimePico::new(1, 6);
        let c = TimePico::new(2, 0);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn subtract_borrows_from_seconds() {
        let last = TimePico::new(2, 100);
        let first = TimePico::new(1, 200);
        let diff = last.saturating_sub(first);
        assert_eq!(diff.seconds(), 0);
        assert_eq!(diff.picoseconds(), PICOS_PER_SECOND - 100);
    }

    #[test]
    fn subtract_saturates_when_reversed() {
        let first = TimePico::new(1, 200);
        let last = TimePico::new(2, 100);
        assert_eq!(first.saturating_sub(last), TimePico::zero());
        assert_eq!(last.saturating_sub(last), TimePico::zero());
    }

    #[test]
    fn duration_renders_deciseconds() {
        let first = TimePico::new(100, 0);
        let last = TimePico::new(3704, 500_000_000_000);
        assert_eq!(format_duration(first, last), "01:00:04.5");
    }

    #[test]
    fn calendar_rendering_roundtrips_default_pattern() {
        let ts = TimePico::parse("2013-05-01 12:00:00").unwrap();
        assert_eq!(ts.format_calendar_default().unwrap(), "2013-05-01 12:00:00");
        let custom = ts.format_calendar("[hour]:[minute]").unwrap();
        assert_eq!(custom, "12:00");
    }

    #[test]
    fn calendar_rejects_bad_pattern() {
        let ts = TimePico::zero();
        assert!(ts.format_calendar("[not-a-component]").is_err());
    }
}
