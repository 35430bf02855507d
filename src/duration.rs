//! Countdown and elapsed-time calculation between two times of day.
//!
//! Either side may be a full instant or a bare "HH:MM" string read against
//! today's date. The magnitude is always non-negative; the direction suffix
//! depends only on whether the *target* was a bare string, not on the sign
//! of the delta. A countdown to a target earlier today therefore still reads
//! as "남음".

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::error::TimeParseError;

/// One side of a time difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeArg {
    Instant(NaiveDateTime),
    /// User-entered "HH:MM", interpreted against the current date.
    Clock(String),
}

impl TimeArg {
    pub fn clock(s: impl Into<String>) -> Self {
        Self::Clock(s.into())
    }

    fn resolve(&self, today: NaiveDate) -> Result<NaiveDateTime, TimeParseError> {
        match self {
            Self::Instant(t) => Ok(*t),
            Self::Clock(s) => Ok(today.and_time(parse_clock_time(s)?)),
        }
    }
}

impl From<NaiveDateTime> for TimeArg {
    fn from(t: NaiveDateTime) -> Self {
        Self::Instant(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Target given as a clock-time string: "남음".
    Remaining,
    /// Target given as an instant: "지남".
    Elapsed,
}

impl Direction {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Remaining => "남음",
            Self::Elapsed => "지남",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeDifference {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub direction: Direction,
    /// e.g. "1시간 5분남음"
    pub description: String,
}

/// Parse "H:MM" or "HH:MM" into a time at second zero.
///
/// A trailing ":SS" field is tolerated and ignored.
pub fn parse_clock_time(input: &str) -> Result<NaiveTime, TimeParseError> {
    let mut fields = input.trim().split(':');
    let (Some(hour), Some(minute)) = (fields.next(), fields.next()) else {
        return Err(TimeParseError::MissingField(input.to_string()));
    };

    let number = |field: &str| {
        field
            .trim()
            .parse::<u32>()
            .map_err(|_| TimeParseError::InvalidNumber {
                input: input.to_string(),
                field: field.to_string(),
            })
    };
    let (hour, minute) = (number(hour)?, number(minute)?);

    if hour > 23 {
        return Err(TimeParseError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(TimeParseError::MinuteOutOfRange(minute));
    }
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(TimeParseError::HourOutOfRange(hour))
}

/// Absolute difference `to - from`, described in Korean.
///
/// Returns `None` when a clock-time string cannot be parsed; callers treat
/// that as "not configured yet". The UI recomputes this every frame while
/// the user is typing, so the parse failure is only logged at debug level.
pub fn difference(from: &TimeArg, to: &TimeArg, today: NaiveDate) -> Option<TimeDifference> {
    let resolved = from
        .resolve(today)
        .and_then(|from| Ok((from, to.resolve(today)?)));
    let (from_time, to_time) = match resolved {
        Ok(pair) => pair,
        Err(e) => {
            debug!("Error calculating time difference: {e}");
            return None;
        }
    };

    let total_seconds = (to_time - from_time).num_milliseconds().abs() / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let direction = match to {
        TimeArg::Clock(_) => Direction::Remaining,
        TimeArg::Instant(_) => Direction::Elapsed,
    };

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}시간"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}분"));
    }
    if seconds > 0 || (hours == 0 && minutes == 0) {
        parts.push(format!("{seconds}초"));
    }
    let description = format!("{}{}", parts.join(" "), direction.suffix());

    Some(TimeDifference {
        hours,
        minutes,
        seconds,
        direction,
        description,
    })
}

/// [`difference`] with bare strings read against the local date.
pub fn difference_now(from: &TimeArg, to: &TimeArg) -> Option<TimeDifference> {
    difference(from, to, Local::now().date_naive())
}
