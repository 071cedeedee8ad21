/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! DateTime type for representing timestamps.
//!
//! Unlike [`std::time::Instant`], this type is not opaque. The time inside of
//! it can be read and modified. It also holds the logic for parsing and
//! formatting timestamps in the wire formats the runtime supports.

use num_integer::div_mod_floor;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

mod format;

pub use format::{DateTimeFormatError, DateTimeParseError};

const MILLIS_PER_SECOND: i64 = 1000;
const NANOS_PER_MILLI: u32 = 1_000_000;
const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Formats a timestamp may be written in on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Format {
    /// Seconds since the Unix epoch, as a number. Written with fixed
    /// three-decimal-place precision, e.g. `1700000000.000`.
    EpochSeconds,
    /// ISO-8601 extended format in UTC, e.g. `2023-11-14T22:13:20Z`.
    DateTime,
    /// RFC-1123 format with `GMT` and English names,
    /// e.g. `Tue, 14 Nov 2023 22:13:20 GMT`.
    HttpDate,
}

/// Instant in time.
///
/// Represented as seconds and sub-second nanos since the Unix epoch
/// (January 1, 1970 at midnight UTC/GMT).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct DateTime {
    seconds: i64,
    subsecond_nanos: u32,
}

impl DateTime {
    /// Creates a `DateTime` from a number of seconds since the Unix epoch.
    pub fn from_secs(epoch_seconds: i64) -> Self {
        DateTime {
            seconds: epoch_seconds,
            subsecond_nanos: 0,
        }
    }

    /// Creates a `DateTime` from a number of milliseconds since the Unix epoch.
    pub fn from_millis(epoch_millis: i64) -> Self {
        let (seconds, millis) = div_mod_floor(epoch_millis, MILLIS_PER_SECOND);
        DateTime::from_secs_and_nanos(seconds, millis as u32 * NANOS_PER_MILLI)
    }

    /// Creates a `DateTime` from a number of seconds and sub-second nanos since the Unix epoch.
    ///
    /// # Panics
    ///
    /// This will panic if `subsecond_nanos` is >= 1_000_000_000.
    pub fn from_secs_and_nanos(seconds: i64, subsecond_nanos: u32) -> Self {
        assert!(
            subsecond_nanos < NANOS_PER_SECOND,
            "{} is > 1_000_000_000",
            subsecond_nanos
        );
        DateTime {
            seconds,
            subsecond_nanos,
        }
    }

    /// Creates a `DateTime` from a fractional number of seconds since the Unix epoch.
    pub fn from_secs_f64(epoch_seconds: f64) -> Self {
        let seconds = epoch_seconds.floor() as i64;
        let rem = epoch_seconds - epoch_seconds.floor();
        let subsecond_nanos = ((rem * 1_000_000_000_f64).round() as u32).min(NANOS_PER_SECOND - 1);
        DateTime {
            seconds,
            subsecond_nanos,
        }
    }

    /// Returns the epoch seconds and fraction as an `f64`.
    ///
    /// Note: this conversion is lossy for timestamps far from the epoch.
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + self.subsecond_nanos as f64 / 1_000_000_000_f64
    }

    /// Returns the number of whole seconds since the Unix epoch.
    pub fn secs(&self) -> i64 {
        self.seconds
    }

    /// Returns the sub-second nanos of this `DateTime`.
    pub fn subsec_nanos(&self) -> u32 {
        self.subsecond_nanos
    }

    /// Returns the number of milliseconds since the Unix epoch, saturating on overflow.
    pub fn as_millis(&self) -> i64 {
        self.seconds
            .saturating_mul(MILLIS_PER_SECOND)
            .saturating_add((self.subsecond_nanos / NANOS_PER_MILLI) as i64)
    }

    /// Returns true if the sub-second nanos is non-zero.
    pub fn has_subsec_nanos(&self) -> bool {
        self.subsecond_nanos != 0
    }

    /// Parses a `DateTime` from a string using the given `format`.
    pub fn from_str(s: &str, format: Format) -> Result<Self, DateTimeParseError> {
        match format {
            Format::EpochSeconds => format::epoch_seconds::parse(s),
            Format::DateTime => format::date_time::parse(s),
            Format::HttpDate => format::http_date::parse(s),
        }
    }

    /// Formats this `DateTime` as a string using the given `format`.
    ///
    /// Returns an error if the given `DateTime` cannot be represented by the
    /// desired format (for example, years outside 1583..=9999 for
    /// [`Format::HttpDate`]).
    pub fn fmt(&self, format: Format) -> Result<String, DateTimeFormatError> {
        match format {
            Format::EpochSeconds => Ok(format::epoch_seconds::format(self)),
            Format::DateTime => format::date_time::format(self),
            Format::HttpDate => format::http_date::format(self),
        }
    }
}

impl From<SystemTime> for DateTime {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(duration) => DateTime::from_secs_and_nanos(
                duration.as_secs() as i64,
                duration.subsec_nanos(),
            ),
            Err(earlier) => {
                let duration = earlier.duration();
                let mut seconds = -(duration.as_secs() as i64);
                let mut nanos = duration.subsec_nanos();
                if nanos != 0 {
                    seconds -= 1;
                    nanos = NANOS_PER_SECOND - nanos;
                }
                DateTime::from_secs_and_nanos(seconds, nanos)
            }
        }
    }
}

impl TryFrom<DateTime> for SystemTime {
    type Error = std::num::TryFromIntError;

    fn try_from(value: DateTime) -> Result<Self, Self::Error> {
        let seconds = u64::try_from(value.seconds)?;
        Ok(UNIX_EPOCH + Duration::new(seconds, value.subsecond_nanos))
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format::date_time::format(self) {
            Ok(formatted) => write!(f, "{}", formatted),
            Err(_) => write!(f, "{}s since the Unix epoch", self.as_secs_f64()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_millis_handles_negatives() {
        assert_eq!(
            DateTime::from_millis(-1),
            DateTime::from_secs_and_nanos(-1, 999_000_000),
        );
        assert_eq!(
            DateTime::from_millis(1_500),
            DateTime::from_secs_and_nanos(1, 500_000_000),
        );
    }

    #[test]
    fn from_secs_f64_round_trips() {
        let dt = DateTime::from_secs_f64(1_700_000_000.5);
        assert_eq!(dt.secs(), 1_700_000_000);
        assert_eq!(dt.subsec_nanos(), 500_000_000);
        assert_eq!(dt.as_secs_f64(), 1_700_000_000.5);
    }

    #[test]
    fn system_time_conversions() {
        let dt = DateTime::from_secs_and_nanos(1_700_000_000, 250_000_000);
        let st = SystemTime::try_from(dt).unwrap();
        assert_eq!(DateTime::from(st), dt);
    }
}
