//! Configuration threaded through every decode call.

use std::io::{self, Write};

use chrono::{
    DateTime, FixedOffset, Offset, SecondsFormat, Timelike, Utc,
    format::{Item, StrftimeItems},
};
use thiserror::Error;

/// How a decoded timestamp is written (without the surrounding quotes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFormat {
    /// RFC 3339 to the second, e.g. `2006-01-02T15:04:05Z`.
    Rfc3339,
    /// RFC 3339 with up to nine fractional digits, trailing zeros trimmed,
    /// e.g. `2006-01-02T15:04:05.9Z`.
    Rfc3339Nano,
    /// A chrono `strftime` pattern. Build with [`TimeFormat::strftime`].
    Strftime(Pattern),
}

/// A `strftime` pattern known to hold no invalid items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(String);

impl Pattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An invalid `strftime` pattern.
#[derive(Debug, Error)]
#[error("Invalid time format pattern ({0:?}).")]
pub struct FormatError(pub String);

impl TimeFormat {
    /// A `strftime` pattern, checked up front so that writing cannot fail on
    /// it later.
    pub fn strftime(pattern: impl Into<String>) -> Result<Self, FormatError> {
        let pattern = pattern.into();

        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(FormatError(pattern));
        }

        Ok(Self::Strftime(Pattern(pattern)))
    }

    /// Write an instant in this format.
    pub fn write(&self, o: &mut impl Write, t: &DateTime<FixedOffset>) -> io::Result<()> {
        match self {
            Self::Rfc3339 => o.write_all(t.to_rfc3339_opts(SecondsFormat::Secs, true).as_bytes()),
            Self::Rfc3339Nano => {
                write!(o, "{}", t.format("%Y-%m-%dT%H:%M:%S"))?;

                let nanos = t.nanosecond();
                if nanos > 0 {
                    let fraction = format!("{nanos:09}");
                    write!(o, ".{}", fraction.trim_end_matches('0'))?;
                }

                if t.offset().local_minus_utc() == 0 {
                    o.write_all(b"Z")
                } else {
                    write!(o, "{}", t.format("%:z"))
                }
            }
            Self::Strftime(pattern) => write!(o, "{}", t.format(pattern.as_str())),
        }
    }
}

/// Decode configuration.
#[derive(Debug, Clone)]
pub struct Options {
    /// Zone in which timestamps are written.
    pub time_zone: FixedOffset,
    /// Format of timestamps encoded as integer seconds.
    pub integer_time_format: TimeFormat,
    /// Format of timestamps encoded as fractional seconds.
    pub nano_time_format: TimeFormat,
    /// Deepest nesting of arrays and maps accepted.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            time_zone: Utc.fix(),
            integer_time_format: TimeFormat::Rfc3339,
            nano_time_format: TimeFormat::Rfc3339Nano,
            max_depth: 256,
        }
    }
}

impl Options {
    pub fn with_time_zone(mut self, time_zone: FixedOffset) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn with_integer_time_format(mut self, format: TimeFormat) -> Self {
        self.integer_time_format = format;
        self
    }

    pub fn with_nano_time_format(mut self, format: TimeFormat) -> Self {
        self.nano_time_format = format;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
