//! Time range parsing for section-restricted downloads.
//!
//! A manifest range is `"<start>-<end>"` where both parts are seconds,
//! integer or decimal. Decimals are truncated to whole seconds before
//! formatting as `HH:MM:SS` timestamps for the download tool.

use std::fmt;

use crate::error::{Error, Result};

/// A validated download section, inclusive start to exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start_secs: u64,
    end_secs: u64,
}

impl TimeRange {
    /// Parse a `"<start>-<end>"` range string.
    ///
    /// Fails when the string does not split into exactly two numeric
    /// parts, or when the end is not strictly greater than the start.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('-').collect();
        let [start, end] = parts.as_slice() else {
            return Err(Error::invalid_time_range(
                input,
                "expected exactly two parts separated by '-'",
            ));
        };

        let start_secs = parse_seconds(input, start)?;
        let end_secs = parse_seconds(input, end)?;

        if end_secs <= start_secs {
            return Err(Error::invalid_time_range(
                input,
                "end must be strictly greater than start",
            ));
        }

        Ok(Self {
            start_secs,
            end_secs,
        })
    }

    pub fn start_secs(&self) -> u64 {
        self.start_secs
    }

    pub fn end_secs(&self) -> u64 {
        self.end_secs
    }

    /// Start of the range as a zero-padded `HH:MM:SS` timestamp.
    pub fn start_timestamp(&self) -> String {
        format_timestamp(self.start_secs)
    }

    /// End of the range as a zero-padded `HH:MM:SS` timestamp.
    pub fn end_timestamp(&self) -> String {
        format_timestamp(self.end_secs)
    }

    /// The `--download-sections` argument: `*HH:MM:SS-HH:MM:SS`.
    pub fn section_arg(&self) -> String {
        format!("*{}-{}", self.start_timestamp(), self.end_timestamp())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_timestamp(), self.end_timestamp())
    }
}

fn parse_seconds(input: &str, part: &str) -> Result<u64> {
    let value: f64 = part
        .trim()
        .parse()
        .map_err(|_| Error::invalid_time_range(input, format!("{part:?} is not a number")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_time_range(
            input,
            format!("{part:?} is not a valid number of seconds"),
        ));
    }
    Ok(value as u64)
}

fn format_timestamp(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
