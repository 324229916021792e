use chrono::{Duration, Local, NaiveDate};

use crate::error::{RoadmapError, RoadmapResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Only the exact ten-character shape is accepted: no padding, no
/// single-digit months or days, no surrounding whitespace.
pub fn parse_date(input: &str) -> RoadmapResult<NaiveDate> {
    if !has_iso_shape(input) {
        return Err(RoadmapError::invalid_date(input));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| RoadmapError::invalid_date(input))
}

fn has_iso_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Source of "today" for callers at the outer boundary.
///
/// The query and layout functions never consult a clock themselves; they
/// take the reference date as a parameter.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
