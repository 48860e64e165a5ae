//! Calendar-date primitives shared by the planner.
//! 
//! MIT License
//! 
//! Copyright (c) 2026 66f94eae
//! 
//! Permission is hereby granted, free of charge, to any person obtaining a copy
//! of this software and associated documentation files (the "Software"), to deal
//! in the Software without restriction, including without limitation the rights
//! to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//! copies of the Software, and to permit persons to whom the Software is
//! furnished to do so, subject to the following conditions:
//! 
//! The above copyright notice and this permission notice shall be included in all
//! copies or substantial portions of the Software.
//! 
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//! IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//! AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//! LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//! OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//! SOFTWARE.

use std::{fmt, str::FromStr, sync::OnceLock};

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};

use crate::error::Error;

/// Canonical date format (YYYY-MM-DD)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Alternative layouts accepted when normalising stored dates
const LENIENT_DATE_FORMATS: [&str; 3] = ["%Y/%m/%d", "%Y%m%d", "%d.%m.%Y"];

/// Alternative date-time layouts accepted when normalising stored dates
const LENIENT_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

fn canonical_pattern() -> &'static Regex {
    static CANONICAL: OnceLock<Regex> = OnceLock::new();
    CANONICAL.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"))
}

/// A single calendar day, identified by its `YYYY-MM-DD` form.
///
/// Two dates are equal iff their canonical strings are equal, so the type
/// is ordered and hashable and can key sets and maps directly.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Builds a date from year, month and day, or `None` if it does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns `true` if `value` matches the canonical `YYYY-MM-DD` pattern.
    ///
    /// Only the shape is checked; `2024-02-30` matches.
    pub fn is_canonical(value: &str) -> bool {
        canonical_pattern().is_match(value)
    }

    /// Normalises a possibly malformed date string.
    ///
    /// # Arguments
    /// * `value` - Raw date string, e.g. read back from a stored plan
    ///
    /// # Returns
    /// * `Some(CalendarDate)` for canonical strings holding a real date, and
    ///   for non-canonical strings in one of the accepted layouts
    /// * `None` if nothing could be parsed
    ///
    /// # Accepted Layouts
    /// * `YYYY-MM-DD` (canonical)
    /// * RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS`
    /// * `YYYY/MM/DD`, `YYYYMMDD`, `DD.MM.YYYY`
    pub fn normalize(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if Self::is_canonical(value) {
            return NaiveDate::parse_from_str(value, DATE_FORMAT).ok().map(Self);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(Self(dt.date_naive()));
        }

        for fmt in LENIENT_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(Self(dt.date()));
            }
        }

        LENIENT_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .map(Self)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Saturday or Sunday
    pub fn is_weekend(&self) -> bool {
        matches!(self.0.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Shifts the date by a signed number of days, saturating at the
    /// calendar bounds chrono supports.
    pub fn add_days(&self, offset: i64) -> Self {
        let shifted = if offset >= 0 {
            self.0.checked_add_days(Days::new(offset as u64))
        } else {
            self.0.checked_sub_days(Days::new(offset.unsigned_abs()))
        };
        Self(shifted.unwrap_or(self.0))
    }

    pub fn succ(&self) -> Self {
        self.add_days(1)
    }

    pub fn pred(&self) -> Self {
        self.add_days(-1)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: CalendarDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Iterates every day from `self` to `end`, both inclusive.
    ///
    /// Empty if `end` is before `self`.
    pub fn iter_until(self, end: CalendarDate) -> impl Iterator<Item = CalendarDate> {
        let len = self.days_until(end).max(-1) + 1;
        (0..len).map(move |offset| self.add_days(offset))
    }

    /// Returns `true` if the date lies within `[start, end]`.
    pub fn is_within(&self, start: CalendarDate, end: CalendarDate) -> bool {
        start <= *self && *self <= end
    }
}

/// Weekdays (Mon-Fri) between `start` and `end`, both inclusive.
pub fn weekdays_between(start: CalendarDate, end: CalendarDate) -> Vec<CalendarDate> {
    start.iter_until(end).filter(|d| !d.is_weekend()).collect()
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    /// Strict parse: only the canonical layout holding a real date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_canonical(s) {
            return Err(Error::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl fmt::Debug for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CalendarDate({})", self)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(CalendarDateVisitor)
    }
}

/// Error message format for date deserialization errors.
const ERR_FMT: &str = "a calendar date like '2024-12-25'";

/// Visitor accepting canonical dates only.
struct CalendarDateVisitor;

impl<'a> Visitor<'a> for CalendarDateVisitor {
    type Value = CalendarDate;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", &ERR_FMT)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse::<CalendarDate>()
            .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &ERR_FMT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn strict_parse_round_trips_canonical_form() {
        assert_eq!(date("2024-01-04").to_string(), "2024-01-04");
        assert!("2024-1-4".parse::<CalendarDate>().is_err());
        assert!("2024-02-30".parse::<CalendarDate>().is_err());
        assert!(" 2024-01-04".parse::<CalendarDate>().is_err());
    }

    #[test]
    fn normalize_accepts_alternative_layouts() {
        let expected = Some(date("2024-03-05"));
        assert_eq!(CalendarDate::normalize(" 2024-03-05 "), expected);
        assert_eq!(CalendarDate::normalize("2024-03-05T10:00:00.000Z"), expected);
        assert_eq!(CalendarDate::normalize("2024-03-05T10:00:00"), expected);
        assert_eq!(CalendarDate::normalize("2024/03/05"), expected);
        assert_eq!(CalendarDate::normalize("20240305"), expected);
        assert_eq!(CalendarDate::normalize("05.03.2024"), expected);
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert_eq!(CalendarDate::normalize(""), None);
        assert_eq!(CalendarDate::normalize("not a date"), None);
        assert_eq!(CalendarDate::normalize("2024-13-01"), None);
    }

    #[test]
    fn weekend_detection() {
        assert!(date("2024-01-06").is_weekend());
        assert!(date("2024-01-07").is_weekend());
        assert!(!date("2024-01-08").is_weekend());
    }

    #[test]
    fn day_arithmetic_crosses_month_and_year() {
        assert_eq!(date("2024-12-31").succ(), date("2025-01-01"));
        assert_eq!(date("2024-03-01").pred(), date("2024-02-29"));
        assert_eq!(date("2024-01-04").add_days(-3), date("2024-01-01"));
        assert_eq!(date("2024-01-01").days_until(date("2024-01-04")), 3);
    }

    #[test]
    fn weekdays_between_skips_weekends() {
        let days = weekdays_between(date("2024-01-05"), date("2024-01-09"));
        assert_eq!(days, vec![date("2024-01-05"), date("2024-01-08"), date("2024-01-09")]);
        assert!(weekdays_between(date("2024-01-09"), date("2024-01-05")).is_empty());
    }

    #[test]
    fn serde_uses_canonical_string() {
        let json = serde_json::to_string(&date("2024-07-04")).unwrap();
        assert_eq!(json, "\"2024-07-04\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date("2024-07-04"));
        assert!(serde_json::from_str::<CalendarDate>("\"07/04/2024\"").is_err());
    }
}
