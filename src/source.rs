//! Holiday source loading from iCalendar and JSON feeds.
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

use std::{
    collections::HashSet,
    io::{BufRead, Cursor},
    sync::Arc,
};

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use ical::property::Property;
use pto_planner::{CalendarDate, PublicHoliday};
use thiserror::Error;
use tokio::task::JoinSet;

/// iCalendar property key for event summary
const KEY_SUMMARY: &str = "SUMMARY";
/// iCalendar property key for event start time
const KEY_DTSTART: &str = "DTSTART";
/// iCalendar property key for event end time
const KEY_DTEND: &str = "DTEND";
/// iCalendar property key for event description
const KEY_DESCRIPTION: &str = "DESCRIPTION";

/// Marker opening an iCalendar document
const ICAL_MARKER: &str = "BEGIN:VCALENDAR";

/// iCalendar date format: YYYYMMDD
const DATE_FMT: &str = "%Y%m%d";
/// iCalendar datetime format: YYYYMMDDTHHMMSS
const DT_FMT: &str = "%Y%m%dT%H%M%S";

/// Failure reading a single holiday source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid holiday JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads public holidays from all configured sources.
///
/// # Arguments
/// * `sources` - HTTP(S) URLs or local file paths
/// * `year` - Only holidays in this year are kept
/// * `tz` - Zone whose calendar dates timed events are mapped to
///
/// # Returns
/// * Holidays from every readable source, sorted by date, duplicates removed
///
/// # Note
/// A source that fails is logged and skipped.
pub async fn load_holidays(sources: &[String], year: i32, tz: Tz) -> Vec<PublicHoliday> {
    let client = Arc::new(reqwest::Client::new());
    let mut tasks = JoinSet::new();

    for uri in sources {
        let client = Arc::clone(&client);
        let uri = uri.clone();
        tasks.spawn(async move {
            let result = read_source(&client, &uri).await;
            (uri, result)
        });
    }

    let mut holidays = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((uri, Ok(bytes))) => match parse_holidays(&bytes, tz) {
                Ok(parsed) => {
                    tracing::debug!(source = %uri, holidays = parsed.len(), "holiday source loaded");
                    holidays.extend(parsed);
                }
                Err(err) => tracing::warn!(source = %uri, error = %err, "skipping unreadable holiday source"),
            },
            Ok((uri, Err(err))) => tracing::warn!(source = %uri, error = %err, "skipping holiday source"),
            Err(err) => tracing::warn!(error = %err, "holiday source task failed"),
        }
    }

    normalize_holidays(holidays, year)
}

/// Keeps holidays of `year`, sorted by date, one per date and name.
fn normalize_holidays(mut holidays: Vec<PublicHoliday>, year: i32) -> Vec<PublicHoliday> {
    holidays.retain(|h| h.date.year() == year);
    holidays.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.local_name.cmp(&b.local_name)));
    let mut seen = HashSet::new();
    holidays.retain(|h| seen.insert((h.date, h.local_name.clone())));
    holidays
}

/// Reads the raw bytes of a source
async fn read_source(client: &reqwest::Client, uri: &str) -> Result<Vec<u8>, SourceError> {
    if uri.starts_with("http") {
        let resp = client.get(uri).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    } else {
        Ok(std::fs::read(uri)?)
    }
}

/// Parses holiday data, detecting iCalendar or JSON by content.
pub fn parse_holidays(bytes: &[u8], tz: Tz) -> Result<Vec<PublicHoliday>, SourceError> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(64)]);
    if head.trim_start_matches('\u{feff}').trim_start().starts_with(ICAL_MARKER) {
        Ok(parse_calendar(Cursor::new(bytes), tz))
    } else {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A calendar event reduced to what a holiday needs
#[derive(Default)]
struct Event {
    summary: Option<String>,
    description: Option<String>,
    start: Option<CalendarDate>,
    /// Exclusive end of an all-day event
    all_day_end: Option<CalendarDate>,
}

impl Event {
    /// Expands the event into one holiday per covered day
    fn into_holidays(self) -> Vec<PublicHoliday> {
        let Some(start) = self.start else {
            return Vec::new();
        };
        let local_name = self.summary.unwrap_or_else(|| "NO_SUMMARY".to_string());
        let name = self.description.unwrap_or_else(|| local_name.clone());
        let last = match self.all_day_end {
            Some(end) if end > start => end.pred(),
            _ => start,
        };

        start
            .iter_until(last)
            .map(|date| {
                let mut holiday = PublicHoliday::new(date, local_name.clone());
                holiday.name = name.clone();
                holiday
            })
            .collect()
    }
}

/// Parses iCalendar data from a reader
///
/// # Arguments
/// * `reader` - Buffered reader containing iCalendar data
/// * `tz` - Zone whose calendar dates timed events are mapped to
///
/// # Returns
/// * `Vec<PublicHoliday>` - One holiday per event day; events without a
///   usable start are skipped
fn parse_calendar<T: BufRead>(reader: T, tz: Tz) -> Vec<PublicHoliday> {
    let mut holidays = Vec::new();
    let parser = ical::IcalParser::new(reader);

    for calendar in parser {
        let cal = match calendar {
            Ok(cal) => cal,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed calendar");
                continue;
            }
        };

        for event in cal.events {
            let mut my_event = Event::default();
            let mut end_is_date = false;
            let mut start_is_date = false;
            let mut end = None;

            for prop in event.properties {
                match prop.name.as_str() {
                    KEY_SUMMARY => my_event.summary = prop.value.clone(),
                    KEY_DESCRIPTION => my_event.description = prop.value.clone(),
                    KEY_DTSTART => {
                        start_is_date = is_date_value(&prop);
                        my_event.start = parse_date(&prop, tz).ok();
                    }
                    KEY_DTEND => {
                        end_is_date = is_date_value(&prop);
                        end = parse_date(&prop, tz).ok();
                    }
                    _ => {}
                }
            }

            // Only all-day events span whole days with an exclusive end
            if start_is_date && end_is_date {
                my_event.all_day_end = end;
            }
            holidays.extend(my_event.into_holidays());
        }
    }
    holidays
}

fn is_date_value(prop: &Property) -> bool {
    prop.value.as_deref().map(str::trim).map(str::len) == Some(8)
}

/// Parses an iCalendar date or datetime into a calendar date
///
/// # Supported Formats
/// * YYYYMMDD (all-day events), taken verbatim
/// * YYYYMMDDTHHMMSSZ (UTC time), converted to `tz`
/// * YYYYMMDDTHHMMSS with TZID parameter, converted from that zone to `tz`
/// * YYYYMMDDTHHMMSS (floating time), taken verbatim
fn parse_date(prop: &Property, tz: Tz) -> Result<CalendarDate, &'static str> {
    let Some(value) = &prop.value else {
        return Err("Missing datetime value");
    };

    let value = value.trim().to_uppercase();

    if value.len() == 8 {
        return NaiveDate::parse_from_str(&value, DATE_FMT)
            .map(CalendarDate::from)
            .map_err(|_| "Invalid date format");
    }

    if let Some(utc) = value.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(utc, DT_FMT)
            .map(|dt| CalendarDate::from(Utc.from_utc_datetime(&dt).with_timezone(&tz).date_naive()))
            .map_err(|_| "Invalid datetime format");
    }

    let naive = NaiveDateTime::parse_from_str(&value, DT_FMT).map_err(|_| "Invalid datetime format")?;

    if let Some(params) = &prop.params {
        for (name, field) in params {
            if name.to_uppercase() == "TZID" && !field.is_empty() {
                let Ok(source_tz) = field[0].parse::<Tz>() else {
                    return Err("Invalid timezone identifier");
                };
                return match source_tz.from_local_datetime(&naive) {
                    chrono::offset::LocalResult::Single(dt) => Ok(dt.with_timezone(&tz).date_naive().into()),
                    chrono::offset::LocalResult::Ambiguous(early, _) => {
                        Ok(early.with_timezone(&tz).date_naive().into())
                    }
                    chrono::offset::LocalResult::None => Err("Invalid datetime for timezone"),
                };
            }
        }
    }

    // Floating time
    Ok(naive.date().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    const ICS: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//test//EN\r
BEGIN:VEVENT\r
UID:1\r
SUMMARY:Weihnachten\r
DESCRIPTION:Christmas\r
DTSTART;VALUE=DATE:20241225\r
DTEND;VALUE=DATE:20241227\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:2\r
SUMMARY:Late Party\r
DTSTART:20241231T233000Z\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:3\r
SUMMARY:Zoned\r
DTSTART;TZID=America/New_York:20240704T200000\r
DTEND;TZID=America/New_York:20240704T230000\r
END:VEVENT\r
END:VCALENDAR\r
";

    #[test]
    fn all_day_events_expand_over_exclusive_end() {
        let holidays = parse_holidays(ICS.as_bytes(), Tz::UTC).unwrap();
        let christmas: Vec<_> = holidays.iter().filter(|h| h.local_name == "Weihnachten").collect();
        assert_eq!(christmas.len(), 2);
        assert_eq!(christmas[0].date, date("2024-12-25"));
        assert_eq!(christmas[1].date, date("2024-12-26"));
        assert_eq!(christmas[0].name, "Christmas");
    }

    #[test]
    fn timed_events_map_to_target_zone() {
        let utc = parse_holidays(ICS.as_bytes(), Tz::UTC).unwrap();
        let berlin = parse_holidays(ICS.as_bytes(), chrono_tz::Europe::Berlin).unwrap();

        let find = |list: &[PublicHoliday], name: &str| list.iter().find(|h| h.local_name == name).unwrap().date;
        assert_eq!(find(&utc, "Late Party"), date("2024-12-31"));
        assert_eq!(find(&berlin, "Late Party"), date("2025-01-01"));
        // 20:00 in New York is past midnight UTC
        assert_eq!(find(&utc, "Zoned"), date("2024-07-05"));
    }

    #[test]
    fn json_sources_use_provider_shape() {
        let json = br#"[{"date":"2024-05-01","localName":"Tag der Arbeit","name":"Labour Day","global":true,"counties":null}]"#;
        let holidays = parse_holidays(json, Tz::UTC).unwrap();
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].name, "Labour Day");
        assert!(parse_holidays(b"<html>", Tz::UTC).is_err());
    }

    #[test]
    fn normalization_filters_year_and_duplicates() {
        let holidays = vec![
            PublicHoliday::new(date("2024-12-26"), "B"),
            PublicHoliday::new(date("2024-12-25"), "A"),
            PublicHoliday::new(date("2024-12-25"), "A"),
            PublicHoliday::new(date("2025-01-01"), "C"),
        ];
        let kept = normalize_holidays(holidays, 2024);
        let names: Vec<&str> = kept.iter().map(|h| h.local_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn missing_sources_are_skipped() {
        let dir = std::env::temp_dir().join("pto-planner-missing-source.json");
        let holidays = load_holidays(&[dir.display().to_string()], 2024, Tz::UTC).await;
        assert!(holidays.is_empty());
    }
}
