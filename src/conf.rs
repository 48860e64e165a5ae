//! Configuration file structure and parsing for the planner.
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

use std::path::PathBuf;

use chrono_tz::Tz;
use pto_planner::{CalendarDate, CompanyHoliday, Strategy};
use serde::{de::{Error, Visitor}, Deserialize};

/// Default directory for plans and ledger when none is configured
const DEFAULT_STORE_DIR: &str = ".pto-planner";
/// Plans file name inside the store directory
const PLANS_FILE: &str = "plans.json";
/// Ledger file name inside the store directory
const LEDGER_FILE: &str = "ledger.json";

/// Main configuration structure for the application.
///
/// Holds the country and year to plan for, where holidays come from,
/// the company's own days off and where plans are kept.
#[derive(Deserialize, Clone)]
pub struct Conf {
    /// Basic planning settings
    base: Base,
    /// Holiday data sources
    calendar: Option<Calendar>,
    /// Company holidays on top of public ones
    #[serde(default, rename = "company_holiday")]
    company_holidays: Vec<CompanyHolidayConf>,
    /// Storage settings
    store: Option<Store>,
}

/// Basic planning settings.
#[derive(Deserialize, Clone)]
struct Base {
    /// ISO 3166-1 alpha-2 country code
    country: String,
    /// Year to plan
    year: i32,
    /// Regions whose holidays apply, e.g. "DE-BY"; empty keeps all
    #[serde(default)]
    regions: Vec<String>,
    /// Default PTO budget
    pto_days: Option<u32>,
    /// Default strategy, unknown names mean balanced
    #[serde(default)]
    strategy: Strategy,
    /// Planning window, deserialized from "2024" or "2024-03-01..2024-09-30"
    #[serde(default, deserialize_with = "deserialize_timeframe")]
    timeframe: Option<Timeframe>,
    /// IANA zone timed calendar events are mapped into, UTC if unset
    timezone: Option<String>,
}

/// Holiday data sources.
#[derive(Deserialize, Clone)]
struct Calendar {
    /// URLs or file paths; `{year}` and `{country}` are substituted
    source: Option<Vec<String>>,
}

/// A company holiday as written in the configuration.
#[derive(Deserialize, Clone)]
struct CompanyHolidayConf {
    id: Option<String>,
    date: CalendarDate,
    name: String,
}

/// Storage settings.
#[derive(Deserialize, Clone)]
struct Store {
    /// Directory holding plans.json and ledger.json
    dir: PathBuf,
}

/// Inclusive planning window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Timeframe {
    /// A whole calendar year
    CalendarYear(i32),
    /// Custom start and end dates
    Custom(CalendarDate, CalendarDate),
}

impl Timeframe {
    /// Returns the first and last day of the window.
    pub fn bounds(&self) -> Option<(CalendarDate, CalendarDate)> {
        match *self {
            Timeframe::CalendarYear(year) => {
                Some((CalendarDate::from_ymd(year, 1, 1)?, CalendarDate::from_ymd(year, 12, 31)?))
            }
            Timeframe::Custom(start, end) => Some((start, end)),
        }
    }
}

impl Conf {
    pub fn country(&self) -> &str {
        &self.base.country
    }

    pub fn year(&self) -> i32 {
        self.base.year
    }

    pub fn regions(&self) -> &[String] {
        &self.base.regions
    }

    pub fn pto_days(&self) -> Option<u32> {
        self.base.pto_days
    }

    pub fn strategy(&self) -> Strategy {
        self.base.strategy
    }

    /// Returns the planning window, the configured year if none is set.
    pub fn timeframe(&self) -> Timeframe {
        self.base
            .timeframe
            .unwrap_or(Timeframe::CalendarYear(self.base.year))
    }

    /// Returns the zone for timed calendar events.
    ///
    /// An unknown zone name falls back to UTC with a warning.
    pub fn timezone(&self) -> Tz {
        match self.base.timezone.as_deref().map(str::parse::<Tz>) {
            Some(Ok(tz)) => tz,
            Some(Err(_)) => {
                tracing::warn!(timezone = ?self.base.timezone, "unknown timezone, using UTC");
                Tz::UTC
            }
            None => Tz::UTC,
        }
    }

    /// Returns the holiday sources with placeholders substituted.
    ///
    /// # Returns
    /// - Source URIs, empty if none are configured
    pub fn sources(&self) -> Vec<String> {
        let year = self.base.year.to_string();
        self.calendar
            .as_ref()
            .and_then(|cal| cal.source.as_deref())
            .unwrap_or_default()
            .iter()
            .map(|uri| uri.replace("{year}", &year).replace("{country}", &self.base.country))
            .collect()
    }

    /// Returns the configured company holidays, numbering those without an id.
    pub fn company_holidays(&self) -> Vec<CompanyHoliday> {
        self.company_holidays
            .iter()
            .enumerate()
            .map(|(index, h)| {
                let id = h.id.clone().unwrap_or_else(|| format!("company-{}", index + 1));
                let mut holiday = CompanyHoliday::new(id, h.date, h.name.clone());
                holiday.country_code = Some(self.base.country.clone());
                holiday
            })
            .collect()
    }

    fn store_dir(&self) -> PathBuf {
        self.store
            .as_ref()
            .map(|s| s.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR))
    }

    pub fn plans_path(&self) -> PathBuf {
        self.store_dir().join(PLANS_FILE)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.store_dir().join(LEDGER_FILE)
    }
}

/// Deserializes a timeframe from a year or a date range.
///
/// # Supported Formats
/// * Year: `2024` or `"2024"`
/// * Range: `"2024-03-01..2024-09-30"` (inclusive)
fn deserialize_timeframe<'de, D>(deserializer: D) -> Result<Option<Timeframe>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(TimeframeVisitor).map(Some)
}

/// Error message format for timeframe deserialization errors.
const ERR_FMT: &str = "a year like 2024 or a range like '2024-03-01..2024-09-30'";

/// Visitor for deserializing timeframe values.
struct TimeframeVisitor;

impl<'a> Visitor<'a> for TimeframeVisitor {
    type Value = Timeframe;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", &ERR_FMT)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i32::try_from(v)
            .map(Timeframe::CalendarYear)
            .map_err(|_| Error::invalid_value(serde::de::Unexpected::Signed(v), &ERR_FMT))
    }

    /// Processes a year or range string.
    ///
    /// # Examples
    /// * "2024" → whole year 2024
    /// * "2024-03-01..2024-09-30" → March to September
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let v = v.trim();
        if let Ok(year) = v.parse::<i32>() {
            return Ok(Timeframe::CalendarYear(year));
        }

        let Some((start, end)) = v.split_once("..") else {
            return Err(Error::invalid_value(serde::de::Unexpected::Str(v), &ERR_FMT));
        };

        match (start.trim().parse::<CalendarDate>(), end.trim().parse::<CalendarDate>()) {
            (Ok(start), Ok(end)) if start <= end => Ok(Timeframe::Custom(start, end)),
            (Ok(_), Ok(_)) => Err(Error::custom(format!("timeframe '{}' ends before it starts", v))),
            _ => Err(Error::invalid_value(serde::de::Unexpected::Str(v), &ERR_FMT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[base]
country = "DE"
year = 2024
regions = ["DE-BY"]
pto_days = 25
strategy = "mini-breaks"
timeframe = "2024-03-01..2024-09-30"
timezone = "Europe/Berlin"

[calendar]
source = ["https://date.nager.at/api/v3/PublicHolidays/{year}/{country}", "company.ics"]

[[company_holiday]]
date = "2024-12-24"
name = "Christmas Eve"

[[company_holiday]]
id = "summer"
date = "2024-08-16"
name = "Summer Friday"

[store]
dir = "/tmp/pto"
"#;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn full_configuration_parses() {
        let conf: Conf = toml::from_str(SAMPLE).unwrap();
        assert_eq!(conf.country(), "DE");
        assert_eq!(conf.regions(), &["DE-BY".to_string()]);
        assert_eq!(conf.pto_days(), Some(25));
        assert_eq!(conf.strategy(), Strategy::MiniBreaks);
        assert_eq!(conf.timeframe(), Timeframe::Custom(date("2024-03-01"), date("2024-09-30")));
        assert_eq!(
            conf.sources(),
            vec!["https://date.nager.at/api/v3/PublicHolidays/2024/DE".to_string(), "company.ics".to_string()]
        );

        let company = conf.company_holidays();
        assert_eq!(company[0].id, "company-1");
        assert_eq!(company[1].id, "summer");
        assert_eq!(conf.plans_path(), PathBuf::from("/tmp/pto/plans.json"));
        assert_eq!(conf.timezone(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn minimal_configuration_uses_defaults() {
        let conf: Conf = toml::from_str("[base]\ncountry = \"US\"\nyear = 2025\n").unwrap();
        assert_eq!(conf.strategy(), Strategy::Balanced);
        assert_eq!(conf.timeframe().bounds(), Some((date("2025-01-01"), date("2025-12-31"))));
        assert!(conf.sources().is_empty());
        assert_eq!(conf.ledger_path(), PathBuf::from(".pto-planner/ledger.json"));
        assert_eq!(conf.timezone(), Tz::UTC);
    }

    #[test]
    fn timeframe_accepts_bare_year() {
        let conf: Conf = toml::from_str("[base]\ncountry = \"US\"\nyear = 2025\ntimeframe = 2026\n").unwrap();
        assert_eq!(conf.timeframe(), Timeframe::CalendarYear(2026));
    }

    #[test]
    fn reversed_timeframe_is_rejected() {
        let bad = "[base]\ncountry = \"US\"\nyear = 2025\ntimeframe = \"2025-09-01..2025-03-01\"\n";
        assert!(toml::from_str::<Conf>(bad).is_err());
    }
}
