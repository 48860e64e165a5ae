//! Public and company holidays and the day-off lookups built from them.
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

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;

/// A public holiday as published by the holiday provider.
///
/// Field names follow the provider's JSON shape so lists can be read and
/// stored without conversion.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicHoliday {
    pub date: CalendarDate,
    /// Name in the country's language
    pub local_name: String,
    /// English name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default)]
    pub fixed: bool,
    /// Applies to every region of the country
    #[serde(default = "default_global")]
    pub global: bool,
    /// Regions the holiday applies to when it is not global
    #[serde(default)]
    pub counties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

fn default_global() -> bool {
    true
}

impl PublicHoliday {
    /// Creates a global holiday with the same local and English name.
    pub fn new(date: CalendarDate, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            date,
            local_name: name.clone(),
            name,
            country_code: None,
            fixed: false,
            global: true,
            counties: None,
            launch_year: None,
            types: Vec::new(),
        }
    }

    /// Restricts the holiday to the given regions.
    pub fn with_counties<I, S>(mut self, counties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global = false;
        self.counties = Some(counties.into_iter().map(Into::into).collect());
        self
    }

    /// Checks whether the holiday is observed in any of `regions`
    ///
    /// Global holidays and non-global holidays without a region list are
    /// observed everywhere.
    pub fn applies_to(&self, regions: &[String]) -> bool {
        if self.global {
            return true;
        }
        match &self.counties {
            Some(counties) if !counties.is_empty() => {
                counties.iter().any(|county| regions.contains(county))
            }
            _ => true,
        }
    }
}

/// A holiday granted by the employer on top of public holidays.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyHoliday {
    pub id: String,
    pub date: CalendarDate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl CompanyHoliday {
    pub fn new(id: impl Into<String>, date: CalendarDate, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date,
            name: name.into(),
            country_code: None,
        }
    }
}

/// Keeps the holidays observed in the selected regions.
///
/// An empty selection keeps everything.
pub fn filter_holidays_by_regions(holidays: &[PublicHoliday], regions: &[String]) -> Vec<PublicHoliday> {
    if regions.is_empty() {
        return holidays.to_vec();
    }
    holidays
        .iter()
        .filter(|h| h.applies_to(regions))
        .cloned()
        .collect()
}

/// A non-working day from either holiday list.
#[derive(Clone, Debug, PartialEq)]
pub struct DayOff {
    pub date: CalendarDate,
    pub name: String,
    /// The originating public holiday, `None` for company holidays
    pub public: Option<PublicHoliday>,
}

impl DayOff {
    pub fn is_public(&self) -> bool {
        self.public.is_some()
    }
}

impl From<&PublicHoliday> for DayOff {
    fn from(holiday: &PublicHoliday) -> Self {
        Self {
            date: holiday.date,
            name: holiday.local_name.clone(),
            public: Some(holiday.clone()),
        }
    }
}

impl From<&CompanyHoliday> for DayOff {
    fn from(holiday: &CompanyHoliday) -> Self {
        Self {
            date: holiday.date,
            name: holiday.name.clone(),
            public: None,
        }
    }
}

/// Merges both holiday lists into one chronologically sorted list.
pub fn combine_days_off(public: &[PublicHoliday], company: &[CompanyHoliday]) -> Vec<DayOff> {
    let mut days: Vec<DayOff> = public
        .iter()
        .map(DayOff::from)
        .chain(company.iter().map(DayOff::from))
        .collect();
    days.sort_by_key(|d| d.date);
    days
}

/// Set of holiday dates used to answer "is this day free?".
#[derive(Clone, Debug, Default)]
pub struct HolidayCalendar {
    dates: HashSet<CalendarDate>,
}

impl HolidayCalendar {
    pub fn from_public(holidays: &[PublicHoliday]) -> Self {
        Self {
            dates: holidays.iter().map(|h| h.date).collect(),
        }
    }

    pub fn from_days_off(days: &[DayOff]) -> Self {
        Self {
            dates: days.iter().map(|d| d.date).collect(),
        }
    }

    pub fn with_company(mut self, company: &[CompanyHoliday]) -> Self {
        self.dates.extend(company.iter().map(|h| h.date));
        self
    }

    pub fn is_holiday(&self, date: CalendarDate) -> bool {
        self.dates.contains(&date)
    }

    /// Weekend or holiday
    pub fn is_day_off(&self, date: CalendarDate) -> bool {
        date.is_weekend() || self.is_holiday(date)
    }

    pub fn is_workday(&self, date: CalendarDate) -> bool {
        !self.is_day_off(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn provider_json_deserializes() {
        let json = r#"[{
            "date": "2024-10-03",
            "localName": "Tag der Deutschen Einheit",
            "name": "German Unity Day",
            "countryCode": "DE",
            "fixed": true,
            "global": true,
            "counties": null,
            "launchYear": null,
            "types": ["Public"]
        }, {
            "date": "2024-01-06",
            "localName": "Heilige Drei Könige",
            "name": "Epiphany",
            "global": false,
            "counties": ["DE-BW", "DE-BY", "DE-ST"]
        }]"#;
        let holidays: Vec<PublicHoliday> = serde_json::from_str(json).unwrap();
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].date, date("2024-10-03"));
        assert!(holidays[0].global);
        assert_eq!(holidays[1].counties.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn region_filter_keeps_global_and_matching() {
        let holidays = vec![
            PublicHoliday::new(date("2024-10-03"), "Unity Day"),
            PublicHoliday::new(date("2024-01-06"), "Epiphany").with_counties(["DE-BY"]),
            PublicHoliday::new(date("2024-10-31"), "Reformation Day").with_counties(["DE-SN"]),
        ];

        let all = filter_holidays_by_regions(&holidays, &[]);
        assert_eq!(all.len(), 3);

        let bavaria = filter_holidays_by_regions(&holidays, &["DE-BY".to_string()]);
        let names: Vec<&str> = bavaria.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Unity Day", "Epiphany"]);
    }

    #[test]
    fn non_global_without_regions_applies_everywhere() {
        let mut holiday = PublicHoliday::new(date("2024-05-01"), "Labour Day");
        holiday.global = false;
        assert!(holiday.applies_to(&["XX".to_string()]));
    }

    #[test]
    fn combined_days_are_sorted_and_tagged() {
        let public = vec![PublicHoliday::new(date("2024-12-25"), "Christmas")];
        let company = vec![CompanyHoliday::new("c1", date("2024-12-24"), "Christmas Eve")];
        let days = combine_days_off(&public, &company);
        assert_eq!(days[0].date, date("2024-12-24"));
        assert!(!days[0].is_public());
        assert!(days[1].is_public());
    }

    #[test]
    fn calendar_treats_weekends_and_holidays_as_free() {
        let cal = HolidayCalendar::from_public(&[PublicHoliday::new(date("2024-12-25"), "Christmas")])
            .with_company(&[CompanyHoliday::new("c1", date("2024-12-24"), "Eve")]);
        assert!(cal.is_day_off(date("2024-12-24")));
        assert!(cal.is_day_off(date("2024-12-25")));
        assert!(cal.is_day_off(date("2024-12-28")));
        assert!(cal.is_workday(date("2024-12-23")));
    }
}
