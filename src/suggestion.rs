//! Vacation suggestions and turning them into concrete vacation dates.
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

use serde::{Deserialize, Serialize};

use crate::{
    date::CalendarDate,
    error::{Error, Result},
    holiday::{CompanyHoliday, HolidayCalendar, PublicHoliday},
};

/// Identity of a suggestion: its date range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SuggestionKey {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

/// A proposed vacation span and what it buys.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSuggestion {
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub vacation_days_used: u32,
    pub total_days_off: u32,
    /// `total_days_off / vacation_days_used`
    pub efficiency: f64,
    pub reason: String,
    pub public_holidays_included: Vec<PublicHoliday>,
}

impl PlanSuggestion {
    /// Builds a suggestion, deriving efficiency from the day counts.
    ///
    /// # Returns
    /// * `None` if `vacation_days_used` is zero (efficiency is undefined)
    pub fn new(
        start_date: CalendarDate,
        end_date: CalendarDate,
        vacation_days_used: u32,
        total_days_off: u32,
        reason: impl Into<String>,
        public_holidays_included: Vec<PublicHoliday>,
    ) -> Option<Self> {
        if vacation_days_used == 0 {
            return None;
        }
        Some(Self {
            start_date,
            end_date,
            vacation_days_used,
            total_days_off,
            efficiency: total_days_off as f64 / vacation_days_used as f64,
            reason: reason.into(),
            public_holidays_included,
        })
    }

    pub fn key(&self) -> SuggestionKey {
        SuggestionKey {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// Resolves a date range into the workdays that must be taken off.
///
/// # Arguments
/// * `start`, `end` - Inclusive range, usually from a suggestion
/// * `holidays` - Public holidays in effect
/// * `company_holidays` - Company holidays in effect
///
/// # Returns
/// * `Ok(Vec<CalendarDate>)` - Workdays in the range, chronological
///
/// # Errors
/// * `Error::InvalidRange` if `start` is after `end`
/// * `Error::NoApplicableDates` if every day in the range is already free
pub fn apply_range(
    start: CalendarDate,
    end: CalendarDate,
    holidays: &[PublicHoliday],
    company_holidays: &[CompanyHoliday],
) -> Result<Vec<CalendarDate>> {
    if start > end {
        return Err(Error::InvalidRange { start, end });
    }

    let calendar = HolidayCalendar::from_public(holidays).with_company(company_holidays);
    let dates: Vec<CalendarDate> = start
        .iter_until(end)
        .filter(|d| calendar.is_workday(*d))
        .collect();

    if dates.is_empty() {
        return Err(Error::NoApplicableDates { start, end });
    }
    Ok(dates)
}

/// [`apply_range`] over a suggestion's span.
pub fn apply_suggestion(
    suggestion: &PlanSuggestion,
    holidays: &[PublicHoliday],
    company_holidays: &[CompanyHoliday],
) -> Result<Vec<CalendarDate>> {
    apply_range(suggestion.start_date, suggestion.end_date, holidays, company_holidays)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn efficiency_is_derived() {
        let s = PlanSuggestion::new(date("2024-01-01"), date("2024-01-05"), 4, 5, "x", vec![]).unwrap();
        assert!((s.efficiency - 1.25).abs() < f64::EPSILON);
        assert!(PlanSuggestion::new(date("2024-01-01"), date("2024-01-05"), 0, 5, "x", vec![]).is_none());
    }

    #[test]
    fn applying_skips_weekends_and_holidays() {
        let holidays = vec![PublicHoliday::new(date("2024-01-04"), "Test Thu")];
        let company = vec![CompanyHoliday::new("c1", date("2024-01-02"), "Offsite")];
        let dates = apply_range(date("2024-01-01"), date("2024-01-07"), &holidays, &company).unwrap();
        assert_eq!(dates, vec![date("2024-01-01"), date("2024-01-03"), date("2024-01-05")]);
    }

    #[test]
    fn fully_free_range_is_distinct_error() {
        let holidays = vec![PublicHoliday::new(date("2024-12-25"), "Christmas")];
        let err = apply_range(date("2024-12-25"), date("2024-12-25"), &holidays, &[]).unwrap_err();
        assert!(matches!(err, Error::NoApplicableDates { .. }));

        let weekend = apply_range(date("2024-01-06"), date("2024-01-07"), &[], &[]).unwrap_err();
        assert!(matches!(weekend, Error::NoApplicableDates { .. }));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = apply_range(date("2024-01-07"), date("2024-01-01"), &[], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }
}
