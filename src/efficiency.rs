//! Days-off arithmetic for a set of vacation dates.
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

use serde::Serialize;

use crate::{
    date::CalendarDate,
    holiday::{HolidayCalendar, PublicHoliday},
};

/// Vacation days spent and the contiguous break they buy.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyStats {
    pub vacation_days_used: u32,
    pub total_days_off: u32,
}

impl EfficiencyStats {
    /// Days off per vacation day, `None` when nothing was spent
    pub fn ratio(&self) -> Option<f64> {
        (self.vacation_days_used > 0).then(|| self.total_days_off as f64 / self.vacation_days_used as f64)
    }
}

/// Computes vacation days used and total days off for a set of dates.
///
/// # Arguments
/// * `vacation_days` - Dates taken off, assumed deduplicated workdays
/// * `holidays` - Public holidays in effect
///
/// # Returns
/// * `EfficiencyStats` - `{0, 0}` for an empty set
///
/// # Algorithm
/// 1. Start from the window between the earliest and latest vacation day
/// 2. Extend the start backward over weekends and holidays
/// 3. Extend the end forward the same way
/// 4. Total days off is the inclusive length of the window
pub fn calculate_efficiency(vacation_days: &[CalendarDate], holidays: &[PublicHoliday]) -> EfficiencyStats {
    calculate_efficiency_with(vacation_days, &HolidayCalendar::from_public(holidays))
}

/// Same as [`calculate_efficiency`] against a prepared holiday calendar,
/// e.g. one that also holds company holidays.
pub fn calculate_efficiency_with(vacation_days: &[CalendarDate], calendar: &HolidayCalendar) -> EfficiencyStats {
    let (Some(first), Some(last)) = (vacation_days.iter().min(), vacation_days.iter().max()) else {
        return EfficiencyStats::default();
    };

    // Day shifts saturate at the calendar bounds, so stop once a step stalls
    let mut start = *first;
    while start.pred() != start && calendar.is_day_off(start.pred()) {
        start = start.pred();
    }

    let mut end = *last;
    while end.succ() != end && calendar.is_day_off(end.succ()) {
        end = end.succ();
    }

    EfficiencyStats {
        vacation_days_used: vacation_days.len() as u32,
        total_days_off: (start.days_until(end) + 1) as u32,
    }
}
