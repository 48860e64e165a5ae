//! Bridge-day period finder over a public holiday list.
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

use crate::{
    holiday::{HolidayCalendar, PublicHoliday, combine_days_off},
    rules::{bridge_rules, evaluate_table},
    suggestion::PlanSuggestion,
};

/// Number of suggestions kept after ranking
pub const MAX_PERIOD_SUGGESTIONS: usize = 10;

/// Finds bridge opportunities around public holidays.
///
/// # Arguments
/// * `holidays` - Public holidays, in any order
/// * `year` - Year the holidays belong to
///
/// # Returns
/// * Up to ten suggestions in chronological order, each date range at most once
///
/// # Algorithm
/// 1. Evaluate the bridge rule table for every holiday, chronologically
/// 2. Drop later suggestions whose `(start, end)` was already produced
/// 3. Rank by total days off (desc), then vacation days used (asc)
/// 4. Keep the best ten and re-sort them by start date
pub fn find_optimal_vacation_periods(holidays: &[PublicHoliday], year: i32) -> Vec<PlanSuggestion> {
    if holidays.is_empty() {
        return Vec::new();
    }

    let days_off = combine_days_off(holidays, &[]);
    let calendar = HolidayCalendar::from_days_off(&days_off);

    let mut seen = HashSet::new();
    let mut suggestions: Vec<PlanSuggestion> = evaluate_table(&bridge_rules(), &days_off, &calendar)
        .into_iter()
        .filter(|s| seen.insert(s.key()))
        .collect();

    tracing::debug!(year, holidays = holidays.len(), found = suggestions.len(), "bridge periods found");

    suggestions.sort_by(|a, b| {
        b.total_days_off
            .cmp(&a.total_days_off)
            .then(a.vacation_days_used.cmp(&b.vacation_days_used))
    });
    suggestions.truncate(MAX_PERIOD_SUGGESTIONS);
    suggestions.sort_by_key(|s| s.start_date);
    suggestions
}
