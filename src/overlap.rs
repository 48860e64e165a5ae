//! Detects vacation days shared between saved plans.
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

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::{date::CalendarDate, plan::HolidayPlan};

/// Reference to a plan sharing dates with another.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRef {
    pub plan_id: String,
    pub plan_name: String,
}

/// Dates of one plan that other plans also contain.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverlapInfo {
    /// Sorted, without duplicates
    pub overlapping_dates: Vec<CalendarDate>,
    pub overlapping_plans: Vec<PlanRef>,
    pub overlap_count: usize,
}

/// Vacation-day totals across every plan.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatistics {
    /// Sum of each plan's own day count
    pub nominal_days: usize,
    /// Days counted once no matter how many plans hold them
    pub unique_days: usize,
    /// Days held by two or more plans
    pub shared_days: usize,
}

/// Valid dates of a plan; malformed entries are skipped with a warning.
fn plan_dates(plan: &HolidayPlan) -> BTreeSet<CalendarDate> {
    plan.vacation_days
        .iter()
        .filter_map(|raw| {
            let date = CalendarDate::normalize(raw);
            if date.is_none() {
                tracing::warn!(plan = %plan.id, raw = %raw, "skipping unparseable vacation day");
            }
            date
        })
        .collect()
}

/// Finds which of `plan`'s dates appear in other plans, and in which.
///
/// # Arguments
/// * `plan` - Plan to check
/// * `all_plans` - Every saved plan; entries with `plan`'s id are skipped
///
/// # Returns
/// * `OverlapInfo` with sorted dates and the contributing plans in
///   `all_plans` order
pub fn detect_plan_overlaps(plan: &HolidayPlan, all_plans: &[HolidayPlan]) -> OverlapInfo {
    let own = plan_dates(plan);
    let mut dates = BTreeSet::new();
    let mut contributors = HashSet::new();

    for other in all_plans.iter().filter(|p| p.id != plan.id) {
        let shared: Vec<CalendarDate> = plan_dates(other).intersection(&own).copied().collect();
        if !shared.is_empty() {
            contributors.insert(other.id.as_str());
            dates.extend(shared);
        }
    }

    let mut listed = HashSet::new();
    let overlapping_plans = all_plans
        .iter()
        .filter(|p| contributors.contains(p.id.as_str()) && listed.insert(p.id.as_str()))
        .map(|p| PlanRef {
            plan_id: p.id.clone(),
            plan_name: p.name.clone(),
        })
        .collect();

    OverlapInfo {
        overlap_count: dates.len(),
        overlapping_dates: dates.into_iter().collect(),
        overlapping_plans,
    }
}

/// Dates held by two or more distinct plans, with the ids of those plans.
pub fn all_overlapping_dates(plans: &[HolidayPlan]) -> BTreeMap<CalendarDate, Vec<String>> {
    let mut by_date: BTreeMap<CalendarDate, Vec<String>> = BTreeMap::new();
    for plan in plans {
        for date in plan_dates(plan) {
            let ids = by_date.entry(date).or_default();
            if !ids.contains(&plan.id) {
                ids.push(plan.id.clone());
            }
        }
    }
    by_date.retain(|_, ids| ids.len() > 1);
    by_date
}

/// Nominal versus unique vacation days across plans.
pub fn plan_statistics(plans: &[HolidayPlan]) -> PlanStatistics {
    let per_plan: Vec<BTreeSet<CalendarDate>> = plans.iter().map(plan_dates).collect();
    let unique: BTreeSet<&CalendarDate> = per_plan.iter().flatten().collect();

    PlanStatistics {
        nominal_days: per_plan.iter().map(BTreeSet::len).sum(),
        unique_days: unique.len(),
        shared_days: all_overlapping_dates(plans).len(),
    }
}
