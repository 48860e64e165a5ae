//! Strategy-shaped optimisation over public and company holidays.
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

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    date::CalendarDate,
    holiday::{CompanyHoliday, DayOff, HolidayCalendar, PublicHoliday, combine_days_off},
    rules::{self, BridgeRule, evaluate_table},
    suggestion::{PlanSuggestion, SuggestionKey},
};

/// Number of suggestions returned by the optimiser
pub const MAX_STRATEGY_SUGGESTIONS: usize = 20;

/// Shape of breaks the user is after.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Long weekends and mini breaks combined
    #[default]
    Balanced,
    /// 3-4 day weekends
    LongWeekends,
    /// 5-6 day breaks
    MiniBreaks,
    /// 7-9 day breaks
    WeekLong,
    /// 10-15 day vacations
    Extended,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Balanced,
        Strategy::LongWeekends,
        Strategy::MiniBreaks,
        Strategy::WeekLong,
        Strategy::Extended,
    ];

    /// Resolves a strategy name, falling back to `Balanced` for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "long-weekends" => Strategy::LongWeekends,
            "mini-breaks" => Strategy::MiniBreaks,
            "week-long" => Strategy::WeekLong,
            "extended" => Strategy::Extended,
            "balanced" => Strategy::Balanced,
            other => {
                tracing::warn!(strategy = other, "unknown strategy, using balanced");
                Strategy::Balanced
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::LongWeekends => "long-weekends",
            Strategy::MiniBreaks => "mini-breaks",
            Strategy::WeekLong => "week-long",
            Strategy::Extended => "extended",
        }
    }

    /// Rule table driving this strategy
    pub fn rules(&self) -> Vec<BridgeRule> {
        match self {
            Strategy::LongWeekends => rules::long_weekend_rules(),
            Strategy::MiniBreaks => rules::mini_break_rules(),
            Strategy::WeekLong => rules::week_long_rules(),
            Strategy::Extended => rules::extended_rules(),
            Strategy::Balanced => {
                let mut rules = rules::long_weekend_rules();
                rules.extend(rules::mini_break_rules());
                rules
            }
        }
    }
}

impl FromStr for Strategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Strategy::from_name(s))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Strategy::from_name(&name))
    }
}

/// Inputs of [`optimize_by_strategy`].
#[derive(Clone, Debug)]
pub struct OptimizationParams {
    pub holidays: Vec<PublicHoliday>,
    pub company_holidays: Vec<CompanyHoliday>,
    /// Carried for callers; suggestions are not rationed against it
    pub available_pto_days: u32,
    pub strategy: Strategy,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
}

/// Produces strategy-shaped suggestions inside a timeframe.
///
/// # Arguments
/// * `params` - Holidays, strategy and the inclusive timeframe
///
/// # Returns
/// * At most twenty suggestions in chronological order
///
/// # Note
/// * Suggestions are not filtered by `available_pto_days`; every
///   opportunity is listed and budget fitting is left to the caller
pub fn optimize_by_strategy(params: &OptimizationParams) -> Vec<PlanSuggestion> {
    let days_off: Vec<DayOff> = combine_days_off(&params.holidays, &params.company_holidays)
        .into_iter()
        .filter(|d| d.date.is_within(params.start_date, params.end_date))
        .collect();
    let calendar = HolidayCalendar::from_days_off(&days_off);

    let periods = evaluate_table(&params.strategy.rules(), &days_off, &calendar);
    tracing::debug!(
        strategy = %params.strategy,
        days_off = days_off.len(),
        candidates = periods.len(),
        available_pto_days = params.available_pto_days,
        "strategy candidates evaluated"
    );

    deduplicate(periods)
}

/// Keeps one suggestion per date range and orders them chronologically.
///
/// On collision the higher efficiency wins, then the longer reason; an
/// exact tie keeps the earlier suggestion.
fn deduplicate(periods: Vec<PlanSuggestion>) -> Vec<PlanSuggestion> {
    let mut unique: BTreeMap<SuggestionKey, PlanSuggestion> = BTreeMap::new();

    for suggestion in periods {
        match unique.get(&suggestion.key()) {
            Some(existing) if !replaces(&suggestion, existing) => {}
            _ => {
                unique.insert(suggestion.key(), suggestion);
            }
        }
    }

    unique.into_values().take(MAX_STRATEGY_SUGGESTIONS).collect()
}

fn replaces(candidate: &PlanSuggestion, existing: &PlanSuggestion) -> bool {
    if candidate.efficiency != existing.efficiency {
        return candidate.efficiency > existing.efficiency;
    }
    candidate.reason.len() > existing.reason.len()
}
