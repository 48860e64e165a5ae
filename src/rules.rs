//! Declarative bridge rules shared by the period finder and the strategies.
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
//!
//! Every rule is anchored on a day off and describes, in day offsets from
//! that anchor, which span it proposes and which days inside it have to be
//! taken as vacation. One evaluator runs every table.

use std::ops::RangeInclusive;

use chrono::Weekday;

use crate::{
    date::CalendarDate,
    holiday::{DayOff, HolidayCalendar, PublicHoliday},
    suggestion::PlanSuggestion,
};

/// Placeholder for the anchor's name in reason templates
const HOLIDAY_PLACEHOLDER: &str = "{holiday}";
/// Placeholder for the consecutive day off's name
const NEXT_PLACEHOLDER: &str = "{next}";
/// Placeholder for the total days off
const DAYS_PLACEHOLDER: &str = "{days}";

/// Precondition a rule checks before firing.
#[derive(Clone, Copy, Debug)]
pub enum Condition {
    Always,
    /// The day after the anchor is a weekend or holiday
    NextDayFree,
    /// The day after the anchor is a workday
    NextDayWorkday,
    /// The day at the offset is not a holiday
    NotHolidayAt(i64),
    /// The day at the offset is Monday to Friday
    WeekdayAt(i64),
    /// Another day off follows the anchor directly
    Consecutive,
    NotConsecutive,
}

/// Which days inside the span are spent as vacation.
#[derive(Clone, Copy, Debug)]
pub enum Vacation {
    /// Exactly these offsets (weekends among them don't count)
    Offsets(&'static [i64]),
    /// Every weekday of the span except the anchor
    SpanExceptAnchor,
}

/// One row of a rule table.
#[derive(Clone, Debug)]
pub struct BridgeRule {
    /// Weekday the anchor must fall on, any day if `None`
    pub weekday: Option<Weekday>,
    pub condition: Condition,
    /// Span start, relative to the anchor
    pub start: i64,
    /// Span end, relative to the anchor
    pub end: i64,
    pub vacation: Vacation,
    /// Days off gained on top of the vacation days
    pub extra_days_off: u32,
    /// Accepted vacation-day counts, anything if `None`
    pub accept: Option<RangeInclusive<u32>>,
    /// Reason template with `{holiday}`, `{next}` and `{days}` placeholders
    pub reason: &'static str,
}

/// What a rule can see about its anchor.
pub struct RuleContext<'a> {
    pub anchor: &'a DayOff,
    /// Day off falling on the day after the anchor
    pub next: Option<&'a DayOff>,
    pub calendar: &'a HolidayCalendar,
    /// Every day off under consideration, sorted
    pub days_off: &'a [DayOff],
}

impl<'a> RuleContext<'a> {
    /// Builds the context for `anchor`, looking up a directly following day off.
    pub fn new(anchor: &'a DayOff, days_off: &'a [DayOff], calendar: &'a HolidayCalendar) -> Self {
        let following = anchor.date.succ();
        Self {
            anchor,
            next: days_off.iter().find(|d| d.date == following),
            calendar,
            days_off,
        }
    }

    fn at(&self, offset: i64) -> CalendarDate {
        self.anchor.date.add_days(offset)
    }
}

impl BridgeRule {
    /// Evaluates the rule for one anchor.
    ///
    /// # Returns
    /// * `Some(PlanSuggestion)` if the weekday, condition and acceptance
    ///   range all match and at least one vacation day is needed
    /// * `None` otherwise
    pub fn evaluate(&self, ctx: &RuleContext) -> Option<PlanSuggestion> {
        if let Some(weekday) = self.weekday {
            if ctx.anchor.date.weekday() != weekday {
                return None;
            }
        }
        if !self.holds(ctx) {
            return None;
        }

        let start = ctx.at(self.start);
        let end = ctx.at(self.end);
        let vacation_count = match self.vacation {
            Vacation::Offsets(offsets) => offsets
                .iter()
                .filter(|offset| !ctx.at(**offset).is_weekend())
                .count(),
            Vacation::SpanExceptAnchor => start
                .iter_until(end)
                .filter(|d| !d.is_weekend() && *d != ctx.anchor.date)
                .count(),
        };
        let vacation_days_used = vacation_count as u32;

        if let Some(accept) = &self.accept {
            if !accept.contains(&vacation_days_used) {
                return None;
            }
        }

        let total_days_off = vacation_days_used + self.extra_days_off;
        let included: Vec<PublicHoliday> = ctx
            .days_off
            .iter()
            .filter(|d| d.date.is_within(start, end))
            .filter_map(|d| d.public.clone())
            .collect();

        PlanSuggestion::new(
            start,
            end,
            vacation_days_used,
            total_days_off,
            self.render_reason(ctx, total_days_off),
            included,
        )
    }

    fn holds(&self, ctx: &RuleContext) -> bool {
        match self.condition {
            Condition::Always => true,
            Condition::NextDayFree => ctx.calendar.is_day_off(ctx.at(1)),
            Condition::NextDayWorkday => ctx.calendar.is_workday(ctx.at(1)),
            Condition::NotHolidayAt(offset) => !ctx.calendar.is_holiday(ctx.at(offset)),
            Condition::WeekdayAt(offset) => !ctx.at(offset).is_weekend(),
            Condition::Consecutive => ctx.next.is_some(),
            Condition::NotConsecutive => ctx.next.is_none(),
        }
    }

    fn render_reason(&self, ctx: &RuleContext, total_days_off: u32) -> String {
        let next = ctx.next.map(|d| d.name.as_str()).unwrap_or_default();
        self.reason
            .replace(HOLIDAY_PLACEHOLDER, &ctx.anchor.name)
            .replace(NEXT_PLACEHOLDER, next)
            .replace(DAYS_PLACEHOLDER, &total_days_off.to_string())
    }
}

/// Runs a rule table over every day off, in order.
///
/// Rules fire independently, so one anchor can yield several suggestions.
pub fn evaluate_table(rules: &[BridgeRule], days_off: &[DayOff], calendar: &HolidayCalendar) -> Vec<PlanSuggestion> {
    let mut suggestions = Vec::new();
    for anchor in days_off {
        let ctx = RuleContext::new(anchor, days_off, calendar);
        for rule in rules {
            if let Some(suggestion) = rule.evaluate(&ctx) {
                tracing::debug!(anchor = %anchor.date, reason = %suggestion.reason, "bridge rule fired");
                suggestions.push(suggestion);
            }
        }
    }
    suggestions
}

const MON_TO_WED: &[i64] = &[-3, -2, -1];
const MON_TO_THU: &[i64] = &[-4, -3, -2, -1];

/// Plain bridge heuristic used by the period finder.
pub fn bridge_rules() -> Vec<BridgeRule> {
    vec![
        BridgeRule {
            weekday: Some(Weekday::Thu),
            condition: Condition::NextDayFree,
            start: -3,
            end: 1,
            vacation: Vacation::Offsets(MON_TO_WED),
            // Thu, Fri and the weekend
            extra_days_off: 4,
            accept: None,
            reason: "Bridge Mon-Wed before {holiday} (Thu-Fri)",
        },
        BridgeRule {
            weekday: Some(Weekday::Thu),
            condition: Condition::NextDayWorkday,
            start: -3,
            end: 0,
            vacation: Vacation::Offsets(MON_TO_WED),
            extra_days_off: 1,
            accept: None,
            reason: "Bridge Mon-Wed before {holiday} (Thursday) - {days}-day break",
        },
        BridgeRule {
            weekday: Some(Weekday::Thu),
            condition: Condition::NextDayWorkday,
            start: -3,
            end: 1,
            vacation: Vacation::Offsets(&[-3, -2, -1, 1]),
            // Thu and the weekend
            extra_days_off: 3,
            accept: None,
            reason: "Bridge Mon-Wed + Fri before {holiday} (Thursday) - {days}-day break",
        },
        BridgeRule {
            weekday: Some(Weekday::Fri),
            condition: Condition::NotHolidayAt(-4),
            start: -4,
            end: 0,
            vacation: Vacation::Offsets(MON_TO_THU),
            extra_days_off: 1,
            accept: None,
            reason: "Bridge Mon-Thu before {holiday} (Friday)",
        },
        BridgeRule {
            weekday: Some(Weekday::Tue),
            condition: Condition::WeekdayAt(-1),
            start: -1,
            end: 0,
            vacation: Vacation::Offsets(&[-1]),
            extra_days_off: 1,
            accept: None,
            reason: "Take Monday before {holiday} (Tuesday)",
        },
        BridgeRule {
            weekday: Some(Weekday::Thu),
            condition: Condition::Consecutive,
            start: -3,
            end: 1,
            vacation: Vacation::Offsets(MON_TO_WED),
            extra_days_off: 2,
            accept: None,
            reason: "Bridge Mon-Wed before consecutive holidays (Thu-Fri)",
        },
    ]
}

/// 3-4 day weekends around Thursday and Friday holidays.
pub fn long_weekend_rules() -> Vec<BridgeRule> {
    vec![
        BridgeRule {
            weekday: Some(Weekday::Thu),
            condition: Condition::Consecutive,
            start: -3,
            end: 1,
            vacation: Vacation::Offsets(MON_TO_WED),
            extra_days_off: 2,
            accept: None,
            reason: "Long weekend: Mon-Wed before {holiday} and {next}",
        },
        BridgeRule {
            weekday: Some(Weekday::Thu),
            condition: Condition::NotConsecutive,
            start: -3,
            end: 1,
            vacation: Vacation::Offsets(MON_TO_WED),
            extra_days_off: 1,
            accept: None,
            reason: "Long weekend: Mon-Wed before {holiday}",
        },
        BridgeRule {
            weekday: Some(Weekday::Fri),
            condition: Condition::Always,
            start: -4,
            end: 0,
            vacation: Vacation::Offsets(MON_TO_THU),
            extra_days_off: 1,
            accept: None,
            reason: "Long weekend: Mon-Thu before {holiday}",
        },
    ]
}

/// Monday-to-Friday breaks around early-week holidays.
///
/// The span is always the anchor's working week, Monday through Friday,
/// even when the following day off is also a holiday; that day is left out
/// of the vacation days and counted as an extra day off instead.
pub fn mini_break_rules() -> Vec<BridgeRule> {
    let mut rules = Vec::with_capacity(6);
    let weeks: [(Weekday, i64, &'static [i64], &'static [i64]); 3] = [
        (Weekday::Mon, 0, &[1, 2, 3, 4], &[2, 3, 4]),
        (Weekday::Tue, -1, &[-1, 1, 2, 3], &[-1, 2, 3]),
        (Weekday::Wed, -2, &[-2, -1, 1, 2], &[-2, -1, 2]),
    ];
    for (weekday, monday, alone, with_next) in weeks {
        rules.push(BridgeRule {
            weekday: Some(weekday),
            condition: Condition::NotConsecutive,
            start: monday,
            end: monday + 4,
            vacation: Vacation::Offsets(alone),
            extra_days_off: 1,
            accept: None,
            reason: "Mini break around {holiday}",
        });
        rules.push(BridgeRule {
            weekday: Some(weekday),
            condition: Condition::Consecutive,
            start: monday,
            end: monday + 4,
            vacation: Vacation::Offsets(with_next),
            extra_days_off: 2,
            accept: None,
            reason: "Mini break around {holiday} and {next}",
        });
    }
    rules
}

/// Nine-day window accepted at 7-9 vacation days.
pub fn week_long_rules() -> Vec<BridgeRule> {
    vec![BridgeRule {
        weekday: None,
        condition: Condition::Always,
        start: -5,
        end: 3,
        vacation: Vacation::SpanExceptAnchor,
        extra_days_off: 1,
        accept: Some(7..=9),
        reason: "Week-long break around {holiday}",
    }]
}

/// Fifteen-day window accepted at 10-15 vacation days.
pub fn extended_rules() -> Vec<BridgeRule> {
    vec![BridgeRule {
        weekday: None,
        condition: Condition::Always,
        start: -7,
        end: 7,
        vacation: Vacation::SpanExceptAnchor,
        extra_days_off: 1,
        accept: Some(10..=15),
        reason: "Extended vacation around {holiday}",
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::combine_days_off;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn run(rules: &[BridgeRule], holidays: &[PublicHoliday]) -> Vec<PlanSuggestion> {
        let days = combine_days_off(holidays, &[]);
        let calendar = HolidayCalendar::from_days_off(&days);
        evaluate_table(rules, &days, &calendar)
    }

    #[test]
    fn tuesday_rule_takes_single_monday() {
        let found = run(&bridge_rules(), &[PublicHoliday::new(date("2024-01-02"), "Tue")]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_date, date("2024-01-01"));
        assert_eq!(found[0].vacation_days_used, 1);
        assert_eq!(found[0].total_days_off, 2);
        assert_eq!(found[0].reason, "Take Monday before Tue (Tuesday)");
    }

    #[test]
    fn friday_rule_skipped_when_monday_is_holiday() {
        let holidays = [
            PublicHoliday::new(date("2024-01-01"), "Mon"),
            PublicHoliday::new(date("2024-01-05"), "Fri"),
        ];
        let found = run(&bridge_rules(), &holidays);
        assert!(found.iter().all(|s| !s.reason.contains("Mon-Thu")));
    }

    #[test]
    fn thursday_rule_reports_break_length() {
        let found = run(&bridge_rules(), &[PublicHoliday::new(date("2024-01-04"), "Test Thu")]);
        let reasons: Vec<&str> = found.iter().map(|s| s.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec![
                "Bridge Mon-Wed before Test Thu (Thursday) - 4-day break",
                "Bridge Mon-Wed + Fri before Test Thu (Thursday) - 7-day break",
            ]
        );
    }

    #[test]
    fn mini_break_excludes_consecutive_day() {
        let holidays = [
            PublicHoliday::new(date("2024-01-02"), "First"),
            PublicHoliday::new(date("2024-01-03"), "Second"),
        ];
        let found = run(&mini_break_rules(), &holidays);
        let first = &found[0];
        assert_eq!(first.reason, "Mini break around First and Second");
        assert_eq!((first.start_date, first.end_date), (date("2024-01-01"), date("2024-01-05")));
        // Mon, Thu, Fri
        assert_eq!(first.vacation_days_used, 3);
        assert_eq!(first.total_days_off, 5);
        assert_eq!(first.public_holidays_included.len(), 2);
    }

    #[test]
    fn week_long_window_respects_acceptance_range() {
        // A Saturday anchor leaves seven weekdays in its window
        let found = run(&week_long_rules(), &[PublicHoliday::new(date("2024-01-06"), "Sat")]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].vacation_days_used, 7);

        // A weekday anchor leaves at most six
        let rejected = run(&week_long_rules(), &[PublicHoliday::new(date("2024-01-10"), "Wed")]);
        assert!(rejected.is_empty());
    }
}
