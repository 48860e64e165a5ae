//! Vacation planning around public and company holidays.
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
//! The library finds bridge days that turn a few PTO days into long breaks,
//! shapes them by strategy, and keeps a PTO ledger across saved plans.
//!
//! ```
//! use pto_planner::{CalendarDate, PublicHoliday, find_optimal_vacation_periods};
//!
//! let thursday: CalendarDate = "2024-01-04".parse().unwrap();
//! let holidays = vec![PublicHoliday::new(thursday, "Test Thu")];
//! let suggestions = find_optimal_vacation_periods(&holidays, 2024);
//! assert!(suggestions.iter().any(|s| s.vacation_days_used == 3));
//! ```

pub mod date;
pub mod efficiency;
pub mod error;
pub mod finder;
pub mod holiday;
pub mod ledger;
pub mod overlap;
pub mod plan;
pub mod rules;
pub mod store;
pub mod strategy;
pub mod suggestion;

pub use date::CalendarDate;
pub use efficiency::{EfficiencyStats, calculate_efficiency, calculate_efficiency_with};
pub use error::{Error, Result};
pub use finder::find_optimal_vacation_periods;
pub use holiday::{CompanyHoliday, DayOff, HolidayCalendar, PublicHoliday, filter_holidays_by_regions};
pub use ledger::{LedgerSnapshot, PtoLedger};
pub use overlap::{OverlapInfo, PlanRef, PlanStatistics, all_overlapping_dates, detect_plan_overlaps, plan_statistics};
pub use plan::{HolidayPlan, JsonPlanStore, MemoryPlanStore, PlanStore, to_ical};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use strategy::{OptimizationParams, Strategy, optimize_by_strategy};
pub use suggestion::{PlanSuggestion, SuggestionKey, apply_range, apply_suggestion};
