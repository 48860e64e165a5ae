//! Command dispatch: loads holidays, runs the planner and renders results.
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

use std::{error::Error, fmt::Write};

use pto_planner::{
    CalendarDate, CompanyHoliday, EfficiencyStats, HolidayCalendar, HolidayPlan, JsonFileStore, JsonPlanStore,
    LedgerSnapshot, OptimizationParams, PlanStore, PlanSuggestion, PtoLedger, PublicHoliday, Strategy,
    all_overlapping_dates, apply_range, calculate_efficiency_with, detect_plan_overlaps,
    filter_holidays_by_regions, find_optimal_vacation_periods, optimize_by_strategy, plan_statistics, to_ical,
};
use serde::Serialize;

use crate::{
    cli::{Command, PlansCommand, PtoCommand},
    conf::Conf,
    source,
};

type CmdResult = Result<String, Box<dyn Error>>;

/// PTO figures as shown by `pto show`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PtoReport {
    #[serde(flatten)]
    snapshot: LedgerSnapshot,
    initial: u32,
    last_input: u32,
    plans: usize,
}

/// Ties configuration, plan store and ledger together for one invocation
pub struct Planner {
    conf: Conf,
    json: bool,
    plans: JsonPlanStore,
    ledger: PtoLedger<JsonFileStore>,
}

impl Planner {
    /// Creates a planner over the configured storage directory
    ///
    /// # Arguments
    /// * `conf` - Parsed configuration
    /// * `json` - Render output as JSON instead of text
    pub fn new(conf: Conf, json: bool) -> Self {
        Self {
            plans: JsonPlanStore::new(conf.plans_path()),
            ledger: PtoLedger::new(JsonFileStore::new(conf.ledger_path())),
            conf,
            json,
        }
    }

    /// Runs a command and returns what should be printed
    pub async fn run(&mut self, command: &Command) -> CmdResult {
        match command {
            Command::Suggest { strategy, from, to, simple } => {
                let holidays = self.holidays().await;
                if *simple {
                    self.suggest_simple(&holidays)
                } else {
                    self.suggest(&holidays, strategy.unwrap_or(self.conf.strategy()), *from, *to)
                }
            }
            Command::Efficiency { dates } => {
                let holidays = self.holidays().await;
                self.efficiency(&holidays, dates)
            }
            Command::Apply { start, end, name, description, strategy } => {
                let holidays = self.holidays().await;
                self.apply(&holidays, *start, *end, name, description.as_deref(), *strategy)
            }
            Command::Plans { action } => self.plans(action),
            Command::Pto { action } => self.pto(action),
            Command::Overlaps { id } => self.overlaps(id.as_deref()),
        }
    }

    /// Public holidays of the configured year, narrowed to the configured regions
    async fn holidays(&self) -> Vec<PublicHoliday> {
        let loaded = source::load_holidays(&self.conf.sources(), self.conf.year(), self.conf.timezone()).await;
        let holidays = filter_holidays_by_regions(&loaded, self.conf.regions());
        tracing::debug!(loaded = loaded.len(), applicable = holidays.len(), "holidays ready");
        if holidays.is_empty() {
            tracing::warn!(country = self.conf.country(), year = self.conf.year(), "no public holidays available");
        }
        holidays
    }

    /// PTO budget handed to the optimiser: the ledger total, else the configured default
    fn budget(&self) -> Result<u32, Box<dyn Error>> {
        let total = self.ledger.total_pto_days()?;
        Ok(if total > 0 { total } else { self.conf.pto_days().unwrap_or(0) })
    }

    fn suggest_simple(&self, holidays: &[PublicHoliday]) -> CmdResult {
        let suggestions = find_optimal_vacation_periods(holidays, self.conf.year());
        self.render(&suggestions, |s| render_suggestions(s, None))
    }

    fn suggest(
        &self,
        holidays: &[PublicHoliday],
        strategy: Strategy,
        from: Option<CalendarDate>,
        to: Option<CalendarDate>,
    ) -> CmdResult {
        let Some((start, end)) = self.conf.timeframe().bounds() else {
            return Err("configured timeframe is out of range".into());
        };
        let (start_date, end_date) = (from.unwrap_or(start), to.unwrap_or(end));
        if start_date > end_date {
            return Err(pto_planner::Error::InvalidRange { start: start_date, end: end_date }.into());
        }

        let params = OptimizationParams {
            holidays: holidays.to_vec(),
            company_holidays: self.conf.company_holidays(),
            available_pto_days: self.budget()?,
            strategy,
            start_date,
            end_date,
        };
        let suggestions = optimize_by_strategy(&params);
        self.render(&suggestions, |s| render_suggestions(s, Some(&params)))
    }

    fn efficiency(&self, holidays: &[PublicHoliday], dates: &[CalendarDate]) -> CmdResult {
        let mut dates = dates.to_vec();
        dates.sort();
        dates.dedup();

        let calendar = HolidayCalendar::from_public(holidays).with_company(&self.conf.company_holidays());
        let stats = calculate_efficiency_with(&dates, &calendar);
        self.render(&stats, render_efficiency)
    }

    fn apply(
        &mut self,
        holidays: &[PublicHoliday],
        start: CalendarDate,
        end: CalendarDate,
        name: &str,
        description: Option<&str>,
        strategy: Option<Strategy>,
    ) -> CmdResult {
        let company = self.conf.company_holidays();
        let dates = apply_range(start, end, holidays, &company)?;

        let mut plan = HolidayPlan::new(name, self.conf.country(), self.conf.year(), &dates, holidays)
            .with_available_pto_days(self.budget()?);
        if let Some(description) = description {
            plan = plan.with_description(description);
        }
        if !company.is_empty() {
            plan = plan.with_company_holidays(&company);
        }
        if let Some(strategy) = strategy {
            plan = plan.with_strategy(strategy);
        }

        self.plans.save(plan.clone())?;
        tracing::info!(plan = %plan.id, days = dates.len(), "plan saved");

        let all = self.plans.all()?;
        let overlaps = detect_plan_overlaps(&plan, &all);
        if overlaps.overlap_count > 0 {
            tracing::warn!(plan = %plan.id, shared = overlaps.overlap_count, "plan shares days with other plans");
        }

        let snapshot = self.ledger.snapshot(&all)?;
        self.render(&plan, |p| {
            let mut out = render_plan(p);
            if overlaps.overlap_count > 0 {
                let _ = writeln!(out, "Shares {} day(s) with other plans", overlaps.overlap_count);
            }
            let _ = write!(out, "{}", render_ledger(&snapshot));
            out
        })
    }

    fn plans(&mut self, action: &PlansCommand) -> CmdResult {
        match action {
            PlansCommand::List => {
                let plans = self.plans.all()?;
                self.render(&plans, |plans| {
                    if plans.is_empty() {
                        return "No saved plans\n".to_string();
                    }
                    plans.iter().fold(String::new(), |mut out, p| {
                        let _ = writeln!(out, "{}  {}  {} day(s)  {}", p.id, p.name, p.vacation_days.len(), p.year);
                        out
                    })
                })
            }
            PlansCommand::Show { id } => {
                let plan = self.plans.get(id)?.ok_or_else(|| format!("plan '{}' not found", id))?;
                self.render(&plan, render_plan)
            }
            PlansCommand::Delete { id } => {
                if !self.plans.delete(id)? {
                    return Err(format!("plan '{}' not found", id).into());
                }
                self.render(&id, |id| format!("Deleted {}\n", id))
            }
            PlansCommand::Clear => {
                self.plans.clear()?;
                self.render(&"cleared", |_| "All plans deleted\n".to_string())
            }
            PlansCommand::Export { id, out } => {
                let plan = self.plans.get(id)?.ok_or_else(|| format!("plan '{}' not found", id))?;
                let ical = to_ical(&plan);
                let Some(path) = out else {
                    return Ok(ical);
                };
                std::fs::write(path, &ical)?;
                tracing::info!(plan = %plan.id, path = %path.display(), "plan exported");
                self.render(&path, |path| format!("Exported {} to {}\n", plan.id, path.display()))
            }
        }
    }

    fn pto(&mut self, action: &PtoCommand) -> CmdResult {
        match action {
            PtoCommand::Set { days } => {
                self.ledger.set_total_pto_days(*days)?;
                self.ledger.set_available_pto_days_input(*days)?;
            }
            PtoCommand::Reset => self.ledger.reset_all_pto_data()?,
            PtoCommand::Show => {}
        }

        let plans = self.plans.all()?;
        let report = PtoReport {
            snapshot: self.ledger.snapshot(&plans)?,
            initial: self.ledger.initial_pto_days()?,
            last_input: self.ledger.available_pto_days_input()?,
            plans: plans.len(),
        };
        self.render(&report, |r| {
            let mut out = render_ledger(&r.snapshot);
            if r.initial != r.snapshot.total {
                let _ = writeln!(out, "Initially: {}", r.initial);
            }
            let _ = writeln!(out, "Saved plans: {}", r.plans);
            out
        })
    }

    fn overlaps(&self, id: Option<&str>) -> CmdResult {
        let plans = self.plans.all()?;

        let Some(id) = id else {
            let shared = all_overlapping_dates(&plans);
            let stats = plan_statistics(&plans);
            return self.render(&(&shared, stats), |(shared, stats)| {
                let mut out = String::new();
                for (date, ids) in shared.iter() {
                    let _ = writeln!(out, "{}  {}", date, ids.join(", "));
                }
                let _ = writeln!(
                    out,
                    "{} nominal day(s), {} unique, {} shared",
                    stats.nominal_days, stats.unique_days, stats.shared_days
                );
                out
            });
        };

        let plan = plans
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| format!("plan '{}' not found", id))?;
        let info = detect_plan_overlaps(plan, &plans);
        self.render(&info, |info| {
            if info.overlap_count == 0 {
                return "No overlaps\n".to_string();
            }
            let dates: Vec<String> = info.overlapping_dates.iter().map(ToString::to_string).collect();
            let names: Vec<&str> = info.overlapping_plans.iter().map(|p| p.plan_name.as_str()).collect();
            format!("{} shared day(s): {}\nWith: {}\n", info.overlap_count, dates.join(", "), names.join(", "))
        })
    }

    /// Serializes `value` as pretty JSON or renders it as text
    fn render<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> CmdResult {
        if self.json {
            Ok(serde_json::to_string_pretty(value)? + "\n")
        } else {
            Ok(text(value))
        }
    }
}

fn render_suggestions(suggestions: &[PlanSuggestion], params: Option<&OptimizationParams>) -> String {
    let mut out = String::new();
    if let Some(params) = params {
        let _ = writeln!(
            out,
            "{} suggestions {} .. {} (budget {} day(s))",
            params.strategy, params.start_date, params.end_date, params.available_pto_days
        );
    }
    if suggestions.is_empty() {
        out.push_str("No suggestions\n");
        return out;
    }
    for s in suggestions {
        let _ = writeln!(
            out,
            "{} .. {}  {} PTO -> {} days off ({:.2}x)  {}",
            s.start_date, s.end_date, s.vacation_days_used, s.total_days_off, s.efficiency, s.reason
        );
    }
    out
}

fn render_efficiency(stats: &EfficiencyStats) -> String {
    match stats.ratio() {
        Some(ratio) => format!(
            "{} vacation day(s) -> {} days off ({:.2}x)\n",
            stats.vacation_days_used, stats.total_days_off, ratio
        ),
        None => "No vacation days\n".to_string(),
    }
}

fn render_plan(plan: &HolidayPlan) -> String {
    let mut out = format!("{}  {} ({} {})\n", plan.id, plan.name, plan.country_code, plan.year);
    if let Some(description) = &plan.description {
        let _ = writeln!(out, "{}", description);
    }
    let _ = writeln!(out, "Vacation days: {}", plan.vacation_days.join(", "));
    let holidays = plan.company_holidays.as_deref().map(<[CompanyHoliday]>::len).unwrap_or(0);
    let _ = writeln!(
        out,
        "Snapshot: {} public holiday(s), {} company holiday(s)",
        plan.public_holidays.len(),
        holidays
    );
    out.push_str(&render_efficiency(&plan.efficiency()));
    out
}

fn render_ledger(snapshot: &LedgerSnapshot) -> String {
    format!(
        "PTO: {} total, {} used, {} remaining\n",
        snapshot.total, snapshot.used, snapshot.remaining
    )
}
