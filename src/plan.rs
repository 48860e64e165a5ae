//! Saved holiday plans and the stores that keep them.
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

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    date::CalendarDate,
    efficiency::{EfficiencyStats, calculate_efficiency_with},
    error::Result,
    holiday::{CompanyHoliday, HolidayCalendar, PublicHoliday},
    strategy::Strategy,
};

/// A named selection of vacation dates with the holidays it was made against.
///
/// `public_holidays` is a copy taken when the plan is created and is never
/// refreshed, so corrections to upstream holiday data don't rewrite history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HolidayPlan {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub country_code: String,
    pub year: i32,
    /// Raw date strings; stored data may predate validation
    pub vacation_days: Vec<String>,
    pub public_holidays: Vec<PublicHoliday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_holidays: Option<Vec<CompanyHoliday>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(default, rename = "availablePTODays", skip_serializing_if = "Option::is_none")]
    pub available_pto_days: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generates a fresh plan id.
pub fn create_plan_id() -> String {
    format!("plan-{}", uuid::Uuid::new_v4().simple())
}

impl HolidayPlan {
    /// Creates a plan, copying the holiday snapshot.
    ///
    /// Vacation days are deduplicated and stored chronologically.
    pub fn new(
        name: impl Into<String>,
        country_code: impl Into<String>,
        year: i32,
        vacation_days: &[CalendarDate],
        public_holidays: &[PublicHoliday],
    ) -> Self {
        let mut days = vacation_days.to_vec();
        days.sort();
        days.dedup();
        let now = Utc::now();

        Self {
            id: create_plan_id(),
            name: name.into(),
            description: None,
            country_code: country_code.into(),
            year,
            vacation_days: days.iter().map(ToString::to_string).collect(),
            public_holidays: public_holidays.to_vec(),
            company_holidays: None,
            strategy: None,
            available_pto_days: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_company_holidays(mut self, company_holidays: &[CompanyHoliday]) -> Self {
        self.company_holidays = Some(company_holidays.to_vec());
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_available_pto_days(mut self, days: u32) -> Self {
        self.available_pto_days = Some(days);
        self
    }

    /// Vacation days that normalise to a calendar date, deduplicated
    pub fn normalized_days(&self) -> Vec<CalendarDate> {
        let mut days: Vec<CalendarDate> = self
            .vacation_days
            .iter()
            .filter_map(|raw| CalendarDate::normalize(raw))
            .collect();
        days.sort();
        days.dedup();
        days
    }

    /// Efficiency of the plan against its own holiday snapshot.
    pub fn efficiency(&self) -> EfficiencyStats {
        let calendar = HolidayCalendar::from_public(&self.public_holidays)
            .with_company(self.company_holidays.as_deref().unwrap_or_default());
        calculate_efficiency_with(&self.normalized_days(), &calendar)
    }
}

/// Product identifier written into exported calendars
const ICAL_PRODID: &str = "-//pto-planner//Holiday Plan//EN";
/// iCalendar all-day date format: YYYYMMDD
const ICAL_DATE_FMT: &str = "%Y%m%d";
/// iCalendar UTC timestamp format
const ICAL_STAMP_FMT: &str = "%Y%m%dT%H%M%SZ";

/// Exports a plan as an iCalendar document.
///
/// # Returns
/// * A `VCALENDAR` with CRLF line endings holding one all-day event per
///   snapshot public holiday (transparent) and one per vacation day
///   (opaque, numbered chronologically)
///
/// # Note
/// All-day events end on the following day, as `DTEND` is exclusive.
/// Vacation days that don't normalise to a date are left out.
pub fn to_ical(plan: &HolidayPlan) -> String {
    let stamp = plan.updated_at.format(ICAL_STAMP_FMT).to_string();
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", ICAL_PRODID),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];

    for holiday in &plan.public_holidays {
        let description = format!("Public Holiday - {}", holiday.name);
        let event = IcalEvent {
            uid: format!("holiday-{}-{}@pto-planner", holiday.date, plan.id),
            date: holiday.date,
            summary: &holiday.local_name,
            description: &description,
            transparent: true,
        };
        event.write(&mut lines, &stamp);
    }

    let description = match &plan.description {
        Some(description) => format!("{} - {}", plan.name, description),
        None => plan.name.clone(),
    };
    for (index, date) in plan.normalized_days().into_iter().enumerate() {
        let summary = format!("Vacation Day {}", index + 1);
        let event = IcalEvent {
            uid: format!("vacation-{}-{}@pto-planner", date, plan.id),
            date,
            summary: &summary,
            description: &description,
            transparent: false,
        };
        event.write(&mut lines, &stamp);
    }

    lines.push("END:VCALENDAR".to_string());
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

/// One all-day VEVENT of an exported plan
struct IcalEvent<'a> {
    uid: String,
    date: CalendarDate,
    summary: &'a str,
    description: &'a str,
    transparent: bool,
}

impl IcalEvent<'_> {
    fn write(&self, lines: &mut Vec<String>, stamp: &str) {
        let start = self.date.naive().format(ICAL_DATE_FMT);
        let end = self.date.succ().naive().format(ICAL_DATE_FMT);
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", self.uid));
        lines.push(format!("DTSTAMP:{}", stamp));
        lines.push(format!("DTSTART;VALUE=DATE:{}", start));
        lines.push(format!("DTEND;VALUE=DATE:{}", end));
        lines.push(format!("SUMMARY:{}", escape_text(self.summary)));
        lines.push(format!("DESCRIPTION:{}", escape_text(self.description)));
        lines.push(format!("TRANSP:{}", if self.transparent { "TRANSPARENT" } else { "OPAQUE" }));
        lines.push("END:VEVENT".to_string());
    }
}

/// Escapes an iCalendar TEXT value
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Create/read/update/delete access to saved plans, keyed by id.
pub trait PlanStore {
    /// Inserts a plan, or replaces the plan with the same id and refreshes
    /// its `updated_at`.
    fn save(&mut self, plan: HolidayPlan) -> Result<()>;

    fn get(&self, id: &str) -> Result<Option<HolidayPlan>>;

    /// All plans in insertion order
    fn all(&self) -> Result<Vec<HolidayPlan>>;

    /// Removes a plan; returns whether it existed.
    fn delete(&mut self, id: &str) -> Result<bool>;

    fn clear(&mut self) -> Result<()>;
}

fn upsert(plans: &mut Vec<HolidayPlan>, mut plan: HolidayPlan) {
    match plans.iter_mut().find(|p| p.id == plan.id) {
        Some(existing) => {
            plan.updated_at = Utc::now();
            *existing = plan;
        }
        None => plans.push(plan),
    }
}

/// Plans held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryPlanStore {
    plans: Vec<HolidayPlan>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryPlanStore {
    fn save(&mut self, plan: HolidayPlan) -> Result<()> {
        upsert(&mut self.plans, plan);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<HolidayPlan>> {
        Ok(self.plans.iter().find(|p| p.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<HolidayPlan>> {
        Ok(self.plans.clone())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.plans.len();
        self.plans.retain(|p| p.id != id);
        Ok(self.plans.len() != before)
    }

    fn clear(&mut self) -> Result<()> {
        self.plans.clear();
        Ok(())
    }
}

/// Plans kept as a JSON array in a single file.
///
/// A missing file reads as no plans. Every write rewrites the file.
#[derive(Clone, Debug)]
pub struct JsonPlanStore {
    path: PathBuf,
}

impl JsonPlanStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<HolidayPlan>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, plans: &[HolidayPlan]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(plans)?)?;
        tracing::info!(path = %self.path.display(), plans = plans.len(), "plans written");
        Ok(())
    }
}

impl PlanStore for JsonPlanStore {
    fn save(&mut self, plan: HolidayPlan) -> Result<()> {
        let mut plans = self.read()?;
        upsert(&mut plans, plan);
        self.write(&plans)
    }

    fn get(&self, id: &str) -> Result<Option<HolidayPlan>> {
        Ok(self.read()?.into_iter().find(|p| p.id == id))
    }

    fn all(&self) -> Result<Vec<HolidayPlan>> {
        self.read()
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let mut plans = self.read()?;
        let before = plans.len();
        plans.retain(|p| p.id != id);
        let removed = plans.len() != before;
        if removed {
            self.write(&plans)?;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn sample_plan() -> HolidayPlan {
        let holidays = vec![PublicHoliday::new(date("2024-01-04"), "Test Thu")];
        HolidayPlan::new(
            "Winter",
            "DE",
            2024,
            &[date("2024-01-03"), date("2024-01-01"), date("2024-01-02"), date("2024-01-01")],
            &holidays,
        )
    }

    #[test]
    fn ical_export_lists_holidays_and_vacation_days() {
        let plan = sample_plan().with_description("Skiing");
        let ical = to_ical(&plan);

        assert!(ical.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ical.ends_with("END:VCALENDAR\r\n"));
        assert!(!ical.replace("\r\n", "").contains('\n'));
        assert_eq!(ical.matches("BEGIN:VEVENT").count(), 4);
        assert_eq!(ical.matches("TRANSP:TRANSPARENT").count(), 1);
        assert_eq!(ical.matches("TRANSP:OPAQUE").count(), 3);
        assert!(ical.contains("DTSTART;VALUE=DATE:20240104\r\nDTEND;VALUE=DATE:20240105\r\n"));
        assert!(ical.contains("SUMMARY:Vacation Day 3\r\n"));
        assert!(ical.contains("DESCRIPTION:Winter - Skiing\r\n"));
        assert!(ical.contains("DESCRIPTION:Public Holiday - Test Thu\r\n"));
    }

    #[test]
    fn ical_export_escapes_text() {
        let mut plan = sample_plan();
        plan.name = "Ski; snow, sun".to_string();
        plan.vacation_days.push("not a date".to_string());
        let ical = to_ical(&plan);

        assert!(ical.contains("DESCRIPTION:Ski\\; snow\\, sun\r\n"));
        assert_eq!(ical.matches("TRANSP:OPAQUE").count(), 3);
    }

    #[test]
    fn new_plan_dedups_and_sorts_days() {
        let plan = sample_plan();
        assert_eq!(plan.vacation_days, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert!(plan.id.starts_with("plan-"));
        assert_eq!(plan.created_at, plan.updated_at);
    }

    #[test]
    fn snapshot_is_independent_of_source() {
        let mut holidays = vec![PublicHoliday::new(date("2024-01-04"), "Test Thu")];
        let plan = HolidayPlan::new("p", "DE", 2024, &[date("2024-01-03")], &holidays);
        holidays[0].local_name = "Renamed".to_string();
        holidays.clear();
        assert_eq!(plan.public_holidays.len(), 1);
        assert_eq!(plan.public_holidays[0].local_name, "Test Thu");
    }

    #[test]
    fn plan_efficiency_uses_snapshot() {
        let plan = sample_plan();
        let stats = plan.efficiency();
        assert_eq!(stats.vacation_days_used, 3);
        // Sat 2023-12-30 through the Thursday holiday
        assert_eq!(stats.total_days_off, 6);
    }

    #[test]
    fn memory_store_upserts_by_id() {
        let mut store = MemoryPlanStore::new();
        let mut plan = sample_plan();
        store.save(plan.clone()).unwrap();

        plan.name = "Renamed".to_string();
        store.save(plan.clone()).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Renamed");
        assert!(all[0].updated_at >= plan.created_at);

        assert!(store.delete(&plan.id).unwrap());
        assert!(!store.delete(&plan.id).unwrap());
        assert!(store.get(&plan.id).unwrap().is_none());
    }

    #[test]
    fn json_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plans.json");
        let plan = sample_plan().with_strategy(Strategy::MiniBreaks).with_available_pto_days(20);

        let mut store = JsonPlanStore::new(&path);
        assert!(store.all().unwrap().is_empty());
        store.save(plan.clone()).unwrap();

        let reopened = JsonPlanStore::new(&path);
        let loaded = reopened.get(&plan.id).unwrap().unwrap();
        assert_eq!(loaded, plan);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"availablePTODays\": 20"));
        assert!(raw.contains("\"strategy\": \"mini-breaks\""));

        let mut store = reopened;
        store.clear().unwrap();
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn json_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plans.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonPlanStore::new(&path);
        assert!(matches!(store.all(), Err(crate::error::Error::Json(_))));
    }
}
