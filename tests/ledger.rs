use pretty_assertions::assert_eq;
use proptest::prelude::*;
use pto_planner::{
    CalendarDate, HolidayPlan, JsonFileStore, JsonPlanStore, LedgerSnapshot, MemoryStore, PlanStore, PtoLedger,
    detect_plan_overlaps,
};

fn date(s: &str) -> CalendarDate {
    s.parse().unwrap()
}

fn plan(name: &str, start: &str, len: i64) -> HolidayPlan {
    let first = date(start);
    let days: Vec<CalendarDate> = (0..len).map(|offset| first.add_days(offset)).collect();
    HolidayPlan::new(name, "DE", 2024, &days, &[])
}

#[test]
fn budget_follows_saved_plans() {
    let dir = tempfile::tempdir().unwrap();
    let mut plans = JsonPlanStore::new(dir.path().join("plans.json"));
    let mut ledger = PtoLedger::new(JsonFileStore::new(dir.path().join("ledger.json")));

    ledger.set_total_pto_days(20).unwrap();
    plans.save(plan("Spring", "2024-04-01", 5)).unwrap();
    assert_eq!(ledger.remaining_pto_days(&plans.all().unwrap()).unwrap(), 15);

    // 5 more days, 2 of them already in "Spring"
    plans.save(plan("Easter week", "2024-04-04", 5)).unwrap();
    let all = plans.all().unwrap();
    assert_eq!(all.iter().map(|p| p.vacation_days.len()).sum::<usize>(), 10);
    assert_eq!(ledger.remaining_pto_days(&all).unwrap(), 12);
    let snapshot = ledger.snapshot(&all).unwrap();
    assert_eq!(snapshot, LedgerSnapshot { total: 20, used: 8, remaining: 12 });

    // Reopening the files sees the same state
    let reopened = PtoLedger::new(JsonFileStore::new(dir.path().join("ledger.json")));
    let plans = JsonPlanStore::new(dir.path().join("plans.json")).all().unwrap();
    assert_eq!(reopened.snapshot(&plans).unwrap(), snapshot);
}

#[test]
fn setting_the_total_replaces_it() {
    let mut ledger = PtoLedger::new(MemoryStore::new());
    ledger.set_total_pto_days(10).unwrap();
    ledger.set_total_pto_days(5).unwrap();
    assert_eq!(ledger.total_pto_days().unwrap(), 5);
}

#[test]
fn shared_days_count_once() {
    let plans = vec![plan("A", "2024-04-01", 3), plan("B", "2024-04-03", 3)];
    let ledger = PtoLedger::new(MemoryStore::new());
    assert_eq!(ledger.used_pto_days(&plans), 5);
}

proptest! {
    #[test]
    fn overlaps_are_symmetric(a_start in 0i64..30, a_len in 1i64..10, b_start in 0i64..30, b_len in 1i64..10) {
        let base = date("2024-06-01");
        let a = plan("A", &base.add_days(a_start).to_string(), a_len);
        let b = plan("B", &base.add_days(b_start).to_string(), b_len);
        let all = vec![a.clone(), b.clone()];

        let from_a = detect_plan_overlaps(&a, &all);
        let from_b = detect_plan_overlaps(&b, &all);
        prop_assert_eq!(&from_a.overlapping_dates, &from_b.overlapping_dates);
        prop_assert_eq!(from_a.overlap_count, from_b.overlap_count);
        prop_assert_eq!(from_a.overlapping_plans.is_empty(), from_b.overlapping_plans.is_empty());
    }
}
