use std::collections::HashSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use pto_planner::{
    CalendarDate, EfficiencyStats, OptimizationParams, PublicHoliday, Strategy, apply_suggestion,
    calculate_efficiency, find_optimal_vacation_periods, optimize_by_strategy,
};

fn date(s: &str) -> CalendarDate {
    s.parse().unwrap()
}

fn holidays_2024(offsets: &[i64]) -> Vec<PublicHoliday> {
    let jan1 = date("2024-01-01");
    offsets
        .iter()
        .map(|&offset| PublicHoliday::new(jan1.add_days(offset), format!("Holiday {offset}")))
        .collect()
}

fn params(holidays: Vec<PublicHoliday>, strategy: Strategy) -> OptimizationParams {
    OptimizationParams {
        holidays,
        company_holidays: Vec::new(),
        available_pto_days: 25,
        strategy,
        start_date: date("2024-01-01"),
        end_date: date("2024-12-31"),
    }
}

#[test]
fn thursday_holiday_suggests_bridging_the_week() {
    let holidays = vec![PublicHoliday::new(date("2024-01-04"), "Test Thu")];
    let suggestions = find_optimal_vacation_periods(&holidays, 2024);

    assert!(suggestions.iter().any(|s| {
        s.start_date <= date("2024-01-01") && s.reason.contains("Bridge") && s.vacation_days_used == 3
    }));
}

#[test]
fn wednesday_thursday_pair_is_not_a_thursday_friday_bridge() {
    let holidays = vec![
        PublicHoliday::new(date("2024-12-25"), "Christmas Day"),
        PublicHoliday::new(date("2024-12-26"), "Boxing Day"),
    ];
    let suggestions = find_optimal_vacation_periods(&holidays, 2024);
    assert!(suggestions.iter().all(|s| !s.reason.contains("Thu-Fri")));
}

#[test]
fn empty_selection_has_no_efficiency() {
    let holidays = holidays_2024(&[0, 90]);
    assert_eq!(calculate_efficiency(&[], &holidays), EfficiencyStats::default());
}

#[test]
fn applied_suggestion_matches_its_vacation_count() {
    let holidays = vec![PublicHoliday::new(date("2024-05-09"), "Ascension Day")];
    for suggestion in find_optimal_vacation_periods(&holidays, 2024) {
        let dates = apply_suggestion(&suggestion, &holidays, &[]).unwrap();
        assert_eq!(dates.len() as u32, suggestion.vacation_days_used, "{}", suggestion.reason);
    }
}

proptest! {
    #[test]
    fn finder_never_repeats_a_range(offsets in prop::collection::vec(0i64..366, 0..20)) {
        let suggestions = find_optimal_vacation_periods(&holidays_2024(&offsets), 2024);
        let keys: HashSet<_> = suggestions.iter().map(|s| s.key()).collect();
        prop_assert_eq!(keys.len(), suggestions.len());
        prop_assert!(suggestions.len() <= 10);
    }

    #[test]
    fn finder_is_idempotent(offsets in prop::collection::vec(0i64..366, 0..20)) {
        let holidays = holidays_2024(&offsets);
        prop_assert_eq!(
            find_optimal_vacation_periods(&holidays, 2024),
            find_optimal_vacation_periods(&holidays, 2024)
        );
    }

    #[test]
    fn efficiency_is_days_off_per_vacation_day(offsets in prop::collection::vec(0i64..366, 0..20)) {
        for suggestion in find_optimal_vacation_periods(&holidays_2024(&offsets), 2024) {
            prop_assert!(suggestion.vacation_days_used > 0);
            let expected = suggestion.total_days_off as f64 / suggestion.vacation_days_used as f64;
            prop_assert!((suggestion.efficiency - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn strategies_never_repeat_a_range(
        offsets in prop::collection::vec(0i64..366, 0..20),
        index in 0usize..Strategy::ALL.len(),
    ) {
        let suggestions = optimize_by_strategy(&params(holidays_2024(&offsets), Strategy::ALL[index]));
        let keys: HashSet<_> = suggestions.iter().map(|s| s.key()).collect();
        prop_assert_eq!(keys.len(), suggestions.len());
        prop_assert!(suggestions.windows(2).all(|w| w[0].start_date <= w[1].start_date));
    }
}
