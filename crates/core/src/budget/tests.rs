//! Property-based tests for budget module.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::period::{PeriodKind, next_period_start, period_window, tracking_window};
use super::service::BudgetService;
use super::types::BudgetStatus;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2100, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .or_else(|| NaiveDate::from_ymd_opt(y, m, 28))
            .unwrap()
    })
}

fn any_kind() -> impl Strategy<Value = PeriodKind> {
    prop_oneof![
        Just(PeriodKind::Daily),
        Just(PeriodKind::Weekly),
        Just(PeriodKind::Monthly),
        Just(PeriodKind::Yearly),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every window contains its anchor and is ordered.
    #[test]
    fn test_window_contains_anchor(kind in any_kind(), anchor in any_date()) {
        let (start, end) = period_window(kind, anchor);
        prop_assert!(start <= anchor);
        prop_assert!(anchor <= end);
    }

    /// Weekly windows start on Monday and span seven days.
    #[test]
    fn test_weekly_window_shape(anchor in any_date()) {
        let (start, end) = period_window(PeriodKind::Weekly, anchor);
        prop_assert_eq!(start.weekday(), chrono::Weekday::Mon);
        prop_assert_eq!((end - start).num_days(), 6);
    }

    /// Monthly windows cover exactly one calendar month.
    #[test]
    fn test_monthly_window_shape(anchor in any_date()) {
        let (start, end) = period_window(PeriodKind::Monthly, anchor);
        prop_assert_eq!(start.day(), 1);
        prop_assert_eq!(end.month(), anchor.month());
        prop_assert_ne!(end.succ_opt().unwrap().month(), anchor.month());
    }

    /// The next period always starts strictly later, in the following window.
    #[test]
    fn test_next_start_moves_forward(kind in any_kind(), start in any_date()) {
        let next = next_period_start(kind, start).unwrap();
        prop_assert!(next > start);
        if kind == PeriodKind::Monthly {
            let (_, end) = period_window(kind, start);
            prop_assert!(next > end);
            prop_assert!(next.day() <= start.day());
        }
    }

    /// The tracking window never leaves the budget's own range.
    #[test]
    fn test_tracking_window_within_range(
        kind in any_kind(),
        start in any_date(),
        span in 0i64..800,
        today in any_date(),
    ) {
        let end = start + chrono::Duration::days(span);
        let (from, to) = tracking_window(kind, start, Some(end), today);
        prop_assert!(from >= start);
        prop_assert!(to <= end);
        prop_assert!(from <= to);
    }

    /// Remaining is always budgeted minus spent.
    #[test]
    fn test_remaining_is_difference(
        spent in 0i64..1_000_000_000,
        budgeted in -1_000i64..1_000_000_000,
    ) {
        let spent = Decimal::from(spent);
        let budgeted = Decimal::from(budgeted);
        let result = BudgetService::evaluate(spent, budgeted, Decimal::from(80));
        prop_assert_eq!(result.remaining, budgeted - spent);
    }

    /// Spending at or above the budget is always exceeded.
    #[test]
    fn test_overspend_is_exceeded(
        budgeted in 1i64..1_000_000_000,
        extra in 0i64..1_000_000,
        threshold in 1i64..=100,
    ) {
        let budgeted = Decimal::from(budgeted);
        let spent = budgeted + Decimal::from(extra);
        let result = BudgetService::evaluate(spent, budgeted, Decimal::from(threshold));
        prop_assert_eq!(result.status, BudgetStatus::Exceeded);
    }

    /// Non-positive budgets are always invalid.
    #[test]
    fn test_non_positive_budget_is_invalid(
        spent in 0i64..1_000_000,
        budgeted in -1_000_000i64..=0,
    ) {
        let result = BudgetService::evaluate(
            Decimal::from(spent),
            Decimal::from(budgeted),
            Decimal::from(80),
        );
        prop_assert_eq!(result.status, BudgetStatus::Invalid);
        prop_assert_eq!(result.percentage, Decimal::ZERO);
    }
}
