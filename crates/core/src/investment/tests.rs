//! Property-based tests for investment module.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::analytics::{Holding, PortfolioAnalytics};
use super::roi::roi_percentage;

fn any_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn any_holding() -> impl Strategy<Value = Holding> {
    (any_amount(), proptest::option::of(any_amount()), 0usize..3).prop_map(
        |(initial, current, kind)| Holding {
            name: format!("holding-{kind}"),
            investment_type: Some(["stocks", "bonds", "crypto"][kind].to_string()),
            initial_amount: initial,
            current_value: current,
            actual_roi: current.map(|value| roi_percentage(initial, value)),
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// ROI is positive exactly when the value grew.
    #[test]
    fn test_roi_sign_follows_gain(initial in any_amount(), value in any_amount()) {
        let roi = roi_percentage(initial, value);
        if value > initial {
            prop_assert!(roi >= Decimal::ZERO);
        } else {
            prop_assert!(roi <= Decimal::ZERO);
        }
    }

    /// Gain or loss is the difference of the totals.
    #[test]
    fn test_gain_loss_matches_totals(holdings in prop::collection::vec(any_holding(), 0..20)) {
        let analytics = PortfolioAnalytics::from_holdings(&holdings);
        prop_assert_eq!(
            analytics.total_gain_loss,
            analytics.total_current_value - analytics.total_invested
        );
    }

    /// Type groups partition the holdings.
    #[test]
    fn test_groups_partition_holdings(holdings in prop::collection::vec(any_holding(), 0..20)) {
        let analytics = PortfolioAnalytics::from_holdings(&holdings);
        let count: usize = analytics.by_investment_type.values().map(|g| g.count).sum();
        let invested: Decimal = analytics
            .by_investment_type
            .values()
            .map(|g| g.total_invested)
            .sum();

        prop_assert_eq!(count, analytics.total_investments);
        prop_assert_eq!(invested, analytics.total_invested);
    }

    /// The best performer never ranks below the worst.
    #[test]
    fn test_best_not_below_worst(holdings in prop::collection::vec(any_holding(), 1..20)) {
        let analytics = PortfolioAnalytics::from_holdings(&holdings);
        let best = analytics.best_performer.unwrap();
        let worst = analytics.worst_performer.unwrap();
        prop_assert!(best.roi >= worst.roi);
    }
}
