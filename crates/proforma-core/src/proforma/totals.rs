use serde::{Deserialize, Serialize};

use super::cost_stack::{HardCostBreakdown, RevenueBreakdown, SoftCostBreakdown};
use super::program::ProgramMetrics;
use crate::types::{pct_ratio, ratio, Money, Percent};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Land & soft total + construction & hard total
    pub total_project_cost: Money,
    /// Net revenue − total project cost
    pub profit: Option<Money>,
    /// Profit / total project cost × 100
    pub return_on_cost_pct: Option<Percent>,
    /// Profit / net revenue × 100
    pub profit_margin_pct: Option<Percent>,
    pub revenue_per_saleable_sf: Option<Money>,
}

pub fn compute_totals(
    revenue: &RevenueBreakdown,
    soft: &SoftCostBreakdown,
    hard: &HardCostBreakdown,
    metrics: &ProgramMetrics,
) -> Totals {
    let total_project_cost = soft.land_and_soft_total + hard.construction_and_hard_total;
    let profit = revenue.net_revenue.map(|net| net - total_project_cost);

    Totals {
        total_project_cost,
        profit,
        return_on_cost_pct: pct_ratio(profit, Some(total_project_cost)),
        profit_margin_pct: pct_ratio(profit, revenue.net_revenue),
        revenue_per_saleable_sf: ratio(revenue.net_revenue, metrics.net_saleable_sf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn revenue(net: Option<Money>) -> RevenueBreakdown {
        RevenueBreakdown {
            net_revenue: net,
            ..RevenueBreakdown::default()
        }
    }

    fn soft(total: Money) -> SoftCostBreakdown {
        SoftCostBreakdown {
            land_and_soft_total: total,
            ..SoftCostBreakdown::default()
        }
    }

    fn hard(total: Money) -> HardCostBreakdown {
        HardCostBreakdown {
            construction_and_hard_total: total,
            ..HardCostBreakdown::default()
        }
    }

    #[test]
    fn test_profit_and_returns() {
        let metrics = ProgramMetrics {
            net_saleable_sf: Some(dec!(17000)),
            ..ProgramMetrics::default()
        };
        let t = compute_totals(
            &revenue(Some(dec!(12_000_000))),
            &soft(dec!(3_000_000)),
            &hard(dec!(7_000_000)),
            &metrics,
        );
        assert_eq!(t.total_project_cost, dec!(10_000_000));
        assert_eq!(t.profit, Some(dec!(2_000_000)));
        assert_eq!(t.return_on_cost_pct, Some(dec!(20)));
        // 2M / 12M
        let margin = t.profit_margin_pct.unwrap();
        assert!((margin - dec!(16.6667)).abs() < dec!(0.0001));
        assert_eq!(t.revenue_per_saleable_sf, Some(dec!(12_000_000) / dec!(17000)));
    }

    #[test]
    fn test_missing_net_revenue_nulls_profit_chain() {
        let t = compute_totals(
            &revenue(None),
            &soft(dec!(3_000_000)),
            &hard(dec!(7_000_000)),
            &ProgramMetrics::default(),
        );
        assert_eq!(t.total_project_cost, dec!(10_000_000));
        assert_eq!(t.profit, None);
        assert_eq!(t.return_on_cost_pct, None);
        assert_eq!(t.profit_margin_pct, None);
        assert_eq!(t.revenue_per_saleable_sf, None);
    }

    #[test]
    fn test_zero_cost_guards_return_on_cost() {
        let t = compute_totals(
            &revenue(Some(dec!(500_000))),
            &soft(Decimal::ZERO),
            &hard(Decimal::ZERO),
            &ProgramMetrics::default(),
        );
        assert_eq!(t.profit, Some(dec!(500_000)));
        assert_eq!(t.return_on_cost_pct, None);
        assert_eq!(t.profit_margin_pct, Some(dec!(100)));
    }

    #[test]
    fn test_loss_making_project() {
        let t = compute_totals(
            &revenue(Some(dec!(8_000_000))),
            &soft(dec!(3_000_000)),
            &hard(dec!(7_000_000)),
            &ProgramMetrics::default(),
        );
        assert_eq!(t.profit, Some(dec!(-2_000_000)));
        assert_eq!(t.return_on_cost_pct, Some(dec!(-20)));
    }
}
