use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::assumptions::{PhaseDurations, ProFormaAssumptions, ScenarioDeltas, Timeline};
use crate::types::{pct_to_fraction, Money, Months, Percent};

/// Baseline figures after the scenario overlay has been applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveValues {
    pub total_revenue: Option<Money>,
    pub total_construction_hard_cost: Option<Money>,
    pub land_entitlement_months: Months,
    pub servicing_months: Months,
    pub construction_months: Months,
    /// Always the sum of the three effective phases
    pub total_months: Months,
}

impl EffectiveValues {
    pub fn phases(&self) -> PhaseDurations {
        PhaseDurations {
            land_entitlement: self.land_entitlement_months,
            servicing: self.servicing_months,
            construction: self.construction_months,
        }
    }
}

/// Apply the scenario overlay. With `apply_scenario == false` every delta is
/// treated as zero, which makes the two paths identical for a neutral scenario.
pub fn compute_effective_values(
    assumptions: &ProFormaAssumptions,
    apply_scenario: bool,
) -> EffectiveValues {
    let deltas = if apply_scenario {
        assumptions.scenario
    } else {
        ScenarioDeltas::default()
    };

    let total_revenue = assumptions
        .revenue
        .total_revenue
        .map(|rev| apply_pct_delta(rev, deltas.delta_revenue_pct));
    let total_construction_hard_cost = assumptions
        .hard_costs
        .total_construction_hard_cost
        .map(|cost| apply_pct_delta(cost, deltas.delta_hard_cost_pct));

    let phases = redistribute_phases(&assumptions.timeline, deltas.delta_duration_months);

    EffectiveValues {
        total_revenue,
        total_construction_hard_cost,
        land_entitlement_months: phases.land_entitlement,
        servicing_months: phases.servicing,
        construction_months: phases.construction,
        total_months: phases.total(),
    }
}

/// `value × (1 + pct/100)`, floored at zero.
pub fn apply_pct_delta(value: Money, pct: Percent) -> Money {
    (value * (Decimal::ONE + pct_to_fraction(pct))).max(Decimal::ZERO)
}

/// Total duration the delta asks for: `max(1, base + delta)`, or `None` for
/// an empty base timeline (which is never rescaled).
pub fn target_total_months(timeline: &Timeline, delta_months: i32) -> Option<Months> {
    let base_total = timeline.phases().total();
    if base_total == 0 {
        return None;
    }
    let target = (i64::from(base_total) + i64::from(delta_months)).max(1);
    Some(Months::try_from(target).unwrap_or(Months::MAX))
}

/// Scale each phase by `target / base` and round it to whole months.
///
/// Phases are rounded independently, so the resulting sum may differ from
/// the target by a month; callers report the drift rather than forcing one
/// phase to absorb it.
pub fn redistribute_phases(timeline: &Timeline, delta_months: i32) -> PhaseDurations {
    let base = timeline.phases();
    let Some(target) = target_total_months(timeline, delta_months) else {
        return base;
    };

    let base_total = Decimal::from(base.total());
    let target = Decimal::from(target);
    let scale = |phase: Months| -> Months {
        // multiply before dividing so exact halves stay exact
        (Decimal::from(phase) * target / base_total)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .max(Decimal::ZERO)
            .to_u32()
            .unwrap_or(0)
    };

    PhaseDurations {
        land_entitlement: scale(base.land_entitlement),
        servicing: scale(base.servicing),
        construction: scale(base.construction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn timeline(l: u32, s: u32, c: u32) -> Timeline {
        Timeline {
            land_entitlement_months: Some(l),
            servicing_months: Some(s),
            construction_months: Some(c),
        }
    }

    #[test]
    fn test_duration_shock_keeps_phase_shares() {
        // 12/6/18 + 6 months => factor 42/36
        let p = redistribute_phases(&timeline(12, 6, 18), 6);
        assert_eq!(p.land_entitlement, 14);
        assert_eq!(p.servicing, 7);
        assert_eq!(p.construction, 21);
        assert_eq!(p.total(), 42);
    }

    #[test]
    fn test_negative_duration_shock() {
        // 12/6/18 - 6 => factor 30/36: 10 / 5 / 15
        let p = redistribute_phases(&timeline(12, 6, 18), -6);
        assert_eq!((p.land_entitlement, p.servicing, p.construction), (10, 5, 15));
    }

    #[test]
    fn test_exact_half_rounds_up() {
        // 3/3/0 (6 months) - 1 => each phase 3 × 5/6 = 2.5 => 3
        let p = redistribute_phases(&timeline(3, 3, 0), -1);
        assert_eq!(p.land_entitlement, 3);
        assert_eq!(p.servicing, 3);
        // rounding drift: target 5, sum 6
        assert_eq!(target_total_months(&timeline(3, 3, 0), -1), Some(5));
        assert_eq!(p.total(), 6);
    }

    #[test]
    fn test_target_floors_at_one_month() {
        assert_eq!(target_total_months(&timeline(2, 2, 2), -12), Some(1));
        let p = redistribute_phases(&timeline(2, 2, 2), -12);
        // each 2 × 1/6 rounds to 0
        assert_eq!(p.total(), 0);
    }

    #[test]
    fn test_empty_timeline_is_not_rescaled() {
        let t = Timeline::default();
        assert_eq!(target_total_months(&t, 6), None);
        assert_eq!(redistribute_phases(&t, 6), PhaseDurations::default());
    }

    #[test]
    fn test_pct_delta_floors_at_zero() {
        assert_eq!(apply_pct_delta(dec!(1000), dec!(10)), dec!(1100));
        assert_eq!(apply_pct_delta(dec!(1000), dec!(-20)), dec!(800));
        assert_eq!(apply_pct_delta(dec!(1000), dec!(-150)), Decimal::ZERO);
    }

    #[test]
    fn test_flag_off_ignores_deltas() {
        let mut a = ProFormaAssumptions::default();
        a.revenue.total_revenue = Some(dec!(10_000_000));
        a.hard_costs.total_construction_hard_cost = Some(dec!(4_000_000));
        a.scenario.delta_revenue_pct = dec!(-10);
        a.scenario.delta_hard_cost_pct = dec!(5);
        a.scenario.delta_duration_months = 6;

        let base = compute_effective_values(&a, false);
        assert_eq!(base.total_revenue, Some(dec!(10_000_000)));
        assert_eq!(base.total_construction_hard_cost, Some(dec!(4_000_000)));
        assert_eq!(base.total_months, 36);

        let shocked = compute_effective_values(&a, true);
        assert_eq!(shocked.total_revenue, Some(dec!(9_000_000)));
        assert_eq!(shocked.total_construction_hard_cost, Some(dec!(4_200_000)));
        assert_eq!(shocked.total_months, 42);
        assert_eq!(shocked.phases().construction, 21);
    }

    #[test]
    fn test_missing_revenue_stays_null() {
        let mut a = ProFormaAssumptions::default();
        a.scenario.delta_revenue_pct = dec!(10);
        assert_eq!(compute_effective_values(&a, true).total_revenue, None);
    }
}
