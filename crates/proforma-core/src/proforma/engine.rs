use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::assumptions::ProFormaAssumptions;
use super::cashflow::{build_monthly_schedule, MonthlyCashflowRow, ScheduleAmounts};
use super::cost_stack::{
    compute_hard_costs, compute_revenue, compute_soft_costs, HardCostBreakdown, RevenueBreakdown,
    SoftCostBreakdown,
};
use super::program::{
    compute_density_benchmarks, compute_program_metrics, DensityBenchmarks, ProgramMetrics,
};
use super::scenario::{compute_effective_values, target_total_months, EffectiveValues};
use super::totals::{compute_totals, Totals};
use super::validation::validate_assumptions;
use crate::types::{elapsed_micros, with_metadata, ComputationOutput};
use crate::ProFormaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a strict pro forma run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProFormaInput {
    pub assumptions: ProFormaAssumptions,
    /// Apply the scenario overlay on top of the baseline
    #[serde(default)]
    pub apply_scenario: bool,
}

/// Every derived figure of the pro forma. Structurally complete on every
/// call; individual fields are `None` when they cannot be computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProFormaOutputs {
    pub computed: ProgramMetrics,
    pub density_benchmarks: DensityBenchmarks,
    pub eff: EffectiveValues,
    pub revenue: RevenueBreakdown,
    pub soft_costs: SoftCostBreakdown,
    pub hard_costs: HardCostBreakdown,
    pub totals: Totals,
    pub monthly: Vec<MonthlyCashflowRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every stage of the pro forma over one set of assumptions.
///
/// Pure and infallible: missing inputs surface as `None` in the outputs.
/// Stages run in dependency order (program → benchmarks → scenario →
/// revenue/costs → totals → monthly schedule).
pub fn compute_pro_forma(
    assumptions: &ProFormaAssumptions,
    apply_scenario: bool,
) -> ProFormaOutputs {
    let computed = compute_program_metrics(assumptions);
    let density_benchmarks = compute_density_benchmarks(assumptions, &computed);
    let eff = compute_effective_values(assumptions, apply_scenario);
    debug!(
        apply_scenario,
        total_months = eff.total_months,
        gross_buildable_sf = ?computed.gross_buildable_sf,
        "program and scenario resolved"
    );

    let revenue = compute_revenue(assumptions, &eff);
    let soft_costs = compute_soft_costs(assumptions, &computed);
    let hard_costs = compute_hard_costs(assumptions, &eff, &computed);
    let totals = compute_totals(&revenue, &soft_costs, &hard_costs, &computed);
    debug!(
        net_revenue = ?revenue.net_revenue,
        total_project_cost = %totals.total_project_cost,
        profit = ?totals.profit,
        "cost stack rolled up"
    );

    let monthly = build_monthly_schedule(
        &eff.phases(),
        &ScheduleAmounts {
            land: assumptions
                .acquisition
                .capitalized_land_cost
                .unwrap_or(Decimal::ZERO),
            soft: soft_costs.soft_total,
            hard: hard_costs.construction_and_hard_total,
            revenue: revenue.net_revenue.unwrap_or(Decimal::ZERO),
        },
    );
    debug!(rows = monthly.len(), "monthly schedule built");

    ProFormaOutputs {
        computed,
        density_benchmarks,
        eff,
        revenue,
        soft_costs,
        hard_costs,
        totals,
        monthly,
    }
}

/// Validate the assumptions, compute the pro forma, and wrap the result with
/// diagnostics about figures the schedule could not place.
pub fn run_pro_forma(
    input: &ProFormaInput,
) -> ProFormaResult<ComputationOutput<ProFormaOutputs>> {
    let start = Instant::now();

    validate_assumptions(&input.assumptions)?;

    let outputs = compute_pro_forma(&input.assumptions, input.apply_scenario);
    let warnings = collect_warnings(&input.assumptions, input.apply_scenario, &outputs);
    for w in &warnings {
        debug!(warning = %w, "pro forma warning");
    }

    let elapsed = elapsed_micros(start.elapsed());
    let methodology = if input.apply_scenario {
        "Development Pro Forma (Scenario Applied)"
    } else {
        "Development Pro Forma (Base Case)"
    };

    Ok(with_metadata(methodology, input, warnings, elapsed, outputs))
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

pub(crate) fn collect_warnings(
    assumptions: &ProFormaAssumptions,
    apply_scenario: bool,
    outputs: &ProFormaOutputs,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let eff = &outputs.eff;

    if apply_scenario {
        let delta = assumptions.scenario.delta_duration_months;
        if let Some(target) = target_total_months(&assumptions.timeline, delta) {
            if target != eff.total_months {
                warnings.push(format!(
                    "Duration shock of {delta} months targets {target} months but rounded phases \
                     sum to {} months",
                    eff.total_months
                ));
            }
        }
    }

    if let Some(profit) = outputs.totals.profit {
        if profit < Decimal::ZERO {
            warnings.push(format!(
                "Project shows a loss of {}; total cost exceeds net revenue",
                profit.abs().round_dp(2)
            ));
        }
    }

    let net_revenue = outputs.revenue.net_revenue.unwrap_or(Decimal::ZERO);
    let hard_total = outputs.hard_costs.construction_and_hard_total;
    let has_costs = outputs.totals.total_project_cost != Decimal::ZERO;

    if eff.total_months == 0 {
        if has_costs || !net_revenue.is_zero() {
            warnings.push(
                "Effective timeline is 0 months; monthly schedule is empty".into(),
            );
        }
        return warnings;
    }

    if eff.construction_months == 0 && !net_revenue.is_zero() {
        warnings.push(
            "No construction months; net revenue cannot be placed in the monthly schedule"
                .into(),
        );
    }
    if !hard_total.is_zero() {
        if eff.servicing_months == 0 {
            warnings.push(
                "No servicing months; the 1/8 servicing slice of hard costs is not scheduled"
                    .into(),
            );
        }
        if eff.construction_months == 0 {
            warnings.push(
                "No construction months; the 7/8 construction slice of hard costs is not \
                 scheduled"
                    .into(),
            );
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proforma::cashflow::{summarize_schedule, Phase};
    use rust_decimal_macros::dec;

    fn sample() -> ProFormaAssumptions {
        let mut a = ProFormaAssumptions::default();
        a.program.units = Some(24);
        a.program.site_area_sqft = Some(dec!(10000));
        a.program.fsr = Some(dec!(2));
        a.acquisition.land_purchase_price = Some(dec!(2_000_000));
        a.acquisition.capitalized_land_cost = Some(dec!(2_200_000));
        a.revenue.total_revenue = Some(dec!(16_000_000));
        a.revenue.selling_cost_pct = Some(dec!(5));
        a.soft_costs.consultants = Some(dec!(600_000));
        a.soft_costs.municipal_permit_fees = Some(dec!(400_000));
        a.hard_costs.total_construction_hard_cost = Some(dec!(7_000_000));
        a.hard_costs.land_servicing_onsite = Some(dec!(1_000_000));
        a
    }

    #[test]
    fn test_full_base_case() {
        let out = compute_pro_forma(&sample(), false);

        assert_eq!(out.computed.net_saleable_sf, Some(dec!(17000)));
        assert_eq!(out.density_benchmarks.dollar_per_buildable_sf, Some(dec!(100)));
        assert_eq!(out.revenue.net_revenue, Some(dec!(15_200_000)));
        // 2.2M + 1.05M
        assert_eq!(out.soft_costs.land_and_soft_total, dec!(3_250_000));
        assert_eq!(out.hard_costs.construction_and_hard_total, dec!(8_400_000));
        assert_eq!(out.totals.total_project_cost, dec!(11_650_000));
        assert_eq!(out.totals.profit, Some(dec!(3_550_000)));
        assert_eq!(out.monthly.len(), 36);
    }

    #[test]
    fn test_schedule_does_not_feed_totals() {
        let out = compute_pro_forma(&sample(), false);
        let sched = summarize_schedule(&out.monthly);
        assert_eq!(sched.land, dec!(2_200_000));
        assert!((sched.revenue - dec!(15_200_000)).abs() < dec!(0.0001));
        assert!((sched.soft - dec!(1_050_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_scenario_shifts_outputs() {
        let mut a = sample();
        a.scenario.delta_revenue_pct = dec!(-10);
        a.scenario.delta_hard_cost_pct = dec!(10);
        a.scenario.delta_duration_months = 6;

        let out = compute_pro_forma(&a, true);
        assert_eq!(out.eff.total_revenue, Some(dec!(14_400_000)));
        assert_eq!(out.eff.total_construction_hard_cost, Some(dec!(7_700_000)));
        assert_eq!(out.eff.total_months, 42);
        assert_eq!(out.monthly.len(), 42);
        assert_eq!(out.monthly.last().unwrap().phase, Phase::Construction);
    }

    #[test]
    fn test_neutral_scenario_matches_base() {
        let a = sample();
        assert_eq!(compute_pro_forma(&a, true), compute_pro_forma(&a, false));
    }

    #[test]
    fn test_run_wraps_with_metadata() {
        let input = ProFormaInput {
            assumptions: sample(),
            apply_scenario: false,
        };
        let result = run_pro_forma(&input).unwrap();
        assert_eq!(result.methodology, "Development Pro Forma (Base Case)");
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.result.totals.profit, Some(dec!(3_550_000)));
    }

    #[test]
    fn test_run_rejects_out_of_range_input() {
        let mut a = sample();
        a.program.efficiency_pct = Some(dec!(120));
        let input = ProFormaInput {
            assumptions: a,
            apply_scenario: false,
        };
        assert!(run_pro_forma(&input).is_err());
    }

    #[test]
    fn test_run_rejects_unbounded_line_items() {
        let mut a = sample();
        a.soft_costs.consultants = Some(Decimal::MAX);
        a.soft_costs.finance = Some(Decimal::MAX);
        let input = ProFormaInput {
            assumptions: a,
            apply_scenario: true,
        };
        match run_pro_forma(&input) {
            Err(crate::ProFormaError::InvalidInput { field, .. }) => {
                assert_eq!(field, "soft_costs.consultants")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_tiny_cost_base_leaves_ratios_null() {
        let mut a = ProFormaAssumptions::default();
        a.revenue.total_revenue = Some(dec!(1_000_000_000_000_000));
        a.revenue.selling_cost_pct = Some(Decimal::ZERO);
        a.soft_costs.consultants = Some(Decimal::new(1, 28));
        a.soft_costs.contingency_pct = None;
        let input = ProFormaInput {
            assumptions: a,
            apply_scenario: false,
        };
        let out = run_pro_forma(&input).unwrap().result;
        assert!(out.totals.profit.is_some());
        assert_eq!(out.totals.return_on_cost_pct, None);
    }

    #[test]
    fn test_warns_on_loss() {
        let mut a = sample();
        a.revenue.total_revenue = Some(dec!(5_000_000));
        let input = ProFormaInput {
            assumptions: a,
            apply_scenario: false,
        };
        let result = run_pro_forma(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("loss")));
    }

    #[test]
    fn test_warns_on_rounding_drift() {
        let mut a = sample();
        a.timeline.land_entitlement_months = Some(3);
        a.timeline.servicing_months = Some(3);
        a.timeline.construction_months = Some(0);
        a.scenario.delta_duration_months = -1;
        let out = compute_pro_forma(&a, true);
        let warnings = collect_warnings(&a, true, &out);
        assert!(warnings.iter().any(|w| w.contains("targets 5 months")));
        assert!(warnings
            .iter()
            .any(|w| w.contains("net revenue cannot be placed")));
        assert!(warnings.iter().any(|w| w.contains("7/8")));
    }

    #[test]
    fn test_warns_on_empty_timeline() {
        let mut a = sample();
        a.timeline = Default::default();
        let out = compute_pro_forma(&a, false);
        assert!(out.monthly.is_empty());
        let warnings = collect_warnings(&a, false, &out);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("0 months"));
    }
}
