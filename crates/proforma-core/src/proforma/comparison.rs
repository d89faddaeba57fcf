use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::assumptions::ProFormaAssumptions;
use super::engine::{collect_warnings, compute_pro_forma, ProFormaOutputs};
use super::validation::validate_assumptions;
use crate::types::{elapsed_micros, with_metadata, ComputationOutput, Money, Percent};
use crate::ProFormaResult;

/// Scenario minus base for the headline KPIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiDeltas {
    pub net_revenue: Option<Money>,
    pub total_project_cost: Option<Money>,
    pub profit: Option<Money>,
    /// Percentage points
    pub return_on_cost_pct: Option<Percent>,
    /// Percentage points
    pub profit_margin_pct: Option<Percent>,
    pub total_months: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub base: ProFormaOutputs,
    pub scenario: ProFormaOutputs,
    pub deltas: KpiDeltas,
}

/// `scenario - base`, or `None` if either side is missing.
pub fn compute_delta(base: Option<Decimal>, scenario: Option<Decimal>) -> Option<Decimal> {
    match (base, scenario) {
        (Some(b), Some(s)) => Some(s - b),
        _ => None,
    }
}

/// Compute the same assumptions with and without the scenario overlay.
pub fn compare_scenario(assumptions: &ProFormaAssumptions) -> ScenarioComparison {
    let base = compute_pro_forma(assumptions, false);
    let scenario = compute_pro_forma(assumptions, true);
    let deltas = kpi_deltas(&base, &scenario);
    ScenarioComparison {
        base,
        scenario,
        deltas,
    }
}

pub fn kpi_deltas(base: &ProFormaOutputs, scenario: &ProFormaOutputs) -> KpiDeltas {
    KpiDeltas {
        net_revenue: compute_delta(base.revenue.net_revenue, scenario.revenue.net_revenue),
        total_project_cost: compute_delta(
            Some(base.totals.total_project_cost),
            Some(scenario.totals.total_project_cost),
        ),
        profit: compute_delta(base.totals.profit, scenario.totals.profit),
        return_on_cost_pct: compute_delta(
            base.totals.return_on_cost_pct,
            scenario.totals.return_on_cost_pct,
        ),
        profit_margin_pct: compute_delta(
            base.totals.profit_margin_pct,
            scenario.totals.profit_margin_pct,
        ),
        total_months: i64::from(scenario.eff.total_months) - i64::from(base.eff.total_months),
    }
}

/// Validated base-vs-scenario comparison wrapped with metadata. Warnings
/// describe the scenario side.
pub fn run_scenario_comparison(
    assumptions: &ProFormaAssumptions,
) -> ProFormaResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    validate_assumptions(assumptions)?;

    let comparison = compare_scenario(assumptions);
    let mut warnings = collect_warnings(assumptions, true, &comparison.scenario);
    if assumptions.scenario.is_neutral() {
        warnings.push("Scenario deltas are all zero; scenario equals base case".into());
    }

    let elapsed = elapsed_micros(start.elapsed());
    Ok(with_metadata(
        "Development Pro Forma Scenario Comparison",
        assumptions,
        warnings,
        elapsed,
        comparison,
    ))
}
