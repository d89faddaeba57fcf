use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::assumptions::{ProFormaAssumptions, ScenarioRanges, SliderRange};
use super::engine::{compute_pro_forma, ProFormaOutputs};
use super::validation::validate_assumptions;
use crate::error::ProFormaError;
use crate::types::{elapsed_micros, with_metadata, ComputationOutput, Percent};
use crate::ProFormaResult;

/// Output figure read from each grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityMetric {
    Profit,
    ReturnOnCostPct,
    NetRevenue,
    TotalProjectCost,
}

impl SensitivityMetric {
    pub fn read(&self, outputs: &ProFormaOutputs) -> Option<Decimal> {
        match self {
            SensitivityMetric::Profit => outputs.totals.profit,
            SensitivityMetric::ReturnOnCostPct => outputs.totals.return_on_cost_pct,
            SensitivityMetric::NetRevenue => outputs.revenue.net_revenue,
            SensitivityMetric::TotalProjectCost => Some(outputs.totals.total_project_cost),
        }
    }
}

/// Most values a single sweep axis may produce.
pub const MAX_SWEEP_POINTS: usize = 1_000;

/// Sweep of one scenario delta from `min` to `max` by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepAxis {
    pub min: Percent,
    pub max: Percent,
    pub step: Percent,
}

/// Two-way sweep of revenue and hard-cost deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub assumptions: ProFormaAssumptions,
    pub revenue_delta: SweepAxis,
    pub hard_cost_delta: SweepAxis,
    pub metric: SensitivityMetric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub metric: SensitivityMetric,
    pub revenue_delta_values: Vec<Percent>,
    pub hard_cost_delta_values: Vec<Percent>,
    /// matrix[i][j] = metric at revenue_delta_values[i], hard_cost_delta_values[j]
    pub matrix: Vec<Vec<Option<Decimal>>>,
    /// Cell closest to both deltas at zero
    pub base_case_position: (usize, usize),
    pub base_case_value: Option<Decimal>,
}

fn generate_sweep_values(
    name: &str,
    axis: &SweepAxis,
    range: &SliderRange,
) -> ProFormaResult<Vec<Decimal>> {
    let invalid = |reason: String| ProFormaError::InvalidInput {
        field: name.into(),
        reason,
    };

    if axis.step <= Decimal::ZERO {
        return Err(invalid("Step must be positive".into()));
    }
    if axis.min > axis.max {
        return Err(invalid("Min must be <= max".into()));
    }
    if !range.contains(axis.min) || !range.contains(axis.max) {
        return Err(invalid(format!(
            "Sweep must stay within {} to {}",
            range.min, range.max
        )));
    }
    // a step that misses the max gets the max appended as an extra point
    let points = (axis.max - axis.min).checked_div(axis.step).map(|steps| {
        if steps.fract().is_zero() {
            steps + Decimal::ONE
        } else {
            steps.floor() + Decimal::from(2)
        }
    });
    if !points.is_some_and(|n| n <= Decimal::from(MAX_SWEEP_POINTS)) {
        return Err(invalid(format!(
            "Sweep would exceed {MAX_SWEEP_POINTS} points; use a larger step"
        )));
    }

    let mut values = Vec::new();
    let mut current = axis.min;
    while current <= axis.max {
        values.push(current);
        current += axis.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < axis.max {
            values.push(axis.max);
        }
    }

    Ok(values)
}

fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Evaluate the pro forma across a grid of revenue and hard-cost deltas.
///
/// The duration delta of the supplied assumptions is kept in every cell and
/// the scenario is always applied.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> ProFormaResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_assumptions(&input.assumptions)?;
    let ranges = ScenarioRanges::default();
    let rev_values = generate_sweep_values(
        "revenue_delta",
        &input.revenue_delta,
        &ranges.delta_revenue_pct,
    )?;
    let hard_values = generate_sweep_values(
        "hard_cost_delta",
        &input.hard_cost_delta,
        &ranges.delta_hard_cost_pct,
    )?;

    let mut cell = input.assumptions.clone();
    let mut matrix = Vec::with_capacity(rev_values.len());
    for rev in &rev_values {
        let mut row = Vec::with_capacity(hard_values.len());
        for hard in &hard_values {
            cell.scenario.delta_revenue_pct = *rev;
            cell.scenario.delta_hard_cost_pct = *hard;
            row.push(input.metric.read(&compute_pro_forma(&cell, true)));
        }
        matrix.push(row);
    }

    let null_cells = matrix.iter().flatten().filter(|v| v.is_none()).count();
    if null_cells > 0 {
        warnings.push(format!(
            "{null_cells} grid cells could not be computed; check revenue and selling cost inputs"
        ));
    }

    let base_row = closest_index(&rev_values, Decimal::ZERO);
    let base_col = closest_index(&hard_values, Decimal::ZERO);
    let base_case_value = matrix[base_row][base_col];

    let output = SensitivityOutput {
        metric: input.metric,
        revenue_delta_values: rev_values,
        hard_cost_delta_values: hard_values,
        matrix,
        base_case_position: (base_row, base_col),
        base_case_value,
    };

    let elapsed = elapsed_micros(start.elapsed());
    Ok(with_metadata(
        "Pro Forma 2-Way Scenario Sensitivity",
        &serde_json::json!({
            "revenue_delta": input.revenue_delta,
            "hard_cost_delta": input.hard_cost_delta,
            "metric": input.metric,
            "delta_duration_months": input.assumptions.scenario.delta_duration_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}
