//! Revenue and cost roll-up.
//!
//! Lump-sum line items are optional and count as zero when blank, so a
//! project with no soft or hard costs reports `0`. Anything that needs a
//! percentage or a positive denominator is `None` when that input is missing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::assumptions::ProFormaAssumptions;
use super::program::ProgramMetrics;
use super::scenario::EffectiveValues;
use crate::types::{pct_to_fraction, ratio, Money, Percent};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    /// Effective (post-scenario) gross revenue
    pub total_revenue: Option<Money>,
    pub selling_cost: Option<Money>,
    pub selling_cost_add_back: Money,
    /// Revenue − selling cost + add-back
    pub net_revenue: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftCostBreakdown {
    /// Sum of the five soft cost lump sums
    pub soft_base: Money,
    pub soft_contingency: Money,
    /// Soft base + contingency
    pub soft_total: Money,
    /// Capitalised land + soft total
    pub land_and_soft_total: Money,
    pub soft_cost_per_unit: Option<Money>,
    pub soft_cost_per_buildable_sf: Option<Money>,
    pub soft_cost_per_saleable_sf: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardCostBreakdown {
    /// Effective construction + CM + both servicing lines
    pub hard_contingency_base: Money,
    pub hard_contingency: Money,
    /// Contingency base + contingency
    pub construction_and_hard_total: Money,
    pub hard_cost_per_unit: Option<Money>,
    pub hard_cost_per_buildable_sf: Option<Money>,
    pub hard_cost_per_saleable_sf: Option<Money>,
}

pub fn compute_revenue(
    assumptions: &ProFormaAssumptions,
    eff: &EffectiveValues,
) -> RevenueBreakdown {
    let total_revenue = eff.total_revenue;
    let selling_cost = match (total_revenue, assumptions.revenue.selling_cost_pct) {
        (Some(rev), Some(pct)) => Some(rev * pct_to_fraction(pct)),
        _ => None,
    };
    let selling_cost_add_back = assumptions
        .revenue
        .selling_cost_add_back
        .unwrap_or(Decimal::ZERO);
    let net_revenue = match (total_revenue, selling_cost) {
        (Some(rev), Some(cost)) => Some(rev - cost + selling_cost_add_back),
        _ => None,
    };

    RevenueBreakdown {
        total_revenue,
        selling_cost,
        selling_cost_add_back,
        net_revenue,
    }
}

pub fn compute_soft_costs(
    assumptions: &ProFormaAssumptions,
    metrics: &ProgramMetrics,
) -> SoftCostBreakdown {
    let soft = &assumptions.soft_costs;
    let soft_base = sum_line_items(&soft.line_items());
    let soft_contingency = contingency(soft_base, soft.contingency_pct);
    let soft_total = soft_base + soft_contingency;
    let land_and_soft_total = assumptions
        .acquisition
        .capitalized_land_cost
        .unwrap_or(Decimal::ZERO)
        + soft_total;

    let (per_unit, per_buildable, per_saleable) = normalise(soft_total, assumptions, metrics);

    SoftCostBreakdown {
        soft_base,
        soft_contingency,
        soft_total,
        land_and_soft_total,
        soft_cost_per_unit: per_unit,
        soft_cost_per_buildable_sf: per_buildable,
        soft_cost_per_saleable_sf: per_saleable,
    }
}

pub fn compute_hard_costs(
    assumptions: &ProFormaAssumptions,
    eff: &EffectiveValues,
    metrics: &ProgramMetrics,
) -> HardCostBreakdown {
    let hard = &assumptions.hard_costs;
    let hard_contingency_base = sum_line_items(&[
        eff.total_construction_hard_cost,
        hard.construction_management,
        hard.land_servicing_offsite,
        hard.land_servicing_onsite,
    ]);
    let hard_contingency = contingency(hard_contingency_base, hard.contingency_pct);
    let construction_and_hard_total = hard_contingency_base + hard_contingency;

    let (per_unit, per_buildable, per_saleable) =
        normalise(construction_and_hard_total, assumptions, metrics);

    HardCostBreakdown {
        hard_contingency_base,
        hard_contingency,
        construction_and_hard_total,
        hard_cost_per_unit: per_unit,
        hard_cost_per_buildable_sf: per_buildable,
        hard_cost_per_saleable_sf: per_saleable,
    }
}

fn sum_line_items(items: &[Option<Money>]) -> Money {
    items.iter().map(|v| v.unwrap_or(Decimal::ZERO)).sum()
}

/// No contingency configured is a valid zero, not a missing value.
fn contingency(base: Money, pct: Option<Percent>) -> Money {
    pct.map(|p| base * pct_to_fraction(p))
        .unwrap_or(Decimal::ZERO)
}

/// Per unit, per buildable SF, per saleable SF.
fn normalise(
    amount: Money,
    assumptions: &ProFormaAssumptions,
    metrics: &ProgramMetrics,
) -> (Option<Money>, Option<Money>, Option<Money>) {
    let amount = Some(amount);
    (
        ratio(amount, assumptions.program.units.map(Decimal::from)),
        ratio(amount, metrics.gross_buildable_sf),
        ratio(amount, metrics.net_saleable_sf),
    )
}
