use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::assumptions::PhaseDurations;
use crate::types::{Money, Months};

/// Share of hard costs drawn during servicing; the rest falls in construction.
pub const SERVICING_HARD_SHARE: Decimal = dec!(0.125);
pub const CONSTRUCTION_HARD_SHARE: Decimal = dec!(0.875);
/// Revenue is recognised over the final quarter of construction.
pub const REVENUE_WINDOW_SHARE: Decimal = dec!(0.25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    LandEntitlement,
    Servicing,
    Construction,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::LandEntitlement => "Land & Entitlement",
            Phase::Servicing => "Servicing",
            Phase::Construction => "Construction",
        };
        f.write_str(label)
    }
}

/// One month of the display schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCashflowRow {
    /// 1-based
    pub month_index: Months,
    pub phase: Phase,
    pub land: Money,
    pub soft: Money,
    pub hard: Money,
    pub revenue: Money,
}

/// Aggregate amounts the schedule spreads over the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAmounts {
    pub land: Money,
    pub soft: Money,
    pub hard: Money,
    pub revenue: Money,
}

/// Sum of each category across a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub land: Money,
    pub soft: Money,
    pub hard: Money,
    pub revenue: Money,
}

/// Number of months at the end of construction that carry revenue.
pub fn revenue_window_months(construction_months: Months) -> Months {
    (Decimal::from(construction_months) * REVENUE_WINDOW_SHARE)
        .ceil()
        .to_u32()
        .unwrap_or(0)
}

/// Which phase a 1-based month falls in.
pub fn phase_for_month(phases: &PhaseDurations, month: Months) -> Phase {
    if month <= phases.land_entitlement {
        Phase::LandEntitlement
    } else if month <= phases.land_entitlement + phases.servicing {
        Phase::Servicing
    } else {
        Phase::Construction
    }
}

/// Spread aggregate amounts over the phased timeline.
///
/// * land: all of it in month 1
/// * soft: evenly over every month
/// * hard: 1/8 evenly over servicing, 7/8 evenly over construction; a slice
///   whose phase has no months is dropped rather than moved
/// * revenue: evenly over the last `ceil(construction × 25%)` months
///
/// The schedule is display data; totals are never derived from it.
pub fn build_monthly_schedule(
    phases: &PhaseDurations,
    amounts: &ScheduleAmounts,
) -> Vec<MonthlyCashflowRow> {
    let total_months = phases.total();
    if total_months == 0 {
        return Vec::new();
    }

    let per_month = |amount: Money, months: Months| -> Money {
        if months == 0 {
            Decimal::ZERO
        } else {
            amount / Decimal::from(months)
        }
    };

    let soft_per_month = per_month(amounts.soft, total_months);
    let servicing_hard = per_month(amounts.hard * SERVICING_HARD_SHARE, phases.servicing);
    let construction_hard =
        per_month(amounts.hard * CONSTRUCTION_HARD_SHARE, phases.construction);

    let revenue_months = revenue_window_months(phases.construction);
    let revenue_per_month = per_month(amounts.revenue, revenue_months);
    let revenue_start = total_months - revenue_months + 1;

    (1..=total_months)
        .map(|month| {
            let phase = phase_for_month(phases, month);
            let hard = match phase {
                Phase::LandEntitlement => Decimal::ZERO,
                Phase::Servicing => servicing_hard,
                Phase::Construction => construction_hard,
            };
            let revenue = if phase == Phase::Construction && month >= revenue_start {
                revenue_per_month
            } else {
                Decimal::ZERO
            };

            MonthlyCashflowRow {
                month_index: month,
                phase,
                land: if month == 1 { amounts.land } else { Decimal::ZERO },
                soft: soft_per_month,
                hard,
                revenue,
            }
        })
        .collect()
}

pub fn summarize_schedule(rows: &[MonthlyCashflowRow]) -> ScheduleTotals {
    rows.iter().fold(ScheduleTotals::default(), |mut acc, row| {
        acc.land += row.land;
        acc.soft += row.soft;
        acc.hard += row.hard;
        acc.revenue += row.revenue;
        acc
    })
}
