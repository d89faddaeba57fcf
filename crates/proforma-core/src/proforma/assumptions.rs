use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Area, Money, Months, Multiple, Percent};

// ---------------------------------------------------------------------------
// Types: assumptions (engine input)
// ---------------------------------------------------------------------------

/// Built form of the project. Informational only; no calculation branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    #[default]
    Townhome,
    Multifamily,
}

/// How the finished product is monetised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Monetization {
    #[default]
    ForSale,
    ForRent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub asset_type: AssetType,
    pub monetization: Monetization,
}

/// Program & density inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Number of dwelling units
    pub units: Option<u32>,
    /// Site area in square feet
    pub site_area_sqft: Option<Area>,
    /// Floor space ratio (buildable area / site area)
    pub fsr: Option<Multiple>,
    /// Share of buildable area that is saleable (85 = 85%)
    pub efficiency_pct: Option<Percent>,
}

/// Land inputs. The purchase price feeds density benchmarks only; the
/// capitalised cost is what enters the cost stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    pub land_purchase_price: Option<Money>,
    pub capitalized_land_cost: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueAssumptions {
    /// Gross sales revenue
    pub total_revenue: Option<Money>,
    pub selling_cost_pct: Option<Percent>,
    /// Reduction to selling cost (rebates, commissions recovered)
    pub selling_cost_add_back: Option<Money>,
}

/// Three sequential phases: land/entitlement, servicing, construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub land_entitlement_months: Option<Months>,
    pub servicing_months: Option<Months>,
    pub construction_months: Option<Months>,
}

impl Timeline {
    /// Phase durations with missing phases counted as zero months.
    pub fn phases(&self) -> PhaseDurations {
        PhaseDurations {
            land_entitlement: self.land_entitlement_months.unwrap_or(0),
            servicing: self.servicing_months.unwrap_or(0),
            construction: self.construction_months.unwrap_or(0),
        }
    }
}

/// Resolved (non-null) phase durations in months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub land_entitlement: Months,
    pub servicing: Months,
    pub construction: Months,
}

impl PhaseDurations {
    pub fn total(&self) -> Months {
        self.land_entitlement + self.servicing + self.construction
    }
}

/// Lump-sum soft cost categories plus a contingency on their sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftCostAssumptions {
    pub consultants: Option<Money>,
    pub municipal_permit_fees: Option<Money>,
    pub other_soft_costs: Option<Money>,
    pub marketing: Option<Money>,
    pub finance: Option<Money>,
    pub contingency_pct: Option<Percent>,
}

impl SoftCostAssumptions {
    /// The five lump sums in a fixed order.
    pub fn line_items(&self) -> [Option<Money>; 5] {
        [
            self.consultants,
            self.municipal_permit_fees,
            self.other_soft_costs,
            self.marketing,
            self.finance,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardCostAssumptions {
    /// Lump-sum construction hard cost (the only hard line the scenario shocks)
    pub total_construction_hard_cost: Option<Money>,
    pub construction_management: Option<Money>,
    pub land_servicing_offsite: Option<Money>,
    pub land_servicing_onsite: Option<Money>,
    pub contingency_pct: Option<Percent>,
}

/// What-if overlay. Always numeric; zero everywhere means "no scenario".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDeltas {
    pub delta_revenue_pct: Percent,
    pub delta_hard_cost_pct: Percent,
    /// Signed change to total project duration in months
    pub delta_duration_months: i32,
}

impl ScenarioDeltas {
    pub fn is_neutral(&self) -> bool {
        self.delta_revenue_pct.is_zero()
            && self.delta_hard_cost_pct.is_zero()
            && self.delta_duration_months == 0
    }
}

/// Complete set of development assumptions for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProFormaAssumptions {
    #[serde(default)]
    pub meta: ProjectMeta,
    pub program: Program,
    pub acquisition: Acquisition,
    pub revenue: RevenueAssumptions,
    pub timeline: Timeline,
    pub soft_costs: SoftCostAssumptions,
    pub hard_costs: HardCostAssumptions,
    #[serde(default)]
    pub scenario: ScenarioDeltas,
}

impl ProFormaAssumptions {
    /// Copy of these assumptions with the scenario overlay reset to neutral.
    pub fn without_scenario(&self) -> Self {
        Self {
            scenario: ScenarioDeltas::default(),
            ..self.clone()
        }
    }
}

impl Default for ProFormaAssumptions {
    /// Starting point for a new project: 85% efficiency, a 12/6/18 month
    /// timeline and 5% contingencies, every other input blank.
    fn default() -> Self {
        Self {
            meta: ProjectMeta::default(),
            program: Program {
                efficiency_pct: Some(dec!(85)),
                ..Program::default()
            },
            acquisition: Acquisition::default(),
            revenue: RevenueAssumptions::default(),
            timeline: Timeline {
                land_entitlement_months: Some(12),
                servicing_months: Some(6),
                construction_months: Some(18),
            },
            soft_costs: SoftCostAssumptions {
                contingency_pct: Some(dec!(5)),
                ..SoftCostAssumptions::default()
            },
            hard_costs: HardCostAssumptions {
                contingency_pct: Some(dec!(5)),
                ..HardCostAssumptions::default()
            },
            scenario: ScenarioDeltas::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario slider ranges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl SliderRange {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Recommended bounds for each scenario delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRanges {
    pub delta_revenue_pct: SliderRange,
    pub delta_hard_cost_pct: SliderRange,
    pub delta_duration_months: SliderRange,
}

impl Default for ScenarioRanges {
    fn default() -> Self {
        Self {
            delta_revenue_pct: SliderRange {
                min: dec!(-20),
                max: dec!(20),
                step: Decimal::ONE,
            },
            delta_hard_cost_pct: SliderRange {
                min: dec!(-20),
                max: dec!(20),
                step: Decimal::ONE,
            },
            delta_duration_months: SliderRange {
                min: dec!(-12),
                max: dec!(12),
                step: Decimal::ONE,
            },
        }
    }
}
