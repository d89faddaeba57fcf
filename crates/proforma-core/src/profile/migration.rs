//! Migration from the earlier single-phase assumption schema.
//!
//! Older documents stored one land figure, one soft and one hard lump sum,
//! a single contingency and a total duration. The engine only understands
//! the phased schema, so old documents are upgraded at load time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProFormaError;
use crate::proforma::assumptions::{
    Acquisition, HardCostAssumptions, ProFormaAssumptions, Program, RevenueAssumptions,
    ScenarioDeltas, SoftCostAssumptions, Timeline,
};
use crate::proforma::scenario::redistribute_phases;
use crate::types::{Area, Money, Months, Percent};
use crate::ProFormaResult;

/// Earlier, single-phase assumption document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyAssumptions {
    pub units: Option<u32>,
    pub site_area_sqft: Option<Area>,
    /// One land figure, used both as price and as capitalised cost
    pub land_cost: Option<Money>,
    pub revenue: Option<Money>,
    pub selling_cost_pct: Option<Percent>,
    pub hard_cost: Option<Money>,
    pub soft_cost: Option<Money>,
    /// Applied to both soft and hard costs
    pub contingency_pct: Option<Percent>,
    pub duration_months: Option<Months>,
    #[serde(default)]
    pub delta_revenue_pct: Percent,
    #[serde(default)]
    pub delta_cost_pct: Percent,
    #[serde(default)]
    pub delta_duration_months: i32,
}

/// Upgrade a legacy document to the phased schema.
///
/// The single duration is split across the three phases in the default
/// 12 / 6 / 18 proportions.
pub fn migrate_legacy(legacy: LegacyAssumptions) -> ProFormaAssumptions {
    let defaults = ProFormaAssumptions::default();

    let timeline = match legacy.duration_months {
        None => Timeline::default(),
        Some(0) => Timeline {
            land_entitlement_months: Some(0),
            servicing_months: Some(0),
            construction_months: Some(0),
        },
        Some(total) => {
            let default_total = defaults.timeline.phases().total();
            let delta = i64::from(total) - i64::from(default_total);
            let phases = redistribute_phases(
                &defaults.timeline,
                i32::try_from(delta).unwrap_or(i32::MAX),
            );
            Timeline {
                land_entitlement_months: Some(phases.land_entitlement),
                servicing_months: Some(phases.servicing),
                construction_months: Some(phases.construction),
            }
        }
    };

    ProFormaAssumptions {
        meta: defaults.meta,
        program: Program {
            units: legacy.units,
            site_area_sqft: legacy.site_area_sqft,
            fsr: None,
            efficiency_pct: defaults.program.efficiency_pct,
        },
        acquisition: Acquisition {
            land_purchase_price: legacy.land_cost,
            capitalized_land_cost: legacy.land_cost,
        },
        revenue: RevenueAssumptions {
            total_revenue: legacy.revenue,
            selling_cost_pct: legacy.selling_cost_pct,
            selling_cost_add_back: None,
        },
        timeline,
        soft_costs: SoftCostAssumptions {
            other_soft_costs: legacy.soft_cost,
            contingency_pct: legacy.contingency_pct,
            ..SoftCostAssumptions::default()
        },
        hard_costs: HardCostAssumptions {
            total_construction_hard_cost: legacy.hard_cost,
            contingency_pct: legacy.contingency_pct,
            ..HardCostAssumptions::default()
        },
        scenario: ScenarioDeltas {
            delta_revenue_pct: legacy.delta_revenue_pct,
            delta_hard_cost_pct: legacy.delta_cost_pct,
            delta_duration_months: legacy.delta_duration_months,
        },
    }
}

/// Parse a stored assumptions document of either schema.
///
/// Documents with a `timeline` section are phased; any other object is
/// treated as legacy and migrated.
pub fn load_assumptions(doc: serde_json::Value) -> ProFormaResult<ProFormaAssumptions> {
    let Some(obj) = doc.as_object() else {
        return Err(ProFormaError::InvalidInput {
            field: "assumptions".into(),
            reason: "Assumptions document must be a JSON object".into(),
        });
    };

    if obj.contains_key("timeline") {
        Ok(serde_json::from_value(doc)?)
    } else {
        debug!("migrating legacy assumptions document");
        let legacy: LegacyAssumptions = serde_json::from_value(doc)?;
        Ok(migrate_legacy(legacy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proforma::engine::compute_pro_forma;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn legacy() -> LegacyAssumptions {
        LegacyAssumptions {
            units: Some(20),
            site_area_sqft: Some(dec!(20000)),
            land_cost: Some(dec!(3_000_000)),
            revenue: Some(dec!(15_000_000)),
            selling_cost_pct: Some(dec!(4)),
            hard_cost: Some(dec!(7_000_000)),
            soft_cost: Some(dec!(1_000_000)),
            contingency_pct: Some(dec!(5)),
            duration_months: Some(24),
            delta_revenue_pct: Decimal::ZERO,
            delta_cost_pct: dec!(10),
            delta_duration_months: 0,
        }
    }

    #[test]
    fn test_duration_split_in_default_proportions() {
        let a = migrate_legacy(legacy());
        // 24 × (12, 6, 18) / 36
        assert_eq!(a.timeline.land_entitlement_months, Some(8));
        assert_eq!(a.timeline.servicing_months, Some(4));
        assert_eq!(a.timeline.construction_months, Some(12));
    }

    #[test]
    fn test_lump_sums_map_to_phased_lines() {
        let a = migrate_legacy(legacy());
        assert_eq!(a.acquisition.capitalized_land_cost, Some(dec!(3_000_000)));
        assert_eq!(a.acquisition.land_purchase_price, Some(dec!(3_000_000)));
        assert_eq!(a.soft_costs.other_soft_costs, Some(dec!(1_000_000)));
        assert_eq!(a.hard_costs.total_construction_hard_cost, Some(dec!(7_000_000)));
        assert_eq!(a.hard_costs.contingency_pct, Some(dec!(5)));
        assert_eq!(a.scenario.delta_hard_cost_pct, dec!(10));
    }

    #[test]
    fn test_migrated_document_computes() {
        let out = compute_pro_forma(&migrate_legacy(legacy()), false);
        // 3M + 1.05M + 7.35M
        assert_eq!(out.totals.total_project_cost, dec!(11_400_000));
        assert_eq!(out.totals.profit, Some(dec!(3_000_000)));
        assert_eq!(out.monthly.len(), 24);
    }

    #[test]
    fn test_load_detects_schema() {
        let phased = serde_json::to_value(ProFormaAssumptions::default()).unwrap();
        assert_eq!(load_assumptions(phased).unwrap(), ProFormaAssumptions::default());

        let old = serde_json::json!({"units": 10, "hard_cost": 500000, "duration_months": 36});
        let a = load_assumptions(old).unwrap();
        assert_eq!(a.program.units, Some(10));
        assert_eq!(a.timeline.construction_months, Some(18));
    }

    #[test]
    fn test_load_rejects_non_object() {
        assert!(load_assumptions(serde_json::json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_missing_duration_leaves_timeline_blank() {
        let mut l = legacy();
        l.duration_months = None;
        assert_eq!(migrate_legacy(l).timeline, Timeline::default());
    }
}
