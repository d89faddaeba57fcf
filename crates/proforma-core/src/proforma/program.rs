use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::assumptions::ProFormaAssumptions;
use crate::types::{pct_to_fraction, ratio, Area, Money};

/// Square feet in one acre.
pub const SQFT_PER_ACRE: Decimal = dec!(43560);

/// Program metrics derived from site area, FSR, efficiency and units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramMetrics {
    /// Site area × FSR
    pub gross_buildable_sf: Option<Area>,
    /// Gross buildable × efficiency
    pub net_saleable_sf: Option<Area>,
    pub acres: Option<Decimal>,
    pub units_per_acre: Option<Decimal>,
}

/// Land purchase price per unit of measure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityBenchmarks {
    pub dollar_per_land_sf: Option<Money>,
    pub dollar_per_buildable_sf: Option<Money>,
    pub dollar_per_saleable_sf: Option<Money>,
    pub dollar_per_acre: Option<Money>,
}

pub fn compute_program_metrics(assumptions: &ProFormaAssumptions) -> ProgramMetrics {
    let program = &assumptions.program;

    let gross_buildable_sf = match (program.site_area_sqft, program.fsr) {
        (Some(site), Some(fsr)) => Some(site * fsr),
        _ => None,
    };

    let net_saleable_sf = match (gross_buildable_sf, program.efficiency_pct) {
        (Some(gba), Some(eff)) => Some(gba * pct_to_fraction(eff)),
        _ => None,
    };

    let acres = program.site_area_sqft.map(|site| site / SQFT_PER_ACRE);
    let units_per_acre = ratio(program.units.map(Decimal::from), acres);

    ProgramMetrics {
        gross_buildable_sf,
        net_saleable_sf,
        acres,
        units_per_acre,
    }
}

/// Land cost benchmarks on the raw purchase price, never the capitalised
/// land cost.
pub fn compute_density_benchmarks(
    assumptions: &ProFormaAssumptions,
    metrics: &ProgramMetrics,
) -> DensityBenchmarks {
    let price = assumptions.acquisition.land_purchase_price;

    DensityBenchmarks {
        dollar_per_land_sf: ratio(price, assumptions.program.site_area_sqft),
        dollar_per_buildable_sf: ratio(price, metrics.gross_buildable_sf),
        dollar_per_saleable_sf: ratio(price, metrics.net_saleable_sf),
        dollar_per_acre: ratio(price, metrics.acres),
    }
}
