use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::proforma::assumptions::ProFormaAssumptions;
use crate::types::Area;

/// Square feet per square metre.
pub const SQFT_PER_M2: Decimal = dec!(10.7639);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaUnit {
    #[serde(rename = "m2")]
    SquareMetres,
    #[serde(rename = "sqft")]
    SquareFeet,
}

/// Gross floor area as entered on a project profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorArea {
    pub value: Area,
    pub unit: AreaUnit,
}

impl FloorArea {
    pub fn to_sqft(&self) -> Area {
        match self.unit {
            AreaUnit::SquareMetres => self.value * SQFT_PER_M2,
            AreaUnit::SquareFeet => self.value,
        }
    }
}

/// The proposal section of a project profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileProposal {
    pub units_proposed: Option<u32>,
    pub gfa: Option<FloorArea>,
}

/// Program values derived from a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramSeed {
    pub units: Option<u32>,
    pub gross_floor_area_sqft: Option<Area>,
}

/// Pull program values out of a profile proposal, or `None` if it has
/// neither a unit count nor a positive floor area.
pub fn seed_program(proposal: &ProfileProposal) -> Option<ProgramSeed> {
    let units = proposal.units_proposed.filter(|u| *u > 0);
    let gross_floor_area_sqft = proposal
        .gfa
        .map(|gfa| gfa.to_sqft())
        .filter(|sqft| *sqft > Decimal::ZERO);

    if units.is_none() && gross_floor_area_sqft.is_none() {
        return None;
    }
    Some(ProgramSeed {
        units,
        gross_floor_area_sqft,
    })
}

/// Overlay a profile seed onto the program section.
///
/// The floor area becomes the buildable area: with a known site area the FSR
/// is backed out of it, otherwise the site is taken as the floor area at FSR 1.
pub fn apply_seed(mut assumptions: ProFormaAssumptions, seed: &ProgramSeed) -> ProFormaAssumptions {
    let program = &mut assumptions.program;
    if let Some(units) = seed.units {
        program.units = Some(units);
    }
    if let Some(gfa) = seed.gross_floor_area_sqft {
        match program.site_area_sqft {
            Some(site) if site > Decimal::ZERO => program.fsr = Some(gfa / site),
            _ => {
                program.site_area_sqft = Some(gfa);
                program.fsr = Some(Decimal::ONE);
            }
        }
    }
    assumptions
}

/// Persisted assumptions win; otherwise start from defaults seeded by the
/// profile (if it has anything to offer).
pub fn ensure_assumptions(
    persisted: Option<ProFormaAssumptions>,
    proposal: Option<&ProfileProposal>,
) -> ProFormaAssumptions {
    if let Some(existing) = persisted {
        return existing;
    }
    let defaults = ProFormaAssumptions::default();
    match proposal.and_then(seed_program) {
        Some(seed) => {
            debug!(?seed, "seeding new pro forma from profile");
            apply_seed(defaults, &seed)
        }
        None => defaults,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_metres_convert() {
        let gfa = FloorArea {
            value: dec!(1000),
            unit: AreaUnit::SquareMetres,
        };
        assert_eq!(gfa.to_sqft(), dec!(10763.9));
    }

    #[test]
    fn test_seed_requires_something() {
        assert_eq!(seed_program(&ProfileProposal::default()), None);
        let zero = ProfileProposal {
            units_proposed: Some(0),
            gfa: Some(FloorArea {
                value: Decimal::ZERO,
                unit: AreaUnit::SquareFeet,
            }),
        };
        assert_eq!(seed_program(&zero), None);
    }

    #[test]
    fn test_seed_without_site_area() {
        let proposal = ProfileProposal {
            units_proposed: Some(36),
            gfa: Some(FloorArea {
                value: dec!(3000),
                unit: AreaUnit::SquareMetres,
            }),
        };
        let a = ensure_assumptions(None, Some(&proposal));
        assert_eq!(a.program.units, Some(36));
        assert_eq!(a.program.site_area_sqft, Some(dec!(32291.7)));
        assert_eq!(a.program.fsr, Some(Decimal::ONE));
        // the rest of the defaults survive
        assert_eq!(a.program.efficiency_pct, Some(dec!(85)));
    }

    #[test]
    fn test_seed_backs_out_fsr_from_site() {
        let mut base = ProFormaAssumptions::default();
        base.program.site_area_sqft = Some(dec!(10000));
        let seed = ProgramSeed {
            units: None,
            gross_floor_area_sqft: Some(dec!(25000)),
        };
        let a = apply_seed(base, &seed);
        assert_eq!(a.program.fsr, Some(dec!(2.5)));
        assert_eq!(a.program.site_area_sqft, Some(dec!(10000)));
        assert_eq!(a.program.units, None);
    }

    #[test]
    fn test_persisted_assumptions_win() {
        let mut saved = ProFormaAssumptions::default();
        saved.program.units = Some(12);
        let proposal = ProfileProposal {
            units_proposed: Some(99),
            gfa: None,
        };
        let a = ensure_assumptions(Some(saved.clone()), Some(&proposal));
        assert_eq!(a, saved);
    }

    #[test]
    fn test_area_unit_wire_names() {
        let gfa: FloorArea = serde_json::from_str(r#"{"value": 500, "unit": "m2"}"#).unwrap();
        assert_eq!(gfa.unit, AreaUnit::SquareMetres);
    }
}
