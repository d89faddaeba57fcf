use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{elapsed_micros, with_metadata, Area, ComputationOutput, Money};
use crate::ProFormaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Development Cost Charge schedule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DccDevelopmentType {
    SingleFamily,
    DuplexTriplexFourplexMultiplex,
    Townhouse,
    Apartment,
    Commercial,
    Industrial,
    Institutional,
}

/// How a DCC rate is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DccBasis {
    PerUnit(Money),
    PerSquareMetre(Money),
}

impl DccDevelopmentType {
    fn rate(&self) -> DccBasis {
        match self {
            DccDevelopmentType::SingleFamily => DccBasis::PerUnit(dec!(64396)),
            DccDevelopmentType::DuplexTriplexFourplexMultiplex => DccBasis::PerUnit(dec!(43483)),
            DccDevelopmentType::Townhouse => DccBasis::PerUnit(dec!(38537)),
            DccDevelopmentType::Apartment => DccBasis::PerUnit(dec!(24435)),
            DccDevelopmentType::Commercial => DccBasis::PerSquareMetre(dec!(131)),
            DccDevelopmentType::Industrial => DccBasis::PerSquareMetre(dec!(73)),
            DccDevelopmentType::Institutional => DccBasis::PerSquareMetre(dec!(132)),
        }
    }
}

/// Amenity Cost Charge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccDevelopmentCategory {
    LowRiseResidential,
    MidRiseApartments,
    HighRiseApartments,
    IndustrialCommercialInstitutional,
}

/// Pre-application review fee
pub const PRE_APPLICATION_REVIEW_FEE: Money = dec!(2506.00);
/// Official Community Plan amendment fee
pub const OCP_AMENDMENT_FEE: Money = dec!(10007.70);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DccInput {
    pub development_type: DccDevelopmentType,
    /// Used by residential types
    pub units: Option<u32>,
    /// Used by non-residential types
    pub gross_floor_area_m2: Option<Area>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccInput {
    pub development_category: AccDevelopmentCategory,
    /// Used by low-rise residential
    pub units: Option<u32>,
    /// Used by mid- and high-rise apartments
    pub development_sqft: Option<Area>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeCalculatorInput {
    pub dcc: DccInput,
    pub acc: AccInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeCalculatorOutput {
    pub total_dcc: Option<Money>,
    pub total_acc: Option<Money>,
    /// Community amenity contribution; no schedule yet, always zero
    pub total_cac: Money,
    pub fixed_fees: Money,
    pub grand_total: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn compute_dcc(input: &DccInput) -> Option<Money> {
    match input.development_type.rate() {
        DccBasis::PerUnit(rate) => positive_units(input.units).map(|u| rate * u),
        DccBasis::PerSquareMetre(rate) => input
            .gross_floor_area_m2
            .filter(|a| *a > Decimal::ZERO)
            .map(|a| rate * a),
    }
}

pub fn compute_acc(input: &AccInput) -> Option<Money> {
    let per_sqft = |rate: Money| {
        input
            .development_sqft
            .filter(|a| *a > Decimal::ZERO)
            .map(|a| rate * a)
    };
    match input.development_category {
        AccDevelopmentCategory::LowRiseResidential => {
            positive_units(input.units).map(|u| dec!(21205) * u)
        }
        AccDevelopmentCategory::MidRiseApartments => per_sqft(dec!(21.31)),
        AccDevelopmentCategory::HighRiseApartments => per_sqft(dec!(38.53)),
        AccDevelopmentCategory::IndustrialCommercialInstitutional => Some(Decimal::ZERO),
    }
}

pub fn compute_fees(input: &FeeCalculatorInput) -> FeeCalculatorOutput {
    let total_dcc = compute_dcc(&input.dcc);
    let total_acc = compute_acc(&input.acc);
    let total_cac = Decimal::ZERO;
    let fixed_fees = PRE_APPLICATION_REVIEW_FEE + OCP_AMENDMENT_FEE;
    let grand_total = total_dcc.unwrap_or(Decimal::ZERO)
        + total_acc.unwrap_or(Decimal::ZERO)
        + total_cac
        + fixed_fees;

    FeeCalculatorOutput {
        total_dcc,
        total_acc,
        total_cac,
        fixed_fees,
        grand_total,
    }
}

pub fn run_fee_calculator(
    input: &FeeCalculatorInput,
) -> ProFormaResult<ComputationOutput<FeeCalculatorOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let output = compute_fees(input);
    if output.total_dcc.is_none() {
        warnings.push(format!(
            "DCC not computed: {:?} needs a positive driving quantity",
            input.dcc.development_type
        ));
    }
    if output.total_acc.is_none() {
        warnings.push(format!(
            "ACC not computed: {:?} needs a positive driving quantity",
            input.acc.development_category
        ));
    }

    let elapsed = elapsed_micros(start.elapsed());
    Ok(with_metadata(
        "Municipal Development Fees (DCC + ACC + fixed)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn positive_units(units: Option<u32>) -> Option<Decimal> {
    units.filter(|u| *u > 0).map(Decimal::from)
}
