use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Areas in square feet unless the field name says otherwise.
pub type Area = Decimal;

/// Percentages as entered by a user (5 = 5%). Divide by 100 at the point of use.
pub type Percent = Decimal;

/// Ratios such as FSR (buildable area / site area)
pub type Multiple = Decimal;

/// Whole months on the project timeline
pub type Months = u32;

/// Convert a human-readable percentage into a fraction.
pub fn pct_to_fraction(pct: Percent) -> Decimal {
    pct / dec!(100)
}

/// `numerator / denominator`, or `None` unless both exist, the denominator
/// is positive and the quotient fits in a `Decimal`.
pub fn ratio(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<Decimal> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d > Decimal::ZERO => n.checked_div(d),
        _ => None,
    }
}

/// `ratio × 100`, with the same `None` cases as [`ratio`].
pub fn pct_ratio(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<Percent> {
    ratio(numerator, denominator).and_then(|r| r.checked_mul(dec!(100)))
}

/// Whole microseconds in `elapsed`, saturating at `u64::MAX`.
pub fn elapsed_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ratio_requires_positive_denominator() {
        assert_eq!(ratio(Some(dec!(10)), Some(dec!(4))), Some(dec!(2.5)));
        assert_eq!(ratio(Some(dec!(10)), Some(Decimal::ZERO)), None);
        assert_eq!(ratio(Some(dec!(10)), Some(dec!(-4))), None);
        assert_eq!(ratio(None, Some(dec!(4))), None);
        assert_eq!(ratio(Some(dec!(10)), None), None);
    }

    #[test]
    fn test_elapsed_micros_saturates() {
        assert_eq!(elapsed_micros(Duration::from_millis(3)), 3_000);
        assert_eq!(elapsed_micros(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_ratio_overflow_is_none() {
        let tiny = Decimal::new(1, 28);
        assert_eq!(ratio(Some(dec!(1_000_000_000_000_000)), Some(tiny)), None);
        assert_eq!(pct_ratio(Some(Decimal::MAX), Some(Decimal::ONE)), None);
        assert_eq!(pct_ratio(Some(dec!(3)), Some(dec!(20))), Some(dec!(15)));
    }

    #[test]
    fn test_pct_to_fraction() {
        assert_eq!(pct_to_fraction(dec!(5)), dec!(0.05));
        assert_eq!(pct_to_fraction(dec!(87.5)), dec!(0.875));
    }

    #[test]
    fn test_envelope_echoes_assumptions() {
        let out = with_metadata("Test", &serde_json::json!({"a": 1}), vec![], 7, dec!(1));
        assert_eq!(out.assumptions["a"], 1);
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
