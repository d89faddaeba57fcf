use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::assumptions::ProFormaAssumptions;
use crate::error::ProFormaError;
use crate::ProFormaResult;

const MAX_PHASE_MONTHS: u32 = 120;
const MAX_DURATION_DELTA: i32 = 12;
const MAX_PCT_DELTA: Decimal = dec!(20);
/// Upper bound on any single monetary input (one quadrillion).
pub const MAX_MONEY: Decimal = dec!(1_000_000_000_000_000);

/// Reject assumptions outside the ranges the input form accepts.
///
/// Blank (`None`) inputs always pass; the engine handles them by
/// propagating `None`. Only the first violation is reported.
pub fn validate_assumptions(a: &ProFormaAssumptions) -> ProFormaResult<()> {
    if let Some(units) = a.program.units {
        if !(1..=50_000).contains(&units) {
            return Err(invalid("program.units", "Units must be between 1 and 50,000"));
        }
    }
    check_range(
        "program.site_area_sqft",
        a.program.site_area_sqft,
        Decimal::ONE,
        dec!(50_000_000),
    )?;
    check_range("program.fsr", a.program.fsr, dec!(0.1), dec!(20))?;
    check_range(
        "program.efficiency_pct",
        a.program.efficiency_pct,
        dec!(50),
        dec!(100),
    )?;

    let money_fields = [
        ("acquisition.land_purchase_price", a.acquisition.land_purchase_price),
        ("acquisition.capitalized_land_cost", a.acquisition.capitalized_land_cost),
        ("revenue.total_revenue", a.revenue.total_revenue),
        ("revenue.selling_cost_add_back", a.revenue.selling_cost_add_back),
        ("soft_costs.consultants", a.soft_costs.consultants),
        ("soft_costs.municipal_permit_fees", a.soft_costs.municipal_permit_fees),
        ("soft_costs.other_soft_costs", a.soft_costs.other_soft_costs),
        ("soft_costs.marketing", a.soft_costs.marketing),
        ("soft_costs.finance", a.soft_costs.finance),
        (
            "hard_costs.total_construction_hard_cost",
            a.hard_costs.total_construction_hard_cost,
        ),
        (
            "hard_costs.construction_management",
            a.hard_costs.construction_management,
        ),
        ("hard_costs.land_servicing_offsite", a.hard_costs.land_servicing_offsite),
        ("hard_costs.land_servicing_onsite", a.hard_costs.land_servicing_onsite),
    ];
    for (field, value) in money_fields {
        check_range(field, value, Decimal::ZERO, MAX_MONEY)?;
    }

    check_percent("revenue.selling_cost_pct", a.revenue.selling_cost_pct)?;
    check_percent("soft_costs.contingency_pct", a.soft_costs.contingency_pct)?;
    check_percent("hard_costs.contingency_pct", a.hard_costs.contingency_pct)?;

    for (field, months) in [
        (
            "timeline.land_entitlement_months",
            a.timeline.land_entitlement_months,
        ),
        ("timeline.servicing_months", a.timeline.servicing_months),
        ("timeline.construction_months", a.timeline.construction_months),
    ] {
        if months.is_some_and(|m| m > MAX_PHASE_MONTHS) {
            return Err(invalid(
                field,
                &format!("Phase duration must be between 0 and {MAX_PHASE_MONTHS} months"),
            ));
        }
    }

    let s = &a.scenario;
    check_range(
        "scenario.delta_revenue_pct",
        Some(s.delta_revenue_pct),
        -MAX_PCT_DELTA,
        MAX_PCT_DELTA,
    )?;
    check_range(
        "scenario.delta_hard_cost_pct",
        Some(s.delta_hard_cost_pct),
        -MAX_PCT_DELTA,
        MAX_PCT_DELTA,
    )?;
    if !(-MAX_DURATION_DELTA..=MAX_DURATION_DELTA).contains(&s.delta_duration_months) {
        return Err(invalid(
            "scenario.delta_duration_months",
            &format!("Duration delta must be within ±{MAX_DURATION_DELTA} months"),
        ));
    }

    Ok(())
}

fn check_percent(field: &str, value: Option<Decimal>) -> ProFormaResult<()> {
    check_range(field, value, Decimal::ZERO, dec!(100))
}

fn check_range(field: &str, value: Option<Decimal>, min: Decimal, max: Decimal) -> ProFormaResult<()> {
    match value {
        Some(v) if v < min || v > max => Err(invalid(
            field,
            &format!("Must be between {min} and {max} (got {v})"),
        )),
        _ => Ok(()),
    }
}

fn invalid(field: &str, reason: &str) -> ProFormaError {
    ProFormaError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ProFormaResult<()>) -> String {
        match result {
            Err(ProFormaError::InvalidInput { field, .. }) => field,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_assumptions(&ProFormaAssumptions::default()).is_ok());
    }

    #[test]
    fn test_blank_inputs_pass() {
        let mut a = ProFormaAssumptions::default();
        a.program.efficiency_pct = None;
        a.soft_costs.contingency_pct = None;
        a.timeline.construction_months = None;
        assert!(validate_assumptions(&a).is_ok());
    }

    #[test]
    fn test_program_ranges() {
        let mut a = ProFormaAssumptions::default();
        a.program.units = Some(0);
        assert_eq!(field_of(validate_assumptions(&a)), "program.units");

        let mut a = ProFormaAssumptions::default();
        a.program.fsr = Some(dec!(0.05));
        assert_eq!(field_of(validate_assumptions(&a)), "program.fsr");

        let mut a = ProFormaAssumptions::default();
        a.program.efficiency_pct = Some(dec!(49.9));
        assert_eq!(field_of(validate_assumptions(&a)), "program.efficiency_pct");
    }

    #[test]
    fn test_percent_and_timeline_ranges() {
        let mut a = ProFormaAssumptions::default();
        a.hard_costs.contingency_pct = Some(dec!(-1));
        assert_eq!(field_of(validate_assumptions(&a)), "hard_costs.contingency_pct");

        let mut a = ProFormaAssumptions::default();
        a.timeline.servicing_months = Some(121);
        assert_eq!(field_of(validate_assumptions(&a)), "timeline.servicing_months");
    }

    #[test]
    fn test_scenario_ranges() {
        let mut a = ProFormaAssumptions::default();
        a.scenario.delta_revenue_pct = dec!(20);
        a.scenario.delta_duration_months = -12;
        assert!(validate_assumptions(&a).is_ok());

        a.scenario.delta_hard_cost_pct = dec!(-25);
        assert_eq!(field_of(validate_assumptions(&a)), "scenario.delta_hard_cost_pct");

        let mut a = ProFormaAssumptions::default();
        a.scenario.delta_duration_months = 13;
        assert_eq!(
            field_of(validate_assumptions(&a)),
            "scenario.delta_duration_months"
        );
    }

    #[test]
    fn test_extreme_duration_delta_is_rejected() {
        let mut a = ProFormaAssumptions::default();
        a.scenario.delta_duration_months = i32::MIN;
        assert_eq!(
            field_of(validate_assumptions(&a)),
            "scenario.delta_duration_months"
        );

        a.scenario.delta_duration_months = i32::MAX;
        assert_eq!(
            field_of(validate_assumptions(&a)),
            "scenario.delta_duration_months"
        );
    }

    #[test]
    fn test_monetary_inputs_bounded() {
        let mut a = ProFormaAssumptions::default();
        a.soft_costs.consultants = Some(Decimal::MAX);
        a.soft_costs.finance = Some(Decimal::MAX);
        assert_eq!(field_of(validate_assumptions(&a)), "soft_costs.consultants");

        let mut a = ProFormaAssumptions::default();
        a.hard_costs.land_servicing_onsite = Some(dec!(-1));
        assert_eq!(
            field_of(validate_assumptions(&a)),
            "hard_costs.land_servicing_onsite"
        );

        let mut a = ProFormaAssumptions::default();
        a.revenue.total_revenue = Some(MAX_MONEY);
        a.acquisition.capitalized_land_cost = Some(MAX_MONEY);
        assert!(validate_assumptions(&a).is_ok());
    }
}
