use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;
use serde_json::Value;

use proforma_core::profile::migration::load_assumptions;
use proforma_core::profile::seeding::{ensure_assumptions, ProfileProposal};
use proforma_core::proforma::assumptions::{ProFormaAssumptions, ScenarioRanges};
use proforma_core::proforma::engine::ProFormaInput;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Stored documents may still use the single-phase schema.
fn parse_assumptions(value: Value) -> NapiResult<ProFormaAssumptions> {
    load_assumptions(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pro forma
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ComputeRequest {
    assumptions: Value,
    #[serde(default)]
    apply_scenario: bool,
}

#[napi]
pub fn compute_pro_forma(input_json: String) -> NapiResult<String> {
    let request: ComputeRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let input = ProFormaInput {
        assumptions: parse_assumptions(request.assumptions)?,
        apply_scenario: request.apply_scenario,
    };
    let output =
        proforma_core::proforma::engine::run_pro_forma(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenario(assumptions_json: String) -> NapiResult<String> {
    let value: Value = serde_json::from_str(&assumptions_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(value)?;
    let output = proforma_core::proforma::comparison::run_scenario_comparison(&assumptions)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_grid(input_json: String) -> NapiResult<String> {
    let input: proforma_core::proforma::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        proforma_core::proforma::sensitivity::run_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn default_assumptions() -> NapiResult<String> {
    let defaults = serde_json::json!({
        "assumptions": ProFormaAssumptions::default(),
        "scenario_ranges": ScenarioRanges::default(),
    });
    serde_json::to_string(&defaults).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[napi]
pub fn migrate_assumptions(document_json: String) -> NapiResult<String> {
    let value: Value = serde_json::from_str(&document_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(value)?;
    serde_json::to_string(&assumptions).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct SeedRequest {
    #[serde(default)]
    proposal: Option<ProfileProposal>,
    #[serde(default)]
    assumptions: Option<Value>,
}

#[napi]
pub fn seed_assumptions(input_json: String) -> NapiResult<String> {
    let request: SeedRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let persisted = match request.assumptions {
        Some(Value::Null) | None => None,
        Some(stored) => Some(parse_assumptions(stored)?),
    };
    let assumptions = ensure_assumptions(persisted, request.proposal.as_ref());
    serde_json::to_string(&assumptions).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

#[napi]
pub fn fee_calculator(input_json: String) -> NapiResult<String> {
    let input: proforma_core::fees::development_charges::FeeCalculatorInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = proforma_core::fees::development_charges::run_fee_calculator(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
