use clap::Args;
use serde_json::Value;

use proforma_core::fees::development_charges::{self, FeeCalculatorInput};

use crate::input;

/// Arguments for the development charge estimate
#[derive(Args)]
pub struct FeesArgs {
    /// Path to JSON or YAML fee calculator input
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_fees(args: FeesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fee_input: FeeCalculatorInput =
        input::read_input(args.input.as_deref(), "fee calculator")?;
    let result = development_charges::run_fee_calculator(&fee_input)?;
    Ok(serde_json::to_value(result)?)
}
