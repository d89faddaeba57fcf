use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use proforma_core::profile::migration::load_assumptions;
use proforma_core::profile::seeding::{ensure_assumptions, ProfileProposal};

use crate::input;

/// Arguments for upgrading a stored assumptions document
#[derive(Args)]
pub struct MigrateArgs {
    /// Path to JSON or YAML assumptions document
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for seeding assumptions from a development profile
#[derive(Args)]
pub struct SeedArgs {
    /// Path to JSON or YAML seed document: `{ "proposal": {...}, "assumptions": {...} }`
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedDocument {
    #[serde(default)]
    proposal: Option<ProfileProposal>,
    /// Previously stored assumptions, in either schema
    #[serde(default)]
    assumptions: Option<Value>,
}

pub fn run_migrate(args: MigrateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = input::read_document(args.input.as_deref(), "assumptions migration")?;
    let assumptions = load_assumptions(doc)?;
    Ok(serde_json::to_value(assumptions)?)
}

pub fn run_seed(args: SeedArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc: SeedDocument = input::read_input(args.input.as_deref(), "profile seeding")?;
    let persisted = match doc.assumptions {
        Some(Value::Null) | None => None,
        Some(stored) => Some(load_assumptions(stored)?),
    };
    let assumptions = ensure_assumptions(persisted, doc.proposal.as_ref());
    Ok(serde_json::to_value(assumptions)?)
}
