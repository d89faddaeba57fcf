use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::info;

use proforma_core::profile::migration::load_assumptions;
use proforma_core::proforma::assumptions::{ProFormaAssumptions, ScenarioRanges};
use proforma_core::proforma::cashflow::{
    CONSTRUCTION_HARD_SHARE, REVENUE_WINDOW_SHARE, SERVICING_HARD_SHARE,
};
use proforma_core::proforma::comparison::run_scenario_comparison;
use proforma_core::proforma::engine::{run_pro_forma, ProFormaInput};
use proforma_core::proforma::sensitivity::{
    self, SensitivityInput, SensitivityMetric, SweepAxis,
};

use crate::input;

/// Arguments for a full pro forma run
#[derive(Args)]
pub struct ComputeArgs {
    /// Path to JSON or YAML assumptions file (legacy documents are upgraded)
    #[arg(long)]
    pub input: Option<String>,

    /// Apply the scenario deltas stored in the assumptions
    #[arg(long)]
    pub scenario: bool,
}

/// Arguments for a base-vs-scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML assumptions file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the monthly cashflow schedule
#[derive(Args)]
pub struct MonthlyArgs {
    /// Path to JSON or YAML assumptions file
    #[arg(long)]
    pub input: Option<String>,

    /// Apply the scenario deltas stored in the assumptions
    #[arg(long)]
    pub scenario: bool,
}

/// Arguments for the revenue × hard-cost sensitivity grid
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON or YAML assumptions file
    #[arg(long)]
    pub input: Option<String>,

    /// Lowest revenue delta in percent
    #[arg(long, default_value = "-20", allow_hyphen_values = true)]
    pub rev_min: Decimal,

    /// Highest revenue delta in percent
    #[arg(long, default_value = "20", allow_hyphen_values = true)]
    pub rev_max: Decimal,

    /// Revenue delta step in percent
    #[arg(long, default_value = "5")]
    pub rev_step: Decimal,

    /// Lowest hard-cost delta in percent
    #[arg(long, default_value = "-20", allow_hyphen_values = true)]
    pub hard_min: Decimal,

    /// Highest hard-cost delta in percent
    #[arg(long, default_value = "20", allow_hyphen_values = true)]
    pub hard_max: Decimal,

    /// Hard-cost delta step in percent
    #[arg(long, default_value = "5")]
    pub hard_step: Decimal,

    /// Output metric read from each cell
    #[arg(long, value_enum, default_value = "profit")]
    pub metric: MetricArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    Profit,
    ReturnOnCost,
    NetRevenue,
    TotalProjectCost,
}

impl From<MetricArg> for SensitivityMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Profit => SensitivityMetric::Profit,
            MetricArg::ReturnOnCost => SensitivityMetric::ReturnOnCostPct,
            MetricArg::NetRevenue => SensitivityMetric::NetRevenue,
            MetricArg::TotalProjectCost => SensitivityMetric::TotalProjectCost,
        }
    }
}

fn read_assumptions(path: Option<&str>) -> Result<ProFormaAssumptions, Box<dyn std::error::Error>> {
    let doc = input::read_document(path, "pro forma assumptions")?;
    Ok(load_assumptions(doc)?)
}

pub fn run_compute(args: ComputeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = read_assumptions(args.input.as_deref())?;
    let result = run_pro_forma(&ProFormaInput {
        assumptions,
        apply_scenario: args.scenario,
    })?;
    info!(warnings = result.warnings.len(), "pro forma computed");
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = read_assumptions(args.input.as_deref())?;
    let result = run_scenario_comparison(&assumptions)?;
    Ok(serde_json::to_value(result)?)
}

/// The schedule on its own, so table and CSV output get one row per month.
pub fn run_monthly(args: MonthlyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = read_assumptions(args.input.as_deref())?;
    let result = run_pro_forma(&ProFormaInput {
        assumptions,
        apply_scenario: args.scenario,
    })?;
    Ok(json!({
        "result": serde_json::to_value(&result.result.monthly)?,
        "methodology": format!("{}: Monthly Schedule", result.methodology),
        "warnings": result.warnings,
        "metadata": serde_json::to_value(&result.metadata)?,
    }))
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = read_assumptions(args.input.as_deref())?;
    let input = SensitivityInput {
        assumptions,
        revenue_delta: SweepAxis {
            min: args.rev_min,
            max: args.rev_max,
            step: args.rev_step,
        },
        hard_cost_delta: SweepAxis {
            min: args.hard_min,
            max: args.hard_max,
            step: args.hard_step,
        },
        metric: args.metric.into(),
    };
    let result = sensitivity::run_sensitivity(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_defaults() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(json!({
        "assumptions": ProFormaAssumptions::default(),
        "scenario_ranges": ScenarioRanges::default(),
        "hard_cost_split": {
            "servicing": SERVICING_HARD_SHARE,
            "construction": CONSTRUCTION_HARD_SHARE,
        },
        "revenue_window_share": REVENUE_WINDOW_SHARE,
    }))
}
