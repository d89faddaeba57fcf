mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::fees::FeesArgs;
use commands::profile::{MigrateArgs, SeedArgs};
use commands::proforma::{CompareArgs, ComputeArgs, MonthlyArgs, SensitivityArgs};

/// Residential development pro forma calculations
#[derive(Parser)]
#[command(
    name = "proforma",
    version,
    about = "Residential development pro forma calculations",
    long_about = "A CLI for underwriting townhome and multifamily development projects \
                  with decimal precision. Computes program metrics, cost stacks, \
                  profitability, monthly cashflow schedules, scenario stress tests, \
                  sensitivity grids and municipal development charges."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full pro forma for a set of assumptions
    Compute(ComputeArgs),
    /// Compare the base case against the scenario overlay
    Compare(CompareArgs),
    /// Print the month-by-month cashflow schedule
    Monthly(MonthlyArgs),
    /// Sweep revenue and hard-cost deltas into a sensitivity grid
    Sensitivity(SensitivityArgs),
    /// Upgrade a legacy single-phase assumptions document
    Migrate(MigrateArgs),
    /// Seed assumptions from a development profile
    Seed(SeedArgs),
    /// Estimate development cost charges and amenity cost charges
    Fees(FeesArgs),
    /// Print default assumptions and scenario slider ranges
    Defaults,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compute(args) => commands::proforma::run_compute(args),
        Commands::Compare(args) => commands::proforma::run_compare(args),
        Commands::Monthly(args) => commands::proforma::run_monthly(args),
        Commands::Sensitivity(args) => commands::proforma::run_sensitivity(args),
        Commands::Migrate(args) => commands::profile::run_migrate(args),
        Commands::Seed(args) => commands::profile::run_seed(args),
        Commands::Fees(args) => commands::fees::run_fees(args),
        Commands::Defaults => commands::proforma::run_defaults(),
        Commands::Version => {
            println!("proforma {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
