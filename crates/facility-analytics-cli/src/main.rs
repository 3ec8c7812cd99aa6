mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::Level;

use commands::portfolio::{KpiArgs, TrendArgs};
use commands::risk::RiskSummaryArgs;
use commands::scenarios::{ScenarioArgs, ScenarioListArgs, ValidateScenarioArgs};
use commands::{Context, WindowArgs, YearArgs};

/// Power-plant portfolio performance reports
#[derive(Parser)]
#[command(
    name = "plantkpi",
    version,
    about = "Power-plant portfolio performance reports",
    long_about = "A CLI for facility performance analytics with decimal precision. \
                  Reads a portfolio snapshot (facilities, monthly production and \
                  emissions, prices, costs, references, scenarios) and produces KPI, \
                  risk, efficiency, chart and investment-scenario reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Portfolio snapshot file (JSON or YAML); read from stdin when omitted
    #[arg(long, env = "PLANTKPI_INPUT", global = true)]
    input: Option<String>,

    /// Analytics tunables file (JSON or YAML)
    #[arg(long, env = "PLANTKPI_CONFIG", global = true)]
    config: Option<String>,

    /// Log level written to stderr: error, warn, info, debug, trace
    #[arg(long, env = "PLANTKPI_LOG", default_value = "warn", global = true)]
    log_level: Level,
}

#[derive(Subcommand)]
enum Commands {
    /// Portfolio KPI bundle: production, revenue, cost, profit, margin, risky count
    Kpis(KpiArgs),
    /// Facilities whose carbon intensity exceeds their reference, worst first
    RiskyFacilities(WindowArgs),
    /// Realised vs reference carbon intensity for one energy type
    RiskSummary(RiskSummaryArgs),
    /// Twelve-month production trend
    Trend(TrendArgs),
    /// Per-facility capacity efficiency
    Efficiency(YearArgs),
    /// Per-facility revenue, cost and profit
    Financials(YearArgs),
    /// Per-facility carbon intensity with reference overlay
    Carbon(WindowArgs),
    /// Efficiency vs installed capacity bubble chart dataset
    Bubble(YearArgs),
    /// Efficiency vs profit-per-MWh performance matrix dataset
    Matrix(YearArgs),
    /// Project a facility's investment scenarios against its baseline
    Scenarios(ScenarioArgs),
    /// List a facility's scenarios by name
    ScenarioList(ScenarioListArgs),
    /// Check a scenario create / update / delete against the business rules
    ValidateScenario(ValidateScenarioArgs),
    /// Years with period data, most recent first
    Years,
    /// Registered facilities by name
    Facilities,
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

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli.command, cli.input.as_deref(), cli.config.as_deref());

    match result {
        Ok(Some(value)) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Ok(None) => process::exit(0),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(
    command: Commands,
    input_path: Option<&str>,
    config_path: Option<&str>,
) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    let load = || -> Result<Context, Box<dyn std::error::Error>> {
        Ok(Context {
            snapshot: input::load_snapshot(input_path)?,
            config: input::load_config(config_path)?,
        })
    };

    let value = match command {
        Commands::Kpis(args) => commands::portfolio::run_kpis(args, &load()?),
        Commands::RiskyFacilities(args) => commands::risk::run_risky_facilities(args, &load()?),
        Commands::RiskSummary(args) => commands::risk::run_risk_summary(args, &load()?),
        Commands::Trend(args) => commands::portfolio::run_trend(args, &load()?),
        Commands::Efficiency(args) => commands::portfolio::run_efficiency(args, &load()?),
        Commands::Financials(args) => commands::portfolio::run_financials(args, &load()?),
        Commands::Carbon(args) => commands::risk::run_carbon(args, &load()?),
        Commands::Bubble(args) => commands::charts::run_bubble(args, &load()?),
        Commands::Matrix(args) => commands::charts::run_matrix(args, &load()?),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args, &load()?),
        Commands::ScenarioList(args) => commands::scenarios::run_scenario_list(args, &load()?),
        Commands::ValidateScenario(args) => {
            commands::scenarios::run_validate_scenario(args, input_path)
        }
        Commands::Years => commands::portfolio::run_years(&load()?),
        Commands::Facilities => commands::portfolio::run_facilities(&load()?),
        Commands::Version => {
            println!("plantkpi {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
    }?;
    Ok(Some(value))
}
