use clap::Args;
use serde_json::Value;

use facility_analytics_core::reports::carbon;
use facility_analytics_core::risk::{classifier, summary};
use facility_analytics_core::EnergyType;

use super::{resolve_window, Context, WindowArgs};

/// Arguments for the energy-type risk summary
#[derive(Args)]
pub struct RiskSummaryArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Energy type to summarise (solar, wind, naturalgas, geothermal, other).
    /// Defaults to the configured type.
    #[arg(long)]
    pub energy_type: Option<EnergyType>,
}

pub fn run_risky_facilities(
    args: WindowArgs,
    ctx: &Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let window = resolve_window(&ctx.snapshot, &args);
    let result = classifier::risky_facilities(&ctx.snapshot, window)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_risk_summary(
    args: RiskSummaryArgs,
    ctx: &Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let window = resolve_window(&ctx.snapshot, &args.window);
    let result = summary::risk_summary(&ctx.snapshot, args.energy_type, window, &ctx.config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_carbon(args: WindowArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let window = resolve_window(&ctx.snapshot, &args);
    let result = carbon::carbon_intensity_dataset(&ctx.snapshot, window)?;
    Ok(serde_json::to_value(result)?)
}
