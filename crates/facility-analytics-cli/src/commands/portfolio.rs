use clap::Args;
use serde_json::Value;

use facility_analytics_core::aggregation::years::available_years;
use facility_analytics_core::reports::{self, efficiency, financials, kpi};
use facility_analytics_core::trend::monthly;
use facility_analytics_core::{FacilityAnalyticsError, FacilityId};

use super::{resolve_window, resolve_year, Context, WindowArgs, YearArgs};

/// Arguments for the portfolio KPI bundle
#[derive(Args)]
pub struct KpiArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Fail instead of returning zero KPIs when nothing was produced
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the monthly production trend
#[derive(Args)]
pub struct TrendArgs {
    #[command(flatten)]
    pub year: YearArgs,

    /// Restrict the trend to one facility
    #[arg(long)]
    pub facility_id: Option<FacilityId>,
}

pub fn run_kpis(args: KpiArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let window = resolve_window(&ctx.snapshot, &args.window);
    let result = if args.strict {
        kpi::portfolio_kpis(&ctx.snapshot, window)?
    } else {
        kpi::kpis_or_default(&ctx.snapshot, window)?
    };
    Ok(serde_json::to_value(result)?)
}

pub fn run_trend(args: TrendArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let year = resolve_year(&ctx.snapshot, args.year.year);
    let result = monthly::monthly_production_trend(&ctx.snapshot, year, args.facility_id)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_efficiency(args: YearArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let year = resolve_year(&ctx.snapshot, args.year);
    let result = efficiency::facility_efficiency(&ctx.snapshot, year)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_financials(args: YearArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let year = resolve_year(&ctx.snapshot, args.year);
    let result = financials::facility_financials(&ctx.snapshot, year)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_years(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    match available_years(&ctx.snapshot) {
        Ok(years) => Ok(serde_json::json!({ "years": years })),
        Err(e @ FacilityAnalyticsError::NoReportableYears) => Ok(serde_json::json!({
            "years": [],
            "warnings": [e.to_string()],
        })),
        Err(e) => Err(e.into()),
    }
}

pub fn run_facilities(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let result = reports::facility_directory(&ctx.snapshot)?;
    Ok(serde_json::to_value(result)?)
}
