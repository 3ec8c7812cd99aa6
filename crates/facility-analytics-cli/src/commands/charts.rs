use serde_json::Value;

use facility_analytics_core::visualization::{bubble, matrix};

use super::{resolve_year, Context, YearArgs};

pub fn run_bubble(args: YearArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let year = resolve_year(&ctx.snapshot, args.year);
    let result = bubble::efficiency_bubble(&ctx.snapshot, year, &ctx.config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_matrix(args: YearArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let year = resolve_year(&ctx.snapshot, args.year);
    let result = matrix::performance_matrix(&ctx.snapshot, year, &ctx.config)?;
    Ok(serde_json::to_value(result)?)
}
