use clap::{Args, ValueEnum};
use serde_json::Value;

use facility_analytics_core::scenarios::lifecycle;
use facility_analytics_core::scenarios::projector::{self, ScenarioAnalysisRequest};
use facility_analytics_core::{FacilityId, Scenario, ScenarioId};

use super::{resolve_year, Context};
use crate::input;

/// Arguments for scenario projection
#[derive(Args)]
pub struct ScenarioArgs {
    /// Facility whose scenarios are projected
    #[arg(long)]
    pub facility_id: Option<FacilityId>,

    /// Baseline year when the facility has no period data
    /// (defaults to the latest year in the snapshot)
    #[arg(long)]
    pub fallback_year: Option<i32>,
}

/// Arguments for listing a facility's scenarios
#[derive(Args)]
pub struct ScenarioListArgs {
    #[arg(long)]
    pub facility_id: Option<FacilityId>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ScenarioAction {
    Create,
    Update,
    Delete,
}

/// Arguments for checking a scenario mutation before it is stored
#[derive(Args)]
pub struct ValidateScenarioArgs {
    #[arg(long, value_enum)]
    pub action: ScenarioAction,

    /// Scenario id (update and delete)
    #[arg(long)]
    pub scenario_id: Option<ScenarioId>,

    /// Path to a JSON or YAML scenario (create and update)
    #[arg(long)]
    pub scenario: Option<String>,
}

pub fn run_scenarios(args: ScenarioArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let fallback_year = resolve_year(&ctx.snapshot, args.fallback_year);
    let request = ScenarioAnalysisRequest {
        facility_id: args.facility_id,
        fallback_year,
    };
    let result = projector::analyze_scenarios(&ctx.snapshot, &request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_scenario_list(
    args: ScenarioListArgs,
    ctx: &Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios = lifecycle::scenarios_for_facility(&ctx.snapshot, args.facility_id)?;
    Ok(serde_json::json!({ "scenarios": scenarios }))
}

/// Create and update checks need only the scenario file; the snapshot is
/// loaded for deletions.
pub fn run_validate_scenario(
    args: ValidateScenarioArgs,
    snapshot_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    match args.action {
        ScenarioAction::Create => {
            let scenario = read_scenario(args.scenario.as_deref())?;
            lifecycle::validate_new_scenario(&scenario)?;
            Ok(serde_json::json!({ "valid": true, "action": "create", "scenario": scenario }))
        }
        ScenarioAction::Update => {
            let scenario = read_scenario(args.scenario.as_deref())?;
            let id = lifecycle::validate_scenario_update(
                args.scenario_id.or(scenario.id),
                &scenario,
            )?;
            Ok(serde_json::json!({ "valid": true, "action": "update", "scenario_id": id }))
        }
        ScenarioAction::Delete => {
            let snapshot = input::load_snapshot(snapshot_path)?;
            let scenario =
                lifecycle::validate_scenario_deletion(&snapshot.scenarios, args.scenario_id)?;
            Ok(serde_json::json!({ "valid": true, "action": "delete", "scenario": scenario }))
        }
    }
}

fn read_scenario(path: Option<&str>) -> Result<Scenario, Box<dyn std::error::Error>> {
    let path = path.ok_or("--scenario <file> is required for create and update")?;
    input::file::read_structured(path)
}
