//! Business rules for scenario create / update / delete.
//!
//! Storage is the caller's job; these functions only decide whether a
//! mutation is allowed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::FacilityAnalyticsError;
use crate::types::{FacilityId, PortfolioSnapshot, Scenario, ScenarioId};
use crate::FacilityAnalyticsResult;

/// Largest production uplift accepted when a scenario is created.
pub const MAX_PRODUCTION_UPLIFT_PCT: Decimal = dec!(100);

/// Check a scenario before it is created.
pub fn validate_new_scenario(scenario: &Scenario) -> FacilityAnalyticsResult<()> {
    if scenario.production_uplift_pct > MAX_PRODUCTION_UPLIFT_PCT {
        return Err(FacilityAnalyticsError::InvalidScenarioInput {
            field: "production_uplift_pct".into(),
            reason: format!(
                "Production uplift cannot exceed {MAX_PRODUCTION_UPLIFT_PCT}% (got {}%)",
                scenario.production_uplift_pct
            ),
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(FacilityAnalyticsError::InvalidScenarioInput {
            field: "name".into(),
            reason: "Scenario name is required".into(),
        });
    }
    Ok(())
}

/// Check an update. The uplift ceiling is a creation-time rule only, so an
/// edited scenario may exceed it and will still project.
pub fn validate_scenario_update(
    scenario_id: Option<ScenarioId>,
    update: &Scenario,
) -> FacilityAnalyticsResult<ScenarioId> {
    let id = scenario_id
        .ok_or_else(|| FacilityAnalyticsError::MissingSelection("scenario_id".into()))?;
    if update.name.trim().is_empty() {
        return Err(FacilityAnalyticsError::InvalidScenarioInput {
            field: "name".into(),
            reason: "Scenario name is required".into(),
        });
    }
    Ok(id)
}

/// Check a deletion and return the scenario that would be removed.
///
/// Scenarios carrying a negative extra cost are locked.
pub fn validate_scenario_deletion(
    scenarios: &[Scenario],
    scenario_id: Option<ScenarioId>,
) -> FacilityAnalyticsResult<&Scenario> {
    let id = scenario_id
        .ok_or_else(|| FacilityAnalyticsError::MissingSelection("scenario_id".into()))?;
    let scenario = scenarios
        .iter()
        .find(|s| s.id == Some(id))
        .ok_or(FacilityAnalyticsError::ScenarioNotFound(id))?;
    if scenario.extra_cost_million_tl < Decimal::ZERO {
        return Err(FacilityAnalyticsError::InvalidScenarioInput {
            field: "extra_cost_million_tl".into(),
            reason: "Scenarios with a negative extra cost cannot be deleted".into(),
        });
    }
    Ok(scenario)
}

/// A facility's scenarios ordered by name.
pub fn scenarios_for_facility(
    snapshot: &PortfolioSnapshot,
    facility_id: Option<FacilityId>,
) -> FacilityAnalyticsResult<Vec<&Scenario>> {
    let facility_id = facility_id
        .ok_or_else(|| FacilityAnalyticsError::MissingSelection("facility_id".into()))?;
    let mut scenarios: Vec<&Scenario> = snapshot
        .scenarios
        .iter()
        .filter(|s| s.facility_id == facility_id)
        .collect();
    scenarios.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(scenarios)
}
