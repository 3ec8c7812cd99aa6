use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::aggregation::totals::Aggregator;
use crate::aggregation::years::latest_year_for;
use crate::error::FacilityAnalyticsError;
use crate::metrics;
use crate::types::*;
use crate::FacilityAnalyticsResult;

const TL_PER_MILLION: Decimal = dec!(1_000_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A facility's realised figures for one year, computed once and shared by
/// every scenario evaluated against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub facility_id: FacilityId,
    pub year: i32,
    pub production_mwh: Mwh,
    pub carbon_tons: Tons,
    pub revenue_tl: Money,
    pub cost_tl: Money,
    pub profit_tl: Money,
    /// revenue / production, 0 when nothing was produced
    pub unit_price: Money,
    /// installed capacity × 8760 × expected capacity ratio
    pub efficiency_denominator: Mwh,
    pub efficiency: Rate,
}

impl Baseline {
    pub fn new(
        facility_id: FacilityId,
        year: i32,
        production_mwh: Mwh,
        carbon_tons: Tons,
        revenue_tl: Money,
        cost_tl: Money,
        efficiency_denominator: Mwh,
    ) -> Self {
        Self {
            facility_id,
            year,
            production_mwh,
            carbon_tons,
            revenue_tl,
            cost_tl,
            profit_tl: metrics::net_profit(revenue_tl, cost_tl),
            unit_price: metrics::unit_price(revenue_tl, production_mwh),
            efficiency_denominator,
            efficiency: metrics::safe_div(production_mwh, efficiency_denominator),
        }
    }
}

/// Outcome of one scenario against a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<ScenarioId>,
    pub scenario_name: String,
    pub investment_type: String,
    pub baseline_production_mwh: Mwh,
    pub projected_production_mwh: Mwh,
    pub baseline_efficiency: Rate,
    pub projected_efficiency: Rate,
    pub baseline_carbon_tons: Tons,
    pub projected_carbon_tons: Tons,
    pub extra_cost_tl: Money,
    pub projected_revenue_tl: Money,
    pub projected_cost_tl: Money,
    pub baseline_profit_tl: Money,
    pub projected_profit_tl: Money,
    pub profit_delta_tl: Money,
    /// profit_delta / extra_cost × 100; 0 when there is no extra cost.
    /// Not clamped: a tiny extra cost can produce a very large magnitude.
    pub roi_pct: Percent,
}

/// Scenario analysis for one facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub facility_id: FacilityId,
    pub year: i32,
    pub base_net_profit_tl: Money,
    pub baseline: Baseline,
    pub scenarios: Vec<ScenarioProjection>,
}

/// Which facility to analyse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioAnalysisRequest {
    pub facility_id: Option<FacilityId>,
    /// Baseline year used when the facility has no period data at all
    pub fallback_year: i32,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Apply a scenario's deltas to a baseline. Pure and total: percentages
/// are not range-checked here, only at scenario creation.
pub fn project_scenario(baseline: &Baseline, scenario: &Scenario) -> ScenarioProjection {
    let uplift = Decimal::ONE + scenario.production_uplift_pct / dec!(100);
    let reduction = Decimal::ONE - scenario.carbon_reduction_pct / dec!(100);

    let projected_production = baseline.production_mwh * uplift;
    let projected_efficiency =
        metrics::safe_div(projected_production, baseline.efficiency_denominator);
    let projected_carbon = baseline.carbon_tons * reduction;

    let extra_cost_tl = scenario.extra_cost_million_tl * TL_PER_MILLION;
    let projected_revenue = projected_production * baseline.unit_price;
    let projected_cost = baseline.cost_tl + extra_cost_tl;
    let projected_profit = metrics::net_profit(projected_revenue, projected_cost);
    let profit_delta = projected_profit - baseline.profit_tl;
    let roi_pct = metrics::safe_div(profit_delta, extra_cost_tl) * dec!(100);

    ScenarioProjection {
        scenario_id: scenario.id,
        scenario_name: scenario.name.clone(),
        investment_type: scenario.investment_type.clone(),
        baseline_production_mwh: baseline.production_mwh,
        projected_production_mwh: projected_production,
        baseline_efficiency: baseline.efficiency,
        projected_efficiency,
        baseline_carbon_tons: baseline.carbon_tons,
        projected_carbon_tons: projected_carbon,
        extra_cost_tl,
        projected_revenue_tl: projected_revenue,
        projected_cost_tl: projected_cost,
        baseline_profit_tl: baseline.profit_tl,
        projected_profit_tl: projected_profit,
        profit_delta_tl: profit_delta,
        roi_pct,
    }
}

/// Compute a facility's baseline for its most recent reporting year.
pub fn build_baseline(
    snapshot: &PortfolioSnapshot,
    aggregator: &Aggregator<'_>,
    facility_id: FacilityId,
    fallback_year: i32,
) -> FacilityAnalyticsResult<Baseline> {
    let facility = snapshot
        .facility(facility_id)
        .ok_or(FacilityAnalyticsError::FacilityNotFound(facility_id))?;
    let year = latest_year_for(snapshot, facility_id).unwrap_or(fallback_year);
    let totals = aggregator.facility(facility_id, Some(year));
    let denominator = metrics::efficiency_denominator(
        facility.installed_capacity_mw,
        snapshot.capacity_ratio(facility.energy_type),
    );
    Ok(Baseline::new(
        facility_id,
        year,
        totals.production_mwh,
        totals.carbon_tons,
        totals.revenue_tl,
        totals.cost_tl,
        denominator,
    ))
}

/// Evaluate every scenario registered for a facility against one shared
/// baseline.
#[instrument(skip_all, fields(facility_id = ?request.facility_id))]
pub fn analyze_scenarios(
    snapshot: &PortfolioSnapshot,
    request: &ScenarioAnalysisRequest,
) -> FacilityAnalyticsResult<ComputationOutput<ScenarioAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let facility_id = request
        .facility_id
        .ok_or_else(|| FacilityAnalyticsError::MissingSelection("facility_id".into()))?;

    let aggregator = Aggregator::new(snapshot);
    let baseline = build_baseline(snapshot, &aggregator, facility_id, request.fallback_year)?;
    if baseline.production_mwh <= Decimal::ZERO {
        warnings.push(format!(
            "Facility {facility_id} has no production in {}; projections scale a zero baseline",
            baseline.year
        ));
    }
    warnings.extend(
        aggregator
            .facility(facility_id, Some(baseline.year))
            .degradation_warnings(&format!("Facility {facility_id}")),
    );

    let scenarios: Vec<ScenarioProjection> = snapshot
        .scenarios
        .iter()
        .filter(|s| s.facility_id == facility_id)
        .map(|s| project_scenario(&baseline, s))
        .collect();
    if scenarios.is_empty() {
        warnings.push(format!("No scenarios registered for facility {facility_id}"));
    }
    debug!(count = scenarios.len(), year = baseline.year, "projected scenarios");

    let analysis = ScenarioAnalysis {
        facility_id,
        year: baseline.year,
        base_net_profit_tl: baseline.profit_tl,
        baseline,
        scenarios,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Investment scenario projection (linear uplift, fixed extra cost, ROI on profit delta)",
        &serde_json::json!({
            "facility_id": facility_id,
            "fallback_year": request.fallback_year,
            "extra_cost_unit": "million TL",
        }),
        warnings,
        elapsed,
        analysis,
    ))
}
