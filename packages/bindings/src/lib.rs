use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use facility_analytics_core::aggregation::totals::AggregationWindow;
use facility_analytics_core::aggregation::years::{available_years, reporting_year};
use facility_analytics_core::config::AnalyticsConfig;
use facility_analytics_core::{
    EnergyType, FacilityAnalyticsError, FacilityId, PortfolioSnapshot, Scenario, ScenarioId,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Common request shape: the snapshot plus optional selectors.
#[derive(Deserialize)]
struct ReportRequest {
    snapshot: PortfolioSnapshot,
    #[serde(default)]
    year: Option<i32>,
    /// Aggregate every year instead of one
    #[serde(default)]
    all_years: bool,
    #[serde(default)]
    facility_id: Option<FacilityId>,
    #[serde(default)]
    energy_type: Option<EnergyType>,
    #[serde(default)]
    config: Option<AnalyticsConfig>,
    /// Surface NoProductionData instead of zero KPIs
    #[serde(default)]
    strict: bool,
}

impl ReportRequest {
    fn parse(input_json: &str) -> NapiResult<Self> {
        let request: Self = serde_json::from_str(input_json).map_err(to_napi_error)?;
        if let Some(config) = &request.config {
            config.validate().map_err(to_napi_error)?;
        }
        Ok(request)
    }

    /// Requested year, or the latest year with data (the current calendar
    /// year when the snapshot has none).
    fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| reporting_year(&self.snapshot))
    }

    /// A snapshot without period data spans every year so reports degrade
    /// to zeros.
    fn window(&self) -> AggregationWindow {
        if self.all_years || (self.year.is_none() && self.snapshot.period_records.is_empty()) {
            AggregationWindow::all()
        } else {
            AggregationWindow::year(self.year())
        }
    }

    fn config(&self) -> AnalyticsConfig {
        self.config.clone().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn portfolio_kpis(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let window = request.window();
    let output = if request.strict {
        facility_analytics_core::reports::kpi::portfolio_kpis(&request.snapshot, window)
    } else {
        facility_analytics_core::reports::kpi::kpis_or_default(&request.snapshot, window)
    }
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn monthly_trend(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let output = facility_analytics_core::trend::monthly::monthly_production_trend(
        &request.snapshot,
        request.year(),
        request.facility_id,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn reportable_years(input_json: String) -> NapiResult<String> {
    let snapshot: PortfolioSnapshot = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let years = match available_years(&snapshot) {
        Ok(years) => years,
        Err(FacilityAnalyticsError::NoReportableYears) => Vec::new(),
        Err(e) => return Err(to_napi_error(e)),
    };
    serde_json::to_string(&years).map_err(to_napi_error)
}

#[napi]
pub fn facility_directory(input_json: String) -> NapiResult<String> {
    let snapshot: PortfolioSnapshot = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        facility_analytics_core::reports::facility_directory(&snapshot).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Per-facility datasets
// ---------------------------------------------------------------------------

#[napi]
pub fn facility_efficiency(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let output = facility_analytics_core::reports::efficiency::facility_efficiency(
        &request.snapshot,
        request.year(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn facility_financials(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let output = facility_analytics_core::reports::financials::facility_financials(
        &request.snapshot,
        request.year(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn carbon_intensity(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let output = facility_analytics_core::reports::carbon::carbon_intensity_dataset(
        &request.snapshot,
        request.window(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[napi]
pub fn risky_facilities(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let output = facility_analytics_core::risk::classifier::risky_facilities(
        &request.snapshot,
        request.window(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn risk_summary(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let output = facility_analytics_core::risk::summary::risk_summary(
        &request.snapshot,
        request.energy_type,
        request.window(),
        &request.config(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

#[napi]
pub fn efficiency_bubble(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let output = facility_analytics_core::visualization::bubble::efficiency_bubble(
        &request.snapshot,
        request.year(),
        &request.config(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn performance_matrix(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let output = facility_analytics_core::visualization::matrix::performance_matrix(
        &request.snapshot,
        request.year(),
        &request.config(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn scenario_analysis(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let analysis_request = facility_analytics_core::scenarios::projector::ScenarioAnalysisRequest {
        facility_id: request.facility_id,
        fallback_year: request.year(),
    };
    let output = facility_analytics_core::scenarios::projector::analyze_scenarios(
        &request.snapshot,
        &analysis_request,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn list_scenarios(input_json: String) -> NapiResult<String> {
    let request = ReportRequest::parse(&input_json)?;
    let scenarios = facility_analytics_core::scenarios::lifecycle::scenarios_for_facility(
        &request.snapshot,
        request.facility_id,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&scenarios).map_err(to_napi_error)
}

#[napi]
pub fn validate_new_scenario(scenario_json: String) -> NapiResult<String> {
    let scenario: Scenario = serde_json::from_str(&scenario_json).map_err(to_napi_error)?;
    facility_analytics_core::scenarios::lifecycle::validate_new_scenario(&scenario)
        .map_err(to_napi_error)?;
    serde_json::to_string(&scenario).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ScenarioUpdateRequest {
    #[serde(default)]
    scenario_id: Option<ScenarioId>,
    scenario: Scenario,
}

#[napi]
pub fn validate_scenario_update(input_json: String) -> NapiResult<String> {
    let request: ScenarioUpdateRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let id = facility_analytics_core::scenarios::lifecycle::validate_scenario_update(
        request.scenario_id.or(request.scenario.id),
        &request.scenario,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({ "scenario_id": id })).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ScenarioDeletionRequest {
    scenarios: Vec<Scenario>,
    #[serde(default)]
    scenario_id: Option<ScenarioId>,
}

#[napi]
pub fn validate_scenario_deletion(input_json: String) -> NapiResult<String> {
    let request: ScenarioDeletionRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let scenario = facility_analytics_core::scenarios::lifecycle::validate_scenario_deletion(
        &request.scenarios,
        request.scenario_id,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(scenario).map_err(to_napi_error)
}
