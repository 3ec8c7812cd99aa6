use thiserror::Error;

#[derive(Debug, Error)]
pub enum FacilityAnalyticsError {
    #[error("No reportable years: no period data exists")]
    NoReportableYears,

    #[error("No production data: portfolio production is zero, KPIs cannot be computed")]
    NoProductionData,

    #[error("Invalid scenario input: {field} — {reason}")]
    InvalidScenarioInput { field: String, reason: String },

    #[error("Facility not found: {0}")]
    FacilityNotFound(u32),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(u32),

    #[error("Missing selection: {0} must be supplied")]
    MissingSelection(String),

    #[error("No facilities registered")]
    NoFacilities,

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FacilityAnalyticsError {
    fn from(e: serde_json::Error) -> Self {
        FacilityAnalyticsError::SerializationError(e.to_string())
    }
}
