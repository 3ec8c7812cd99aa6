pub mod aggregation;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "visualization")]
pub mod visualization;

#[cfg(feature = "trend")]
pub mod trend;

#[cfg(feature = "reports")]
pub mod reports;

pub use error::FacilityAnalyticsError;
pub use types::*;

/// Standard result type for all facility analytics operations
pub type FacilityAnalyticsResult<T> = Result<T, FacilityAnalyticsError>;
