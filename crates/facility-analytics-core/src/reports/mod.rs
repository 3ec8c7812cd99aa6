//! Report datasets consumed by the presentation layer.
//!
//! Each entry point takes the snapshot plus a small selector and returns a
//! [`ComputationOutput`](crate::types::ComputationOutput). No report performs
//! I/O.

pub mod carbon;
pub mod efficiency;
pub mod financials;
pub mod kpi;

use std::time::Instant;
use tracing::instrument;

use crate::error::FacilityAnalyticsError;
use crate::types::*;
use crate::FacilityAnalyticsResult;

/// Registered facilities sorted by name.
#[instrument(skip_all)]
pub fn facility_directory(
    snapshot: &PortfolioSnapshot,
) -> FacilityAnalyticsResult<ComputationOutput<Vec<Facility>>> {
    let start = Instant::now();
    if snapshot.facilities.is_empty() {
        return Err(FacilityAnalyticsError::NoFacilities);
    }
    let facilities: Vec<Facility> = snapshot.facilities_by_name().into_iter().cloned().collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Facility register ordered by name",
        &serde_json::json!({ "count": facilities.len() }),
        Vec::new(),
        elapsed,
        facilities,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_directory_sorted_by_name() {
        let facility = |id: FacilityId, name: &str| Facility {
            id,
            name: name.into(),
            energy_type: EnergyType::Solar,
            installed_capacity_mw: dec!(5),
        };
        let snapshot = PortfolioSnapshot {
            facilities: vec![facility(1, "Zeta"), facility(2, "Alpha"), facility(3, "Mu")],
            ..Default::default()
        };
        let out = facility_directory(&snapshot).unwrap();
        let names: Vec<&str> = out.result.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mu", "Zeta"]);
    }

    #[test]
    fn test_empty_register_is_error() {
        assert!(matches!(
            facility_directory(&PortfolioSnapshot::default()),
            Err(FacilityAnalyticsError::NoFacilities)
        ));
    }
}
