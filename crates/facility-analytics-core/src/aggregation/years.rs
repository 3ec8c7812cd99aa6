use chrono::{Datelike, Utc};
use std::collections::BTreeSet;

use crate::error::FacilityAnalyticsError;
use crate::types::{FacilityId, PortfolioSnapshot};
use crate::FacilityAnalyticsResult;

/// Distinct years with period data, most recent first.
pub fn available_years(snapshot: &PortfolioSnapshot) -> FacilityAnalyticsResult<Vec<i32>> {
    let years: BTreeSet<i32> = snapshot
        .period_records
        .iter()
        .map(|r| r.period.year)
        .collect();
    if years.is_empty() {
        return Err(FacilityAnalyticsError::NoReportableYears);
    }
    Ok(years.into_iter().rev().collect())
}

/// Default year for year-scoped reports: the most recent year with period
/// data, or the current calendar year for a snapshot with none, so those
/// reports degrade to zeros instead of failing.
pub fn reporting_year(snapshot: &PortfolioSnapshot) -> i32 {
    snapshot
        .period_records
        .iter()
        .map(|r| r.period.year)
        .max()
        .unwrap_or_else(|| Utc::now().year())
}

/// Most recent year with period data for one facility.
pub fn latest_year_for(snapshot: &PortfolioSnapshot, facility_id: FacilityId) -> Option<i32> {
    snapshot
        .period_records
        .iter()
        .filter(|r| r.facility_id == facility_id)
        .map(|r| r.period.year)
        .max()
}
