use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{instrument, warn};

use crate::aggregation::totals::AggregationWindow;
use crate::types::*;
use crate::FacilityAnalyticsResult;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// 1-12
    pub month: u32,
    pub label: String,
    pub value: Decimal,
}

/// Exactly twelve points, January first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub year: i32,
    pub points: Vec<MonthlyPoint>,
}

impl MonthlySeries {
    pub fn total(&self) -> Decimal {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn value_for(&self, month: u32) -> Option<Decimal> {
        self.points.iter().find(|p| p.month == month).map(|p| p.value)
    }
}

/// Fill a Jan-Dec calendar from `(month, value)` pairs in any order.
///
/// Months without a value are zero; repeated months are summed. Pairs whose
/// month falls outside 1-12 are dropped and counted in the second element.
pub fn build_monthly_series<I>(year: i32, values: I) -> (MonthlySeries, usize)
where
    I: IntoIterator<Item = (u32, Decimal)>,
{
    let mut buckets = [Decimal::ZERO; 12];
    let mut rejected = 0usize;
    for (month, value) in values {
        match month.checked_sub(1).and_then(|i| buckets.get_mut(i as usize)) {
            Some(slot) => *slot += value,
            None => rejected += 1,
        }
    }

    let points = buckets
        .iter()
        .zip(MONTH_LABELS)
        .enumerate()
        .map(|(i, (value, label))| MonthlyPoint {
            month: i as u32 + 1,
            label: label.to_string(),
            value: *value,
        })
        .collect();

    (MonthlySeries { year, points }, rejected)
}

/// Monthly production for a year, optionally narrowed to one facility.
#[instrument(skip_all, fields(year, facility_id = ?facility_id))]
pub fn monthly_production_trend(
    snapshot: &PortfolioSnapshot,
    year: i32,
    facility_id: Option<FacilityId>,
) -> FacilityAnalyticsResult<ComputationOutput<MonthlySeries>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let window = AggregationWindow { year: Some(year), facility_id };
    let (series, rejected) = build_monthly_series(
        year,
        snapshot
            .period_records
            .iter()
            .filter(|r| window.contains(r))
            .map(|r| (r.period.month, r.production_mwh)),
    );

    if rejected > 0 {
        warn!(rejected, "period records with an invalid month were ignored");
        warnings.push(format!(
            "{rejected} period record(s) have a month outside 1-12 and were ignored"
        ));
    }
    if series.total().is_zero() {
        warnings.push(format!("No production recorded in {year}"));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Σ production_mwh per calendar month, zero-filled Jan-Dec",
        &serde_json::json!({
            "year": year,
            "facility_id": facility_id,
        }),
        warnings,
        elapsed,
        series,
    ))
}
