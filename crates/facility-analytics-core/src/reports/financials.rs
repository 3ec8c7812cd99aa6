use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;

use crate::aggregation::totals::{AggregationWindow, Aggregator};
use crate::types::*;
use crate::FacilityAnalyticsResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityFinancials {
    pub facility_id: FacilityId,
    pub name: String,
    pub energy_type: EnergyType,
    pub production_mwh: Mwh,
    pub revenue_tl: Money,
    pub cost_tl: Money,
    pub profit_tl: Money,
    pub margin_pct: Percent,
    /// Realised revenue per MWh
    pub unit_price: Money,
}

/// Revenue, cost and profit per registered facility for a year, by name.
#[instrument(skip_all, fields(year))]
pub fn facility_financials(
    snapshot: &PortfolioSnapshot,
    year: i32,
) -> FacilityAnalyticsResult<ComputationOutput<Vec<FacilityFinancials>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let aggregator = Aggregator::new(snapshot);

    if aggregator.prices().price_for(year).is_none() {
        warnings.push(format!("No market price recorded for {year}; revenue is zero"));
    }

    let rows: Vec<FacilityFinancials> = snapshot
        .facilities_by_name()
        .into_iter()
        .map(|f| {
            let t = aggregator.facility(f.id, Some(year));
            if t.uncosted_records > 0 {
                warnings.push(format!(
                    "{}: {} period record(s) have no cost row; cost counted as zero",
                    f.name, t.uncosted_records
                ));
            }
            FacilityFinancials {
                facility_id: f.id,
                name: f.name.clone(),
                energy_type: f.energy_type,
                production_mwh: t.production_mwh,
                revenue_tl: t.revenue_tl,
                cost_tl: t.cost_tl,
                profit_tl: t.profit_tl(),
                margin_pct: t.margin_pct(),
                unit_price: t.unit_price(),
            }
        })
        .collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "revenue = Σ production × yearly avg price; cost = Σ production × per-MWh cost rates",
        &serde_json::json!({ "window": AggregationWindow::year(year) }),
        warnings,
        elapsed,
        rows,
    ))
}
