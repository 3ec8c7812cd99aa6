use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::aggregation::totals::{AggregationWindow, Aggregator, Totals};
use crate::config::AnalyticsConfig;
use crate::metrics;
use crate::risk::classifier::is_at_risk;
use crate::types::*;
use crate::FacilityAnalyticsResult;

/// Realised vs acceptable carbon intensity for one energy type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub energy_type: EnergyType,
    pub production_mwh: Mwh,
    pub carbon_tons: Tons,
    pub realized_tons_per_mwh: Decimal,
    pub reference_tons_per_mwh: Decimal,
    /// realized - reference; negative means headroom
    pub difference_tons_per_mwh: Decimal,
    pub at_risk: bool,
}

impl RiskSummary {
    fn empty(energy_type: EnergyType) -> Self {
        Self {
            energy_type,
            production_mwh: Decimal::ZERO,
            carbon_tons: Decimal::ZERO,
            realized_tons_per_mwh: Decimal::ZERO,
            reference_tons_per_mwh: Decimal::ZERO,
            difference_tons_per_mwh: Decimal::ZERO,
            at_risk: false,
        }
    }
}

/// Summarise carbon performance across every facility of an energy type.
///
/// With no energy type the configured default is used. A type with no
/// records in the window, or no carbon reference, yields an all-zero summary.
#[instrument(skip_all, fields(energy_type = ?energy_type))]
pub fn risk_summary(
    snapshot: &PortfolioSnapshot,
    energy_type: Option<EnergyType>,
    window: AggregationWindow,
    config: &AnalyticsConfig,
) -> FacilityAnalyticsResult<ComputationOutput<RiskSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let energy_type = energy_type.unwrap_or(config.default_risk_energy_type);

    let aggregator = Aggregator::new(snapshot);
    let mut combined = Totals::default();
    let mut matched = 0usize;
    for (facility_id, totals) in aggregator.by_facility(window) {
        if snapshot
            .facility(facility_id)
            .is_some_and(|f| f.energy_type == energy_type)
        {
            combined.production_mwh += totals.production_mwh;
            combined.carbon_tons += totals.carbon_tons;
            matched += 1;
        }
    }

    let summary = match snapshot.carbon_reference(energy_type) {
        Some(reference) if matched > 0 => {
            let realized = metrics::carbon_intensity(combined.carbon_tons, combined.production_mwh);
            RiskSummary {
                energy_type,
                production_mwh: combined.production_mwh,
                carbon_tons: combined.carbon_tons,
                realized_tons_per_mwh: realized,
                reference_tons_per_mwh: reference,
                difference_tons_per_mwh: realized - reference,
                at_risk: combined.has_production() && is_at_risk(realized, reference),
            }
        }
        Some(_) => {
            warnings.push(format!("No period records for energy type {energy_type}"));
            RiskSummary::empty(energy_type)
        }
        None => {
            warnings.push(format!("No carbon reference for energy type {energy_type}"));
            RiskSummary::empty(energy_type)
        }
    };
    debug!(facilities = matched, at_risk = summary.at_risk, "risk summary");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Energy-type carbon intensity vs reference",
        &serde_json::json!({
            "energy_type": energy_type,
            "window": window,
        }),
        warnings,
        elapsed,
        summary,
    ))
}
