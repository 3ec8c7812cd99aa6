use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::instrument;

use crate::aggregation::totals::{AggregationWindow, Aggregator};
use crate::risk::classifier::is_at_risk;
use crate::types::*;
use crate::FacilityAnalyticsResult;

/// Realised intensity of one facility with its type's reference overlaid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonIntensityRow {
    pub facility_id: FacilityId,
    pub name: String,
    pub energy_type: EnergyType,
    pub production_mwh: Mwh,
    pub carbon_tons: Tons,
    pub carbon_intensity: Decimal,
    /// Zero when the energy type has no reference
    pub reference_tons_per_mwh: Decimal,
    pub has_reference: bool,
    pub exceeds_reference: bool,
}

/// Carbon intensity for every facility with period data in any year,
/// ordered by name. Totals cover the window only, so a facility idle in the
/// window is listed at zero.
#[instrument(skip_all, fields(year = ?window.year))]
pub fn carbon_intensity_dataset(
    snapshot: &PortfolioSnapshot,
    window: AggregationWindow,
) -> FacilityAnalyticsResult<ComputationOutput<Vec<CarbonIntensityRow>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let totals = Aggregator::new(snapshot).by_facility(window);
    let reporting: BTreeSet<FacilityId> = snapshot
        .period_records
        .iter()
        .map(|r| r.facility_id)
        .filter(|id| window.facility_id.map_or(true, |w| w == *id))
        .collect();

    let mut rows: Vec<CarbonIntensityRow> = Vec::new();
    for facility in snapshot.facilities_by_name() {
        if !reporting.contains(&facility.id) {
            continue;
        }
        let t = totals.get(&facility.id).cloned().unwrap_or_default();
        let reference = snapshot.carbon_reference(facility.energy_type);
        if reference.is_none() {
            warnings.push(format!(
                "No carbon reference for energy type {}; '{}' shown without overlay",
                facility.energy_type, facility.name
            ));
        }
        let ci = t.carbon_intensity();
        rows.push(CarbonIntensityRow {
            facility_id: facility.id,
            name: facility.name.clone(),
            energy_type: facility.energy_type,
            production_mwh: t.production_mwh,
            carbon_tons: t.carbon_tons,
            carbon_intensity: ci,
            reference_tons_per_mwh: reference.unwrap_or(Decimal::ZERO),
            has_reference: reference.is_some(),
            exceeds_reference: t.has_production()
                && reference.is_some_and(|r| is_at_risk(ci, r)),
        });
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "carbon_tons / production_mwh per facility vs energy-type reference",
        &serde_json::json!({ "window": window }),
        warnings,
        elapsed,
        rows,
    ))
}
