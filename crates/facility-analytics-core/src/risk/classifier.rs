use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{instrument, warn};

use crate::aggregation::totals::{AggregationWindow, Aggregator, Totals};
use crate::types::*;
use crate::FacilityAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A facility whose realised carbon intensity exceeds its reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub energy_type: EnergyType,
    pub production_mwh: Mwh,
    pub carbon_tons: Tons,
    /// Realised tons CO2 per MWh
    pub carbon_intensity: Decimal,
    /// Acceptable tons CO2 per MWh for the energy type
    pub reference_tons_per_mwh: Decimal,
    /// carbon_intensity - reference (always positive for members)
    pub excess_tons_per_mwh: Decimal,
}

/// Risk set plus bookkeeping about who was left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    /// Sorted by excess, largest offender first
    pub facilities: Vec<RiskAssessment>,
    pub risky_facility_count: usize,
    /// Facilities with production and a carbon reference
    pub evaluated_facilities: usize,
    /// Facilities with records but zero production; never classified
    pub excluded_zero_production: usize,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

pub fn is_at_risk(carbon_intensity: Decimal, acceptable_tons_per_mwh: Decimal) -> bool {
    carbon_intensity > acceptable_tons_per_mwh
}

/// Evaluate one facility's aggregate against a reference threshold.
///
/// Returns `None` when the facility has no production (intensity is
/// undefined, so it is absent from the risk set rather than "safe") or when
/// it does not exceed the threshold.
pub fn assess(facility: &Facility, totals: &Totals, reference: Decimal) -> Option<RiskAssessment> {
    if !totals.has_production() {
        return None;
    }
    let ci = totals.carbon_intensity();
    if !is_at_risk(ci, reference) {
        return None;
    }
    Some(RiskAssessment {
        facility_id: facility.id,
        facility_name: facility.name.clone(),
        energy_type: facility.energy_type,
        production_mwh: totals.production_mwh,
        carbon_tons: totals.carbon_tons,
        carbon_intensity: ci,
        reference_tons_per_mwh: reference,
        excess_tons_per_mwh: ci - reference,
    })
}

/// Build the ordered risk set for a window.
///
/// Facilities with records but missing from the register, or whose energy
/// type has no carbon reference, cannot be classified and are reported in
/// `warnings`.
pub fn classify(
    snapshot: &PortfolioSnapshot,
    aggregator: &Aggregator<'_>,
    window: AggregationWindow,
    warnings: &mut Vec<String>,
) -> RiskReport {
    let mut facilities = Vec::new();
    let mut evaluated = 0usize;
    let mut excluded_zero_production = 0usize;

    for (facility_id, totals) in aggregator.by_facility(window) {
        let Some(facility) = snapshot.facility(facility_id) else {
            warn!(facility_id, "period records reference an unregistered facility");
            warnings.push(format!(
                "Facility {facility_id} has period records but is not registered; skipped"
            ));
            continue;
        };
        let Some(reference) = snapshot.carbon_reference(facility.energy_type) else {
            warnings.push(format!(
                "No carbon reference for energy type {}; facility '{}' not classified",
                facility.energy_type, facility.name
            ));
            continue;
        };
        if !totals.has_production() {
            excluded_zero_production += 1;
            continue;
        }
        evaluated += 1;
        if let Some(assessment) = assess(facility, &totals, reference) {
            facilities.push(assessment);
        }
    }

    facilities.sort_by(|a, b| {
        b.excess_tons_per_mwh
            .cmp(&a.excess_tons_per_mwh)
            .then(a.facility_id.cmp(&b.facility_id))
    });

    RiskReport {
        risky_facility_count: facilities.len(),
        facilities,
        evaluated_facilities: evaluated,
        excluded_zero_production,
    }
}

/// Risky-facility detail list, largest excess first.
#[instrument(skip_all, fields(year = ?window.year))]
pub fn risky_facilities(
    snapshot: &PortfolioSnapshot,
    window: AggregationWindow,
) -> FacilityAnalyticsResult<ComputationOutput<RiskReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let aggregator = Aggregator::new(snapshot);
    let report = classify(snapshot, &aggregator, window, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Carbon intensity vs energy-type reference (excess, descending)",
        &serde_json::json!({
            "window": window,
            "rule": "at_risk = carbon_tons / production_mwh > acceptable_tons_per_mwh; production > 0 only",
        }),
        warnings,
        elapsed,
        report,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn facility(id: FacilityId, name: &str, energy_type: EnergyType) -> Facility {
        Facility {
            id,
            name: name.into(),
            energy_type,
            installed_capacity_mw: dec!(50),
        }
    }

    fn record(facility_id: FacilityId, production: Decimal, carbon: Decimal) -> PeriodRecord {
        PeriodRecord {
            facility_id,
            period: Period { year: 2024, month: 3 },
            production_mwh: production,
            carbon_tons: carbon,
        }
    }

    fn snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot {
            facilities: vec![
                facility(1, "Gas A", EnergyType::NaturalGas),
                facility(2, "Gas B", EnergyType::NaturalGas),
                facility(3, "Gas Idle", EnergyType::NaturalGas),
                facility(4, "Solar A", EnergyType::Solar),
                facility(5, "Geo A", EnergyType::Geothermal),
            ],
            period_records: vec![
                record(1, dec!(1000), dec!(520)), // 0.52, excess 0.07
                record(2, dec!(1000), dec!(600)), // 0.60, excess 0.15
                record(3, dec!(0), dec!(10)),     // no production
                record(4, dec!(1000), dec!(0)),
                record(5, dec!(1000), dec!(300)), // no reference
            ],
            carbon_references: vec![
                CarbonReference {
                    energy_type: EnergyType::NaturalGas,
                    acceptable_tons_per_mwh: dec!(0.45),
                },
                CarbonReference {
                    energy_type: EnergyType::Solar,
                    acceptable_tons_per_mwh: dec!(0.05),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_strictly_greater_than_threshold() {
        assert!(is_at_risk(dec!(0.46), dec!(0.45)));
        assert!(!is_at_risk(dec!(0.45), dec!(0.45)));
    }

    #[test]
    fn test_risk_set_sorted_by_excess() {
        let out = risky_facilities(&snapshot(), AggregationWindow::year(2024)).unwrap();
        let r = &out.result;
        assert_eq!(r.risky_facility_count, 2);
        assert_eq!(r.facilities[0].facility_id, 2);
        assert_eq!(r.facilities[0].excess_tons_per_mwh, dec!(0.15));
        assert_eq!(r.facilities[1].facility_id, 1);
        assert_eq!(r.facilities[1].excess_tons_per_mwh, dec!(0.07));
    }

    #[test]
    fn test_zero_production_excluded_not_safe() {
        let out = risky_facilities(&snapshot(), AggregationWindow::year(2024)).unwrap();
        let r = &out.result;
        assert_eq!(r.excluded_zero_production, 1);
        assert!(r.facilities.iter().all(|f| f.facility_id != 3));
        // Gas A, Gas B, Solar A
        assert_eq!(r.evaluated_facilities, 3);
    }

    #[test]
    fn test_missing_reference_warns() {
        let out = risky_facilities(&snapshot(), AggregationWindow::year(2024)).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Geothermal")));
    }

    #[test]
    fn test_empty_window() {
        let out = risky_facilities(&snapshot(), AggregationWindow::year(2001)).unwrap();
        assert_eq!(out.result.risky_facility_count, 0);
        assert!(out.result.facilities.is_empty());
    }
}
