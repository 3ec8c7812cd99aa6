use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;

use crate::aggregation::totals::{AggregationWindow, Aggregator};
use crate::metrics;
use crate::types::*;
use crate::FacilityAnalyticsResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityEfficiency {
    pub facility_id: FacilityId,
    pub name: String,
    pub energy_type: EnergyType,
    pub installed_capacity_mw: Decimal,
    pub production_mwh: Mwh,
    /// Canonical expected capacity ratio (fraction)
    pub capacity_ratio: Rate,
    /// installed × 8760 × ratio
    pub theoretical_max_mwh: Mwh,
    pub efficiency: Rate,
    pub efficiency_pct: Percent,
}

/// Efficiency of every registered facility for a year, ordered by name.
/// Facilities with no records in the year report zero.
#[instrument(skip_all, fields(year))]
pub fn facility_efficiency(
    snapshot: &PortfolioSnapshot,
    year: i32,
) -> FacilityAnalyticsResult<ComputationOutput<Vec<FacilityEfficiency>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let aggregator = Aggregator::new(snapshot);

    let rows: Vec<FacilityEfficiency> = snapshot
        .facilities_by_name()
        .into_iter()
        .map(|f| {
            let totals = aggregator.facility(f.id, Some(year));
            let ratio = snapshot.capacity_ratio(f.energy_type);
            let denominator = metrics::efficiency_denominator(f.installed_capacity_mw, ratio);
            if denominator <= Decimal::ZERO {
                warnings.push(format!(
                    "Facility '{}' has no usable capacity; efficiency reported as zero",
                    f.name
                ));
            }
            let efficiency = metrics::efficiency(totals.production_mwh, f.installed_capacity_mw, ratio);
            FacilityEfficiency {
                facility_id: f.id,
                name: f.name.clone(),
                energy_type: f.energy_type,
                installed_capacity_mw: f.installed_capacity_mw,
                production_mwh: totals.production_mwh,
                capacity_ratio: ratio.fraction(),
                theoretical_max_mwh: denominator,
                efficiency,
                efficiency_pct: efficiency * Decimal::ONE_HUNDRED,
            }
        })
        .collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "production / (installed_mw × 8760 × capacity_ratio)",
        &serde_json::json!({
            "window": AggregationWindow::year(year),
            "hours_per_year": metrics::HOURS_PER_YEAR,
            "missing_capacity_reference": "ratio 1",
        }),
        warnings,
        elapsed,
        rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_efficiency_list_includes_idle_and_sorts() {
        let snapshot = PortfolioSnapshot {
            facilities: vec![
                Facility {
                    id: 1,
                    name: "Wind B".into(),
                    energy_type: EnergyType::Wind,
                    installed_capacity_mw: dec!(20),
                },
                Facility {
                    id: 2,
                    name: "Wind A".into(),
                    energy_type: EnergyType::Wind,
                    installed_capacity_mw: dec!(0),
                },
            ],
            period_records: vec![PeriodRecord {
                facility_id: 1,
                period: Period { year: 2024, month: 1 },
                production_mwh: dec!(100000),
                carbon_tons: Decimal::ZERO,
            }],
            capacity_references: vec![CapacityReference {
                energy_type: EnergyType::Wind,
                expected_capacity_ratio: CapacityRatio::from_stored(dec!(90)),
            }],
            ..Default::default()
        };
        let out = facility_efficiency(&snapshot, 2024).unwrap();
        let rows = &out.result;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Wind A");
        assert_eq!(rows[0].efficiency, Decimal::ZERO);
        assert_eq!(rows[1].theoretical_max_mwh, dec!(157680));
        assert_eq!(rows[1].efficiency.round_dp(4), dec!(0.6342));
        assert_eq!(rows[1].efficiency_pct.round_dp(2), dec!(63.42));
        assert_eq!(out.warnings.len(), 1);
    }
}
