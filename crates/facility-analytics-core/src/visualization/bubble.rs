use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;

use crate::aggregation::totals::{AggregationWindow, Aggregator};
use crate::config::AnalyticsConfig;
use crate::metrics;
use crate::types::*;
use crate::visualization::normalize::{carbon_bubble_radius, max_or_zero, normalize_by_max};
use crate::FacilityAnalyticsResult;

/// Un-normalised inputs for one bubble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBubble {
    pub facility_id: FacilityId,
    pub name: String,
    pub energy_type: EnergyType,
    pub installed_capacity_mw: Decimal,
    pub efficiency: Rate,
    pub carbon_intensity: Decimal,
}

/// One facility on the efficiency-vs-capacity chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubblePoint {
    pub facility_id: FacilityId,
    pub name: String,
    pub energy_type: EnergyType,
    /// Installed capacity, MW
    pub x: Decimal,
    /// Efficiency as a fraction
    pub y: Rate,
    /// Carbon intensity, t/MWh
    pub ci: Decimal,
    /// ci / max ci over the dataset, in [0, 1]
    pub ci_norm: Rate,
    pub radius: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BubbleDataset {
    pub year: i32,
    pub max_carbon_intensity: Decimal,
    pub points: Vec<BubblePoint>,
}

/// Size bubbles by carbon intensity relative to the largest in the set.
pub fn size_bubbles(raw: &[RawBubble], config: &AnalyticsConfig) -> (Vec<BubblePoint>, Decimal) {
    let max_ci = max_or_zero(raw.iter().map(|b| b.carbon_intensity));
    let points = raw
        .iter()
        .map(|b| {
            let ci_norm = normalize_by_max(b.carbon_intensity, max_ci);
            BubblePoint {
                facility_id: b.facility_id,
                name: b.name.clone(),
                energy_type: b.energy_type,
                x: b.installed_capacity_mw,
                y: b.efficiency,
                ci: b.carbon_intensity,
                ci_norm,
                radius: carbon_bubble_radius(
                    ci_norm,
                    config.bubble_radius,
                    config.bubble_radius_exponent,
                ),
            }
        })
        .collect();
    (points, max_ci)
}

/// Efficiency vs installed capacity for every registered facility, bubble
/// size driven by carbon intensity. Facilities without production in the
/// year appear with zero efficiency and intensity.
#[instrument(skip_all, fields(year))]
pub fn efficiency_bubble(
    snapshot: &PortfolioSnapshot,
    year: i32,
    config: &AnalyticsConfig,
) -> FacilityAnalyticsResult<ComputationOutput<BubbleDataset>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let aggregator = Aggregator::new(snapshot);
    let totals = aggregator.by_facility(AggregationWindow::year(year));

    let raw: Vec<RawBubble> = snapshot
        .facilities_by_name()
        .into_iter()
        .map(|f| {
            let t = totals.get(&f.id).cloned().unwrap_or_default();
            let ratio = snapshot.capacity_ratio(f.energy_type);
            RawBubble {
                facility_id: f.id,
                name: f.name.clone(),
                energy_type: f.energy_type,
                installed_capacity_mw: f.installed_capacity_mw,
                efficiency: metrics::efficiency(t.production_mwh, f.installed_capacity_mw, ratio),
                carbon_intensity: t.carbon_intensity(),
            }
        })
        .collect();

    if raw.is_empty() {
        warnings.push("No facilities registered; bubble dataset is empty".into());
    }

    let (points, max_carbon_intensity) = size_bubbles(&raw, config);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Efficiency vs installed capacity, radius = min + (ci / max ci)^exponent × span",
        &serde_json::json!({
            "year": year,
            "radius": config.bubble_radius,
            "exponent": config.bubble_radius_exponent,
        }),
        warnings,
        elapsed,
        BubbleDataset {
            year,
            max_carbon_intensity,
            points,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(id: FacilityId, ci: Decimal) -> RawBubble {
        RawBubble {
            facility_id: id,
            name: format!("F{id}"),
            energy_type: EnergyType::NaturalGas,
            installed_capacity_mw: dec!(40),
            efficiency: dec!(0.5),
            carbon_intensity: ci,
        }
    }

    #[test]
    fn test_max_point_normalises_to_one() {
        let (points, max) = size_bubbles(
            &[raw(1, dec!(0.2)), raw(2, dec!(0.4)), raw(3, dec!(0.1))],
            &AnalyticsConfig::default(),
        );
        assert_eq!(max, dec!(0.4));
        assert_eq!(points[1].ci_norm, Decimal::ONE);
        assert_eq!(points[1].radius, dec!(25));
        assert_eq!(points[0].ci_norm, dec!(0.5));
        assert!(points.iter().all(|p| p.ci_norm >= Decimal::ZERO && p.ci_norm <= Decimal::ONE));
    }

    #[test]
    fn test_all_zero_intensity() {
        let (points, max) = size_bubbles(
            &[raw(1, Decimal::ZERO), raw(2, Decimal::ZERO)],
            &AnalyticsConfig::default(),
        );
        assert_eq!(max, Decimal::ZERO);
        assert!(points.iter().all(|p| p.ci_norm.is_zero() && p.radius == dec!(6)));
    }

    #[test]
    fn test_empty_set() {
        let (points, max) = size_bubbles(&[], &AnalyticsConfig::default());
        assert!(points.is_empty());
        assert_eq!(max, Decimal::ZERO);
    }
}
