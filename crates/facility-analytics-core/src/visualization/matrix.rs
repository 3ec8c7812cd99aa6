use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::aggregation::totals::{AggregationWindow, Aggregator};
use crate::config::AnalyticsConfig;
use crate::metrics;
use crate::types::*;
use crate::visualization::normalize::{
    clamp, matrix_bubble_radius, max_or_zero, mean, normalize_by_max, ObservedRange,
};
use crate::FacilityAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Per-facility inputs before normalisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixInput {
    pub facility_id: FacilityId,
    pub name: String,
    pub energy_type: EnergyType,
    pub efficiency: Rate,
    pub profit_per_mwh: Money,
    pub carbon_intensity: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    HighEfficiencyHighProfit,
    HighEfficiencyLowProfit,
    LowEfficiencyHighProfit,
    LowEfficiencyLowProfit,
}

impl Quadrant {
    pub fn of(x: Rate, y: Money, thresholds: &QuadrantThresholds) -> Self {
        match (x >= thresholds.x_threshold, y >= thresholds.y_threshold) {
            (true, true) => Quadrant::HighEfficiencyHighProfit,
            (true, false) => Quadrant::HighEfficiencyLowProfit,
            (false, true) => Quadrant::LowEfficiencyHighProfit,
            (false, false) => Quadrant::LowEfficiencyLowProfit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadrantThresholds {
    /// On the normalised efficiency axis
    pub x_threshold: Rate,
    /// Mean of the clamped profit-per-MWh values
    pub y_threshold: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixPoint {
    pub facility_id: FacilityId,
    pub name: String,
    pub energy_type: EnergyType,
    pub efficiency: Rate,
    /// efficiency / max efficiency, in [0, 1]
    pub x: Rate,
    /// `x` pulled into the plot band so edge points stay on screen
    pub plot_x: Rate,
    pub profit_per_mwh: Money,
    /// profit_per_mwh clamped into the configured band of the observed range
    pub y: Money,
    pub ci: Decimal,
    pub ci_norm: Rate,
    pub radius: Decimal,
    pub quadrant: Quadrant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixDataset {
    pub year: i32,
    pub thresholds: QuadrantThresholds,
    pub points: Vec<MatrixPoint>,
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Place facilities on the efficiency/profit plane.
///
/// Outliers on the profit axis are clamped into a band of the observed range
/// so one extreme facility does not flatten the rest of the chart.
pub fn normalize_matrix(
    inputs: &[MatrixInput],
    config: &AnalyticsConfig,
) -> (Vec<MatrixPoint>, QuadrantThresholds) {
    let max_eff = max_or_zero(inputs.iter().map(|i| i.efficiency));
    let max_ci = max_or_zero(inputs.iter().map(|i| i.carbon_intensity));

    let profits: Vec<Decimal> = inputs.iter().map(|i| i.profit_per_mwh).collect();
    let clamped: Vec<Decimal> = match ObservedRange::of(&profits) {
        Some(range) => {
            let (lo, hi) = range.band(config.matrix_y_band);
            profits.iter().map(|p| clamp(*p, lo, hi)).collect()
        }
        None => Vec::new(),
    };

    let thresholds = QuadrantThresholds {
        x_threshold: config.efficiency_x_threshold,
        y_threshold: mean(&clamped),
    };

    let points = inputs
        .iter()
        .zip(clamped)
        .map(|(i, y)| {
            let x = normalize_by_max(i.efficiency, max_eff);
            let ci_norm = normalize_by_max(i.carbon_intensity, max_ci);
            MatrixPoint {
                facility_id: i.facility_id,
                name: i.name.clone(),
                energy_type: i.energy_type,
                efficiency: i.efficiency,
                x,
                plot_x: clamp(
                    x,
                    config.matrix_x_plot_band.lower,
                    config.matrix_x_plot_band.upper,
                ),
                profit_per_mwh: i.profit_per_mwh,
                y,
                ci: i.carbon_intensity,
                ci_norm,
                radius: matrix_bubble_radius(ci_norm, config.matrix_radius),
                quadrant: Quadrant::of(x, y, &thresholds),
            }
        })
        .collect();

    (points, thresholds)
}

/// Efficiency vs profit per MWh for every registered facility, sized by
/// carbon intensity and labelled by quadrant. Facilities without production
/// in the year sit at efficiency 0 and profit 0 and still shape the profit
/// band and the y threshold.
#[instrument(skip_all, fields(year))]
pub fn performance_matrix(
    snapshot: &PortfolioSnapshot,
    year: i32,
    config: &AnalyticsConfig,
) -> FacilityAnalyticsResult<ComputationOutput<MatrixDataset>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let aggregator = Aggregator::new(snapshot);
    let totals = aggregator.by_facility(AggregationWindow::year(year));

    let inputs: Vec<MatrixInput> = snapshot
        .facilities_by_name()
        .into_iter()
        .map(|facility| {
            let t = totals.get(&facility.id).cloned().unwrap_or_default();
            warnings.extend(t.degradation_warnings(&facility.name));
            MatrixInput {
                facility_id: facility.id,
                name: facility.name.clone(),
                energy_type: facility.energy_type,
                efficiency: metrics::efficiency(
                    t.production_mwh,
                    facility.installed_capacity_mw,
                    snapshot.capacity_ratio(facility.energy_type),
                ),
                profit_per_mwh: t.profit_per_mwh(),
                carbon_intensity: t.carbon_intensity(),
            }
        })
        .collect();

    if inputs.is_empty() {
        warnings.push("No facilities registered; matrix is empty".into());
    } else if totals.values().all(|t| !t.has_production()) {
        warnings.push(format!("No facility produced in {year}; every point sits at the origin"));
    }

    let (points, thresholds) = normalize_matrix(&inputs, config);
    debug!(points = points.len(), y_threshold = %thresholds.y_threshold, "performance matrix");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Normalised efficiency vs clamped profit per MWh, quadrant split at (x threshold, mean y)",
        &serde_json::json!({
            "year": year,
            "x_threshold": config.efficiency_x_threshold,
            "y_band": config.matrix_y_band,
            "x_plot_band": config.matrix_x_plot_band,
            "radius": config.matrix_radius,
        }),
        warnings,
        elapsed,
        MatrixDataset {
            year,
            thresholds,
            points,
        },
    ))
}
