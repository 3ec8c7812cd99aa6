use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FacilityAnalyticsError;
use crate::types::{EnergyType, Rate};
use crate::FacilityAnalyticsResult;

/// Inclusive pixel range for bubble radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl RadiusRange {
    pub fn span(&self) -> Decimal {
        self.max - self.min
    }
}

/// Fractional band `[lower, upper]` of an observed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lower: Rate,
    pub upper: Rate,
}

/// Tunables for the visualisation datasets and risk summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Normalised efficiency at which a facility counts as "high efficiency"
    pub efficiency_x_threshold: Rate,
    /// Radius range of the efficiency-vs-capacity bubble chart
    pub bubble_radius: RadiusRange,
    /// Exponent applied to the normalised carbon intensity before sizing
    pub bubble_radius_exponent: Decimal,
    /// Radius range of the performance matrix
    pub matrix_radius: RadiusRange,
    /// Profit-per-MWh clamp band, as fractions of the observed range
    pub matrix_y_band: Band,
    /// Plot clamp for the normalised efficiency axis
    pub matrix_x_plot_band: Band,
    /// Energy type summarised when the caller names none
    pub default_risk_energy_type: EnergyType,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            efficiency_x_threshold: dec!(0.7),
            bubble_radius: RadiusRange {
                min: dec!(6),
                max: dec!(25),
            },
            bubble_radius_exponent: dec!(0.96),
            matrix_radius: RadiusRange {
                min: dec!(7),
                max: dec!(22),
            },
            matrix_y_band: Band {
                lower: dec!(0.10),
                upper: dec!(0.90),
            },
            matrix_x_plot_band: Band {
                lower: dec!(0.05),
                upper: dec!(0.95),
            },
            default_risk_energy_type: EnergyType::NaturalGas,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> FacilityAnalyticsResult<()> {
        for (field, range) in [
            ("bubble_radius", &self.bubble_radius),
            ("matrix_radius", &self.matrix_radius),
        ] {
            if range.min < Decimal::ZERO || range.max < range.min {
                return Err(FacilityAnalyticsError::InvalidInput {
                    field: field.into(),
                    reason: format!(
                        "Radius range must satisfy 0 <= min <= max (got {}..{})",
                        range.min, range.max
                    ),
                });
            }
        }
        for (field, band) in [
            ("matrix_y_band", &self.matrix_y_band),
            ("matrix_x_plot_band", &self.matrix_x_plot_band),
        ] {
            if band.lower < Decimal::ZERO || band.upper > Decimal::ONE || band.lower > band.upper {
                return Err(FacilityAnalyticsError::InvalidInput {
                    field: field.into(),
                    reason: format!(
                        "Band must satisfy 0 <= lower <= upper <= 1 (got {}..{})",
                        band.lower, band.upper
                    ),
                });
            }
        }
        if self.bubble_radius_exponent <= Decimal::ZERO {
            return Err(FacilityAnalyticsError::InvalidInput {
                field: "bubble_radius_exponent".into(),
                reason: "Exponent must be positive".into(),
            });
        }
        Ok(())
    }
}
