use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::aggregation::totals::{AggregationWindow, Aggregator};
use crate::error::FacilityAnalyticsError;
use crate::risk::classifier::classify;
use crate::types::*;
use crate::FacilityAnalyticsResult;

/// Headline portfolio figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiBundle {
    pub total_production_mwh: Mwh,
    pub total_revenue_tl: Money,
    pub total_cost_tl: Money,
    pub net_profit_tl: Money,
    pub margin_pct: Percent,
    pub risky_facility_count: usize,
    /// Set only on the caller-level fallback bundle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl KpiBundle {
    pub fn zero_with_warning(message: impl Into<String>) -> Self {
        Self {
            total_production_mwh: Decimal::ZERO,
            total_revenue_tl: Decimal::ZERO,
            total_cost_tl: Decimal::ZERO,
            net_profit_tl: Decimal::ZERO,
            margin_pct: Decimal::ZERO,
            risky_facility_count: 0,
            warning: Some(message.into()),
        }
    }
}

const METHODOLOGY: &str = "Portfolio totals: revenue at yearly average price, \
     cost from per-MWh rates, risky count from carbon reference";

/// Portfolio KPIs for a window.
///
/// Returns [`FacilityAnalyticsError::NoProductionData`] when nothing was
/// produced in the window.
#[instrument(skip_all, fields(year = ?window.year))]
pub fn portfolio_kpis(
    snapshot: &PortfolioSnapshot,
    window: AggregationWindow,
) -> FacilityAnalyticsResult<ComputationOutput<KpiBundle>> {
    let start = Instant::now();
    let aggregator = Aggregator::new(snapshot);
    let totals = aggregator.portfolio_for_kpis(window)?;

    let mut warnings = totals.degradation_warnings("Portfolio");
    let risk = classify(snapshot, &aggregator, window, &mut warnings);

    let bundle = KpiBundle {
        total_production_mwh: totals.production_mwh,
        total_revenue_tl: totals.revenue_tl,
        total_cost_tl: totals.cost_tl,
        net_profit_tl: totals.profit_tl(),
        margin_pct: totals.margin_pct(),
        risky_facility_count: risk.risky_facility_count,
        warning: None,
    };
    debug!(
        production_mwh = %bundle.total_production_mwh,
        risky = bundle.risky_facility_count,
        "portfolio kpis"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        METHODOLOGY,
        &serde_json::json!({ "window": window }),
        warnings,
        elapsed,
        bundle,
    ))
}

/// [`portfolio_kpis`], with a zero-production portfolio turned into an
/// all-zero bundle carrying a warning. Other errors still propagate.
pub fn kpis_or_default(
    snapshot: &PortfolioSnapshot,
    window: AggregationWindow,
) -> FacilityAnalyticsResult<ComputationOutput<KpiBundle>> {
    match portfolio_kpis(snapshot, window) {
        Err(FacilityAnalyticsError::NoProductionData) => {
            let message = FacilityAnalyticsError::NoProductionData.to_string();
            warn!("{message}; returning zero KPIs");
            Ok(with_metadata(
                METHODOLOGY,
                &serde_json::json!({ "window": window }),
                vec![message.clone()],
                0,
                KpiBundle::zero_with_warning(message),
            ))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(production: Decimal) -> PortfolioSnapshot {
        PortfolioSnapshot {
            facilities: vec![Facility {
                id: 1,
                name: "Gas".into(),
                energy_type: EnergyType::NaturalGas,
                installed_capacity_mw: dec!(100),
            }],
            period_records: vec![PeriodRecord {
                facility_id: 1,
                period: Period { year: 2024, month: 5 },
                production_mwh: production,
                carbon_tons: dec!(520),
            }],
            price_records: vec![PriceRecord {
                period: Period { year: 2024, month: 5 },
                unit_price_tl_per_mwh: dec!(2000),
            }],
            cost_records: vec![CostRecord {
                facility_id: 1,
                period: Period { year: 2024, month: 5 },
                production_cost: dec!(1000),
                maintenance_cost: dec!(300),
                other_cost: dec!(200),
            }],
            carbon_references: vec![CarbonReference {
                energy_type: EnergyType::NaturalGas,
                acceptable_tons_per_mwh: dec!(0.45),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_kpi_bundle() {
        let out = portfolio_kpis(&snapshot(dec!(1000)), AggregationWindow::year(2024)).unwrap();
        let k = &out.result;
        assert_eq!(k.total_production_mwh, dec!(1000));
        assert_eq!(k.total_revenue_tl, dec!(2000000));
        assert_eq!(k.total_cost_tl, dec!(1500000));
        assert_eq!(k.net_profit_tl, dec!(500000));
        assert_eq!(k.margin_pct, dec!(25));
        assert_eq!(k.risky_facility_count, 1);
        assert!(k.warning.is_none());
    }

    #[test]
    fn test_zero_production_raises() {
        let result = portfolio_kpis(&snapshot(Decimal::ZERO), AggregationWindow::year(2024));
        assert!(matches!(result, Err(FacilityAnalyticsError::NoProductionData)));
    }

    #[test]
    fn test_default_bundle_on_zero_production() {
        let out = kpis_or_default(&snapshot(Decimal::ZERO), AggregationWindow::year(2024)).unwrap();
        assert_eq!(out.result.total_production_mwh, Decimal::ZERO);
        assert_eq!(out.result.risky_facility_count, 0);
        assert!(out.result.warning.is_some());
        assert_eq!(out.warnings.len(), 1);
    }
}
