use facility_analytics_core::aggregation::totals::AggregationWindow;
use facility_analytics_core::reports::carbon::carbon_intensity_dataset;
use facility_analytics_core::reports::efficiency::facility_efficiency;
use facility_analytics_core::reports::facility_directory;
use facility_analytics_core::reports::financials::facility_financials;
use facility_analytics_core::reports::kpi::{kpis_or_default, portfolio_kpis, KpiBundle};
use facility_analytics_core::{
    CapacityRatio, CapacityReference, CarbonReference, CostRecord, EnergyType, Facility,
    FacilityAnalyticsError, FacilityId, Period, PeriodRecord, PortfolioSnapshot, PriceRecord,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixture
// ===========================================================================

fn record(facility_id: FacilityId, month: u32, production: Decimal, carbon: Decimal) -> PeriodRecord {
    PeriodRecord {
        facility_id,
        period: Period { year: 2024, month },
        production_mwh: production,
        carbon_tons: carbon,
    }
}

fn portfolio() -> PortfolioSnapshot {
    PortfolioSnapshot {
        facilities: vec![
            Facility {
                id: 1,
                name: "Ambarlı DGKÇ".into(),
                energy_type: EnergyType::NaturalGas,
                installed_capacity_mw: dec!(20),
            },
            Facility {
                id: 2,
                name: "Çeşme RES".into(),
                energy_type: EnergyType::Wind,
                installed_capacity_mw: dec!(20),
            },
        ],
        period_records: vec![
            record(1, 1, dec!(60000), dec!(31200)),
            record(1, 2, dec!(40000), dec!(20800)),
            record(2, 1, dec!(50000), Decimal::ZERO),
        ],
        price_records: vec![
            PriceRecord {
                period: Period { year: 2024, month: 1 },
                unit_price_tl_per_mwh: dec!(1800),
            },
            PriceRecord {
                period: Period { year: 2024, month: 2 },
                unit_price_tl_per_mwh: dec!(2200),
            },
        ],
        cost_records: vec![
            CostRecord {
                facility_id: 1,
                period: Period { year: 2024, month: 1 },
                production_cost: dec!(1200),
                maintenance_cost: dec!(100),
                other_cost: dec!(100),
            },
            CostRecord {
                facility_id: 1,
                period: Period { year: 2024, month: 2 },
                production_cost: dec!(1200),
                maintenance_cost: dec!(100),
                other_cost: dec!(100),
            },
            CostRecord {
                facility_id: 2,
                period: Period { year: 2024, month: 1 },
                production_cost: dec!(200),
                maintenance_cost: dec!(200),
                other_cost: dec!(0),
            },
        ],
        capacity_references: vec![
            CapacityReference {
                energy_type: EnergyType::NaturalGas,
                expected_capacity_ratio: CapacityRatio::from_stored(dec!(90)),
            },
            CapacityReference {
                energy_type: EnergyType::Wind,
                expected_capacity_ratio: CapacityRatio::from_stored(dec!(0.35)),
            },
        ],
        carbon_references: vec![
            CarbonReference {
                energy_type: EnergyType::NaturalGas,
                acceptable_tons_per_mwh: dec!(0.45),
            },
            CarbonReference {
                energy_type: EnergyType::Wind,
                acceptable_tons_per_mwh: dec!(0.01),
            },
        ],
        ..Default::default()
    }
}

// ===========================================================================
// KPIs
// ===========================================================================

#[test]
fn test_portfolio_kpis() {
    let out = portfolio_kpis(&portfolio(), AggregationWindow::year(2024)).unwrap();
    let k = &out.result;
    // avg price 2000; gas cost 1400/MWh, wind 400/MWh
    assert_eq!(k.total_production_mwh, dec!(150000));
    assert_eq!(k.total_revenue_tl, dec!(300000000));
    assert_eq!(k.total_cost_tl, dec!(160000000));
    assert_eq!(k.net_profit_tl, dec!(140000000));
    assert_eq!(k.margin_pct.round_dp(4), dec!(46.6667));
    // gas at 0.52 t/MWh against 0.45
    assert_eq!(k.risky_facility_count, 1);
    assert_eq!(k.warning, None);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_zero_production_portfolio() {
    let mut snap = portfolio();
    for r in &mut snap.period_records {
        r.production_mwh = Decimal::ZERO;
    }
    assert!(matches!(
        portfolio_kpis(&snap, AggregationWindow::year(2024)),
        Err(FacilityAnalyticsError::NoProductionData)
    ));

    let out = kpis_or_default(&snap, AggregationWindow::year(2024)).unwrap();
    assert_eq!(
        out.result,
        KpiBundle::zero_with_warning(FacilityAnalyticsError::NoProductionData.to_string())
    );
}

#[test]
fn test_empty_snapshot_yields_zero_kpis() {
    let out = kpis_or_default(&PortfolioSnapshot::default(), AggregationWindow::all()).unwrap();
    assert_eq!(out.result.total_production_mwh, Decimal::ZERO);
    assert_eq!(out.result.risky_facility_count, 0);
    assert!(out.result.warning.is_some());
}

// ===========================================================================
// Facility datasets
// ===========================================================================

#[test]
fn test_efficiency_percent() {
    let out = facility_efficiency(&portfolio(), 2024).unwrap();
    let gas = &out.result[0];
    assert_eq!(gas.name, "Ambarlı DGKÇ");
    assert_eq!(gas.capacity_ratio, dec!(0.9));
    assert_eq!(gas.theoretical_max_mwh, dec!(157680));
    assert_eq!(gas.efficiency_pct.round_dp(2), dec!(63.42));
}

#[test]
fn test_financials() {
    let out = facility_financials(&portfolio(), 2024).unwrap();
    let gas = &out.result[0];
    assert_eq!(gas.revenue_tl, dec!(200000000));
    assert_eq!(gas.cost_tl, dec!(140000000));
    assert_eq!(gas.profit_tl, dec!(60000000));
    assert_eq!(gas.margin_pct, dec!(30));
    assert_eq!(gas.unit_price, dec!(2000));
}

#[test]
fn test_carbon_dataset_overlay() {
    let out = carbon_intensity_dataset(&portfolio(), AggregationWindow::year(2024)).unwrap();
    let rows = &out.result;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].carbon_intensity, dec!(0.52));
    assert_eq!(rows[0].reference_tons_per_mwh, dec!(0.45));
    assert!(rows[0].exceeds_reference);
    assert_eq!(rows[1].carbon_intensity, Decimal::ZERO);
    assert!(!rows[1].exceeds_reference);
}

#[test]
fn test_carbon_dataset_lists_facility_idle_in_window() {
    let mut snap = portfolio();
    snap.facilities.push(Facility {
        id: 3,
        name: "Bandırma".into(),
        energy_type: EnergyType::NaturalGas,
        installed_capacity_mw: dec!(10),
    });
    snap.period_records.push(PeriodRecord {
        facility_id: 3,
        period: Period { year: 2023, month: 5 },
        production_mwh: dec!(1000),
        carbon_tons: dec!(900),
    });

    let out = carbon_intensity_dataset(&snap, AggregationWindow::year(2024)).unwrap();
    let names: Vec<&str> = out.result.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ambarlı DGKÇ", "Bandırma", "Çeşme RES"]);
    let idle = &out.result[1];
    assert_eq!(idle.production_mwh, Decimal::ZERO);
    assert_eq!(idle.carbon_intensity, Decimal::ZERO);
    assert!(!idle.exceeds_reference);

    let all = carbon_intensity_dataset(&snap, AggregationWindow::all()).unwrap();
    assert_eq!(all.result[1].carbon_intensity, dec!(0.9));
    assert!(all.result[1].exceeds_reference);
}

#[test]
fn test_directory() {
    let out = facility_directory(&portfolio()).unwrap();
    assert_eq!(out.result.len(), 2);
    assert!(matches!(
        facility_directory(&PortfolioSnapshot::default()),
        Err(FacilityAnalyticsError::NoFacilities)
    ));
}

#[test]
fn test_envelope_serialises() {
    let out = portfolio_kpis(&portfolio(), AggregationWindow::year(2024)).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert!(json.get("result").is_some());
    assert!(json.get("methodology").is_some());
    assert_eq!(json["metadata"]["precision"], "rust_decimal_128bit");
    assert!(json["result"].get("warning").is_none());
}
