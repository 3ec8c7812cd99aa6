use facility_analytics_core::aggregation::totals::AggregationWindow;
use facility_analytics_core::config::AnalyticsConfig;
use facility_analytics_core::risk::classifier::risky_facilities;
use facility_analytics_core::risk::summary::risk_summary;
use facility_analytics_core::{
    CarbonReference, EnergyType, Facility, FacilityId, Period, PeriodRecord, PortfolioSnapshot,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixture
// ===========================================================================

fn facility(id: FacilityId, name: &str, energy_type: EnergyType) -> Facility {
    Facility {
        id,
        name: name.into(),
        energy_type,
        installed_capacity_mw: dec!(100),
    }
}

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
            facility(1, "Aliağa CCGT", EnergyType::NaturalGas),
            facility(2, "Bursa CCGT", EnergyType::NaturalGas),
            facility(3, "Mothballed CCGT", EnergyType::NaturalGas),
            facility(4, "Denizli JES", EnergyType::Geothermal),
            facility(5, "Karaburun RES", EnergyType::Wind),
        ],
        period_records: vec![
            // Split over two months: (300 + 220) / (600 + 400) = 0.52
            record(1, 1, dec!(600), dec!(300)),
            record(1, 2, dec!(400), dec!(220)),
            record(2, 1, dec!(2000), dec!(800)),
            record(3, 1, Decimal::ZERO, dec!(5)),
            record(4, 1, dec!(1000), dec!(150)),
            record(5, 1, dec!(3000), Decimal::ZERO),
        ],
        carbon_references: vec![
            CarbonReference {
                energy_type: EnergyType::NaturalGas,
                acceptable_tons_per_mwh: dec!(0.45),
            },
            CarbonReference {
                energy_type: EnergyType::Geothermal,
                acceptable_tons_per_mwh: dec!(0.10),
            },
            CarbonReference {
                energy_type: EnergyType::Wind,
                acceptable_tons_per_mwh: dec!(0.02),
            },
        ],
        ..Default::default()
    }
}

// ===========================================================================
// Risk set
// ===========================================================================

#[test]
fn test_gas_plant_over_reference_is_risky() {
    let out = risky_facilities(&portfolio(), AggregationWindow::year(2024)).unwrap();
    let gas = out
        .result
        .facilities
        .iter()
        .find(|f| f.facility_id == 1)
        .unwrap();
    assert_eq!(gas.carbon_intensity, dec!(0.52));
    assert_eq!(gas.reference_tons_per_mwh, dec!(0.45));
    assert_eq!(gas.excess_tons_per_mwh, dec!(0.07));
}

#[test]
fn test_risk_set_membership_is_exact() {
    let out = risky_facilities(&portfolio(), AggregationWindow::year(2024)).unwrap();
    let ids: Vec<FacilityId> = out.result.facilities.iter().map(|f| f.facility_id).collect();
    // Geothermal 0.15 > 0.10 (excess 0.05); gas 1 excess 0.07; gas 2 at 0.40 is fine
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(out.result.risky_facility_count, 2);
    assert_eq!(out.result.excluded_zero_production, 1);
}

#[test]
fn test_risk_set_ordered_by_excess_descending() {
    let out = risky_facilities(&portfolio(), AggregationWindow::all()).unwrap();
    let excesses: Vec<Decimal> = out
        .result
        .facilities
        .iter()
        .map(|f| f.excess_tons_per_mwh)
        .collect();
    let mut sorted = excesses.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(excesses, sorted);
}

#[test]
fn test_zero_production_never_member() {
    let mut snap = portfolio();
    // Enormous emissions but no production
    snap.period_records.push(record(3, 2, Decimal::ZERO, dec!(100000)));
    let out = risky_facilities(&snap, AggregationWindow::all()).unwrap();
    assert!(out.result.facilities.iter().all(|f| f.facility_id != 3));
}

// ===========================================================================
// Energy-type summary
// ===========================================================================

#[test]
fn test_natural_gas_summary() {
    let out = risk_summary(
        &portfolio(),
        Some(EnergyType::NaturalGas),
        AggregationWindow::year(2024),
        &AnalyticsConfig::default(),
    )
    .unwrap();
    let s = &out.result;
    // (520 + 800 + 5) / 3000
    assert_eq!(s.production_mwh, dec!(3000));
    assert_eq!(s.carbon_tons, dec!(1325));
    assert_eq!(s.reference_tons_per_mwh, dec!(0.45));
    assert_eq!(s.realized_tons_per_mwh.round_dp(4), dec!(0.4417));
    assert!(!s.at_risk);
    assert!(s.difference_tons_per_mwh < Decimal::ZERO);
}

#[test]
fn test_summary_defaults_to_configured_type() {
    let config = AnalyticsConfig {
        default_risk_energy_type: EnergyType::Geothermal,
        ..AnalyticsConfig::default()
    };
    let out = risk_summary(&portfolio(), None, AggregationWindow::all(), &config).unwrap();
    assert_eq!(out.result.energy_type, EnergyType::Geothermal);
    assert!(out.result.at_risk);
}
