use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FacilityAnalyticsError;
use crate::metrics::normalize_capacity_ratio;
use crate::FacilityAnalyticsResult;

/// Monetary values in Turkish lira. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Percentages on the 0-100 scale (10 = 10%).
pub type Percent = Decimal;

/// Energy in megawatt-hours.
pub type Mwh = Decimal;

/// Emissions in metric tons of CO2.
pub type Tons = Decimal;

pub type FacilityId = u32;
pub type ScenarioId = u32;

// ---------------------------------------------------------------------------
// Energy type
// ---------------------------------------------------------------------------

/// Generation technology of a facility.
///
/// Deserialisation also accepts the Turkish labels used by the upstream
/// facility register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyType {
    #[serde(alias = "Güneş", alias = "Gunes")]
    Solar,
    #[serde(alias = "Rüzgar", alias = "Ruzgar")]
    Wind,
    #[serde(alias = "Doğalgaz", alias = "Dogalgaz")]
    NaturalGas,
    #[serde(alias = "Jeotermal")]
    Geothermal,
    #[serde(alias = "Diğer")]
    Other,
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Solar => "Solar",
            Self::Wind => "Wind",
            Self::NaturalGas => "NaturalGas",
            Self::Geothermal => "Geothermal",
            Self::Other => "Other",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EnergyType {
    type Err = FacilityAnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solar" | "güneş" | "gunes" => Ok(Self::Solar),
            "wind" | "rüzgar" | "ruzgar" => Ok(Self::Wind),
            "naturalgas" | "natural_gas" | "natural gas" | "gas" | "doğalgaz" | "dogalgaz" => {
                Ok(Self::NaturalGas)
            }
            "geothermal" | "jeotermal" => Ok(Self::Geothermal),
            "other" | "diğer" => Ok(Self::Other),
            other => Err(FacilityAnalyticsError::InvalidInput {
                field: "energy_type".into(),
                reason: format!(
                    "Unknown energy type '{other}'. Use: solar, wind, naturalgas, geothermal, other"
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    /// 1 = January, 12 = December
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> FacilityAnalyticsResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(FacilityAnalyticsError::InvalidInput {
                field: "period.month".into(),
                reason: format!("Month must be between 1 and 12 (got {month})"),
            });
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl From<NaiveDate> for Period {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Capacity ratio
// ---------------------------------------------------------------------------

/// Expected utilisation as a canonical fraction.
///
/// Stored references mix fractions (0.9) and percentages (90). The only way
/// in is [`CapacityRatio::from_stored`], so once a value is a `CapacityRatio`
/// it is always a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct CapacityRatio(Rate);

impl CapacityRatio {
    pub fn from_stored(raw: Decimal) -> Self {
        Self(normalize_capacity_ratio(raw))
    }

    pub fn fraction(self) -> Rate {
        self.0
    }
}

/// Facilities without a capacity reference are measured against full
/// utilisation.
impl Default for CapacityRatio {
    fn default() -> Self {
        Self(Decimal::ONE)
    }
}

impl From<Decimal> for CapacityRatio {
    fn from(raw: Decimal) -> Self {
        Self::from_stored(raw)
    }
}

impl From<CapacityRatio> for Decimal {
    fn from(ratio: CapacityRatio) -> Self {
        ratio.0
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A generation plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub energy_type: EnergyType,
    pub installed_capacity_mw: Decimal,
}

/// One facility's realised production and emissions for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub facility_id: FacilityId,
    pub period: Period,
    pub production_mwh: Mwh,
    pub carbon_tons: Tons,
}

/// Market price for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub period: Period,
    pub unit_price_tl_per_mwh: Money,
}

/// Operating cost rates (TL per MWh produced) for one facility and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub facility_id: FacilityId,
    pub period: Period,
    pub production_cost: Money,
    pub maintenance_cost: Money,
    pub other_cost: Money,
}

impl CostRecord {
    pub fn total_per_mwh(&self) -> Money {
        self.production_cost
            .saturating_add(self.maintenance_cost)
            .saturating_add(self.other_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReference {
    pub energy_type: EnergyType,
    pub expected_capacity_ratio: CapacityRatio,
}

/// Acceptable carbon intensity for an energy type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonReference {
    pub energy_type: EnergyType,
    pub acceptable_tons_per_mwh: Decimal,
}

/// A hypothetical investment evaluated against a facility baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ScenarioId>,
    pub facility_id: FacilityId,
    pub name: String,
    pub investment_type: String,
    /// Expected production increase, percent (10 = +10%)
    pub production_uplift_pct: Percent,
    /// Expected carbon reduction, percent (20 = -20%)
    pub carbon_reduction_pct: Percent,
    /// One-off extra cost in millions of TL
    pub extra_cost_million_tl: Decimal,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Fully materialised input for every report.
///
/// Produced by the data-access layer before any computation starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub period_records: Vec<PeriodRecord>,
    #[serde(default)]
    pub price_records: Vec<PriceRecord>,
    #[serde(default)]
    pub cost_records: Vec<CostRecord>,
    #[serde(default)]
    pub capacity_references: Vec<CapacityReference>,
    #[serde(default)]
    pub carbon_references: Vec<CarbonReference>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl PortfolioSnapshot {
    pub fn facility(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    /// Facilities ordered by name, then id.
    pub fn facilities_by_name(&self) -> Vec<&Facility> {
        let mut facilities: Vec<&Facility> = self.facilities.iter().collect();
        facilities.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        facilities
    }

    /// Canonical expected capacity ratio for an energy type, full
    /// utilisation when no reference exists.
    pub fn capacity_ratio(&self, energy_type: EnergyType) -> CapacityRatio {
        self.capacity_references
            .iter()
            .find(|r| r.energy_type == energy_type)
            .map(|r| r.expected_capacity_ratio)
            .unwrap_or_default()
    }

    /// Acceptable carbon intensity for an energy type. When several rows
    /// exist for the same type the largest wins.
    pub fn carbon_reference(&self, energy_type: EnergyType) -> Option<Decimal> {
        self.carbon_references
            .iter()
            .filter(|r| r.energy_type == energy_type)
            .map(|r| r.acceptable_tons_per_mwh)
            .max()
    }
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_capacity_ratio_percentage_form() {
        assert_eq!(CapacityRatio::from_stored(dec!(90)).fraction(), dec!(0.9));
        assert_eq!(CapacityRatio::from_stored(dec!(0.9)).fraction(), dec!(0.9));
    }

    #[test]
    fn test_capacity_ratio_deserialises_canonical() {
        let r: CapacityReference =
            serde_json::from_str(r#"{"energy_type":"Wind","expected_capacity_ratio":"35"}"#)
                .unwrap();
        assert_eq!(r.expected_capacity_ratio.fraction(), dec!(0.35));
    }

    #[test]
    fn test_capacity_ratio_default_is_full_utilisation() {
        let snapshot = PortfolioSnapshot::default();
        assert_eq!(
            snapshot.capacity_ratio(EnergyType::Solar).fraction(),
            Decimal::ONE
        );
    }

    #[test]
    fn test_energy_type_turkish_alias() {
        let t: EnergyType = serde_json::from_str("\"Doğalgaz\"").unwrap();
        assert_eq!(t, EnergyType::NaturalGas);
        assert_eq!("rüzgar".parse::<EnergyType>().unwrap(), EnergyType::Wind);
        assert!("coal".parse::<EnergyType>().is_err());
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(2024, 0).is_err());
        assert!(Period::new(2024, 13).is_err());
        assert_eq!(Period::new(2024, 3).unwrap().to_string(), "2024-03");
    }

    #[test]
    fn test_period_from_date() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        assert_eq!(Period::from(date), Period { year: 2023, month: 11 });
    }

    #[test]
    fn test_cost_record_total() {
        let c = CostRecord {
            facility_id: 1,
            period: Period { year: 2024, month: 1 },
            production_cost: dec!(100),
            maintenance_cost: dec!(20),
            other_cost: dec!(5),
        };
        assert_eq!(c.total_per_mwh(), dec!(125));
    }
}
