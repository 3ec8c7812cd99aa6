use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::aggregation::prices::YearlyPrices;
use crate::error::FacilityAnalyticsError;
use crate::metrics;
use crate::types::*;
use crate::FacilityAnalyticsResult;

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// Which period records an aggregation covers. `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<FacilityId>,
}

impl AggregationWindow {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            facility_id: None,
        }
    }

    pub fn facility_year(facility_id: FacilityId, year: i32) -> Self {
        Self {
            year: Some(year),
            facility_id: Some(facility_id),
        }
    }

    pub fn contains(&self, record: &PeriodRecord) -> bool {
        self.year.map_or(true, |y| record.period.year == y)
            && self.facility_id.map_or(true, |id| record.facility_id == id)
    }
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Summed primitive inputs for one facility or for the whole portfolio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub production_mwh: Mwh,
    pub carbon_tons: Tons,
    /// Σ production × average price of the record's year
    pub revenue_tl: Money,
    /// Σ production × (production + maintenance + other cost rates)
    pub cost_tl: Money,
    pub record_count: usize,
    /// Records whose year has no price; they contribute zero revenue
    pub unpriced_records: usize,
    /// Records without a matching cost row; they contribute zero cost
    pub uncosted_records: usize,
    /// Records left out because a product or sum exceeded the decimal range
    #[serde(default)]
    pub overflowed_records: usize,
}

impl Totals {
    pub fn profit_tl(&self) -> Money {
        metrics::net_profit(self.revenue_tl, self.cost_tl)
    }

    pub fn margin_pct(&self) -> Percent {
        metrics::margin(self.profit_tl(), self.revenue_tl)
    }

    pub fn carbon_intensity(&self) -> Decimal {
        metrics::carbon_intensity(self.carbon_tons, self.production_mwh)
    }

    pub fn unit_price(&self) -> Money {
        metrics::unit_price(self.revenue_tl, self.production_mwh)
    }

    pub fn profit_per_mwh(&self) -> Money {
        metrics::profit_per_mwh(self.profit_tl(), self.production_mwh)
    }

    pub fn has_production(&self) -> bool {
        self.production_mwh > Decimal::ZERO
    }

    /// Human-readable notes about joins that fell back to zero.
    pub fn degradation_warnings(&self, scope: &str) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.unpriced_records > 0 {
            warnings.push(format!(
                "{scope}: {} period record(s) have no market price for their year; revenue counted as zero",
                self.unpriced_records
            ));
        }
        if self.uncosted_records > 0 {
            warnings.push(format!(
                "{scope}: {} period record(s) have no cost row; cost counted as zero",
                self.uncosted_records
            ));
        }
        if self.overflowed_records > 0 {
            warnings.push(format!(
                "{scope}: {} period record(s) overflow the decimal range and were left out",
                self.overflowed_records
            ));
        }
        warnings
    }

    /// Add one record. A record whose revenue, cost or running sums would
    /// overflow is counted in `overflowed_records` and otherwise ignored.
    fn absorb(
        &mut self,
        production: Mwh,
        carbon: Tons,
        price: Option<Money>,
        cost_rate: Option<Money>,
    ) {
        let summed = (|| {
            let revenue = match price {
                Some(p) => self.revenue_tl.checked_add(production.checked_mul(p)?)?,
                None => self.revenue_tl,
            };
            let cost = match cost_rate {
                Some(c) => self.cost_tl.checked_add(production.checked_mul(c)?)?,
                None => self.cost_tl,
            };
            Some((
                self.production_mwh.checked_add(production)?,
                self.carbon_tons.checked_add(carbon)?,
                revenue,
                cost,
            ))
        })();

        let Some((production_mwh, carbon_tons, revenue_tl, cost_tl)) = summed else {
            self.overflowed_records += 1;
            return;
        };
        self.production_mwh = production_mwh;
        self.carbon_tons = carbon_tons;
        self.revenue_tl = revenue_tl;
        self.cost_tl = cost_tl;
        self.record_count += 1;
        if price.is_none() {
            self.unpriced_records += 1;
        }
        if cost_rate.is_none() {
            self.uncosted_records += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Joins period records with yearly prices and per-period cost rates.
///
/// Built once per snapshot and reused for every window.
pub struct Aggregator<'a> {
    snapshot: &'a PortfolioSnapshot,
    prices: YearlyPrices,
    cost_rates: HashMap<(FacilityId, Period), Money>,
}

impl<'a> Aggregator<'a> {
    pub fn new(snapshot: &'a PortfolioSnapshot) -> Self {
        let mut cost_rates: HashMap<(FacilityId, Period), Money> = HashMap::new();
        for c in &snapshot.cost_records {
            let rate = cost_rates
                .entry((c.facility_id, c.period))
                .or_insert(Decimal::ZERO);
            *rate = rate.saturating_add(c.total_per_mwh());
        }
        Self {
            snapshot,
            prices: YearlyPrices::from_records(&snapshot.price_records),
            cost_rates,
        }
    }

    pub fn prices(&self) -> &YearlyPrices {
        &self.prices
    }

    fn records<'s>(
        &'s self,
        window: AggregationWindow,
    ) -> impl Iterator<Item = &'a PeriodRecord> + 's {
        self.snapshot
            .period_records
            .iter()
            .filter(move |r| window.contains(r))
    }

    fn absorb(&self, totals: &mut Totals, r: &PeriodRecord) {
        totals.absorb(
            r.production_mwh,
            r.carbon_tons,
            self.prices.price_for(r.period.year),
            self.cost_rates.get(&(r.facility_id, r.period)).copied(),
        );
    }

    /// Totals keyed by facility. Only facilities with at least one record in
    /// the window appear.
    pub fn by_facility(&self, window: AggregationWindow) -> BTreeMap<FacilityId, Totals> {
        let mut out: BTreeMap<FacilityId, Totals> = BTreeMap::new();
        for r in self.records(window) {
            let totals = out.entry(r.facility_id).or_default();
            self.absorb(totals, r);
        }
        debug!(facilities = out.len(), ?window, "aggregated facility totals");
        out
    }

    /// Totals for a single facility, zero-filled when it has no records.
    pub fn facility(&self, facility_id: FacilityId, year: Option<i32>) -> Totals {
        let window = AggregationWindow {
            year,
            facility_id: Some(facility_id),
        };
        let mut totals = Totals::default();
        for r in self.records(window) {
            self.absorb(&mut totals, r);
        }
        totals
    }

    /// Single aggregate over every record in the window.
    pub fn portfolio(&self, window: AggregationWindow) -> Totals {
        let mut totals = Totals::default();
        for r in self.records(window) {
            self.absorb(&mut totals, r);
        }
        debug!(
            production_mwh = %totals.production_mwh,
            records = totals.record_count,
            "aggregated portfolio totals"
        );
        totals
    }

    /// Portfolio totals for KPI purposes. Zero production anywhere in the
    /// window is a reportable condition, not a silent zero.
    pub fn portfolio_for_kpis(&self, window: AggregationWindow) -> FacilityAnalyticsResult<Totals> {
        let totals = self.portfolio(window);
        if totals.production_mwh.is_zero() {
            return Err(FacilityAnalyticsError::NoProductionData);
        }
        Ok(totals)
    }
}
