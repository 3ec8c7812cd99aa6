use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::types::{Money, PriceRecord};

/// Average market price per calendar year.
#[derive(Debug, Clone, Default)]
pub struct YearlyPrices {
    prices: BTreeMap<i32, Money>,
}

impl YearlyPrices {
    /// Arithmetic mean of every price record within each year.
    pub fn from_records(records: &[PriceRecord]) -> Self {
        let mut sums: BTreeMap<i32, (Money, u32)> = BTreeMap::new();
        for r in records {
            let entry = sums.entry(r.period.year).or_insert((Decimal::ZERO, 0));
            entry.0 = entry.0.saturating_add(r.unit_price_tl_per_mwh);
            entry.1 += 1;
        }
        let prices = sums
            .into_iter()
            .map(|(year, (sum, n))| (year, sum / Decimal::from(n)))
            .collect();
        Self { prices }
    }

    pub fn price_for(&self, year: i32) -> Option<Money> {
        self.prices.get(&year).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Period;
    use rust_decimal_macros::dec;

    fn price(year: i32, month: u32, value: Decimal) -> PriceRecord {
        PriceRecord {
            period: Period { year, month },
            unit_price_tl_per_mwh: value,
        }
    }

    #[test]
    fn test_yearly_average() {
        let prices = YearlyPrices::from_records(&[
            price(2023, 1, dec!(2000)),
            price(2023, 2, dec!(2400)),
            price(2024, 1, dec!(3000)),
        ]);
        assert_eq!(prices.price_for(2023), Some(dec!(2200)));
        assert_eq!(prices.price_for(2024), Some(dec!(3000)));
        assert_eq!(prices.price_for(2022), None);
    }

    #[test]
    fn test_empty_prices() {
        let prices = YearlyPrices::from_records(&[]);
        assert_eq!(prices.price_for(2024), None);
    }
}
