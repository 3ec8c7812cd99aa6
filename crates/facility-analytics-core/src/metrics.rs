//! Derived-metric primitives.
//!
//! Every function here is total: zero or negative denominators resolve to
//! zero instead of an error, so aggregation code never has to null-check.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{CapacityRatio, Money, Mwh, Percent, Rate, Tons};

/// Hours in a (non-leap) year, the theoretical operating window.
pub const HOURS_PER_YEAR: Decimal = dec!(8760);

/// Zero-guarded division: `numerator / denominator`, or zero when the
/// denominator is not strictly positive or the quotient overflows.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Collapse a stored capacity ratio to a fraction. Values above 1 were
/// stored as percentages.
pub fn normalize_capacity_ratio(raw: Decimal) -> Rate {
    if raw > Decimal::ONE {
        raw / dec!(100)
    } else {
        raw
    }
}

/// Theoretical expected production: `capacity × 8760 × ratio`, or zero
/// when the product exceeds the decimal range.
pub fn efficiency_denominator(installed_capacity_mw: Decimal, ratio: CapacityRatio) -> Mwh {
    installed_capacity_mw
        .checked_mul(HOURS_PER_YEAR)
        .and_then(|v| v.checked_mul(ratio.fraction()))
        .unwrap_or(Decimal::ZERO)
}

/// Realised production as a fraction of expected production.
pub fn efficiency(production_mwh: Mwh, installed_capacity_mw: Decimal, ratio: CapacityRatio) -> Rate {
    safe_div(
        production_mwh,
        efficiency_denominator(installed_capacity_mw, ratio),
    )
}

/// Tons of CO2 per MWh produced.
pub fn carbon_intensity(carbon_tons: Tons, production_mwh: Mwh) -> Decimal {
    safe_div(carbon_tons, production_mwh)
}

/// Realised revenue per MWh.
pub fn unit_price(revenue_tl: Money, production_mwh: Mwh) -> Money {
    safe_div(revenue_tl, production_mwh)
}

pub fn net_profit(revenue_tl: Money, cost_tl: Money) -> Money {
    revenue_tl.saturating_sub(cost_tl)
}

/// Profit margin on the 0-100 scale.
pub fn margin(profit_tl: Money, revenue_tl: Money) -> Percent {
    safe_div(profit_tl, revenue_tl).saturating_mul(dec!(100))
}

/// Net profit per MWh produced.
pub fn profit_per_mwh(profit_tl: Money, production_mwh: Mwh) -> Money {
    safe_div(profit_tl, production_mwh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_guards() {
        assert_eq!(safe_div(dec!(10), dec!(0)), Decimal::ZERO);
        assert_eq!(safe_div(dec!(10), dec!(-2)), Decimal::ZERO);
        assert_eq!(safe_div(dec!(10), dec!(4)), dec!(2.5));
    }

    #[test]
    fn test_normalize_capacity_ratio() {
        assert_eq!(normalize_capacity_ratio(dec!(0.9)), dec!(0.9));
        assert_eq!(normalize_capacity_ratio(dec!(90)), dec!(0.9));
        // Exactly 1 is already a fraction
        assert_eq!(normalize_capacity_ratio(dec!(1)), dec!(1));
    }

    #[test]
    fn test_efficiency_reference_facility() {
        // 20 MW, 90% expected utilisation, 100,000 MWh
        // denominator = 20 * 8760 * 0.9 = 157,680
        let ratio = CapacityRatio::from_stored(dec!(90));
        assert_eq!(efficiency_denominator(dec!(20), ratio), dec!(157680));
        let eff = efficiency(dec!(100000), dec!(20), ratio);
        assert!(
            (eff - dec!(0.6342)).abs() < dec!(0.0001),
            "Expected efficiency ~0.6342, got {eff}"
        );
    }

    #[test]
    fn test_efficiency_zero_capacity() {
        let ratio = CapacityRatio::from_stored(dec!(0.5));
        assert_eq!(efficiency(dec!(1000), Decimal::ZERO, ratio), Decimal::ZERO);
        assert_eq!(
            efficiency(dec!(1000), dec!(10), CapacityRatio::from_stored(Decimal::ZERO)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_out_of_range_inputs_do_not_panic() {
        let ratio = CapacityRatio::from_stored(Decimal::ONE);
        assert_eq!(efficiency_denominator(Decimal::MAX, ratio), Decimal::ZERO);
        assert_eq!(efficiency(dec!(1000), Decimal::MAX, ratio), Decimal::ZERO);
        assert_eq!(net_profit(Decimal::MAX, Decimal::MIN), Decimal::MAX);
        assert_eq!(margin(Decimal::MAX, dec!(0.5)), Decimal::MAX);
    }

    #[test]
    fn test_carbon_intensity() {
        assert_eq!(carbon_intensity(dec!(520), dec!(1000)), dec!(0.52));
        assert_eq!(carbon_intensity(dec!(520), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_unit_price_and_profit() {
        assert_eq!(unit_price(dec!(250000), dec!(100)), dec!(2500));
        assert_eq!(net_profit(dec!(100), dec!(130)), dec!(-30));
    }

    #[test]
    fn test_margin() {
        assert_eq!(margin(dec!(25), dec!(100)), dec!(25));
        assert_eq!(margin(dec!(25), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(margin(dec!(-50), dec!(200)), dec!(-25));
    }

    #[test]
    fn test_profit_per_mwh() {
        assert_eq!(profit_per_mwh(dec!(5000), dec!(100)), dec!(50));
        assert_eq!(profit_per_mwh(dec!(5000), Decimal::ZERO), Decimal::ZERO);
    }
}
