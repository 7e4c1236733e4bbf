//! Monetary rounding for presentation.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places money is presented with.
pub const MONEY_SCALE: u32 = 2;

/// Rounds a monetary amount half-up to two decimal places.
///
/// The result always carries exactly two decimal places so it serializes as
/// e.g. `"65000.00"`. Use this only at the presentation boundary; stored
/// values keep full precision.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("4545.454545").unwrap()).to_string(), "4545.45");
/// assert_eq!(round_money(Decimal::from_str("0.125").unwrap()).to_string(), "0.13");
/// assert_eq!(round_money(Decimal::new(65000, 0)).to_string(), "65000.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Rounds every amount in a named map.
pub fn round_money_map(amounts: &BTreeMap<String, Decimal>) -> BTreeMap<String, Decimal> {
    amounts
        .iter()
        .map(|(name, amount)| (name.clone(), round_money(*amount)))
        .collect()
}
