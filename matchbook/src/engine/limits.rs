//! System-wide order constraints
//!
//! Bounds on quantity and price applied to every order on entry and on
//! amendment. Prices are fixed-point decimals, so band checks are exact.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const MAX_ORDER_QUANTITY: u64 = 1_000_000;
pub const MIN_ORDER_PRICE: Decimal = dec!(0.01);
pub const MAX_ORDER_PRICE: Decimal = dec!(1000000);

pub fn quantity_in_band(quantity: u64) -> bool {
    quantity > 0 && quantity <= MAX_ORDER_QUANTITY
}

pub fn price_in_band(price: Decimal) -> bool {
    price >= MIN_ORDER_PRICE && price <= MAX_ORDER_PRICE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_band_edges() {
        assert!(!quantity_in_band(0));
        assert!(quantity_in_band(1));
        assert!(quantity_in_band(MAX_ORDER_QUANTITY));
        assert!(!quantity_in_band(MAX_ORDER_QUANTITY + 1));
    }

    #[test]
    fn price_band_edges() {
        assert!(!price_in_band(dec!(0)));
        assert!(!price_in_band(dec!(0.009)));
        assert!(price_in_band(MIN_ORDER_PRICE));
        assert!(price_in_band(MAX_ORDER_PRICE));
        assert!(!price_in_band(dec!(1000000.01)));
    }
}
