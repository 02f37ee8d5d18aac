use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::entry::Side;
use crate::engine::ids;

/// Immutable execution record. The side tags the aggressing party of the
/// match that produced the trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub symbol: String,
    pub side: Side,
    pub buyer_order_id: String,
    pub seller_order_id: String,
    pub price: Decimal,
    pub quantity: u64,
    pub executed_at: u64,
}

impl Trade {
    pub fn new(
        symbol: &str,
        side: Side,
        buyer_order_id: String,
        seller_order_id: String,
        price: Decimal,
        quantity: u64,
    ) -> Self {
        Self {
            trade_id: ids::new_id(),
            symbol: symbol.to_string(),
            side,
            buyer_order_id,
            seller_order_id,
            price,
            quantity,
            executed_at: ids::now_millis(),
        }
    }

    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
