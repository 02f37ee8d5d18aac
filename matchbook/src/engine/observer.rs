//! Observer contract
//!
//! Sinks for trade executions and order status transitions. The engine
//! notifies observers synchronously on the mutating thread, after state is
//! committed and outside every lock, so observers may call back into the
//! engine. Registration hands the engine a weak handle only; dropping the
//! observer elsewhere is enough to stop deliveries.

use crate::engine::entry::{Order, Trade};

pub trait TradeObserver: Send + Sync {
    fn on_trade_executed(&self, trade: &Trade);
    fn on_order_status_changed(&self, order: &Order);
}

/// Diagnostic sink mirroring engine events onto the log facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl TradeObserver for LogObserver {
    fn on_trade_executed(&self, trade: &Trade) {
        log::info!(
            "trade {} {} qty {} @ {} buyer {} seller {}",
            trade.trade_id,
            trade.symbol,
            trade.quantity,
            trade.price,
            trade.buyer_order_id,
            trade.seller_order_id
        );
    }

    fn on_order_status_changed(&self, order: &Order) {
        log::info!(
            "order {} {} {:?} filled {}/{}",
            order.order_id,
            order.symbol,
            order.status,
            order.filled_quantity,
            order.quantity
        );
    }
}
