use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::ids;
use crate::engine::limits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeInForce {
    #[default]
    Gtc,
    Ioc,
    Fok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Accepted,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Limit price; the zero sentinel for market orders, never mutated.
    pub price: Decimal,
    pub quantity: u64,
    pub filled_quantity: u64,
    pub status: OrderStatus,
    pub created_at: u64,
    /// Book arrival sequence, stamped inside the owning book's write section.
    /// Breaks price ties: lower sequence trades first.
    pub accepted_seq: u64,
}

impl Order {
    pub fn new_limit(user_id: &str, symbol: &str, side: Side, quantity: u64, price: Decimal) -> Self {
        Self {
            order_id: ids::new_id(),
            user_id: user_id.to_string(),
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Gtc,
            price,
            quantity,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            created_at: ids::now_millis(),
            accepted_seq: 0,
        }
    }

    pub fn new_market(user_id: &str, symbol: &str, side: Side, quantity: u64) -> Self {
        Self {
            order_id: ids::new_id(),
            user_id: user_id.to_string(),
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Gtc,
            price: Decimal::ZERO,
            quantity,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            created_at: ids::now_millis(),
            accepted_seq: 0,
        }
    }

    pub fn remaining_quantity(&self) -> u64 {
        self.quantity - self.filled_quantity
    }

    pub fn is_filled(&self) -> bool {
        self.filled_quantity >= self.quantity
    }

    pub fn can_modify(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Accepted)
    }

    pub fn can_cancel(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Pending | OrderStatus::Accepted | OrderStatus::PartiallyFilled
        )
    }

    pub fn set_quantity(&mut self, new_quantity: u64) -> bool {
        if !limits::quantity_in_band(new_quantity) || !self.can_modify() {
            return false;
        }
        self.quantity = new_quantity;
        true
    }

    pub fn set_price(&mut self, new_price: Decimal) -> bool {
        if self.order_type == OrderType::Market {
            return false;
        }
        if !limits::price_in_band(new_price) || !self.can_modify() {
            return false;
        }
        self.price = new_price;
        true
    }

    pub fn set_status(&mut self, new_status: OrderStatus) {
        self.status = new_status;
    }

    /// Applies a fill and drives the status. A quantity above the remainder
    /// is ignored; callers size fills with `remaining_quantity`.
    pub fn fill(&mut self, fill_quantity: u64) {
        if fill_quantity > self.remaining_quantity() {
            return;
        }
        self.filled_quantity += fill_quantity;
        if self.filled_quantity == self.quantity {
            self.status = OrderStatus::Filled;
        } else if self.filled_quantity > 0 {
            self.status = OrderStatus::PartiallyFilled;
        }
    }

    pub fn is_valid(&self) -> bool {
        if self.order_id.is_empty() || self.user_id.is_empty() || self.symbol.is_empty() {
            return false;
        }
        if !limits::quantity_in_band(self.quantity) {
            return false;
        }
        match self.order_type {
            OrderType::Limit => limits::price_in_band(self.price),
            OrderType::Market => self.price >= Decimal::ZERO,
        }
    }
}
