//! In-memory, multi-symbol continuous limit-order-book matching engine.
//!
//! Each tradeable symbol owns a book with two price-time ordered sides.
//! The [`TradingEngine`] registers users, routes placements, amends and
//! cancels to the owning book, answers cross-book status queries, and
//! notifies observers of every trade and status transition. Matching runs
//! synchronously inside the placing call under strict price-time priority,
//! with executions printing at the resting order's price.
//!
//! All public entry points are safe to call from any thread: the engine and
//! every book carry their own reader-writer lock, and books on different
//! symbols match independently.

pub mod engine;
pub mod error;

pub use engine::data::OrderBook;
pub use engine::entry::{Order, OrderStatus, OrderType, Side, TimeInForce, Trade, User};
pub use engine::limits;
pub use engine::observer::{LogObserver, TradeObserver};
pub use engine::trading::TradingEngine;
pub use error::{BookError, EngineError};

#[cfg(test)]
mod tests;
