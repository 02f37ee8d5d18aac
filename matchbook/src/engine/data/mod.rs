//! Data Structures Module
//!
//! Core data structures of the matching engine: the per-symbol order book
//! with its price-ordered sides and resident-order index.

pub mod orderbook;

pub use orderbook::OrderBook;
