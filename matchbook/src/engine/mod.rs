//! Matching Engine Module
//!
//! This module contains the core components of the matching engine system:
//! - `data`: the per-symbol order book structure
//! - `entry`: order, trade, and user entities
//! - `ids`: identifier and clock helpers
//! - `limits`: system-wide order constraints
//! - `matchlogic`: matching algorithms
//! - `observer`: event sinks for trades and status changes
//! - `trading`: the engine-wide registry and public trading engine

pub mod data;
pub mod entry;
pub mod ids;
pub mod limits;
pub mod matchlogic;
pub mod observer;
pub mod trading;
