//! Match Logic Module
//!
//! Core matching algorithms for the order book: the resting-book
//! price-time priority pass and the immediate-or-cancel taker sweep used
//! for market orders. Both run under the owning book's write lock.

pub mod matcher;

pub(crate) use matcher::{match_resting, sweep_taker};
