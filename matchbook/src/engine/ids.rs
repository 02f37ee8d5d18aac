//! Identifier and clock helpers
//!
//! Opaque unique identifiers for orders and trades, and the wall-clock
//! timestamp carried on entities. Time priority inside a book does not rely
//! on clock resolution; books stamp their own arrival sequence.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Process-unique opaque identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
