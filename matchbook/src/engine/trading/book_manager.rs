//! Book Management Module
//!
//! Registry of per-symbol order books. Books are created lazily on the
//! first order for a symbol and live for the process lifetime; they are
//! handed out as shared handles so callers can work on a book without
//! holding the engine lock.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::data::OrderBook;

#[derive(Debug, Default)]
pub struct BookManager {
    books: HashMap<String, Arc<OrderBook>>,
}

impl BookManager {
    pub fn new() -> Self {
        Self {
            books: HashMap::new(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<Arc<OrderBook>> {
        self.books.get(symbol).cloned()
    }

    pub fn get_or_create(&mut self, symbol: &str) -> Arc<OrderBook> {
        self.books
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(OrderBook::new(symbol)))
            .clone()
    }

    pub fn all(&self) -> Vec<Arc<OrderBook>> {
        self.books.values().cloned().collect()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.books.keys().cloned().collect()
    }
}
