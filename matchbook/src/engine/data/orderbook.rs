use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::engine::entry::{Order, OrderStatus, OrderType, Side, Trade};
use crate::engine::ids;
use crate::engine::matchlogic;
use crate::error::BookError;

/// The three structures guarded by a book's lock: two price-ordered sides
/// and the resident-order index. Within a price level, orders queue in
/// arrival order.
#[derive(Debug, Default)]
pub(crate) struct BookSides {
    pub bids: BTreeMap<Decimal, Vec<Order>>, // price -> orders, best at the back
    pub asks: BTreeMap<Decimal, Vec<Order>>, // price -> orders, best at the front
    pub orders_by_id: HashMap<String, Order>,
    seq: u64,
}

impl BookSides {
    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn insert_resting(&mut self, order: Order) {
        let levels = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        levels.entry(order.price).or_default().push(order.clone());
        self.orders_by_id.insert(order.order_id.clone(), order);
    }

    /// Removes an order from its side, dropping the level once empty. The
    /// index entry stays; callers decide its fate.
    pub fn remove_resting(&mut self, order_id: &str) -> Option<Order> {
        let (side, price) = {
            let order = self.orders_by_id.get(order_id)?;
            (order.side, order.price)
        };
        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let queue = levels.get_mut(&price)?;
        let pos = queue.iter().position(|o| o.order_id == order_id)?;
        let removed = queue.remove(pos);
        if queue.is_empty() {
            levels.remove(&price);
        }
        Some(removed)
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    pub fn resident_count(&self) -> usize {
        self.bids.values().map(Vec::len).sum::<usize>()
            + self.asks.values().map(Vec::len).sum::<usize>()
    }
}

/// Per-symbol order book: price-time ordered sides, an ID index, and the
/// matching pass. All mutating operations serialize on the internal write
/// lock; reads take shared access and return snapshots.
#[derive(Debug)]
pub struct OrderBook {
    symbol: String,
    sides: RwLock<BookSides>,
}

impl OrderBook {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            sides: RwLock::new(BookSides::default()),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Accepts a limit order into the book. The order is stamped with the
    /// book's arrival sequence inside the write section, which is what makes
    /// time priority follow lock-acquisition order.
    pub fn add(&self, mut order: Order) -> Result<Order, BookError> {
        if order.symbol != self.symbol {
            return Err(BookError::SymbolMismatch(self.symbol.clone()));
        }
        if order.order_type == OrderType::Market {
            return Err(BookError::MarketNotRestable);
        }
        if !order.is_valid() {
            return Err(BookError::InvalidOrder);
        }

        let mut sides = self.sides.write();
        if sides.orders_by_id.contains_key(&order.order_id) {
            return Err(BookError::DuplicateOrder(order.order_id));
        }
        order.accepted_seq = sides.next_seq();
        order.set_status(OrderStatus::Accepted);
        sides.insert_resting(order.clone());
        Ok(order)
    }

    /// Executes a market order immediate-or-cancel against the opposite
    /// side, at each resting counterparty's price. The order never rests: a
    /// remainder is cancelled, and only the ID index records the execution.
    pub fn execute_market(&self, mut order: Order) -> Result<(Order, Vec<Trade>), BookError> {
        if order.symbol != self.symbol {
            return Err(BookError::SymbolMismatch(self.symbol.clone()));
        }
        if !order.is_valid() {
            return Err(BookError::InvalidOrder);
        }

        let mut sides = self.sides.write();
        if sides.orders_by_id.contains_key(&order.order_id) {
            return Err(BookError::DuplicateOrder(order.order_id));
        }
        order.accepted_seq = sides.next_seq();
        order.set_status(OrderStatus::Accepted);
        let trades = matchlogic::sweep_taker(&self.symbol, &mut sides, &mut order);
        if order.remaining_quantity() > 0 {
            order.set_status(OrderStatus::Cancelled);
        }
        sides
            .orders_by_id
            .insert(order.order_id.clone(), order.clone());
        Ok((order, trades))
    }

    pub fn cancel(&self, order_id: &str) -> Result<Order, BookError> {
        let mut sides = self.sides.write();
        let resident = sides
            .orders_by_id
            .get(order_id)
            .ok_or_else(|| BookError::UnknownOrder(order_id.to_string()))?;
        if !resident.can_cancel() {
            return Err(BookError::NotCancellable(order_id.to_string()));
        }
        let mut order = sides
            .remove_resting(order_id)
            .ok_or_else(|| BookError::NotCancellable(order_id.to_string()))?;
        sides.orders_by_id.remove(order_id);
        order.set_status(OrderStatus::Cancelled);
        Ok(order)
    }

    /// Atomically replaces a resident order with an amended clone. The
    /// replacement keeps its order id but takes a fresh arrival sequence, so
    /// an amend always surrenders time priority. Any rejection leaves the
    /// book untouched.
    pub fn modify(
        &self,
        order_id: &str,
        new_quantity: u64,
        new_price: Decimal,
    ) -> Result<Order, BookError> {
        let mut sides = self.sides.write();
        let resident = sides
            .orders_by_id
            .get(order_id)
            .ok_or_else(|| BookError::UnknownOrder(order_id.to_string()))?;
        if !resident.can_modify() {
            return Err(BookError::NotModifiable(order_id.to_string()));
        }
        let mut replacement = resident.clone();
        if !replacement.set_quantity(new_quantity) {
            return Err(BookError::InvalidQuantity);
        }
        if !replacement.set_price(new_price) {
            return Err(BookError::InvalidPrice);
        }

        sides
            .remove_resting(order_id)
            .ok_or_else(|| BookError::NotModifiable(order_id.to_string()))?;
        replacement.set_status(OrderStatus::Accepted);
        replacement.created_at = ids::now_millis();
        replacement.accepted_seq = sides.next_seq();
        sides.insert_resting(replacement.clone());
        Ok(replacement)
    }

    /// Point lookup through the ID index. The index retains filled and
    /// market-executed orders, so the result can be a terminal order that no
    /// longer rests on a side.
    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.sides.read().orders_by_id.get(order_id).cloned()
    }

    /// Buy-side snapshot in priority order: highest price first, earliest
    /// arrival first within a level.
    pub fn buy_orders(&self) -> Vec<Order> {
        let sides = self.sides.read();
        sides
            .bids
            .values()
            .rev()
            .flat_map(|queue| queue.iter().cloned())
            .collect()
    }

    /// Sell-side snapshot in priority order: lowest price first.
    pub fn sell_orders(&self) -> Vec<Order> {
        let sides = self.sides.read();
        sides
            .asks
            .values()
            .flat_map(|queue| queue.iter().cloned())
            .collect()
    }

    /// Runs the price-time priority matching pass over the resting book and
    /// returns the trades it produced, in execution order.
    pub fn match_orders(&self) -> Vec<Trade> {
        let mut sides = self.sides.write();
        matchlogic::match_resting(&self.symbol, &mut sides)
    }

    pub fn best_bid(&self) -> Decimal {
        self.sides.read().best_bid().unwrap_or(Decimal::ZERO)
    }

    pub fn best_ask(&self) -> Decimal {
        self.sides.read().best_ask().unwrap_or(Decimal::ZERO)
    }

    pub fn spread(&self) -> Decimal {
        let sides = self.sides.read();
        sides.best_ask().unwrap_or(Decimal::ZERO) - sides.best_bid().unwrap_or(Decimal::ZERO)
    }

    /// Number of orders resting on the two sides.
    pub fn len(&self) -> usize {
        self.sides.read().resident_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
