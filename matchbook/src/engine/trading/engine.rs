use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::engine::data::OrderBook;
use crate::engine::entry::{Order, OrderType, Side, Trade, User};
use crate::engine::observer::TradeObserver;
use crate::engine::trading::BookManager;
use crate::error::{BookError, EngineError};

#[derive(Default)]
struct EngineState {
    users: HashMap<String, User>,
    books: BookManager,
    /// Engine-wide index of every order ever placed, keyed by order id.
    /// Authoritative for status queries; entries survive fills and cancels.
    all_orders: HashMap<String, Order>,
    observers: Vec<Weak<dyn TradeObserver>>,
}

/// Process-wide trading engine: the user registry, the per-symbol books,
/// the engine-wide order index, and the observer set.
///
/// One lock guards the engine state; each book carries its own. The engine
/// lock is held only for registry reads and index updates, released before
/// every book call and before every observer callback, so books on
/// different symbols match in parallel and observers may re-enter.
pub struct TradingEngine {
    state: RwLock<EngineState>,
}

impl TradingEngine {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(EngineState::default()),
        }
    }

    pub fn register_user(&self, user: User) -> Result<(), EngineError> {
        if !user.is_valid() {
            return Err(EngineError::InvalidUser);
        }
        let mut state = self.state.write();
        if state.users.contains_key(&user.user_id) {
            return Err(EngineError::DuplicateUser(user.user_id));
        }
        log::debug!("registered user {}", user.user_id);
        state.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.state.read().users.get(user_id).cloned()
    }

    /// Places an order: a limit when `price > 0`, a market order when the
    /// price is zero. On success the accepted order is reported to
    /// observers, the book's matching pass runs, and every resulting trade
    /// is reported in execution order. Returns the post-match view of the
    /// placed order.
    pub fn place(
        &self,
        user_id: &str,
        side: Side,
        symbol: &str,
        quantity: u64,
        price: Decimal,
    ) -> Result<Order, EngineError> {
        if self.get_user(user_id).is_none() {
            return Err(EngineError::UnknownUser(user_id.to_string()));
        }
        if price < Decimal::ZERO {
            return Err(EngineError::NegativePrice);
        }

        let order = if price > Decimal::ZERO {
            Order::new_limit(user_id, symbol, side, quantity, price)
        } else {
            Order::new_market(user_id, symbol, side, quantity)
        };
        if !order.is_valid() {
            return Err(EngineError::InvalidOrder);
        }
        let order_id = order.order_id.clone();
        let order_type = order.order_type;

        // The index entry goes in first so the order is queryable from the
        // moment the book sees it; the write section stays short.
        let book = {
            let mut state = self.state.write();
            state.all_orders.insert(order_id.clone(), order.clone());
            state.books.get_or_create(symbol)
        };

        let placed = match order_type {
            OrderType::Limit => book.add(order),
            OrderType::Market => match book.execute_market(order) {
                Ok((executed, trades)) => {
                    self.refresh_order(&executed);
                    self.refresh_trade_participants(&book, &trades);
                    self.notify_order_status_changed(&executed);
                    for trade in &trades {
                        self.notify_trade_executed(trade);
                    }
                    return Ok(executed);
                }
                Err(err) => Err(err),
            },
        };

        let accepted = match placed {
            Ok(accepted) => accepted,
            Err(err) => {
                // A rejected placement leaves no trace behind.
                self.state.write().all_orders.remove(&order_id);
                return Err(err.into());
            }
        };

        self.refresh_order(&accepted);
        self.notify_order_status_changed(&accepted);

        let trades = book.match_orders();
        self.refresh_trade_participants(&book, &trades);
        for trade in &trades {
            self.notify_trade_executed(trade);
        }

        Ok(book.get(&order_id).unwrap_or(accepted))
    }

    /// Cancels a resting order owned by the user. Succeeds at most once;
    /// repeat attempts and attempts on terminal orders are rejected without
    /// touching any state.
    pub fn cancel(&self, user_id: &str, order_id: &str) -> Result<Order, EngineError> {
        if self.get_user(user_id).is_none() {
            return Err(EngineError::UnknownUser(user_id.to_string()));
        }

        let books = {
            let state = self.state.read();
            let order = state
                .all_orders
                .get(order_id)
                .ok_or_else(|| EngineError::UnknownOrder(order_id.to_string()))?;
            if order.user_id != user_id {
                return Err(EngineError::NotOrderOwner(order_id.to_string()));
            }
            state.books.all()
        };

        for book in books {
            if book.get(order_id).is_some() {
                let cancelled = book.cancel(order_id)?;
                self.refresh_order(&cancelled);
                self.notify_order_status_changed(&cancelled);
                return Ok(cancelled);
            }
        }

        // Known to the engine but resident in no book: already cancelled.
        Err(BookError::NotCancellable(order_id.to_string()).into())
    }

    /// Amends a resting order owned by the user. The order id survives, the
    /// time priority does not; a successful amend re-runs the book's
    /// matching pass.
    pub fn modify(
        &self,
        user_id: &str,
        order_id: &str,
        new_quantity: u64,
        new_price: Decimal,
    ) -> Result<Order, EngineError> {
        if self.get_user(user_id).is_none() {
            return Err(EngineError::UnknownUser(user_id.to_string()));
        }
        if new_price < Decimal::ZERO {
            return Err(EngineError::NegativePrice);
        }

        let book = {
            let state = self.state.read();
            let order = state
                .all_orders
                .get(order_id)
                .ok_or_else(|| EngineError::UnknownOrder(order_id.to_string()))?;
            if order.user_id != user_id {
                return Err(EngineError::NotOrderOwner(order_id.to_string()));
            }
            state
                .books
                .get(&order.symbol)
                .ok_or_else(|| EngineError::UnknownSymbol(order.symbol.clone()))?
        };

        let modified = book.modify(order_id, new_quantity, new_price)?;
        self.refresh_order(&modified);
        self.notify_order_status_changed(&modified);

        let trades = book.match_orders();
        self.refresh_trade_participants(&book, &trades);
        for trade in &trades {
            self.notify_trade_executed(trade);
        }

        Ok(book.get(order_id).unwrap_or(modified))
    }

    /// Returns the engine's view of an order, current as of its last
    /// committed mutation, iff it is owned by the requesting user.
    pub fn order_status(&self, user_id: &str, order_id: &str) -> Result<Order, EngineError> {
        if self.get_user(user_id).is_none() {
            return Err(EngineError::UnknownUser(user_id.to_string()));
        }
        let state = self.state.read();
        match state.all_orders.get(order_id) {
            Some(order) if order.user_id == user_id => Ok(order.clone()),
            Some(_) => Err(EngineError::NotOrderOwner(order_id.to_string())),
            None => Err(EngineError::UnknownOrder(order_id.to_string())),
        }
    }

    /// Every order the user has ever placed, terminal ones included. Empty
    /// for unknown users.
    pub fn user_orders(&self, user_id: &str) -> Vec<Order> {
        let state = self.state.read();
        if !state.users.contains_key(user_id) {
            return Vec::new();
        }
        state
            .all_orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Shared handle to a symbol's book, for market-data point queries.
    pub fn book(&self, symbol: &str) -> Option<Arc<OrderBook>> {
        self.state.read().books.get(symbol)
    }

    /// Symbols that have a live book.
    pub fn symbols(&self) -> Vec<String> {
        self.state.read().books.symbols()
    }

    pub fn register_observer(&self, observer: &Arc<dyn TradeObserver>) {
        let mut state = self.state.write();
        state.observers.retain(|weak| weak.strong_count() > 0);
        state.observers.push(Arc::downgrade(observer));
    }

    pub fn unregister_observer(&self, observer: &Arc<dyn TradeObserver>) {
        // compare allocation addresses; vtable pointers are not stable
        let target = Arc::as_ptr(observer) as *const ();
        let mut state = self.state.write();
        state.observers.retain(|weak| {
            weak.strong_count() > 0 && Weak::as_ptr(weak) as *const () != target
        });
    }

    fn refresh_order(&self, order: &Order) {
        self.state
            .write()
            .all_orders
            .insert(order.order_id.clone(), order.clone());
    }

    /// Pulls the post-match state of every order named by the trades out of
    /// the book index and folds it into the engine index. Book reads happen
    /// before the engine lock is taken, so the two locks never nest.
    fn refresh_trade_participants(&self, book: &OrderBook, trades: &[Trade]) {
        if trades.is_empty() {
            return;
        }
        let mut updated = Vec::new();
        for trade in trades {
            for order_id in [&trade.buyer_order_id, &trade.seller_order_id] {
                if let Some(order) = book.get(order_id) {
                    updated.push(order);
                }
            }
        }
        let mut state = self.state.write();
        for order in updated {
            state.all_orders.insert(order.order_id.clone(), order);
        }
    }

    fn live_observers(&self) -> Vec<Arc<dyn TradeObserver>> {
        self.state
            .read()
            .observers
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    // Observer callbacks run on a copy of the observer list, after every
    // lock has been released.
    fn notify_trade_executed(&self, trade: &Trade) {
        for observer in self.live_observers() {
            observer.on_trade_executed(trade);
        }
    }

    fn notify_order_status_changed(&self, order: &Order) {
        for observer in self.live_observers() {
            observer.on_order_status_changed(order);
        }
    }
}

impl Default for TradingEngine {
    fn default() -> Self {
        Self::new()
    }
}
