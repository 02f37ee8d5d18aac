use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::engine::entry::{Order, OrderStatus, Side, Trade, User};
use crate::engine::observer::TradeObserver;
use crate::engine::trading::TradingEngine;
use crate::error::{BookError, EngineError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Trade(String),
    Status(String, OrderStatus),
}

#[derive(Default)]
struct RecordingObserver {
    trades: Mutex<Vec<Trade>>,
    status_changes: Mutex<Vec<Order>>,
    timeline: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    fn trades(&self) -> Vec<Trade> {
        self.trades.lock().clone()
    }

    fn status_changes(&self) -> Vec<Order> {
        self.status_changes.lock().clone()
    }

    fn timeline(&self) -> Vec<Event> {
        self.timeline.lock().clone()
    }
}

impl TradeObserver for RecordingObserver {
    fn on_trade_executed(&self, trade: &Trade) {
        self.trades.lock().push(trade.clone());
        self.timeline
            .lock()
            .push(Event::Trade(trade.trade_id.clone()));
    }

    fn on_order_status_changed(&self, order: &Order) {
        self.status_changes.lock().push(order.clone());
        self.timeline
            .lock()
            .push(Event::Status(order.order_id.clone(), order.status));
    }
}

fn engine_with_users() -> TradingEngine {
    let engine = TradingEngine::new();
    for (id, name) in [("U1", "Asha"), ("U2", "Bharat"), ("U3", "Chitra")] {
        engine
            .register_user(User::new(id, name, "9000000000", "desk@example.com"))
            .unwrap();
    }
    engine
}

fn observed(engine: &TradingEngine) -> Arc<RecordingObserver> {
    let observer = Arc::new(RecordingObserver::default());
    let handle: Arc<dyn TradeObserver> = observer.clone();
    engine.register_observer(&handle);
    // `observer` shares the allocation, so the engine's weak handle stays live
    observer
}

#[test]
fn symmetric_cross_fills_both_orders() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    let buy = engine
        .place("U2", Side::Buy, "WIPRO", 100, dec!(500))
        .unwrap();
    let sell = engine
        .place("U3", Side::Sell, "WIPRO", 100, dec!(500))
        .unwrap();

    let trades = observer.trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].symbol, "WIPRO");
    assert_eq!(trades[0].quantity, 100);
    assert_eq!(trades[0].price, dec!(500));
    assert_eq!(trades[0].buyer_order_id, buy.order_id);
    assert_eq!(trades[0].seller_order_id, sell.order_id);

    for (user, order) in [("U2", &buy), ("U3", &sell)] {
        let status = engine.order_status(user, &order.order_id).unwrap();
        assert_eq!(status.status, OrderStatus::Filled);
        assert_eq!(status.remaining_quantity(), 0);
    }
}

#[test]
fn earlier_order_at_same_price_trades_first() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    let first = engine
        .place("U1", Side::Buy, "INFY", 100, dec!(1800))
        .unwrap();
    let second = engine
        .place("U1", Side::Buy, "INFY", 100, dec!(1800))
        .unwrap();
    engine
        .place("U1", Side::Sell, "INFY", 100, dec!(1800))
        .unwrap();

    let trades = observer.trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].buyer_order_id, first.order_id);

    let untouched = engine.order_status("U1", &second.order_id).unwrap();
    assert_eq!(untouched.status, OrderStatus::Accepted);
}

#[test]
fn partial_fills_accumulate() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    let buy = engine
        .place("U1", Side::Buy, "SBIN", 1000, dec!(600))
        .unwrap();
    engine
        .place("U2", Side::Sell, "SBIN", 300, dec!(600))
        .unwrap();
    engine
        .place("U2", Side::Sell, "SBIN", 400, dec!(600))
        .unwrap();

    let trades = observer.trades();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].quantity, 300);
    assert_eq!(trades[1].quantity, 400);
    assert!(trades.iter().all(|t| t.price == dec!(600)));

    let status = engine.order_status("U1", &buy.order_id).unwrap();
    assert_eq!(status.status, OrderStatus::PartiallyFilled);
    assert_eq!(status.filled_quantity, 700);
    assert_eq!(status.remaining_quantity(), 300);
}

#[test]
fn cancel_succeeds_at_most_once() {
    let engine = engine_with_users();

    let order = engine
        .place("U1", Side::Buy, "TCS", 50, dec!(3200))
        .unwrap();

    let cancelled = engine.cancel("U1", &order.order_id).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(
        engine
            .order_status("U1", &order.order_id)
            .unwrap()
            .status,
        OrderStatus::Cancelled
    );

    let repeat = engine.cancel("U1", &order.order_id);
    assert_eq!(
        repeat,
        Err(EngineError::Book(BookError::NotCancellable(
            order.order_id.clone()
        )))
    );
    assert_eq!(
        engine
            .order_status("U1", &order.order_id)
            .unwrap()
            .status,
        OrderStatus::Cancelled
    );
}

#[test]
fn amend_changes_terms_and_keeps_the_id() {
    let engine = engine_with_users();

    let order = engine
        .place("U1", Side::Buy, "HDFC", 100, dec!(1500))
        .unwrap();
    engine
        .modify("U1", &order.order_id, 150, dec!(1600))
        .unwrap();

    let status = engine.order_status("U1", &order.order_id).unwrap();
    assert_eq!(status.order_id, order.order_id);
    assert_eq!(status.quantity, 150);
    assert_eq!(status.price, dec!(1600));
    assert_eq!(status.status, OrderStatus::Accepted);
}

#[test]
fn amend_can_cross_and_trade() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    let buy = engine
        .place("U1", Side::Buy, "HDFC", 100, dec!(1500))
        .unwrap();
    engine
        .place("U2", Side::Sell, "HDFC", 100, dec!(1550))
        .unwrap();
    assert!(observer.trades().is_empty());

    let modified = engine
        .modify("U1", &buy.order_id, 100, dec!(1550))
        .unwrap();

    assert_eq!(observer.trades().len(), 1);
    assert_eq!(observer.trades()[0].price, dec!(1550));
    assert_eq!(modified.status, OrderStatus::Filled);
}

#[test]
fn negative_price_is_rejected_without_state_change() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    let result = engine.place("U1", Side::Buy, "RELIANCE", 100, dec!(-100));
    assert_eq!(result, Err(EngineError::NegativePrice));
    assert!(engine.user_orders("U1").is_empty());
    assert!(engine.book("RELIANCE").is_none());
    assert!(observer.timeline().is_empty());
}

#[test]
fn no_cross_leaves_both_orders_resting() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    engine
        .place("U1", Side::Buy, "AXIS", 10, dec!(1000))
        .unwrap();
    engine
        .place("U2", Side::Sell, "AXIS", 10, dec!(1010))
        .unwrap();

    assert!(observer.trades().is_empty());
    let book = engine.book("AXIS").unwrap();
    assert_eq!(book.best_bid(), dec!(1000));
    assert_eq!(book.best_ask(), dec!(1010));
    assert_eq!(book.spread(), dec!(10));
}

#[test]
fn boundary_placements_are_rejected() {
    let engine = engine_with_users();

    assert_eq!(
        engine.place("U1", Side::Buy, "TCS", 0, dec!(100)),
        Err(EngineError::InvalidOrder)
    );
    assert_eq!(
        engine.place("U1", Side::Buy, "TCS", 1_000_001, dec!(100)),
        Err(EngineError::InvalidOrder)
    );
    assert_eq!(
        engine.place("U1", Side::Buy, "", 100, dec!(100)),
        Err(EngineError::InvalidOrder)
    );
    assert!(engine.user_orders("U1").is_empty());
}

#[test]
fn unknown_users_are_rejected_everywhere() {
    let engine = engine_with_users();
    let order = engine
        .place("U1", Side::Buy, "TCS", 50, dec!(3200))
        .unwrap();

    let ghost = "NOBODY";
    assert_eq!(
        engine.place(ghost, Side::Buy, "TCS", 10, dec!(100)),
        Err(EngineError::UnknownUser(ghost.to_string()))
    );
    assert_eq!(
        engine.cancel(ghost, &order.order_id),
        Err(EngineError::UnknownUser(ghost.to_string()))
    );
    assert_eq!(
        engine.modify(ghost, &order.order_id, 10, dec!(100)),
        Err(EngineError::UnknownUser(ghost.to_string()))
    );
    assert_eq!(
        engine.order_status(ghost, &order.order_id),
        Err(EngineError::UnknownUser(ghost.to_string()))
    );
    assert!(engine.user_orders(ghost).is_empty());
}

#[test]
fn ownership_is_enforced() {
    let engine = engine_with_users();
    let order = engine
        .place("U1", Side::Buy, "TCS", 50, dec!(3200))
        .unwrap();

    assert_eq!(
        engine.cancel("U2", &order.order_id),
        Err(EngineError::NotOrderOwner(order.order_id.clone()))
    );
    assert_eq!(
        engine.modify("U2", &order.order_id, 60, dec!(3300)),
        Err(EngineError::NotOrderOwner(order.order_id.clone()))
    );
    assert_eq!(
        engine.order_status("U2", &order.order_id),
        Err(EngineError::NotOrderOwner(order.order_id.clone()))
    );
}

#[test]
fn duplicate_and_invalid_users_are_rejected() {
    let engine = engine_with_users();
    assert_eq!(
        engine.register_user(User::new("U1", "Again", "1", "a@b.c")),
        Err(EngineError::DuplicateUser("U1".to_string()))
    );
    assert_eq!(
        engine.register_user(User::new("", "Nameless", "1", "a@b.c")),
        Err(EngineError::InvalidUser)
    );
}

#[test]
fn market_order_executes_and_never_rests() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    engine
        .place("U1", Side::Buy, "ITC", 100, dec!(440))
        .unwrap();
    let market = engine
        .place("U2", Side::Sell, "ITC", 150, Decimal::ZERO)
        .unwrap();

    let trades = observer.trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, dec!(440));
    assert_eq!(trades[0].quantity, 100);

    assert_eq!(market.status, OrderStatus::Cancelled);
    assert_eq!(market.filled_quantity, 100);
    let book = engine.book("ITC").unwrap();
    assert!(book.sell_orders().is_empty());
    assert_eq!(book.best_bid(), Decimal::ZERO);

    // price never left the zero sentinel
    let status = engine.order_status("U2", &market.order_id).unwrap();
    assert_eq!(status.price, Decimal::ZERO);
}

#[test]
fn market_order_on_empty_book_is_cancelled() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    let market = engine
        .place("U1", Side::Buy, "ITC", 50, Decimal::ZERO)
        .unwrap();

    assert!(observer.trades().is_empty());
    assert_eq!(market.status, OrderStatus::Cancelled);
    assert_eq!(market.filled_quantity, 0);
}

#[test]
fn status_events_precede_their_trades() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    let buy = engine
        .place("U2", Side::Buy, "WIPRO", 100, dec!(500))
        .unwrap();
    let sell = engine
        .place("U3", Side::Sell, "WIPRO", 100, dec!(500))
        .unwrap();

    let timeline = observer.timeline();
    assert_eq!(timeline.len(), 3);
    assert_eq!(
        timeline[0],
        Event::Status(buy.order_id.clone(), OrderStatus::Accepted)
    );
    assert_eq!(
        timeline[1],
        Event::Status(sell.order_id.clone(), OrderStatus::Accepted)
    );
    assert!(matches!(timeline[2], Event::Trade(_)));
}

#[test]
fn dropped_observers_stop_receiving_events() {
    let engine = engine_with_users();

    let observer = Arc::new(RecordingObserver::default());
    let handle: Arc<dyn TradeObserver> = observer.clone();
    engine.register_observer(&handle);

    engine
        .place("U1", Side::Buy, "TCS", 10, dec!(3200))
        .unwrap();
    assert_eq!(observer.status_changes().len(), 1);

    // the engine holds only a weak handle; dropping every strong one is
    // enough to end deliveries
    let weak = Arc::downgrade(&observer);
    drop(handle);
    drop(observer);
    assert!(weak.upgrade().is_none());

    engine
        .place("U1", Side::Buy, "TCS", 10, dec!(3100))
        .unwrap();
}

#[test]
fn unregistered_observers_stop_receiving_events() {
    let engine = engine_with_users();

    let observer = Arc::new(RecordingObserver::default());
    let handle: Arc<dyn TradeObserver> = observer.clone();
    engine.register_observer(&handle);
    engine.unregister_observer(&handle);

    engine
        .place("U1", Side::Buy, "TCS", 10, dec!(3200))
        .unwrap();
    assert!(observer.status_changes().is_empty());
}

#[test]
fn books_are_independent_per_symbol() {
    let engine = engine_with_users();
    let observer = observed(&engine);

    engine
        .place("U1", Side::Buy, "TATASTEEL", 100, dec!(120))
        .unwrap();
    engine
        .place("U2", Side::Sell, "TATAMOTORS", 100, dec!(120))
        .unwrap();

    // equal prices on different symbols never cross
    assert!(observer.trades().is_empty());
    let mut symbols = engine.symbols();
    symbols.sort();
    assert_eq!(symbols, vec!["TATAMOTORS", "TATASTEEL"]);
}

#[test]
fn user_orders_returns_exactly_the_owners_orders() {
    let engine = engine_with_users();

    let mine = [
        engine
            .place("U1", Side::Buy, "ICICI", 100, dec!(950))
            .unwrap(),
        engine
            .place("U1", Side::Sell, "ICICI", 150, dec!(960))
            .unwrap(),
    ];
    engine
        .place("U2", Side::Buy, "ICICI", 200, dec!(940))
        .unwrap();

    let orders = engine.user_orders("U1");
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.user_id == "U1"));
    for placed in &mine {
        assert!(orders.iter().any(|o| o.order_id == placed.order_id));
    }
}

#[test]
fn placements_from_many_threads_keep_the_book_consistent() {
    let engine = Arc::new(engine_with_users());
    let threads = 4;
    let per_thread = 50;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let engine = engine.clone();
            thread::spawn(move || {
                for i in 0..per_thread {
                    let side = if t % 2 == 0 { Side::Buy } else { Side::Sell };
                    let price = Decimal::from(1000 + (i % 10) as u64);
                    engine
                        .place("U1", side, "AXIS", 10, price)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.user_orders("U1").len(), threads * per_thread);

    let book = engine.book("AXIS").unwrap();
    assert!(book.match_orders().is_empty());
    let (bid, ask) = (book.best_bid(), book.best_ask());
    if bid > Decimal::ZERO && ask > Decimal::ZERO {
        assert!(bid < ask);
    }
    for resting in book.buy_orders().into_iter().chain(book.sell_orders()) {
        assert!(resting.remaining_quantity() > 0);
    }
}
