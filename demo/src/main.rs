//! Console demonstration driver for the matchbook engine
//!
//! Wires a printing observer into a fresh engine and walks through the
//! core flows: placement, matching, partial fills, cancel, amend, market
//! sweeps, and a multi-threaded stress pass.

mod config;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use matchbook::{Order, OrderStatus, Side, Trade, TradeObserver, TradingEngine, User};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short = 'c', long = "config", default_value_t = String::from("./config/config.toml"))]
    config: String,
    /// Override the number of stress threads
    #[arg(long)]
    stress_threads: Option<usize>,
    /// Override the number of stress orders per thread
    #[arg(long)]
    stress_orders: Option<usize>,
}

/// Observer that mirrors every event onto the console, counting as it goes.
#[derive(Default)]
struct ConsoleObserver {
    trade_count: AtomicUsize,
    status_count: AtomicUsize,
}

impl TradeObserver for ConsoleObserver {
    fn on_trade_executed(&self, trade: &Trade) {
        self.trade_count.fetch_add(1, Ordering::Relaxed);
        println!(
            "[TRADE] {} qty {} @ {} buyer {} seller {}",
            trade.symbol, trade.quantity, trade.price, trade.buyer_order_id, trade.seller_order_id
        );
    }

    fn on_order_status_changed(&self, order: &Order) {
        self.status_count.fetch_add(1, Ordering::Relaxed);
        println!(
            "[ORDER] {} {} {:?} remaining {}",
            order.symbol,
            order.order_id,
            order.status,
            order.remaining_quantity()
        );
    }
}

fn register_users(engine: &TradingEngine) {
    for (id, name, phone, email) in [
        ("U1", "Asha", "9000000001", "asha@example.com"),
        ("U2", "Bharat", "9000000002", "bharat@example.com"),
        ("U3", "Chitra", "9000000003", "chitra@example.com"),
    ] {
        engine
            .register_user(User::new(id, name, phone, email))
            .expect("demo users register once");
    }
}

fn run_symmetric_cross(engine: &TradingEngine) {
    println!("\n=== Symmetric cross ===");
    let buy = engine
        .place("U2", Side::Buy, "WIPRO", 100, dec!(500))
        .expect("buy accepted");
    let sell = engine
        .place("U3", Side::Sell, "WIPRO", 100, dec!(500))
        .expect("sell accepted");

    let buy = engine.order_status("U2", &buy.order_id).expect("queryable");
    let sell = engine
        .order_status("U3", &sell.order_id)
        .expect("queryable");
    println!(
        "buy -> {:?}, sell -> {:?} (both should be Filled)",
        buy.status, sell.status
    );
}

fn run_price_time_priority(engine: &TradingEngine) {
    println!("\n=== Price-time priority ===");
    let first = engine
        .place("U1", Side::Buy, "INFY", 100, dec!(1800))
        .expect("first bid");
    engine
        .place("U1", Side::Buy, "INFY", 100, dec!(1800))
        .expect("second bid");
    engine
        .place("U1", Side::Sell, "INFY", 100, dec!(1800))
        .expect("ask");

    let first = engine
        .order_status("U1", &first.order_id)
        .expect("queryable");
    println!(
        "earliest bid -> {:?} (the t0 order trades first)",
        first.status
    );
}

fn run_partial_fill(engine: &TradingEngine) {
    println!("\n=== Partial fill ===");
    let buy = engine
        .place("U1", Side::Buy, "SBIN", 1000, dec!(600))
        .expect("bid");
    engine
        .place("U2", Side::Sell, "SBIN", 300, dec!(600))
        .expect("ask one");
    engine
        .place("U2", Side::Sell, "SBIN", 400, dec!(600))
        .expect("ask two");

    let buy = engine.order_status("U1", &buy.order_id).expect("queryable");
    println!(
        "buyer -> {:?}, filled {}, remaining {}",
        buy.status,
        buy.filled_quantity,
        buy.remaining_quantity()
    );
}

fn run_cancel(engine: &TradingEngine) {
    println!("\n=== Cancel idempotence ===");
    let order = engine
        .place("U1", Side::Buy, "TCS", 50, dec!(3200))
        .expect("bid");
    let cancelled = engine.cancel("U1", &order.order_id).is_ok();
    let repeated = engine.cancel("U1", &order.order_id).is_ok();
    println!("first cancel: {cancelled}, second cancel: {repeated}");
}

fn run_amend(engine: &TradingEngine) {
    println!("\n=== Amend ===");
    let order = engine
        .place("U1", Side::Buy, "HDFC", 100, dec!(1500))
        .expect("bid");
    engine
        .modify("U1", &order.order_id, 150, dec!(1600))
        .expect("amend accepted");
    let amended = engine
        .order_status("U1", &order.order_id)
        .expect("queryable");
    println!(
        "amended -> qty {}, price {}, same id: {}",
        amended.quantity,
        amended.price,
        amended.order_id == order.order_id
    );
}

fn run_market_sweep(engine: &TradingEngine) {
    println!("\n=== Market sweep ===");
    engine
        .place("U1", Side::Buy, "ITC", 100, dec!(440))
        .expect("bid");
    engine
        .place("U1", Side::Buy, "ITC", 100, dec!(438))
        .expect("deeper bid");
    let market = engine
        .place("U2", Side::Sell, "ITC", 150, Decimal::ZERO)
        .expect("market sell");
    println!(
        "market sell -> {:?}, filled {} (remainder cancelled, never rests)",
        market.status, market.filled_quantity
    );
}

fn run_rejections(engine: &TradingEngine) {
    println!("\n=== Rejections ===");
    let zero_quantity = engine.place("U1", Side::Buy, "RELIANCE", 0, dec!(2500));
    let negative_price = engine.place("U1", Side::Buy, "RELIANCE", 100, dec!(-100));
    let oversize = engine.place("U1", Side::Buy, "RELIANCE", 10_000_000, dec!(2500));
    let no_symbol = engine.place("U1", Side::Buy, "", 100, dec!(2500));
    for (label, result) in [
        ("zero quantity", zero_quantity),
        ("negative price", negative_price),
        ("oversize quantity", oversize),
        ("empty symbol", no_symbol),
    ] {
        match result {
            Ok(_) => println!("{label}: unexpectedly accepted"),
            Err(err) => println!("{label}: rejected ({err})"),
        }
    }
}

fn run_book_queries(engine: &TradingEngine) {
    println!("\n=== Book queries ===");
    engine
        .place("U1", Side::Buy, "ICICI", 100, dec!(950))
        .expect("bid");
    engine
        .place("U1", Side::Buy, "ICICI", 200, dec!(940))
        .expect("bid");
    engine
        .place("U2", Side::Sell, "ICICI", 150, dec!(960))
        .expect("ask");

    let book = engine.book("ICICI").expect("book exists");
    println!(
        "best bid {}, best ask {}, spread {}",
        book.best_bid(),
        book.best_ask(),
        book.spread()
    );
    println!(
        "depth: {} bids, {} asks",
        book.buy_orders().len(),
        book.sell_orders().len()
    );
    println!("U1 has {} orders on record", engine.user_orders("U1").len());
}

fn run_stress(engine: &Arc<TradingEngine>, symbol: &str, threads: usize, per_thread: usize) {
    println!("\n=== Stress: {threads} threads x {per_thread} orders on {symbol} ===");
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let engine = engine.clone();
            let symbol = symbol.to_string();
            thread::spawn(move || {
                for i in 0..per_thread {
                    let side = if t % 2 == 0 { Side::Buy } else { Side::Sell };
                    let price = Decimal::from(1000 + (i % 100) as u64);
                    if engine.place("U3", side, &symbol, 10, price).is_err() {
                        log::warn!("stress placement rejected");
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        if handle.join().is_err() {
            log::warn!("stress thread panicked");
        }
    }

    let book = engine.book(symbol).expect("stress book exists");
    println!(
        "book after stress: {} resting, best bid {}, best ask {}",
        book.len(),
        book.best_bid(),
        book.best_ask()
    );
}

fn main() {
    env_logger::try_init().unwrap_or_default();
    let args = Args::parse();
    config::DemoConfig::from_toml(&args.config).expect("Config is missing");

    let mut cfg = match config::instance().lock() {
        Ok(cfg) => cfg.clone(),
        Err(_) => config::DemoConfig::new(),
    };
    if let Some(threads) = args.stress_threads {
        cfg.stress_threads = threads;
    }
    if let Some(orders) = args.stress_orders {
        cfg.stress_orders = orders;
    }

    let engine = Arc::new(TradingEngine::new());
    let console = Arc::new(ConsoleObserver::default());
    let handle: Arc<dyn TradeObserver> = console.clone();
    engine.register_observer(&handle);

    register_users(&engine);

    run_symmetric_cross(&engine);
    run_price_time_priority(&engine);
    run_partial_fill(&engine);
    run_cancel(&engine);
    run_amend(&engine);
    run_market_sweep(&engine);
    run_rejections(&engine);
    run_book_queries(&engine);
    run_stress(
        &engine,
        &cfg.stress_symbol,
        cfg.stress_threads,
        cfg.stress_orders,
    );

    // the stress pass also proves a filled order stays queryable
    let sample = engine
        .user_orders("U3")
        .into_iter()
        .find(|o| o.status == OrderStatus::Filled);
    if let Some(order) = sample {
        println!(
            "\nfilled order {} still queryable with filled {}",
            order.order_id, order.filled_quantity
        );
    }

    println!(
        "\ndone: {} trades, {} status changes observed",
        console.trade_count.load(Ordering::Relaxed),
        console.status_count.load(Ordering::Relaxed)
    );
}
