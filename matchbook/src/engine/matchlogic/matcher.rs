use rust_decimal::Decimal;

use crate::engine::data::orderbook::BookSides;
use crate::engine::entry::{Order, OrderType, Side, Trade};

/// Price-time priority pass over the resting book.
///
/// Pairs the best buy (highest price, earliest arrival) with the best sell
/// (lowest price, earliest arrival) until the book is uncrossed or a side
/// runs dry. Executions print at the resting sell price. Fully filled
/// orders leave their side but keep their ID index entry.
pub(crate) fn match_resting(symbol: &str, sides: &mut BookSides) -> Vec<Trade> {
    let mut trades = Vec::new();

    loop {
        let Some(bid_price) = sides.best_bid() else { break };
        let Some(ask_price) = sides.best_ask() else { break };
        if bid_price < ask_price {
            break;
        }

        let front_pair = {
            let buyer = sides.bids.get(&bid_price).and_then(|queue| queue.first());
            let seller = sides.asks.get(&ask_price).and_then(|queue| queue.first());
            match (buyer, seller) {
                (Some(buyer), Some(seller)) => Some((buyer.clone(), seller.clone())),
                _ => None,
            }
        };
        let Some((mut buyer, mut seller)) = front_pair else { break };

        let quantity = buyer.remaining_quantity().min(seller.remaining_quantity());
        buyer.fill(quantity);
        seller.fill(quantity);

        trades.push(Trade::new(
            symbol,
            Side::Buy,
            buyer.order_id.clone(),
            seller.order_id.clone(),
            ask_price,
            quantity,
        ));

        write_back(&mut sides.bids, bid_price, &buyer);
        write_back(&mut sides.asks, ask_price, &seller);
        sides.orders_by_id.insert(buyer.order_id.clone(), buyer);
        sides.orders_by_id.insert(seller.order_id.clone(), seller);
    }

    trades
}

/// Sweeps a taker against the opposite side, immediate-or-cancel: each fill
/// prints at the resting maker's price, and the taker never joins the book.
/// Market takers cross unconditionally; a limit taker stops at its price.
pub(crate) fn sweep_taker(symbol: &str, sides: &mut BookSides, taker: &mut Order) -> Vec<Trade> {
    let mut trades = Vec::new();

    while taker.remaining_quantity() > 0 {
        let level_price = match taker.side {
            Side::Buy => sides.best_ask(),
            Side::Sell => sides.best_bid(),
        };
        let Some(level_price) = level_price else { break };
        if !crosses(taker, level_price) {
            break;
        }

        let maker = {
            let makers = match taker.side {
                Side::Buy => sides.asks.get(&level_price),
                Side::Sell => sides.bids.get(&level_price),
            };
            makers.and_then(|queue| queue.first().cloned())
        };
        let Some(mut maker) = maker else { break };

        let quantity = taker.remaining_quantity().min(maker.remaining_quantity());
        taker.fill(quantity);
        maker.fill(quantity);

        let (buyer_order_id, seller_order_id) = match taker.side {
            Side::Buy => (taker.order_id.clone(), maker.order_id.clone()),
            Side::Sell => (maker.order_id.clone(), taker.order_id.clone()),
        };
        trades.push(Trade::new(
            symbol,
            taker.side,
            buyer_order_id,
            seller_order_id,
            level_price,
            quantity,
        ));

        let makers = match taker.side {
            Side::Buy => &mut sides.asks,
            Side::Sell => &mut sides.bids,
        };
        write_back(makers, level_price, &maker);
        sides.orders_by_id.insert(maker.order_id.clone(), maker);
    }

    trades
}

fn crosses(taker: &Order, resting_price: Decimal) -> bool {
    match taker.order_type {
        OrderType::Market => true,
        OrderType::Limit => match taker.side {
            Side::Buy => taker.price >= resting_price,
            Side::Sell => taker.price <= resting_price,
        },
    }
}

/// Replaces the front of a price level with the updated order, or pops it
/// once fully filled, dropping the level when it empties.
fn write_back(
    levels: &mut std::collections::BTreeMap<Decimal, Vec<Order>>,
    price: Decimal,
    order: &Order,
) {
    let Some(queue) = levels.get_mut(&price) else { return };
    if order.remaining_quantity() == 0 {
        if !queue.is_empty() {
            queue.remove(0);
        }
        if queue.is_empty() {
            levels.remove(&price);
        }
    } else if let Some(front) = queue.first_mut() {
        *front = order.clone();
    }
}
