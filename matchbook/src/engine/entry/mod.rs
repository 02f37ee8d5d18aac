pub mod order;
pub mod trade;
pub mod user;

pub use order::{Order, OrderStatus, OrderType, Side, TimeInForce};
pub use trade::Trade;
pub use user::User;
