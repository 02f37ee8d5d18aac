use thiserror::Error;

/// Rejections raised by a single order book. Every variant leaves the book
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("order symbol does not match book {0}")]
    SymbolMismatch(String),
    #[error("order failed validation")]
    InvalidOrder,
    #[error("market orders never rest in the book")]
    MarketNotRestable,
    #[error("order {0} already exists in the book")]
    DuplicateOrder(String),
    #[error("order {0} is not in the book")]
    UnknownOrder(String),
    #[error("order {0} cannot be cancelled in its current status")]
    NotCancellable(String),
    #[error("order {0} cannot be modified in its current status")]
    NotModifiable(String),
    #[error("replacement quantity is out of range")]
    InvalidQuantity,
    #[error("replacement price is out of range")]
    InvalidPrice,
}

/// Rejections raised at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("user {0} is not registered")]
    UnknownUser(String),
    #[error("user {0} is already registered")]
    DuplicateUser(String),
    #[error("user record failed validation")]
    InvalidUser,
    #[error("order failed validation")]
    InvalidOrder,
    #[error("price must not be negative")]
    NegativePrice,
    #[error("order {0} does not exist")]
    UnknownOrder(String),
    #[error("order {0} is not owned by the requesting user")]
    NotOrderOwner(String),
    #[error("no book registered for symbol {0}")]
    UnknownSymbol(String),
    #[error(transparent)]
    Book(#[from] BookError),
}
