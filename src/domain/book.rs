//! Order book snapshot types.
//!
//! - [`PriceLevel`] - A single price level with size
//! - [`Book`] - Snapshot of one token's order book
//!
//! Asks are held ascending by price (best ask first) and bids descending,
//! regardless of the order the venue delivered them in. The CLOB REST
//! endpoint returns asks best-last, so [`Book::with_levels`] sorts.
//!
//! # Examples
//!
//! ```
//! use bracketeer::domain::book::{Book, PriceLevel};
//! use bracketeer::domain::id::TokenId;
//! use rust_decimal_macros::dec;
//!
//! let asks = vec![
//!     PriceLevel::new(dec!(0.47), dec!(300)),
//!     PriceLevel::new(dec!(0.46), dec!(150)),
//! ];
//!
//! let book = Book::with_levels(TokenId::new("no-token"), vec![], asks);
//!
//! assert_eq!(book.best_ask().unwrap().price(), dec!(0.46));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::id::TokenId;
use super::money::{Price, Volume};

/// Tick size assumed when the venue does not report one.
pub const DEFAULT_TICK_SIZE: Decimal = dec!(0.01);

/// A single price level in an order book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    price: Price,
    size: Volume,
}

impl PriceLevel {
    /// Creates a new price level.
    #[must_use]
    pub const fn new(price: Price, size: Volume) -> Self {
        Self { price, size }
    }

    /// Returns the price at this level.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the total volume available at this level.
    #[must_use]
    pub const fn size(&self) -> Volume {
        self.size
    }

    /// Cost of taking the whole level.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price * self.size
    }
}

/// Order book snapshot for a single token.
#[derive(Debug, Clone)]
pub struct Book {
    token_id: TokenId,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    tick_size: Decimal,
}

impl Book {
    /// Creates an empty order book.
    #[must_use]
    pub const fn new(token_id: TokenId) -> Self {
        Self {
            token_id,
            bids: Vec::new(),
            asks: Vec::new(),
            tick_size: DEFAULT_TICK_SIZE,
        }
    }

    /// Creates a book from price levels in any order.
    ///
    /// Levels with a non-positive price or a negative size are dropped.
    #[must_use]
    pub fn with_levels(token_id: TokenId, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        let valid = |level: &PriceLevel| level.price > Decimal::ZERO && level.size >= Decimal::ZERO;

        let mut bids: Vec<_> = bids.into_iter().filter(valid).collect();
        let mut asks: Vec<_> = asks.into_iter().filter(valid).collect();
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));

        Self {
            token_id,
            bids,
            asks,
            tick_size: DEFAULT_TICK_SIZE,
        }
    }

    /// Sets the minimum price increment reported by the venue.
    #[must_use]
    pub fn with_tick_size(mut self, tick_size: Decimal) -> Self {
        if tick_size > Decimal::ZERO {
            self.tick_size = tick_size;
        }
        self
    }

    /// Returns the token ID for this book.
    #[must_use]
    pub const fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    /// Returns all bid levels (sorted by price descending).
    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Returns all ask levels (sorted by price ascending).
    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Returns the best bid (highest buy price).
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Returns the best ask (lowest sell price).
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Minimum price increment for this instrument.
    #[must_use]
    pub const fn tick_size(&self) -> Decimal {
        self.tick_size
    }

    /// Asks priced at or below `max_price`, best first.
    pub fn asks_up_to(&self, max_price: Price) -> impl Iterator<Item = &PriceLevel> {
        self.asks.iter().take_while(move |level| level.price <= max_price)
    }

    /// Round `price` to the nearest multiple of the tick size, halves away
    /// from zero.
    #[must_use]
    pub fn round_to_tick(&self, price: Price) -> Price {
        let ticks = (price / self.tick_size)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        (ticks * self.tick_size).normalize()
    }
}
