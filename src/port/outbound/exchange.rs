//! Exchange port for order-book snapshots and order submission.
//!
//! These are the integration points with the prediction market venue: one
//! read side ([`MarketData`]) and one write side ([`OrderVenue`]).

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{book::Book, id::OrderId, id::TokenId};
use crate::error::Result;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

/// Represents a limit order to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// The token/asset ID to trade.
    pub token_id: TokenId,
    /// Buy or Sell.
    pub side: OrderSide,
    /// Order size in whole shares.
    pub size: Decimal,
    /// Limit price, already rounded to the instrument's tick size.
    pub price: Decimal,
}

/// Acknowledgement for an order the venue accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedOrder {
    /// The order ID returned by the exchange.
    pub order_id: OrderId,
}

/// Source of fresh order-book snapshots.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch the current book for a token, or `None` if the venue has none.
    async fn order_book(&self, token_id: &TokenId) -> Result<Option<Book>>;
}

/// Venue that accepts orders.
#[async_trait]
pub trait OrderVenue: Send + Sync {
    /// Submit one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be built, signed or is rejected.
    async fn submit_order(&self, order: &OrderRequest) -> Result<SubmittedOrder>;

    /// Collateral (USDC) available to the trading account, in dollars.
    async fn collateral_balance(&self) -> Result<Decimal>;

    /// Smallest notional (price x size) the venue accepts.
    fn min_order_value(&self) -> Decimal;

    /// Get the exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;
}
