//! In-memory [`MarketData`] and [`OrderVenue`] doubles.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::book::Book;
use crate::domain::id::{OrderId, TokenId};
use crate::error::{Error, ExecutionError, Result};
use crate::port::outbound::exchange::{MarketData, OrderRequest, OrderVenue, SubmittedOrder};

/// Serves fixed books by token. Tokens without a book return `None`.
#[derive(Default)]
pub struct ScriptedMarketData {
    books: Mutex<HashMap<TokenId, Book>>,
    fail: bool,
    fetches: AtomicU32,
}

impl ScriptedMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(self, book: Book) -> Self {
        self.books.lock().insert(book.token_id().clone(), book);
        self
    }

    /// Every fetch fails with a transport-style error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Replace the book served for its token.
    pub fn set_book(&self, book: Book) {
        self.books.lock().insert(book.token_id().clone(), book);
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketData for ScriptedMarketData {
    async fn order_book(&self, token_id: &TokenId) -> Result<Option<Book>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Io(std::io::Error::other("book endpoint unreachable")));
        }
        Ok(self.books.lock().get(token_id).cloned())
    }
}

/// Accepts every order except those at configured failing prices, and
/// records what it was sent.
pub struct RecordingVenue {
    min_order_value: Decimal,
    balance: Decimal,
    failing_prices: HashSet<Decimal>,
    orders: Mutex<Vec<OrderRequest>>,
}

impl RecordingVenue {
    pub fn new(min_order_value: Decimal) -> Self {
        Self {
            min_order_value,
            balance: Decimal::ZERO,
            failing_prices: HashSet::new(),
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Report `balance` dollars of collateral.
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    /// Reject orders placed at `price`.
    pub fn rejecting_price(mut self, price: Decimal) -> Self {
        self.failing_prices.insert(price.normalize());
        self
    }

    /// Every order submitted, accepted or not.
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().clone()
    }
}

#[async_trait]
impl OrderVenue for RecordingVenue {
    async fn submit_order(&self, order: &OrderRequest) -> Result<SubmittedOrder> {
        let mut orders = self.orders.lock();
        orders.push(order.clone());
        if self.failing_prices.contains(&order.price.normalize()) {
            return Err(ExecutionError::OrderRejected(format!(
                "not enough liquidity at {}",
                order.price
            ))
            .into());
        }
        Ok(SubmittedOrder {
            order_id: OrderId::new(format!("order-{}", orders.len())),
        })
    }

    async fn collateral_balance(&self) -> Result<Decimal> {
        Ok(self.balance)
    }

    fn min_order_value(&self) -> Decimal {
        self.min_order_value
    }

    fn exchange_name(&self) -> &'static str {
        "recording"
    }
}
