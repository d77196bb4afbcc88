//! Budget- and price-capped purchases against an ask ladder.
//!
//! [`OrderBookExecutor::simulate`] previews a fill against a snapshot without
//! side effects. [`OrderBookExecutor::execute`] realizes one by submitting a
//! limit order per ladder level.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::book::Book;
use crate::domain::execution::{ExecutionRequest, ExecutionResult, LevelFailure, LevelFill};
use crate::error::{ExecutionError, Result};
use crate::port::outbound::exchange::{MarketData, OrderRequest, OrderSide, OrderVenue};

/// Walks ask ladders to preview or execute purchases.
pub struct OrderBookExecutor {
    market_data: Arc<dyn MarketData>,
    venue: Arc<dyn OrderVenue>,
}

impl OrderBookExecutor {
    pub fn new(market_data: Arc<dyn MarketData>, venue: Arc<dyn OrderVenue>) -> Self {
        Self { market_data, venue }
    }

    /// Preview the fill `request` would get against `book`.
    ///
    /// Levels are consumed best price first while the price is within the
    /// cap. The level that would overrun the budget is taken fractionally,
    /// spending exactly the remaining budget, and the walk stops there.
    #[must_use]
    pub fn simulate(book: &Book, request: &ExecutionRequest) -> ExecutionResult {
        let mut shares = Decimal::ZERO;
        let mut cost = Decimal::ZERO;

        for level in book.asks_up_to(request.max_price()) {
            let level_cost = level.notional();

            if let Some(budget) = request.max_budget() {
                if cost + level_cost > budget {
                    let remaining = budget - cost;
                    if remaining > Decimal::ZERO {
                        shares += remaining / level.price();
                        cost += remaining;
                    }
                    break;
                }
            }

            shares += level.size();
            cost += level_cost;
        }

        ExecutionResult::from_totals(shares, cost, request.days_to_expiry())
    }

    /// Collateral the venue account can spend, in dollars.
    ///
    /// # Errors
    ///
    /// Returns the venue error if the balance cannot be read.
    pub async fn collateral_balance(&self) -> Result<Decimal> {
        self.venue.collateral_balance().await
    }

    /// Fetch the current book and simulate against it.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::BookUnavailable`] if the venue has no book,
    /// or the market data error if the fetch fails.
    pub async fn preview(&self, request: &ExecutionRequest) -> Result<(Book, ExecutionResult)> {
        let book = self.fresh_book(request).await?;
        let result = Self::simulate(&book, request);
        Ok((book, result))
    }

    /// Buy along the ladder, one order per level.
    ///
    /// The book is fetched again here and may differ from whatever book a
    /// preview was computed on. No attempt is made to reconcile the two: the
    /// price cap and budget are the only guards.
    ///
    /// Each level's price is rounded to the tick size and its size floored to
    /// whole shares, then capped by the whole shares the remaining budget
    /// buys. Levels whose notional is below the venue minimum are skipped. A
    /// rejected order is logged and the walk continues with the next level,
    /// so the result may be a partial fill.
    ///
    /// # Errors
    ///
    /// Only fetching the book can fail the call; order failures are reported
    /// in [`ExecutionResult::failures`].
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult> {
        let book = self.fresh_book(request).await?;
        let min_order_value = self.venue.min_order_value();
        let mut remaining_budget = request.max_budget();

        let mut shares = Decimal::ZERO;
        let mut cost = Decimal::ZERO;
        let mut fills = Vec::new();
        let mut failures = Vec::new();

        info!(
            token_id = %request.token_id(),
            max_price = %request.max_price(),
            max_budget = ?request.max_budget(),
            levels = book.asks_up_to(request.max_price()).count(),
            exchange = self.venue.exchange_name(),
            "Executing ladder purchase"
        );

        for level in book.asks_up_to(request.max_price()) {
            let price = book.round_to_tick(level.price());
            if price <= Decimal::ZERO || price > request.max_price() {
                debug!(price = %level.price(), "Rounded price outside cap, skipping level");
                continue;
            }

            let mut size = level.size().floor();
            if let Some(budget) = remaining_budget {
                let affordable = (budget / price).floor();
                if affordable < Decimal::ONE {
                    break;
                }
                size = size.min(affordable);
            }
            if size <= Decimal::ZERO {
                continue;
            }

            let notional = price * size;
            if notional < min_order_value {
                debug!(
                    price = %price,
                    size = %size,
                    notional = %notional,
                    min_order_value = %min_order_value,
                    "Level below minimum order value, skipping"
                );
                continue;
            }

            let order = OrderRequest {
                token_id: request.token_id().clone(),
                side: OrderSide::Buy,
                size,
                price,
            };

            match self.venue.submit_order(&order).await {
                Ok(ack) => {
                    shares += size;
                    cost += notional;
                    if let Some(budget) = remaining_budget.as_mut() {
                        *budget -= notional;
                    }
                    fills.push(LevelFill {
                        order_id: ack.order_id,
                        price,
                        size,
                    });
                }
                Err(e) => {
                    warn!(
                        token_id = %request.token_id(),
                        price = %price,
                        size = %size,
                        error = %e,
                        "Level order failed, continuing with next level"
                    );
                    failures.push(LevelFailure {
                        price,
                        size,
                        error: e.to_string(),
                    });
                }
            }
        }

        let result = ExecutionResult::from_totals(shares, cost, request.days_to_expiry())
            .with_levels(fills, failures);

        if result.success {
            info!(
                shares = %result.shares_filled,
                avg_price = %result.avg_price.round_dp(4),
                total_cost = %result.total_cost,
                partial = result.is_partial(),
                "Ladder purchase filled"
            );
        } else {
            warn!(
                token_id = %request.token_id(),
                failures = result.failures.len(),
                "Ladder purchase bought nothing"
            );
        }

        Ok(result)
    }

    async fn fresh_book(&self, request: &ExecutionRequest) -> Result<Book> {
        self.market_data
            .order_book(request.token_id())
            .await?
            .ok_or_else(|| {
                ExecutionError::BookUnavailable {
                    token_id: request.token_id().to_string(),
                }
                .into()
            })
    }
}
