//! Budget- and price-capped purchase requests and their results.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::DomainError;
use super::id::{OrderId, TokenId};
use super::money::{Price, Volume};

/// Days-to-expiry used for APY when the caller does not supply one.
pub const DEFAULT_DAYS_TO_EXPIRY: Decimal = dec!(30);

/// A request to buy up to `max_budget` of a token at no more than `max_price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    token_id: TokenId,
    max_price: Price,
    max_budget: Option<Decimal>,
    days_to_expiry: Decimal,
}

impl ExecutionRequest {
    /// Build a validated request.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MaxPriceOutOfRange`] unless `0 < max_price < 1`,
    /// and [`DomainError::NonPositiveBudget`] for a zero or negative budget.
    pub fn try_new(
        token_id: TokenId,
        max_price: Price,
        max_budget: Option<Decimal>,
    ) -> Result<Self, DomainError> {
        if max_price <= Decimal::ZERO || max_price >= Decimal::ONE {
            return Err(DomainError::MaxPriceOutOfRange { max_price });
        }
        if let Some(max_budget) = max_budget {
            if max_budget <= Decimal::ZERO {
                return Err(DomainError::NonPositiveBudget { max_budget });
            }
        }

        Ok(Self {
            token_id,
            max_price,
            max_budget,
            days_to_expiry: DEFAULT_DAYS_TO_EXPIRY,
        })
    }

    /// Override the days remaining until the market resolves.
    #[must_use]
    pub fn with_days_to_expiry(mut self, days: Decimal) -> Self {
        self.days_to_expiry = days;
        self
    }

    #[must_use]
    pub const fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    #[must_use]
    pub const fn max_price(&self) -> Price {
        self.max_price
    }

    #[must_use]
    pub const fn max_budget(&self) -> Option<Decimal> {
        self.max_budget
    }

    #[must_use]
    pub const fn days_to_expiry(&self) -> Decimal {
        self.days_to_expiry
    }
}

/// One ladder level that the venue accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFill {
    pub order_id: OrderId,
    pub price: Price,
    pub size: Volume,
}

/// One ladder level whose order submission failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFailure {
    pub price: Price,
    pub size: Volume,
    pub error: String,
}

/// Aggregate outcome of a simulated or executed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub shares_filled: Volume,
    pub total_cost: Decimal,
    pub avg_price: Price,
    pub apy: Decimal,
    pub profit: Decimal,
    pub success: bool,
    pub fills: Vec<LevelFill>,
    pub failures: Vec<LevelFailure>,
}

impl ExecutionResult {
    /// Derive price, yield and APY figures from filled totals.
    ///
    /// Each share pays out 1 on a winning resolution, so the yield per share
    /// is `1 - avg_price`.
    #[must_use]
    pub fn from_totals(shares_filled: Volume, total_cost: Decimal, days_to_expiry: Decimal) -> Self {
        let avg_price = if shares_filled > Decimal::ZERO {
            total_cost / shares_filled
        } else {
            Decimal::ZERO
        };
        let yield_per_share = Decimal::ONE - avg_price;
        let profit = if shares_filled > Decimal::ZERO {
            yield_per_share * shares_filled
        } else {
            Decimal::ZERO
        };
        let apy = if avg_price > Decimal::ZERO && days_to_expiry > Decimal::ZERO {
            (yield_per_share / avg_price) * (dec!(365) / days_to_expiry) * dec!(100)
        } else {
            Decimal::ZERO
        };

        Self {
            shares_filled,
            total_cost,
            avg_price,
            apy,
            profit,
            success: shares_filled > Decimal::ZERO,
            fills: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Attach per-level outcomes from a real execution.
    #[must_use]
    pub fn with_levels(mut self, fills: Vec<LevelFill>, failures: Vec<LevelFailure>) -> Self {
        self.fills = fills;
        self.failures = failures;
        self
    }

    /// True when some but not all attempted levels were accepted.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.fills.is_empty() && !self.failures.is_empty()
    }
}
