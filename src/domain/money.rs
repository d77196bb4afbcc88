//! Monetary types for price and volume representation.

use rust_decimal::Decimal;

/// Price of one outcome share in USD, between 0 and 1.
pub type Price = Decimal;

/// Share count.
pub type Volume = Decimal;
