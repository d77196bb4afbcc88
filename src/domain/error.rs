//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use bracketeer::domain::error::DomainError;
//! use bracketeer::domain::execution::ExecutionRequest;
//! use bracketeer::domain::id::TokenId;
//! use rust_decimal_macros::dec;
//!
//! let result = ExecutionRequest::try_new(TokenId::new("t"), dec!(1.2), None);
//! assert!(matches!(result, Err(DomainError::MaxPriceOutOfRange { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A limit price must lie strictly between 0 and 1.
    #[error("max price must be between 0 and 1 (exclusive), got {max_price}")]
    MaxPriceOutOfRange {
        /// The rejected price.
        max_price: rust_decimal::Decimal,
    },

    /// A spending cap, when given, must be positive.
    #[error("max budget must be positive, got {max_budget}")]
    NonPositiveBudget {
        /// The rejected budget.
        max_budget: rust_decimal::Decimal,
    },

    /// Condition identifiers must be 32-byte hex strings.
    #[error("invalid condition id {condition_id}: {reason}")]
    InvalidConditionId {
        /// The rejected identifier.
        condition_id: String,
        /// Why it failed to parse.
        reason: String,
    },

    /// A condition already has an in-flight redemption.
    #[error("condition {condition_id} already has a pending redemption")]
    DuplicatePendingRedemption {
        /// The condition that is already tracked.
        condition_id: String,
    },
}
