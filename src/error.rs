use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Order execution errors with structured variants.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("invalid token ID '{token_id}': {reason}")]
    InvalidTokenId { token_id: String, reason: String },

    #[error("no order book available for token {token_id}")]
    BookUnavailable { token_id: String },

    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("failed to build order: {0}")]
    OrderBuildFailed(String),

    #[error("failed to sign order: {0}")]
    SigningFailed(String),

    #[error("failed to submit order: {0}")]
    SubmissionFailed(String),

    #[error("failed to query collateral balance: {0}")]
    BalanceQuery(String),
}

/// On-chain read, signing and submission errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{call} failed: {reason}")]
    Call { call: &'static str, reason: String },

    #[error("failed to sign wallet transaction hash: {0}")]
    SigningFailed(String),

    #[error("failed to submit wallet transaction: {0}")]
    SubmissionFailed(String),

    #[error("failed to query receipt for {tx_hash}: {reason}")]
    ReceiptQuery { tx_hash: String, reason: String },
}

/// Pending-redemption persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pending redemption file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "polymarket")]
    #[error("Polymarket SDK error: {0}")]
    Polymarket(#[from] polymarket_client_sdk::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

impl Error {
    /// Whether the failure is a network-level problem worth retrying later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::Ledger(LedgerError::Call { .. } | LedgerError::ReceiptQuery { .. }) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_call_failures_are_transient() {
        let err: Error = LedgerError::Call {
            call: "payoutNumerators",
            reason: "connection reset".into(),
        }
        .into();
        assert!(err.is_transient());
    }

    #[test]
    fn submission_failures_are_not_transient() {
        let err: Error = LedgerError::SubmissionFailed("nonce too low".into()).into();
        assert!(!err.is_transient());
        assert_eq!(
            err.to_string(),
            "failed to submit wallet transaction: nonce too low"
        );
    }

    #[test]
    fn config_error_messages_name_the_field() {
        let err: Error = ConfigError::MissingField {
            field: "wallet.funder_address",
        }
        .into();
        assert_eq!(
            err.to_string(),
            "missing required field: wallet.funder_address"
        );
    }
}
