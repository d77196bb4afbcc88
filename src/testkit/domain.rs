//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions so tests focus on assertions rather
//! than construction boilerplate.

use alloy_primitives::{Address, B256};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::book::{Book, PriceLevel};
use crate::domain::id::{ConditionId, TokenId};
use crate::domain::position::Position;
use crate::domain::redemption::PendingRedemption;

/// Create a [`TokenId`] from a string.
pub fn token(id: &str) -> TokenId {
    TokenId::new(id)
}

/// A 32-byte condition id whose last byte is `n`, as hex.
pub fn condition_hex(n: u8) -> String {
    let mut bytes = [0u8; 32];
    bytes[31] = n;
    B256::from(bytes).to_string()
}

/// Book with the given `(price, size)` asks and no bids.
pub fn ask_ladder(token_id: &str, asks: &[(Decimal, Decimal)]) -> Book {
    Book::with_levels(
        token(token_id),
        vec![],
        asks.iter()
            .map(|&(price, size)| PriceLevel::new(price, size))
            .collect(),
    )
}

/// A winning position in condition `n` held by `wallet`.
pub fn winning_position(n: u8, wallet: Address) -> Position {
    Position {
        condition_id: ConditionId::new(condition_hex(n)),
        size: dec!(100),
        current_value: dec!(100),
        initial_value: dec!(45),
        cash_pnl: dec!(55),
        title: format!("Market {n}"),
        outcome: "No".to_string(),
        proxy_wallet_address: wallet,
        is_negative_risk: false,
    }
}

/// A losing position: worth less than it cost.
pub fn losing_position(n: u8, wallet: Address) -> Position {
    Position {
        current_value: dec!(0),
        cash_pnl: dec!(-45),
        ..winning_position(n, wallet)
    }
}

/// Pending redemption for a winning position in condition `n`.
pub fn pending(n: u8, tx_hash: B256, wallet: Address) -> PendingRedemption {
    PendingRedemption::new(tx_hash, winning_position(n, wallet), 1_700_000_000_000)
}

/// A transaction hash whose last byte is `n`.
pub fn tx_hash(n: u8) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xaa;
    bytes[31] = n;
    B256::from(bytes)
}
