//! Held outcome-token positions as reported by the portfolio service.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ConditionId;

/// A position held by the proxy wallet in one market condition.
///
/// Positions are re-fetched every redemption cycle and never mutated
/// locally; a copy is kept inside each pending redemption for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub condition_id: ConditionId,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_pnl: Decimal,
    pub title: String,
    pub outcome: String,
    #[serde(alias = "proxyWallet")]
    pub proxy_wallet_address: Address,
    #[serde(alias = "negativeRisk", default)]
    pub is_negative_risk: bool,
}

impl Position {
    /// A winning position worth redeeming: realized gain and appreciated value.
    #[must_use]
    pub fn is_redemption_candidate(&self) -> bool {
        self.cash_pnl > Decimal::ZERO && self.current_value > self.initial_value
    }
}
