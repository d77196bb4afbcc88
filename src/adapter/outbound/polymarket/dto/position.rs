//! Data API `/positions` response entries.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{id::ConditionId, position::Position};

/// One position as reported by the Data API. Amounts arrive as JSON numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub proxy_wallet: Address,
    pub condition_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_pnl: Decimal,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub redeemable: bool,
    #[serde(default)]
    pub negative_risk: bool,
}

impl From<PositionResponse> for Position {
    fn from(p: PositionResponse) -> Self {
        Self {
            condition_id: ConditionId::from(p.condition_id),
            size: p.size,
            current_value: p.current_value,
            initial_value: p.initial_value,
            cash_pnl: p.cash_pnl,
            title: p.title,
            outcome: p.outcome,
            proxy_wallet_address: p.proxy_wallet,
            is_negative_risk: p.negative_risk,
        }
    }
}
