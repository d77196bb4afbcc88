//! Order-book execution settings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::execution::DEFAULT_DAYS_TO_EXPIRY;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutionConfig {
    /// Levels whose notional falls below this many USDC are skipped.
    #[serde(default = "default_min_order_value")]
    pub min_order_value: Decimal,
    /// Days to expiry assumed for APY when a request gives none.
    #[serde(default = "default_days_to_expiry")]
    pub default_days_to_expiry: Decimal,
}

fn default_min_order_value() -> Decimal {
    dec!(1)
}

const fn default_days_to_expiry() -> Decimal {
    DEFAULT_DAYS_TO_EXPIRY
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            min_order_value: default_min_order_value(),
            default_days_to_expiry: default_days_to_expiry(),
        }
    }
}
