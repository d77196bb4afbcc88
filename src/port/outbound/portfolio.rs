//! Portfolio port: positions held by a wallet.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::domain::position::Position;
use crate::error::Result;

/// Reports positions the venue marks as redeemable.
#[async_trait]
pub trait Portfolio: Send + Sync {
    /// List redeemable positions held by `owner` (the proxy wallet).
    async fn redeemable_positions(&self, owner: Address) -> Result<Vec<Position>>;
}
