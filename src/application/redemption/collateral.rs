//! Collateral detection for a resolved condition.

use alloy_primitives::{Address, B256};
use tracing::debug;

use crate::domain::settlement::{Collateral, BINARY_INDEX_SETS};
use crate::error::Result;
use crate::port::outbound::ledger::Ledger;

/// Work out which collateral backs `holder`'s position in `condition_id`.
///
/// Both outcome collections are derived under the zero parent, then each
/// probed collateral's position ids are checked for a balance on the holder.
/// The first collateral with any nonzero balance wins. When none holds a
/// balance the position is assumed to be backed by native USDC.
///
/// # Errors
///
/// Any failed ledger read aborts detection.
pub async fn detect_collateral(
    ledger: &dyn Ledger,
    condition_id: B256,
    holder: Address,
) -> Result<Collateral> {
    let mut collections = [B256::ZERO; 2];
    for (slot, index_set) in collections.iter_mut().zip(BINARY_INDEX_SETS) {
        *slot = ledger.collection_id(B256::ZERO, condition_id, index_set).await?;
    }

    for collateral in Collateral::PROBE_ORDER {
        for collection in collections {
            let position_id = ledger.position_id(collateral.address(), collection).await?;
            let balance = ledger.balance_of(holder, position_id).await?;
            if !balance.is_zero() {
                debug!(
                    condition_id = %condition_id,
                    collateral = %collateral,
                    "Collateral detected from balance"
                );
                return Ok(collateral);
            }
        }
    }

    debug!(
        condition_id = %condition_id,
        collateral = %Collateral::FALLBACK,
        "No probed collateral holds a balance, using fallback"
    );
    Ok(Collateral::FALLBACK)
}
