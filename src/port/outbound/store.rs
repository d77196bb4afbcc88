//! Persistence port for in-flight redemptions.

use crate::domain::redemption::PendingRedemption;
use crate::error::Result;

/// Durable home of the pending-redemption list.
///
/// The list is always written whole; implementations must not leave a
/// partially written list behind if the process dies mid-save.
pub trait RedemptionStore: Send + Sync {
    /// Load every persisted entry. A store that was never written is empty.
    fn load(&self) -> Result<Vec<PendingRedemption>>;

    /// Replace the persisted list with `pending`.
    fn save(&self, pending: &[PendingRedemption]) -> Result<()>;
}
