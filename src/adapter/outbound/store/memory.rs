//! In-memory pending-redemption store.

use parking_lot::RwLock;

use crate::domain::redemption::PendingRedemption;
use crate::error::Result;
use crate::port::outbound::store::RedemptionStore;

/// Keeps the list in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryRedemptionStore {
    entries: RwLock<Vec<PendingRedemption>>,
    saves: RwLock<usize>,
}

impl MemoryRedemptionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `entries`.
    #[must_use]
    pub fn with_entries(entries: Vec<PendingRedemption>) -> Self {
        Self {
            entries: RwLock::new(entries),
            saves: RwLock::new(0),
        }
    }

    /// Snapshot of the stored list.
    #[must_use]
    pub fn entries(&self) -> Vec<PendingRedemption> {
        self.entries.read().clone()
    }

    /// Number of completed saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.read()
    }
}

impl RedemptionStore for MemoryRedemptionStore {
    fn load(&self) -> Result<Vec<PendingRedemption>> {
        Ok(self.entries.read().clone())
    }

    fn save(&self, pending: &[PendingRedemption]) -> Result<()> {
        *self.entries.write() = pending.to_vec();
        *self.saves.write() += 1;
        Ok(())
    }
}
