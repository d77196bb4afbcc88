//! In-flight settlement transactions and their lifecycle outcomes.
//!
//! A [`PendingRedemption`] exists from the moment a redemption transaction is
//! submitted until a receipt is observed for it. [`PendingRedemptions`] is the
//! durable set of those entries and refuses a second entry for the same
//! condition.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::ConditionId;
use super::position::Position;

/// A submitted redemption awaiting a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRedemption {
    #[serde(alias = "txHash")]
    pub transaction_hash: B256,
    pub position: Position,
    #[serde(alias = "timestamp")]
    pub submitted_at_epoch_ms: i64,
}

impl PendingRedemption {
    #[must_use]
    pub fn new(transaction_hash: B256, position: Position, submitted_at_epoch_ms: i64) -> Self {
        Self {
            transaction_hash,
            position,
            submitted_at_epoch_ms,
        }
    }

    #[must_use]
    pub fn condition_id(&self) -> &ConditionId {
        &self.position.condition_id
    }
}

/// Set of pending redemptions with at most one entry per condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingRedemptions {
    entries: Vec<PendingRedemption>,
}

impl PendingRedemptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the set from persisted entries.
    ///
    /// Later duplicates of a condition are discarded; the number discarded is
    /// returned alongside the set.
    #[must_use]
    pub fn from_entries(entries: Vec<PendingRedemption>) -> (Self, usize) {
        let mut set = Self::new();
        let mut discarded = 0;
        for entry in entries {
            if set.insert(entry).is_err() {
                discarded += 1;
            }
        }
        (set, discarded)
    }

    /// Track a new submission.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicatePendingRedemption`] if the condition is
    /// already tracked.
    pub fn insert(&mut self, entry: PendingRedemption) -> Result<(), DomainError> {
        if self.contains(entry.condition_id()) {
            return Err(DomainError::DuplicatePendingRedemption {
                condition_id: entry.condition_id().to_string(),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, condition_id: &ConditionId) -> bool {
        self.entries.iter().any(|p| p.condition_id() == condition_id)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&PendingRedemption) -> bool) {
        self.entries.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingRedemption> {
        self.entries.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PendingRedemption] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mined status of a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failed,
}

/// What a single receipt lookup says about a redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionOutcome {
    /// Mined with success status.
    Confirmed,
    /// Mined but reverted.
    Reverted,
    /// Not mined yet.
    StillPending,
    /// The lookup itself failed.
    QueryFailed,
}

impl RedemptionOutcome {
    /// Classify the result of a receipt query.
    #[must_use]
    pub fn from_receipt<E>(receipt: &Result<Option<ReceiptStatus>, E>) -> Self {
        match receipt {
            Ok(Some(ReceiptStatus::Success)) => Self::Confirmed,
            Ok(Some(ReceiptStatus::Failed)) => Self::Reverted,
            Ok(None) => Self::StillPending,
            Err(_) => Self::QueryFailed,
        }
    }

    /// Whether a receipt was observed, which ends tracking either way.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Confirmed | Self::Reverted)
    }
}

/// Summary of one redemption cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// The cycle was skipped because the check interval has not elapsed.
    pub throttled: bool,
    /// Pending entries confirmed during reconciliation.
    pub reconciled_confirmed: usize,
    /// Pending entries found reverted during reconciliation.
    pub reconciled_reverted: usize,
    /// The cycle stopped because entries were still pending.
    pub blocked_by_pending: bool,
    /// Positions that passed the candidate filter and idempotency guard.
    pub candidates: usize,
    /// Candidates whose condition is resolved on chain.
    pub resolved: usize,
    /// Redemption transactions accepted by the node.
    pub submitted: usize,
    /// Candidates whose submission failed.
    pub submit_failures: usize,
    /// Submitted transactions confirmed after the settlement wait.
    pub confirmed: usize,
    /// Submitted transactions that reverted after the settlement wait.
    pub reverted: usize,
    /// Submitted transactions added to the pending set.
    pub newly_pending: usize,
}

impl CycleReport {
    #[must_use]
    pub fn throttled() -> Self {
        Self {
            throttled: true,
            ..Self::default()
        }
    }
}
