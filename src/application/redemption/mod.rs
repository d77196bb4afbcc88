//! Redemption of winning positions once their markets resolve.
//!
//! Each cycle walks positions through
//! `Discovered -> ResolutionUnknown -> {Resolved | NotResolved} -> Submitting
//! -> {SubmittedPending | SubmitFailed} -> {Confirmed | Reverted}`.
//! Positions that end a cycle not resolved, failed or reverted are simply
//! rediscovered on the next cycle; only submitted-but-unconfirmed
//! transactions are remembered, in the pending store.

mod collateral;

pub use collateral::detect_collateral;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info, warn};

use crate::domain::id::ConditionId;
use crate::domain::position::Position;
use crate::domain::redemption::{
    CycleReport, PendingRedemption, PendingRedemptions, ReceiptStatus, RedemptionOutcome,
};
use crate::domain::settlement::{
    condition_bytes, safe_eth_sign_signature, GasParams, RedemptionCall,
};
use crate::error::Result;
use crate::port::outbound::ledger::{Ledger, OwnerSigner};
use crate::port::outbound::portfolio::Portfolio;
use crate::port::outbound::store::RedemptionStore;

/// Minimum time between two executed cycles.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(300);

/// Wait between submitting a batch and checking its receipts.
pub const DEFAULT_SETTLEMENT_DELAY: Duration = Duration::from_secs(10);

/// Deadline for each payout numerator read.
pub const DEFAULT_RESOLUTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome slots read to decide whether a binary condition has resolved.
const PAYOUT_SLOTS: [u64; 2] = [0, 1];

/// Tunables for [`RedemptionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionSettings {
    /// Proxy wallet whose positions are redeemed.
    pub funder_address: Address,
    pub check_interval: Duration,
    pub settlement_delay: Duration,
    pub resolution_timeout: Duration,
}

impl RedemptionSettings {
    /// Settings with default timings for `funder_address`.
    #[must_use]
    pub const fn new(funder_address: Address) -> Self {
        Self {
            funder_address,
            check_interval: DEFAULT_CHECK_INTERVAL,
            settlement_delay: DEFAULT_SETTLEMENT_DELAY,
            resolution_timeout: DEFAULT_RESOLUTION_TIMEOUT,
        }
    }
}

/// Finds resolved winning positions and redeems them through the owner's
/// Safe wallet.
///
/// The manager assumes it is the only writer for the wallet: the Safe nonce
/// is read once per batch and incremented locally after each accepted
/// submission.
pub struct RedemptionManager {
    ledger: Arc<dyn Ledger>,
    signer: Arc<dyn OwnerSigner>,
    portfolio: Arc<dyn Portfolio>,
    store: Arc<dyn RedemptionStore>,
    settings: RedemptionSettings,
    pending: PendingRedemptions,
    last_check: Option<Instant>,
}

impl RedemptionManager {
    /// Create a manager and reload every pending redemption from `store`.
    ///
    /// # Errors
    ///
    /// Returns the store error if the persisted list exists but cannot be
    /// read. Starting empty in that case would overwrite it on the next save.
    pub fn new(
        ledger: Arc<dyn Ledger>,
        signer: Arc<dyn OwnerSigner>,
        portfolio: Arc<dyn Portfolio>,
        store: Arc<dyn RedemptionStore>,
        settings: RedemptionSettings,
    ) -> Result<Self> {
        let (pending, discarded) = PendingRedemptions::from_entries(store.load()?);
        if discarded > 0 {
            warn!(discarded, "Dropped duplicate pending redemptions on load");
        }
        if !pending.is_empty() {
            info!(count = pending.len(), "Loaded pending redemptions");
        }

        Ok(Self {
            ledger,
            signer,
            portfolio,
            store,
            settings,
            pending,
            last_check: None,
        })
    }

    /// Redemptions submitted but not yet observed on chain.
    #[must_use]
    pub const fn pending(&self) -> &PendingRedemptions {
        &self.pending
    }

    #[must_use]
    pub const fn settings(&self) -> &RedemptionSettings {
        &self.settings
    }

    /// Run one redemption cycle unless the check interval has not elapsed.
    ///
    /// The cycle first reconciles pending transactions and stops if any are
    /// still unconfirmed, so a new batch never races an older one for the
    /// wallet nonce. It then redeems every resolved candidate in a single
    /// sequential batch, waits for settlement and records what is still
    /// pending.
    ///
    /// Never fails: every error is logged and leaves the affected position
    /// to be retried on a later cycle.
    pub async fn check_and_redeem_positions(&mut self) -> CycleReport {
        if !self.should_check() {
            debug!("Redemption check throttled");
            return CycleReport::throttled();
        }

        let mut report = CycleReport::default();

        self.reconcile_pending(&mut report).await;
        if !self.pending.is_empty() {
            info!(
                pending = self.pending.len(),
                "Skipping redemption cycle, transactions still pending"
            );
            report.blocked_by_pending = true;
            return report;
        }

        let candidates = match self.discover().await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    error = %e,
                    transient = e.is_transient(),
                    "Failed to fetch redeemable positions"
                );
                return report;
            }
        };
        report.candidates = candidates.len();
        if candidates.is_empty() {
            debug!("No redeemable positions");
            return report;
        }

        let submitted = self.submit_batch(candidates, &mut report).await;
        if submitted.is_empty() {
            return report;
        }

        tokio::time::sleep(self.settings.settlement_delay).await;
        self.settle(submitted, &mut report).await;

        info!(
            resolved = report.resolved,
            submitted = report.submitted,
            confirmed = report.confirmed,
            reverted = report.reverted,
            pending = report.newly_pending,
            "Redemption cycle complete"
        );
        report
    }

    fn should_check(&mut self) -> bool {
        let now = Instant::now();
        match self.last_check {
            Some(last) if now.duration_since(last) < self.settings.check_interval => false,
            _ => {
                self.last_check = Some(now);
                true
            }
        }
    }

    /// Drop pending entries whose receipt has been observed.
    async fn reconcile_pending(&mut self, report: &mut CycleReport) {
        if self.pending.is_empty() {
            return;
        }

        let mut finished = HashSet::new();
        for entry in self.pending.iter() {
            let receipt = self.ledger.transaction_receipt(entry.transaction_hash).await;
            let outcome = RedemptionOutcome::from_receipt(&receipt);
            log_outcome(entry, outcome, &receipt);
            match outcome {
                RedemptionOutcome::Confirmed => report.reconciled_confirmed += 1,
                RedemptionOutcome::Reverted => report.reconciled_reverted += 1,
                RedemptionOutcome::StillPending | RedemptionOutcome::QueryFailed => {}
            }
            if outcome.is_final() {
                finished.insert(entry.transaction_hash);
            }
        }

        self.pending.retain(|entry| !finished.contains(&entry.transaction_hash));
        self.persist();
    }

    /// Candidate positions that are not already being redeemed.
    async fn discover(&self) -> Result<Vec<Position>> {
        let positions = self
            .portfolio
            .redeemable_positions(self.settings.funder_address)
            .await?;

        let mut seen: HashSet<ConditionId> = HashSet::new();
        Ok(positions
            .into_iter()
            .filter(Position::is_redemption_candidate)
            .filter(|p| !self.pending.contains(&p.condition_id))
            .filter(|p| seen.insert(p.condition_id.clone()))
            .collect())
    }

    /// Submit a redemption for every resolved candidate, in order.
    async fn submit_batch(
        &self,
        candidates: Vec<Position>,
        report: &mut CycleReport,
    ) -> Vec<PendingRedemption> {
        let mut nonce: Option<U256> = None;
        let mut submitted = Vec::new();

        for position in candidates {
            let condition = match condition_bytes(&position.condition_id) {
                Ok(condition) => condition,
                Err(e) => {
                    warn!(error = %e, "Skipping position with malformed condition id");
                    continue;
                }
            };

            if !self.is_resolved(condition).await {
                debug!(condition_id = %position.condition_id, "Market not resolved yet");
                continue;
            }
            report.resolved += 1;

            let current_nonce = match nonce {
                Some(n) => n,
                None => match self.ledger.wallet_nonce(position.proxy_wallet_address).await {
                    Ok(n) => n,
                    Err(e) => {
                        warn!(
                            wallet = %position.proxy_wallet_address,
                            error = %e,
                            "Failed to read wallet nonce, abandoning batch"
                        );
                        break;
                    }
                },
            };

            match self.redeem(&position, condition, current_nonce).await {
                Ok(tx_hash) => {
                    info!(
                        condition_id = %position.condition_id,
                        tx_hash = %tx_hash,
                        nonce = %current_nonce,
                        title = %position.title,
                        "Redemption submitted"
                    );
                    nonce = Some(current_nonce + U256::from(1));
                    report.submitted += 1;
                    submitted.push(PendingRedemption::new(
                        tx_hash,
                        position,
                        chrono::Utc::now().timestamp_millis(),
                    ));
                }
                Err(e) => {
                    nonce = Some(current_nonce);
                    report.submit_failures += 1;
                    error!(
                        condition_id = %position.condition_id,
                        title = %position.title,
                        error = %e,
                        transient = e.is_transient(),
                        "Failed to redeem position"
                    );
                }
            }
        }

        submitted
    }

    /// Both payout numerators are read under the resolution timeout; any
    /// failure counts as not resolved.
    async fn is_resolved(&self, condition: B256) -> bool {
        let mut resolved = false;
        for slot in PAYOUT_SLOTS {
            let read = timeout(
                self.settings.resolution_timeout,
                self.ledger.payout_numerator(condition, slot),
            )
            .await;

            match read {
                Ok(Ok(numerator)) => resolved |= !numerator.is_zero(),
                Ok(Err(e)) => {
                    debug!(condition_id = %condition, slot, error = %e, "Payout read failed");
                    return false;
                }
                Err(_) => {
                    debug!(condition_id = %condition, slot, "Payout read timed out");
                    return false;
                }
            }
        }
        resolved
    }

    async fn redeem(&self, position: &Position, condition: B256, nonce: U256) -> Result<B256> {
        let wallet = position.proxy_wallet_address;
        let collateral = detect_collateral(self.ledger.as_ref(), condition, wallet).await?;
        let call = RedemptionCall::binary(collateral, condition);

        debug!(
            condition_id = %position.condition_id,
            collateral = %collateral,
            target = %call.target,
            "Building redemption"
        );

        let safe_hash = self
            .ledger
            .wallet_transaction_hash(wallet, &call, nonce)
            .await?;
        let signature = safe_eth_sign_signature(self.signer.sign_hash(safe_hash).await?);
        let gas = GasParams::from_estimate(self.ledger.fee_estimate().await?);

        self.ledger
            .submit_wallet_transaction(wallet, &call, signature, gas)
            .await
    }

    /// Check each fresh submission once; unconfirmed ones become pending.
    async fn settle(&mut self, submitted: Vec<PendingRedemption>, report: &mut CycleReport) {
        for entry in submitted {
            let receipt = self.ledger.transaction_receipt(entry.transaction_hash).await;
            let outcome = RedemptionOutcome::from_receipt(&receipt);
            log_outcome(&entry, outcome, &receipt);
            match outcome {
                RedemptionOutcome::Confirmed => report.confirmed += 1,
                RedemptionOutcome::Reverted => report.reverted += 1,
                RedemptionOutcome::StillPending | RedemptionOutcome::QueryFailed => {
                    match self.pending.insert(entry) {
                        Ok(()) => report.newly_pending += 1,
                        Err(e) => warn!(error = %e, "Not tracking redemption"),
                    }
                }
            }
        }

        if report.newly_pending > 0 {
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(self.pending.as_slice()) {
            error!(
                error = %e,
                pending = self.pending.len(),
                "Failed to persist pending redemptions"
            );
        }
    }
}

fn log_outcome(
    entry: &PendingRedemption,
    outcome: RedemptionOutcome,
    receipt: &Result<Option<ReceiptStatus>>,
) {
    match outcome {
        RedemptionOutcome::Confirmed => info!(
            tx_hash = %entry.transaction_hash,
            value = %entry.position.current_value,
            title = %entry.position.title,
            "Redeemed position"
        ),
        RedemptionOutcome::Reverted => warn!(
            tx_hash = %entry.transaction_hash,
            condition_id = %entry.condition_id(),
            "Redemption transaction reverted"
        ),
        RedemptionOutcome::StillPending => {
            info!(tx_hash = %entry.transaction_hash, "Redemption still pending");
        }
        RedemptionOutcome::QueryFailed => {
            if let Err(e) = receipt {
                warn!(
                    tx_hash = %entry.transaction_hash,
                    error = %e,
                    transient = e.is_transient(),
                    "Receipt query failed, keeping redemption pending"
                );
            }
        }
    }
}
