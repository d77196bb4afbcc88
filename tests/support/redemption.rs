//! Wiring for redemption manager tests.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address};

use bracketeer::adapter::outbound::store::MemoryRedemptionStore;
use bracketeer::application::redemption::{RedemptionManager, RedemptionSettings};
use bracketeer::domain::position::Position;
use bracketeer::domain::redemption::PendingRedemption;
use bracketeer::testkit::ledger::{FixedSigner, ScriptedLedger};
use bracketeer::testkit::portfolio::StaticPortfolio;

pub const FUNDER: Address = address!("56687bf447db6ffa42ffe2204a05edaa20f55839");
pub const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Manager plus handles on every double behind it.
pub struct Harness {
    pub ledger: Arc<ScriptedLedger>,
    pub signer: Arc<FixedSigner>,
    pub portfolio: Arc<StaticPortfolio>,
    pub store: Arc<MemoryRedemptionStore>,
}

impl Harness {
    pub fn new(positions: Vec<Position>) -> Self {
        Self::with_pending(positions, Vec::new())
    }

    pub fn with_pending(positions: Vec<Position>, pending: Vec<PendingRedemption>) -> Self {
        Self {
            ledger: Arc::new(ScriptedLedger::new()),
            signer: Arc::new(FixedSigner::new(OWNER)),
            portfolio: Arc::new(StaticPortfolio::new(positions)),
            store: Arc::new(MemoryRedemptionStore::with_entries(pending)),
        }
    }

    /// Fast timings: no throttle between explicit cycles, no settlement wait.
    pub fn settings() -> RedemptionSettings {
        RedemptionSettings {
            check_interval: Duration::ZERO,
            settlement_delay: Duration::ZERO,
            resolution_timeout: Duration::from_millis(50),
            ..RedemptionSettings::new(FUNDER)
        }
    }

    pub fn manager(&self) -> RedemptionManager {
        self.manager_with(Self::settings())
    }

    pub fn manager_with(&self, settings: RedemptionSettings) -> RedemptionManager {
        RedemptionManager::new(
            self.ledger.clone(),
            self.signer.clone(),
            self.portfolio.clone(),
            self.store.clone(),
            settings,
        )
        .expect("memory store always loads")
    }
}
