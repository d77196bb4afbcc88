//! Redemption cycle settings.

use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::Address;
use serde::Deserialize;

use crate::application::redemption::RedemptionSettings;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedemptionConfig {
    /// Minimum seconds between two redemption cycles.
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    /// Seconds to wait after a batch before reading its receipts.
    #[serde(default = "default_settlement_delay_secs")]
    pub settlement_delay_secs: u64,
    /// Deadline in seconds for each payout numerator read.
    #[serde(default = "default_resolution_timeout_secs")]
    pub resolution_timeout_secs: u64,
    /// Pending-redemption file. Defaults to a file in the bracketeer home.
    #[serde(default)]
    pub pending_path: Option<PathBuf>,
}

const fn default_check_interval_secs() -> u64 {
    300
}

const fn default_settlement_delay_secs() -> u64 {
    10
}

const fn default_resolution_timeout_secs() -> u64 {
    5
}

impl Default for RedemptionConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            settlement_delay_secs: default_settlement_delay_secs(),
            resolution_timeout_secs: default_resolution_timeout_secs(),
            pending_path: None,
        }
    }
}

impl RedemptionConfig {
    /// Manager settings for redeeming `funder_address`'s positions.
    #[must_use]
    pub const fn settings(&self, funder_address: Address) -> RedemptionSettings {
        RedemptionSettings {
            funder_address,
            check_interval: Duration::from_secs(self.check_interval_secs),
            settlement_delay: Duration::from_secs(self.settlement_delay_secs),
            resolution_timeout: Duration::from_secs(self.resolution_timeout_secs),
        }
    }
}
