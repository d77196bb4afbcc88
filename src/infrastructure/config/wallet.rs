//! Wallet configuration for signing orders and Safe transactions.

use alloy_primitives::Address;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Wallet configuration.
///
/// The owner key is loaded from the `WALLET_PRIVATE_KEY` env var at runtime
/// (never from the config file), or decrypted from `keystore_path`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// Safe proxy wallet that holds positions and funds orders.
    #[serde(default)]
    pub funder_address: Option<Address>,
    /// Optional keystore path for encrypted wallet storage.
    #[serde(default)]
    pub keystore_path: Option<String>,
    /// Private key loaded from `WALLET_PRIVATE_KEY` env var at runtime.
    #[serde(skip)]
    pub private_key: Option<String>,
}

impl WalletConfig {
    /// The configured proxy wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when none is configured.
    pub fn funder_address(&self) -> Result<Address> {
        self.funder_address.ok_or_else(|| {
            ConfigError::MissingField {
                field: "wallet.funder_address",
            }
            .into()
        })
    }

    /// The owner private key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when neither the env var nor a
    /// keystore supplied one.
    pub fn private_key(&self) -> Result<&str> {
        self.private_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingField {
                    field: "WALLET_PRIVATE_KEY",
                }
                .into()
            })
    }
}
