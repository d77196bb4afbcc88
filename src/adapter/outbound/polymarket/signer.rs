//! Owner key signer for Safe wallet transactions.

use std::str::FromStr;

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use polymarket_client_sdk::auth::Signer;

use crate::error::{ConfigError, LedgerError, Result};
use crate::port::outbound::ledger::OwnerSigner;

/// Signs Safe transaction hashes with a local private key.
#[derive(Clone)]
pub struct LocalOwnerSigner {
    signer: PrivateKeySigner,
}

impl LocalOwnerSigner {
    /// Parse a hex private key (with or without `0x`).
    ///
    /// # Errors
    ///
    /// Returns a config error naming `WALLET_PRIVATE_KEY` if the key is
    /// empty or malformed.
    pub fn from_private_key(private_key: &str, chain_id: u64) -> Result<Self> {
        if private_key.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY",
            }
            .into());
        }

        let signer = PrivateKeySigner::from_str(private_key.trim())
            .map_err(|e| ConfigError::InvalidValue {
                field: "WALLET_PRIVATE_KEY",
                reason: e.to_string(),
            })?
            .with_chain_id(Some(chain_id));

        Ok(Self { signer })
    }

    /// The underlying key, shared with the CLOB and RPC adapters.
    #[must_use]
    pub fn inner(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

#[async_trait]
impl OwnerSigner for LocalOwnerSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign_hash(&self, hash: B256) -> Result<[u8; 65]> {
        let signature = self
            .signer
            .sign_message(hash.as_slice())
            .await
            .map_err(|e| LedgerError::SigningFailed(e.to_string()))?;
        Ok(signature.as_bytes())
    }
}
