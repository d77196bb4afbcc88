//! Ledger port: Conditional Tokens reads and Safe wallet transactions.
//!
//! The trait exposes the individual contract calls rather than a single
//! "redeem" operation so that collateral selection, nonce sequencing and gas
//! policy stay in the application layer.

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use crate::domain::redemption::ReceiptStatus;
use crate::domain::settlement::{FeeEstimate, GasParams, RedemptionCall};
use crate::error::Result;

/// Read and write access to the chain the markets settle on.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// `payoutNumerators(condition, index)` on the CTF contract.
    async fn payout_numerator(&self, condition_id: B256, index: u64) -> Result<U256>;

    /// `getCollectionId(parent, condition, indexSet)`.
    async fn collection_id(&self, parent: B256, condition_id: B256, index_set: u64)
        -> Result<B256>;

    /// `getPositionId(collateral, collection)`.
    async fn position_id(&self, collateral: Address, collection_id: B256) -> Result<U256>;

    /// ERC-1155 `balanceOf(owner, positionId)`.
    async fn balance_of(&self, owner: Address, position_id: U256) -> Result<U256>;

    /// Current Safe nonce of `wallet`.
    async fn wallet_nonce(&self, wallet: Address) -> Result<U256>;

    /// Safe transaction hash for relaying `call` from `wallet` at `nonce`.
    async fn wallet_transaction_hash(
        &self,
        wallet: Address,
        call: &RedemptionCall,
        nonce: U256,
    ) -> Result<B256>;

    /// Gas price and priority fee suggestion.
    async fn fee_estimate(&self) -> Result<FeeEstimate>;

    /// Broadcast `execTransaction` on `wallet` and return the transaction hash
    /// without waiting for it to be mined.
    async fn submit_wallet_transaction(
        &self,
        wallet: Address,
        call: &RedemptionCall,
        signature: Bytes,
        gas: GasParams,
    ) -> Result<B256>;

    /// Receipt status for `tx_hash`, `None` while unmined.
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<ReceiptStatus>>;
}

/// The single key that owns the Safe wallet.
#[async_trait]
pub trait OwnerSigner: Send + Sync {
    /// Address of the owner key.
    fn address(&self) -> Address;

    /// Sign `hash` as an Ethereum signed message, returning `r || s || v`.
    async fn sign_hash(&self, hash: B256) -> Result<[u8; 65]>;
}
