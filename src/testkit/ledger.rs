//! Scripted [`Ledger`] and [`OwnerSigner`] doubles.
//!
//! [`ScriptedLedger`] derives collection and position ids by hashing their
//! inputs, so tests can seed balances through
//! [`ScriptedLedger::set_collateral_balance`] without knowing the real CTF
//! derivation. Submitted transactions get hashes from a counter and start out
//! with the configured default receipt.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::redemption::ReceiptStatus;
use crate::domain::settlement::{
    Collateral, FeeEstimate, GasParams, RedemptionCall, BINARY_INDEX_SETS,
};
use crate::error::{LedgerError, Result};
use crate::port::outbound::ledger::{Ledger, OwnerSigner};

/// One accepted `execTransaction` submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub wallet: Address,
    pub call: RedemptionCall,
    pub signature: Bytes,
    pub gas: GasParams,
    pub tx_hash: B256,
}

#[derive(Default)]
struct State {
    numerators: HashMap<(B256, u64), U256>,
    hanging: HashSet<B256>,
    failing_reads: HashSet<B256>,
    balances: HashMap<(Address, U256), U256>,
    nonces: HashMap<Address, U256>,
    nonce_failure: bool,
    failing_submits: HashSet<B256>,
    receipts: HashMap<B256, ReceiptStatus>,
    receipt_failures: HashSet<B256>,
    default_receipt: Option<ReceiptStatus>,
    hashed_nonces: Vec<U256>,
    submissions: Vec<Submission>,
    payout_reads: usize,
    nonce_reads: usize,
}

/// A chain whose state is set up by the test.
#[derive(Default)]
pub struct ScriptedLedger {
    state: Mutex<State>,
}

impl ScriptedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `condition` resolved with the given payout for slot 0 and 1.
    pub fn resolve(&self, condition: B256, payouts: [u64; 2]) {
        let mut state = self.state.lock();
        for (slot, payout) in payouts.into_iter().enumerate() {
            state
                .numerators
                .insert((condition, slot as u64), U256::from(payout));
        }
    }

    /// Payout reads for `condition` never complete.
    pub fn hang_payouts(&self, condition: B256) {
        self.state.lock().hanging.insert(condition);
    }

    /// Payout reads for `condition` fail.
    pub fn fail_payouts(&self, condition: B256) {
        self.state.lock().failing_reads.insert(condition);
    }

    /// Give `holder` a balance of `collateral`-backed tokens for one outcome.
    pub fn set_collateral_balance(
        &self,
        holder: Address,
        collateral: Collateral,
        condition: B256,
        index_set: u64,
        amount: u64,
    ) {
        let collection = derived_collection(condition, index_set);
        let position = derived_position(collateral.address(), collection);
        self.state
            .lock()
            .balances
            .insert((holder, position), U256::from(amount));
    }

    pub fn set_nonce(&self, wallet: Address, nonce: u64) {
        self.state.lock().nonces.insert(wallet, U256::from(nonce));
    }

    /// Nonce reads fail.
    pub fn fail_nonce(&self) {
        self.state.lock().nonce_failure = true;
    }

    /// Submissions redeeming `condition` are refused by the node.
    pub fn fail_submit(&self, condition: B256) {
        self.state.lock().failing_submits.insert(condition);
    }

    /// Receipt returned for submissions without an explicit one.
    pub fn set_default_receipt(&self, status: Option<ReceiptStatus>) {
        self.state.lock().default_receipt = status;
    }

    pub fn set_receipt(&self, tx_hash: B256, status: ReceiptStatus) {
        let mut state = self.state.lock();
        state.receipt_failures.remove(&tx_hash);
        state.receipts.insert(tx_hash, status);
    }

    /// Receipt queries for `tx_hash` fail.
    pub fn fail_receipt(&self, tx_hash: B256) {
        self.state.lock().receipt_failures.insert(tx_hash);
    }

    /// Nonces passed to `wallet_transaction_hash`, in call order.
    pub fn hashed_nonces(&self) -> Vec<U256> {
        self.state.lock().hashed_nonces.clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().submissions.clone()
    }

    pub fn payout_reads(&self) -> usize {
        self.state.lock().payout_reads
    }

    pub fn nonce_reads(&self) -> usize {
        self.state.lock().nonce_reads
    }
}

fn derived_collection(condition: B256, index_set: u64) -> B256 {
    let mut input = condition.to_vec();
    input.extend_from_slice(&index_set.to_be_bytes());
    keccak256(input)
}

fn derived_position(collateral: Address, collection: B256) -> U256 {
    let mut input = collateral.to_vec();
    input.extend_from_slice(collection.as_slice());
    U256::from_be_bytes(keccak256(input).0)
}

fn call_failed(call: &'static str) -> crate::error::Error {
    LedgerError::Call {
        call,
        reason: "scripted failure".to_string(),
    }
    .into()
}

#[async_trait]
impl Ledger for ScriptedLedger {
    async fn payout_numerator(&self, condition_id: B256, index: u64) -> Result<U256> {
        let hang = {
            let mut state = self.state.lock();
            state.payout_reads += 1;
            if state.failing_reads.contains(&condition_id) {
                return Err(call_failed("payoutNumerators"));
            }
            state.hanging.contains(&condition_id)
        };
        if hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(self
            .state
            .lock()
            .numerators
            .get(&(condition_id, index))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn collection_id(
        &self,
        parent: B256,
        condition_id: B256,
        index_set: u64,
    ) -> Result<B256> {
        assert_eq!(parent, B256::ZERO, "only top-level collections are used");
        assert!(BINARY_INDEX_SETS.contains(&index_set));
        Ok(derived_collection(condition_id, index_set))
    }

    async fn position_id(&self, collateral: Address, collection_id: B256) -> Result<U256> {
        Ok(derived_position(collateral, collection_id))
    }

    async fn balance_of(&self, owner: Address, position_id: U256) -> Result<U256> {
        Ok(self
            .state
            .lock()
            .balances
            .get(&(owner, position_id))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn wallet_nonce(&self, wallet: Address) -> Result<U256> {
        let mut state = self.state.lock();
        state.nonce_reads += 1;
        if state.nonce_failure {
            return Err(call_failed("nonce"));
        }
        Ok(state.nonces.get(&wallet).copied().unwrap_or(U256::ZERO))
    }

    async fn wallet_transaction_hash(
        &self,
        wallet: Address,
        call: &RedemptionCall,
        nonce: U256,
    ) -> Result<B256> {
        self.state.lock().hashed_nonces.push(nonce);
        let mut input = wallet.to_vec();
        input.extend_from_slice(call.condition_id.as_slice());
        input.extend_from_slice(&nonce.to_be_bytes::<32>());
        Ok(keccak256(input))
    }

    async fn fee_estimate(&self) -> Result<FeeEstimate> {
        Ok(FeeEstimate {
            gas_price: 30_000_000_000,
            suggested_priority_fee: Some(30_000_000_000),
        })
    }

    async fn submit_wallet_transaction(
        &self,
        wallet: Address,
        call: &RedemptionCall,
        signature: Bytes,
        gas: GasParams,
    ) -> Result<B256> {
        let mut state = self.state.lock();
        if state.failing_submits.contains(&call.condition_id) {
            return Err(LedgerError::SubmissionFailed("nonce too low".to_string()).into());
        }

        let mut bytes = [0u8; 32];
        bytes[0] = 0xbb;
        bytes[31] = u8::try_from(state.submissions.len() + 1).unwrap_or(u8::MAX);
        let tx_hash = B256::from(bytes);

        state.submissions.push(Submission {
            wallet,
            call: call.clone(),
            signature,
            gas,
            tx_hash,
        });
        Ok(tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<ReceiptStatus>> {
        let state = self.state.lock();
        if state.receipt_failures.contains(&tx_hash) {
            return Err(LedgerError::ReceiptQuery {
                tx_hash: tx_hash.to_string(),
                reason: "scripted failure".to_string(),
            }
            .into());
        }
        Ok(state
            .receipts
            .get(&tx_hash)
            .copied()
            .or(state.default_receipt))
    }
}

/// Owner key double that returns a fixed `r || s || v` signature.
pub struct FixedSigner {
    address: Address,
    signed: Mutex<Vec<B256>>,
}

impl FixedSigner {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            signed: Mutex::new(Vec::new()),
        }
    }

    /// Hashes signed so far.
    pub fn signed(&self) -> Vec<B256> {
        self.signed.lock().clone()
    }
}

#[async_trait]
impl OwnerSigner for FixedSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_hash(&self, hash: B256) -> Result<[u8; 65]> {
        self.signed.lock().push(hash);
        let mut signature = [0x11u8; 65];
        signature[64] = 27;
        Ok(signature)
    }
}
