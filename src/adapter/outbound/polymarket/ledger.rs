//! Polygon ledger adapter for Conditional Tokens and Safe wallets.
//!
//! Reads go through a plain HTTP provider. `execTransaction` is sent from
//! the owner key, which pays gas; the Safe itself only verifies the
//! owner's signature over the Safe transaction hash.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::redemption::ReceiptStatus;
use crate::domain::settlement::{FeeEstimate, GasParams, RedemptionCall, CTF_ADDRESS};
use crate::error::{ConfigError, LedgerError, Result};
use crate::port::outbound::ledger::Ledger;

/// Safe operation type for a plain call.
const SAFE_OPERATION_CALL: u8 = 0;

sol! {
    #[sol(rpc)]
    contract IConditionalTokens {
        function balanceOf(address account, uint256 id) external view returns (uint256);
        function getPositionId(address collateralToken, bytes32 collectionId) external pure returns (uint256);
        function getCollectionId(bytes32 parentCollectionId, bytes32 conditionId, uint256 indexSet) external view returns (bytes32);
        function redeemPositions(address collateralToken, bytes32 parentCollectionId, bytes32 conditionId, uint256[] indexSets) external;
        function payoutNumerators(bytes32 conditionId, uint256 index) external view returns (uint256);
    }
}

sol! {
    #[sol(rpc)]
    contract IGnosisSafe {
        function execTransaction(address to, uint256 value, bytes calldata data, uint8 operation, uint256 safeTxGas, uint256 baseGas, uint256 gasPrice, address gasToken, address refundReceiver, bytes memory signatures) external payable returns (bool success);
        function getTransactionHash(address to, uint256 value, bytes calldata data, uint8 operation, uint256 safeTxGas, uint256 baseGas, uint256 gasPrice, address gasToken, address refundReceiver, uint256 _nonce) external view returns (bytes32);
        function nonce() external view returns (uint256);
    }
}

/// [`Ledger`] over a Polygon JSON-RPC endpoint.
pub struct PolygonLedger {
    provider: DynProvider,
}

impl PolygonLedger {
    /// Connect to `rpc_url`, sending transactions from `owner`.
    ///
    /// # Errors
    ///
    /// Returns a config error if the URL does not parse.
    pub fn new(rpc_url: &str, owner: PrivateKeySigner) -> Result<Self> {
        let rpc_url: url::Url =
            rpc_url
                .parse()
                .map_err(|e: url::ParseError| ConfigError::InvalidValue {
                    field: "rpc_url",
                    reason: e.to_string(),
                })?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(owner))
            .connect_http(rpc_url)
            .erased();

        Ok(Self { provider })
    }

    /// ABI-encoded `redeemPositions` calldata for `call`.
    #[must_use]
    pub fn redemption_calldata(call: &RedemptionCall) -> Bytes {
        IConditionalTokens::redeemPositionsCall {
            collateralToken: call.collateral,
            parentCollectionId: call.parent_collection_id,
            conditionId: call.condition_id,
            indexSets: call.index_sets.iter().map(|&set| U256::from(set)).collect(),
        }
        .abi_encode()
        .into()
    }

    fn call_failed(call: &'static str, err: impl std::fmt::Display) -> LedgerError {
        LedgerError::Call {
            call,
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl Ledger for PolygonLedger {
    async fn payout_numerator(&self, condition_id: B256, index: u64) -> Result<U256> {
        let ctf = IConditionalTokens::new(CTF_ADDRESS, &self.provider);
        let numerator = ctf
            .payoutNumerators(condition_id, U256::from(index))
            .call()
            .await
            .map_err(|e| Self::call_failed("payoutNumerators", e))?;
        Ok(numerator)
    }

    async fn collection_id(
        &self,
        parent: B256,
        condition_id: B256,
        index_set: u64,
    ) -> Result<B256> {
        let ctf = IConditionalTokens::new(CTF_ADDRESS, &self.provider);
        let collection = ctf
            .getCollectionId(parent, condition_id, U256::from(index_set))
            .call()
            .await
            .map_err(|e| Self::call_failed("getCollectionId", e))?;
        Ok(collection)
    }

    async fn position_id(&self, collateral: Address, collection_id: B256) -> Result<U256> {
        let ctf = IConditionalTokens::new(CTF_ADDRESS, &self.provider);
        let position = ctf
            .getPositionId(collateral, collection_id)
            .call()
            .await
            .map_err(|e| Self::call_failed("getPositionId", e))?;
        Ok(position)
    }

    async fn balance_of(&self, owner: Address, position_id: U256) -> Result<U256> {
        let ctf = IConditionalTokens::new(CTF_ADDRESS, &self.provider);
        let balance = ctf
            .balanceOf(owner, position_id)
            .call()
            .await
            .map_err(|e| Self::call_failed("balanceOf", e))?;
        Ok(balance)
    }

    async fn wallet_nonce(&self, wallet: Address) -> Result<U256> {
        let safe = IGnosisSafe::new(wallet, &self.provider);
        let nonce = safe
            .nonce()
            .call()
            .await
            .map_err(|e| Self::call_failed("nonce", e))?;
        Ok(nonce)
    }

    async fn wallet_transaction_hash(
        &self,
        wallet: Address,
        call: &RedemptionCall,
        nonce: U256,
    ) -> Result<B256> {
        let safe = IGnosisSafe::new(wallet, &self.provider);
        let hash = safe
            .getTransactionHash(
                call.target,
                U256::ZERO,
                Self::redemption_calldata(call),
                SAFE_OPERATION_CALL,
                U256::ZERO,
                U256::ZERO,
                U256::ZERO,
                Address::ZERO,
                Address::ZERO,
                nonce,
            )
            .call()
            .await
            .map_err(|e| Self::call_failed("getTransactionHash", e))?;
        Ok(hash)
    }

    async fn fee_estimate(&self) -> Result<FeeEstimate> {
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| Self::call_failed("eth_gasPrice", e))?;
        let suggested_priority_fee = match self.provider.get_max_priority_fee_per_gas().await {
            Ok(fee) => Some(fee),
            Err(e) => {
                debug!(error = %e, "No priority fee suggestion from node");
                None
            }
        };

        Ok(FeeEstimate {
            gas_price,
            suggested_priority_fee,
        })
    }

    async fn submit_wallet_transaction(
        &self,
        wallet: Address,
        call: &RedemptionCall,
        signature: Bytes,
        gas: GasParams,
    ) -> Result<B256> {
        let safe = IGnosisSafe::new(wallet, &self.provider);
        let pending = safe
            .execTransaction(
                call.target,
                U256::ZERO,
                Self::redemption_calldata(call),
                SAFE_OPERATION_CALL,
                U256::ZERO,
                U256::ZERO,
                U256::ZERO,
                Address::ZERO,
                Address::ZERO,
                signature,
            )
            .gas(gas.gas_limit)
            .max_fee_per_gas(gas.max_fee_per_gas)
            .max_priority_fee_per_gas(gas.max_priority_fee_per_gas)
            .send()
            .await
            .map_err(|e| LedgerError::SubmissionFailed(e.to_string()))?;

        let tx_hash = *pending.tx_hash();
        info!(
            tx_hash = %tx_hash,
            wallet = %wallet,
            max_fee_per_gas = gas.max_fee_per_gas,
            max_priority_fee_per_gas = gas.max_priority_fee_per_gas,
            "Safe transaction broadcast"
        );
        Ok(tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<ReceiptStatus>> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| LedgerError::ReceiptQuery {
                tx_hash: tx_hash.to_string(),
                reason: e.to_string(),
            })?;

        Ok(receipt.map(|r| {
            if r.status() {
                ReceiptStatus::Success
            } else {
                ReceiptStatus::Failed
            }
        }))
    }
}
