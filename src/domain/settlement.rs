//! On-chain settlement primitives for Polymarket positions on Polygon.
//!
//! Redemption goes through the Conditional Tokens Framework (CTF) contract,
//! or the NegRisk adapter for positions collateralized by wrapped USDC, and
//! is relayed through the owner's Safe proxy wallet.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{address, Address, Bytes, B256};

use super::error::DomainError;
use super::id::ConditionId;

/// Conditional Tokens Framework contract.
pub const CTF_ADDRESS: Address = address!("4D97DCd97eC945f40cF65F87097ACe5EA0476045");

/// NegRisk adapter, the redemption target for wrapped-collateral positions.
pub const NEG_RISK_ADAPTER_ADDRESS: Address = address!("d91E80cF2E7be2e162c6513ceD06f1dD0dA35296");

/// Native USDC on Polygon.
pub const USDC_NATIVE_ADDRESS: Address = address!("3c499c542cEF5E3811e1192ce70d8cC03d5c3359");

/// Bridged USDC.e on Polygon.
pub const USDC_BRIDGED_ADDRESS: Address = address!("2791bca1f2de4661ed88a30c99a7a9449aa84174");

/// Wrapped collateral used by negative-risk markets.
pub const WRAPPED_COLLATERAL_ADDRESS: Address =
    address!("3A3BD7bb9528E159577F7C2e685CC81A765002E2");

/// Index sets covering both outcomes of a binary condition.
pub const BINARY_INDEX_SETS: [u64; 2] = [1, 2];

/// Gas limit ceiling for a Safe-relayed redemption.
pub const REDEMPTION_GAS_LIMIT: u64 = 500_000;

/// Minimum priority fee accepted by Polygon validators in practice (42 gwei).
pub const MIN_PRIORITY_FEE_WEI: u128 = 42_000_000_000;

/// Offset that marks an `eth_sign` signature for the Safe contract.
pub const SAFE_ETH_SIGN_V_OFFSET: u8 = 4;

/// Collateral token backing a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collateral {
    BridgedUsdc,
    WrappedCollateral,
    NativeUsdc,
}

impl Collateral {
    /// Collaterals probed for a balance, in preference order.
    pub const PROBE_ORDER: [Self; 2] = [Self::BridgedUsdc, Self::WrappedCollateral];

    /// Collateral assumed when no probed collateral holds a balance.
    pub const FALLBACK: Self = Self::NativeUsdc;

    #[must_use]
    pub const fn address(self) -> Address {
        match self {
            Self::BridgedUsdc => USDC_BRIDGED_ADDRESS,
            Self::WrappedCollateral => WRAPPED_COLLATERAL_ADDRESS,
            Self::NativeUsdc => USDC_NATIVE_ADDRESS,
        }
    }

    /// Contract whose `redeemPositions` must be called for this collateral.
    #[must_use]
    pub const fn redemption_target(self) -> Address {
        match self {
            Self::WrappedCollateral => NEG_RISK_ADAPTER_ADDRESS,
            Self::BridgedUsdc | Self::NativeUsdc => CTF_ADDRESS,
        }
    }
}

impl fmt::Display for Collateral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BridgedUsdc => write!(f, "Bridged USDC"),
            Self::WrappedCollateral => write!(f, "WrappedCollateral"),
            Self::NativeUsdc => write!(f, "Native USDC"),
        }
    }
}

/// Parse a condition identifier into its 32-byte on-chain form.
///
/// # Errors
///
/// Returns [`DomainError::InvalidConditionId`] for anything but 32 bytes of hex.
pub fn condition_bytes(condition_id: &ConditionId) -> Result<B256, DomainError> {
    B256::from_str(condition_id.as_str()).map_err(|e| DomainError::InvalidConditionId {
        condition_id: condition_id.to_string(),
        reason: e.to_string(),
    })
}

/// A `redeemPositions` call to be relayed through the Safe wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionCall {
    pub target: Address,
    pub collateral: Address,
    pub parent_collection_id: B256,
    pub condition_id: B256,
    pub index_sets: [u64; 2],
}

impl RedemptionCall {
    /// Redeem both outcomes of a top-level binary condition.
    #[must_use]
    pub fn binary(collateral: Collateral, condition_id: B256) -> Self {
        Self {
            target: collateral.redemption_target(),
            collateral: collateral.address(),
            parent_collection_id: B256::ZERO,
            condition_id,
            index_sets: BINARY_INDEX_SETS,
        }
    }
}

/// Fee data reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    /// Current gas price (base fee plus tip) in wei.
    pub gas_price: u128,
    /// Suggested priority fee in wei, when the node offers one.
    pub suggested_priority_fee: Option<u128>,
}

/// EIP-1559 gas parameters for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasParams {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub gas_limit: u64,
}

impl GasParams {
    /// Priority fee is 1.5x the suggestion, never below the floor; the max fee
    /// adds 20% headroom over gas price plus tip.
    #[must_use]
    pub fn from_estimate(estimate: FeeEstimate) -> Self {
        let boosted = estimate
            .suggested_priority_fee
            .map_or(0, |fee| fee.saturating_mul(15) / 10);
        let priority = boosted.max(MIN_PRIORITY_FEE_WEI);
        let max_fee = estimate.gas_price.saturating_add(priority).saturating_mul(12) / 10;

        Self {
            max_fee_per_gas: max_fee,
            max_priority_fee_per_gas: priority,
            gas_limit: REDEMPTION_GAS_LIMIT,
        }
    }
}

/// Convert an owner's `r || s || v` message signature into the form the Safe
/// contract verifies as an `eth_sign` signature.
///
/// Recovery ids given as parity (0/1) are first normalized to 27/28.
#[must_use]
pub fn safe_eth_sign_signature(raw: [u8; 65]) -> Bytes {
    let mut sig = raw;
    let v = if sig[64] < 27 { sig[64] + 27 } else { sig[64] };
    sig[64] = v + SAFE_ETH_SIGN_V_OFFSET;
    Bytes::copy_from_slice(&sig)
}
