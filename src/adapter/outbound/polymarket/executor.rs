//! Order execution for Polymarket CLOB.
//!
//! Provides the [`PolymarketExecutor`] adapter for building, signing and
//! submitting limit orders on the Polymarket Central Limit Order Book.

use std::str::FromStr;
use std::sync::Arc;

use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use polymarket_client_sdk::auth::state::Authenticated;
use polymarket_client_sdk::auth::Normal;
use polymarket_client_sdk::clob::types::request::BalanceAllowanceRequest;
use polymarket_client_sdk::clob::types::{AssetType, Side};
use polymarket_client_sdk::clob::{Client, Config as ClobConfig};
use polymarket_client_sdk::types::U256;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::domain::id::OrderId;
use crate::error::{ExecutionError, Result};
use crate::port::outbound::exchange::{OrderRequest, OrderSide, OrderVenue, SubmittedOrder};

/// USDC has six decimals; the CLOB reports balances in base units.
const USDC_UNIT: Decimal = dec!(1_000_000);

/// Type alias for the authenticated CLOB client.
type AuthenticatedClient = Client<Authenticated<Normal>>;

/// Order venue backed by the Polymarket CLOB.
pub struct PolymarketExecutor {
    /// Authenticated CLOB client for API communication.
    client: Arc<AuthenticatedClient>,
    /// Local signer for order signatures.
    signer: Arc<PrivateKeySigner>,
    /// Smallest notional the venue accepts.
    min_order_value: Decimal,
}

impl PolymarketExecutor {
    /// Authenticate with the CLOB using `signer`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::AuthFailed`] if the client cannot be created
    /// or authentication is refused.
    pub async fn new(
        api_url: &str,
        signer: PrivateKeySigner,
        min_order_value: Decimal,
    ) -> Result<Self> {
        info!(
            chain_id = ?signer.chain_id(),
            address = %signer.address(),
            "Creating CLOB client"
        );

        let client = Client::new(api_url, ClobConfig::default())
            .map_err(|e| ExecutionError::AuthFailed(format!("Failed to create CLOB client: {e}")))?
            .authentication_builder(&signer)
            .authenticate()
            .await
            .map_err(|e| ExecutionError::AuthFailed(e.to_string()))?;

        info!("CLOB client authenticated successfully");

        Ok(Self {
            client: Arc::new(client),
            signer: Arc::new(signer),
            min_order_value,
        })
    }

    fn collateral_from_base_units(raw: Decimal) -> Decimal {
        raw / USDC_UNIT
    }

    fn parse_token_id(token_id: &str) -> Result<U256> {
        U256::from_str(token_id).map_err(|e| {
            ExecutionError::InvalidTokenId {
                token_id: token_id.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl OrderVenue for PolymarketExecutor {
    async fn submit_order(&self, order: &OrderRequest) -> Result<SubmittedOrder> {
        let side = match order.side {
            OrderSide::Buy => Side::Buy,
            OrderSide::Sell => Side::Sell,
        };
        let token_id = Self::parse_token_id(order.token_id.as_str())?;

        let unsigned = self
            .client
            .limit_order()
            .token_id(token_id)
            .side(side)
            .price(order.price)
            .size(order.size)
            .build()
            .await
            .map_err(|e| ExecutionError::OrderBuildFailed(e.to_string()))?;

        let signed = self
            .client
            .sign(self.signer.as_ref(), unsigned)
            .await
            .map_err(|e| ExecutionError::SigningFailed(e.to_string()))?;

        let response = self
            .client
            .post_order(signed)
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(e.to_string()))?;

        if !response.success {
            return Err(ExecutionError::OrderRejected(format!(
                "order {} not accepted by the CLOB",
                response.order_id
            ))
            .into());
        }

        info!(
            order_id = %response.order_id,
            token_id = %order.token_id,
            side = ?order.side,
            size = %order.size,
            price = %order.price,
            "Order submitted"
        );

        Ok(SubmittedOrder {
            order_id: OrderId::new(response.order_id),
        })
    }

    async fn collateral_balance(&self) -> Result<Decimal> {
        let request = BalanceAllowanceRequest::builder()
            .asset_type(AssetType::Collateral)
            .build();
        let response = self
            .client
            .balance_allowance(request)
            .await
            .map_err(|e| ExecutionError::BalanceQuery(e.to_string()))?;

        let balance = Self::collateral_from_base_units(response.balance);
        debug!(balance = %balance, "Fetched collateral balance");
        Ok(balance)
    }

    fn min_order_value(&self) -> Decimal {
        self.min_order_value
    }

    fn exchange_name(&self) -> &'static str {
        "Polymarket"
    }
}
