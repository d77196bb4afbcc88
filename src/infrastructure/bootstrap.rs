//! Composition root for runtime wiring.
//!
//! [`AppContext`] is built once at startup from the loaded configuration and
//! handed to every command by reference. It owns the shared REST client;
//! components that need the owner key are built on demand so read-only
//! commands run without one.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::polymarket::client::PolymarketClient;
use crate::adapter::outbound::polymarket::executor::PolymarketExecutor;
use crate::adapter::outbound::polymarket::ledger::PolygonLedger;
use crate::adapter::outbound::polymarket::signer::LocalOwnerSigner;
use crate::adapter::outbound::store::JsonRedemptionStore;
use crate::application::execution::OrderBookExecutor;
use crate::application::redemption::RedemptionManager;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::exchange::{MarketData, OrderVenue};
use crate::port::outbound::ledger::OwnerSigner;

/// Process-wide configuration and clients.
pub struct AppContext {
    config: Config,
    client: Arc<PolymarketClient>,
}

impl AppContext {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let client = Arc::new(PolymarketClient::from_config(&config.polymarket));
        Self { config, client }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only source of order books.
    #[must_use]
    pub fn market_data(&self) -> Arc<dyn MarketData> {
        self.client.clone()
    }

    /// Build the owner signer from the configured key.
    ///
    /// # Errors
    ///
    /// Fails if no key is configured or it does not parse.
    pub fn signer(&self) -> Result<LocalOwnerSigner> {
        LocalOwnerSigner::from_private_key(
            self.config.wallet.private_key()?,
            self.config.polymarket.chain_id,
        )
    }

    /// Build an executor backed by an authenticated CLOB client.
    ///
    /// # Errors
    ///
    /// Fails if the key is missing or CLOB authentication fails.
    pub async fn order_executor(&self) -> Result<OrderBookExecutor> {
        let signer = self.signer()?;
        let venue = PolymarketExecutor::new(
            &self.config.polymarket.api_url,
            signer.inner().clone(),
            self.config.execution.min_order_value,
        )
        .await?;

        let venue: Arc<dyn OrderVenue> = Arc::new(venue);
        Ok(OrderBookExecutor::new(self.market_data(), venue))
    }

    /// The pending store, at the configured path or `default_path`.
    #[must_use]
    pub fn pending_store(&self, default_path: PathBuf) -> JsonRedemptionStore {
        JsonRedemptionStore::new(
            self.config
                .redemption
                .pending_path
                .clone()
                .unwrap_or(default_path),
        )
    }

    /// Build a redemption manager over Polygon, reloading `store`.
    ///
    /// # Errors
    ///
    /// Fails if the wallet is not fully configured, the RPC URL is invalid,
    /// or the pending store cannot be read.
    pub fn redemption_manager(&self, store: JsonRedemptionStore) -> Result<RedemptionManager> {
        let funder = self.config.wallet.funder_address()?;
        let signer = self.signer()?;
        let ledger = PolygonLedger::new(&self.config.polymarket.rpc_url, signer.inner().clone())?;

        info!(
            owner = %signer.address(),
            funder = %funder,
            pending_path = %store.path().display(),
            "Redemption manager configured"
        );

        RedemptionManager::new(
            Arc::new(ledger),
            Arc::new(signer),
            self.client.clone(),
            Arc::new(store),
            self.config.redemption.settings(funder),
        )
    }
}
