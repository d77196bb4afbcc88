//! Polymarket exchange configuration.

use serde::Deserialize;

/// Polygon mainnet chain ID, the only chain the settlement contracts live on.
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Polymarket HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolymarketHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    2000
}

const fn default_http_retry_max_attempts() -> u32 {
    3
}

const fn default_http_retry_backoff_ms() -> u64 {
    500
}

impl Default for PolymarketHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

/// Polymarket exchange configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolymarketConfig {
    /// CLOB REST API URL (order books, order submission).
    #[serde(default = "default_polymarket_api_url")]
    pub api_url: String,
    /// Data API URL (positions).
    #[serde(default = "default_polymarket_data_api_url")]
    pub data_api_url: String,
    /// Polygon JSON-RPC endpoint.
    #[serde(default = "default_polygon_rpc_url")]
    pub rpc_url: String,
    /// Chain ID used for order signatures.
    #[serde(default = "default_polymarket_chain_id")]
    pub chain_id: u64,
    /// HTTP client configuration for REST API calls.
    #[serde(default)]
    pub http: PolymarketHttpConfig,
}

fn default_polymarket_api_url() -> String {
    "https://clob.polymarket.com".into()
}

fn default_polymarket_data_api_url() -> String {
    "https://data-api.polymarket.com".into()
}

fn default_polygon_rpc_url() -> String {
    "https://polygon-rpc.com".into()
}

const fn default_polymarket_chain_id() -> u64 {
    POLYGON_CHAIN_ID
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            api_url: default_polymarket_api_url(),
            data_api_url: default_polymarket_data_api_url(),
            rpc_url: default_polygon_rpc_url(),
            chain_id: default_polymarket_chain_id(),
            http: PolymarketHttpConfig::default(),
        }
    }
}
