//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for sensitive values like `WALLET_PRIVATE_KEY`.
//!
//! # Example
//!
//! ```no_run
//! use bracketeer::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::execution::ExecutionConfig;
use super::logging::LoggingConfig;
use super::redemption::RedemptionConfig;
use super::wallet::WalletConfig;
use crate::adapter::outbound::polymarket::settings::PolymarketConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Exchange endpoints and HTTP client settings.
    #[serde(default)]
    pub polymarket: PolymarketConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Proxy wallet and owner key.
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Order-book execution settings.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Redemption cycle settings.
    #[serde(default)]
    pub redemption: RedemptionConfig,
}

fn read_keystore_password() -> Result<String> {
    if let Ok(password) = std::env::var("BRACKETEER_KEYSTORE_PASSWORD") {
        return Ok(password);
    }
    if let Ok(path) = std::env::var("BRACKETEER_KEYSTORE_PASSWORD_FILE") {
        let contents = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let password = contents.trim().to_string();
        if password.is_empty() {
            return Err(ConfigError::MissingField {
                field: "BRACKETEER_KEYSTORE_PASSWORD_FILE",
            }
            .into());
        }
        return Ok(password);
    }

    Err(ConfigError::MissingField {
        field: "BRACKETEER_KEYSTORE_PASSWORD",
    }
    .into())
}

fn decrypt_keystore_private_key(path: &str, password: &str) -> Result<String> {
    use alloy_signer_local::PrivateKeySigner;

    let signer = PrivateKeySigner::decrypt_keystore(path, password).map_err(|e| {
        ConfigError::InvalidValue {
            field: "keystore_path",
            reason: e.to_string(),
        }
    })?;
    Ok(format!("{:x}", signer.to_bytes()))
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the private key from the `WALLET_PRIVATE_KEY` environment variable
    /// or decrypts it from a keystore file if `keystore_path` is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, validation fails, or
    /// keystore decryption fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.wallet.private_key = std::env::var("WALLET_PRIVATE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if config.wallet.private_key.is_none() {
            if let Some(ref keystore_path) = config.wallet.keystore_path {
                let password = read_keystore_password()?;
                config.wallet.private_key =
                    Some(decrypt_keystore_private_key(keystore_path, &password)?);
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let poly = &self.polymarket;
        if poly.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if poly.data_api_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "data_api_url",
            }
            .into());
        }
        if poly.rpc_url.is_empty() {
            return Err(ConfigError::MissingField { field: "rpc_url" }.into());
        }
        if poly.http.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.execution.min_order_value < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "min_order_value",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.execution.default_days_to_expiry <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "default_days_to_expiry",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.redemption.check_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "check_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.redemption.resolution_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "resolution_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
