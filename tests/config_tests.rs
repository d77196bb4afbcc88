//! Integration tests for configuration loading.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy_primitives::address;
use bracketeer::error::{ConfigError, Error};
use bracketeer::infrastructure::config::settings::Config;
use rust_decimal_macros::dec;

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("bracketeer-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn full_config_loads() {
    let toml = r#"
[polymarket]
api_url = "https://clob.polymarket.com"
data_api_url = "https://data-api.polymarket.com"
rpc_url = "https://polygon-rpc.com"

[polymarket.http]
timeout_ms = 5000
retry_max_attempts = 2

[logging]
level = "debug"
format = "json"

[wallet]
funder_address = "0x56687bf447db6ffa42ffe2204a05edaa20f55839"

[execution]
min_order_value = 5
default_days_to_expiry = 14

[redemption]
check_interval_secs = 60
settlement_delay_secs = 3
resolution_timeout_secs = 2
pending_path = "/var/lib/bracketeer/pending.json"
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);
    let config = result.expect("config loads");

    assert_eq!(config.polymarket.http.timeout_ms, 5000);
    assert_eq!(config.polymarket.http.retry_max_attempts, 2);
    assert_eq!(config.logging.format, "json");
    assert_eq!(
        config.wallet.funder_address().unwrap(),
        address!("56687bf447db6ffa42ffe2204a05edaa20f55839")
    );
    assert_eq!(config.execution.min_order_value, dec!(5));
    assert_eq!(config.execution.default_days_to_expiry, dec!(14));

    let funder = config.wallet.funder_address().unwrap();
    let settings = config.redemption.settings(funder);
    assert_eq!(settings.check_interval, Duration::from_secs(60));
    assert_eq!(settings.settlement_delay, Duration::from_secs(3));
    assert_eq!(settings.resolution_timeout, Duration::from_secs(2));
    assert_eq!(
        config.redemption.pending_path,
        Some(PathBuf::from("/var/lib/bracketeer/pending.json"))
    );
}

#[test]
fn config_rejects_zero_check_interval() {
    let path = write_temp_config("[redemption]\ncheck_interval_secs = 0\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "check_interval_secs",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid interval error, got {err}"),
        Ok(_) => panic!("Expected zero interval to be rejected"),
    }
}

#[test]
fn config_rejects_empty_rpc_url() {
    let path = write_temp_config("[polymarket]\nrpc_url = \"\"\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingField { field: "rpc_url" }))
    ));
}

#[test]
fn config_rejects_negative_min_order_value() {
    let path = write_temp_config("[execution]\nmin_order_value = -1\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "min_order_value",
            ..
        }))
    ));
}

#[test]
fn config_rejects_unknown_log_format() {
    let path = write_temp_config("[logging]\nformat = \"xml\"\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(result.is_err());
}

#[test]
fn missing_funder_is_reported_by_name() {
    let path = write_temp_config("");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);
    let config = result.expect("empty config is valid");

    assert!(matches!(
        config.wallet.funder_address(),
        Err(Error::Config(ConfigError::MissingField {
            field: "wallet.funder_address"
        }))
    ));
}

#[test]
fn missing_file_is_read_error() {
    let result = Config::load("/nonexistent/bracketeer/config.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}
