//! Path utilities for bracketeer.
//!
//! All data lives under `~/.bracketeer/`:
//! - `~/.bracketeer/config.toml` - main configuration
//! - `~/.bracketeer/pending-redemptions.json` - unconfirmed redemptions

use std::path::PathBuf;

/// Returns the bracketeer home directory (`~/.bracketeer/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bracketeer")
}

/// Returns the default config file path (`~/.bracketeer/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default pending-redemption file.
pub fn default_pending_store() -> PathBuf {
    home_dir().join("pending-redemptions.json")
}
