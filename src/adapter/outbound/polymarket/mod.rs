//! Polymarket exchange and Polygon settlement integration.

pub mod client;
pub mod dto;
pub mod executor;
pub mod ledger;
pub mod settings;
pub mod signer;
