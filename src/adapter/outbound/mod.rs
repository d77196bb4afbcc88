//! Outbound adapters (driven side).

#[cfg(feature = "polymarket")]
pub mod polymarket;
pub mod store;
