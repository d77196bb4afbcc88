//! Implementations of ports (hexagonal adapters).

#[cfg(feature = "polymarket")]
pub mod inbound;
pub mod outbound;
