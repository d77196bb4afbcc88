//! Bracketeer - capped order-book purchases and position redemption for
//! Polymarket.
//!
//! Two services sit at the core:
//!
//! - [`application::execution::OrderBookExecutor`] walks a token's ask
//!   ladder to preview or place a purchase bounded by a price cap and an
//!   optional budget.
//! - [`application::redemption::RedemptionManager`] finds winning positions
//!   in resolved markets and redeems them through the owner's Safe proxy
//!   wallet, remembering unconfirmed transactions in a durable pending store.
//!
//! # Layout
//!
//! - [`domain`] - Books, requests, positions and redemption records
//! - [`port`] - Traits the services depend on
//! - [`application`] - The services themselves
//! - [`adapter`] - Polymarket, Polygon and file-store implementations, plus the CLI
//! - [`infrastructure`] - Configuration and wiring (requires `polymarket` feature)
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `polymarket` - Polymarket CLOB, data API and Polygon RPC adapters (default)
//! - `testkit` - In-memory fakes and builders for integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(feature = "polymarket")]
pub mod infrastructure;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
