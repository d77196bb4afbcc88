//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for books, positions and pending redemptions.
//! - [`exchange`] - `ScriptedMarketData` and `RecordingVenue`.
//! - [`ledger`] - `ScriptedLedger` and `FixedSigner`.
//! - [`portfolio`] - `StaticPortfolio`.

pub mod domain;
pub mod exchange;
pub mod ledger;
pub mod portfolio;
