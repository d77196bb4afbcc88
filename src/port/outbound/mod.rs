//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the venue, portfolio service, chain access and
//! storage the execution and settlement services depend on.

pub mod exchange;
pub mod ledger;
pub mod portfolio;
pub mod store;
