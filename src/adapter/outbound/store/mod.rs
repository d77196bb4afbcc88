//! Pending-redemption store implementations.

mod json;
mod memory;

pub use json::JsonRedemptionStore;
pub use memory::MemoryRedemptionStore;
