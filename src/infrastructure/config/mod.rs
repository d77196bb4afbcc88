//! Infrastructure configuration modules.

pub mod execution;
pub mod logging;
pub mod redemption;
pub mod settings;
pub mod wallet;
