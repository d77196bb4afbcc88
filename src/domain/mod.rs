//! Exchange-agnostic domain types: order books, purchase requests, positions
//! and settlement state.

pub mod book;
pub mod error;
pub mod execution;
pub mod id;
pub mod money;
pub mod position;
pub mod redemption;
pub mod settlement;
