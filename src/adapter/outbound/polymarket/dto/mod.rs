//! Polymarket data transfer objects.
//!
//! - CLOB order book snapshots
//! - Data API positions

pub mod book;
pub mod position;
