//! In-memory [`Portfolio`] double.

use std::sync::atomic::{AtomicU32, Ordering};

use alloy_primitives::Address;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::position::Position;
use crate::error::{Error, Result};
use crate::port::outbound::portfolio::Portfolio;

/// Returns a settable list of positions and counts how often it was asked.
#[derive(Default)]
pub struct StaticPortfolio {
    positions: Mutex<Vec<Position>>,
    fail: Mutex<bool>,
    calls: AtomicU32,
}

impl StaticPortfolio {
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            positions: Mutex::new(positions),
            ..Self::default()
        }
    }

    pub fn set_positions(&self, positions: Vec<Position>) {
        *self.positions.lock() = positions;
    }

    /// Make subsequent fetches fail.
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock() = fail;
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Portfolio for StaticPortfolio {
    async fn redeemable_positions(&self, _owner: Address) -> Result<Vec<Position>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock() {
            return Err(Error::Io(std::io::Error::other("data api unavailable")));
        }
        Ok(self.positions.lock().clone())
    }
}
