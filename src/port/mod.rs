//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                ┌──────────────────────────────┐
//!                │         Application          │
//!                │  OrderBookExecutor           │
//!                │  RedemptionManager           │
//!                └──────────────┬───────────────┘
//!          ┌──────────┬─────────┼──────────┬──────────────┐
//!          ▼          ▼         ▼          ▼              ▼
//!     MarketData  OrderVenue  Portfolio  Ledger /     RedemptionStore
//!                                        OwnerSigner
//! ```

pub mod outbound;
