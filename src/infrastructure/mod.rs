//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - [`AppContext`](bootstrap::AppContext), the composition root
//! - [`config`] - Configuration loading and validation

pub mod bootstrap;
pub mod config;
