//! CLI module graph.

pub mod balance;
pub mod command;
pub mod execute;
pub mod output;
pub mod paths;
pub mod pending;
pub mod preview;
pub mod redeem;
pub mod run;
