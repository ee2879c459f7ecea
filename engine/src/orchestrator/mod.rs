//! Settlement engine - the "close period" management action.
//!
//! See `engine.rs` for the full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{CloseOutcome, SettlementConfig, SettlementEngine, SettlementError};
