//! The in-memory ladder position engine.
//!
//! See `simulator.rs` for the array-backed implementation.

pub mod simulator;

pub use simulator::LadderSimulator;
