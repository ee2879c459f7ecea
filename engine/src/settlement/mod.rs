//! Rule validation and the settlement loop.
//!
//! `rules` rejects illegal events as violations; `round` drives the
//! validated batch through the ladder simulator and assembles the
//! settlement result.

pub mod round;
pub mod rules;

pub use round::settle_round;
pub use rules::{validate_event, ValidEvent};
