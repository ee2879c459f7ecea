//! Challenge Ladder Core - Ranking Round Settlement Engine
//!
//! Deterministic monthly settlement for challenge-ladder ranking
//! categories: given a starting ladder order and the period's recorded
//! challenge outcomes, compute the new order, validate every outcome
//! against ladder rules, and produce an audit trail plus a list of rule
//! violations.
//!
//! # Architecture
//!
//! - **models**: Domain types (ladder entries, periods, members,
//!   challenges, round events, settlement results)
//! - **ladder**: Array-backed position-shifting simulator
//! - **baseline**: Period-start order resolution (snapshot fallback chain)
//! - **events**: Challenge-record normalization and deterministic ordering
//! - **settlement**: Rule validation and the settlement loop
//! - **eligibility**: Blue-point (priority challenge) recomputation
//! - **store**: Persistence port (trait + in-memory reference store)
//! - **orchestrator**: The "close period" action tying it all together
//!
//! # Critical Invariants
//!
//! 1. Ladder positions are dense unique integers `1..=N`
//! 2. Settlement is a pure function of `(baseline, events, config)`
//! 3. Violations are data: a rejected event never aborts the batch

// Module declarations
pub mod baseline;
pub mod eligibility;
pub mod events;
pub mod ladder;
pub mod models;
pub mod orchestrator;
pub mod settlement;
pub mod store;

// Re-exports for convenience
pub use baseline::BaselineError;
pub use eligibility::{BluePointEligibility, EligibilityOutcome};
pub use events::{collect_events, schedule_events};
pub use ladder::LadderSimulator;
pub use models::{
    challenge::ChallengeRecord,
    entry::{LadderEntry, Period, PeriodWindow, SnapshotKind},
    event::{Outcome, RoundEvent},
    member::MemberRecord,
    report::{SettlementResult, Violation},
};
pub use orchestrator::{CloseOutcome, SettlementConfig, SettlementEngine, SettlementError};
pub use settlement::settle_round;
pub use store::{MemoryStore, RankingStore};
