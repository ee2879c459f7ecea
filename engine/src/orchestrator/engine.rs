//! Settlement engine - the administrative "close period" action.
//!
//! Wires the whole pipeline together over a [`RankingStore`]:
//!
//! ```text
//! For one (ranking, period):
//! 1. Manual override marker set (or caller bypass)? Adopt live order.
//! 2. Resolve the baseline (persisting the Start snapshot).
//! 3. Collect and schedule the period's round events.
//! 4. Run the validation/simulation loop.
//! 5. Violations and no bypass? Reject - nothing is persisted.
//! 6. Otherwise commit: End snapshot, final positions, audit log
//!    (replaced), period-closed flag, blue-point eligibility.
//! ```
//!
//! The computation is single-threaded and pure over its in-memory inputs;
//! the store is expected to serialize concurrent closes of the same
//! (ranking, period) and to commit step 6 atomically. A failed commit is
//! retried by recomputing from the same inputs.

use crate::baseline::{self, BaselineError};
use crate::eligibility::{self, BluePointEligibility};
use crate::events::{collect_events, schedule_events};
use crate::models::entry::{LadderEntry, Period, SnapshotKind};
use crate::models::event::RoundEvent;
use crate::models::member::live_order;
use crate::models::report::SettlementResult;
use crate::settlement::settle_round;
use crate::store::RankingStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Global settlement configuration.
///
/// # Fields
///
/// * `max_positions_up` - Furthest a standard challenge may reach up the
///   ladder (access challenges are threshold-checked instead)
/// * `blue_point_streak` - Consecutive flawless-defense periods required
///   for the blue-point win-streak rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Maximum positions a standard challenge may span (default 10)
    pub max_positions_up: u32,

    /// Consecutive defended periods required for blue point (default 1)
    pub blue_point_streak: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            max_positions_up: 10,
            blue_point_streak: 1,
        }
    }
}

/// Errors that abort a settlement run entirely.
///
/// Rule breaches never land here; they are collected as
/// [`Violation`](crate::Violation)s inside the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Baseline resolution failed; there is nothing to settle.
    #[error(transparent)]
    Baseline(#[from] BaselineError),
}

/// What closing a period produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseOutcome {
    /// Settlement accepted and persisted.
    Committed {
        result: SettlementResult,
        eligibility: Vec<BluePointEligibility>,
    },

    /// Violations found and no bypass requested; nothing was persisted and
    /// the ladder remains unchanged. The violations are surfaced for
    /// operator action (cancel or convert the offending challenge, then
    /// retry).
    Rejected { result: SettlementResult },
}

impl CloseOutcome {
    /// The settlement result regardless of outcome.
    pub fn result(&self) -> &SettlementResult {
        match self {
            CloseOutcome::Committed { result, .. } => result,
            CloseOutcome::Rejected { result } => result,
        }
    }

    /// Whether the settlement was persisted.
    pub fn is_committed(&self) -> bool {
        matches!(self, CloseOutcome::Committed { .. })
    }
}

// ============================================================================
// Settlement Engine
// ============================================================================

/// Drives period settlement over a [`RankingStore`].
///
/// # Example
/// ```
/// use ladder_settlement_core_rs::{
///     MemberRecord, MemoryStore, Period, SettlementConfig, SettlementEngine,
/// };
///
/// let mut store = MemoryStore::new();
/// store.add_member("club-a", MemberRecord::new("alice", 1));
/// store.add_member("club-a", MemberRecord::new("bob", 2));
///
/// let mut engine = SettlementEngine::new(store, SettlementConfig::default());
/// let outcome = engine
///     .close_period("club-a", Period::new(2026, 3), false)
///     .unwrap();
///
/// assert!(outcome.is_committed());
/// ```
pub struct SettlementEngine<S: RankingStore> {
    store: S,
    config: SettlementConfig,
}

impl<S: RankingStore> SettlementEngine<S> {
    /// Create an engine over a store.
    pub fn new(store: S, config: SettlementConfig) -> Self {
        Self { store, config }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store (setup and inspection).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the engine and return the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Compute the settlement for a period without committing anything.
    ///
    /// The only write this performs is the idempotent Start-snapshot
    /// persistence inside baseline resolution. The caller alone decides
    /// whether the result is committed (via [`close_period`]).
    ///
    /// [`close_period`]: Self::close_period
    pub fn settle(
        &mut self,
        ranking_id: &str,
        period: Period,
    ) -> Result<SettlementResult, SettlementError> {
        if self.store.manual_override(ranking_id, period) {
            return Ok(self.manual_result(ranking_id)?);
        }
        let (result, _) = self.compute(ranking_id, period)?;
        Ok(result)
    }

    /// Close a period: settle it and commit unless violations block it.
    ///
    /// `bypass` forces the manual-override path, exactly as the persisted
    /// period marker does: the live membership order is adopted verbatim
    /// and the settlement loop never runs.
    pub fn close_period(
        &mut self,
        ranking_id: &str,
        period: Period,
        bypass: bool,
    ) -> Result<CloseOutcome, SettlementError> {
        let manual = bypass || self.store.manual_override(ranking_id, period);

        let (result, events) = if manual {
            tracing::info!(%ranking_id, %period, "manual override: adopting live ladder order");
            let result = self.manual_result(ranking_id)?;
            let events = self.collect_period_events(ranking_id, period);
            (result, events)
        } else {
            self.compute(ranking_id, period)?
        };

        if !manual && !result.is_clean() {
            tracing::info!(
                %ranking_id,
                %period,
                violations = result.violations.len(),
                "settlement rejected; period left open"
            );
            return Ok(CloseOutcome::Rejected { result });
        }

        let eligibility = self.commit(ranking_id, period, &result, &events);
        Ok(CloseOutcome::Committed {
            result,
            eligibility,
        })
    }

    /// Baseline + collected events -> scheduled events -> settlement loop.
    fn compute(
        &mut self,
        ranking_id: &str,
        period: Period,
    ) -> Result<(SettlementResult, Vec<RoundEvent>), SettlementError> {
        let baseline = baseline::resolve(&mut self.store, ranking_id, period)?;
        let events = schedule_events(self.collect_period_events(ranking_id, period), &baseline);

        let result = settle_round(&baseline, &events, &self.config);
        Ok((result, events))
    }

    /// The manual-override result: live membership order adopted verbatim.
    fn manual_result(&self, ranking_id: &str) -> Result<SettlementResult, BaselineError> {
        let members = self.store.active_members(ranking_id);
        if members.is_empty() {
            return Err(BaselineError::NoMembers {
                ranking_id: ranking_id.to_string(),
            });
        }

        let final_order = live_order(&members)
            .iter()
            .enumerate()
            .map(|(slot, member)| LadderEntry::new(member.player_id.clone(), (slot + 1) as u32))
            .collect();

        Ok(SettlementResult {
            final_order,
            audit_log: vec!["Manual order override active; adopted live ladder order.".to_string()],
            violations: Vec::new(),
        })
    }

    /// The period's decided challenges, normalized but not yet scheduled.
    fn collect_period_events(&self, ranking_id: &str, period: Period) -> Vec<RoundEvent> {
        let records = self.store.completed_challenges(ranking_id, period.window());
        let threshold = self.store.access_threshold(ranking_id);
        collect_events(&records, threshold)
    }

    /// Persist an accepted settlement and run the eligibility pass.
    fn commit(
        &mut self,
        ranking_id: &str,
        period: Period,
        result: &SettlementResult,
        events: &[RoundEvent],
    ) -> Vec<BluePointEligibility> {
        self.store.persist_baseline_snapshot(
            ranking_id,
            period,
            SnapshotKind::End,
            &result.final_order,
        );
        self.store
            .persist_final_positions(ranking_id, &result.final_order);
        self.store
            .persist_audit_log(ranking_id, period, &result.audit_log);
        self.store.mark_period_closed(ranking_id, period);

        let members = self.store.active_members(ranking_id);
        let prior_streaks = self.store.defense_streaks(ranking_id);
        let threshold = self.store.access_threshold(ranking_id);

        let outcome = eligibility::evaluate(
            &result.final_order,
            &members,
            events,
            &prior_streaks,
            threshold,
            &self.config,
        );

        self.store
            .persist_defense_streaks(ranking_id, &outcome.streaks);
        self.store
            .persist_eligibility(ranking_id, &outcome.eligibility);

        tracing::info!(
            %ranking_id,
            %period,
            applied = result.audit_log.len(),
            "settlement committed"
        );

        outcome.eligibility
    }
}
