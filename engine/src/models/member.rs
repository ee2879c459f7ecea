//! Active ranking membership.
//!
//! The membership row is what the host application stores per player and
//! ranking category: the live (current) position plus the flags the
//! settlement and eligibility passes need. Suspended members keep their
//! ladder slot but are excluded from eligibility and from the set of
//! potential challengers.

use serde::{Deserialize, Serialize};

/// One active member of a ranking category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Player identifier
    pub player_id: String,

    /// Stored live position (1-based); the pre-settlement working order
    pub live_position: u32,

    /// Member entered (or sits in) the access-challenge band
    pub is_access_challenge: bool,

    /// Suspended members cannot challenge, be challenged, or earn blue point
    pub is_suspended: bool,

    /// Current blue-point (priority challenge) status
    pub is_blue_point: bool,
}

impl MemberRecord {
    /// Create a plain active member with no flags set.
    pub fn new(player_id: impl Into<String>, live_position: u32) -> Self {
        Self {
            player_id: player_id.into(),
            live_position,
            is_access_challenge: false,
            is_suspended: false,
            is_blue_point: false,
        }
    }

    /// Mark the member suspended (builder pattern).
    pub fn suspended(mut self) -> Self {
        self.is_suspended = true;
        self
    }

    /// Mark the member as an access-challenge member (builder pattern).
    pub fn access_challenge(mut self) -> Self {
        self.is_access_challenge = true;
        self
    }

    /// Set the current blue-point flag (builder pattern).
    pub fn with_blue_point(mut self, is_blue_point: bool) -> Self {
        self.is_blue_point = is_blue_point;
        self
    }
}

/// Sort members into live ladder order: by stored position, ties by id.
///
/// Stored live positions may contain duplicates or gaps while the host
/// application is mid-edit; the id tie-break keeps the derived order
/// deterministic regardless.
pub fn live_order(members: &[MemberRecord]) -> Vec<MemberRecord> {
    let mut ordered = members.to_vec();
    ordered.sort_by(|a, b| {
        a.live_position
            .cmp(&b.live_position)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_order_sorts_by_position_then_id() {
        let members = vec![
            MemberRecord::new("carol", 2),
            MemberRecord::new("bob", 2),
            MemberRecord::new("alice", 1),
        ];

        let ordered = live_order(&members);
        let ids: Vec<&str> = ordered.iter().map(|m| m.player_id.as_str()).collect();

        assert_eq!(ids, vec!["alice", "bob", "carol"]);
    }
}
