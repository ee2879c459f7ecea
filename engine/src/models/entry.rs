//! Ladder positions and settlement periods.
//!
//! A ladder is an ordered list of players for one ranking category and one
//! monthly period. Positions are dense unique integers `1..=N` with position
//! 1 at the top.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One row of a ladder order: a player at a position.
///
/// Positions in a ladder of `N` players form the dense set `1..=N`.
///
/// # Example
/// ```
/// use ladder_settlement_core_rs::LadderEntry;
///
/// let entry = LadderEntry::new("alice", 1);
/// assert_eq!(entry.position, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderEntry {
    /// Player identifier
    pub player_id: String,

    /// 1-based ladder position (1 = top rank)
    pub position: u32,
}

impl LadderEntry {
    /// Create a ladder entry.
    ///
    /// # Panics
    /// Panics if `position` is zero; ladder positions are 1-based.
    pub fn new(player_id: impl Into<String>, position: u32) -> Self {
        assert!(position > 0, "ladder positions are 1-based");
        Self {
            player_id: player_id.into(),
            position,
        }
    }
}

/// Which persisted snapshot of a period's ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    /// Order in effect at period start (the settlement baseline)
    Start,

    /// Order produced by an accepted settlement
    End,
}

/// A monthly settlement period.
///
/// # Example
/// ```
/// use ladder_settlement_core_rs::Period;
///
/// let period = Period::new(2026, 3);
/// assert_eq!(period.previous(), Period::new(2026, 2));
/// assert_eq!(Period::new(2026, 1).previous(), Period::new(2025, 12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year
    pub year: i32,

    /// Calendar month, 1-12
    pub month: u32,
}

impl Period {
    /// Create a period.
    ///
    /// # Panics
    /// Panics if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Self {
        assert!((1..=12).contains(&month), "month must be in 1..=12");
        Self { year, month }
    }

    /// The immediately preceding period.
    pub fn previous(&self) -> Period {
        if self.month == 1 {
            Period::new(self.year - 1, 12)
        } else {
            Period::new(self.year, self.month - 1)
        }
    }

    /// The immediately following period.
    pub fn next(&self) -> Period {
        if self.month == 12 {
            Period::new(self.year + 1, 1)
        } else {
            Period::new(self.year, self.month + 1)
        }
    }

    /// The half-open UTC time window `[start, end)` covered by this period.
    pub fn window(&self) -> PeriodWindow {
        let start = first_instant(self.year, self.month);
        let next = self.next();
        let end = first_instant(next.year, next.month);
        PeriodWindow { start, end }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Half-open UTC time window `[start, end)` of a settlement period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    /// Check whether an instant falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

fn first_instant(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("first day of month is a valid UTC instant")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "month must be in 1..=12")]
    fn test_invalid_month_panics() {
        Period::new(2026, 13);
    }

    #[test]
    fn test_previous_wraps_year() {
        assert_eq!(Period::new(2026, 1).previous(), Period::new(2025, 12));
    }

    #[test]
    fn test_window_covers_month() {
        let window = Period::new(2026, 2).window();

        let inside = Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

        assert!(window.contains(inside));
        assert!(!window.contains(before));
        assert!(!window.contains(after)); // End boundary is exclusive
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::new(2026, 3).to_string(), "2026-03");
    }
}
