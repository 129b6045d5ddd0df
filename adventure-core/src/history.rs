//! Per-community raid history: a bounded FIFO of concluded raids.
//!
//! The buffer evicts strictly by insertion order. Reading an outcome never
//! refreshes it, so this is a ring buffer, not an LRU.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::roster::{self, AutoRoster, RosterUpdate};
use crate::types::{MainAction, UserId};

/// Immutable record of one concluded raid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidOutcome {
    /// Action type that dealt the larger share of effect.
    pub main_action: MainAction,
    /// Magnitude of the dominant effect (non-negative).
    pub amount: f64,
    /// Number of participants (at least 1).
    pub participant_count: u32,
    /// Whether the monster was slain or persuaded.
    pub success: bool,
    /// Auto-participation roster produced by this raid.
    pub auto_roster: AutoRoster,
}

/// Everything the encounter orchestrator reports when a raid concludes.
///
/// Preconditions (not checked): `amount >= 0` and `participant_count >= 1`.
#[derive(Debug, Clone)]
pub struct RaidReport {
    /// Action type that dealt the larger share of effect.
    pub main_action: MainAction,
    /// Magnitude of the dominant effect.
    pub amount: f64,
    /// Number of participants.
    pub participant_count: u32,
    /// Whether the raid was won.
    pub success: bool,
    /// Users who took an explicit action this raid.
    pub manual_participants: Vec<UserId>,
    /// Users who were acting automatically going into this raid.
    pub candidate_auto_participants: Vec<UserId>,
    /// Users to drop from the next roster regardless of anything else.
    pub excluded_participants: Vec<UserId>,
}

impl RaidReport {
    /// A report with no participants lists; fill them with the builder
    /// methods below.
    #[must_use]
    pub fn new(main_action: MainAction, amount: f64, participant_count: u32, success: bool) -> Self {
        Self {
            main_action,
            amount,
            participant_count,
            success,
            manual_participants: Vec::new(),
            candidate_auto_participants: Vec::new(),
            excluded_participants: Vec::new(),
        }
    }

    /// Set the manual participants.
    #[must_use]
    pub fn with_manual(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.manual_participants = users.into_iter().collect();
        self
    }

    /// Set the auto participants going into this raid.
    #[must_use]
    pub fn with_auto(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.candidate_auto_participants = users.into_iter().collect();
        self
    }

    /// Set the users excluded from the next roster.
    #[must_use]
    pub fn with_excluded(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.excluded_participants = users.into_iter().collect();
        self
    }
}

/// Outcome of [`CommunityHistory::record`], for logging and counters.
#[derive(Debug, Clone)]
pub struct RecordSummary {
    /// Whether the oldest outcome was evicted to make room.
    pub evicted: bool,
    /// Roster computation tallies.
    pub roster: RosterUpdate,
}

/// Bounded history of one community's recent raids.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityHistory {
    window_size: usize,
    outcomes: VecDeque<RaidOutcome>,
}

impl CommunityHistory {
    /// Create an empty history holding at most `window_size` outcomes.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            outcomes: VecDeque::with_capacity(window_size),
        }
    }

    /// Rebuild a history from stored outcomes, oldest first.
    ///
    /// Keeps only the newest `window_size` outcomes. Returns the history and
    /// the number of outcomes dropped.
    #[must_use]
    pub fn from_outcomes(window_size: usize, outcomes: Vec<RaidOutcome>) -> (Self, usize) {
        let mut history = Self::new(window_size);
        let dropped = outcomes.len().saturating_sub(history.window_size);
        history.outcomes.extend(outcomes.into_iter().skip(dropped));
        (history, dropped)
    }

    /// Append the outcome of a concluded raid.
    ///
    /// Evicts the oldest outcome first when full, then derives the new
    /// roster from whatever outcome is newest after eviction.
    pub fn record(&mut self, report: &RaidReport) -> RecordSummary {
        let evicted = if self.outcomes.len() >= self.window_size {
            self.outcomes.pop_front().is_some()
        } else {
            false
        };

        let update = roster::next_roster(
            self.outcomes.back().map(|o| &o.auto_roster),
            &report.manual_participants,
            &report.candidate_auto_participants,
            &report.excluded_participants,
            self.window_size,
        );

        self.outcomes.push_back(RaidOutcome {
            main_action: report.main_action,
            amount: report.amount,
            participant_count: report.participant_count,
            success: report.success,
            auto_roster: update.roster.clone(),
        });

        RecordSummary { evicted, roster: update }
    }

    /// Maximum number of retained outcomes.
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Retained outcomes, oldest first.
    pub fn outcomes(&self) -> impl ExactSizeIterator<Item = &RaidOutcome> + DoubleEndedIterator {
        self.outcomes.iter()
    }

    /// Most recent outcome.
    #[must_use]
    pub fn latest(&self) -> Option<&RaidOutcome> {
        self.outcomes.back()
    }

    /// Roster attached to the most recent outcome.
    #[must_use]
    pub fn current_roster(&self) -> Option<&AutoRoster> {
        self.latest().map(|o| &o.auto_roster)
    }

    /// Number of retained outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no raid has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack(amount: f64) -> RaidReport {
        RaidReport::new(MainAction::Attack, amount, 2, true)
    }

    #[test]
    fn window_is_never_exceeded() {
        let mut history = CommunityHistory::new(3);
        for i in 0..10 {
            history.record(&attack(f64::from(i)));
            assert!(history.len() <= 3);
        }
        let amounts: Vec<f64> = history.outcomes().map(|o| o.amount).collect();
        assert_eq!(amounts, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn eviction_reported_only_when_full() {
        let mut history = CommunityHistory::new(2);
        assert!(!history.record(&attack(1.0)).evicted);
        assert!(!history.record(&attack(2.0)).evicted);
        assert!(history.record(&attack(3.0)).evicted);
    }

    #[test]
    fn zero_window_is_treated_as_one() {
        let history = CommunityHistory::new(0);
        assert_eq!(history.window_size(), 1);
    }

    #[test]
    fn single_window_regrants_after_eviction() {
        // With one slot the previous outcome is evicted before the roster is
        // derived, so every candidate looks new again.
        let mut history = CommunityHistory::new(1);
        history.record(&attack(1.0).with_auto([UserId(4)]));
        history.record(&attack(1.0).with_auto([UserId(4)]));
        let roster = history.current_roster().expect("outcome recorded");
        assert_eq!(roster.remaining(UserId(4)), Some(1));
    }

    #[test]
    fn roster_decays_across_raids() {
        let mut history = CommunityHistory::new(2);
        history.record(&attack(1.0).with_manual([UserId(1)]));
        assert_eq!(history.current_roster().and_then(|r| r.remaining(UserId(1))), Some(2));
        history.record(&attack(1.0).with_auto([UserId(1)]));
        assert_eq!(history.current_roster().and_then(|r| r.remaining(UserId(1))), Some(1));
        history.record(&attack(1.0).with_auto([UserId(1)]));
        assert_eq!(history.current_roster().map(AutoRoster::len), Some(0));
    }

    #[test]
    fn from_outcomes_keeps_newest() {
        let mut source = CommunityHistory::new(5);
        for i in 0..5 {
            source.record(&attack(f64::from(i)));
        }
        let outcomes: Vec<RaidOutcome> = source.outcomes().cloned().collect();
        let (trimmed, dropped) = CommunityHistory::from_outcomes(2, outcomes);
        assert_eq!(dropped, 3);
        let amounts: Vec<f64> = trimmed.outcomes().map(|o| o.amount).collect();
        assert_eq!(amounts, vec![3.0, 4.0]);
    }
}
