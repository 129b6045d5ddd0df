//! The raid history tracker: owned per-community state for the encounter
//! orchestrator.
//!
//! Each community's [`CommunityHistory`] sits behind its own mutex, so a
//! `record_outcome` call holds exclusive access for the whole
//! evict → read previous roster → append step. Different communities only
//! meet in the map lookup and otherwise proceed in parallel.
//!
//! ```
//! # use adventure_core::history::RaidReport;
//! # use adventure_core::tracker::RaidHistoryTracker;
//! # use adventure_core::types::{CommunityId, MainAction, UserId};
//! let tracker = RaidHistoryTracker::new(10);
//! let guild = CommunityId(1);
//! tracker.record_outcome(
//!     guild,
//!     &RaidReport::new(MainAction::Attack, 120.0, 2, true).with_manual([UserId(7)]),
//! );
//! assert_eq!(tracker.get_current_auto_roster(guild), vec![UserId(7)]);
//! let range = tracker.compute_difficulty_range(guild);
//! assert!(range.max_stat > range.min_stat);
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::{AdventureConfig, DifficultyConfig};
use crate::difficulty::{self, StatRange};
use crate::error::Result;
use crate::history::{CommunityHistory, RaidReport};
use crate::metrics::{CounterSnapshot, RaidCounters};
use crate::snapshot::{CommunitySnapshot, SNAPSHOT_FORMAT_VERSION, TrackerSnapshot};
use crate::types::{CommunityId, UserId};

type SharedHistory = Arc<Mutex<CommunityHistory>>;

/// Per-community raid history, auto roster and difficulty derivation.
pub struct RaidHistoryTracker {
    window_size: usize,
    difficulty: DifficultyConfig,
    communities: DashMap<CommunityId, SharedHistory>,
    counters: RaidCounters,
}

impl std::fmt::Debug for RaidHistoryTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaidHistoryTracker")
            .field("window_size", &self.window_size)
            .field("communities", &self.communities.len())
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl RaidHistoryTracker {
    /// Create a tracker retaining `window_size` outcomes per community, with
    /// default difficulty tuning.
    ///
    /// `window_size` must be at least 1; `0` is treated as `1`.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        debug_assert!(window_size >= 1, "window_size must be at least 1");
        Self {
            window_size: window_size.max(1),
            difficulty: DifficultyConfig::default(),
            communities: DashMap::new(),
            counters: RaidCounters::new(),
        }
    }

    /// Create a tracker from a validated configuration.
    ///
    /// # Errors
    /// Returns `AdventureError::Config` if the configuration is invalid.
    pub fn from_config(config: &AdventureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            difficulty: config.difficulty.clone(),
            ..Self::new(config.tracker.window_size)
        })
    }

    /// Maximum outcomes retained per community.
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of communities with recorded history.
    #[must_use]
    pub fn community_count(&self) -> usize {
        self.communities.len()
    }

    fn lookup(&self, community: CommunityId) -> Option<SharedHistory> {
        self.communities.get(&community).map(|entry| Arc::clone(entry.value()))
    }

    fn lookup_or_create(&self, community: CommunityId) -> SharedHistory {
        let entry = self
            .communities
            .entry(community)
            .or_insert_with(|| Arc::new(Mutex::new(CommunityHistory::new(self.window_size))));
        Arc::clone(entry.value())
    }

    /// Record the outcome of a concluded raid and derive the next auto roster.
    ///
    /// Creates the community's history on first use.
    pub fn record_outcome(&self, community: CommunityId, report: &RaidReport) {
        let shared = self.lookup_or_create(community);
        let mut history = shared.lock();
        let summary = history.record(report);
        let roster_size = history.current_roster().map_or(0, |r| r.len());
        let retained = history.len();
        drop(history);

        self.counters.observe(&summary);
        debug!(
            community = %community,
            action = %report.main_action,
            amount = report.amount,
            participants = report.participant_count,
            success = report.success,
            evicted = summary.evicted,
            retained,
            roster_size,
            expired = summary.roster.expired,
            excluded = summary.roster.excluded,
            "Recorded raid outcome"
        );
    }

    /// Users on the most recent outcome's auto roster, ascending by id.
    ///
    /// Empty when the community has no history.
    #[must_use]
    pub fn get_current_auto_roster(&self, community: CommunityId) -> Vec<UserId> {
        self.lookup(community)
            .map(|shared| {
                shared
                    .lock()
                    .current_roster()
                    .map(|roster| roster.users().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Derive the monster stat range from the community's retained outcomes.
    #[must_use]
    pub fn compute_difficulty_range(&self, community: CommunityId) -> StatRange {
        match self.lookup(community) {
            Some(shared) => {
                let history = shared.lock();
                difficulty::compute_stat_range(history.outcomes(), &self.difficulty)
            }
            None => StatRange::default(),
        }
    }

    /// A copy of the community's current history, if any.
    #[must_use]
    pub fn history(&self, community: CommunityId) -> Option<CommunityHistory> {
        self.lookup(community).map(|shared| shared.lock().clone())
    }

    /// Drop all state for a community. Returns whether it had any.
    pub fn forget(&self, community: CommunityId) -> bool {
        let removed = self.communities.remove(&community).is_some();
        if removed {
            debug!(community = %community, "Forgot community history");
        }
        removed
    }

    /// Lifetime counters.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Capture every community's history for the host's persistence layer.
    ///
    /// Each community is locked only while it is copied.
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        let shared: Vec<(CommunityId, SharedHistory)> = self
            .communities
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut communities: Vec<CommunitySnapshot> = shared
            .into_iter()
            .map(|(community, history)| CommunitySnapshot {
                community,
                outcomes: history.lock().outcomes().cloned().collect(),
            })
            .collect();
        communities.sort_by_key(|c| c.community);

        TrackerSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            window_size: self.window_size,
            communities,
        }
    }

    /// Replace all state with a previously captured snapshot.
    ///
    /// Communities with more outcomes than this tracker's window keep only
    /// their newest ones.
    ///
    /// # Errors
    /// Returns `AdventureError::UnsupportedSnapshot` for an unknown layout
    /// version; the tracker is left untouched in that case.
    pub fn restore(&self, snapshot: TrackerSnapshot) -> Result<()> {
        snapshot.check_version()?;

        let total = snapshot.outcome_count();
        let restored: Vec<(CommunityId, CommunityHistory)> = snapshot
            .communities
            .into_iter()
            .map(|c| {
                let (history, dropped) = CommunityHistory::from_outcomes(self.window_size, c.outcomes);
                if dropped > 0 {
                    warn!(
                        community = %c.community,
                        dropped,
                        window_size = self.window_size,
                        "Snapshot history exceeds window, dropping oldest outcomes"
                    );
                }
                (c.community, history)
            })
            .collect();

        self.communities.clear();
        let communities = restored.len();
        for (community, history) in restored {
            self.communities.insert(community, Arc::new(Mutex::new(history)));
        }

        info!(
            communities,
            outcomes = total,
            snapshot_window = snapshot.window_size,
            window_size = self.window_size,
            "Restored raid history snapshot"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MainAction, StatType};

    const GUILD: CommunityId = CommunityId(100);

    fn attack(amount: f64, people: u32, success: bool) -> RaidReport {
        RaidReport::new(MainAction::Attack, amount, people, success)
    }

    #[test]
    fn untouched_community_has_defaults() {
        let tracker = RaidHistoryTracker::new(5);
        assert!(tracker.get_current_auto_roster(GUILD).is_empty());
        let range = tracker.compute_difficulty_range(GUILD);
        assert_eq!(range.stat_type, StatType::Hp);
        assert!(range.max_stat.abs() < f64::EPSILON);
        assert_eq!(tracker.community_count(), 0, "reads must not create history");
    }

    #[test]
    fn record_creates_history_lazily() {
        let tracker = RaidHistoryTracker::new(5);
        tracker.record_outcome(GUILD, &attack(10.0, 2, true));
        assert_eq!(tracker.community_count(), 1);
        assert_eq!(tracker.history(GUILD).map(|h| h.len()), Some(1));
    }

    #[test]
    fn scenario_three_solo_wins() {
        let tracker = RaidHistoryTracker::new(3);
        for amount in [100.0, 200.0, 300.0] {
            tracker.record_outcome(GUILD, &attack(amount, 1, true));
        }
        let range = tracker.compute_difficulty_range(GUILD);
        assert_eq!(range.stat_type, StatType::Hp);
        assert!((range.win_rate - 1.0).abs() < 1e-9);
        assert!((range.min_stat - 187.5).abs() < 1e-9);
        assert!((range.max_stat - 500.0).abs() < 1e-9);
    }

    #[test]
    fn roster_lists_manual_and_auto_users() {
        let tracker = RaidHistoryTracker::new(4);
        tracker.record_outcome(
            GUILD,
            &attack(10.0, 3, true)
                .with_manual([UserId(3), UserId(1)])
                .with_auto([UserId(2)])
                .with_excluded([UserId(3)]),
        );
        assert_eq!(tracker.get_current_auto_roster(GUILD), vec![UserId(1), UserId(2)]);
    }

    #[test]
    fn forget_removes_state() {
        let tracker = RaidHistoryTracker::new(2);
        tracker.record_outcome(GUILD, &attack(1.0, 1, true));
        assert!(tracker.forget(GUILD));
        assert!(!tracker.forget(GUILD));
        assert!(tracker.history(GUILD).is_none());
    }

    #[test]
    fn from_config_applies_difficulty_tuning() {
        let config = AdventureConfig::from_toml(
            "[tracker]\nwindow_size = 2\n[difficulty]\nmax_multiplier = 4.0\n",
        )
        .expect("valid config");
        let tracker = RaidHistoryTracker::from_config(&config).expect("tracker");
        assert_eq!(tracker.window_size(), 2);
        tracker.record_outcome(GUILD, &attack(100.0, 2, true));
        assert!((tracker.compute_difficulty_range(GUILD).max_stat - 400.0).abs() < 1e-9);
    }

    #[test]
    fn from_config_rejects_invalid() {
        let mut config = AdventureConfig::default();
        config.tracker.window_size = 0;
        assert!(RaidHistoryTracker::from_config(&config).is_err());
    }

    #[test]
    fn counters_track_evictions() {
        let tracker = RaidHistoryTracker::new(2);
        for _ in 0..5 {
            tracker.record_outcome(GUILD, &attack(1.0, 2, true).with_manual([UserId(1)]));
        }
        let counters = tracker.counters();
        assert_eq!(counters.outcomes_recorded, 5);
        assert_eq!(counters.outcomes_evicted, 3);
        assert_eq!(counters.manual_grants, 5);
    }

    #[test]
    fn restore_trims_to_smaller_window() {
        let big = RaidHistoryTracker::new(6);
        for i in 0..6 {
            big.record_outcome(GUILD, &attack(f64::from(i), 2, true));
        }
        let small = RaidHistoryTracker::new(2);
        small.restore(big.snapshot()).expect("restore");
        let amounts: Vec<f64> = small
            .history(GUILD)
            .expect("restored")
            .outcomes()
            .map(|o| o.amount)
            .collect();
        assert_eq!(amounts, vec![4.0, 5.0]);
    }

    #[test]
    fn restore_rejects_unknown_version_and_keeps_state() {
        let tracker = RaidHistoryTracker::new(3);
        tracker.record_outcome(GUILD, &attack(1.0, 1, true));
        let mut snapshot = tracker.snapshot();
        snapshot.format_version = 99;
        snapshot.communities.clear();
        assert!(tracker.restore(snapshot).is_err());
        assert_eq!(tracker.community_count(), 1);
    }
}
