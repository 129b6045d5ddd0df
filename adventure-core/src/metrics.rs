//! Runtime counters for the raid history tracker.
//!
//! Counters are lock-free `AtomicU64`s bumped on the record path and read
//! on dashboard export, either as a [`CounterSnapshot`] or as
//! Prometheus-compatible text.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::history::RecordSummary;

/// Atomic counters for tracker events since startup.
pub struct RaidCounters {
    /// Raid outcomes recorded.
    pub outcomes_recorded: AtomicU64,
    /// Outcomes evicted from full windows.
    pub outcomes_evicted: AtomicU64,
    /// Manual participants granted the full window.
    pub manual_grants: AtomicU64,
    /// Auto participants granted the first-time allowance.
    pub fresh_grants: AtomicU64,
    /// Auto participants carried over with a decremented count.
    pub carried_members: AtomicU64,
    /// Auto participants whose countdown ran out.
    pub expired_members: AtomicU64,
    /// Roster members removed by exclusion.
    pub excluded_members: AtomicU64,
}

impl RaidCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes_recorded: AtomicU64::new(0),
            outcomes_evicted: AtomicU64::new(0),
            manual_grants: AtomicU64::new(0),
            fresh_grants: AtomicU64::new(0),
            carried_members: AtomicU64::new(0),
            expired_members: AtomicU64::new(0),
            excluded_members: AtomicU64::new(0),
        }
    }

    /// Fold one [`RecordSummary`] into the counters.
    pub fn observe(&self, summary: &RecordSummary) {
        let roster = &summary.roster;
        self.outcomes_recorded.fetch_add(1, Ordering::Relaxed);
        if summary.evicted {
            self.outcomes_evicted.fetch_add(1, Ordering::Relaxed);
        }
        self.manual_grants.fetch_add(roster.manual_grants as u64, Ordering::Relaxed);
        self.fresh_grants.fetch_add(roster.fresh_grants as u64, Ordering::Relaxed);
        self.carried_members.fetch_add(roster.carried as u64, Ordering::Relaxed);
        self.expired_members.fetch_add(roster.expired as u64, Ordering::Relaxed);
        self.excluded_members.fetch_add(roster.excluded as u64, Ordering::Relaxed);
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            outcomes_recorded: self.outcomes_recorded.load(Ordering::Relaxed),
            outcomes_evicted: self.outcomes_evicted.load(Ordering::Relaxed),
            manual_grants: self.manual_grants.load(Ordering::Relaxed),
            fresh_grants: self.fresh_grants.load(Ordering::Relaxed),
            carried_members: self.carried_members.load(Ordering::Relaxed),
            expired_members: self.expired_members.load(Ordering::Relaxed),
            excluded_members: self.excluded_members.load(Ordering::Relaxed),
        }
    }
}

impl Default for RaidCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RaidCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RaidCounters").field(&self.snapshot()).finish()
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Raid outcomes recorded.
    pub outcomes_recorded: u64,
    /// Outcomes evicted from full windows.
    pub outcomes_evicted: u64,
    /// Manual grants.
    pub manual_grants: u64,
    /// First-time auto grants.
    pub fresh_grants: u64,
    /// Carried auto members.
    pub carried_members: u64,
    /// Expired auto members.
    pub expired_members: u64,
    /// Excluded members.
    pub excluded_members: u64,
}

impl CounterSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP adventure_outcomes_recorded_total Raid outcomes recorded\n\
             # TYPE adventure_outcomes_recorded_total counter\n\
             adventure_outcomes_recorded_total {}\n\
             # HELP adventure_outcomes_evicted_total Raid outcomes evicted from full windows\n\
             # TYPE adventure_outcomes_evicted_total counter\n\
             adventure_outcomes_evicted_total {}\n\
             # HELP adventure_roster_grants_total Auto roster grants by kind\n\
             # TYPE adventure_roster_grants_total counter\n\
             adventure_roster_grants_total{{kind=\"manual\"}} {}\n\
             adventure_roster_grants_total{{kind=\"fresh\"}} {}\n\
             adventure_roster_grants_total{{kind=\"carried\"}} {}\n\
             # HELP adventure_roster_removals_total Auto roster removals by reason\n\
             # TYPE adventure_roster_removals_total counter\n\
             adventure_roster_removals_total{{reason=\"expired\"}} {}\n\
             adventure_roster_removals_total{{reason=\"excluded\"}} {}\n",
            self.outcomes_recorded,
            self.outcomes_evicted,
            self.manual_grants,
            self.fresh_grants,
            self.carried_members,
            self.expired_members,
            self.excluded_members,
        )
    }
}
