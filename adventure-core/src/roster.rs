//! Auto-participation roster with decaying eligibility.
//!
//! After every raid the kernel decides who keeps acting automatically in the
//! next one. Each member carries a countdown of remaining raids:
//!
//! ```text
//!   manual action this raid      → window_size
//!   auto, new to the roster      → 2 × window_size − 1
//!   auto, carried from last raid → previous − 1   (dropped at 0)
//!   excluded (opt-out, DND)      → removed, always
//! ```
//!
//! A manual action always resets the countdown; the decay step never
//! overwrites a manual grant made in the same raid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Users eligible for automatic participation, with their remaining count.
///
/// Keys are kept in ascending order so roster listings are deterministic.
/// Serializes as a list of [`RosterEntry`] so text formats need no
/// non-string map keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RosterEntry>", into = "Vec<RosterEntry>")]
pub struct AutoRoster {
    members: BTreeMap<UserId, usize>,
}

/// One serialized roster member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// The member.
    pub user: UserId,
    /// Raids left before the member ages out.
    pub remaining: usize,
}

impl AutoRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining eligibility for `user`, if on the roster.
    #[must_use]
    pub fn remaining(&self, user: UserId) -> Option<usize> {
        self.members.get(&user).copied()
    }

    /// Whether `user` is on the roster.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.members.contains_key(&user)
    }

    /// Members in ascending id order.
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.members.keys().copied()
    }

    /// `(user, remaining)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (UserId, usize)> + '_ {
        self.members.iter().map(|(user, remaining)| (*user, *remaining))
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl From<Vec<RosterEntry>> for AutoRoster {
    fn from(entries: Vec<RosterEntry>) -> Self {
        Self {
            members: entries.into_iter().map(|e| (e.user, e.remaining)).collect(),
        }
    }
}

impl From<AutoRoster> for Vec<RosterEntry> {
    fn from(roster: AutoRoster) -> Self {
        roster
            .members
            .into_iter()
            .map(|(user, remaining)| RosterEntry { user, remaining })
            .collect()
    }
}

impl FromIterator<(UserId, usize)> for AutoRoster {
    fn from_iter<I: IntoIterator<Item = (UserId, usize)>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// Result of one roster computation, with per-rule tallies for logging and
/// counters.
#[derive(Debug, Clone, Default)]
pub struct RosterUpdate {
    /// The roster to attach to the new outcome.
    pub roster: AutoRoster,
    /// Manual participants granted the full window.
    pub manual_grants: usize,
    /// Auto participants granted the long first-time allowance.
    pub fresh_grants: usize,
    /// Auto participants carried over with one fewer raid.
    pub carried: usize,
    /// Auto participants whose countdown ran out.
    pub expired: usize,
    /// Members removed by exclusion.
    pub excluded: usize,
}

/// Eligibility granted to a user who acted manually.
#[must_use]
pub fn manual_allowance(window_size: usize) -> usize {
    window_size
}

/// Eligibility granted to an auto participant new to the roster.
#[must_use]
pub fn fresh_allowance(window_size: usize) -> usize {
    (window_size.saturating_mul(2)).saturating_sub(1)
}

/// Compute the roster for the next raid.
///
/// `previous` is the roster attached to the newest stored outcome, or `None`
/// when the community has no stored outcome at all.
#[must_use]
pub fn next_roster(
    previous: Option<&AutoRoster>,
    manual: &[UserId],
    candidates: &[UserId],
    excluded: &[UserId],
    window_size: usize,
) -> RosterUpdate {
    let mut members = BTreeMap::new();
    let mut update = RosterUpdate::default();

    for &user in manual {
        if members.insert(user, manual_allowance(window_size)).is_none() {
            update.manual_grants += 1;
        }
    }

    for &user in candidates {
        if members.contains_key(&user) {
            continue; // manual grant (or a duplicate candidate) already decided
        }
        match previous.and_then(|roster| roster.remaining(user)) {
            Some(count) => {
                let left = count.saturating_sub(1);
                if left == 0 {
                    update.expired += 1;
                } else {
                    members.insert(user, left);
                    update.carried += 1;
                }
            }
            None => {
                members.insert(user, fresh_allowance(window_size));
                update.fresh_grants += 1;
            }
        }
    }

    for user in excluded {
        if members.remove(user).is_some() {
            update.excluded += 1;
        }
    }

    update.roster = AutoRoster { members };
    update
}
