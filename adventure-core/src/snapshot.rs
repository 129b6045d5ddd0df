//! Serializable tracker snapshots for the host's persistence layer.
//!
//! The kernel never touches storage itself. The host takes a
//! [`TrackerSnapshot`], encodes it with [`TrackerSnapshot::to_json`] or
//! [`TrackerSnapshot::to_bincode`], stores the bytes wherever it likes and
//! hands a decoded snapshot back to
//! [`RaidHistoryTracker::restore`](crate::tracker::RaidHistoryTracker::restore)
//! after a restart.
//!
//! Outcome order and exact roster counts survive the round trip.

use serde::{Deserialize, Serialize};

use crate::error::{AdventureError, Result};
use crate::history::RaidOutcome;
use crate::types::CommunityId;

/// Snapshot layout version written by this build.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Full tracker state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    /// Layout version, see [`SNAPSHOT_FORMAT_VERSION`].
    pub format_version: u32,
    /// Window size of the tracker that produced the snapshot.
    pub window_size: usize,
    /// Per-community histories, ordered by community id.
    pub communities: Vec<CommunitySnapshot>,
}

/// One community's retained outcomes, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySnapshot {
    /// The community.
    pub community: CommunityId,
    /// Retained outcomes, oldest first.
    pub outcomes: Vec<RaidOutcome>,
}

impl TrackerSnapshot {
    /// Total outcomes across every community.
    #[must_use]
    pub fn outcome_count(&self) -> usize {
        self.communities.iter().map(|c| c.outcomes.len()).sum()
    }

    /// Encode as JSON.
    ///
    /// # Errors
    /// Returns [`AdventureError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| AdventureError::Serialization(e.to_string()))
    }

    /// Decode from JSON.
    ///
    /// # Errors
    /// Returns [`AdventureError::Serialization`] on malformed input.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| AdventureError::Serialization(e.to_string()))
    }

    /// Encode with bincode (compact, for hot saves).
    ///
    /// # Errors
    /// Returns [`AdventureError::Serialization`] if encoding fails.
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| AdventureError::Serialization(e.to_string()))
    }

    /// Decode from bincode.
    ///
    /// # Errors
    /// Returns [`AdventureError::Serialization`] on malformed input.
    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| AdventureError::Serialization(e.to_string()))
    }

    /// Reject snapshots written with a different layout.
    ///
    /// # Errors
    /// Returns [`AdventureError::UnsupportedSnapshot`] on a version mismatch.
    pub fn check_version(&self) -> Result<()> {
        if self.format_version == SNAPSHOT_FORMAT_VERSION {
            Ok(())
        } else {
            Err(AdventureError::UnsupportedSnapshot {
                found: self.format_version,
                supported: SNAPSHOT_FORMAT_VERSION,
            })
        }
    }
}
