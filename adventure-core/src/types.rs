//! Core type definitions shared by the adventure kernel.
//!
//! Identities are opaque 64-bit keys handed in by the host bot; the kernel
//! never interprets them beyond equality and ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Identifier of an isolated community (guild / server) with its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommunityId(pub u64);

/// Identifier of a user taking part in adventures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Actions & stats
// ---------------------------------------------------------------------------

/// The action type that produced the larger share of effect in a raid.
///
/// Running away is not a separate variant: it is recorded as either action
/// with an amount of `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainAction {
    /// Physical or magical damage dominated.
    Attack,
    /// Diplomacy dominated.
    Talk,
}

impl MainAction {
    /// Pick the dominant action from a raid's damage and diplomacy totals.
    ///
    /// Ties go to [`MainAction::Attack`].
    #[must_use]
    pub fn dominant(attack: f64, diplomacy: f64) -> Self {
        if attack >= diplomacy {
            Self::Attack
        } else {
            Self::Talk
        }
    }
}

impl fmt::Display for MainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Talk => write!(f, "talk"),
        }
    }
}

/// Which monster stat the next encounters should be tuned around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    /// Monsters are sized by hit points (the community mostly fights).
    #[default]
    Hp,
    /// Monsters are sized by diplomacy (the community mostly talks).
    Diplomacy,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hp => write!(f, "hp"),
            Self::Diplomacy => write!(f, "dipl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_prefers_attack_on_tie() {
        assert_eq!(MainAction::dominant(10.0, 10.0), MainAction::Attack);
        assert_eq!(MainAction::dominant(0.0, 0.0), MainAction::Attack);
    }

    #[test]
    fn dominant_picks_larger_total() {
        assert_eq!(MainAction::dominant(5.0, 12.0), MainAction::Talk);
        assert_eq!(MainAction::dominant(40.0, 12.0), MainAction::Attack);
    }

    #[test]
    fn stat_type_display_uses_short_names() {
        assert_eq!(StatType::Hp.to_string(), "hp");
        assert_eq!(StatType::Diplomacy.to_string(), "dipl");
    }
}
