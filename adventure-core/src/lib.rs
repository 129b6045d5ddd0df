//! # Adventure Core Library
//!
//! Host-agnostic kernel of the adventure minigame. The chat-bot host runs
//! raids, renders them and stores data; this crate keeps the numbers that
//! make consecutive raids feel fair:
//!
//! - **History**: a bounded FIFO of each community's recent raid outcomes
//! - **Roster**: who keeps acting automatically, with decaying eligibility
//! - **Difficulty**: the monster stat range derived from recent outcomes
//! - **Scaling**: monster stats rolled against that range
//! - **Snapshot**: the state in a form the host can persist and restore
//!
//! All operations are synchronous, in memory and O(window size).

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod difficulty;
pub mod error;
pub mod history;
pub mod metrics;
pub mod roster;
pub mod scaling;
pub mod snapshot;
pub mod tracker;
pub mod types;

pub use config::AdventureConfig;
pub use difficulty::StatRange;
pub use error::AdventureError;
pub use history::{CommunityHistory, RaidOutcome, RaidReport};
pub use roster::AutoRoster;
pub use tracker::RaidHistoryTracker;
pub use types::*;
