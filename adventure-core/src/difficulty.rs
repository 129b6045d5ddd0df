//! Adaptive difficulty: derive a monster stat range from recent raids.
//!
//! Each raid's amount is tallied under its main action. Solo raids add a
//! surcharge on top so one player cannot farm monsters sized to their own
//! average. The dominant group's mean becomes `avg`:
//!
//! ```text
//!   win_rate >= target:  [avg × min_multiplier,  avg × max_multiplier]
//!   win_rate <  target:  [avg × win_rate,        avg × losing_max_multiplier]
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::DifficultyConfig;
use crate::history::RaidOutcome;
use crate::scaling::MonsterStats;
use crate::types::{MainAction, StatType};

/// Stat bounds for generating the next community encounter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatRange {
    /// Stat the bounds apply to.
    pub stat_type: StatType,
    /// Lower bound for the monster's biased stat.
    pub min_stat: f64,
    /// Upper bound for the monster's biased stat.
    pub max_stat: f64,
    /// Share of retained raids that were won, in `[0, 1]`.
    pub win_rate: f64,
    /// Solo-adjusted mean amount of attack-dominant raids (0 if none).
    pub average_attack: f64,
    /// Solo-adjusted mean amount of talk-dominant raids (0 if none).
    pub average_talk: f64,
}

impl StatRange {
    /// Draw a stat uniformly from `[min_stat, max_stat]`.
    ///
    /// Returns `min_stat` when the range is empty or degenerate.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max_stat > self.min_stat {
            rng.gen_range(self.min_stat..=self.max_stat)
        } else {
            self.min_stat
        }
    }

    /// Whether a monster's biased stat falls inside the range.
    #[must_use]
    pub fn admits(&self, monster: &MonsterStats) -> bool {
        let stat = match self.stat_type {
            StatType::Hp => monster.hp,
            StatType::Diplomacy => monster.dipl,
        };
        (self.min_stat..=self.max_stat).contains(&stat)
    }
}

impl fmt::Display for StatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Main Stat: {}\nMin Stat: {:.2}\nMax Stat: {:.2}\nWin%: {:.2}",
            self.stat_type,
            self.min_stat,
            self.max_stat,
            self.win_rate * 100.0
        )
    }
}

#[derive(Default)]
struct Tally {
    total: f64,
    count: u32,
}

impl Tally {
    fn add(&mut self, outcome: &RaidOutcome, solo_surcharge: f64) {
        self.count += 1;
        self.total += outcome.amount;
        if outcome.participant_count == 1 {
            self.total += outcome.amount * solo_surcharge;
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.total / f64::from(self.count) }
    }
}

/// Compute the stat range for a sequence of retained outcomes.
///
/// An empty sequence yields the all-zero, hp-biased range.
#[must_use]
pub fn compute_stat_range<'a, I>(outcomes: I, config: &DifficultyConfig) -> StatRange
where
    I: IntoIterator<Item = &'a RaidOutcome>,
{
    let mut attack = Tally::default();
    let mut talk = Tally::default();
    let mut wins: u32 = 0;
    let mut raids: u32 = 0;

    for outcome in outcomes {
        match outcome.main_action {
            MainAction::Attack => attack.add(outcome, config.solo_surcharge),
            MainAction::Talk => talk.add(outcome, config.solo_surcharge),
        }
        trace!(
            action = %outcome.main_action,
            amount = outcome.amount,
            participants = outcome.participant_count,
            success = outcome.success,
            "Tallied raid"
        );
        raids += 1;
        if outcome.success {
            wins += 1;
        }
    }

    if raids == 0 {
        return StatRange::default();
    }

    let average_attack = attack.mean();
    let average_talk = talk.mean();

    // Literal comparison: diplomacy only when the attack total is strictly
    // smaller than the talk total.
    let (stat_type, avg_amount) = if attack.total < talk.total {
        (StatType::Diplomacy, average_talk)
    } else {
        (StatType::Hp, average_attack)
    };

    let win_rate = f64::from(wins) / f64::from(raids);
    let (min_stat, max_stat) = if win_rate < config.target_win_rate {
        (avg_amount * win_rate, avg_amount * config.losing_max_multiplier)
    } else {
        (avg_amount * config.min_multiplier, avg_amount * config.max_multiplier)
    };

    StatRange {
        stat_type,
        min_stat,
        max_stat,
        win_rate,
        average_attack,
        average_talk,
    }
}
