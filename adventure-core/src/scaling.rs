//! Monster stat scaling driven by the community's difficulty range.
//!
//! Every scaled stat is `value × U(win_rate, win_rate + spread)`, so a
//! community that keeps losing meets weaker monsters. Hit points and
//! diplomacy follow the community's own averages once it has any; defences
//! only fluctuate around the monster's base values.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ScalingConfig;
use crate::difficulty::StatRange;

/// The stats of a monster that encounter generation tunes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterStats {
    /// Hit points: damage needed to slay.
    pub hp: f64,
    /// Diplomacy: persuasion needed to talk it down.
    pub dipl: f64,
    /// Physical defence multiplier.
    pub pdef: f64,
    /// Magical defence multiplier.
    pub mdef: f64,
    /// Charisma defence multiplier.
    #[serde(default = "default_cdef")]
    pub cdef: f64,
}

impl Default for MonsterStats {
    fn default() -> Self {
        Self {
            hp: 0.0,
            dipl: 0.0,
            pdef: 1.0,
            mdef: 1.0,
            cdef: 1.0,
        }
    }
}

fn default_cdef() -> f64 {
    1.0
}

/// Scale `value` by a factor drawn uniformly from `[bottom, bottom + spread]`.
pub fn fluctuate<R: Rng + ?Sized>(rng: &mut R, value: f64, bottom: f64, spread: f64) -> f64 {
    if spread <= 0.0 {
        return bottom * value;
    }
    rng.gen_range(bottom..=bottom + spread) * value
}

/// Produce the stats for the next encounter from a base monster.
///
/// `multiplier` is the host's global monster strength setting (1.0 for the
/// default difficulty).
pub fn scale_monster<R: Rng + ?Sized>(
    rng: &mut R,
    base: &MonsterStats,
    range: &StatRange,
    multiplier: f64,
    config: &ScalingConfig,
) -> MonsterStats {
    let floor = range.win_rate;
    let spread = config.fluctuation_spread;

    let hp_source = if range.average_attack == 0.0 { base.hp } else { range.average_attack };
    let dipl_source = if range.average_talk == 0.0 { base.dipl } else { range.average_talk };

    MonsterStats {
        hp: fluctuate(rng, hp_source * multiplier, floor, spread),
        dipl: fluctuate(rng, dipl_source * multiplier, floor, spread),
        pdef: fluctuate(rng, base.pdef, floor, spread),
        mdef: fluctuate(rng, base.mdef, floor, spread),
        cdef: fluctuate(rng, base.cdef, floor, spread),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ogre() -> MonsterStats {
        MonsterStats {
            hp: 400.0,
            dipl: 300.0,
            pdef: 1.2,
            mdef: 0.8,
            cdef: 1.0,
        }
    }

    #[test]
    fn fluctuate_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let v = fluctuate(&mut rng, 100.0, 0.5, 0.4);
            assert!((50.0..=90.0 + 1e-9).contains(&v), "out of band: {v}");
        }
    }

    #[test]
    fn zero_spread_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!((fluctuate(&mut rng, 200.0, 0.75, 0.0) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn empty_history_scales_base_stats_down() {
        // No history: win rate 0, so every stat lands in [0, 0.4] × base.
        let mut rng = StdRng::seed_from_u64(3);
        let scaled = scale_monster(
            &mut rng,
            &ogre(),
            &StatRange::default(),
            1.0,
            &ScalingConfig::default(),
        );
        assert!(scaled.hp <= 400.0 * 0.4 + 1e-9);
        assert!(scaled.dipl <= 300.0 * 0.4 + 1e-9);
        assert!(scaled.pdef <= 1.2 * 0.4 + 1e-9);
    }

    #[test]
    fn community_averages_replace_base_stats() {
        let range = StatRange {
            win_rate: 1.0,
            average_attack: 1000.0,
            average_talk: 10.0,
            ..StatRange::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        let scaled = scale_monster(&mut rng, &ogre(), &range, 2.0, &ScalingConfig::default());
        assert!((2000.0..=2800.0 + 1e-9).contains(&scaled.hp));
        assert!((20.0..=28.0 + 1e-9).contains(&scaled.dipl));
        assert!((1.2..=1.2 * 1.4 + 1e-9).contains(&scaled.pdef));
    }

    #[test]
    fn same_seed_same_monster() {
        let range = StatRange {
            win_rate: 0.6,
            average_attack: 120.0,
            ..StatRange::default()
        };
        let config = ScalingConfig::default();
        let a = scale_monster(&mut StdRng::seed_from_u64(5), &ogre(), &range, 1.0, &config);
        let b = scale_monster(&mut StdRng::seed_from_u64(5), &ogre(), &range, 1.0, &config);
        assert_eq!(a, b);
    }
}
