//! Configuration for the adventure kernel.
//!
//! Maps directly to `adventure.toml`:
//!
//! ```toml
//! [tracker]
//! window_size = 10
//!
//! [difficulty]
//! solo_surcharge = 0.25
//! min_multiplier = 0.75
//! max_multiplier = 2.0
//! losing_max_multiplier = 1.5
//! target_win_rate = 0.5
//!
//! [scaling]
//! fluctuation_spread = 0.4
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AdventureError, Result};

/// Top-level adventure configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdventureConfig {
    /// Raid history window settings.
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Difficulty range derivation.
    #[serde(default)]
    pub difficulty: DifficultyConfig,
    /// Monster stat scaling.
    #[serde(default)]
    pub scaling: ScalingConfig,
}

impl AdventureConfig {
    /// Load configuration from a TOML string and validate it.
    ///
    /// # Errors
    /// Returns `AdventureError::Config` if the TOML is invalid or a value is
    /// out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| AdventureError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check every value against its allowed range.
    ///
    /// # Errors
    /// Returns `AdventureError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.tracker.window_size == 0 {
            return Err(AdventureError::Config(
                "tracker.window_size must be at least 1".to_string(),
            ));
        }
        let d = &self.difficulty;
        for (name, value) in [
            ("difficulty.solo_surcharge", d.solo_surcharge),
            ("difficulty.min_multiplier", d.min_multiplier),
            ("difficulty.max_multiplier", d.max_multiplier),
            ("difficulty.losing_max_multiplier", d.losing_max_multiplier),
            ("scaling.fluctuation_spread", self.scaling.fluctuation_spread),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AdventureError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&d.target_win_rate) {
            return Err(AdventureError::Config(format!(
                "difficulty.target_win_rate must be within [0, 1], got {}",
                d.target_win_rate
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Raid history window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Maximum number of raid outcomes retained per community.
    ///
    /// Also the eligibility granted to manual participants; fresh auto
    /// participants get `2 * window_size - 1`.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { window_size: 10 }
    }
}

/// Tuning for [`crate::difficulty::compute_stat_range`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Extra share of a solo raid's amount added to its group total, so a
    /// single player cannot solo every monster tuned to their own average.
    #[serde(default = "default_0_25")]
    pub solo_surcharge: f64,
    /// Lower bound multiplier while the community wins often enough.
    #[serde(default = "default_0_75")]
    pub min_multiplier: f64,
    /// Upper bound multiplier while the community wins often enough.
    #[serde(default = "default_2_0")]
    pub max_multiplier: f64,
    /// Upper bound multiplier once the win rate drops below target.
    #[serde(default = "default_1_5")]
    pub losing_max_multiplier: f64,
    /// Win rate below which the range is compressed toward easier monsters.
    #[serde(default = "default_0_5")]
    pub target_win_rate: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            solo_surcharge: 0.25,
            min_multiplier: 0.75,
            max_multiplier: 2.0,
            losing_max_multiplier: 1.5,
            target_win_rate: 0.5,
        }
    }
}

/// Monster stat scaling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingConfig {
    /// Width of the uniform fluctuation band above the win-rate floor.
    #[serde(default = "default_0_4")]
    pub fluctuation_spread: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            fluctuation_spread: 0.4,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_window_size() -> usize { 10 }
fn default_0_25() -> f64 { 0.25 }
fn default_0_4() -> f64 { 0.4 }
fn default_0_5() -> f64 { 0.5 }
fn default_0_75() -> f64 { 0.75 }
fn default_1_5() -> f64 { 1.5 }
fn default_2_0() -> f64 { 2.0 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = AdventureConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.tracker.window_size, 10);
        assert!((config.difficulty.solo_surcharge - 0.25).abs() < f64::EPSILON);
        assert!((config.scaling.fluctuation_spread - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AdventureConfig::from_toml(
            r#"
            [tracker]
            window_size = 3

            [difficulty]
            max_multiplier = 3.0
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.tracker.window_size, 3);
        assert!((config.difficulty.max_multiplier - 3.0).abs() < f64::EPSILON);
        assert!((config.difficulty.min_multiplier - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = AdventureConfig::from_toml("[tracker]\nwindow_size = 0\n")
            .expect_err("zero window must fail");
        assert!(matches!(err, AdventureError::Config(_)));
        assert!(err.to_string().contains("window_size"));
    }

    #[test]
    fn out_of_range_target_win_rate_is_rejected() {
        let err = AdventureConfig::from_toml("[difficulty]\ntarget_win_rate = 1.5\n")
            .expect_err("win rate above 1 must fail");
        assert!(err.to_string().contains("target_win_rate"));
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        let err = AdventureConfig::from_toml("[difficulty]\nsolo_surcharge = -0.1\n")
            .expect_err("negative surcharge must fail");
        assert!(err.to_string().contains("solo_surcharge"));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = AdventureConfig::from_toml("[tracker\nwindow_size = ").expect_err("bad toml");
        assert!(matches!(err, AdventureError::Config(_)));
    }
}
