//! Data-driven game balance
//!
//! Defaults reproduce the shipped game. Any subset can be overridden from JSON;
//! missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{FINAL_STAGE, SIM_DT_MS};
use crate::sim::CollectibleKind;

/// Problems with a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected {expected} stages, found {found}")]
    StageCount { expected: usize, found: usize },

    #[error("stage {stage}: {field} must be within [0, 1], got {value}")]
    ChanceOutOfRange {
        stage: u32,
        field: &'static str,
        value: f32,
    },

    #[error("stage {stage}: obstacle and item chances sum above 1 ({sum})")]
    ChanceSum { stage: u32, sum: f32 },

    #[error("stage {stage}: target score must be positive")]
    ZeroTarget { stage: u32 },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

/// Per-stage difficulty row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Score needed to clear the stage
    pub target_score: u32,
    /// Per-tick probability of spawning a hazard
    pub obstacle_chance: f32,
    /// Per-tick probability band for collectibles (after the hazard band)
    pub item_chance: f32,
    /// Collectible kinds first offered on this stage
    #[serde(default)]
    pub unlocks: Vec<CollectibleKind>,
}

impl StageConfig {
    fn row(
        target_score: u32,
        obstacle_chance: f32,
        item_chance: f32,
        unlocks: &[CollectibleKind],
    ) -> Self {
        Self {
            target_score,
            obstacle_chance,
            item_chance,
            unlocks: unlocks.to_vec(),
        }
    }
}

/// Player movement constants (per tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start_x: f32,
    pub width: f32,
    pub height: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    /// Multiplicative decay applied when no direction is held
    pub friction: f32,
    /// Below this |vx| the player stops outright
    pub stop_epsilon: f32,
    pub gravity: f32,
    /// Initial vertical velocity of a jump (negative = up)
    pub jump_impulse: f32,
    pub slide_duration_ms: f32,
    /// Hitbox height while sliding
    pub slide_height: f32,
    /// Hitbox drop from the top edge while sliding
    pub slide_offset: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            width: 40.0,
            height: 40.0,
            max_speed: 5.0,
            acceleration: 0.5,
            friction: 0.8,
            stop_epsilon: 0.1,
            gravity: 0.5,
            jump_impulse: -12.0,
            slide_duration_ms: 500.0,
            slide_height: 25.0,
            slide_offset: 15.0,
        }
    }
}

impl PlayerTuning {
    /// Slide duration expressed in fixed ticks
    pub fn slide_ticks(&self) -> u32 {
        (self.slide_duration_ms / SIM_DT_MS).round().max(1.0) as u32
    }
}

/// Spawner density and spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Maximum simultaneous obstacles/items
    pub max_active: usize,
    /// Minimum distance the newest entity must travel from the right edge
    pub min_gap: f32,
    /// Extra random spacing (0..jitter)
    pub gap_jitter: f32,
    /// Collectibles spawn this far above the viewport bottom...
    pub item_base_offset: f32,
    /// ...plus up to this much more
    pub item_height_band: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            max_active: 5,
            min_gap: 150.0,
            gap_jitter: 100.0,
            item_base_offset: 100.0,
            item_height_band: 50.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Stage rows, index 0 = stage 1
    pub stages: Vec<StageConfig>,
    /// Scroll speed on stage 1 (pixels per tick)
    pub base_scroll_speed: f32,
    /// Added to the scroll speed per stage
    pub speed_increment: f32,
    /// Score for a hazard that scrolls past
    pub pass_bonus: u32,
    pub player: PlayerTuning,
    pub spawn: SpawnTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        use CollectibleKind::*;
        Self {
            stages: vec![
                StageConfig::row(200, 0.02, 0.0, &[]),
                StageConfig::row(400, 0.025, 0.015, &[CyberChip]),
                StageConfig::row(600, 0.03, 0.02, &[Malware]),
                StageConfig::row(800, 0.035, 0.025, &[]),
                StageConfig::row(1000, 0.04, 0.03, &[]),
            ],
            base_scroll_speed: 3.0,
            speed_increment: 0.5,
            pass_bonus: 10,
            player: PlayerTuning::default(),
            spawn: SpawnTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check table shape and probability ranges
    pub fn validate(&self) -> Result<(), TuningError> {
        let expected = FINAL_STAGE as usize;
        if self.stages.len() != expected {
            return Err(TuningError::StageCount {
                expected,
                found: self.stages.len(),
            });
        }

        for (i, cfg) in self.stages.iter().enumerate() {
            let stage = i as u32 + 1;
            for (field, value) in [
                ("obstacle_chance", cfg.obstacle_chance),
                ("item_chance", cfg.item_chance),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(TuningError::ChanceOutOfRange { stage, field, value });
                }
            }
            let sum = cfg.obstacle_chance + cfg.item_chance;
            if sum > 1.0 {
                return Err(TuningError::ChanceSum { stage, sum });
            }
            if cfg.target_score == 0 {
                return Err(TuningError::ZeroTarget { stage });
            }
        }

        if self.base_scroll_speed <= 0.0 {
            return Err(TuningError::InvalidValue {
                field: "base_scroll_speed",
                value: self.base_scroll_speed,
            });
        }
        if !(0.0..1.0).contains(&self.player.friction) {
            return Err(TuningError::InvalidValue {
                field: "player.friction",
                value: self.player.friction,
            });
        }
        if self.spawn.max_active == 0 {
            return Err(TuningError::InvalidValue {
                field: "spawn.max_active",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Row for a 1-based stage (clamped into the table)
    pub fn stage(&self, stage: u32) -> &StageConfig {
        let idx = (stage.max(1) as usize - 1).min(self.stages.len().saturating_sub(1));
        &self.stages[idx]
    }

    /// Scroll speed a stage starts at
    pub fn speed_for_stage(&self, stage: u32) -> f32 {
        self.base_scroll_speed + stage.saturating_sub(1) as f32 * self.speed_increment
    }

    /// Collectible kinds available on a stage; unlocks accumulate
    pub fn unlocked_kinds(&self, stage: u32) -> Vec<CollectibleKind> {
        let mut kinds = Vec::new();
        for cfg in self.stages.iter().take(stage.max(1) as usize) {
            for kind in &cfg.unlocks {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let tuning = Tuning::default();
        tuning.validate().unwrap();
        assert_eq!(tuning.stage(1).target_score, 200);
        assert_eq!(tuning.stage(5).target_score, 1000);
    }

    #[test]
    fn test_unlocks_accumulate() {
        let tuning = Tuning::default();
        assert!(tuning.unlocked_kinds(1).is_empty());
        assert_eq!(tuning.unlocked_kinds(2), vec![CollectibleKind::CyberChip]);
        assert_eq!(
            tuning.unlocked_kinds(4),
            vec![CollectibleKind::CyberChip, CollectibleKind::Malware]
        );
    }

    #[test]
    fn test_speed_for_stage() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_for_stage(1), 3.0);
        assert_eq!(tuning.speed_for_stage(5), 5.0);
    }

    #[test]
    fn test_slide_ticks_at_60hz() {
        assert_eq!(PlayerTuning::default().slide_ticks(), 30);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning =
            Tuning::from_json(r#"{ "pass_bonus": 25, "player": { "gravity": 0.6 } }"#).unwrap();
        assert_eq!(tuning.pass_bonus, 25);
        assert_eq!(tuning.player.gravity, 0.6);
        assert_eq!(tuning.player.jump_impulse, -12.0);
        assert_eq!(tuning.stages.len(), 5);
    }

    #[test]
    fn test_rejects_bad_tables() {
        let err = Tuning::from_json(r#"{ "stages": [] }"#).unwrap_err();
        assert!(matches!(err, TuningError::StageCount { found: 0, .. }));

        let mut tuning = Tuning::default();
        tuning.stages[2].obstacle_chance = 1.5;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::ChanceOutOfRange { stage: 3, .. })
        ));

        let mut tuning = Tuning::default();
        tuning.stages[0].obstacle_chance = 0.7;
        tuning.stages[0].item_chance = 0.6;
        assert!(matches!(tuning.validate(), Err(TuningError::ChanceSum { stage: 1, .. })));

        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
