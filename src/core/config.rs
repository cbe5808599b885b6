//! Runtime-tunable engine parameters.
//!
//! Hosts may ship a JSON file overriding any subset of the fields; omitted
//! fields keep the values from [`crate::core::constants`].

use super::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid engine config: {field} must be positive")]
    NonPositive { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cell_size: f32,
    pub target_fps: f64,
    pub particle_capacity: usize,
    pub inventory_capacity: usize,
    pub respawn_window_ms: u64,
    pub cache_refresh_ms: u64,
    pub corpse_delay_ms: u64,
    pub boss: BossTuning,
}

/// Distances are world units, times are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub aggro_radius: f32,
    pub attack_radius: f32,
    pub attack_cooldown_ms: u64,
    pub windup_ms: u64,
    pub strike_damage: u32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            aggro_radius: BOSS_AGGRO_RADIUS,
            attack_radius: BOSS_ATTACK_RADIUS,
            attack_cooldown_ms: BOSS_ATTACK_COOLDOWN_MS,
            windup_ms: BOSS_WINDUP_MS,
            strike_damage: BOSS_STRIKE_DAMAGE,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_size: SPATIAL_CELL_SIZE,
            target_fps: TARGET_FPS,
            particle_capacity: PARTICLE_POOL_CAPACITY,
            inventory_capacity: INVENTORY_CAPACITY,
            respawn_window_ms: RESPAWN_WINDOW_MS,
            cache_refresh_ms: ACTIVE_CACHE_REFRESH_MS,
            corpse_delay_ms: CORPSE_REMOVAL_DELAY_MS,
            boss: BossTuning::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0.0 {
            return Err(ConfigError::NonPositive { field: "cell_size" });
        }
        if self.target_fps <= 0.0 {
            return Err(ConfigError::NonPositive { field: "target_fps" });
        }
        if self.particle_capacity == 0 {
            return Err(ConfigError::NonPositive {
                field: "particle_capacity",
            });
        }
        if self.cache_refresh_ms == 0 {
            return Err(ConfigError::NonPositive {
                field: "cache_refresh_ms",
            });
        }
        Ok(())
    }

    /// Frame budget derived from the target rate.
    pub fn target_frame_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }
}
