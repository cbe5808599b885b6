use super::actor::Actor;
use crate::core::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpEvent {
    pub level: u32,
    pub levels_gained: u32,
    /// How long the host should show the level-up banner.
    pub display_ms: u64,
}

/// Threshold for the level after one that needed `threshold`.
pub fn next_threshold(threshold: u64) -> u64 {
    (threshold as f64 * EXP_THRESHOLD_GROWTH).floor() as u64
}

/// Adds `amount` experience, carrying overflow through as many levels as it pays for.
///
/// Each level grants a stat point, every tenth level also grants skill points.
/// Any gain restores health and mana and clears control locks. At the level
/// cap experience keeps accumulating but no further levels are granted.
pub fn gain_experience(actor: &Actor, amount: u64) -> (Actor, Option<LevelUpEvent>) {
    let mut updated = actor.clone();
    updated.experience = updated.experience.saturating_add(amount);

    let start_level = updated.level;
    while updated.level < MAX_LEVEL && updated.experience >= updated.experience_to_next_level {
        updated.experience -= updated.experience_to_next_level;
        updated.level += 1;
        updated.stat_points += STAT_POINTS_PER_LEVEL;
        updated.experience_to_next_level = next_threshold(updated.experience_to_next_level).max(1);
        if updated.level % SKILL_POINT_MILESTONE == 0 {
            updated.skill_points += SKILL_POINTS_PER_MILESTONE;
        }
    }

    let levels_gained = updated.level - start_level;
    if levels_gained == 0 {
        return (updated, None);
    }

    updated.refresh_stats();
    updated.health = updated.max_health;
    updated.mana = updated.max_mana;
    updated.locks.clear();
    tracing::debug!(level = updated.level, levels_gained, "level up");

    let event = LevelUpEvent {
        level: updated.level,
        levels_gained,
        display_ms: LEVEL_UP_DISPLAY_MS,
    };
    (updated, Some(event))
}
