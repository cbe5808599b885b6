use crate::core::constants::*;
use crate::core::Vec2;
use crate::loot::boss::BossState;
use crate::spatial::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    Metin,
    StoneOfMetin,
    DesertMetin,
    StoneOfMap1,
    WhiteTiger,
    Boss,
}

impl Archetype {
    /// Stones that take the monster-damage bonus.
    pub fn is_metin_class(&self) -> bool {
        matches!(
            self,
            Archetype::Metin
                | Archetype::StoneOfMetin
                | Archetype::DesertMetin
                | Archetype::StoneOfMap1
        )
    }

    pub fn max_health(&self) -> u32 {
        match self {
            Archetype::Metin => METIN_HEALTH,
            Archetype::StoneOfMetin => STONE_OF_METIN_HEALTH,
            Archetype::DesertMetin => DESERT_METIN_HEALTH,
            Archetype::StoneOfMap1 => STONE_OF_MAP1_HEALTH,
            Archetype::WhiteTiger => WHITE_TIGER_HEALTH,
            Archetype::Boss => BOSS_HEALTH,
        }
    }

    pub fn exp_reward(&self) -> u64 {
        match self {
            Archetype::Metin => METIN_EXP,
            Archetype::StoneOfMetin => STONE_OF_METIN_EXP,
            Archetype::DesertMetin => DESERT_METIN_EXP,
            Archetype::StoneOfMap1 => STONE_OF_MAP1_EXP,
            Archetype::WhiteTiger => WHITE_TIGER_EXP,
            Archetype::Boss => BOSS_EXP,
        }
    }
}

/// Displacement applied by a finishing blow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    pub offset: Vec2,
    pub until_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub archetype: Archetype,
    #[serde(default)]
    pub death_time: Option<u64>,
    #[serde(default)]
    pub hit_at: Option<u64>,
    #[serde(default)]
    pub knockback: Option<Knockback>,
    #[serde(default)]
    pub boss: Option<BossState>,
    /// Spawn anchor this instance was created for.
    #[serde(default)]
    pub anchor: Option<u32>,
}

impl Enemy {
    /// Full-health instance. Bosses start dormant.
    pub fn new(id: EntityId, archetype: Archetype, position: Vec2) -> Self {
        let max_health = archetype.max_health();
        Self {
            id,
            position,
            health: max_health,
            max_health,
            archetype,
            death_time: None,
            hit_at: None,
            knockback: None,
            boss: (archetype == Archetype::Boss).then(BossState::default),
            anchor: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0 && self.death_time.is_none()
    }

    /// A zero max-health enemy cannot take part in combat.
    pub fn is_malformed(&self) -> bool {
        self.max_health == 0
    }

    /// True for `HIT_FLAG_DURATION_MS` after the last hit.
    pub fn is_hit(&self, now_ms: u64) -> bool {
        self.hit_at
            .is_some_and(|at| now_ms.saturating_sub(at) < HIT_FLAG_DURATION_MS)
    }

    pub fn is_knocked_back(&self, now_ms: u64) -> bool {
        self.knockback.is_some_and(|k| now_ms < k.until_ms)
    }
}

/// Melee arc for one combo step. Lives only for the attack that made it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackHitbox {
    pub position: Vec2,
    /// Unit vector the arc is centered on.
    pub direction: Vec2,
    pub angle_degrees: f32,
    pub radius: f32,
    pub sequence: u8,
    pub duration_ms: u64,
}
