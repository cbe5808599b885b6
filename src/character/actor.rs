use crate::combat::logic::AttackerProfile;
use crate::core::constants::*;
use crate::core::Vec2;
use crate::items::{
    EquipError, Equipment, EquipmentSlot, EquipmentStats, Inventory, InventoryError, Item,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Vitality,
    Strength,
    Intelligence,
    Dexterity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub vitality: u32,
    pub strength: u32,
    pub intelligence: u32,
    pub dexterity: u32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            vitality: STARTING_BASE_STAT,
            strength: STARTING_BASE_STAT,
            intelligence: STARTING_BASE_STAT,
            dexterity: STARTING_BASE_STAT,
        }
    }
}

impl BaseStats {
    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Vitality => self.vitality,
            StatKind::Strength => self.strength,
            StatKind::Intelligence => self.intelligence,
            StatKind::Dexterity => self.dexterity,
        }
    }

    fn get_mut(&mut self, kind: StatKind) -> &mut u32 {
        match kind {
            StatKind::Vitality => &mut self.vitality,
            StatKind::Strength => &mut self.strength,
            StatKind::Intelligence => &mut self.intelligence,
            StatKind::Dexterity => &mut self.dexterity,
        }
    }
}

/// Timed damage multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwordAura {
    pub multiplier: f64,
    pub expires_at_ms: u64,
}

impl SwordAura {
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at_ms
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Buffs {
    pub sword_aura: Option<SwordAura>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlLocks {
    pub stunned: bool,
    pub rooted: bool,
}

impl ControlLocks {
    pub fn can_move(&self) -> bool {
        !self.stunned && !self.rooted
    }

    pub fn can_attack(&self) -> bool {
        !self.stunned
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub position: Vec2,
    /// Unit facing vector.
    pub direction: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub base_stats: BaseStats,
    pub stat_points: u32,
    pub skill_points: u32,
    pub base_attack: u32,
    /// Derived from equipment by [`Actor::refresh_stats`].
    #[serde(skip)]
    pub stats: EquipmentStats,
    /// 0 before the first swing, then 1-4.
    #[serde(default)]
    pub attack_sequence: u8,
    #[serde(default)]
    pub last_attack_time: Option<u64>,
    #[serde(default)]
    pub locks: ControlLocks,
    #[serde(default)]
    pub buffs: Buffs,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub yang: u64,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor {
    pub fn new() -> Self {
        let mut actor = Self {
            position: Vec2::zero(),
            direction: Vec2::unit_x(),
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            mana: STARTING_MANA,
            max_mana: STARTING_MANA,
            level: 1,
            experience: 0,
            experience_to_next_level: STARTING_EXP_TO_NEXT,
            base_stats: BaseStats::default(),
            stat_points: 0,
            skill_points: 0,
            base_attack: STARTING_BASE_ATTACK,
            stats: EquipmentStats::default(),
            attack_sequence: 0,
            last_attack_time: None,
            locks: ControlLocks::default(),
            buffs: Buffs::default(),
            equipment: Equipment::default(),
            inventory: Inventory::default(),
            yang: 0,
        };
        actor.refresh_stats();
        actor
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Recomputes gear-derived stats and maximum health, clamping current health.
    pub fn refresh_stats(&mut self) {
        self.stats = self.equipment.stats();
        self.max_health = STARTING_HEALTH
            + self.stats.max_health
            + (self.base_stats.vitality + self.stats.vitality).saturating_sub(STARTING_BASE_STAT)
                * HEALTH_PER_VITALITY;
        self.health = self.health.min(self.max_health);
    }

    pub fn strength(&self) -> u32 {
        self.base_stats.strength + self.stats.strength
    }

    pub fn attack_profile(&self) -> AttackerProfile {
        AttackerProfile {
            attack: self.base_attack as i64 + self.stats.attack_value(),
            strength: self.strength() as i64,
            crit_chance: self.stats.crit_chance.min(PERCENT_DIVISOR as u32),
            monster_damage: self.stats.monster_damage,
            aura: self.buffs.sword_aura,
        }
    }

    /// Final move speed in units per second.
    pub fn move_speed(&self) -> f32 {
        MOVE_SPEED_UNITS_PER_SECOND * self.stats.movement_speed_multiplier as f32
    }

    pub fn set_direction(&mut self, direction: Vec2) {
        if direction.magnitude_squared() > 0.0 {
            self.direction = direction.normalized();
        }
    }

    /// Spends one stat point. Returns false when none are left.
    pub fn spend_stat_point(&mut self, kind: StatKind) -> bool {
        if self.stat_points == 0 {
            return false;
        }
        self.stat_points -= 1;
        *self.base_stats.get_mut(kind) += 1;
        self.refresh_stats();
        true
    }

    /// Equips `item`, moving any replaced item into the inventory.
    /// Fails without changes when the replaced item would not fit.
    pub fn equip(&mut self, item: Item) -> Result<(), EquipError> {
        let Some(slot) = item.category.equipment_slot() else {
            return Err(EquipError::NotEquippable {
                name: item.display_name,
            });
        };
        if let Some(current) = self.equipment.get(slot) {
            if self.inventory.is_full() {
                return Err(EquipError::NoRoomForReplaced {
                    name: current.display_name.clone(),
                });
            }
        }
        if let Some(old) = self.equipment.equip(item)? {
            // room was checked above
            if let Err(err) = self.inventory.add(old) {
                tracing::warn!(%err, "replaced item did not fit");
            }
        }
        self.refresh_stats();
        Ok(())
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<(), InventoryError> {
        let Some(item) = self.equipment.get(slot).clone() else {
            return Ok(());
        };
        self.inventory.add(item)?;
        self.equipment.unequip(slot);
        self.refresh_stats();
        Ok(())
    }

    pub fn aura_active(&self, now_ms: u64) -> bool {
        self.buffs.sword_aura.is_some_and(|a| a.is_active(now_ms))
    }

    pub fn apply_sword_aura(&mut self, multiplier: f64, now_ms: u64, duration_ms: u64) {
        self.buffs.sword_aura = Some(SwordAura {
            multiplier,
            expires_at_ms: now_ms + duration_ms,
        });
    }

    /// Health loss clamped at zero. Returns the amount actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }
}
