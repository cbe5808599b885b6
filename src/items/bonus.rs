//! Affix rolling.
//!
//! Weapons always open with Average Damage followed by Skill Damage; every
//! other pick draws an unused kind from the category pool.

use super::types::{Affix, AffixKind, Item, ItemCategory};
use rand::Rng;

/// Chance that a roll lands in the extended (hard_max, max] band.
pub const HARD_ROLL_CHANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffixRange {
    pub kind: AffixKind,
    pub min: i32,
    pub hard_max: i32,
    pub max: i32,
}

const fn range(kind: AffixKind, min: i32, hard_max: i32, max: i32) -> AffixRange {
    AffixRange {
        kind,
        min,
        hard_max,
        max,
    }
}

pub const WEAPON_FORCED: [AffixRange; 2] = [
    range(AffixKind::AverageDamage, 1, 40, 55),
    range(AffixKind::SkillDamage, -20, 10, 20),
];

pub const WEAPON_POOL: &[AffixRange] = &[
    range(AffixKind::CriticalHit, 1, 8, 10),
    range(AffixKind::Penetration, 1, 8, 10),
    range(AffixKind::Strength, 1, 10, 12),
    range(AffixKind::Dexterity, 1, 10, 12),
    range(AffixKind::AttackSpeed, 1, 6, 8),
    range(AffixKind::MonsterDamage, 1, 15, 20),
];

pub const ARMOR_POOL: &[AffixRange] = &[
    range(AffixKind::MaxHealth, 100, 1500, 2000),
    range(AffixKind::Vitality, 1, 10, 12),
    range(AffixKind::Defense, 5, 40, 50),
    range(AffixKind::FireResistance, 1, 15, 20),
    range(AffixKind::Dexterity, 1, 10, 12),
    range(AffixKind::MovementSpeed, 1, 6, 8),
];

pub const ACCESSORY_POOL: &[AffixRange] = &[
    range(AffixKind::MaxHealth, 50, 500, 800),
    range(AffixKind::CriticalHit, 1, 5, 8),
    range(AffixKind::MovementSpeed, 1, 6, 8),
    range(AffixKind::FireResistance, 1, 10, 15),
    range(AffixKind::Strength, 1, 6, 8),
    range(AffixKind::Vitality, 1, 6, 8),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BonusError {
    #[error("{category:?} items cannot carry bonuses")]
    NotBonusable { category: ItemCategory },

    #[error("Item already has the maximum of {cap} bonuses")]
    CapReached { cap: usize },

    #[error("No bonus type left to add")]
    PoolExhausted,
}

pub fn pool_for(category: ItemCategory) -> &'static [AffixRange] {
    match category {
        ItemCategory::Weapon => WEAPON_POOL,
        ItemCategory::Armor => ARMOR_POOL,
        c if c.is_accessory() => ACCESSORY_POOL,
        _ => &[],
    }
}

/// Kind a weapon must take at `index`, if the slot is forced.
pub fn forced_bonus(category: ItemCategory, index: usize) -> Option<AffixRange> {
    if category == ItemCategory::Weapon {
        WEAPON_FORCED.get(index).copied()
    } else {
        None
    }
}

/// Uniform in [min, hard_max]; with `HARD_ROLL_CHANCE` uniform in (hard_max, max].
pub fn roll_value(range: &AffixRange, rng: &mut impl Rng) -> i32 {
    if range.max > range.hard_max && rng.gen_bool(HARD_ROLL_CHANCE) {
        rng.gen_range(range.hard_max + 1..=range.max)
    } else {
        rng.gen_range(range.min..=range.hard_max.max(range.min))
    }
}

fn pick_range(item: &Item, rng: &mut impl Rng) -> Option<AffixRange> {
    if let Some(forced) = forced_bonus(item.category, item.bonuses.len()) {
        if !item.has_bonus(forced.kind) {
            return Some(forced);
        }
    }
    let available: Vec<&AffixRange> = pool_for(item.category)
        .iter()
        .filter(|r| !item.has_bonus(r.kind))
        .collect();
    if available.is_empty() {
        return None;
    }
    Some(*available[rng.gen_range(0..available.len())])
}

pub fn add_random_bonus(item: &Item, rng: &mut impl Rng) -> Result<Item, BonusError> {
    let cap = item.category.bonus_cap();
    if cap == 0 {
        return Err(BonusError::NotBonusable {
            category: item.category,
        });
    }
    if item.bonuses.len() >= cap {
        return Err(BonusError::CapReached { cap });
    }

    let range = pick_range(item, rng).ok_or(BonusError::PoolExhausted)?;
    let mut updated = item.clone();
    updated.bonuses.push(Affix {
        kind: range.kind,
        value: roll_value(&range, rng),
    });
    updated.rebuild_description();
    tracing::debug!(item = %updated.id, kind = ?range.kind, count = updated.bonuses.len(), "bonus added");
    Ok(updated)
}

/// Rerolls every affix keeping the count. Items without affixes are returned unchanged.
pub fn reroll_all_bonuses(item: &Item, rng: &mut impl Rng) -> Result<Item, BonusError> {
    if item.bonuses.is_empty() {
        return Ok(item.clone());
    }
    let count = item.bonuses.len().min(item.category.bonus_cap());

    let mut rerolled = item.clone();
    rerolled.bonuses.clear();
    for _ in 0..count {
        rerolled = add_random_bonus(&rerolled, rng)?;
    }
    Ok(rerolled)
}
