//! Weighted chest tables.
//!
//! A roll in [0, 1) walks the cumulative weights of a table. Weights of every
//! table sum to 1.0; float residue past the last boundary lands on the last
//! entry.

use crate::combat::types::Archetype;
use crate::items::catalog::{template, unique_item_id};
use crate::items::{Inventory, Item};
use rand::Rng;

pub const GOLD_PIECE_ID: &str = "gold-piece";
pub const METIN_CHEST_ID: &str = "metin-chest";
pub const DESERT_CHEST_ID: &str = "desert-chest";
pub const TIGER_CHEST_ID: &str = "tiger-chest";
pub const BOSS_CHEST_ID: &str = "boss-chest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Item(&'static str),
    Yang(u64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootTableEntry {
    pub reward: Reward,
    pub weight: f64,
    pub stackable: bool,
}

const fn stack(id: &'static str, weight: f64) -> LootTableEntry {
    LootTableEntry {
        reward: Reward::Item(id),
        weight,
        stackable: true,
    }
}

const fn unique(id: &'static str, weight: f64) -> LootTableEntry {
    LootTableEntry {
        reward: Reward::Item(id),
        weight,
        stackable: false,
    }
}

const fn yang(amount: u64, weight: f64) -> LootTableEntry {
    LootTableEntry {
        reward: Reward::Yang(amount),
        weight,
        stackable: false,
    }
}

static METIN_CHEST: &[LootTableEntry] = &[
    stack("bear-gall", 0.25),
    stack("bear-foot-skin", 0.25),
    stack("diamond", 0.15),
    stack("blessing-scroll", 0.10),
    stack("gem-attack", 0.05),
    stack("gem-critical", 0.05),
    stack("gem-monster", 0.05),
    unique("bamboo-blade", 0.10),
];

static GOLD_PIECE: &[LootTableEntry] = &[yang(10, 0.40), yang(50, 0.35), yang(200, 0.25)];

static DESERT_CHEST: &[LootTableEntry] = &[
    stack("diamond", 0.30),
    stack("gem-speed", 0.20),
    stack("gem-vitality", 0.20),
    stack("gem-dexterity", 0.20),
    unique("iron-helmet", 0.10),
];

static TIGER_CHEST: &[LootTableEntry] = &[
    unique("full-moon-sword", 0.30),
    unique("iron-plate", 0.30),
    unique("wooden-earring", 0.20),
    unique("copper-bracelet", 0.20),
];

static BOSS_CHEST: &[LootTableEntry] = &[
    unique("dragon-sword", 0.15),
    unique("dragon-armor", 0.15),
    unique("jade-necklace", 0.20),
    stack("blessing-scroll", 0.30),
    unique("teleport-ring", 0.20),
];

pub static CHEST_IDS: [&str; 5] = [
    METIN_CHEST_ID,
    GOLD_PIECE_ID,
    DESERT_CHEST_ID,
    TIGER_CHEST_ID,
    BOSS_CHEST_ID,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LootError {
    #[error("Unknown chest: {id}")]
    UnknownChest { id: String },

    #[error("Chest reward {template_id} has no item template")]
    UnknownReward { template_id: &'static str },

    #[error("No {id} in inventory")]
    NotInInventory { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChestDrop {
    Item(Item),
    Yang(u64),
}

pub fn loot_table(id: &str) -> Option<&'static [LootTableEntry]> {
    match id {
        METIN_CHEST_ID => Some(METIN_CHEST),
        GOLD_PIECE_ID => Some(GOLD_PIECE),
        DESERT_CHEST_ID => Some(DESERT_CHEST),
        TIGER_CHEST_ID => Some(TIGER_CHEST),
        BOSS_CHEST_ID => Some(BOSS_CHEST),
        _ => None,
    }
}

/// Entry selected by `roll` in [0, 1).
pub fn pick_entry(id: &str, roll: f64) -> Result<&'static LootTableEntry, LootError> {
    let table = loot_table(id).ok_or_else(|| LootError::UnknownChest { id: id.to_string() })?;
    let mut cumulative = 0.0;
    for entry in table {
        cumulative += entry.weight;
        if roll < cumulative {
            return Ok(entry);
        }
    }
    table
        .last()
        .ok_or_else(|| LootError::UnknownChest { id: id.to_string() })
}

/// Opens chest `id` with a pre-drawn roll. `rng` only supplies ids for
/// non-stackable rewards.
pub fn open_chest_with_roll(
    id: &str,
    roll: f64,
    rng: &mut impl Rng,
) -> Result<ChestDrop, LootError> {
    let entry = pick_entry(id, roll)?;
    let drop = match entry.reward {
        Reward::Yang(amount) => ChestDrop::Yang(amount),
        Reward::Item(template_id) => {
            let tpl = template(template_id).ok_or(LootError::UnknownReward { template_id })?;
            let item_id = if entry.stackable {
                tpl.id.to_string()
            } else {
                unique_item_id(tpl.id, rng)
            };
            ChestDrop::Item(tpl.instantiate(item_id))
        }
    };
    tracing::debug!(chest = id, roll, reward = ?entry.reward, "chest opened");
    Ok(drop)
}

pub fn open_chest(id: &str, rng: &mut impl Rng) -> Result<ChestDrop, LootError> {
    let roll = rng.gen::<f64>();
    open_chest_with_roll(id, roll, rng)
}

/// Chest rolled when an enemy of `archetype` dies.
pub fn kill_table(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::Metin | Archetype::StoneOfMetin => METIN_CHEST_ID,
        Archetype::DesertMetin => DESERT_CHEST_ID,
        Archetype::StoneOfMap1 => GOLD_PIECE_ID,
        Archetype::WhiteTiger => TIGER_CHEST_ID,
        Archetype::Boss => BOSS_CHEST_ID,
    }
}

pub fn roll_kill_loot(archetype: Archetype, rng: &mut impl Rng) -> Result<ChestDrop, LootError> {
    open_chest(kill_table(archetype), rng)
}

/// Consumes one chest item from `inventory` and opens it.
/// On error the inventory is unchanged.
pub fn open_from_inventory(
    inventory: &mut Inventory,
    chest_id: &str,
    rng: &mut impl Rng,
) -> Result<ChestDrop, LootError> {
    if loot_table(chest_id).is_none() {
        return Err(LootError::UnknownChest {
            id: chest_id.to_string(),
        });
    }
    inventory
        .remove(chest_id, 1)
        .map_err(|_| LootError::NotInInventory {
            id: chest_id.to_string(),
        })?;
    open_chest(chest_id, rng)
}
