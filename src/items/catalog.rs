//! Static item templates keyed by stable string id.

use super::types::{Item, ItemCategory, ItemStats};
use rand::Rng;

pub const BEAR_GALL_ID: &str = "bear-gall";
pub const BEAR_FOOT_SKIN_ID: &str = "bear-foot-skin";
pub const DIAMOND_ID: &str = "diamond";
pub const BLESSING_SCROLL_ID: &str = "blessing-scroll";
pub const TELEPORT_RING_ID: &str = "teleport-ring";

#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ItemCategory,
    pub stats: ItemStats,
    pub max_stack: u32,
    pub description: &'static str,
}

const NO_STATS: ItemStats = ItemStats {
    min_attack: 0,
    max_attack: 0,
    defense: 0,
    attack_speed: 0,
    dexterity: 0,
    fire_resistance: 0,
    monster_damage: 0,
    crit_chance: 0,
    vitality: 0,
    movement_speed: 0,
};

const fn stackable(
    id: &'static str,
    name: &'static str,
    category: ItemCategory,
    description: &'static str,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        category,
        stats: NO_STATS,
        max_stack: 200,
        description,
    }
}

pub static TEMPLATES: &[ItemTemplate] = &[
    // Weapons
    ItemTemplate {
        id: "full-moon-sword",
        name: "Full Moon Sword",
        category: ItemCategory::Weapon,
        stats: ItemStats {
            min_attack: 28,
            max_attack: 36,
            attack_speed: 5,
            ..NO_STATS
        },
        max_stack: 1,
        description: "A curved blade that shines under the full moon.",
    },
    ItemTemplate {
        id: "bamboo-blade",
        name: "Bamboo Blade",
        category: ItemCategory::Weapon,
        stats: ItemStats {
            min_attack: 12,
            max_attack: 18,
            ..NO_STATS
        },
        max_stack: 1,
        description: "Light, fast and cheap.",
    },
    ItemTemplate {
        id: "dragon-sword",
        name: "Dragon Sword",
        category: ItemCategory::Weapon,
        stats: ItemStats {
            min_attack: 60,
            max_attack: 78,
            attack_speed: 10,
            monster_damage: 5,
            ..NO_STATS
        },
        max_stack: 1,
        description: "Forged in dragon fire. Legendary.",
    },
    // Armor
    ItemTemplate {
        id: "iron-plate",
        name: "Iron Plate Armor",
        category: ItemCategory::Armor,
        stats: ItemStats {
            defense: 24,
            ..NO_STATS
        },
        max_stack: 1,
        description: "Heavy plates riveted together.",
    },
    ItemTemplate {
        id: "dragon-armor",
        name: "Dragon Armor",
        category: ItemCategory::Armor,
        stats: ItemStats {
            defense: 55,
            fire_resistance: 10,
            ..NO_STATS
        },
        max_stack: 1,
        description: "Scales of an ancient dragon. Legendary.",
    },
    ItemTemplate {
        id: "iron-helmet",
        name: "Iron Helmet",
        category: ItemCategory::Helmet,
        stats: ItemStats {
            defense: 10,
            ..NO_STATS
        },
        max_stack: 1,
        description: "Keeps your head on your shoulders.",
    },
    // Accessories
    ItemTemplate {
        id: "wooden-earring",
        name: "Wooden Earring",
        category: ItemCategory::Earring,
        stats: ItemStats {
            dexterity: 2,
            ..NO_STATS
        },
        max_stack: 1,
        description: "",
    },
    ItemTemplate {
        id: "copper-bracelet",
        name: "Copper Bracelet",
        category: ItemCategory::Bracelet,
        stats: ItemStats {
            vitality: 3,
            ..NO_STATS
        },
        max_stack: 1,
        description: "",
    },
    ItemTemplate {
        id: "jade-necklace",
        name: "Jade Necklace",
        category: ItemCategory::Necklace,
        stats: ItemStats {
            crit_chance: 1,
            ..NO_STATS
        },
        max_stack: 1,
        description: "",
    },
    ItemTemplate {
        id: TELEPORT_RING_ID,
        name: "Teleport Ring",
        category: ItemCategory::Misc,
        stats: NO_STATS,
        max_stack: 1,
        description: "Returns you to the village.",
    },
    // Materials and consumables
    stackable(
        BEAR_GALL_ID,
        "Bear Gall",
        ItemCategory::Material,
        "Upgrade material for armor, helmets and necklaces.",
    ),
    stackable(
        BEAR_FOOT_SKIN_ID,
        "Bear Foot Skin",
        ItemCategory::Material,
        "Upgrade material for weapons, earrings and bracelets.",
    ),
    stackable(
        DIAMOND_ID,
        "Diamond",
        ItemCategory::Material,
        "Opens a new gem socket.",
    ),
    stackable(
        BLESSING_SCROLL_ID,
        "Blessing Scroll",
        ItemCategory::Scroll,
        "Raises the success chance of the next upgrade.",
    ),
    stackable(
        "gem-monster",
        "Stone of Monsters",
        ItemCategory::Gem,
        "Weapon gem: strong against monsters.",
    ),
    stackable(
        "gem-critical",
        "Stone of Critical",
        ItemCategory::Gem,
        "Weapon gem: critical hit chance.",
    ),
    stackable(
        "gem-attack",
        "Stone of Attack",
        ItemCategory::Gem,
        "Weapon gem: attack value.",
    ),
    stackable(
        "gem-speed",
        "Stone of Speed",
        ItemCategory::Gem,
        "Armor gem: movement speed.",
    ),
    stackable(
        "gem-vitality",
        "Stone of Vitality",
        ItemCategory::Gem,
        "Armor gem: vitality.",
    ),
    stackable(
        "gem-dexterity",
        "Stone of Dexterity",
        ItemCategory::Gem,
        "Armor gem: dexterity.",
    ),
    stackable(
        "metin-chest",
        "Metin Chest",
        ItemCategory::Chest,
        "Dropped by metin stones.",
    ),
];

pub fn template(id: &str) -> Option<&'static ItemTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

impl ItemTemplate {
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    /// Builds an item with the given instance id and a stack of one.
    pub fn instantiate(&self, id: String) -> Item {
        let mut item = Item {
            id,
            template_id: self.id.to_string(),
            category: self.category,
            base_name: self.name.to_string(),
            display_name: self.name.to_string(),
            base_stats: self.stats,
            stats: self.stats,
            bonuses: Vec::new(),
            gem_slots: Vec::new(),
            stack_size: 1,
            max_stack: self.max_stack,
            base_description: self.description.to_string(),
            description: String::new(),
        };
        item.rebuild_description();
        item
    }

    /// Stackables keep the canonical id; everything else gets a unique one.
    pub fn create(&self, rng: &mut impl Rng) -> Item {
        if self.is_stackable() {
            self.instantiate(self.id.to_string())
        } else {
            self.instantiate(unique_item_id(self.id, rng))
        }
    }
}

/// `"<template>-<uuid>"`, with the uuid bytes drawn from `rng`.
pub fn unique_item_id(template_id: &str, rng: &mut impl Rng) -> String {
    let uuid = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
    format!("{}-{}", template_id, uuid)
}

/// Creates an item from its template id, or `None` for unknown ids.
pub fn create_item(template_id: &str, rng: &mut impl Rng) -> Option<Item> {
    let found = template(template_id);
    if found.is_none() {
        tracing::warn!(template_id, "unknown item template");
    }
    found.map(|t| t.create(rng))
}
