use crate::items::catalog::{BEAR_FOOT_SKIN_ID, BEAR_GALL_ID};
use crate::items::types::{ItemCategory, ItemStats, MAX_PLUS_LEVEL};

/// Templates with the steeper dual-material path starting at +5.
pub const LEGENDARY_TEMPLATES: [&str; 2] = ["dragon-sword", "dragon-armor"];
pub const LEGENDARY_REQUIREMENT_FROM: u8 = 5;

/// Success chance by current plus-level (+0 → +1 is index 0).
pub const UPGRADE_SUCCESS_RATES: [f64; 9] = [
    1.00, // +0
    0.80, 0.80, 0.80, // +1-3
    0.70, 0.70, // +4-5
    0.60, 0.60, // +6-7
    0.40, // +8
];

pub const UPGRADE_COSTS: [u64; 9] = [100, 200, 300, 500, 700, 900, 1200, 1500, 2000];

/// Added to the success chance when a blessing scroll is consumed.
pub const BLESSING_SCROLL_BONUS: f64 = 0.10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRequirement {
    pub item_id: &'static str,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeRates {
    pub success_rate: f64,
    pub cost: u64,
    pub requirements: Vec<MaterialRequirement>,
}

/// Material used by the category's regular upgrade path.
pub fn upgrade_material(category: ItemCategory) -> Option<&'static str> {
    match category {
        ItemCategory::Armor | ItemCategory::Helmet | ItemCategory::Necklace => Some(BEAR_GALL_ID),
        ItemCategory::Weapon | ItemCategory::Earring | ItemCategory::Bracelet => {
            Some(BEAR_FOOT_SKIN_ID)
        }
        _ => None,
    }
}

pub fn is_legendary(template_id: &str) -> bool {
    LEGENDARY_TEMPLATES.contains(&template_id)
}

pub fn requirements(
    level: u8,
    category: ItemCategory,
    template_id: &str,
) -> Vec<MaterialRequirement> {
    if is_legendary(template_id) {
        if level < LEGENDARY_REQUIREMENT_FROM {
            return Vec::new();
        }
        let quantity = (level - LEGENDARY_REQUIREMENT_FROM + 1) as u32;
        return vec![
            MaterialRequirement {
                item_id: BEAR_GALL_ID,
                quantity,
            },
            MaterialRequirement {
                item_id: BEAR_FOOT_SKIN_ID,
                quantity,
            },
        ];
    }

    let quantity = match level {
        6 => 1,
        7 => 2,
        8 => 3,
        _ => return Vec::new(),
    };
    upgrade_material(category)
        .map(|item_id| vec![MaterialRequirement { item_id, quantity }])
        .unwrap_or_default()
}

/// Rates for upgrading from `level`. `None` at the cap.
pub fn get_rates(level: u8, category: ItemCategory, template_id: &str) -> Option<UpgradeRates> {
    if level >= MAX_PLUS_LEVEL {
        return None;
    }
    let index = level as usize;
    Some(UpgradeRates {
        success_rate: UPGRADE_SUCCESS_RATES[index],
        cost: UPGRADE_COSTS[index],
        requirements: requirements(level, category, template_id),
    })
}

/// Stats gained per plus-level.
pub fn per_level_increment(category: ItemCategory) -> ItemStats {
    let zero = ItemStats::default();
    match category {
        ItemCategory::Weapon => ItemStats {
            min_attack: 3,
            max_attack: 5,
            ..zero
        },
        ItemCategory::Armor => ItemStats {
            defense: 4,
            ..zero
        },
        ItemCategory::Helmet => ItemStats {
            defense: 3,
            ..zero
        },
        ItemCategory::Earring => ItemStats {
            dexterity: 1,
            fire_resistance: 2,
            ..zero
        },
        ItemCategory::Bracelet => ItemStats {
            vitality: 2,
            ..zero
        },
        ItemCategory::Necklace => ItemStats {
            crit_chance: 1,
            vitality: 1,
            ..zero
        },
        _ => zero,
    }
}

/// Stat block of an item with `base` stats at `level`.
pub fn stats_at_level(base: &ItemStats, category: ItemCategory, level: u8) -> ItemStats {
    let mut stats = *base;
    stats.add(&per_level_increment(category).scaled(level as u32));
    stats
}
