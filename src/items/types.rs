use serde::{Deserialize, Serialize};

pub const MAX_PLUS_LEVEL: u8 = 9;
pub const MAX_SOCKETS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemCategory {
    Weapon,
    Armor,
    Helmet,
    Earring,
    Bracelet,
    Necklace,
    Gem,
    Chest,
    Scroll,
    Material,
    Misc,
}

impl ItemCategory {
    /// Slot this category occupies when equipped, if any.
    pub fn equipment_slot(&self) -> Option<EquipmentSlot> {
        match self {
            ItemCategory::Weapon => Some(EquipmentSlot::Weapon),
            ItemCategory::Armor => Some(EquipmentSlot::Armor),
            ItemCategory::Helmet => Some(EquipmentSlot::Helmet),
            ItemCategory::Earring => Some(EquipmentSlot::Earring),
            ItemCategory::Bracelet => Some(EquipmentSlot::Bracelet),
            ItemCategory::Necklace => Some(EquipmentSlot::Necklace),
            _ => None,
        }
    }

    pub fn is_equippable(&self) -> bool {
        self.equipment_slot().is_some()
    }

    pub fn is_accessory(&self) -> bool {
        matches!(
            self,
            ItemCategory::Helmet
                | ItemCategory::Earring
                | ItemCategory::Bracelet
                | ItemCategory::Necklace
        )
    }

    /// Maximum number of affixes an item of this category can carry.
    pub fn bonus_cap(&self) -> usize {
        match self {
            ItemCategory::Weapon | ItemCategory::Armor => 4,
            c if c.is_accessory() => 2,
            _ => 0,
        }
    }

    /// Weapons and body armor are the only socketable categories.
    pub fn socket_cap(&self) -> usize {
        match self {
            ItemCategory::Weapon | ItemCategory::Armor => MAX_SOCKETS,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Helmet,
    Earring,
    Bracelet,
    Necklace,
}

/// Flat stat block. Percent stats are whole percentage points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemStats {
    pub min_attack: u32,
    pub max_attack: u32,
    pub defense: u32,
    pub attack_speed: u32,
    pub dexterity: u32,
    pub fire_resistance: u32,
    pub monster_damage: u32,
    pub crit_chance: u32,
    pub vitality: u32,
    pub movement_speed: u32,
}

impl ItemStats {
    pub fn add(&mut self, other: &ItemStats) {
        self.min_attack += other.min_attack;
        self.max_attack += other.max_attack;
        self.defense += other.defense;
        self.attack_speed += other.attack_speed;
        self.dexterity += other.dexterity;
        self.fire_resistance += other.fire_resistance;
        self.monster_damage += other.monster_damage;
        self.crit_chance += other.crit_chance;
        self.vitality += other.vitality;
        self.movement_speed += other.movement_speed;
    }

    pub fn scaled(&self, factor: u32) -> ItemStats {
        ItemStats {
            min_attack: self.min_attack * factor,
            max_attack: self.max_attack * factor,
            defense: self.defense * factor,
            attack_speed: self.attack_speed * factor,
            dexterity: self.dexterity * factor,
            fire_resistance: self.fire_resistance * factor,
            monster_damage: self.monster_damage * factor,
            crit_chance: self.crit_chance * factor,
            vitality: self.vitality * factor,
            movement_speed: self.movement_speed * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffixKind {
    AverageDamage,
    SkillDamage,
    CriticalHit,
    Penetration,
    Strength,
    Dexterity,
    Vitality,
    AttackSpeed,
    MovementSpeed,
    MonsterDamage,
    FireResistance,
    Defense,
    MaxHealth,
}

impl AffixKind {
    pub fn label(&self) -> &'static str {
        match self {
            AffixKind::AverageDamage => "Average Damage",
            AffixKind::SkillDamage => "Skill Damage",
            AffixKind::CriticalHit => "Critical Hit",
            AffixKind::Penetration => "Penetration",
            AffixKind::Strength => "Strength",
            AffixKind::Dexterity => "Dexterity",
            AffixKind::Vitality => "Vitality",
            AffixKind::AttackSpeed => "Attack Speed",
            AffixKind::MovementSpeed => "Movement Speed",
            AffixKind::MonsterDamage => "Strong against Monsters",
            AffixKind::FireResistance => "Fire Resistance",
            AffixKind::Defense => "Defense",
            AffixKind::MaxHealth => "Max HP",
        }
    }

    pub fn is_percent(&self) -> bool {
        !matches!(
            self,
            AffixKind::Strength
                | AffixKind::Dexterity
                | AffixKind::Vitality
                | AffixKind::Defense
                | AffixKind::MaxHealth
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix {
    pub kind: AffixKind,
    pub value: i32,
}

impl Affix {
    pub fn describe(&self) -> String {
        let suffix = if self.kind.is_percent() { "%" } else { "" };
        format!("{} {:+}{}", self.kind.label(), self.value, suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GemKind {
    // Weapon gems
    Monster,
    Critical,
    Attack,
    // Armor gems
    Speed,
    Vitality,
    Dexterity,
}

impl GemKind {
    pub fn for_weapons(&self) -> bool {
        matches!(self, GemKind::Monster | GemKind::Critical | GemKind::Attack)
    }

    /// Category this gem can be socketed into.
    pub fn target_category(&self) -> ItemCategory {
        if self.for_weapons() {
            ItemCategory::Weapon
        } else {
            ItemCategory::Armor
        }
    }

    /// Stable inventory id of the gem item.
    pub fn item_id(&self) -> &'static str {
        match self {
            GemKind::Monster => "gem-monster",
            GemKind::Critical => "gem-critical",
            GemKind::Attack => "gem-attack",
            GemKind::Speed => "gem-speed",
            GemKind::Vitality => "gem-vitality",
            GemKind::Dexterity => "gem-dexterity",
        }
    }

    pub fn from_item_id(id: &str) -> Option<GemKind> {
        match id {
            "gem-monster" => Some(GemKind::Monster),
            "gem-critical" => Some(GemKind::Critical),
            "gem-attack" => Some(GemKind::Attack),
            "gem-speed" => Some(GemKind::Speed),
            "gem-vitality" => Some(GemKind::Vitality),
            "gem-dexterity" => Some(GemKind::Dexterity),
            _ => None,
        }
    }

    /// Stats one socketed gem contributes.
    pub fn bonus(&self) -> ItemStats {
        match self {
            GemKind::Monster => ItemStats {
                monster_damage: 5,
                ..ItemStats::default()
            },
            GemKind::Critical => ItemStats {
                crit_chance: 3,
                ..ItemStats::default()
            },
            GemKind::Attack => ItemStats {
                min_attack: 10,
                max_attack: 10,
                ..ItemStats::default()
            },
            GemKind::Speed => ItemStats {
                movement_speed: 5,
                ..ItemStats::default()
            },
            GemKind::Vitality => ItemStats {
                vitality: 5,
                ..ItemStats::default()
            },
            GemKind::Dexterity => ItemStats {
                dexterity: 5,
                ..ItemStats::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socket {
    pub gem: Option<GemKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub template_id: String,
    pub category: ItemCategory,
    pub base_name: String,
    /// `base_name` plus the `+N` upgrade suffix.
    pub display_name: String,
    /// Stats at +0, the input of the per-level upgrade formula.
    pub base_stats: ItemStats,
    pub stats: ItemStats,
    #[serde(default)]
    pub bonuses: Vec<Affix>,
    #[serde(default)]
    pub gem_slots: Vec<Socket>,
    pub stack_size: u32,
    pub max_stack: u32,
    #[serde(default)]
    pub base_description: String,
    #[serde(default)]
    pub description: String,
}

impl Item {
    pub fn plus_level(&self) -> u8 {
        parse_plus_level(&self.display_name)
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    /// Own stats plus every socketed gem.
    pub fn effective_stats(&self) -> ItemStats {
        let mut total = self.stats;
        for gem in self.gem_slots.iter().filter_map(|s| s.gem) {
            total.add(&gem.bonus());
        }
        total
    }

    pub fn has_bonus(&self, kind: AffixKind) -> bool {
        self.bonuses.iter().any(|a| a.kind == kind)
    }

    pub fn has_gem(&self, kind: GemKind) -> bool {
        self.gem_slots.iter().any(|s| s.gem == Some(kind))
    }

    /// Rebuilds `description` from the base text and current affixes.
    pub fn rebuild_description(&mut self) {
        let mut lines = Vec::with_capacity(self.bonuses.len() + 1);
        if !self.base_description.is_empty() {
            lines.push(self.base_description.clone());
        }
        lines.extend(self.bonuses.iter().map(Affix::describe));
        self.description = lines.join("\n");
    }
}

/// Reads the trailing `+N` of a display name. Anything outside 0-9 reads as 0.
pub fn parse_plus_level(name: &str) -> u8 {
    name.rsplit_once('+')
        .and_then(|(_, digits)| digits.trim().parse::<u8>().ok())
        .filter(|level| *level <= MAX_PLUS_LEVEL)
        .unwrap_or(0)
}

/// Formats a display name, e.g. `"Full Moon Sword+3"`; +0 has no suffix.
pub fn display_name_for(base_name: &str, level: u8) -> String {
    if level == 0 {
        base_name.to_string()
    } else {
        format!("{}+{}", base_name, level.min(MAX_PLUS_LEVEL))
    }
}
