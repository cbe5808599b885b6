use super::types::{AffixKind, EquipmentSlot, Item, ItemStats};
use crate::core::constants::PERCENT_DIVISOR;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EquipError {
    #[error("{name} cannot be equipped")]
    NotEquippable { name: String },

    #[error("No inventory room for the replaced {name}")]
    NoRoomForReplaced { name: String },
}

/// Player equipment slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub helmet: Option<Item>,
    pub earring: Option<Item>,
    pub bracelet: Option<Item>,
    pub necklace: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Helmet => &self.helmet,
            EquipmentSlot::Earring => &self.earring,
            EquipmentSlot::Bracelet => &self.bracelet,
            EquipmentSlot::Necklace => &self.necklace,
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Helmet => &mut self.helmet,
            EquipmentSlot::Earring => &mut self.earring,
            EquipmentSlot::Bracelet => &mut self.bracelet,
            EquipmentSlot::Necklace => &mut self.necklace,
        }
    }

    /// Puts `item` in its category's slot, returning whatever was there.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, EquipError> {
        let Some(slot) = item.category.equipment_slot() else {
            return Err(EquipError::NotEquippable {
                name: item.display_name,
            });
        };
        Ok(self.slot_mut(slot).replace(item))
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [
            &self.weapon,
            &self.armor,
            &self.helmet,
            &self.earring,
            &self.bracelet,
            &self.necklace,
        ]
        .into_iter()
        .filter_map(|item| item.as_ref())
    }

    pub fn stats(&self) -> EquipmentStats {
        aggregate(self.iter_equipped())
    }
}

/// Combat totals derived from everything equipped. Recomputed, never edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentStats {
    pub min_attack: u32,
    pub max_attack: u32,
    /// Flat attack from affixes (average/skill damage, penetration).
    pub bonus_attack: i32,
    pub defense: u32,
    pub attack_speed: u32,
    pub dexterity: u32,
    pub fire_resistance: u32,
    pub monster_damage: u32,
    pub crit_chance: u32,
    pub vitality: u32,
    pub strength: u32,
    pub max_health: u32,
    pub movement_speed: u32,
    pub attack_speed_multiplier: f64,
    pub movement_speed_multiplier: f64,
}

impl Default for EquipmentStats {
    fn default() -> Self {
        Self {
            min_attack: 0,
            max_attack: 0,
            bonus_attack: 0,
            defense: 0,
            attack_speed: 0,
            dexterity: 0,
            fire_resistance: 0,
            monster_damage: 0,
            crit_chance: 0,
            vitality: 0,
            strength: 0,
            max_health: 0,
            movement_speed: 0,
            attack_speed_multiplier: 1.0,
            movement_speed_multiplier: 1.0,
        }
    }
}

impl EquipmentStats {
    /// Attack contributed by gear: weapon midpoint plus affix attack, floored at 0.
    pub fn attack_value(&self) -> i64 {
        let midpoint = (self.min_attack as i64 + self.max_attack as i64) / 2;
        (midpoint + self.bonus_attack as i64).max(0)
    }

    fn add_stats(&mut self, stats: &ItemStats) {
        self.min_attack += stats.min_attack;
        self.max_attack += stats.max_attack;
        self.defense += stats.defense;
        self.attack_speed += stats.attack_speed;
        self.dexterity += stats.dexterity;
        self.fire_resistance += stats.fire_resistance;
        self.monster_damage += stats.monster_damage;
        self.crit_chance += stats.crit_chance;
        self.vitality += stats.vitality;
        self.movement_speed += stats.movement_speed;
    }

    fn add_affix(&mut self, kind: AffixKind, value: i32) {
        // Non-attack affixes are clamped at zero; only attack may go negative.
        let positive = value.max(0) as u32;
        match kind {
            AffixKind::AverageDamage | AffixKind::SkillDamage | AffixKind::Penetration => {
                self.bonus_attack += value
            }
            AffixKind::CriticalHit => self.crit_chance += positive,
            AffixKind::Strength => self.strength += positive,
            AffixKind::Dexterity => self.dexterity += positive,
            AffixKind::Vitality => self.vitality += positive,
            AffixKind::AttackSpeed => self.attack_speed += positive,
            AffixKind::MovementSpeed => self.movement_speed += positive,
            AffixKind::MonsterDamage => self.monster_damage += positive,
            AffixKind::FireResistance => self.fire_resistance += positive,
            AffixKind::Defense => self.defense += positive,
            AffixKind::MaxHealth => self.max_health += positive,
        }
    }
}

/// Merges item stats, socketed gems and affixes of every equippable item.
/// Items that cannot be equipped are skipped.
pub fn aggregate<'a>(items: impl IntoIterator<Item = &'a Item>) -> EquipmentStats {
    let mut totals = EquipmentStats::default();

    for item in items {
        if !item.category.is_equippable() {
            tracing::warn!(item = %item.id, category = ?item.category, "skipping non-equippable item in aggregation");
            continue;
        }
        totals.add_stats(&item.effective_stats());
        for affix in &item.bonuses {
            totals.add_affix(affix.kind, affix.value);
        }
    }

    totals.attack_speed_multiplier = 1.0 + totals.attack_speed as f64 / PERCENT_DIVISOR;
    totals.movement_speed_multiplier = 1.0 + totals.movement_speed as f64 / PERCENT_DIVISOR;
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog::template;
    use crate::items::types::{Affix, GemKind, Socket};

    fn item(template_id: &str) -> Item {
        template(template_id)
            .unwrap()
            .instantiate(format!("{template_id}-1"))
    }

    #[test]
    fn test_empty_equipment_is_zeroed() {
        let stats = aggregate(std::iter::empty::<&Item>());
        assert_eq!(stats, EquipmentStats::default());
        assert_eq!(stats.attack_speed_multiplier, 1.0);
        assert_eq!(stats.attack_value(), 0);
    }

    #[test]
    fn test_sums_across_slots() {
        let mut eq = Equipment::new();
        eq.equip(item("full-moon-sword")).unwrap();
        eq.equip(item("iron-plate")).unwrap();
        eq.equip(item("iron-helmet")).unwrap();

        let stats = eq.stats();
        assert_eq!(stats.min_attack, 28);
        assert_eq!(stats.max_attack, 36);
        assert_eq!(stats.defense, 34);
        assert!((stats.attack_speed_multiplier - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_gems_and_affixes_counted() {
        let mut sword = item("full-moon-sword");
        sword.gem_slots = vec![
            Socket {
                gem: Some(GemKind::Monster),
            },
            Socket {
                gem: Some(GemKind::Attack),
            },
            Socket::default(),
        ];
        sword.bonuses = vec![
            Affix {
                kind: AffixKind::AverageDamage,
                value: 20,
            },
            Affix {
                kind: AffixKind::SkillDamage,
                value: -5,
            },
            Affix {
                kind: AffixKind::CriticalHit,
                value: 8,
            },
        ];
        let mut armor = item("iron-plate");
        armor.gem_slots = vec![Socket {
            gem: Some(GemKind::Speed),
        }];

        let stats = aggregate([&sword, &armor]);
        assert_eq!(stats.monster_damage, 5);
        assert_eq!(stats.min_attack, 38);
        assert_eq!(stats.bonus_attack, 15);
        assert_eq!(stats.crit_chance, 8);
        assert_eq!(stats.movement_speed, 5);
        assert!((stats.movement_speed_multiplier - 1.05).abs() < 1e-9);
        // (38 + 46) / 2 + 15
        assert_eq!(stats.attack_value(), 57);
    }

    #[test]
    fn test_non_equippable_items_skipped() {
        let gall = item("bear-gall");
        let stats = aggregate([&gall]);
        assert_eq!(stats, EquipmentStats::default());
    }

    #[test]
    fn test_equip_swaps_and_rejects() {
        let mut eq = Equipment::new();
        assert!(eq.equip(item("bamboo-blade")).unwrap().is_none());
        let previous = eq.equip(item("full-moon-sword")).unwrap();
        assert_eq!(previous.unwrap().template_id, "bamboo-blade");
        assert!(matches!(
            eq.equip(item("diamond")),
            Err(EquipError::NotEquippable { .. })
        ));
        assert!(eq.unequip(EquipmentSlot::Weapon).is_some());
        assert_eq!(eq.iter_equipped().count(), 0);
    }
}
