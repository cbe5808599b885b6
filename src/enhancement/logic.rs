use super::types::*;
use crate::items::catalog::BLESSING_SCROLL_ID;
use crate::items::inventory::Inventory;
use crate::items::types::{display_name_for, Item, ItemCategory, MAX_PLUS_LEVEL};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    #[error("{name} is already at +{max}", max = MAX_PLUS_LEVEL)]
    MaxLevel { name: String },

    #[error("{category:?} items cannot be upgraded")]
    NotUpgradable { category: ItemCategory },

    #[error("Not enough yang: need {required}, have {available}")]
    InsufficientCurrency { required: u64, available: u64 },

    #[error("Missing upgrade materials")]
    MissingMaterials { missing: Vec<MissingMaterial> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingMaterial {
    pub item_id: &'static str,
    pub required: u32,
    pub available: u32,
}

/// Result of an attempt whose requirements were met.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeOutcome {
    pub success: bool,
    pub item: Item,
    pub old_level: u8,
    pub new_level: u8,
    pub cost: u64,
    pub remaining_currency: u64,
    pub used_scroll: bool,
}

/// Returns `item` with its name and stats rebuilt for `level`.
pub fn with_plus_level(item: &Item, level: u8) -> Item {
    let level = level.min(MAX_PLUS_LEVEL);
    let mut updated = item.clone();
    updated.display_name = display_name_for(&item.base_name, level);
    updated.stats = stats_at_level(&item.base_stats, item.category, level);
    updated
}

/// Verifies currency and materials without touching anything.
pub fn check_upgrade(
    item: &Item,
    currency: u64,
    inventory: &Inventory,
) -> Result<UpgradeRates, UpgradeError> {
    if !item.category.is_equippable() {
        return Err(UpgradeError::NotUpgradable {
            category: item.category,
        });
    }
    let level = item.plus_level();
    let rates = get_rates(level, item.category, &item.template_id).ok_or_else(|| {
        UpgradeError::MaxLevel {
            name: item.display_name.clone(),
        }
    })?;

    if currency < rates.cost {
        return Err(UpgradeError::InsufficientCurrency {
            required: rates.cost,
            available: currency,
        });
    }

    let missing: Vec<MissingMaterial> = rates
        .requirements
        .iter()
        .filter_map(|req| {
            let available = inventory.count(req.item_id);
            (available < req.quantity).then_some(MissingMaterial {
                item_id: req.item_id,
                required: req.quantity,
                available,
            })
        })
        .collect();
    if !missing.is_empty() {
        return Err(UpgradeError::MissingMaterials { missing });
    }
    Ok(rates)
}

/// Attempts one upgrade.
///
/// On `Err` nothing was spent. On `Ok` the cost, the required materials and a
/// blessing scroll (if one was carried) are consumed whether or not the roll
/// succeeds. Success moves the item to +N+1, failure to +max(0, N-1).
pub fn try_upgrade<R: Rng>(
    item: &Item,
    currency: u64,
    inventory: &mut Inventory,
    rng: &mut R,
) -> Result<UpgradeOutcome, UpgradeError> {
    let rates = check_upgrade(item, currency, inventory)?;

    for req in &rates.requirements {
        if let Err(err) = inventory.remove(req.item_id, req.quantity) {
            // check_upgrade counted these; only reachable with duplicate requirement ids
            tracing::warn!(%err, "material vanished between check and consume");
        }
    }
    let used_scroll = inventory.remove(BLESSING_SCROLL_ID, 1).is_ok();
    let chance = if used_scroll {
        (rates.success_rate + BLESSING_SCROLL_BONUS).min(1.0)
    } else {
        rates.success_rate
    };

    let old_level = item.plus_level();
    let success = rng.gen::<f64>() < chance;
    let new_level = if success {
        old_level + 1
    } else {
        old_level.saturating_sub(1)
    };

    tracing::debug!(
        item = %item.id,
        old_level,
        new_level,
        success,
        used_scroll,
        "upgrade attempt"
    );

    Ok(UpgradeOutcome {
        success,
        item: with_plus_level(item, new_level),
        old_level,
        new_level,
        cost: rates.cost,
        remaining_currency: currency - rates.cost,
        used_scroll,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog::{template, BEAR_FOOT_SKIN_ID, BEAR_GALL_ID};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn item_at(template_id: &str, level: u8) -> Item {
        let base = template(template_id).unwrap().instantiate("test".to_string());
        with_plus_level(&base, level)
    }

    fn materials(id: &str, count: u32) -> Item {
        let mut m = template(id).unwrap().instantiate(id.to_string());
        m.stack_size = count;
        m
    }

    /// Always rolls 0.0, so every attempt succeeds.
    fn lucky() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Always rolls just below 1.0, so anything short of 100% fails.
    fn unlucky() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn test_success_raises_level_and_stats() {
        let sword = item_at("full-moon-sword", 2);
        let mut inv = Inventory::new(10);
        let outcome = try_upgrade(&sword, 1000, &mut inv, &mut lucky()).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.new_level, 3);
        assert_eq!(outcome.item.display_name, "Full Moon Sword+3");
        assert_eq!(outcome.item.stats.min_attack, 28 + 9);
        assert_eq!(outcome.cost, 300);
        assert_eq!(outcome.remaining_currency, 700);
    }

    #[test]
    fn test_failure_drops_one_level() {
        let sword = item_at("full-moon-sword", 3);
        let mut inv = Inventory::new(10);
        let outcome = try_upgrade(&sword, 1000, &mut inv, &mut unlucky()).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.new_level, 2);
        assert_eq!(outcome.item.stats.min_attack, 28 + 6);
        assert_eq!(outcome.remaining_currency, 500);
    }

    #[test]
    fn test_plus_zero_always_succeeds() {
        let sword = item_at("full-moon-sword", 0);
        let mut inv = Inventory::new(10);
        let outcome = try_upgrade(&sword, 100, &mut inv, &mut unlucky()).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.new_level, 1);
    }

    #[test]
    fn test_insufficient_currency_changes_nothing() {
        let sword = item_at("full-moon-sword", 4);
        let mut inv = Inventory::new(10);
        inv.add(materials(BLESSING_SCROLL_ID, 1)).unwrap();
        let err = try_upgrade(&sword, 10, &mut inv, &mut lucky()).unwrap_err();
        assert_eq!(
            err,
            UpgradeError::InsufficientCurrency {
                required: 700,
                available: 10
            }
        );
        assert_eq!(inv.count(BLESSING_SCROLL_ID), 1);
    }

    #[test]
    fn test_materials_consumed_once_on_failure() {
        let armor = item_at("iron-plate", 7);
        let mut inv = Inventory::new(10);
        inv.add(materials(BEAR_GALL_ID, 5)).unwrap();
        let outcome = try_upgrade(&armor, 5000, &mut inv, &mut unlucky()).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.new_level, 6);
        assert_eq!(inv.count(BEAR_GALL_ID), 3);
    }

    #[test]
    fn test_blessing_scroll_consumed_and_boosts() {
        let armor = item_at("iron-plate", 8);
        let mut inv = Inventory::new(10);
        inv.add(materials(BEAR_GALL_ID, 3)).unwrap();
        inv.add(materials(BLESSING_SCROLL_ID, 2)).unwrap();
        // 0.45 would fail at 40% but passes at 50%
        let mut rng = StepRng::new((0.45 * u64::MAX as f64) as u64, 0);
        let outcome = try_upgrade(&armor, 5000, &mut inv, &mut rng).unwrap();
        assert!(outcome.used_scroll);
        assert!(outcome.success);
        assert_eq!(outcome.new_level, 9);
        assert_eq!(inv.count(BLESSING_SCROLL_ID), 1);
        assert_eq!(inv.count(BEAR_GALL_ID), 0);
    }

    #[test]
    fn test_legendary_plus_five_missing_materials() {
        let armor = item_at("dragon-armor", 5);
        let mut inv = Inventory::new(10);
        let err = try_upgrade(&armor, 10_000, &mut inv, &mut lucky()).unwrap_err();
        let UpgradeError::MissingMaterials { missing } = err else {
            panic!("expected missing materials, got {err:?}");
        };
        assert!(missing.iter().any(|m| m.item_id == BEAR_GALL_ID && m.required == 1));
        assert_eq!(armor.plus_level(), 5);
    }

    #[test]
    fn test_legendary_consumes_both_materials() {
        let sword = item_at("dragon-sword", 6);
        let mut inv = Inventory::new(10);
        inv.add(materials(BEAR_GALL_ID, 2)).unwrap();
        inv.add(materials(BEAR_FOOT_SKIN_ID, 3)).unwrap();
        try_upgrade(&sword, 10_000, &mut inv, &mut lucky()).unwrap();
        assert_eq!(inv.count(BEAR_GALL_ID), 0);
        assert_eq!(inv.count(BEAR_FOOT_SKIN_ID), 1);
    }

    #[test]
    fn test_max_level_rejected() {
        let sword = item_at("full-moon-sword", 9);
        let mut inv = Inventory::new(10);
        assert!(matches!(
            try_upgrade(&sword, 100_000, &mut inv, &mut lucky()),
            Err(UpgradeError::MaxLevel { .. })
        ));
    }

    #[test]
    fn test_materials_not_upgradable() {
        let gall = materials(BEAR_GALL_ID, 1);
        let mut inv = Inventory::new(10);
        assert!(matches!(
            try_upgrade(&gall, 100_000, &mut inv, &mut lucky()),
            Err(UpgradeError::NotUpgradable { .. })
        ));
    }

    #[test]
    fn test_level_stays_in_bounds_over_many_attempts() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut sword = item_at("full-moon-sword", 0);
        let mut inv = Inventory::new(10);
        inv.add(materials(BEAR_FOOT_SKIN_ID, 600)).unwrap();
        for _ in 0..200 {
            match try_upgrade(&sword, 1_000_000, &mut inv, &mut rng) {
                Ok(outcome) => {
                    assert!(outcome.new_level <= MAX_PLUS_LEVEL);
                    let expected = if outcome.success {
                        outcome.old_level + 1
                    } else {
                        outcome.old_level.saturating_sub(1)
                    };
                    assert_eq!(outcome.new_level, expected);
                    sword = outcome.item;
                }
                Err(UpgradeError::MaxLevel { .. }) => break,
                Err(other) => panic!("unexpected {other:?}"),
            }
        }
    }
}
