//! Combat resolution through the public API: actor stats into hits.

mod common;

use rand::Rng;
use stonefall::character::Actor;
use stonefall::combat::{
    advance_combo, compute_damage, compute_hitbox, resolve_hits, Archetype, AttackerProfile,
    Enemy,
};
use stonefall::core::constants::*;
use stonefall::core::Vec2;
use stonefall::items::catalog::template;
use stonefall::items::{add_socket, insert_gem, GemKind, Inventory};

fn stone(id: u32, at: Vec2) -> Enemy {
    Enemy::new(id, Archetype::Metin, at)
}

// =========================================================================
// Concrete scenarios
// =========================================================================

#[test]
fn test_fresh_actor_first_swing_deals_seven() {
    let mut rng = common::seeded(1);
    let mut actor = Actor::new();
    let sequence = advance_combo(&mut actor, 0);
    assert_eq!(sequence, 1);

    let hitbox = compute_hitbox(actor.position, actor.direction, sequence);
    let enemies = vec![stone(1, Vec2::new(10.0, 0.0))];
    let report = resolve_hits(&hitbox, &enemies, &actor.attack_profile(), 0, &mut rng);
    assert_eq!(report.hits[0].damage, 7);
}

#[test]
fn test_gem_bonus_reaches_damage() {
    common::init_tracing();
    let mut actor = Actor::new();
    let mut inv = Inventory::new(10);
    inv.add(template("gem-monster").unwrap().instantiate("gem-monster".into()))
        .unwrap();
    let sword = template("bamboo-blade")
        .unwrap()
        .instantiate("bamboo-1".into());
    let sword = add_socket(&sword).unwrap();
    let sword = insert_gem(&sword, 0, GemKind::Monster, &mut inv).unwrap();
    actor.equip(sword).unwrap();

    let profile = actor.attack_profile();
    assert_eq!(profile.monster_damage, 5);
    // (12 + 18) / 2 = 15 gear attack, +5 base, +2 from strength
    let plain = compute_damage(&profile, 1, Archetype::WhiteTiger, false, 0);
    let vs_stone = compute_damage(&profile, 1, Archetype::Metin, false, 0);
    assert_eq!(plain, 22);
    assert_eq!(vs_stone, 23);
}

#[test]
fn test_fractional_combo_steps_floor_first() {
    let base = AttackerProfile {
        attack: 5,
        strength: 1,
        monster_damage: 5,
        ..AttackerProfile::default()
    };
    // floor(7 * 1.5) = 10, floor(10 * 1.05) = 10
    assert_eq!(compute_damage(&base, 3, Archetype::Metin, false, 0), 10);

    let heavier = AttackerProfile {
        attack: 6,
        ..base
    };
    // floor(8 * 1.2) = 9, floor(9 * 1.5) = 13
    assert_eq!(compute_damage(&heavier, 2, Archetype::WhiteTiger, true, 0), 13);
    // floor(8 * 1.2) = 9, floor(9 * 1.05) = 9
    assert_eq!(compute_damage(&heavier, 2, Archetype::StoneOfMap1, false, 0), 9);
}

// =========================================================================
// Properties
// =========================================================================

#[test]
fn test_damage_is_at_least_one_for_random_profiles() {
    let mut rng = common::seeded(3);
    let archetypes = [
        Archetype::Metin,
        Archetype::StoneOfMetin,
        Archetype::DesertMetin,
        Archetype::StoneOfMap1,
        Archetype::WhiteTiger,
        Archetype::Boss,
    ];
    for _ in 0..500 {
        let profile = AttackerProfile {
            attack: rng.gen_range(-100..200),
            strength: rng.gen_range(-10..50),
            crit_chance: rng.gen_range(0..=100),
            monster_damage: rng.gen_range(0..100),
            aura: None,
        };
        let sequence = rng.gen_range(1..=4);
        let archetype = archetypes[rng.gen_range(0..archetypes.len())];
        let crit = rng.gen_bool(0.5);
        assert!(compute_damage(&profile, sequence, archetype, crit, 0) >= 1);
    }
}

#[test]
fn test_only_enemies_in_cone_take_damage() {
    let mut rng = common::seeded(4);
    let hitbox = compute_hitbox(Vec2::zero(), Vec2::unit_x(), 2);
    let mut enemies = Vec::new();
    for i in 0..60u32 {
        let angle = i as f32 * std::f32::consts::TAU / 60.0;
        let radius = 10.0 + (i % 7) as f32 * 10.0;
        enemies.push(stone(i, Vec2::new(angle.cos(), angle.sin()) * radius));
    }
    let profile = AttackerProfile {
        attack: 5,
        strength: 1,
        ..AttackerProfile::default()
    };
    let report = resolve_hits(&hitbox, &enemies, &profile, 0, &mut rng);
    assert_eq!(report.enemies.len(), enemies.len());
    for (before, after) in enemies.iter().zip(&report.enemies) {
        let hit = report.hits.iter().any(|h| h.enemy_id == before.id);
        assert_eq!(hit, hitbox.contains(before.position));
        if !hit {
            assert_eq!(before, after);
        } else {
            assert!(after.health < before.health);
        }
    }
}

#[test]
fn test_combo_resets_after_pause() {
    let mut actor = Actor::new();
    assert_eq!(advance_combo(&mut actor, 0), 1);
    assert_eq!(advance_combo(&mut actor, COMBO_RESET_MS), 2);
    assert_eq!(advance_combo(&mut actor, 2 * COMBO_RESET_MS + 1), 1);
}
