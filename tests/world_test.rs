//! Whole-loop behavior of `World::tick`.

mod common;

use rand_chacha::ChaCha8Rng;
use stonefall::character::PlayerSnapshot;
use stonefall::combat::Archetype;
use stonefall::core::constants::*;
use stonefall::core::Vec2;
use stonefall::loot::BossPhase;
use stonefall::{EngineConfig, InputEvent, Notification, NullSink, RecordingSink, World};

fn world(seed: u64) -> World<ChaCha8Rng> {
    World::new(EngineConfig::default(), common::seeded(seed))
}

/// Strong enough to fell any archetype in one swing, so knockback never
/// pushes a target out of reach.
fn heavy_hitter(world: &mut World<ChaCha8Rng>) {
    world.actor_mut().base_attack = 10_000;
}

/// Swings every 100 ms until nothing is left alive near the actor.
fn grind(world: &mut World<ChaCha8Rng>, start: u64, sink: &mut RecordingSink) -> u64 {
    let mut now = start;
    for _ in 0..10_000 {
        now += 100;
        world.tick(now, &[InputEvent::Attack], sink);
        if world.enemies().iter().all(|e| !e.is_alive()) {
            break;
        }
    }
    now
}

#[test]
fn test_killing_a_stone_end_to_end() {
    let mut w = world(1);
    heavy_hitter(&mut w);
    w.add_spawn(Archetype::StoneOfMap1, Vec2::new(15.0, 0.0));
    let mut sink = RecordingSink::default();
    w.tick(0, &[], &mut sink);

    let now = grind(&mut w, 0, &mut sink);
    assert!(w.actor().level >= 2);
    assert!(w.actor().yang >= 10);
    assert!(sink
        .received
        .iter()
        .any(|n| matches!(n, Notification::LevelUp { .. })));

    // corpse disappears after the delay, the anchor refills after the window
    w.tick(now + CORPSE_REMOVAL_DELAY_MS, &[], &mut sink);
    assert!(w.enemies().is_empty());
    let report = w.tick(now + RESPAWN_WINDOW_MS, &[], &mut sink);
    assert_eq!(report.spawned.len(), 1);
    assert_eq!(w.enemies()[0].health, w.enemies()[0].max_health);
}

#[test]
fn test_combo_cycles_through_ticks() {
    let mut w = world(2);
    w.tick(0, &[], &mut NullSink);
    let steps: Vec<u8> = (1..=5)
        .filter_map(|i| w.tick(i * 200, &[InputEvent::Attack], &mut NullSink).attack_sequence)
        .collect();
    assert_eq!(steps, vec![1, 2, 3, 4, 1]);
}

#[test]
fn test_enemy_behind_is_safe() {
    let mut w = world(3);
    w.add_spawn(Archetype::Metin, Vec2::new(-20.0, 0.0));
    w.tick(0, &[], &mut NullSink);
    let report = w.tick(50, &[InputEvent::Attack], &mut NullSink);
    assert!(report.hits.is_empty());

    // turning around brings it into the arc
    let report = w.tick(
        100,
        &[InputEvent::Move(Vec2::new(-1.0, 0.0)), InputEvent::Stop, InputEvent::Attack],
        &mut NullSink,
    );
    assert_eq!(report.hits.len(), 1);
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut w = world(seed);
        heavy_hitter(&mut w);
        w.add_spawn(Archetype::Metin, Vec2::new(10.0, 0.0));
        w.add_spawn(Archetype::DesertMetin, Vec2::new(0.0, 10.0));
        w.add_spawn(Archetype::WhiteTiger, Vec2::new(10.0, 10.0));
        let mut sink = RecordingSink::default();
        w.tick(0, &[], &mut sink);
        grind(&mut w, 0, &mut sink);
        (sink.received, w.actor().yang, w.actor().level)
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn test_full_inventory_reports_lost_loot() {
    let mut config = EngineConfig::default();
    config.inventory_capacity = 0;
    let mut w = World::new(config, common::seeded(4));
    heavy_hitter(&mut w);
    w.add_spawn(Archetype::WhiteTiger, Vec2::new(10.0, 0.0));
    let mut sink = RecordingSink::default();
    w.tick(0, &[], &mut sink);
    grind(&mut w, 0, &mut sink);
    assert!(sink
        .received
        .iter()
        .any(|n| matches!(n, Notification::InventoryFull { .. })));
    assert!(w.actor().inventory.is_empty());
}

#[test]
fn test_distant_boss_stays_dormant_until_player_walks_up() {
    common::init_tracing();
    let mut w = world(5);
    w.add_spawn(Archetype::Boss, Vec2::new(600.0, 0.0));
    w.tick(0, &[InputEvent::Move(Vec2::unit_x())], &mut NullSink);
    assert_eq!(w.enemies()[0].boss.map(|b| b.phase), Some(BossPhase::Dormant));

    // 140 units/s for 2.5 s leaves the player 250 units away, inside aggro
    w.tick(2500, &[], &mut NullSink);
    assert!((w.actor().position.x - 350.0).abs() < 1e-2);
    assert_eq!(w.enemies()[0].boss.map(|b| b.phase), Some(BossPhase::Aggro));
    assert_eq!(w.actor().health, w.actor().max_health);
}

#[test]
fn test_snapshot_survives_a_session() {
    let mut w = world(6);
    heavy_hitter(&mut w);
    w.add_spawn(Archetype::WhiteTiger, Vec2::new(10.0, 0.0));
    w.tick(0, &[], &mut NullSink);
    let mut sink = RecordingSink::default();
    grind(&mut w, 0, &mut sink);

    let json = w.snapshot(5_000).to_json().unwrap();
    let snapshot = PlayerSnapshot::from_json(&json).unwrap();
    let restored = World::from_snapshot(EngineConfig::default(), snapshot, common::seeded(6));
    assert_eq!(restored.actor().level, w.actor().level);
    assert_eq!(restored.actor().inventory, w.actor().inventory);
    assert_eq!(restored.actor().attack_sequence, 0);
    assert!(restored.enemies().is_empty());
}
