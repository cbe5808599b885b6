//! The single-threaded simulation loop.
//!
//! [`World::tick`] is the only driver: it applies queued input, resolves
//! attacks, runs boss behavior, removes corpses whose timers fired and fills
//! empty spawn anchors. It returns a [`TickReport`] describing what happened
//! so the presentation layer can animate it without the engine knowing about
//! any UI types. Player actions on items (upgrades, sockets, bonuses, chests)
//! are separate calls made between ticks.

use super::config::EngineConfig;
use super::constants::*;
use super::events::{InputEvent, Notification, NotificationSink};
use super::frame::FrameScheduler;
use super::timers::Timers;
use super::Vec2;
use crate::character::{gain_experience, Actor, LevelUpEvent, PlayerSnapshot};
use crate::combat::{
    advance_combo, clear_stale_hit_flags, compute_hitbox, resolve_hits, Archetype, Enemy,
    HitRecord,
};
use crate::enhancement::{try_upgrade, UpgradeError, UpgradeOutcome};
use crate::items::catalog::DIAMOND_ID;
use crate::items::{
    add_random_bonus, add_socket, insert_gem, reroll_all_bonuses, BonusError, GemError, GemKind, Item,
};
use crate::loot::{
    open_from_inventory, roll_kill_loot, update_boss, AnchorId, BossEvent, ChestDrop, LootError,
    SpawnScheduler,
};
use crate::pool::ParticleSystem;
use crate::spatial::{EntityId, SpatialIndex};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("No item {id} in inventory")]
    UnknownItem { id: String },

    #[error("A diamond is needed to open a socket")]
    NoDiamond,

    #[error(transparent)]
    Upgrade(#[from] UpgradeError),

    #[error(transparent)]
    Gem(#[from] GemError),

    #[error(transparent)]
    Bonus(#[from] BonusError),

    #[error(transparent)]
    Loot(#[from] LootError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorldTimer {
    RemoveCorpse,
}

/// Everything that happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Advisory flag from the frame scheduler.
    pub heavy_frame: bool,
    /// Combo step of the attack made this tick, if any.
    pub attack_sequence: Option<u8>,
    pub hits: Vec<HitRecord>,
    pub killed: Vec<EntityId>,
    pub spawned: Vec<EntityId>,
    /// Corpses taken out of the world.
    pub removed: Vec<EntityId>,
    pub level_up: Option<LevelUpEvent>,
    pub damage_taken: u32,
    /// Items the player threw away this tick.
    pub dropped: Vec<Item>,
}

pub struct World<R: Rng> {
    config: EngineConfig,
    actor: Actor,
    enemies: Vec<Enemy>,
    spatial: SpatialIndex,
    particles: ParticleSystem,
    frame: FrameScheduler,
    spawns: SpawnScheduler,
    timers: Timers<WorldTimer>,
    rng: R,
    walking: bool,
    last_tick_ms: Option<u64>,
    last_cleanup_ms: u64,
}

impl<R: Rng> World<R> {
    pub fn new(config: EngineConfig, rng: R) -> Self {
        let mut actor = Actor::new();
        actor.inventory.capacity = config.inventory_capacity;
        Self::with_actor(config, actor, rng)
    }

    pub fn with_actor(config: EngineConfig, mut actor: Actor, rng: R) -> Self {
        actor.refresh_stats();
        Self {
            spatial: SpatialIndex::new(config.cell_size),
            particles: ParticleSystem::new(config.particle_capacity),
            frame: if config.target_fps == TARGET_FPS {
                FrameScheduler::new()
            } else {
                FrameScheduler::with_target_fps(config.target_fps)
            },
            spawns: SpawnScheduler::from_config(&config),
            timers: Timers::new(),
            enemies: Vec::new(),
            config,
            actor,
            rng,
            walking: false,
            last_tick_ms: None,
            last_cleanup_ms: 0,
        }
    }

    pub fn from_snapshot(config: EngineConfig, snapshot: PlayerSnapshot, rng: R) -> Self {
        Self::with_actor(config, snapshot.restore(), rng)
    }

    pub fn snapshot(&self, now_ms: u64) -> PlayerSnapshot {
        PlayerSnapshot::capture(&self.actor, now_ms)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn frame(&self) -> &FrameScheduler {
        &self.frame
    }

    pub fn spawns(&self) -> &SpawnScheduler {
        &self.spawns
    }

    /// Registers a spawn anchor. Its first instance appears on the next tick.
    pub fn add_spawn(&mut self, archetype: Archetype, position: Vec2) -> AnchorId {
        self.spawns.add_anchor(archetype, position)
    }

    /// Removes the anchor, its pending respawn, and any instance it still has.
    pub fn remove_spawn(&mut self, anchor: AnchorId) -> bool {
        let removed = self.spawns.remove_anchor(anchor);
        let owned: Vec<EntityId> = self
            .enemies
            .iter()
            .filter(|e| e.anchor == Some(anchor))
            .map(|e| e.id)
            .collect();
        for id in owned {
            self.despawn(id);
        }
        removed
    }

    /// Enemies inside the view rectangle, ordered by id.
    pub fn visible_enemies(&self, min: Vec2, max: Vec2) -> Vec<&Enemy> {
        let ids = self.spatial.query_view(min, max);
        let mut visible: Vec<&Enemy> = self
            .enemies
            .iter()
            .filter(|e| ids.contains(&e.id))
            .filter(|e| {
                e.position.x >= min.x
                    && e.position.x <= max.x
                    && e.position.y >= min.y
                    && e.position.y <= max.y
            })
            .collect();
        visible.sort_by_key(|e| e.id);
        visible
    }

    pub fn tick(
        &mut self,
        now_ms: u64,
        inputs: &[InputEvent],
        sink: &mut impl NotificationSink,
    ) -> TickReport {
        let mut report = TickReport::default();
        let dt_ms = self.last_tick_ms.map_or(0, |last| now_ms.saturating_sub(last));
        self.last_tick_ms = Some(now_ms);
        report.heavy_frame = self.frame.start_frame(now_ms as f64);

        self.spawn_due(now_ms, &mut report);
        for input in inputs {
            self.handle_input(input, now_ms, sink, &mut report);
        }
        self.walk(dt_ms);
        self.update_bosses(now_ms, &mut report);
        clear_stale_hit_flags(&mut self.enemies, now_ms);
        self.remove_due_corpses(now_ms, &mut report);
        self.particles.update(dt_ms as f32 / 1000.0);

        if report.heavy_frame
            && now_ms.saturating_sub(self.last_cleanup_ms) >= SPATIAL_CLEANUP_INTERVAL_MS
        {
            self.frame.cleanup(&mut self.spatial);
            self.last_cleanup_ms = now_ms;
        }
        report
    }

    fn handle_input(
        &mut self,
        input: &InputEvent,
        now_ms: u64,
        sink: &mut impl NotificationSink,
        report: &mut TickReport,
    ) {
        match input {
            &InputEvent::Move(direction) => {
                if !self.actor.locks.can_move() {
                    tracing::trace!("move ignored while locked");
                    return;
                }
                self.actor.set_direction(direction);
                self.walking = direction.magnitude_squared() > 0.0;
            }
            InputEvent::Stop => self.walking = false,
            InputEvent::Attack => {
                if !self.actor.is_alive() || !self.actor.locks.can_attack() {
                    tracing::trace!("attack ignored");
                    return;
                }
                self.attack(now_ms, sink, report);
            }
            InputEvent::Equip { item_id } => self.equip_from_inventory(item_id),
            InputEvent::Unequip(slot) => {
                if let Err(err) = self.actor.unequip(*slot) {
                    tracing::warn!(%err, ?slot, "unequip ignored");
                }
            }
            InputEvent::Drop { item_id } => match self.actor.inventory.take(item_id) {
                Some(item) => report.dropped.push(item),
                None => tracing::warn!(item_id = %item_id, "drop of unknown item ignored"),
            },
        }
    }

    fn equip_from_inventory(&mut self, item_id: &str) {
        let Some(item) = self.actor.inventory.take(item_id) else {
            tracing::warn!(item_id, "equip of unknown item ignored");
            return;
        };
        if let Err(err) = self.actor.equip(item.clone()) {
            tracing::warn!(%err, item_id, "equip failed");
            // a slot was just freed by the take above
            if let Err(err) = self.actor.inventory.add(item) {
                tracing::warn!(%err, item_id, "could not return item to inventory");
            }
        }
    }

    fn walk(&mut self, dt_ms: u64) {
        if !self.walking || !self.actor.locks.can_move() {
            return;
        }
        let distance = self.actor.move_speed() * dt_ms as f32 / 1000.0;
        self.actor.position += self.actor.direction * distance;
    }

    fn attack(&mut self, now_ms: u64, sink: &mut impl NotificationSink, report: &mut TickReport) {
        let sequence = advance_combo(&mut self.actor, now_ms);
        report.attack_sequence = Some(sequence);
        let hitbox = compute_hitbox(self.actor.position, self.actor.direction, sequence);

        // sorted so rolls are drawn in a stable order
        let mut ids: Vec<EntityId> = self
            .spatial
            .query_range(hitbox.position, hitbox.radius)
            .into_iter()
            .collect();
        ids.sort_unstable();
        let candidates: Vec<Enemy> = ids.iter().filter_map(|&id| self.enemy(id).cloned()).collect();

        let profile = self.actor.attack_profile();
        let outcome = resolve_hits(&hitbox, &candidates, &profile, now_ms, &mut self.rng);

        for updated in outcome.enemies {
            self.spatial.update(updated.id, updated.position);
            if let Some(slot) = self.enemies.iter_mut().find(|e| e.id == updated.id) {
                *slot = updated;
            }
        }
        for hit in &outcome.hits {
            if let Some(position) = self.enemy(hit.enemy_id).map(|e| e.position) {
                self.particles.emit_burst(
                    position,
                    HIT_SPARK_COUNT,
                    HIT_SPARK_SPEED,
                    HIT_SPARK_LIFE_SECONDS,
                    &mut self.rng,
                );
            }
            if hit.killed {
                self.on_enemy_killed(hit.enemy_id, now_ms, sink, report);
            }
        }
        report.hits.extend(outcome.hits);
    }

    fn on_enemy_killed(
        &mut self,
        id: EntityId,
        now_ms: u64,
        sink: &mut impl NotificationSink,
        report: &mut TickReport,
    ) {
        let Some(enemy) = self.enemy(id).cloned() else {
            return;
        };
        report.killed.push(id);

        let (actor, level_up) = gain_experience(&self.actor, enemy.archetype.exp_reward());
        self.actor = actor;
        if let Some(event) = level_up {
            sink.notify(Notification::LevelUp {
                level: event.level,
                display_ms: event.display_ms,
            });
            report.level_up = Some(event);
        }

        match roll_kill_loot(enemy.archetype, &mut self.rng) {
            Ok(drop) => self.grant(drop, sink),
            Err(err) => tracing::warn!(%err, enemy = id, "kill loot failed"),
        }

        if let Some(anchor) = enemy.anchor {
            self.spawns.record_death(anchor, now_ms);
        }
        self.timers.cancel_owner(id);
        self.timers
            .schedule(id, now_ms + self.config.corpse_delay_ms, WorldTimer::RemoveCorpse);
    }

    fn grant(&mut self, drop: ChestDrop, sink: &mut impl NotificationSink) {
        match drop {
            ChestDrop::Yang(amount) => {
                self.actor.yang = self.actor.yang.saturating_add(amount);
                sink.notify(Notification::YangAcquired { amount });
            }
            ChestDrop::Item(item) => {
                let notification = Notification::loot(&item);
                let name = item.display_name.clone();
                match self.actor.inventory.add(item) {
                    Ok(()) => sink.notify(notification),
                    Err(_) => sink.notify(Notification::InventoryFull { item_name: name }),
                }
            }
        }
    }

    fn update_bosses(&mut self, now_ms: u64, report: &mut TickReport) {
        let target = self.actor.position;
        let mut incoming = 0;
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            let Some(state) = enemy.boss else {
                continue;
            };
            let (next, event) = update_boss(&state, enemy.position, target, now_ms, &self.config.boss);
            enemy.boss = Some(next);
            if let Some(BossEvent::Strike { damage }) = event {
                incoming += damage;
            }
        }
        if incoming > 0 {
            report.damage_taken += self.actor.take_damage(incoming);
        }
    }

    fn remove_due_corpses(&mut self, now_ms: u64, report: &mut TickReport) {
        for (owner, timer) in self.timers.drain_due(now_ms) {
            match timer {
                WorldTimer::RemoveCorpse => {
                    self.despawn(owner);
                    report.removed.push(owner);
                }
            }
        }
    }

    fn spawn_due(&mut self, now_ms: u64, report: &mut TickReport) {
        for enemy in self.spawns.spawn_due(now_ms) {
            self.spatial.insert(enemy.id, enemy.position);
            report.spawned.push(enemy.id);
            self.enemies.push(enemy);
        }
    }

    fn despawn(&mut self, id: EntityId) {
        self.timers.cancel_owner(id);
        self.spatial.remove(id);
        self.enemies.retain(|e| e.id != id);
    }

    fn inventory_item(&self, item_id: &str) -> Result<Item, ActionError> {
        self.actor
            .inventory
            .get(item_id)
            .cloned()
            .ok_or_else(|| ActionError::UnknownItem {
                id: item_id.to_string(),
            })
    }

    /// Attempts to upgrade an inventory item, paying with the actor's yang.
    pub fn upgrade_item(
        &mut self,
        item_id: &str,
        sink: &mut impl NotificationSink,
    ) -> Result<UpgradeOutcome, ActionError> {
        let item = self.inventory_item(item_id)?;
        let outcome = match try_upgrade(&item, self.actor.yang, &mut self.actor.inventory, &mut self.rng) {
            Ok(outcome) => outcome,
            Err(err) => {
                sink.notify(Notification::UpgradeFailed {
                    item_name: item.display_name.clone(),
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        };

        self.actor.yang = outcome.remaining_currency;
        self.actor.inventory.replace(outcome.item.clone());
        if !outcome.success {
            sink.notify(Notification::UpgradeFailed {
                item_name: item.display_name,
                reason: format!("dropped to +{}", outcome.new_level),
            });
        }
        Ok(outcome)
    }

    /// Opens a new socket on an inventory item, consuming one diamond.
    pub fn add_socket_to(&mut self, item_id: &str) -> Result<Item, ActionError> {
        let item = self.inventory_item(item_id)?;
        if self.actor.inventory.count(DIAMOND_ID) == 0 {
            return Err(ActionError::NoDiamond);
        }
        let updated = add_socket(&item)?;
        self.actor
            .inventory
            .remove(DIAMOND_ID, 1)
            .map_err(|_| ActionError::NoDiamond)?;
        self.actor.inventory.replace(updated.clone());
        Ok(updated)
    }

    pub fn insert_gem_into(
        &mut self,
        item_id: &str,
        socket_index: usize,
        gem: GemKind,
    ) -> Result<Item, ActionError> {
        let item = self.inventory_item(item_id)?;
        let updated = insert_gem(&item, socket_index, gem, &mut self.actor.inventory)?;
        self.actor.inventory.replace(updated.clone());
        Ok(updated)
    }

    pub fn add_bonus_to(&mut self, item_id: &str) -> Result<Item, ActionError> {
        let item = self.inventory_item(item_id)?;
        let updated = add_random_bonus(&item, &mut self.rng)?;
        self.actor.inventory.replace(updated.clone());
        Ok(updated)
    }

    /// Rerolls every affix on an inventory item, keeping the count.
    pub fn reroll_bonuses_of(&mut self, item_id: &str) -> Result<Item, ActionError> {
        let item = self.inventory_item(item_id)?;
        let updated = reroll_all_bonuses(&item, &mut self.rng)?;
        self.actor.inventory.replace(updated.clone());
        Ok(updated)
    }

    /// Opens a chest item from the inventory and grants its contents.
    pub fn open_chest_item(
        &mut self,
        chest_id: &str,
        sink: &mut impl NotificationSink,
    ) -> Result<ChestDrop, ActionError> {
        let drop = open_from_inventory(&mut self.actor.inventory, chest_id, &mut self.rng)?;
        self.grant(drop.clone(), sink);
        Ok(drop)
    }
}
