//! Spawn anchors and timed respawns.
//!
//! An anchor is active while it has never died, or once the respawn window
//! has passed since its last death. The set of active anchors is cached and
//! recomputed at most once per refresh interval, plus whenever a death is
//! recorded or the earliest pending respawn comes due, so a query never sees
//! an anchor that should already be back as inactive.

use crate::combat::types::{Archetype, Enemy};
use crate::core::config::EngineConfig;
use crate::core::Vec2;
use crate::spatial::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type AnchorId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnAnchor {
    pub id: AnchorId,
    pub archetype: Archetype,
    pub position: Vec2,
    pub death_time: Option<u64>,
}

pub fn create_stone(
    id: EntityId,
    archetype: Archetype,
    position: Vec2,
    anchor: AnchorId,
) -> Enemy {
    let mut enemy = Enemy::new(id, archetype, position);
    enemy.anchor = Some(anchor);
    enemy
}

pub fn create_boss(id: EntityId, position: Vec2, anchor: AnchorId) -> Enemy {
    create_stone(id, Archetype::Boss, position, anchor)
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    anchors: BTreeMap<AnchorId, SpawnAnchor>,
    /// Anchors whose instance is currently alive in the world.
    occupied: BTreeSet<AnchorId>,
    respawn_window_ms: u64,
    refresh_ms: u64,
    cache: Vec<AnchorId>,
    cached_at: Option<u64>,
    next_respawn_at: Option<u64>,
    next_anchor_id: AnchorId,
    next_entity_id: EntityId,
}

impl SpawnScheduler {
    pub fn new(respawn_window_ms: u64, refresh_ms: u64) -> Self {
        Self {
            anchors: BTreeMap::new(),
            occupied: BTreeSet::new(),
            respawn_window_ms,
            refresh_ms,
            cache: Vec::new(),
            cached_at: None,
            next_respawn_at: None,
            next_anchor_id: 1,
            next_entity_id: 1,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.respawn_window_ms, config.cache_refresh_ms)
    }

    pub fn add_anchor(&mut self, archetype: Archetype, position: Vec2) -> AnchorId {
        let id = self.next_anchor_id;
        self.next_anchor_id += 1;
        self.anchors.insert(
            id,
            SpawnAnchor {
                id,
                archetype,
                position,
                death_time: None,
            },
        );
        self.invalidate();
        id
    }

    /// Forgets the anchor and any respawn it had pending.
    pub fn remove_anchor(&mut self, anchor: AnchorId) -> bool {
        let removed = self.anchors.remove(&anchor).is_some();
        self.occupied.remove(&anchor);
        if removed {
            self.invalidate();
        }
        removed
    }

    pub fn anchor(&self, anchor: AnchorId) -> Option<&SpawnAnchor> {
        self.anchors.get(&anchor)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn record_death(&mut self, anchor: AnchorId, now_ms: u64) {
        let Some(entry) = self.anchors.get_mut(&anchor) else {
            tracing::warn!(anchor, "death recorded for unknown anchor");
            return;
        };
        entry.death_time = Some(now_ms);
        self.occupied.remove(&anchor);
        self.invalidate();
    }

    /// Uncached check.
    pub fn is_active(&self, anchor: AnchorId, now_ms: u64) -> bool {
        self.anchors
            .get(&anchor)
            .is_some_and(|a| self.anchor_active(a, now_ms))
    }

    fn anchor_active(&self, anchor: &SpawnAnchor, now_ms: u64) -> bool {
        anchor
            .death_time
            .map_or(true, |died| now_ms.saturating_sub(died) >= self.respawn_window_ms)
    }

    fn invalidate(&mut self) {
        self.cached_at = None;
    }

    fn needs_refresh(&self, now_ms: u64) -> bool {
        let Some(at) = self.cached_at else {
            return true;
        };
        now_ms < at
            || now_ms - at >= self.refresh_ms
            || self.next_respawn_at.is_some_and(|due| now_ms >= due)
    }

    fn refresh(&mut self, now_ms: u64) {
        self.cache = self
            .anchors
            .values()
            .filter(|a| self.anchor_active(a, now_ms))
            .map(|a| a.id)
            .collect();
        self.next_respawn_at = self
            .anchors
            .values()
            .filter_map(|a| a.death_time.map(|died| died + self.respawn_window_ms))
            .filter(|&due| due > now_ms)
            .min();
        self.cached_at = Some(now_ms);
    }

    /// Active anchor ids in ascending order.
    pub fn active_anchors(&mut self, now_ms: u64) -> &[AnchorId] {
        if self.needs_refresh(now_ms) {
            self.refresh(now_ms);
        }
        &self.cache
    }

    /// Fresh full-health instances for every active anchor without a live one.
    pub fn spawn_due(&mut self, now_ms: u64) -> Vec<Enemy> {
        let active = self.active_anchors(now_ms).to_vec();
        let due: Vec<AnchorId> = active
            .into_iter()
            .filter(|id| !self.occupied.contains(id))
            .collect();

        let mut spawned = Vec::with_capacity(due.len());
        for anchor_id in due {
            let Some(anchor) = self.anchors.get(&anchor_id) else {
                continue;
            };
            let entity_id = self.next_entity_id;
            self.next_entity_id += 1;
            let enemy = match anchor.archetype {
                Archetype::Boss => create_boss(entity_id, anchor.position, anchor_id),
                archetype => create_stone(entity_id, archetype, anchor.position, anchor_id),
            };
            tracing::debug!(
                anchor = anchor_id,
                enemy = entity_id,
                archetype = ?anchor.archetype,
                "spawned"
            );
            self.occupied.insert(anchor_id);
            spawned.push(enemy);
        }
        spawned
    }
}
