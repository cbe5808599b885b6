//! Uniform grid bucket index for range queries and view culling.
//!
//! Queries return every id whose bucket overlaps the query area, so results
//! are a superset of the exact answer. Callers re-check distances.

use crate::core::Vec2;
use std::collections::{HashMap, HashSet};

pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f32,
    cells: HashMap<CellKey, HashSet<EntityId>>,
    positions: HashMap<EntityId, CellKey>,
}

impl SpatialIndex {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    pub fn cell_key(&self, pos: Vec2) -> CellKey {
        CellKey {
            x: (pos.x / self.cell_size).floor() as i32,
            y: (pos.y / self.cell_size).floor() as i32,
        }
    }

    /// Inserts `id`, or moves it if already indexed.
    pub fn insert(&mut self, id: EntityId, pos: Vec2) {
        self.update(id, pos);
    }

    /// Moves `id` to the bucket of `pos`. Writes only when the bucket changes.
    pub fn update(&mut self, id: EntityId, pos: Vec2) {
        let key = self.cell_key(pos);
        match self.positions.get(&id).copied() {
            Some(old) if old == key => {}
            Some(old) => {
                if let Some(cell) = self.cells.get_mut(&old) {
                    cell.remove(&id);
                }
                self.cells.entry(key).or_default().insert(id);
                self.positions.insert(id, key);
            }
            None => {
                self.cells.entry(key).or_default().insert(id);
                self.positions.insert(id, key);
            }
        }
    }

    /// Unknown ids are ignored. The emptied bucket stays until `cleanup`.
    pub fn remove(&mut self, id: EntityId) {
        if let Some(key) = self.positions.remove(&id) {
            if let Some(cell) = self.cells.get_mut(&key) {
                cell.remove(&id);
            }
        }
    }

    pub fn query_range(&self, pos: Vec2, radius: f32) -> HashSet<EntityId> {
        let radius = radius.max(0.0);
        self.query_view(
            Vec2::new(pos.x - radius, pos.y - radius),
            Vec2::new(pos.x + radius, pos.y + radius),
        )
    }

    /// All ids in buckets overlapping the rectangle `[min, max]`.
    pub fn query_view(&self, min: Vec2, max: Vec2) -> HashSet<EntityId> {
        let lo = self.cell_key(min);
        let hi = self.cell_key(max);
        let mut found = HashSet::new();
        if lo.x > hi.x || lo.y > hi.y {
            return found;
        }

        // Sparse worlds: walking the occupied buckets beats walking a huge rect.
        let span = (hi.x as i64 - lo.x as i64 + 1).saturating_mul(hi.y as i64 - lo.y as i64 + 1);
        if span > self.cells.len() as i64 {
            for (key, ids) in &self.cells {
                if key.x >= lo.x && key.x <= hi.x && key.y >= lo.y && key.y <= hi.y {
                    found.extend(ids.iter().copied());
                }
            }
            return found;
        }

        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                if let Some(ids) = self.cells.get(&CellKey { x, y }) {
                    found.extend(ids.iter().copied());
                }
            }
        }
        found
    }

    /// Drops empty buckets.
    pub fn cleanup(&mut self) {
        self.cells.retain(|_, ids| !ids.is_empty());
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn cell_of(&self, id: EntityId) -> Option<CellKey> {
        self.positions.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SpatialIndex {
        SpatialIndex::new(100.0)
    }

    #[test]
    fn test_cell_key_floors_negative_coordinates() {
        let idx = index();
        assert_eq!(idx.cell_key(Vec2::new(-1.0, 250.0)), CellKey { x: -1, y: 2 });
        assert_eq!(idx.cell_key(Vec2::new(99.9, 0.0)), CellKey { x: 0, y: 0 });
    }

    #[test]
    fn test_query_range_finds_nearby() {
        let mut idx = index();
        idx.insert(1, Vec2::new(50.0, 50.0));
        idx.insert(2, Vec2::new(150.0, 50.0));
        idx.insert(3, Vec2::new(950.0, 950.0));

        let found = idx.query_range(Vec2::new(60.0, 60.0), 60.0);
        assert!(found.contains(&1));
        assert!(found.contains(&2));
        assert!(!found.contains(&3));
    }

    #[test]
    fn test_huge_radius_covers_whole_index() {
        let mut idx = index();
        idx.insert(1, Vec2::new(-5.0e9, 3.0e9));
        idx.insert(2, Vec2::new(10.0, 10.0));
        let found = idx.query_range(Vec2::zero(), 1.0e12);
        assert_eq!(found.len(), 2);
        assert_eq!(idx.query_range(Vec2::zero(), f32::INFINITY).len(), 2);
    }

    #[test]
    fn test_update_moves_between_cells() {
        let mut idx = index();
        idx.insert(1, Vec2::new(10.0, 10.0));
        idx.update(1, Vec2::new(510.0, 10.0));

        assert_eq!(idx.cell_of(1), Some(CellKey { x: 5, y: 0 }));
        assert!(!idx.query_range(Vec2::new(10.0, 10.0), 20.0).contains(&1));
        assert!(idx.query_range(Vec2::new(510.0, 10.0), 20.0).contains(&1));
    }

    #[test]
    fn test_update_within_cell_keeps_single_bucket() {
        let mut idx = index();
        idx.insert(1, Vec2::new(10.0, 10.0));
        idx.update(1, Vec2::new(20.0, 30.0));
        assert_eq!(idx.bucket_count(), 1);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn test_entity_in_exactly_one_bucket() {
        let mut idx = index();
        idx.insert(1, Vec2::new(10.0, 10.0));
        for step in 0..20 {
            idx.update(1, Vec2::new(step as f32 * 73.0, step as f32 * 41.0));
        }
        let everywhere = idx.query_view(Vec2::new(-10_000.0, -10_000.0), Vec2::new(10_000.0, 10_000.0));
        assert_eq!(everywhere.len(), 1);
        let occupied = idx.cells.values().filter(|ids| ids.contains(&1)).count();
        assert_eq!(occupied, 1);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut idx = index();
        idx.remove(42);
        assert!(idx.is_empty());
        assert_eq!(idx.cell_of(42), None);
    }

    #[test]
    fn test_cleanup_drops_empty_buckets() {
        let mut idx = index();
        idx.insert(1, Vec2::new(10.0, 10.0));
        idx.insert(2, Vec2::new(310.0, 10.0));
        idx.remove(1);
        assert_eq!(idx.bucket_count(), 2);
        idx.cleanup();
        assert_eq!(idx.bucket_count(), 1);
        assert!(idx.contains(2));
    }

    #[test]
    fn test_query_view_culls_outside_rect() {
        let mut idx = index();
        idx.insert(1, Vec2::new(100.0, 100.0));
        idx.insert(2, Vec2::new(2000.0, 100.0));
        let visible = idx.query_view(Vec2::new(0.0, 0.0), Vec2::new(800.0, 600.0));
        assert!(visible.contains(&1));
        assert!(!visible.contains(&2));
    }
}
