//! Owner-keyed timer queue.
//!
//! Every scheduled callback belongs to an owner (usually an entity id) so that
//! removing the owner can cancel everything it still has pending.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    owner: u32,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct Timers<T> {
    next_id: u64,
    // (fire_at, id) keeps same-instant timers in scheduling order
    queue: BTreeMap<(u64, TimerId), Pending<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            queue: BTreeMap::new(),
        }
    }

    pub fn schedule(&mut self, owner: u32, fire_at_ms: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((fire_at_ms, id), Pending { owner, payload });
        id
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.queue.keys().find(|(_, tid)| *tid == id).copied();
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancels every pending timer of `owner`, returning how many were dropped.
    pub fn cancel_owner(&mut self, owner: u32) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, pending| pending.owner != owner);
        before - self.queue.len()
    }

    /// Removes and returns all timers due at or before `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<(u32, T)> {
        let later = self.queue.split_off(&(now_ms.saturating_add(1), TimerId(0)));
        let due = std::mem::replace(&mut self.queue, later);
        due.into_values()
            .map(|pending| (pending.owner, pending.payload))
            .collect()
    }

    pub fn pending_for(&self, owner: u32) -> usize {
        self.queue.values().filter(|p| p.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_due_in_order() {
        let mut timers = Timers::new();
        timers.schedule(1, 300, "c");
        timers.schedule(2, 100, "a");
        timers.schedule(3, 200, "b");

        let due = timers.drain_due(200);
        assert_eq!(due, vec![(2, "a"), (3, "b")]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_drain_includes_exact_instant() {
        let mut timers = Timers::new();
        timers.schedule(1, 500, ());
        assert!(timers.drain_due(499).is_empty());
        assert_eq!(timers.drain_due(500).len(), 1);
    }

    #[test]
    fn test_cancel_owner_drops_only_that_owner() {
        let mut timers = Timers::new();
        timers.schedule(7, 100, 1);
        timers.schedule(7, 200, 2);
        timers.schedule(8, 150, 3);

        assert_eq!(timers.cancel_owner(7), 2);
        assert_eq!(timers.pending_for(7), 0);
        assert_eq!(timers.drain_due(1000), vec![(8, 3)]);
    }

    #[test]
    fn test_cancel_single_timer() {
        let mut timers = Timers::new();
        let id = timers.schedule(1, 100, ());
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.is_empty());
    }
}
