//! Fixed-capacity pool of reusable records.
//!
//! `acquire` never grows the pool: when every slot is busy the request is
//! dropped and `None` is returned. This is the intended backpressure for
//! fire-and-forget work like decorative particles. Callers that must not lose
//! the allocation use `acquire_or_fresh`.

/// Records stored in an [`ObjectPool`] must be resettable to a blank state.
pub trait Poolable: Default {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(usize);

impl PoolHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An allocation that either lives in the pool or was created outside it.
#[derive(Debug)]
pub enum Lease<T> {
    Pooled(PoolHandle),
    Fresh(T),
}

#[derive(Debug, Clone)]
struct Slot<T> {
    active: bool,
    value: T,
}

#[derive(Debug, Clone)]
pub struct ObjectPool<T: Poolable> {
    slots: Vec<Slot<T>>,
    cursor: usize,
    active: usize,
    dropped: u64,
}

impl<T: Poolable> ObjectPool<T> {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                active: false,
                value: T::default(),
            })
            .collect();
        Self {
            slots,
            cursor: 0,
            active: 0,
            dropped: 0,
        }
    }

    /// Claims the next inactive slot, scanning ring-wise from the last claim.
    pub fn acquire(&mut self) -> Option<PoolHandle> {
        let capacity = self.slots.len();
        for offset in 0..capacity {
            let index = (self.cursor + offset) % capacity;
            let slot = &mut self.slots[index];
            if !slot.active {
                slot.active = true;
                self.active += 1;
                self.cursor = (index + 1) % capacity;
                return Some(PoolHandle(index));
            }
        }
        self.dropped += 1;
        None
    }

    pub fn acquire_or_fresh(&mut self) -> Lease<T> {
        match self.acquire() {
            Some(handle) => Lease::Pooled(handle),
            None => Lease::Fresh(T::default()),
        }
    }

    /// Resets and frees the slot. Stale or foreign handles are ignored.
    pub fn release(&mut self, handle: PoolHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            if slot.active {
                slot.value.reset();
                slot.active = false;
                self.active -= 1;
            }
        }
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots
            .get(handle.0)
            .filter(|slot| slot.active)
            .map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0)
            .filter(|slot| slot.active)
            .map(|slot| &mut slot.value)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(i, slot)| (PoolHandle(i), &slot.value))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(i, slot)| (PoolHandle(i), &mut slot.value))
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.active == self.slots.len()
    }

    /// Requests refused because the pool was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }
}
