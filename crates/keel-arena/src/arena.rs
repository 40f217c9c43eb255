//! The generation-indexed [`Arena<T>`] container.
//!
//! Slots are recycled through a LIFO free list; every occupied→free
//! transition bumps the slot's generation, so a [`Handle`] issued before
//! an erase can never resolve to the slot's next occupant.

use crate::error::ArenaError;
use crate::handle::{Handle, FIRST_GENERATION};

/// A growable, slot-reusing container mapping [`Handle`] → owned `T`.
///
/// # Invariants
///
/// - `slots.len() == generations.len()`.
/// - A slot's generation strictly increases each time it transitions
///   from occupied to free.
/// - The free list holds only indices of vacant slots, each at most once.
///
/// # Examples
///
/// ```
/// use keel_arena::Arena;
///
/// let mut arena = Arena::new();
/// let a = arena.add("window-0").unwrap();
/// let b = arena.add("window-1").unwrap();
///
/// assert_eq!(arena.get(a), Ok(&"window-0"));
/// assert_eq!(arena.erase(b), Ok("window-1"));
/// assert!(!arena.contains(b));
///
/// // The freed slot is reused under a new generation.
/// let c = arena.add("window-2").unwrap();
/// assert_eq!(c.index(), b.index());
/// assert_ne!(c, b);
/// ```
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u64>,
    free: Vec<usize>,
    capacity: Option<usize>,
    live: usize,
}

impl<T> Arena<T> {
    /// Create an empty, growable arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free: Vec::new(),
            capacity: None,
            live: 0,
        }
    }

    /// Create a growable arena pre-sized with `count` vacant slots.
    ///
    /// Pre-sized slots start at [`FIRST_GENERATION`] and are handed out
    /// lowest-index first. Growth past `count` still appends new slots.
    pub fn with_slots(count: usize) -> Self {
        Self {
            slots: (0..count).map(|_| None).collect(),
            generations: vec![FIRST_GENERATION; count],
            // LIFO free list: reversed so index 0 is popped first.
            free: (0..count).rev().collect(),
            capacity: None,
            live: 0,
        }
    }

    /// Create an empty arena that refuses to grow past `capacity` slots.
    ///
    /// [`add`](Arena::add) beyond the limit returns
    /// [`ArenaError::CapacityExceeded`].
    pub fn bounded(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity: Some(capacity),
            live: 0,
        }
    }

    /// Insert a value, returning its handle.
    ///
    /// O(1) amortized: reuses the most-recently-freed slot if one exists
    /// (its generation was already bumped by the erase), else appends a
    /// fresh slot at [`FIRST_GENERATION`].
    pub fn add(&mut self, value: T) -> Result<Handle, ArenaError> {
        if let Some(index) = self.free.pop() {
            debug_assert!(self.slots[index].is_none());
            self.slots[index] = Some(value);
            self.live += 1;
            return Ok(Handle::from_parts(index, self.generations[index]));
        }

        if let Some(capacity) = self.capacity {
            if self.slots.len() >= capacity {
                return Err(ArenaError::CapacityExceeded { capacity });
            }
        }

        let index = self.slots.len();
        self.slots.push(Some(value));
        self.generations.push(FIRST_GENERATION);
        self.live += 1;
        Ok(Handle::from_parts(index, FIRST_GENERATION))
    }

    /// Remove the value behind `handle`, returning ownership.
    ///
    /// The slot's generation is bumped and its index pushed onto the
    /// free list, so `handle` (and any copy of it) is stale afterwards.
    pub fn erase(&mut self, handle: Handle) -> Result<T, ArenaError> {
        let index = self.check(handle)?;
        // check() guarantees the slot is occupied.
        let value = self.slots[index].take().ok_or(ArenaError::VacantSlot { index })?;
        self.generations[index] += 1;
        self.free.push(index);
        self.live -= 1;
        Ok(value)
    }

    /// Borrow the value behind `handle`.
    pub fn get(&self, handle: Handle) -> Result<&T, ArenaError> {
        let index = self.check(handle)?;
        self.slots[index]
            .as_ref()
            .ok_or(ArenaError::VacantSlot { index })
    }

    /// Mutably borrow the value behind `handle`.
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut T, ArenaError> {
        let index = self.check(handle)?;
        self.slots[index]
            .as_mut()
            .ok_or(ArenaError::VacantSlot { index })
    }

    /// Replace the value behind `handle`, returning the old value.
    ///
    /// The generation is unchanged: `handle` still refers to the new
    /// occupant, which took the old one's identity.
    pub fn set(&mut self, handle: Handle, value: T) -> Result<T, ArenaError> {
        let slot = self.get_mut(handle)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Whether `handle` currently resolves to a live value.
    ///
    /// Never errors; this is the one query that is safe to call with a
    /// possibly-stale handle.
    pub fn contains(&self, handle: Handle) -> bool {
        handle.is_valid()
            && handle.index() < self.slots.len()
            && self.generations[handle.index()] == handle.generation()
            && self.slots[handle.index()].is_some()
    }

    /// The current generation of the slot at `index`, or `None` if the
    /// index is out of range.
    ///
    /// Used by callers that keep a bare index and need to rebuild a
    /// fresh [`Handle`] via [`Handle::from_parts`].
    pub fn generation_of(&self, index: usize) -> Option<u64> {
        self.generations.get(index).copied()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the arena holds no live values.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total number of slots, vacant ones included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The fixed capacity, or `None` for a growable arena.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Iterate over live `(Handle, &T)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .map(|v| (Handle::from_parts(i, self.generations[i]), v))
        })
    }

    /// Iterate over live `(Handle, &mut T)` pairs in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        let generations = &self.generations;
        self.slots.iter_mut().enumerate().filter_map(move |(i, slot)| {
            slot.as_mut()
                .map(|v| (Handle::from_parts(i, generations[i]), v))
        })
    }

    /// Drop every value and forget all slots.
    ///
    /// All outstanding handles become stale (they fail the range check).
    pub fn clear(&mut self) {
        self.slots.clear();
        self.generations.clear();
        self.free.clear();
        self.live = 0;
    }

    /// Validate `handle` against the current slot state, returning its
    /// index on success.
    fn check(&self, handle: Handle) -> Result<usize, ArenaError> {
        if !handle.is_valid() {
            return Err(ArenaError::InvalidHandle);
        }
        let index = handle.index();
        if index >= self.slots.len() {
            return Err(ArenaError::IndexOutOfRange {
                index,
                slot_count: self.slots.len(),
            });
        }
        let current = self.generations[index];
        if current != handle.generation() {
            return Err(ArenaError::StaleHandle {
                handle,
                current_generation: current,
            });
        }
        if self.slots[index].is_none() {
            return Err(ArenaError::VacantSlot { index });
        }
        Ok(index)
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut arena = Arena::new();
        let h = arena.add(42).unwrap();
        assert_eq!(arena.get(h), Ok(&42));
    }

    #[test]
    fn fresh_slots_start_at_generation_one() {
        let mut arena = Arena::new();
        let a = arena.add('a').unwrap();
        let b = arena.add('b').unwrap();
        let c = arena.add('c').unwrap();
        assert_eq!((a.index(), a.generation()), (0, 1));
        assert_eq!((b.index(), b.generation()), (1, 1));
        assert_eq!((c.index(), c.generation()), (2, 1));
    }

    #[test]
    fn erase_returns_ownership_and_stales_handle() {
        let mut arena = Arena::new();
        let h = arena.add(String::from("camera")).unwrap();
        let value = arena.erase(h).unwrap();
        assert_eq!(value, "camera");
        assert!(!arena.contains(h));
        assert_eq!(
            arena.erase(h),
            Err(ArenaError::StaleHandle {
                handle: h,
                current_generation: 2
            })
        );
    }

    #[test]
    fn reuse_bumps_generation() {
        // Erase index 1, re-add, observe the recycled index under a
        // strictly greater generation.
        let mut arena = Arena::new();
        let _a = arena.add(0).unwrap();
        let b = arena.add(1).unwrap();
        let _c = arena.add(2).unwrap();

        arena.erase(b).unwrap();
        assert_eq!(arena.generation_of(1), Some(2));

        let b2 = arena.add(10).unwrap();
        assert_eq!(b2.index(), 1);
        assert_eq!(b2.generation(), 2);
        assert_ne!(b2, b);
        assert!(!arena.contains(b));
        assert!(arena.contains(b2));
    }

    #[test]
    fn free_list_is_lifo() {
        let mut arena = Arena::new();
        let a = arena.add('a').unwrap();
        let b = arena.add('b').unwrap();
        arena.erase(a).unwrap();
        arena.erase(b).unwrap();
        // b was freed last, so its index is reused first.
        let c = arena.add('c').unwrap();
        assert_eq!(c.index(), b.index());
    }

    #[test]
    fn with_slots_reuses_lowest_index_first() {
        let mut arena = Arena::with_slots(3);
        assert_eq!(arena.slot_count(), 3);
        assert!(arena.is_empty());
        let h = arena.add('x').unwrap();
        assert_eq!(h.index(), 0);
        assert_eq!(h.generation(), FIRST_GENERATION);
    }

    #[test]
    fn with_slots_grows_past_presize() {
        let mut arena = Arena::with_slots(1);
        let _ = arena.add(1).unwrap();
        let h = arena.add(2).unwrap();
        assert_eq!(h.index(), 1);
        assert_eq!(arena.slot_count(), 2);
    }

    #[test]
    fn bounded_rejects_past_capacity() {
        let mut arena = Arena::bounded(2);
        let a = arena.add(1).unwrap();
        let _b = arena.add(2).unwrap();
        assert_eq!(
            arena.add(3),
            Err(ArenaError::CapacityExceeded { capacity: 2 })
        );
        // Freeing a slot makes room again.
        arena.erase(a).unwrap();
        assert!(arena.add(3).is_ok());
    }

    #[test]
    fn set_replaces_in_place() {
        let mut arena = Arena::new();
        let h = arena.add(1).unwrap();
        assert_eq!(arena.set(h, 2), Ok(1));
        assert_eq!(arena.get(h), Ok(&2));
        // Identity (handle) unchanged.
        assert!(arena.contains(h));
    }

    #[test]
    fn sentinel_handle_rejected() {
        let arena: Arena<u8> = Arena::new();
        assert_eq!(arena.get(Handle::INVALID), Err(ArenaError::InvalidHandle));
        assert!(!arena.contains(Handle::INVALID));
    }

    #[test]
    fn out_of_range_rejected() {
        let arena: Arena<u8> = Arena::new();
        let forged = Handle::from_parts(5, 1);
        assert_eq!(
            arena.get(forged),
            Err(ArenaError::IndexOutOfRange {
                index: 5,
                slot_count: 0
            })
        );
    }

    #[test]
    fn vacant_presized_slot_rejected() {
        let arena: Arena<u8> = Arena::with_slots(2);
        // Generation matches (FIRST_GENERATION) but nothing occupies it.
        let forged = Handle::from_parts(1, FIRST_GENERATION);
        assert_eq!(arena.get(forged), Err(ArenaError::VacantSlot { index: 1 }));
        assert!(!arena.contains(forged));
    }

    #[test]
    fn generation_of_out_of_range() {
        let arena: Arena<u8> = Arena::with_slots(1);
        assert_eq!(arena.generation_of(0), Some(FIRST_GENERATION));
        assert_eq!(arena.generation_of(1), None);
    }

    #[test]
    fn rebuild_handle_from_parts() {
        let mut arena = Arena::new();
        let h = arena.add(7).unwrap();
        let rebuilt = Handle::from_parts(h.index(), arena.generation_of(h.index()).unwrap());
        assert_eq!(rebuilt, h);
        assert_eq!(arena.get(rebuilt), Ok(&7));
    }

    #[test]
    fn iter_visits_live_values_only() {
        let mut arena = Arena::new();
        let a = arena.add(1).unwrap();
        let b = arena.add(2).unwrap();
        let _c = arena.add(3).unwrap();
        arena.erase(b).unwrap();

        let collected: Vec<_> = arena.iter().map(|(h, v)| (h.index(), *v)).collect();
        assert_eq!(collected, vec![(0, 1), (2, 3)]);
        assert_eq!(arena.len(), 2);

        for (h, v) in arena.iter_mut() {
            assert!(h.is_valid());
            *v += 10;
        }
        assert_eq!(arena.get(a), Ok(&11));
    }

    #[test]
    fn clear_drops_everything() {
        let mut arena = Arena::new();
        let h = arena.add(1).unwrap();
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.slot_count(), 0);
        assert!(matches!(
            arena.get(h),
            Err(ArenaError::IndexOutOfRange { .. })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Add(u32),
            EraseLive(usize),
            EraseStale(usize),
        }

        fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
            prop::collection::vec(
                prop_oneof![
                    (0u32..1000).prop_map(Op::Add),
                    (0usize..64).prop_map(Op::EraseLive),
                    (0usize..64).prop_map(Op::EraseStale),
                ],
                0..128,
            )
        }

        proptest! {
            /// Random add/erase interleavings never break the arena
            /// invariants: stale handles are rejected, live handles
            /// resolve to the value that was added, and each slot's
            /// issued generations strictly increase.
            #[test]
            fn invariants_hold_under_churn(ops in arb_ops()) {
                let mut arena = Arena::new();
                let mut live: Vec<(Handle, u32)> = Vec::new();
                let mut stale: Vec<Handle> = Vec::new();
                let mut last_gen: std::collections::HashMap<usize, u64> =
                    std::collections::HashMap::new();

                for op in ops {
                    match op {
                        Op::Add(v) => {
                            let h = arena.add(v).unwrap();
                            if let Some(prev) = last_gen.insert(h.index(), h.generation()) {
                                prop_assert!(
                                    h.generation() > prev,
                                    "generation must strictly increase on reuse"
                                );
                            }
                            live.push((h, v));
                        }
                        Op::EraseLive(i) => {
                            if live.is_empty() { continue; }
                            let (h, v) = live.remove(i % live.len());
                            prop_assert_eq!(arena.erase(h), Ok(v));
                            stale.push(h);
                        }
                        Op::EraseStale(i) => {
                            if stale.is_empty() { continue; }
                            let h = stale[i % stale.len()];
                            prop_assert!(arena.erase(h).is_err());
                        }
                    }
                }

                prop_assert_eq!(arena.len(), live.len());
                for (h, v) in &live {
                    prop_assert!(arena.contains(*h));
                    prop_assert_eq!(arena.get(*h), Ok(v));
                }
                for h in &stale {
                    prop_assert!(!arena.contains(*h));
                }
            }
        }
    }
}
