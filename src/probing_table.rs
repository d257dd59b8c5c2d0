//! ProbingTable: open-addressing integer set with linear probing.

use crate::error::CapacityError;
use crate::growth::Growth;
use crate::rehash::RehashFlag;
use crate::slot::Slot;
use core::fmt;
use core::hash::BuildHasher;
use core::mem;
use hashbrown::hash_map::DefaultHashBuilder;
use tracing::{debug, trace};

/// Load factor at which an insert triggers a resize.
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// Open-addressing set of `i64` keys with linear probing and tombstone
/// deletion. Grows once half full.
pub struct ProbingTable<S = DefaultHashBuilder> {
    hasher: S,
    slots: Vec<Slot>,
    size: usize,
    growth: Growth,
    rehashing: RehashFlag,
}

impl ProbingTable {
    /// Create a table with `capacity` empty slots and the default hasher.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        Self::with_hasher(capacity, Default::default())
    }

    /// Create a table with the default hasher and the given growth policy.
    pub fn with_growth(capacity: usize, growth: Growth) -> Result<Self, CapacityError> {
        Self::with_growth_and_hasher(capacity, growth, Default::default())
    }
}

/// Iterator over the keys stored in a `ProbingTable`, in slot order.
pub struct Iter<'a> {
    it: core::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = i64;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.by_ref().find_map(Slot::key)
    }
}

impl<S> ProbingTable<S>
where
    S: BuildHasher,
{
    /// Create a table that hashes keys with `hasher`.
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self, CapacityError> {
        Self::with_growth_and_hasher(capacity, Growth::default(), hasher)
    }

    /// Create a table with an explicit growth policy and hasher. Fails if
    /// `capacity` is zero.
    pub fn with_growth_and_hasher(
        capacity: usize,
        growth: Growth,
        hasher: S,
    ) -> Result<Self, CapacityError> {
        if capacity < 1 {
            return Err(CapacityError::InvalidCapacity);
        }
        Ok(Self {
            hasher,
            slots: vec![Slot::Empty; capacity],
            size: 0,
            growth,
            rehashing: RehashFlag::new(),
        })
    }

    /// Hash of `key` under this table's hasher. Stable for the lifetime of
    /// the table.
    pub fn hash(&self, key: i64) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Candidate slot indices for `key`, starting at its ideal position and
    /// wrapping once around the array.
    fn probe(&self, key: i64) -> impl Iterator<Item = usize> {
        let cap = self.slots.len();
        let start = (self.hash(key) % cap as u64) as usize;
        (0..cap).map(move |i| (start + i) % cap)
    }

    /// Index of the slot holding `key`. An `Empty` slot ends the search;
    /// tombstones do not.
    fn find_key(&self, key: i64) -> Option<usize> {
        for idx in self.probe(key) {
            match self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied(k) if k == key => return Some(idx),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
        }
        None
    }

    /// First `Empty` or `Tombstone` slot on the probe path of `key`.
    fn find_free(&self, key: i64) -> Option<usize> {
        self.probe(key).find(|&idx| !self.slots[idx].is_occupied())
    }

    /// Whether `key` is stored.
    pub fn contains(&self, key: i64) -> bool {
        self.find_key(key).is_some()
    }

    /// Insert `key`. Inserting a key that is already present does nothing.
    pub fn insert(&mut self, key: i64) {
        if self.contains(key) {
            return;
        }

        let idx = match self.find_free(key) {
            Some(idx) => idx,
            None => {
                trace!(key, capacity = self.capacity(), "no free slot, growing");
                self.resize();
                let Some(idx) = self.find_free(key) else {
                    panic!(
                        "probing table has no free slot after resize (capacity {}, size {})",
                        self.capacity(),
                        self.size
                    );
                };
                idx
            }
        };

        self.slots[idx] = Slot::Occupied(key);
        self.size += 1;

        if !self.rehashing.is_active() && self.load_factor() >= MAX_LOAD_FACTOR {
            self.resize();
        }
    }

    /// Remove `key`, leaving a tombstone in its slot. Returns whether the key
    /// was present.
    pub fn remove(&mut self, key: i64) -> bool {
        match self.find_key(key) {
            Some(idx) => {
                self.slots[idx] = Slot::Tombstone;
                self.size -= 1;
                true
            }
            None => false,
        }
    }

    /// Grow the slot array per the growth policy and reinsert every live key.
    /// Tombstones are dropped in the process.
    pub fn resize(&mut self) {
        let new_cap = self.growth.next_capacity(self.capacity());
        debug!(
            from = self.capacity(),
            to = new_cap,
            live = self.size,
            tombstones = self.tombstones(),
            "resizing probing table"
        );

        let old = mem::replace(&mut self.slots, vec![Slot::Empty; new_cap]);
        let _g = self.rehashing.enter();
        self.size = 0;
        for key in old.iter().filter_map(Slot::key) {
            self.insert(key);
        }
    }
}

impl<S> ProbingTable<S> {
    /// Number of stored keys.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Same as [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// `size / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Number of slots currently holding a tombstone.
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|s| s.is_tombstone()).count()
    }

    /// Growth policy applied on resize.
    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Every slot with its index, for diagnostics. The layout depends on the
    /// hasher and insertion history and is not a stable format.
    pub fn debug_dump(&self) -> Vec<(usize, Slot)> {
        self.slots.iter().copied().enumerate().collect()
    }

    /// Stored keys in slot order. No insertion order is preserved.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.slots.iter(),
        }
    }
}

impl<'a, S> IntoIterator for &'a ProbingTable<S> {
    type Item = i64;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S> Extend<i64> for ProbingTable<S>
where
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<S> fmt::Debug for ProbingTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<S> fmt::Display for ProbingTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Hash table (size: {} | {})",
            self.size,
            self.capacity()
        )?;
        for (i, slot) in self.slots.iter().enumerate() {
            writeln!(f, "[{}]: {}", i, slot)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl<S> ProbingTable<S>
where
    S: BuildHasher,
{
    /// Check the structural invariants: size matches the occupied count, no
    /// key is stored twice, and every key is reachable from its ideal slot
    /// without crossing an `Empty` slot.
    pub(crate) fn assert_invariants(&self) {
        let occupied: Vec<(usize, i64)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.key().map(|k| (i, k)))
            .collect();
        assert_eq!(occupied.len(), self.size, "size must match occupied slots");
        assert!(self.size <= self.capacity());

        let mut seen = std::collections::HashSet::new();
        for &(idx, key) in &occupied {
            assert!(seen.insert(key), "key {} stored twice", key);
            for p in self.probe(key) {
                if p == idx {
                    break;
                }
                assert!(
                    !self.slots[p].is_empty(),
                    "key {} at {} unreachable: empty slot {} on its probe path",
                    key,
                    idx,
                    p
                );
            }
        }
        assert!(!self.rehashing.is_active());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    /// Sends every key to slot 0 so that all keys collide.
    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        }
    }

    fn colliding(capacity: usize) -> ProbingTable<ConstBuildHasher> {
        ProbingTable::with_hasher(capacity, ConstBuildHasher).unwrap()
    }

    /// Invariant: a zero-slot table cannot be constructed.
    #[test]
    fn zero_capacity_rejected() {
        match ProbingTable::new(0) {
            Err(CapacityError::InvalidCapacity) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(ProbingTable::new(1).is_ok());
    }

    /// Invariant: a fresh table is all `Empty` with size 0.
    #[test]
    fn fresh_table_is_empty() {
        let t = ProbingTable::new(5).unwrap();
        assert_eq!(t.capacity(), 5);
        assert_eq!(t.size(), 0);
        assert!(t.is_empty());
        assert!(t.debug_dump().iter().all(|(_, s)| s.is_empty()));
        assert!(!t.contains(100));
    }

    /// Invariant: hashing is deterministic within one table.
    #[test]
    fn hash_is_stable() {
        let t = ProbingTable::new(10).unwrap();
        assert_eq!(t.hash(5), t.hash(5));
        assert_ne!(t.hash(5), t.hash(15));
    }

    /// Invariant: colliding keys occupy consecutive slots from the ideal
    /// position, in insertion order.
    #[test]
    fn collisions_probe_linearly() {
        let mut t = colliding(8);
        t.insert(1);
        t.insert(2);
        t.insert(3);
        let dump = t.debug_dump();
        assert_eq!(dump[0], (0, Slot::Occupied(1)));
        assert_eq!(dump[1], (1, Slot::Occupied(2)));
        assert_eq!(dump[2], (2, Slot::Occupied(3)));
        assert_eq!(dump[3], (3, Slot::Empty));
        t.assert_invariants();
    }

    /// Invariant: a tombstone does not end a probe; keys behind it stay
    /// reachable and removable.
    #[test]
    fn tombstone_is_transparent() {
        let mut t = colliding(8);
        t.insert(1);
        t.insert(2);
        t.insert(3);
        assert!(t.remove(1));
        assert_eq!(t.debug_dump()[0], (0, Slot::Tombstone));
        assert!(!t.contains(1));
        assert!(t.contains(2));
        assert!(t.contains(3));
        assert!(t.remove(3));
        assert!(!t.contains(3));
        assert_eq!(t.size(), 1);
        t.assert_invariants();
    }

    /// Invariant: insert reuses the first tombstone on the probe path, after
    /// confirming the key is absent further along.
    #[test]
    fn insert_reuses_tombstone() {
        let mut t = colliding(8);
        t.insert(1);
        t.insert(2);
        t.remove(1);
        t.insert(3);
        assert_eq!(t.debug_dump()[0], (0, Slot::Occupied(3)));
        assert_eq!(t.tombstones(), 0);

        // 2 sits behind the reused slot; re-inserting must not duplicate it.
        t.insert(2);
        assert_eq!(t.size(), 2);
        t.assert_invariants();
    }

    /// Invariant: the load-factor check uses the size after the insertion;
    /// reaching exactly 0.5 grows the table.
    #[test]
    fn growth_triggers_at_half_load_after_insert() {
        let mut t = ProbingTable::new(4).unwrap();
        t.insert(10);
        assert_eq!(t.capacity(), 4);
        t.insert(20);
        assert_eq!(t.capacity(), 8);
        assert_eq!(t.size(), 2);

        let mut t = ProbingTable::new(5).unwrap();
        t.insert(1);
        t.insert(2);
        assert_eq!(t.capacity(), 5);
        t.insert(3);
        assert_eq!(t.capacity(), 10);
        for k in 1..=3 {
            assert!(t.contains(k));
        }
    }

    /// Invariant: duplicate inserts never count toward growth.
    #[test]
    fn duplicate_insert_does_not_grow() {
        let mut t = ProbingTable::new(4).unwrap();
        t.insert(7);
        t.insert(7);
        t.insert(7);
        assert_eq!(t.size(), 1);
        assert_eq!(t.capacity(), 4);
    }

    /// Invariant: resize drops tombstones, reinserts survivors in old slot
    /// order and leaves no resize in progress.
    #[test]
    fn resize_reclaims_tombstones() {
        let mut t = colliding(8);
        t.insert(1);
        t.insert(2);
        t.insert(3);
        t.remove(2);
        assert_eq!(t.tombstones(), 1);

        t.resize();
        assert_eq!(t.capacity(), 16);
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.size(), 2);
        let dump = t.debug_dump();
        assert_eq!(dump[0], (0, Slot::Occupied(1)));
        assert_eq!(dump[1], (1, Slot::Occupied(3)));
        assert!(!t.rehashing.is_active());
        t.assert_invariants();
    }

    /// Invariant: a resize started by insert does not cascade into a second
    /// resize from within its reinsertion loop.
    #[test]
    fn resize_does_not_recurse() {
        let mut t = ProbingTable::new(2).unwrap();
        // 1/2 reaches the threshold: exactly one doubling.
        t.insert(1);
        assert_eq!(t.capacity(), 4);
        t.insert(2);
        // 2/4 again: one doubling even though reinsertion replays two keys.
        assert_eq!(t.capacity(), 8);
        t.assert_invariants();
    }

    /// Invariant: the prime growth policy rounds the doubled capacity up.
    #[test]
    fn next_prime_growth() {
        let mut t = ProbingTable::with_growth(5, Growth::NextPrime).unwrap();
        assert_eq!(t.growth(), Growth::NextPrime);
        t.extend([1, 2, 3]);
        assert_eq!(t.capacity(), 11);
        t.assert_invariants();
    }

    /// Invariant: keys an integer sentinel scheme would reserve are ordinary.
    #[test]
    fn negative_and_extreme_keys() {
        let mut t = ProbingTable::new(3).unwrap();
        for k in [-1, -2, 0, i64::MIN, i64::MAX] {
            t.insert(k);
        }
        for k in [-1, -2, 0, i64::MIN, i64::MAX] {
            assert!(t.contains(k));
        }
        assert_eq!(t.size(), 5);
        assert!(t.remove(-1));
        assert!(!t.contains(-1));
        assert!(t.contains(-2));
        t.assert_invariants();
    }

    /// Invariant: iteration yields each stored key exactly once.
    #[test]
    fn iter_yields_live_keys() {
        let mut t = ProbingTable::new(4).unwrap();
        t.extend(0..20);
        t.remove(7);
        let mut keys: Vec<i64> = t.iter().collect();
        keys.sort_unstable();
        let expected: Vec<i64> = (0..20).filter(|&k| k != 7).collect();
        assert_eq!(keys, expected);
        assert_eq!((&t).into_iter().count(), 19);
    }

    /// Invariant: the textual dump has one header and one line per slot.
    #[test]
    fn display_dump() {
        let mut t = colliding(4);
        t.insert(9);
        let out = t.to_string();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Hash table (size: 1 | 4)"));
        assert_eq!(lines.next(), Some("[0]: 9"));
        assert_eq!(lines.next(), Some("[1]: EMPTY"));
        t.remove(9);
        assert!(t.to_string().contains("[0]: TOMB"));
        assert_eq!(format!("{:?}", t), "{}");
    }

    /// Invariant: when a full scan finds neither an `Empty` nor a `Tombstone`
    /// slot, insert resizes and retries on the larger array.
    #[test]
    fn insert_into_full_table_grows_and_retries() {
        let mut t = ProbingTable::new(4).unwrap();
        // Only reachable by bypassing the load-factor check.
        t.slots = (1..=4).map(Slot::Occupied).collect();
        t.size = 4;
        assert!(t.find_free(99).is_none());

        t.insert(99);
        assert!(t.capacity() > 4);
        assert_eq!(t.size(), 5);
        for k in [1, 2, 3, 4, 99] {
            assert!(t.contains(k), "missing {}", k);
        }
        assert_eq!(t.tombstones(), 0);
        t.assert_invariants();
    }

    /// Invariant: removal updates size and load factor but never shrinks.
    #[test]
    fn remove_does_not_shrink() {
        let mut t = ProbingTable::new(4).unwrap();
        t.extend([1, 2, 3]);
        let cap = t.capacity();
        assert!(t.remove(1));
        assert!(t.remove(2));
        assert!(!t.remove(2));
        assert_eq!(t.capacity(), cap);
        assert_eq!(t.size(), 1);
        assert!((t.load_factor() - 1.0 / cap as f64).abs() < f64::EPSILON);
    }
}
