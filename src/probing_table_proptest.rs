#![cfg(test)]

// Property tests for ProbingTable kept inside the crate so they can check
// the structural invariants on private state after every step.

use crate::probing_table::ProbingTable;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use std::collections::HashSet;

// Hashes a key to itself, so `hash mod capacity` is the naive modulo scheme
// and keys sharing a residue collide.
#[derive(Clone, Default)]
struct IdentityBuildHasher;
#[derive(Default)]
struct IdentityHasher(u64);
impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;
    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher(0)
    }
}
impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | u64::from(b);
        }
    }
    fn write_i64(&mut self, i: i64) {
        self.0 = i as u64;
    }
    fn finish(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    Resize,
}

// Small key range so that duplicates, removals of present keys and
// collisions are all frequent.
fn arb_op() -> impl Strategy<Value = Op> {
    let key = -24i64..24;
    prop_oneof![
        4 => key.clone().prop_map(Op::Insert),
        2 => key.clone().prop_map(Op::Remove),
        2 => key.prop_map(Op::Contains),
        1 => Just(Op::Resize),
    ]
}

fn run<S: BuildHasher>(mut sut: ProbingTable<S>, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut model: HashSet<i64> = HashSet::new();
    for op in ops {
        match op {
            Op::Insert(k) => {
                let cap_before = sut.capacity();
                sut.insert(k);
                model.insert(k);
                prop_assert!(sut.contains(k));
                prop_assert!(sut.capacity() >= cap_before);
            }
            Op::Remove(k) => {
                let size_before = sut.size();
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(&k));
                let expected = if removed { size_before - 1 } else { size_before };
                prop_assert_eq!(sut.size(), expected);
                prop_assert!(!sut.contains(k));
            }
            Op::Contains(k) => {
                prop_assert_eq!(sut.contains(k), model.contains(&k));
            }
            Op::Resize => {
                let cap_before = sut.capacity();
                sut.resize();
                prop_assert!(sut.capacity() > cap_before);
                prop_assert_eq!(sut.tombstones(), 0);
            }
        }

        // Invariants after each step
        sut.assert_invariants();
        prop_assert_eq!(sut.size(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.load_factor() <= 0.5, "growth keeps load at or below 0.5");
    }

    let keys: HashSet<i64> = sut.iter().collect();
    prop_assert_eq!(keys, model);
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashSet.
// Invariants exercised across random operation sequences:
// - `contains` parity with the model; inserted keys are immediately visible.
// - `remove` reports presence and changes size by exactly one when true.
// - No key stored twice; every key reachable without crossing `Empty`.
// - Capacity never shrinks; explicit resizes clear all tombstones.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_identity_hash(
        cap in 1usize..8,
        ops in proptest::collection::vec(arb_op(), 1..80),
    ) {
        let sut = ProbingTable::with_hasher(cap, IdentityBuildHasher).unwrap();
        run(sut, ops)?;
    }

    #[test]
    fn prop_state_machine_default_hash(
        cap in 1usize..8,
        ops in proptest::collection::vec(arb_op(), 1..80),
    ) {
        let sut = ProbingTable::new(cap).unwrap();
        run(sut, ops)?;
    }
}
