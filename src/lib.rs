//! probing-table: a single-threaded, open-addressing set of `i64` keys
//! that resolves collisions by linear probing, deletes with tombstones and
//! grows automatically.
//!
//! Internal Design:
//!
//! Summary
//! - `ProbingTable<S>` owns a fixed-length `Vec<Slot>`, a `BuildHasher`,
//!   and size/capacity bookkeeping. It performs all probing, insertion,
//!   lookup, deletion and resize logic.
//! - `Slot` is an explicit tag (`Empty`, `Tombstone`, `Occupied(key)`), so
//!   no key value is reserved as a sentinel.
//!
//! Probing
//! - The probe sequence for a key starts at `hash(key) % capacity` and
//!   steps by one, wrapping, for at most `capacity` candidates.
//! - Lookups stop at the first `Empty` slot: a key is never stored past an
//!   `Empty` slot on its own probe path. Tombstones keep the search going.
//! - Inserts first confirm the key is absent, then take the first `Empty`
//!   or `Tombstone` slot on the path.
//!
//! Growth
//! - After each successful insert, the table resizes once
//!   `size / capacity >= 0.5`, with `size` counted after the insertion.
//! - A resize allocates a fresh all-`Empty` array (doubled by default, see
//!   [`Growth`]), swaps it in, and reinserts the live keys in old slot
//!   order through the ordinary insert path. Tombstones are not carried
//!   over, which is how deleted space is reclaimed.
//! - A rehash flag, set by an RAII guard for the duration of the
//!   reinsertion loop, stops the load-factor check from starting a nested
//!   resize.
//! - If an insert ever finds no free slot on a full scan, it resizes and
//!   retries; failing again is an internal invariant violation and panics.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` through the rehash flag. Callers that
//!   need shared access must wrap the whole table in a lock.
//! - No shrink on delete; removal only leaves tombstones behind.
//! - No ordering guarantee for iteration or `debug_dump`.
//!
//! Logging
//! - Resizes are reported as `tracing` debug events. The crate never
//!   installs a subscriber.

mod error;
mod growth;
mod probing_table;
mod probing_table_proptest;
mod rehash;
mod slot;

// Public surface
pub use error::CapacityError;
pub use growth::Growth;
pub use probing_table::{Iter, ProbingTable, MAX_LOAD_FACTOR};
pub use slot::Slot;
