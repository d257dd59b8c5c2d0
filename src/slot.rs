//! Slot: per-index state of the backing array.

use core::fmt;

/// State of one slot in a [`ProbingTable`](crate::ProbingTable).
///
/// The state is an explicit tag rather than a reserved key value, so every
/// `i64` (negative values and the extremes included) is a valid key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Slot {
    /// Never written since the backing array was allocated. Ends a probe.
    #[default]
    Empty,
    /// Previously occupied, now deleted. Probes continue past it and
    /// inserts may reuse it.
    Tombstone,
    /// Holds a live key.
    Occupied(i64),
}

impl Slot {
    /// Whether the slot was never written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// Whether the slot held a key that was removed.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// Whether the slot holds a live key.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    /// The stored key, if the slot is occupied.
    #[inline]
    pub fn key(&self) -> Option<i64> {
        match *self {
            Slot::Occupied(k) => Some(k),
            Slot::Empty | Slot::Tombstone => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Empty => f.write_str("EMPTY"),
            Slot::Tombstone => f.write_str("TOMB"),
            Slot::Occupied(k) => write!(f, "{}", k),
        }
    }
}
