//! Resize-in-progress flag.
//!
//! Single-threaded marker that a table is currently rebuilding its slot
//! array. The reinsertion loop of a resize goes through the ordinary insert
//! path; inserts consult this flag so that the load-factor check does not
//! start a nested resize. The flag is set by an RAII guard, so it is cleared
//! on every exit path, unwinding included.

use std::cell::Cell;
use std::rc::Rc;

/// Per-instance rehash tracker. Embed this in a table and wrap the
/// reinsertion loop with `let _g = self.rehashing.enter();`.
///
/// The shared cell keeps the guard independent of the table borrow, so the
/// table can still be mutated while the guard is alive. `Rc` also keeps the
/// owner `!Send + !Sync`, in line with the single-threaded design.
#[derive(Debug)]
pub(crate) struct RehashFlag {
    active: Rc<Cell<bool>>,
}

impl RehashFlag {
    pub(crate) fn new() -> Self {
        Self {
            active: Rc::new(Cell::new(false)),
        }
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Mark a resize as in progress until the returned guard is dropped.
    /// In debug builds, panics if a resize is already in progress.
    #[inline]
    pub(crate) fn enter(&self) -> RehashGuard {
        debug_assert!(
            !self.active.get(),
            "nested resize: a resize is already in progress"
        );
        self.active.set(true);
        RehashGuard {
            active: Rc::clone(&self.active),
        }
    }
}

/// RAII guard returned by `RehashFlag::enter`.
pub(crate) struct RehashGuard {
    active: Rc<Cell<bool>>,
}

impl Drop for RehashGuard {
    fn drop(&mut self) {
        self.active.set(false);
    }
}
