//! Concurrency primitives shared by the rule stores and connection table.
//!
//! `sync` re-exports the lock types the rest of the workspace should use, so
//! that a single crate controls which mutex implementation backs the
//! datapath. `Published<T>` is the publish-replace primitive behind the
//! filter and NAT rule stores: readers acquire a cheap, lock-free snapshot
//! (`Guard<T>`, an `Arc` clone under the hood) that is stable for the
//! lifetime of one packet traversal, while a writer swaps in an entirely new
//! value atomically.

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

/// Lock types used for the connection table's per-bucket mutual exclusion.
pub mod sync {
    pub use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
}

/// A value that is read far more often than it is written, published via
/// atomic pointer swap rather than a lock.
///
/// This is the mechanism behind §4.2/§4.3's "publish-replace of a shared
/// immutable vector via a single reference slot guarded for read-mostly
/// access": a packet traversal calls [`Published::load`] once and matches
/// against that snapshot end to end, so a concurrent [`Published::store`]
/// from a reload never interleaves with an in-flight match.
pub struct Published<T> {
    slot: ArcSwap<T>,
}

impl<T> Published<T> {
    pub fn new(initial: T) -> Self {
        Published {
            slot: ArcSwap::from_pointee(initial),
        }
    }

    /// Acquire a stable snapshot. Cheap and wait-free; safe to call on the
    /// datapath.
    pub fn load(&self) -> Guard<Arc<T>> {
        self.slot.load()
    }

    /// Atomically replace the published value. Readers already holding a
    /// [`Guard`] keep observing the old value until they reload.
    pub fn store(&self, new_value: T) {
        self.slot.store(Arc::new(new_value));
    }
}
