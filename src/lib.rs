//! linked-hashmap: a hash map that remembers the order in which entries
//! were last inserted.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) average lookup, insert and remove, plus deterministic
//!   front-to-back iteration in touch order.
//! - Layers:
//!   - EntryList<K, V>: owning arena of nodes in a `SlotMap`, doubly
//!     linked oldest to newest. Mints generational `Handle`s that survive
//!     arena growth and removal of other nodes.
//!   - KeyIndex<S>: `hashbrown::HashTable<Handle>` plus the `BuildHasher`.
//!     Holds handles only; never owns entry data.
//!   - LinkedHashMap<K, V, S>: public API composing the two and keeping
//!     them in step.
//!
//! Invariants (after every public call)
//! - The index holds exactly as many handles as the list holds nodes.
//! - Each indexed handle resolves to the node carrying that key.
//! - Keys are unique.
//! - Iteration order is most-recent insert time, oldest first. Inserting a
//!   key that is already present replaces its value and moves the entry to
//!   the back (upsert-and-promote).
//!
//! Hashing
//! - Each node stores the `u64` hash computed on insertion. Index growth
//!   and handle-based removal use the stored hash, so `K: Hash` only runs
//!   for the key passed into a call.
//!
//! Handles
//! - `insert` returns the entry's `Handle`. A handle stays valid until its
//!   entry is removed; promotion relinks the node in place and keeps it.
//! - Stale handles are detected (generational keys): handle-taking
//!   operations return `Error::InvalidHandle` instead of touching another
//!   entry.
//! - A handle is only meaningful for the map that minted it and for
//!   clones taken while it was live.
//!
//! Notes and non-goals
//! - Not synchronized; mutation requires `&mut self`.
//! - No capacity bound or eviction. An LRU cache can be layered on top
//!   with `pop_front` and `move_to_back`.
//! - No serialization.

mod error;
mod iter;
mod key_index;
mod linked_hash_map;
#[cfg(test)]
mod linked_hash_map_proptest;

#[cfg(feature = "bench_internal")]
pub mod entry_list;
#[cfg(not(feature = "bench_internal"))]
mod entry_list;

// Public surface
pub use entry_list::Handle;
pub use error::{Error, Result};
pub use iter::{Drain, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use linked_hash_map::{LinkedHashMap, Removed};
