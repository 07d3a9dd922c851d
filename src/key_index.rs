//! KeyIndex: hash index from keys to entry handles.
//!
//! The table stores only `Handle`s; keys and their precomputed hashes live
//! in the `EntryList`. Probing compares keys through the list, and growth
//! rehashes from the stored hash, so `K: Hash` never runs after insertion.

use crate::entry_list::{EntryList, Handle};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_table::{self, HashTable};

#[derive(Clone)]
pub(crate) struct KeyIndex<S> {
    hasher: S,
    table: HashTable<Handle>,
}

/// Outcome of probing for a key that is about to be inserted.
pub(crate) enum IndexEntry<'a> {
    Occupied(Handle),
    Vacant(VacantSlot<'a>),
}

/// Reserved index slot; fill it with the handle of the freshly appended entry.
pub(crate) struct VacantSlot<'a>(hash_table::VacantEntry<'a, Handle>);

impl VacantSlot<'_> {
    pub(crate) fn insert(self, handle: Handle) {
        let _ = self.0.insert(handle);
    }
}

impl<S> KeyIndex<S> {
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            table: HashTable::with_capacity(capacity),
        }
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
    }

    /// Unlink a handle by identity. Returns false if it was not indexed.
    pub(crate) fn remove_handle(&mut self, hash: u64, handle: Handle) -> bool {
        match self.table.find_entry(hash, |&h| h == handle) {
            Ok(entry) => {
                let _ = entry.remove();
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn reserve<K, V>(&mut self, additional: usize, list: &EntryList<K, V>) {
        self.table
            .reserve(additional, |&h| list.hash(h).unwrap_or(0));
    }
}

impl<S: BuildHasher> KeyIndex<S> {
    pub(crate) fn hash_one<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub(crate) fn find<K, V, Q>(&self, list: &EntryList<K, V>, hash: u64, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.table
            .find(hash, |&h| list.key(h).is_some_and(|k| k.borrow() == q))
            .copied()
    }

    /// Probe for `key`, reserving a slot when it is absent.
    pub(crate) fn entry<'a, K, V>(
        &'a mut self,
        list: &EntryList<K, V>,
        hash: u64,
        key: &K,
    ) -> IndexEntry<'a>
    where
        K: Eq,
    {
        match self.table.entry(
            hash,
            |&h| list.key(h).is_some_and(|k| k == key),
            |&h| list.hash(h).unwrap_or(0),
        ) {
            hash_table::Entry::Occupied(o) => IndexEntry::Occupied(*o.get()),
            hash_table::Entry::Vacant(v) => IndexEntry::Vacant(VacantSlot(v)),
        }
    }

    /// Remove the mapping for `q`, returning the handle it pointed at.
    pub(crate) fn remove<K, V, Q>(
        &mut self,
        list: &EntryList<K, V>,
        hash: u64,
        q: &Q,
    ) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let entry = self
            .table
            .find_entry(hash, |&h| list.key(h).is_some_and(|k| k.borrow() == q))
            .ok()?;
        let (handle, _) = entry.remove();
        Some(handle)
    }
}
