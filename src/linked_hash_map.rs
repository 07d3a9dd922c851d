//! LinkedHashMap: hash index over an ordered entry arena.
//!
//! Every mutation probes the `KeyIndex` first, then places, relocates or
//! removes the node in the `EntryList`, then fixes the index. After each
//! public method returns, the index holds exactly one handle per live node
//! and every handle resolves to the node carrying its key.

use crate::entry_list::{EntryList, Handle};
use crate::error::{Error, Result};
use crate::iter::{Drain, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::key_index::{IndexEntry, KeyIndex};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use std::collections::hash_map::RandomState;
use tracing::trace;

/// Hash map that iterates in touch order: oldest first, most recently
/// inserted or re-inserted last.
///
/// Inserting a key that is already present replaces its value and moves
/// the entry to the back.
#[derive(Clone)]
pub struct LinkedHashMap<K, V, S = RandomState> {
    list: EntryList<K, V>,
    index: KeyIndex<S>,
}

/// An entry taken out by [`LinkedHashMap::remove_at`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Removed<K, V> {
    pub key: K,
    pub value: V,
    /// Entry that followed the removed one; `None` if it was the last.
    pub next: Option<Handle>,
}

impl Handle {
    pub fn key<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<&'a K> {
        map.list.key(*self)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<&'a V> {
        map.list.get(*self).map(|(_, v)| v)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut LinkedHashMap<K, V, S>) -> Option<&'a mut V> {
        map.list.get_mut(*self).map(|(_, v)| v)
    }
}

impl<K, V> LinkedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Pre-size for `capacity` entries. Has no effect on ordering.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S: Default> Default for LinkedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            list: EntryList::with_capacity(capacity),
            index: KeyIndex::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.list.len(), self.index.len());
        self.list.len()
    }
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Number of entries the map holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.list.capacity().min(self.index.capacity())
    }

    pub fn hasher(&self) -> &S {
        self.index.hasher()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.list.reserve(additional);
        self.index.reserve(additional, &self.list);
        trace!(additional, capacity = self.capacity(), "reserved");
    }

    /// Remove every entry. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        trace!(len = self.list.len(), "clearing map");
        self.index.clear();
        self.list.clear();
    }

    /// Exchange the contents of two maps without moving any entry.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.list.iter_mut(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Remove entries front to back as they are yielded.
    pub fn drain(&mut self) -> Drain<'_, K, V, S> {
        trace!(len = self.list.len(), "draining map");
        Drain { map: self }
    }

    /// Oldest entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.list.front().and_then(|h| self.list.get(h))
    }

    /// Most recently inserted or promoted entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.list.back().and_then(|h| self.list.get(h))
    }

    pub fn first_handle(&self) -> Option<Handle> {
        self.list.front()
    }

    pub fn last_handle(&self) -> Option<Handle> {
        self.list.back()
    }

    /// Handle of the entry after `handle`; `Ok(None)` at the back.
    pub fn next_handle(&self, handle: Handle) -> Result<Option<Handle>> {
        self.check(handle)?;
        Ok(self.list.next_of(handle))
    }

    /// Handle of the entry before `handle`; `Ok(None)` at the front.
    pub fn prev_handle(&self, handle: Handle) -> Result<Option<Handle>> {
        self.check(handle)?;
        Ok(self.list.prev_of(handle))
    }

    pub fn entry_at(&self, handle: Handle) -> Result<(&K, &V)> {
        self.list.get(handle).ok_or(Error::InvalidHandle)
    }

    pub fn entry_at_mut(&mut self, handle: Handle) -> Result<(&K, &mut V)> {
        self.list.get_mut(handle).ok_or(Error::InvalidHandle)
    }

    fn check(&self, handle: Handle) -> Result<()> {
        if self.list.contains(handle) {
            Ok(())
        } else {
            Err(Error::InvalidHandle)
        }
    }

    /// Unlink one entry from both structures.
    fn take(&mut self, handle: Handle) -> Option<(K, V)> {
        let (key, value, hash) = self.list.remove(handle)?;
        let unlinked = self.index.remove_handle(hash, handle);
        debug_assert!(unlinked, "entry list and key index out of sync");
        Some((key, value))
    }

    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let h = self.list.front()?;
        self.take(h)
    }

    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let h = self.list.back()?;
        self.take(h)
    }

    /// Remove the entry at `handle` and report the handle that followed it.
    pub fn remove_at(&mut self, handle: Handle) -> Result<Removed<K, V>> {
        self.check(handle)?;
        let next = self.list.next_of(handle);
        let (key, value) = self.take(handle).ok_or(Error::InvalidHandle)?;
        trace!(?handle, "removed entry by handle");
        Ok(Removed { key, value, next })
    }

    /// Remove every entry from `first` up to, not including, `last`
    /// (`None` meaning the end). Returns `last`.
    ///
    /// Nothing is removed unless `last` is reachable from `first`.
    pub fn remove_range(&mut self, first: Handle, last: Option<Handle>) -> Result<Option<Handle>> {
        self.check(first)?;
        if let Some(l) = last {
            self.check(l)?;
        }

        let mut span = 0usize;
        let mut cur = Some(first);
        while cur != last {
            let h = cur.ok_or(Error::InvalidRange)?;
            cur = self.list.next_of(h);
            span += 1;
        }

        let mut cur = Some(first);
        while cur != last {
            let Some(h) = cur else { break };
            cur = self.list.next_of(h);
            self.take(h);
        }
        trace!(removed = span, "removed handle range");
        Ok(last)
    }

    /// Keep only the entries for which `f` returns true. Order is preserved.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut cur = self.list.front();
        while let Some(h) = cur {
            cur = self.list.next_of(h);
            let keep = match self.list.get_mut(h) {
                Some((k, v)) => f(k, v),
                None => true,
            };
            if !keep {
                self.take(h);
            }
        }
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Upsert: a new key is appended at the back; a present key gets the
    /// new value and is moved to the back. The stored key is kept.
    pub fn insert(&mut self, key: K, value: V) -> Handle {
        let hash = self.index.hash_one(&key);
        match self.index.entry(&self.list, hash, &key) {
            IndexEntry::Occupied(handle) => {
                if let Some((_, slot)) = self.list.get_mut(handle) {
                    *slot = value;
                }
                self.list.move_to_back(handle);
                trace!(?handle, "upsert moved entry to back");
                handle
            }
            IndexEntry::Vacant(slot) => {
                let handle = self.list.push_back(key, value, hash);
                slot.insert(handle);
                handle
            }
        }
    }

    /// Insert only if `key` is absent. On `DuplicateKey` the map is unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Handle> {
        let hash = self.index.hash_one(&key);
        match self.index.entry(&self.list, hash, &key) {
            IndexEntry::Occupied(_) => Err(Error::DuplicateKey),
            IndexEntry::Vacant(slot) => {
                let handle = self.list.push_back(key, value, hash);
                slot.insert(handle);
                Ok(handle)
            }
        }
    }

    /// Value for `key`, inserting `default()` at the back if absent.
    /// A present entry keeps its position.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.index.hash_one(&key);
        let handle = match self.index.entry(&self.list, hash, &key) {
            IndexEntry::Occupied(handle) => handle,
            IndexEntry::Vacant(slot) => {
                let handle = self.list.push_back(key, default(), hash);
                slot.insert(handle);
                handle
            }
        };
        self.list
            .get_mut(handle)
            .map(|(_, v)| v)
            .expect("indexed handle must resolve")
    }

    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.index.hash_one(q);
        self.index.find(&self.list, hash, q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// 1 if `q` is present, else 0.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.contains_key(q))
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let h = self.find(q)?;
        self.list.get(h)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let h = self.find(q)?;
        self.list.get_mut(h).map(|(_, v)| v)
    }

    /// Checked access: fails with `KeyNotFound` when `q` is absent.
    pub fn at<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(Error::KeyNotFound)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.index.hash_one(q);
        let handle = self.index.remove(&self.list, hash, q)?;
        let (key, value, _) = self.list.remove(handle)?;
        Some((key, value))
    }

    /// Promote `q` to the back without touching its value.
    pub fn move_to_back<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find(q) {
            Some(h) => self.list.move_to_back(h).is_some(),
            None => false,
        }
    }
}

impl<K, V, S> fmt::Debug for LinkedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when both maps hold the same entries in the same order.
impl<K, V, S> PartialEq for LinkedHashMap<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for LinkedHashMap<K, V, S> {}

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        // Duplicates may collapse, so only trust the full hint on an empty map.
        let hint = if self.is_empty() {
            iter.size_hint().0
        } else {
            (iter.size_hint().0 + 1) / 2
        };
        self.reserve(hint);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K, Q, V, S> Index<&Q> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if `key` is absent; use [`LinkedHashMap::at`] for a checked lookup.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found in LinkedHashMap")
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter { list: self.list }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
