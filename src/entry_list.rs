//! EntryList: owning arena of entries, doubly linked in touch order.
//!
//! Nodes live in a `SlotMap`, so a `Handle` survives growth of the arena
//! and removal of other nodes. Slot keys are generational: once a node is
//! removed its handle never resolves again, even if the slot is reused.

use slotmap::{DefaultKey, SecondaryMap, SlotMap};

/// Stable reference to one entry of a map.
///
/// A handle stays valid until its entry is removed. Re-inserting the key
/// moves the entry to the back without invalidating the handle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    hash: u64,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

/// Ordered owner of all entries. Oldest at the front, most recently
/// touched at the back.
#[derive(Clone, Debug)]
pub struct EntryList<K, V> {
    nodes: SlotMap<DefaultKey, Node<K, V>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<K, V> Default for EntryList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EntryList<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.nodes.contains_key(handle.raw_handle())
    }

    pub fn front(&self) -> Option<Handle> {
        self.head.map(Handle::new)
    }

    pub fn back(&self) -> Option<Handle> {
        self.tail.map(Handle::new)
    }

    /// Handle following `handle`, or `None` at the back or for a stale handle.
    pub fn next_of(&self, handle: Handle) -> Option<Handle> {
        self.nodes
            .get(handle.raw_handle())
            .and_then(|n| n.next)
            .map(Handle::new)
    }

    /// Handle preceding `handle`, or `None` at the front or for a stale handle.
    pub fn prev_of(&self, handle: Handle) -> Option<Handle> {
        self.nodes
            .get(handle.raw_handle())
            .and_then(|n| n.prev)
            .map(Handle::new)
    }

    pub fn get(&self, handle: Handle) -> Option<(&K, &V)> {
        self.nodes
            .get(handle.raw_handle())
            .map(|n| (&n.key, &n.value))
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<(&K, &mut V)> {
        self.nodes
            .get_mut(handle.raw_handle())
            .map(|n| (&n.key, &mut n.value))
    }

    pub fn key(&self, handle: Handle) -> Option<&K> {
        self.nodes.get(handle.raw_handle()).map(|n| &n.key)
    }

    /// Hash recorded when the entry was appended.
    pub fn hash(&self, handle: Handle) -> Option<u64> {
        self.nodes.get(handle.raw_handle()).map(|n| n.hash)
    }

    /// Append a new entry at the back.
    pub fn push_back(&mut self, key: K, value: V, hash: u64) -> Handle {
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(t) => self.nodes[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        Handle::new(k)
    }

    /// Detach a node from its neighbours without freeing its slot.
    fn unlink(&mut self, k: DefaultKey) -> Option<()> {
        let node = self.nodes.get(k)?;
        let (prev, next) = (node.prev, node.next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        Some(())
    }

    /// Remove an entry, returning its key, value and recorded hash.
    pub fn remove(&mut self, handle: Handle) -> Option<(K, V, u64)> {
        let k = handle.raw_handle();
        self.unlink(k)?;
        let node = self.nodes.remove(k)?;
        Some((node.key, node.value, node.hash))
    }

    pub fn pop_front(&mut self) -> Option<(K, V, u64)> {
        let h = self.front()?;
        self.remove(h)
    }

    pub fn pop_back(&mut self) -> Option<(K, V, u64)> {
        let h = self.back()?;
        self.remove(h)
    }

    /// Relink an entry at the back. The node keeps its slot, so the
    /// returned handle equals the one passed in.
    pub fn move_to_back(&mut self, handle: Handle) -> Option<Handle> {
        let k = handle.raw_handle();
        if self.tail == Some(k) {
            return Some(handle);
        }
        self.unlink(k)?;
        let old_tail = self.tail;
        let node = &mut self.nodes[k];
        node.prev = old_tail;
        node.next = None;
        match old_tail {
            Some(t) => self.nodes[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        Some(handle)
    }

    /// Drop every entry. Generations advance, so old handles stay dead.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.nodes.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let head = self.head;
        let len = self.nodes.len();
        let mut by_key: SecondaryMap<DefaultKey, &mut Node<K, V>> =
            SecondaryMap::with_capacity(len);
        for (k, node) in self.nodes.iter_mut() {
            by_key.insert(k, node);
        }

        let mut ordered = Vec::with_capacity(len);
        let mut cur = head;
        while let Some(k) = cur {
            let Some(node) = by_key.remove(k) else { break };
            let Node {
                key, value, next, ..
            } = node;
            cur = *next;
            ordered.push((Handle::new(k), &*key, value));
        }
        debug_assert_eq!(ordered.len(), len, "links must cover every node");
        IterMut {
            inner: ordered.into_iter(),
        }
    }
}

/// Front-to-back traversal following the links.
pub struct Iter<'a, K, V> {
    nodes: &'a SlotMap<DefaultKey, Node<K, V>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Handle, &'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.front?;
        let node = self.nodes.get(k)?;
        self.front = node.next;
        self.remaining -= 1;
        Some((Handle::new(k), &node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.back?;
        let node = self.nodes.get(k)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((Handle::new(k), &node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Mutable traversal in link order.
pub struct IterMut<'a, K, V> {
    inner: std::vec::IntoIter<(Handle, &'a K, &'a mut V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (Handle, &'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
