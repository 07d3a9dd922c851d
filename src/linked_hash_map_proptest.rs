#![cfg(test)]

// Property tests for LinkedHashMap kept inside the crate so they can look
// at the entry list and key index directly.

use crate::entry_list::Handle;
use crate::error::Error;
use crate::linked_hash_map::LinkedHashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashSet;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    TryInsert(usize, i32),
    GetOrDefault(usize),
    Remove(usize),
    RemoveAt(usize),
    RemoveRange(usize, usize),
    MoveToBack(usize),
    PopFront,
    Contains(String),
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::TryInsert(i, v)),
            1 => idx.clone().prop_map(OpI::GetOrDefault),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveAt),
            1 => (idx.clone(), idx.clone()).prop_map(|(i, j)| OpI::RemoveRange(i, j)),
            1 => idx.clone().prop_map(OpI::MoveToBack),
            1 => Just(OpI::PopFront),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn position(model: &[(Key, i32)], k: &Key) -> Option<usize> {
    model.iter().position(|(mk, _)| mk == k)
}

// Drive the map and an ordered Vec model through the same operations.
// Invariants checked after every step:
// - Iteration order and contents equal the model (order law, upsert-promotes law).
// - `len`/`is_empty` parity; every model key resolves through `find`.
// - Handles of removed entries never resolve again.
fn run_scenario<S: BuildHasher>(
    mut sut: LinkedHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(Key, i32)> = Vec::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                let before = sut.find(&k);
                let h = sut.insert(k.clone(), v);
                if let Some(b) = before {
                    prop_assert_eq!(b, h, "upsert must keep the handle");
                }
                if let Some(p) = position(&model, &k) {
                    model.remove(p);
                }
                model.push((k, v));
            }
            OpI::TryInsert(i, v) => {
                let k = key_from(pool, i);
                match sut.try_insert(k.clone(), v) {
                    Ok(_) => {
                        prop_assert!(position(&model, &k).is_none());
                        model.push((k, v));
                    }
                    Err(e) => {
                        prop_assert_eq!(e, Error::DuplicateKey);
                        prop_assert!(position(&model, &k).is_some());
                    }
                }
            }
            OpI::GetOrDefault(i) => {
                let k = key_from(pool, i);
                let got = *sut.get_or_default(k.clone());
                match position(&model, &k) {
                    Some(p) => prop_assert_eq!(got, model[p].1),
                    None => {
                        prop_assert_eq!(got, 0);
                        model.push((k, 0));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let h = sut.find(&k);
                let got = sut.remove(&k);
                match position(&model, &k) {
                    Some(p) => {
                        let (_, mv) = model.remove(p);
                        prop_assert_eq!(got, Some(mv));
                        stale.extend(h);
                    }
                    None => prop_assert_eq!(got, None),
                }
                prop_assert_eq!(sut.remove(&k), None, "second remove is a no-op");
            }
            OpI::RemoveAt(i) => {
                let k = key_from(pool, i);
                if let Some(h) = sut.find(&k) {
                    let p = position(&model, &k).expect("model tracks present key");
                    let removed = sut.remove_at(h).expect("live handle");
                    let (_, mv) = model.remove(p);
                    prop_assert_eq!(removed.value, mv);
                    let next_key = removed.next.and_then(|n| n.key(&sut)).cloned();
                    prop_assert_eq!(next_key, model.get(p).map(|(k, _)| k.clone()));
                    stale.push(h);
                } else {
                    prop_assert!(position(&model, &k).is_none());
                }
            }
            OpI::RemoveRange(i, j) => {
                let (ki, kj) = (key_from(pool, i), key_from(pool, j));
                let Some(first) = sut.find(&ki) else { continue };
                let pi = position(&model, &ki).expect("model tracks present key");
                let (last, pj) = match sut.find(&kj) {
                    Some(h) => (Some(h), position(&model, &kj).expect("model tracks present key")),
                    None => (None, model.len()),
                };
                if pi <= pj {
                    let doomed: Vec<Handle> = model[pi..pj]
                        .iter()
                        .filter_map(|(k, _)| sut.find(k))
                        .collect();
                    prop_assert_eq!(sut.remove_range(first, last), Ok(last));
                    model.drain(pi..pj);
                    stale.extend(doomed);
                } else {
                    prop_assert_eq!(sut.remove_range(first, last), Err(Error::InvalidRange));
                }
            }
            OpI::MoveToBack(i) => {
                let k = key_from(pool, i);
                let moved = sut.move_to_back(&k);
                match position(&model, &k) {
                    Some(p) => {
                        prop_assert!(moved);
                        let e = model.remove(p);
                        model.push(e);
                    }
                    None => prop_assert!(!moved),
                }
            }
            OpI::PopFront => {
                let h = sut.first_handle();
                let got = sut.pop_front();
                if model.is_empty() {
                    prop_assert!(got.is_none());
                } else {
                    prop_assert_eq!(got, Some(model.remove(0)));
                    stale.extend(h);
                }
            }
            OpI::Contains(s) => {
                let has_model = model.iter().any(|(k, _)| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
                prop_assert_eq!(sut.count(s.as_str()), usize::from(has_model));
            }
            OpI::Clear => {
                stale.extend(sut.first_handle());
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        let order: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&order, &model);
        let reversed: Vec<&Key> = sut.keys().rev().collect();
        prop_assert_eq!(reversed, model.iter().rev().map(|(k, _)| k).collect::<Vec<_>>());
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let distinct: HashSet<&Key> = sut.keys().collect();
        prop_assert_eq!(distinct.len(), sut.len());
        for (k, v) in &model {
            let h = sut.find(k).expect("model key must be indexed");
            prop_assert_eq!(h.key(&sut), Some(k));
            prop_assert_eq!(h.value(&sut), Some(v));
        }
        for &h in &stale {
            prop_assert!(h.value(&sut).is_none(), "stale handle must not resolve");
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(LinkedHashMap::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
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

// Property: Same state-machine invariants as above, under worst-case
// collision behavior (constant hasher).
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(LinkedHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
