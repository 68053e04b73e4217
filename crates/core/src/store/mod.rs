//! Generic associative store with linear probing.
//!
//! `Store<V>` is a hand-rolled open-addressing hash table keyed by one of
//! three key kinds (integer, string, address), selected at creation and
//! fixed for the store's lifetime. Collisions resolve by linear probing,
//! growth is load-factor triggered, and every operation runs under a
//! store-wide mutex so independent callers get at-most-one-writer-at-a-time
//! semantics per store instance.
//!
//! Iteration works on an owned snapshot taken under the lock, so a live
//! cursor can never observe a concurrent structural mutation.

mod hash;

pub use hash::djb2;

use std::sync::Mutex;

use compact_str::CompactString;

use crate::error::{Result, TokenizerError};

/// Occupancy threshold that triggers a resize before insert.
const MAX_LOAD_FACTOR: f64 = 0.75;

/// Key kind tag, fixed at store creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// 64-bit signed integer keys
    Int,
    /// Owned byte-string keys
    Str,
    /// Opaque address keys
    Addr,
}

/// An ownership-bearing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Int(i64),
    Str(CompactString),
    Addr(usize),
}

impl Key {
    /// Build a string key.
    pub fn str(s: impl AsRef<str>) -> Self {
        Key::Str(CompactString::new(s.as_ref()))
    }

    /// Build an integer key.
    pub fn int(k: i64) -> Self {
        Key::Int(k)
    }

    /// Build an address key.
    pub fn addr(a: usize) -> Self {
        Key::Addr(a)
    }

    /// The kind tag of this key.
    pub fn kind(&self) -> KeyKind {
        match self {
            Key::Int(_) => KeyKind::Int,
            Key::Str(_) => KeyKind::Str,
            Key::Addr(_) => KeyKind::Addr,
        }
    }
}

/// Outcome of an insert: duplicate keys are an ordinary result, reported
/// distinctly so callers can choose to update in place instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was absent and is now stored
    Inserted,
    /// The key was already present; the stored value is unchanged
    Exists,
}

/// One occupied bucket.
#[derive(Debug, Clone)]
struct Entry<V> {
    key: Key,
    value: V,
}

struct Inner<V> {
    slots: Vec<Option<Entry<V>>>,
    count: usize,
}

/// Generic associative store keyed by integer, string, or address.
pub struct Store<V> {
    kind: KeyKind,
    inner: Mutex<Inner<V>>,
}

impl<V> Store<V> {
    /// Create an empty store with `capacity` buckets.
    ///
    /// Fails with [`TokenizerError::InvalidCapacity`] when `capacity` is
    /// zero.
    pub fn new(capacity: usize, kind: KeyKind) -> Result<Self> {
        if capacity == 0 {
            return Err(TokenizerError::InvalidCapacity(capacity));
        }

        let mut slots = Vec::new();
        slots.resize_with(capacity, || None);

        Ok(Self {
            kind,
            inner: Mutex::new(Inner { slots, count: 0 }),
        })
    }

    /// The key kind this store was created with.
    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    /// Number of occupied buckets.
    ///
    /// A poisoned store reports 0; these read-only accessors stay
    /// infallible, and every mutating or value-returning operation on a
    /// poisoned store surfaces [`TokenizerError::Poisoned`] before the
    /// count could matter.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.count).unwrap_or(0)
    }

    /// True when no bucket is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current bucket count. A poisoned store reports 0, as with [`len`].
    ///
    /// [`len`]: Store::len
    pub fn capacity(&self) -> usize {
        self.inner.lock().map(|inner| inner.slots.len()).unwrap_or(0)
    }

    fn check_kind(&self, key: &Key) -> Result<()> {
        if key.kind() != self.kind {
            return Err(TokenizerError::KeyTypeMismatch {
                expected: self.kind,
                found: key.kind(),
            });
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner<V>>> {
        self.inner.lock().map_err(|_| TokenizerError::Poisoned)
    }

    /// Insert a key/value pair.
    ///
    /// When the insert would push occupancy past the load-factor threshold,
    /// the table grows (rehashing every entry) before the physical insert.
    /// A present key reports [`InsertOutcome::Exists`] and leaves the stored
    /// value untouched.
    pub fn insert(&self, key: Key, value: V) -> Result<InsertOutcome> {
        self.check_kind(&key)?;
        let mut inner = self.lock()?;
        inner.reserve_for_insert()?;
        inner.insert(key, value)
    }

    /// Look up a key, returning a clone of its value.
    pub fn search(&self, key: &Key) -> Result<Option<V>>
    where
        V: Clone,
    {
        self.check_kind(key)?;
        let inner = self.lock()?;
        match inner.find(key) {
            Some(index) => Ok(inner.slots[index].as_ref().map(|e| e.value.clone())),
            None => Ok(None),
        }
    }

    /// Insert `init` under `key`, or apply `update` to the stored value when
    /// the key is already present.
    pub fn upsert(&self, key: Key, init: V, update: impl FnOnce(&mut V)) -> Result<()> {
        self.check_kind(&key)?;
        let mut inner = self.lock()?;
        if let Some(index) = inner.find(&key) {
            if let Some(entry) = inner.slots[index].as_mut() {
                update(&mut entry.value);
            }
            return Ok(());
        }
        inner.reserve_for_insert()?;
        inner.insert(key, init)?;
        Ok(())
    }

    /// Remove a key. Returns `false` when the key was absent.
    ///
    /// Removal re-inserts the tail of the probe cluster so later probes
    /// never stop early at the vacated bucket.
    pub fn delete(&self, key: &Key) -> Result<bool> {
        self.check_kind(key)?;
        let mut inner = self.lock()?;

        let Some(index) = inner.find(key) else {
            return Ok(false);
        };

        inner.slots[index] = None;
        inner.count -= 1;

        // Rehash the remainder of the cluster
        let capacity = inner.slots.len();
        let mut probe = (index + 1) % capacity;
        while let Some(entry) = inner.slots[probe].take() {
            inner.count -= 1;
            inner.insert(entry.key, entry.value)?;
            probe = (probe + 1) % capacity;
        }

        Ok(true)
    }

    /// Drop every entry, keeping the current capacity.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.lock()?;
        for slot in inner.slots.iter_mut() {
            *slot = None;
        }
        inner.count = 0;
        Ok(())
    }

    /// Grow the table to `new_capacity` buckets, rehashing every entry.
    ///
    /// Capacity only grows; a smaller-or-equal request is a no-op success.
    pub fn resize(&self, new_capacity: usize) -> Result<()> {
        let mut inner = self.lock()?;
        if new_capacity <= inner.slots.len() {
            return Ok(());
        }
        inner.grow(new_capacity)
    }

    /// Take an owned snapshot of every occupied entry.
    ///
    /// The snapshot is taken under the lock; the returned cursor is bound
    /// to an immutable copy, so later mutation of the store cannot
    /// invalidate it. Order is unspecified and may differ between
    /// otherwise-identical stores.
    pub fn snapshot(&self) -> Result<Vec<(Key, V)>>
    where
        V: Clone,
    {
        let inner = self.lock()?;
        Ok(inner
            .slots
            .iter()
            .flatten()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect())
    }
}

impl<V> Inner<V> {
    /// Probe for `key`. Returns the occupied slot index holding it, or None
    /// after hitting an empty bucket or wrapping the full capacity.
    fn find(&self, key: &Key) -> Option<usize> {
        let capacity = self.slots.len();
        for step in 0..capacity {
            let index = hash::bucket(key, capacity, step);
            match &self.slots[index] {
                None => return None,
                Some(entry) if entry.key == *key => return Some(index),
                Some(_) => {}
            }
        }
        None
    }

    /// Grow before an insert that would exceed the load-factor threshold.
    fn reserve_for_insert(&mut self) -> Result<()> {
        let capacity = self.slots.len();
        if (self.count + 1) as f64 > MAX_LOAD_FACTOR * capacity as f64 {
            self.grow(capacity * 2)?;
        }
        Ok(())
    }

    fn insert(&mut self, key: Key, value: V) -> Result<InsertOutcome> {
        let capacity = self.slots.len();
        for step in 0..capacity {
            let index = hash::bucket(&key, capacity, step);
            match &self.slots[index] {
                None => {
                    self.slots[index] = Some(Entry { key, value });
                    self.count += 1;
                    return Ok(InsertOutcome::Inserted);
                }
                Some(entry) if entry.key == key => return Ok(InsertOutcome::Exists),
                Some(_) => {}
            }
        }
        Err(TokenizerError::StoreFull { capacity })
    }

    /// Re-hash every occupied entry into a freshly sized slot array.
    fn grow(&mut self, new_capacity: usize) -> Result<()> {
        let mut fresh = Vec::new();
        fresh.resize_with(new_capacity, || None);

        let old = std::mem::replace(&mut self.slots, fresh);
        self.count = 0;

        for entry in old.into_iter().flatten() {
            self.insert(entry.key, entry.value)?;
        }
        Ok(())
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Store<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("kind", &self.kind)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    #[test]
    fn test_create_rejects_zero_capacity() {
        assert!(matches!(
            Store::<i64>::new(0, KeyKind::Str),
            Err(TokenizerError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_insert_search_delete() {
        let store = Store::new(8, KeyKind::Str).unwrap();

        assert_eq!(
            store.insert(Key::str("cat"), 3).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert(Key::str("cat"), 9).unwrap(),
            InsertOutcome::Exists
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.search(&Key::str("cat")).unwrap(), Some(3));
        assert_eq!(store.search(&Key::str("dog")).unwrap(), None);

        assert!(store.delete(&Key::str("cat")).unwrap());
        assert!(!store.delete(&Key::str("cat")).unwrap());
        assert_eq!(store.search(&Key::str("cat")).unwrap(), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_key_type_mismatch() {
        let store = Store::new(8, KeyKind::Int).unwrap();
        assert!(matches!(
            store.insert(Key::str("cat"), 1),
            Err(TokenizerError::KeyTypeMismatch { .. })
        ));
        assert!(matches!(
            store.search(&Key::addr(0xdead)),
            Err(TokenizerError::KeyTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_growth_preserves_entries() {
        let store = Store::new(4, KeyKind::Int).unwrap();
        for k in 0..100 {
            assert_eq!(
                store.insert(Key::int(k), k * 10).unwrap(),
                InsertOutcome::Inserted
            );
        }
        assert_eq!(store.len(), 100);
        assert!(store.capacity() >= 100);
        for k in 0..100 {
            assert_eq!(store.search(&Key::int(k)).unwrap(), Some(k * 10));
        }
    }

    #[test]
    fn test_explicit_resize_preserves_entries() {
        let store = Store::new(64, KeyKind::Str).unwrap();
        for k in 0..32 {
            store.insert(Key::str(format!("k{k}")), k).unwrap();
        }

        store.resize(256).unwrap();
        assert_eq!(store.capacity(), 256);
        for k in 0..32 {
            assert_eq!(store.search(&Key::str(format!("k{k}"))).unwrap(), Some(k));
        }

        // Shrinking is a no-op
        store.resize(8).unwrap();
        assert_eq!(store.capacity(), 256);
    }

    #[test]
    fn test_upsert_sums() {
        let store = Store::new(8, KeyKind::Str).unwrap();
        store.upsert(Key::str("a b"), 2i64, |v| *v += 2).unwrap();
        store.upsert(Key::str("a b"), 5i64, |v| *v += 5).unwrap();
        assert_eq!(store.search(&Key::str("a b")).unwrap(), Some(7));
    }

    #[test]
    fn test_clear() {
        let store = Store::new(8, KeyKind::Addr).unwrap();
        store.insert(Key::addr(0x10), "x").unwrap();
        store.insert(Key::addr(0x20), "y").unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.search(&Key::addr(0x10)).unwrap(), None);
        assert_eq!(store.capacity(), 8);
    }

    #[test]
    fn test_snapshot_covers_all_entries() {
        let store = Store::new(16, KeyKind::Str).unwrap();
        for k in 0..10 {
            store.insert(Key::str(format!("k{k}")), k).unwrap();
        }
        let snap = store.snapshot().unwrap();
        assert_eq!(snap.len(), 10);
        // Mutating after the snapshot does not disturb the cursor
        store.delete(&Key::str("k0")).unwrap();
        assert_eq!(snap.len(), 10);
    }

    #[test]
    fn test_delete_preserves_probe_cluster() {
        // Force collisions with a tiny table that never grows past the
        // cluster under test
        let store = Store::new(32, KeyKind::Int).unwrap();
        let keys: Vec<i64> = (0..16).collect();
        for &k in &keys {
            store.insert(Key::int(k), k).unwrap();
        }
        store.delete(&Key::int(keys[3])).unwrap();
        for &k in &keys {
            if k == keys[3] {
                continue;
            }
            assert_eq!(store.search(&Key::int(k)).unwrap(), Some(k), "lost key {k}");
        }
    }

    #[test]
    fn test_matches_reference_model() {
        // Drive the store and a library map with the same operations and
        // compare observable state
        let store = Store::new(4, KeyKind::Str).unwrap();
        let mut model: AHashMap<String, i64> = AHashMap::new();

        for step in 0..500i64 {
            let key = format!("k{}", step % 73);
            match step % 3 {
                0 => {
                    if store.insert(Key::str(&key), step).unwrap() == InsertOutcome::Inserted {
                        model.insert(key, step);
                    }
                }
                1 => {
                    store.upsert(Key::str(&key), 1, |v| *v += 1).unwrap();
                    model.entry(key).and_modify(|v| *v += 1).or_insert(1);
                }
                _ => {
                    let deleted = store.delete(&Key::str(&key)).unwrap();
                    assert_eq!(deleted, model.remove(&key).is_some());
                }
            }
        }

        assert_eq!(store.len(), model.len());
        for (key, value) in &model {
            assert_eq!(store.search(&Key::str(key)).unwrap(), Some(*value));
        }
    }
}
