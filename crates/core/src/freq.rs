//! Frequency tables over space-joined symbol keys.
//!
//! A `FreqTable` is the [`Store`] specialization the whole training
//! pipeline runs on: string key = a symbol sequence rendered as
//! space-joined tokens (e.g. `"c a t"`), value = occurrence count. The
//! same shape serves whole-word frequencies, symbol-sequence frequencies,
//! and adjacent-pair frequencies (where the key is exactly two symbols).

use compact_str::CompactString;

use crate::error::Result;
use crate::store::{Key, KeyKind, Store};

/// A string-keyed occurrence-count table.
#[derive(Debug)]
pub struct FreqTable {
    store: Store<i64>,
}

impl FreqTable {
    /// Create an empty table with `capacity` buckets.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            store: Store::new(capacity, KeyKind::Str)?,
        })
    }

    /// Add `delta` to the count for `key`, creating the entry if absent.
    pub fn add(&self, key: &str, delta: i64) -> Result<()> {
        self.store.upsert(Key::str(key), delta, |v| *v += delta)
    }

    /// Current count for `key`, if present.
    pub fn get(&self, key: &str) -> Result<Option<i64>> {
        self.store.search(&Key::str(key))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Bucket count of the backing store.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Snapshot of every `(key, count)` entry, in unspecified order.
    pub fn entries(&self) -> Result<Vec<(CompactString, i64)>> {
        Ok(self
            .store
            .snapshot()?
            .into_iter()
            .filter_map(|(key, count)| match key {
                Key::Str(s) => Some((s, count)),
                _ => None,
            })
            .collect())
    }

    /// Sum of all counts.
    pub fn total_mass(&self) -> Result<i64> {
        Ok(self.entries()?.iter().map(|(_, count)| count).sum())
    }

    /// Deep copy with the same entries and capacity.
    pub fn copy(&self) -> Result<Self> {
        let copy = Self::new(self.capacity().max(1))?;
        for (key, count) in self.entries()? {
            copy.add(&key, count)?;
        }
        Ok(copy)
    }
}
