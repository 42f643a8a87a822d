//! Generic fixed-capacity cache with recency ordering.
//!
//! A bounded ordered map: entries live in a deque ordered most-recently-used
//! first, addressed by tag with a linear scan. Linear lookup is deliberate;
//! the store stays small (about a thousand entries) next to the cost of the
//! disk or network fetch a hit avoids.
//!
//! Eviction is two-phase by design: the cache never destroys an entry on
//! insert. When full, the caller pops the least-recently-used entry with
//! [`LruCache::get_back`] and decides its fate before inserting.

use super::CacheError;
use std::collections::VecDeque;

/// Fixed-capacity, tag-addressed, recency-ordered store.
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Entries, most-recently-used at the front.
    list: VecDeque<(K, V)>,
    capacity: usize,
}

impl<K: PartialEq, V> LruCache<K, V> {
    /// Create an empty cache bounded at `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Look up an entry by tag, promoting it to most-recently-used on a hit.
    pub fn get(&mut self, tag: &K) -> Option<&V> {
        let index = self.list.iter().position(|(t, _)| t == tag)?;

        if index != 0 {
            let entry = self.list.remove(index).unwrap();
            self.list.push_front(entry);
        }

        self.list.front().map(|(_, item)| item)
    }

    /// Insert an entry at the most-recently-used position.
    ///
    /// The caller must make room first: inserting into a full cache, or
    /// re-inserting a tag already present, is a programming error. Both are
    /// reported rather than silently overwriting.
    pub fn put_front(&mut self, tag: K, item: V) -> Result<(), CacheError> {
        debug_assert!(!self.is_full(), "insert into full cache");
        debug_assert!(!self.contains(&tag), "duplicate cache tag");

        if self.is_full() {
            return Err(CacheError::Full {
                capacity: self.capacity,
            });
        }
        if self.contains(&tag) {
            return Err(CacheError::DuplicateTag);
        }

        self.list.push_front((tag, item));
        Ok(())
    }

    /// Remove and return the least-recently-used entry.
    pub fn get_back(&mut self) -> Option<(K, V)> {
        self.list.pop_back()
    }

    /// Whether a tag is present, without promoting it.
    pub fn contains(&self, tag: &K) -> bool {
        self.list.iter().any(|(t, _)| t == tag)
    }

    /// Whether the cache has reached capacity.
    pub fn is_full(&self) -> bool {
        self.list.len() >= self.capacity
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Remove and yield every entry, most-recently-used first.
    pub fn drain(&mut self) -> impl Iterator<Item = (K, V)> + '_ {
        self.list.drain(..)
    }
}
