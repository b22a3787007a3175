//! `SimpleLru` — a bounded, single-threaded LRU map keyed by byte strings.
//!
//! A doubly linked list (see [`crate::list`]) is threaded from `head` (most
//! recently used) to `tail` (least recently used); a [`HashMap`] indexes key
//! bytes to the list index holding that key's entry. All operations are
//! O(1) expected time: the index gives O(1) lookup, and [`crate::list::List`]
//! gives O(1) move-to-front, insert, and remove.
//!
//! `cur_size` is the exact sum of `|key| + |value|` over all live entries,
//! never an estimate of struct/allocator overhead — entries are evicted
//! from the LRU end only, until `cur_size <= max_size` again.

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::SimpleLruConfig;
use crate::entry::Entry;
use crate::list::List;

/// A bounded LRU map. Not thread-safe — see
/// [`crate::concurrent::thread_safe::ThreadSafeSimpleLru`] for a
/// single-mutex wrapper, and
/// [`crate::concurrent::striped::StripedLru`] for a sharded one.
pub struct SimpleLru<K, V> {
    max_size: u64,
    cur_size: u64,
    list: List<Entry<K, V>>,
    index: HashMap<K, usize>,
}

impl<K, V> SimpleLru<K, V>
where
    K: Eq + Hash + Clone + AsRef<[u8]>,
    V: Clone + AsRef<[u8]>,
{
    /// Creates an empty cache with the given byte budget.
    pub fn new(max_size: u64) -> Self {
        SimpleLru {
            max_size,
            cur_size: 0,
            list: List::new(),
            index: HashMap::new(),
        }
    }

    /// Creates an empty cache from a [`SimpleLruConfig`]. Equivalent to
    /// [`SimpleLru::new`] with `config.max_size` — there is no shard-count
    /// math to validate for a single in-process cache, so this never fails.
    pub fn from_config(config: SimpleLruConfig) -> Self {
        Self::new(config.max_size)
    }

    /// Current number of bytes held (`Σ |key| + |value|`).
    pub fn cur_size(&self) -> u64 {
        self.cur_size
    }

    /// The byte budget this cache was constructed with.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn fits(key: &K, value: &V, max_size: u64) -> bool {
        let size = key.as_ref().len() as u64 + value.as_ref().len() as u64;
        size <= max_size
    }

    /// Evicts from the tail until `cur_size <= max_size`. Never touches the
    /// head end and never evicts mid-list.
    fn evict_to_budget(&mut self) {
        while self.cur_size > self.max_size {
            let Some((_, evicted)) = self.list.remove_back() else {
                break;
            };
            self.cur_size -= evicted.byte_size();
            self.index.remove(&evicted.key);
        }
    }

    /// Inserts or replaces `key`'s value, moves it to head, and evicts from
    /// the tail as needed to respect the byte budget. Fails (no mutation)
    /// if `|key| + |value|` alone exceeds `max_size`.
    pub fn put(&mut self, key: K, value: V) -> bool {
        if !Self::fits(&key, &value, self.max_size) {
            return false;
        }
        if let Some(&idx) = self.index.get(&key) {
            let old_size = self.list.get(idx).byte_size();
            self.list.get_mut(idx).value = value;
            let new_size = self.list.get(idx).byte_size();
            self.cur_size = self.cur_size - old_size + new_size;
            self.list.move_to_front(idx);
        } else {
            let size = key.as_ref().len() as u64 + value.as_ref().len() as u64;
            let idx = self.list.push_front(Entry::new(key.clone(), value));
            self.index.insert(key, idx);
            self.cur_size += size;
        }
        self.evict_to_budget();
        true
    }

    /// Inserts only if `key` is absent. Returns whether it was inserted.
    pub fn put_if_absent(&mut self, key: K, value: V) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.put(key, value)
    }

    /// Updates `key`'s value only if it is already present, moving it to
    /// head. Returns whether `key` existed.
    pub fn set(&mut self, key: &K, value: V) -> bool {
        let Some(&idx) = self.index.get(key) else {
            return false;
        };
        if !Self::fits(key, &value, self.max_size) {
            return false;
        }
        let old_size = self.list.get(idx).byte_size();
        self.list.get_mut(idx).value = value;
        let new_size = self.list.get(idx).byte_size();
        self.cur_size = self.cur_size - old_size + new_size;
        self.list.move_to_front(idx);
        self.evict_to_budget();
        true
    }

    /// Removes `key`. Returns whether it was present.
    pub fn delete(&mut self, key: &K) -> bool {
        let Some(idx) = self.index.remove(key) else {
            return false;
        };
        let entry = self.list.remove(idx);
        self.cur_size -= entry.byte_size();
        true
    }

    /// Returns a clone of `key`'s value and moves it to head. `None` if
    /// absent.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let &idx = self.index.get(key)?;
        self.list.move_to_front(idx);
        Some(self.list.get(idx).value.clone())
    }

    /// Checks `index`/list consistency and the byte-accounting invariants.
    /// Intended for tests, not the hot path.
    #[cfg(test)]
    fn check_invariants(&self) {
        let indices = self.list.iter_indices();
        assert_eq!(indices.len(), self.index.len(), "index/list size mismatch");
        let mut total = 0u64;
        for &idx in &indices {
            let entry = self.list.get(idx);
            assert_eq!(self.index.get(&entry.key), Some(&idx), "key not indexed to its node");
            total += entry.byte_size();
        }
        assert_eq!(total, self.cur_size, "cur_size must equal summed entry sizes");
        assert!(self.cur_size <= self.max_size, "over budget");
        if self.index.is_empty() {
            assert_eq!(self.list.head(), None);
            assert_eq!(self.list.tail(), None);
        }
    }
}
