//! `ThreadSafeSimpleLru` — one mutex around one [`SimpleLru`].

use std::hash::Hash;

use parking_lot::Mutex;

use crate::simple_lru::SimpleLru;

/// Wraps a [`SimpleLru`] behind a single [`parking_lot::Mutex`]. Each public
/// method acquires the mutex for its full duration and releases it on every
/// path, including early returns — there is no finer-grained locking, so
/// operations on this shard are fully serialized.
pub struct ThreadSafeSimpleLru<K, V> {
    inner: Mutex<SimpleLru<K, V>>,
}

impl<K, V> ThreadSafeSimpleLru<K, V>
where
    K: Eq + Hash + Clone + AsRef<[u8]>,
    V: Clone + AsRef<[u8]>,
{
    pub fn new(max_size: u64) -> Self {
        ThreadSafeSimpleLru {
            inner: Mutex::new(SimpleLru::new(max_size)),
        }
    }

    pub fn put(&self, key: K, value: V) -> bool {
        self.inner.lock().put(key, value)
    }

    pub fn put_if_absent(&self, key: K, value: V) -> bool {
        self.inner.lock().put_if_absent(key, value)
    }

    pub fn set(&self, key: &K, value: V) -> bool {
        self.inner.lock().set(key, value)
    }

    pub fn delete(&self, key: &K) -> bool {
        self.inner.lock().delete(key)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key)
    }

    pub fn cur_size(&self) -> u64 {
        self.inner.lock().cur_size()
    }

    pub fn max_size(&self) -> u64 {
        self.inner.lock().max_size()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
