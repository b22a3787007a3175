//! The polymorphic storage handle consumed by the network layer.
//!
//! One trait lets the server drive `StripedLru`, `ThreadSafeSimpleLru`, or
//! (in tests) a bare `SimpleLru` behind a single interface. `append` is not
//! part of this trait: the wire protocol's `append` command is a
//! read-modify-write composed from `get` + `set` at the protocol dispatch
//! layer, since the storage contract only covers put/put_if_absent/set/
//! delete/get.

use crate::concurrent::{StripedLru, ThreadSafeSimpleLru};

/// Safe to call from any thread; every implementor here serializes through
/// at least one mutex internally.
pub trait Storage: Send + Sync {
    fn put(&self, key: &[u8], value: &[u8]) -> bool;
    fn put_if_absent(&self, key: &[u8], value: &[u8]) -> bool;
    fn set(&self, key: &[u8], value: &[u8]) -> bool;
    fn delete(&self, key: &[u8]) -> bool;
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
}

impl Storage for StripedLru<Vec<u8>, Vec<u8>> {
    fn put(&self, key: &[u8], value: &[u8]) -> bool {
        StripedLru::put(self, key.to_vec(), value.to_vec())
    }

    fn put_if_absent(&self, key: &[u8], value: &[u8]) -> bool {
        StripedLru::put_if_absent(self, key.to_vec(), value.to_vec())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> bool {
        StripedLru::set(self, &key.to_vec(), value.to_vec())
    }

    fn delete(&self, key: &[u8]) -> bool {
        StripedLru::delete(self, &key.to_vec())
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        StripedLru::get(self, &key.to_vec())
    }
}

impl Storage for ThreadSafeSimpleLru<Vec<u8>, Vec<u8>> {
    fn put(&self, key: &[u8], value: &[u8]) -> bool {
        ThreadSafeSimpleLru::put(self, key.to_vec(), value.to_vec())
    }

    fn put_if_absent(&self, key: &[u8], value: &[u8]) -> bool {
        ThreadSafeSimpleLru::put_if_absent(self, key.to_vec(), value.to_vec())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> bool {
        ThreadSafeSimpleLru::set(self, &key.to_vec(), value.to_vec())
    }

    fn delete(&self, key: &[u8]) -> bool {
        ThreadSafeSimpleLru::delete(self, &key.to_vec())
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        ThreadSafeSimpleLru::get(self, &key.to_vec())
    }
}

/// Executes one parsed [`crate::protocol::Command`] against `storage`,
/// producing the reply the wire protocol defines for it. `append` is
/// composed here from `get` + `set`.
pub fn dispatch(storage: &dyn Storage, command: crate::protocol::Command) -> crate::protocol::Reply {
    use crate::protocol::{Command, Reply};

    match command {
        Command::Set { key, value, .. } => {
            storage.put(&key, &value);
            Reply::Stored
        }
        Command::Add { key, value, .. } => {
            if storage.put_if_absent(&key, &value) {
                Reply::Stored
            } else {
                Reply::NotStored
            }
        }
        Command::Replace { key, value, .. } => {
            if storage.set(&key, &value) {
                Reply::Stored
            } else {
                Reply::NotStored
            }
        }
        Command::Append { key, value, .. } => match storage.get(&key) {
            Some(mut existing) => {
                existing.extend_from_slice(&value);
                if storage.set(&key, &existing) {
                    Reply::Stored
                } else {
                    Reply::NotStored
                }
            }
            None => Reply::NotStored,
        },
        Command::Get { keys } => {
            let values = keys
                .into_iter()
                .filter_map(|key| storage.get(&key).map(|value| (key, 0u32, value)))
                .collect();
            Reply::Values(values)
        }
        Command::Delete { key } => {
            if storage.delete(&key) {
                Reply::Deleted
            } else {
                Reply::NotFound
            }
        }
    }
}
