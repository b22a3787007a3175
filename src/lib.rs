//! An in-memory, text-protocol key-value cache server in the memcached
//! family.
//!
//! Clients open TCP connections, send textual commands (`set`, `add`,
//! `replace`, `append`, `get`, `delete`) with optional payloads, and get
//! textual replies back. Data lives entirely in RAM under a bounded byte
//! budget; the least-recently-used entries are evicted once that budget is
//! exceeded.
//!
//! # Architecture
//!
//! ```text
//! network (TCP, blocking) ──▶ protocol::read_command ──▶ storage::dispatch
//!                                                               │
//!                                                               ▼
//!                                                         StripedLru
//!                                                     (route by key hash)
//!                                                               │
//!                                                               ▼
//!                                                    ThreadSafeSimpleLru
//!                                                      (one mutex/shard)
//!                                                               │
//!                                                               ▼
//!                                                          SimpleLru
//!                                                 (arena-backed LRU list)
//! ```
//!
//! Connection handling is dispatched onto an [`executor::Executor`], an
//! independent dynamically sized worker pool — it does not know about the
//! cache and the cache does not know about it.
//!
//! # Crate layout
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`entry`], [`list`] | the arena-backed doubly linked list a `SimpleLru` threads its recency order through |
//! | [`simple_lru`] | the single-threaded bounded LRU map |
//! | [`concurrent`] | the mutex-per-shard and hash-striped wrappers around it |
//! | [`executor`] | the dynamic worker pool |
//! | [`config`], [`error`] | construction parameters and the one fallible error kind |
//! | [`protocol`], [`storage`], [`server`] | the reproduced wire protocol and TCP server (external collaborators, kept thin) |

mod entry;
mod list;

pub mod concurrent;
pub mod config;
pub mod error;
pub mod executor;
pub mod protocol;
pub mod server;
pub mod simple_lru;
pub mod storage;

pub use concurrent::{StripedLru, ThreadSafeSimpleLru};
pub use config::{ExecutorConfig, SimpleLruConfig, StripedLruConfig};
pub use error::ConfigError;
pub use executor::Executor;
pub use simple_lru::SimpleLru;
pub use storage::Storage;
