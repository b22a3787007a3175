//! Thread-safe wrappers around [`crate::simple_lru::SimpleLru`].
//!
//! [`thread_safe::ThreadSafeSimpleLru`] (C2) adds one mutex around a whole
//! `SimpleLru`. [`striped::StripedLru`] (C3) shards keys across many
//! `ThreadSafeSimpleLru` instances so unrelated keys don't contend on the
//! same lock — the "shared segment" pattern.

pub mod striped;
pub mod thread_safe;

pub use striped::StripedLru;
pub use thread_safe::ThreadSafeSimpleLru;
