//! TTL-LRU - A fixed-capacity in-memory cache
//!
//! Combines least-recently-used eviction with per-entry time-based expiry.
//! Both `get` and `put` run in O(1) amortized time.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Clock, Entry, ManualClock, NodeId, OrderList, SystemClock, TtlLruCache};
pub use config::{Config, ExpiryPolicy};
pub use error::{CacheError, Result};
