//! Cache Module
//!
//! Provides an in-memory cache with TTL expiration and LRU eviction, built on
//! an arena-backed doubly linked list and a hash index.

mod clock;
mod entry;
mod order_list;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::Entry;
pub use order_list::{Iter, NodeId, OrderList};
pub use store::TtlLruCache;
