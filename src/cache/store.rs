//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the recency-ordered
//! `OrderList` and per-entry TTL expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::{Clock, Entry, NodeId, OrderList, SystemClock};
use crate::config::{Config, ExpiryPolicy};
use crate::error::{CacheError, Result};

// == TTL LRU Cache ==
/// Fixed-capacity cache with LRU eviction and TTL expiry.
///
/// Expired entries are never swept in the background. They keep their slot
/// until a `get` finds them, they are evicted as the least recently used,
/// or the caller runs [`purge_expired`](Self::purge_expired).
#[derive(Debug)]
pub struct TtlLruCache<K, V, C = SystemClock> {
    /// Recency-ordered entry storage
    list: OrderList<K, V>,
    /// Key -> node handle
    index: HashMap<K, NodeId>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied to new entries
    ttl: Duration,
    /// Deadline handling on overwrite
    policy: ExpiryPolicy,
    clock: C,
}

impl<K, V> TtlLruCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a cache backed by the system clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries; must be at least 1
    /// * `ttl` - Lifetime of each new entry
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Self::with_clock(capacity, ttl, SystemClock)
    }

    /// Creates a cache from a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.capacity, config.ttl())?.with_expiry_policy(config.expiry_policy))
    }
}

impl<K, V, C> TtlLruCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(capacity: usize, ttl: Duration, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        debug!(capacity, ttl_ms = ttl.as_millis() as u64, "cache created");
        Ok(Self {
            list: OrderList::new(),
            index: HashMap::new(),
            capacity,
            ttl,
            policy: ExpiryPolicy::default(),
            clock,
        })
    }

    /// Sets how overwrites treat an entry's deadline.
    pub fn with_expiry_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            trace!("cache miss");
            return None;
        };

        let now = self.clock.now();
        let expired = self.list.get(id).map_or(true, |entry| entry.is_expired(now));
        if expired {
            self.index.remove(key);
            self.list.remove(id);
            debug!(len = self.list.len(), "removed expired entry on read");
            return None;
        }

        self.list.move_to_head(id);
        trace!("cache hit");
        self.list.get(id).map(|entry| &entry.value)
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// An existing key has its value replaced in place and becomes most
    /// recently used; its deadline only moves under
    /// [`ExpiryPolicy::RefreshOnWrite`]. A new key evicts the least recently
    /// used entry first when the cache is full.
    pub fn put(&mut self, key: K, value: V) {
        let now = self.clock.now();

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
                if self.policy == ExpiryPolicy::RefreshOnWrite {
                    entry.refresh(now, self.ttl);
                }
            }
            self.list.move_to_head(id);
            trace!("cache overwrite");
            return;
        }

        if self.list.len() >= self.capacity {
            if let Some(evicted) = self.list.remove_tail() {
                self.index.remove(&evicted.key);
                debug!(
                    capacity = self.capacity,
                    "evicted least recently used entry"
                );
            }
        }

        let id = self
            .list
            .insert_at_head(Entry::new(key.clone(), value, now, self.ttl));
        self.index.insert(key, id);

        debug_assert!(self.list.len() <= self.capacity);
        debug_assert_eq!(self.index.len(), self.list.len());
    }

    // == Peek ==
    /// Retrieves a live value without changing recency order.
    ///
    /// Expired entries read as absent but stay in place.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).map(|entry| &entry.value)
    }

    // == Contains ==
    /// Checks if a live entry exists for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).is_some()
    }

    // == Time To Live ==
    /// Returns the time left before the key expires.
    ///
    /// Returns None if the key is missing or already expired.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.live_entry(key).map(|entry| entry.ttl_remaining(now))
    }

    // == Remove ==
    /// Removes an entry by key.
    ///
    /// Returns the value if the entry was still live. An expired entry is
    /// dropped and reported as absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        let entry = self.list.remove(id)?;

        if entry.is_expired(self.clock.now()) {
            None
        } else {
            Some(entry.value)
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let expired_keys: Vec<K> = self
            .list
            .iter()
            .filter(|entry| entry.is_expired(now))
            .map(|entry| entry.key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            if let Some(id) = self.index.remove(&key) {
                self.list.remove(id);
            }
        }

        if count > 0 {
            debug!(removed = count, len = self.list.len(), "purged expired entries");
        }
        count
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    // == Keys ==
    /// Returns keys from most to least recently used, expired ones included.
    pub fn keys(&self) -> Vec<K> {
        self.list.to_key_sequence()
    }

    // == Consistency Check ==
    /// Verifies the list structure and that index and list hold the same keys.
    pub fn is_consistent(&self) -> bool {
        self.list.is_consistent()
            && self.index.len() == self.list.len()
            && self.list.len() <= self.capacity
            && self
                .index
                .iter()
                .all(|(key, &id)| self.list.get(id).map_or(false, |entry| &entry.key == key))
    }

    fn live_entry<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.index
            .get(key)
            .and_then(|&id| self.list.get(id))
            .filter(|entry| !entry.is_expired(now))
    }
}

impl<K, V, C> TtlLruCache<K, V, C> {
    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// TTL given to new entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        self.policy
    }

    /// Read access to the underlying recency list.
    pub fn order_list(&self) -> &OrderList<K, V> {
        &self.list
    }
}
