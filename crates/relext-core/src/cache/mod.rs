//! Module: cache
//! Responsibility: tagged, TTL-bounded memoization of identity lookups.
//! Does not own: eviction triggers; callers invalidate tags when the
//! underlying entity changes.
//!
//! Invariants:
//! - A stored entry is returned only while `now < expires_at`; a TTL past
//!   the clock's range never expires.
//! - Every stored entry is reachable from each of its tags in the tag index.
//! - At most one computation runs per key at a time.
//! - Failed computations are never stored.
//! - A computation overlapping any invalidation is returned but not stored.

mod clock;
mod key;


pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{CacheKey, CacheTag};

use crate::{
    config::CacheConfig,
    obs::sink::{self, CacheKeyspace, MetricsEvent},
};
use parking_lot::{Mutex, RwLock};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::trace;

///
/// CacheEntry
///
/// Freshly computed value plus the invalidation tags it should be filed under.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub tags: Vec<CacheTag>,
}

impl<V> CacheEntry<V> {
    #[must_use]
    pub const fn new(value: V) -> Self {
        Self {
            value,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: CacheTag) -> Self {
        self.tags.push(tag);
        self
    }
}

struct StoredEntry<V> {
    value: V,
    tags: Vec<CacheTag>,
    expires_at: Option<Instant>,
}

impl<V> StoredEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

struct CacheState<V> {
    entries: HashMap<CacheKey, StoredEntry<V>>,
    tag_index: HashMap<CacheTag, HashSet<CacheKey>>,
    // bumped by every invalidation
    generation: u64,
}

impl<V> Default for CacheState<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            tag_index: HashMap::new(),
            generation: 0,
        }
    }
}

impl<V> CacheState<V> {
    fn remove(&mut self, key: &CacheKey) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };

        for tag in &entry.tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }

        true
    }
}

///
/// TaggedCache
///
/// Process-wide, read-mostly cache shared by identity resolvers.
/// Reads take a shared lock; a miss serializes on a per-key flight slot,
/// re-checks, then computes and files the value under its tags.
///

pub struct TaggedCache<V> {
    state: RwLock<CacheState<V>>,
    inflight: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
    clock: Arc<dyn Clock>,
    enabled: bool,
}

impl<V: Clone> TaggedCache<V> {
    /// Create an enabled cache driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            inflight: Mutex::new(HashMap::new()),
            clock,
            enabled: true,
        }
    }

    /// Create a pass-through cache that computes on every call.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Create a cache honouring the `cache.enabled` switch.
    #[must_use]
    pub fn for_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new()
        } else {
            Self::disabled()
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_compute<E, F>(&self, key: &CacheKey, ttl: Duration, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<CacheEntry<V>, E>,
    {
        if !self.enabled {
            return compute().map(|entry| entry.value);
        }

        let keyspace = key.keyspace();

        // Phase 1: shared-lock fast path.
        if let Some(value) = self.get(key) {
            sink::record(MetricsEvent::CacheHit { keyspace });
            trace!(key = %key, "cache hit");
            return Ok(value);
        }

        // Phase 2: single flight per key, then re-check.
        let slot = Arc::clone(self.inflight.lock().entry(key.clone()).or_default());
        let result = {
            let _flight = slot.lock();
            let generation = self.state.read().generation;

            if let Some(value) = self.get(key) {
                sink::record(MetricsEvent::CacheHit { keyspace });
                trace!(key = %key, "cache hit after wait");
                Ok(value)
            } else {
                sink::record(MetricsEvent::CacheMiss { keyspace });
                trace!(key = %key, "cache miss");
                compute().map(|entry| self.store(key, ttl, entry, generation))
            }
        };

        self.release_slot(key, &slot);

        result
    }

    /// Return a live entry without computing.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now();
        let state = self.state.read();

        state
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Evict every entry filed under `tag`; returns the number evicted.
    pub fn invalidate_tag(&self, tag: &CacheTag) -> usize {
        let mut state = self.state.write();
        state.generation = state.generation.wrapping_add(1);
        let Some(keys) = state.tag_index.remove(tag) else {
            return 0;
        };

        let evicted = keys.iter().filter(|key| state.remove(key)).count();
        drop(state);

        record_evicted(evicted);
        trace!(tag = %tag, evicted, "cache tag invalidated");

        evicted
    }

    /// Evict a single key; returns whether an entry was present.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut state = self.state.write();
        state.generation = state.generation.wrapping_add(1);
        let removed = state.remove(key);
        drop(state);

        if removed {
            record_evicted(1);
        }

        removed
    }

    /// Drop entries whose TTL has elapsed; returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.state.write();
        let expired: Vec<CacheKey> = state
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();

        let purged = expired.iter().filter(|key| state.remove(key)).count();
        drop(state);
        record_evicted(purged);

        purged
    }

    /// Remove every entry and tag.
    pub fn clear(&self) {
        let mut state = self.state.write();
        let evicted = state.entries.len();
        let generation = state.generation.wrapping_add(1);
        *state = CacheState {
            generation,
            ..CacheState::default()
        };
        drop(state);

        record_evicted(evicted);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self, key: &CacheKey, ttl: Duration, entry: CacheEntry<V>, generation: u64) -> V {
        let expires_at = self.clock.now().checked_add(ttl);
        let mut state = self.state.write();

        if state.generation != generation {
            trace!(key = %key, "invalidated during compute, not stored");
            return entry.value;
        }

        // Replacing a stale entry must also drop its old tag filings.
        state.remove(key);
        for tag in &entry.tags {
            state
                .tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        state.entries.insert(
            key.clone(),
            StoredEntry {
                value: entry.value.clone(),
                tags: entry.tags,
                expires_at,
            },
        );

        entry.value
    }

    fn release_slot(&self, key: &CacheKey, slot: &Arc<Mutex<()>>) {
        let mut inflight = self.inflight.lock();
        if inflight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            inflight.remove(key);
        }
    }
}

impl<V: Clone> Default for TaggedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn record_evicted(entries: usize) {
    if entries > 0 {
        sink::record(MetricsEvent::CacheEvicted {
            entries: entries as u64,
        });
    }
}

impl CacheKey {
    fn keyspace(&self) -> CacheKeyspace {
        if self.starts_with(key::RELATIONSHIP_NAME_PREFIX) {
            CacheKeyspace::RelationshipName
        } else {
            CacheKeyspace::OwnerKey
        }
    }
}
