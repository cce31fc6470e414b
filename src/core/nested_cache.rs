//! Time-bounded cache answering "is comp C placed as a clip on the main
//! timeline, and where?"
//!
//! **Why**: Many targets share one tick, and each may ask about the same
//! comp. Scanning the main clip list once per (comp, TTL window) instead of
//! once per target amortizes the lookup across the whole tick.
//!
//! **Used by**: OutputScheduler (texture-reuse check), playhead resolution.
//!
//! # Invalidation
//!
//! The whole cache is cleared in one shot when its age reaches the TTL
//! (100 ms default), never per entry. Hosts that know clip data changed can
//! also clear it explicitly via the scheduler's `invalidate_nested_cache`.
//!
//! # Tri-state entries
//!
//! A looked-up-and-absent comp is as cacheable as a hit, so entries are
//! `Option<NestedCompInfo>` behind the map: key missing = never looked up,
//! `Some(info)` = nested, `None` = known not nested.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::trace;
use uuid::Uuid;

use crate::entities::traits::CompStore;
use crate::entities::NestedCompInfo;

/// Default time-to-live for the whole cache.
pub const DEFAULT_NESTED_TTL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct NestedCompCache {
    entries: HashMap<Uuid, Option<NestedCompInfo>>,
    last_clear: Instant,
    ttl: Duration,
}

impl NestedCompCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            last_clear: Instant::now(),
            ttl,
        }
    }

    /// Placement of `comp` on the main timeline, scanning at most once per
    /// TTL window.
    pub fn get(&mut self, store: &dyn CompStore, comp: Uuid) -> Option<NestedCompInfo> {
        if let Some(cached) = self.entries.get(&comp) {
            return *cached;
        }

        let found = store
            .main_clips()
            .iter()
            .find(|clip| clip.comp == Some(comp))
            .map(NestedCompInfo::from_clip);

        trace!(
            "Nested lookup for {}: {}",
            comp,
            if found.is_some() { "nested" } else { "not nested" }
        );
        self.entries.insert(comp, found);
        found
    }

    /// Clear everything once the cache age reaches the TTL.
    /// Returns true when a clear happened.
    pub fn maybe_expire(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_clear) < self.ttl {
            return false;
        }
        self.invalidate_at(now);
        true
    }

    /// Unconditional clear (clip data changed).
    pub fn invalidate(&mut self) {
        self.invalidate_at(Instant::now());
    }

    fn invalidate_at(&mut self, now: Instant) {
        if !self.entries.is_empty() {
            trace!("Nested cache cleared ({} entries)", self.entries.len());
        }
        self.entries.clear();
        self.last_clear = now;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for NestedCompCache {
    fn default() -> Self {
        Self::new(DEFAULT_NESTED_TTL)
    }
}
