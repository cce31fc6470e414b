//! Deduplication of asynchronous composition preparation.
//!
//! Preparation (decode warm-up, texture upload) is expensive and fire-and-
//! forget, so the tracker guarantees at most one outstanding request per
//! comp: an in-flight marker blocks re-requests until the ticket settles.
//!
//! **Used by**: OutputScheduler, on registration and whenever a target's
//! comp reports not-ready during dispatch.
//!
//! Settlement is observed by polling once per tick. A failed settlement
//! (explicit false or dropped sender) clears the marker, so the next
//! dispatch that still needs the comp retries cleanly.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use uuid::Uuid;

use crate::entities::traits::{CompRenderer, PrepTicket};

#[derive(Debug, Default)]
pub struct PrepTracker {
    inflight: HashMap<Uuid, PrepTicket>,
    prepared: HashSet<Uuid>,
}

impl PrepTracker {
    /// Request preparation of `comp` unless already prepared or in flight.
    pub fn ensure_prepared(&mut self, renderer: &dyn CompRenderer, comp: Uuid) {
        if self.prepared.contains(&comp) || self.inflight.contains_key(&comp) {
            return;
        }
        debug!("Prep requested for {}", comp);
        self.inflight.insert(comp, renderer.prepare(comp));
    }

    /// Drain settled tickets. Call once per tick.
    pub fn poll(&mut self) {
        self.inflight.retain(|comp, ticket| match ticket.try_settle() {
            Some(true) => {
                debug!("Prep settled for {}", comp);
                self.prepared.insert(*comp);
                false
            }
            Some(false) => {
                warn!("Prep failed for {}, will retry on next request", comp);
                false
            }
            None => true,
        });
    }

    pub fn is_prepared(&self, comp: Uuid) -> bool {
        self.prepared.contains(&comp)
    }

    pub fn is_inflight(&self, comp: Uuid) -> bool {
        self.inflight.contains_key(&comp)
    }

    /// Forget everything, e.g. when the renderer's caches were dropped.
    pub fn clear(&mut self) {
        self.inflight.clear();
        self.prepared.clear();
    }
}
