//! Playhead time resolution: main-timeline time to comp-local time.
//!
//! A target showing comp C needs C's local time for evaluation, but the
//! only authoritative clock is the main-timeline playhead. Four cases, in
//! strict order, each falling through only when its data is absent:
//!
//! 1. **Nested**: C is placed as a clip on the main timeline. Local time is
//!    the playhead mapped through the clip window, clamped to the in point
//!    before the clip and the out point from the clip end on. This case
//!    always returns once nested info exists, even outside the clip.
//! 2. **Reverse-nested**: the active comp is placed as a clip inside C, so
//!    C's time is inferred by inverting that placement.
//! 3. **Stored**: C's own persisted playhead, verbatim.
//! 4. **Default**: 0.0.
//!
//! No case errors; the chain is total.

use log::trace;
use uuid::Uuid;

use super::nested_cache::NestedCompCache;
use crate::entities::traits::CompStore;

/// Which rule produced the resolved time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncSource {
    Nested,
    ReverseNested,
    Stored,
    Default,
}

impl SyncSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncSource::Nested => "nested",
            SyncSource::ReverseNested => "reverse-nested",
            SyncSource::Stored => "stored",
            SyncSource::Default => "default",
        }
    }
}

/// Comp-local time plus the rule that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedTime {
    pub seconds: f64,
    pub source: SyncSource,
}

/// Resolve the local time of `comp` against the current main playhead.
pub fn resolve(
    store: &dyn CompStore,
    nested_cache: &mut NestedCompCache,
    comp: Uuid,
) -> ResolvedTime {
    let main_playhead = store.main_playhead();

    // Case 1: comp is nested on the main timeline
    if let Some(info) = nested_cache.get(store, comp) {
        let seconds = if info.contains(main_playhead) {
            (main_playhead - info.start_time) + info.in_point
        } else if main_playhead < info.start_time {
            info.in_point
        } else {
            info.out_point
        };
        trace!("Playhead for {}: {:.3}s (nested)", comp, seconds);
        return ResolvedTime {
            seconds,
            source: SyncSource::Nested,
        };
    }

    // Case 2: the active comp is nested inside this comp
    if let Some(active) = store.active_comp() {
        if active != comp {
            if let Some(child) = store
                .comp_clips(comp)
                .iter()
                .find(|clip| clip.comp == Some(active))
            {
                let seconds = child.start_time + (main_playhead - child.in_point);
                trace!("Playhead for {}: {:.3}s (reverse-nested)", comp, seconds);
                return ResolvedTime {
                    seconds,
                    source: SyncSource::ReverseNested,
                };
            }
        }
    }

    // Case 3: the comp's own persisted playhead
    if let Some(stored) = store.comp_playhead(comp) {
        return ResolvedTime {
            seconds: stored,
            source: SyncSource::Stored,
        };
    }

    // Case 4: nothing known
    ResolvedTime {
        seconds: 0.0,
        source: SyncSource::Default,
    }
}
