//! Composition and timeline clip types.
//!
//! **Architecture**: `Comp` is a lightweight descriptor of a sub-timeline:
//! a persisted playhead plus the clips placed on it. Layer pixel content,
//! effects and blending live behind the `CompRenderer` interface; the
//! scheduler only needs clip placement timing.
//!
//! # Coordinate Systems
//!
//! All times are seconds (f64):
//! - `start_time` / `duration` - where a clip sits in its PARENT timeline
//! - `in_point` / `out_point` - the window into the clip's SOURCE timeline
//!
//! A clip occupies the half-open interval `[start_time, end_time)` of its
//! parent. Mapping parent time t inside that interval into the source is
//! `(t - start_time) + in_point`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single clip placement on a timeline.
///
/// `comp: Some(uuid)` marks a composition clip (a nested sub-timeline);
/// `None` is plain media, which the scheduler never needs to look inside.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineClip {
    /// Unique ID for this specific placement
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Start position in the parent timeline (seconds)
    pub start_time: f64,

    /// Occupied length in the parent timeline (seconds)
    pub duration: f64,

    /// Source-side window start (seconds)
    pub in_point: f64,

    /// Source-side window end (seconds)
    pub out_point: f64,

    /// Source comp for composition clips, None for media clips
    #[serde(default)]
    pub comp: Option<Uuid>,
}

impl TimelineClip {
    /// Media clip (no nested comp).
    pub fn media(name: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            start_time,
            duration,
            in_point: 0.0,
            out_point: duration,
            comp: None,
        }
    }

    /// Composition clip referencing `comp`.
    pub fn composition(
        name: impl Into<String>,
        comp: Uuid,
        start_time: f64,
        duration: f64,
        in_point: f64,
        out_point: f64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            start_time,
            duration,
            in_point,
            out_point,
            comp: Some(comp),
        }
    }

    pub fn is_composition(&self) -> bool {
        self.comp.is_some()
    }

    /// End position in the parent timeline (exclusive).
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Half-open containment test: [start_time, end_time).
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }
}

/// Derived fact: "comp C currently appears as clip X on the main timeline".
///
/// Snapshot of the clip's placement at lookup time; cached and bulk-expired
/// by `NestedCompCache` rather than tracked per entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NestedCompInfo {
    /// The main-timeline clip this comp is placed as
    pub clip: Uuid,
    pub start_time: f64,
    pub duration: f64,
    pub in_point: f64,
    pub out_point: f64,
}

impl NestedCompInfo {
    pub fn from_clip(clip: &TimelineClip) -> Self {
        Self {
            clip: clip.uuid,
            start_time: clip.start_time,
            duration: clip.duration,
            in_point: clip.in_point,
            out_point: clip.out_point,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Half-open containment test: [start_time, end_time).
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }
}

/// Composition: a nested, independently-timed group of layers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comp {
    /// Stable identifier inside Project
    pub uuid: Uuid,

    /// Human-readable name
    pub name: String,

    /// Persisted playhead position (seconds), if the comp has ever been
    /// scrubbed or played on its own
    #[serde(default)]
    pub playhead: Option<f64>,

    /// Clips placed on this comp's own timeline
    #[serde(default)]
    pub clips: Vec<TimelineClip>,
}

impl Comp {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            playhead: None,
            clips: Vec::new(),
        }
    }

    /// First clip on this comp's timeline that nests `comp`, if any.
    pub fn find_comp_clip(&self, comp: Uuid) -> Option<&TimelineClip> {
        self.clips.iter().find(|c| c.comp == Some(comp))
    }
}
