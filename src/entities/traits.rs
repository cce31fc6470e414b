//! Abstract interfaces to the scheduler's external collaborators.
//!
//! The scheduler core never reaches for global state: the target registry,
//! the composition store, the composition renderer and the GPU executor are
//! all injected at construction behind these traits, so the whole dispatch
//! path is testable with counting stubs.
//!
//! Implementations live in the host application (and in `bin/sim.rs` for
//! the headless simulator).

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use uuid::Uuid;

use super::comp::TimelineClip;
use super::layer::EvaluatedLayer;
use super::source::RenderSource;
use super::target::OutputTarget;

/// Settlement handle for one asynchronous composition preparation.
///
/// The preparing side sends exactly one `bool` (true = ready) when the
/// request settles. A dropped sender counts as failed settlement, so a
/// panicking or aborted preparation still clears the in-flight marker.
#[derive(Debug)]
pub struct PrepTicket {
    rx: Receiver<bool>,
}

impl PrepTicket {
    /// Ticket plus the sender that settles it.
    pub fn pair() -> (Sender<bool>, PrepTicket) {
        let (tx, rx) = bounded(1);
        (tx, PrepTicket { rx })
    }

    /// Already-settled ticket (for synchronous implementations and tests).
    pub fn resolved(ready: bool) -> PrepTicket {
        let (tx, ticket) = Self::pair();
        let _ = tx.send(ready);
        ticket
    }

    /// Non-blocking settlement probe.
    ///
    /// `Some(true)` = prepared, `Some(false)` = failed (retry allowed),
    /// `None` = still in flight.
    pub fn try_settle(&self) -> Option<bool> {
        match self.rx.try_recv() {
            Ok(ready) => Some(ready),
            Err(TryRecvError::Disconnected) => Some(false),
            Err(TryRecvError::Empty) => None,
        }
    }
}

/// Enumerates output targets and resolves their sources to comp ids.
///
/// Owns target lifecycle and the canvas/window handles; the scheduler only
/// reads the descriptors.
pub trait TargetRegistry: Send + Sync {
    /// All targets currently known to the registry.
    fn targets(&self) -> Vec<OutputTarget>;

    /// Single target by uuid, None once destroyed.
    fn target(&self, uuid: Uuid) -> Option<OutputTarget>;

    /// Resolve a source to the comp it currently denotes.
    ///
    /// None is a valid answer (empty slot, dangling layer reference) and
    /// means "show an empty frame", not an error.
    fn resolve_source(&self, source: &RenderSource) -> Option<Uuid>;
}

/// Read access to the composition/timeline store.
pub trait CompStore: Send + Sync {
    /// Comp currently active in the editor, if any.
    fn active_comp(&self) -> Option<Uuid>;

    /// Main-timeline playhead (seconds).
    fn main_playhead(&self) -> f64;

    /// Clips on the main timeline.
    fn main_clips(&self) -> Vec<TimelineClip>;

    /// Persisted playhead of `comp`, if it has one.
    fn comp_playhead(&self, comp: Uuid) -> Option<f64>;

    /// Clips on `comp`'s own timeline. Empty for unknown comps.
    fn comp_clips(&self, comp: Uuid) -> Vec<TimelineClip>;
}

/// Composition evaluation and preparation.
pub trait CompRenderer: Send + Sync {
    /// Kick off asynchronous preparation of `comp` (decode warm-up, texture
    /// upload, whatever the implementation needs). Fire-and-forget: the
    /// scheduler only observes settlement through the returned ticket.
    fn prepare(&self, comp: Uuid) -> PrepTicket;

    /// Whether `comp` can be evaluated right now.
    fn is_ready(&self, comp: Uuid) -> bool;

    /// Evaluate `comp`'s layers at a comp-local time, in stacking order.
    fn evaluate(&self, comp: Uuid, seconds: f64) -> anyhow::Result<Vec<EvaluatedLayer>>;
}

/// GPU-side output operations.
pub trait GpuExecutor: Send + Sync {
    /// Draw an evaluated layer list into the target's surface.
    fn render_to_canvas(&self, target: Uuid, layers: &[EvaluatedLayer]) -> anyhow::Result<()>;

    /// Present an empty/black frame on the target's surface.
    fn render_empty(&self, target: Uuid) -> anyhow::Result<()>;

    /// Copy the already-rendered texture of a nested comp into the target.
    /// Returns false when no such texture is available this frame.
    fn copy_nested_texture(&self, target: Uuid, comp: Uuid) -> bool;

    /// True while an export is running; the scheduler stays fully idle.
    fn is_exporting(&self) -> bool;
}

// Blanket impls so hosts can hand out Arc<Concrete> directly.

impl<T: TargetRegistry + ?Sized> TargetRegistry for Arc<T> {
    fn targets(&self) -> Vec<OutputTarget> {
        (**self).targets()
    }

    fn target(&self, uuid: Uuid) -> Option<OutputTarget> {
        (**self).target(uuid)
    }

    fn resolve_source(&self, source: &RenderSource) -> Option<Uuid> {
        (**self).resolve_source(source)
    }
}

impl<T: CompStore + ?Sized> CompStore for Arc<T> {
    fn active_comp(&self) -> Option<Uuid> {
        (**self).active_comp()
    }

    fn main_playhead(&self) -> f64 {
        (**self).main_playhead()
    }

    fn main_clips(&self) -> Vec<TimelineClip> {
        (**self).main_clips()
    }

    fn comp_playhead(&self, comp: Uuid) -> Option<f64> {
        (**self).comp_playhead(comp)
    }

    fn comp_clips(&self, comp: Uuid) -> Vec<TimelineClip> {
        (**self).comp_clips(comp)
    }
}

impl<T: CompRenderer + ?Sized> CompRenderer for Arc<T> {
    fn prepare(&self, comp: Uuid) -> PrepTicket {
        (**self).prepare(comp)
    }

    fn is_ready(&self, comp: Uuid) -> bool {
        (**self).is_ready(comp)
    }

    fn evaluate(&self, comp: Uuid, seconds: f64) -> anyhow::Result<Vec<EvaluatedLayer>> {
        (**self).evaluate(comp, seconds)
    }
}

impl<T: GpuExecutor + ?Sized> GpuExecutor for Arc<T> {
    fn render_to_canvas(&self, target: Uuid, layers: &[EvaluatedLayer]) -> anyhow::Result<()> {
        (**self).render_to_canvas(target, layers)
    }

    fn render_empty(&self, target: Uuid) -> anyhow::Result<()> {
        (**self).render_empty(target)
    }

    fn copy_nested_texture(&self, target: Uuid, comp: Uuid) -> bool {
        (**self).copy_nested_texture(target, comp)
    }

    fn is_exporting(&self) -> bool {
        (**self).is_exporting()
    }
}
