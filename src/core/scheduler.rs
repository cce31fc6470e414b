//! OutputScheduler: one shared tick deciding what every output target shows.
//!
//! **Architecture**: the scheduler owns no timeline data and no GPU state.
//! Four injected collaborators do the real work (`TargetRegistry`,
//! `CompStore`, `CompRenderer`, `GpuExecutor`); the scheduler is the policy
//! layer that sequences them once per display frame.
//!
//! A tick is throttled to `min_tick_interval` (14 ms default, just under
//! 60 Hz so a vsync-driven host never skips a beat), then:
//!
//! 1. settled preparations are drained,
//! 2. the nested-comp cache is age-checked,
//! 3. if an export is running the tick ends here,
//! 4. otherwise every registered target is dispatched in registration
//!    order, each isolated from the others' failures.
//!
//! Per-target dispatch outcomes are reported as `Dispatch` values so hosts
//! and tests can observe the decision without scraping logs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexSet;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::nested_cache::{NestedCompCache, DEFAULT_NESTED_TTL};
use super::playhead::{self, ResolvedTime};
use super::prep_tracker::PrepTracker;
use crate::entities::traits::{CompRenderer, CompStore, GpuExecutor, TargetRegistry};
use crate::entities::{EvaluatedLayer, OutputTarget, RenderSource};

/// Tuning knobs, all optional in serialized form.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Minimum interval between ticks.
    pub min_tick_interval: Duration,

    /// Time-to-live of the nested-comp placement cache.
    pub nested_cache_ttl: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_tick_interval: Duration::from_millis(14),
            nested_cache_ttl: DEFAULT_NESTED_TTL,
        }
    }
}

/// What a single target ended up doing this tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch {
    /// Target is registered but disabled.
    SkipDisabled,
    /// Target shows the active comp; the editor canvas already renders it.
    SkipActive,
    /// Source resolved to nothing; an empty frame was presented.
    EmptyFrame,
    /// The comp's texture was already rendered this frame and got copied.
    ReuseTexture,
    /// Comp not ready; preparation requested, nothing drawn.
    Deferred,
    /// Evaluation produced no visible layers; the previous frame stays.
    NoLayers,
    /// Layers were rendered into the target's surface.
    Rendered {
        /// Comp-local time the layers were evaluated at.
        seconds: f64,
        /// Number of layers drawn.
        layers: usize,
    },
}

/// One row of `debug_info`.
#[derive(Clone, Debug)]
pub struct TargetDebugInfo {
    pub target: Uuid,
    pub name: String,
    pub source: RenderSource,
    /// Comp the source currently resolves to, if any.
    pub comp: Option<Uuid>,
}

pub struct OutputScheduler {
    registry: Arc<dyn TargetRegistry>,
    store: Arc<dyn CompStore>,
    renderer: Arc<dyn CompRenderer>,
    gpu: Arc<dyn GpuExecutor>,

    config: SchedulerConfig,
    registered: IndexSet<Uuid>,
    running: bool,
    last_tick: Option<Instant>,

    nested_cache: NestedCompCache,
    prep: PrepTracker,
}

impl OutputScheduler {
    pub fn new(
        registry: Arc<dyn TargetRegistry>,
        store: Arc<dyn CompStore>,
        renderer: Arc<dyn CompRenderer>,
        gpu: Arc<dyn GpuExecutor>,
        config: SchedulerConfig,
    ) -> Self {
        let nested_cache = NestedCompCache::new(config.nested_cache_ttl);
        Self {
            registry,
            store,
            renderer,
            gpu,
            config,
            registered: IndexSet::new(),
            running: false,
            last_tick: None,
            nested_cache,
            prep: PrepTracker::default(),
        }
    }

    /// Whether the frame loop is active (at least one target registered).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of registered targets.
    pub fn registered_len(&self) -> usize {
        self.registered.len()
    }

    /// Register a target with the frame loop. Idempotent.
    ///
    /// Registration eagerly kicks off preparation of the target's comp so
    /// the first visible frame comes up faster.
    pub fn register(&mut self, target: Uuid) {
        if !self.registered.insert(target) {
            trace!("Target {} already registered", target);
            return;
        }
        info!("Target registered: {}", target);

        if let Some(desc) = self.registry.target(target) {
            if let Some(comp) = self.registry.resolve_source(&desc.source) {
                if Some(comp) != self.store.active_comp() {
                    self.prep.ensure_prepared(self.renderer.as_ref(), comp);
                }
            }
        }

        if !self.running {
            self.running = true;
            info!("Frame loop started");
        }
    }

    /// Remove a target from the frame loop; stops the loop when it was the
    /// last one.
    pub fn unregister(&mut self, target: Uuid) {
        if !self.registered.shift_remove(&target) {
            return;
        }
        info!("Target unregistered: {}", target);

        if self.registered.is_empty() && self.running {
            self.running = false;
            info!("Frame loop stopped (no targets)");
        }
    }

    /// Note a source change on `target` and prepare the new comp.
    ///
    /// The registry already holds the new source; this hook exists so the
    /// scheduler can warm up the comp before the next tick needs it.
    pub fn update_target_source(&mut self, target: Uuid) {
        if !self.registered.contains(&target) {
            return;
        }
        let Some(desc) = self.registry.target(target) else {
            return;
        };
        debug!("Source updated on target {} ({})", target, desc.name);

        if let Some(comp) = self.registry.resolve_source(&desc.source) {
            if Some(comp) != self.store.active_comp() {
                self.prep.ensure_prepared(self.renderer.as_ref(), comp);
            }
        }
    }

    /// Throttled per-display-frame entry point.
    ///
    /// Returns the dispatch decisions when a pass ran, None when the tick
    /// was throttled away or an export is in progress.
    pub fn tick(&mut self) -> Option<Vec<(Uuid, Dispatch)>> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<Vec<(Uuid, Dispatch)>> {
        if !self.running {
            return None;
        }
        if let Some(last) = self.last_tick {
            if now.duration_since(last) < self.config.min_tick_interval {
                return None;
            }
        }
        self.last_tick = Some(now);

        self.prep.poll();
        self.nested_cache.maybe_expire(now);

        if self.gpu.is_exporting() {
            trace!("Export in progress, outputs idle");
            return None;
        }

        Some(self.dispatch_all())
    }

    /// Immediate un-throttled pass, e.g. after a scrub or an edit.
    ///
    /// The nested cache is cleared first so stale placements cannot leak
    /// into the forced frame. During an export the pass itself is skipped.
    pub fn force_render(&mut self) -> Vec<(Uuid, Dispatch)> {
        self.nested_cache.invalidate();
        self.prep.poll();

        if self.gpu.is_exporting() {
            debug!("Force render skipped, export in progress");
            return Vec::new();
        }
        debug!("Force render");
        self.dispatch_all()
    }

    /// Drop cached nested-comp placements (clip data changed).
    pub fn invalidate_nested_cache(&mut self) {
        self.nested_cache.invalidate();
    }

    /// Snapshot of every registered target and its current resolution.
    pub fn debug_info(&self) -> Vec<TargetDebugInfo> {
        self.registered
            .iter()
            .filter_map(|uuid| self.registry.target(*uuid))
            .map(|t| TargetDebugInfo {
                comp: self.registry.resolve_source(&t.source),
                target: t.uuid,
                name: t.name,
                source: t.source,
            })
            .collect()
    }

    fn dispatch_all(&mut self) -> Vec<(Uuid, Dispatch)> {
        let targets: Vec<Uuid> = self.registered.iter().copied().collect();
        let mut decisions = Vec::with_capacity(targets.len());

        for uuid in targets {
            let Some(target) = self.registry.target(uuid) else {
                // Destroyed outside unregister; drop it next tick
                continue;
            };
            match self.dispatch_target(&target) {
                Ok(decision) => {
                    trace!("Target {} ({}): {:?}", uuid, target.name, decision);
                    decisions.push((uuid, decision));
                }
                Err(err) => {
                    warn!("Target {} ({}) failed: {:#}", uuid, target.name, err);
                }
            }
        }
        decisions
    }

    fn dispatch_target(&mut self, target: &OutputTarget) -> anyhow::Result<Dispatch> {
        if !target.enabled {
            return Ok(Dispatch::SkipDisabled);
        }

        let Some(comp) = self.registry.resolve_source(&target.source) else {
            self.gpu.render_empty(target.uuid)?;
            return Ok(Dispatch::EmptyFrame);
        };

        if Some(comp) == self.store.active_comp() {
            return Ok(Dispatch::SkipActive);
        }

        // Nested comp whose frame the editor just rendered: copy instead of
        // re-evaluating. A failed copy falls through to the normal path.
        if let Some(info) = self.nested_cache.get(self.store.as_ref(), comp) {
            if info.contains(self.store.main_playhead())
                && self.gpu.copy_nested_texture(target.uuid, comp)
            {
                return Ok(Dispatch::ReuseTexture);
            }
            debug!("Texture reuse unavailable for {}, evaluating", comp);
        }

        if !self.renderer.is_ready(comp) {
            self.prep.ensure_prepared(self.renderer.as_ref(), comp);
            return Ok(Dispatch::Deferred);
        }

        let ResolvedTime { seconds, source } =
            playhead::resolve(self.store.as_ref(), &mut self.nested_cache, comp);
        trace!("Evaluating {} at {:.3}s ({})", comp, seconds, source.as_str());

        let evaluated = self.renderer.evaluate(comp, seconds)?;
        let layers = filter_layers(&target.source, evaluated);

        if layers.is_empty() {
            return Ok(Dispatch::NoLayers);
        }

        self.gpu.render_to_canvas(target.uuid, &layers)?;
        Ok(Dispatch::Rendered {
            seconds,
            layers: layers.len(),
        })
    }
}

/// Restrict an evaluated layer list to what the source selects.
///
/// Layer-subset sources keep the evaluator's stacking order; selection
/// never reorders.
fn filter_layers(source: &RenderSource, evaluated: Vec<EvaluatedLayer>) -> Vec<EvaluatedLayer> {
    match source {
        RenderSource::Layers { layers, .. } => evaluated
            .into_iter()
            .filter(|l| layers.contains(&l.uuid))
            .collect(),
        RenderSource::LayerIndex { index, .. } => evaluated
            .into_iter()
            .nth(*index)
            .map(|l| vec![l])
            .unwrap_or_default(),
        _ => evaluated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::entities::traits::PrepTicket;
    use crate::entities::{Comp, Destination, Project, SharedProject, TimelineClip};

    #[derive(Default)]
    struct StubRegistry {
        targets: Mutex<Vec<OutputTarget>>,
    }

    impl StubRegistry {
        fn add(&self, target: OutputTarget) -> Uuid {
            let uuid = target.uuid;
            self.targets
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(target);
            uuid
        }
    }

    impl TargetRegistry for StubRegistry {
        fn targets(&self) -> Vec<OutputTarget> {
            self.targets.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        fn target(&self, uuid: Uuid) -> Option<OutputTarget> {
            self.targets().into_iter().find(|t| t.uuid == uuid)
        }

        fn resolve_source(&self, source: &RenderSource) -> Option<Uuid> {
            source.comp_hint()
        }
    }

    #[derive(Default)]
    struct StubRenderer {
        ready: Mutex<HashSet<Uuid>>,
        prepares: AtomicUsize,
        layers: Mutex<Vec<EvaluatedLayer>>,
        fail_evaluate: AtomicBool,
    }

    impl StubRenderer {
        fn mark_ready(&self, comp: Uuid) {
            self.ready
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(comp);
        }

        fn set_layers(&self, layers: Vec<EvaluatedLayer>) {
            *self.layers.lock().unwrap_or_else(|e| e.into_inner()) = layers;
        }
    }

    impl CompRenderer for StubRenderer {
        fn prepare(&self, _comp: Uuid) -> PrepTicket {
            self.prepares.fetch_add(1, Ordering::SeqCst);
            PrepTicket::resolved(true)
        }

        fn is_ready(&self, comp: Uuid) -> bool {
            self.ready
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .contains(&comp)
        }

        fn evaluate(&self, _comp: Uuid, _seconds: f64) -> anyhow::Result<Vec<EvaluatedLayer>> {
            if self.fail_evaluate.load(Ordering::SeqCst) {
                anyhow::bail!("evaluation blew up");
            }
            Ok(self.layers.lock().unwrap_or_else(|e| e.into_inner()).clone())
        }
    }

    #[derive(Default)]
    struct StubGpu {
        rendered: AtomicUsize,
        empties: AtomicUsize,
        copies: AtomicUsize,
        copy_ok: AtomicBool,
        exporting: AtomicBool,
    }

    impl GpuExecutor for StubGpu {
        fn render_to_canvas(&self, _target: Uuid, _layers: &[EvaluatedLayer]) -> anyhow::Result<()> {
            self.rendered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn render_empty(&self, _target: Uuid) -> anyhow::Result<()> {
            self.empties.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn copy_nested_texture(&self, _target: Uuid, _comp: Uuid) -> bool {
            self.copies.fetch_add(1, Ordering::SeqCst);
            self.copy_ok.load(Ordering::SeqCst)
        }

        fn is_exporting(&self) -> bool {
            self.exporting.load(Ordering::SeqCst)
        }
    }

    struct Rig {
        registry: Arc<StubRegistry>,
        project: SharedProject,
        renderer: Arc<StubRenderer>,
        gpu: Arc<StubGpu>,
        scheduler: OutputScheduler,
    }

    impl Rig {
        fn new() -> Self {
            Self::with_project(Project::new())
        }

        fn with_project(project: Project) -> Self {
            let registry = Arc::new(StubRegistry::default());
            let project = SharedProject::new(project);
            let renderer = Arc::new(StubRenderer::default());
            let gpu = Arc::new(StubGpu::default());
            let scheduler = OutputScheduler::new(
                registry.clone(),
                Arc::new(project.clone()),
                renderer.clone(),
                gpu.clone(),
                SchedulerConfig::default(),
            );
            Self {
                registry,
                project,
                renderer,
                gpu,
                scheduler,
            }
        }

        fn add_comp_target(&mut self, comp: Uuid) -> Uuid {
            let target = OutputTarget::new(
                "out",
                RenderSource::Comp { comp },
                Destination::Window,
            );
            let uuid = self.registry.add(target);
            self.scheduler.register(uuid);
            uuid
        }

        fn dispatch(&mut self) -> Vec<(Uuid, Dispatch)> {
            self.scheduler
                .tick_at(Instant::now())
                .expect("tick should run")
        }
    }

    fn ready_comp(rig: &mut Rig) -> Uuid {
        let comp = rig.project.write(|p| p.add_comp(Comp::new("c")));
        rig.renderer.mark_ready(comp);
        comp
    }

    #[test]
    fn test_register_starts_and_unregister_stops_loop() {
        let mut rig = Rig::new();
        assert!(!rig.scheduler.is_running());

        let comp = ready_comp(&mut rig);
        let t1 = rig.add_comp_target(comp);
        let t2 = rig.add_comp_target(comp);
        assert!(rig.scheduler.is_running());

        // Duplicate registration is a no-op
        rig.scheduler.register(t1);
        assert_eq!(rig.scheduler.registered_len(), 2);

        rig.scheduler.unregister(t1);
        assert!(rig.scheduler.is_running());
        rig.scheduler.unregister(t2);
        assert!(!rig.scheduler.is_running());
    }

    #[test]
    fn test_tick_throttle() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        rig.add_comp_target(comp);

        let start = Instant::now();
        assert!(rig.scheduler.tick_at(start).is_some());
        // 5 ms later: inside the 14 ms window
        assert!(rig
            .scheduler
            .tick_at(start + Duration::from_millis(5))
            .is_none());
        assert!(rig
            .scheduler
            .tick_at(start + Duration::from_millis(20))
            .is_some());
    }

    #[test]
    fn test_rendered_with_layers() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        rig.renderer
            .set_layers(vec![EvaluatedLayer::new("bg"), EvaluatedLayer::new("fg")]);
        let target = rig.add_comp_target(comp);

        let decisions = rig.dispatch();
        assert_eq!(
            decisions,
            vec![(
                target,
                Dispatch::Rendered {
                    seconds: 0.0,
                    layers: 2
                }
            )]
        );
        assert_eq!(rig.gpu.rendered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_layers_keeps_previous_frame() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        let target = rig.add_comp_target(comp);

        let decisions = rig.dispatch();
        assert_eq!(decisions, vec![(target, Dispatch::NoLayers)]);
        assert_eq!(rig.gpu.rendered.load(Ordering::SeqCst), 0);
        assert_eq!(rig.gpu.empties.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_slot_presents_empty_frame() {
        let mut rig = Rig::new();
        let target = rig.registry.add(OutputTarget::new(
            "slot 3",
            RenderSource::Slot { index: 3 },
            Destination::Window,
        ));
        rig.scheduler.register(target);

        let decisions = rig.dispatch();
        assert_eq!(decisions, vec![(target, Dispatch::EmptyFrame)]);
        assert_eq!(rig.gpu.empties.load(Ordering::SeqCst), 1);
        // Nothing resolvable means nothing to prepare or evaluate
        assert_eq!(rig.renderer.prepares.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disabled_target_skipped() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        let mut target = OutputTarget::new(
            "off",
            RenderSource::Comp { comp },
            Destination::Window,
        );
        target.enabled = false;
        let uuid = rig.registry.add(target);
        rig.scheduler.register(uuid);

        let decisions = rig.dispatch();
        assert_eq!(decisions, vec![(uuid, Dispatch::SkipDisabled)]);
        assert!(rig.scheduler.is_running());
    }

    #[test]
    fn test_active_comp_skipped() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        rig.project.set_active_comp(Some(comp));
        let target = rig.add_comp_target(comp);

        let decisions = rig.dispatch();
        assert_eq!(decisions, vec![(target, Dispatch::SkipActive)]);
    }

    #[test]
    fn test_not_ready_defers_and_prepares() {
        let mut rig = Rig::new();
        let comp = rig.project.write(|p| p.add_comp(Comp::new("cold")));
        let target = rig.add_comp_target(comp);
        // One eager prepare at registration
        assert_eq!(rig.renderer.prepares.load(Ordering::SeqCst), 1);

        let decisions = rig.dispatch();
        assert_eq!(decisions, vec![(target, Dispatch::Deferred)]);
        // Registration's prepare already settled and marked the comp, so
        // dispatch did not re-request
        assert_eq!(rig.renderer.prepares.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_texture_reuse_when_nested_under_playhead() {
        let mut project = Project::new();
        let comp_uuid = project.add_comp(Comp::new("nested"));
        project
            .main
            .clips
            .push(TimelineClip::composition("n", comp_uuid, 10.0, 5.0, 0.0, 5.0));
        project.main.playhead = 12.0;

        let mut rig = Rig::with_project(project);
        rig.renderer.mark_ready(comp_uuid);
        rig.gpu.copy_ok.store(true, Ordering::SeqCst);
        let target = rig.add_comp_target(comp_uuid);

        let decisions = rig.dispatch();
        assert_eq!(decisions, vec![(target, Dispatch::ReuseTexture)]);
        assert_eq!(rig.gpu.rendered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_texture_copy_falls_through_to_render() {
        let mut project = Project::new();
        let comp_uuid = project.add_comp(Comp::new("nested"));
        project
            .main
            .clips
            .push(TimelineClip::composition("n", comp_uuid, 10.0, 5.0, 0.0, 5.0));
        project.main.playhead = 12.0;

        let mut rig = Rig::with_project(project);
        rig.renderer.mark_ready(comp_uuid);
        rig.renderer.set_layers(vec![EvaluatedLayer::new("l")]);
        let target = rig.add_comp_target(comp_uuid);

        let decisions = rig.dispatch();
        assert_eq!(rig.gpu.copies.load(Ordering::SeqCst), 1);
        assert_eq!(
            decisions,
            vec![(
                target,
                Dispatch::Rendered {
                    seconds: 2.0,
                    layers: 1
                }
            )]
        );
    }

    #[test]
    fn test_playhead_outside_window_evaluates_clamped() {
        let mut project = Project::new();
        let comp_uuid = project.add_comp(Comp::new("nested"));
        project
            .main
            .clips
            .push(TimelineClip::composition("n", comp_uuid, 10.0, 5.0, 2.0, 7.0));
        project.main.playhead = 3.0;

        let mut rig = Rig::with_project(project);
        rig.renderer.mark_ready(comp_uuid);
        rig.renderer.set_layers(vec![EvaluatedLayer::new("l")]);
        let target = rig.add_comp_target(comp_uuid);

        let decisions = rig.dispatch();
        // Playhead before the clip: no texture reuse, evaluate at in point
        assert_eq!(rig.gpu.copies.load(Ordering::SeqCst), 0);
        assert_eq!(
            decisions,
            vec![(
                target,
                Dispatch::Rendered {
                    seconds: 2.0,
                    layers: 1
                }
            )]
        );
    }

    #[test]
    fn test_exporting_skips_dispatch() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        rig.add_comp_target(comp);
        rig.gpu.exporting.store(true, Ordering::SeqCst);

        assert!(rig.scheduler.tick_at(Instant::now()).is_none());
        assert!(rig.scheduler.force_render().is_empty());
        assert_eq!(rig.gpu.rendered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_resumes_after_export_without_backlog() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        rig.renderer.set_layers(vec![EvaluatedLayer::new("l")]);
        rig.add_comp_target(comp);

        let start = Instant::now();
        rig.gpu.exporting.store(true, Ordering::SeqCst);
        assert!(rig.scheduler.tick_at(start).is_none());
        assert!(rig
            .scheduler
            .tick_at(start + Duration::from_millis(20))
            .is_none());

        // Export ends: exactly one pass on the next due tick
        rig.gpu.exporting.store(false, Ordering::SeqCst);
        let decisions = rig
            .scheduler
            .tick_at(start + Duration::from_millis(40))
            .unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(rig.gpu.rendered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_isolated_per_target() {
        let mut rig = Rig::new();
        let bad = ready_comp(&mut rig);
        rig.add_comp_target(bad);

        let unresolved = rig.registry.add(OutputTarget::new(
            "still fine",
            RenderSource::ActiveComp,
            Destination::Window,
        ));
        rig.scheduler.register(unresolved);

        rig.renderer.fail_evaluate.store(true, Ordering::SeqCst);
        let decisions = rig.dispatch();

        // The failing target is dropped from the decision list; the second
        // one still dispatched
        assert_eq!(decisions, vec![(unresolved, Dispatch::EmptyFrame)]);
        assert_eq!(rig.gpu.empties.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_force_render_ignores_throttle() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        rig.renderer.set_layers(vec![EvaluatedLayer::new("l")]);
        rig.add_comp_target(comp);

        let start = Instant::now();
        rig.scheduler.tick_at(start);
        // Throttled tick would do nothing, force_render still renders
        assert!(rig.scheduler.tick_at(start).is_none());
        let decisions = rig.scheduler.force_render();
        assert_eq!(decisions.len(), 1);
        assert_eq!(rig.gpu.rendered.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_layer_subset_source() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        let keep = EvaluatedLayer::new("keep");
        let drop_ = EvaluatedLayer::new("drop");
        rig.renderer.set_layers(vec![drop_.clone(), keep.clone()]);

        let target = rig.registry.add(OutputTarget::new(
            "subset",
            RenderSource::Layers {
                comp,
                layers: vec![keep.uuid],
            },
            Destination::Window,
        ));
        rig.scheduler.register(target);

        let decisions = rig.dispatch();
        assert_eq!(
            decisions,
            vec![(
                target,
                Dispatch::Rendered {
                    seconds: 0.0,
                    layers: 1
                }
            )]
        );
    }

    #[test]
    fn test_layer_index_source_out_of_range() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        rig.renderer.set_layers(vec![EvaluatedLayer::new("only")]);

        let target = rig.registry.add(OutputTarget::new(
            "idx",
            RenderSource::LayerIndex { comp, index: 5 },
            Destination::Window,
        ));
        rig.scheduler.register(target);

        let decisions = rig.dispatch();
        assert_eq!(decisions, vec![(target, Dispatch::NoLayers)]);
    }

    #[test]
    fn test_debug_info_reports_resolution() {
        let mut rig = Rig::new();
        let comp = ready_comp(&mut rig);
        rig.add_comp_target(comp);

        let info = rig.scheduler.debug_info();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].comp, Some(comp));
        assert_eq!(info[0].name, "out");
    }

    #[test]
    fn test_filter_layers_keeps_order() {
        let a = EvaluatedLayer::new("a");
        let b = EvaluatedLayer::new("b");
        let c = EvaluatedLayer::new("c");
        let comp = Uuid::new_v4();

        // Selection listed backwards still comes out in stacking order
        let source = RenderSource::Layers {
            comp,
            layers: vec![c.uuid, a.uuid],
        };
        let out = filter_layers(&source, vec![a.clone(), b, c.clone()]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].uuid, a.uuid);
        assert_eq!(out[1].uuid, c.uuid);
    }
}
