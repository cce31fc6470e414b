//! Headless scheduler simulator for development and testing.
//!
//! Stands in for a real host: an in-memory target registry, a renderer
//! whose preparation runs on background threads, and a GPU executor that
//! only counts and logs. Drives the scheduler for N display frames while
//! the main playhead advances, then prints a dispatch tally.
//!
//! Useful for eyeballing decisions and log output without any GUI.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{debug, info};
use uuid::Uuid;

use mixa::cli::Args;
use mixa::entities::{
    CompRenderer, CompStore, Destination, EvaluatedLayer, GpuExecutor, OutputTarget, PrepTicket,
    Project, RenderSource, SharedProject, TargetRegistry,
};
use mixa::shell;
use mixa::{Dispatch, OutputScheduler, SchedulerConfig};

/// In-memory target registry.
///
/// `ActiveComp` and `Program` resolve through the shared project; `Slot`
/// always resolves to nothing since the headless run has no mixer.
struct SimRegistry {
    targets: Mutex<Vec<OutputTarget>>,
    program: Mutex<Option<Uuid>>,
    project: SharedProject,
}

impl SimRegistry {
    fn new(project: SharedProject) -> Self {
        Self {
            targets: Mutex::new(Vec::new()),
            program: Mutex::new(None),
            project,
        }
    }

    fn add(&self, target: OutputTarget) -> Uuid {
        let uuid = target.uuid;
        info!("Target created: {} ({})", target.name, target.source.kind());
        self.targets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(target);
        uuid
    }

    fn set_program(&self, comp: Option<Uuid>) {
        *self.program.lock().unwrap_or_else(|e| e.into_inner()) = comp;
    }
}

impl TargetRegistry for SimRegistry {
    fn targets(&self) -> Vec<OutputTarget> {
        self.targets.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn target(&self, uuid: Uuid) -> Option<OutputTarget> {
        self.targets().into_iter().find(|t| t.uuid == uuid)
    }

    fn resolve_source(&self, source: &RenderSource) -> Option<Uuid> {
        match source {
            RenderSource::ActiveComp => self.project.active_comp(),
            RenderSource::Program => *self.program.lock().unwrap_or_else(|e| e.into_inner()),
            RenderSource::Slot { .. } => None,
            _ => source.comp_hint(),
        }
    }
}

/// Renderer whose preparation sleeps on a background thread, then flips
/// the comp's ready flag and settles the ticket.
struct SimRenderer {
    project: SharedProject,
    ready: Arc<Mutex<HashSet<Uuid>>>,
    prep_delay: Duration,
}

impl SimRenderer {
    fn new(project: SharedProject, prep_delay: Duration) -> Self {
        Self {
            project,
            ready: Arc::new(Mutex::new(HashSet::new())),
            prep_delay,
        }
    }
}

impl CompRenderer for SimRenderer {
    fn prepare(&self, comp: Uuid) -> PrepTicket {
        let (tx, ticket) = PrepTicket::pair();
        let ready = Arc::clone(&self.ready);
        let delay = self.prep_delay;
        thread::spawn(move || {
            thread::sleep(delay);
            ready.lock().unwrap_or_else(|e| e.into_inner()).insert(comp);
            let _ = tx.send(true);
        });
        ticket
    }

    fn is_ready(&self, comp: Uuid) -> bool {
        self.ready
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&comp)
    }

    fn evaluate(&self, comp: Uuid, seconds: f64) -> anyhow::Result<Vec<EvaluatedLayer>> {
        // One layer per clip under the playhead, in stacking order
        Ok(self
            .project
            .comp_clips(comp)
            .iter()
            .filter(|clip| clip.contains(seconds))
            .map(|clip| EvaluatedLayer::new(clip.name.clone()))
            .collect())
    }
}

/// GPU stand-in: counts draws and logs them.
#[derive(Default)]
struct SimGpu {
    draws: AtomicUsize,
    empties: AtomicUsize,
}

impl GpuExecutor for SimGpu {
    fn render_to_canvas(&self, target: Uuid, layers: &[EvaluatedLayer]) -> anyhow::Result<()> {
        self.draws.fetch_add(1, Ordering::SeqCst);
        debug!("Draw {} layers into {}", layers.len(), target);
        Ok(())
    }

    fn render_empty(&self, target: Uuid) -> anyhow::Result<()> {
        self.empties.fetch_add(1, Ordering::SeqCst);
        debug!("Empty frame on {}", target);
        Ok(())
    }

    fn copy_nested_texture(&self, _target: Uuid, _comp: Uuid) -> bool {
        // No editor is rendering nested frames in a headless run
        false
    }

    fn is_exporting(&self) -> bool {
        false
    }
}

fn dispatch_label(d: &Dispatch) -> &'static str {
    match d {
        Dispatch::SkipDisabled => "skip-disabled",
        Dispatch::SkipActive => "skip-active",
        Dispatch::EmptyFrame => "empty-frame",
        Dispatch::ReuseTexture => "reuse-texture",
        Dispatch::Deferred => "deferred",
        Dispatch::NoLayers => "no-layers",
        Dispatch::Rendered { .. } => "rendered",
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    shell::init_logger(shell::verbosity_filter(args.verbosity));

    let (project, nested) = match &args.project {
        Some(path) => {
            let project = Project::load(path)?;
            let nested = project.main.clips.iter().find_map(|c| c.comp);
            (project, nested)
        }
        None => {
            let scene = shell::demo_scene();
            (scene.project, Some(scene.nested))
        }
    };

    let shared = SharedProject::new(project);
    let registry = Arc::new(SimRegistry::new(shared.clone()));
    let renderer = Arc::new(SimRenderer::new(
        shared.clone(),
        Duration::from_millis(args.prep_ms),
    ));
    let gpu = Arc::new(SimGpu::default());

    let mut scheduler = OutputScheduler::new(
        registry.clone(),
        Arc::new(shared.clone()),
        renderer,
        gpu.clone(),
        SchedulerConfig::default(),
    );

    // Preview canvas follows the active comp; a projector window shows the
    // nested comp; a monitor watches the program bus (routed to the same
    // nested comp when there is one).
    let preview = registry.add(OutputTarget::new(
        "preview",
        RenderSource::ActiveComp,
        Destination::PreviewCanvas,
    ));
    scheduler.register(preview);

    if let Some(comp) = nested {
        let projector = registry.add(OutputTarget::new(
            "projector",
            RenderSource::Comp { comp },
            Destination::Window,
        ));
        scheduler.register(projector);

        registry.set_program(Some(comp));
        let monitor = registry.add(OutputTarget::new(
            "program monitor",
            RenderSource::Program,
            Destination::Tab,
        ));
        scheduler.register(monitor);
    }

    let step = Duration::from_millis(args.step_ms);
    let mut tally: BTreeMap<&'static str, usize> = BTreeMap::new();

    for frame in 0..args.ticks {
        let seconds = f64::from(frame) * step.as_secs_f64() * args.rate;
        shared.set_main_playhead(seconds);

        let decisions = if args.scrub_at == Some(frame) {
            info!("Scrub at frame {} ({:.3}s)", frame, seconds);
            Some(scheduler.force_render())
        } else {
            scheduler.tick()
        };

        if let Some(decisions) = decisions {
            for (_, decision) in decisions {
                *tally.entry(dispatch_label(&decision)).or_default() += 1;
            }
        }
        thread::sleep(step);
    }

    info!("Simulated {} frames:", args.ticks);
    for (label, count) in &tally {
        info!("  {:>5}x {}", count, label);
    }
    info!(
        "GPU draws: {}, empty frames: {}",
        gpu.draws.load(Ordering::SeqCst),
        gpu.empties.load(Ordering::SeqCst)
    );
    Ok(())
}
