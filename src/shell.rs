//! Shared shell module for standalone binary targets.
//!
//! Provides common initialization and demo-scene boilerplate.

use uuid::Uuid;

use crate::entities::{Comp, Project, TimelineClip};

/// Initialize logging for standalone binaries.
///
/// `RUST_LOG` still wins over `default_filter`.
pub fn init_logger(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

/// Map `-v` repetition to an env_logger filter.
pub fn verbosity_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Comps of interest inside the demo project.
pub struct DemoScene {
    pub project: Project,
    /// Active in the editor
    pub stage: Uuid,
    /// Placed as a clip on the main timeline at 10s..15s
    pub nested: Uuid,
    /// Standalone, with a persisted playhead
    pub intro: Uuid,
}

/// Synthetic scene exercising every playhead-resolution case: a nested
/// comp on the main timeline, a standalone comp with a stored playhead,
/// and an active comp that itself appears inside `stage`.
pub fn demo_scene() -> DemoScene {
    let mut project = Project::new();

    let mut intro = Comp::new("intro");
    intro.playhead = Some(1.25);
    intro.clips.push(TimelineClip::media("title card", 0.0, 4.0));
    let intro = project.add_comp(intro);

    let mut nested = Comp::new("loop-a");
    nested.clips.push(TimelineClip::media("loop footage", 0.0, 5.0));
    let nested = project.add_comp(nested);

    let mut stage = Comp::new("stage");
    stage.clips.push(TimelineClip::media("background", 0.0, 30.0));
    stage
        .clips
        .push(TimelineClip::composition("intro on stage", intro, 2.0, 4.0, 0.0, 4.0));
    let stage = project.add_comp(stage);

    project.active = Some(stage);
    project.main.playhead = 0.0;
    project
        .main
        .clips
        .push(TimelineClip::composition("loop-a on main", nested, 10.0, 5.0, 0.0, 5.0));

    DemoScene {
        project,
        stage,
        nested,
        intro,
    }
}
