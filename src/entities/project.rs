//! Project: top-level scene container.
//!
//! Holds the composition pool, the main timeline and the active-comp
//! marker. Project is the unit of serialization: scenes are saved and
//! loaded via `Project::to_json` / `Project::from_json`.
//!
//! `SharedProject` is the runtime handle: a thread-safe wrapper that
//! implements `CompStore` so the scheduler can observe timeline state while
//! the host mutates it between ticks.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comp::{Comp, TimelineClip};
use super::traits::CompStore;

/// The main timeline: the authoritative playhead plus its clip list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MainTimeline {
    /// Authoritative playhead position (seconds)
    pub playhead: f64,

    /// Clips placed on the main timeline
    pub clips: Vec<TimelineClip>,
}

/// Top-level project / scene.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Project {
    /// Composition pool keyed by uuid
    pub comps: HashMap<Uuid, Comp>,

    /// The main timeline
    pub main: MainTimeline,

    /// Currently active comp in the editor, if any
    #[serde(default)]
    pub active: Option<Uuid>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comp to the pool, returning its uuid.
    pub fn add_comp(&mut self, comp: Comp) -> Uuid {
        let uuid = comp.uuid;
        self.comps.insert(uuid, comp);
        uuid
    }

    pub fn comp(&self, uuid: Uuid) -> Option<&Comp> {
        self.comps.get(&uuid)
    }

    pub fn comp_mut(&mut self, uuid: Uuid) -> Option<&mut Comp> {
        self.comps.get_mut(&uuid)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, self.to_json()?)?;
        log::info!("Project saved: {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)?;
        let project = Self::from_json(&json)?;
        log::info!(
            "Project loaded: {} ({} comps, {} main clips)",
            path.display(),
            project.comps.len(),
            project.main.clips.len()
        );
        Ok(project)
    }
}

/// Thread-safe project handle implementing `CompStore`.
///
/// Clones share the same underlying project. Lock poisoning is recovered
/// with `into_inner` so a panicked writer cannot wedge the frame loop.
#[derive(Clone, Debug, Default)]
pub struct SharedProject {
    inner: Arc<RwLock<Project>>,
}

impl SharedProject {
    pub fn new(project: Project) -> Self {
        Self {
            inner: Arc::new(RwLock::new(project)),
        }
    }

    /// Run a closure with read access to the project.
    pub fn read<R>(&self, f: impl FnOnce(&Project) -> R) -> R {
        f(&self.inner.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Run a closure with write access to the project.
    pub fn write<R>(&self, f: impl FnOnce(&mut Project) -> R) -> R {
        f(&mut self.inner.write().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn set_main_playhead(&self, seconds: f64) {
        self.write(|p| p.main.playhead = seconds);
    }

    pub fn set_active_comp(&self, comp: Option<Uuid>) {
        self.write(|p| p.active = comp);
    }

    pub fn set_comp_playhead(&self, comp: Uuid, seconds: Option<f64>) {
        self.write(|p| {
            if let Some(c) = p.comp_mut(comp) {
                c.playhead = seconds;
            }
        });
    }
}

impl CompStore for SharedProject {
    fn active_comp(&self) -> Option<Uuid> {
        self.read(|p| p.active)
    }

    fn main_playhead(&self) -> f64 {
        self.read(|p| p.main.playhead)
    }

    fn main_clips(&self) -> Vec<TimelineClip> {
        self.read(|p| p.main.clips.clone())
    }

    fn comp_playhead(&self, comp: Uuid) -> Option<f64> {
        self.read(|p| p.comp(comp).and_then(|c| c.playhead))
    }

    fn comp_clips(&self, comp: Uuid) -> Vec<TimelineClip> {
        self.read(|p| p.comp(comp).map(|c| c.clips.clone()).unwrap_or_default())
    }
}
