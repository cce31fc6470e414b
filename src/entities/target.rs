//! OutputTarget: a registered output destination (canvas, window, tab).
//!
//! Targets are created and destroyed by the host's target registry; the
//! canvas/context/window handles live there too. The scheduler only reads
//! `enabled` and `source` each tick and hands the uuid to the GPU executor,
//! which knows how to find the actual surface.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::source::RenderSource;

/// Kind of surface a target draws into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    /// In-app preview canvas
    #[default]
    PreviewCanvas,
    /// Detached OS window
    Window,
    /// Detached browser-style tab
    Tab,
}

/// One independently-viewable output.
///
/// Mutated by user action (re-route, enable/disable); the scheduler
/// observes the current values on every tick and never writes them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputTarget {
    /// Stable identifier inside the registry
    pub uuid: Uuid,

    /// Human-readable name
    pub name: String,

    /// What this target should display
    pub source: RenderSource,

    /// Surface kind (owned by the registry)
    pub destination: Destination,

    /// Disabled targets stay registered but are skipped at dispatch
    pub enabled: bool,
}

impl OutputTarget {
    pub fn new(name: impl Into<String>, source: RenderSource, destination: Destination) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            source,
            destination,
            enabled: true,
        }
    }
}
