//! RenderSource: what an output target should currently display.
//!
//! Sources are immutable descriptions, replaced wholesale when the user
//! re-routes a target. Resolution to a concrete comp happens in the
//! registry (slots and the program bus are registry state, not timeline
//! state), so the scheduler never interprets `Slot`/`Program` itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tagged description of a target's content.
///
/// - `ActiveComp`: follow whatever comp is active in the editor
/// - `Comp`: a fixed composition
/// - `Layers`: a subset of a composition's layers, by instance uuid
/// - `LayerIndex`: a single layer of a composition, by stacking index
/// - `Slot`: a numbered mixer slot (may be empty)
/// - `Program`: the program output bus
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RenderSource {
    ActiveComp,
    Comp { comp: Uuid },
    Layers { comp: Uuid, layers: Vec<Uuid> },
    LayerIndex { comp: Uuid, index: usize },
    Slot { index: usize },
    Program,
}

impl RenderSource {
    /// Comp uuid embedded directly in the source, if any.
    ///
    /// `ActiveComp`, `Slot` and `Program` carry no comp of their own and
    /// resolve only through the registry.
    pub fn comp_hint(&self) -> Option<Uuid> {
        match self {
            RenderSource::Comp { comp }
            | RenderSource::Layers { comp, .. }
            | RenderSource::LayerIndex { comp, .. } => Some(*comp),
            RenderSource::ActiveComp | RenderSource::Slot { .. } | RenderSource::Program => None,
        }
    }

    /// Short label for logs and debug listings.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderSource::ActiveComp => "active-comp",
            RenderSource::Comp { .. } => "comp",
            RenderSource::Layers { .. } => "layers",
            RenderSource::LayerIndex { .. } => "layer-index",
            RenderSource::Slot { .. } => "slot",
            RenderSource::Program => "program",
        }
    }
}

impl Default for RenderSource {
    fn default() -> Self {
        RenderSource::ActiveComp
    }
}
