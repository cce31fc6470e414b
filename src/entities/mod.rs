//! Entities module - timeline types and collaborator interfaces.
//!
//! Core (`src/core`) depends on entities, never the other way around; the
//! external-collaborator traits live here so scheduler logic stays
//! decoupled from any concrete host.

pub mod comp;
pub mod layer;
pub mod project;
pub mod source;
pub mod target;
pub mod traits;

pub use comp::{Comp, NestedCompInfo, TimelineClip};
pub use layer::EvaluatedLayer;
pub use project::{MainTimeline, Project, SharedProject};
pub use source::RenderSource;
pub use target::{Destination, OutputTarget};
pub use traits::{CompRenderer, CompStore, GpuExecutor, PrepTicket, TargetRegistry};
