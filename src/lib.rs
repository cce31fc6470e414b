//! MIXA - composition-aware output scheduler library
//!
//! Re-exports all modules for use by binary targets and host applications.

// Core engine (caches, playhead resolution, dispatch)
pub mod core;

// App modules
pub mod cli;
pub mod entities;
pub mod shell;

// Re-export commonly used types from core
pub use core::nested_cache::NestedCompCache;
pub use core::playhead::{ResolvedTime, SyncSource};
pub use core::prep_tracker::PrepTracker;
pub use core::scheduler::{Dispatch, OutputScheduler, SchedulerConfig, TargetDebugInfo};

// Re-export entities
pub use entities::{
    Comp, CompRenderer, CompStore, Destination, EvaluatedLayer, GpuExecutor, OutputTarget,
    PrepTicket, Project, RenderSource, SharedProject, TargetRegistry, TimelineClip,
};
