//! Core scheduling engine - cache, playhead resolution, dispatch.
//!
//! These modules form the output scheduler, independent of any host UI.

pub mod nested_cache;
pub mod playhead;
pub mod prep_tracker;
pub mod scheduler;

// Re-exports for convenience
pub use nested_cache::{NestedCompCache, DEFAULT_NESTED_TTL};
pub use playhead::{ResolvedTime, SyncSource};
pub use prep_tracker::PrepTracker;
pub use scheduler::{Dispatch, OutputScheduler, SchedulerConfig, TargetDebugInfo};
