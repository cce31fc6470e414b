//! Evaluated layer: one element of a comp's render list at a given time.
//!
//! Produced by the external composition evaluator in stacking order.
//! The scheduler filters this list by instance uuid (`Layers` sources) or
//! position (`LayerIndex` sources) and forwards it to the GPU executor
//! untouched otherwise.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a layer as evaluated at a specific comp-local time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedLayer {
    /// Instance uuid of the layer placement inside its comp
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Evaluated opacity at the requested time, 0.0..=1.0
    pub opacity: f32,
}

impl EvaluatedLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            opacity: 1.0,
        }
    }
}
