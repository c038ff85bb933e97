//! collekt - scene delivery collector library
//!
//! Re-exports all modules for use by binary targets.

pub mod cli;
pub mod collect;
pub mod flatten;
pub mod progress;
pub mod report;
pub mod scene;
pub mod sequence;

// Re-export commonly used types
pub use collect::{Collector, FOOTAGE_DIR, planned_copies};
pub use flatten::flatten_gizmos;
pub use report::{CollectError, RunReport};
pub use scene::{GizmoDef, GizmoLibrary, KnobValue, Knobs, Node, NodeKind, Scene, SceneGraph};
pub use sequence::{FileRef, RefKind};
