//! The manifest data model, template interpolation, and engine
//! (SPEC_FULL.md §4.3).

pub mod engine;
pub mod model;
pub mod overrides;
pub mod template;

pub use engine::{DriftEntry, DriftReport, ManifestEngine, RotationOutcome};
pub use model::{Manifest, Scope, ServiceMap, VarMap, GLOBAL_SERVICE};
