/// Bounded, cycle-safe flow traversal over a slice.
pub mod engine;

/// Label providers for rendered graphs.
pub mod labels;

/// Flattens flow trees into renderable graphs.
pub mod projector;

pub use engine::{CancellationFlag, FlowEngine, FlowProfile, DEFAULT_MAX_DEPTH};
pub use labels::{ArchitectureLabeler, LabelProvider};
pub use projector::GraphProjector;
