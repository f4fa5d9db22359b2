pub mod engine;
pub mod graph;

pub use engine::{Entity, RegisterError, TransitionError, TransitionOutcome, TransitionRecord, WorkflowEngine};
pub use graph::Graph;
