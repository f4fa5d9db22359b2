pub mod breaker;
pub mod checkpoint;
pub mod failover;
pub mod replay;

pub use breaker::{CircuitBreaker, CircuitState};
pub use checkpoint::{reconstruct, should_checkpoint, Checkpoint, CheckpointManager};
pub use failover::candidates as failover_candidates;
pub use replay::{deduplicate, replay, Event};
