pub mod cancellation;
pub mod config;
pub mod order;
pub mod orchestrator;
pub mod telemetry;

pub use cancellation::CancellationToken;
pub use config::OrchestratorConfig;
pub use order::{validate, RejectReason, SubmitOutcome};
pub use orchestrator::Orchestrator;

/// Resilience boundary (§6): re-exported so callers need not depend on
/// `resilience` directly for the pure, stateless operations.
pub mod resilience_boundary {
    pub use resilience::{deduplicate, failover_candidates, reconstruct, replay, should_checkpoint, Event};
}

/// Routing boundary (§6): re-exported pure operations.
pub mod routing_boundary {
    pub use routing::{plan_multi_leg, route::choose, route::feasible, transit_hours};
}
