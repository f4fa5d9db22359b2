pub mod order;
pub mod plan;
pub mod preempt;
pub mod turnaround;

pub use order::Order;
pub use plan::{dispatch_batch, plan_dispatch, plan_with_time_constraints, DispatchResult};
pub use preempt::{batch_schedule_with_preemption, PreemptionResult};
pub use turnaround::{check_capacity, estimate_turnaround, CapacityStatus};
