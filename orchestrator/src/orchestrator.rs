//! The composition root (C11): one struct owning one instance of every
//! component crate, and the `submit` pipeline described in spec.md §6.

use crate::config::OrchestratorConfig;
use crate::order::{RejectReason, SubmitOutcome};
use admission::Order;
use chrono::Utc;
use queue::{PriorityQueue, ShedPolicy, TokenBucket};
use resilience::{CheckpointManager, CircuitBreaker};
use routing::RouteTable;
use shared::Clock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use workflow::{Graph, WorkflowEngine};

struct PolicyState {
    mode: policy::PolicyMode,
    failure_burst: u32,
    success_streak: u32,
}

/// Owns one instance of every component crate's top-level type, each
/// constructed from the single [`OrchestratorConfig`] loaded at startup.
/// Per spec.md §5, two component locks are never held at once: each field
/// below guards only its own component's state, and `submit` never calls
/// into a second component while still holding the first's lock.
pub struct Orchestrator {
    clock: Arc<dyn Clock>,
    queue: parking_lot::Mutex<PriorityQueue<Order>>,
    shed_policy: ShedPolicy,
    rate_limiter: TokenBucket,
    policy_state: parking_lot::Mutex<PolicyState>,
    policy_escalation_threshold: u32,
    policy_deescalation_multiplier: u32,
    route_table: RouteTable,
    workflow: WorkflowEngine,
    breaker: CircuitBreaker,
    checkpoints: CheckpointManager,
    sequence: AtomicU64,
}

impl Orchestrator {
    pub fn new(config: &OrchestratorConfig, clock: Arc<dyn Clock>) -> Self {
        let mut edges = HashMap::new();
        for (state, successors) in &config.workflow.graph {
            edges.insert(
                state.clone(),
                successors.iter().cloned().collect::<std::collections::BTreeSet<_>>(),
            );
        }
        let terminal: std::collections::HashSet<String> =
            config.workflow.terminal.iter().cloned().collect();
        let graph = Graph::new(edges, terminal, config.workflow.entry.clone());

        Self {
            queue: parking_lot::Mutex::new(PriorityQueue::new()),
            shed_policy: ShedPolicy::with_ratios(
                config.queue.hard_limit,
                config.queue.warn_ratio,
                config.queue.emergency_ratio,
            ),
            rate_limiter: TokenBucket::with_burst(
                config.rate.capacity,
                config.rate.refill_per_sec,
                config.rate.burst_allowance,
                clock.clone(),
            ),
            policy_state: parking_lot::Mutex::new(PolicyState {
                mode: policy::PolicyMode::Normal,
                failure_burst: 0,
                success_streak: 0,
            }),
            policy_escalation_threshold: config.policy.escalation_threshold,
            policy_deescalation_multiplier: config.policy.deescalation_multiplier,
            route_table: RouteTable::new(),
            workflow: WorkflowEngine::new(graph, clock.clone()),
            breaker: CircuitBreaker::new(
                config.breaker.failure_threshold,
                config.breaker.success_threshold,
                std::time::Duration::from_millis(config.breaker.reset_timeout_ms),
                config.breaker.max_probe,
                clock.clone(),
            ),
            checkpoints: CheckpointManager::new(),
            sequence: AtomicU64::new(0),
            clock,
        }
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.route_table
    }

    pub fn workflow(&self) -> &WorkflowEngine {
        &self.workflow
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn checkpoints(&self) -> &CheckpointManager {
        &self.checkpoints
    }

    pub fn policy_mode(&self) -> policy::PolicyMode {
        self.policy_state.lock().mode
    }

    /// Records an operational failure signal and escalates the policy mode
    /// one rung once the configured burst threshold is met. The burst
    /// counter resets after it triggers a rung change, so the next rung up
    /// again needs a full burst of consecutive failures — the same
    /// consecutive-count-resets-on-transition shape as the circuit breaker.
    pub fn record_policy_failure(&self) {
        let mut state = self.policy_state.lock();
        state.failure_burst += 1;
        state.success_streak = 0;
        let escalated = policy::escalate(state.mode, state.failure_burst, self.policy_escalation_threshold);
        if escalated != state.mode {
            state.failure_burst = 0;
        }
        state.mode = escalated;
    }

    /// Records an operational success signal and de-escalates the policy
    /// mode one rung once the configured streak threshold is met, resetting
    /// the streak counter on each rung change.
    pub fn record_policy_success(&self) {
        let mut state = self.policy_state.lock();
        state.success_streak += 1;
        state.failure_burst = 0;
        let deescalated = policy::de_escalate(
            state.mode,
            state.success_streak,
            self.policy_deescalation_multiplier,
        );
        if deescalated != state.mode {
            state.success_streak = 0;
        }
        state.mode = deescalated;
    }

    /// `submit(order)` — admission validates and admits, queue enforces
    /// shed/rate-limit, policy mode gates admission in `Halted`, routing
    /// chooses a corridor when a destination is supplied, the workflow
    /// engine registers the entity, and resilience records an idempotent
    /// checkpoint. Each stage either passes the order to the next or
    /// returns a terminal rejection; no stage is retried.
    pub fn submit(&self, order: Order, destination: Option<&str>) -> SubmitOutcome {
        let id = order.id.clone();

        if !crate::order::validate(&order) {
            tracing::warn!(order_id = %id, "rejected: malformed order");
            return SubmitOutcome::Rejected { id, reason: RejectReason::Invalid };
        }

        if let Some(window) = &order.window {
            if window.latest < self.clock.now_utc() {
                tracing::warn!(order_id = %id, "rejected: eligibility window closed");
                return SubmitOutcome::Rejected { id, reason: RejectReason::WindowClosed };
            }
        }

        if self.policy_mode() == policy::PolicyMode::Halted {
            tracing::warn!(order_id = %id, "rejected: policy mode halted");
            return SubmitOutcome::Rejected { id, reason: RejectReason::PolicyHalted };
        }

        if !self.rate_limiter.allow() {
            tracing::warn!(order_id = %id, "rate limited");
            return SubmitOutcome::RateLimited { id };
        }

        let depth = {
            let queue = self.queue.lock();
            queue.size() as i64
        };
        if self.shed_policy.should_shed(depth, false) {
            tracing::warn!(order_id = %id, depth, hard_limit = self.shed_policy.hard_limit, "shed: queue at capacity");
            return SubmitOutcome::Rejected { id, reason: RejectReason::Capacity };
        }

        {
            let mut queue = self.queue.lock();
            queue.enqueue(order.urgency as i64, order.clone(), 1);
        }

        if let Some(dest) = destination {
            tracing::info!(order_id = %id, destination = dest, "route lookup requested");
            let _ = self.route_table.choose_best();
        }

        match self.workflow.register_default(&id) {
            Ok(()) | Err(workflow::RegisterError::AlreadyRegistered) => {}
            Err(workflow::RegisterError::InvalidState) => {
                tracing::error!(order_id = %id, "workflow entry state misconfigured");
            }
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.checkpoints.record(&id, sequence, Utc::now());

        tracing::info!(order_id = %id, "order accepted");
        SubmitOutcome::Accepted { id }
    }

    pub fn queue_depth(&self) -> usize {
        self.queue.lock().size()
    }

    pub fn dequeue_next(&self) -> Option<Order> {
        self.queue.lock().dequeue()
    }

    /// Submits every order in `orders`, checking `cancel` between each
    /// one (§5: "checked between atomic steps only, never mid-step"). A
    /// cancellation observed before an order starts stops the batch there;
    /// orders already submitted are not rolled back, and the remainder is
    /// reported as `Rejected { reason: Capacity }` since no further
    /// admission slot will be offered to them.
    pub fn submit_batch(
        &self,
        orders: Vec<Order>,
        destination: Option<&str>,
        cancel: &crate::cancellation::CancellationToken,
    ) -> Vec<SubmitOutcome> {
        let mut outcomes = Vec::with_capacity(orders.len());
        let mut orders = orders.into_iter();
        while let Some(order) = orders.next() {
            if cancel.is_cancelled() {
                let id = order.id.clone();
                outcomes.push(SubmitOutcome::Rejected { id, reason: RejectReason::Capacity });
                outcomes.extend(orders.map(|remaining| SubmitOutcome::Rejected {
                    id: remaining.id,
                    reason: RejectReason::Capacity,
                }));
                break;
            }
            outcomes.push(self.submit(order, destination));
        }
        outcomes
    }

    /// Admits `orders` against `capacity` via
    /// [`admission::batch_schedule_with_preemption`], then runs the planned
    /// survivors through the normal `submit` pipeline. A lower-urgency order
    /// displaced to make room for a later, higher-urgency arrival is
    /// reported as `Rejected { reason: Preempted }` rather than silently
    /// dropped — it never reaches the queue at all. Output preserves the
    /// input order of `orders`.
    pub fn submit_with_preemption(
        &self,
        orders: Vec<Order>,
        capacity: usize,
        destination: Option<&str>,
    ) -> Vec<SubmitOutcome> {
        let result = admission::batch_schedule_with_preemption(&orders, capacity);
        let planned_ids: std::collections::HashSet<&str> =
            result.planned.iter().map(|o| o.id.as_str()).collect();

        orders
            .into_iter()
            .map(|order| {
                if planned_ids.contains(order.id.as_str()) {
                    self.submit(order, destination)
                } else {
                    tracing::info!(order_id = %order.id, "rejected: preempted by higher-urgency order");
                    SubmitOutcome::Rejected { id: order.id, reason: RejectReason::Preempted }
                }
            })
            .collect()
    }
}
