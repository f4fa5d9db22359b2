//! Structured logging initialization.
//!
//! Every component logs through `tracing`; this is the one place that wires
//! up a subscriber, so services never configure logging ad hoc.

/// Initialize the global `tracing` subscriber with JSON output and an
/// env-filter driven by `RUST_LOG` (defaulting to `info`).
pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .try_init();
}
