//! Configuration loading (§6 "Environment / configuration").
//!
//! The corpus's `vaultfs::config::Config::from_env` reads each variable with
//! `env::var(..).expect(..)` or a raw `.parse().unwrap()`, which panics the
//! process on a missing or malformed value — its own commented-out "Correct
//! implementation" returns `Result` and maps parse failures to a proper
//! error instead. This loader follows that corrected shape, using the
//! `config` crate to layer an optional file under environment overrides
//! rather than hand-rolling `env::var` calls one field at a time.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    pub hard_limit: i64,
    #[serde(default = "default_warn_ratio")]
    pub warn_ratio: f64,
    #[serde(default = "default_emergency_ratio")]
    pub emergency_ratio: f64,
}

fn default_warn_ratio() -> f64 {
    0.6
}
fn default_emergency_ratio() -> f64 {
    0.8
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateConfig {
    pub capacity: f64,
    pub refill_per_sec: f64,
    #[serde(default)]
    pub burst_allowance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakerConfig {
    pub failure_threshold: u64,
    pub success_threshold: u64,
    pub reset_timeout_ms: u64,
    pub max_probe: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: u32,
    #[serde(default = "default_deescalation_multiplier")]
    pub deescalation_multiplier: u32,
}

fn default_escalation_threshold() -> u32 {
    2
}
fn default_deescalation_multiplier() -> u32 {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlaConfig {
    pub target_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    pub default_speed: f64,
    pub fuel_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    pub graph: std::collections::HashMap<String, Vec<String>>,
    pub terminal: Vec<String>,
    pub entry: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    pub queue: QueueConfig,
    pub rate: RateConfig,
    pub breaker: BreakerConfig,
    pub policy: PolicyConfig,
    pub sla: SlaConfig,
    pub routing: RoutingConfig,
    pub workflow: WorkflowConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

impl OrchestratorConfig {
    /// Layers an optional `dispatch.toml` (or `DISPATCH_CONFIG` override)
    /// under `DISPATCH__`-prefixed environment variables, then validates
    /// the result against this struct's shape. A missing required field
    /// surfaces as a `ConfigError`, never a panic.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("DISPATCH_CONFIG").unwrap_or_else(|_| "dispatch.toml".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("DISPATCH").separator("__"))
            .build()?;

        settings.try_deserialize().map_err(ConfigError::from)
    }
}
