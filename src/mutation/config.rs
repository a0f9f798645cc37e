//! Mutation configuration.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use super::neighbor_join::NeighborJoinConfig;
use super::operator::Operator;

/// Operator selection for a run.
///
/// `operator` is the engine's default; `schedule` is the pool the GA bridge
/// draws from uniformly for each mutation.
///
/// # Examples
///
/// ```
/// use u_tourmut::mutation::{MutationConfig, Operator};
///
/// let config = MutationConfig::from_json(
///     r#"{ "operator": "TwoOptBest", "schedule": ["TwoOptBest", "DoubleBridge"] }"#,
/// ).unwrap();
/// assert_eq!(config.operator, Operator::TwoOptBest);
/// assert_eq!(config.schedule.len(), 2);
/// assert_eq!(config.neighbor_join.iterations, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Default operator.
    pub operator: Operator,

    /// Operators the GA bridge samples from.
    pub schedule: Vec<Operator>,

    /// Neighbor-join parameters.
    pub neighbor_join: NeighborJoinConfig,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            operator: Operator::Exchange,
            schedule: Operator::PRODUCTION.to_vec(),
            neighbor_join: NeighborJoinConfig::default(),
        }
    }
}

impl MutationConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default operator.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    /// Sets the operator schedule.
    pub fn with_schedule(mut self, schedule: Vec<Operator>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets the neighbor-join parameters.
    pub fn with_neighbor_join(mut self, config: NeighborJoinConfig) -> Self {
        self.neighbor_join = config;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.schedule.is_empty() {
            return Err("schedule must contain at least one operator".into());
        }
        self.neighbor_join
            .validate()
            .map_err(|e| format!("neighbor_join: {e}"))
    }

    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid mutation config")?;
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }
}
