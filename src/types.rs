//! Shared identifiers, defaults and ranking configuration.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "damping_factor": 0.999,
//!   "sink_policy": "self_loop",
//!   "max_iterations": 1000,
//!   "magnitude_tolerance": 0.005,
//!   "initial_magnitude": 1.0
//! }
//! ```
//!
//! Every field is optional; omitted fields take the documented defaults.

use serde::{Deserialize, Serialize};

use crate::errors::{PageRankError, Result};
use crate::matrix::MatrixConfig;
use crate::pagerank::PowerIteration;

/// External node identity, as read from the edge list.
pub type NodeId = i64;

/// Probability of following an out-edge instead of staying put.
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.999;

/// Hard cap on power-iteration steps.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Iteration stops once one step shrinks the vector magnitude by no more
/// than this amount.
pub const DEFAULT_MAGNITUDE_TOLERANCE: f64 = 0.005;

/// Default squared norm of the seed vector.
pub const DEFAULT_INITIAL_MAGNITUDE: f64 = 1.0;

/// How `build_matrix` treats nodes without outgoing edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkPolicy {
    /// The sink keeps all of its probability: its diagonal cell is `1.0`.
    #[default]
    SelfLoop,
    /// Fail the build with [`PageRankError::ZeroOutDegree`].
    Reject,
}

/// Full ranking configuration: matrix construction plus solver limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankConfig {
    /// Damping factor in `[0, 1]`.
    pub damping_factor: f64,
    /// Treatment of nodes with zero out-degree.
    pub sink_policy: SinkPolicy,
    /// Maximum number of power-iteration steps.
    pub max_iterations: usize,
    /// Magnitude-drop threshold that ends the iteration.
    pub magnitude_tolerance: f64,
    /// Squared Euclidean norm of the uniform seed vector.
    pub initial_magnitude: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping_factor: DEFAULT_DAMPING_FACTOR,
            sink_policy: SinkPolicy::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            magnitude_tolerance: DEFAULT_MAGNITUDE_TOLERANCE,
            initial_magnitude: DEFAULT_INITIAL_MAGNITUDE,
        }
    }
}

impl RankConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping_factor: f64) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    /// Set the sink policy
    pub fn with_sink_policy(mut self, sink_policy: SinkPolicy) -> Self {
        self.sink_policy = sink_policy;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the magnitude-drop tolerance
    pub fn with_tolerance(mut self, magnitude_tolerance: f64) -> Self {
        self.magnitude_tolerance = magnitude_tolerance;
        self
    }

    /// Set the seed vector magnitude
    pub fn with_initial_magnitude(mut self, initial_magnitude: f64) -> Self {
        self.initial_magnitude = initial_magnitude;
        self
    }

    /// Check every field against its admissible range.
    pub fn validate(&self) -> Result<()> {
        if !self.damping_factor.is_finite() || !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(PageRankError::InvalidConfig(format!(
                "damping_factor must lie in [0, 1], got {}",
                self.damping_factor
            )));
        }
        if self.max_iterations == 0 {
            return Err(PageRankError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.magnitude_tolerance.is_finite() || self.magnitude_tolerance < 0.0 {
            return Err(PageRankError::InvalidConfig(format!(
                "magnitude_tolerance must be finite and non-negative, got {}",
                self.magnitude_tolerance
            )));
        }
        if !self.initial_magnitude.is_finite() || self.initial_magnitude <= 0.0 {
            return Err(PageRankError::InvalidConfig(format!(
                "initial_magnitude must be finite and positive, got {}",
                self.initial_magnitude
            )));
        }
        Ok(())
    }

    /// The matrix-construction half of this config.
    pub fn matrix_config(&self) -> MatrixConfig {
        MatrixConfig {
            damping_factor: self.damping_factor,
            sink_policy: self.sink_policy,
        }
    }

    /// The solver half of this config.
    pub fn solver(&self) -> PowerIteration {
        PowerIteration::new()
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.magnitude_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RankConfig::default();
        assert_eq!(config.damping_factor, 0.999);
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.magnitude_tolerance, 0.005);
        assert_eq!(config.sink_policy, SinkPolicy::SelfLoop);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = RankConfig::from_json(r#"{"damping_factor": 0.85, "sink_policy": "reject"}"#)
            .unwrap();
        assert_eq!(config.damping_factor, 0.85);
        assert_eq!(config.sink_policy, SinkPolicy::Reject);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = RankConfig::from_json("{}").unwrap();
        assert_eq!(config, RankConfig::default());
    }

    #[test]
    fn test_from_json_unknown_field() {
        let err = RankConfig::from_json(r#"{"dampng": 0.5}"#).unwrap_err();
        assert!(matches!(err, PageRankError::Config(_)));
    }

    #[test]
    fn test_from_json_out_of_range() {
        let err = RankConfig::from_json(r#"{"damping_factor": 1.5}"#).unwrap_err();
        assert!(matches!(err, PageRankError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RankConfig::new().with_damping(-0.1).validate().is_err());
        assert!(RankConfig::new().with_damping(f64::NAN).validate().is_err());
        assert!(RankConfig::new().with_max_iterations(0).validate().is_err());
        assert!(RankConfig::new().with_tolerance(-1.0).validate().is_err());
        assert!(RankConfig::new().with_initial_magnitude(0.0).validate().is_err());
        assert!(RankConfig::new().with_damping(0.0).validate().is_ok());
        assert!(RankConfig::new().with_damping(1.0).validate().is_ok());
    }

    #[test]
    fn test_split_into_stage_configs() {
        let config = RankConfig::new()
            .with_damping(0.9)
            .with_sink_policy(SinkPolicy::Reject)
            .with_max_iterations(10)
            .with_tolerance(0.1);

        let matrix = config.matrix_config();
        assert_eq!(matrix.damping_factor, 0.9);
        assert_eq!(matrix.sink_policy, SinkPolicy::Reject);

        let solver = config.solver();
        assert_eq!(solver.max_iterations, 10);
        assert_eq!(solver.magnitude_tolerance, 0.1);
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let json = serde_json::to_value(RankConfig::default()).unwrap();
        assert_eq!(json["sink_policy"], "self_loop");
        assert_eq!(json["max_iterations"], 1000);
    }
}
