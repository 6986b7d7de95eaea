//! Configuration options for the solver.
//!
//! This module provides the training configuration and the statistics the
//! solver records while it runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for a training run.
///
/// # Example
/// ```
/// use kuhn_cfr::cfr::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.iterations, 300_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Number of iterations to run.
    pub iterations: u64,

    /// Number of convergence samples to keep across the run.
    ///
    /// The metric is recorded every `iterations / num_reports` iterations
    /// (at least every iteration).
    pub num_reports: u64,

    /// Tolerance used when checking that a supplied strategy sums to 1.
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 300_000,
            num_reports: 100,
            tolerance: 1e-9,
        }
    }
}

impl SolverConfig {
    /// Create a new SolverConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method: set the iteration count.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder method: set the number of convergence samples.
    pub fn with_num_reports(mut self, num_reports: u64) -> Self {
        self.num_reports = num_reports;
        self
    }

    /// Builder method: set the strategy tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Iterations between two recorded convergence samples.
    pub fn report_interval(&self) -> u64 {
        (self.iterations / self.num_reports.max(1)).max(1)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.num_reports == 0 {
            return Err(ConfigError::InvalidReportCount(self.num_reports));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Iteration count is zero.
    #[error("iteration count must be positive")]
    ZeroIterations,
    /// Report count is zero.
    #[error("report count {0} must be positive")]
    InvalidReportCount(u64),
    /// Tolerance is outside (0, 1).
    #[error("tolerance {0} is out of range (0, 1)")]
    InvalidTolerance(f64),
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid JSON.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Statistics tracked during training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of information sets in the store.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Convergence metric of the most recent iteration.
    pub total_gain: Option<f64>,

    /// Sampled history of the convergence metric.
    pub gain_history: Vec<GainPoint>,
}

/// A single convergence sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainPoint {
    /// Iteration number when this sample was taken (1-based).
    pub iteration: u64,
    /// Sum of instantaneous positive regret in that iteration.
    pub total_gain: f64,
}

impl SolverStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record a convergence sample.
    pub fn record_gain(&mut self, iteration: u64, total_gain: f64) {
        self.gain_history.push(GainPoint {
            iteration,
            total_gain,
        });
    }
}
