//! Registration configuration.

use crate::error::RegistrationError;
use crate::estimators::RotationSolver;
use crate::samplers::SamplingStrategy;

/// Default number of RANSAC iterations.
pub const DEFAULT_ITERATIONS: usize = 10_000;
/// Default inlier distance threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.1;
/// Default early-stop fraction of the candidate set size.
pub const DEFAULT_EARLY_STOP_FRACTION: f64 = 0.5;

/// Main configuration object for [`register`](crate::api::register).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistrationSettings {
    /// Upper bound on RANSAC iterations.
    pub iterations: usize,
    /// Correspondences closer than this after alignment are inliers.
    pub threshold: f64,
    /// Stop once the best inlier count exceeds this fraction of the candidate
    /// set size. `None` runs every iteration.
    pub early_stop_fraction: Option<f64>,
    pub sampling: SamplingStrategy,
    pub rotation_solver: RotationSolver,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            threshold: DEFAULT_THRESHOLD,
            early_stop_fraction: Some(DEFAULT_EARLY_STOP_FRACTION),
            sampling: SamplingStrategy::Shared,
            rotation_solver: RotationSolver::default(),
        }
    }
}

impl RegistrationSettings {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_early_stop(mut self, fraction: Option<f64>) -> Self {
        self.early_stop_fraction = fraction;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingStrategy) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_rotation_solver(mut self, solver: RotationSolver) -> Self {
        self.rotation_solver = solver;
        self
    }

    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.iterations == 0 {
            return Err(RegistrationError::InvalidSettings(
                "iterations must be positive".to_string(),
            ));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(RegistrationError::InvalidSettings(format!(
                "threshold must be a positive finite number, got {}",
                self.threshold
            )));
        }
        if let Some(fraction) = self.early_stop_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(RegistrationError::InvalidSettings(format!(
                    "early stop fraction must lie in (0, 1], got {fraction}"
                )));
            }
        }
        if !self.rotation_solver.is_valid() {
            return Err(RegistrationError::InvalidSettings(format!(
                "rotation solver edge is invalid: {:?}",
                self.rotation_solver
            )));
        }
        Ok(())
    }
}
