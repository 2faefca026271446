//! High-level registration API.
//!
//! [`register`] estimates the rigid transform that maps the candidate set onto
//! the reference set, assuming positional correspondence between the two.

use crate::core::{EarlyStopCriterion, Ransac, RansacStatus};
use crate::error::RegistrationError;
use crate::estimators::RigidTransformEstimator;
use crate::models::RigidTransform;
use crate::samplers::UniformRandomSampler;
use crate::scoring::{InlierCountScoring, rigid_residual};
use crate::settings::RegistrationSettings;
use crate::types::{Point, PointSet};

/// Result of a registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    /// Maps candidate points into the reference frame.
    pub transform: RigidTransform,
    /// Correspondences within the threshold after alignment.
    pub inlier_count: usize,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Samples whose hypothesis could not be solved.
    pub degenerate_samples: usize,
    pub early_stopped: bool,
}

impl Registration {
    /// `false` when no hypothesis explained a single correspondence; the
    /// transform is then the identity and carries no information.
    pub fn has_consensus(&self) -> bool {
        self.inlier_count > 0
    }

    /// Fraction of the scored correspondences that are inliers.
    pub fn inlier_ratio(&self, reference: &[Point], candidate: &[Point]) -> f64 {
        let n = reference.len().min(candidate.len());
        if n == 0 {
            0.0
        } else {
            self.inlier_count as f64 / n as f64
        }
    }

    /// Candidate points mapped into the reference frame.
    pub fn aligned(&self, candidate: &[Point]) -> PointSet {
        self.transform.apply(candidate)
    }
}

type ResidualFn = fn(&[Point], &[Point], &RigidTransform, usize) -> f64;
type RigidScoring = InlierCountScoring<RigidTransform, ResidualFn>;

type RigidRansac<'a> =
    Ransac<'a, RigidTransformEstimator, UniformRandomSampler, RigidScoring, EarlyStopCriterion>;

fn build<'a>(
    reference: &'a [Point],
    candidate: &'a [Point],
    settings: &RegistrationSettings,
    sampler: UniformRandomSampler,
) -> Result<RigidRansac<'a>, RegistrationError> {
    settings.validate()?;
    Ransac::new(
        reference,
        candidate,
        settings.iterations,
        RigidTransformEstimator::new(settings.rotation_solver),
        sampler,
        InlierCountScoring::new(settings.threshold, rigid_residual as ResidualFn),
        EarlyStopCriterion {
            fraction: settings.early_stop_fraction,
        },
        RigidTransform::identity(),
    )
}

fn finish(ransac: RigidRansac<'_>) -> Registration {
    let early_stopped = ransac.status() == RansacStatus::EarlyStopped;
    Registration {
        transform: ransac.best_model,
        inlier_count: ransac.best_score.inlier_count,
        iterations: ransac.iteration,
        degenerate_samples: ransac.degenerate_samples,
        early_stopped,
    }
}

/// Estimate the rigid transform aligning `candidate` onto `reference`.
///
/// # Arguments
/// * `reference` - Reference point set
/// * `candidate` - Point set to align; `candidate[i]` corresponds to `reference[i]`
/// * `settings` - Iteration budget, threshold, early stop and solver choice
///
/// # Errors
/// `InsufficientPoints` when either set has fewer than three points and
/// `InvalidSettings` when `settings` fails validation. Degenerate samples are
/// absorbed by the search; if nothing better is found the result is the
/// identity with zero inliers.
///
/// # Example
/// ```
/// use rigid_ransac::{RegistrationSettings, register};
/// use rigid_ransac::types::Point;
///
/// let reference = vec![
///     Point::new(0.0, 0.0, 0.0),
///     Point::new(1.0, 0.0, 0.0),
///     Point::new(0.0, 2.0, 0.0),
///     Point::new(0.0, 0.0, 3.0),
/// ];
/// let offset = nalgebra::Vector3::new(1.0, 1.0, 1.0);
/// let candidate: Vec<Point> = reference.iter().map(|p| p + offset).collect();
///
/// let result = register(&reference, &candidate, &RegistrationSettings::default()).unwrap();
/// assert_eq!(result.inlier_count, 4);
/// ```
pub fn register(
    reference: &[Point],
    candidate: &[Point],
    settings: &RegistrationSettings,
) -> Result<Registration, RegistrationError> {
    let sampler = UniformRandomSampler::new(settings.sampling);
    let mut ransac = build(reference, candidate, settings, sampler)?;
    ransac.run();
    Ok(finish(ransac))
}

/// [`register`] with a fixed sampler seed, for reproducible results.
pub fn register_with_seed(
    reference: &[Point],
    candidate: &[Point],
    settings: &RegistrationSettings,
    seed: u64,
) -> Result<Registration, RegistrationError> {
    let sampler = UniformRandomSampler::from_seed(settings.sampling, seed);
    let mut ransac = build(reference, candidate, settings, sampler)?;
    ransac.run();
    Ok(finish(ransac))
}

/// [`register_with_seed`] with hypotheses solved and scored on the rayon pool.
///
/// Produces the same result as the sequential search for the same seed.
#[cfg(feature = "parallel")]
pub fn register_parallel(
    reference: &[Point],
    candidate: &[Point],
    settings: &RegistrationSettings,
    seed: u64,
) -> Result<Registration, RegistrationError> {
    let sampler = UniformRandomSampler::from_seed(settings.sampling, seed);
    let mut ransac = build(reference, candidate, settings, sampler)?;
    ransac.run_parallel();
    Ok(finish(ransac))
}
