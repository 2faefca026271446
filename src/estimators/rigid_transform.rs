//! Rigid transform estimator for minimal three-point samples.
//!
//! Hypotheses map the candidate triple onto the reference triple. Two
//! rotation constructions are available:
//!
//! - [`RotationSolver::DirectionPair`] aligns a single edge of the centered
//!   candidate triple with the matching edge of the reference triple using the
//!   minimal-angle rotation. Rotation about that edge is left unconstrained, so
//!   this only recovers the full orientation for data that is already
//!   approximately aligned around it.
//! - [`RotationSolver::Kabsch`] solves the least-squares rotation over all
//!   three correspondences via SVD and recovers arbitrary orientations.

use nalgebra::{Matrix3, SVD};

use crate::core::Estimator;
use crate::error::RegistrationError;
use crate::geometry::{center, centroid, is_collinear, rotation_between};
use crate::models::RigidTransform;
use crate::types::{MinimalSample, SAMPLE_SIZE};

/// Edge `0 -> 2` of each triple.
pub const EDGE_FIRST_TO_LAST: (usize, usize) = (0, 2);
/// Edge `0 -> 1` of each triple.
pub const EDGE_FIRST_TO_SECOND: (usize, usize) = (0, 1);

/// Rotation construction used for each hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSolver {
    /// Align the edge `tail -> head` of both centered triples.
    DirectionPair { tail: usize, head: usize },
    /// Least-squares rotation over all three correspondences.
    Kabsch,
}

impl Default for RotationSolver {
    fn default() -> Self {
        Self::direction_pair(EDGE_FIRST_TO_LAST)
    }
}

impl RotationSolver {
    pub fn direction_pair((tail, head): (usize, usize)) -> Self {
        Self::DirectionPair { tail, head }
    }

    /// Whether the edge indices address two different points of a triple.
    pub fn is_valid(&self) -> bool {
        match *self {
            RotationSolver::DirectionPair { tail, head } => {
                tail < SAMPLE_SIZE && head < SAMPLE_SIZE && tail != head
            }
            RotationSolver::Kabsch => true,
        }
    }
}

/// Minimal-sample rigid transform estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RigidTransformEstimator {
    solver: RotationSolver,
}

impl RigidTransformEstimator {
    pub fn new(solver: RotationSolver) -> Self {
        Self { solver }
    }

    pub fn solver(&self) -> RotationSolver {
        self.solver
    }
}

impl Estimator for RigidTransformEstimator {
    type Model = RigidTransform;

    fn is_valid_sample(&self, sample: &MinimalSample) -> bool {
        !is_collinear(&sample.reference) && !is_collinear(&sample.candidate)
    }

    fn estimate_model(&self, sample: &MinimalSample) -> Result<RigidTransform, RegistrationError> {
        if !self.is_valid_sample(sample) {
            return Err(RegistrationError::DegenerateSample(
                "sample points are collinear or coincident",
            ));
        }

        let c_ref = centroid(&sample.reference)?;
        let c_cand = centroid(&sample.candidate)?;
        let p_ref = center(&sample.reference, &c_ref);
        let p_cand = center(&sample.candidate, &c_cand);

        let rotation = match self.solver {
            RotationSolver::DirectionPair { tail, head } => {
                if tail >= SAMPLE_SIZE || head >= SAMPLE_SIZE || tail == head {
                    return Err(RegistrationError::DegenerateSample(
                        "direction edge does not address two sample points",
                    ));
                }
                let from = p_cand[head] - p_cand[tail];
                let to = p_ref[head] - p_ref[tail];
                let rotation = rotation_between(&from, &to).ok_or(
                    RegistrationError::DegenerateSample("direction vector has zero length"),
                )?;
                *rotation.to_rotation_matrix().matrix()
            }
            RotationSolver::Kabsch => {
                // H = sum(cand_i * ref_i^T); R = V * U^T maps cand onto ref.
                let h = p_cand
                    .iter()
                    .zip(&p_ref)
                    .fold(Matrix3::<f64>::zeros(), |acc, (a, b)| acc + a * b.transpose());
                if h.iter().any(|x| !x.is_finite()) {
                    return Err(RegistrationError::DegenerateSample(
                        "non-finite covariance",
                    ));
                }

                let svd = SVD::new(h, true, true);
                let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
                    return Err(RegistrationError::DegenerateSample("svd did not converge"));
                };
                let mut v = v_t.transpose();
                let mut r = v * u.transpose();

                // Ensure proper rotation (det(R) = 1)
                if r.determinant() < 0.0 {
                    v.column_mut(2).neg_mut();
                    r = v * u.transpose();
                }
                r
            }
        };

        let t = c_ref.coords - rotation * c_cand.coords;
        Ok(RigidTransform::from_rt(rotation, t))
    }
}
