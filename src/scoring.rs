//! Inlier-count scoring of rigid transform hypotheses.
//!
//! Correspondence `i` pairs `reference[i]` with `candidate[i]`; only the first
//! `min(|reference|, |candidate|)` pairs are scored.

use crate::core::Scoring;
use crate::geometry::distance;
use crate::models::RigidTransform;
use crate::types::Point;

/// Number of correspondences a hypothesis explains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub inlier_count: usize,
}

impl Score {
    pub fn new(inlier_count: usize) -> Self {
        Self { inlier_count }
    }
}

/// Distance between `reference[idx]` and the transformed `candidate[idx]`.
pub fn rigid_residual(
    reference: &[Point],
    candidate: &[Point],
    model: &RigidTransform,
    idx: usize,
) -> f64 {
    distance(&reference[idx], &model.transform_point(&candidate[idx]))
}

/// Count correspondences whose residual is strictly below `threshold`.
pub fn count_inliers(
    reference: &[Point],
    candidate: &[Point],
    transform: &RigidTransform,
    threshold: f64,
) -> usize {
    InlierCountScoring::new(threshold, rigid_residual)
        .score(reference, candidate, transform)
        .inlier_count
}

/// RANSAC-style scoring that counts inliers using a residual function.
///
/// The residual function takes `(reference, candidate, model, index)` and
/// returns a non-negative residual.
pub struct InlierCountScoring<M, F>
where
    F: Fn(&[Point], &[Point], &M, usize) -> f64,
{
    threshold: f64,
    residual_fn: F,
    _marker: std::marker::PhantomData<fn(&M)>,
}

impl<M, F> InlierCountScoring<M, F>
where
    F: Fn(&[Point], &[Point], &M, usize) -> f64,
{
    pub fn new(threshold: f64, residual_fn: F) -> Self {
        Self {
            threshold,
            residual_fn,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<M, F> Scoring<M> for InlierCountScoring<M, F>
where
    F: Fn(&[Point], &[Point], &M, usize) -> f64,
{
    type Score = Score;

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn score(&self, reference: &[Point], candidate: &[Point], model: &M) -> Score {
        let n = reference.len().min(candidate.len());
        let inlier_count = (0..n)
            .filter(|&i| (self.residual_fn)(reference, candidate, model, i) < self.threshold)
            .count();
        Score::new(inlier_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion};

    #[test]
    fn inlier_count_scoring_counts_correctly() {
        let reference = vec![Point::origin(); 5];
        let candidate = vec![
            Point::new(0.1, 0.0, 0.0),
            Point::new(0.4, 0.0, 0.0),
            Point::new(0.6, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 0.3, 0.0),
        ];
        let model = RigidTransform::identity();

        let scoring = InlierCountScoring::new(0.5, rigid_residual);
        let s = scoring.score(&reference, &candidate, &model);
        assert_eq!(s.inlier_count, 3);
    }

    #[test]
    fn threshold_is_strict() {
        let reference = vec![Point::origin()];
        let candidate = vec![Point::new(0.25, 0.0, 0.0)];
        let identity = RigidTransform::identity();
        assert_eq!(count_inliers(&reference, &candidate, &identity, 0.25), 0);
        assert_eq!(count_inliers(&reference, &candidate, &identity, 0.2500001), 1);
    }

    #[test]
    fn only_common_prefix_is_scored() {
        let reference = vec![Point::origin(); 3];
        let candidate = vec![Point::origin(); 8];
        let identity = RigidTransform::identity();
        assert_eq!(count_inliers(&reference, &candidate, &identity, 0.1), 3);
        assert_eq!(count_inliers(&candidate, &reference, &identity, 0.1), 3);
    }

    #[test]
    fn transform_is_applied_to_candidate() {
        let reference = vec![Point::new(1.0, 2.0, 3.0), Point::new(-1.0, 0.0, 0.0)];
        let shift = RigidTransform::new(UnitQuaternion::identity(), Translation3::new(1.0, 2.0, 3.0));
        let candidate = shift.inverse().apply(&reference);
        assert_eq!(count_inliers(&reference, &candidate, &shift, 1e-6), 2);
        assert_eq!(
            count_inliers(&reference, &candidate, &RigidTransform::identity(), 1e-6),
            0
        );
    }

    #[test]
    fn scores_order_by_inlier_count() {
        assert!(Score::new(4) > Score::new(3));
        assert_eq!(Score::default(), Score::new(0));
    }
}
