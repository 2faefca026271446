//! Core shared types for rigid registration.
//!
//! Point sets are plain `nalgebra` points in ordered vectors; index `i` of the
//! reference set is assumed to correspond to index `i` of the candidate set.

use nalgebra::Point3;

/// A 3D coordinate.
pub type Point = Point3<f64>;

/// Ordered sequence of points.
pub type PointSet = Vec<Point>;

/// Number of correspondences in a minimal sample.
pub const SAMPLE_SIZE: usize = 3;

/// Three points drawn from a single point set.
pub type Triple = [Point; SAMPLE_SIZE];

/// Indices of a minimal sample in both point sets.
///
/// With shared sampling the two index arrays are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleIndices {
    pub reference: [usize; SAMPLE_SIZE],
    pub candidate: [usize; SAMPLE_SIZE],
}

/// A minimal sample: one triple per point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimalSample {
    pub reference: Triple,
    pub candidate: Triple,
}

impl MinimalSample {
    pub fn new(reference: Triple, candidate: Triple) -> Self {
        Self {
            reference,
            candidate,
        }
    }

    /// Gather the points addressed by `indices`.
    ///
    /// Indices must be in range for their respective sets.
    pub fn gather(reference: &[Point], candidate: &[Point], indices: &SampleIndices) -> Self {
        Self {
            reference: indices.reference.map(|i| reference[i]),
            candidate: indices.candidate.map(|i| candidate[i]),
        }
    }
}
