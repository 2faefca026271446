//! Estimators for rigid transform hypotheses.

pub mod rigid_transform;

pub use rigid_transform::{RigidTransformEstimator, RotationSolver};
