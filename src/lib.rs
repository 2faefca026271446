//! # rigid-ransac - Rigid Registration with RANSAC
//!
//! `rigid-ransac` aligns a candidate 3D point set onto a reference point set by
//! estimating a rotation and translation with random sample consensus. The two
//! sets are assumed to correspond positionally: `candidate[i]` is a noisy,
//! possibly outlying observation of `reference[i]`.
//!
//! ## Quick Start
//!
//! ```rust
//! use rigid_ransac::{RegistrationSettings, register_with_seed};
//! use rigid_ransac::types::Point;
//!
//! let reference = vec![
//!     Point::new(0.0, 0.0, 0.0),
//!     Point::new(1.0, 0.0, 0.0),
//!     Point::new(0.0, 1.0, 0.0),
//!     Point::new(1.0, 1.0, 1.0),
//! ];
//! let candidate = reference.clone();
//!
//! let result = register_with_seed(&reference, &candidate, &RegistrationSettings::default(), 7).unwrap();
//! println!("{}", result.transform);
//! println!("Found {} inliers", result.inlier_count);
//! let aligned = result.aligned(&candidate);
//! assert_eq!(aligned.len(), candidate.len());
//! ```
//!
//! ## Rotation solvers
//!
//! Each hypothesis is solved from three correspondences. The default
//! [`RotationSolver::DirectionPair`] aligns a single edge of the two sample
//! triangles, which fixes the rotation only up to a spin about that edge; it
//! suits data that is already roughly aligned. [`RotationSolver::Kabsch`]
//! solves the full least-squares rotation over the three correspondences and
//! recovers arbitrary orientations.
//!
//! ## Extending the Library
//!
//! The driver in [`core`] is generic over the same extension traits used by
//! the built-in components:
//!
//! - **[`Estimator`](core::Estimator)**: hypotheses from minimal samples
//! - **[`Sampler`](core::Sampler)**: index selection for minimal samples
//! - **[`Scoring<M>`](core::Scoring)**: hypothesis quality
//! - **[`TerminationCriterion<S>`](core::TerminationCriterion)**: early stopping
//!
//! ## Features
//!
//! - `parallel`: solve and score hypotheses on the rayon thread pool with
//!   [`register_parallel`]. Results equal the sequential search for the same seed.
//!
//! ## Modules
//!
//! - **[`api`](api)**: High-level registration functions
//! - **[`core`](core)**: Core traits and the `Ransac` driver
//! - **[`estimators`](estimators)**: Minimal-sample rigid transform solver
//! - **[`samplers`](samplers)**: Minimal sample index selection
//! - **[`scoring`](scoring)**: Inlier counting
//! - **[`models`](models)**: The rigid transform model
//! - **[`settings`](settings)**: Registration configuration
//! - **[`geometry`](geometry)**: Centroids, distances and rotation construction
//! - **[`io`](io)**: Point record loading

pub mod api;
pub mod core;
pub mod error;
pub mod estimators;
pub mod geometry;
pub mod io;
pub mod models;
pub mod samplers;
pub mod scoring;
pub mod settings;
pub mod types;
pub mod utils;

pub use api::{Registration, register, register_with_seed};

#[cfg(feature = "parallel")]
pub use api::register_parallel;

pub use crate::core::{Estimator, Sampler, Scoring, TerminationCriterion};
pub use error::{PointSetRole, RegistrationError};
pub use estimators::{RigidTransformEstimator, RotationSolver};
pub use models::RigidTransform;
pub use samplers::SamplingStrategy;
pub use settings::RegistrationSettings;
