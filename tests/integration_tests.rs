//! Integration tests for the high-level registration API.
//!
//! These tests generate synthetic point sets with known transforms and check
//! that registration recovers them under the documented conditions.

use approx::assert_relative_eq;
use nalgebra::{Matrix3, Translation3, UnitQuaternion, Vector3};
use rand::prelude::*;
use rigid_ransac::io::parse_point_set;
use rigid_ransac::types::{Point, PointSet};
use rigid_ransac::*;

fn random_points(n: usize, seed: u64) -> PointSet {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            )
        })
        .collect()
}

fn known_transform() -> RigidTransform {
    RigidTransform::new(
        UnitQuaternion::from_euler_angles(0.7, -0.4, 2.1),
        Translation3::new(3.0, -1.0, 0.5),
    )
}

fn translation_only() -> RigidTransform {
    RigidTransform::new(
        UnitQuaternion::identity(),
        Translation3::new(-2.0, 4.5, 1.25),
    )
}

fn kabsch() -> RegistrationSettings {
    RegistrationSettings::default().with_rotation_solver(RotationSolver::Kabsch)
}

fn assert_aligned(result: &Registration, reference: &[Point], candidate: &[Point], tol: f64) {
    for (r, c) in reference.iter().zip(result.aligned(candidate)) {
        assert!((r - c).norm() < tol, "point {r:?} misaligned with {c:?}");
    }
}

#[test]
fn test_identity_recovery_single_iteration() {
    let points = random_points(25, 1);
    for settings in [RegistrationSettings::default(), kabsch()] {
        let settings = settings.with_iterations(1);
        let result = register_with_seed(&points, &points, &settings, 99).unwrap();

        assert_relative_eq!(result.transform.rotation.angle(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            result.transform.translation.vector,
            Vector3::zeros(),
            epsilon = 1e-9
        );
        assert_eq!(result.inlier_count, points.len());
        assert_eq!(result.iterations, 1);
    }
}

#[test]
fn test_known_transform_recovery_kabsch() {
    let reference = random_points(40, 2);
    let t = known_transform();
    let candidate = t.apply(&reference);

    // The estimate maps the candidate back onto the reference, i.e. T^-1.
    let result = register_with_seed(&reference, &candidate, &kabsch(), 5).unwrap();
    assert_eq!(result.inlier_count, reference.len());
    assert_aligned(&result, &reference, &candidate, 0.1);

    let expected = t.inverse();
    assert_relative_eq!(
        result.transform.rotation_matrix(),
        expected.rotation_matrix(),
        epsilon = 1e-6
    );
    assert_relative_eq!(
        result.transform.translation.vector,
        expected.translation.vector,
        epsilon = 1e-6
    );

    // Re-applying the forward transform reproduces the candidate frame.
    let round_trip = t.apply(&result.aligned(&candidate));
    for (a, b) in round_trip.iter().zip(&candidate) {
        assert!((a - b).norm() < 0.1);
    }
}

#[test]
fn test_known_translation_recovery_direction_pair() {
    let reference = random_points(30, 3);
    let candidate = translation_only().apply(&reference);

    let result =
        register_with_seed(&reference, &candidate, &RegistrationSettings::default(), 8).unwrap();
    assert_eq!(result.inlier_count, reference.len());
    assert_aligned(&result, &reference, &candidate, 0.1);
    assert_relative_eq!(
        result.transform.translation.vector,
        -translation_only().translation.vector,
        epsilon = 1e-9
    );
}

#[test]
fn test_outlier_robustness() {
    let reference = random_points(50, 6);
    let mut candidate = known_transform().apply(&reference);

    let mut rng = StdRng::seed_from_u64(60);
    let mut corrupted = vec![false; candidate.len()];
    for idx in rand::seq::index::sample(&mut rng, candidate.len(), 15).into_vec() {
        let direction = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .try_normalize(1e-6)
        .unwrap_or_else(Vector3::x);
        candidate[idx] += direction * rng.gen_range(2.0..20.0);
        corrupted[idx] = true;
    }

    let settings = kabsch().with_iterations(2000);
    let result = register_with_seed(&reference, &candidate, &settings, 13).unwrap();

    assert_eq!(result.inlier_count, 35);
    let aligned = result.aligned(&candidate);
    for ((r, a), bad) in reference.iter().zip(&aligned).zip(&corrupted) {
        if !bad {
            assert!((r - a).norm() < settings.threshold);
        }
    }
}

#[test]
fn test_outlier_robustness_translation_default_solver() {
    let reference = random_points(40, 7);
    let mut candidate = translation_only().apply(&reference);
    for p in candidate.iter_mut().take(12) {
        p.y += 8.0;
    }

    let settings = RegistrationSettings::default().with_early_stop(None);
    let result = register_with_seed(&reference, &candidate, &settings, 21).unwrap();
    assert_eq!(result.inlier_count, 28);
    assert_eq!(result.iterations, settings.iterations);
    assert!(!result.early_stopped);
}

#[test]
fn test_degenerate_inputs_do_not_fail() {
    let line: PointSet = (0..10)
        .map(|i| Point::new(i as f64, 2.0 * i as f64, -(i as f64)))
        .collect();
    let settings = RegistrationSettings::default().with_iterations(50);
    let result = register_with_seed(&line, &line, &settings, 3).unwrap();

    assert!(!result.has_consensus());
    assert_eq!(result.inlier_count, 0);
    assert_eq!(result.transform, RigidTransform::identity());
    assert_eq!(result.degenerate_samples, 50);
}

#[test]
fn test_partially_collinear_inputs_still_register() {
    let mut reference: PointSet = (0..6).map(|i| Point::new(i as f64, 0.0, 0.0)).collect();
    reference.extend(random_points(6, 9));
    let candidate = translation_only().apply(&reference);

    let settings = RegistrationSettings::default().with_early_stop(None).with_iterations(500);
    let result = register_with_seed(&reference, &candidate, &settings, 4).unwrap();
    assert_eq!(result.inlier_count, reference.len());
    assert!(result.degenerate_samples > 0);
}

#[test]
fn test_three_point_boundary() {
    let reference = vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(2.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 1.0),
    ];
    let candidate = known_transform().apply(&reference);

    for settings in [kabsch(), kabsch().with_sampling(SamplingStrategy::Independent)] {
        let settings = settings.with_early_stop(None).with_iterations(100);
        let result = register_with_seed(&reference, &candidate, &settings, 2).unwrap();
        assert_eq!(result.iterations, 100);
        assert!(result.has_consensus());
        assert!(result.transform.rotation_matrix().determinant() > 0.0);
    }

    // With shared indices every sample is the whole set in some order, so
    // the least-squares solve is exact.
    let result = register_with_seed(&reference, &candidate, &kabsch(), 2).unwrap();
    assert_eq!(result.inlier_count, 3);
    assert!(result.early_stopped);
    assert_eq!(result.iterations, 1);
    assert_aligned(&result, &reference, &candidate, 1e-6);
}

#[test]
fn test_independent_sampling_finds_translation() {
    let reference = random_points(5, 10);
    let candidate = translation_only().apply(&reference);
    let settings = RegistrationSettings::default()
        .with_sampling(SamplingStrategy::Independent)
        .with_iterations(5000);

    let result = register_with_seed(&reference, &candidate, &settings, 17).unwrap();
    assert_eq!(result.inlier_count, 5);
    assert!(result.early_stopped);
}

#[test]
fn test_too_few_points() {
    let three = random_points(3, 11);
    let two = random_points(2, 12);
    let settings = RegistrationSettings::default();
    assert!(matches!(
        register(&two, &three, &settings),
        Err(RegistrationError::InsufficientPoints {
            set: PointSetRole::Reference,
            found: 2
        })
    ));
    assert!(matches!(
        register(&three, &two, &settings),
        Err(RegistrationError::InsufficientPoints {
            set: PointSetRole::Candidate,
            found: 2
        })
    ));
}

#[test]
fn test_round_trip_random_transforms() {
    let points = random_points(20, 14);
    let mut rng = StdRng::seed_from_u64(15);
    for _ in 0..25 {
        let t = RigidTransform::new(
            UnitQuaternion::from_euler_angles(
                rng.gen_range(-3.1..3.1),
                rng.gen_range(-1.5..1.5),
                rng.gen_range(-3.1..3.1),
            ),
            Translation3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            ),
        );
        let back = t.inverse().apply(&t.apply(&points));
        for (p, q) in points.iter().zip(&back) {
            assert_relative_eq!(*p, *q, epsilon = 1e-9);
        }
        let r = t.rotation_matrix();
        assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-12);
    }
}

#[test]
fn test_register_parsed_records() {
    let reference = parse_point_set("5\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n1 1 1\n").unwrap();
    let candidate = parse_point_set(
        "5\n0.5 0.5 0.5\n1.5 0.5 0.5\n0.5 1.5 0.5\n0.5 0.5 1.5\n1.5 1.5 1.5\n",
    )
    .unwrap();

    let result =
        register_with_seed(&reference, &candidate, &RegistrationSettings::default(), 0).unwrap();
    assert_eq!(result.inlier_count, 5);
    assert_relative_eq!(
        result.transform.translation.vector,
        Vector3::new(-0.5, -0.5, -0.5),
        epsilon = 1e-9
    );
}

#[test]
fn test_same_seed_same_result() {
    let reference = random_points(30, 16);
    let mut candidate = known_transform().apply(&reference);
    for p in candidate.iter_mut().step_by(5) {
        p.z += 3.0;
    }
    let settings = kabsch().with_iterations(200).with_early_stop(None);
    let a = register_with_seed(&reference, &candidate, &settings, 42).unwrap();
    let b = register_with_seed(&reference, &candidate, &settings, 42).unwrap();
    assert_eq!(a, b);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let reference = random_points(60, 17);
    let mut candidate = known_transform().apply(&reference);
    for p in candidate.iter_mut().step_by(3) {
        p.x -= 4.0;
    }
    for settings in [kabsch().with_early_stop(None), kabsch()] {
        let settings = settings.with_iterations(500);
        let sequential = register_with_seed(&reference, &candidate, &settings, 77).unwrap();
        let parallel = register_parallel(&reference, &candidate, &settings, 77).unwrap();
        assert_eq!(sequential, parallel);
    }
}
