//! Rigid transform model produced by the registration.

use std::fmt;

use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::types::{Point, PointSet};

/// Rigid transform in 3D (rotation followed by translation).
///
/// A point `p` maps to `rotation * p + translation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidTransform {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Translation3<f64>,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    pub fn new(rotation: UnitQuaternion<f64>, translation: Translation3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(UnitQuaternion::identity(), Translation3::identity())
    }

    /// Build from a rotation matrix and a translation vector.
    ///
    /// The matrix is assumed orthonormal with determinant +1.
    pub fn from_rt(r: Matrix3<f64>, t: Vector3<f64>) -> Self {
        let rot = Rotation3::from_matrix_unchecked(r);
        Self::new(UnitQuaternion::from_rotation_matrix(&rot), Translation3::from(t))
    }

    pub fn transform_point(&self, p: &Point) -> Point {
        self.translation.transform_point(&self.rotation.transform_point(p))
    }

    /// Map every point through the transform, keeping order and cardinality.
    pub fn apply(&self, points: &[Point]) -> PointSet {
        points.iter().map(|p| self.transform_point(p)).collect()
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        let translation = Translation3::from(-(rotation * self.translation.vector));
        Self::new(rotation, translation)
    }

    /// `self` applied after `first`.
    pub fn compose(&self, first: &RigidTransform) -> Self {
        let rotation = self.rotation * first.rotation;
        let translation =
            Translation3::from(self.rotation * first.translation.vector + self.translation.vector);
        Self::new(rotation, translation)
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        *self.rotation.to_rotation_matrix().matrix()
    }

    pub fn to_matrix4(&self) -> Matrix4<f64> {
        let r = self.rotation.to_homogeneous();
        let t = self.translation.to_homogeneous();
        t * r
    }
}

impl fmt::Display for RigidTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.rotation_matrix();
        writeln!(f, "Rotation (R):")?;
        for row in r.row_iter() {
            writeln!(f, "  {:>10.6} {:>10.6} {:>10.6}", row[0], row[1], row[2])?;
        }
        let t = &self.translation.vector;
        write!(f, "Translation (T):\n  {:>10.6} {:>10.6} {:>10.6}", t.x, t.y, t.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn sample_transform() -> RigidTransform {
        RigidTransform::new(
            UnitQuaternion::from_euler_angles(0.3, -0.8, 1.9),
            Translation3::new(4.0, -2.0, 0.5),
        )
    }

    fn sample_points() -> PointSet {
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, -2.0, 3.0),
            Point::new(-4.5, 0.25, 1.0),
            Point::new(7.0, 7.0, -7.0),
        ]
    }

    #[test]
    fn apply_preserves_order_and_cardinality() {
        let t = sample_transform();
        let points = sample_points();
        let moved = t.apply(&points);
        assert_eq!(moved.len(), points.len());
        for (p, q) in points.iter().zip(&moved) {
            assert_relative_eq!(t.transform_point(p), *q, epsilon = 1e-12);
        }
    }

    #[test]
    fn transform_rotates_then_translates() {
        let t = RigidTransform::new(
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2),
            Translation3::new(1.0, 0.0, 0.0),
        );
        let p = t.transform_point(&Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn inverse_round_trip_restores_points() {
        let t = sample_transform();
        let points = sample_points();
        let back = t.inverse().apply(&t.apply(&points));
        for (p, q) in points.iter().zip(&back) {
            assert_relative_eq!(*p, *q, epsilon = 1e-9);
        }
    }

    #[test]
    fn compose_matches_sequential_application() {
        let a = sample_transform();
        let b = RigidTransform::new(
            UnitQuaternion::from_euler_angles(-1.0, 0.1, 0.4),
            Translation3::new(0.0, 3.0, -1.0),
        );
        let ab = b.compose(&a);
        for p in sample_points() {
            assert_relative_eq!(
                ab.transform_point(&p),
                b.transform_point(&a.transform_point(&p)),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn matrix_forms_agree() {
        let t = sample_transform();
        let m = t.to_matrix4();
        let p = Point::new(1.5, -0.5, 2.0);
        let h = m * p.to_homogeneous();
        assert_relative_eq!(Point::from_homogeneous(h).unwrap(), t.transform_point(&p), epsilon = 1e-9);

        let r = t.rotation_matrix();
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn display_prints_rows() {
        let text = RigidTransform::identity().to_string();
        assert!(text.starts_with("Rotation (R):"));
        assert!(text.contains("Translation (T):"));
        assert_eq!(text.lines().count(), 6);
    }
}
