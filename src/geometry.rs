//! Geometry primitives shared by the solver, scorer and applicator.

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::error::RegistrationError;
use crate::types::{Point, SAMPLE_SIZE, Triple};

/// Shortest direction vector accepted by the rotation construction.
pub const MIN_DIRECTION_NORM: f64 = 1e-9;

/// Largest |sin| of the angle between two triple edges still treated as collinear.
pub const COLLINEARITY_TOLERANCE: f64 = 1e-9;

/// Arithmetic mean of a point set.
pub fn centroid(points: &[Point]) -> Result<Point, RegistrationError> {
    if points.is_empty() {
        return Err(RegistrationError::EmptyInput);
    }
    let sum = points
        .iter()
        .fold(Vector3::<f64>::zeros(), |acc, p| acc + p.coords);
    Ok(Point::from(sum / points.len() as f64))
}

/// Subtract `origin` from every point of a triple.
pub fn center(triple: &Triple, origin: &Point) -> [Vector3<f64>; SAMPLE_SIZE] {
    triple.map(|p| p - origin)
}

/// Euclidean distance between two points.
pub fn distance(a: &Point, b: &Point) -> f64 {
    nalgebra::distance(a, b)
}

/// True when the three points are coincident or lie on one line.
pub fn is_collinear(triple: &Triple) -> bool {
    let e1 = triple[1] - triple[0];
    let e2 = triple[2] - triple[0];
    let scale = e1.norm() * e2.norm();
    if scale < MIN_DIRECTION_NORM * MIN_DIRECTION_NORM {
        return true;
    }
    e1.cross(&e2).norm() <= COLLINEARITY_TOLERANCE * scale
}

/// Minimal-angle rotation taking the direction of `from` onto the direction of `to`.
///
/// Parallel vectors give the identity. Anti-parallel vectors give a half turn
/// about an axis perpendicular to `from`. Returns `None` when either vector is
/// shorter than [`MIN_DIRECTION_NORM`].
pub fn rotation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<UnitQuaternion<f64>> {
    let a = from.try_normalize(MIN_DIRECTION_NORM)?;
    let b = to.try_normalize(MIN_DIRECTION_NORM)?;

    if let Some(rotation) = UnitQuaternion::rotation_between(&a, &b) {
        return Some(rotation);
    }

    // Opposite directions: any perpendicular axis works.
    let helper = if a.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let axis = Unit::new_normalize(a.cross(&helper));
    Some(UnitQuaternion::from_axis_angle(&axis, std::f64::consts::PI))
}
