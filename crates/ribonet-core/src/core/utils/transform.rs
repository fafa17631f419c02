use nalgebra::{Matrix3, Point3, Vector3};
use std::ops::Mul;

const IDENTITY_TOLERANCE: f64 = 1e-12;

/// A rigid affine transform stored as the 3×4 matrix `[R | t]`.
///
/// Transforms act on points as `R·p + t`. Composition follows matrix
/// premultiplication: `a.compose(&b)` (or `a * b`) applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    rotation: Matrix3<f64>,
    translation: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Builds a transform from the three rows of a row-major 3×4 matrix.
    pub fn from_rows(rows: [[f64; 4]; 3]) -> Self {
        let rotation = Matrix3::new(
            rows[0][0], rows[0][1], rows[0][2], //
            rows[1][0], rows[1][1], rows[1][2], //
            rows[2][0], rows[2][1], rows[2][2],
        );
        let translation = Vector3::new(rows[0][3], rows[1][3], rows[2][3]);
        Self::new(rotation, translation)
    }

    pub fn translation(offset: Vector3<f64>) -> Self {
        Self::new(Matrix3::identity(), offset)
    }

    /// Rotation about an axis through the origin, angle in radians.
    pub fn rotation_about(axis: &Vector3<f64>, angle: f64) -> Self {
        let rotation = nalgebra::Rotation3::from_axis_angle(
            &nalgebra::Unit::new_normalize(*axis),
            angle,
        );
        Self::new(*rotation.matrix(), Vector3::zeros())
    }

    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    pub fn translation_part(&self) -> &Vector3<f64> {
        &self.translation
    }

    pub fn rows(&self) -> [[f64; 4]; 3] {
        let r = &self.rotation;
        let t = &self.translation;
        [
            [r[(0, 0)], r[(0, 1)], r[(0, 2)], t.x],
            [r[(1, 0)], r[(1, 1)], r[(1, 2)], t.y],
            [r[(2, 0)], r[(2, 1)], r[(2, 2)], t.z],
        ]
    }

    pub fn is_identity(&self) -> bool {
        self.rotation
            .iter()
            .zip(Matrix3::<f64>::identity().iter())
            .all(|(a, b)| (a - b).abs() <= IDENTITY_TOLERANCE)
            && self.translation.iter().all(|v| v.abs() <= IDENTITY_TOLERANCE)
    }

    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    #[inline]
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// Returns `self · other`, the transform applying `other` first.
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// Inverse of a rigid transform: the rotation block is transposed and the
    /// translation is the negated original translation rotated by that transpose.
    pub fn invert(&self) -> Transform {
        let rotation = self.rotation.transpose();
        let translation = -(rotation * self.translation);
        Transform {
            rotation,
            translation,
        }
    }

    /// Builds the transform that moves `p1` to the origin, `p2` onto the positive Y
    /// axis and `p3` into the Y-Z plane (positive Z side).
    ///
    /// The canonical frame has `Y = unit(p2 − p1)`, `X = unit((p2 − p1) × (p3 − p1))`,
    /// `Z = X × Y` and origin `p1`; the returned transform is its inverse.
    pub fn align_from(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> Transform {
        let y = (p2 - p1).normalize();
        let x = (p2 - p1).cross(&(p3 - p1)).normalize();
        let z = x.cross(&y);
        let frame = Transform::new(Matrix3::from_columns(&[x, y, z]), p1.coords);
        frame.invert()
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.compose(&rhs)
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Transform {
        self.compose(rhs)
    }
}
