use crate::geometry::Point;

/// A 2D affine transformation.
///
/// Stored as the top two rows of a 3x3 matrix in row-major order:
/// `[a, b, tx, c, d, ty]`, mapping `(x, y)` to `(a*x + b*y + tx, c*x + d*y + ty)`.
///
/// Used for the container's scale animations (applied about the container
/// center) and for converting points from a reference view into surface
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub data: [f32; 6],
}

impl Transform {
    /// Identity matrix (no transformation)
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, // row 0
            0.0, 1.0, 0.0, // row 1
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            data: [
                1.0, 0.0, x, // row 0
                0.0, 1.0, y, // row 1
            ],
        }
    }

    pub fn scale(s: f32) -> Self {
        Self::scale_xy(s, s)
    }

    pub fn scale_xy(sx: f32, sy: f32) -> Self {
        Self {
            data: [
                sx, 0.0, 0.0, // row 0
                0.0, sy, 0.0, // row 1
            ],
        }
    }

    /// Uniform scale that keeps `center` fixed.
    pub fn scale_about(s: f32, center: Point) -> Self {
        Self::translate(center.x, center.y)
            .then(&Self::scale(s))
            .then(&Self::translate(-center.x, -center.y))
    }

    /// Compose this transform with another: self * other
    /// Applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let [a1, b1, tx1, c1, d1, ty1] = self.data;
        let [a2, b2, tx2, c2, d2, ty2] = other.data;

        Transform {
            data: [
                a1 * a2 + b1 * c2,
                a1 * b2 + b1 * d2,
                a1 * tx2 + b1 * ty2 + tx1,
                c1 * a2 + d1 * c2,
                c1 * b2 + d1 * d2,
                c1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    /// Inverse of this transform. Degenerate (zero determinant) transforms
    /// invert to the identity.
    pub fn inverse(&self) -> Transform {
        let [a, b, tx, c, d, ty] = self.data;
        let det = a * d - b * c;

        if det.abs() < 1e-10 {
            return Self::IDENTITY;
        }

        let inv_det = 1.0 / det;

        Transform {
            data: [
                d * inv_det,
                -b * inv_det,
                (-d * tx + b * ty) * inv_det,
                -c * inv_det,
                a * inv_det,
                (c * tx - a * ty) * inv_det,
            ],
        }
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, tx, c, d, ty] = self.data;
        Point::new(a * point.x + b * point.y + tx, c * point.x + d * point.y + ty)
    }

    /// Axis-aligned bounding box of `rect` after this transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
