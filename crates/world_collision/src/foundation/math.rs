//! Math utilities and types
//!
//! World geometry is stored with integer coordinates, while the collision
//! math runs on floats in ellipsoid space. Both share nalgebra's `Vector3`.

use nalgebra::{ClosedAdd, ClosedMul, ClosedSub, Scalar};
use num_traits::Zero;

pub use nalgebra::Vector3;

/// Float vector used for ellipsoid-space math
pub type Vec3 = Vector3<f32>;

/// Integer vector used for world-space geometry
pub type WorldVec = Vector3<i32>;

/// Numeric bound shared by integer and float geometry
///
/// Anything that can be added, subtracted and multiplied componentwise is
/// enough for edges, normals and dot products.
pub trait Coord: Scalar + Copy + Zero + ClosedAdd + ClosedSub + ClosedMul {}

impl<T> Coord for T where T: Scalar + Copy + Zero + ClosedAdd + ClosedSub + ClosedMul {}

/// Extension trait for float vectors
pub trait Vec3Ext {
    /// Sum of the squared components
    fn squared_length(&self) -> f32;

    /// Euclidean length
    fn length(&self) -> f32;

    /// Unit vector in the same direction, or the zero vector if this vector
    /// has no length
    fn normalize_or_zero(&self) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn squared_length(&self) -> f32 {
        self.dot(self)
    }

    fn length(&self) -> f32 {
        self.squared_length().sqrt()
    }

    fn normalize_or_zero(&self) -> Vec3 {
        let length = self.length();
        if length > 0.0 {
            self / length
        } else {
            Vec3::zeros()
        }
    }
}

/// Convert a world-space integer vector to floats
#[allow(clippy::cast_precision_loss)]
pub fn to_float(v: &WorldVec) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cross_product_is_right_handed() {
        let x = WorldVec::new(1, 0, 0);
        let y = WorldVec::new(0, 1, 0);
        assert_eq!(x.cross(&y), WorldVec::new(0, 0, 1));
        assert_eq!(y.cross(&x), WorldVec::new(0, 0, -1));
    }

    #[test]
    fn test_length_and_squared_length() {
        let v = Vec3::new(3.0, 4.0, 12.0);
        assert_relative_eq!(v.squared_length(), 169.0);
        assert_relative_eq!(v.length(), 13.0);
        let w = WorldVec::new(1, -2, 2);
        assert_eq!(w.dot(&w), 9);
    }

    #[test]
    fn test_normalize() {
        let v = Vec3::new(0.0, -5.0, 0.0).normalize_or_zero();
        assert_relative_eq!(v, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_normalize_zero_vector_stays_zero() {
        let v = Vec3::zeros().normalize_or_zero();
        assert_eq!(v, Vec3::zeros());
        assert!(v.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_exact_equality_and_scaling() {
        let a = WorldVec::new(2, 4, 6);
        assert_eq!(a * 2, WorldVec::new(4, 8, 12));
        assert_eq!(a - a, WorldVec::zeros());
        assert_ne!(a, WorldVec::new(2, 4, 7));
        assert_eq!(to_float(&a), Vec3::new(2.0, 4.0, 6.0));
    }
}
