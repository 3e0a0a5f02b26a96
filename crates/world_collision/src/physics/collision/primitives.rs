//! Primitive collision shapes
//!
//! Triangles, planes and axis-aligned boxes used to describe static world
//! geometry and to run the swept-ellipsoid test against it.

use crate::foundation::math::{to_float, Coord, Vec3, Vec3Ext, Vector3, WorldVec};
use super::narrow_phase::EllipsoidRadius;

/// A triangle given by three corners
///
/// World geometry uses integer corners (`Triangle3<i32>`); the narrow phase
/// works on float triangles in ellipsoid space (`Triangle3<f32>`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle3<T: Coord> {
    /// First corner
    pub a: Vector3<T>,
    /// Second corner
    pub b: Vector3<T>,
    /// Third corner
    pub c: Vector3<T>,
}

impl<T: Coord> Triangle3<T> {
    /// Creates a new triangle
    pub fn new(a: Vector3<T>, b: Vector3<T>, c: Vector3<T>) -> Self {
        Self { a, b, c }
    }

    /// Corner `index`, wrapping around after the third corner
    pub fn get_point(&self, index: usize) -> Vector3<T> {
        match index % 3 {
            0 => self.a,
            1 => self.b,
            _ => self.c,
        }
    }

    /// Edge leading from corner `index` to the next corner
    pub fn get_edge(&self, index: usize) -> Vector3<T> {
        self.get_point(index + 1) - self.get_point(index)
    }

    /// Face normal `(b - a) × (c - a)`
    ///
    /// Not normalized; its length is twice the triangle's area.
    pub fn normal(&self) -> Vector3<T> {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// Whether any two corners coincide
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b || self.b == self.c || self.c == self.a
    }
}

impl Triangle3<i32> {
    /// Move this world triangle by `offset` and scale it into the ellipsoid
    /// space of a mover with the given radii
    pub fn translate(&self, radius: &EllipsoidRadius, offset: &WorldVec) -> Triangle3<f32> {
        let to_ellipsoid = |p: &WorldVec| radius.to_ellipsoid_space(&to_float(&(p + offset)));
        Triangle3::new(to_ellipsoid(&self.a), to_ellipsoid(&self.b), to_ellipsoid(&self.c))
    }
}

impl Triangle3<f32> {
    /// Whether `point`, assumed to lie in the triangle's plane, is inside it
    ///
    /// A point is inside when it lies on the inner side of all three edges.
    /// Points on an edge or a corner count as inside, unlike a strict
    /// barycentric test. A sphere embedded in the plane whose centre
    /// projects exactly onto an edge is therefore still reported at `t = 0`.
    pub fn contains(&self, point: &Vec3) -> bool {
        let normal = self.normal();
        (0..3).all(|i| {
            let edge = self.get_edge(i);
            let to_point = point - self.get_point(i);
            edge.cross(&to_point).dot(&normal) >= 0.0
        })
    }
}

/// A plane in `ax + by + cz + d = 0` form with a unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3 {
    normal: Vec3,
    origin: Vec3,
    equation: [f32; 4],
}

impl Plane3 {
    /// Plane through `origin` with the given normal
    ///
    /// The normal is normalized; `None` if it has no length.
    pub fn new(origin: Vec3, normal: Vec3) -> Option<Self> {
        let normal = normal.normalize_or_zero();
        if normal == Vec3::zeros() {
            return None;
        }
        let d = -normal.dot(&origin);
        Some(Self {
            normal,
            origin,
            equation: [normal.x, normal.y, normal.z, d],
        })
    }

    /// Plane containing `triangle`, facing along its winding normal
    ///
    /// `None` for a degenerate triangle.
    pub fn from_triangle(triangle: &Triangle3<f32>) -> Option<Self> {
        Self::new(triangle.a, triangle.normal())
    }

    /// Unit normal
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Point the plane was built from
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Coefficients `[a, b, c, d]` of the plane equation
    pub fn equation(&self) -> [f32; 4] {
        self.equation
    }

    /// Whether the front side faces against `direction`
    pub fn is_facing(&self, direction: &Vec3) -> bool {
        self.normal.dot(direction) <= 0.0
    }

    /// Distance of `point` from the plane, positive on the front side
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.equation[3]
    }
}

/// Integer axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aabb {
    /// Minimum corner
    pub min: WorldVec,
    /// Maximum corner
    pub max: WorldVec,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: WorldVec, max: WorldVec) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point, or `None` if there are none
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldVec>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self::new(first, first), |bounds, p| {
            Self::new(bounds.min.inf(p), bounds.max.sup(p))
        }))
    }

    /// Smallest box holding both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// This box moved by `offset`
    pub fn translated(&self, offset: &WorldVec) -> Aabb {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Extent along each axis
    pub fn size(&self) -> WorldVec {
        self.max - self.min
    }

    /// Check if this box overlaps another one; touching faces count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Check if the x/y footprint overlaps the rectangle `(x1, y1)..(x2, y2)`
    pub fn overlaps_footprint(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        self.min.x <= x2 && self.max.x >= x1 &&
        self.min.y <= y2 && self.max.y >= y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ground_triangle() -> Triangle3<f32> {
        Triangle3::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        )
    }

    #[test]
    fn test_points_and_edges_wrap() {
        let tri = Triangle3::new(
            WorldVec::new(0, 0, 0),
            WorldVec::new(2, 0, 0),
            WorldVec::new(0, 3, 0),
        );
        assert_eq!(tri.get_point(3), tri.a);
        assert_eq!(tri.get_point(4), tri.b);
        assert_eq!(tri.get_edge(0), WorldVec::new(2, 0, 0));
        assert_eq!(tri.get_edge(1), WorldVec::new(-2, 3, 0));
        assert_eq!(tri.get_edge(2), WorldVec::new(0, -3, 0));
    }

    #[test]
    fn test_normal_is_not_normalized() {
        let tri = Triangle3::new(
            WorldVec::new(0, 0, 0),
            WorldVec::new(2, 0, 0),
            WorldVec::new(0, 3, 0),
        );
        assert_eq!(tri.normal(), WorldVec::new(0, 0, 6));
    }

    #[test]
    fn test_translate_into_ellipsoid_space() {
        let tri = Triangle3::new(
            WorldVec::new(0, 0, 0),
            WorldVec::new(4, 0, 0),
            WorldVec::new(0, 4, 2),
        );
        let radius = EllipsoidRadius::new(Vec3::new(2.0, 4.0, 0.5)).unwrap();
        let moved = tri.translate(&radius, &WorldVec::new(2, 0, 1));

        assert_relative_eq!(moved.a, Vec3::new(1.0, 0.0, 2.0));
        assert_relative_eq!(moved.b, Vec3::new(3.0, 0.0, 2.0));
        assert_relative_eq!(moved.c, Vec3::new(1.0, 1.0, 6.0));
    }

    #[test]
    fn test_contains() {
        let tri = ground_triangle();
        assert!(tri.contains(&Vec3::new(1.0, 1.0, 0.0)));
        assert!(tri.contains(&Vec3::new(0.0, 0.0, 0.0)));
        assert!(tri.contains(&Vec3::new(2.0, 0.0, 0.0)));
        assert!(!tri.contains(&Vec3::new(3.0, 3.0, 0.0)));
        assert!(!tri.contains(&Vec3::new(-0.1, 1.0, 0.0)));
    }

    #[test]
    fn test_plane_from_triangle() {
        let plane = Plane3::from_triangle(&ground_triangle()).unwrap();
        assert_relative_eq!(plane.normal(), Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.signed_distance(&Vec3::new(5.0, -3.0, 2.5)), 2.5);
        assert_relative_eq!(plane.signed_distance(&Vec3::new(1.0, 1.0, -1.0)), -1.0);
    }

    #[test]
    fn test_plane_equation_matches_origin() {
        let plane = Plane3::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(plane.equation(), [0.0, 0.0, 1.0, -3.0]);
        assert_relative_eq!(plane.signed_distance(&plane.origin()), 0.0);
    }

    #[test]
    fn test_plane_facing() {
        let plane = Plane3::from_triangle(&ground_triangle()).unwrap();
        assert!(plane.is_facing(&Vec3::new(0.0, 0.0, -1.0)));
        assert!(plane.is_facing(&Vec3::new(1.0, 0.0, 0.0)));
        assert!(!plane.is_facing(&Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_degenerate_triangle_has_no_plane() {
        let tri = Triangle3::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0));
        assert!(Plane3::from_triangle(&tri).is_none());
        assert!(Triangle3::new(Vec3::zeros(), Vec3::zeros(), Vec3::x()).is_degenerate());
    }

    #[test]
    fn test_aabb_union_and_overlap() {
        let a = Aabb::new(WorldVec::new(0, 0, 0), WorldVec::new(2, 2, 2));
        let b = Aabb::new(WorldVec::new(3, -1, 0), WorldVec::new(4, 1, 5));

        assert!(!a.intersects(&b));
        assert!(a.intersects(&b.translated(&WorldVec::new(-1, 0, 0))));
        assert_eq!(
            a.union(&b),
            Aabb::new(WorldVec::new(0, -1, 0), WorldVec::new(4, 2, 5))
        );
        assert!(b.overlaps_footprint(0, 0, 3, 3));
        assert!(!b.overlaps_footprint(5, 0, 6, 3));
    }

    #[test]
    fn test_aabb_from_points() {
        let points = [WorldVec::new(1, 5, -2), WorldVec::new(-3, 0, 4)];
        let bounds = Aabb::from_points(&points).unwrap();
        assert_eq!(bounds.min, WorldVec::new(-3, 0, -2));
        assert_eq!(bounds.max, WorldVec::new(1, 5, 4));
        assert!(Aabb::from_points(&Vec::<WorldVec>::new()).is_none());
    }
}
