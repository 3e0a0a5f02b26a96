//! Swept-ellipsoid narrow phase
//!
//! A mover is approximated by an ellipsoid. Dividing all geometry by the
//! ellipsoid's radii turns it into a unit sphere, which is then swept along
//! its velocity against one triangle at a time. [`Collision`] keeps the
//! nearest contact over all triangles offered during one sweep.
//!
//! Contacts are classified the usual way for swept spheres: the sphere can
//! first touch the inside of the triangle's face, one of its corners, or
//! one of its edges. A face contact is always the earliest of the three, so
//! corners and edges are only tested when the face is missed.

use crate::config::CollisionSettings;
use crate::foundation::math::{Vec3, Vec3Ext, WorldVec};
use super::primitives::{Plane3, Triangle3};

/// Errors raised when setting up a sweep
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// An ellipsoid axis is zero, negative or not finite
    #[error("invalid ellipsoid radius {0:?}: every axis must be finite and > 0")]
    InvalidRadius([f32; 3]),

    /// The sweep settings failed validation
    #[error("invalid collision settings: {0}")]
    InvalidSettings(String),
}

/// Per-axis radii of a mover's bounding ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsoidRadius(Vec3);

impl EllipsoidRadius {
    /// Validate the radii
    pub fn new(radius: Vec3) -> Result<Self, CollisionError> {
        if radius.iter().all(|r| r.is_finite() && *r > 0.0) {
            Ok(Self(radius))
        } else {
            Err(CollisionError::InvalidRadius([radius.x, radius.y, radius.z]))
        }
    }

    /// Same radius on every axis
    pub fn sphere(radius: f32) -> Result<Self, CollisionError> {
        Self::new(Vec3::new(radius, radius, radius))
    }

    /// Radii as a vector
    pub fn as_vec(&self) -> Vec3 {
        self.0
    }

    /// Map a world-space vector into ellipsoid space
    pub fn to_ellipsoid_space(&self, v: &Vec3) -> Vec3 {
        v.component_div(&self.0)
    }

    /// Map an ellipsoid-space vector back to world space
    pub fn to_world_space(&self, v: &Vec3) -> Vec3 {
        v.component_mul(&self.0)
    }
}

/// Smallest root of `a·t² + b·t + c = 0` inside the open interval
/// `(0, threshold)`
///
/// Falls back to the larger root when the smaller one is out of range.
/// Returns `None` for a negative discriminant, for `a == 0` and when neither
/// root qualifies.
pub fn solve_quadric_equation(a: f32, b: f32, c: f32, threshold: f32) -> Option<f32> {
    if a == 0.0 {
        return None;
    }

    let determinant = b * b - 4.0 * a * c;
    if determinant < 0.0 {
        return None;
    }

    let sqrt_d = determinant.sqrt();
    let mut r1 = (-b - sqrt_d) / (2.0 * a);
    let mut r2 = (-b + sqrt_d) / (2.0 * a);
    if r1 > r2 {
        std::mem::swap(&mut r1, &mut r2);
    }

    let in_range = |r: f32| r > 0.0 && r < threshold;
    if in_range(r1) {
        Some(r1)
    } else if in_range(r2) {
        Some(r2)
    } else {
        None
    }
}

/// State of one sweep of a mover against static triangles
///
/// Re-prime with [`Collision::update_movement`] before every sweep, offer
/// the candidate triangles with [`Collision::check_triangle`], then read
/// the nearest hit.
#[derive(Debug, Clone)]
pub struct Collision {
    radius: EllipsoidRadius,
    settings: CollisionSettings,

    base_point: Vec3,
    velocity: Vec3,
    normalized_velocity: Vec3,

    collision_found: bool,
    nearest_distance: f32,
    intersection_point: Vec3,

    is_falling: bool,
}

impl Collision {
    /// Create a sweep context for a mover with the given radii
    pub fn new(radius: EllipsoidRadius) -> Self {
        Self::build(radius, CollisionSettings::default())
    }

    /// Create a sweep context with custom settings
    ///
    /// Fails if the settings do not pass [`CollisionSettings::validate`].
    pub fn with_settings(
        radius: EllipsoidRadius,
        settings: CollisionSettings,
    ) -> Result<Self, CollisionError> {
        settings
            .validate()
            .map_err(|err| CollisionError::InvalidSettings(err.to_string()))?;
        Ok(Self::build(radius, settings))
    }

    fn build(radius: EllipsoidRadius, settings: CollisionSettings) -> Self {
        Self {
            radius,
            settings,
            base_point: Vec3::zeros(),
            velocity: Vec3::zeros(),
            normalized_velocity: Vec3::zeros(),
            collision_found: false,
            nearest_distance: 0.0,
            intersection_point: Vec3::zeros(),
            is_falling: false,
        }
    }

    /// Start a new sweep from `position` along `velocity`, both in
    /// ellipsoid space
    ///
    /// A zero velocity yields a zero direction; such a sweep never hits
    /// anything.
    pub fn update_movement(&mut self, position: Vec3, velocity: Vec3) {
        self.base_point = position;
        self.velocity = velocity;
        self.normalized_velocity = velocity.normalize_or_zero();
        self.collision_found = false;
    }

    /// Start a new sweep from world-space position and velocity
    pub fn update_world_movement(&mut self, position: &Vec3, velocity: &Vec3) {
        let position = self.radius.to_ellipsoid_space(position);
        let velocity = self.radius.to_ellipsoid_space(velocity);
        self.update_movement(position, velocity);
    }

    /// Sweep against one world-space triangle placed at `offset`
    ///
    /// Updates the nearest hit if this triangle is touched earlier than
    /// anything seen so far in the current sweep.
    pub fn check_triangle(&mut self, triangle: &Triangle3<i32>, offset: &WorldVec) {
        if self.normalized_velocity == Vec3::zeros() {
            return;
        }

        let triangle = triangle.translate(&self.radius, offset);
        let Some(plane) = Plane3::from_triangle(&triangle) else {
            return;
        };
        if !plane.is_facing(&self.normalized_velocity) {
            return;
        }

        let Some((t0, embedded)) = self.plane_interval(&plane) else {
            return;
        };

        let hit = self
            .face_hit(&triangle, &plane, t0, embedded)
            .or_else(|| self.vertex_or_edge_hit(&triangle));

        if let Some((t, point)) = hit {
            let distance = t * self.velocity.length();
            if !self.collision_found || distance < self.nearest_distance {
                log::trace!("nearest hit at t={:.4}, distance={:.4}, point={:?}", t, distance, point);
                self.nearest_distance = distance;
                self.intersection_point = point;
                self.collision_found = true;
            }
        }
    }

    /// Time the sphere enters the plane's slab, and whether it is already
    /// inside it for the whole step
    fn plane_interval(&self, plane: &Plane3) -> Option<(f32, bool)> {
        let signed_distance = plane.signed_distance(&self.base_point);
        let normal_dot_velocity = plane.normal().dot(&self.velocity);

        if normal_dot_velocity.abs() < self.settings.parallel_threshold {
            // travelling along the plane: either always or never in touch
            if signed_distance.abs() >= 1.0 {
                return None;
            }
            return Some((0.0, true));
        }

        let mut t0 = (-1.0 - signed_distance) / normal_dot_velocity;
        let mut t1 = (1.0 - signed_distance) / normal_dot_velocity;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > 1.0 || t1 < 0.0 {
            return None;
        }

        Some((t0.clamp(0.0, 1.0), false))
    }

    /// Contact with the inside of the face
    ///
    /// When the sphere is already embedded in the plane, the face counts as
    /// touched at `t = 0` if the centre projects into the triangle.
    fn face_hit(
        &self,
        triangle: &Triangle3<f32>,
        plane: &Plane3,
        t0: f32,
        embedded: bool,
    ) -> Option<(f32, Vec3)> {
        let point = if embedded {
            self.base_point - plane.normal() * plane.signed_distance(&self.base_point)
        } else {
            (self.base_point - plane.normal()) + self.velocity * t0
        };

        triangle.contains(&point).then_some((t0, point))
    }

    /// Earliest contact with one of the triangle's corners or edges
    fn vertex_or_edge_hit(&self, triangle: &Triangle3<f32>) -> Option<(f32, Vec3)> {
        let velocity_sq = self.velocity.squared_length();
        let mut t = 1.0;
        let mut hit = None;

        for i in 0..3 {
            let vertex = triangle.get_point(i);
            let a = velocity_sq;
            let b = 2.0 * self.velocity.dot(&(self.base_point - vertex));
            let c = (vertex - self.base_point).squared_length() - 1.0;
            if let Some(root) = solve_quadric_equation(a, b, c, t) {
                t = root;
                hit = Some((t, vertex));
            }
        }

        for i in 0..3 {
            let start = triangle.get_point(i);
            let edge = triangle.get_edge(i);
            let base_to_vertex = start - self.base_point;

            let edge_sq = edge.squared_length();
            let edge_dot_velocity = edge.dot(&self.velocity);
            let edge_dot_base_to_vertex = edge.dot(&base_to_vertex);

            let a = edge_sq * -velocity_sq + edge_dot_velocity * edge_dot_velocity;
            let b = edge_sq * (2.0 * self.velocity.dot(&base_to_vertex))
                - 2.0 * edge_dot_velocity * edge_dot_base_to_vertex;
            let c = edge_sq * (1.0 - base_to_vertex.squared_length())
                + edge_dot_base_to_vertex * edge_dot_base_to_vertex;

            if let Some(root) = solve_quadric_equation(a, b, c, t) {
                // where along the edge the contact happens
                let f = (edge_dot_velocity * root - edge_dot_base_to_vertex) / edge_sq;
                if (0.0..=1.0).contains(&f) {
                    t = root;
                    hit = Some((t, start + edge * f));
                }
            }
        }

        hit
    }

    /// Whether any triangle was hit during the current sweep
    pub fn collision_found(&self) -> bool {
        self.collision_found
    }

    /// Ellipsoid-space distance travelled before the nearest hit
    ///
    /// Only meaningful when [`Collision::collision_found`] is true.
    pub fn nearest_distance(&self) -> f32 {
        self.nearest_distance
    }

    /// Fraction of the step travelled before the nearest hit
    pub fn time_of_impact(&self) -> Option<f32> {
        let speed = self.velocity.length();
        (self.collision_found && speed > 0.0).then(|| self.nearest_distance / speed)
    }

    /// Ellipsoid-space contact point of the nearest hit
    pub fn intersection_point(&self) -> Vec3 {
        self.intersection_point
    }

    /// World-space contact point of the nearest hit
    pub fn world_intersection_point(&self) -> Vec3 {
        self.radius.to_world_space(&self.intersection_point)
    }

    /// Sweep start in ellipsoid space
    pub fn base_point(&self) -> Vec3 {
        self.base_point
    }

    /// Sweep displacement in ellipsoid space
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Unit direction of the sweep, zero when not moving
    pub fn normalized_velocity(&self) -> Vec3 {
        self.normalized_velocity
    }

    /// Radii of the mover
    pub fn radius(&self) -> EllipsoidRadius {
        self.radius
    }

    /// Settings in use
    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    /// Whether the mover is falling; maintained by the caller
    pub fn is_falling(&self) -> bool {
        self.is_falling
    }

    /// Mark the mover as falling or not
    pub fn set_falling(&mut self, falling: bool) {
        self.is_falling = falling;
    }
}
