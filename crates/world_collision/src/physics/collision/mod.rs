//! Continuous collision detection against static world geometry
//!
//! Movers are bounding ellipsoids swept along their velocity; world objects
//! are placeable shapes made of boxes. Candidate shapes are picked by the
//! caller, this module only answers where a sweep first touches them.
//!
//! # Module Organization
//!
//! - [`primitives`] - Triangles, planes and bounding boxes
//! - [`mesh`] - Boxes and the triangle meshes built from them
//! - [`shape`] - Per-object collection of boxes
//! - [`narrow_phase`] - Swept-ellipsoid vs. triangle test
//!
//! # Key Types
//!
//! - [`PlaceableShape`] - Physical footprint of a world object
//! - [`Collision`] - Nearest-hit accumulator for one sweep

pub mod primitives;
pub mod mesh;
pub mod shape;
pub mod narrow_phase;

// Re-export commonly used types
pub use primitives::{Aabb, Plane3, Triangle3};
pub use mesh::{Corner, Cube3};
pub use shape::{PartKey, PlaceableShape};
pub use narrow_phase::{solve_quadric_equation, Collision, CollisionError, EllipsoidRadius};
