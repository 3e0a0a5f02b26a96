//! Physics module for collision detection
//!
//! Provides the narrow-phase sweep used to move world objects against
//! static geometry without interpenetration.

pub mod collision;


pub use collision::{
    Aabb,
    Collision,
    CollisionError,
    Corner,
    Cube3,
    EllipsoidRadius,
    PartKey,
    PlaceableShape,
    Plane3,
    Triangle3,
};
