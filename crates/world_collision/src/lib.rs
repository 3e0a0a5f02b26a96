//! # World Collision
//!
//! Continuous collision detection for world objects moving against static
//! geometry.
//!
//! ## Features
//!
//! - **Box Geometry**: World objects are built from axis-aligned boxes
//! - **Swept Ellipsoids**: Movers are tested along their whole path, not
//!   sampled at discrete positions
//! - **Nearest Hit**: One sweep reports the earliest contact over every
//!   triangle offered to it
//! - **Persistence**: Shapes save to and load from named-field records
//!
//! ## Quick Start
//!
//! ```rust
//! use world_collision::prelude::*;
//!
//! let mut shape = PlaceableShape::new();
//! shape.add_part(Cube3::new(1, 1, 1));
//!
//! let radius = EllipsoidRadius::sphere(0.5).unwrap();
//! let mut collision = Collision::new(radius);
//! collision.update_world_movement(&Vec3::new(0.5, 0.5, 2.0), &Vec3::new(0.0, 0.0, -2.0));
//! shape.collide(&mut collision, &WorldVec::zeros());
//!
//! assert!(collision.collision_found());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod persistence;
pub mod physics;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{CollisionSettings, Config, ConfigError},
        foundation::math::{Vec3, Vec3Ext, WorldVec},
        persistence::{Record, StateError},
        physics::{
            Aabb, Collision, CollisionError, Corner, Cube3, EllipsoidRadius, PartKey,
            PlaceableShape, Plane3, Triangle3,
        },
    };
}
