//! Sweep scenarios
//!
//! A scenario lists placed shapes and the movers to sweep against them.
//! Scenarios load from RON or TOML through the library's `Config` trait.

use serde::{Deserialize, Serialize};
use world_collision::prelude::*;

/// One box of a shape, in the shape's local space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartSpec {
    /// Bottom front left corner
    pub origin: [i32; 3],
    /// Length, width and height
    pub size: [i32; 3],
}

impl PartSpec {
    /// Build the box, moved to `origin`
    pub fn build(&self) -> Cube3 {
        let [l, w, h] = self.size;
        let origin = WorldVec::from(self.origin);
        let corners = *Cube3::new(l, w, h).corners();
        Cube3::from_corners(corners.map(|c| c + origin))
    }
}

/// A shape placed in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeSpec {
    /// Label used in log output
    pub name: String,
    /// World position the shape's local origin is placed at
    pub position: [i32; 3],
    /// Whether the shape blocks movement
    #[serde(default = "default_solid")]
    pub solid: bool,
    /// Boxes making up the shape
    pub parts: Vec<PartSpec>,
}

fn default_solid() -> bool {
    true
}

impl ShapeSpec {
    /// Build the shape and return it with its world position
    pub fn build(&self) -> (PlaceableShape, WorldVec) {
        let mut shape = PlaceableShape::new();
        for part in &self.parts {
            shape.add_part(part.build());
        }
        shape.set_solid(self.solid);
        (shape, WorldVec::from(self.position))
    }
}

/// A mover and the displacement to sweep for one tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoverSpec {
    /// Label used in log output
    pub name: String,
    /// Ellipsoid radii
    pub radius: [f32; 3],
    /// World-space start position
    pub position: [f32; 3],
    /// World-space displacement for this tick
    pub velocity: [f32; 3],
}

/// Complete sweep scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepScenario {
    /// Narrow-phase settings
    pub settings: CollisionSettings,
    /// Static geometry
    pub shapes: Vec<ShapeSpec>,
    /// Movers to sweep
    pub movers: Vec<MoverSpec>,
}

impl Default for SweepScenario {
    /// A unit box at the origin with a half-unit sphere dropped onto it
    fn default() -> Self {
        Self {
            settings: CollisionSettings::default(),
            shapes: vec![ShapeSpec {
                name: "unit_box".to_string(),
                position: [0, 0, 0],
                solid: true,
                parts: vec![PartSpec {
                    origin: [0, 0, 0],
                    size: [1, 1, 1],
                }],
            }],
            movers: vec![MoverSpec {
                name: "dropped_ball".to_string(),
                radius: [0.5, 0.5, 0.5],
                position: [0.0, 0.0, 2.0],
                velocity: [0.0, 0.0, -2.0],
            }],
        }
    }
}

impl Config for SweepScenario {}

/// Nearest contact of one mover
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    /// Mover label
    pub mover: String,
    /// Fraction of the step before contact, `None` if nothing was hit
    pub time_of_impact: Option<f32>,
    /// World-space contact point
    pub contact: Option<Vec3>,
}

/// Sweep every mover against every shape
pub fn run(scenario: &SweepScenario) -> Result<Vec<SweepReport>, CollisionError> {
    let shapes: Vec<(PlaceableShape, WorldVec)> = scenario.shapes.iter().map(ShapeSpec::build).collect();

    scenario
        .movers
        .iter()
        .map(|mover| {
            let radius = EllipsoidRadius::new(Vec3::from(mover.radius))?;
            let mut collision = Collision::with_settings(radius, scenario.settings)?;
            collision.update_world_movement(&Vec3::from(mover.position), &Vec3::from(mover.velocity));

            for ((shape, position), spec) in shapes.iter().zip(&scenario.shapes) {
                log::debug!("sweeping '{}' against '{}'", mover.name, spec.name);
                shape.collide(&mut collision, position);
            }

            let contact = collision
                .collision_found()
                .then(|| collision.world_intersection_point());
            Ok(SweepReport {
                mover: mover.name.clone(),
                time_of_impact: collision.time_of_impact(),
                contact,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_scenario_hits_box_top() {
        let reports = run(&SweepScenario::default()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_relative_eq!(reports[0].time_of_impact.unwrap(), 0.25, epsilon = 1e-5);
        assert_relative_eq!(reports[0].contact.unwrap().z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_part_spec_offsets_box() {
        let cube = PartSpec {
            origin: [2, -1, 3],
            size: [1, 2, 3],
        }
        .build();
        assert_eq!(cube.min(), WorldVec::new(2, -1, 3));
        assert_eq!(cube.max(), WorldVec::new(3, 1, 6));
    }

    #[test]
    fn test_scenario_from_ron() {
        let text = r#"(
            shapes: [(
                name: "floor",
                position: (0, 0, 0),
                parts: [(origin: (0, 0, 0), size: (10, 10, 0))],
            )],
            movers: [(
                name: "walker",
                radius: (1.0, 1.0, 2.0),
                position: (5.0, 5.0, 4.0),
                velocity: (0.0, 0.0, -4.0),
            )],
        )"#;
        let scenario = SweepScenario::load_from_str("scenario.ron", text).unwrap();
        assert!(scenario.shapes[0].solid);

        let reports = run(&scenario).unwrap();
        assert_relative_eq!(reports[0].time_of_impact.unwrap(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_invalid_radius_is_reported() {
        let mut scenario = SweepScenario::default();
        scenario.movers[0].radius = [0.0, 1.0, 1.0];
        assert!(matches!(run(&scenario), Err(CollisionError::InvalidRadius(_))));
    }

    #[test]
    fn test_invalid_settings_are_reported() {
        let mut scenario = SweepScenario::default();
        scenario.settings.parallel_threshold = -1.0;
        assert!(matches!(run(&scenario), Err(CollisionError::InvalidSettings(_))));
    }
}
