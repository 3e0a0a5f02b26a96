//! Box collision meshes
//!
//! A [`Cube3`] is an axis-aligned box defined by its eight corners. Its
//! faces are split into triangles that the narrow phase sweeps against.
//! Flattened boxes lose the faces and triangles that collapse, so a box
//! squashed into a rectangle still yields a usable (two-sided) floor.

use crate::foundation::math::WorldVec;
use crate::persistence::{Record, StateError};
use super::primitives::{Aabb, Triangle3};

/// Key of the sub-record a cube is stored under
pub const CUBE_RECORD: &str = "cube";

/// Corner index of a [`Cube3`]
///
/// Front is `y = 0`, left is `x = 0` and bottom is `z = 0` for a freshly
/// built box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Corner {
    /// `(0, 0, 0)`
    BottomFrontLeft = 0,
    /// `(length, 0, 0)`
    BottomFrontRight,
    /// `(length, width, 0)`
    BottomBackRight,
    /// `(0, width, 0)`
    BottomBackLeft,
    /// `(0, 0, height)`
    TopFrontLeft,
    /// `(length, 0, height)`
    TopFrontRight,
    /// `(length, width, height)`
    TopBackRight,
    /// `(0, width, height)`
    TopBackLeft,
}

impl Corner {
    /// All corners in index order
    pub const ALL: [Corner; 8] = [
        Corner::BottomFrontLeft,
        Corner::BottomFrontRight,
        Corner::BottomBackRight,
        Corner::BottomBackLeft,
        Corner::TopFrontLeft,
        Corner::TopFrontRight,
        Corner::TopBackRight,
        Corner::TopBackLeft,
    ];

    /// Field name used when persisting the corner
    pub fn key(self) -> &'static str {
        match self {
            Corner::BottomFrontLeft => "bottom_front_left",
            Corner::BottomFrontRight => "bottom_front_right",
            Corner::BottomBackRight => "bottom_back_right",
            Corner::BottomBackLeft => "bottom_back_left",
            Corner::TopFrontLeft => "top_front_left",
            Corner::TopFrontRight => "top_front_right",
            Corner::TopBackRight => "top_back_right",
            Corner::TopBackLeft => "top_back_left",
        }
    }
}

// Corners of each face, counter-clockwise seen from outside. Every face is
// cut along the diagonal from its first to its third corner.
const FACES: [[usize; 4]; 6] = [
    [4, 5, 6, 7], // top
    [0, 3, 2, 1], // bottom
    [0, 1, 5, 4], // front
    [3, 7, 6, 2], // back
    [0, 4, 7, 3], // left
    [1, 2, 6, 5], // right
];

/// An axis-aligned box and the triangle mesh built from it
///
/// Not `Clone`: a cube is owned by exactly one shape.
#[derive(Debug)]
pub struct Cube3 {
    corners: [WorldVec; 8],
    surface: Vec<Triangle3<i32>>,
}

impl Cube3 {
    /// Box with its bottom front left corner at the origin, extending
    /// `length` along x, `width` along y and `height` along z
    pub fn new(length: i32, width: i32, height: i32) -> Self {
        let (l, w, h) = (length, width, height);
        let mut cube = Self {
            corners: [
                WorldVec::new(0, 0, 0),
                WorldVec::new(l, 0, 0),
                WorldVec::new(l, w, 0),
                WorldVec::new(0, w, 0),
                WorldVec::new(0, 0, h),
                WorldVec::new(l, 0, h),
                WorldVec::new(l, w, h),
                WorldVec::new(0, w, h),
            ],
            surface: Vec::new(),
        };
        cube.create_mesh();
        cube
    }

    /// Box built from explicit corners
    pub fn from_corners(corners: [WorldVec; 8]) -> Self {
        let mut cube = Self {
            corners,
            surface: Vec::new(),
        };
        cube.create_mesh();
        cube
    }

    /// Rebuild the triangle mesh from the current corners
    pub fn create_mesh(&mut self) {
        self.surface.clear();

        for [a, b, c, d] in FACES {
            let (a, b, c, d) = (self.corners[a], self.corners[b], self.corners[c], self.corners[d]);

            // either diagonal collapsed: a line, a point or a folded face
            if a == c || b == d {
                continue;
            }
            if a != b && b != c {
                self.surface.push(Triangle3::new(a, b, c));
            }
            if c != d && d != a {
                self.surface.push(Triangle3::new(a, c, d));
            }
        }

        log::trace!("cube mesh rebuilt with {} triangles", self.surface.len());
    }

    /// Position of a corner
    pub fn get_point(&self, corner: Corner) -> WorldVec {
        self.corners[corner as usize]
    }

    /// Move a corner and rebuild the mesh
    pub fn set_point(&mut self, corner: Corner, position: WorldVec) {
        self.corners[corner as usize] = position;
        self.create_mesh();
    }

    /// All corners in index order
    pub fn corners(&self) -> &[WorldVec; 8] {
        &self.corners
    }

    /// Scale every corner componentwise and rebuild the mesh
    pub fn scale(&mut self, factor: &WorldVec) {
        for corner in &mut self.corners {
            *corner = corner.component_mul(factor);
        }
        self.create_mesh();
    }

    /// Bounding box of the corners
    pub fn bounds(&self) -> Aabb {
        // eight corners always exist
        Aabb::from_points(&self.corners).unwrap_or_default()
    }

    /// Minimum corner of the bounding box
    pub fn min(&self) -> WorldVec {
        self.bounds().min
    }

    /// Maximum corner of the bounding box
    pub fn max(&self) -> WorldVec {
        self.bounds().max
    }

    /// Triangles of the current mesh
    pub fn surface(&self) -> &[Triangle3<i32>] {
        &self.surface
    }

    /// Number of triangles in the mesh
    pub fn num_triangles(&self) -> usize {
        self.surface.len()
    }

    /// Triangle `index` of the mesh
    pub fn get_triangle(&self, index: usize) -> Option<&Triangle3<i32>> {
        self.surface.get(index)
    }

    /// Append this cube's corners as a `"cube"` sub-record
    pub fn put_state(&self, file: &mut Record) {
        file.put_record(CUBE_RECORD, self.to_record());
    }

    /// Restore corners from the first `"cube"` sub-record and rebuild the mesh
    pub fn get_state(&mut self, file: &Record) -> Result<(), StateError> {
        let record = file.get_record(CUBE_RECORD)?;
        *self = Self::from_record(record)?;
        Ok(())
    }

    pub(crate) fn to_record(&self) -> Record {
        let mut record = Record::new();
        for corner in Corner::ALL {
            record.put_vector(corner.key(), self.get_point(corner));
        }
        record
    }

    pub(crate) fn from_record(record: &Record) -> Result<Self, StateError> {
        let mut corners = [WorldVec::zeros(); 8];
        for corner in Corner::ALL {
            corners[corner as usize] = record.get_vector(corner.key())?;
        }
        Ok(Self::from_corners(corners))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{to_float, Vec3, Vec3Ext};
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_cube_has_no_triangles() {
        let cube = Cube3::new(0, 0, 0);
        assert_eq!(cube.num_triangles(), 0);
    }

    #[test]
    fn test_unit_cube_has_twelve_triangles() {
        let cube = Cube3::new(1, 1, 1);
        assert_eq!(cube.num_triangles(), 12);
    }

    #[test]
    fn test_unit_cube_normals_point_outwards() {
        let cube = Cube3::new(1, 1, 1);
        let expected = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];

        for (face, normal) in expected.iter().enumerate() {
            for tri in &cube.surface()[face * 2..face * 2 + 2] {
                let n = to_float(&tri.normal()).normalize_or_zero();
                assert_relative_eq!(n, *normal);
            }
        }
    }

    #[test]
    fn test_flat_box_keeps_top_and_bottom() {
        let cube = Cube3::new(3, 2, 0);
        assert_eq!(cube.num_triangles(), 4);
        assert!(cube.surface().iter().all(|t| !t.is_degenerate()));
    }

    #[test]
    fn test_line_box_has_no_triangles() {
        let cube = Cube3::new(5, 0, 0);
        assert_eq!(cube.num_triangles(), 0);
    }

    #[test]
    fn test_set_point_rebuilds_mesh() {
        let mut cube = Cube3::new(2, 2, 0);
        assert_eq!(cube.num_triangles(), 4);

        cube.set_point(Corner::TopFrontLeft, WorldVec::new(0, 0, 2));
        cube.set_point(Corner::TopFrontRight, WorldVec::new(2, 0, 2));
        cube.set_point(Corner::TopBackRight, WorldVec::new(2, 2, 2));
        cube.set_point(Corner::TopBackLeft, WorldVec::new(0, 2, 2));

        assert_eq!(cube.num_triangles(), 12);
        assert_eq!(cube.max(), WorldVec::new(2, 2, 2));
        assert_eq!(cube.get_point(Corner::TopBackRight), WorldVec::new(2, 2, 2));
    }

    #[test]
    fn test_pinched_face_is_skipped() {
        let mut cube = Cube3::new(1, 1, 1);
        // top face loses its second diagonal
        cube.set_point(Corner::TopBackLeft, WorldVec::new(1, 0, 1));

        let on_top = |p: &WorldVec| p.z == 1;
        let top_triangles = cube
            .surface()
            .iter()
            .filter(|t| on_top(&t.a) && on_top(&t.b) && on_top(&t.c))
            .count();
        assert_eq!(top_triangles, 0);
        assert_eq!(cube.num_triangles(), 10);
    }

    #[test]
    fn test_bounds_and_scale() {
        let mut cube = Cube3::new(2, 3, 4);
        assert_eq!(cube.min(), WorldVec::zeros());
        assert_eq!(cube.max(), WorldVec::new(2, 3, 4));

        cube.scale(&WorldVec::new(2, 1, 3));
        assert_eq!(cube.max(), WorldVec::new(4, 3, 12));
        assert_eq!(cube.num_triangles(), 12);
    }

    #[test]
    fn test_state_restores_corners_and_mesh() {
        let mut original = Cube3::new(4, 2, 6);
        original.set_point(Corner::TopFrontLeft, WorldVec::new(-1, 0, 7));

        let mut file = Record::new();
        original.put_state(&mut file);
        assert_eq!(file.records(CUBE_RECORD).count(), 1);

        let mut restored = Cube3::new(0, 0, 0);
        restored.get_state(&file).unwrap();
        assert_eq!(restored.corners(), original.corners());
        assert_eq!(restored.surface(), original.surface());
    }

    #[test]
    fn test_state_with_missing_corner_fails() {
        let complete = Cube3::new(1, 1, 1).to_record();
        let mut partial = Record::new();
        for corner in &Corner::ALL[..7] {
            partial.put_vector(corner.key(), complete.get_vector(corner.key()).unwrap());
        }
        let mut file = Record::new();
        file.put_record(CUBE_RECORD, partial);

        let mut cube = Cube3::new(1, 1, 1);
        assert!(matches!(cube.get_state(&file), Err(StateError::MissingField(_))));
        assert_eq!(cube.max(), WorldVec::new(1, 1, 1));
    }
}
