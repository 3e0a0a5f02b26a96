//! Placeable shapes
//!
//! The physical footprint of one world object: any number of boxes in the
//! object's local space, a bounding box around all of them and a flag telling
//! whether the object blocks movement at all.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::WorldVec;
use crate::persistence::{Record, StateError};
use super::mesh::{Cube3, CUBE_RECORD};
use super::narrow_phase::Collision;
use super::primitives::Aabb;

/// Key of the sub-record a shape is stored under
pub const SHAPE_RECORD: &str = "shape";

new_key_type! {
    /// Handle of a part owned by a [`PlaceableShape`]
    pub struct PartKey;
}

/// The boxes that make up one world object
///
/// Not `Clone`: the shape exclusively owns its parts. Parts are handed out
/// by key and returned to the caller on removal.
#[derive(Debug)]
pub struct PlaceableShape {
    parts: SlotMap<PartKey, Cube3>,
    order: Vec<PartKey>,
    bounds: Aabb,
    offset: (i32, i32),
    solid: bool,
}

impl Default for PlaceableShape {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceableShape {
    /// Empty, solid shape
    pub fn new() -> Self {
        Self {
            parts: SlotMap::with_key(),
            order: Vec::new(),
            bounds: Aabb::default(),
            offset: (0, 0),
            solid: true,
        }
    }

    /// Take ownership of a part and grow the bounding box around it
    pub fn add_part(&mut self, part: Cube3) -> PartKey {
        let part_bounds = part.bounds();
        self.bounds = if self.parts.is_empty() {
            part_bounds
        } else {
            self.bounds.union(&part_bounds)
        };

        let key = self.parts.insert(part);
        self.order.push(key);
        log::debug!("added part {:?}, shape bounds now {:?}", key, self.bounds);
        key
    }

    /// Remove a part and give it back to the caller
    ///
    /// The bounding box is rebuilt from the remaining parts.
    pub fn remove_part(&mut self, key: PartKey) -> Option<Cube3> {
        let part = self.parts.remove(key)?;
        self.order.retain(|k| *k != key);
        self.recalculate_bounds();
        log::debug!("removed part {:?}, shape bounds now {:?}", key, self.bounds);
        Some(part)
    }

    /// Remove every part
    pub fn clear(&mut self) {
        self.parts.clear();
        self.order.clear();
        self.bounds = Aabb::default();
    }

    fn recalculate_bounds(&mut self) {
        self.bounds = self
            .parts()
            .map(Cube3::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
    }

    /// Part with the given key
    pub fn get_part(&self, key: PartKey) -> Option<&Cube3> {
        self.parts.get(key)
    }

    /// Parts in the order they were added
    pub fn parts(&self) -> impl Iterator<Item = &Cube3> + '_ {
        self.order.iter().filter_map(|key| self.parts.get(*key))
    }

    /// Part keys in the order they were added
    pub fn part_keys(&self) -> &[PartKey] {
        &self.order
    }

    /// Number of parts
    pub fn num_parts(&self) -> usize {
        self.order.len()
    }

    /// Offer every triangle of every part to `collision`, with the shape
    /// placed at `offset`
    ///
    /// Non-solid shapes are skipped.
    pub fn collide(&self, collision: &mut Collision, offset: &WorldVec) {
        if !self.solid {
            return;
        }
        for part in self.parts() {
            for triangle in part.surface() {
                collision.check_triangle(triangle, offset);
            }
        }
    }

    /// Coarse overlap test against `other` placed at `offset` relative to
    /// this shape
    pub fn intersects(&self, other: &PlaceableShape, offset: &WorldVec) -> bool {
        self.bounds.intersects(&other.bounds.translated(offset))
    }

    /// Lowest bottom of the parts under the rectangle `(x1, y1)..(x2, y2)`
    ///
    /// Falls back to the shape's own bottom if no part is under it.
    pub fn bottom(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
        self.parts()
            .map(Cube3::bounds)
            .filter(|b| b.overlaps_footprint(x1, y1, x2, y2))
            .map(|b| b.min.z)
            .min()
            .unwrap_or(self.bounds.min.z)
    }

    /// Bounding box of all parts, zero when empty
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Minimum corner of the bounding box
    pub fn min(&self) -> WorldVec {
        self.bounds.min
    }

    /// Maximum corner of the bounding box
    pub fn max(&self) -> WorldVec {
        self.bounds.max
    }

    /// Extent along x
    pub fn length(&self) -> i32 {
        self.bounds.size().x
    }

    /// Extent along y
    pub fn width(&self) -> i32 {
        self.bounds.size().y
    }

    /// Extent along z
    pub fn height(&self) -> i32 {
        self.bounds.size().z
    }

    /// Whether the shape blocks movement
    pub fn is_solid(&self) -> bool {
        self.solid
    }

    /// Make the shape block movement or not
    pub fn set_solid(&mut self, solid: bool) {
        self.solid = solid;
    }

    /// Offset between the object's sprite and this shape
    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    /// Set the sprite offset
    pub fn set_offset(&mut self, ox: i32, oy: i32) {
        self.offset = (ox, oy);
    }

    /// Append this shape as a `"shape"` sub-record
    pub fn put_state(&self, file: &mut Record) {
        let mut record = Record::new();

        if !self.solid {
            record.put_bool("non_solid", true);
        }
        if self.offset != (0, 0) {
            record.put_string("offset", format!("{} {}", self.offset.0, self.offset.1));
        }

        record.put_int("num", self.order.len() as i64);
        for part in self.parts() {
            part.put_state(&mut record);
        }

        file.put_record(SHAPE_RECORD, record);
    }

    /// Replace this shape with the first `"shape"` sub-record of `file`
    ///
    /// Nothing is changed unless the whole record could be read.
    pub fn get_state(&mut self, file: &Record) -> Result<(), StateError> {
        match Self::read_state(file) {
            Ok(shape) => {
                *self = shape;
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to load shape: {}", err);
                Err(err)
            }
        }
    }

    fn read_state(file: &Record) -> Result<Self, StateError> {
        let record = file.get_record(SHAPE_RECORD)?;
        let mut shape = Self::new();

        shape.solid = !record.get_bool_opt("non_solid")?.unwrap_or(false);
        if let Some(text) = record.get_string_opt("offset")? {
            shape.offset = parse_offset(text)?;
        }

        let num = record.get_int("num")?;
        let num = usize::try_from(num).map_err(|_| StateError::InvalidCount {
            key: "num".to_string(),
            value: num,
        })?;

        let cubes: Vec<&Record> = record.records(CUBE_RECORD).take(num).collect();
        if cubes.len() < num {
            return Err(StateError::MissingRecords {
                key: CUBE_RECORD.to_string(),
                expected: num,
                found: cubes.len(),
            });
        }
        for cube in cubes {
            shape.add_part(Cube3::from_record(cube)?);
        }

        Ok(shape)
    }
}

fn parse_offset(text: &str) -> Result<(i32, i32), StateError> {
    let malformed = || StateError::MalformedOffset(text.to_string());
    let mut fields = text.split_whitespace().map(str::parse::<i32>);
    match (fields.next(), fields.next(), fields.next()) {
        (Some(Ok(ox)), Some(Ok(oy)), None) => Ok((ox, oy)),
        _ => Err(malformed()),
    }
}
