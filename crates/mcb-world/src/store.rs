//! World storage interface
//!
//! Implement [`WorldStore`] to let the build pipeline scan and mutate a new
//! storage format.

use crate::error::{WorldError, WorldResult};
use crate::material::{ContentType, Materials};
use crate::position::{BoundingBox, Position, RegionPos};
use crate::tag::Tag;
use serde::{Deserialize, Serialize};

/// Content-type id and data byte stored at a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockState {
    pub id: u16,
    pub data: u8,
}

impl BlockState {
    /// Air
    pub const AIR: Self = Self::new(0, 0);

    #[inline]
    #[must_use]
    pub const fn new(id: u16, data: u8) -> Self {
        Self { id, data }
    }

    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.id == 0
    }
}

/// Structured metadata attached to a position
///
/// Always a compound carrying `id`, `x`, `y` and `z` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileEntity(Tag);

impl TileEntity {
    /// Wrap a compound, filling in missing coordinates from `position`
    ///
    /// Fails when the value is not a compound, holds a non-finite float, or
    /// carries coordinates that disagree with `position`.
    pub fn at(position: Position, mut tag: Tag) -> WorldResult<Self> {
        if !tag.is_finite() {
            return Err(WorldError::invalid_metadata(position, "non-finite float value"));
        }
        let kind = tag.kind();
        let Some(map) = tag.as_compound_mut() else {
            return Err(WorldError::invalid_metadata(
                position,
                format!("expected Compound, got {kind}"),
            ));
        };
        for (axis, value) in [("x", position.x), ("y", position.y), ("z", position.z)] {
            match map.get(axis).map(Tag::as_i64) {
                None => {
                    map.insert(axis.to_string(), Tag::Int(value));
                }
                Some(Some(found)) if found == i64::from(value) => {}
                Some(found) => {
                    return Err(WorldError::invalid_metadata(
                        position,
                        format!("coordinate '{axis}' is {found:?}, expected {value}"),
                    ));
                }
            }
        }
        Ok(Self(tag))
    }

    /// Marker tile with up to four text lines
    #[must_use]
    pub fn marker<'a>(id: &str, position: Position, lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tag = Tag::compound()
            .with("id", Tag::String(id.to_string()))
            .with("x", Tag::Int(position.x))
            .with("y", Tag::Int(position.y))
            .with("z", Tag::Int(position.z));
        for (i, line) in lines.into_iter().take(4).enumerate() {
            tag = tag.with(format!("Text{}", i + 1), Tag::String(line.to_string()));
        }
        Self(tag)
    }

    /// Entity id (`"Sign"`, `"Chest"`, ...)
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Tag::as_str)
    }

    /// Position recorded in the entity
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        let coord = |axis| {
            self.0
                .get(axis)
                .and_then(Tag::as_i64)
                .and_then(|v| i32::try_from(v).ok())
        };
        Some(Position::new(coord("x")?, coord("y")?, coord("z")?))
    }

    /// Text lines `Text1`..`Text4`, missing lines as empty strings
    #[must_use]
    pub fn text_lines(&self) -> [&str; 4] {
        let line = |i: usize| {
            self.0
                .get(&format!("Text{i}"))
                .and_then(Tag::as_str)
                .unwrap_or("")
        };
        [line(1), line(2), line(3), line(4)]
    }

    #[must_use]
    pub fn tag(&self) -> &Tag {
        &self.0
    }

    #[must_use]
    pub fn into_tag(self) -> Tag {
        self.0
    }
}

/// Storage engine consumed by the scanner and the build executor
pub trait WorldStore {
    /// Human-readable world title
    fn display_name(&self) -> &str;

    /// Replace the world title
    fn set_display_name(&mut self, name: String);

    /// Content-type catalogue of this world
    fn materials(&self) -> &Materials;

    /// All regions, including ones that fail integrity checks
    fn regions(&self) -> Vec<RegionPos>;

    /// Tile entities of one region
    ///
    /// Returns [`WorldError::RegionMalformed`] for corrupt regions.
    fn tile_entities(&self, region: RegionPos) -> WorldResult<Vec<TileEntity>>;

    /// Block at a position; air when nothing was written there
    fn block_at(&self, position: Position) -> WorldResult<BlockState>;

    /// Remove all tile entities inside `bbox`, returning how many were removed
    fn remove_tile_entities(&mut self, bbox: BoundingBox) -> WorldResult<usize>;

    /// Write `content` with data byte `data` into every position of `bbox`
    fn fill_blocks(&mut self, bbox: BoundingBox, content: &ContentType, data: u8) -> WorldResult<()>;

    /// Attach a structured value to a position, replacing previous metadata
    fn attach_metadata(&mut self, position: Position, value: Tag) -> WorldResult<()>;

    /// Recompute lighting after edits
    fn relight(&mut self) -> WorldResult<()>;

    /// Persist the storage back to its origin
    fn save(&mut self) -> WorldResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_exposes_lines_and_position() {
        let pos = Position::new(1, 2, 3);
        let tile = TileEntity::marker("Sign", pos, ["5# Gate", "north"]);
        assert_eq!(tile.id(), Some("Sign"));
        assert_eq!(tile.position(), Some(pos));
        assert_eq!(tile.text_lines(), ["5# Gate", "north", "", ""]);
    }

    #[test]
    fn attach_fills_missing_coordinates() {
        let pos = Position::new(-4, 60, 9);
        let tile = TileEntity::at(pos, Tag::compound().with("id", Tag::String("Chest".into()))).unwrap();
        assert_eq!(tile.position(), Some(pos));
    }

    #[test]
    fn attach_rejects_conflicting_coordinates() {
        let pos = Position::new(0, 64, 0);
        let tag = Tag::compound().with("x", Tag::Int(1));
        assert!(matches!(
            TileEntity::at(pos, tag),
            Err(WorldError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn attach_rejects_scalars() {
        assert!(TileEntity::at(Position::new(0, 0, 0), Tag::Int(1)).is_err());
    }
}
