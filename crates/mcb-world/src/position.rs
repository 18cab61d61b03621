//! World coordinates, unit boxes and region addressing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge length of a region column, in blocks
pub const REGION_SIZE: i32 = 16;

/// Block position in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Region column containing this position
    #[inline]
    #[must_use]
    pub fn region(self) -> RegionPos {
        RegionPos::new(self.x.div_euclid(REGION_SIZE), self.z.div_euclid(REGION_SIZE))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{} y{} z{}", self.x, self.y, self.z)
    }
}

/// Region column address (x/z in region units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionPos {
    pub x: i32,
    pub z: i32,
}

impl RegionPos {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for RegionPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Axis-aligned box of blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub origin: Position,
    pub size: (u32, u32, u32),
}

impl BoundingBox {
    #[inline]
    #[must_use]
    pub const fn new(origin: Position, size: (u32, u32, u32)) -> Self {
        Self { origin, size }
    }

    /// The 1×1×1 box at `origin`
    #[inline]
    #[must_use]
    pub const fn unit(origin: Position) -> Self {
        Self::new(origin, (1, 1, 1))
    }

    /// Whether `pos` lies inside the box
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        let within = |value: i32, start: i32, len: u32| {
            let offset = i64::from(value) - i64::from(start);
            offset >= 0 && offset < i64::from(len)
        };
        within(pos.x, self.origin.x, self.size.0)
            && within(pos.y, self.origin.y, self.size.1)
            && within(pos.z, self.origin.z, self.size.2)
    }

    /// All positions inside the box, x-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let (sx, sy, sz) = self.size;
        let origin = self.origin;
        (0..sx).flat_map(move |dx| {
            (0..sy).flat_map(move |dy| {
                (0..sz).map(move |dz| {
                    Position::new(
                        origin.x.wrapping_add_unsigned(dx),
                        origin.y.wrapping_add_unsigned(dy),
                        origin.z.wrapping_add_unsigned(dz),
                    )
                })
            })
        })
    }
}
