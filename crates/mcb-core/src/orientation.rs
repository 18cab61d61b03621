//! Marker orientation
//!
//! Wall-mounted markers store their facing directly as the data byte.
//! Standing markers store one of 16 rotation steps, bucketed in groups of
//! four starting at 0xF: SOUTH, WEST, NORTH, EAST.

use crate::config::MarkerBlocks;
use crate::error::OrientationError;
use std::fmt;

/// Cardinal facing, numbered like wall-mounted placement bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Facing {
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Facing {
    /// Facing for a wall-mounted placement byte
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            2 => Some(Self::North),
            3 => Some(Self::South),
            4 => Some(Self::West),
            5 => Some(Self::East),
            _ => None,
        }
    }

    /// Facing for a standing rotation step (0x0..=0xF)
    #[must_use]
    pub const fn from_rotation(step: u8) -> Option<Self> {
        match step {
            0xF | 0x0..=0x2 => Some(Self::South),
            0x3..=0x6 => Some(Self::West),
            0x7..=0xA => Some(Self::North),
            0xB..=0xE => Some(Self::East),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::West => "WEST",
            Self::East => "EAST",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve the facing of a marker from its content type and data byte
pub fn facing(markers: MarkerBlocks, content_type: u16, data: u8) -> Result<Facing, OrientationError> {
    let decoded = if content_type == markers.wall {
        Facing::from_byte(data)
    } else if content_type == markers.standing {
        Facing::from_rotation(data)
    } else {
        return Err(OrientationError::NotAMarker(content_type));
    };
    decoded.ok_or(OrientationError::InvalidByte { content_type, data })
}
