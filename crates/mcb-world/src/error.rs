//! Error types for the world layer
//!
//! Provides error handling for:
//! - Region integrity failures (recoverable, per region)
//! - Reads and writes outside the loaded regions
//! - Metadata attachment failures
//! - Persistence (I/O and JSON encoding)

use crate::position::{Position, RegionPos};
use std::path::PathBuf;

/// Errors raised by a [`WorldStore`](crate::WorldStore)
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Region failed its integrity check
    #[error("region {region} is malformed: {reason}")]
    RegionMalformed { region: RegionPos, reason: String },

    /// Region is not part of the world
    #[error("region {0} is not loaded")]
    RegionNotLoaded(RegionPos),

    /// Metadata value cannot be attached at the position
    #[error("invalid metadata at {position}: {reason}")]
    InvalidMetadata { position: Position, reason: String },

    /// Tile entity that carries no coordinates
    #[error("tile entity without coordinates")]
    UnplacedTileEntity,

    /// World directory or file does not exist
    #[error("world not found: {0}")]
    NotFound(PathBuf),

    /// IO error during read or write
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// World file could not be encoded or decoded
    #[error("world format error in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl WorldError {
    /// Create malformed region error
    pub fn malformed(region: RegionPos, reason: impl Into<String>) -> Self {
        Self::RegionMalformed {
            region,
            reason: reason.into(),
        }
    }

    /// Create invalid metadata error
    pub fn invalid_metadata(position: Position, reason: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            position,
            reason: reason.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure is confined to a single region
    #[inline]
    #[must_use]
    pub fn is_region_local(&self) -> bool {
        matches!(self, Self::RegionMalformed { .. } | Self::RegionNotLoaded(_))
    }
}

/// Result type alias for world operations
pub type WorldResult<T> = Result<T, WorldError>;
