//! Run configuration
//!
//! Defaults match the classic block palette. A TOML file can override any
//! field; command-line flags are applied on top by the binary.

use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Content-type ids of the two marker variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerBlocks {
    /// Free-standing marker, data byte is a 16-step rotation
    pub standing: u16,
    /// Wall-mounted marker, data byte is the facing
    pub wall: u16,
}

impl Default for MarkerBlocks {
    fn default() -> Self {
        Self {
            standing: 63,
            wall: 68,
        }
    }
}

/// Configuration of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Proceed on descriptor mismatch and allow `init` over existing structures
    pub force: bool,
    /// Suffix appended to the world title on build
    pub post_title: Option<String>,
    /// Tile-entity id of markers
    pub marker_tile_id: String,
    /// Marker content types
    pub marker_blocks: MarkerBlocks,
    /// Spaces per indentation level in the written document
    pub document_indent: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            force: false,
            post_title: None,
            marker_tile_id: "Sign".to_string(),
            marker_blocks: MarkerBlocks::default(),
            document_indent: 4,
        }
    }
}

impl BuilderConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file; absent keys keep their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| BuildError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| BuildError::Config(format!("{}: {e}", path.display())))
    }

    /// With force flag
    #[inline]
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// With world title suffix
    #[inline]
    #[must_use]
    pub fn with_post_title(mut self, post: impl Into<String>) -> Self {
        self.post_title = Some(post.into());
        self
    }
}
