//! Content-type catalogue
//!
//! Lookup by id always succeeds (unknown ids are written as-is); lookup by
//! name returns the first catalogue entry whose name contains the pattern,
//! case-insensitively, in catalogue order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalogue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: u16,
    pub name: String,
}

impl Material {
    #[inline]
    #[must_use]
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Content type to be written into the world
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    pub id: u16,
    pub name: Option<String>,
}

impl ContentType {
    #[inline]
    #[must_use]
    pub const fn from_id(id: u16) -> Self {
        Self { id, name: None }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({})", self.id),
            None => write!(f, "#{}", self.id),
        }
    }
}

/// Ordered catalogue of known content types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Materials {
    entries: Vec<Material>,
}

impl Default for Materials {
    fn default() -> Self {
        Self::classic()
    }
}

impl Materials {
    #[inline]
    #[must_use]
    pub fn new(entries: Vec<Material>) -> Self {
        Self { entries }
    }

    /// The classic numeric block palette
    #[must_use]
    pub fn classic() -> Self {
        const CLASSIC: &[(u16, &str)] = &[
            (0, "Air"),
            (1, "Stone"),
            (2, "Grass"),
            (3, "Dirt"),
            (4, "Cobblestone"),
            (5, "Wood Planks"),
            (7, "Bedrock"),
            (8, "Water"),
            (10, "Lava"),
            (12, "Sand"),
            (13, "Gravel"),
            (17, "Wood"),
            (18, "Leaves"),
            (20, "Glass"),
            (23, "Dispenser"),
            (24, "Sandstone"),
            (25, "Note Block"),
            (35, "Wool"),
            (41, "Block of Gold"),
            (42, "Block of Iron"),
            (45, "Brick"),
            (46, "TNT"),
            (47, "Bookshelf"),
            (48, "Moss Stone"),
            (49, "Obsidian"),
            (50, "Torch"),
            (52, "Monster Spawner"),
            (53, "Wooden Stairs"),
            (54, "Chest"),
            (57, "Block of Diamond"),
            (58, "Crafting Table"),
            (61, "Furnace"),
            (63, "Sign"),
            (64, "Wooden Door"),
            (65, "Ladder"),
            (68, "Wall Sign"),
            (69, "Lever"),
            (71, "Iron Door"),
            (76, "Redstone Torch"),
            (85, "Fence"),
            (89, "Glowstone"),
            (98, "Stone Bricks"),
            (116, "Enchantment Table"),
            (130, "Ender Chest"),
            (137, "Command Block"),
            (146, "Trapped Chest"),
            (154, "Hopper"),
        ];
        Self::new(
            CLASSIC
                .iter()
                .map(|&(id, name)| Material::new(id, name))
                .collect(),
        )
    }

    #[must_use]
    pub fn entries(&self) -> &[Material] {
        &self.entries
    }

    /// Content type for an explicit id, named when the catalogue knows it
    #[must_use]
    pub fn with_id(&self, id: u16) -> ContentType {
        ContentType {
            id,
            name: self
                .entries
                .iter()
                .find(|m| m.id == id)
                .map(|m| m.name.clone()),
        }
    }

    /// All entries whose name contains `pattern`, case-insensitively
    pub fn matching<'a>(&'a self, pattern: &str) -> impl Iterator<Item = &'a Material> + 'a {
        let needle = pattern.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |m| !needle.is_empty() && m.name.to_lowercase().contains(&needle))
    }

    /// First entry matching `pattern`
    #[must_use]
    pub fn first_matching(&self, pattern: &str) -> Option<ContentType> {
        self.matching(pattern).next().map(|m| ContentType {
            id: m.id,
            name: Some(m.name.clone()),
        })
    }
}
