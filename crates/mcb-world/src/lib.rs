//! mcbuilder World Layer
//!
//! The narrow storage and tag-value surface the build pipeline consumes.
//!
//! # Core Concepts
//!
//! - [`WorldStore`]: Region enumeration, tile-entity reads, block reads and
//!   1×1×1 writes, metadata attachment, relighting and persistence
//! - [`Tag`]: Typed tag tree (Compound, List and scalar leaves)
//! - [`Materials`]: Content-type catalogue with id and name lookup
//! - [`MemoryWorld`]: In-memory store, used by tests and as the backing
//!   model of [`FileWorld`]
//! - [`FileWorld`]: Directory-backed store persisted as `world.json`
//!
//! # Example
//!
//! ```rust,ignore
//! use mcb_world::{BoundingBox, FileWorld, Position, WorldStore};
//!
//! let mut world = FileWorld::open("saves/castle")?;
//! let bbox = BoundingBox::unit(Position::new(0, 64, 0));
//! world.remove_tile_entities(bbox)?;
//! world.fill_blocks(bbox, &world.materials().with_id(1), 0)?;
//! world.save()?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod error;
mod file;
mod material;
mod memory;
mod position;
mod store;
mod tag;

// Re-exports
pub use error::{WorldError, WorldResult};
pub use file::{FileWorld, WORLD_FILE_NAME};
pub use material::{ContentType, Material, Materials};
pub use memory::{MemoryWorld, Region};
pub use position::{BoundingBox, Position, RegionPos};
pub use store::{BlockState, TileEntity, WorldStore};
pub use tag::{Tag, TagKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
