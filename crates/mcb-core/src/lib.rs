//! mcbuilder Core
//!
//! Turns annotated markers in a world into a build document, and replays
//! the structures declared in that document back into the world.
//!
//! # Core Operations
//!
//! - **Discover**: [`scanner::scan`] walks every region and groups markers
//!   reading `<id># <caption>` into a [`DescriptorRegistry`]
//! - **Init**: [`Document::merge_signs`] records the groups, leaving every
//!   hand-authored section untouched
//! - **Build**: each `block` entry is resolved to a content type and a set
//!   of placements ([`structure::resolve`]), then written by
//!   [`executor::apply`]
//!
//! # Architecture
//!
//! ```text
//! WorldStore → Scanner → Registry ─┬→ Document (signs) → build.xml     init
//!                                  └→ Structure Resolver → Executor    build
//!                         build.xml → Template Resolver ↗
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use mcb_core::prelude::*;
//! use mcb_world::FileWorld;
//!
//! let mut world = FileWorld::open("saves/castle-built")?;
//! let config = BuilderConfig::new().with_post_title("(built)");
//! let report = run(&mut world, "castle.xml".as_ref(), Command::Build, &config)?;
//! println!("{report}");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod executor;
pub mod orientation;
pub mod phase;
pub mod pipeline;
pub mod registry;
pub mod scanner;
pub mod structure;
pub mod template;

// Re-exports for convenience
pub use config::{BuilderConfig, MarkerBlocks};
pub use descriptor::{Annotation, Descriptor, Marker};
pub use diagnostics::{Diagnostic, Diagnostics, Location, Severity};
pub use document::Document;
pub use error::{BuildError, BuildResult, DocumentError, OrientationError, TemplateError};
pub use orientation::Facing;
pub use phase::RunPhase;
pub use pipeline::{run, Command, RunReport};
pub use registry::{DescriptorGroup, DescriptorRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a run
    pub use crate::config::BuilderConfig;
    pub use crate::diagnostics::{Diagnostic, Severity};
    pub use crate::error::{BuildError, BuildResult};
    pub use crate::pipeline::{run, Command, RunReport};
    pub use mcb_world::WorldStore;
}
