//! Error types for mcbuilder core
//!
//! Errors come in three tiers:
//! - Per item (marker text, orientation, template, lookup): logged into the
//!   run diagnostics, the item is skipped
//! - Per region: a corrupt region is skipped by the scanner
//! - Per run ([`BuildError`]): the run aborts before the world is mutated

use crate::phase::RunPhase;
use mcb_world::WorldError;
use std::path::PathBuf;

/// Orientation byte could not be mapped to a facing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrientationError {
    /// Content type is neither the standing nor the wall marker
    #[error("content type {0} is not a marker")]
    NotAMarker(u16),

    /// Orientation byte outside the range of the marker variant
    #[error("orientation byte {data:#x} is invalid for content type {content_type}")]
    InvalidByte { content_type: u16, data: u8 },
}

/// Template could not be resolved into a tag value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Placeholder without a value in the context
    #[error("unresolved placeholder '%({0})s'")]
    UnresolvedPlaceholder(String),

    /// Substituted text does not parse as the declared kind
    #[error("invalid {kind} value '{text}'")]
    InvalidScalar { kind: &'static str, text: String },

    /// Element name is not a known node kind
    #[error("unknown node kind <{0}>")]
    UnknownKind(String),

    /// Scalar node with element children
    #[error("scalar node <{0}> cannot have children")]
    ScalarWithChildren(String),

    /// Compound child without a `name` attribute
    #[error("compound child without a name")]
    UnnamedChild,

    /// Two compound children under the same name
    #[error("duplicate compound child '{0}'")]
    DuplicateChild(String),

    /// List whose elements are not all of one kind
    #[error("list mixes {expected} and {found} elements")]
    HeterogeneousList {
        expected: &'static str,
        found: &'static str,
    },
}

/// Build document could not be loaded or written
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document exists but is not well-formed
    #[error("xml error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Root element is not `mcbuilder`
    #[error("unexpected root <{found}> in {path}, expected <mcbuilder>")]
    UnexpectedRoot { path: PathBuf, found: String },

    /// Serialization failed
    #[error("failed to serialize document: {0}")]
    Serialize(String),

    /// IO error during read or write
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Create parse error for path
    pub fn parse_error(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures that abort a whole run
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Build document could not be loaded or written
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Document records groups the world no longer has
    #[error("document and world mismatch: groups {missing:?} not found in world, set force to override")]
    Mismatch { missing: Vec<u64> },

    /// `init` on a document that already declares structures
    #[error("refusing to init non-empty document {path} ({structures} structures), set force to override")]
    InitRefused { path: PathBuf, structures: usize },

    /// Storage failure outside per-item handling
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// Phase machine violation
    #[error("illegal phase transition {from:?} -> {to:?}")]
    IllegalTransition { from: RunPhase, to: RunPhase },

    /// Configuration file could not be read
    #[error("configuration error: {0}")]
    Config(String),
}

impl BuildError {
    /// Whether `--force` would have let the run proceed
    #[inline]
    #[must_use]
    pub fn is_overridable(&self) -> bool {
        matches!(self, Self::Mismatch { .. } | Self::InitRefused { .. })
    }
}

/// Result type alias for run-level operations
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_error_display() {
        let err = OrientationError::InvalidByte {
            content_type: 68,
            data: 9,
        };
        assert_eq!(err.to_string(), "orientation byte 0x9 is invalid for content type 68");
    }

    #[test]
    fn template_error_display() {
        let err = TemplateError::UnresolvedPlaceholder("w".to_string());
        assert_eq!(err.to_string(), "unresolved placeholder '%(w)s'");
    }

    #[test]
    fn mismatch_is_overridable() {
        let err = BuildError::Mismatch { missing: vec![4] };
        assert!(err.is_overridable());
        assert!(err.to_string().contains("[4]"));

        let err: BuildError = DocumentError::parse_error("b.xml", "eof").into();
        assert!(!err.is_overridable());
        assert!(matches!(err, BuildError::Document(_)));
    }
}
