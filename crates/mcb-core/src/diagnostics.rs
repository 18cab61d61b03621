//! Per-run diagnostics sink
//!
//! Components report skips and failures here instead of through process-wide
//! state. Every entry is also emitted as a tracing event.

use mcb_world::{Position, RegionPos};
use std::fmt;
use std::path::PathBuf;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Where a diagnostic points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Position(Position),
    Region(RegionPos),
    Group(u64),
    /// Index of a `block` entry in the document
    Structure(usize),
    Path(PathBuf),
    Run,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(p) => write!(f, "@ {p}"),
            Self::Region(r) => write!(f, "region {r}"),
            Self::Group(id) => write!(f, "group {id}"),
            Self::Structure(i) => write!(f, "block #{i}"),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Run => f.write_str("run"),
        }
    }
}

/// Single diagnostic entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.location, self.message)
    }
}

/// Diagnostics collected during one run
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, location: Location, message: impl Into<String>) {
        self.push(Severity::Info, location, message.into());
    }

    pub fn warn(&mut self, location: Location, message: impl Into<String>) {
        self.push(Severity::Warning, location, message.into());
    }

    pub fn error(&mut self, location: Location, message: impl Into<String>) {
        self.push(Severity::Error, location, message.into());
    }

    fn push(&mut self, severity: Severity, location: Location, message: String) {
        match severity {
            Severity::Info => tracing::info!("[{}] {}", location, message),
            Severity::Warning => tracing::warn!("[{}] {}", location, message),
            Severity::Error => tracing::error!("[{}] {}", location, message),
        }
        self.entries.push(Diagnostic {
            severity,
            location,
            message,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
