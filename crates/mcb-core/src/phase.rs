use crate::error::BuildError;
use std::fmt;

/// Stage of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Walking regions for markers
    Scan,
    /// Registry complete, document loaded and checked
    Discovered,
    /// Writing the `signs` section
    Init,
    /// Replaying structures into the world
    Build,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scan => "scan",
            Self::Discovered => "discovered",
            Self::Init => "init",
            Self::Build => "build",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Validates a phase transition.
pub fn validate_transition(from: RunPhase, to: RunPhase) -> Result<(), BuildError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(BuildError::IllegalTransition { from, to })
    }
}

#[must_use]
pub fn allowed_transitions(from: RunPhase) -> Vec<RunPhase> {
    use RunPhase::{Build, Discovered, Done, Init, Scan};
    match from {
        Scan => vec![Discovered],
        Discovered => vec![Init, Build],
        Init | Build => vec![Done],
        Done => vec![],
    }
}

/// Current phase of a run, advanced only along legal edges
#[derive(Debug)]
pub struct PhaseTracker {
    current: RunPhase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RunPhase::Scan,
        }
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> RunPhase {
        self.current
    }

    pub fn advance(&mut self, to: RunPhase) -> Result<(), BuildError> {
        validate_transition(self.current, to)?;
        tracing::debug!("Phase {} -> {}", self.current, to);
        self.current = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_paths() {
        for command in [RunPhase::Init, RunPhase::Build] {
            let mut tracker = PhaseTracker::new();
            tracker.advance(RunPhase::Discovered).unwrap();
            tracker.advance(command).unwrap();
            tracker.advance(RunPhase::Done).unwrap();
            assert_eq!(tracker.current(), RunPhase::Done);
        }
    }

    #[test]
    fn skipping_discovery_is_rejected() {
        let err = validate_transition(RunPhase::Scan, RunPhase::Build).unwrap_err();
        assert!(matches!(
            err,
            BuildError::IllegalTransition {
                from: RunPhase::Scan,
                to: RunPhase::Build
            }
        ));
    }

    #[test]
    fn init_and_build_are_exclusive() {
        assert!(validate_transition(RunPhase::Init, RunPhase::Build).is_err());
        assert!(validate_transition(RunPhase::Build, RunPhase::Init).is_err());
        assert!(allowed_transitions(RunPhase::Done).is_empty());
    }

    #[test]
    fn tracker_stays_put_on_error() {
        let mut tracker = PhaseTracker::new();
        assert!(tracker.advance(RunPhase::Done).is_err());
        assert_eq!(tracker.current(), RunPhase::Scan);
    }
}
