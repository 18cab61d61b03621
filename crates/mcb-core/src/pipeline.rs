//! Run driver
//!
//! One invocation performs scan → discovery, then either `init` (write the
//! `signs` section of the document) or `build` (replay every structure,
//! relight and save the world). Preconditions that abort a run are checked
//! before the world or the document is touched.

use crate::config::BuilderConfig;
use crate::descriptor::{Annotation, Descriptor};
use crate::diagnostics::{Diagnostic, Diagnostics, Location, Severity};
use crate::document::{Document, RecordedSign};
use crate::error::{BuildError, BuildResult};
use crate::executor::{self, ApplyStats};
use crate::orientation::{self, Facing};
use crate::phase::{PhaseTracker, RunPhase};
use crate::registry::DescriptorRegistry;
use crate::scanner;
use crate::structure;
use mcb_world::WorldStore;
use std::fmt;
use std::path::Path;

/// What a run does after discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Record discovered groups in the document
    Init,
    /// Replay document structures into the world
    Build,
}

impl Command {
    const fn phase(self) -> RunPhase {
        match self {
            Self::Init => RunPhase::Init,
            Self::Build => RunPhase::Build,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Build => "build",
        })
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub command: Command,
    pub groups_discovered: usize,
    pub markers_discovered: usize,
    pub structures_applied: usize,
    pub structures_skipped: usize,
    pub placements_written: usize,
    pub metadata_failures: usize,
    pub document_written: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    fn new(command: Command) -> Self {
        Self {
            command,
            groups_discovered: 0,
            markers_discovered: 0,
            structures_applied: 0,
            structures_skipped: 0,
            placements_written: 0,
            metadata_failures: 0,
            document_written: false,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics of a given severity
    pub fn diagnostics_of(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} markers in {} groups",
            self.command, self.markers_discovered, self.groups_discovered
        )?;
        match self.command {
            Command::Init => writeln!(
                f,
                "document {}",
                if self.document_written { "written" } else { "not written" }
            )?,
            Command::Build => writeln!(
                f,
                "structures: {} applied, {} skipped; {} blocks placed, {} metadata failures",
                self.structures_applied,
                self.structures_skipped,
                self.placements_written,
                self.metadata_failures
            )?,
        }
        let warnings = self.diagnostics_of(Severity::Warning).count();
        let errors = self.diagnostics_of(Severity::Error).count();
        write!(f, "{warnings} warnings, {errors} errors")
    }
}

/// Run `command` against `world` with the document at `document_path`
pub fn run<W: WorldStore + ?Sized>(
    world: &mut W,
    document_path: &Path,
    command: Command,
    config: &BuilderConfig,
) -> BuildResult<RunReport> {
    let mut phases = PhaseTracker::new();
    let mut diag = Diagnostics::new();
    let mut report = RunReport::new(command);

    let mut registry = scanner::scan(&*world, config, &mut diag).registry;
    let mut document = Document::load(document_path)?;
    let recorded = document.recorded_signs(&mut diag);
    let adopted = reconcile(&mut registry, &recorded, config, &mut diag)?;
    report.groups_discovered = registry.len();
    report.markers_discovered = registry.descriptor_count();
    phases.advance(RunPhase::Discovered)?;

    phases.advance(command.phase())?;
    match command {
        Command::Init => {
            let structures = document.structure_count();
            if structures > 0 {
                if !config.force {
                    return Err(BuildError::InitRefused {
                        path: document_path.to_path_buf(),
                        structures,
                    });
                }
                diag.warn(
                    Location::Path(document_path.to_path_buf()),
                    format!("re-initializing document with {structures} structures"),
                );
            }
            document.merge_signs_keeping(&registry, &adopted);
            document.save(document_path, config.document_indent)?;
            report.document_written = true;
        }
        Command::Build => {
            build(world, &document, &registry, config, &mut diag, &mut report)?;
        }
    }
    phases.advance(RunPhase::Done)?;

    report.diagnostics = diag.into_entries();
    tracing::info!("{} finished", command);
    Ok(report)
}

fn build<W: WorldStore + ?Sized>(
    world: &mut W,
    document: &Document,
    registry: &DescriptorRegistry,
    config: &BuilderConfig,
    diag: &mut Diagnostics,
    report: &mut RunReport,
) -> BuildResult<()> {
    let entries = document.read_structures(diag);
    report.structures_skipped = document.structure_count() - entries.len();
    if entries.is_empty() {
        diag.warn(Location::Run, "document declares no structures");
    }

    let mut totals = ApplyStats::default();
    for entry in &entries {
        let Some(resolved) = structure::resolve(entry, registry, world.materials(), diag) else {
            report.structures_skipped += 1;
            continue;
        };
        let stats = executor::apply(&resolved, world, diag);
        diag.info(
            Location::Structure(entry.index),
            format!("{} blocks placed", stats.placements_written),
        );
        totals.absorb(stats);
        report.structures_applied += 1;
    }
    report.placements_written = totals.placements_written;
    report.metadata_failures = totals.metadata_failures;

    if let Some(post) = &config.post_title {
        let title = format!("{} {}", world.display_name(), post);
        tracing::info!("Renaming world to '{}'", title);
        world.set_display_name(title);
    }

    tracing::info!("Relighting");
    world.relight()?;
    tracing::info!("Saving world");
    world.save()?;
    Ok(())
}

/// Check recorded groups against the scan
///
/// Groups recorded in the document but absent from the world abort the run
/// unless forced. Forced runs adopt a recorded position as a descriptor;
/// the signs adopted that way are returned.
fn reconcile(
    registry: &mut DescriptorRegistry,
    recorded: &[RecordedSign],
    config: &BuilderConfig,
    diag: &mut Diagnostics,
) -> BuildResult<Vec<RecordedSign>> {
    let missing: Vec<&RecordedSign> = recorded
        .iter()
        .filter(|sign| !registry.contains(sign.id))
        .collect();
    if missing.is_empty() {
        return Ok(Vec::new());
    }
    if !config.force {
        return Err(BuildError::Mismatch {
            missing: missing.iter().map(|sign| sign.id).collect(),
        });
    }

    let mut adopted = Vec::new();
    for sign in missing {
        let location = Location::Group(sign.id);
        let Some(position) = sign.position else {
            diag.warn(location, "group not found in world, keeping it without positions");
            registry.ensure_group(sign.id);
            continue;
        };
        let data = sign.data.unwrap_or(0);
        let facing = orientation::facing(config.marker_blocks, config.marker_blocks.standing, data)
            .unwrap_or(Facing::South);
        diag.warn(
            location,
            format!("group not found in world, using recorded position {position}"),
        );
        registry.insert(Descriptor::new(
            Annotation {
                group_id: sign.id,
                caption: sign.caption.clone().unwrap_or_default(),
            },
            position,
            facing,
            data,
        ));
        adopted.push(sign.clone());
    }
    Ok(adopted)
}
