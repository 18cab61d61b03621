//! World directory preparation

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the directory a run works on
///
/// Without `output` the input world is used in place. With `output` the
/// input is copied there first; an existing output is refused.
pub(crate) fn prepare_world(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    if !input.is_dir() {
        bail!("world not found: {}", input.display());
    }
    tracing::info!("Using input world: {}", input.display());

    let Some(output) = output else {
        return Ok(input.to_path_buf());
    };
    if output.exists() {
        bail!("output world does already exist: {}", output.display());
    }
    tracing::info!("Copying world to {}", output.display());
    copy_dir(input, output)?;
    Ok(output.to_path_buf())
}

/// Remove a world copy left by an aborted run
pub(crate) fn discard_copy(dir: &Path) {
    tracing::info!("Removing incomplete output {}", dir.display());
    if let Err(e) = fs::remove_dir_all(dir) {
        tracing::warn!("Could not remove {}: {}", dir.display(), e);
    }
}

/// Recursive directory copy
pub(crate) fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).with_context(|| format!("creating {}", to.display()))?;
    for entry in fs::read_dir(from).with_context(|| format!("reading {}", from.display()))? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("copying {}", entry.path().display()))?;
        }
    }
    Ok(())
}
