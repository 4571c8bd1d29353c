//! CLI route: dispatch parsed commands to domain services.

use super::presentation;
use super::{Cli, Commands};
use crate::diff::{DiffConfig, DiffSession};
use crate::error::DiffError;
use crate::ignore;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Execution context for one CLI invocation.
pub struct RunContext;

impl RunContext {
    pub fn execute(cli: &Cli) -> Result<(), DiffError> {
        match &cli.command {
            Commands::Diff {
                target,
                input,
                merge_ignores,
                no_color,
            } => run_diff(input, target, *merge_ignores, !*no_color),
        }
    }
}

fn run_diff(
    source_root: &Path,
    target_root: &Path,
    merge_ignores: bool,
    color: bool,
) -> Result<(), DiffError> {
    validate_target(target_root)?;

    let (ignores, source) = ignore::resolve(source_root, merge_ignores)?;
    info!(source = ?source, rules = ignores.len(), "resolved ignore rules");

    let mut session = DiffSession::spawn(DiffConfig {
        source_root: source_root.to_path_buf(),
        target_root: target_root.to_path_buf(),
        ignores,
    })?;

    // All missing lines are printed, and that walk's error checked, before
    // any stale line; the two walks still run concurrently underneath.
    for path in session.missing.iter() {
        presentation::render_missing(&path, color);
    }
    session.finish_missing()?;
    debug!("missing scan complete");

    for path in session.stale.iter() {
        presentation::render_stale(&path, color);
    }
    session.finish_stale()?;
    debug!("stale scan complete");

    Ok(())
}

/// Reject the mirror path before any walk starts.
fn validate_target(target: &Path) -> Result<(), DiffError> {
    let metadata = match fs::metadata(target) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DiffError::TargetMissing(target.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_dir() {
        return Err(DiffError::TargetNotADirectory(target.to_path_buf()));
    }
    Ok(())
}
