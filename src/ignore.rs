//! `.driveignore` exclusion rules: matching and resolution.
//!
//! The ignore file holds one shell-glob pattern per line (`*`, `?`,
//! character classes); blank lines and `#` comments are skipped. A pattern
//! containing a separator is matched against the whole root-relative path;
//! a pattern without one is matched against the final path component, so it
//! applies at any depth. A trailing `/` restricts the rule to directories.
//!
//! Two files can contribute rules: a local `.driveignore` at the input root
//! and a global one in the per-user config directory. Local wins when both
//! exist, unless merging is requested, in which case global rules come
//! first and local rules after. Finding neither is an error: a diff with no
//! exclusion list would flood the report with editor droppings and build
//! output, and the user should decide what to skip before trusting the
//! result.

use crate::error::DiffError;
use directories::ProjectDirs;
use globset::{GlobBuilder, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up both locally and globally.
pub const IGNORE_FILE_NAME: &str = ".driveignore";

/// A single compiled exclusion rule.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    /// Original pattern line, kept for logging.
    pattern: String,
    matcher: GlobMatcher,
    /// Trailing `/` in the source line: matches directories only.
    dir_only: bool,
    /// Pattern contains a separator: match the whole relative path.
    anchored: bool,
}

impl IgnorePattern {
    /// Compile one pattern line.
    pub fn new(line: &str) -> Result<Self, DiffError> {
        let mut glob = line.trim();
        let dir_only = glob.ends_with('/');
        if dir_only {
            glob = glob.trim_end_matches('/');
        }
        let rooted = glob.starts_with('/');
        let glob = glob.trim_start_matches('/');
        let anchored = rooted || glob.contains('/');
        let matcher = GlobBuilder::new(glob)
            .literal_separator(anchored)
            .build()
            .map_err(|e| DiffError::Pattern {
                pattern: line.to_string(),
                source: e,
            })?
            .compile_matcher();
        Ok(Self {
            pattern: line.trim().to_string(),
            matcher,
            dir_only,
            anchored,
        })
    }

    /// The pattern text as written in the ignore file.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Does this rule exclude `path`? `path` is relative to the walk root.
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        if self.anchored {
            self.matcher.is_match(path)
        } else {
            match path.file_name() {
                Some(name) => self.matcher.is_match(Path::new(name)),
                None => false,
            }
        }
    }
}

/// Ordered, immutable set of exclusion rules.
///
/// A path is excluded when ANY rule matches. Built once before the walks
/// start; the missing-scan worker reads it without synchronization.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreSet {
    /// Compile a set from raw ignore-file lines, skipping blanks and comments.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, DiffError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            patterns.push(IgnorePattern::new(line)?);
        }
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if any rule excludes `path`.
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        self.patterns.iter().any(|p| p.matches(path, is_dir))
    }
}

/// Which `.driveignore` inputs were resolved for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreSource {
    Global,
    Local,
    Merged,
}

/// Path of the global ignore file, when a home directory can be determined.
pub fn global_ignore_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "drivediff").map(|dirs| dirs.config_dir().join(IGNORE_FILE_NAME))
}

/// Resolve the ignore set for a run.
///
/// `merge` combines global and local rules when both files exist (global
/// first); otherwise the local file wins over the global one. No file at
/// all is [`DiffError::NoIgnoreSource`].
pub fn resolve(source_root: &Path, merge: bool) -> Result<(IgnoreSet, IgnoreSource), DiffError> {
    resolve_with_global(source_root, global_ignore_path().as_deref(), merge)
}

fn resolve_with_global(
    source_root: &Path,
    global_path: Option<&Path>,
    merge: bool,
) -> Result<(IgnoreSet, IgnoreSource), DiffError> {
    let local = read_pattern_lines(&source_root.join(IGNORE_FILE_NAME))?;
    let global = match global_path {
        Some(path) => read_pattern_lines(path)?,
        None => None,
    };

    match (global, local) {
        (Some(mut global_lines), Some(local_lines)) if merge => {
            global_lines.extend(local_lines);
            Ok((IgnoreSet::from_lines(global_lines)?, IgnoreSource::Merged))
        }
        (_, Some(local_lines)) => Ok((IgnoreSet::from_lines(local_lines)?, IgnoreSource::Local)),
        (Some(global_lines), None) => {
            Ok((IgnoreSet::from_lines(global_lines)?, IgnoreSource::Global))
        }
        (None, None) => Err(DiffError::NoIgnoreSource),
    }
}

/// Read an ignore file into lines, or `None` when it does not exist.
fn read_pattern_lines(path: &Path) -> Result<Option<Vec<String>>, DiffError> {
    if !path.is_file() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| DiffError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(Some(contents.lines().map(|l| l.to_string()).collect()))
}
