//! Correspondence engine: two concurrent walks comparing mirrored trees.
//!
//! One worker walks the source and reports entries the target lacks
//! (missing); the other walks the target and reports entries the source
//! lacks (stale). Ignore rules apply only to the source walk: they describe
//! what should exist in the source, so everything found in the target is
//! checked unconditionally.
//!
//! Directories correspond when anything exists at the mirrored path; files
//! must be the same underlying file (device/inode pair) where the platform
//! can tell. Not-found on the mirrored path is the normal missing/stale
//! signal, never an error.

use crate::error::WalkError;
use crate::ignore::IgnoreSet;
use crate::walk::{walk, EntryMeta, FileId, WalkState};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Capacity per result stream. Producers block when the consumer lags,
/// keeping memory flat on huge trees.
const STREAM_CAPACITY: usize = 128;

/// Resolved inputs for one diff run.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    pub ignores: IgnoreSet,
}

/// A running diff: one worker thread per direction, one stream per worker.
///
/// Consumer contract: drain `missing`, call [`finish_missing`], then drain
/// `stale` and call [`finish_stale`]. Each stream closes when its walk
/// ends, normally or on error; paths already received stay valid either
/// way. Walk errors are only reported once the stream has been drained.
///
/// [`finish_missing`]: DiffSession::finish_missing
/// [`finish_stale`]: DiffSession::finish_stale
pub struct DiffSession {
    pub missing: Receiver<String>,
    pub stale: Receiver<String>,
    missing_worker: Option<JoinHandle<Result<(), WalkError>>>,
    stale_worker: Option<JoinHandle<Result<(), WalkError>>>,
}

impl DiffSession {
    /// Spawn both direction walks.
    pub fn spawn(config: DiffConfig) -> io::Result<Self> {
        let (missing_tx, missing_rx) = bounded(STREAM_CAPACITY);
        let (stale_tx, stale_rx) = bounded(STREAM_CAPACITY);

        let DiffConfig {
            source_root,
            target_root,
            ignores,
        } = config;

        let missing_worker = {
            let source_root = source_root.clone();
            let target_root = target_root.clone();
            thread::Builder::new()
                .name("missing-scan".to_string())
                .spawn(move || scan_missing(&source_root, &target_root, &ignores, &missing_tx))?
        };

        let stale_worker = thread::Builder::new()
            .name("stale-scan".to_string())
            .spawn(move || scan_stale(&source_root, &target_root, &stale_tx))?;

        Ok(Self {
            missing: missing_rx,
            stale: stale_rx,
            missing_worker: Some(missing_worker),
            stale_worker: Some(stale_worker),
        })
    }

    /// Join the missing-scan worker and return its terminal result.
    /// Blocks until that walk ends; call after draining `missing`.
    pub fn finish_missing(&mut self) -> Result<(), WalkError> {
        join_worker(&mut self.missing_worker)
    }

    /// Join the stale-scan worker and return its terminal result.
    /// Blocks until that walk ends; call after draining `stale`.
    pub fn finish_stale(&mut self) -> Result<(), WalkError> {
        join_worker(&mut self.stale_worker)
    }
}

fn join_worker(worker: &mut Option<JoinHandle<Result<(), WalkError>>>) -> Result<(), WalkError> {
    match worker.take() {
        Some(handle) => handle.join().unwrap_or(Err(WalkError::WorkerPanicked)),
        None => Ok(()),
    }
}

/// Walk the source, reporting entries without a counterpart in the target.
fn scan_missing(
    source_root: &Path,
    target_root: &Path,
    ignores: &IgnoreSet,
    out: &Sender<String>,
) -> Result<(), WalkError> {
    walk(source_root, |_, meta, rel| {
        if meta.is_dir && ignores.matches(rel, true) {
            debug!(path = %rel.display(), "subtree excluded by ignore rules");
            return Ok(WalkState::SkipSubtree);
        }
        if !meta.is_dir && ignores.matches(rel, false) {
            return Ok(WalkState::Continue);
        }
        if !corresponds(meta, &target_root.join(rel))? {
            // A dropped receiver just means nobody wants the rest.
            let _ = out.send(rel.to_string_lossy().into_owned());
        }
        Ok(WalkState::Continue)
    })
}

/// Walk the target, reporting entries without a counterpart in the source.
/// No ignore filtering on this side.
fn scan_stale(
    source_root: &Path,
    target_root: &Path,
    out: &Sender<String>,
) -> Result<(), WalkError> {
    walk(target_root, |_, meta, rel| {
        if !corresponds(meta, &source_root.join(rel))? {
            let _ = out.send(rel.to_string_lossy().into_owned());
        }
        Ok(WalkState::Continue)
    })
}

/// Does a corresponding entry exist at `counterpart`?
///
/// Not-found is the missing/stale signal; any other stat failure is a real
/// walk error.
fn corresponds(meta: &EntryMeta, counterpart: &Path) -> Result<bool, WalkError> {
    let counterpart_meta = match fs::metadata(counterpart) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(WalkError::Stat {
                path: counterpart.to_path_buf(),
                source: e,
            })
        }
    };
    if meta.is_dir {
        // Structural: any entry at the path will do.
        return Ok(true);
    }
    match (meta.file_id, FileId::from_metadata(&counterpart_meta)) {
        (Some(ours), Some(theirs)) => Ok(ours == theirs),
        // No identity available on this platform: existence suffices.
        _ => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore::IgnoreSet;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        source: TempDir,
        target: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                source: TempDir::new().unwrap(),
                target: TempDir::new().unwrap(),
            }
        }

        /// Create `rel` in the source and mirror it into the target as the
        /// same underlying file.
        fn mirrored_file(&self, rel: &str) {
            let src = self.source.path().join(rel);
            fs::write(&src, rel).unwrap();
            fs::hard_link(&src, self.target.path().join(rel)).unwrap();
        }

        fn run(&self, ignores: IgnoreSet) -> (Vec<String>, Vec<String>) {
            let mut session = DiffSession::spawn(DiffConfig {
                source_root: self.source.path().to_path_buf(),
                target_root: self.target.path().to_path_buf(),
                ignores,
            })
            .unwrap();
            let missing: Vec<String> = session.missing.iter().collect();
            session.finish_missing().unwrap();
            let stale: Vec<String> = session.stale.iter().collect();
            session.finish_stale().unwrap();
            (missing, stale)
        }
    }

    #[test]
    fn file_only_in_source_is_missing() {
        let fx = Fixture::new();
        fs::write(fx.source.path().join("a.txt"), "a").unwrap();

        let (missing, stale) = fx.run(IgnoreSet::default());
        assert_eq!(missing, vec!["a.txt".to_string()]);
        assert!(stale.is_empty());
    }

    #[test]
    fn file_only_in_target_is_stale() {
        let fx = Fixture::new();
        fs::write(fx.target.path().join("b.txt"), "b").unwrap();

        let (missing, stale) = fx.run(IgnoreSet::default());
        assert!(missing.is_empty());
        assert_eq!(stale, vec!["b.txt".to_string()]);
    }

    #[test]
    fn ignored_file_is_not_reported_missing() {
        let fx = Fixture::new();
        fs::write(fx.source.path().join("c.tmp"), "c").unwrap();

        let (missing, stale) = fx.run(IgnoreSet::from_lines(["*.tmp"]).unwrap());
        assert!(missing.is_empty());
        assert!(stale.is_empty());
    }

    #[test]
    fn ignored_directory_subtree_is_never_visited() {
        let fx = Fixture::new();
        fs::create_dir(fx.source.path().join("sub")).unwrap();
        fs::write(fx.source.path().join("sub").join("inner.txt"), "").unwrap();

        let (missing, stale) = fx.run(IgnoreSet::from_lines(["sub/"]).unwrap());
        assert!(missing.is_empty());
        assert!(stale.is_empty());
    }

    #[test]
    fn identical_file_in_both_trees_is_reported_nowhere() {
        let fx = Fixture::new();
        fx.mirrored_file("same.txt");

        let (missing, stale) = fx.run(IgnoreSet::default());
        assert!(missing.is_empty());
        assert!(stale.is_empty());
    }

    #[test]
    fn directory_corresponds_by_existence_alone() {
        let fx = Fixture::new();
        fs::create_dir(fx.source.path().join("docs")).unwrap();
        fs::create_dir(fx.target.path().join("docs")).unwrap();

        let (missing, stale) = fx.run(IgnoreSet::default());
        assert!(missing.is_empty());
        assert!(stale.is_empty());
    }

    #[test]
    fn missing_directory_is_reported_with_its_contents() {
        let fx = Fixture::new();
        fs::create_dir(fx.source.path().join("docs")).unwrap();
        fs::write(fx.source.path().join("docs").join("readme.md"), "").unwrap();

        let (missing, _) = fx.run(IgnoreSet::default());
        assert_eq!(
            missing,
            vec!["docs".to_string(), "docs/readme.md".to_string()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn content_equal_copies_are_distinct_files_on_both_sides() {
        let fx = Fixture::new();
        fs::write(fx.source.path().join("copy.txt"), "payload").unwrap();
        fs::write(fx.target.path().join("copy.txt"), "payload").unwrap();

        let (missing, stale) = fx.run(IgnoreSet::default());
        assert_eq!(missing, vec!["copy.txt".to_string()]);
        assert_eq!(stale, vec!["copy.txt".to_string()]);
    }

    #[test]
    fn stale_walk_applies_no_ignore_filtering() {
        let fx = Fixture::new();
        fs::write(fx.target.path().join("leftover.tmp"), "").unwrap();

        let (missing, stale) = fx.run(IgnoreSet::from_lines(["*.tmp"]).unwrap());
        assert!(missing.is_empty());
        assert_eq!(stale, vec!["leftover.tmp".to_string()]);
    }

    #[test]
    fn results_follow_traversal_order() {
        let fx = Fixture::new();
        fs::write(fx.source.path().join("z.txt"), "").unwrap();
        fs::write(fx.source.path().join("a.txt"), "").unwrap();
        fs::create_dir(fx.source.path().join("mid")).unwrap();
        fs::write(fx.source.path().join("mid").join("inner.txt"), "").unwrap();

        let (missing, _) = fx.run(IgnoreSet::default());
        assert_eq!(
            missing,
            vec![
                "a.txt".to_string(),
                "mid".to_string(),
                "mid/inner.txt".to_string(),
                "z.txt".to_string(),
            ]
        );
    }

    #[test]
    fn unchanged_trees_diff_identically_twice() {
        let fx = Fixture::new();
        fs::write(fx.source.path().join("only-here.txt"), "").unwrap();
        fx.mirrored_file("shared.txt");
        fs::write(fx.target.path().join("extra.txt"), "").unwrap();

        let first = fx.run(IgnoreSet::default());
        let second = fx.run(IgnoreSet::default());
        assert_eq!(first, second);
        assert_eq!(first.0, vec!["only-here.txt".to_string()]);
        assert_eq!(first.1, vec!["extra.txt".to_string()]);
    }

    #[test]
    fn streams_close_even_when_nothing_differs() {
        let fx = Fixture::new();
        fx.mirrored_file("a.txt");

        let mut session = DiffSession::spawn(DiffConfig {
            source_root: fx.source.path().to_path_buf(),
            target_root: fx.target.path().to_path_buf(),
            ignores: IgnoreSet::default(),
        })
        .unwrap();

        assert!(session.missing.iter().next().is_none());
        session.finish_missing().unwrap();
        assert!(session.stale.iter().next().is_none());
        session.finish_stale().unwrap();
    }
}
