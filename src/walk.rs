//! Filesystem walker: pre-order depth-first traversal with a visitor.
//!
//! The visitor receives every entry below the root (the root itself is not
//! visited) and can prune a whole subtree by returning
//! [`WalkState::SkipSubtree`]. Siblings are visited in file-name order so
//! traversal is deterministic.

use crate::error::WalkError;
use std::fs::Metadata;
use std::path::Path;
use walkdir::WalkDir;

/// File identity token, comparable across trees to test "same underlying
/// file" without touching content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileId {
    dev: u64,
    ino: u64,
}

impl FileId {
    /// Identity from metadata. `None` where the platform has no stable
    /// device/inode pair; existence then suffices for correspondence.
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Some(Self {
                dev: metadata.dev(),
                ino: metadata.ino(),
            })
        }
        #[cfg(not(unix))]
        {
            let _ = metadata;
            None
        }
    }
}

/// Metadata handed to the visitor for every entry.
#[derive(Debug, Clone)]
pub struct EntryMeta {
    pub is_dir: bool,
    pub file_id: Option<FileId>,
}

impl EntryMeta {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            is_dir: metadata.is_dir(),
            file_id: FileId::from_metadata(metadata),
        }
    }
}

/// Visitor verdict for the current entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Keep walking.
    Continue,
    /// For a directory entry: do not descend into it; siblings are still
    /// visited. For a file entry this is a no-op.
    SkipSubtree,
}

/// Walk `root` depth-first in pre-order, invoking `visit` for every entry
/// with its absolute path, metadata, and path relative to `root`.
///
/// The first visitor error or filesystem error halts the walk and is
/// propagated. Symlinks are not followed.
pub fn walk<F>(root: &Path, mut visit: F) -> Result<(), WalkError>
where
    F: FnMut(&Path, &EntryMeta, &Path) -> Result<WalkState, WalkError>,
{
    let mut iter = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = iter.next() {
        let entry = entry?;
        let metadata = entry.metadata()?;
        let meta = EntryMeta::from_metadata(&metadata);
        let rel = entry
            .path()
            .strip_prefix(root)
            .expect("walkdir yields paths under its own root");
        match visit(entry.path(), &meta, rel)? {
            WalkState::SkipSubtree => {
                if meta.is_dir {
                    iter.skip_current_dir();
                }
            }
            WalkState::Continue => {}
        }
    }

    Ok(())
}
