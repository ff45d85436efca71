//! Destination resolution and collision handling.
//!
//! When a destination already exists, equal byte sizes on both sides are
//! taken as evidence that the entry was organized before, and the entry is
//! given a fresh `name_N.ext` path instead. What happens when the sizes
//! differ is decided by a [`CollisionPolicy`].
use crate::classifier::EntryKind;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to do when the destination exists with a different size.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing destination. The previous content is lost.
    #[default]
    Overwrite,
    /// Keep both by moving the entry to the next free `name_N.ext`.
    Rename,
    /// Leave the entry where it is.
    Skip,
}

/// The outcome of resolving a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing exists at the destination.
    Vacant(PathBuf),
    /// The destination was taken; use this alternative path.
    Duplicate(PathBuf),
    /// The destination exists and will be replaced.
    Replace(PathBuf),
    /// The entry should not be moved.
    Skip,
}

impl Resolution {
    /// The path the entry would be moved to, if any.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Resolution::Vacant(path) | Resolution::Duplicate(path) | Resolution::Replace(path) => {
                Some(path.as_path())
            }
            Resolution::Skip => None,
        }
    }
}

/// Resolves destinations under a given collision policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver {
    policy: CollisionPolicy,
}

impl PathResolver {
    /// Creates a resolver applying `policy` to size mismatches.
    pub fn new(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    /// The policy used when the destination exists with a different size.
    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Decides where an entry of `kind` at `source` should go, given the
    /// desired `destination`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the size of either side cannot be read.
    pub fn resolve(
        &self,
        source: &Path,
        kind: EntryKind,
        destination: &Path,
    ) -> io::Result<Resolution> {
        let Some(existing) = probe(destination) else {
            return Ok(Resolution::Vacant(destination.to_path_buf()));
        };

        let source_size = entry_size(source, kind)?;
        let existing_kind = EntryKind::from_file_type(existing.file_type());
        let existing_size = entry_size(destination, existing_kind)?;

        if source_size == existing_size {
            return Ok(Resolution::Duplicate(next_free_path(destination)));
        }

        Ok(match self.policy {
            CollisionPolicy::Overwrite => Resolution::Replace(destination.to_path_buf()),
            CollisionPolicy::Rename => Resolution::Duplicate(next_free_path(destination)),
            CollisionPolicy::Skip => Resolution::Skip,
        })
    }
}

/// Returns the metadata of `path` without following symlinks, or `None` if
/// nothing is there.
pub fn probe(path: &Path) -> Option<Metadata> {
    fs::symlink_metadata(path).ok()
}

/// Returns the byte size of an entry.
///
/// For a directory this is the sum of every non-directory descendant.
/// Symlinks are counted as links and never followed.
pub fn entry_size(path: &Path, kind: EntryKind) -> io::Result<u64> {
    match kind {
        EntryKind::Directory => directory_size(path),
        EntryKind::File | EntryKind::Other => Ok(fs::symlink_metadata(path)?.len()),
    }
}

fn directory_size(path: &Path) -> io::Result<u64> {
    let mut size = 0;
    for entry in WalkDir::new(path) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            size += entry.metadata()?.len();
        }
    }
    Ok(size)
}

/// Returns the first free `name_N.ext` sibling of `original`, N from 1.
///
/// The search has no upper bound: it ends at the first unused name.
///
/// # Examples
///
/// ```no_run
/// use deskclean::path_resolver::next_free_path;
/// use std::path::Path;
///
/// // With photo.png already present:
/// let free = next_free_path(Path::new("/tmp/Images/photo.png"));
/// assert_eq!(free, Path::new("/tmp/Images/photo_1.png"));
/// ```
pub fn next_free_path(original: &Path) -> PathBuf {
    // A leading dot does not start an extension: `.bashrc` has none.
    let stem = original.file_stem().unwrap_or_default();
    let ext = original.extension();
    let parent = original.parent().unwrap_or_else(|| Path::new(""));

    let mut n: u64 = 1;
    loop {
        let mut name = OsString::from(stem);
        name.push(format!("_{}", n));
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }

        let candidate = parent.join(name);
        if probe(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}
