//! Moving a single entry into its category directory.
//!
//! This module holds the error type shared by the engine and the mover that
//! applies the collision policy before renaming an entry into place.
use crate::classifier::Entry;
use crate::file_category::Category;
use crate::path_resolver::{PathResolver, Resolution};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// How an entry ended up at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    /// Moved to a destination that did not exist.
    Moved,
    /// Moved under a `name_N` alternative because the name was taken.
    Renamed,
    /// Moved over an existing destination of a different size.
    Replaced,
    /// Left in place by the collision policy.
    Skipped,
}

/// Records a single organizing step.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    /// Where the entry was before the run.
    pub original_path: PathBuf,
    /// Where the entry is now (equal to `original_path` when skipped).
    pub new_path: PathBuf,
    /// The category the entry was filed under.
    pub category: Category,
    /// What the mover did.
    pub outcome: MoveOutcome,
}

/// Errors that can occur while organizing.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target directory does not exist.
    TargetNotFound { path: PathBuf },
    /// The target directory exists but could not be listed.
    TargetUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create the arranged directory or a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Could not read the size of an entry or of its destination.
    SizeProbeFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to rename an entry into place.
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// A path without a usable file name was handed to the mover.
    InvalidEntryName { path: PathBuf },
}

impl OrganizeError {
    /// Whether the error aborts a run instead of affecting a single entry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::TargetNotFound { .. }
                | Self::TargetUnreadable { .. }
                | Self::DirectoryCreationFailed { .. }
        )
    }
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TargetNotFound { path } => {
                write!(f, "Directory with path: {} not found", path.display())
            }
            Self::TargetUnreadable { path, source } => {
                write!(f, "Cannot read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::SizeProbeFailed { path, source } => {
                write!(f, "Failed to read size of {}: {}", path.display(), source)
            }
            Self::MoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::InvalidEntryName { path } => {
                write!(f, "Entry has no file name: {}", path.display())
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TargetUnreadable { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::SizeProbeFailed { source, .. } => Some(source),
            Self::MoveFailed { source_error, .. } => Some(source_error),
            Self::TargetNotFound { .. } | Self::InvalidEntryName { .. } => None,
        }
    }
}

/// Result type for organizing operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves entries into place, consulting the path resolver first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOrganizer {
    resolver: PathResolver,
}

impl FileOrganizer {
    /// Creates a mover that resolves collisions with `resolver`.
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// The resolver consulted before every move.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Works out where `entry` would go without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::SizeProbeFailed` when a collision has to be
    /// judged and a size cannot be read.
    pub fn resolve(&self, entry: &Entry, destination: &Path) -> OrganizeResult<Resolution> {
        self.resolver
            .resolve(&entry.path, entry.kind, destination)
            .map_err(|e| OrganizeError::SizeProbeFailed {
                path: entry.path.clone(),
                source: e,
            })
    }

    /// Moves `entry` to `destination`, or to an alternative path when the
    /// resolver says so.
    ///
    /// Directories are compared by their total recursive size; files and
    /// other entries by their own size. The rename itself is a single
    /// `fs::rename`, so a move across filesystems fails instead of copying.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use deskclean::classifier::Entry;
    /// use deskclean::file_category::Category;
    /// use deskclean::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let entry = Entry::from_path(Path::new("/home/me/Desktop/photo.png")).unwrap();
    /// let op = FileOrganizer::default().move_entry(
    ///     &entry,
    ///     Path::new("/home/me/Desktop/CleanedFiles/Images/photo.png"),
    ///     Category::Images,
    /// );
    /// match op {
    ///     Ok(op) => println!("Moved to {}", op.new_path.display()),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn move_entry(
        &self,
        entry: &Entry,
        destination: &Path,
        category: Category,
    ) -> OrganizeResult<Operation> {
        if entry.path.file_name().is_none() {
            return Err(OrganizeError::InvalidEntryName {
                path: entry.path.clone(),
            });
        }

        let resolution = self.resolve(entry, destination)?;
        let (target, outcome) = match resolution {
            Resolution::Vacant(path) => (path, MoveOutcome::Moved),
            Resolution::Duplicate(path) => (path, MoveOutcome::Renamed),
            Resolution::Replace(path) => (path, MoveOutcome::Replaced),
            Resolution::Skip => {
                return Ok(Operation {
                    original_path: entry.path.clone(),
                    new_path: entry.path.clone(),
                    category,
                    outcome: MoveOutcome::Skipped,
                });
            }
        };

        fs::rename(&entry.path, &target).map_err(|e| OrganizeError::MoveFailed {
            source: entry.path.clone(),
            destination: target.clone(),
            source_error: e,
        })?;

        Ok(Operation {
            original_path: entry.path.clone(),
            new_path: target,
            category,
            outcome,
        })
    }
}
