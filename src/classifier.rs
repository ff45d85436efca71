//! Entry classification.
//!
//! A sub-directory always lands in `Folders`. Everything else is classified
//! by the last extension segment of its name, so `backup.tar.gz` counts as
//! `gz`.

use crate::file_category::{Category, CategoryRegistry};
use serde::Serialize;
use std::ffi::OsString;
use std::fs::DirEntry;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of filesystem object an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Anything else: symbolic links, sockets, FIFOs, devices.
    Other,
}

impl EntryKind {
    /// Derives the kind from a file type without following symlinks.
    pub fn from_file_type(file_type: std::fs::FileType) -> Self {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// An immediate child of the target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// The entry's file name, lossily decoded. Used for display, filters and
    /// classification.
    pub name: String,
    /// The exact file name as stored on disk. Destinations are built from it.
    #[serde(skip)]
    pub file_name: OsString,
    /// The full path to the entry.
    pub path: PathBuf,
    /// The kind of object at that path.
    pub kind: EntryKind,
}

impl Entry {
    /// Builds an entry from a directory listing item.
    pub fn from_dir_entry(entry: &DirEntry) -> io::Result<Self> {
        let file_name = entry.file_name();
        Ok(Self {
            name: file_name.to_string_lossy().to_string(),
            file_name,
            path: entry.path(),
            kind: EntryKind::from_file_type(entry.file_type()?),
        })
    }

    /// Builds an entry by inspecting `path` directly.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = std::fs::symlink_metadata(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

        Ok(Self {
            name: file_name.to_string_lossy().to_string(),
            file_name,
            path: path.to_path_buf(),
            kind: EntryKind::from_file_type(metadata.file_type()),
        })
    }

    /// Whether the entry is a real directory (symlinks to directories are not).
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Returns the lower-cased text after the final `.` of `name`.
///
/// A name without a `.` has an empty extension.
///
/// # Examples
///
/// ```
/// use deskclean::classifier::extension_of;
///
/// assert_eq!(extension_of("IMAGE.PNG"), "png");
/// assert_eq!(extension_of("archive.tar.gz"), "gz");
/// assert_eq!(extension_of("Makefile"), "");
/// ```
pub fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Decides which category an entry belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    registry: &'a CategoryRegistry,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier over `registry`.
    pub fn new(registry: &'a CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Returns the category for `entry`.
    pub fn classify(&self, entry: &Entry) -> Category {
        if entry.is_dir() {
            return Category::Folders;
        }
        self.classify_name(&entry.name)
    }

    /// Classifies a non-directory by name alone.
    pub fn classify_name(&self, name: &str) -> Category {
        let ext = extension_of(name);
        if ext.is_empty() {
            return Category::Others;
        }
        self.registry
            .extension_to_category(&ext)
            .unwrap_or(Category::Others)
    }
}
