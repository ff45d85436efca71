//! deskclean - sort a cluttered directory into category folders
//!
//! Every immediate child of a target directory is filed under
//! `CleanedFiles/<Category>/` by its extension; sub-directories go to
//! `Folders`. Name collisions never silently drop an entry that looks like a
//! duplicate: it gets a `name_N.ext` path instead.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod organizer;
pub mod output;
pub mod path_resolver;

pub use classifier::{Classifier, Entry, EntryKind};
pub use config::{CompiledFilters, Config, ConfigError};
pub use file_category::{Category, CategoryRegistry};
pub use file_organizer::{FileOrganizer, MoveOutcome, Operation, OrganizeError};
pub use organizer::{ARRANGED_DIR_NAME, Organizer, RunReport, RunState};
pub use path_resolver::{CollisionPolicy, PathResolver};

pub use cli::{OrganizeCommand, run_cli};
