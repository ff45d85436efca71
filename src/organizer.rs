//! The organizing run.
//!
//! A run reads the immediate children of the target directory once, skips
//! the reserved `CleanedFiles` entry, and files everything else under
//! `CleanedFiles/<Category>/`. Per-entry failures are recorded and the run
//! carries on; only problems with the target directory itself are fatal.

use crate::classifier::{Classifier, Entry};
use crate::config::CompiledFilters;
use crate::file_category::{Category, CategoryRegistry};
use crate::file_organizer::{FileOrganizer, MoveOutcome, Operation, OrganizeError, OrganizeResult};
use crate::path_resolver::Resolution;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the output directory created inside the target. Reserved: an
/// entry with this name is never organized.
pub const ARRANGED_DIR_NAME: &str = "CleanedFiles";

/// Returns `<target>/CleanedFiles`.
pub fn arranged_dir(target: &Path) -> PathBuf {
    target.join(ARRANGED_DIR_NAME)
}

/// Creates the arranged directory and one sub-directory per category.
///
/// Directories that already exist are left as they are.
///
/// # Errors
///
/// Returns `OrganizeError::TargetNotFound` if `target` does not exist, or
/// `OrganizeError::DirectoryCreationFailed` if a directory cannot be made.
pub fn prepare_layout(target: &Path) -> OrganizeResult<PathBuf> {
    if !target.is_dir() {
        return Err(OrganizeError::TargetNotFound {
            path: target.to_path_buf(),
        });
    }

    let arranged = arranged_dir(target);
    create_dir_if_missing(&arranged)?;
    for category in Category::ALL {
        create_dir_if_missing(&arranged.join(category.dir_name()))?;
    }
    Ok(arranged)
}

fn create_dir_if_missing(path: &Path) -> OrganizeResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Lists the immediate children of `target`, sorted by name.
///
/// # Errors
///
/// Returns `OrganizeError::TargetNotFound` when the directory is missing and
/// `OrganizeError::TargetUnreadable` when it cannot be listed. Either one
/// means nothing should be organized.
pub fn read_entries(target: &Path) -> OrganizeResult<Vec<Entry>> {
    if !target.exists() {
        return Err(OrganizeError::TargetNotFound {
            path: target.to_path_buf(),
        });
    }

    let unreadable = |e: std::io::Error| OrganizeError::TargetUnreadable {
        path: target.to_path_buf(),
        source: e,
    };

    let mut entries = fs::read_dir(target)
        .map_err(unreadable)?
        .map(|item| item.and_then(|dir_entry| Entry::from_dir_entry(&dir_entry)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(unreadable)?;

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    NotStarted,
    InProgress,
    Completed,
}

/// An entry that could not be organized.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

/// What happened to one entry, passed to the caller as the run progresses.
#[derive(Debug)]
pub enum EntryStatus<'r> {
    /// Left in place by the configured filters.
    Excluded,
    /// Handled by the mover (possibly skipped by the collision policy).
    Done(&'r Operation),
    /// The move failed; the entry stays where it was.
    Failed(&'r OrganizeError),
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub target: PathBuf,
    pub arranged: PathBuf,
    pub state: RunState,
    pub operations: Vec<Operation>,
    pub failures: Vec<Failure>,
    pub excluded: Vec<PathBuf>,
}

impl RunReport {
    fn new(target: &Path, arranged: &Path) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            target: target.to_path_buf(),
            arranged: arranged.to_path_buf(),
            state: RunState::NotStarted,
            operations: Vec::new(),
            failures: Vec::new(),
            excluded: Vec::new(),
        }
    }

    /// Number of entries that actually changed location.
    pub fn moved_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.outcome != MoveOutcome::Skipped)
            .count()
    }

    /// Operations with the given outcome.
    pub fn with_outcome(&self, outcome: MoveOutcome) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(move |op| op.outcome == outcome)
    }

    /// Moved entries per category directory name.
    pub fn counts_by_category(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for op in &self.operations {
            if op.outcome != MoveOutcome::Skipped {
                *counts.entry(op.category.dir_name().to_string()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// A dry-run decision for one entry.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub category: Category,
    /// Where the entry would end up; equal to `source` when skipped.
    pub destination: PathBuf,
    pub outcome: MoveOutcome,
}

/// Result of a dry run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan {
    pub moves: Vec<PlannedMove>,
    pub failures: Vec<Failure>,
    pub excluded: Vec<PathBuf>,
}

/// Drives classification and moving over the entries of one target.
pub struct Organizer<'a> {
    arranged: PathBuf,
    target: PathBuf,
    classifier: Classifier<'a>,
    mover: FileOrganizer,
    filters: CompiledFilters,
}

impl<'a> Organizer<'a> {
    pub fn new(
        target: &Path,
        registry: &'a CategoryRegistry,
        mover: FileOrganizer,
        filters: CompiledFilters,
    ) -> Self {
        Self {
            arranged: arranged_dir(target),
            target: target.to_path_buf(),
            classifier: Classifier::new(registry),
            mover,
            filters,
        }
    }

    pub fn arranged(&self) -> &Path {
        &self.arranged
    }

    /// Whether `entry` is the reserved output directory.
    pub fn is_reserved(entry: &Entry) -> bool {
        entry.name == ARRANGED_DIR_NAME
    }

    /// Returns the category and the uncorrected destination for `entry`.
    pub fn destination_for(&self, entry: &Entry) -> (Category, PathBuf) {
        let category = self.classifier.classify(entry);
        let destination = self
            .arranged
            .join(category.dir_name())
            .join(&entry.file_name);
        (category, destination)
    }

    /// Organizes `entries` one at a time, in order.
    ///
    /// `on_entry` is called once for every entry except the reserved one.
    /// The returned report is always `Completed`, whatever failed on the way.
    pub fn run<F>(&self, entries: &[Entry], mut on_entry: F) -> RunReport
    where
        F: FnMut(&Entry, EntryStatus<'_>),
    {
        let mut report = RunReport::new(&self.target, &self.arranged);
        report.state = RunState::InProgress;

        for entry in entries.iter().filter(|entry| !Self::is_reserved(entry)) {
            if !self.filters.should_include(&entry.name) {
                report.excluded.push(entry.path.clone());
                on_entry(entry, EntryStatus::Excluded);
                continue;
            }

            let (category, destination) = self.destination_for(entry);
            match self.mover.move_entry(entry, &destination, category) {
                Ok(operation) => {
                    on_entry(entry, EntryStatus::Done(&operation));
                    report.operations.push(operation);
                }
                Err(e) => {
                    on_entry(entry, EntryStatus::Failed(&e));
                    report.failures.push(Failure {
                        path: entry.path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.state = RunState::Completed;
        report.finished_at = Some(Utc::now());
        report
    }

    /// Works out what [`run`](Organizer::run) would do, without moving anything.
    pub fn plan(&self, entries: &[Entry]) -> Plan {
        let mut plan = Plan::default();

        for entry in entries.iter().filter(|entry| !Self::is_reserved(entry)) {
            if !self.filters.should_include(&entry.name) {
                plan.excluded.push(entry.path.clone());
                continue;
            }

            let (category, destination) = self.destination_for(entry);
            match self.mover.resolve(entry, &destination) {
                Ok(resolution) => {
                    let outcome = match &resolution {
                        Resolution::Vacant(_) => MoveOutcome::Moved,
                        Resolution::Duplicate(_) => MoveOutcome::Renamed,
                        Resolution::Replace(_) => MoveOutcome::Replaced,
                        Resolution::Skip => MoveOutcome::Skipped,
                    };
                    let destination = resolution
                        .destination()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| entry.path.clone());
                    plan.moves.push(PlannedMove {
                        source: entry.path.clone(),
                        category,
                        destination,
                        outcome,
                    });
                }
                Err(e) => plan.failures.push(Failure {
                    path: entry.path.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        plan
    }
}
