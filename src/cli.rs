//! Command-line interface module for deskclean.
//!
//! This module wires configuration, the organizing engine and the output
//! formatter together:
//! - Target selection (explicit path or a home-directory location)
//! - Configuration loading and collision policy overrides
//! - Organizing, dry runs and the category listing

use crate::config::Config;
use crate::file_category::{Category, CategoryRegistry};
use crate::file_organizer::{FileOrganizer, MoveOutcome};
use crate::organizer::{self, EntryStatus, Organizer, Plan, RunReport};
use crate::output::OutputFormatter;
use crate::path_resolver::{CollisionPolicy, PathResolver};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize the entries of a directory.
    Organize {
        /// If true, report what would happen without changing anything.
        dry_run: bool,
    },
    /// Print every category with its extensions.
    ListCategories,
}

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    /// Explicit configuration file, bypassing the lookup order.
    pub config_path: Option<PathBuf>,
    /// Overrides `collision.on_size_mismatch` from the configuration.
    pub on_conflict: Option<CollisionPolicy>,
    /// Print results as JSON instead of styled text.
    pub json: bool,
}

/// Well-known directories under the user's home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Location {
    #[default]
    Desktop,
    Downloads,
}

impl Location {
    fn dir_name(&self) -> &'static str {
        match self {
            Location::Desktop => "Desktop",
            Location::Downloads => "Downloads",
        }
    }

    /// Returns `<home>/Desktop` or `<home>/Downloads`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn resolve(&self) -> Result<PathBuf, String> {
        dirs::home_dir()
            .map(|home| home.join(self.dir_name()))
            .ok_or_else(|| "Could not determine the home directory".to_string())
    }
}

/// Runs the CLI application with the given command and directory path.
///
/// # Examples
///
/// ```no_run
/// use deskclean::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// let result = run_cli(OrganizeCommand::Organize { dry_run: false }, Path::new("/path/to/Desktop"));
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<(), String> {
    run_cli_with_options(command, dir_path, &CliOptions::default())
}

/// Runs the CLI application with an optional configuration file.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let options = CliOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..Default::default()
    };
    run_cli_with_options(command, dir_path, &options)
}

/// Runs the CLI application with full options.
///
/// Fatal problems (unreadable target, bad configuration) come back as `Err`.
/// Entries that fail to move are reported but do not make the run fail.
pub fn run_cli_with_options(
    command: OrganizeCommand,
    dir_path: &Path,
    options: &CliOptions,
) -> Result<(), String> {
    let config = Config::load(options.config_path.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let registry = config
        .registry()
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    for conflict in registry.conflicts() {
        OutputFormatter::warning(&format!(
            "Extension '{}' is listed under {} and {}; using {}",
            conflict.extension, conflict.kept, conflict.ignored, conflict.kept
        ));
    }

    match command {
        OrganizeCommand::Organize { dry_run } => {
            let policy = options
                .on_conflict
                .unwrap_or(config.collision.on_size_mismatch);
            let filters = config
                .compile_filters()
                .map_err(|e| format!("Error compiling filters: {}", e))?;
            let mover = FileOrganizer::new(PathResolver::new(policy));
            let organizer = Organizer::new(dir_path, &registry, mover, filters);

            if dry_run {
                organize_directory_dry_run(&organizer, dir_path, options.json)
            } else {
                organize_directory(&organizer, dir_path, options.json)
            }
        }
        OrganizeCommand::ListCategories => {
            list_categories(&registry, options.json);
            Ok(())
        }
    }
}

/// Organizes the entries of `base_path` into `CleanedFiles/<Category>/`.
///
/// The listing is read before anything is created, so a missing or
/// unreadable target leaves the filesystem untouched.
fn organize_directory(organizer: &Organizer, base_path: &Path, json: bool) -> Result<(), String> {
    let entries = organizer::read_entries(base_path).map_err(|e| e.to_string())?;
    organizer::prepare_layout(base_path).map_err(|e| e.to_string())?;

    if !json {
        OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));
    }

    let total = entries
        .iter()
        .filter(|entry| !Organizer::is_reserved(entry))
        .count();
    let pb = if json {
        indicatif::ProgressBar::hidden()
    } else {
        OutputFormatter::create_progress_bar(total as u64)
    };

    let report = organizer.run(&entries, |entry, status| {
        pb.inc(1);
        if json {
            return;
        }
        pb.suspend(|| match status {
            EntryStatus::Excluded => {
                OutputFormatter::plain(&format!(" - {} (excluded)", entry.name));
            }
            EntryStatus::Done(op) => {
                let relative = op
                    .new_path
                    .strip_prefix(organizer.arranged())
                    .unwrap_or(op.new_path.as_path());
                match op.outcome {
                    MoveOutcome::Moved => OutputFormatter::success(&format!(
                        "{} → {}",
                        entry.name,
                        relative.display()
                    )),
                    MoveOutcome::Renamed => OutputFormatter::success(&format!(
                        "{} → {} (name taken)",
                        entry.name,
                        relative.display()
                    )),
                    MoveOutcome::Replaced => OutputFormatter::warning(&format!(
                        "{} → {} (replaced existing entry of a different size)",
                        entry.name,
                        relative.display()
                    )),
                    MoveOutcome::Skipped => OutputFormatter::warning(&format!(
                        "{} left in place: {} already exists with a different size",
                        entry.name,
                        op.category
                    )),
                }
            }
            EntryStatus::Failed(e) => OutputFormatter::error(&e.to_string()),
        });
    });
    pb.finish_and_clear();

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    let moved = report.moved_count();
    if moved > 0 {
        OutputFormatter::summary_table(&report.counts_by_category(), moved);
    } else {
        OutputFormatter::plain("Nothing to organize.");
    }

    let replaced = report.with_outcome(MoveOutcome::Replaced).count();
    if replaced > 0 {
        OutputFormatter::warning(&format!(
            "{} existing {} replaced. Use --on-conflict rename to keep both copies.",
            replaced,
            if replaced == 1 { "entry was" } else { "entries were" }
        ));
    }

    if !report.failures.is_empty() {
        OutputFormatter::error(&format!(
            "{} {} could not be organized and stayed in place:",
            report.failures.len(),
            if report.failures.len() == 1 { "entry" } else { "entries" }
        ));
        for failure in &report.failures {
            OutputFormatter::error(&format!("  {}: {}", failure.path.display(), failure.reason));
        }
    }

    OutputFormatter::completed();
}

/// Shows where every entry would go without moving or creating anything.
fn organize_directory_dry_run(
    organizer: &Organizer,
    base_path: &Path,
    json: bool,
) -> Result<(), String> {
    let entries = organizer::read_entries(base_path).map_err(|e| e.to_string())?;
    let plan = organizer.plan(&entries);

    if json {
        return print_json(&plan);
    }

    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));
    print_plan(&plan, organizer.arranged());
    OutputFormatter::success("Dry run complete. No files were modified.");
    OutputFormatter::plain(&format!(
        "Run 'deskclean {}' (without --dry-run) to organize.",
        base_path.display()
    ));
    Ok(())
}

fn print_plan(plan: &Plan, arranged: &Path) {
    if plan.moves.is_empty() && plan.failures.is_empty() {
        OutputFormatter::plain("Nothing to organize.");
        return;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for planned in &plan.moves {
        let name = planned
            .source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let relative = planned
            .destination
            .strip_prefix(arranged)
            .unwrap_or(planned.destination.as_path());

        let note = match planned.outcome {
            MoveOutcome::Moved => String::new(),
            MoveOutcome::Renamed => " (name taken)".to_string(),
            MoveOutcome::Replaced => " (would replace existing entry)".to_string(),
            MoveOutcome::Skipped => " (would be left in place)".to_string(),
        };
        OutputFormatter::plain(&format!(" - {} → {}{}", name, relative.display(), note));

        if planned.outcome != MoveOutcome::Skipped {
            *counts
                .entry(planned.category.dir_name().to_string())
                .or_insert(0) += 1;
        }
    }

    for excluded in &plan.excluded {
        OutputFormatter::plain(&format!(" - {} (excluded)", excluded.display()));
    }
    for failure in &plan.failures {
        OutputFormatter::error(&format!("{}: {}", failure.path.display(), failure.reason));
    }

    let total = counts.values().sum();
    OutputFormatter::summary_table(&counts, total);
}

fn list_categories(registry: &CategoryRegistry, json: bool) {
    if json {
        let listing: Vec<_> = Category::ALL
            .iter()
            .map(|category| {
                serde_json::json!({
                    "category": category.dir_name(),
                    "extensions": registry.extensions_for(*category),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(listing));
        return;
    }

    OutputFormatter::header("CATEGORIES");
    for category in Category::ALL {
        let extensions = registry.extensions_for(category);
        let description = match category {
            Category::Folders => "(every sub-directory)".to_string(),
            Category::Others => "(anything else)".to_string(),
            _ => extensions.join(", "),
        };
        OutputFormatter::plain(&format!("{:<13} {}", category.dir_name(), description));
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Could not serialize report: {}", e))?;
    println!("{}", json);
    Ok(())
}
