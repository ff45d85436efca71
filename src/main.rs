use clap::Parser;
use deskclean::cli::{CliOptions, Location, OrganizeCommand, run_cli_with_options};
use deskclean::output::OutputFormatter;
use deskclean::path_resolver::CollisionPolicy;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about = "Sort a directory into CleanedFiles/<Category> folders by file extension")]
struct Args {
    /// Directory to organize. Defaults to the chosen --location.
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Home directory location to organize when no path is given
    #[arg(short, long, value_enum, default_value_t = Location::Desktop)]
    location: Location,

    /// Only print what would happen
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Configuration file to use
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// What to do when a destination exists with a different size
    #[arg(long, value_enum, value_name = "POLICY")]
    on_conflict: Option<CollisionPolicy>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// List categories and their extensions, then exit
    #[arg(long)]
    list_categories: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let target = match args.path {
        Some(path) => path,
        None => match args.location.resolve() {
            Ok(path) => path,
            Err(e) => {
                OutputFormatter::error(&e);
                return ExitCode::FAILURE;
            }
        },
    };

    let command = if args.list_categories {
        OrganizeCommand::ListCategories
    } else {
        OrganizeCommand::Organize {
            dry_run: args.dry_run,
        }
    };

    let options = CliOptions {
        config_path: args.config,
        on_conflict: args.on_conflict,
        json: args.json,
    };

    match run_cli_with_options(command, &target, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
