#![allow(clippy::uninlined_format_args)]

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use mudup::fs::{delete_files, write_backup_list};
use mudup::report::{OutputFormat, render};
use mudup::{Library, find_duplicates, marked_for_deletion, review};

use crate::cli::{Cli, Commands};

/// How many paths are listed when asking for confirmation.
const PREVIEW_LEN: usize = 10;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> mudup::Result<()> {
    match cli.command {
        Commands::Scan {
            music_dir,
            format,
            output,
        } => scan(&music_dir, cli.recursive, cli.jobs, format, output.as_deref()),
        Commands::Clean {
            music_dir,
            dry_run,
            yes,
            backup_dir,
        } => {
            let backup_dir = backup_dir.unwrap_or_else(|| music_dir[0].clone());
            clean(&music_dir, cli.recursive, cli.jobs, dry_run, yes, &backup_dir)
        }
    }
}

fn scan(
    music_dir: &[PathBuf],
    recursive: bool,
    jobs: Option<usize>,
    format: OutputFormat,
    output: Option<&Path>,
) -> mudup::Result<()> {
    let library = Library::load(music_dir, recursive, jobs)?;
    let grouping = find_duplicates(library.tracks())?;
    let reviewed = review(&grouping.groups);

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            render(&reviewed, grouping.skipped, format, &mut file)?;
            info!("Report written to {:?}", path);
        }
        None => render(&reviewed, grouping.skipped, format, &mut std::io::stdout().lock())?,
    }
    Ok(())
}

fn clean(
    music_dir: &[PathBuf],
    recursive: bool,
    jobs: Option<usize>,
    dry_run: bool,
    yes: bool,
    backup_dir: &Path,
) -> mudup::Result<()> {
    let library = Library::load(music_dir, recursive, jobs)?;
    let grouping = find_duplicates(library.tracks())?;
    let reviewed = review(&grouping.groups);

    for group in &reviewed {
        info!("Found {} duplicates for: '{}'", group.verdicts.len(), group.label);
        if let Some(keeper) = group.keeper() {
            info!("  KEEPING: {:?} ({})", keeper.file_name(), String::from(keeper));
        }
        for track in group.discarded() {
            info!("  REMOVING: {:?} ({})", track.file_name(), String::from(track));
        }
    }

    let doomed: Vec<&Path> = marked_for_deletion(&reviewed)
        .into_iter()
        .map(|track| track.path.as_path())
        .collect();

    if doomed.is_empty() {
        println!("No duplicates found!");
        return Ok(());
    }

    if dry_run {
        println!("Dry run: {} files would be deleted.", doomed.len());
        for path in &doomed {
            println!("  {}", path.display());
        }
        return Ok(());
    }

    if !yes {
        println!("About to delete {} files:", doomed.len());
        for path in doomed.iter().take(PREVIEW_LEN) {
            println!("  {}", path.display());
        }
        if doomed.len() > PREVIEW_LEN {
            println!("  ... and {} more files", doomed.len() - PREVIEW_LEN);
        }
        warn!("Nothing deleted, re-run with --yes to confirm.");
        return Ok(());
    }

    let backup = write_backup_list(&doomed, backup_dir)?;
    let outcome = delete_files(&doomed);

    println!("Successfully deleted {} files.", outcome.deleted);
    println!("Backup list created: {}", backup.display());
    if !outcome.failed.is_empty() {
        println!("Failed to delete some files:");
        for failure in &outcome.failed {
            println!("  {}", failure);
        }
    }
    Ok(())
}
