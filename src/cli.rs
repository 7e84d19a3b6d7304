// Clap definitions in derive style

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mudup::report::OutputFormat;

#[derive(Parser)]
#[command(name = "mudup", version, about)]
pub struct Cli {
    /// Set the level of verbosity
    /// -v for info, -vv for debug, -vvv for trace
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Recursive search
    #[arg(short = 'r', long = "recursive", default_value_t = false, global = true)]
    pub recursive: bool,

    /// Worker threads used to read tags
    #[arg(short = 'j', long = "jobs", global = true)]
    pub jobs: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List duplicate tracks and which copies would be removed
    Scan {
        /// Music directory/directories (operands, POSIX style)
        #[arg(value_name = "MUSIC_DIR", required = true)]
        music_dir: Vec<PathBuf>,

        /// Report format
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Delete every duplicate but the longest/largest copy
    Clean {
        /// Music directory/directories (operands, POSIX style)
        #[arg(value_name = "MUSIC_DIR", required = true)]
        music_dir: Vec<PathBuf>,

        /// Only log what would be removed
        #[arg(short = 'n', long = "dry-run", default_value_t = false)]
        dry_run: bool,

        /// Confirm the deletion
        #[arg(short = 'y', long = "yes", default_value_t = false)]
        yes: bool,

        /// Where to write the list of deleted files (defaults to the first MUSIC_DIR)
        #[arg(long = "backup-dir")]
        backup_dir: Option<PathBuf>,
    },
}
