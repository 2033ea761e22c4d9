use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nugetsweep",
    about = "Find and remove stale NuGet package versions",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan for stale package versions (report only, no deletion)
    Scan {
        /// Versions not accessed for this many days count as stale
        #[arg(long, default_value_t = 30)]
        days: u64,

        /// Cache root (defaults to the NuGet global packages folder)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Delete stale package versions (requires --confirm to actually delete)
    Clean {
        /// Actually delete folders. Without this flag, behaves like scan.
        #[arg(long)]
        confirm: bool,

        /// Versions not accessed for this many days count as stale
        #[arg(long, default_value_t = 30)]
        days: u64,

        /// Cache root (defaults to the NuGet global packages folder)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show per-package disk usage for the cache
    Analyze {
        /// Cache root (defaults to the NuGet global packages folder)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Show only the N largest packages
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}
