//! CLI module for lingoscan
//!
//! Defines command-line interface using clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lingoscan")]
#[command(about = "Extract natural-language content from source code")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the entities of a single source file as JSON
    Extract {
        /// Source file (.py, .js, .ts, .java or .cs)
        file: PathBuf,
    },

    /// Extract every file under <input>/<YYYY-MM>/ into JSON records
    Parse {
        /// Directory of year-month partition folders [env: LINGOSCAN_INPUT_DIR]
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Directory for the JSON records [env: LINGOSCAN_OUTPUT_DIR]
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Worker threads (defaults to one per CPU)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },

    /// Report extracted entries written in non-Latin scripts
    Scan {
        /// Directory of JSON records [env: LINGOSCAN_OUTPUT_DIR]
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Directory for the yearly reports [env: LINGOSCAN_REPORT_DIR]
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// First year to scan
        #[arg(long)]
        from: i32,
        /// Last year to scan (defaults to --from)
        #[arg(long)]
        to: Option<i32>,
    },
}
