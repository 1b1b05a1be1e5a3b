//! Configuration management for lingoscan
//!
//! Command-line flags win; otherwise these environment variables are
//! consulted before falling back to the defaults.
//!
//! # Environment Variables
//!
//! - `LINGOSCAN_INPUT_DIR`: partitioned source files to extract (default: `rq4_logs_new`)
//! - `LINGOSCAN_OUTPUT_DIR`: extraction JSON records, also read by `scan` (default: `code_parser_data`)
//! - `LINGOSCAN_REPORT_DIR`: scan reports (default: `language_detection_results`)
//! - `LINGOSCAN_LOG`: log level (`error`, `warn`, `info`, `debug`, `trace`)

use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_INPUT_DIR: &str = "rq4_logs_new";
pub const DEFAULT_OUTPUT_DIR: &str = "code_parser_data";
pub const DEFAULT_REPORT_DIR: &str = "language_detection_results";

fn dir_from_env(var: &str, flag: Option<PathBuf>, default: &str) -> PathBuf {
    flag.or_else(|| std::env::var(var).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

pub fn input_dir(flag: Option<PathBuf>) -> PathBuf {
    dir_from_env("LINGOSCAN_INPUT_DIR", flag, DEFAULT_INPUT_DIR)
}

pub fn output_dir(flag: Option<PathBuf>) -> PathBuf {
    dir_from_env("LINGOSCAN_OUTPUT_DIR", flag, DEFAULT_OUTPUT_DIR)
}

pub fn report_dir(flag: Option<PathBuf>) -> PathBuf {
    dir_from_env("LINGOSCAN_REPORT_DIR", flag, DEFAULT_REPORT_DIR)
}

/// `LINGOSCAN_LOG` if it names a level, else derived from `-v` count
pub fn log_level(verbose: u8) -> Level {
    if let Some(level) = std::env::var("LINGOSCAN_LOG")
        .ok()
        .and_then(|v| v.parse::<Level>().ok())
    {
        return level;
    }

    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
