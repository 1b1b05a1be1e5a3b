//! lingoscan - natural-language mining of source code

mod cli;
mod config;
mod entities;
mod tools;

use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract { file } => {
            let registry = entities::ParserRegistry::new();
            to_json(&entities::extract_file(&registry, &file))
        }

        Commands::Parse { input, output, threads } => {
            let options = tools::BatchOptions {
                input_dir: config::input_dir(input),
                output_dir: config::output_dir(output),
                threads,
            };
            tools::run_batch(&options)
                .map_err(|e| e.to_string())
                .and_then(|summary| to_json(&summary))
        }

        Commands::Scan { data, output, from, to } => {
            let to = to.unwrap_or(from);
            if to < from {
                Err(format!("--to ({}) is before --from ({})", to, from))
            } else {
                let options = tools::ScanOptions {
                    data_dir: config::output_dir(data),
                    output_dir: config::report_dir(output),
                    years: from..=to,
                };
                tools::run_scan(&options)
                    .map_err(|e| e.to_string())
                    .and_then(|reports| to_json(&reports))
            }
        }
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

/// Logs go to stderr; stdout carries only JSON
fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(config::log_level(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
