//! SQLTrail CLI - SQL lineage extractor

use sqltrail_cli::cli;
use sqltrail_cli::input;
use sqltrail_cli::output;
use sqltrail_cli::remote;
#[cfg(feature = "serve")]
use sqltrail_cli::server;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sqltrail_core::extract_lineage;
use std::fs;
use std::process::ExitCode;

use cli::{Args, OutputFormat};

/// Extraction or I/O error.
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let args = Args::parse();

    #[cfg(feature = "serve")]
    if args.serve {
        return run_serve_mode(args);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sqltrail: error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Run the CLI in serve mode.
#[cfg(feature = "serve")]
fn run_serve_mode(args: Args) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("sqltrail: error: failed to start runtime: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match runtime.block_on(server::run_server(args.port)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sqltrail: error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let sql = input::read_input(&args.files)?;
    if sql.trim().is_empty() {
        bail!("no SQL statement provided");
    }

    let graph = match &args.remote {
        Some(url) => remote::parse_with_fallback(url, &sql, args.quiet)?,
        None => extract_lineage(&sql)?,
    };

    let rendered = match args.format {
        OutputFormat::Json => output::format_json(&graph, args.compact),
        OutputFormat::Table => output::format_table(&graph, !args.no_color),
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}
