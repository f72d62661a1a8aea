//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// SQLTrail - SQL data lineage extractor
#[derive(Parser, Debug)]
#[command(name = "sqltrail")]
#[command(about = "Extract a data-lineage graph from a SQL statement", long_about = None)]
#[command(version)]
pub struct Args {
    /// SQL files to read (reads from stdin if none provided)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json", value_enum)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Disable colored output for the table format
    #[arg(long)]
    pub no_color: bool,

    /// Base URL of a remote parse service; any failure falls back to
    /// local extraction
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Start HTTP server exposing POST /parse
    #[cfg(feature = "serve")]
    #[arg(long)]
    pub serve: bool,

    /// Port for HTTP server (default: 8000)
    #[cfg(feature = "serve")]
    #[arg(long, default_value = "8000")]
    pub port: u16,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The lineage graph wire contract as JSON
    Json,
    /// Human-readable summary
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_json_to_stdout() {
        let args = Args::parse_from(["sqltrail"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.output.is_none());
        assert!(args.files.is_empty());
        assert!(!args.compact);
    }

    #[test]
    fn remote_url_is_optional() {
        let args = Args::parse_from(["sqltrail", "--remote", "http://localhost:8000"]);
        assert_eq!(args.remote.as_deref(), Some("http://localhost:8000"));
    }

    #[cfg(feature = "serve")]
    #[test]
    fn serve_flag_carries_a_port() {
        let args = Args::parse_from(["sqltrail", "--serve", "--port", "9001"]);
        assert!(args.serve);
        assert_eq!(args.port, 9001);
    }
}
