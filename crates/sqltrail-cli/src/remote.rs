//! Remote parse client with local fallback.
//!
//! The statement can be sent to a remote service speaking the same wire
//! contract: `POST /parse` with `{"query": "<sql>"}` returns the lineage
//! graph, or `{"detail": "<message>"}` with a non-success status. The
//! timeout/fallback decision lives here, in the calling layer; the engine
//! itself has no timeout semantics. Any transport failure or non-2xx
//! response is recoverable and silently retried via local extraction.

use serde::{Deserialize, Serialize};
use sqltrail_core::{extract_lineage, ExtractError, LineageGraph};
use std::time::Duration;
use thiserror::Error;

const REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure to obtain a graph from the remote service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection, timeout, or response decoding failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("remote service rejected the statement: {detail}")]
    Rejected { detail: String },
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Request the lineage graph from a remote parse service.
pub fn fetch_remote(base_url: &str, sql: &str) -> Result<LineageGraph, RemoteError> {
    let url = format!("{}/parse", base_url.trim_end_matches('/'));
    let client = reqwest::blocking::Client::builder()
        .timeout(REMOTE_TIMEOUT)
        .build()?;

    let response = client.post(url).json(&ParseRequest { query: sql }).send()?;

    if !response.status().is_success() {
        let detail = response
            .json::<ErrorBody>()
            .map(|body| body.detail)
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(RemoteError::Rejected { detail });
    }

    Ok(response.json()?)
}

/// Remote-first extraction: when the remote call fails for any reason the
/// statement is extracted locally instead, so the caller always gets a
/// graph for valid input.
pub fn parse_with_fallback(
    base_url: &str,
    sql: &str,
    quiet: bool,
) -> Result<LineageGraph, ExtractError> {
    match fetch_remote(base_url, sql) {
        Ok(graph) => Ok(graph),
        Err(err) => {
            if !quiet {
                eprintln!("sqltrail: warning: remote parse failed ({err}), using local extraction");
            }
            extract_lineage(sql)
        }
    }
}
