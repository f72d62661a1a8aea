//! Error types for lineage extraction.
//!
//! # Error Handling Strategy
//!
//! The engine never fails on malformed or partial SQL: missing clauses
//! yield empty contributions, unparseable expressions yield zero column
//! references, and heuristic ambiguities resolve through documented
//! deterministic fallbacks. The single fatal condition is invoking the
//! engine with blank input (or input that is empty once comments are
//! stripped), which surfaces as [`ExtractError::InvalidInput`].

use thiserror::Error;

/// Error surfaced at the extraction boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The input contained no SQL text to analyze.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
