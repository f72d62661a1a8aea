//! SQLTrail CLI library.
//!
//! The binary is a thin calling layer around `sqltrail-core`: it reads the
//! statement, chooses local or remote extraction, and renders the graph.

pub mod cli;
pub mod input;
pub mod output;
pub mod remote;
#[cfg(feature = "serve")]
pub mod server;
