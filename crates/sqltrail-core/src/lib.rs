//! SQLTrail core: extract a data-lineage graph from a single SQL statement.
//!
//! The engine identifies the tables and columns a statement touches and the
//! typed relationships between them — which table provides which column,
//! which columns feed the output, which constrain or join, which table is
//! mutated. It deliberately uses bounded pattern matching over clause
//! segments rather than a full SQL grammar, trading completeness for total
//! availability: malformed SQL degrades to a smaller graph, never an error.
//!
//! ```
//! use sqltrail_core::{extract_lineage, EdgeKind};
//!
//! let graph = extract_lineage("SELECT u.id FROM users u").unwrap();
//! assert!(graph.has_edge("table_users", "column_users_id", EdgeKind::Provides));
//! assert!(graph.has_edge("column_users_id", "query_select", EdgeKind::FlowsTo));
//! ```

pub mod analyzer;
pub mod error;
pub mod types;

// Re-export main types and functions
pub use analyzer::extract_lineage;
pub use error::ExtractError;
pub use types::{Edge, EdgeKind, LineageGraph, Node, NodeKind, TableReference};
