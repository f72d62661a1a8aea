//! JSON output formatting.

use sqltrail_core::LineageGraph;

/// Format the lineage graph as JSON.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json(graph: &LineageGraph, compact: bool) -> String {
    if compact {
        serde_json::to_string(graph).expect("serialization cannot fail")
    } else {
        serde_json::to_string_pretty(graph).expect("serialization cannot fail")
    }
}
