//! Graph assembly.
//!
//! Accumulates nodes and edges during relationship derivation. Node ids are
//! deterministic and content-derived (lowercase), which makes the
//! case-insensitive `(table, column)` dedup fall out of id identity. Edges
//! deduplicate by `(source, target, kind)`; at `finish` any edge whose
//! endpoint is not a known node id is silently dropped.

use super::segment::StatementKind;
use crate::types::{Edge, EdgeKind, LineageGraph, Node, TableReference};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
    nodes: Vec<Node>,
    node_ids: HashSet<String>,
    edges: Vec<Edge>,
    edge_keys: HashSet<(String, String, EdgeKind)>,
}

impl GraphBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a table node, returning its id. A table already present (for
    /// example through a self-join) keeps its first registration.
    pub(crate) fn add_table(&mut self, reference: &TableReference) -> String {
        let id = table_id(&reference.name);
        if self.node_ids.insert(id.clone()) {
            let mut node = Node::table(id.clone(), reference.name.clone());
            if let Some(schema) = &reference.schema {
                node = node.with_schema(schema.clone());
            }
            self.nodes.push(node);
        }
        id
    }

    /// Add a column node, returning its id.
    pub(crate) fn add_column(&mut self, table: Option<&str>, name: &str) -> String {
        let id = column_id(table, name);
        if self.node_ids.insert(id.clone()) {
            let mut node = Node::column(id.clone(), name);
            if let Some(table) = table {
                node = node.with_source_table(table);
            }
            self.nodes.push(node);
        }
        id
    }

    /// Add a projection-alias node, returning its id.
    pub(crate) fn add_alias(&mut self, name: &str) -> String {
        let id = alias_id(name);
        if self.node_ids.insert(id.clone()) {
            self.nodes.push(Node::column(id.clone(), name).as_alias());
        }
        id
    }

    /// Add the synthetic query node, returning its id.
    pub(crate) fn add_query(&mut self, kind: StatementKind) -> String {
        let id = format!("query_{}", kind.as_str().to_lowercase());
        if self.node_ids.insert(id.clone()) {
            self.nodes
                .push(Node::query(id.clone(), format!("{} query", kind.as_str())));
        }
        id
    }

    pub(crate) fn add_edge(&mut self, source_id: &str, target_id: &str, kind: EdgeKind) {
        self.push_edge(Edge::new(source_id, target_id, kind));
    }

    pub(crate) fn add_labeled_edge(
        &mut self,
        source_id: &str,
        target_id: &str,
        kind: EdgeKind,
        label: &str,
    ) {
        self.push_edge(Edge::new(source_id, target_id, kind).with_label(label));
    }

    fn push_edge(&mut self, edge: Edge) {
        let key = (edge.source_id.clone(), edge.target_id.clone(), edge.kind);
        if self.edge_keys.insert(key) {
            self.edges.push(edge);
        }
    }

    /// Assemble the final graph, dropping dangling edges.
    pub(crate) fn finish(self) -> LineageGraph {
        let node_ids = self.node_ids;
        let edges = self
            .edges
            .into_iter()
            .filter(|edge| node_ids.contains(&edge.source_id) && node_ids.contains(&edge.target_id))
            .collect();

        LineageGraph {
            nodes: self.nodes,
            edges,
        }
    }
}

pub(crate) fn table_id(name: &str) -> String {
    format!("table_{}", name.to_lowercase())
}

pub(crate) fn column_id(table: Option<&str>, name: &str) -> String {
    format!(
        "column_{}_{}",
        table.map(str::to_lowercase).unwrap_or_else(|| "unknown".to_string()),
        name.to_lowercase()
    )
}

pub(crate) fn alias_id(name: &str) -> String {
    format!("alias_{}", name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    #[test]
    fn table_dedup_is_case_insensitive() {
        let mut builder = GraphBuilder::new();
        let first = builder.add_table(&TableReference::new("Users"));
        let second = builder.add_table(&TableReference::new("users"));

        assert_eq!(first, second);
        let graph = builder.finish();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].name, "Users");
    }

    #[test]
    fn column_dedup_uses_table_and_name() {
        let mut builder = GraphBuilder::new();
        builder.add_column(Some("users"), "id");
        builder.add_column(Some("users"), "ID");
        builder.add_column(Some("orders"), "id");

        let graph = builder.finish();
        assert_eq!(graph.nodes.len(), 2);
    }

    #[test]
    fn unattributed_columns_group_under_unknown() {
        let mut builder = GraphBuilder::new();
        let id = builder.add_column(None, "loose");
        assert_eq!(id, "column_unknown_loose");
    }

    #[test]
    fn duplicate_edges_are_not_emitted() {
        let mut builder = GraphBuilder::new();
        builder.add_table(&TableReference::new("users"));
        builder.add_column(Some("users"), "id");
        builder.add_edge("table_users", "column_users_id", EdgeKind::Provides);
        builder.add_edge("table_users", "column_users_id", EdgeKind::Provides);

        let graph = builder.finish();
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn same_endpoints_different_kind_both_survive() {
        let mut builder = GraphBuilder::new();
        builder.add_column(Some("t"), "a");
        builder.add_column(Some("t"), "b");
        builder.add_labeled_edge("column_t_a", "column_t_b", EdgeKind::Uses, "JOIN");
        builder.add_edge("column_t_a", "column_t_b", EdgeKind::FlowsTo);

        let graph = builder.finish();
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn dangling_edges_are_dropped_at_finish() {
        let mut builder = GraphBuilder::new();
        builder.add_table(&TableReference::new("users"));
        builder.add_edge("table_users", "column_ghost_x", EdgeKind::Provides);
        builder.add_edge("table_ghost", "table_users", EdgeKind::Uses);

        let graph = builder.finish();
        assert!(graph.edges.is_empty());
        assert_eq!(graph.nodes.len(), 1);
    }

    #[test]
    fn query_node_is_kind_named() {
        let mut builder = GraphBuilder::new();
        let id = builder.add_query(StatementKind::Update);
        assert_eq!(id, "query_update");

        let graph = builder.finish();
        let node = graph.node("query_update").unwrap();
        assert_eq!(node.kind, NodeKind::Query);
        assert_eq!(node.name, "UPDATE query");
    }
}
