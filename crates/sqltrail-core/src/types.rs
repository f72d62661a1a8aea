//! Graph types for the SQL lineage wire contract.
//!
//! The [`LineageGraph`] is the sole artifact the engine produces. Its JSON
//! shape is consumed by the rendering layer and the JSON-view collaborator,
//! so the serde renames here (`type`, `table`, `isAlias`, `source`,
//! `target`, `label`) are part of the public contract and must not change.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The kind of a node in the lineage graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A database table
    Table,
    /// A column (including projection aliases and the `*` sentinel)
    Column,
    /// The synthetic node representing the statement itself
    Query,
}

/// The kind of an edge in the lineage graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// table → column: the table provides the column
    Provides,
    /// column → query, or column → alias → query for aliased projections
    FlowsTo,
    /// table → query: the table feeds the statement (FROM/JOIN)
    Sources,
    /// column → query: the column constrains the result (WHERE/HAVING)
    Constrains,
    /// query → table: the statement mutates the table
    Modifies,
    /// column ↔ column: join-key relationship, emitted in both directions
    Uses,
}

/// A node in the lineage graph.
///
/// `id` is unique within a graph and `kind` is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    /// Deterministic content-derived identifier
    pub id: String,

    /// Display name (case-preserved from the statement text)
    pub name: String,

    /// Node kind
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Schema qualifier for table nodes. Grouping only, never identity:
    /// the canonical table name is already schema-stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Canonical table a column belongs to, when the reference was
    /// qualified or could be attributed heuristically.
    #[serde(rename = "table", default, skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,

    /// True for projection-alias nodes introduced by `AS`.
    #[serde(rename = "isAlias", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_alias: bool,
}

impl Node {
    /// Create a table node.
    pub fn table(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Table,
            schema: None,
            source_table: None,
            is_alias: false,
        }
    }

    /// Create a column node.
    pub fn column(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Column,
            schema: None,
            source_table: None,
            is_alias: false,
        }
    }

    /// Create the synthetic query node.
    pub fn query(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Query,
            schema: None,
            source_table: None,
            is_alias: false,
        }
    }

    /// Set the schema qualifier.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set the owning table of a column node.
    pub fn with_source_table(mut self, table: impl Into<String>) -> Self {
        self.source_table = Some(table.into());
        self
    }

    /// Mark a column node as a projection alias.
    pub fn as_alias(mut self) -> Self {
        self.is_alias = true;
        self
    }
}

/// A directed edge between two nodes in the lineage graph.
///
/// Both endpoints must reference existing node ids in the same graph;
/// edges that do not are dropped at assembly time, never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Edge {
    /// Source node id
    #[serde(rename = "source")]
    pub source_id: String,

    /// Target node id
    #[serde(rename = "target")]
    pub target_id: String,

    /// Edge kind
    #[serde(rename = "type")]
    pub kind: EdgeKind,

    /// Join label for [`EdgeKind::Uses`] edges (e.g. `LEFT JOIN`).
    #[serde(rename = "label", default, skip_serializing_if = "Option::is_none")]
    pub join_label: Option<String>,
}

impl Edge {
    /// Create a new edge.
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
            join_label: None,
        }
    }

    /// Set the join label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.join_label = Some(label.into());
        self
    }
}

/// A table reference resolved from a FROM/JOIN target or a mutation target.
///
/// Built fresh per extraction call and discarded after relationship
/// derivation; never part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReference {
    /// Schema-stripped table name the alias ultimately resolves to
    pub name: String,

    /// Alias introduced in the statement; defaults to the table name
    pub alias: String,

    /// Schema qualifier, when the reference was written as `schema.table`
    pub schema: Option<String>,
}

impl TableReference {
    /// Create a reference without an explicit alias.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            schema: None,
        }
    }

    /// Set an explicit alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Set the schema qualifier.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// The lineage graph extracted from a single SQL statement.
///
/// Owned exclusively by the caller once returned; the engine holds no
/// residual state between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LineageGraph {
    /// All nodes, in deterministic creation order: tables, then columns,
    /// then aliases, then the query node.
    pub nodes: Vec<Node>,

    /// All edges, in rule-precedence order.
    pub edges: Vec<Edge>,
}

impl LineageGraph {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Iterate nodes of one kind.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// True if the graph contains an edge with the given endpoints and kind.
    pub fn has_edge(&self, source_id: &str, target_id: &str, kind: EdgeKind) -> bool {
        self.edges
            .iter()
            .any(|e| e.source_id == source_id && e.target_id == target_id && e.kind == kind)
    }

    /// Serialize to the wire JSON, pretty-printed.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).expect("serialization cannot fail")
    }
}
