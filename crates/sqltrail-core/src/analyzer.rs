//! SQL lineage extraction engine.
//!
//! The engine is a pure, synchronous function of its input text: normalize,
//! segment into clauses, resolve aliases, decompose column expressions, then
//! derive the typed edge set. It allocates no shared state across
//! invocations, so concurrent calls are trivially safe, and re-running on
//! the same text yields an identical graph.

pub(crate) mod alias;
pub(crate) mod expression;
pub(crate) mod graph;
pub(crate) mod keywords;
pub(crate) mod normalize;
pub(crate) mod segment;


use crate::error::ExtractError;
use crate::types::{EdgeKind, LineageGraph};
use alias::AliasMap;
use expression::{ColumnRef, ExpressionColumns};
use graph::{alias_id, column_id, table_id, GraphBuilder};
use segment::{split_top_level, Clauses, StatementKind};
#[cfg(feature = "tracing")]
use tracing::trace;

/// Extract the lineage graph of a single SQL statement.
///
/// Never fails on malformed or partial SQL: missing clauses contribute
/// nothing and unparseable expressions yield zero column references. The
/// only error is [`ExtractError::InvalidInput`] for input that is blank or
/// empty once comments are stripped.
pub fn extract_lineage(sql: &str) -> Result<LineageGraph, ExtractError> {
    if sql.trim().is_empty() {
        return Err(ExtractError::InvalidInput("statement is empty".to_string()));
    }

    let text = normalize::normalize(sql);
    if text.is_empty() {
        return Err(ExtractError::InvalidInput(
            "statement contains only comments".to_string(),
        ));
    }

    let clauses = segment::segment(&text);
    let aliases = AliasMap::build(&clauses);

    #[cfg(feature = "tracing")]
    trace!(
        kind = clauses.kind.as_str(),
        tables = aliases.tables().len(),
        joins = clauses.joins.len(),
        "segmented statement"
    );

    Ok(Extraction::collect(&clauses, &aliases).derive())
}

/// Collected column observations of one statement, in reading order.
struct Extraction<'a> {
    clauses: &'a Clauses,
    aliases: &'a AliasMap,
    /// SET assignments and INSERT column lists, attributed to the target
    mutation_refs: Vec<ColumnRef>,
    /// SELECT projection items
    projections: Vec<ExpressionColumns>,
    /// References mentioned in JOIN ON conditions
    join_refs: Vec<ColumnRef>,
    /// Join-key equalities with their join label
    join_keys: Vec<(ColumnRef, ColumnRef, String)>,
    /// References mentioned in WHERE and HAVING
    constraint_refs: Vec<ColumnRef>,
    /// References mentioned in GROUP BY and ORDER BY
    grouping_refs: Vec<ColumnRef>,
    /// The table a mutation statement writes to
    mutation_table: Option<String>,
}

impl<'a> Extraction<'a> {
    fn collect(clauses: &'a Clauses, aliases: &'a AliasMap) -> Self {
        let mutation_table = match clauses.kind {
            StatementKind::Insert | StatementKind::Update => {
                aliases.first_table().map(|t| t.name.clone())
            }
            StatementKind::Delete => aliases.first_from_table().map(|t| t.name.clone()),
            StatementKind::Select => None,
        };

        let mut mutation_refs = Vec::new();
        for item in &clauses.insert_columns {
            for reference in expression::extract_refs(item, aliases) {
                mutation_refs.push(force_table(reference, &mutation_table));
            }
        }
        if let Some(set_clause) = &clauses.set_clause {
            for assignment in split_top_level(set_clause, ',') {
                // Only the assigned column matters; the right-hand side is
                // an arbitrary value expression.
                let Some(assigned) = split_top_level(&assignment, '=').into_iter().next() else {
                    continue;
                };
                for reference in expression::extract_refs(&assigned, aliases) {
                    mutation_refs.push(force_table(reference, &mutation_table));
                }
            }
        }

        let mut projections = Vec::new();
        if let Some(select) = &clauses.select {
            for item in split_top_level(select, ',') {
                projections.push(expression::extract_expression(&item, aliases));
            }
        }

        let mut join_refs = Vec::new();
        let mut join_keys = Vec::new();
        for join in &clauses.joins {
            if let Some(condition) = &join.on_condition {
                let (refs, equalities) = expression::join_condition_refs(condition, aliases);
                join_refs.extend(refs);
                join_keys.extend(
                    equalities
                        .into_iter()
                        .map(|(left, right)| (left, right, join.label.clone())),
                );
            }
        }

        let mut constraint_refs = Vec::new();
        if let Some(clause) = &clauses.where_clause {
            constraint_refs.extend(expression::condition_refs(clause, aliases));
        }
        if let Some(clause) = &clauses.having {
            constraint_refs.extend(expression::condition_refs(clause, aliases));
        }

        let mut grouping_refs = Vec::new();
        if let Some(clause) = &clauses.group_by {
            for item in split_top_level(clause, ',') {
                grouping_refs.extend(expression::extract_refs(&item, aliases));
            }
        }
        if let Some(clause) = &clauses.order_by {
            for item in split_top_level(clause, ',') {
                grouping_refs.extend(expression::extract_refs(
                    expression::strip_sort_direction(&item),
                    aliases,
                ));
            }
        }

        Self {
            clauses,
            aliases,
            mutation_refs,
            projections,
            join_refs,
            join_keys,
            constraint_refs,
            grouping_refs,
            mutation_table,
        }
    }

    /// Attribute an unqualified reference to the first table introduced in
    /// FROM (falling back to the mutation target when there is no FROM).
    /// This is a deliberate heuristic: a multi-table statement with
    /// unqualified columns is genuinely ambiguous without a catalog.
    fn attribute(&self, reference: &ColumnRef) -> ColumnRef {
        if reference.table.is_some() {
            return reference.clone();
        }
        let default = self
            .aliases
            .first_from_table()
            .or_else(|| self.aliases.first_table())
            .map(|t| t.name.clone());
        ColumnRef {
            table: default,
            column: reference.column.clone(),
        }
    }

    fn derive(self) -> LineageGraph {
        let mut builder = GraphBuilder::new();

        // Nodes: tables in statement order.
        for table in self.aliases.tables() {
            builder.add_table(table);
        }

        // Columns in first-seen order.
        let observed: Vec<ColumnRef> = self
            .mutation_refs
            .iter()
            .chain(self.projections.iter().flat_map(|p| &p.columns))
            .chain(self.join_refs.iter())
            .chain(self.constraint_refs.iter())
            .chain(self.grouping_refs.iter())
            .map(|reference| self.attribute(reference))
            .collect();
        for reference in &observed {
            builder.add_column(reference.table.as_deref(), &reference.column);
        }

        // Alias nodes, then the single query node.
        for projection in &self.projections {
            if let Some(alias) = &projection.alias {
                builder.add_alias(alias);
            }
        }
        let query = builder.add_query(self.clauses.kind);

        // Provides: every (table, column) pair observed anywhere.
        for reference in &observed {
            if let Some(table) = &reference.table {
                builder.add_edge(
                    &table_id(table),
                    &column_id(Some(table), &reference.column),
                    EdgeKind::Provides,
                );
            }
        }

        // FlowsTo: projected columns into the query, chaining through the
        // alias when the projection was aliased.
        for projection in &self.projections {
            let columns: Vec<ColumnRef> = projection
                .columns
                .iter()
                .map(|reference| self.attribute(reference))
                .collect();
            match &projection.alias {
                Some(alias) => {
                    let alias_node = alias_id(alias);
                    for column in &columns {
                        builder.add_edge(
                            &column_id(column.table.as_deref(), &column.column),
                            &alias_node,
                            EdgeKind::FlowsTo,
                        );
                    }
                    builder.add_edge(&alias_node, &query, EdgeKind::FlowsTo);
                }
                None => {
                    for column in &columns {
                        builder.add_edge(
                            &column_id(column.table.as_deref(), &column.column),
                            &query,
                            EdgeKind::FlowsTo,
                        );
                    }
                }
            }
        }

        // Sources: every FROM/JOIN table feeds the query.
        for table in self.aliases.sourced_tables() {
            builder.add_edge(&table_id(&table.name), &query, EdgeKind::Sources);
        }

        // Constrains: WHERE/HAVING columns.
        for reference in &self.constraint_refs {
            let reference = self.attribute(reference);
            builder.add_edge(
                &column_id(reference.table.as_deref(), &reference.column),
                &query,
                EdgeKind::Constrains,
            );
        }

        // Uses: symmetric join-key edges, tagged with the join label.
        for (left, right, label) in &self.join_keys {
            let left_id = column_id(left.table.as_deref(), &left.column);
            let right_id = column_id(right.table.as_deref(), &right.column);
            builder.add_labeled_edge(&left_id, &right_id, EdgeKind::Uses, label);
            builder.add_labeled_edge(&right_id, &left_id, EdgeKind::Uses, label);
        }

        // Modifies: the query writes its mutation target.
        if let Some(target) = &self.mutation_table {
            builder.add_edge(&query, &table_id(target), EdgeKind::Modifies);
        }

        builder.finish()
    }
}

fn force_table(mut reference: ColumnRef, table: &Option<String>) -> ColumnRef {
    if reference.table.is_none() {
        reference.table = table.clone();
    }
    reference
}
