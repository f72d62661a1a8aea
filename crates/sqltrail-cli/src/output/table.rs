//! Human-readable table output formatting.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use sqltrail_core::{EdgeKind, LineageGraph, NodeKind};
use std::fmt::Write;

/// Format the lineage graph as human-readable text with optional colors.
pub fn format_table(graph: &LineageGraph, use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    write_header(&mut out, colored);
    write_summary(&mut out, graph, colored);
    write_nodes(&mut out, graph);
    write_edges(&mut out, graph);

    out
}

fn write_header(out: &mut String, colored: bool) {
    let title = "SQLTrail Lineage";
    let line = "═".repeat(50);

    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
        writeln!(out, "{}", line.dimmed()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
        writeln!(out, "{line}").unwrap();
    }
}

fn write_summary(out: &mut String, graph: &LineageGraph, colored: bool) {
    let tables = graph.nodes_of_kind(NodeKind::Table).count();
    let columns = graph.nodes_of_kind(NodeKind::Column).count();

    let stats = format!(
        "Summary: {} tables | {} columns | {} edges",
        tables,
        columns,
        graph.edges.len()
    );

    if colored {
        writeln!(out, "{}", stats.cyan()).unwrap();
    } else {
        writeln!(out, "{stats}").unwrap();
    }
    writeln!(out).unwrap();
}

fn write_nodes(out: &mut String, graph: &LineageGraph) {
    let tables: Vec<_> = graph.nodes_of_kind(NodeKind::Table).collect();
    if !tables.is_empty() {
        writeln!(out, "Tables:").unwrap();
        for table in tables {
            match &table.schema {
                Some(schema) => writeln!(out, "  {}.{}", schema, table.name).unwrap(),
                None => writeln!(out, "  {}", table.name).unwrap(),
            }
        }
        writeln!(out).unwrap();
    }

    let columns: Vec<_> = graph.nodes_of_kind(NodeKind::Column).collect();
    if !columns.is_empty() {
        writeln!(out, "Columns:").unwrap();
        for column in columns {
            let owner = column.source_table.as_deref().unwrap_or("?");
            if column.is_alias {
                writeln!(out, "  {} (alias)", column.name).unwrap();
            } else {
                writeln!(out, "  {}.{}", owner, column.name).unwrap();
            }
        }
        writeln!(out).unwrap();
    }
}

fn write_edges(out: &mut String, graph: &LineageGraph) {
    if graph.edges.is_empty() {
        return;
    }

    writeln!(out, "Relationships:").unwrap();
    for edge in &graph.edges {
        let source = display_name(graph, &edge.source_id);
        let target = display_name(graph, &edge.target_id);
        match &edge.join_label {
            Some(label) => writeln!(
                out,
                "  {source} --{}--> {target} ({label})",
                kind_label(edge.kind)
            )
            .unwrap(),
            None => writeln!(out, "  {source} --{}--> {target}", kind_label(edge.kind)).unwrap(),
        }
    }
}

fn display_name<'a>(graph: &'a LineageGraph, id: &'a str) -> &'a str {
    graph.node(id).map(|n| n.name.as_str()).unwrap_or(id)
}

fn kind_label(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Provides => "provides",
        EdgeKind::FlowsTo => "flows_to",
        EdgeKind::Sources => "sources",
        EdgeKind::Constrains => "constrains",
        EdgeKind::Modifies => "modifies",
        EdgeKind::Uses => "uses",
    }
}
