//! Column-expression decomposition.
//!
//! Given any expression fragment (a SELECT projection item, a
//! WHERE/GROUP BY/ORDER BY/HAVING item, or a JOIN ON operand), produces the
//! set of column references it mentions. Qualified references resolve their
//! qualifier through the alias map; a single bare non-keyword identifier is
//! left unqualified for the deriver to attribute. Function names are never
//! treated as columns; the extractor recurses into their arguments instead.

use super::alias::AliasMap;
use super::keywords::is_reserved;
use super::segment::{split_top_level, split_top_level_on_words};
use regex::Regex;
use std::sync::OnceLock;

/// A single column reference found in an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnRef {
    /// Canonical table name when the reference was qualified; the deriver
    /// attributes unqualified references heuristically.
    pub table: Option<String>,
    pub column: String,
}

/// The decomposition of one projection item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ExpressionColumns {
    pub columns: Vec<ColumnRef>,
    /// The `AS` alias, when the projection was aliased.
    pub alias: Option<String>,
}

fn alias_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s+AS\s+([A-Za-z_][A-Za-z0-9_]*)\s*$").expect("Invalid regex pattern")
    })
}

fn qualified_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(?:\.(?:[A-Za-z_][A-Za-z0-9_]*|\*))+")
            .expect("Invalid regex pattern")
    })
}

fn bare_identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex pattern"))
}

fn sort_direction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+(ASC|DESC)\s*$").expect("Invalid regex pattern"))
}

/// Decompose one expression fragment, capturing a trailing `AS` alias.
pub(crate) fn extract_expression(expr: &str, aliases: &AliasMap) -> ExpressionColumns {
    let expr = expr.trim();
    let (rest, alias) = match alias_suffix_regex().captures(expr) {
        Some(caps) => {
            let alias = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .filter(|alias| !is_reserved(alias));
            (expr[..caps.get(0).unwrap().start()].trim(), alias)
        }
        None => (expr, None),
    };

    let mut columns = Vec::new();
    collect_refs(rest, aliases, &mut columns);

    ExpressionColumns { columns, alias }
}

/// Decompose a fragment with no alias position (conditions, group/order
/// items).
pub(crate) fn extract_refs(expr: &str, aliases: &AliasMap) -> Vec<ColumnRef> {
    let mut columns = Vec::new();
    collect_refs(expr, aliases, &mut columns);
    columns
}

/// Column references mentioned anywhere in a WHERE/HAVING clause.
pub(crate) fn condition_refs(clause: &str, aliases: &AliasMap) -> Vec<ColumnRef> {
    let mut refs = Vec::new();
    for condition in split_top_level_on_words(clause, &["AND", "OR"]) {
        for operand in comparison_operands(&condition) {
            collect_refs(&operand, aliases, &mut refs);
        }
    }
    refs
}

/// Column references and join-key equalities of one JOIN ON condition.
///
/// An equality between exactly two qualified columns is a join key; other
/// conditions still contribute their column references.
pub(crate) fn join_condition_refs(
    condition: &str,
    aliases: &AliasMap,
) -> (Vec<ColumnRef>, Vec<(ColumnRef, ColumnRef)>) {
    let mut refs = Vec::new();
    let mut equalities = Vec::new();

    for condition in split_top_level_on_words(condition, &["AND", "OR"]) {
        let plain_equality = !condition.contains("<=")
            && !condition.contains(">=")
            && !condition.contains("!=")
            && !condition.contains("<>");
        let sides = split_top_level(&condition, '=');

        if plain_equality && sides.len() == 2 {
            let mut left = Vec::new();
            let mut right = Vec::new();
            collect_refs(&sides[0], aliases, &mut left);
            collect_refs(&sides[1], aliases, &mut right);

            if left.len() == 1
                && right.len() == 1
                && left[0].table.is_some()
                && right[0].table.is_some()
            {
                equalities.push((left[0].clone(), right[0].clone()));
            }
            refs.append(&mut left);
            refs.append(&mut right);
        } else {
            for operand in comparison_operands(&condition) {
                collect_refs(&operand, aliases, &mut refs);
            }
        }
    }

    (refs, equalities)
}

/// Strip a trailing ASC/DESC from an ORDER BY item.
pub(crate) fn strip_sort_direction(item: &str) -> &str {
    match sort_direction_regex().find(item) {
        Some(found) => item[..found.start()].trim_end(),
        None => item,
    }
}

fn collect_refs(expr: &str, aliases: &AliasMap, out: &mut Vec<ColumnRef>) {
    let mut expr = expr.trim();
    if expr.is_empty() {
        return;
    }
    if let Some(stripped) = strip_leading_keyword(expr, "DISTINCT") {
        expr = stripped;
    }

    // A function call contributes only through its arguments.
    if let Some(body) = function_call_body(expr) {
        for argument in split_top_level(body, ',') {
            collect_refs(&argument, aliases, out);
        }
        return;
    }

    let masked = mask_string_literals(expr);
    let mut found_qualified = false;

    for found in qualified_regex().find_iter(&masked) {
        let segments: Vec<&str> = found.as_str().split('.').collect();
        let column = segments[segments.len() - 1];
        let qualifier = segments[segments.len() - 2];
        if column != "*" && is_reserved(column) {
            continue;
        }

        // An unknown qualifier stays as written; with no matching table
        // node its edges fall to the dangling-edge filter.
        let table = aliases
            .resolve(qualifier)
            .map(|reference| reference.name.clone())
            .unwrap_or_else(|| qualifier.to_string());

        out.push(ColumnRef {
            table: Some(table),
            column: column.to_string(),
        });
        found_qualified = true;
    }

    if found_qualified {
        return;
    }

    let bare = masked.trim();
    if bare == "*" {
        out.push(ColumnRef {
            table: None,
            column: "*".to_string(),
        });
    } else if bare_identifier_regex().is_match(bare) && !is_reserved(bare) {
        out.push(ColumnRef {
            table: None,
            column: bare.to_string(),
        });
    }
}

fn comparison_operands(condition: &str) -> Vec<String> {
    let mut operands =
        split_top_level_on_words(condition, &["BETWEEN", "LIKE", "NOT", "IN", "IS"]);
    for delimiter in ['=', '<', '>', '!'] {
        operands = operands
            .iter()
            .flat_map(|operand| split_top_level(operand, delimiter))
            .collect();
    }
    operands
}

fn strip_leading_keyword<'a>(expr: &'a str, keyword: &str) -> Option<&'a str> {
    let bytes = expr.as_bytes();
    if bytes.len() > keyword.len()
        && bytes[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
        && bytes[keyword.len()] == b' '
    {
        Some(expr[keyword.len()..].trim_start())
    } else {
        None
    }
}

/// If `expr` is a single function call `name(...)`, return the content of
/// the outermost parentheses.
fn function_call_body(expr: &str) -> Option<&str> {
    let bytes = expr.as_bytes();
    let mut name_end = 0;
    while name_end < bytes.len()
        && (bytes[name_end].is_ascii_alphanumeric() || bytes[name_end] == b'_')
    {
        name_end += 1;
    }
    if name_end == 0 {
        return None;
    }

    let mut open = name_end;
    while open < bytes.len() && bytes[open] == b' ' {
        open += 1;
    }
    if open >= bytes.len() || bytes[open] != b'(' {
        return None;
    }

    // The parenthesis opened after the name must close at the very end,
    // otherwise this is a larger expression like `f(a) + g(b)`.
    let mut depth = 0usize;
    for (index, &byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return if index == bytes.len() - 1 {
                        Some(&expr[open + 1..index])
                    } else {
                        None
                    };
                }
            }
            _ => {}
        }
    }
    None
}

/// Blank out the contents of single-quoted literals so identifier scanning
/// never matches inside them. Quote characters are preserved to keep byte
/// offsets stable.
fn mask_string_literals(expr: &str) -> String {
    let mut masked: Vec<u8> = expr.as_bytes().to_vec();
    let mut in_string = false;
    let mut i = 0;
    while i < masked.len() {
        if in_string {
            if masked[i] == b'\'' {
                if masked.get(i + 1) == Some(&b'\'') {
                    masked[i] = b' ';
                    masked[i + 1] = b' ';
                    i += 2;
                    continue;
                }
                in_string = false;
            } else {
                masked[i] = b' ';
            }
        } else if masked[i] == b'\'' {
            in_string = true;
        }
        i += 1;
    }
    String::from_utf8_lossy(&masked).into_owned()
}
