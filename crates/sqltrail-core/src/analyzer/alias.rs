//! Alias resolution.
//!
//! Scans the mutation target, the FROM clause, and every JOIN target for
//! `[schema.]table [[AS] alias]` references and builds a case-insensitive
//! mapping from alias to canonical table name. The canonical name is the
//! last dot-segment; a schema qualifier is retained for grouping only. A
//! self-join introduces one table identity reachable through every alias.

use super::keywords::is_reserved;
use super::segment::{split_top_level, Clauses};
use crate::types::TableReference;
use std::collections::HashMap;

/// Where a table reference was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefOrigin {
    /// UPDATE target or INSERT INTO target
    Mutation,
    /// FROM clause (including DELETE FROM targets)
    From,
    /// JOIN target
    Join,
}

/// The resolved table references of one statement.
#[derive(Debug, Default)]
pub(crate) struct AliasMap {
    /// References in introduction order (mutation target, FROM, JOINs)
    references: Vec<TableReference>,
    origins: Vec<RefOrigin>,
    /// Lowercased alias -> index into `references`
    by_alias: HashMap<String, usize>,
}

impl AliasMap {
    /// Build the alias map from segmented clauses.
    pub(crate) fn build(clauses: &Clauses) -> Self {
        let mut map = AliasMap::default();

        if let Some(target) = &clauses.mutation_target {
            map.add_reference(target, RefOrigin::Mutation);
        }
        if let Some(from) = &clauses.from {
            for item in split_top_level(from, ',') {
                map.add_reference(&item, RefOrigin::From);
            }
        }
        for join in &clauses.joins {
            map.add_reference(&join.target, RefOrigin::Join);
        }

        map
    }

    /// Resolve an alias or bare table name to its reference.
    pub(crate) fn resolve(&self, alias: &str) -> Option<&TableReference> {
        self.by_alias
            .get(&alias.to_ascii_lowercase())
            .map(|index| &self.references[*index])
    }

    /// The first table introduced by the statement.
    pub(crate) fn first_table(&self) -> Option<&TableReference> {
        self.references.first()
    }

    /// The first table introduced in FROM. Unqualified column references
    /// are attributed to it; a statement without FROM falls back to
    /// [`Self::first_table`].
    pub(crate) fn first_from_table(&self) -> Option<&TableReference> {
        self.references
            .iter()
            .zip(&self.origins)
            .find(|(_, origin)| **origin == RefOrigin::From)
            .map(|(reference, _)| reference)
    }

    /// Distinct tables in introduction order, one entry per canonical name.
    pub(crate) fn tables(&self) -> Vec<&TableReference> {
        self.distinct(|_| true)
    }

    /// Distinct tables introduced through FROM or JOIN.
    pub(crate) fn sourced_tables(&self) -> Vec<&TableReference> {
        self.distinct(|origin| origin != RefOrigin::Mutation)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    fn distinct(&self, keep: impl Fn(RefOrigin) -> bool) -> Vec<&TableReference> {
        let mut seen: Vec<&TableReference> = Vec::new();
        for (reference, origin) in self.references.iter().zip(&self.origins) {
            if !keep(*origin) {
                continue;
            }
            if !seen
                .iter()
                .any(|r| r.name.eq_ignore_ascii_case(&reference.name))
            {
                seen.push(reference);
            }
        }
        seen
    }

    fn add_reference(&mut self, target: &str, origin: RefOrigin) {
        // A parenthesized target is a subquery, which the bounded extractor
        // does not descend into.
        let target = target.trim();
        if target.is_empty() || target.starts_with('(') {
            return;
        }

        let mut words = target.split(' ').filter(|w| !w.is_empty());
        let qualified = match words.next() {
            Some(word) if !is_reserved(word) => word,
            _ => return,
        };

        let mut alias = None;
        for word in words {
            if word.eq_ignore_ascii_case("AS") {
                continue;
            }
            if is_reserved(word) {
                break;
            }
            alias = Some(word);
            break;
        }

        let mut segments: Vec<&str> = qualified.split('.').filter(|s| !s.is_empty()).collect();
        let name = match segments.pop() {
            Some(name) => name,
            None => return,
        };
        let schema = segments.pop();

        let mut reference = TableReference::new(name);
        if let Some(schema) = schema {
            reference = reference.with_schema(schema);
        }
        if let Some(alias) = alias {
            reference = reference.with_alias(alias);
        }

        let index = self.references.len();
        self.references.push(reference.clone());
        self.origins.push(origin);
        self.by_alias
            .insert(reference.alias.to_ascii_lowercase(), index);
        // The bare table name always resolves too, unless an earlier
        // reference already claimed it as an alias.
        self.by_alias
            .entry(reference.name.to_ascii_lowercase())
            .or_insert(index);
    }
}
