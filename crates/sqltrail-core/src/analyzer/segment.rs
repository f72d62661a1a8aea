//! Clause segmentation.
//!
//! Locates top-level clause boundaries in normalized statement text. The
//! scanner tracks parenthesis depth and single-quoted string literals, so a
//! keyword inside `(...)` or `'...'` never registers as a boundary and a
//! comma inside a function call never splits an expression list. Clause
//! matching is case-insensitive; an absent clause yields an empty result,
//! never an error.

/// The statement kind, detected from the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum StatementKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

/// One JOIN clause, paired with its own ON sub-clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JoinClause {
    /// Uppercased join keyword as written, e.g. `LEFT JOIN`
    pub label: String,
    /// The joined table reference text, e.g. `orders o`
    pub target: String,
    /// The ON condition, terminated by the next clause keyword
    pub on_condition: Option<String>,
}

/// The segmented clauses of a single statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Clauses {
    pub kind: StatementKind,
    pub select: Option<String>,
    pub from: Option<String>,
    pub joins: Vec<JoinClause>,
    pub where_clause: Option<String>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
    pub having: Option<String>,
    /// UPDATE ... SET assignment list
    pub set_clause: Option<String>,
    /// UPDATE target or INSERT INTO target table reference text
    pub mutation_target: Option<String>,
    /// Explicit column list of an `INSERT INTO t (a, b, ...)`
    pub insert_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClauseTag {
    Select,
    From,
    Join(String),
    On,
    Where,
    GroupBy,
    OrderBy,
    Having,
    Limit,
    Update,
    Set,
    InsertInto,
    Values,
}

#[derive(Debug)]
struct Marker {
    start: usize,
    end: usize,
    tag: ClauseTag,
}

/// Join phrases, longest first so `LEFT OUTER JOIN` wins over `JOIN`.
const JOIN_PHRASES: &[&str] = &[
    "LEFT OUTER JOIN",
    "RIGHT OUTER JOIN",
    "FULL OUTER JOIN",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "JOIN",
];

/// Segment normalized statement text into its clauses.
pub(crate) fn segment(text: &str) -> Clauses {
    let kind = detect_kind(text);
    let markers = collect_markers(text, kind);

    let mut clauses = Clauses {
        kind,
        ..Clauses::default()
    };

    for (index, marker) in markers.iter().enumerate() {
        let end = markers
            .get(index + 1)
            .map(|next| next.start)
            .unwrap_or(text.len());
        let content = text[marker.end..end].trim();
        if content.is_empty() {
            continue;
        }

        match &marker.tag {
            ClauseTag::Select => assign_first(&mut clauses.select, content),
            ClauseTag::From => assign_first(&mut clauses.from, content),
            ClauseTag::Join(label) => clauses.joins.push(JoinClause {
                label: label.clone(),
                target: content.to_string(),
                on_condition: None,
            }),
            ClauseTag::On => {
                // A stray ON without a preceding JOIN is ignored.
                if let Some(join) = clauses.joins.last_mut() {
                    if join.on_condition.is_none() {
                        join.on_condition = Some(content.to_string());
                    }
                }
            }
            ClauseTag::Where => assign_first(&mut clauses.where_clause, content),
            ClauseTag::GroupBy => assign_first(&mut clauses.group_by, content),
            ClauseTag::OrderBy => assign_first(&mut clauses.order_by, content),
            ClauseTag::Having => assign_first(&mut clauses.having, content),
            ClauseTag::Update => assign_first(&mut clauses.mutation_target, content),
            ClauseTag::Set => assign_first(&mut clauses.set_clause, content),
            ClauseTag::InsertInto => {
                let (target, columns) = split_insert_target(content);
                if !target.is_empty() {
                    assign_first(&mut clauses.mutation_target, &target);
                }
                clauses.insert_columns = columns;
            }
            ClauseTag::Limit | ClauseTag::Values => {}
        }
    }

    clauses
}

fn assign_first(slot: &mut Option<String>, content: &str) {
    if slot.is_none() {
        *slot = Some(content.to_string());
    }
}

fn detect_kind(text: &str) -> StatementKind {
    let first_word = text.split(' ').next().unwrap_or("");
    if first_word.eq_ignore_ascii_case("INSERT") {
        StatementKind::Insert
    } else if first_word.eq_ignore_ascii_case("UPDATE") {
        StatementKind::Update
    } else if first_word.eq_ignore_ascii_case("DELETE") {
        StatementKind::Delete
    } else {
        StatementKind::Select
    }
}

fn collect_markers(text: &str, kind: StatementKind) -> Vec<Marker> {
    let mask = top_level_mask(text);
    let bytes = text.as_bytes();
    let mut markers = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if mask[i] && is_word_boundary_before(bytes, i) {
            if let Some((tag, len)) = match_clause_at(text, i, kind) {
                markers.push(Marker {
                    start: i,
                    end: i + len,
                    tag,
                });
                i += len;
                continue;
            }
        }
        i += 1;
    }

    markers
}

fn match_clause_at(text: &str, at: usize, kind: StatementKind) -> Option<(ClauseTag, usize)> {
    for phrase in JOIN_PHRASES {
        if phrase_matches_at(text, at, phrase) {
            return Some((ClauseTag::Join((*phrase).to_string()), phrase.len()));
        }
    }

    let fixed: &[(&str, ClauseTag)] = &[
        ("GROUP BY", ClauseTag::GroupBy),
        ("ORDER BY", ClauseTag::OrderBy),
        ("SELECT", ClauseTag::Select),
        ("FROM", ClauseTag::From),
        ("WHERE", ClauseTag::Where),
        ("HAVING", ClauseTag::Having),
        ("LIMIT", ClauseTag::Limit),
        ("ON", ClauseTag::On),
    ];
    for (phrase, tag) in fixed {
        if phrase_matches_at(text, at, phrase) {
            return Some((tag.clone(), phrase.len()));
        }
    }

    // Mutation clauses only apply to their statement kind, so a column
    // named `set` or `values` in a SELECT cannot truncate a clause.
    if kind == StatementKind::Update {
        if at == 0 && phrase_matches_at(text, at, "UPDATE") {
            return Some((ClauseTag::Update, "UPDATE".len()));
        }
        if phrase_matches_at(text, at, "SET") {
            return Some((ClauseTag::Set, "SET".len()));
        }
    }
    if kind == StatementKind::Insert {
        if at == 0 && phrase_matches_at(text, at, "INSERT INTO") {
            return Some((ClauseTag::InsertInto, "INSERT INTO".len()));
        }
        if phrase_matches_at(text, at, "VALUES") {
            return Some((ClauseTag::Values, "VALUES".len()));
        }
    }

    None
}

/// Split `t (a, b)` into the target reference text and its column list.
fn split_insert_target(content: &str) -> (String, Vec<String>) {
    match content.find('(') {
        Some(open) => {
            let target = content[..open].trim().to_string();
            let rest = &content[open + 1..];
            let inner = match rest.find(')') {
                Some(close) => &rest[..close],
                None => rest,
            };
            (target, split_top_level(inner, ','))
        }
        None => (content.trim().to_string(), Vec::new()),
    }
}

/// Split on a delimiter character, honoring parenthesis depth and string
/// literals: a delimiter only separates at depth zero.
pub(crate) fn split_top_level(text: &str, delimiter: char) -> Vec<String> {
    let mask = top_level_mask(text);
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if byte == delimiter as u8 && mask[i] {
            parts.push(text[start..i].trim().to_string());
            start = i + 1;
        }
    }
    parts.push(text[start..].trim().to_string());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Split on any of the given keywords at depth zero (word-boundary,
/// case-insensitive). Used to break conditions on AND/OR.
pub(crate) fn split_top_level_on_words(text: &str, words: &[&str]) -> Vec<String> {
    let mask = top_level_mask(text);
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if mask[i] && is_word_boundary_before(bytes, i) {
            if let Some(word) = words.iter().find(|word| phrase_matches_at(text, i, word)) {
                parts.push(text[start..i].trim().to_string());
                i += word.len();
                start = i;
                continue;
            }
        }
        i += 1;
    }
    parts.push(text[start..].trim().to_string());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Byte positions at parenthesis depth zero, outside string literals.
fn top_level_mask(text: &str) -> Vec<bool> {
    let bytes = text.as_bytes();
    let mut mask = vec![false; bytes.len()];
    let mut depth: u32 = 0;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if in_string {
            if byte == b'\'' {
                // '' escapes a quote inside the literal
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                in_string = false;
            }
        } else {
            match byte {
                b'\'' => in_string = true,
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                _ => {
                    if depth == 0 {
                        mask[i] = true;
                    }
                }
            }
        }
        i += 1;
    }

    mask
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_word_boundary_before(bytes: &[u8], at: usize) -> bool {
    at == 0 || !is_ident_byte(bytes[at - 1])
}

/// Case-insensitive phrase match at a byte offset, requiring a word
/// boundary after the phrase.
fn phrase_matches_at(text: &str, at: usize, phrase: &str) -> bool {
    let bytes = text.as_bytes();
    let end = at + phrase.len();
    if end > bytes.len() {
        return false;
    }
    if !bytes[at..end].eq_ignore_ascii_case(phrase.as_bytes()) {
        return false;
    }
    end == bytes.len() || !is_ident_byte(bytes[end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_a_full_select() {
        let clauses = segment(
            "SELECT u.id, o.total FROM users u LEFT JOIN orders o ON u.id = o.user_id \
             WHERE o.total > 100 GROUP BY u.id HAVING COUNT(*) > 1 ORDER BY u.id LIMIT 10",
        );

        assert_eq!(clauses.kind, StatementKind::Select);
        assert_eq!(clauses.select.as_deref(), Some("u.id, o.total"));
        assert_eq!(clauses.from.as_deref(), Some("users u"));
        assert_eq!(clauses.joins.len(), 1);
        assert_eq!(clauses.joins[0].label, "LEFT JOIN");
        assert_eq!(clauses.joins[0].target, "orders o");
        assert_eq!(clauses.joins[0].on_condition.as_deref(), Some("u.id = o.user_id"));
        assert_eq!(clauses.where_clause.as_deref(), Some("o.total > 100"));
        assert_eq!(clauses.group_by.as_deref(), Some("u.id"));
        assert_eq!(clauses.having.as_deref(), Some("COUNT(*) > 1"));
        assert_eq!(clauses.order_by.as_deref(), Some("u.id"));
    }

    #[test]
    fn missing_clauses_stay_empty() {
        let clauses = segment("SELECT id FROM users");
        assert!(clauses.where_clause.is_none());
        assert!(clauses.joins.is_empty());
        assert!(clauses.group_by.is_none());
        assert!(clauses.order_by.is_none());
        assert!(clauses.having.is_none());
    }

    #[test]
    fn multiple_joins_each_keep_their_on_condition() {
        let clauses = segment(
            "SELECT a.x FROM a JOIN b ON a.id = b.a_id INNER JOIN c ON b.id = c.b_id WHERE a.x = 1",
        );

        assert_eq!(clauses.joins.len(), 2);
        assert_eq!(clauses.joins[0].label, "JOIN");
        assert_eq!(clauses.joins[0].on_condition.as_deref(), Some("a.id = b.a_id"));
        assert_eq!(clauses.joins[1].label, "INNER JOIN");
        assert_eq!(clauses.joins[1].on_condition.as_deref(), Some("b.id = c.b_id"));
        assert_eq!(clauses.where_clause.as_deref(), Some("a.x = 1"));
    }

    #[test]
    fn keywords_inside_parentheses_are_not_boundaries() {
        let clauses = segment("SELECT id FROM users WHERE id IN (SELECT user_id FROM banned)");
        assert_eq!(clauses.from.as_deref(), Some("users"));
        assert_eq!(
            clauses.where_clause.as_deref(),
            Some("id IN (SELECT user_id FROM banned)")
        );
    }

    #[test]
    fn keywords_inside_string_literals_are_not_boundaries() {
        let clauses = segment("SELECT id FROM logs WHERE message = 'select from where'");
        assert_eq!(clauses.from.as_deref(), Some("logs"));
        assert_eq!(
            clauses.where_clause.as_deref(),
            Some("message = 'select from where'")
        );
    }

    #[test]
    fn clause_matching_is_case_insensitive() {
        let clauses = segment("select id from users where id = 1 order by id");
        assert_eq!(clauses.select.as_deref(), Some("id"));
        assert_eq!(clauses.from.as_deref(), Some("users"));
        assert_eq!(clauses.order_by.as_deref(), Some("id"));
    }

    #[test]
    fn segments_update_statements() {
        let clauses = segment("UPDATE users SET name = 'x', active = 1 WHERE id = 5");
        assert_eq!(clauses.kind, StatementKind::Update);
        assert_eq!(clauses.mutation_target.as_deref(), Some("users"));
        assert_eq!(clauses.set_clause.as_deref(), Some("name = 'x', active = 1"));
        assert_eq!(clauses.where_clause.as_deref(), Some("id = 5"));
    }

    #[test]
    fn segments_insert_with_column_list() {
        let clauses = segment("INSERT INTO audit_log (user_id, action) VALUES (1, 'login')");
        assert_eq!(clauses.kind, StatementKind::Insert);
        assert_eq!(clauses.mutation_target.as_deref(), Some("audit_log"));
        assert_eq!(clauses.insert_columns, vec!["user_id", "action"]);
    }

    #[test]
    fn segments_insert_from_select() {
        let clauses = segment("INSERT INTO summary SELECT user_id, COUNT(*) FROM events GROUP BY user_id");
        assert_eq!(clauses.kind, StatementKind::Insert);
        assert_eq!(clauses.mutation_target.as_deref(), Some("summary"));
        assert_eq!(clauses.select.as_deref(), Some("user_id, COUNT(*)"));
        assert_eq!(clauses.from.as_deref(), Some("events"));
        assert_eq!(clauses.group_by.as_deref(), Some("user_id"));
    }

    #[test]
    fn segments_delete_through_from() {
        let clauses = segment("DELETE FROM sessions WHERE expired = 1");
        assert_eq!(clauses.kind, StatementKind::Delete);
        assert_eq!(clauses.from.as_deref(), Some("sessions"));
        assert_eq!(clauses.where_clause.as_deref(), Some("expired = 1"));
    }

    #[test]
    fn a_select_column_named_set_is_not_a_clause() {
        let clauses = segment("SELECT set FROM configurations");
        assert_eq!(clauses.select.as_deref(), Some("set"));
        assert_eq!(clauses.from.as_deref(), Some("configurations"));
        assert!(clauses.set_clause.is_none());
    }

    #[test]
    fn split_top_level_ignores_commas_inside_calls() {
        assert_eq!(
            split_top_level("id, COALESCE(a, b), name", ','),
            vec!["id", "COALESCE(a, b)", "name"]
        );
    }

    #[test]
    fn split_top_level_ignores_commas_inside_literals() {
        assert_eq!(
            split_top_level("label, 'a, b', other", ','),
            vec!["label", "'a, b'", "other"]
        );
    }

    #[test]
    fn split_on_words_breaks_conditions() {
        assert_eq!(
            split_top_level_on_words("a.x = 1 AND b.y = 2 or c.z = 3", &["AND", "OR"]),
            vec!["a.x = 1", "b.y = 2", "c.z = 3"]
        );
    }

    #[test]
    fn split_on_words_respects_parentheses() {
        assert_eq!(
            split_top_level_on_words("flag = 1 AND id IN (SELECT id FROM t WHERE a = 1 AND b = 2)", &["AND", "OR"]),
            vec!["flag = 1", "id IN (SELECT id FROM t WHERE a = 1 AND b = 2)"]
        );
    }

    #[test]
    fn split_on_words_does_not_split_identifiers_containing_the_word() {
        assert_eq!(
            split_top_level_on_words("android = 1 AND oregon = 2", &["AND", "OR"]),
            vec!["android = 1", "oregon = 2"]
        );
    }
}
