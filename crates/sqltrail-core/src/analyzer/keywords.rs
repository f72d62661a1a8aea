//! Reserved-keyword filtering.
//!
//! Identifiers that match a reserved SQL keyword are syntax, not column or
//! table names, and must never become graph nodes. The set is a fixed
//! immutable configuration value so the engine stays a pure function of its
//! input text. Comparison is case-insensitive. The `*` sentinel is handled
//! upstream and is never matched against this set.

/// Words that are SQL syntax rather than identifiers.
const RESERVED_KEYWORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "AVG", "BETWEEN", "BY", "CASE", "CAST", "COALESCE",
    "COUNT", "CREATE", "CROSS", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT",
    "EXISTS", "FROM", "FULL", "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTERSECT",
    "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT", "MAX", "MIN", "NOT", "NULL", "OFFSET", "ON",
    "OR", "ORDER", "OUTER", "RIGHT", "SELECT", "SET", "SUM", "TABLE", "THEN", "UNION", "UPDATE",
    "VALUES", "VIEW", "WHEN", "WHERE", "WITH",
];

/// True if `word` is a reserved SQL keyword (case-insensitive).
pub(crate) fn is_reserved(word: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SELECT")]
    #[case("select")]
    #[case("Count")]
    #[case("and")]
    #[case("GROUP")]
    fn reserved_words_match_case_insensitively(#[case] word: &str) {
        assert!(is_reserved(word));
    }

    #[rstest]
    #[case("users")]
    #[case("order_id")]
    #[case("selected")]
    #[case("counter")]
    #[case("*")]
    fn identifiers_are_not_reserved(#[case] word: &str) {
        assert!(!is_reserved(word));
    }
}
