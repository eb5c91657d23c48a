//! Keyword recognition for emitted Cypher text.
//!
//! Keywords are case-insensitive. Any identifier that collides with one is
//! emitted backtick-quoted by the compiler.

use super::token::TokenKind;

/// Looks up a keyword by name (case-insensitive).
pub fn lookup_keyword(name: &str) -> Option<TokenKind> {
    match name.to_ascii_uppercase().as_str() {
        // Clause keywords
        "MATCH" => Some(TokenKind::Match),
        "OPTIONAL" => Some(TokenKind::Optional),
        "WHERE" => Some(TokenKind::Where),
        "RETURN" => Some(TokenKind::Return),
        "WITH" => Some(TokenKind::With),
        "UNWIND" => Some(TokenKind::Unwind),
        "AS" => Some(TokenKind::As),
        "CREATE" => Some(TokenKind::Create),
        "MERGE" => Some(TokenKind::Merge),
        "ON" => Some(TokenKind::On),
        "SET" => Some(TokenKind::Set),
        "REMOVE" => Some(TokenKind::Remove),
        "DELETE" => Some(TokenKind::Delete),
        "DETACH" => Some(TokenKind::Detach),
        "ORDER" => Some(TokenKind::Order),
        "BY" => Some(TokenKind::By),
        "ASC" | "ASCENDING" => Some(TokenKind::Asc),
        "DESC" | "DESCENDING" => Some(TokenKind::Desc),
        "SKIP" => Some(TokenKind::Skip),
        "LIMIT" => Some(TokenKind::Limit),
        "UNION" => Some(TokenKind::Union),
        "ALL" => Some(TokenKind::All),
        "CALL" => Some(TokenKind::Call),
        "LOAD" => Some(TokenKind::Load),
        "CSV" => Some(TokenKind::Csv),
        "HEADERS" => Some(TokenKind::Headers),
        "FROM" => Some(TokenKind::From),
        "FIELDTERMINATOR" => Some(TokenKind::Fieldterminator),
        "FOREACH" => Some(TokenKind::Foreach),
        "DISTINCT" => Some(TokenKind::Distinct),
        "EXISTS" => Some(TokenKind::Exists),

        // Schema keywords
        "INDEX" => Some(TokenKind::Index),
        "CONSTRAINT" => Some(TokenKind::Constraint),
        "DROP" => Some(TokenKind::Drop),
        "FOR" => Some(TokenKind::For),
        "REQUIRE" => Some(TokenKind::Require),
        "ASSERT" => Some(TokenKind::Assert),
        "UNIQUE" => Some(TokenKind::Unique),
        "IF" => Some(TokenKind::If),

        // Expression keywords
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "XOR" => Some(TokenKind::Xor),
        "NOT" => Some(TokenKind::Not),
        "IS" => Some(TokenKind::Is),
        "IN" => Some(TokenKind::In),
        "STARTS" => Some(TokenKind::Starts),
        "ENDS" => Some(TokenKind::Ends),
        "CONTAINS" => Some(TokenKind::Contains),
        "CASE" => Some(TokenKind::Case),
        "WHEN" => Some(TokenKind::When),
        "THEN" => Some(TokenKind::Then),
        "ELSE" => Some(TokenKind::Else),
        "END" => Some(TokenKind::End),

        // Literals
        "TRUE" => Some(TokenKind::True),
        "FALSE" => Some(TokenKind::False),
        "NULL" => Some(TokenKind::Null),

        _ => None,
    }
}

/// Returns true if `name` is a reserved keyword.
pub fn is_reserved(name: &str) -> bool {
    lookup_keyword(name).is_some()
}
