//! Identifier handling for SQL built by the Postgres store
//!
//! Table and column names cannot be bound as parameters, so every name that
//! reaches a statement is validated and then quoted.

use crate::error::ModelError;

/// Characters allowed in SQL identifiers (alphanumeric, underscore)
const ALLOWED_IDENTIFIER_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// SQL keywords rejected as bare identifiers
static SQL_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "UNION", "DROP",
    "CREATE", "ALTER", "GRANT", "REVOKE", "TRUNCATE", "TABLE", "USER", "CURRENT_USER",
];

/// Escape a SQL identifier (table name, column name, etc.)
///
/// Doubles embedded quotes and wraps the identifier in double quotes.
///
/// ```
/// use quill_orm::security::escape_identifier;
///
/// assert_eq!(escape_identifier("articles"), "\"articles\"");
/// assert_eq!(escape_identifier("table\"name"), "\"table\"\"name\"");
/// ```
pub fn escape_identifier(identifier: &str) -> String {
    let escaped = identifier.replace('"', "\"\"");
    format!("\"{}\"", escaped)
}

/// Validate that an identifier is safe for use in SQL
pub fn validate_identifier(identifier: &str) -> Result<(), ModelError> {
    let first = match identifier.chars().next() {
        Some(c) => c,
        None => {
            return Err(ModelError::Validation(
                "Identifier cannot be empty".to_string(),
            ))
        }
    };

    // PostgreSQL limit is 63 bytes
    if identifier.len() > 63 {
        return Err(ModelError::Validation(format!(
            "Identifier '{}' is too long (max 63 characters)",
            identifier
        )));
    }

    if let Some(c) = identifier.chars().find(|c| !ALLOWED_IDENTIFIER_CHARS.contains(*c)) {
        return Err(ModelError::Validation(format!(
            "Identifier '{}' contains invalid character '{}'",
            identifier, c
        )));
    }

    if first.is_ascii_digit() {
        return Err(ModelError::Validation(format!(
            "Identifier '{}' cannot start with a number",
            identifier
        )));
    }

    let upper_identifier = identifier.to_uppercase();
    if SQL_KEYWORDS.contains(&upper_identifier.as_str()) {
        return Err(ModelError::Validation(format!(
            "Identifier '{}' is a reserved SQL keyword",
            identifier
        )));
    }

    Ok(())
}

/// Validate and escape in one step
pub fn safe_identifier(identifier: &str) -> Result<String, ModelError> {
    validate_identifier(identifier)?;
    Ok(escape_identifier(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("users"), "\"users\"");
        assert_eq!(escape_identifier("table\"name"), "\"table\"\"name\"");
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("articles").is_ok());
        assert!(validate_identifier("user_id").is_ok());
        assert!(validate_identifier("_private").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1table").is_err());
        assert!(validate_identifier("table-name").is_err());
        assert!(validate_identifier("users; DROP").is_err());
        assert!(validate_identifier("select").is_err());
        assert!(validate_identifier(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_safe_identifier() {
        assert_eq!(safe_identifier("articles").unwrap(), "\"articles\"");
        assert!(safe_identifier("bad name").is_err());
    }
}
