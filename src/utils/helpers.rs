//! General utility helper functions

/// Parse a boolean literal in the classic set of accepted spellings:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool_literal(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
