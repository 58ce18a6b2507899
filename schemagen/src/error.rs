//! Error types for schema building.
//!
//! Every variant names the source file it came from so the driver can
//! report the offending input without extra context.

use thiserror::Error;

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Fatal error raised while turning a definition file into a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A component line has fewer fields than its kind requires.
    #[error(
        "Malformed `{kind}` line in {file}:{line_number}: expected at least {expected} fields, found {found}: [{line}]"
    )]
    MalformedLine {
        file: String,
        line_number: usize,
        kind: String,
        expected: usize,
        found: usize,
        line: String,
    },

    /// A component line starts with a tag that is not a known line kind.
    #[error("Unknown line kind `{kind}` in {file}:{line_number}: [{line}]")]
    UnknownLineKind {
        file: String,
        line_number: usize,
        kind: String,
        line: String,
    },

    /// Two body fields of one component share a name.
    #[error("Duplicate body field `{field}` in component {file} (line {line_number})")]
    DuplicateBodyField {
        file: String,
        line_number: usize,
        field: String,
    },

    /// An enum line does not match `<symbol>[ = <int>][, "<description>"]`.
    #[error("Syntax error in {file}:{line_number}: [{line}]")]
    Syntax {
        file: String,
        line_number: usize,
        line: String,
    },

    /// An enum symbol is declared twice.
    #[error("Double field name `{symbol}` in enum {file} (line {line_number})")]
    DuplicateSymbol {
        file: String,
        line_number: usize,
        symbol: String,
    },

    /// An enum declares the name of the generated sentinel member.
    #[error("Reserved field name `{symbol}` in enum {file} (line {line_number})")]
    ReservedSymbol {
        file: String,
        line_number: usize,
        symbol: String,
    },

    /// An explicit enum value is below the running counter.
    #[error(
        "Not a monotonic progression in enum {file}: field `{symbol}` has value {found}, expected at least {expected}"
    )]
    NonMonotonic {
        file: String,
        symbol: String,
        expected: u32,
        found: u32,
    },

    /// An explicit enum value does not fit the value range.
    #[error("Value `{value}` for enum field `{symbol}` in {file} is out of range")]
    ValueOutOfRange {
        file: String,
        symbol: String,
        value: String,
    },

    /// Two component definition files resolve to the same name.
    #[error("Duplicate component name `{name}`")]
    DuplicateComponent { name: String },

    /// Two enum definition files resolve to the same name.
    #[error("Duplicate enum name `{name}`")]
    DuplicateEnum { name: String },
}

impl SchemaError {
    /// Name of the definition file the error refers to.
    pub fn file(&self) -> &str {
        match self {
            Self::MalformedLine { file, .. }
            | Self::UnknownLineKind { file, .. }
            | Self::DuplicateBodyField { file, .. }
            | Self::Syntax { file, .. }
            | Self::DuplicateSymbol { file, .. }
            | Self::ReservedSymbol { file, .. }
            | Self::NonMonotonic { file, .. }
            | Self::ValueOutOfRange { file, .. } => file,
            Self::DuplicateComponent { name } | Self::DuplicateEnum { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_monotonic_message_names_both_values() {
        let err = SchemaError::NonMonotonic {
            file: "colors".to_string(),
            symbol: "Green".to_string(),
            expected: 1,
            found: 0,
        };

        let message = err.to_string();
        assert!(message.contains("Green"));
        assert!(message.contains("expected at least 1"));
        assert!(message.contains("value 0"));
    }

    #[test]
    fn test_malformed_line_message_contains_line() {
        let err = SchemaError::MalformedLine {
            file: "door".to_string(),
            line_number: 3,
            kind: "body".to_string(),
            expected: 4,
            found: 2,
            line: "body,float".to_string(),
        };

        assert!(err.to_string().contains("[body,float]"));
        assert_eq!(err.file(), "door");
    }
}
