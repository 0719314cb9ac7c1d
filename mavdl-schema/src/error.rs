//! Error types for dialect parsing, resolution and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for single-document parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("malformed XML at line {line}, column {column}: {message}")]
    Malformed {
        /// 1-based line of the error.
        line: usize,
        /// 1-based column of the error.
        column: usize,
        /// Description from the XML reader.
        message: String,
    },

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Element text that should be a number is not.
    #[error("invalid text '{value}' in element '{element}'")]
    InvalidText {
        /// Element name.
        element: String,
        /// Offending text.
        value: String,
    },

    /// The root element is not `mavlink`.
    #[error("expected root element 'mavlink', found '{element}'")]
    UnexpectedRoot {
        /// Name of the root element found.
        element: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates a malformed-document error at a byte offset of `source`.
    pub fn malformed_at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_column(source, offset);
        Self::Malformed {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Converts a byte offset into a 1-based line and column.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let prefix = &source.as_bytes()[..offset.min(source.len())];
    let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = match prefix.iter().rposition(|&b| b == b'\n') {
        Some(nl) => prefix.len() - nl,
        None => prefix.len() + 1,
    };
    (line, column)
}

/// Error type for everything after a single document has been read.
///
/// The compile pipeline stops at the first error; each variant names the
/// file, element and values needed to fix the input.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A dialect file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A dialect file is not a well-formed dialect document.
    #[error("malformed document {}: {source}", .path.display())]
    MalformedDocument {
        /// Path of the document.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: ParseError,
    },

    /// An include references a file that does not exist.
    #[error("include '{}' not found (referenced by {})", .path.display(), .referenced_by.display())]
    IncludeNotFound {
        /// Resolved path of the missing file.
        path: PathBuf,
        /// File containing the include.
        referenced_by: PathBuf,
    },

    /// Includes form a cycle.
    #[error("include cycle: {}", format_cycle(.cycle))]
    IncludeCycle {
        /// Files on the cycle, starting and ending with the same file.
        cycle: Vec<PathBuf>,
    },

    /// Two enums or two messages share a name.
    #[error("duplicate {kind} '{name}' (declared in {first} and {second})")]
    DuplicateName {
        /// `enum` or `message`.
        kind: &'static str,
        /// Colliding name.
        name: String,
        /// Where the first declaration lives.
        first: String,
        /// Where the second declaration lives.
        second: String,
    },

    /// Two entries of one enum share a name.
    #[error("{}: duplicate entry '{entry}' in enum '{enum_name}'", .file.display())]
    DuplicateEnumEntry {
        /// File declaring the enum.
        file: PathBuf,
        /// Enum name.
        enum_name: String,
        /// Entry name.
        entry: String,
    },

    /// Two entries of one enum resolve to the same value.
    #[error(
        "{}: entries '{first}' and '{second}' of enum '{enum_name}' both have value {value}",
        .file.display()
    )]
    DuplicateEnumValue {
        /// File declaring the enum.
        file: PathBuf,
        /// Enum name.
        enum_name: String,
        /// Entry that holds the value first.
        first: String,
        /// Entry that collides with it.
        second: String,
        /// Colliding value.
        value: u32,
    },

    /// An entry value does not fit the 32-bit enum range.
    #[error(
        "{}: value of entry '{entry}' in enum '{enum_name}' exceeds {max}",
        .file.display(),
        max = u32::MAX
    )]
    EnumValueOverflow {
        /// File declaring the enum.
        file: PathBuf,
        /// Enum name.
        enum_name: String,
        /// Entry name.
        entry: String,
    },

    /// Two fields of one message share a name.
    #[error("{}: duplicate field '{field}' in message '{message}'", .file.display())]
    DuplicateFieldName {
        /// File declaring the message.
        file: PathBuf,
        /// Message name.
        message: String,
        /// Field name.
        field: String,
    },

    /// Two messages share an id.
    #[error(
        "messages '{first}' ({}) and '{second}' ({}) both use id {id}",
        .first_file.display(),
        .second_file.display()
    )]
    DuplicateMessageId {
        /// Shared id.
        id: u32,
        /// First message with the id.
        first: String,
        /// File declaring the first message.
        first_file: PathBuf,
        /// Second message with the id.
        second: String,
        /// File declaring the second message.
        second_file: PathBuf,
    },

    /// A field type token is not recognised.
    #[error(
        "{}: unknown type '{type_name}' for field '{field}' in message '{message}'",
        .file.display()
    )]
    UnknownFieldType {
        /// File declaring the message.
        file: PathBuf,
        /// Message name.
        message: String,
        /// Field name.
        field: String,
        /// Type token as written.
        type_name: String,
    },

    /// A field references an enum that does not exist.
    #[error(
        "{}: field '{field}' in message '{message}' references unknown enum '{enum_name}'",
        .file.display()
    )]
    UnknownEnumReference {
        /// File declaring the message.
        file: PathBuf,
        /// Message name.
        message: String,
        /// Field name.
        field: String,
        /// Referenced enum name.
        enum_name: String,
    },

    /// An array length is zero, negative or not a number.
    #[error(
        "{}: invalid array length in type '{type_name}' of field '{field}' in message '{message}'",
        .file.display()
    )]
    InvalidArrayLength {
        /// File declaring the message.
        file: PathBuf,
        /// Message name.
        message: String,
        /// Field name.
        field: String,
        /// Type token as written.
        type_name: String,
    },

    /// A message declares more than one protocol-version field.
    #[error(
        "{}: message '{message}' has more than one protocol-version field ('{first}', '{second}')",
        .file.display()
    )]
    MultipleMagicFields {
        /// File declaring the message.
        file: PathBuf,
        /// Message name.
        message: String,
        /// First magic field.
        first: String,
        /// Second magic field.
        second: String,
    },

    /// A message id was refused by the caller's id policy.
    #[error("{}: message '{message}' has id {id}, which the id policy rejects", .file.display())]
    MessageIdRejected {
        /// File declaring the message.
        file: PathBuf,
        /// Message name.
        message: String,
        /// Rejected id.
        id: u32,
    },
}

fn format_cycle(cycle: &[PathBuf]) -> String {
    cycle
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column() {
        let src = "ab\ncd\nef";
        assert_eq!(line_column(src, 0), (1, 1));
        assert_eq!(line_column(src, 4), (2, 2));
        assert_eq!(line_column(src, 100), (3, 3));
    }

    #[test]
    fn test_cycle_display() {
        let err = SchemaError::IncludeCycle {
            cycle: vec!["a.xml".into(), "b.xml".into(), "a.xml".into()],
        };
        assert_eq!(err.to_string(), "include cycle: a.xml -> b.xml -> a.xml");
    }

    #[test]
    fn test_duplicate_id_names_both_files() {
        let err = SchemaError::DuplicateMessageId {
            id: 5,
            first: "BASE_MSG".to_string(),
            first_file: "base.xml".into(),
            second: "ROOT_MSG".to_string(),
            second_file: "root.xml".into(),
        };
        assert_eq!(
            err.to_string(),
            "messages 'BASE_MSG' (base.xml) and 'ROOT_MSG' (root.xml) both use id 5"
        );
    }
}
