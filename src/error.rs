use thiserror::Error;

#[derive(Error, Debug)]
/// Mapper error
pub enum MapperError {
    /// A type cannot be mapped to columns with the current registry.
    #[error("cannot map `{type_name}`: {reason}")]
    Configuration {
        type_name: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// A leaf converter rejected the text of a column.
    #[error("column {column} (`{header}`): cannot convert `{text}` to `{type_name}`")]
    FieldConversion {
        column: usize,
        header: String,
        type_name: &'static str,
        text: String,
    },

    /// A user converter refused to write a value.
    #[error("converter for `{type_name}` failed to serialize column `{column}`")]
    Serialization {
        column: String,
        type_name: &'static str,
    },

    #[error("nesting depth {depth} exceeds the configured limit of {limit}")]
    DepthLimitExceeded { depth: usize, limit: usize },

    #[error("CSV reader: {0}")]
    ItemReader(String),

    #[error("CSV writer: {0}")]
    ItemWriter(String),
}

/// The header of a record does not describe the shape being mapped.
///
/// Column indices are 0-based positions in the header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("column {column}: expected `{expected}`, found `{found}`")]
    UnexpectedColumn {
        column: usize,
        expected: String,
        found: String,
    },

    #[error("column {column}: expected `{expected}` but the record has no more columns")]
    MissingColumn { column: usize, expected: String },

    #[error("column {column} (`{found}`): collection item out of sequence, expected index {expected_index}")]
    OutOfSequence {
        column: usize,
        found: String,
        expected_index: usize,
    },

    #[error("header has {header} columns but the row has {row}")]
    LengthMismatch { header: usize, row: usize },

    #[error("column {column} (`{found}`) is not consumed by any field")]
    TrailingColumn { column: usize, found: String },

    #[error("`{type_name}` holds exactly {expected} items, found {found}")]
    FixedLength {
        type_name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("header differs from the document header at column {column}")]
    HeaderMismatch { column: usize },
}

impl MapperError {
    pub(crate) fn configuration(type_name: &'static str, reason: impl Into<String>) -> Self {
        MapperError::Configuration {
            type_name,
            reason: reason.into(),
        }
    }
}
