//! Error types for type mapping operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("Invalid mapping configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Mapping '{store_type}' cannot render a {value_kind} value as a SQL literal")]
    UnsupportedLiteral {
        store_type: String,
        value_kind: &'static str,
    },

    #[error("Cannot convert {from} to {to}: {reason}")]
    Conversion {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Cannot read column {ordinal} as {expected}: {reason}")]
    InvalidCast {
        ordinal: usize,
        expected: String,
        reason: String,
    },

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
}

impl MappingError {
    /// Shorthand for a converter that received a value of the wrong kind
    pub fn conversion(from: impl ToString, to: impl ToString, reason: impl Into<String>) -> Self {
        Self::Conversion {
            from: from.to_string(),
            to: to.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_cast(ordinal: usize, expected: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidCast {
            ordinal,
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }
}
