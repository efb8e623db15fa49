//! Error types for keypath
//!
//! Every builder and mutator validates its inputs before touching any
//! buffer, so an `Err` always means nothing visible was changed.
//!
//! Memory exhaustion has no variant here: the global allocator aborts the
//! process, and no caller can recover a consistent state from it anyway.

use thiserror::Error;

use crate::value::Value;

/// Result type used throughout keypath
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, mutating or rendering key buffers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value at a parameter, field or element position has the wrong type
    #[error("{position} must be {expected} (got {actual})")]
    InputType {
        /// Where the value was found, e.g. "parameter #2, table element 3"
        position: String,
        /// Description of the accepted type(s)
        expected: &'static str,
        /// Type name of the value actually supplied
        actual: &'static str,
    },

    /// A node lacks a required relationship field, or the field is malformed
    #[error("node has invalid '{field}' at depth {depth}: {reason}")]
    MissingField {
        /// Name of the offending field
        field: &'static str,
        /// Depth at which the problem was detected
        depth: i64,
        /// What was wrong with it
        reason: String,
    },

    /// A slot index or render depth is outside the buffer
    #[error("index {index} is outside the valid range {min}-{max}")]
    IndexRange {
        /// The requested index or depth
        index: i64,
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: usize,
    },

    /// Working space for the requested number of subscripts cannot be reserved
    #[error("cannot reserve space for {requested} subscripts (limit is {limit})")]
    StackGrowth {
        /// Number of subscripts requested
        requested: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Arithmetic on a stored value left the representable range
    #[error("numeric overflow: {operation}")]
    NumericOverflow {
        /// The operation that overflowed, e.g. "9e30 + 1"
        operation: String,
    },
}

impl Error {
    /// Wrong-type error for `value` found at `position`.
    pub fn input_type(position: impl Into<String>, expected: &'static str, value: &Value) -> Self {
        Error::InputType {
            position: position.into(),
            expected,
            actual: value.type_name(),
        }
    }

    /// Malformed or absent node field.
    pub fn missing_field(field: &'static str, depth: i64, reason: impl Into<String>) -> Self {
        Error::MissingField {
            field,
            depth,
            reason: reason.into(),
        }
    }

    /// Index outside `min..=max`.
    pub fn index_range(index: i64, min: i64, max: usize) -> Self {
        Error::IndexRange { index, min, max }
    }

    /// Depth limit exceeded.
    pub fn stack_growth(requested: usize, limit: usize) -> Self {
        Error::StackGrowth { requested, limit }
    }

    /// Arithmetic overflow.
    pub fn numeric_overflow(operation: impl Into<String>) -> Self {
        Error::NumericOverflow {
            operation: operation.into(),
        }
    }

    /// Check if this is a wrong-type error
    pub fn is_input_type(&self) -> bool {
        matches!(self, Error::InputType { .. })
    }

    /// Check if this is a malformed-node error
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Error::MissingField { .. })
    }

    /// Check if this is an index error
    pub fn is_index_range(&self) -> bool {
        matches!(self, Error::IndexRange { .. })
    }

    /// Check if this is a depth-limit error
    pub fn is_stack_growth(&self) -> bool {
        matches!(self, Error::StackGrowth { .. })
    }

    /// Check if this is an arithmetic overflow
    pub fn is_numeric_overflow(&self) -> bool {
        matches!(self, Error::NumericOverflow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_names_position_and_type() {
        let err = Error::input_type("parameter #1", "a string", &Value::Int(3));
        assert_eq!(err.to_string(), "parameter #1 must be a string (got integer)");
        assert!(err.is_input_type());
    }

    #[test]
    fn test_missing_field_names_field_and_depth() {
        let err = Error::missing_field("varname", 2, "expected string, got nil");
        let msg = err.to_string();
        assert!(msg.contains("'varname'"));
        assert!(msg.contains("depth 2"));
        assert!(err.is_missing_field());
    }

    #[test]
    fn test_index_range_message() {
        let err = Error::index_range(5, 1, 3);
        assert_eq!(err.to_string(), "index 5 is outside the valid range 1-3");
        assert!(err.is_index_range());
        assert!(!err.is_stack_growth());
    }

    #[test]
    fn test_stack_growth_message() {
        let err = Error::stack_growth(40, 31);
        assert!(err.to_string().contains("40 subscripts"));
        assert!(err.is_stack_growth());
    }

    #[test]
    fn test_numeric_overflow_message() {
        let err = Error::numeric_overflow("1e40 + 1");
        assert_eq!(err.to_string(), "numeric overflow: 1e40 + 1");
        assert!(err.is_numeric_overflow());
    }
}
