use std::fmt;

use thiserror::Error;

/// The node shape an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Sequence,
    Text,
    SequenceOrText,
    Container,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Sequence => write!(f, "a sequence"),
            Category::Text => write!(f, "text"),
            Category::SequenceOrText => write!(f, "a sequence or text"),
            Category::Container => write!(f, "a sequence or mapping"),
        }
    }
}

/// Errors returned by view operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The node's shape does not support the operation.
    #[error("`{op}` can only be used on views holding {expected}; this one holds {actual}")]
    CategoryMismatch {
        op: &'static str,
        expected: Category,
        actual: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_operation_and_observed_shape() {
        let err = ViewError::CategoryMismatch {
            op: "push",
            expected: Category::Sequence,
            actual: "number",
        };
        assert_eq!(
            err.to_string(),
            "`push` can only be used on views holding a sequence; this one holds number"
        );
    }
}
