use thiserror::Error;

/// Errors that can occur while lowering a query.
///
/// Every variant is fatal for the whole pass: lowering never returns a
/// partial expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    /// Name that is neither a lambda parameter, a built-in nor a host global
    #[error("Unknown id: {0}")]
    UnresolvedIdentifier(String),

    /// Operator or node kind without a lowering rule
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Wrong number of arguments or lambda parameters
    #[error("{operator} expects {expected} argument(s), found {found}")]
    OperatorArity {
        operator: String,
        expected: String,
        found: usize,
    },

    /// Structurally invalid query
    #[error("Malformed query: {0}")]
    MalformedQuery(String),
}

pub type Result<T, E = LowerError> = std::result::Result<T, E>;

impl LowerError {
    pub(crate) fn depth_exceeded(max_depth: usize) -> Self {
        LowerError::MalformedQuery(format!(
            "query nesting exceeds the maximum depth of {max_depth}"
        ))
    }
}
