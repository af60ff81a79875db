//! Evaluation errors

use crate::tree::VariableId;
use thiserror::Error;

/// Result alias for the reference evaluator
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while evaluating an IR tree
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    /// Read of a variable that was never initialized in this frame
    #[error("Unbound variable: {0}")]
    UnboundVariable(VariableId),

    /// Read of a parameter index past the argument list
    #[error("Missing parameter #{index}")]
    MissingParameter {
        /// Parameter position
        index: u32,
    },

    /// `this` read outside an instance context
    #[error("No receiver in scope")]
    NoReceiver,

    /// Call to a function with neither a body nor a native implementation
    #[error("No body or native implementation for {function}")]
    NoBody {
        /// Fully qualified function name
        function: String,
    },

    /// A value of the wrong shape reached an operation
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected shape
        expected: String,
        /// Actual value
        found: String,
    },

    /// A native function reported a failure
    #[error("Native failure: {0}")]
    Native(String),

    /// Construct the evaluator does not model
    #[error("Unsupported: {0}")]
    Unsupported(String),
}
