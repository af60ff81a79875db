//! Lowering configuration errors
//!
//! Every error here is raised while resolving the runtime bindings, before any
//! file is lowered. Lowering itself never fails.

use thiserror::Error;

/// Result alias for binding resolution and configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while configuring the throwable lowering
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base class is not declared
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// The base class declares no constructors
    #[error("Class {0} declares no constructors")]
    NoConstructors(String),

    /// The base class must have exactly one zero-argument constructor
    #[error("Class {class} must declare exactly one zero-argument constructor, found {found}")]
    DefaultConstructor {
        /// Base class name
        class: String,
        /// Number of zero-argument constructors
        found: usize,
    },

    /// A required member function or getter is missing
    #[error("Member not found: {class}.{member}")]
    MemberNotFound {
        /// Owning class
        class: String,
        /// Member name
        member: String,
    },

    /// A member name resolved to several declarations
    #[error("Ambiguous member {class}.{member}: {count} candidates")]
    AmbiguousMember {
        /// Owning class
        class: String,
        /// Member name
        member: String,
        /// Number of candidates
        count: usize,
    },

    /// An intrinsic is not declared
    #[error("Intrinsic not found: {0}")]
    IntrinsicNotFound(String),

    /// An intrinsic name has several overloads
    #[error("Ambiguous intrinsic {name}: {count} overloads")]
    AmbiguousIntrinsic {
        /// Qualified intrinsic name
        name: String,
        /// Number of overloads
        count: usize,
    },

    /// An intrinsic takes the wrong number of value parameters
    #[error("Intrinsic {name} takes {found} parameters, expected {expected}")]
    IntrinsicArity {
        /// Qualified intrinsic name
        name: String,
        /// Required parameter count
        expected: usize,
        /// Declared parameter count
        found: usize,
    },

    /// Failed to read a binding file
    #[error("Failed to read binding file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a binding file
    #[error("Failed to parse bindings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A binding file parsed but names something unusable
    #[error("Invalid bindings: {0}")]
    Invalid(String),
}
