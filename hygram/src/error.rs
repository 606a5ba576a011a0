use strum::EnumIs;
use thiserror::Error;

use crate::tree::Tag;

/// Failures raised while matching a grammar or evaluating an action.
///
/// A shape mismatch is never an error: `matches` simply answers `false`. Errors only
/// arise when a value is required and none can be produced, and they always propagate
/// to the top-level call without any partial result.
#[derive(Debug, Clone, PartialEq, EnumIs, Error)]
pub enum TransformError {
    /// No case or alternative of a grammar accepted the node while a value was required.
    #[error(
        "No alternative of the grammar matches the node `{tag}` of arity {arity}. A grammar used as an action must accept its input."
    )]
    NoMatch { tag: Tag, arity: usize },

    /// A `When` action was evaluated on a node its pattern rejects.
    #[error(
        "The pattern guarding a `when` action rejects the node `{tag}` of arity {arity}. `when` may only run on nodes selected by its pattern."
    )]
    WhenPrecondition { tag: Tag, arity: usize },

    /// The function part of a `Call` did not evaluate to a callable.
    #[error("The function part of a call evaluated to {found}, which is not callable.")]
    NotCallable { found: String },

    /// A callable was invoked with the wrong number of arguments.
    #[error("Function `{callee}` expects {expected} argument(s) but {found} were computed.")]
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },

    /// A child index past the arity of the node.
    #[error("Child #{index} requested on node `{tag}` which only has {arity} child(ren).")]
    ChildOutOfRange {
        tag: Tag,
        arity: usize,
        index: usize,
    },

    /// A held value was requested on a composite node.
    #[error("Node `{tag}` of arity {arity} is not a terminal and holds no value.")]
    NotTerminal { tag: Tag, arity: usize },

    /// A node was required (rebuild, invoke) but another kind of value was computed.
    #[error("Expected an expression node but the action produced {found}.")]
    NotANode { found: String },

    /// The tree representation refused to build a node.
    #[error("Cannot build a node tagged `{tag}`: {reason}.")]
    InvalidNode { tag: Tag, reason: String },

    /// Operands of a builtin operator have unsupported kinds.
    #[error("Operator `{op}` cannot be applied to operand(s) {found}.")]
    TypeMismatch { op: String, found: String },

    /// Integer division or modulus by zero.
    #[error("Division by zero while evaluating `{op}`.")]
    DivisionByZero { op: String },

    /// Checked integer arithmetic overflowed.
    #[error("Integer overflow while evaluating `{op}`.")]
    Overflow { op: String },

    /// The tag has no builtin evaluation semantics.
    #[error("Tag `{tag}` has no default evaluation semantics.")]
    NoDefault { tag: Tag },

    /// `Recurse` was used outside of any enclosing grammar.
    #[error(
        "`recurse` was reached outside of an enclosing grammar. Wrap the action into an algorithm or match through a grammar."
    )]
    UnboundRecursion,

    /// The configured recursion limit was reached.
    #[error("Maximum recursion depth of {limit} exceeded while transforming the expression.")]
    DepthExceeded { limit: usize },

    /// Error raised by a user supplied leaf or function.
    #[error("{0}")]
    Custom(String),
}

impl TransformError {
    /// Build a [`TransformError::Custom`] from any displayable message.
    pub fn custom(message: impl std::fmt::Display) -> Self {
        TransformError::Custom(message.to_string())
    }
}

pub type TransformResult<T> = Result<T, TransformError>;

/// Failures raised while loading or saving an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration '{file}': {source}")]
    Parse {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Environment variable {variable} is not valid unicode: {value:?}")]
    NotUnicode {
        variable: &'static str,
        value: std::ffi::OsString,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
