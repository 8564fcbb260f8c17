//! Error types for token parsing and grammar loading.
//!
//! [`ParseError`] covers every way a strict parse can be rejected. Each
//! variant is terminal for the parse call that produced it. [`ConfigError`]
//! covers reading a grammar from disk.

use thiserror::Error;

use crate::ValueType;

/// Errors produced while classifying tokens against a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `-`-prefixed token matches no declared identifier.
    #[error("invalid flag <{0}> encountered")]
    InvalidFlag(String),

    /// A token in command position matches no declared action, or the
    /// final action is not permitted by the grammar.
    #[error("invalid command <{0}> encountered")]
    InvalidCommand(String),

    /// A positional token arrived with no remaining declared argument slot.
    #[error("invalid argument count: no rules for argument <{argument}> (command <{action}> accepts {limit})")]
    ArgumentCountExceeded {
        action: String,
        argument: String,
        limit: usize,
    },

    /// Two different flag declarations share a name, so their values would
    /// land in the same result entry.
    #[error("flag <{identifier}> conflicts with another flag named <{name}>")]
    ConflictingFlag { name: String, identifier: String },

    /// A declared `required` argument was never supplied.
    #[error("missing required argument <{argument}> for command <{action}>")]
    MissingArgument { action: String, argument: String },

    /// A second value was offered to a single-valued target.
    #[error("redundant value encountered: cannot set <{value}> for {value_type} target <{target}>, already contains {existing}")]
    RedundantValue {
        target: String,
        value: String,
        existing: String,
        value_type: ValueType,
    },

    /// A token could not be converted to the target's declared type.
    #[error("invalid value encountered: cannot set <{value}> for {value_type} target <{target}>")]
    TypeConversion {
        target: String,
        value: String,
        value_type: ValueType,
    },

    /// A type spelling outside the closed set of value types.
    #[error("unknown value type <{0}>")]
    UnknownType(String),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while loading a grammar file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
