//! Primary error enum for flag definition and parsing flows.

use figment::Error as FigmentError;
use thiserror::Error;

/// Errors that can occur while defining, configuring or parsing flags.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlagError {
    /// A flag (or short alias) with this name already exists in the registry.
    #[error("flag '--{name}' is already defined")]
    DuplicateFlag {
        /// Name or alias that collided with an existing definition.
        name: String,
    },

    /// The registry has no flag with this name.
    #[error("unknown flag '--{name}'")]
    UnknownFlag {
        /// Name that failed to resolve.
        name: String,
    },

    /// A value could not be coerced to the flag's kind.
    #[error("invalid value '{value}' for flag '--{name}': {reason}")]
    InvalidValue {
        /// Flag receiving the value.
        name: String,
        /// Rendered form of the rejected value.
        value: String,
        /// Human-readable explanation of the rejection.
        reason: String,
    },

    /// A typed accessor was used on a flag of a different kind.
    #[error("flag '--{name}' is not a {expected} flag")]
    WrongKind {
        /// Flag that was accessed.
        name: String,
        /// Kind requested by the caller.
        expected: &'static str,
    },

    /// A flag group was asked for an inconsistent set of flags.
    #[error("invalid flag definition: {0}")]
    Definition(String),

    /// A registered validator rejected the parsed values.
    #[error("flag validation failed for {}: {}", render_names(.flags), .message)]
    Validation {
        /// Flags inspected by the failing validator.
        flags: Vec<String>,
        /// Message supplied when the validator was registered.
        message: String,
    },

    /// A flag marked as required has no value after parsing.
    #[error("flag '--{name}' must have a value other than None")]
    MissingRequired {
        /// Required flag without a value.
        name: String,
    },

    /// Error reported by the command-line parser.
    #[error("failed to parse command-line flags: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// Error while gathering flag defaults from configuration sources.
    #[error("failed to load flag defaults: {0}")]
    Config(#[from] Box<FigmentError>),
}

/// Result alias used throughout the crate.
pub type FlagResult<T> = Result<T, FlagError>;

fn render_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("--{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}
