//! Configuration errors for rules and form builders.

use thiserror::Error;

/// Errors that can occur while declaring rules or building a form.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Field '{0}' does not name a known field key")]
    UnknownField(String),

    #[error("No fields declared. Call .field(key, rules) before .build()")]
    NoFields,

    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Rules configuration could not be parsed: {0}")]
    Parse(String),
}
