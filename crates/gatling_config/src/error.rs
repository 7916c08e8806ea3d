//! Typed errors for configuration loading and validation.

use std::io;

/// Errors that can occur while loading or validating `gatling.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration file: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid TOML.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A configuration value is out of its valid range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// The dotted path of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}
