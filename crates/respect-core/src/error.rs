//! Error types for the respect-core crate.

use respect_types::ValueError;

/// Errors that can occur around a comparison.
///
/// Mismatches between values are never errors; they are reported as
/// diagnostics in a [`DiffList`](crate::DiffList). These variants cover
/// configuration problems and inputs that cannot be lowered to values.
#[derive(Debug, thiserror::Error)]
pub enum RespectError {
    /// The comparison configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An input could not be converted into a value.
    #[error("value conversion error: {0}")]
    Value(#[from] ValueError),

    /// A configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience alias for respect results.
pub type RespectResult<T> = Result<T, RespectError>;
