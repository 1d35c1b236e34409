//! Error types for the respect-types crate.

use std::fmt;

use thiserror::Error;

/// Errors produced while converting host data into a [`Value`](crate::Value).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("unsupported value: {0}")]
    Unsupported(String),

    #[error("map value serialized before its key")]
    MissingMapKey,

    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for ValueError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Convenience alias for conversion results.
pub type ValueResult<T> = Result<T, ValueError>;
