//! Errors returned while populating a struct

use std::fmt::Display;

/// Errors that can occur while populating a struct from environment variables.
///
/// Population is fail-fast: the first error aborts the whole call and is
/// returned as-is. The library never logs or swallows these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `required` field resolved to the empty string.
    ///
    /// The value may be absent, present but empty, or emptied by expansion.
    /// Also returned by [`crate::getters::get`] / [`crate::getters::require`]
    /// when the variable is absent.
    #[error("environment variable '{name}' is required but empty or not set")]
    Missing {
        /// First declared key of the field, after the nesting prefix
        name: String,
    },

    /// A field marked `file` named a path that could not be read.
    #[error("cannot read '{path}' named by environment variable '{name}': {source}")]
    FileRead {
        /// Prefixed key whose value was the path
        name: String,
        /// The value of that key, as handed to the file reader
        path: String,
        source: std::io::Error,
    },

    /// The resolved string was rejected by the field type's [`crate::Scalar`]
    /// impl.
    #[error("environment variable '{name}' is not a valid {type_name}: {message}")]
    Parse {
        /// Prefixed key the value came from; the first declared key when the
        /// value is a fallback
        name: String,
        /// `std::any::type_name` of the field type
        type_name: String,
        /// Rendered `Scalar::Err`
        message: String,
    },

    /// A variable is present but its value is not valid Unicode.
    #[error("environment variable '{name}' is not valid unicode")]
    NotUnicode { name: String },

    /// Key or value cannot be stored in the process environment.
    ///
    /// Keys must be non-empty and contain neither `=` nor NUL; values must not
    /// contain NUL.
    #[error("invalid environment variable '{name}'")]
    InvalidKey { name: String },
}

impl Error {
    /// `key` held a value that `T` refused.
    pub fn coercion<T>(key: &str, err: impl Display) -> Self {
        Self::Parse {
            name: key.to_string(),
            type_name: std::any::type_name::<T>().to_string(),
            message: err.to_string(),
        }
    }

    /// `key` is required and resolved empty.
    pub fn required(key: impl Into<String>) -> Self {
        Self::Missing { name: key.into() }
    }
}
