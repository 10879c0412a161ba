// src/error.rs

use crate::sack::QueryCmp;
use thiserror::Error;

/// Core error types for pkgsack
#[derive(Error, Debug)]
pub enum Error {
    /// A handle was dereferenced after its guard invalidated it
    #[error("Dereferencing an invalidated WeakPtr")]
    InvalidatedReference,

    /// `Query::get()` requires exactly one object
    #[error("Query must contain exactly one object, found {0}")]
    NotExactlyOne(usize),

    /// The comparison operator does not apply to the accessor's value type
    #[error("Unsupported operation {cmp} for {kind} values")]
    UnsupportedOperation { cmp: QueryCmp, kind: &'static str },

    /// A regex or glob pattern could not be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Repository with the given id is already present in the sack
    #[error("Repository already exists: {0}")]
    RepoAlreadyExists(String),

    /// Repository with the given id is not present in the sack
    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    /// Configuration could not be loaded or applied
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata or configuration JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using pkgsack's Error type
pub type Result<T> = std::result::Result<T, Error>;
