//! Error types surfaced by the preset store, the codec, the form and the preview.

use std::fmt;
use std::io;

use thiserror::Error;

/// A user-supplied value breaks a local constraint. No state was changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("There are only whitespaces.")]
    Blank,

    #[error("A preset with the name already exists: {0}")]
    Duplicate(String),

    #[error("no preset named '{0}'")]
    Unknown(String),
}

/// An import document or persisted state could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// 1-based position of a syntax error, when the parser reported one.
    pub location: Option<(usize, usize)>,
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            location: Some((line, column)),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some((line, column)) => write!(f, "{line}:{column}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// The formatting capability rejected a configuration. `message` is the
/// cleaned text shown in place of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormatError {
    pub message: String,
}

/// Raw failure reported by a formatter, before message cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormatterFailure {
    pub message: String,
}

impl FormatterFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to read file!\n\n{0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to read file!\n\n{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Form input that cannot be turned into options or instants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("invalid hour12 value '{0}' (expected true or false)")]
    InvalidHour12(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid {what} '{value}'")]
    InvalidDate { what: &'static str, value: String },
}
