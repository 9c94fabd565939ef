use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Position inside one schema fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Core error type shared across modforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema location does not exist.
    #[error("schema location not found: {}", .0.display())]
    SchemaNotFound(PathBuf),
    /// The schema location holds no schema fragments.
    #[error("no schema fragments found in {}", .0.display())]
    EmptySchema(PathBuf),
    /// The schema text could not be parsed.
    #[error("schema syntax error at {location}: {message}")]
    SchemaSyntax {
        location: SourceLocation,
        message: String,
    },
    /// No declared model matches the requested name.
    #[error("model not found in schema: {0}")]
    ModelNotFound(String),
    /// Several models match the requested name when case is ignored.
    #[error("model name {name} is ambiguous, candidates: {}", .candidates.join(", "))]
    AmbiguousModel {
        name: String,
        candidates: Vec<String>,
    },
    /// The module name is not a bare identifier.
    #[error("invalid module name: {0:?} (expected a bare identifier)")]
    InvalidModuleName(String),
    /// The descriptor violates internal invariants.
    #[error("invalid model descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by modforge crates.
pub type Result<T> = std::result::Result<T, Error>;
