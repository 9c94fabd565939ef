use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the module generation pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Core(#[from] modforge_core::Error),
    #[error("module already exists: {}", .0.display())]
    ModuleAlreadyExists(PathBuf),
    #[error("router index file not found: {}", .0.display())]
    RouterIndexMissing(PathBuf),
    #[error("no import statement to anchor on in {}", .0.display())]
    NoImportAnchor(PathBuf),
    #[error("route table `{table}` not found in {}", .path.display())]
    NoRouteTableAnchor { path: PathBuf, table: String },
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid anchor pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    pub(crate) fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}
