use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::GenerationError;
use crate::model::{ArtifactKind, ModuleArtifactBundle};

/// Paths the bundle is written to, in write order.
pub fn artifact_paths(module_dir: &Path, module: &str, extension: &str) -> Vec<(ArtifactKind, PathBuf)> {
    ArtifactKind::ALL
        .into_iter()
        .map(|kind| (kind, module_dir.join(kind.file_name(module, extension))))
        .collect()
}

/// Create `module_dir` and write every artifact into it.
///
/// Fails without touching anything when the directory already exists. Files
/// written before an I/O failure stay on disk.
pub fn materialize(
    module_dir: &Path,
    module: &str,
    extension: &str,
    bundle: &ModuleArtifactBundle,
) -> Result<Vec<PathBuf>, GenerationError> {
    if module_dir.exists() {
        return Err(GenerationError::ModuleAlreadyExists(module_dir.to_path_buf()));
    }

    if let Some(parent) = module_dir.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| GenerationError::write_failure(parent, err))?;
        }
    }

    fs::create_dir(module_dir).map_err(|err| match err.kind() {
        ErrorKind::AlreadyExists => GenerationError::ModuleAlreadyExists(module_dir.to_path_buf()),
        _ => GenerationError::write_failure(module_dir, err),
    })?;

    let mut written = Vec::with_capacity(ArtifactKind::ALL.len());
    for (kind, path) in artifact_paths(module_dir, module, extension) {
        write_new_file(&path, bundle.text(kind))?;
        info!(event = "artifact_written", kind = %kind, path = %path.display());
        written.push(path);
    }

    Ok(written)
}

fn write_new_file(path: &Path, text: &str) -> Result<(), GenerationError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| GenerationError::write_failure(path, err))?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|err| GenerationError::write_failure(path, err))
}
