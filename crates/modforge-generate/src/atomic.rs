use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Replace `path` with `data` through a sibling temp file and a rename.
///
/// The temp file is removed again when writing or renaming fails.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp_path = temp_path(path)?;
    if let Err(err) = write_and_rename(&tmp_path, path, data) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            sync_dir(parent)?;
        }
    }

    Ok(())
}

fn write_and_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(tmp_path, path)
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "invalid path for atomic write")
    })?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("modforge_atomic_{label}_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn replaces_existing_file() {
        let dir = temp_dir("replace");
        let path = dir.join("index.ts");
        fs::write(&path, "old").expect("write old");

        write_bytes_atomic(&path, b"new").expect("atomic write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "new");
        assert!(!dir.join("index.ts.tmp").exists());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = temp_dir("rename_fails");
        let path = dir.join("index.ts");
        fs::create_dir_all(path.join("occupied")).expect("create blocking dir");

        let err = write_bytes_atomic(&path, b"export {};\n").unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(!dir.join("index.ts.tmp").exists(), "temp file left behind");
        assert!(path.join("occupied").is_dir());
    }
}
