use std::fs;
use std::path::{Path, PathBuf};

use modforge_core::{Error, Result, SourceLocation};
use tracing::debug;

/// File extension of schema fragments inside a schema directory.
pub const FRAGMENT_EXTENSION: &str = "prisma";

/// Concatenated text of every schema fragment, in a stable order.
#[derive(Debug, Clone)]
pub struct SchemaText {
    text: String,
    fragments: Vec<Fragment>,
}

#[derive(Debug, Clone)]
struct Fragment {
    path: PathBuf,
    first_line: usize,
    line_count: usize,
}

impl SchemaText {
    /// Join fragments in the given order. Each fragment starts on a fresh line.
    pub fn from_fragments(fragments: Vec<(PathBuf, String)>) -> Self {
        let mut text = String::new();
        let mut spans = Vec::with_capacity(fragments.len());
        let mut next_line = 1;

        for (path, content) in fragments {
            text.push_str(&content);
            let mut line_count = content.matches('\n').count();
            if !content.ends_with('\n') {
                text.push('\n');
                line_count += 1;
            }
            spans.push(Fragment {
                path,
                first_line: next_line,
                line_count,
            });
            next_line += line_count;
        }

        Self {
            text,
            fragments: spans,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Fragment paths in concatenation order.
    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.fragments.iter().map(|fragment| fragment.path.as_path())
    }

    /// Map a 1-based line of the concatenated text back to its fragment.
    pub fn locate(&self, line: usize, column: usize) -> SourceLocation {
        let fragment = self
            .fragments
            .iter()
            .find(|fragment| line < fragment.first_line + fragment.line_count)
            .or_else(|| self.fragments.last());

        match fragment {
            Some(fragment) => SourceLocation {
                file: fragment.path.clone(),
                line: line.saturating_sub(fragment.first_line) + 1,
                column,
            },
            None => SourceLocation {
                file: PathBuf::new(),
                line,
                column,
            },
        }
    }
}

/// Load the schema from a fragment directory or a single schema file.
///
/// Directory fragments are read in lexicographic file-name order.
pub fn read_schema(location: &Path) -> Result<SchemaText> {
    if !location.exists() {
        return Err(Error::SchemaNotFound(location.to_path_buf()));
    }

    let paths = if location.is_dir() {
        let mut paths = Vec::new();
        for entry in fs::read_dir(location)? {
            let path = entry?.path();
            let is_fragment = path
                .extension()
                .map(|ext| ext == FRAGMENT_EXTENSION)
                .unwrap_or(false);
            if is_fragment && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort_by(|left, right| left.file_name().cmp(&right.file_name()));
        paths
    } else {
        vec![location.to_path_buf()]
    };

    let mut fragments = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path)?;
        debug!(event = "schema_fragment_read", path = %path.display(), bytes = content.len());
        fragments.push((path, content));
    }

    if fragments
        .iter()
        .all(|(_, content)| content.trim().is_empty())
    {
        return Err(Error::EmptySchema(location.to_path_buf()));
    }

    Ok(SchemaText::from_fragments(fragments))
}
