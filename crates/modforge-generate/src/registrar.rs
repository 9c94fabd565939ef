//! Route registration in the central router index.
//!
//! The index is handled as a document with two anchors: the last import
//! statement and the closing bracket of the route table. Everything else in the
//! file is preserved byte for byte. Text inside comments and string literals
//! never counts as an import or a table declaration.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{info, warn};

use modforge_core::route_path;

use crate::atomic::write_bytes_atomic;
use crate::errors::GenerationError;
use crate::model::RegistrationOutcome;

/// Import statement and table entry that register one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRegistration {
    pub route_path: String,
    /// Router binding exported by the module's routes artifact.
    pub route_binding: String,
    pub import_statement: String,
}

impl RouteRegistration {
    pub fn for_module(module: &str, import_prefix: &str) -> Self {
        let route_binding = format!("{module}Routes");
        let prefix = import_prefix.trim_end_matches('/');
        let import_statement =
            format!("import {{ {route_binding} }} from '{prefix}/{module}/{module}.routes';");
        Self {
            route_path: route_path(module),
            route_binding,
            import_statement,
        }
    }

    /// Table entry, one line per property, terminated by a newline.
    pub fn entry(&self, indent: &str) -> String {
        format!(
            "{indent}{{\n{indent}  path: '{}',\n{indent}  route: {},\n{indent}}},\n",
            self.route_path, self.route_binding
        )
    }
}

/// Located route table literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    /// Byte offset of the opening `[`.
    pub open: usize,
    /// Byte offset of the matching `]`.
    pub close: usize,
    /// `path` values of the existing entries.
    pub paths: Vec<String>,
}

/// Router index file held in memory between load and save.
#[derive(Debug, Clone)]
pub struct RouterIndex {
    path: PathBuf,
    text: String,
}

impl RouterIndex {
    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        if !path.is_file() {
            return Err(GenerationError::RouterIndexMissing(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(path, text))
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether `statement` occurs outside comments.
    pub fn contains_import(&self, statement: &str) -> bool {
        let masked = masked_spans(self.text.as_bytes());
        self.text
            .match_indices(statement)
            .any(|(offset, _)| !is_masked(&masked, offset))
    }

    /// Import statements in file order.
    pub fn imports(&self) -> Result<Vec<&str>, GenerationError> {
        let masked = masked_spans(self.text.as_bytes());
        Ok(code_imports(&self.text, &masked)?
            .into_iter()
            .map(|found| found.as_str().trim())
            .collect())
    }

    pub fn route_table(&self, table: &str) -> Result<Option<RouteTable>, GenerationError> {
        let masked = masked_spans(self.text.as_bytes());
        locate_route_table(&self.text, &masked, table)
    }

    /// Insert the import and table entry for `registration`.
    ///
    /// Nothing changes when the import statement is already present. Both
    /// anchors are resolved before the first edit, so a failure leaves the
    /// document untouched.
    pub fn register(
        &mut self,
        registration: &RouteRegistration,
        table: &str,
    ) -> Result<RegistrationOutcome, GenerationError> {
        if self.contains_import(&registration.import_statement) {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        let masked = masked_spans(self.text.as_bytes());
        let import_end = last_import_line_end(&self.text, &masked)?
            .ok_or_else(|| GenerationError::NoImportAnchor(self.path.clone()))?;
        let route_table = locate_route_table(&self.text, &masked, table)?.ok_or_else(|| {
            GenerationError::NoRouteTableAnchor {
                path: self.path.clone(),
                table: table.to_string(),
            }
        })?;

        let mut edits = vec![(import_end, format!("\n{}", registration.import_statement))];
        if route_table.paths.contains(&registration.route_path) {
            warn!(
                event = "route_path_taken",
                path = %registration.route_path,
                "route table already has an entry for this path; only the import is added"
            );
        } else {
            edits.extend(entry_edits(&self.text, &route_table, registration));
        }

        edits.sort_by(|left, right| right.0.cmp(&left.0));
        for (offset, insert) in edits {
            self.text.insert_str(offset, &insert);
        }

        Ok(RegistrationOutcome::Registered)
    }

    /// Rewrite the whole file.
    pub fn save(&self) -> Result<(), GenerationError> {
        write_bytes_atomic(&self.path, self.text.as_bytes())
            .map_err(|err| GenerationError::write_failure(&self.path, err))
    }
}

/// Load, register and save in one step.
pub fn register_route(
    router_index: &Path,
    registration: &RouteRegistration,
    table: &str,
) -> Result<RegistrationOutcome, GenerationError> {
    let mut index = RouterIndex::load(router_index)?;
    let outcome = index.register(registration, table)?;
    match outcome {
        RegistrationOutcome::Registered => {
            index.save()?;
            info!(
                event = "route_registered",
                path = %registration.route_path,
                file = %router_index.display()
            );
        }
        RegistrationOutcome::AlreadyRegistered | RegistrationOutcome::Skipped => {
            info!(
                event = "route_already_registered",
                path = %registration.route_path,
                file = %router_index.display()
            );
        }
    }
    Ok(outcome)
}

/// Single- or multi-line import statement starting at a line start.
fn import_pattern() -> Result<Regex, regex::Error> {
    Regex::new(r#"(?m)^[ \t]*import\b[^;]*?['"][^'"\n]*['"][ \t]*;?"#)
}

/// Import statements whose `import` keyword sits in code.
fn code_imports<'t>(
    text: &'t str,
    masked: &[Range<usize>],
) -> Result<Vec<regex::Match<'t>>, regex::Error> {
    Ok(import_pattern()?
        .find_iter(text)
        .filter(|found| {
            let indent = found.as_str().len() - found.as_str().trim_start().len();
            !is_masked(masked, found.start() + indent)
        })
        .collect())
}

/// Offset of the line break ending the last import statement.
///
/// A comment opened on that line pushes the anchor to the end of the line
/// the comment closes on.
fn last_import_line_end(
    text: &str,
    masked: &[Range<usize>],
) -> Result<Option<usize>, regex::Error> {
    let Some(last) = code_imports(text, masked)?.pop() else {
        return Ok(None);
    };
    let mut end = last.end();
    loop {
        end = text[end..].find('\n').map_or(text.len(), |offset| end + offset);
        match masked.iter().find(|span| span.contains(&end)) {
            Some(span) => end = span.end,
            None => return Ok(Some(end)),
        }
    }
}

fn locate_route_table(
    text: &str,
    masked: &[Range<usize>],
    table: &str,
) -> Result<Option<RouteTable>, GenerationError> {
    let declaration = Regex::new(&format!(
        r"\b{}\b\s*(?::[^=\n]*)?=\s*\[",
        regex::escape(table)
    ))?;
    let Some(found) = declaration
        .find_iter(text)
        .find(|found| !is_masked(masked, found.start()))
    else {
        return Ok(None);
    };
    let open = found.end() - 1;
    let Some(close) = matching_bracket(text.as_bytes(), open) else {
        return Ok(None);
    };

    let entry_path = Regex::new(r#"\bpath\s*:\s*['"]([^'"]*)['"]"#)?;
    let paths = entry_path
        .captures_iter(&text[open..close])
        .map(|captures| captures[1].to_string())
        .collect();
    Ok(Some(RouteTable { open, close, paths }))
}

/// Entry insertion before the closing bracket, plus a separating comma when
/// the previous element lacks one.
fn entry_edits(
    text: &str,
    table: &RouteTable,
    registration: &RouteRegistration,
) -> Vec<(usize, String)> {
    let line_start = text[..table.close].rfind('\n').map_or(0, |offset| offset + 1);
    let before_close = &text[line_start..table.close];
    let close_indent: String = before_close
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();
    let entry = registration.entry(&format!("{close_indent}  "));

    let (offset, insert) = if before_close.trim().is_empty() {
        (line_start, entry)
    } else {
        (table.close, format!("\n{entry}{close_indent}"))
    };

    let mut edits = vec![(offset, insert)];
    if let Some(last) = last_significant(text.as_bytes(), table.open + 1, offset) {
        if text.as_bytes()[last] != b',' {
            edits.push((last + 1, ",".to_string()));
        }
    }
    edits
}

/// Byte ranges of comments and string literals, in file order.
fn masked_spans(bytes: &[u8]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                let end = skip_string(bytes, i).unwrap_or(bytes.len());
                spans.push(i..end);
                i = end;
            }
            b'/' => match skip_comment(bytes, i) {
                Some(end) => {
                    spans.push(i..end);
                    i = end;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    spans
}

fn is_masked(spans: &[Range<usize>], offset: usize) -> bool {
    spans.iter().any(|span| span.contains(&offset))
}

/// Offset of the bracket closing the one at `open`, skipping strings and comments.
fn matching_bracket(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'[' | b'{' | b'(' => depth += 1,
            b']' | b'}' | b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (bytes[i] == b']').then_some(i);
                }
            }
            b'\'' | b'"' | b'`' => {
                i = skip_string(bytes, i)?;
                continue;
            }
            b'/' => {
                if let Some(next) = skip_comment(bytes, i) {
                    i = next;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Last byte in `from..to` that is neither whitespace nor comment.
fn last_significant(bytes: &[u8], from: usize, to: usize) -> Option<usize> {
    let mut last = None;
    let mut i = from;
    while i < to {
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                let end = skip_string(bytes, i)?.min(to);
                last = Some(end - 1);
                i = end;
                continue;
            }
            b'/' => {
                if let Some(next) = skip_comment(bytes, i) {
                    i = next;
                    continue;
                }
                last = Some(i);
            }
            c if c.is_ascii_whitespace() => {}
            _ => last = Some(i),
        }
        i += 1;
    }
    last
}

/// Offset just past the string literal starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Offset just past the comment starting at `start`, if one starts there.
fn skip_comment(bytes: &[u8], start: usize) -> Option<usize> {
    match bytes.get(start + 1) {
        Some(b'/') => Some(
            bytes[start..]
                .iter()
                .position(|b| *b == b'\n')
                .map_or(bytes.len(), |offset| start + offset),
        ),
        Some(b'*') => Some(
            bytes[start + 2..]
                .windows(2)
                .position(|window| window == b"*/")
                .map_or(bytes.len(), |offset| start + 2 + offset + 2),
        ),
        _ => None,
    }
}
