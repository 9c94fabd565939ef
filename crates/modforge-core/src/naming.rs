use crate::error::{Error, Result};

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// English plural of a lower-case word, good enough for route segments.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if word.ends_with("ss")
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        let consonant_before = stem
            .chars()
            .last()
            .map(|c| !matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
            .unwrap_or(false);
        if consonant_before {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

/// Route path registered for a module: `/` + lower-cased plural.
pub fn route_path(module: &str) -> String {
    format!("/{}", pluralize(&module.to_lowercase()))
}

/// Module names are used verbatim as identifiers and path segments.
pub fn validate_module_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_head = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if valid_head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(Error::InvalidModuleName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluralizes_common_endings() {
        assert_eq!(pluralize("invoice"), "invoices");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("branch"), "branches");
        assert_eq!(pluralize("news"), "news");
    }

    #[test]
    fn capitalizes_first_letter_only() {
        assert_eq!(capitalize("invoiceLine"), "InvoiceLine");
        assert_eq!(capitalize(""), "");
    }
}
