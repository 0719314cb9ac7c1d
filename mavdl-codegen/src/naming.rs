//! Identifier conversion for generated code.

use crate::error::CodegenError;
use mavdl_schema::EnumDef;
use std::collections::HashSet;
use std::path::Path;

/// Rust keywords that can be written as raw identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "Self", "super", "_"];

/// Converts an `UPPER_SNAKE` dialect name to PascalCase.
///
/// Each underscore-separated segment keeps its first character and
/// lowercases the rest. A leading digit gets an underscore prefix.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for segment in name.split('_').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if RESERVED.contains(&result.as_str()) {
        result.push('_');
    }
    result
}

/// Converts a name to snake_case, splitting on case changes.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower {
                result.push('_');
            }
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            result.push(c.to_ascii_lowercase());
        } else {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
        }
    }
    result
}

/// Returns the Rust identifier for a field name.
///
/// Keywords become raw identifiers; names that cannot be raw get an
/// underscore suffix.
#[must_use]
pub fn field_ident(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if RAW_KEYWORDS.contains(&lower.as_str()) {
        format!("r#{lower}")
    } else if RESERVED.contains(&lower.as_str()) {
        format!("{lower}_")
    } else if lower.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{lower}")
    } else {
        lower
    }
}

/// Returns the module name derived from a dialect file path.
#[must_use]
pub fn module_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize_module(&to_snake_case(&stem))
}

/// Turns an arbitrary string into a lowercase identifier usable as a module
/// or package name.
#[must_use]
pub fn sanitize_module(name: &str) -> String {
    let mut result: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if result.is_empty() {
        result.push_str("dialect");
    } else if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Returns the Rust variant names of an enum's entries, in entry order.
///
/// Entries drop the `ENUM_NAME_` prefix when what remains starts with a
/// letter. If stripping makes two variants collide, every entry keeps its
/// full name instead.
///
/// # Errors
/// Returns `Generation` if even full names collide.
pub fn variant_names(enum_def: &EnumDef) -> Result<Vec<String>, CodegenError> {
    let prefix = format!("{}_", enum_def.name);
    let stripped: Vec<String> = enum_def
        .entries
        .iter()
        .map(|entry| match entry.name.strip_prefix(&prefix) {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                to_pascal_case(rest)
            }
            _ => to_pascal_case(&entry.name),
        })
        .collect();
    if all_distinct(&stripped) {
        return Ok(stripped);
    }

    let full: Vec<String> = enum_def
        .entries
        .iter()
        .map(|entry| to_pascal_case(&entry.name))
        .collect();
    if all_distinct(&full) {
        return Ok(full);
    }
    Err(CodegenError::generation(format!(
        "entries of enum {} map to clashing Rust identifiers",
        enum_def.name
    )))
}

fn all_distinct(names: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(names.len());
    names.iter().all(|n| seen.insert(n.as_str()))
}
