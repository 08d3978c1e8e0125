//! Alias resolution: map canonical fields to the headers of a loaded table.
//!
//! Matching is case-insensitive and ignores surrounding whitespace. For each
//! field an exact pass runs first; only if it finds nothing does a substring
//! pass run, so `合理` still finds `合理價`. Within a pass the first header in
//! file order wins.
//!
//! Substring matches, excludes included, must sit on a word boundary wherever
//! the term starts or ends with an ASCII letter or digit: `date` matches
//! `close_date` but not `updated close`. CJK terms match anywhere.

use crate::schema::{ColumnSpec, Field};
use serde::Serialize;
use std::collections::BTreeMap;

/// A header that was matched to a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    /// Header text exactly as it appears in the file.
    pub header: String,
    /// Zero-based column position.
    pub index: usize,
    /// True when the header equals an alias, false for a substring match.
    pub exact: bool,
}

/// Canonical field → actual header found in the input table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    columns: BTreeMap<Field, ResolvedColumn>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, column: ResolvedColumn) {
        self.columns.insert(field, column);
    }

    pub fn get(&self, field: Field) -> Option<&ResolvedColumn> {
        self.columns.get(&field)
    }

    pub fn header(&self, field: Field) -> Option<&str> {
        self.columns.get(&field).map(|c| c.header.as_str())
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).map(|c| c.index)
    }

    pub fn is_mapped(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// Mapped fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &ResolvedColumn)> {
        self.columns.iter().map(|(f, c)| (*f, c))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Required fields with no matching header, in spec order.
    pub fn missing_required(&self, specs: &[ColumnSpec]) -> Vec<Field> {
        specs
            .iter()
            .filter(|s| s.required && !self.is_mapped(s.field))
            .map(|s| s.field)
            .collect()
    }
}

/// Normalize a header or alias for comparison.
///
/// Strips a UTF-8 byte order mark, trims whitespace and lower-cases.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Resolve every spec against the header row.
pub fn resolve_columns<S: AsRef<str>>(headers: &[S], specs: &[ColumnSpec]) -> ColumnMapping {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
    let mut mapping = ColumnMapping::new();

    for spec in specs {
        match resolve_one(&normalized, spec) {
            Some((index, exact)) => {
                let header = headers[index].as_ref().to_string();
                tracing::debug!(field = %spec.field, header = %header, exact, "resolved column");
                mapping.insert(spec.field, ResolvedColumn { header, index, exact });
            }
            None => {
                tracing::debug!(field = %spec.field, required = spec.required, "no matching column");
            }
        }
    }

    mapping
}

/// Find the header for one spec. Returns `(index, exact)`.
fn resolve_one(normalized: &[String], spec: &ColumnSpec) -> Option<(usize, bool)> {
    let aliases: Vec<String> = spec
        .aliases
        .iter()
        .map(|a| normalize_header(a))
        .filter(|a| !a.is_empty())
        .collect();
    let excludes: Vec<String> = spec
        .excludes
        .iter()
        .map(|e| normalize_header(e))
        .filter(|e| !e.is_empty())
        .collect();

    let candidates = || {
        normalized
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty() && !excludes.iter().any(|e| contains_term(h, e)))
    };

    if let Some((i, _)) = candidates().find(|(_, h)| aliases.iter().any(|a| a == *h)) {
        return Some((i, true));
    }

    candidates()
        .find(|(_, h)| aliases.iter().any(|a| contains_term(h, a)))
        .map(|(i, _)| (i, false))
}

/// True when `term` occurs in `haystack` without running into an adjacent
/// ASCII word character on an ASCII-word edge of the term.
fn contains_term(haystack: &str, term: &str) -> bool {
    let is_word = |c: char| c.is_ascii_alphanumeric();
    let (Some(first), Some(last)) = (term.chars().next(), term.chars().last()) else {
        return false;
    };
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let open = !is_word(first) || !haystack[..start].chars().last().is_some_and(is_word);
        let close = !is_word(last) || !haystack[end..].chars().next().is_some_and(is_word);
        open && close
    })
}
