//! Cell references and reference extraction.
//!
//! A cell reference is the textual address of a cell: one or more ASCII
//! uppercase letters (the column) followed by one or more ASCII digits (the
//! row), e.g. `A1` or `AB12`.
//!
//! # Extraction Rules
//!
//! `extract_refs` scans a formula text and returns every distinct reference
//! it mentions, in first-occurrence order:
//!
//! - A reference is a maximal uppercase-letter run immediately followed by a
//!   digit run. A letter run with no digits after it (a function name like
//!   `SUM`) is not a reference.
//! - Lowercase letters never start a reference, so `a1` is plain text.
//! - There is no validation that a referenced cell exists.
//! - Malformed or non-matching text yields an empty set.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The textual address of a cell, e.g. `A1`.
///
/// The engine treats references as opaque keys once extracted; only the
/// extractor cares about their shape. Construction does not validate, so a
/// reference can name a cell that was never written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellRef(String);

impl CellRef {
    /// Create a reference from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CellRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Extract the distinct cell references mentioned in a formula text.
///
/// Returns them in first-occurrence order: `"=A1+B2+A1"` yields `[A1, B2]`.
///
/// The scan is a single pass over the bytes. When an uppercase run is not
/// followed by a digit, the run is discarded and scanning resumes after it,
/// which matches what a global `[A-Z]+[0-9]+` pattern would find.
pub fn extract_refs(formula: &str) -> IndexSet<CellRef> {
    let mut refs = IndexSet::new();
    let bytes = formula.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_uppercase() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_uppercase() {
                i += 1;
            }
            let letters_end = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i > letters_end {
                refs.insert(CellRef::new(&formula[start..i]));
            }
        } else {
            i += 1;
        }
    }

    refs
}
