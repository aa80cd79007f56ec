//! Formula References
//!
//! This module owns the textual side of the engine: the `CellRef` identifier
//! type and the extraction of references from a formula text.
//!
//! # Overview
//!
//! The engine never evaluates formulas. The only thing it reads out of a
//! formula text is *which other cells it mentions* - that set becomes the
//! cell's outgoing dependency edges. Extraction is a pure lexical scan with
//! no error conditions: text that mentions no references simply yields an
//! empty set.

mod refs;

pub use refs::{extract_refs, CellRef};
