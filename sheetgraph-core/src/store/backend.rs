//! Storage types and the persistence collaborator interface.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::formula::CellRef;

/// Opaque identifier of a spreadsheet.
///
/// The core never interprets it; it is only a key into the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpreadsheetId(String);

impl SpreadsheetId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpreadsheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpreadsheetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SpreadsheetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The stored state of one cell: a literal value or a formula, never both.
///
/// Exactly one of `value`/`formula` is meaningful at a time; the
/// constructors keep that invariant, and every write goes through them.
/// Cells are created lazily on first write and never deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// The literal value, for value cells.
    pub value: Option<Value>,
    /// The formula text, for formula cells.
    pub formula: Option<String>,
}

impl CellRecord {
    /// A record holding a literal value and no formula.
    pub fn literal(value: Value) -> Self {
        Self {
            value: Some(value),
            formula: None,
        }
    }

    /// A record holding a formula text and no value.
    pub fn formula(text: impl Into<String>) -> Self {
        Self {
            value: None,
            formula: Some(text.into()),
        }
    }

    /// Whether the cell currently carries a formula.
    pub fn has_formula(&self) -> bool {
        self.formula.is_some()
    }
}

/// A directed dependency edge within one spreadsheet.
///
/// Reads as "`cell`'s current formula references `depends_on`". Unique per
/// pair; the full outgoing set for a cell is always replaced together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// The formula cell owning the edge.
    pub cell: CellRef,
    /// The cell it references (one of its precedents).
    pub depends_on: CellRef,
}

impl Edge {
    /// Create an edge from `cell` to the cell it depends on.
    pub fn new(cell: impl Into<CellRef>, depends_on: impl Into<CellRef>) -> Self {
        Self {
            cell: cell.into(),
            depends_on: depends_on.into(),
        }
    }
}

/// The persistence collaborator interface.
///
/// A durable implementation maps these onto a keyed store: upsert, point
/// lookup by `(spreadsheet, cell)`, and a range scan of all edges for a
/// spreadsheet. [`MemoryBackend`](super::MemoryBackend) is the in-repo
/// reference implementation.
///
/// # Atomicity Contract
///
/// `write_cell` must apply the record upsert and the edge-set replacement as
/// one unit: no concurrent reader may observe the new record with the old
/// edges, or the old record with the new edges. A transactional backend
/// implements it as a single transaction; `MemoryBackend` holds the
/// spreadsheet's entry lock across both writes.
pub trait StorageBackend: Send + Sync {
    /// Upsert a cell record and replace its outgoing edge set atomically.
    ///
    /// An empty `depends_on` set removes every outgoing edge for the cell.
    fn write_cell(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
        record: CellRecord,
        depends_on: IndexSet<CellRef>,
    ) -> Result<(), StorageError>;

    /// Point lookup of one cell record. `None` if the cell was never
    /// written.
    fn fetch_cell(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
    ) -> Result<Option<CellRecord>, StorageError>;

    /// The outgoing edge targets for one cell, in stored order. Empty for a
    /// cell with no edges (or never written).
    fn cell_edges(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
    ) -> Result<Vec<CellRef>, StorageError>;

    /// Range scan of every edge in a spreadsheet, in stored order.
    fn scan_edges(&self, sheet: &SpreadsheetId) -> Result<Vec<Edge>, StorageError>;

    /// The cells of a spreadsheet that currently carry a formula.
    fn formula_cells(&self, sheet: &SpreadsheetId) -> Result<IndexSet<CellRef>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_record_has_no_formula() {
        let record = CellRecord::literal(json!(5));
        assert_eq!(record.value, Some(json!(5)));
        assert!(record.formula.is_none());
        assert!(!record.has_formula());
    }

    #[test]
    fn formula_record_has_no_value() {
        let record = CellRecord::formula("=A1+1");
        assert!(record.value.is_none());
        assert_eq!(record.formula.as_deref(), Some("=A1+1"));
        assert!(record.has_formula());
    }

    #[test]
    fn edge_builds_from_string_likes() {
        let edge = Edge::new("B1", "A1");
        assert_eq!(edge.cell, CellRef::new("B1"));
        assert_eq!(edge.depends_on, CellRef::new("A1"));
    }
}
