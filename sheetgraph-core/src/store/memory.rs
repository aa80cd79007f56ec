//! In-memory storage backend.
//!
//! Reference implementation of [`StorageBackend`] for tests and for
//! embedders that do not need durability.
//!
//! # Concurrency
//!
//! State is a `DashMap` keyed by spreadsheet. Every mutation goes through
//! the spreadsheet's entry, so the record write and the edge replacement of
//! `write_cell` happen under one shard lock - that is the whole atomicity
//! story. Writes to different spreadsheets never contend.
//!
//! # Determinism
//!
//! Edge sets are kept in `IndexMap`/`IndexSet`, so `scan_edges` returns
//! edges in insertion order. The planner inherits that order, which keeps
//! recalculation plans and cycle reports stable across identical calls.

use std::collections::HashMap;

use dashmap::DashMap;
use indexmap::{IndexMap, IndexSet};

use super::backend::{CellRecord, Edge, SpreadsheetId, StorageBackend};
use crate::error::StorageError;
use crate::formula::CellRef;

/// Per-spreadsheet state: cell records plus the outgoing edge sets.
#[derive(Debug, Default)]
struct SheetState {
    cells: HashMap<CellRef, CellRecord>,
    edges: IndexMap<CellRef, IndexSet<CellRef>>,
}

/// Concurrent in-memory backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sheets: DashMap<SpreadsheetId, SheetState>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn write_cell(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
        record: CellRecord,
        depends_on: IndexSet<CellRef>,
    ) -> Result<(), StorageError> {
        let mut state = self.sheets.entry(sheet.clone()).or_default();
        state.cells.insert(cell.clone(), record);
        if depends_on.is_empty() {
            state.edges.shift_remove(cell);
        } else {
            state.edges.insert(cell.clone(), depends_on);
        }
        Ok(())
    }

    fn fetch_cell(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
    ) -> Result<Option<CellRecord>, StorageError> {
        Ok(self
            .sheets
            .get(sheet)
            .and_then(|state| state.cells.get(cell).cloned()))
    }

    fn cell_edges(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
    ) -> Result<Vec<CellRef>, StorageError> {
        Ok(self
            .sheets
            .get(sheet)
            .and_then(|state| {
                state
                    .edges
                    .get(cell)
                    .map(|targets| targets.iter().cloned().collect())
            })
            .unwrap_or_default())
    }

    fn scan_edges(&self, sheet: &SpreadsheetId) -> Result<Vec<Edge>, StorageError> {
        let Some(state) = self.sheets.get(sheet) else {
            return Ok(Vec::new());
        };
        let mut edges = Vec::new();
        for (cell, targets) in &state.edges {
            for target in targets {
                edges.push(Edge {
                    cell: cell.clone(),
                    depends_on: target.clone(),
                });
            }
        }
        Ok(edges)
    }

    fn formula_cells(&self, sheet: &SpreadsheetId) -> Result<IndexSet<CellRef>, StorageError> {
        let Some(state) = self.sheets.get(sheet) else {
            return Ok(IndexSet::new());
        };
        Ok(state
            .cells
            .iter()
            .filter(|(_, record)| record.has_formula())
            .map(|(cell, _)| cell.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sheet() -> SpreadsheetId {
        SpreadsheetId::new("s1")
    }

    fn refs(ids: &[&str]) -> IndexSet<CellRef> {
        ids.iter().map(|id| CellRef::new(*id)).collect()
    }

    #[test]
    fn write_then_fetch_roundtrips() {
        let backend = MemoryBackend::new();
        backend
            .write_cell(
                &sheet(),
                &CellRef::new("A1"),
                CellRecord::literal(json!(5)),
                IndexSet::new(),
            )
            .unwrap();

        let record = backend.fetch_cell(&sheet(), &CellRef::new("A1")).unwrap();
        assert_eq!(record, Some(CellRecord::literal(json!(5))));
    }

    #[test]
    fn fetch_of_unknown_cell_is_none() {
        let backend = MemoryBackend::new();
        assert!(backend
            .fetch_cell(&sheet(), &CellRef::new("Z9"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn write_replaces_the_whole_edge_set() {
        let backend = MemoryBackend::new();
        let b1 = CellRef::new("B1");

        backend
            .write_cell(&sheet(), &b1, CellRecord::formula("=A1+C1"), refs(&["A1", "C1"]))
            .unwrap();
        assert_eq!(
            backend.cell_edges(&sheet(), &b1).unwrap(),
            vec![CellRef::new("A1"), CellRef::new("C1")]
        );

        backend
            .write_cell(&sheet(), &b1, CellRecord::formula("=D1"), refs(&["D1"]))
            .unwrap();
        assert_eq!(
            backend.cell_edges(&sheet(), &b1).unwrap(),
            vec![CellRef::new("D1")]
        );
    }

    #[test]
    fn empty_edge_set_removes_the_row() {
        let backend = MemoryBackend::new();
        let b1 = CellRef::new("B1");

        backend
            .write_cell(&sheet(), &b1, CellRecord::formula("=A1"), refs(&["A1"]))
            .unwrap();
        backend
            .write_cell(&sheet(), &b1, CellRecord::literal(json!(2)), IndexSet::new())
            .unwrap();

        assert!(backend.cell_edges(&sheet(), &b1).unwrap().is_empty());
        assert!(backend.scan_edges(&sheet()).unwrap().is_empty());
    }

    #[test]
    fn scan_returns_edges_in_insertion_order() {
        let backend = MemoryBackend::new();
        backend
            .write_cell(
                &sheet(),
                &CellRef::new("B1"),
                CellRecord::formula("=A1"),
                refs(&["A1"]),
            )
            .unwrap();
        backend
            .write_cell(
                &sheet(),
                &CellRef::new("C1"),
                CellRecord::formula("=B1+A1"),
                refs(&["B1", "A1"]),
            )
            .unwrap();

        let edges = backend.scan_edges(&sheet()).unwrap();
        assert_eq!(
            edges,
            vec![
                Edge::new("B1", "A1"),
                Edge::new("C1", "B1"),
                Edge::new("C1", "A1"),
            ]
        );
    }

    #[test]
    fn spreadsheets_are_isolated() {
        let backend = MemoryBackend::new();
        let other = SpreadsheetId::new("s2");

        backend
            .write_cell(
                &sheet(),
                &CellRef::new("B1"),
                CellRecord::formula("=A1"),
                refs(&["A1"]),
            )
            .unwrap();

        assert!(backend.scan_edges(&other).unwrap().is_empty());
        assert!(backend
            .fetch_cell(&other, &CellRef::new("B1"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn formula_cells_tracks_only_formula_records() {
        let backend = MemoryBackend::new();
        backend
            .write_cell(
                &sheet(),
                &CellRef::new("A1"),
                CellRecord::literal(json!(1)),
                IndexSet::new(),
            )
            .unwrap();
        backend
            .write_cell(
                &sheet(),
                &CellRef::new("B1"),
                CellRecord::formula("=A1"),
                refs(&["A1"]),
            )
            .unwrap();

        let formulas = backend.formula_cells(&sheet()).unwrap();
        assert!(formulas.contains(&CellRef::new("B1")));
        assert!(!formulas.contains(&CellRef::new("A1")));
    }
}
