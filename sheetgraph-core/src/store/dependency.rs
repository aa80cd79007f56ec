//! The dependency store: keeps cell records and edge sets in lockstep.

use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

use super::backend::{CellRecord, Edge, SpreadsheetId, StorageBackend};
use crate::error::EngineError;
use crate::formula::{extract_refs, CellRef};

/// The write-path component of the engine.
///
/// Every mutation of a cell goes through here so that the cell's record and
/// its outgoing edge set can never drift apart: both are handed to the
/// backend in a single [`StorageBackend::write_cell`] call.
///
/// The store holds no graph state. Read-path consumers take a fresh edge
/// snapshot via [`all_edges`](Self::all_edges) per query.
pub struct DependencyStore<B> {
    backend: B,
}

impl<B: StorageBackend> DependencyStore<B> {
    /// Wrap a storage backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Upsert the cell as a pure literal: value set, formula cleared, zero
    /// outgoing edges.
    pub fn set_value(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
        value: Value,
    ) -> Result<(), EngineError> {
        self.backend
            .write_cell(sheet, cell, CellRecord::literal(value), IndexSet::new())?;
        debug!(%sheet, %cell, "literal value written, edges cleared");
        Ok(())
    }

    /// Upsert the cell as a formula: text set, value cleared, and the
    /// outgoing edge set replaced with the references extracted from the
    /// text.
    ///
    /// A self-reference is kept as an edge on purpose - the planner reports
    /// it as a 1-cycle rather than the store silently dropping it.
    ///
    /// Returns the extracted references so callers can report them.
    pub fn set_formula(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
        formula: &str,
    ) -> Result<IndexSet<CellRef>, EngineError> {
        let refs = extract_refs(formula);
        self.backend
            .write_cell(sheet, cell, CellRecord::formula(formula), refs.clone())?;
        debug!(%sheet, %cell, refs = refs.len(), "formula written, edges replaced");
        Ok(refs)
    }

    /// The stored record for a cell, or `CellNotFound` if it was never
    /// written.
    pub fn get_cell(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
    ) -> Result<CellRecord, EngineError> {
        self.backend
            .fetch_cell(sheet, cell)?
            .ok_or_else(|| EngineError::CellNotFound {
                spreadsheet: sheet.clone(),
                cell: cell.clone(),
            })
    }

    /// The cells this cell's formula currently references, straight from
    /// the stored edge rows. No graph is built for this query.
    pub fn precedents(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
    ) -> Result<Vec<CellRef>, EngineError> {
        Ok(self.backend.cell_edges(sheet, cell)?)
    }

    /// The full edge set for a spreadsheet, consumed by the planner.
    pub fn all_edges(&self, sheet: &SpreadsheetId) -> Result<Vec<Edge>, EngineError> {
        Ok(self.backend.scan_edges(sheet)?)
    }

    /// The cells of a spreadsheet that currently carry a formula.
    pub fn formula_cells(&self, sheet: &SpreadsheetId) -> Result<IndexSet<CellRef>, EngineError> {
        Ok(self.backend.formula_cells(sheet)?)
    }
}
