//! Service Operations
//!
//! The surface the transport layer calls into, one operation per route of
//! the surrounding service:
//!
//! - set a cell's literal value
//! - set a cell's formula
//! - get a cell's current value/formula
//! - get a cell's direct dependency targets (precedents)
//! - get the recalculation order for a changed cell
//!
//! Payload types mirror the JSON bodies the service returns, so the
//! transport can serialize them as-is. The service owns no state beyond the
//! store: the recalculation read path rebuilds the graph from a fresh edge
//! snapshot on every query.

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::formula::CellRef;
use crate::graph::RecalcPlanner;
use crate::store::{DependencyStore, SpreadsheetId, StorageBackend};

/// Outcome tag for a write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStatus {
    /// The cell now holds a literal value.
    ValueSet,
    /// The cell now holds a formula.
    FormulaSet,
}

/// Response to setting a literal value.
#[derive(Debug, Clone, Serialize)]
pub struct ValueWritten {
    /// The written cell.
    pub cell_id: CellRef,
    /// The stored value, echoed back.
    pub value: Value,
    /// Always `value_set`.
    pub status: WriteStatus,
}

/// Response to setting a formula.
#[derive(Debug, Clone, Serialize)]
pub struct FormulaWritten {
    /// The written cell.
    pub cell_id: CellRef,
    /// The stored formula text, echoed back.
    pub formula_string: String,
    /// Always `formula_set`.
    pub status: WriteStatus,
    /// The references extracted from the formula, i.e. the cell's new
    /// outgoing edges.
    pub dependencies_identified: Vec<CellRef>,
}

/// A cell's current state.
#[derive(Debug, Clone, Serialize)]
pub struct CellState {
    /// The queried cell.
    pub cell_id: CellRef,
    /// The literal value, for value cells.
    pub value: Option<Value>,
    /// The formula text, for formula cells.
    pub formula_string: Option<String>,
}

/// An ordered recalculation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecalcOrder {
    /// Cell ids in recomputation order: every cell comes after all of its
    /// precedents that are also in the sequence.
    pub order: Vec<CellRef>,
}

/// The engine composed behind a storage backend.
///
/// Thin by design: each operation is extractor + store + planner glued
/// together, plus the payload shaping the transport expects.
pub struct SpreadsheetService<B> {
    store: DependencyStore<B>,
}

impl<B: StorageBackend> SpreadsheetService<B> {
    /// Build a service on top of a storage backend.
    pub fn new(backend: B) -> Self {
        Self {
            store: DependencyStore::new(backend),
        }
    }

    /// Access the underlying dependency store.
    pub fn store(&self) -> &DependencyStore<B> {
        &self.store
    }

    /// Set or update a cell's literal value.
    ///
    /// The cell becomes a pure literal: formula cleared, zero outgoing
    /// edges.
    pub fn set_cell_value(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
        value: Value,
    ) -> Result<ValueWritten, EngineError> {
        self.store.set_value(sheet, cell, value.clone())?;
        Ok(ValueWritten {
            cell_id: cell.clone(),
            value,
            status: WriteStatus::ValueSet,
        })
    }

    /// Set or update a cell's formula.
    ///
    /// Returns the extracted dependencies so the caller can observe which
    /// edges were written.
    pub fn set_cell_formula(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
        formula: &str,
    ) -> Result<FormulaWritten, EngineError> {
        let refs = self.store.set_formula(sheet, cell, formula)?;
        Ok(FormulaWritten {
            cell_id: cell.clone(),
            formula_string: formula.to_string(),
            status: WriteStatus::FormulaSet,
            dependencies_identified: refs.into_iter().collect(),
        })
    }

    /// Get a cell's current value/formula pair.
    pub fn cell(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
    ) -> Result<CellState, EngineError> {
        let record = self.store.get_cell(sheet, cell)?;
        Ok(CellState {
            cell_id: cell.clone(),
            value: record.value,
            formula_string: record.formula,
        })
    }

    /// Get the cells a cell's formula currently references.
    pub fn cell_precedents(
        &self,
        sheet: &SpreadsheetId,
        cell: &CellRef,
    ) -> Result<Vec<CellRef>, EngineError> {
        self.store.precedents(sheet, cell)
    }

    /// Compute the recalculation order for a changed cell.
    ///
    /// `None` for the changed cell is a caller error
    /// ([`EngineError::MissingChangedCell`]); a cycle reachable from the
    /// change surfaces as [`EngineError::Cycle`] with the offending cells.
    pub fn recalculation_order(
        &self,
        sheet: &SpreadsheetId,
        changed: Option<&CellRef>,
    ) -> Result<RecalcOrder, EngineError> {
        let changed = changed.ok_or(EngineError::MissingChangedCell)?;

        let edges = self.store.all_edges(sheet)?;
        let formula_cells: IndexSet<CellRef> = self.store.formula_cells(sheet)?;
        let planner = RecalcPlanner::build(&edges);

        match planner.plan(changed, &formula_cells) {
            Ok(order) => {
                debug!(%sheet, %changed, cells = order.len(), "recalculation order computed");
                Ok(RecalcOrder { order })
            }
            Err(cycle) => {
                warn!(%sheet, %changed, cells = ?cycle.cells, "recalculation aborted, cycle detected");
                Err(EngineError::Cycle(cycle))
            }
        }
    }
}
