//! Error taxonomy for the engine.
//!
//! Three local failure modes and one propagated one:
//!
//! - [`EngineError::CellNotFound`] - lookup of a cell that was never written.
//! - [`EngineError::MissingChangedCell`] - a recalculation order was
//!   requested without naming the changed cell.
//! - [`EngineError::Cycle`] - the dependency data contains a cycle reachable
//!   from the changed cell. This is a structural property of the data, not a
//!   transient fault: it is always surfaced with the participating cells and
//!   never "fixed" by picking an arbitrary order.
//! - [`EngineError::Storage`] - a persistence backend fault, propagated
//!   unchanged. The core performs no retries since none of its failure modes
//!   are transient.

use serde::Serialize;
use thiserror::Error;

use crate::formula::CellRef;
use crate::store::SpreadsheetId;

/// A dependency cycle discovered while planning a recalculation.
///
/// `cells` holds the participating cells in traversal order, deduplicated.
/// The same edge set and changed cell always produce the same report, so
/// callers can display or compare it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("cycle detected involving cells {}", join_refs(.cells))]
pub struct CycleError {
    /// The cells on the detected cycle.
    pub cells: Vec<CellRef>,
}

fn join_refs(cells: &[CellRef]) -> String {
    cells
        .iter()
        .map(CellRef::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A fault raised by the persistence backend.
///
/// The core treats every backend fault as opaque: it carries the message
/// (and optionally the backend's own error as a source) to the caller
/// without interpreting it.
#[derive(Debug, Error)]
#[error("storage backend failure: {message}")]
pub struct StorageError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// A fault described only by a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A fault wrapping the backend's own error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Any failure surfaced by an engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Lookup of a cell that was never written. Surfaced, not retried.
    #[error("cell {cell} not found in spreadsheet {spreadsheet}")]
    CellNotFound {
        /// The spreadsheet that was queried.
        spreadsheet: SpreadsheetId,
        /// The cell that is missing.
        cell: CellRef,
    },

    /// A recalculation order was requested without a changed cell id.
    /// Caller error; surfaced, not retried.
    #[error("changed cell id is required to compute a recalculation order")]
    MissingChangedCell,

    /// The dependency data contains a cycle reachable from the changed cell.
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// The persistence backend failed; propagated unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
