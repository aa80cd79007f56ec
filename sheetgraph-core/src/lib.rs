//! Sheetgraph Core
//!
//! This crate is the dependency-graph engine of the Sheetgraph spreadsheet
//! service. It implements:
//!
//! - Reference extraction from formula texts
//! - Incremental maintenance of per-cell dependency edges
//! - Reachability analysis from a changed cell
//! - Cycle detection and topological recalculation ordering
//!
//! It does *not* evaluate formulas: the engine only decides which other
//! cells a formula references and in what order cells must be recomputed
//! once evaluation is performed elsewhere. The HTTP transport and the
//! durable store are external collaborators - the transport calls
//! [`SpreadsheetService`], and durability lives behind the
//! [`StorageBackend`] trait ([`MemoryBackend`] is the in-repo reference
//! implementation).
//!
//! # Architecture
//!
//! The crate is organized into four modules:
//!
//! - `formula`: the `CellRef` identifier type and reference extraction
//! - `store`: cell records, dependency edges, and the storage boundary
//! - `graph`: the per-query recalculation planner
//! - `service`: the transport-facing operations and payloads
//!
//! Mutations flow extractor -> store (write path); recalculation queries
//! flow store -> planner over a fresh edge snapshot (read path). No graph
//! state survives between queries.
//!
//! # Example
//!
//! ```rust
//! use sheetgraph_core::{CellRef, MemoryBackend, SpreadsheetId, SpreadsheetService};
//!
//! let service = SpreadsheetService::new(MemoryBackend::new());
//! let sheet = SpreadsheetId::new("budget");
//!
//! service.set_cell_value(&sheet, &CellRef::new("A1"), 5.into()).unwrap();
//! service.set_cell_formula(&sheet, &CellRef::new("B1"), "=A1+1").unwrap();
//!
//! let plan = service
//!     .recalculation_order(&sheet, Some(&CellRef::new("A1")))
//!     .unwrap();
//! assert_eq!(plan.order, vec![CellRef::new("A1"), CellRef::new("B1")]);
//! ```

pub mod error;
pub mod formula;
pub mod graph;
pub mod service;
pub mod store;

pub use error::{CycleError, EngineError, StorageError};
pub use formula::{extract_refs, CellRef};
pub use graph::RecalcPlanner;
pub use service::{
    CellState, FormulaWritten, RecalcOrder, SpreadsheetService, ValueWritten, WriteStatus,
};
pub use store::{
    CellRecord, DependencyStore, Edge, MemoryBackend, SpreadsheetId, StorageBackend,
};
