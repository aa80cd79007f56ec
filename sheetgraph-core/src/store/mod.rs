//! Dependency Store
//!
//! This module maintains, per spreadsheet, the current cell records and the
//! edge set `cell -> {cells it depends on}`.
//!
//! # Overview
//!
//! The store is the write path of the engine. Every formula or value
//! mutation flows through it:
//!
//! - Setting a literal value clears the cell's formula and its outgoing
//!   edges.
//! - Setting a formula runs the reference extractor and replaces the cell's
//!   outgoing edge set with the extracted references, atomically with the
//!   record write.
//!
//! The read path (`all_edges`, `formula_cells`) hands the planner a full
//! snapshot of one spreadsheet; no graph state is cached between queries.
//!
//! # Persistence Boundary
//!
//! Durable storage is an external collaborator behind the
//! [`StorageBackend`] trait. The crate ships [`MemoryBackend`], a concurrent
//! in-memory implementation used by tests and embedders that do not need
//! durability. All blocking happens inside the backend; the store itself
//! adds no locking of its own.

mod backend;
mod dependency;
mod memory;

pub use backend::{CellRecord, Edge, SpreadsheetId, StorageBackend};
pub use dependency::DependencyStore;
pub use memory::MemoryBackend;
