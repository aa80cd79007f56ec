//! Recalculation Planner
//!
//! Given the full edge set of a spreadsheet and one changed cell, compute
//! the order in which formula cells must be recomputed, or report a cycle.
//!
//! # Algorithm
//!
//! 1. Build the forward adjacency from the edges:
//!    `depends_on -> [cells whose formulas reference it]`.
//! 2. Collect the reachable set: every cell transitively affected by the
//!    changed cell, the changed cell included.
//! 3. Depth-first topological sort of the reachable set over the forward
//!    adjacency, post-order, with three-color marking. Revisiting an
//!    in-progress cell is a cycle: the plan aborts and reports the cells on
//!    the in-progress path that close the loop. No partial order is ever
//!    returned.
//! 4. Reverse the post-order so each cell comes after every cell it depends
//!    on.
//! 5. Keep only cells that currently carry a formula, plus the changed cell
//!    itself (it triggered the plan, formula or not).
//!
//! # Determinism
//!
//! References are interned in edge order and every collection iterates in
//! insertion order, so the same edge set and changed cell always produce
//! the same plan - and, on failure, the same cycle report.

use indexmap::IndexSet;
use smallvec::SmallVec;
use tracing::trace;

use crate::error::CycleError;
use crate::formula::CellRef;
use crate::store::Edge;

/// Traversal state for the three-color depth-first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// Not visited yet.
    Unvisited,
    /// On the current depth-first path.
    InProgress,
    /// Fully processed and appended to the post-order.
    Done,
}

/// A per-query dependency graph over interned cell indices.
///
/// Built fresh from the stored edge snapshot for each plan and discarded
/// afterwards; nothing here outlives the query.
pub struct RecalcPlanner {
    /// Interner: reference -> dense index, in edge order.
    cells: IndexSet<CellRef>,
    /// Forward adjacency: for each interned cell, the cells whose formulas
    /// reference it. Most cells have few dependents, hence the inline
    /// capacity.
    dependents: Vec<SmallVec<[u32; 4]>>,
}

impl RecalcPlanner {
    /// Build the forward adjacency from an edge set.
    ///
    /// Duplicate edges are tolerated and stored once.
    pub fn build(edges: &[Edge]) -> Self {
        let mut planner = Self {
            cells: IndexSet::with_capacity(edges.len()),
            dependents: Vec::with_capacity(edges.len()),
        };
        for edge in edges {
            let from = planner.intern(&edge.depends_on);
            let to = planner.intern(&edge.cell);
            let targets = &mut planner.dependents[from as usize];
            if !targets.contains(&to) {
                targets.push(to);
            }
        }
        planner
    }

    /// Number of distinct cells appearing in the edge set.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Compute the recalculation order for one changed cell.
    ///
    /// `formula_cells` is the set of cells that currently carry a formula;
    /// only those (plus the changed cell) appear in the result.
    pub fn plan(
        &self,
        changed: &CellRef,
        formula_cells: &IndexSet<CellRef>,
    ) -> Result<Vec<CellRef>, CycleError> {
        // A changed cell with no edges in either direction still anchors a
        // one-element plan.
        let Some(start) = self.cells.get_index_of(changed) else {
            return Ok(vec![changed.clone()]);
        };

        let reachable = self.reachable_from(start as u32);
        trace!(reachable = reachable.len(), "collected reachable set");

        let order = self.topo_sort(&reachable)?;

        let plan: Vec<CellRef> = order
            .iter()
            .rev()
            .map(|&ix| &self.cells[ix as usize])
            .filter(|cell| formula_cells.contains(*cell) || *cell == changed)
            .cloned()
            .collect();
        trace!(cells = plan.len(), "recalculation order computed");
        Ok(plan)
    }

    /// Intern a reference, growing the adjacency table alongside.
    fn intern(&mut self, cell: &CellRef) -> u32 {
        let (ix, inserted) = self.cells.insert_full(cell.clone());
        if inserted {
            self.dependents.push(SmallVec::new());
        }
        ix as u32
    }

    /// Every cell transitively affected by `start`, `start` included.
    fn reachable_from(&self, start: u32) -> IndexSet<u32> {
        let mut reachable = IndexSet::new();
        let mut stack = vec![start];
        while let Some(ix) = stack.pop() {
            if reachable.insert(ix) {
                for &dependent in &self.dependents[ix as usize] {
                    if !reachable.contains(&dependent) {
                        stack.push(dependent);
                    }
                }
            }
        }
        reachable
    }

    /// Post-order depth-first topological sort restricted to `reachable`.
    ///
    /// Every forward neighbor of a reachable cell is itself reachable, so
    /// the restriction falls out of starting inside the set. Each stack
    /// frame carries a cursor into the cell's dependent list; a frame is
    /// popped (and the cell appended to the post-order) only once every
    /// dependent has been fully processed.
    fn topo_sort(&self, reachable: &IndexSet<u32>) -> Result<Vec<u32>, CycleError> {
        let mut marks = vec![Mark::Unvisited; self.cells.len()];
        let mut order = Vec::with_capacity(reachable.len());
        let mut stack: Vec<(u32, usize)> = Vec::new();

        for &root in reachable {
            if marks[root as usize] != Mark::Unvisited {
                continue;
            }
            marks[root as usize] = Mark::InProgress;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (ix, cursor) = *frame;
                if let Some(&next) = self.dependents[ix as usize].get(cursor) {
                    frame.1 += 1;
                    match marks[next as usize] {
                        Mark::Unvisited => {
                            marks[next as usize] = Mark::InProgress;
                            stack.push((next, 0));
                        }
                        Mark::InProgress => {
                            return Err(self.cycle_report(&stack, next));
                        }
                        Mark::Done => {}
                    }
                } else {
                    stack.pop();
                    marks[ix as usize] = Mark::Done;
                    order.push(ix);
                }
            }
        }

        Ok(order)
    }

    /// The cells on the in-progress path from the revisited cell to the top
    /// of the stack - exactly the loop that was closed.
    ///
    /// Stack cells are unique (each is in-progress at most once), so the
    /// slice needs no deduplication.
    fn cycle_report(&self, stack: &[(u32, usize)], revisited: u32) -> CycleError {
        let from = stack
            .iter()
            .position(|&(ix, _)| ix == revisited)
            .unwrap_or(0);
        let cells = stack[from..]
            .iter()
            .map(|&(ix, _)| self.cells[ix as usize].clone())
            .collect();
        CycleError { cells }
    }
}
