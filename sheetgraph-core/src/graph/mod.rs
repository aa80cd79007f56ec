//! Recalculation Graph
//!
//! This module turns a spreadsheet's stored edge set into a recomputation
//! order for one changed cell.
//!
//! # Overview
//!
//! Edges point from a formula cell to the cells it references. For planning
//! we need the opposite direction - "who reacts if this cell changes" - so
//! the planner builds a *forward* adjacency (precedent -> dependents) from
//! the edge rows, walks it to find every cell transitively affected by the
//! change, and topologically sorts that reachable set. A cycle anywhere in
//! the reachable set aborts the plan; a cycle elsewhere in the spreadsheet
//! does not.
//!
//! # Design Decisions
//!
//! 1. The graph is rebuilt from the stored edge snapshot on every query
//!    rather than kept as long-lived mutable state. Building is O(E) and a
//!    fresh snapshot can never be stale under concurrent edits.
//!
//! 2. The forward view is the only adjacency the planner maintains. The
//!    reverse view ("what does this cell need") already exists as the stored
//!    edge rows and is served from there.
//!
//! 3. Traversals use explicit work stacks, never recursion. A dependency
//!    chain is as long as the spreadsheet is deep; the call stack is not.

mod planner;

pub use planner::RecalcPlanner;
