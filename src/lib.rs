//! # frontier_pathfinding
//!
//! Incremental, heuristic-guided frontier search over a weighted grid. Every
//! cell carries a traversal cost, with [BLOCKED] (positive infinity) marking
//! obstacles. A [FrontierSearch](search::FrontierSearch) repeatedly expands the
//! cheapest partial path (accumulated step cost plus a pluggable
//! [Heuristic](heuristic::Heuristic)) one [step](stepper::Stepper::step) at a
//! time, so a renderer can animate the visited cells, the frontier tips and the
//! current best path between steps.
//!
//! Diagonal moves cost `target * √2` plus a penalty for costly flanking cells,
//! which the distance heuristics do not account for. The search is therefore a
//! greedy, A*-like best-first search and does not guarantee shortest paths.
//!
//! A randomized depth-first [MazeCarver](maze::MazeCarver) reuses the same
//! [neighbor explorer](explorer::explore) to carve solvable grids.
pub mod cost_grid;
pub mod error;
pub mod explorer;
pub mod heuristic;
pub mod maze;
pub mod search;
pub mod stepper;
pub mod visited;

pub use cost_grid::CostGrid;
pub use error::PathfindingError;
pub use explorer::{Candidate, NeighborPolicy};
pub use heuristic::{Heuristic, Metric};
pub use maze::MazeCarver;
pub use search::{FrontierSearch, PathNode, SearchConfig, SearchOutcome, SearchState, SearchStats};
pub use stepper::Stepper;
pub use visited::VisitedSet;

pub use grid_util::point::Point;

/// Cost of entering an empty cell. Diagonal corner penalties are measured relative to it.
pub const EMPTY_CELL_COST: f64 = 1.0;
/// Cost of a blocked cell. Blocked cells are unreachable everywhere.
pub const BLOCKED: f64 = f64::INFINITY;
/// Inline capacity of neighbor lists; a cell has at most 8 neighbors.
pub const N_SMALLVEC_SIZE: usize = 8;
