//! Incremental best-first search over a [CostGrid].
//!
//! Every [step](FrontierSearch::step) selects the partial path with the lowest score, the sum
//! of its step costs plus the heuristic estimate from its tip to the end, and either
//! finishes on it or replaces it with one child path per neighbour of its tip. A cell is
//! marked visited exactly when it is expanded, so no cell is ever expanded twice.
//!
//! Partial paths share their prefixes: each path tip is stored once in an insertion-ordered
//! map together with the index of its parent, and the frontier is a binary heap of scored
//! indices into that map. A tip that is reached again by a cheaper path is updated in place;
//! the superseded heap entry is discarded when it comes up.
use crate::cost_grid::CostGrid;
use crate::error::PathfindingError;
use crate::explorer::{explore, NeighborPolicy};
use crate::heuristic::{Heuristic, Metric};
use crate::stepper::Stepper;
use crate::visited::VisitedSet;
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Parent index of the start entry, which is not part of any path.
const ROOT: usize = usize::MAX;

/// Lifecycle of a search. [Found](SearchState::Found) and [Exhausted](SearchState::Exhausted)
/// are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Ready,
    Searching,
    Found,
    /// The frontier emptied before the end was reached: no path exists.
    Exhausted,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Found | SearchState::Exhausted)
    }
}

/// One step of a path: the cell entered and the cost of entering it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathNode {
    pub direction: Point,
    pub step_cost: f64,
}

/// Result of draining a search with [run](FrontierSearch::run).
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    /// The path runs from a neighbour of the start up to and including the end. It is empty
    /// if start and end coincide.
    Found { path: Vec<Point>, cost: f64 },
    Exhausted,
}

/// Counters over the current search, reset by every (re)initialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Steps taken while searching.
    pub iterations: usize,
    /// Paths whose tip was expanded.
    pub expansions: usize,
    /// Paths dropped because their tip had been expanded or reached more cheaply meanwhile.
    pub discarded: usize,
}

/// Configuration of a [FrontierSearch].
#[derive(Clone, Debug)]
pub struct SearchConfig<H = Metric> {
    pub policy: NeighborPolicy,
    pub heuristic: H,
    /// Weight of the heuristic in the score. Values above 1 make the search greedier.
    pub heuristic_factor: f64,
    /// Consult the grid's connected components on initialization and finish as
    /// [Exhausted](SearchState::Exhausted) right away if the end cannot be reached.
    pub precheck_reachability: bool,
}

impl<H: Heuristic> SearchConfig<H> {
    pub fn with_heuristic(heuristic: H) -> SearchConfig<H> {
        SearchConfig {
            policy: NeighborPolicy::default(),
            heuristic,
            heuristic_factor: 1.0,
            precheck_reachability: false,
        }
    }
}

impl Default for SearchConfig<Metric> {
    fn default() -> SearchConfig<Metric> {
        SearchConfig::with_heuristic(Metric::default())
    }
}

#[derive(Clone, Copy, Debug)]
struct PathEntry {
    parent: usize,
    step_cost: f64,
    cost: f64,
}

struct FrontierEntry {
    score: f64,
    cost: f64,
    seq: u64,
    index: usize,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest score first, ties go to the path queued first
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A single search from `start` to `end` that exclusively owns its grid, visited set and
/// frontier. Construct it with [initialize](Self::initialize) and advance it with
/// [step](Self::step) or [run](Self::run).
pub struct FrontierSearch<H = Metric> {
    grid: CostGrid,
    start: Point,
    end: Point,
    config: SearchConfig<H>,
    state: SearchState,
    visited: VisitedSet,
    nodes: FxIndexMap<Point, PathEntry>,
    frontier: BinaryHeap<FrontierEntry>,
    seq: u64,
    current: Option<usize>,
    last_expanded: Option<Point>,
    stats: SearchStats,
    started: Option<Instant>,
}

fn validate_target(grid: &CostGrid, point: Point) -> Result<(), PathfindingError> {
    if !grid.in_bounds(&point) {
        return Err(PathfindingError::OutOfBounds {
            point,
            width: grid.width(),
            height: grid.height(),
        });
    }
    if grid.is_blocked(&point) {
        return Err(PathfindingError::InvalidTarget { point });
    }
    Ok(())
}

impl<H: Heuristic> FrontierSearch<H> {
    /// Takes ownership of `grid` and initializes a search from `start` to `end`. Fails with
    /// [InvalidTarget](PathfindingError::InvalidTarget) if either lies on a blocked cell.
    pub fn initialize(
        grid: CostGrid,
        start: Point,
        end: Point,
        config: SearchConfig<H>,
    ) -> Result<FrontierSearch<H>, PathfindingError> {
        validate_target(&grid, start)?;
        validate_target(&grid, end)?;
        let visited = VisitedSet::new(grid.width(), grid.height());
        let mut search = FrontierSearch {
            grid,
            start,
            end,
            config,
            state: SearchState::Ready,
            visited,
            nodes: FxIndexMap::default(),
            frontier: BinaryHeap::new(),
            seq: 0,
            current: None,
            last_expanded: None,
            stats: SearchStats::default(),
            started: None,
        };
        search.init();
        Ok(search)
    }

    /// Discards all progress and seeds the frontier with one single-node path per
    /// neighbour of the start.
    pub fn init(&mut self) {
        self.visited.reset();
        self.nodes.clear();
        self.frontier.clear();
        self.seq = 0;
        self.current = None;
        self.last_expanded = None;
        self.stats = SearchStats::default();
        self.started = Some(Instant::now());
        self.state = SearchState::Searching;

        if self.config.precheck_reachability && self.start != self.end {
            self.grid.update_components(&self.config.policy);
            if self.grid.unreachable(&self.start, &self.end) {
                warn!("{:?} is not reachable from {:?}", self.end, self.start);
                self.state = SearchState::Exhausted;
                return;
            }
        }

        self.nodes.insert(
            self.start,
            PathEntry {
                parent: ROOT,
                step_cost: 0.0,
                cost: 0.0,
            },
        );
        self.visited.mark(&self.start);
        self.expand(0);
    }

    /// Queues one child path per unvisited neighbour of the tip at `index`.
    fn expand(&mut self, index: usize) {
        let Some((&tip, &PathEntry { cost, .. })) = self.nodes.get_index(index) else {
            return;
        };
        let candidates = explore(&self.grid, &self.visited, &tip, &self.config.policy);
        for candidate in candidates {
            // Blocked cells stay unreachable even under a policy that keeps them as candidates
            if candidate.step_cost.is_infinite() {
                continue;
            }
            let new_cost = cost + candidate.step_cost;
            let entry = PathEntry {
                parent: index,
                step_cost: candidate.step_cost,
                cost: new_cost,
            };
            let n = match self.nodes.entry(candidate.direction) {
                Vacant(e) => {
                    let n = e.index();
                    e.insert(entry);
                    n
                }
                Occupied(mut e) => {
                    if e.get().cost > new_cost {
                        e.insert(entry);
                        e.index()
                    } else {
                        continue;
                    }
                }
            };
            let h = self.config.heuristic.estimate(&candidate.direction, &self.end);
            self.frontier.push(FrontierEntry {
                score: new_cost + self.config.heuristic_factor * h,
                cost: new_cost,
                seq: self.seq,
                index: n,
            });
            self.seq += 1;
        }
    }

    /// Performs one iteration of the search and returns whether it has reached a terminal
    /// state. In [Ready](SearchState::Ready) this initializes the search instead; in a
    /// terminal state it does nothing.
    pub fn step(&mut self) -> bool {
        match self.state {
            SearchState::Ready => {
                self.init();
                return self.state.is_terminal();
            }
            SearchState::Found | SearchState::Exhausted => return true,
            SearchState::Searching => {}
        }
        self.stats.iterations += 1;
        self.last_expanded = None;

        if self.start == self.end {
            self.finish_found(0);
            return true;
        }
        let Some(FrontierEntry { cost, index, .. }) = self.frontier.pop() else {
            self.current = None;
            self.state = SearchState::Exhausted;
            info!(
                "No path from {:?} to {:?}: {} cells visited in {} iterations ({:?})",
                self.start,
                self.end,
                self.visited.len(),
                self.stats.iterations,
                self.elapsed()
            );
            return true;
        };
        let Some((&tip, entry)) = self.nodes.get_index(index) else {
            self.stats.discarded += 1;
            return false;
        };
        // The tip was expanded by a rival path, or reached more cheaply since this path was queued
        if self.visited.is_visited(&tip) || cost > entry.cost {
            self.stats.discarded += 1;
            return false;
        }
        self.current = Some(index);
        if tip == self.end {
            self.finish_found(index);
            return true;
        }
        self.visited.mark(&tip);
        self.last_expanded = Some(tip);
        self.stats.expansions += 1;
        self.expand(index);
        false
    }

    fn finish_found(&mut self, index: usize) {
        self.state = SearchState::Found;
        self.current = Some(index);
        self.frontier.clear();
        let path = self.best_path();
        info!(
            "Path from {:?} to {:?} found: length {}, cost {:.3}, {} iterations ({:?})",
            self.start,
            self.end,
            path.len(),
            self.best_path_cost(),
            self.stats.iterations,
            self.elapsed()
        );
        debug!(
            "Path: {}",
            path.iter().map(|p| format!("({}, {})", p.x, p.y)).join(" -> ")
        );
    }

    fn elapsed(&self) -> std::time::Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Steps until a terminal state is reached.
    pub fn run(&mut self) -> SearchOutcome {
        self.drain();
        match self.state {
            SearchState::Found => SearchOutcome::Found {
                path: self.best_path(),
                cost: self.best_path_cost(),
            },
            _ => SearchOutcome::Exhausted,
        }
    }

    /// Restarts the search towards a new end on the same grid. Only allowed once the
    /// current search has finished (or before it started).
    pub fn retarget(&mut self, end: Point) -> Result<(), PathfindingError> {
        if self.state == SearchState::Searching {
            return Err(PathfindingError::SearchInProgress);
        }
        validate_target(&self.grid, end)?;
        debug!("Retargeting search from {:?} to {:?}", self.end, end);
        self.end = end;
        self.init();
        Ok(())
    }

    /// Drops all progress and returns to [Ready](SearchState::Ready). This is the only way
    /// to abandon a running search.
    pub fn reset(&mut self) {
        debug!("Resetting search from {:?} to {:?}", self.start, self.end);
        self.visited.reset();
        self.nodes.clear();
        self.frontier.clear();
        self.seq = 0;
        self.current = None;
        self.last_expanded = None;
        self.stats = SearchStats::default();
        self.started = None;
        self.state = SearchState::Ready;
    }

    /// Swaps in a rebuilt grid of any size and restarts the search on it, returning the
    /// previous grid. Start and end must be open on the new grid.
    pub fn replace_grid(&mut self, grid: CostGrid) -> Result<CostGrid, PathfindingError> {
        if self.state == SearchState::Searching {
            return Err(PathfindingError::SearchInProgress);
        }
        validate_target(&grid, self.start)?;
        validate_target(&grid, self.end)?;
        self.visited = VisitedSet::new(grid.width(), grid.height());
        let previous = std::mem::replace(&mut self.grid, grid);
        self.init();
        Ok(previous)
    }

    fn reverse_path(&self, index: usize) -> Vec<PathNode> {
        let mut path: Vec<PathNode> = std::iter::successors(Some(index), |&i| {
            self.nodes
                .get_index(i)
                .map(|(_, e)| e.parent)
                .filter(|&p| p != ROOT)
        })
        .filter_map(|i| self.nodes.get_index(i))
        .filter(|(_, e)| e.parent != ROOT)
        .map(|(&direction, e)| PathNode {
            direction,
            step_cost: e.step_cost,
        })
        .collect();
        path.reverse();
        path
    }

    /// The path selected by the latest step, frozen once the end is found. Empty before the
    /// first step and after exhaustion.
    pub fn best_path_nodes(&self) -> Vec<PathNode> {
        self.current
            .map(|i| self.reverse_path(i))
            .unwrap_or_default()
    }

    /// Coordinates of [best_path_nodes](Self::best_path_nodes), excluding the start.
    pub fn best_path(&self) -> Vec<Point> {
        self.best_path_nodes()
            .into_iter()
            .map(|n| n.direction)
            .collect()
    }

    /// Sum of the step costs of the best path.
    pub fn best_path_cost(&self) -> f64 {
        self.current
            .and_then(|i| self.nodes.get_index(i))
            .map_or(0.0, |(_, e)| e.cost)
    }

    /// Tips of all live frontier paths in the order they were first reached. Once found, this
    /// is only the end.
    pub fn frontier_tips(&self) -> Vec<Point> {
        match self.state {
            SearchState::Found => self.best_path().last().copied().into_iter().collect(),
            SearchState::Exhausted | SearchState::Ready => vec![],
            SearchState::Searching => self
                .nodes
                .keys()
                .filter(|p| !self.visited.is_visited(p))
                .copied()
                .collect(),
        }
    }

    pub fn visited_positions(&self) -> Vec<Point> {
        self.visited.positions()
    }
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }
    pub fn obstacles(&self) -> Vec<Point> {
        self.grid.obstacles()
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn end(&self) -> Point {
        self.end
    }
    pub fn state(&self) -> SearchState {
        self.state
    }
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
    /// The tip expanded by the latest step, if it expanded one.
    pub fn last_expanded(&self) -> Option<Point> {
        self.last_expanded
    }
    pub fn grid(&self) -> &CostGrid {
        &self.grid
    }
    pub fn config(&self) -> &SearchConfig<H> {
        &self.config
    }
    pub fn into_grid(self) -> CostGrid {
        self.grid
    }
}

impl<H: Heuristic> Stepper for FrontierSearch<H> {
    fn step(&mut self) -> bool {
        FrontierSearch::step(self)
    }
    fn is_finished(&self) -> bool {
        FrontierSearch::is_finished(self)
    }
}
