//! Randomized depth-first maze carving.
//!
//! Carving starts from a fully blocked grid with a stack holding only the start cell. Each
//! step looks at the unvisited orthogonal neighbours of the cell on top of the stack:
//! - if there are none, the carver backtracks by popping the stack and picks a new run
//!   marker for the next run of carved cells;
//! - otherwise it picks one at random, carves it and pushes it. With thinning enabled, one
//!   other random neighbour is marked visited without being carved, which leaves walls
//!   standing between runs.
//!
//! Every carved cell is orthogonally connected to the start, so any two carved cells can
//! be used as start and end of a search.
use crate::cost_grid::CostGrid;
use crate::error::PathfindingError;
use crate::explorer::{explore, NeighborPolicy};
use crate::stepper::Stepper;
use crate::visited::VisitedSet;
use crate::{BLOCKED, EMPTY_CELL_COST};
use grid_util::grid::{Grid, SimpleGrid};
use grid_util::point::Point;
use log::info;
use rand::Rng;

/// Carves a maze into a blocked grid one cell per [step](Self::step), using `rng` for every
/// random choice.
pub struct MazeCarver<R: Rng> {
    rng: R,
    start: Point,
    grid: CostGrid,
    visited: VisitedSet,
    stack: Vec<Point>,
    markers: SimpleGrid<Option<u32>>,
    marker: u32,
    thinning: bool,
    passable_cost: f64,
    steps: usize,
}

impl<R: Rng> MazeCarver<R> {
    /// Creates a `width` x `height` blocked grid and carves `start`.
    pub fn new(
        width: usize,
        height: usize,
        start: Point,
        mut rng: R,
    ) -> Result<MazeCarver<R>, PathfindingError> {
        let grid = CostGrid::new(width, height, BLOCKED);
        if !grid.in_bounds(&start) {
            return Err(PathfindingError::OutOfBounds {
                point: start,
                width,
                height,
            });
        }
        let marker = rng.gen();
        let mut carver = MazeCarver {
            rng,
            start,
            grid,
            visited: VisitedSet::new(width, height),
            stack: vec![],
            markers: SimpleGrid::new(width, height, None),
            marker,
            thinning: true,
            passable_cost: EMPTY_CELL_COST,
            steps: 0,
        };
        carver.carve(start);
        Ok(carver)
    }

    /// Enables or disables thinning. Without it every cell of the grid ends up carved.
    pub fn with_thinning(mut self, thinning: bool) -> MazeCarver<R> {
        self.thinning = thinning;
        self
    }

    /// Sets the cost given to carved cells, including those carved already.
    pub fn with_passable_cost(mut self, cost: f64) -> Result<MazeCarver<R>, PathfindingError> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(PathfindingError::InvalidCost {
                point: self.start,
                cost,
            });
        }
        for p in self.grid.passable() {
            self.grid.write_cost(p, cost);
        }
        self.passable_cost = cost;
        Ok(self)
    }

    fn carve(&mut self, point: Point) {
        self.visited.mark(&point);
        self.grid.write_cost(point, self.passable_cost);
        self.markers.set_point(point, Some(self.marker));
        self.stack.push(point);
    }

    /// Carves or backtracks once. Returns whether carving is done.
    pub fn step(&mut self) -> bool {
        let Some(&top) = self.stack.last() else {
            return true;
        };
        self.steps += 1;
        let candidates = explore(&self.grid, &self.visited, &top, &NeighborPolicy::carving());
        if candidates.is_empty() {
            self.stack.pop();
            self.marker = self.rng.gen();
            if self.stack.is_empty() {
                info!(
                    "Carved {} of {} cells in {} steps",
                    self.carved_count(),
                    self.grid.width() * self.grid.height(),
                    self.steps
                );
                return true;
            }
            return false;
        }
        let chosen = self.rng.gen_range(0..candidates.len());
        if self.thinning && candidates.len() > 1 {
            let mut other = self.rng.gen_range(0..candidates.len() - 1);
            if other >= chosen {
                other += 1;
            }
            self.visited.mark(&candidates[other].direction);
        }
        self.carve(candidates[chosen].direction);
        false
    }

    fn carved_count(&self) -> usize {
        self.markers.values.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// The current carve path, from the start to the cell being carved from.
    pub fn stack(&self) -> &[Point] {
        &self.stack
    }

    /// The cell carving continues from.
    pub fn current(&self) -> Option<Point> {
        self.stack.last().copied()
    }

    /// All carved cells in row-major order.
    pub fn carved(&self) -> Vec<Point> {
        self.grid.passable()
    }

    /// Marker of the run a cell was carved in. Cells carved between two backtracks share a
    /// marker, which renderers can map to a colour.
    pub fn run_marker(&self, point: &Point) -> Option<u32> {
        if !self.markers.point_in_bounds(*point) {
            return None;
        }
        self.markers.get_point(*point)
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn grid(&self) -> &CostGrid {
        &self.grid
    }

    /// Discards the carve state and returns the carved grid.
    pub fn into_grid(self) -> CostGrid {
        self.grid
    }
}

impl<R: Rng> Stepper for MazeCarver<R> {
    fn step(&mut self) -> bool {
        MazeCarver::step(self)
    }
    fn is_finished(&self) -> bool {
        MazeCarver::is_finished(self)
    }
}
