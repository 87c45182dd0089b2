use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;

/// Per-search flags over all cells of a grid. Flags are only ever set until the next [reset](Self::reset).
#[derive(Clone, Debug, Default)]
pub struct VisitedSet {
    flags: BoolGrid,
    count: usize,
}

impl VisitedSet {
    pub fn new(width: usize, height: usize) -> VisitedSet {
        VisitedSet {
            flags: BoolGrid::new(width, height, false),
            count: 0,
        }
    }

    /// Clears every flag.
    pub fn reset(&mut self) {
        self.flags = BoolGrid::new(self.flags.width(), self.flags.height(), false);
        self.count = 0;
    }

    /// Marks a point as visited. Returns [false] if it was already visited or is out of bounds.
    pub fn mark(&mut self, point: &Point) -> bool {
        if !self.flags.point_in_bounds(*point) || self.flags.get_point(*point) {
            return false;
        }
        self.flags.set_point(*point, true);
        self.count += 1;
        true
    }

    pub fn is_visited(&self, point: &Point) -> bool {
        self.flags.point_in_bounds(*point) && self.flags.get_point(*point)
    }

    /// Number of visited cells.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The visited points in row-major order.
    pub fn positions(&self) -> Vec<Point> {
        (0..self.flags.height())
            .flat_map(|y| (0..self.flags.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| self.flags.get(x, y))
            .map(|(x, y)| Point::new(x as i32, y as i32))
            .collect()
    }
}
