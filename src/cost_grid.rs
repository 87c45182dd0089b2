use crate::error::PathfindingError;
use crate::explorer::NeighborPolicy;
use crate::{BLOCKED, EMPTY_CELL_COST};
use core::fmt;
use grid_util::grid::{Grid, SimpleGrid};
use grid_util::point::Point;
use petgraph::unionfind::UnionFind;
use std::str::FromStr;

/// [CostGrid] stores the cost of entering every cell of a fixed `width` x `height` grid in a
/// [SimpleGrid], with [BLOCKED] marking obstacles. In addition it maintains connected
/// components in a [UnionFind] structure so that reachability can be checked without
/// flood-filling.
#[derive(Clone, Debug)]
pub struct CostGrid {
    costs: SimpleGrid<f64>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
    component_policy: Option<NeighborPolicy>,
}

impl Default for CostGrid {
    fn default() -> CostGrid {
        CostGrid::new(0, 0, EMPTY_CELL_COST)
    }
}

impl CostGrid {
    /// Creates a grid where every cell costs `default_cost`.
    pub fn new(width: usize, height: usize, default_cost: f64) -> CostGrid {
        CostGrid {
            costs: SimpleGrid::new(width, height, default_cost),
            components: UnionFind::new(width * height),
            components_dirty: true,
            component_policy: None,
        }
    }
    pub fn width(&self) -> usize {
        self.costs.width()
    }
    pub fn height(&self) -> usize {
        self.costs.height()
    }
    pub fn in_bounds(&self, point: &Point) -> bool {
        self.costs.point_in_bounds(*point)
    }
    fn get_ix_point(&self, point: &Point) -> usize {
        self.costs.get_ix_point(point)
    }

    /// Cost of entering the cell, or [None] if the point lies outside the grid.
    pub fn cost(&self, point: &Point) -> Option<f64> {
        self.in_bounds(point).then(|| self.costs.get_point(*point))
    }

    /// Returns the cost together with whether `(x, y)` is in bounds. Out-of-bounds cells
    /// report [BLOCKED].
    pub fn cost_at(&self, x: i32, y: i32) -> (f64, bool) {
        match self.cost(&Point::new(x, y)) {
            Some(cost) => (cost, true),
            None => (BLOCKED, false),
        }
    }

    pub fn is_blocked(&self, point: &Point) -> bool {
        self.cost(point).map_or(true, |c| c.is_infinite())
    }

    /// Updates the cost of a cell. Blocking a cell flags the components as dirty since they
    /// may break apart; opening a cell joins it with its open neighbours.
    pub fn set_cost(&mut self, point: Point, cost: f64) -> Result<(), PathfindingError> {
        if !self.in_bounds(&point) {
            return Err(PathfindingError::OutOfBounds {
                point,
                width: self.width(),
                height: self.height(),
            });
        }
        if cost.is_nan() || cost < 0.0 {
            return Err(PathfindingError::InvalidCost { point, cost });
        }
        self.write_cost(point, cost);
        Ok(())
    }

    /// [set_cost](Self::set_cost) without validation, for points known to be in bounds.
    pub(crate) fn write_cost(&mut self, point: Point, cost: f64) {
        let was_blocked = self.costs.get_point(point).is_infinite();
        self.costs.set_point(point, cost);
        if cost.is_infinite() {
            if !was_blocked {
                self.components_dirty = true;
            }
        } else if was_blocked {
            self.join_neighbours(point);
        }
    }

    /// Shorthand for setting a cell to [BLOCKED].
    pub fn block(&mut self, point: Point) -> Result<(), PathfindingError> {
        self.set_cost(point, BLOCKED)
    }

    /// Shorthand for setting a cell to [EMPTY_CELL_COST].
    pub fn clear(&mut self, point: Point) -> Result<(), PathfindingError> {
        self.set_cost(point, EMPTY_CELL_COST)
    }

    /// All blocked points in row-major order.
    pub fn obstacles(&self) -> Vec<Point> {
        self.points().filter(|p| self.is_blocked(p)).collect()
    }

    /// All points with a finite cost in row-major order.
    pub fn passable(&self) -> Vec<Point> {
        self.points().filter(|p| !self.is_blocked(p)).collect()
    }

    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let width = self.width() as i32;
        (0..self.height() as i32).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }

    /// Whether a single step from `start` to the adjacent `pos` is possible under `policy`.
    /// Diagonal steps additionally need both flanking cells open, as a blocked flank gives
    /// the move an infinite cost.
    pub fn can_move_to(&self, pos: Point, start: Point, policy: &NeighborPolicy) -> bool {
        let dx = (pos.x - start.x).abs();
        let dy = (pos.y - start.y).abs();
        debug_assert!(dx <= 1 && dy <= 1);
        if self.is_blocked(&pos) {
            return false;
        }
        match dx + dy {
            1 => policy.allow_orthogonal,
            2 => {
                policy.allow_diagonal
                    && !self.is_blocked(&Point::new(start.x, pos.y))
                    && !self.is_blocked(&Point::new(pos.x, start.y))
            }
            _ => false,
        }
    }

    fn join_neighbours(&mut self, point: Point) {
        let Some(policy) = self.component_policy else {
            self.components_dirty = true;
            return;
        };
        let p_ix = self.get_ix_point(&point);
        let neighbours = (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| Point::new(point.x + dx, point.y + dy)))
            .filter(|n| *n != point && self.can_move_to(*n, point, &policy))
            .map(|n| self.get_ix_point(&n))
            .collect::<Vec<usize>>();
        for n_ix in neighbours {
            self.components.union(p_ix, n_ix);
        }
    }

    /// Generates a new [UnionFind] structure and links up open neighbours that are
    /// connected under `policy`.
    pub fn generate_components(&mut self, policy: &NeighborPolicy) {
        self.components = UnionFind::new(self.width() * self.height());
        self.components_dirty = false;
        self.component_policy = Some(*policy);
        for point in self.points().collect::<Vec<_>>() {
            if self.is_blocked(&point) {
                continue;
            }
            let parent_ix = self.get_ix_point(&point);
            // Only half of the neighbourhood is needed as the union is symmetric
            let neighbours = [
                Point::new(point.x + 1, point.y),
                Point::new(point.x, point.y + 1),
                Point::new(point.x + 1, point.y + 1),
                Point::new(point.x + 1, point.y - 1),
            ]
            .into_iter()
            .filter(|p| self.in_bounds(p) && self.can_move_to(*p, point, policy))
            .map(|p| self.get_ix_point(&p))
            .collect::<Vec<usize>>();
            for ix in neighbours {
                self.components.union(parent_ix, ix);
            }
        }
    }

    /// Regenerates the components if they are dirty or were built for another policy.
    pub fn update_components(&mut self, policy: &NeighborPolicy) {
        if self.components_dirty || self.component_policy != Some(*policy) {
            self.generate_components(policy);
        }
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.get_ix_point(point))
    }

    /// Checks if start and goal are on the same component. Assumes the components are
    /// up to date, see [update_components](Self::update_components).
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        self.in_bounds(start)
            && self.in_bounds(goal)
            && !self.is_blocked(start)
            && !self.is_blocked(goal)
            && self
                .components
                .equiv(self.get_ix_point(start), self.get_ix_point(goal))
    }

    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        !self.reachable(start, goal)
    }
}

fn cost_symbol(cost: f64) -> char {
    if cost.is_infinite() {
        '#'
    } else if cost == EMPTY_CELL_COST {
        '.'
    } else if cost.fract() == 0.0 && cost <= 9.0 {
        char::from_digit(cost as u32, 10).unwrap_or('?')
    } else {
        '?'
    }
}

/// Prints the grid using the layout accepted by [FromStr]; costs that have no symbol
/// are printed as `?`.
impl fmt::Display for CostGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height() {
            let row = (0..self.width())
                .map(|x| cost_symbol(self.costs.get(x, y)))
                .collect::<String>();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Parses a grid with one line per row: `#` is blocked, `.` costs [EMPTY_CELL_COST] and
/// a digit costs its value. Blank lines and surrounding whitespace are ignored.
impl FromStr for CostGrid {
    type Err = PathfindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = CostGrid::new(width, height, EMPTY_CELL_COST);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(PathfindingError::InvalidLayout {
                    reason: format!("row {y} has {} cells, expected {width}", row.chars().count()),
                });
            }
            for (x, c) in row.chars().enumerate() {
                let cost = match c {
                    '#' => BLOCKED,
                    '.' => EMPTY_CELL_COST,
                    d if d.is_ascii_digit() => f64::from(d as u8 - b'0'),
                    other => {
                        return Err(PathfindingError::InvalidLayout {
                            reason: format!("unknown cell symbol {other:?} in row {y}"),
                        })
                    }
                };
                grid.costs.set(x, y, cost);
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_reports_bounds() {
        let grid = CostGrid::new(3, 2, 2.0);
        assert_eq!(grid.cost_at(2, 1), (2.0, true));
        assert_eq!(grid.cost_at(3, 1), (BLOCKED, false));
        assert_eq!(grid.cost_at(-1, 0), (BLOCKED, false));
        assert_eq!(grid.cost(&Point::new(0, 2)), None);
    }

    #[test]
    fn rejects_bad_costs() {
        let mut grid = CostGrid::new(2, 2, EMPTY_CELL_COST);
        let p = Point::new(1, 1);
        assert!(matches!(
            grid.set_cost(p, -1.0),
            Err(PathfindingError::InvalidCost { .. })
        ));
        assert!(matches!(
            grid.set_cost(p, f64::NAN),
            Err(PathfindingError::InvalidCost { .. })
        ));
        assert!(matches!(
            grid.set_cost(Point::new(2, 0), 1.0),
            Err(PathfindingError::OutOfBounds { .. })
        ));
        assert!(grid.set_cost(p, 0.0).is_ok());
        assert!(grid.block(p).is_ok());
        assert!(grid.is_blocked(&p));
    }

    #[test]
    fn parse_and_display() {
        let layout = "\
            .#3\n\
            ..#\n";
        let grid: CostGrid = layout.parse().unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.cost_at(2, 0), (3.0, true));
        assert_eq!(grid.obstacles(), vec![Point::new(1, 0), Point::new(2, 1)]);
        assert_eq!(grid.to_string(), ".#3\n..#\n");
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let res = "..\n...".parse::<CostGrid>();
        assert!(matches!(res, Err(PathfindingError::InvalidLayout { .. })));
        let res = "..x".parse::<CostGrid>();
        assert!(matches!(res, Err(PathfindingError::InvalidLayout { .. })));
    }

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // Corresponds to the following 3x2 grid:
        //  ___
        // | # |
        // | # |
        //  ___
        let mut grid: CostGrid = ".#.\n.#.".parse().unwrap();
        grid.generate_components(&NeighborPolicy::octile());
        let p1 = Point::new(0, 0);
        let p2 = Point::new(1, 1);
        let p3 = Point::new(0, 1);
        let p4 = Point::new(2, 0);
        assert!(grid.unreachable(&p1, &p2));
        assert!(grid.reachable(&p1, &p3));
        assert!(grid.unreachable(&p1, &p4));
        assert_eq!(grid.get_component(&p1), grid.get_component(&p3));
    }

    /// A diagonal step between two blocked flanks is impossible regardless of the policy.
    #[test]
    fn no_corner_cutting_between_obstacles() {
        //  __
        // |.#|
        // |#.|
        //  __
        let mut grid: CostGrid = ".#\n#.".parse().unwrap();
        let start = Point::new(0, 0);
        let end = Point::new(1, 1);
        for policy in [NeighborPolicy::octile(), NeighborPolicy::orthogonal()] {
            grid.generate_components(&policy);
            assert!(grid.unreachable(&start, &end));
        }
    }

    /// Asserts that the two corners are connected on a 4-grid.
    #[test]
    fn reachable_without_diagonals() {
        // |S  |
        // | # |
        // |  G|
        let mut grid: CostGrid = "...\n.#.\n...".parse().unwrap();
        grid.generate_components(&NeighborPolicy::orthogonal());
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(2, 2)));
    }

    #[test]
    fn opening_a_cell_joins_components() {
        let mut grid: CostGrid = ".#.".parse().unwrap();
        let policy = NeighborPolicy::orthogonal();
        grid.update_components(&policy);
        let (a, b) = (Point::new(0, 0), Point::new(2, 0));
        assert!(grid.unreachable(&a, &b));
        grid.clear(Point::new(1, 0)).unwrap();
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&a, &b));
        grid.block(Point::new(1, 0)).unwrap();
        assert!(grid.components_dirty);
        grid.update_components(&policy);
        assert!(grid.unreachable(&a, &b));
    }
}
