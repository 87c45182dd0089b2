//! Computes the neighbours a path can be extended with and what each step costs.
//!
//! Entering a cell orthogonally costs the cell's own cost. A diagonal step costs
//! `target * √2` plus half of the excess cost of the two orthogonal cells flanking the
//! move, so cutting past a costly corner is penalized and cutting past a blocked one is
//! impossible.
//!
//! The offsets are listed here instead of taken from [Point]'s neighbourhoods because their
//! order (up, down, left, right, then the diagonals) decides the search's tie-breaks.
use crate::cost_grid::CostGrid;
use crate::visited::VisitedSet;
use crate::{EMPTY_CELL_COST, N_SMALLVEC_SIZE};
use grid_util::point::Point;
use smallvec::SmallVec;
use std::f64::consts::SQRT_2;

/// Up, down, left, right.
const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
/// Up-left, up-right, down-left, down-right.
const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Which moves are explored and whether blocked targets are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborPolicy {
    pub allow_orthogonal: bool,
    pub allow_diagonal: bool,
    /// Drops candidates with an infinite step cost. Disabled when carving, where every
    /// candidate starts out blocked.
    pub reject_unreachable: bool,
}

impl NeighborPolicy {
    /// Orthogonal and diagonal moves, blocked cells rejected.
    pub const fn octile() -> NeighborPolicy {
        NeighborPolicy {
            allow_orthogonal: true,
            allow_diagonal: true,
            reject_unreachable: true,
        }
    }
    /// Orthogonal moves only, blocked cells rejected.
    pub const fn orthogonal() -> NeighborPolicy {
        NeighborPolicy {
            allow_orthogonal: true,
            allow_diagonal: false,
            reject_unreachable: true,
        }
    }
    /// Orthogonal moves only, blocked cells kept.
    pub const fn carving() -> NeighborPolicy {
        NeighborPolicy {
            allow_orthogonal: true,
            allow_diagonal: false,
            reject_unreachable: false,
        }
    }

    /// Whether `a` and `b` are one move apart under this policy.
    pub fn adjacent(&self, a: &Point, b: &Point) -> bool {
        match ((a.x - b.x).abs(), (a.y - b.y).abs()) {
            (0, 1) | (1, 0) => self.allow_orthogonal,
            (1, 1) => self.allow_diagonal,
            _ => false,
        }
    }

    fn offsets(&self) -> impl Iterator<Item = &'static (i32, i32)> {
        let orthogonal: &'static [(i32, i32)] = if self.allow_orthogonal {
            &ORTHOGONAL_OFFSETS
        } else {
            &[]
        };
        let diagonal: &'static [(i32, i32)] = if self.allow_diagonal {
            &DIAGONAL_OFFSETS
        } else {
            &[]
        };
        orthogonal.iter().chain(diagonal.iter())
    }
}

impl Default for NeighborPolicy {
    fn default() -> NeighborPolicy {
        NeighborPolicy::octile()
    }
}

/// A neighbour a path can be extended with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub direction: Point,
    pub step_cost: f64,
}

/// Cost of the single move from `from` to the adjacent `to`, or [None] if `to` lies outside
/// the grid or is not adjacent. Blocked targets (and diagonals past a blocked flank) cost
/// [BLOCKED](crate::BLOCKED).
pub fn step_cost(grid: &CostGrid, from: &Point, to: &Point) -> Option<f64> {
    let target = grid.cost(to)?;
    match ((to.x - from.x).abs(), (to.y - from.y).abs()) {
        (0, 1) | (1, 0) => Some(target),
        (1, 1) => {
            // Flanks of an in-bounds diagonal are always in bounds
            let flank_a = grid.cost(&Point::new(to.x, from.y))?;
            let flank_b = grid.cost(&Point::new(from.x, to.y))?;
            Some(target * SQRT_2 + (flank_a + flank_b - 2.0 * EMPTY_CELL_COST) / 2.0)
        }
        _ => None,
    }
}

/// Computes the candidates for extending a path whose tip is `pos`. Candidates out of bounds,
/// already visited or (with [reject_unreachable](NeighborPolicy::reject_unreachable))
/// unreachable are dropped. The order is up, down, left, right, followed by the diagonals.
///
/// Nothing is marked as visited here; callers mark `pos` when they expand it.
pub fn explore(
    grid: &CostGrid,
    visited: &VisitedSet,
    pos: &Point,
    policy: &NeighborPolicy,
) -> SmallVec<[Candidate; N_SMALLVEC_SIZE]> {
    policy
        .offsets()
        .filter_map(|&(dx, dy)| {
            let direction = Point::new(pos.x + dx, pos.y + dy);
            let step_cost = step_cost(grid, pos, &direction)?;
            if policy.reject_unreachable && step_cost.is_infinite() {
                return None;
            }
            if visited.is_visited(&direction) {
                return None;
            }
            Some(Candidate {
                direction,
                step_cost,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCKED;

    fn directions(candidates: &[Candidate]) -> Vec<Point> {
        candidates.iter().map(|c| c.direction).collect()
    }

    #[test]
    fn corner_has_three_neighbours() {
        let grid = CostGrid::new(3, 3, EMPTY_CELL_COST);
        let visited = VisitedSet::new(3, 3);
        let candidates = explore(&grid, &visited, &Point::new(0, 0), &NeighborPolicy::octile());
        assert_eq!(
            directions(&candidates),
            vec![Point::new(0, 1), Point::new(1, 0), Point::new(1, 1)]
        );
        assert_eq!(candidates[0].step_cost, 1.0);
        assert!((candidates[2].step_cost - SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_policy_skips_diagonals() {
        let grid = CostGrid::new(3, 3, EMPTY_CELL_COST);
        let visited = VisitedSet::new(3, 3);
        let candidates = explore(
            &grid,
            &visited,
            &Point::new(1, 1),
            &NeighborPolicy::orthogonal(),
        );
        assert_eq!(
            directions(&candidates),
            vec![
                Point::new(1, 0),
                Point::new(1, 2),
                Point::new(0, 1),
                Point::new(2, 1)
            ]
        );
    }

    /// Entering a cell costs the cell's own cost, not a fixed move cost.
    #[test]
    fn orthogonal_cost_is_target_cost() {
        let grid: CostGrid = ".5.".parse().unwrap();
        let visited = VisitedSet::new(3, 1);
        let candidates = explore(&grid, &visited, &Point::new(0, 0), &NeighborPolicy::octile());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].step_cost, 5.0);
    }

    #[test]
    fn diagonal_pays_for_costly_flank() {
        //  __
        // |.3|
        // |..|
        //  __
        let grid: CostGrid = ".3\n..".parse().unwrap();
        let cost = step_cost(&grid, &Point::new(0, 0), &Point::new(1, 1)).unwrap();
        // 1 * √2 + (3 + 1 - 2) / 2
        assert!((cost - (SQRT_2 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn diagonal_past_obstacle_is_rejected() {
        let grid: CostGrid = ".#\n..".parse().unwrap();
        let visited = VisitedSet::new(2, 2);
        let from = Point::new(0, 0);
        assert_eq!(step_cost(&grid, &from, &Point::new(1, 1)), Some(BLOCKED));
        let candidates = explore(&grid, &visited, &from, &NeighborPolicy::octile());
        assert_eq!(directions(&candidates), vec![Point::new(0, 1)]);
    }

    #[test]
    fn visited_cells_are_dropped() {
        let grid = CostGrid::new(2, 1, EMPTY_CELL_COST);
        let mut visited = VisitedSet::new(2, 1);
        visited.mark(&Point::new(1, 0));
        let candidates = explore(&grid, &visited, &Point::new(0, 0), &NeighborPolicy::octile());
        assert!(candidates.is_empty());
    }

    #[test]
    fn carving_keeps_blocked_cells() {
        let grid = CostGrid::new(2, 2, BLOCKED);
        let visited = VisitedSet::new(2, 2);
        let from = Point::new(0, 0);
        assert!(explore(&grid, &visited, &from, &NeighborPolicy::orthogonal()).is_empty());
        let candidates = explore(&grid, &visited, &from, &NeighborPolicy::carving());
        assert_eq!(
            directions(&candidates),
            vec![Point::new(0, 1), Point::new(1, 0)]
        );
        assert!(candidates.iter().all(|c| c.step_cost.is_infinite()));
    }

    #[test]
    fn adjacency_follows_policy() {
        let a = Point::new(2, 2);
        assert!(NeighborPolicy::octile().adjacent(&a, &Point::new(3, 3)));
        assert!(!NeighborPolicy::orthogonal().adjacent(&a, &Point::new(3, 3)));
        assert!(NeighborPolicy::orthogonal().adjacent(&a, &Point::new(2, 1)));
        assert!(!NeighborPolicy::octile().adjacent(&a, &a));
        assert!(!NeighborPolicy::octile().adjacent(&a, &Point::new(4, 2)));
    }
}
