//! Error types for grid setup and search commands.

use core::fmt;
use grid_util::point::Point;

/// Errors arising from grid construction or from search/carve commands.
///
/// Running out of frontier is not an error: it is the regular
/// [Exhausted](crate::search::SearchState::Exhausted) terminal state.
#[derive(Clone, Debug, PartialEq)]
pub enum PathfindingError {
    /// The requested start or end lies on a blocked cell.
    InvalidTarget {
        /// The offending point.
        point: Point,
    },
    /// The requested start or end lies outside the grid.
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },
    /// A cost that is NaN or negative was written to the grid.
    InvalidCost { point: Point, cost: f64 },
    /// An ASCII grid layout could not be parsed.
    InvalidLayout {
        /// What went wrong.
        reason: String,
    },
    /// A retarget or grid replacement was issued while a search is still running.
    SearchInProgress,
}

impl fmt::Display for PathfindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget { point } => {
                write!(f, "target {point:?} lies on a blocked cell")
            }
            Self::OutOfBounds {
                point,
                width,
                height,
            } => write!(f, "point {point:?} is outside the {width}x{height} grid"),
            Self::InvalidCost { point, cost } => {
                write!(f, "invalid cost {cost} for cell {point:?}")
            }
            Self::InvalidLayout { reason } => write!(f, "invalid grid layout: {reason}"),
            Self::SearchInProgress => {
                write!(f, "search is still in progress, wait for a terminal state")
            }
        }
    }
}

impl std::error::Error for PathfindingError {}
