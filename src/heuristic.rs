use grid_util::point::Point;

/// Estimates the remaining cost from a path tip to the end.
///
/// None of the provided metrics accounts for the √2 scaling and corner penalties of
/// diagonal steps, so estimates are not admissible in general and found paths are not
/// guaranteed to be shortest.
pub trait Heuristic {
    fn estimate(&self, from: &Point, to: &Point) -> f64;
}

/// Distance metrics between two grid points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    #[default]
    Manhattan,
    Euclidean,
    Chebyshev,
}

impl Metric {
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        let dx = f64::from((a.x - b.x).abs());
        let dy = f64::from((a.y - b.y).abs());
        match self {
            Metric::Manhattan => dx + dy,
            Metric::Euclidean => dx.hypot(dy),
            Metric::Chebyshev => dx.max(dy),
        }
    }
}

impl Heuristic for Metric {
    fn estimate(&self, from: &Point, to: &Point) -> f64 {
        self.distance(from, to)
    }
}

/// Any closure taking the tip and the end works as a heuristic.
impl<F> Heuristic for F
where
    F: Fn(&Point, &Point) -> f64,
{
    fn estimate(&self, from: &Point, to: &Point) -> f64 {
        self(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics() {
        let a = Point::new(0, 0);
        let b = Point::new(3, -4);
        assert_eq!(Metric::Manhattan.distance(&a, &b), 7.0);
        assert_eq!(Metric::Euclidean.distance(&a, &b), 5.0);
        assert_eq!(Metric::Chebyshev.distance(&a, &b), 4.0);
        assert_eq!(Metric::default(), Metric::Manhattan);
    }

    #[test]
    fn closures_are_heuristics() {
        let zero = |_: &Point, _: &Point| 0.0;
        assert_eq!(zero.estimate(&Point::new(0, 0), &Point::new(9, 9)), 0.0);
    }
}
