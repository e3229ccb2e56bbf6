use jumpgrid_core::Point3;

use crate::distance;

/// Admissible estimate of the remaining cost between two cells.
///
/// Implementations must never overestimate the true path cost under the
/// 26-connected move model (steps cost 1, √2 or √3). Consistent estimates
/// (obeying the triangle inequality) additionally guarantee that no node is
/// ever needed again once closed.
pub trait Heuristic {
    fn estimate(&self, from: Point3, to: Point3) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(Point3, Point3) -> f64,
{
    #[inline]
    fn estimate(&self, from: Point3, to: Point3) -> f64 {
        self(from, to)
    }
}

/// Straight-line distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Heuristic for Euclidean {
    #[inline]
    fn estimate(&self, from: Point3, to: Point3) -> f64 {
        distance::euclidean(from, to)
    }
}

/// 3D diagonal distance, exact on an empty grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Octile;

impl Heuristic for Octile {
    #[inline]
    fn estimate(&self, from: Point3, to: Point3) -> f64 {
        distance::octile(from, to)
    }
}

/// Always zero: turns best-first search into Dijkstra's algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Zero;

impl Heuristic for Zero {
    #[inline]
    fn estimate(&self, _from: Point3, _to: Point3) -> f64 {
        0.0
    }
}
