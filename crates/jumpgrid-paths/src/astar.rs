use jumpgrid_core::{Direction, OccupancyGrid, Point3};

use crate::error::SearchError;
use crate::limits::SearchLimits;
use crate::neighbors::Neighbors;
use crate::search::{GridSearch, PathResult, Successor};
use crate::traits::Heuristic;

impl GridSearch {
    /// Compute the shortest path from `start` to `goal` using plain A*.
    ///
    /// Every free neighbor is a successor, so the result lists every cell
    /// along the path. Slower than [`jps_path`](Self::jps_path) on open
    /// grids but with the same costs, which makes it a useful reference.
    pub fn astar_path<H: Heuristic + ?Sized>(
        &mut self,
        grid: &OccupancyGrid,
        start: Point3,
        goal: Point3,
        heuristic: &H,
    ) -> Result<PathResult, SearchError> {
        self.astar_path_with_limits(grid, start, goal, heuristic, &SearchLimits::UNLIMITED)
    }

    /// [`astar_path`](Self::astar_path) stopping early once `limits` are hit.
    pub fn astar_path_with_limits<H: Heuristic + ?Sized>(
        &mut self,
        grid: &OccupancyGrid,
        start: Point3,
        goal: Point3,
        heuristic: &H,
        limits: &SearchLimits,
    ) -> Result<PathResult, SearchError> {
        let mut nbuf = Neighbors::new();
        self.run("astar", grid, start, goal, heuristic, limits, |cur, _, out| {
            for &q in nbuf.all(cur, |q| grid.is_free(q)) {
                let dir = Direction::between(cur, q);
                out.push(Successor {
                    point: q,
                    dir,
                    cost: dir.step_cost(),
                });
            }
        })
    }
}
