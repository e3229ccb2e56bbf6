//! Jump Point Search (JPS) on 3D uniform-cost grids.
//!
//! JPS is an optimised A* variant for grids where every step costs its
//! length. It "jumps" along straight lines, only adding nodes to the open
//! set at *jump points*: the goal, cells next to an obstacle that may force
//! a turn, and cells where a diagonal ray must split into its components.
//!
//! Moves follow the 26-connected model: a step is legal whenever its
//! destination is free, and costs 1, √2 or √3. Cells outside the grid can
//! never be entered but are not obstacles, so they never force a turn.

use jumpgrid_core::{DVec3, Direction, OccupancyGrid, Point3};

use crate::error::{Endpoint, SearchError};
use crate::limits::SearchLimits;
use crate::pattern::JumpTable;
use crate::search::{GridSearch, PathResult, Successor};
use crate::traits::Heuristic;

/// Whether `cell`, entered by moving along `dir`, has an occupied probe
/// cell, making it a jump point.
///
/// Always `false` for [`Direction::NONE`].
#[inline]
pub fn has_forced(grid: &OccupancyGrid, table: &JumpTable, cell: Point3, dir: Direction) -> bool {
    table
        .row(dir)
        .probes()
        .iter()
        .any(|&f| grid.is_occupied(cell + f))
}

/// Walk from `from` along `dir` until a jump point is found.
///
/// Returns the jump point, or `None` when the ray runs into an obstacle or
/// leaves the grid first. Diagonal rays recurse into their component
/// directions at each step, at most three levels deep.
pub fn jump(
    grid: &OccupancyGrid,
    table: &JumpTable,
    goal: Point3,
    from: Point3,
    dir: Direction,
) -> Option<Point3> {
    if dir.is_none() {
        return None;
    }
    let branches = table.row(dir).branches();
    let mut cur = from;
    loop {
        cur = cur + dir;
        if !grid.is_free(cur) {
            return None;
        }
        if cur == goal || has_forced(grid, table, cur, dir) {
            return Some(cur);
        }
        if branches
            .iter()
            .any(|&sub| jump(grid, table, goal, cur, sub).is_some())
        {
            return Some(cur);
        }
    }
}

/// Jump-point successors of `cur`, reached with incoming direction `dir`.
///
/// Natural directions are always tried. A forced direction is only tried
/// when its probe cell is occupied. Edge costs are straight-line distances.
pub(crate) fn successors(
    grid: &OccupancyGrid,
    table: &JumpTable,
    goal: Point3,
    cur: Point3,
    dir: Direction,
    out: &mut Vec<Successor>,
) {
    let row = table.row(dir);
    let forced = row
        .forced()
        .iter()
        .filter(|f| grid.is_occupied(cur + f.probe))
        .map(|f| f.expand);
    for d in row.natural().iter().copied().chain(forced) {
        if let Some(p) = jump(grid, table, goal, cur, d) {
            out.push(Successor {
                point: p,
                dir: d,
                cost: (p - cur).euclidean_len(),
            });
        }
    }
}

impl GridSearch {
    /// Shortest path from `start` to `goal` using Jump Point Search.
    ///
    /// The returned points are the start, the jump points and the goal.
    pub fn jps_path<H: Heuristic + ?Sized>(
        &mut self,
        grid: &OccupancyGrid,
        start: Point3,
        goal: Point3,
        heuristic: &H,
    ) -> Result<PathResult, SearchError> {
        self.jps_path_with_limits(grid, start, goal, heuristic, &SearchLimits::UNLIMITED)
    }

    /// [`jps_path`](Self::jps_path) stopping early once `limits` are hit.
    pub fn jps_path_with_limits<H: Heuristic + ?Sized>(
        &mut self,
        grid: &OccupancyGrid,
        start: Point3,
        goal: Point3,
        heuristic: &H,
        limits: &SearchLimits,
    ) -> Result<PathResult, SearchError> {
        let table = JumpTable::shared();
        self.run("jps", grid, start, goal, heuristic, limits, |cur, dir, out| {
            successors(grid, table, goal, cur, dir, out)
        })
    }

    /// Jump Point Search between two world coordinates.
    ///
    /// Endpoints are mapped through the grid's [`GridMap`](jumpgrid_core::GridMap);
    /// coordinates outside the mapped volume are rejected rather than
    /// clamped. The result holds cell-centre world coordinates from start to
    /// goal.
    pub fn jps_world_path<H: Heuristic + ?Sized>(
        &mut self,
        grid: &OccupancyGrid,
        start: DVec3,
        goal: DVec3,
        heuristic: &H,
    ) -> Result<Vec<DVec3>, SearchError> {
        let map = grid.map();
        let to_index = |world: DVec3, endpoint: Endpoint| {
            let p = map.coord_to_index(world, grid.size());
            if map.contains_world(world, grid.size()) {
                Ok(p)
            } else {
                Err(SearchError::OutOfBounds { endpoint, point: p })
            }
        };
        let s = to_index(start, Endpoint::Start)?;
        let g = to_index(goal, Endpoint::Goal)?;
        let res = self.jps_path(grid, s, g, heuristic)?;
        Ok(res.world_points(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Euclidean, Octile, Zero};
    use crate::distance;
    use jumpgrid_core::{Bounds3, GridMap};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn d(x: i32, y: i32, z: i32) -> Direction {
        Direction::new(x, y, z).unwrap()
    }

    fn p(x: i32, y: i32, z: i32) -> Point3 {
        Point3::new(x, y, z)
    }

    fn random_grid(rng: &mut StdRng, size: i32, density: f64) -> OccupancyGrid {
        random_box(rng, p(size, size, size), density)
    }

    fn random_box(rng: &mut StdRng, size: Point3, density: f64) -> OccupancyGrid {
        let mut g = OccupancyGrid::with_size(size.x, size.y, size.z);
        for c in g.bounds() {
            if rng.random_bool(density) {
                g.set_occupied(c, true);
            }
        }
        g
    }

    fn random_free(rng: &mut StdRng, g: &OccupancyGrid) -> Point3 {
        let s = g.size();
        loop {
            let c = p(
                rng.random_range(0..s.x),
                rng.random_range(0..s.y),
                rng.random_range(0..s.z),
            );
            if g.is_free(c) {
                return c;
            }
        }
    }

    /// Every step of the interpolated path is a legal single-cell move.
    fn assert_walkable(grid: &OccupancyGrid, res: &PathResult) {
        let cells = res.interpolate();
        for w in cells.windows(2) {
            let step = w[1] - w[0];
            assert!(step != Point3::ZERO && step.signum() == step, "bad step {step}");
            assert!(grid.is_free(w[1]), "{} is not free", w[1]);
        }
        assert!((res.polyline_length() - res.cost).abs() < 1e-9);
    }

    #[test]
    fn has_forced_probes_the_cross_plane() {
        let t = JumpTable::new();
        let mut g = OccupancyGrid::with_size(5, 5, 5);
        let cell = p(2, 2, 2);
        assert!(!has_forced(&g, &t, cell, d(1, 0, 0)));
        g.set_occupied(p(2, 3, 1), true);
        assert!(has_forced(&g, &t, cell, d(1, 0, 0)));
        assert!(has_forced(&g, &t, cell, d(-1, 0, 0)));
        // Ahead of the move is not a probe.
        assert!(!has_forced(&g, &t, p(1, 3, 1), d(1, 0, 0)));
        assert!(!has_forced(&g, &t, cell, Direction::NONE));
    }

    #[test]
    fn has_forced_ignores_out_of_bounds() {
        let t = JumpTable::new();
        let g = OccupancyGrid::with_size(3, 3, 3);
        for dir in Direction::ALL {
            assert!(!has_forced(&g, &t, p(0, 0, 0), dir));
            assert!(!has_forced(&g, &t, p(2, 2, 2), dir));
        }
    }

    #[test]
    fn jump_stops_at_goal_and_walls() {
        let t = JumpTable::new();
        let mut g = OccupancyGrid::with_size(10, 3, 3);
        let goal = p(9, 2, 2);
        assert_eq!(jump(&g, &t, goal, p(0, 1, 1), d(1, 0, 0)), None);
        assert_eq!(jump(&g, &t, p(6, 1, 1), p(0, 1, 1), d(1, 0, 0)), Some(p(6, 1, 1)));
        g.set_occupied(p(4, 1, 1), true);
        assert_eq!(jump(&g, &t, p(6, 1, 1), p(0, 1, 1), d(1, 0, 0)), None);
        assert_eq!(jump(&g, &t, goal, p(0, 1, 1), Direction::NONE), None);
    }

    #[test]
    fn jump_stops_beside_an_obstacle() {
        let t = JumpTable::new();
        let mut g = OccupancyGrid::with_size(10, 3, 3);
        g.set_occupied(p(5, 0, 1), true);
        assert_eq!(jump(&g, &t, p(9, 2, 2), p(0, 1, 1), d(1, 0, 0)), Some(p(5, 1, 1)));
    }

    #[test]
    fn diagonal_jump_splits_towards_goal() {
        let t = JumpTable::new();
        let g = OccupancyGrid::with_size(10, 10, 1);
        // (2, 2) is where the x component alone leads to the goal.
        assert_eq!(jump(&g, &t, p(7, 2, 0), p(0, 0, 0), d(1, 1, 0)), Some(p(2, 2, 0)));
    }

    #[test]
    fn successors_of_start_cover_all_directions() {
        let t = JumpTable::new();
        let g = OccupancyGrid::with_size(10, 10, 10);
        let mut out = Vec::new();
        successors(&g, &t, p(9, 9, 9), p(0, 0, 0), Direction::NONE, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].point, p(9, 9, 9));
        assert_eq!(out[0].dir, d(1, 1, 1));
        assert!((out[0].cost - 9.0 * 3f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn forced_successor_needs_an_occupied_probe() {
        let t = JumpTable::new();
        let mut g = OccupancyGrid::with_size(6, 3, 1);
        let goal = p(5, 0, 0);
        let mut out = Vec::new();
        successors(&g, &t, goal, p(1, 1, 0), d(1, 0, 0), &mut out);
        assert!(out.is_empty());
        g.set_occupied(p(1, 0, 0), true);
        successors(&g, &t, goal, p(1, 1, 0), d(1, 0, 0), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].dir, d(1, -1, 0));
        assert_eq!(out[0].point, p(2, 0, 0));
    }

    #[test]
    fn empty_cube_diagonal_is_one_jump() {
        let g = OccupancyGrid::with_size(10, 10, 10);
        let mut gs = GridSearch::new();
        let res = gs.jps_path(&g, p(0, 0, 0), p(9, 9, 9), &Euclidean).unwrap();
        assert_eq!(res.points, vec![p(0, 0, 0), p(9, 9, 9)]);
        assert!((res.cost - 9.0 * 3f64.sqrt()).abs() < 1e-9);
        assert_eq!(res.expanded, 1);
    }

    #[test]
    fn empty_grid_aligned_endpoints_are_straight() {
        let g = OccupancyGrid::with_size(8, 8, 8);
        let mut gs = GridSearch::new();
        let start = p(1, 6, 2);
        for dir in Direction::ALL {
            let mut goal = start;
            while g.contains(goal + dir) {
                goal = goal + dir;
            }
            if goal == start {
                continue;
            }
            let res = gs.jps_path(&g, start, goal, &Octile).unwrap();
            assert!((res.polyline_length() - distance::euclidean(start, goal)).abs() < 1e-9);
            assert_eq!(res.points, vec![start, goal]);
        }
    }

    #[test]
    fn empty_grid_cost_is_octile() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = OccupancyGrid::with_size(9, 7, 6);
        let mut gs = GridSearch::new();
        for _ in 0..40 {
            let a = random_free(&mut rng, &g);
            let b = random_free(&mut rng, &g);
            let res = gs.jps_path(&g, a, b, &Euclidean).unwrap();
            assert!((res.cost - distance::octile(a, b)).abs() < 1e-9);
            assert!(res.points.len() <= 4);
            assert_walkable(&g, &res);
        }
    }

    #[test]
    fn corridor_wall_forces_detour_through_jump_points() {
        let mut g = OccupancyGrid::with_size(7, 3, 1);
        g.set_occupied(p(3, 1, 0), true);
        let mut gs = GridSearch::new();
        let res = gs.jps_path(&g, p(0, 1, 0), p(6, 1, 0), &Euclidean).unwrap();
        assert_eq!(
            res.points,
            vec![p(0, 1, 0), p(1, 0, 0), p(3, 0, 0), p(4, 1, 0), p(6, 1, 0)]
        );
        assert!((res.cost - (4.0 + 2.0 * 2f64.sqrt())).abs() < 1e-9);
        assert_eq!(res.interpolate().len(), 7);
        assert_walkable(&g, &res);
    }

    #[test]
    fn start_equals_goal() {
        let g = OccupancyGrid::with_size(4, 4, 4);
        let mut gs = GridSearch::new();
        let res = gs.jps_path(&g, p(1, 2, 3), p(1, 2, 3), &Euclidean).unwrap();
        assert_eq!(res.points, vec![p(1, 2, 3)]);
        assert_eq!(res.cost, 0.0);
        assert_eq!(res.expanded, 0);
    }

    #[test]
    fn endpoint_gates() {
        let mut g = OccupancyGrid::with_size(4, 4, 4);
        g.set_occupied(p(3, 3, 3), true);
        let mut gs = GridSearch::new();
        assert_eq!(
            gs.jps_path(&g, p(0, 0, 0), p(3, 3, 3), &Euclidean),
            Err(SearchError::Occupied {
                endpoint: Endpoint::Goal,
                point: p(3, 3, 3)
            })
        );
        assert_eq!(gs.visited_count(), 0);
        assert_eq!(
            gs.jps_path(&g, p(3, 3, 3), p(0, 0, 0), &Euclidean),
            Err(SearchError::Occupied {
                endpoint: Endpoint::Start,
                point: p(3, 3, 3)
            })
        );
        assert_eq!(
            gs.jps_path(&g, p(0, 0, 4), p(0, 0, 0), &Euclidean),
            Err(SearchError::OutOfBounds {
                endpoint: Endpoint::Start,
                point: p(0, 0, 4)
            })
        );
        assert_eq!(
            gs.jps_path(&g, p(0, 0, 0), p(-1, 0, 0), &Euclidean),
            Err(SearchError::OutOfBounds {
                endpoint: Endpoint::Goal,
                point: p(-1, 0, 0)
            })
        );
    }

    #[test]
    fn sealed_goal_is_unreachable() {
        let mut g = OccupancyGrid::with_size(7, 7, 7);
        let goal = p(5, 5, 5);
        g.fill_box(Bounds3::new(p(4, 4, 4), p(7, 7, 7)), true);
        g.set_occupied(goal, false);
        let mut gs = GridSearch::new();
        match gs.jps_path(&g, p(0, 0, 0), goal, &Euclidean) {
            Err(SearchError::Unreachable { expanded }) => assert!(expanded > 0),
            other => panic!("expected unreachable, got {other:?}"),
        }
    }

    #[test]
    fn wall_with_hole_routes_through_hole() {
        let mut g = OccupancyGrid::with_size(9, 9, 9);
        g.fill_box(Bounds3::new(p(4, 0, 0), p(5, 9, 9)), true);
        let hole = p(4, 7, 1);
        g.set_occupied(hole, false);
        let mut gs = GridSearch::new();
        let jps = gs.jps_path(&g, p(0, 1, 7), p(8, 2, 6), &Octile).unwrap();
        assert!(jps.interpolate().contains(&hole));
        assert_walkable(&g, &jps);
        let reference = gs.astar_path(&g, p(0, 1, 7), p(8, 2, 6), &Octile).unwrap();
        assert!((jps.cost - reference.cost).abs() < 1e-9);
        assert!(reference.interpolate().contains(&hole));
    }

    #[test]
    fn matches_reference_astar_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut gs = GridSearch::new();
        for round in 0..60 {
            let size = 4 + round % 7;
            let density = [0.1, 0.25, 0.4][round % 3];
            let g = random_grid(&mut rng, size as i32, density);
            if g.occupied_count() == g.len() {
                continue;
            }
            let a = random_free(&mut rng, &g);
            let b = random_free(&mut rng, &g);
            let jps = gs.jps_path(&g, a, b, &Euclidean);
            let reference = GridSearch::new().astar_path(&g, a, b, &Euclidean);
            match (jps, reference) {
                (Ok(j), Ok(r)) => {
                    let cost = r.cost;
                    assert!(
                        (j.cost - cost).abs() < 1e-6,
                        "round {round}: jps {} vs reference {cost} from {a} to {b}",
                        j.cost
                    );
                    assert_walkable(&g, &j);
                }
                (Err(SearchError::Unreachable { .. }), Err(SearchError::Unreachable { .. })) => {}
                (j, r) => panic!("round {round}: jps {j:?} vs reference {r:?}"),
            }
        }
    }

    #[test]
    fn matches_reference_astar_on_large_uneven_grids() {
        let mut rng = StdRng::seed_from_u64(0xb0a7);
        let mut gs = GridSearch::new();
        let mut reference = GridSearch::new();
        for round in 0..12 {
            let size = p(
                rng.random_range(15..=20),
                rng.random_range(15..=20),
                rng.random_range(6..=20),
            );
            let density = [0.15, 0.3][round % 2];
            let g = random_box(&mut rng, size, density);
            for _ in 0..3 {
                let a = random_free(&mut rng, &g);
                let b = random_free(&mut rng, &g);
                let jps = gs.jps_path(&g, a, b, &Octile);
                let astar = reference.astar_path(&g, a, b, &Octile);
                match (jps, astar) {
                    (Ok(j), Ok(r)) => {
                        assert!(
                            (j.cost - r.cost).abs() < 1e-6,
                            "grid {size}: jps {} vs reference {} from {a} to {b}",
                            j.cost,
                            r.cost
                        );
                        assert_walkable(&g, &j);
                    }
                    (
                        Err(SearchError::Unreachable { .. }),
                        Err(SearchError::Unreachable { .. }),
                    ) => {}
                    (j, r) => panic!("grid {size}: jps {j:?} vs reference {r:?}"),
                }
            }
        }
    }

    #[test]
    fn closed_f_scores_never_decrease() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut gs = GridSearch::new();
        for _ in 0..10 {
            let g = random_grid(&mut rng, 10, 0.25);
            let a = random_free(&mut rng, &g);
            let b = random_free(&mut rng, &g);
            let _ = gs.jps_path(&g, a, b, &Octile);
            let fs: Vec<f64> = gs.visited().map(|v| v.f).collect();
            assert!(fs.windows(2).all(|w| w[1] >= w[0] - 1e-9));
        }
    }

    #[test]
    fn closed_g_scores_never_decrease_without_heuristic() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut gs = GridSearch::new();
        for _ in 0..10 {
            let g = random_grid(&mut rng, 9, 0.3);
            let a = random_free(&mut rng, &g);
            let b = random_free(&mut rng, &g);
            let _ = gs.jps_path(&g, a, b, &Zero);
            let gscores: Vec<f64> = gs.visited().map(|v| v.g).collect();
            assert!(gscores.windows(2).all(|w| w[1] >= w[0] - 1e-9));
        }
    }

    #[test]
    fn repeated_searches_are_identical() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = random_grid(&mut rng, 12, 0.3);
        let a = random_free(&mut rng, &g);
        let b = random_free(&mut rng, &g);
        let mut gs = GridSearch::new();
        let first = gs.jps_path(&g, a, b, &Euclidean);
        let second = gs.jps_path(&g, a, b, &Euclidean);
        let fresh = GridSearch::new().jps_path(&g, a, b, &Euclidean);
        assert_eq!(first, second);
        assert_eq!(first, fresh);
    }

    #[test]
    fn closure_heuristic() {
        let g = OccupancyGrid::with_size(6, 6, 6);
        let mut gs = GridSearch::new();
        let h = |a: Point3, b: Point3| distance::euclidean(a, b);
        let res = gs.jps_path(&g, p(0, 0, 0), p(5, 3, 0), &h).unwrap();
        assert!((res.cost - distance::octile(p(0, 0, 0), p(5, 3, 0))).abs() < 1e-9);
    }

    #[test]
    fn expansion_limit_stops_search() {
        let mut g = OccupancyGrid::with_size(7, 3, 1);
        g.set_occupied(p(3, 1, 0), true);
        let mut gs = GridSearch::new();
        let limits = SearchLimits::default().with_max_expansions(1);
        let err = gs
            .jps_path_with_limits(&g, p(0, 1, 0), p(6, 1, 0), &Euclidean, &limits)
            .unwrap_err();
        assert!(matches!(err, SearchError::LimitReached { expanded: 1, .. }));
    }

    #[test]
    fn world_path_maps_through_grid_map() {
        let map = GridMap::new(DVec3::new(-2.0, -2.0, 0.0), 0.5).unwrap();
        let g = OccupancyGrid::new(p(8, 8, 4), map).unwrap();
        let mut gs = GridSearch::new();
        let path = gs
            .jps_world_path(&g, DVec3::new(-1.9, -1.9, 0.1), DVec3::new(1.6, -1.9, 0.1), &Euclidean)
            .unwrap();
        assert_eq!(path, vec![DVec3::new(-1.75, -1.75, 0.25), DVec3::new(1.75, -1.75, 0.25)]);
        let err = gs
            .jps_world_path(&g, DVec3::new(-1.9, -1.9, 0.1), DVec3::new(9.0, 0.0, 0.0), &Euclidean)
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::OutOfBounds {
                endpoint: Endpoint::Goal,
                ..
            }
        ));
    }

    #[test]
    fn concurrent_searches_share_a_grid() {
        let mut rng = StdRng::seed_from_u64(21);
        let g = random_grid(&mut rng, 10, 0.2);
        let pairs: Vec<_> = (0..4)
            .map(|_| (random_free(&mut rng, &g), random_free(&mut rng, &g)))
            .collect();
        let serial: Vec<_> = pairs
            .iter()
            .map(|&(a, b)| GridSearch::new().jps_path(&g, a, b, &Euclidean))
            .collect();
        let parallel: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = pairs
                .iter()
                .map(|&(a, b)| {
                    let g = &g;
                    s.spawn(move || GridSearch::new().jps_path(g, a, b, &Euclidean))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(serial, parallel);
    }
}
