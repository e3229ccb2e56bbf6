use std::cmp::Ordering;
use std::collections::BinaryHeap;

use jumpgrid_core::{DVec3, Direction, GridMap, OccupancyGrid, Point3};

use crate::error::{Endpoint, SearchError};
use crate::limits::SearchLimits;
use crate::traits::Heuristic;

/// A successful search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    /// Cells from start to goal inclusive. For Jump Point Search these are
    /// the jump points; consecutive entries always lie on one straight
    /// 26-direction ray.
    pub points: Vec<Point3>,
    /// Total cost in cell units.
    pub cost: f64,
    /// Number of nodes expanded.
    pub expanded: usize,
}

impl PathResult {
    /// Sum of the straight-line lengths between consecutive points.
    pub fn polyline_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1] - w[0]).euclidean_len())
            .sum()
    }

    /// Expand the path into every traversed cell.
    pub fn interpolate(&self) -> Vec<Point3> {
        let Some(&last) = self.points.last() else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(self.points.len());
        for w in self.points.windows(2) {
            let step = Direction::between(w[0], w[1]);
            let mut c = w[0];
            while c != w[1] {
                out.push(c);
                c = c + step;
            }
        }
        out.push(last);
        out
    }

    /// Cell-centre world coordinates of the path points.
    pub fn world_points(&self, map: &GridMap) -> Vec<DVec3> {
        self.points.iter().map(|&p| map.index_to_coord(p)).collect()
    }

    /// Path cost in world units.
    #[inline]
    pub fn world_cost(&self, map: &GridMap) -> f64 {
        self.cost * map.resolution()
    }
}

/// A node closed during the last search, in closing order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisitedNode {
    pub point: Point3,
    pub g: f64,
    pub f: f64,
}

/// A node reachable from the node being expanded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Successor {
    pub(crate) point: Point3,
    /// Direction of the final move into `point`.
    pub(crate) dir: Direction,
    pub(crate) cost: f64,
}

// ---------------------------------------------------------------------------
// Node registry
// ---------------------------------------------------------------------------

/// Open/closed membership of a search node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeState {
    #[default]
    Unvisited,
    Open,
    Closed,
}

#[derive(Clone, Default)]
struct Node {
    g: f64,
    f: f64,
    parent: Option<usize>,
    dir: Direction,
    state: NodeState,
    generation: u32,
}

/// Open-set entry: a node index with the `f` it was pushed with.
///
/// Ordered so that `BinaryHeap` pops the lowest `f` first and, among equal
/// `f`, the entry pushed first.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    idx: usize,
    f: f64,
    seq: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// GridSearch
// ---------------------------------------------------------------------------

/// Reusable workspace for searches over an [`OccupancyGrid`].
///
/// `GridSearch` owns the node registry, the open set and scratch buffers,
/// so repeated queries allocate nothing once warmed up. Nodes are
/// invalidated lazily between searches with a generation counter: every
/// search starts with every cell unvisited.
///
/// The grid is only borrowed for the duration of a query. Several threads
/// can search the same grid at once, each with its own `GridSearch`.
#[derive(Default)]
pub struct GridSearch {
    nodes: Vec<Node>,
    generation: u32,
    open: BinaryHeap<OpenEntry>,
    seq: u64,
    closed: Vec<usize>,
    succ_buf: Vec<Successor>,
    size: Point3,
}

impl GridSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes closed by the last search, in the order they were closed.
    pub fn visited(&self) -> impl Iterator<Item = VisitedNode> + '_ {
        let (sy, sz) = (self.size.y.max(1) as usize, self.size.z.max(1) as usize);
        self.closed.iter().map(move |&i| {
            let n = &self.nodes[i];
            let x = i / (sy * sz);
            let rem = i % (sy * sz);
            VisitedNode {
                point: Point3::new(x as i32, (rem / sz) as i32, (rem % sz) as i32),
                g: n.g,
                f: n.f,
            }
        })
    }

    /// Number of nodes closed by the last search.
    pub fn visited_count(&self) -> usize {
        self.closed.len()
    }

    /// Membership of `p` in the last search. Cells outside the last
    /// searched grid are reported as unvisited.
    pub fn node_state(&self, p: Point3) -> NodeState {
        let s = self.size;
        if !(0..s.x).contains(&p.x) || !(0..s.y).contains(&p.y) || !(0..s.z).contains(&p.z) {
            return NodeState::Unvisited;
        }
        let idx = (p.x as usize * s.y as usize + p.y as usize) * s.z as usize + p.z as usize;
        if idx < self.nodes.len() {
            self.state(idx)
        } else {
            NodeState::Unvisited
        }
    }

    #[inline]
    fn state(&self, idx: usize) -> NodeState {
        let n = &self.nodes[idx];
        if n.generation == self.generation {
            n.state
        } else {
            NodeState::Unvisited
        }
    }

    /// Start a new search over `grid`: size the registry and invalidate
    /// every node from previous searches.
    fn begin(&mut self, grid: &OccupancyGrid) {
        if self.nodes.len() < grid.len() {
            self.nodes.resize(grid.len(), Node::default());
        }
        self.size = grid.size();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Counter wrapped: stale nodes could alias the new generation.
            self.nodes.fill(Node::default());
            self.generation = 1;
        }
        self.open.clear();
        self.seq = 0;
        self.closed.clear();
    }

    /// Claim a node for the current search, resetting it to `Unvisited`.
    #[inline]
    fn register(&mut self, idx: usize) -> &mut Node {
        let generation = self.generation;
        let n = &mut self.nodes[idx];
        if n.generation != generation {
            *n = Node {
                generation,
                ..Node::default()
            };
        }
        n
    }

    fn push(&mut self, idx: usize, f: f64) {
        self.open.push(OpenEntry {
            idx,
            f,
            seq: self.seq,
        });
        self.seq += 1;
    }

    /// Validate the endpoints of a query.
    pub(crate) fn check_endpoints(
        grid: &OccupancyGrid,
        start: Point3,
        goal: Point3,
    ) -> Result<(usize, usize), SearchError> {
        let start_idx = grid.flat_index(start).ok_or(SearchError::OutOfBounds {
            endpoint: Endpoint::Start,
            point: start,
        })?;
        let goal_idx = grid.flat_index(goal).ok_or(SearchError::OutOfBounds {
            endpoint: Endpoint::Goal,
            point: goal,
        })?;
        if grid.is_occupied(start) {
            return Err(SearchError::Occupied {
                endpoint: Endpoint::Start,
                point: start,
            });
        }
        if grid.is_occupied(goal) {
            return Err(SearchError::Occupied {
                endpoint: Endpoint::Goal,
                point: goal,
            });
        }
        Ok((start_idx, goal_idx))
    }

    /// Best-first search loop shared by A* and Jump Point Search.
    ///
    /// `expand` fills the buffer with the successors of a node given its
    /// cell and incoming direction.
    pub(crate) fn run<H, E>(
        &mut self,
        algo: &str,
        grid: &OccupancyGrid,
        start: Point3,
        goal: Point3,
        heuristic: &H,
        limits: &SearchLimits,
        mut expand: E,
    ) -> Result<PathResult, SearchError>
    where
        H: Heuristic + ?Sized,
        E: FnMut(Point3, Direction, &mut Vec<Successor>),
    {
        let (start_idx, goal_idx) = Self::check_endpoints(grid, start, goal)?;
        self.begin(grid);

        let h0 = heuristic.estimate(start, goal);
        {
            let n = self.register(start_idx);
            n.g = 0.0;
            n.f = h0;
            n.parent = None;
            n.dir = Direction::NONE;
            n.state = NodeState::Open;
        }
        self.push(start_idx, h0);

        let mut succ = std::mem::take(&mut self.succ_buf);
        let mut expanded = 0;

        let outcome = loop {
            if let Some(limit) = limits.exceeded(expanded) {
                break Err(SearchError::LimitReached { limit, expanded });
            }
            let Some(entry) = self.open.pop() else {
                break Err(SearchError::Unreachable { expanded });
            };
            let ci = entry.idx;

            // Skip stale entries.
            if self.state(ci) != NodeState::Open || entry.f > self.nodes[ci].f {
                continue;
            }
            self.nodes[ci].state = NodeState::Closed;
            self.closed.push(ci);

            if ci == goal_idx {
                break Ok(());
            }

            let cur = grid.point_of(ci);
            let (cur_g, cur_dir) = (self.nodes[ci].g, self.nodes[ci].dir);
            log::trace!("{algo}: expand {cur} g={cur_g:.3} dir={cur_dir}");
            expanded += 1;

            succ.clear();
            expand(cur, cur_dir, &mut succ);

            for s in &succ {
                let Some(ni) = grid.flat_index(s.point) else {
                    continue;
                };
                let tentative_g = cur_g + s.cost;
                match self.state(ni) {
                    NodeState::Unvisited => {
                        let f = tentative_g + heuristic.estimate(s.point, goal);
                        let n = self.register(ni);
                        n.g = tentative_g;
                        n.f = f;
                        n.parent = Some(ci);
                        n.dir = s.dir;
                        n.state = NodeState::Open;
                        self.push(ni, f);
                    }
                    NodeState::Open => {
                        if tentative_g >= self.nodes[ni].g {
                            continue;
                        }
                        let f = tentative_g + heuristic.estimate(s.point, goal);
                        let n = &mut self.nodes[ni];
                        n.g = tentative_g;
                        n.f = f;
                        n.parent = Some(ci);
                        n.dir = Direction::between(cur, s.point);
                        self.push(ni, f);
                    }
                    NodeState::Closed => {}
                }
            }
        };

        self.succ_buf = succ;

        match outcome {
            Ok(()) => {
                let points = self.reconstruct(grid, goal_idx);
                let cost = self.nodes[goal_idx].g;
                log::debug!(
                    "{algo}: {start} -> {goal} cost {cost:.3} via {} points, {expanded} expanded",
                    points.len()
                );
                Ok(PathResult {
                    points,
                    cost,
                    expanded,
                })
            }
            Err(e) => {
                log::debug!("{algo}: {start} -> {goal} failed: {e}");
                Err(e)
            }
        }
    }

    fn reconstruct(&self, grid: &OccupancyGrid, goal_idx: usize) -> Vec<Point3> {
        let mut points = Vec::new();
        let mut cur = Some(goal_idx);
        while let Some(i) = cur {
            points.push(grid.point_of(i));
            cur = self.nodes[i].parent;
        }
        points.reverse();
        points
    }
}
