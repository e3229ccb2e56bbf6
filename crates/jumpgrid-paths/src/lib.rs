//! Shortest paths over 3D occupancy grids.
//!
//! This crate finds optimal paths on a [`jumpgrid_core::OccupancyGrid`]
//! under the 26-connected move model: a step may go to any of the 26
//! surrounding cells as long as that cell is free, and costs its length
//! (1, √2 or √3).
//!
//! - **Jump Point Search** ([`GridSearch::jps_path`]) returns only the
//!   turning points of an optimal path and expands far fewer nodes than A*
//!   on open grids.
//! - **A\*** ([`GridSearch::astar_path`]) returns every cell of an optimal
//!   path. It shares the search loop with JPS and serves as a reference.
//!
//! Both run through [`GridSearch`], which owns and reuses its node registry
//! and open set so that repeated queries allocate nothing after warm-up.
//!
//! # Extension points
//!
//! | Item | Purpose |
//! |---|---|
//! | [`Heuristic`] | remaining-cost estimate; closures work too |
//! | [`SearchLimits`] | expansion budget and deadline per query |
//! | [`JumpTable`] | direction-keyed natural and forced neighbor rules |

mod astar;
mod distance;
mod error;
mod jps;
mod limits;
mod neighbors;
mod pattern;
mod search;
mod traits;

pub use distance::{chebyshev, euclidean, manhattan, octile};
pub use error::{Endpoint, Limit, SearchError};
pub use jps::{has_forced, jump};
pub use limits::SearchLimits;
pub use pattern::{ForcedNeighbor, JumpRow, JumpTable};
pub use search::{GridSearch, NodeState, PathResult, VisitedNode};
pub use traits::{Euclidean, Heuristic, Octile, Zero};
