//! **jumpgrid-core**: 3D occupancy grids and integer geometry.
//!
//! This crate provides the types shared by the *jumpgrid* search crates:
//! grid indices and unit directions, a dense free/occupied voxel grid, and
//! the affine transform placing that grid in world space.

pub mod geom;
pub mod grid;
pub mod map;

pub use geom::{Bounds3, Bounds3Iter, Direction, InvalidDirection, Point3};
pub use glam::DVec3;
pub use grid::OccupancyGrid;
pub use map::{GridMap, MapError};
