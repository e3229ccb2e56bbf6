//! The [`OccupancyGrid`] type: a dense 3D field of free/occupied cells.
//!
//! Cells are stored in one flat buffer indexed by `x·Y·Z + y·Z + z`. A grid
//! is built and mutated up front, then handed to searches by shared
//! reference; nothing in the search path mutates it.

use glam::DVec3;

use crate::geom::{Bounds3, Point3};
use crate::map::{GridMap, MapError};

/// A dense 3D occupancy grid placed in world space by a [`GridMap`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
pub struct OccupancyGrid {
    size: Point3,
    map: GridMap,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Create an all-free grid of `size` cells.
    pub fn new(size: Point3, map: GridMap) -> Result<Self, MapError> {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return Err(MapError::InvalidSize(size));
        }
        let len = Bounds3::from_size(size).len();
        Ok(Self {
            size,
            map,
            cells: vec![false; len],
        })
    }

    /// An all-free grid with unit cells at the world origin.
    ///
    /// Extents below one are raised to one.
    pub fn with_size(x: i32, y: i32, z: i32) -> Self {
        let size = Point3::new(x.max(1), y.max(1), z.max(1));
        Self {
            size,
            map: GridMap::default(),
            cells: vec![false; Bounds3::from_size(size).len()],
        }
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(&self) -> Point3 {
        self.size
    }

    /// The box of valid indices, `[0, size)`.
    #[inline]
    pub fn bounds(&self) -> Bounds3 {
        Bounds3::from_size(self.size)
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The world placement of this grid.
    #[inline]
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    #[inline]
    pub fn contains(&self, p: Point3) -> bool {
        self.bounds().contains(p)
    }

    /// Flat buffer index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn flat_index(&self, p: Point3) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let (sy, sz) = (self.size.y as usize, self.size.z as usize);
        Some(p.x as usize * sy * sz + p.y as usize * sz + p.z as usize)
    }

    /// Inverse of [`flat_index`](OccupancyGrid::flat_index).
    ///
    /// `idx` must be below [`len`](OccupancyGrid::len).
    #[inline]
    pub fn point_of(&self, idx: usize) -> Point3 {
        let (sy, sz) = (self.size.y as usize, self.size.z as usize);
        let x = idx / (sy * sz);
        let rem = idx % (sy * sz);
        Point3::new(x as i32, (rem / sz) as i32, (rem % sz) as i32)
    }

    /// Whether `p` is an obstacle. Out-of-bounds cells are not obstacles.
    #[inline]
    pub fn is_occupied(&self, p: Point3) -> bool {
        self.flat_index(p).is_some_and(|i| self.cells[i])
    }

    /// Whether `p` can be entered. Out-of-bounds cells are never free.
    #[inline]
    pub fn is_free(&self, p: Point3) -> bool {
        self.flat_index(p).is_some_and(|i| !self.cells[i])
    }

    /// Mark `p` occupied or free. Does nothing if out of bounds.
    pub fn set_occupied(&mut self, p: Point3, occupied: bool) {
        if let Some(i) = self.flat_index(p) {
            self.cells[i] = occupied;
        }
    }

    /// Mark the cell holding the world point `world` occupied.
    ///
    /// Points outside the mapped volume are ignored and `false` is
    /// returned.
    pub fn set_obstacle_at(&mut self, world: DVec3) -> bool {
        if !self.map.contains_world(world, self.size) {
            return false;
        }
        let p = self.map.coord_to_index(world, self.size);
        self.set_occupied(p, true);
        true
    }

    /// Set every in-bounds cell of `b` to `occupied`.
    pub fn fill_box(&mut self, b: Bounds3, occupied: bool) {
        for p in b.intersect(self.bounds()) {
            self.set_occupied(p, occupied);
        }
    }

    /// Mark every cell free.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate over the indices of occupied cells, in flat-buffer order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = Point3> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(|(i, _)| self.point_of(i))
    }

    /// Grid index of the cell holding `world` (clamped to the border).
    #[inline]
    pub fn coord_to_index(&self, world: DVec3) -> Point3 {
        self.map.coord_to_index(world, self.size)
    }

    /// World coordinate of the centre of `idx`.
    #[inline]
    pub fn index_to_coord(&self, idx: Point3) -> DVec3 {
        self.map.index_to_coord(idx)
    }
}

/// Unchecked wire form of [`OccupancyGrid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid {
    size: Point3,
    map: GridMap,
    cells: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for OccupancyGrid {
    type Error = MapError;

    fn try_from(raw: RawGrid) -> Result<Self, MapError> {
        let mut grid = OccupancyGrid::new(raw.size, raw.map)?;
        if raw.cells.len() != grid.cells.len() {
            return Err(MapError::CellCount {
                expected: grid.cells.len(),
                found: raw.cells.len(),
            });
        }
        grid.cells = raw.cells;
        Ok(grid)
    }
}
