//! Affine mapping between world coordinates and grid indices.

use std::fmt;

use glam::DVec3;

use crate::geom::Point3;

/// World-space placement of a grid: the lower corner of cell (0, 0, 0) and
/// the edge length of one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGridMap"))]
pub struct GridMap {
    origin: DVec3,
    resolution: f64,
}

impl Default for GridMap {
    /// Unit cells with the origin at zero, so indices and world coordinates
    /// only differ by the half-cell centre offset.
    fn default() -> Self {
        Self {
            origin: DVec3::ZERO,
            resolution: 1.0,
        }
    }
}

impl GridMap {
    /// Create a mapping. `resolution` must be finite and positive.
    pub fn new(origin: DVec3, resolution: f64) -> Result<Self, MapError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(MapError::InvalidResolution(resolution));
        }
        if !origin.is_finite() {
            return Err(MapError::InvalidOrigin(origin));
        }
        Ok(Self { origin, resolution })
    }

    /// World coordinate of the lower corner of the grid.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Edge length of one cell in world units.
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// World coordinate of the upper corner of a grid of `size` cells.
    #[inline]
    pub fn upper(&self, size: Point3) -> DVec3 {
        self.origin + to_dvec(size) * self.resolution
    }

    /// Whether `world` falls inside a grid of `size` cells.
    pub fn contains_world(&self, world: DVec3, size: Point3) -> bool {
        let hi = self.upper(size);
        world.cmpge(self.origin).all() && world.cmplt(hi).all()
    }

    /// Grid index of the cell holding `world`, clamped into `[0, size)`
    /// per axis so that points outside the volume snap to the border.
    pub fn coord_to_index(&self, world: DVec3, size: Point3) -> Point3 {
        let rel = ((world - self.origin) / self.resolution).floor();
        let clamp = |v: f64, n: i32| -> i32 {
            let hi = (n - 1).max(0);
            // NaN casts to 0.
            (v.max(0.0).min(hi as f64)) as i32
        };
        Point3::new(
            clamp(rel.x, size.x),
            clamp(rel.y, size.y),
            clamp(rel.z, size.z),
        )
    }

    /// World coordinate of the centre of cell `idx`.
    #[inline]
    pub fn index_to_coord(&self, idx: Point3) -> DVec3 {
        (to_dvec(idx) + DVec3::splat(0.5)) * self.resolution + self.origin
    }
}

/// Unchecked wire form of [`GridMap`]; validated through [`GridMap::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGridMap {
    origin: DVec3,
    resolution: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGridMap> for GridMap {
    type Error = MapError;

    fn try_from(raw: RawGridMap) -> Result<Self, MapError> {
        GridMap::new(raw.origin, raw.resolution)
    }
}

#[inline]
fn to_dvec(p: Point3) -> DVec3 {
    DVec3::new(p.x as f64, p.y as f64, p.z as f64)
}

/// Errors raised when building a [`GridMap`] or an occupancy grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapError {
    /// Resolution is zero, negative or not finite.
    InvalidResolution(f64),
    /// Origin has a non-finite component.
    InvalidOrigin(DVec3),
    /// A grid extent is zero or negative.
    InvalidSize(Point3),
    /// A cell buffer does not hold exactly one flag per cell.
    CellCount { expected: usize, found: usize },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResolution(r) => write!(f, "grid resolution must be positive, got {r}"),
            Self::InvalidOrigin(o) => write!(f, "grid origin must be finite, got {o}"),
            Self::InvalidSize(s) => write!(f, "grid size must be positive on every axis, got {s}"),
            Self::CellCount { expected, found } => {
                write!(f, "grid needs {expected} cells, got {found}")
            }
        }
    }
}

impl std::error::Error for MapError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> GridMap {
        GridMap::new(DVec3::new(-5.0, -5.0, 0.0), 0.5).unwrap()
    }

    #[test]
    fn rejects_bad_resolution() {
        assert_eq!(
            GridMap::new(DVec3::ZERO, 0.0),
            Err(MapError::InvalidResolution(0.0))
        );
        assert!(GridMap::new(DVec3::ZERO, -1.0).is_err());
        assert!(GridMap::new(DVec3::ZERO, f64::NAN).is_err());
        assert!(GridMap::new(DVec3::new(f64::INFINITY, 0.0, 0.0), 1.0).is_err());
    }

    #[test]
    fn coord_index_round_trip_hits_cell_centre() {
        let m = map();
        let size = Point3::new(20, 20, 10);
        let idx = Point3::new(3, 7, 2);
        let c = m.index_to_coord(idx);
        assert_eq!(c, DVec3::new(-3.25, -1.25, 1.25));
        assert_eq!(m.coord_to_index(c, size), idx);
    }

    #[test]
    fn coord_to_index_clamps_outside_points() {
        let m = map();
        let size = Point3::new(20, 20, 10);
        assert_eq!(
            m.coord_to_index(DVec3::new(-100.0, 100.0, 2.6), size),
            Point3::new(0, 19, 5)
        );
        assert_eq!(
            m.coord_to_index(DVec3::splat(f64::NAN), size),
            Point3::ZERO
        );
    }

    #[test]
    fn contains_world_is_half_open() {
        let m = map();
        let size = Point3::new(20, 20, 10);
        assert_eq!(m.upper(size), DVec3::new(5.0, 5.0, 5.0));
        assert!(m.contains_world(DVec3::new(-5.0, -5.0, 0.0), size));
        assert!(!m.contains_world(DVec3::new(5.0, 0.0, 0.0), size));
        assert!(!m.contains_world(DVec3::new(0.0, 0.0, -0.1), size));
    }
}
