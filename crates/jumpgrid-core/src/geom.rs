//! Geometry primitives: [`Point3`], [`Direction`] and [`Bounds3`].
//!
//! Grid indices are integer triples. Directions are unit steps towards one of
//! the 26 neighbouring cells, plus the [`Direction::NONE`] sentinel carried by
//! a search's start node.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

// ---------------------------------------------------------------------------
// Point3
// ---------------------------------------------------------------------------

/// A 3D integer point, used as a grid index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3 {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return a point shifted by (dx, dy, dz).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Component-wise sign.
    #[inline]
    pub const fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum(), self.z.signum())
    }

    /// L1 norm.
    #[inline]
    pub const fn norm1(self) -> i32 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }

    /// Euclidean length of the point seen as a vector.
    #[inline]
    pub fn euclidean_len(self) -> f64 {
        let (x, y, z) = (self.x as f64, self.y as f64, self.z as f64);
        (x * x + y * y + z * z).sqrt()
    }

    /// Whether the point is inside the half-open box.
    #[inline]
    pub fn in_bounds(self, b: &Bounds3) -> bool {
        b.contains(self)
    }

    /// The six face neighbours.
    #[inline]
    pub fn neighbors_6(self) -> [Point3; 6] {
        [
            self.shift(1, 0, 0),
            self.shift(-1, 0, 0),
            self.shift(0, 1, 0),
            self.shift(0, -1, 0),
            self.shift(0, 0, 1),
            self.shift(0, 0, -1),
        ]
    }

    /// All 26 neighbours, in [`Direction::ALL`] order.
    #[inline]
    pub fn neighbors_26(self) -> [Point3; 26] {
        Direction::ALL.map(|d| self + d)
    }
}

impl PartialOrd for Point3 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point3 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.z
            .cmp(&other.z)
            .then(self.y.cmp(&other.y))
            .then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<i32> for Point3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Point3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<[i32; 3]> for Point3 {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3> for [i32; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// A unit step on the 3D grid: every component is -1, 0 or 1.
///
/// The all-zero value is [`Direction::NONE`], the "no incoming direction"
/// sentinel of a search's start node. Every other value is one of the 26
/// moves listed in [`Direction::ALL`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Point3", into = "Point3"))]
pub struct Direction(Point3);

impl Direction {
    /// Number of distinct encodings, including [`Direction::NONE`].
    pub const COUNT: usize = 27;

    /// The start-node sentinel.
    pub const NONE: Self = Self(Point3::ZERO);

    /// The 26 movement directions, z-major then y then x.
    pub const ALL: [Direction; 26] = {
        let mut out = [Self::NONE; 26];
        let mut i = 0;
        let mut code = 0;
        while code < 27 {
            if code != 13 {
                out[i] = Self::decode(code);
                i += 1;
            }
            code += 1;
        }
        out
    };

    /// Create a direction, or `None` if a component is outside -1..=1.
    #[inline]
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Option<Self> {
        if dx < -1 || dx > 1 || dy < -1 || dy > 1 || dz < -1 || dz > 1 {
            return None;
        }
        Some(Self(Point3::new(dx, dy, dz)))
    }

    /// Component-wise sign of `to - from`.
    #[inline]
    pub const fn between(from: Point3, to: Point3) -> Self {
        Self(Point3::new(
            (to.x - from.x).signum(),
            (to.y - from.y).signum(),
            (to.z - from.z).signum(),
        ))
    }

    #[inline]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    #[inline]
    pub const fn y(self) -> i32 {
        self.0.y
    }

    #[inline]
    pub const fn z(self) -> i32 {
        self.0.z
    }

    /// The direction as a point offset.
    #[inline]
    pub const fn offset(self) -> Point3 {
        self.0
    }

    /// Number of axes this move changes: 0 for `NONE`, 1 for face moves,
    /// 2 for edge diagonals and 3 for corner diagonals.
    #[inline]
    pub const fn norm1(self) -> usize {
        self.0.norm1() as usize
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0.x == 0 && self.0.y == 0 && self.0.z == 0
    }

    /// Index into the 3x3x3 cube: `(dx+1) + 3(dy+1) + 9(dz+1)`.
    #[inline]
    pub const fn encoding(self) -> usize {
        ((self.0.x + 1) + 3 * (self.0.y + 1) + 9 * (self.0.z + 1)) as usize
    }

    /// Inverse of [`encoding`](Direction::encoding).
    #[inline]
    pub const fn from_encoding(code: usize) -> Option<Self> {
        if code >= Self::COUNT {
            return None;
        }
        Some(Self::decode(code as i32))
    }

    const fn decode(code: i32) -> Self {
        Self(Point3::new(code % 3 - 1, (code / 3) % 3 - 1, code / 9 - 1))
    }

    /// Length of one step in this direction: 1, √2 or √3 (0 for `NONE`).
    #[inline]
    pub fn step_cost(self) -> f64 {
        (self.norm1() as f64).sqrt()
    }

    /// The reversed direction.
    #[inline]
    pub const fn reversed(self) -> Self {
        Self(Point3::new(-self.0.x, -self.0.y, -self.0.z))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.0.x, self.0.y, self.0.z)
    }
}

impl Add<Direction> for Point3 {
    type Output = Point3;
    #[inline]
    fn add(self, rhs: Direction) -> Point3 {
        self + rhs.0
    }
}

impl From<Direction> for Point3 {
    fn from(d: Direction) -> Self {
        d.0
    }
}

impl TryFrom<Point3> for Direction {
    type Error = InvalidDirection;

    fn try_from(p: Point3) -> Result<Self, Self::Error> {
        Self::new(p.x, p.y, p.z).ok_or(InvalidDirection(p))
    }
}

/// A [`Point3`] with a component outside -1..=1 was used as a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDirection(pub Point3);

impl fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a unit grid direction", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

// ---------------------------------------------------------------------------
// Bounds3
// ---------------------------------------------------------------------------

/// A half-open box \[min, max). `min` is inclusive, `max` is exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds3 {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds3 {
    /// Create a box from two corners, canonicalized so that `min` ≤ `max`
    /// on each axis.
    #[inline]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// The box `[0, size)`. Negative extents are treated as zero.
    #[inline]
    pub fn from_size(size: Point3) -> Self {
        Self {
            min: Point3::ZERO,
            max: Point3::new(size.x.max(0), size.y.max(0), size.z.max(0)),
        }
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(self) -> Point3 {
        self.max - self.min
    }

    /// Whether the box holds no cell.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    /// Number of cells in the box.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let s = self.size();
        s.x as usize * s.y as usize * s.z as usize
    }

    #[inline]
    pub fn contains(self, p: Point3) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x < self.max.x
            && p.y < self.max.y
            && p.z < self.max.z
    }

    /// Intersection of two boxes (empty if they do not overlap).
    #[inline]
    pub fn intersect(self, other: Bounds3) -> Self {
        let r = Self {
            min: Point3::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Point3::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Iterate over all cells, x fastest, then y, then z.
    #[inline]
    pub fn iter(self) -> Bounds3Iter {
        Bounds3Iter {
            bounds: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for Bounds3 {
    type Item = Point3;
    type IntoIter = Bounds3Iter;

    #[inline]
    fn into_iter(self) -> Bounds3Iter {
        self.iter()
    }
}

impl fmt::Display for Bounds3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

/// Iterator over the cells of a [`Bounds3`].
#[derive(Clone, Debug)]
pub struct Bounds3Iter {
    bounds: Bounds3,
    cur: Point3,
}

impl Iterator for Bounds3Iter {
    type Item = Point3;

    #[inline]
    fn next(&mut self) -> Option<Point3> {
        if self.bounds.is_empty() || self.cur.z >= self.bounds.max.z {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.bounds.max.x {
            self.cur.x = self.bounds.min.x;
            self.cur.y += 1;
            if self.cur.y >= self.bounds.max.y {
                self.cur.y = self.bounds.min.y;
                self.cur.z += 1;
            }
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.bounds.is_empty() || self.cur.z >= self.bounds.max.z {
            return (0, Some(0));
        }
        let s = self.bounds.size();
        let (w, h) = (s.x as usize, s.y as usize);
        let in_row = (self.bounds.max.x - self.cur.x) as usize;
        let rows_in_layer = (self.bounds.max.y - self.cur.y - 1) as usize;
        let layers = (self.bounds.max.z - self.cur.z - 1) as usize;
        let total = in_row + rows_in_layer * w + layers * w * h;
        (total, Some(total))
    }
}

impl ExactSizeIterator for Bounds3Iter {}
