use jumpgrid_core::{Direction, Point3};

/// Reusable buffer for enumerating the 26 neighbors of a grid cell,
/// filtered by a predicate.
#[derive(Debug, Clone)]
pub(crate) struct Neighbors {
    buf: Vec<Point3>,
}

impl Neighbors {
    pub(crate) fn new() -> Self {
        Self {
            buf: Vec::with_capacity(26),
        }
    }

    /// Return all 26 neighbors of `p`, keeping only those for which `keep`
    /// returns `true`. Neighbors come in [`Direction::ALL`] order.
    pub(crate) fn all(&mut self, p: Point3, keep: impl Fn(Point3) -> bool) -> &[Point3] {
        self.buf.clear();
        for d in Direction::ALL {
            let n = p + d;
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
