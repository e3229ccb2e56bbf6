use jumpgrid_core::Point3;

/// Manhattan (L1) distance between two cells.
#[inline]
pub fn manhattan(a: Point3, b: Point3) -> i32 {
    (a - b).norm1()
}

/// Chebyshev (L∞) distance between two cells.
#[inline]
pub fn chebyshev(a: Point3, b: Point3) -> i32 {
    let d = a - b;
    d.x.abs().max(d.y.abs()).max(d.z.abs())
}

/// Straight-line distance between two cells.
#[inline]
pub fn euclidean(a: Point3, b: Point3) -> f64 {
    (a - b).euclidean_len()
}

/// 3D diagonal ("octile") distance: the cost of the cheapest path between
/// two cells on an obstacle-free 26-connected grid, with steps costing 1, √2
/// and √3.
#[inline]
pub fn octile(a: Point3, b: Point3) -> f64 {
    let d = a - b;
    let mut v = [d.x.abs(), d.y.abs(), d.z.abs()];
    v.sort_unstable();
    let [lo, mid, hi] = v.map(f64::from);
    let sqrt2 = std::f64::consts::SQRT_2;
    let sqrt3 = 3f64.sqrt();
    sqrt3 * lo + sqrt2 * (mid - lo) + (hi - mid)
}
