//! Shared helpers for the jumpgrid command-line demo.
//!
//! Demonstrates: seeded random obstacle fields, world placement through a
//! `GridMap`, and a minimal stderr logger for the search crates' `log`
//! output.

use jumpgrid_core::{DVec3, GridMap, MapError, OccupancyGrid, Point3};
use jumpgrid_paths::PathResult;
use log::{Level, LevelFilter, Log, Metadata, Record};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters of a random obstacle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub size: Point3,
    /// Probability of each cell being occupied, in `[0, 1]`.
    pub density: f64,
    pub seed: u64,
    /// World size of one cell.
    pub resolution: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            size: Point3::new(32, 32, 8),
            density: 0.2,
            seed: 1,
            resolution: 1.0,
        }
    }
}

/// Build a grid of `cfg.size` cells with obstacles scattered at random.
///
/// The same configuration always yields the same grid.
pub fn random_field(cfg: &SceneConfig) -> Result<OccupancyGrid, MapError> {
    let map = GridMap::new(DVec3::ZERO, cfg.resolution)?;
    let mut grid = OccupancyGrid::new(cfg.size, map)?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let density = if cfg.density.is_nan() {
        0.0
    } else {
        cfg.density.clamp(0.0, 1.0)
    };
    for p in grid.bounds() {
        if rng.random_bool(density) {
            grid.set_occupied(p, true);
        }
    }
    Ok(grid)
}

/// Parse a cell index written as `x,y,z`.
pub fn parse_point(s: &str) -> Result<Point3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got {s:?}"));
    };
    let coord = |v: &str| {
        v.parse::<i32>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok(Point3::new(coord(*x)?, coord(*y)?, coord(*z)?))
}

/// Parse an obstacle density in `[0, 1]`.
pub fn parse_density(s: &str) -> Result<f64, String> {
    let d: f64 = s.parse().map_err(|e| format!("bad density {s:?}: {e}"))?;
    if (0.0..=1.0).contains(&d) {
        Ok(d)
    } else {
        Err(format!("density must be within [0, 1], got {d}"))
    }
}

/// Human-readable multi-line summary of a search result.
pub fn describe(label: &str, res: &PathResult, map: &GridMap) -> String {
    let mut out = format!(
        "{label}: {} points, cost {:.3} cells ({:.3} world), {} expanded\n",
        res.points.len(),
        res.cost,
        res.world_cost(map),
        res.expanded
    );
    for (p, w) in res.points.iter().zip(res.world_points(map)) {
        out.push_str(&format!("  {p} -> ({:.3}, {:.3}, {:.3})\n", w.x, w.y, w.z));
    }
    out
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Send `log` records to stderr: debug and above when `verbose`, warnings
/// otherwise. Calling this twice keeps the first logger.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        Level::Warn.to_level_filter()
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
