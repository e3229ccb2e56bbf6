//! Direction-keyed neighbour tables for 3D Jump Point Search.
//!
//! For every incoming direction (indexed by [`Direction::encoding`]) a
//! [`JumpRow`] lists:
//!
//! - the *natural* directions to keep exploring, with the straight
//!   continuation always last, so jumping can branch over every entry but
//!   the last;
//! - the *forced* entries: a probe offset and the direction to expand when
//!   the probed cell is an obstacle;
//! - the distinct probe offsets, used to decide whether a cell reached by a
//!   jump has a forced neighbour.
//!
//! | norm | natural | forced | probes |
//! |---|---|---|---|
//! | 0 (start) | 26 | 0 | 0 |
//! | 1 | 1 | 8 | 8 |
//! | 2 | 3 | 12 | 8 |
//! | 3 | 7 | 12 | 6 |

use std::sync::LazyLock;

use jumpgrid_core::{Direction, Point3};

/// A forced-neighbour rule: when `probe` (relative to the current cell) is
/// occupied, `expand` must also be explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedNeighbor {
    pub probe: Point3,
    pub expand: Direction,
}

/// Table row for one incoming direction.
#[derive(Debug, Clone, Default)]
pub struct JumpRow {
    natural: Vec<Direction>,
    forced: Vec<ForcedNeighbor>,
    probes: Vec<Point3>,
}

impl JumpRow {
    /// Directions explored unconditionally; the straight move comes last.
    #[inline]
    pub fn natural(&self) -> &[Direction] {
        &self.natural
    }

    /// Natural directions minus the straight continuation.
    #[inline]
    pub fn branches(&self) -> &[Direction] {
        match self.natural.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Probe-gated expansion directions.
    #[inline]
    pub fn forced(&self) -> &[ForcedNeighbor] {
        &self.forced
    }

    /// Distinct probe offsets.
    #[inline]
    pub fn probes(&self) -> &[Point3] {
        &self.probes
    }
}

/// Neighbour tables for all 27 direction encodings.
#[derive(Debug, Clone)]
pub struct JumpTable {
    rows: Vec<JumpRow>,
}

static SHARED: LazyLock<JumpTable> = LazyLock::new(JumpTable::new);

impl Default for JumpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JumpTable {
    /// Build the tables.
    pub fn new() -> Self {
        let rows = (0..Direction::COUNT)
            .map(|code| {
                let d = Direction::from_encoding(code).unwrap_or(Direction::NONE);
                let forced = forced_neighbors(d);
                let mut probes: Vec<Point3> = Vec::with_capacity(8);
                for f in &forced {
                    if !probes.contains(&f.probe) {
                        probes.push(f.probe);
                    }
                }
                JumpRow {
                    natural: natural_dirs(d),
                    forced,
                    probes,
                }
            })
            .collect();
        Self { rows }
    }

    /// Process-wide instance, built on first use.
    #[inline]
    pub fn shared() -> &'static JumpTable {
        &SHARED
    }

    #[inline]
    pub fn row(&self, d: Direction) -> &JumpRow {
        &self.rows[d.encoding()]
    }
}

// ---------------------------------------------------------------------------
// Row construction
// ---------------------------------------------------------------------------

const AXES: [usize; 3] = [0, 1, 2];

fn comps(d: Direction) -> [i32; 3] {
    [d.x(), d.y(), d.z()]
}

fn dir(c: [i32; 3]) -> Direction {
    Direction::new(c[0], c[1], c[2]).unwrap_or(Direction::NONE)
}

fn offset(c: [i32; 3]) -> Point3 {
    Point3::new(c[0], c[1], c[2])
}

/// Bitmask of the axes `d` moves along.
fn axis_mask(d: Direction) -> u8 {
    let c = comps(d);
    AXES.iter()
        .filter(|&&a| c[a] != 0)
        .fold(0, |m, &a| m | (1 << a))
}

/// Keep only the components of `d` whose axis bit is set in `mask`.
fn masked(d: Direction, mask: u8) -> Direction {
    let mut c = comps(d);
    for a in AXES {
        if mask & (1 << a) == 0 {
            c[a] = 0;
        }
    }
    dir(c)
}

/// Every direction built from a non-empty subset of `d`'s components,
/// fewest components first; `d` itself comes last.
fn natural_dirs(d: Direction) -> Vec<Direction> {
    if d.is_none() {
        return Direction::ALL.to_vec();
    }
    let full = axis_mask(d);
    let mut masks: Vec<u8> = (1..8u8).filter(|m| m & !full == 0).collect();
    masks.sort_by_key(|m| (m.count_ones(), *m));
    masks.into_iter().map(|m| masked(d, m)).collect()
}

fn forced_neighbors(d: Direction) -> Vec<ForcedNeighbor> {
    let c = comps(d);
    let moving: Vec<usize> = AXES.into_iter().filter(|&a| c[a] != 0).collect();
    let still: Vec<usize> = AXES.into_iter().filter(|&a| c[a] == 0).collect();
    let mut out = Vec::with_capacity(12);
    let mut push = |probe: [i32; 3], expand: [i32; 3]| {
        out.push(ForcedNeighbor {
            probe: offset(probe),
            expand: dir(expand),
        });
    };
    // Step back along one moving axis.
    let back = |w: usize| {
        let mut p = [0; 3];
        p[w] = -c[w];
        p
    };
    let flip = |mut v: [i32; 3], w: usize| {
        v[w] = -v[w];
        v
    };

    match moving.len() {
        1 => {
            // Any obstacle in the plane across the move.
            let (a, b) = (still[0], still[1]);
            for (sa, sb) in [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)] {
                let mut probe = [0; 3];
                probe[a] = sa;
                probe[b] = sb;
                let mut expand = c;
                expand[a] = sa;
                expand[b] = sb;
                push(probe, expand);
            }
        }
        2 => {
            let a = still[0];
            for &w in &moving {
                push(back(w), flip(c, w));
            }
            for s in [1, -1] {
                let mut probe = [0; 3];
                probe[a] = s;
                let mut expand = c;
                expand[a] = s;
                push(probe, expand);
            }
            for s in [1, -1] {
                for &w in &moving {
                    let mut probe = back(w);
                    probe[a] = s;
                    let mut expand = flip(c, w);
                    expand[a] = s;
                    push(probe, expand);
                }
            }
            // Same probes as above, expanding the planar turns.
            for s in [1, -1] {
                for &w in &moving {
                    let mut probe = [0; 3];
                    probe[a] = s;
                    let mut expand = c;
                    expand[w] = 0;
                    expand[a] = s;
                    push(probe, expand);
                }
            }
        }
        3 => {
            for w in AXES {
                push(back(w), flip(c, w));
            }
            for (w1, w2) in [(1, 2), (0, 2), (0, 1)] {
                let mut probe = back(w1);
                probe[w2] = -c[w2];
                push(probe, flip(flip(c, w1), w2));
            }
            for w in AXES {
                for other in AXES.into_iter().filter(|&o| o != w) {
                    let mut expand = flip(c, w);
                    expand[other] = 0;
                    push(back(w), expand);
                }
            }
        }
        _ => {}
    }
    out
}
