//! Axial hex lattice primitives.
//!
//! Coordinates are axial `(q, r)`: `q` grows to the right, `r` grows downward
//! and every step in `r` shifts half a key to the right on screen. The
//! lattice is unbounded; only a [`crate::hexmap::HexMap`] decides which
//! points carry a physical key.

use crate::error::{LatticeError, LatticeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

/// Unit axial directions, in ring traversal order:
/// E, NE, NW, W, SW, SE.
pub const DIRECTIONS: [HexCoord; 6] = [
    HexCoord::new(1, 0),
    HexCoord::new(1, -1),
    HexCoord::new(0, -1),
    HexCoord::new(-1, 0),
    HexCoord::new(-1, 1),
    HexCoord::new(0, 1),
];

/// Direction a ring starts from (SW corner).
const RING_START_DIRECTION: usize = 4;

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Third cube coordinate (`q + r + s == 0`).
    #[inline(always)]
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Number of single steps between two lattice points.
    #[inline(always)]
    pub fn distance(&self, other: HexCoord) -> i32 {
        let d = *self - other;
        (d.q.abs() + d.r.abs() + d.s().abs()) / 2
    }

    pub fn neighbor(&self, direction: usize) -> HexCoord {
        *self + DIRECTIONS[direction % DIRECTIONS.len()]
    }

    pub fn neighbors(&self) -> [HexCoord; 6] {
        DIRECTIONS.map(|d| *self + d)
    }

    /// Packs both components into one hash key. Lossless for the full `i32` range.
    #[inline(always)]
    pub fn key(&self) -> u64 {
        ((self.q as u32 as u64) << 32) | (self.r as u32 as u64)
    }

    pub fn from_key(key: u64) -> Self {
        Self {
            q: (key >> 32) as u32 as i32,
            r: key as u32 as i32,
        }
    }
}

impl Add for HexCoord {
    type Output = HexCoord;

    fn add(self, rhs: HexCoord) -> HexCoord {
        HexCoord::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for HexCoord {
    type Output = HexCoord;

    fn sub(self, rhs: HexCoord) -> HexCoord {
        HexCoord::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl Mul<i32> for HexCoord {
    type Output = HexCoord;

    fn mul(self, k: i32) -> HexCoord {
        HexCoord::new(self.q * k, self.r * k)
    }
}

impl Neg for HexCoord {
    type Output = HexCoord;

    fn neg(self) -> HexCoord {
        HexCoord::new(-self.q, -self.r)
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((q, r): (i32, i32)) -> Self {
        HexCoord::new(q, r)
    }
}

/// Canonical string form: `"q,r"`.
impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

impl FromStr for HexCoord {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, r) = s
            .split_once(',')
            .ok_or_else(|| LatticeError::InvalidArgument(format!("'{}' is not 'q,r'", s)))?;
        let parse = |part: &str| {
            part.trim().parse::<i32>().map_err(|_| {
                LatticeError::InvalidArgument(format!("Invalid hex component '{}' in '{}'", part, s))
            })
        };
        Ok(HexCoord::new(parse(q)?, parse(r)?))
    }
}

/// All points at exactly `radius` steps from `origin`.
///
/// Radius 0 yields `[origin]`. Otherwise the walk starts on the SW corner and
/// takes `radius` steps along each of [`DIRECTIONS`] in order, emitting the
/// destination of every step, so the result holds `6 * radius` distinct points
/// and ends back on the starting corner.
pub fn ring(origin: HexCoord, radius: i32) -> LatticeResult<Vec<HexCoord>> {
    if radius < 0 {
        return Err(LatticeError::InvalidArgument(format!(
            "Ring radius must be non-negative, got {}",
            radius
        )));
    }
    if radius == 0 {
        return Ok(vec![origin]);
    }

    let mut points = Vec::with_capacity(6 * radius as usize);
    let mut cursor = origin + DIRECTIONS[RING_START_DIRECTION] * radius;
    for direction in DIRECTIONS {
        for _ in 0..radius {
            cursor = cursor + direction;
            points.push(cursor);
        }
    }
    Ok(points)
}

/// Filled disk: rings `0..=radius` concatenated, innermost first.
pub fn spiral(origin: HexCoord, radius: i32) -> LatticeResult<Vec<HexCoord>> {
    if radius < 0 {
        return Err(LatticeError::InvalidArgument(format!(
            "Spiral radius must be non-negative, got {}",
            radius
        )));
    }
    let mut points = Vec::with_capacity((1 + 3 * radius * (radius + 1)) as usize);
    for k in 0..=radius {
        points.extend(ring(origin, k)?);
    }
    Ok(points)
}
