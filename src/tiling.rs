//! Screen placement of key centres.
//!
//! Two fitting modes share one query path. Regular mode sizes an ideal hex
//! grid to a bounding box and places it with an affine transform; skewed mode
//! takes its basis vectors straight from three measured key centres.

pub mod affine;

pub use affine::{AffineTransform, Point, Rect};

use crate::error::{LatticeError, LatticeResult};
use crate::geometry::{BoardGeometry, Extent};
use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, info};

const SQRT_3: f32 = 1.732_050_8;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TilingMode {
    #[default]
    Regular,
    Skewed,
}

/// Inputs of a regular (angle based) fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularFit {
    pub bounds: Rect,
    /// Visual columns in the widest row.
    pub widest_row: usize,
    /// Rows in the longest column.
    pub longest_column: usize,
    /// Visual column and row of the extent's top-left cell.
    pub first_column: i32,
    pub first_row: i32,
    pub margin: f32,
    /// Radians, about the tile centre.
    pub rotation: f32,
    pub scale_to_fit: bool,
    pub vertical_scalar: f32,
    pub horizontal_scalar: f32,
}

impl RegularFit {
    pub fn new(bounds: Rect, widest_row: usize, longest_column: usize) -> Self {
        Self {
            bounds,
            widest_row,
            longest_column,
            first_column: 0,
            first_row: 0,
            margin: 0.0,
            rotation: 0.0,
            scale_to_fit: false,
            vertical_scalar: 1.0,
            horizontal_scalar: 1.0,
        }
    }

    /// Fit for a measured [`Extent`], including where it starts.
    pub fn from_extent(bounds: Rect, extent: Extent) -> Self {
        Self {
            first_column: extent.first_column,
            first_row: extent.first_row,
            ..Self::new(bounds, extent.widest_row, extent.longest_column)
        }
    }
}

/// Three measured key centres.
///
/// `first` is lattice (0,0), `second` is `row_steps` rows below it in the
/// same axial column, `third` is `column_steps` keys to the right of `second`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewedFit {
    pub first: Point,
    pub second: Point,
    pub row_steps: i32,
    pub third: Point,
    pub column_steps: i32,
    pub derive_angles: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilingGeometry {
    mode: TilingMode,
    radius: f32,
    margin: f32,
    bounds: Rect,
    rotation: f32,
    vertical_scalar: f32,
    horizontal_scalar: f32,
    column_angle: f32,
    row_angle: f32,
    origin: Point,
    column_basis: Point,
    row_basis: Point,
    tile: Rect,
    transform: AffineTransform,
}

impl Default for TilingGeometry {
    fn default() -> Self {
        let radius = 1.0;
        let column_basis = Point::new(SQRT_3 * radius, 0.0);
        let row_basis = Point::new(SQRT_3 * radius / 2.0, 1.5 * radius);
        Self {
            mode: TilingMode::Regular,
            radius,
            margin: 0.0,
            bounds: Rect::default(),
            rotation: 0.0,
            vertical_scalar: 1.0,
            horizontal_scalar: 1.0,
            column_angle: column_basis.angle(),
            row_angle: row_basis.angle(),
            origin: Point::new(column_basis.x / 2.0, radius),
            column_basis,
            row_basis,
            tile: Rect::default(),
            transform: AffineTransform::identity(),
        }
    }
}

fn require(condition: bool, message: impl FnOnce() -> String) -> LatticeResult<()> {
    if condition {
        Ok(())
    } else {
        Err(LatticeError::InvalidArgument(message()))
    }
}

fn finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

impl TilingGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest radius that fits the lattice extent into `bounds` minus margins,
    /// then the transform that rotates the tile and centres it on `bounds`.
    pub fn fit(&mut self, params: RegularFit) -> LatticeResult<()> {
        let usable = params.bounds.reduced(params.margin);
        require(usable.w > 0.0 && usable.h > 0.0, || {
            format!(
                "Bounds {}x{} leave no room inside margin {}",
                params.bounds.w, params.bounds.h, params.margin
            )
        })?;
        require(params.widest_row > 0 && params.longest_column > 0, || {
            format!(
                "Lattice extent must be non-empty, got {}x{}",
                params.widest_row, params.longest_column
            )
        })?;
        require(
            params.vertical_scalar.is_finite()
                && params.vertical_scalar > 0.0
                && params.horizontal_scalar.is_finite()
                && params.horizontal_scalar > 0.0,
            || "Tiling scalars must be positive".to_string(),
        )?;
        require(params.rotation.is_finite(), || {
            "Rotation must be finite".to_string()
        })?;

        let widest = params.widest_row as f32;
        let longest = params.longest_column as f32;

        // Staggered rows add half a column of width; the outer rows add a radius each.
        let radius_from_width = usable.w / ((widest + 0.5) * SQRT_3 * params.horizontal_scalar);
        let radius_from_height =
            usable.h / (((longest - 1.0) * 1.5 + 2.0) * params.vertical_scalar);
        let radius = radius_from_width.min(radius_from_height);

        let horizontal = SQRT_3 * radius * params.horizontal_scalar;
        let vertical = 1.5 * radius * params.vertical_scalar;
        let tile = Rect::new(
            0.0,
            0.0,
            (widest + 0.5) * horizontal,
            (longest - 1.0) * vertical + 2.0 * radius * params.vertical_scalar,
        );

        let tile_centre = tile.centre();
        let target = params.bounds.centre();
        let mut transform = AffineTransform::rotation(params.rotation, tile_centre).followed_by(
            &AffineTransform::translation(target.x - tile_centre.x, target.y - tile_centre.y),
        );

        if params.scale_to_fit {
            let rotated = transform.bounding_box(&tile);
            let ratio = (rotated.w / params.bounds.w).max(rotated.h / params.bounds.h);
            transform = transform.followed_by(&AffineTransform::scale(1.0 / ratio, target));
        }

        self.mode = TilingMode::Regular;
        self.radius = radius;
        self.margin = params.margin;
        self.bounds = params.bounds;
        self.rotation = params.rotation;
        self.vertical_scalar = params.vertical_scalar;
        self.horizontal_scalar = params.horizontal_scalar;
        // Shift so the extent's top-left cell lands in the tile's corner
        self.origin = Point::new(
            horizontal / 2.0 - params.first_column as f32 * horizontal,
            radius * params.vertical_scalar - params.first_row as f32 * vertical,
        );
        self.column_basis = Point::new(horizontal, 0.0);
        self.row_basis = Point::new(horizontal / 2.0, vertical);
        self.column_angle = self.column_basis.angle();
        self.row_angle = self.row_basis.angle();
        self.tile = tile;
        self.transform = transform;

        debug!(
            "Regular fit: radius {:.3} (width {:.3}, height {:.3}), tile {:.1}x{:.1}, rotation {:.3}",
            radius, radius_from_width, radius_from_height, tile.w, tile.h, params.rotation
        );
        Ok(())
    }

    /// Calibrates from three measured centres; placement is exact at all three.
    pub fn fit_skewed(&mut self, params: SkewedFit) -> LatticeResult<()> {
        require(params.row_steps != 0 && params.column_steps != 0, || {
            format!(
                "Calibration steps must be non-zero, got rows {} columns {}",
                params.row_steps, params.column_steps
            )
        })?;
        require(
            finite(params.first) && finite(params.second) && finite(params.third),
            || "Calibration points must be finite".to_string(),
        )?;

        let row_basis = (params.second - params.first) / params.row_steps as f32;
        let column_basis = (params.third - params.second) / params.column_steps as f32;

        if self.mode != TilingMode::Skewed {
            info!("Tiling mode {} -> {}", self.mode, TilingMode::Skewed);
        }
        self.mode = TilingMode::Skewed;
        self.origin = params.first;
        self.row_basis = row_basis;
        self.column_basis = column_basis;
        if params.derive_angles {
            self.column_angle = column_basis.angle();
            self.row_angle = row_basis.angle();
        }
        self.radius = column_basis.length() / SQRT_3;
        self.margin = 0.0;
        self.bounds = Rect::default();
        self.tile = Rect::default();
        self.transform = AffineTransform::identity();

        debug!(
            "Skewed fit: column basis ({:.3}, {:.3}), row basis ({:.3}, {:.3})",
            column_basis.x, column_basis.y, row_basis.x, row_basis.y
        );
        Ok(())
    }

    pub fn mode(&self) -> TilingMode {
        self.mode
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn horizontal_distance(&self) -> f32 {
        SQRT_3 * self.radius * self.horizontal_scalar
    }

    pub fn vertical_distance(&self) -> f32 {
        1.5 * self.radius * self.vertical_scalar
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// Replaces the post-placement transform (e.g. a view rotation in skewed mode).
    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    /// Untransformed tile of the last regular fit; empty in skewed mode.
    pub fn tile_bounds(&self) -> Rect {
        self.tile
    }

    pub fn transformed_tile_bounds(&self) -> Rect {
        self.transform.bounding_box(&self.tile)
    }

    /// `(column_basis, row_basis)`.
    pub fn basis(&self) -> (Point, Point) {
        (self.column_basis, self.row_basis)
    }

    /// `(column_angle, row_angle)` in radians.
    pub fn basis_angles(&self) -> (f32, f32) {
        (self.column_angle, self.row_angle)
    }

    /// Centre of lattice point `(q, r)`, relative to the tiling origin.
    pub fn position_at(&self, q: i32, r: i32) -> Point {
        let local = match self.mode {
            TilingMode::Skewed => {
                self.origin + self.column_basis * q as f32 + self.row_basis * r as f32
            }
            TilingMode::Regular => {
                let horizontal = self.column_basis.x;
                let column = q + r.div_euclid(2);
                let stagger = if r.rem_euclid(2) == 1 {
                    horizontal / 2.0
                } else {
                    0.0
                };
                Point::new(
                    self.origin.x + column as f32 * horizontal + stagger,
                    self.origin.y + r as f32 * self.row_basis.y,
                )
            }
        };
        self.transform.apply(local)
    }

    /// One centre per key, boards `starting_octave..starting_octave + octave_count`,
    /// in the same board-major, key-index order the hex map enumerates.
    ///
    /// Board `b` sits at `b * board_pitch` from board 0 key 0, so entry `i` is
    /// hex map key number `starting_octave * board_size + i`.
    pub fn positions_for(
        &self,
        geometry: &BoardGeometry,
        starting_octave: usize,
        octave_count: usize,
    ) -> Vec<Point> {
        let mut centres = Vec::with_capacity(geometry.total_keys() * octave_count);
        for board in starting_octave..starting_octave + octave_count {
            let base = geometry.board_pitch() * board as i32;
            for (row, spec) in geometry.rows().iter().enumerate() {
                let start = base + HexCoord::new(spec.offset, row as i32);
                for column in 0..spec.length as i32 {
                    centres.push(self.position_at(start.q + column, start.r));
                }
            }
        }
        debug!(
            "Positions for boards {}..{}: {} keys",
            starting_octave,
            starting_octave + octave_count,
            centres.len()
        );
        centres
    }
}
