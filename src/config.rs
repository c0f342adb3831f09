use crate::consts::{DEFAULT_BOARD_COUNT, DEFAULT_MAX_RING_RADIUS};
use crate::effect::RingScaling;
use crate::error::{LatticeError, LatticeResult};
use crate::geometry::Extent;
use crate::hex::HexCoord;
use crate::hexmap::{KeyAddress, MapOrigin};
use crate::tiling::{Point, Rect, RegularFit, SkewedFit, TilingMode};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub map: MapParams,
    #[command(flatten)]
    pub tiling: TilingParams,
    #[command(flatten)]
    pub effect: EffectParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapParams {
    #[arg(long, default_value_t = 5)]
    pub num_boards: u8,
    #[arg(long, default_value_t = 0)]
    pub origin_board: u8,
    #[arg(long, default_value_t = 0)]
    pub origin_key: u8,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub origin_q: i32,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub origin_r: i32,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            num_boards: DEFAULT_BOARD_COUNT,
            origin_board: 0,
            origin_key: 0,
            origin_q: 0,
            origin_r: 0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingParams {
    #[arg(long, default_value = "regular")]
    pub tiling_mode: TilingMode,

    // === REGULAR ===
    #[arg(long, default_value_t = 1280.0)]
    pub viewport_width: f32,
    #[arg(long, default_value_t = 720.0)]
    pub viewport_height: f32,
    #[arg(long, default_value_t = 8.0)]
    pub margin: f32,
    /// Radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub rotation: f32,
    #[arg(long, default_value_t = false)]
    pub scale_to_fit: bool,
    #[arg(long, default_value_t = 1.0)]
    pub vertical_scalar: f32,
    #[arg(long, default_value_t = 1.0)]
    pub horizontal_scalar: f32,

    // === SKEWED ===
    /// Three measured centres: "x1,y1;x2,y2;x3,y3"
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub calibration: String,
    #[arg(long, default_value_t = 10)]
    pub row_steps: i32,
    #[arg(long, default_value_t = 5)]
    pub column_steps: i32,
    #[arg(long, default_value_t = false)]
    pub derive_angles: bool,
}

impl Default for TilingParams {
    fn default() -> Self {
        Self {
            tiling_mode: TilingMode::Regular,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            margin: 8.0,
            rotation: 0.0,
            scale_to_fit: false,
            vertical_scalar: 1.0,
            horizontal_scalar: 1.0,
            calibration: String::new(),
            row_steps: 10,
            column_steps: 5,
            derive_angles: false,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParams {
    #[arg(long, default_value = "truncated")]
    pub ring_scaling: RingScaling,
    #[arg(long, default_value_t = 4)]
    pub max_ring_radius: i32,
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            ring_scaling: RingScaling::Truncated,
            max_ring_radius: DEFAULT_MAX_RING_RADIUS,
            seed: None,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LatticeResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overlays the arguments the user actually typed onto `self`.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(map.num_boards);
        update_if_present!(map.origin_board);
        update_if_present!(map.origin_key);
        update_if_present!(map.origin_q);
        update_if_present!(map.origin_r);

        update_if_present!(tiling.tiling_mode);
        update_if_present!(tiling.viewport_width);
        update_if_present!(tiling.viewport_height);
        update_if_present!(tiling.margin);
        update_if_present!(tiling.rotation);
        update_if_present!(tiling.scale_to_fit);
        update_if_present!(tiling.vertical_scalar);
        update_if_present!(tiling.horizontal_scalar);
        update_if_present!(tiling.calibration);
        update_if_present!(tiling.row_steps);
        update_if_present!(tiling.column_steps);
        update_if_present!(tiling.derive_angles);

        update_if_present!(effect.ring_scaling);
        update_if_present!(effect.max_ring_radius);
        update_if_present!(effect.seed);
    }
}

impl MapParams {
    pub fn origin(&self) -> MapOrigin {
        MapOrigin {
            point: HexCoord::new(self.origin_q, self.origin_r),
            address: KeyAddress::new(self.origin_board, self.origin_key),
        }
    }
}

impl TilingParams {
    pub fn regular_fit(&self, extent: Extent) -> RegularFit {
        let bounds = Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height);
        RegularFit {
            margin: self.margin,
            rotation: self.rotation,
            scale_to_fit: self.scale_to_fit,
            vertical_scalar: self.vertical_scalar,
            horizontal_scalar: self.horizontal_scalar,
            ..RegularFit::from_extent(bounds, extent)
        }
    }

    pub fn skewed_fit(&self) -> LatticeResult<SkewedFit> {
        let points = parse_points::<3>(&self.calibration, "calibration")?;
        Ok(SkewedFit {
            first: points[0],
            second: points[1],
            row_steps: self.row_steps,
            third: points[2],
            column_steps: self.column_steps,
            derive_angles: self.derive_angles,
        })
    }
}

fn parse_points<const N: usize>(s: &str, name: &str) -> LatticeResult<[Point; N]> {
    let parts: Vec<&str> = s.split(';').filter(|p| !p.trim().is_empty()).collect();
    if parts.len() != N {
        return Err(LatticeError::Config(format!(
            "--{} requires {} points, got {}",
            name,
            N,
            parts.len()
        )));
    }
    let mut points = [Point::default(); N];
    for (i, part) in parts.iter().enumerate() {
        let (x, y) = part
            .split_once(',')
            .ok_or_else(|| LatticeError::Config(format!("Point '{}' in {} is not 'x,y'", part, name)))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .map_err(|_| LatticeError::Config(format!("Invalid number '{}' in {}", v, name)))
        };
        points[i] = Point::new(parse(x)?, parse(y)?);
    }
    Ok(points)
}
