use crate::config::Config;
use crate::effect::{EditCommand, MidiEvent, NoteLookup, RingEffect};
use crate::error::{LatticeError, LatticeResult};
use crate::geometry::BoardGeometry;
use crate::hexmap::{HexMap, MapOrigin};
use crate::tiling::{Point, TilingGeometry, TilingMode};
use std::sync::{Mutex, RwLock};
use tracing::info;

/// Map, tiling and effect behind single-writer/many-reader locks.
///
/// Re-renders and refits build the new state before taking the write lock,
/// so readers only ever see a complete map or tiling.
pub struct LatticeSession {
    pub geometry: BoardGeometry,
    pub map: RwLock<HexMap>,
    pub tiling: RwLock<TilingGeometry>,
    pub effect: Mutex<RingEffect>,
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> LatticeError {
    LatticeError::Poisoned(e.to_string())
}

impl LatticeSession {
    pub fn from_config(geometry: BoardGeometry, config: &Config) -> LatticeResult<Self> {
        let map = HexMap::new(geometry.clone(), config.map.num_boards, config.map.origin())?;
        let tiling = Self::fit_tiling(&geometry, config)?;
        let effect = match config.effect.seed {
            Some(seed) => RingEffect::with_seed(
                config.effect.ring_scaling,
                config.effect.max_ring_radius,
                seed,
            ),
            None => RingEffect::new(config.effect.ring_scaling, config.effect.max_ring_radius),
        };

        info!(
            "Session ready: {} boards x {} keys, {} tiling",
            config.map.num_boards,
            geometry.total_keys(),
            tiling.mode()
        );

        Ok(Self {
            geometry,
            map: RwLock::new(map),
            tiling: RwLock::new(tiling),
            effect: Mutex::new(effect),
        })
    }

    fn fit_tiling(geometry: &BoardGeometry, config: &Config) -> LatticeResult<TilingGeometry> {
        let mut tiling = TilingGeometry::new();
        match config.tiling.tiling_mode {
            TilingMode::Regular => {
                let extent = geometry.extent(config.map.num_boards as usize);
                tiling.fit(config.tiling.regular_fit(extent))?;
            }
            TilingMode::Skewed => tiling.fit_skewed(config.tiling.skewed_fit()?)?,
        }
        Ok(tiling)
    }

    pub fn set_origin(&self, origin: MapOrigin) -> LatticeResult<()> {
        let mut next = self.map.read().map_err(poisoned)?.clone();
        next.set_origin(origin)?;
        *self.map.write().map_err(poisoned)? = next;
        Ok(())
    }

    pub fn refit(&self, config: &Config) -> LatticeResult<()> {
        let tiling = Self::fit_tiling(&self.geometry, config)?;
        *self.tiling.write().map_err(poisoned)? = tiling;
        Ok(())
    }

    /// Key centres for every board on the map.
    pub fn positions(&self) -> LatticeResult<Vec<Point>> {
        let boards = self.map.read().map_err(poisoned)?.num_boards() as usize;
        let tiling = self.tiling.read().map_err(poisoned)?;
        Ok(tiling.positions_for(&self.geometry, 0, boards))
    }

    /// Runs one event through the ring effect and drains it.
    pub fn trigger(
        &self,
        event: MidiEvent,
        lookup: &impl NoteLookup,
    ) -> LatticeResult<Vec<EditCommand>> {
        let map = self.map.read().map_err(poisoned)?;
        let mut effect = self.effect.lock().map_err(poisoned)?;
        effect.handle(event, lookup, &*map, &*map)?;
        let mut commands = Vec::new();
        effect.drain(&mut commands);
        Ok(commands)
    }
}
