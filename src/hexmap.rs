//! Bidirectional association between hardware key addresses and hex lattice points.

use crate::consts::{KEY_NOT_FOUND_U8, KEY_NUM_NOT_FOUND};
use crate::error::{LatticeError, LatticeResult};
use crate::geometry::BoardGeometry;
use crate::hex::HexCoord;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// One physical key: board index + key index within the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyAddress {
    pub board: u8,
    pub key: u8,
}

impl KeyAddress {
    /// "No key here". Never produced for a real key.
    pub const INVALID: KeyAddress = KeyAddress {
        board: KEY_NOT_FOUND_U8,
        key: KEY_NOT_FOUND_U8,
    };

    pub const fn new(board: u8, key: u8) -> Self {
        Self { board, key }
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl fmt::Display for KeyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.board, self.key)
        } else {
            write!(f, "-")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedKey {
    pub address: KeyAddress,
    pub point: HexCoord,
}

/// The key that sits at `point` once the map is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapOrigin {
    pub point: HexCoord,
    pub address: KeyAddress,
}

impl Default for MapOrigin {
    fn default() -> Self {
        Self {
            point: HexCoord::default(),
            address: KeyAddress::new(0, 0),
        }
    }
}

/// Immutable result of one render. Both directions always agree.
#[derive(Debug, Default)]
pub struct MapTables {
    boards: Vec<Vec<HexCoord>>,
    reverse: FnvHashMap<u64, MappedKey>,
}

impl MapTables {
    /// Fails when two keys land on the same lattice point.
    fn build(
        geometry: &BoardGeometry,
        num_boards: u8,
        translation: HexCoord,
    ) -> LatticeResult<Self> {
        let board_size = geometry.total_keys();
        let mut boards = Vec::with_capacity(num_boards as usize);
        let mut reverse =
            FnvHashMap::with_capacity_and_hasher(board_size * num_boards as usize, Default::default());

        for board in 0..num_boards {
            let board_origin = translation + geometry.board_pitch() * board as i32;
            let mut points = Vec::with_capacity(board_size);
            let mut key = 0usize;

            for (row, spec) in geometry.rows().iter().enumerate() {
                let row_start = board_origin + HexCoord::new(spec.offset, row as i32);
                for column in 0..spec.length as i32 {
                    let point = row_start + HexCoord::new(column, 0);
                    let address = KeyAddress::new(board, key as u8);
                    let mapped = MappedKey { address, point };
                    if let Some(previous) = reverse.insert(point.key(), mapped) {
                        return Err(LatticeError::InvalidArgument(format!(
                            "Keys {} and {} both map to hex {}",
                            previous.address, address, point
                        )));
                    }
                    points.push(point);
                    key += 1;
                }
            }
            boards.push(points);
        }

        Ok(Self { boards, reverse })
    }

    pub fn key_to_hex(&self, address: KeyAddress) -> Option<HexCoord> {
        self.boards
            .get(address.board as usize)
            .and_then(|b| b.get(address.key as usize))
            .copied()
    }

    pub fn find(&self, point: HexCoord) -> Option<&MappedKey> {
        self.reverse.get(&point.key())
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }
}

/// Hardware key <-> hex lattice map for a multi-board keyboard.
///
/// Rendering lays every board out from its [`BoardGeometry`] rows, shifts each
/// board by the geometry's board pitch, then translates the whole lattice so
/// the configured origin key lands on the origin point.
#[derive(Debug, Clone)]
pub struct HexMap {
    geometry: BoardGeometry,
    num_boards: u8,
    origin: MapOrigin,
    tables: Arc<MapTables>,
}

impl HexMap {
    pub fn new(geometry: BoardGeometry, num_boards: u8, origin: MapOrigin) -> LatticeResult<Self> {
        if num_boards == 0 || num_boards == KEY_NOT_FOUND_U8 {
            return Err(LatticeError::InvalidArgument(format!(
                "Board count must be in 1..{}, got {}",
                KEY_NOT_FOUND_U8, num_boards
            )));
        }
        if geometry.total_keys() >= KEY_NOT_FOUND_U8 as usize {
            return Err(LatticeError::InvalidArgument(format!(
                "Boards with {} keys exceed the address range",
                geometry.total_keys()
            )));
        }

        let mut map = Self {
            geometry,
            num_boards,
            origin,
            tables: Arc::default(),
        };
        map.check_address(origin.address)?;
        map.render()?;
        Ok(map)
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn num_boards(&self) -> u8 {
        self.num_boards
    }

    pub fn board_size(&self) -> usize {
        self.geometry.total_keys()
    }

    pub fn key_count(&self) -> usize {
        self.board_size() * self.num_boards as usize
    }

    pub fn origin(&self) -> MapOrigin {
        self.origin
    }

    /// Moves the logical origin and re-renders. On error the map is unchanged.
    pub fn set_origin(&mut self, origin: MapOrigin) -> LatticeResult<()> {
        self.check_address(origin.address)?;
        self.tables = Arc::new(self.build_tables(origin)?);
        self.origin = origin;
        info!(
            "HexMap: origin {} -> key {}",
            origin.point, origin.address
        );
        Ok(())
    }

    /// Rebuilds both lookup directions and swaps them in as one unit.
    pub fn render(&mut self) -> LatticeResult<()> {
        self.tables = Arc::new(self.build_tables(self.origin)?);
        Ok(())
    }

    fn build_tables(&self, origin: MapOrigin) -> LatticeResult<MapTables> {
        // Position of the origin key with board 0 / key 0 on (0,0)
        let raw_origin = self.geometry.board_pitch() * origin.address.board as i32
            + self
                .geometry
                .lattice_offset(origin.address.key as usize)
                .unwrap_or_default();
        let translation = origin.point - raw_origin;

        let tables = MapTables::build(&self.geometry, self.num_boards, translation)?;
        debug!(
            "HexMap rendered: {} boards, {} keys, translation {}",
            self.num_boards,
            tables.len(),
            translation
        );
        Ok(tables)
    }

    /// Consistent view of the current render for concurrent readers.
    pub fn snapshot(&self) -> Arc<MapTables> {
        Arc::clone(&self.tables)
    }

    fn check_address(&self, address: KeyAddress) -> LatticeResult<()> {
        if address.board >= self.num_boards || address.key as usize >= self.board_size() {
            return Err(LatticeError::OutOfRange {
                board: address.board,
                key: address.key,
                num_boards: self.num_boards,
                board_size: self.board_size(),
            });
        }
        Ok(())
    }

    pub fn key_to_hex(&self, address: KeyAddress) -> LatticeResult<HexCoord> {
        self.check_address(address)?;
        self.tables
            .key_to_hex(address)
            .ok_or(LatticeError::OutOfRange {
                board: address.board,
                key: address.key,
                num_boards: self.num_boards,
                board_size: self.board_size(),
            })
    }

    /// Key at `point`, or [`KeyAddress::INVALID`] when the point is empty.
    pub fn hex_to_key(&self, point: HexCoord) -> KeyAddress {
        self.find_key(point).unwrap_or(KeyAddress::INVALID)
    }

    pub fn find_key(&self, point: HexCoord) -> Option<KeyAddress> {
        self.tables.find(point).map(|m| m.address)
    }

    /// `board * board_size + key`, or -1 when the point is empty.
    pub fn hex_to_key_num(&self, point: HexCoord) -> i32 {
        match self.find_key(point) {
            Some(a) => (a.board as usize * self.board_size() + a.key as usize) as i32,
            None => KEY_NUM_NOT_FOUND,
        }
    }

    pub fn contains(&self, point: HexCoord) -> bool {
        self.tables.find(point).is_some()
    }

    /// Every key in board-major, key-index order.
    pub fn mapped_keys(&self) -> impl Iterator<Item = MappedKey> + '_ {
        self.tables.boards.iter().enumerate().flat_map(|(board, points)| {
            points.iter().enumerate().map(move |(key, &point)| MappedKey {
                address: KeyAddress::new(board as u8, key as u8),
                point,
            })
        })
    }

    /// Occupied lattice neighbours of a key, in direction order.
    pub fn neighbors_of(&self, address: KeyAddress) -> LatticeResult<Vec<KeyAddress>> {
        let point = self.key_to_hex(address)?;
        Ok(point
            .neighbors()
            .into_iter()
            .filter_map(|p| self.find_key(p))
            .collect())
    }
}
