#![allow(dead_code)]

use keylattice::geometry::{BoardGeometry, RowSpec};
use keylattice::hex::HexCoord;
use keylattice::hexmap::{HexMap, MapOrigin};

/// Axial coordinates of every key on reference board 0, origin on key 0.
#[rustfmt::skip]
pub const REFERENCE_BOARD: [(i32, i32); 56] = [
    (0, 0), (1, 0),
    (0, 1), (1, 1), (2, 1), (3, 1), (4, 1),
    (-1, 2), (0, 2), (1, 2), (2, 2), (3, 2), (4, 2),
    (-1, 3), (0, 3), (1, 3), (2, 3), (3, 3), (4, 3),
    (-2, 4), (-1, 4), (0, 4), (1, 4), (2, 4), (3, 4),
    (-2, 5), (-1, 5), (0, 5), (1, 5), (2, 5), (3, 5),
    (-3, 6), (-2, 6), (-1, 6), (0, 6), (1, 6), (2, 6),
    (-3, 7), (-2, 7), (-1, 7), (0, 7), (1, 7), (2, 7),
    (-4, 8), (-3, 8), (-2, 8), (-1, 8), (0, 8), (1, 8),
    (-3, 9), (-2, 9), (-1, 9), (0, 9), (1, 9),
    (-1, 10), (0, 10),
];

pub fn reference_map(num_boards: u8) -> HexMap {
    HexMap::new(BoardGeometry::lumatone(), num_boards, MapOrigin::default())
        .expect("reference map renders")
}

/// Builder for synthetic board layouts.
pub struct LayoutBuilder {
    rows: Vec<RowSpec>,
    pitch: HexCoord,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            pitch: HexCoord::new(4, 0),
        }
    }

    pub fn row(mut self, length: usize, offset: i32) -> Self {
        self.rows.push(RowSpec { length, offset });
        self
    }

    /// Rows of equal length following the plain zig-zag stagger.
    pub fn staggered(mut self, rows: usize, length: usize) -> Self {
        for r in self.rows.len()..self.rows.len() + rows {
            self.rows.push(RowSpec {
                length,
                offset: BoardGeometry::stagger_offset(r),
            });
        }
        self
    }

    pub fn pitch(mut self, q: i32, r: i32) -> Self {
        self.pitch = HexCoord::new(q, r);
        self
    }

    pub fn build(self) -> BoardGeometry {
        let total = self.rows.iter().map(|r| r.length).sum();
        BoardGeometry::new(self.rows, total, self.pitch).expect("synthetic layout is consistent")
    }
}
