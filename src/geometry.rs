use crate::consts::{LUMATONE_BOARD_KEYS, LUMATONE_BOARD_PITCH, LUMATONE_ROWS};
use crate::error::{LatticeError, LatticeResult};
use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};

/// One physical row of an octave board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSpec {
    pub length: usize,
    /// Axial q of the row's first key, relative to key 0 of the board.
    pub offset: i32,
}

impl From<(usize, i32)> for RowSpec {
    fn from((length, offset): (usize, i32)) -> Self {
        Self { length, offset }
    }
}

/// Visual-grid footprint of one or more boards.
///
/// Columns are zig-zag offset columns (`q + r.div_euclid(2)`), rows are axial `r`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    pub first_column: i32,
    pub first_row: i32,
    pub widest_row: usize,
    pub longest_column: usize,
}

impl Extent {
    /// `(widest_row, longest_column)`.
    pub fn size(&self) -> (usize, usize) {
        (self.widest_row, self.longest_column)
    }
}

/// Read-only description of one board's irregular row layout.
///
/// Keys are numbered row-major, top row first. Row `r` of the board sits at
/// axial `r`; its keys occupy `q = offset .. offset + length`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardGeometry {
    rows: Vec<RowSpec>,
    key_count: usize,
    board_pitch: HexCoord,
    row_starts: Vec<usize>,
}

impl BoardGeometry {
    pub fn new(rows: Vec<RowSpec>, key_count: usize, board_pitch: HexCoord) -> LatticeResult<Self> {
        if rows.is_empty() {
            return Err(LatticeError::InvalidArgument(
                "Board geometry needs at least one row".to_string(),
            ));
        }

        let actual: usize = rows.iter().map(|r| r.length).sum();
        if actual != key_count {
            return Err(LatticeError::InvalidLayout {
                expected: key_count,
                actual,
            });
        }

        let mut row_starts = Vec::with_capacity(rows.len());
        let mut running = 0;
        for row in &rows {
            row_starts.push(running);
            running += row.length;
        }

        Ok(Self {
            rows,
            key_count,
            board_pitch,
            row_starts,
        })
    }

    /// The reference 56-key octave board.
    pub fn lumatone() -> Self {
        let rows = LUMATONE_ROWS.iter().copied().map(RowSpec::from).collect();
        let pitch = HexCoord::from(LUMATONE_BOARD_PITCH);
        // The constant table is checked by tests; a mismatch would be a build defect.
        match Self::new(rows, LUMATONE_BOARD_KEYS, pitch) {
            Ok(geometry) => geometry,
            Err(e) => unreachable!("reference layout is inconsistent: {}", e),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of keys in `row`, 0 for rows past the bottom.
    pub fn row_length(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |r| r.length)
    }

    pub fn row_start_offset(&self, row: usize) -> i32 {
        self.rows.get(row).map_or(0, |r| r.offset)
    }

    pub fn total_keys(&self) -> usize {
        self.key_count
    }

    pub fn rows(&self) -> &[RowSpec] {
        &self.rows
    }

    /// Axial displacement between consecutive boards.
    pub fn board_pitch(&self) -> HexCoord {
        self.board_pitch
    }

    /// Start offset the plain zig-zag stagger would give `row`.
    #[inline(always)]
    pub fn stagger_offset(row: usize) -> i32 {
        -((row / 2) as i32)
    }

    /// Rows whose start offset deviates from [`Self::stagger_offset`].
    pub fn irregular_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, r)| r.offset != Self::stagger_offset(*i))
            .map(|(i, _)| i)
            .collect()
    }

    /// `(row, column)` of a key, column counted from the row's first key.
    pub fn row_of(&self, key: usize) -> Option<(usize, usize)> {
        if key >= self.key_count {
            return None;
        }
        // The last row starting at or before `key` owns it; empty rows share
        // their start with the next row, so they are never the last one.
        let row = self.row_starts.partition_point(|&start| start <= key) - 1;
        Some((row, key - self.row_starts[row]))
    }

    pub fn key_at(&self, row: usize, column: usize) -> Option<usize> {
        let spec = self.rows.get(row)?;
        (column < spec.length).then(|| self.row_starts[row] + column)
    }

    /// Lattice position of `key` relative to key 0 of its board's row 0.
    pub fn lattice_offset(&self, key: usize) -> Option<HexCoord> {
        let (row, column) = self.row_of(key)?;
        Some(HexCoord::new(
            self.rows[row].offset + column as i32,
            row as i32,
        ))
    }

    /// Footprint of boards `0..octave_count` with board 0 key 0 on `(0,0)`.
    pub fn extent(&self, octave_count: usize) -> Extent {
        let mut min_col = i32::MAX;
        let mut max_col = i32::MIN;
        let mut min_row = i32::MAX;
        let mut max_row = i32::MIN;

        for board in 0..octave_count as i32 {
            let base = self.board_pitch * board;
            for (i, spec) in self.rows.iter().enumerate() {
                if spec.length == 0 {
                    continue;
                }
                let r = base.r + i as i32;
                let first = base.q + spec.offset + r.div_euclid(2);
                min_col = min_col.min(first);
                max_col = max_col.max(first + spec.length as i32 - 1);
                min_row = min_row.min(r);
                max_row = max_row.max(r);
            }
        }

        if min_col > max_col {
            return Extent::default();
        }
        Extent {
            first_column: min_col,
            first_row: min_row,
            widest_row: (max_col - min_col + 1) as usize,
            longest_column: (max_row - min_row + 1) as usize,
        }
    }
}
