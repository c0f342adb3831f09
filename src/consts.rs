/// The value used to represent "No Key" in u8 address fields.
/// This effectively limits us to 255 boards and 255 keys per board.
pub const KEY_NOT_FOUND_U8: u8 = 255;

/// Flattened key number returned when a lattice point holds no key.
pub const KEY_NUM_NOT_FOUND: i32 = -1;

/// Highest MIDI velocity / controller value.
pub const MIDI_MAX_VALUE: u8 = 127;

/// Ring radius reached at full velocity.
pub const DEFAULT_MAX_RING_RADIUS: i32 = 4;

/// Number of octave boards on the reference keyboard.
pub const DEFAULT_BOARD_COUNT: u8 = 5;

/// Keys on one reference octave board.
pub const LUMATONE_BOARD_KEYS: usize = 56;

/// (length, axial start offset) for each row of the reference octave board.
pub const LUMATONE_ROWS: [(usize, i32); 11] = [
    (2, 0),
    (5, 0),
    (6, -1),
    (6, -1),
    (6, -2),
    (6, -2),
    (6, -3),
    (6, -3),
    (6, -4),
    (5, -3),
    (2, -1),
];

/// Axial displacement from one board's key 0 to the next board's key 0.
pub const LUMATONE_BOARD_PITCH: (i32, i32) = (5, 2);

/// Floating point tolerance used when comparing fitted geometry.
pub const GEOMETRY_EPSILON: f32 = 1e-3;
