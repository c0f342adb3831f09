pub mod map;
pub mod positions;
pub mod ring;
