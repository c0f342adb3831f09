pub mod api;
pub mod config;
pub mod consts;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod hex;
pub mod hexmap;
pub mod tiling;
// cmd and reports are binary modules, declared in main.rs.
