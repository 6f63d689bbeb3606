//! Configuration types.
//!
//! - [`Config`]: the YAML file shared by `dzmap load` and `dzmap serve`
//! - [`MapConfig`]: one game map, its layer sources, aliases and zoom settings

mod main;
mod map;

pub use main::{Config, DEFAULT_ZOOM_LIMIT};
pub use map::{DEFAULT_TILE_SIZE, MapConfig};
