//! The on-disk layout shared by the pyramid builder and the tile server.
//!
//! ```text
//! <root>/<map>/<layer>/<z>/<x>/<y>.webp
//! <root>/<map>/locations.geojson
//! ```
//!
//! There is no index or manifest: a non-empty file at a tile path is the only signal that the
//! tile exists.

use crate::{MapLayer, TileCoord};
use std::path::{Path, PathBuf};

pub const TILE_EXTENSION: &str = "webp";
pub const LOCATIONS_FILENAME: &str = "locations.geojson";

/// Resolves map, layer and tile paths below a root directory (usually `maps`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PyramidLayout {
	root: PathBuf,
}

impl PyramidLayout {
	pub fn new(root: impl Into<PathBuf>) -> PyramidLayout {
		PyramidLayout { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn map_dir(&self, map_name: &str) -> PathBuf {
		self.root.join(map_name)
	}

	pub fn layer_dir(&self, map_name: &str, layer: MapLayer) -> PathBuf {
		self.map_dir(map_name).join(layer.as_str())
	}

	pub fn locations_path(&self, map_name: &str) -> PathBuf {
		self.map_dir(map_name).join(LOCATIONS_FILENAME)
	}

	pub fn tile_path(&self, map_name: &str, layer: MapLayer, coord: &TileCoord) -> PathBuf {
		tile_path_in(&self.layer_dir(map_name, layer), coord)
	}
}

impl Default for PyramidLayout {
	fn default() -> Self {
		PyramidLayout::new("maps")
	}
}

/// Path of the tile `coord` inside a layer directory.
pub fn tile_path_in(layer_dir: &Path, coord: &TileCoord) -> PathBuf {
	layer_dir
		.join(coord.level.to_string())
		.join(coord.x.to_string())
		.join(format!("{}.{TILE_EXTENSION}", coord.y))
}

/// Whether a non-empty file exists at `path`.
pub fn file_exists(path: &Path) -> bool {
	std::fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}
