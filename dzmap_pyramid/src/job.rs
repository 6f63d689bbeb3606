use dzmap_core::{TileCoord, UrlTemplate, tile_path_in};
use std::{
	fmt::Debug,
	path::{Path, PathBuf},
	sync::Arc,
};

/// One tile to fetch from an upstream pyramid and store below `dest_dir`.
#[derive(Clone)]
pub struct FetchJob {
	pub coord: TileCoord,
	pub template: Arc<UrlTemplate>,
	pub dest_dir: Arc<Path>,
}

impl FetchJob {
	pub fn new(coord: TileCoord, template: Arc<UrlTemplate>, dest_dir: Arc<Path>) -> FetchJob {
		FetchJob {
			coord,
			template,
			dest_dir,
		}
	}

	pub fn url(&self) -> String {
		self.template.render(&self.coord)
	}

	pub fn tile_path(&self) -> PathBuf {
		tile_path_in(&self.dest_dir, &self.coord)
	}
}

impl Debug for FetchJob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "FetchJob({:?}, {})", self.coord, self.url())
	}
}

/// Outcome of a [`FetchJob`]. `valid == false` means there is no usable tile at `coord`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchResult {
	pub coord: TileCoord,
	pub valid: bool,
}
