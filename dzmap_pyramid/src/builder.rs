//! Remote mode: mirror an upstream tile pyramid level by level.

use crate::{FetchPool, probe_tile};
use anyhow::{Result, ensure};
use dzmap_core::{MAX_LEVEL, TileCoord, UrlTemplate};
use std::path::Path;

/// Frontiers longer than this also probe their middle coordinate.
const PROBE_MIDDLE_THRESHOLD: usize = 10;

/// What a build or slice run left on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
	/// Number of zoom levels that were processed.
	pub levels: u8,
	/// Number of tiles present after the run (including tiles that already existed).
	pub tiles: usize,
}

/// Walks an upstream pyramid from the root tile down to a zoom limit.
///
/// Only the children of tiles that exist upstream are requested, so the walk follows the area
/// that actually has imagery. Before a level is fetched a few of its coordinates are probed; if
/// none of them exists the level and everything below it is skipped.
pub struct PyramidBuilder {
	pool: FetchPool,
}

impl PyramidBuilder {
	pub fn new(pool: FetchPool) -> PyramidBuilder {
		PyramidBuilder { pool }
	}

	pub async fn build(&self, template: &UrlTemplate, layer_dir: &Path, zoom_limit: u8) -> Result<BuildSummary> {
		ensure!(
			zoom_limit < MAX_LEVEL,
			"zoom limit {zoom_limit} must be lower than {MAX_LEVEL}"
		);

		let mut summary = BuildSummary::default();
		let mut frontier = vec![TileCoord::root()];

		for level in 0..=zoom_limit {
			if frontier.is_empty() {
				break;
			}
			if level > 0 && !self.probe(&frontier, template).await {
				log::info!("no data found at zoom level {level}, stopping");
				break;
			}

			log::debug!("processing zoom level {level} with {} tiles", frontier.len());
			let mut valid = self.pool.run(&frontier, template, layer_dir).await;
			valid.sort();

			summary.levels += 1;
			summary.tiles += valid.len();

			frontier = if level < zoom_limit {
				next_frontier(&valid)
			} else {
				Vec::new()
			};
		}

		Ok(summary)
	}

	/// Whether any of the sample coordinates of `frontier` exists upstream.
	async fn probe(&self, frontier: &[TileCoord], template: &UrlTemplate) -> bool {
		for coord in probe_samples(frontier) {
			if probe_tile(self.pool.client(), &template.render(&coord)).await {
				return true;
			}
		}
		false
	}
}

/// The coordinates probed before a level is fetched: the first, the middle one (only for
/// frontiers longer than 10) and the last.
pub fn probe_samples(frontier: &[TileCoord]) -> Vec<TileCoord> {
	let mut samples = Vec::with_capacity(3);
	if let Some(first) = frontier.first() {
		samples.push(*first);
	}
	if frontier.len() > PROBE_MIDDLE_THRESHOLD {
		samples.push(frontier[frontier.len() / 2]);
	}
	if frontier.len() > 1 {
		samples.push(frontier[frontier.len() - 1]);
	}
	samples
}

/// The four children of every valid tile, ordered by [`TileCoord::sort_index`].
pub fn next_frontier(valid: &[TileCoord]) -> Vec<TileCoord> {
	let mut frontier: Vec<TileCoord> = valid.iter().flat_map(TileCoord::children).collect();
	frontier.sort();
	frontier
}
