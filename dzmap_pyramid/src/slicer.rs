//! Single-image mode: cut one large raster into a tile pyramid.

use crate::{BuildSummary, fetch::has_tile};
use anyhow::{Context, Result, anyhow, ensure};
use dzmap_core::{ImageSource, MAX_LEVEL, TileCoord, io::http_download, tile_path_in};
use dzmap_image::{SLICE_QUALITY, crop_tile, decode_source, encode_webp, into_rgb_or_rgba8, resize_exact};
use futures::{StreamExt, stream};
use image::DynamicImage;
use itertools::Itertools;
use reqwest::Client;
use std::{
	path::Path,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
use tokio::task::spawn_blocking;

/// Maximum number of tiles encoded and written at the same time.
pub const SLICE_CONCURRENCY: usize = 20;

/// Outcome of writing one zoom level.
#[derive(Debug)]
struct LevelWrite {
	/// Tiles present afterwards.
	stored: usize,
	/// Highest number of tiles that were encoded or written at the same time.
	peak_writes: usize,
}

/// Resamples a source image for every zoom level and writes the tiles.
///
/// Every level is resampled from the original image. A level is completely written before the
/// next one is resampled, so at most one level canvas is held in memory.
pub struct ImageSlicer {
	client: Client,
	force: bool,
	concurrency: usize,
}

impl ImageSlicer {
	pub fn new(client: Client, force: bool) -> ImageSlicer {
		ImageSlicer {
			client,
			force,
			concurrency: SLICE_CONCURRENCY,
		}
	}

	/// Load `source` and slice it into `layer_dir`.
	pub async fn run(
		&self,
		source: &ImageSource,
		layer_dir: &Path,
		zoom_limit: u8,
		tile_size: u32,
	) -> Result<BuildSummary> {
		let image = self.load_source(source).await?;
		log::info!("source image loaded ({}x{}), starting tiling", image.width(), image.height());
		self.slice(Arc::new(image), layer_dir, zoom_limit, tile_size).await
	}

	/// Download or read the source raster and decode it to 8-bit RGB(A).
	pub async fn load_source(&self, source: &ImageSource) -> Result<DynamicImage> {
		let bytes = match source {
			ImageSource::Url(url) => http_download(&self.client, url).await?,
			ImageSource::Path(path) => tokio::fs::read(path)
				.await
				.with_context(|| format!("reading source image {path:?}"))?,
		};

		spawn_blocking(move || decode_source(&bytes).map(into_rgb_or_rgba8))
			.await
			.map_err(|e| anyhow!("decoding task failed: {e}"))?
			.with_context(|| format!("loading source image {source}"))
	}

	pub async fn slice(
		&self,
		source: Arc<DynamicImage>,
		layer_dir: &Path,
		zoom_limit: u8,
		tile_size: u32,
	) -> Result<BuildSummary> {
		ensure!(tile_size > 0, "tile size must be positive");
		ensure!(
			zoom_limit < MAX_LEVEL,
			"zoom limit {zoom_limit} must be lower than {MAX_LEVEL}"
		);

		tokio::fs::create_dir_all(layer_dir)
			.await
			.with_context(|| format!("creating directory {layer_dir:?}"))?;

		let mut summary = BuildSummary::default();
		for level in 0..=zoom_limit {
			let grid = TileCoord::grid_size(level);
			let edge = grid
				.checked_mul(tile_size)
				.with_context(|| format!("zoom level {level} is too large for tile size {tile_size}"))?;

			log::debug!("processing zoom level {level}: {grid}x{grid} tiles, {edge}px");

			let original = Arc::clone(&source);
			let canvas = spawn_blocking(move || resize_exact(&original, edge, edge))
				.await
				.map_err(|e| anyhow!("resampling task failed: {e}"))??;

			let written = self.write_level(Arc::new(canvas), layer_dir, level, tile_size).await;
			log::debug!(
				"zoom level {level} done: {} tiles, at most {} written at once",
				written.stored,
				written.peak_writes
			);
			summary.levels += 1;
			summary.tiles += written.stored;
		}

		Ok(summary)
	}

	/// Cut all tiles of one level out of `canvas`.
	async fn write_level(&self, canvas: Arc<DynamicImage>, layer_dir: &Path, level: u8, tile_size: u32) -> LevelWrite {
		let grid = TileCoord::grid_size(level);
		let stored = AtomicUsize::new(0);
		let writing = AtomicUsize::new(0);
		let peak_writes = AtomicUsize::new(0);

		stream::iter((0..grid).cartesian_product(0..grid))
			.for_each_concurrent(self.concurrency, |(x, y)| {
				let canvas = Arc::clone(&canvas);
				let (stored, writing, peak_writes) = (&stored, &writing, &peak_writes);
				async move {
					let coord = TileCoord { level, x, y };
					peak_writes.fetch_max(writing.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
					let result = self.write_tile(canvas, layer_dir, coord, tile_size).await;
					writing.fetch_sub(1, Ordering::SeqCst);

					match result {
						Ok(()) => {
							stored.fetch_add(1, Ordering::Relaxed);
						}
						Err(err) => log::error!("failed to write tile {coord}: {err:#}"),
					}
				}
			})
			.await;

		LevelWrite {
			stored: stored.into_inner(),
			peak_writes: peak_writes.into_inner(),
		}
	}

	async fn write_tile(&self, canvas: Arc<DynamicImage>, layer_dir: &Path, coord: TileCoord, tile_size: u32) -> Result<()> {
		let path = tile_path_in(layer_dir, &coord);
		if !self.force && has_tile(&path).await {
			return Ok(());
		}

		let blob = spawn_blocking(move || encode_webp(&crop_tile(&canvas, coord.x, coord.y, tile_size), SLICE_QUALITY))
			.await
			.map_err(|e| anyhow!("encoding task failed: {e}"))??;

		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent)
				.await
				.with_context(|| format!("creating directory {parent:?}"))?;
		}
		tokio::fs::write(&path, blob)
			.await
			.with_context(|| format!("writing tile {path:?}"))
	}
}
