//! Per-map orchestration for `dzmap load`.

use crate::{BuildSummary, DEFAULT_CONCURRENCY, FetchPool, ImageSlicer, PyramidBuilder};
use anyhow::Result;
use dzmap_core::{DEFAULT_ZOOM_LIMIT, LayerSource, MapConfig, MapLayer, PyramidLayout};
use reqwest::Client;
use std::collections::HashSet;

/// What `dzmap load` should do for each map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
	/// Number of concurrent tile downloads.
	pub concurrency: usize,
	/// Zoom limit for maps that don't set their own.
	pub zoom_limit: u8,
	/// Overwrite existing tiles and location files.
	pub force: bool,
	/// Skip a layer entirely if its directory already exists.
	pub fast_check: bool,
	pub tiles: bool,
	pub locations: bool,
}

impl Default for LoadOptions {
	fn default() -> Self {
		LoadOptions {
			concurrency: DEFAULT_CONCURRENCY,
			zoom_limit: DEFAULT_ZOOM_LIMIT,
			force: false,
			fast_check: false,
			tiles: true,
			locations: true,
		}
	}
}

/// Builds the pyramids and location files of configured maps below a [`PyramidLayout`].
pub struct MapLoader {
	client: Client,
	layout: PyramidLayout,
	options: LoadOptions,
}

impl MapLoader {
	pub fn new(client: Client, layout: PyramidLayout, options: LoadOptions) -> MapLoader {
		MapLoader {
			client,
			layout,
			options,
		}
	}

	/// Process all `maps` one after the other. Failures are logged per map and layer.
	pub async fn run(&self, maps: &[&MapConfig]) {
		for map in maps {
			self.process_map(map).await;
		}
	}

	pub async fn process_map(&self, map: &MapConfig) {
		if self.options.locations {
			match self.write_locations(map) {
				Ok(true) => log::info!("map {}: locations written", map.name),
				Ok(false) => {}
				Err(err) => log::error!("map {}: failed to process locations: {err:#}", map.name),
			}
		}

		if !self.options.tiles {
			return;
		}

		for layer in MapLayer::ALL {
			match self.process_layer(map, layer).await {
				Ok(Some(summary)) => log::info!(
					"map {}, layer {layer}: {} tiles in {} zoom levels",
					map.name,
					summary.tiles,
					summary.levels
				),
				Ok(None) => {}
				Err(err) => log::error!("map {}, layer {layer}: {err:#}", map.name),
			}
		}
	}

	/// Build one layer of `map`. Returns `None` if the layer has no source or was skipped by the
	/// fast check.
	pub async fn process_layer(&self, map: &MapConfig, layer: MapLayer) -> Result<Option<BuildSummary>> {
		let Some(source) = map.source(layer) else {
			return Ok(None);
		};

		let layer_dir = self.layout.layer_dir(&map.name, layer);
		if self.options.fast_check && layer_dir.exists() {
			log::info!("map {}, layer {layer}: directory exists, skipping (fast-check)", map.name);
			return Ok(None);
		}

		let zoom_limit = map.zoom_limit(self.options.zoom_limit);
		let summary = match source {
			LayerSource::Pyramid(template) => {
				log::info!("map {}, layer {layer}: starting tile download", map.name);
				let pool = FetchPool::new(self.client.clone(), self.options.concurrency, self.options.force);
				PyramidBuilder::new(pool).build(&template, &layer_dir, zoom_limit).await?
			}
			LayerSource::Image(image) => {
				log::info!("map {}, layer {layer}: slicing single image {image}", map.name);
				ImageSlicer::new(self.client.clone(), self.options.force)
					.run(&image, &layer_dir, zoom_limit, map.tile_size())
					.await?
			}
		};
		Ok(Some(summary))
	}

	/// Write the inline locations of `map`. Returns `true` if a file was written.
	pub fn write_locations(&self, map: &MapConfig) -> Result<bool> {
		let Some(locations) = &map.locations else {
			return Ok(false);
		};

		let path = self.layout.locations_path(&map.name);
		if !self.options.force && dzmap_core::file_exists(&path) {
			log::debug!("map {}: {path:?} exists, skipping", map.name);
			return Ok(false);
		}

		locations.write_to_path(&path)?;
		Ok(true)
	}
}

/// Pick the maps named in `limit` in the order given; an empty `limit` selects every map.
///
/// Unknown names are logged and repeated names are ignored.
pub fn select_maps<'a>(maps: &'a [MapConfig], limit: &[String]) -> Vec<&'a MapConfig> {
	if limit.is_empty() {
		return maps.iter().collect();
	}

	let mut seen = HashSet::new();
	let mut selected = Vec::new();
	for name in limit {
		if !seen.insert(name.as_str()) {
			continue;
		}
		match maps.iter().find(|map| &map.name == name) {
			Some(map) => selected.push(map),
			None => log::error!("map '{name}' given in --limit was not found in the configuration"),
		}
	}
	selected
}
