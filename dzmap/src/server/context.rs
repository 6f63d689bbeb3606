//! Read-only state shared by all request handlers.

use anyhow::Result;
use dzmap_core::{Config, DEFAULT_TILE_SIZE, MapConfig, MapLayer, PyramidLayout};
use dzmap_image::transparent_tile;
use std::collections::HashMap;

pub const INDEX_HTML: &[u8] = include_bytes!("../../assets/index.html");
pub const FAVICON: &[u8] = include_bytes!("../../assets/favicon.ico");

/// Everything a request needs, computed once at startup.
///
/// Only maps with at least one layer on disk are kept. They are ordered by `index` (maps without
/// one last) and then by name.
#[derive(Debug)]
pub struct ServerContext {
	layout: PyramidLayout,
	maps: Vec<MapConfig>,
	resolver: HashMap<String, String>,
	maps_json: String,
	placeholder: Vec<u8>,
}

impl ServerContext {
	pub fn new(mut config: Config, layout: PyramidLayout) -> Result<ServerContext> {
		log::info!(
			"initializing server context with {} configured maps below {:?}",
			config.maps.len(),
			layout.root()
		);

		let zoom = config.resolve_zoom(0);
		let attribution = config.attribution.clone();

		let mut maps: Vec<MapConfig> = Vec::with_capacity(config.maps.len());
		for mut map in config.maps.drain(..) {
			map.zoom = map.zoom_limit(zoom);
			if map.attribution.is_empty() {
				map.attribution.clone_from(&attribution);
			}

			for layer in MapLayer::ALL {
				let missing = if map.source(layer).is_none() {
					log::trace!("map {}: {layer} layer skipped, no source configured", map.name);
					true
				} else if !layout.layer_dir(&map.name, layer).is_dir() {
					log::trace!("map {}: {layer} layer skipped, directory not found", map.name);
					true
				} else {
					false
				};
				map.set_layer_missing(layer, missing);
			}

			if MapLayer::ALL.into_iter().all(|layer| map.is_layer_missing(layer)) {
				log::warn!("skipping map {}: neither topographic nor satellite layer found", map.name);
				continue;
			}

			log::debug!(
				"map {} added (topographic: {}, satellite: {})",
				map.name,
				!map.is_layer_missing(MapLayer::Topographic),
				!map.is_layer_missing(MapLayer::Satellite)
			);
			maps.push(map);
		}

		maps.sort_by(|a, b| {
			(a.index.is_none(), a.index, &a.name).cmp(&(b.index.is_none(), b.index, &b.name))
		});

		let resolver = build_resolver(&maps);

		let maps_json = serde_json::to_string(&maps)?;
		let placeholder = transparent_tile(DEFAULT_TILE_SIZE)?;

		log::info!("server context initialized with {} maps", maps.len());

		Ok(ServerContext {
			layout,
			maps,
			resolver,
			maps_json,
			placeholder,
		})
	}

	pub fn layout(&self) -> &PyramidLayout {
		&self.layout
	}

	pub fn maps(&self) -> &[MapConfig] {
		&self.maps
	}

	/// Canonical name of the map requested as `name` (a map name or one of its aliases).
	pub fn resolve(&self, name: &str) -> Option<&str> {
		self.resolver.get(name).map(String::as_str)
	}

	/// The validated maps as served at `/api/maps`.
	pub fn maps_json(&self) -> &str {
		&self.maps_json
	}

	/// Transparent WebP returned for tiles that exist in neither layer.
	pub fn placeholder(&self) -> &[u8] {
		&self.placeholder
	}
}

/// Map every canonical name and alias to its canonical name.
///
/// Canonical names are registered first, so an alias never hides a map's own name. Among
/// aliases the first map in display order wins.
fn build_resolver(maps: &[MapConfig]) -> HashMap<String, String> {
	let mut resolver: HashMap<String, String> = maps
		.iter()
		.map(|map| (map.name.clone(), map.name.clone()))
		.collect();

	for map in maps {
		for alias in &map.aliases {
			if let Some(existing) = resolver.get(alias) {
				log::warn!("alias '{alias}' of map {} is already used by map {existing}", map.name);
				continue;
			}
			resolver.insert(alias.clone(), map.name.clone());
		}
	}
	resolver
}
