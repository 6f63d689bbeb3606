use crate::{LayerSource, MapLayer, geo::FeatureCollection};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Configuration of one game map.
///
/// Deserialized from the YAML configuration. The serialized (JSON) form is what the tile server
/// publishes at `/api/maps`, so source locations, aliases and loader-only settings are skipped.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MapConfig {
	/// Optional ordering key; maps without one are listed last.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub index: Option<i64>,

	/// Canonical map name, also the directory name below the maps root.
	pub name: String,

	/// Steam app or workshop id.
	#[serde(default)]
	pub id: u64,

	/// Source of the topographic layer: URL template, image URL or image path.
	#[serde(default, skip_serializing)]
	pub topographic: String,

	/// Source of the satellite layer: URL template, image URL or image path.
	#[serde(default, skip_serializing)]
	pub satellite: String,

	/// Alternative names the map can be requested by.
	#[serde(default, skip_serializing)]
	pub aliases: Vec<String>,

	/// Deepest zoom level; 0 means "use the global default".
	#[serde(default)]
	pub zoom: u8,

	/// World size in game units.
	#[serde(default)]
	pub size: u32,

	/// Tile edge length when slicing a single image; 0 means 256.
	#[serde(default, skip_serializing)]
	pub tile_size: u32,

	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub attribution: String,

	/// Locations given directly in the configuration.
	#[serde(default, rename = "locations_geojson", skip_serializing)]
	pub locations: Option<FeatureCollection>,

	/// Set by the server when the topographic layer is unavailable.
	#[serde(skip_deserializing, skip_serializing_if = "is_false")]
	pub no_topographic: bool,

	/// Set by the server when the satellite layer is unavailable.
	#[serde(skip_deserializing, skip_serializing_if = "is_false")]
	pub no_satellite: bool,
}

fn is_false(value: &bool) -> bool {
	!*value
}

impl MapConfig {
	pub fn source_str(&self, layer: MapLayer) -> &str {
		match layer {
			MapLayer::Topographic => &self.topographic,
			MapLayer::Satellite => &self.satellite,
		}
	}

	/// The parsed source of `layer`, or `None` if the layer has no source configured.
	pub fn source(&self, layer: MapLayer) -> Option<LayerSource> {
		LayerSource::parse(self.source_str(layer))
	}

	pub fn zoom_limit(&self, default: u8) -> u8 {
		if self.zoom == 0 { default } else { self.zoom }
	}

	pub fn tile_size(&self) -> u32 {
		if self.tile_size == 0 {
			DEFAULT_TILE_SIZE
		} else {
			self.tile_size
		}
	}

	pub fn is_layer_missing(&self, layer: MapLayer) -> bool {
		match layer {
			MapLayer::Topographic => self.no_topographic,
			MapLayer::Satellite => self.no_satellite,
		}
	}

	pub fn set_layer_missing(&mut self, layer: MapLayer, missing: bool) {
		match layer {
			MapLayer::Topographic => self.no_topographic = missing,
			MapLayer::Satellite => self.no_satellite = missing,
		}
	}
}
