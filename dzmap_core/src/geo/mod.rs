//! GeoJSON types for map location markers.
//!
//! Location files are produced by external tooling and served verbatim; these types are used
//! when a map configuration carries its locations inline and `load` writes them to disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FeatureCollection {
	#[serde(rename = "type", default = "FeatureCollection::kind")]
	pub kind: String,
	#[serde(default)]
	pub features: Vec<Feature>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Feature {
	#[serde(rename = "type", default = "Feature::kind")]
	pub kind: String,
	pub geometry: PointGeometry,
	pub properties: LocationProperties,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PointGeometry {
	#[serde(rename = "type", default = "PointGeometry::kind")]
	pub kind: String,
	/// `[x, y]` in map space.
	pub coordinates: [f64; 2],
}

/// Marker attributes. Only the name and the marker category are ever set.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LocationProperties {
	#[serde(default)]
	pub name: String,
	#[serde(rename = "type", default)]
	pub kind: String,
}

impl FeatureCollection {
	fn kind() -> String {
		"FeatureCollection".into()
	}

	pub fn new(features: Vec<Feature>) -> FeatureCollection {
		FeatureCollection {
			kind: FeatureCollection::kind(),
			features,
		}
	}

	/// Write the collection as JSON to `path`, creating parent directories.
	pub fn write_to_path(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).with_context(|| format!("creating directory {parent:?}"))?;
		}
		let json = serde_json::to_vec(self)?;
		std::fs::write(path, json).with_context(|| format!("writing locations to {path:?}"))
	}
}

impl Feature {
	fn kind() -> String {
		"Feature".into()
	}

	pub fn point(x: f64, y: f64, name: &str, kind: &str) -> Feature {
		Feature {
			kind: Feature::kind(),
			geometry: PointGeometry {
				kind: PointGeometry::kind(),
				coordinates: [x, y],
			},
			properties: LocationProperties {
				name: name.to_owned(),
				kind: kind.to_owned(),
			},
		}
	}
}

impl PointGeometry {
	fn kind() -> String {
		"Point".into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use pretty_assertions::assert_eq;

	#[test]
	fn serializes_standard_shape() {
		let fc = FeatureCollection::new(vec![Feature::point(12.5, 100.0, "Berezino", "city")]);
		assert_eq!(
			serde_json::to_string(&fc).unwrap(),
			r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[12.5,100.0]},"properties":{"name":"Berezino","type":"city"}}]}"#
		);
	}

	#[test]
	fn deserializes_with_defaults() {
		let fc: FeatureCollection = serde_json::from_str(
			r#"{"features":[{"geometry":{"coordinates":[1,2]},"properties":{"name":"Tisy"}}]}"#,
		)
		.unwrap();
		assert_eq!(fc, FeatureCollection::new(vec![Feature::point(1.0, 2.0, "Tisy", "")]));
	}

	#[test]
	fn writes_file() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("chernarus/locations.geojson");
		FeatureCollection::new(vec![]).write_to_path(&path).unwrap();
		assert_eq!(
			std::fs::read_to_string(&path).unwrap(),
			r#"{"type":"FeatureCollection","features":[]}"#
		);
	}
}
