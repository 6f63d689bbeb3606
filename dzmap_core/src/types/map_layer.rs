//! The two imagery layers a map can have.

use anyhow::{Result, bail};
use std::fmt::{self, Display};

/// One of the imagery layers of a game map.
///
/// The set is closed: the tile server only ever touches these two directories, which keeps
/// request paths from addressing anything else below a map directory.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MapLayer {
	Topographic,
	Satellite,
}

impl MapLayer {
	pub const ALL: [MapLayer; 2] = [MapLayer::Topographic, MapLayer::Satellite];

	/// Directory and URL segment name of the layer.
	pub fn as_str(&self) -> &'static str {
		match self {
			MapLayer::Topographic => "topographic",
			MapLayer::Satellite => "satellite",
		}
	}

	/// The layer used as fallback when a tile is missing in `self`.
	pub fn other(&self) -> MapLayer {
		match self {
			MapLayer::Topographic => MapLayer::Satellite,
			MapLayer::Satellite => MapLayer::Topographic,
		}
	}
}

impl Display for MapLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<&str> for MapLayer {
	type Error = anyhow::Error;

	fn try_from(value: &str) -> Result<Self> {
		Ok(match value {
			"topographic" => MapLayer::Topographic,
			"satellite" => MapLayer::Satellite,
			_ => bail!("unknown map layer '{value}'"),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("topographic", MapLayer::Topographic)]
	#[case("satellite", MapLayer::Satellite)]
	fn parse_and_print(#[case] name: &str, #[case] layer: MapLayer) {
		assert_eq!(MapLayer::try_from(name).unwrap(), layer);
		assert_eq!(layer.to_string(), name);
	}

	#[rstest]
	#[case("Topographic")]
	#[case("..")]
	#[case("")]
	#[case("satellite/../..")]
	fn rejects_unknown(#[case] name: &str) {
		assert!(MapLayer::try_from(name).is_err());
	}

	#[test]
	fn other_swaps() {
		assert_eq!(MapLayer::Topographic.other(), MapLayer::Satellite);
		assert_eq!(MapLayer::Satellite.other(), MapLayer::Topographic);
	}
}
