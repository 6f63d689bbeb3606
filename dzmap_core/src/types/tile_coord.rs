//! Tile coordinates in a quadtree tile pyramid
//!
//! This module provides the [`TileCoord`] type used by both the pyramid builder and the
//! tile server. It includes methods for:
//! - Creating and validating tile coordinates
//! - Expanding a tile into its four children at the next zoom level
//! - Converting the row index to the inverted TMS convention
//! - Computing a total ordering across zoom levels
//!
//! # Examples
//!
//! ```
//! use dzmap_core::TileCoord;
//!
//! let coord = TileCoord::new(3, 1, 2).unwrap();
//! assert_eq!(coord.tms_y(), 5);
//!
//! let children = coord.children();
//! assert_eq!(children[0], TileCoord::new(4, 2, 4).unwrap());
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Debug, Display};

/// Highest supported zoom level; `2^level` must fit into a `u32`.
pub const MAX_LEVEL: u8 = 31;

/// A tile coordinate with zoom level, column (`x`) and row (`y`).
///
/// Rows count from the top of the map (XYZ convention). Use [`TileCoord::tms_y`] for servers
/// that count rows from the bottom.
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The column of the tile.
	pub x: u32,
	/// The row of the tile.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord` at the given zoom `level` and tile indices `x`, `y`.
	///
	/// # Errors
	/// Returns an error if `level` > 31 or if `x`/`y` are outside `[0, 2^level)`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
		let max = TileCoord::grid_size(level);
		ensure!(x < max, "x ({x}) out of bounds for level {level}");
		ensure!(y < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// The root tile `(0, 0, 0)` covering the whole map.
	pub const fn root() -> TileCoord {
		TileCoord { level: 0, x: 0, y: 0 }
	}

	/// Number of tiles along one edge at `level`.
	pub fn grid_size(level: u8) -> u32 {
		1u32 << u32::from(level)
	}

	/// Row index in the TMS convention, where row 0 is at the bottom.
	pub fn tms_y(&self) -> u32 {
		TileCoord::grid_size(self.level) - 1 - self.y
	}

	/// The four tiles covering this tile at the next zoom level.
	///
	/// Order: top-left, top-right, bottom-left, bottom-right.
	///
	/// # Panics
	/// Panics if this tile is already at [`MAX_LEVEL`].
	pub fn children(&self) -> [TileCoord; 4] {
		assert!(self.level < MAX_LEVEL, "tile at level {} has no children", self.level);
		let level = self.level + 1;
		let (x, y) = (self.x * 2, self.y * 2);
		[
			TileCoord { level, x, y },
			TileCoord { level, x: x + 1, y },
			TileCoord { level, x, y: y + 1 },
			TileCoord { level, x: x + 1, y: y + 1 },
		]
	}

	/// The tile one level up that contains this tile, or `None` for the root.
	pub fn parent(&self) -> Option<TileCoord> {
		if self.level == 0 {
			return None;
		}
		Some(TileCoord {
			level: self.level - 1,
			x: self.x / 2,
			y: self.y / 2,
		})
	}

	/// Compute a linear sort index combining zoom and x/y for total ordering.
	///
	/// Tiles of lower levels always sort first; within a level tiles sort row by row.
	pub fn sort_index(&self) -> u64 {
		let size = 1u64 << u32::from(self.level);
		let offset = (size * size - 1) / 3;
		offset + size * u64::from(self.y) + u64::from(self.x)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", &self.level, &self.x, &self.y)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

impl PartialOrd for TileCoord {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for TileCoord {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.sort_index().cmp(&other.sort_index())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, 0, 0, true)]
	#[case(1, 1, 1, true)]
	#[case(1, 2, 0, false)]
	#[case(3, 7, 7, true)]
	#[case(3, 0, 8, false)]
	#[case(31, 0, 0, true)]
	#[case(32, 0, 0, false)]
	fn new_validates_bounds(#[case] level: u8, #[case] x: u32, #[case] y: u32, #[case] ok: bool) {
		assert_eq!(TileCoord::new(level, x, y).is_ok(), ok);
	}

	#[test]
	fn new_error_message() {
		let err = TileCoord::new(2, 4, 0).unwrap_err();
		assert_eq!(err.to_string(), "x (4) out of bounds for level 2");
	}

	#[rstest]
	#[case(0, 0, 0)]
	#[case(1, 0, 1)]
	#[case(1, 1, 0)]
	#[case(3, 2, 5)]
	#[case(3, 7, 0)]
	fn tms_y(#[case] level: u8, #[case] y: u32, #[case] expected: u32) {
		assert_eq!(TileCoord::new(level, 0, y).unwrap().tms_y(), expected);
	}

	#[test]
	fn children_of_root() {
		let children = TileCoord::root().children();
		let as_tuples: Vec<_> = children.iter().map(|c| (c.level, c.x, c.y)).collect();
		assert_eq!(as_tuples, vec![(1, 0, 0), (1, 1, 0), (1, 0, 1), (1, 1, 1)]);
	}

	#[test]
	fn children_point_back_to_parent() {
		let coord = TileCoord::new(4, 5, 9).unwrap();
		for child in coord.children() {
			assert_eq!(child.parent(), Some(coord));
			assert!(TileCoord::new(child.level, child.x, child.y).is_ok());
		}
		assert_eq!(TileCoord::root().parent(), None);
	}

	#[test]
	fn sort_index_orders_levels_then_rows() {
		let mut coords = vec![
			TileCoord::new(1, 1, 1).unwrap(),
			TileCoord::new(0, 0, 0).unwrap(),
			TileCoord::new(1, 0, 1).unwrap(),
			TileCoord::new(1, 1, 0).unwrap(),
			TileCoord::new(2, 0, 0).unwrap(),
		];
		coords.sort();
		let indexes: Vec<u64> = coords.iter().map(|c| c.sort_index()).collect();
		assert_eq!(indexes, vec![0, 2, 3, 4, 5]);
	}

	#[test]
	fn display_and_debug() {
		let coord = TileCoord::new(2, 3, 1).unwrap();
		assert_eq!(coord.to_string(), "2/3/1");
		assert_eq!(format!("{coord:?}"), "TileCoord(2, [3, 1])");
	}
}
