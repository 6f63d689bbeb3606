//! URL templates for pre-tiled upstream sources.
//!
//! A template contains the placeholders `{z}`, `{x}` and `{y}`, which are replaced by the
//! decimal tile coordinate. Servers that number rows from the bottom can use `{tms_y}` instead
//! of `{y}`, which is replaced by `(2^z - 1) - y`.
//!
//! ```
//! use dzmap_core::{TileCoord, UrlTemplate};
//!
//! let template = UrlTemplate::new("https://tiles.example.org/{z}/{x}/{tms_y}.png");
//! let coord = TileCoord::new(3, 1, 2).unwrap();
//! assert_eq!(template.render(&coord), "https://tiles.example.org/3/1/5.png");
//! ```

use crate::TileCoord;
use regex::{Captures, Regex};
use std::{
	fmt::{self, Display},
	sync::LazyLock,
};

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(z|x|y|tms_y)\}").unwrap());

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
	pub fn new(template: &str) -> UrlTemplate {
		UrlTemplate(template.to_owned())
	}

	/// Whether `source` addresses a tile pyramid rather than a single image.
	pub fn is_template(source: &str) -> bool {
		source.contains("{z}") || source.contains("{x}")
	}

	/// Substitute all placeholders with the values of `coord`.
	pub fn render(&self, coord: &TileCoord) -> String {
		RE_PLACEHOLDER
			.replace_all(&self.0, |caps: &Captures| match &caps[1] {
				"z" => coord.level.to_string(),
				"x" => coord.x.to_string(),
				"y" => coord.y.to_string(),
				_ => coord.tms_y().to_string(),
			})
			.into_owned()
	}
}

impl Display for UrlTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
