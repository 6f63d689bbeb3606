use crate::UrlTemplate;
use std::{
	fmt::{self, Display},
	path::PathBuf,
};

/// Where the imagery of one map layer comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LayerSource {
	/// An upstream tile pyramid addressed by a URL template.
	Pyramid(UrlTemplate),
	/// A single large raster, sliced locally.
	Image(ImageSource),
}

/// Location of a single source raster.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ImageSource {
	Url(String),
	Path(PathBuf),
}

impl LayerSource {
	/// Classify a configured source string. Returns `None` for an empty (absent) source.
	pub fn parse(source: &str) -> Option<LayerSource> {
		let source = source.trim();
		if source.is_empty() {
			return None;
		}
		Some(if UrlTemplate::is_template(source) {
			LayerSource::Pyramid(UrlTemplate::new(source))
		} else if source.starts_with("http") {
			LayerSource::Image(ImageSource::Url(source.to_owned()))
		} else {
			LayerSource::Image(ImageSource::Path(PathBuf::from(source)))
		})
	}
}

impl Display for ImageSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ImageSource::Url(url) => f.write_str(url),
			ImageSource::Path(path) => write!(f, "{}", path.display()),
		}
	}
}
