use super::MapConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

pub const DEFAULT_ZOOM_LIMIT: u8 = 6;

/// Root of the YAML configuration file.
///
/// Keys that belong to the external location tooling are ignored, so one file can be shared.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
	/// Attribution for maps that don't set their own.
	#[serde(default)]
	pub attribution: String,

	/// Default zoom limit; 0 means "use the command line value".
	#[serde(default)]
	pub zoom: u8,

	#[serde(default)]
	pub maps: Vec<MapConfig>,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening configuration file {path:?}"))?;
		Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing configuration file {path:?}"))
	}

	/// Fill in the global zoom limit: the configured value wins, then `fallback`, then 6.
	pub fn resolve_zoom(&mut self, fallback: u8) -> u8 {
		if self.zoom == 0 {
			self.zoom = if fallback == 0 { DEFAULT_ZOOM_LIMIT } else { fallback };
		}
		self.zoom
	}
}
