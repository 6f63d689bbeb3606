use anyhow::Result;
use dzmap_core::{Config, PyramidLayout, io::build_http_client};
use dzmap_pyramid::{LoadOptions, MapLoader, select_maps};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Path to the configuration file (YAML).
	#[arg(short, long, env = "CONFIG_FILE", default_value = "config.yaml", value_name = "FILE", display_order = 0)]
	pub config: PathBuf,

	/// Only process the maps with these names. Can be given multiple times.
	#[arg(short, long, value_name = "NAME", display_order = 1)]
	pub limit: Vec<String>,

	/// Number of concurrent tile downloads.
	#[arg(short = 'p', long, env = "CONCURRENCY", default_value_t = 50, display_order = 2)]
	pub concurrency: usize,

	/// Zoom limit for maps and configurations that don't set one.
	#[arg(short, long, env = "ZOOM_LIMIT", default_value_t = 6, display_order = 2)]
	pub zoom_limit: u8,

	/// Only build tiles.
	#[arg(short, long, display_order = 3)]
	pub tiles_only: bool,

	/// Only write location files.
	#[arg(short, long, display_order = 3)]
	pub geojson_only: bool,

	/// Overwrite existing tiles and location files.
	#[arg(short, long, display_order = 3)]
	pub force: bool,

	/// Skip a layer completely if its directory already exists.
	#[arg(short = 'F', long, display_order = 3)]
	pub fast_check: bool,

	/// Directory the map pyramids are written to.
	#[arg(short, long, default_value = "maps", value_name = "DIR", display_order = 4)]
	pub maps_dir: PathBuf,
}

impl Subcommand {
	fn options(&self, zoom_limit: u8) -> LoadOptions {
		// giving both flags is the same as giving none
		let (tiles, locations) = match (self.tiles_only, self.geojson_only) {
			(true, false) => (true, false),
			(false, true) => (false, true),
			_ => (true, true),
		};

		LoadOptions {
			concurrency: self.concurrency.max(1),
			zoom_limit,
			force: self.force,
			fast_check: self.fast_check,
			tiles,
			locations,
		}
	}
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = Config::from_path(&arguments.config)?;
	let zoom_limit = config.resolve_zoom(arguments.zoom_limit);

	let maps = select_maps(&config.maps, &arguments.limit);
	log::info!(
		"starting loader: {} maps configured, {} queued, fast check: {}",
		config.maps.len(),
		maps.len(),
		arguments.fast_check
	);

	let loader = MapLoader::new(
		build_http_client()?,
		PyramidLayout::new(&arguments.maps_dir),
		arguments.options(zoom_limit),
	);
	loader.run(&maps).await;

	log::info!("loader finished");
	Ok(())
}
