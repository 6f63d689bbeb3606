use anyhow::Result;
use dzmap::server::{ServerContext, TileServer};
use dzmap_core::{Config, PyramidLayout};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Path to the configuration file (YAML).
	#[arg(short, long, env = "CONFIG_FILE", default_value = "config.yaml", value_name = "FILE", display_order = 0)]
	pub config: PathBuf,

	/// Address to listen on.
	#[arg(short = 'a', long = "addr", env = "LISTEN_ADDRESS", default_value = "0.0.0.0", display_order = 1)]
	pub ip: String,

	/// Port to listen on.
	#[arg(short, long, env = "LISTEN_PORT", default_value_t = 8080, display_order = 1)]
	pub port: u16,

	/// Zoom limit for maps and configurations that don't set one.
	#[arg(short, long, env = "ZOOM_LIMIT", default_value_t = 6, display_order = 2)]
	pub zoom_limit: u8,

	/// Directory containing the map pyramids.
	#[arg(short, long, default_value = "maps", value_name = "DIR", display_order = 2)]
	pub maps_dir: PathBuf,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = Config::from_path(&arguments.config)?;
	config.resolve_zoom(arguments.zoom_limit);

	let context = ServerContext::new(config, PyramidLayout::new(&arguments.maps_dir))?;
	let mut server = TileServer::new(&arguments.ip, arguments.port, context);
	server.start().await?;

	tokio::signal::ctrl_c().await?;
	server.stop().await;

	Ok(())
}
