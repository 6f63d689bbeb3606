use super::{ServerContext, build_router};
use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::oneshot::Sender, task::JoinHandle};

/// Binds the router to an address and runs it until [`TileServer::stop`] is called.
pub struct TileServer {
	ip: String,
	port: u16,
	context: Arc<ServerContext>,
	exit_signal: Option<Sender<()>>,
	handle: Option<JoinHandle<()>>,
}

impl TileServer {
	pub fn new(ip: &str, port: u16, context: ServerContext) -> TileServer {
		TileServer {
			ip: ip.to_owned(),
			port,
			context: Arc::new(context),
			exit_signal: None,
			handle: None,
		}
	}

	/// Start listening. Returns the bound address (useful with port 0).
	pub async fn start(&mut self) -> Result<SocketAddr> {
		if self.exit_signal.is_some() {
			self.stop().await;
		}

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding to {addr}"))?;
		let local_addr = listener.local_addr()?;

		log::info!(
			"web server listening on {local_addr} with {} maps",
			self.context.maps().len()
		);

		let router = build_router(Arc::clone(&self.context));
		let (tx, rx) = tokio::sync::oneshot::channel::<()>();

		self.handle = Some(tokio::spawn(async move {
			let service = router.into_make_service_with_connect_info::<SocketAddr>();
			if let Err(err) = axum::serve(listener, service)
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server failed: {err}");
			}
		}));
		self.exit_signal = Some(tx);

		Ok(local_addr)
	}

	pub async fn stop(&mut self) {
		let Some(exit_signal) = self.exit_signal.take() else {
			return;
		};

		log::info!("stopping server");
		exit_signal.send(()).ok();
		if let Some(handle) = self.handle.take() {
			handle.await.ok();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use dzmap_core::{Config, PyramidLayout};

	#[tokio::test]
	async fn start_serve_stop() {
		let dir = TempDir::new().unwrap();
		std::fs::create_dir_all(dir.path().join("Sakhal/satellite/0/0")).unwrap();
		std::fs::write(dir.path().join("Sakhal/satellite/0/0/0.webp"), b"sakhal").unwrap();

		let config = Config::from_string("maps:\n  - name: Sakhal\n    satellite: /data/sakhal.png\n").unwrap();
		let context = ServerContext::new(config, PyramidLayout::new(dir.path())).unwrap();
		let mut server = TileServer::new("127.0.0.1", 0, context);
		let addr = server.start().await.unwrap();

		let url = format!("http://{addr}/maps/Sakhal/topographic/0/0/0.webp");
		let response = reqwest::get(&url).await.unwrap();
		assert_eq!(response.status(), 200);
		assert_eq!(response.bytes().await.unwrap().as_ref(), b"sakhal");

		server.stop().await;
		assert!(reqwest::get(&url).await.is_err());
	}
}
