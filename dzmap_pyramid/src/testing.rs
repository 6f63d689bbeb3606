//! In-process upstream tile server for tests.

use axum::{
	Router,
	body::Body,
	extract::{Path, State},
	http::{StatusCode, header},
	response::{IntoResponse, Response},
	routing::get,
};
use dzmap_core::{UrlTemplate, io::build_http_client};
use dzmap_image::helper::image2png;
use image::DynamicImage;
use reqwest::Client;
use std::{
	collections::HashMap,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
use tokio::net::TcpListener;

#[derive(Clone)]
pub enum UpstreamTile {
	Png(Vec<u8>),
	Raw(Vec<u8>),
	Status(u16),
}

impl UpstreamTile {
	pub fn png(image: &DynamicImage) -> UpstreamTile {
		UpstreamTile::Png(image2png(image))
	}
}

struct UpstreamState {
	tiles: HashMap<String, UpstreamTile>,
	requests: Mutex<Vec<String>>,
	delay: Duration,
	in_flight: AtomicUsize,
	peak_in_flight: AtomicUsize,
}

/// Serves `GET /{z}/{x}/{y}.png` from a fixed table; everything else is 404.
pub struct Upstream {
	base_url: String,
	state: Arc<UpstreamState>,
}

impl Upstream {
	pub async fn start<'a>(tiles: impl IntoIterator<Item = (&'a str, UpstreamTile)>) -> Upstream {
		Upstream::start_slow(tiles, Duration::ZERO).await
	}

	/// Like [`Upstream::start`], but every response is held back for `delay`.
	pub async fn start_slow<'a>(tiles: impl IntoIterator<Item = (&'a str, UpstreamTile)>, delay: Duration) -> Upstream {
		let state = Arc::new(UpstreamState {
			tiles: tiles.into_iter().map(|(key, tile)| (key.to_string(), tile)).collect(),
			requests: Mutex::default(),
			delay,
			in_flight: AtomicUsize::new(0),
			peak_in_flight: AtomicUsize::new(0),
		});

		let app = Router::new()
			.route("/{*path}", get(serve_tile))
			.with_state(Arc::clone(&state));
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let base_url = format!("http://{}", listener.local_addr().unwrap());
		tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

		Upstream { base_url, state }
	}

	pub async fn empty() -> Upstream {
		Upstream::start(Vec::<(&str, UpstreamTile)>::new()).await
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn template(&self) -> UrlTemplate {
		UrlTemplate::new(&format!("{}/{{z}}/{{x}}/{{y}}.png", self.base_url))
	}

	pub fn client(&self) -> Client {
		build_http_client().unwrap()
	}

	/// Number of requests served so far.
	pub fn hits(&self) -> usize {
		self.state.requests.lock().unwrap().len()
	}

	/// Highest number of requests that were being answered at the same time.
	pub fn peak_in_flight(&self) -> usize {
		self.state.peak_in_flight.load(Ordering::SeqCst)
	}

	pub fn reset(&self) {
		self.state.requests.lock().unwrap().clear();
	}

	/// Requested tile keys (`z/x/y`), sorted.
	pub fn requested(&self) -> Vec<String> {
		let mut requests = self.state.requests.lock().unwrap().clone();
		requests.sort();
		requests
	}
}

async fn serve_tile(Path(path): Path<String>, State(state): State<Arc<UpstreamState>>) -> Response {
	let key = path.trim_end_matches(".png").to_string();
	state.requests.lock().unwrap().push(key.clone());

	let current = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
	state.peak_in_flight.fetch_max(current, Ordering::SeqCst);
	if !state.delay.is_zero() {
		tokio::time::sleep(state.delay).await;
	}
	state.in_flight.fetch_sub(1, Ordering::SeqCst);

	match state.tiles.get(&key) {
		Some(UpstreamTile::Png(blob)) => ([(header::CONTENT_TYPE, "image/png")], blob.clone()).into_response(),
		Some(UpstreamTile::Raw(blob)) => Response::new(Body::from(blob.clone())),
		Some(UpstreamTile::Status(code)) => StatusCode::from_u16(*code).unwrap().into_response(),
		None => StatusCode::NOT_FOUND.into_response(),
	}
}
